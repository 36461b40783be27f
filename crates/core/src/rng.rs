//! Piece-supply randomizers.
//!
//! Two interchangeable strategies behind the [`Randomizer`] trait, selected
//! at session construction:
//!
//! - [`SimpleRandomizer`]: independent uniform draws with a one-slot peek
//!   buffer.
//! - [`BagRandomizer`]: shuffle-without-immediate-repeat. Every aligned
//!   group of 7 draws is a permutation of the 7 kinds; a sentinel chosen at
//!   refill time biases the seam between consecutive bags (the first piece
//!   of the next bag is the sentinel, not an independent draw).
//!
//! Both are driven by a small seedable LCG so games are reproducible from a
//! seed with no ambient RNG state.

use blockfall_types::{PieceKind, PIECE_KINDS};

/// Simple LCG (Linear Congruential Generator) RNG.
/// Uses constants from Numerical Recipes.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u32) -> Self {
        // A zero seed would degenerate; nudge it.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u32.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate a random value in `[0, max)`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice with Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Supplies the next falling piece.
///
/// `peek` takes `&mut self` because the bag variant may need to refill
/// before it can report the upcoming piece.
pub trait Randomizer {
    /// Draw and consume the next piece.
    fn next(&mut self) -> PieceKind;
    /// Report the upcoming piece without consuming it.
    fn peek(&mut self) -> PieceKind;
}

/// Which randomizer strategy a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomizerKind {
    Simple,
    Bag,
}

impl RandomizerKind {
    /// Parse a configuration name; unknown names are `None` so the caller
    /// can keep its previous selection.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(RandomizerKind::Simple),
            "bag" => Some(RandomizerKind::Bag),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RandomizerKind::Simple => "simple",
            RandomizerKind::Bag => "bag",
        }
    }
}

/// Build the configured randomizer, seeded.
pub fn make_randomizer(kind: RandomizerKind, seed: u32) -> Box<dyn Randomizer> {
    match kind {
        RandomizerKind::Simple => Box::new(SimpleRandomizer::new(seed)),
        RandomizerKind::Bag => Box::new(BagRandomizer::new(seed)),
    }
}

/// Uniform draws with a one-slot lookahead.
///
/// `next` returns the pre-drawn slot and refills it, so `peek` can report
/// the following piece without mutating anything the draw depends on.
#[derive(Debug, Clone)]
pub struct SimpleRandomizer {
    rng: Lcg,
    pending: PieceKind,
}

impl SimpleRandomizer {
    pub fn new(seed: u32) -> Self {
        let mut rng = Lcg::new(seed);
        let pending = random_kind(&mut rng);
        Self { rng, pending }
    }
}

impl Randomizer for SimpleRandomizer {
    fn next(&mut self) -> PieceKind {
        let out = self.pending;
        self.pending = random_kind(&mut self.rng);
        out
    }

    fn peek(&mut self) -> PieceKind {
        self.pending
    }
}

/// 7-bag randomizer with an anti-repeat seam.
///
/// Holds a permutation of the 7 kinds, a cursor, and a separate sentinel
/// field. At refill time the stored sentinel is located in the exhausted
/// arrangement and swapped to the front, the remaining six positions are
/// Fisher-Yates shuffled, and a fresh sentinel is drawn for the bag after
/// this one.
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    bag: [PieceKind; 7],
    sentinel: PieceKind,
    cursor: usize,
    rng: Lcg,
}

impl BagRandomizer {
    pub fn new(seed: u32) -> Self {
        let mut rng = Lcg::new(seed);
        let sentinel = random_kind(&mut rng);
        let mut bag = Self {
            bag: PIECE_KINDS,
            sentinel,
            cursor: 0,
            rng,
        };
        bag.refill();
        bag
    }

    /// Put all pieces back in the bag, starting with the sentinel.
    fn refill(&mut self) {
        let front = self
            .bag
            .iter()
            .position(|&k| k == self.sentinel)
            .unwrap_or(0);
        self.bag.swap(0, front);
        self.rng.shuffle(&mut self.bag[1..]);

        self.sentinel = random_kind(&mut self.rng);
        self.cursor = 0;
    }
}

impl Randomizer for BagRandomizer {
    fn next(&mut self) -> PieceKind {
        if self.cursor == self.bag.len() {
            self.refill();
        }
        let out = self.bag[self.cursor];
        self.cursor += 1;
        out
    }

    fn peek(&mut self) -> PieceKind {
        if self.cursor == self.bag.len() {
            self.refill();
        }
        self.bag[self.cursor]
    }
}

fn random_kind(rng: &mut Lcg) -> PieceKind {
    PieceKind::from_index(rng.next_range(PIECE_KINDS.len() as u32) as usize)
        .unwrap_or(PieceKind::I)
}
