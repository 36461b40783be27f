//! Active piece - the mutable copy of a catalog shape owned by the session.
//!
//! Created on spawn, mutated in place by move/rotate, and written into the
//! board on lock. Rotation candidates are computed as fresh values and only
//! committed after the session has validated them against the board.

use blockfall_types::{PieceKind, Point, RotateDir, RotationClass, SPAWN_X};

use crate::pieces::{self, rotate_blocks};

/// The falling piece: a catalog copy plus position and orientation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    blocks: [Point; 4],
    pivot: Point,
    class: RotationClass,
    /// Two-state orientation bit; meaningful only for `TwoState` shapes.
    flipped: bool,
    /// Absolute board position of the shape's relative frame.
    pub pos: Point,
}

/// A validated-pending rotation: candidate offsets plus the orientation bit
/// the piece will carry if the session commits it.
#[derive(Debug, Clone, Copy)]
pub struct RotationCandidate {
    pub blocks: [Point; 4],
    pub flipped: bool,
}

impl ActivePiece {
    /// Copy a shape out of the catalog at the spawn position.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = pieces::shape(kind);
        Self {
            kind,
            blocks: shape.blocks,
            pivot: shape.pivot,
            class: shape.class,
            flipped: false,
            pos: Point::new(SPAWN_X, 0),
        }
    }

    /// Relative block offsets in the current orientation.
    pub fn blocks(&self) -> &[Point; 4] {
        &self.blocks
    }

    /// Absolute board cells currently covered by the piece.
    pub fn cells(&self) -> [Point; 4] {
        self.cells_at(self.pos)
    }

    /// Absolute cells the piece would cover at `pos`.
    pub fn cells_at(&self, pos: Point) -> [Point; 4] {
        self.blocks
            .map(|b| Point::new(pos.x + b.x, pos.y + b.y))
    }

    /// Compute the rotated offsets without touching the live piece.
    ///
    /// `None` when the rotation class forbids rotating. Two-state shapes
    /// ignore the requested direction: the orientation bit decides which of
    /// the two cached orientations comes next, and toggles on commit.
    pub fn rotation_candidate(&self, dir: RotateDir) -> Option<RotationCandidate> {
        let (dir, flipped) = match self.class {
            RotationClass::None => return None,
            RotationClass::Normal => (dir, self.flipped),
            RotationClass::TwoState => {
                let forced = if self.flipped {
                    RotateDir::CounterClockwise
                } else {
                    RotateDir::Clockwise
                };
                (forced, !self.flipped)
            }
        };

        Some(RotationCandidate {
            blocks: rotate_blocks(&self.blocks, self.pivot, dir),
            flipped,
        })
    }

    /// Commit a candidate produced by [`rotation_candidate`] after the
    /// session has validated every absolute cell.
    ///
    /// [`rotation_candidate`]: ActivePiece::rotation_candidate
    pub fn commit_rotation(&mut self, candidate: RotationCandidate) {
        self.blocks = candidate.blocks;
        self.flipped = candidate.flipped;
    }
}
