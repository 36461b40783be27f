//! Shared types and constants for the blockfall engine.
//!
//! Everything here is pure data with no dependencies, usable from the core
//! engine, the terminal front-end, and tests alike.
//!
//! # Board dimensions
//!
//! Standard playfield: 10 columns by 20 rows. `x` runs 0..9 left to right,
//! `y` runs 0..19 top to bottom. `y` may be negative while a piece is being
//! probed above the visible field; negative rows are always empty.
//!
//! # Timing
//!
//! The logical frame rate is fixed at 60 frames per second. Gravity is
//! expressed as frames-per-cell and converted to a millisecond interval; the
//! engine itself is advanced with elapsed wall-clock milliseconds.

/// Board width in cells (10 columns).
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows).
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn column for a new piece (leftmost block of the 4-wide shape window).
pub const SPAWN_X: i8 = (BOARD_WIDTH as i8) / 2 - 2;

/// Fixed timestep for the driving loop in milliseconds (~60 FPS).
pub const TICK_MS: u32 = 16;

/// Logical frames per second used by the gravity speed table.
pub const FRAMES_PER_SEC: u32 = 60;

/// Gravity at level 0, in frames per cell.
pub const INITIAL_FRAMES_PER_CELL: u32 = 48;

/// Grace window after a piece first touches down, in milliseconds.
///
/// While the window is open, blocked soft/automatic descents report success
/// without locking so the player can still slide or rotate. Hard drops
/// bypass the window entirely.
pub const LOCK_GRACE_MS: u32 = 500;

/// Interval between line-break animation steps in milliseconds.
pub const LINE_BREAK_STEP_MS: u32 = 50;

/// Line clear scoring table, indexed by number of rows cleared at once.
///
/// Base points for {0,1,2,3,4} rows; multiplied by `(level + 1)`.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// An integer cell coordinate or relative block offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i8,
    pub y: i8,
}

impl Point {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// The seven tetromino piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// All piece kinds in catalog order.
pub const PIECE_KINDS: [PieceKind; 7] = [
    PieceKind::I,
    PieceKind::O,
    PieceKind::T,
    PieceKind::S,
    PieceKind::Z,
    PieceKind::J,
    PieceKind::L,
];

impl PieceKind {
    /// Catalog index of this kind (0..7).
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Kind for a catalog index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        PIECE_KINDS.get(index).copied()
    }

    /// One-letter name, for logs and stats panels.
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// How a shape responds to rotation requests.
///
/// - `Normal`: rotates freely through four orientations.
/// - `None`: never rotates (the O piece).
/// - `TwoState`: only two distinct orientations (I, S, Z); the requested
///   direction is ignored and the piece strictly alternates between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationClass {
    Normal,
    None,
    TwoState,
}

/// Rotation direction requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDir {
    Clockwise,
    CounterClockwise,
}

/// What initiated a downward move.
///
/// Hard drops lock on contact; soft and automatic drops get the lock grace
/// window. Only player-initiated descent (soft/hard) earns drop score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Auto,
    Soft,
    Hard,
}

/// Discrete commands accepted by the game session.
///
/// Mapping raw keys to commands is the front-end's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Pause,
    Quit,
}

/// Terminal color tag for a locked or falling block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// A cell on the board: empty, or filled with the kind that locked there.
pub type Cell = Option<PieceKind>;
