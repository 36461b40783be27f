//! Read-only view of a session for renderers.
//!
//! A snapshot is a plain value copied out of the session: front-ends draw
//! from it without holding any borrow on the live state.

use blockfall_types::{Cell, PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH};

/// The falling piece as a renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    /// Position of the piece's relative frame.
    pub pos: Point,
    /// Absolute board cells covered by the piece.
    pub cells: [Point; 4],
}

impl ActiveSnapshot {
    /// Cells the ghost outline covers for a given landing row.
    pub fn ghost_cells(&self, ghost_row: i8) -> [Point; 4] {
        let dy = ghost_row - self.pos.y;
        self.cells.map(|p| Point::new(p.x, p.y + dy))
    }
}

/// Everything a front-end needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    /// Settled cells, row-major, `cells[y][x]`.
    pub cells: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_row: Option<i8>,
    pub held: Option<PieceKind>,
    pub next: PieceKind,
    pub score: u32,
    pub high_score: u32,
    pub lines: u32,
    pub level: u32,
    pub spawn_counts: [u32; 7],
    pub can_hold: bool,
    pub paused: bool,
    pub game_over: bool,
}
