//! Board module - the fixed-size occupancy grid.
//!
//! 10x20 grid of cells in a flat row-major array. `x` must stay within the
//! playfield, but `y` may be negative: pieces are probed (and can briefly
//! sit) above the visible field around spawn time, and those rows are
//! always empty.

use arrayvec::ArrayVec;

use blockfall_types::{Cell, PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH};

const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// The playfield grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major (`y * WIDTH + x`).
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Whether a piece cell may occupy `(x, y)`.
    ///
    /// `x` is bounded on both sides; `y` only from below, so any row above
    /// the field is in range. Used for collision probing during spawn and
    /// rotation near the top edge.
    pub fn in_range(&self, x: i8, y: i8) -> bool {
        x >= 0 && x < BOARD_WIDTH as i8 && y < BOARD_HEIGHT as i8
    }

    /// Cell contents; rows above the field read as empty.
    pub fn get(&self, x: i8, y: i8) -> Cell {
        Self::index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Whether `(x, y)` holds a locked block.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get(x, y).is_some()
    }

    /// In range and not occupied.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        self.in_range(x, y) && !self.is_occupied(x, y)
    }

    /// Write one cell; silently ignores above-field coordinates.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) {
        if let Some(idx) = Self::index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Write a locked piece's four cells with its kind.
    ///
    /// Cells above the visible field are dropped; a piece locking up there
    /// means the stack has topped out and the session is about to end.
    pub fn lock(&mut self, cells: &[Point; 4], kind: PieceKind) {
        for p in cells {
            self.set(p.x, p.y, Some(kind));
        }
    }

    /// Whether every cell of row `y` is occupied.
    pub fn is_row_full(&self, y: i8) -> bool {
        let Some(start) = Self::index(0, y) else {
            return false;
        };
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Row indices that are completely filled, in ascending order.
    ///
    /// A single lock can complete at most 4 rows.
    pub fn full_rows(&self) -> ArrayVec<i8, 4> {
        let mut rows = ArrayVec::new();
        for y in 0..BOARD_HEIGHT as i8 {
            if self.is_row_full(y) {
                rows.push(y);
            }
        }
        rows
    }

    /// Remove row `y`: shift every row above it down one, zero the top row.
    pub fn remove_row(&mut self, y: i8) {
        let Some(_) = Self::index(0, y) else {
            return;
        };
        let width = BOARD_WIDTH as usize;

        for row in (1..=y as usize).rev() {
            let src = (row - 1) * width;
            let dst = row * width;
            self.cells.copy_within(src..src + width, dst);
        }
        for cell in &mut self.cells[0..width] {
            *cell = None;
        }
    }

    /// Remove a set of full rows.
    ///
    /// Rows must be in ascending order (as produced by [`full_rows`]):
    /// removing the topmost first only moves rows above it, so the indices
    /// of the remaining full rows stay valid.
    ///
    /// [`full_rows`]: Board::full_rows
    pub fn compact(&mut self, rows: &[i8]) {
        for &y in rows {
            self.remove_row(y);
        }
    }

    /// Clear the entire board.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Borrow the flat cell array (row-major).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
