//! Terminal front-end: raw-mode screen handling and frame drawing.
//!
//! Each board cell is two characters wide and drawn with the glyph pair
//! from the piece catalog, so a locked T reads `()()`. Frames are encoded
//! into an internal buffer of queued crossterm commands and flushed in one
//! write.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use blockfall_core::pieces;
use blockfall_core::snapshot::Snapshot;
use blockfall_types::{PieceColor, PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH, PIECE_KINDS};

// Screen offsets of the playfield's top-left cell.
const BOARD_X: u16 = 1;
const BOARD_Y: u16 = 1;
const PANEL_X: u16 = BOARD_X + BOARD_WIDTH as u16 * 2 + 4;

pub struct Screen {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw one complete frame from a snapshot.
    pub fn draw(&mut self, snap: &Snapshot) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border()?;
        self.draw_cells(snap)?;
        self.draw_ghost(snap)?;
        self.draw_active(snap)?;
        self.draw_panel(snap)?;
        self.draw_banner(snap)?;

        self.buf.queue(ResetColor)?;
        self.flush_buf()
    }

    fn draw_border(&mut self) -> Result<()> {
        let inner = BOARD_WIDTH as usize * 2;
        self.buf.queue(SetForegroundColor(Color::Grey))?;
        self.buf.queue(cursor::MoveTo(BOARD_X - 1, BOARD_Y - 1))?;
        self.buf
            .queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        for y in 0..BOARD_HEIGHT as u16 {
            self.buf.queue(cursor::MoveTo(BOARD_X - 1, BOARD_Y + y))?;
            self.buf.queue(Print("│"))?;
            self.buf
                .queue(cursor::MoveTo(BOARD_X + inner as u16, BOARD_Y + y))?;
            self.buf.queue(Print("│"))?;
        }
        self.buf
            .queue(cursor::MoveTo(BOARD_X - 1, BOARD_Y + BOARD_HEIGHT as u16))?;
        self.buf
            .queue(Print(format!("└{}┘", "─".repeat(inner))))?;
        Ok(())
    }

    fn draw_cells(&mut self, snap: &Snapshot) -> Result<()> {
        for (y, row) in snap.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(kind) = cell {
                    self.put_cell(Point::new(x as i8, y as i8), *kind, false)?;
                }
            }
        }
        Ok(())
    }

    fn draw_ghost(&mut self, snap: &Snapshot) -> Result<()> {
        let (Some(active), Some(ghost_row)) = (snap.active, snap.ghost_row) else {
            return Ok(());
        };
        if ghost_row == active.pos.y {
            return Ok(());
        }
        for p in active.ghost_cells(ghost_row) {
            self.put_cell(p, active.kind, true)?;
        }
        Ok(())
    }

    fn draw_active(&mut self, snap: &Snapshot) -> Result<()> {
        let Some(active) = snap.active else {
            return Ok(());
        };
        for p in active.cells {
            self.put_cell(p, active.kind, false)?;
        }
        Ok(())
    }

    /// Draw one board cell; off-board cells (a piece poking above the top
    /// edge) are skipped.
    fn put_cell(&mut self, p: Point, kind: PieceKind, dim: bool) -> Result<()> {
        if p.x < 0 || p.x >= BOARD_WIDTH as i8 || p.y < 0 || p.y >= BOARD_HEIGHT as i8 {
            return Ok(());
        }
        let shape = pieces::shape(kind);
        self.buf.queue(cursor::MoveTo(
            BOARD_X + p.x as u16 * 2,
            BOARD_Y + p.y as u16,
        ))?;
        self.buf.queue(SetForegroundColor(color_of(shape.color)))?;
        if dim {
            self.buf.queue(SetAttribute(Attribute::Dim))?;
        }
        self.buf
            .queue(Print(format!("{}{}", shape.open, shape.close)))?;
        if dim {
            self.buf.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    fn draw_panel(&mut self, snap: &Snapshot) -> Result<()> {
        self.buf.queue(SetForegroundColor(Color::Grey))?;
        self.panel_line(0, &format!("score  {:>8}", snap.score))?;
        self.panel_line(1, &format!("best   {:>8}", snap.high_score))?;
        self.panel_line(2, &format!("lines  {:>8}", snap.lines))?;
        self.panel_line(3, &format!("level  {:>8}", snap.level))?;

        self.panel_line(5, &format!("next   {}", glyphs(snap.next)))?;
        match snap.held {
            Some(kind) => self.panel_line(6, &format!("hold   {}", glyphs(kind)))?,
            None => self.panel_line(6, "hold   --")?,
        }

        for (i, kind) in PIECE_KINDS.iter().enumerate() {
            self.panel_line(
                8 + i as u16,
                &format!("{}  {:>6}", kind.as_str(), snap.spawn_counts[i]),
            )?;
        }
        Ok(())
    }

    fn draw_banner(&mut self, snap: &Snapshot) -> Result<()> {
        let banner = if snap.game_over {
            Some(" GAME OVER ")
        } else if snap.paused {
            Some("  PAUSED  ")
        } else {
            None
        };
        let Some(text) = banner else {
            return Ok(());
        };
        let x = BOARD_X + BOARD_WIDTH as u16 - text.len() as u16 / 2;
        self.buf
            .queue(cursor::MoveTo(x, BOARD_Y + BOARD_HEIGHT as u16 / 2))?;
        self.buf.queue(SetAttribute(Attribute::Bold))?;
        self.buf.queue(SetForegroundColor(Color::White))?;
        self.buf.queue(Print(text))?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn panel_line(&mut self, row: u16, text: &str) -> Result<()> {
        self.buf.queue(cursor::MoveTo(PANEL_X, BOARD_Y + row))?;
        self.buf.queue(Print(text))?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn glyphs(kind: PieceKind) -> String {
    let shape = pieces::shape(kind);
    format!("{}{}", shape.open, shape.close)
}

fn color_of(color: PieceColor) -> Color {
    match color {
        PieceColor::Red => Color::Red,
        PieceColor::Green => Color::Green,
        PieceColor::Yellow => Color::Yellow,
        PieceColor::Blue => Color::Blue,
        PieceColor::Magenta => Color::Magenta,
        PieceColor::Cyan => Color::Cyan,
        PieceColor::White => Color::White,
    }
}
