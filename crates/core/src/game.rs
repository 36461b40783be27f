//! Game session - the single state machine driving a whole game.
//!
//! Owns the board, the active/held pieces, the randomizer, scoring, and all
//! timing (gravity, the lock grace window, the line-break animation). One
//! external loop drives it: feed commands with [`GameSession::apply`],
//! advance time with [`GameSession::tick`], and read
//! [`GameSession::snapshot`] whenever the redraw latch fires.
//!
//! Everything is synchronous and single-threaded; there is no internal
//! locking and no operation blocks.

use arrayvec::ArrayVec;
use log::{debug, info, warn};

use blockfall_types::{
    Command, DropKind, PieceKind, Point, RotateDir, BOARD_WIDTH, LINE_BREAK_STEP_MS, LOCK_GRACE_MS,
};

use crate::board::Board;
use crate::config::Profile;
use crate::piece::ActivePiece;
use crate::rng::{make_randomizer, Randomizer};
use crate::scoring::{fall_interval_ms, level_for_lines, line_score};
use crate::snapshot::{ActiveSnapshot, Snapshot};
use crate::store::ScoreStore;

/// Session phase.
///
/// `LineBreak` is the clear animation between a lock that completed rows
/// and the spawn of the next piece. `GameOver` is terminal; the driver is
/// expected to stop feeding ticks and commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    LineBreak,
    GameOver,
}

/// Result of a move attempt.
///
/// A blocked descent is not a plain failure: within the lock grace window
/// it reports `Grace`, and past it (or for a hard drop) the piece locks and
/// the attempt reports `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved.
    Moved,
    /// Blocked descent inside the grace window; no movement, no lock.
    Grace,
    /// Blocked descent that locked the piece.
    Locked,
    /// Illegal move; nothing changed.
    Rejected,
}

impl MoveOutcome {
    /// Whether the attempt did anything (moved, waited out grace, or locked).
    pub fn accepted(self) -> bool {
        self != MoveOutcome::Rejected
    }
}

/// Complete state of one game.
pub struct GameSession {
    board: Board,
    active: Option<ActivePiece>,
    held: Option<PieceKind>,
    can_hold: bool,
    next: PieceKind,
    randomizer: Box<dyn Randomizer>,
    store: Box<dyn ScoreStore>,
    ghost_enabled: bool,
    ghost_row: Option<i8>,
    phase: Phase,
    started: bool,
    score: u32,
    high_score: u32,
    lines: u32,
    level: u32,
    /// Provisional soft/hard drop reward, committed to `score` at lock.
    drop_score: u32,
    spawn_counts: [u32; 7],
    /// Gravity interval for the current level, milliseconds per cell.
    fall_ms: u32,
    gravity_ms: u32,
    /// Lock grace timer; armed by the first blocked descent.
    grace_ms: Option<u32>,
    break_rows: ArrayVec<i8, 4>,
    break_step: i8,
    break_ms: u32,
    redraw: bool,
    quit: bool,
}

impl GameSession {
    /// Create a session from a resolved profile, a randomizer seed, and a
    /// score store. The high score is loaded here, once; a failing store
    /// logs a warning and the session proceeds from zero.
    pub fn new(profile: &Profile, seed: u32, store: Box<dyn ScoreStore>) -> Self {
        let mut store = store;
        let high_score = store.load().unwrap_or_else(|err| {
            warn!("high score unavailable, starting from 0: {err:#}");
            0
        });

        let mut randomizer = make_randomizer(profile.randomizer, seed);
        let next = randomizer.peek();

        info!(
            "new session: randomizer={} seed={} ghost={} high_score={}",
            profile.randomizer.as_str(),
            seed,
            profile.ghost,
            high_score
        );

        Self {
            board: Board::new(),
            active: None,
            held: None,
            can_hold: true,
            next,
            randomizer,
            store,
            ghost_enabled: profile.ghost,
            ghost_row: None,
            phase: Phase::Running,
            started: false,
            score: 0,
            high_score,
            lines: 0,
            level: 0,
            drop_score: 0,
            spawn_counts: [0; 7],
            fall_ms: fall_interval_ms(0),
            gravity_ms: 0,
            grace_ms: None,
            break_rows: ArrayVec::new(),
            break_step: 0,
            break_ms: 0,
            redraw: true,
            quit: false,
        }
    }

    /// Spawn the first piece. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    /// Upcoming piece, via the randomizer's peek slot.
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Row the active piece would land on, when the ghost is enabled.
    pub fn ghost_row(&self) -> Option<i8> {
        self.ghost_row
    }

    pub fn spawn_counts(&self) -> &[u32; 7] {
        &self.spawn_counts
    }

    /// Consume the redraw latch.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Apply one input command. Returns whether it had any effect.
    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::MoveLeft => self.try_move(-1, 0, DropKind::Auto).accepted(),
            Command::MoveRight => self.try_move(1, 0, DropKind::Auto).accepted(),
            Command::SoftDrop => self.try_move(0, 1, DropKind::Soft).accepted(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(RotateDir::Clockwise),
            Command::RotateCcw => self.rotate(RotateDir::CounterClockwise),
            Command::Hold => self.hold(),
            Command::Pause => self.toggle_pause(),
            Command::Quit => {
                self.quit = true;
                true
            }
        }
    }

    /// Advance time by `elapsed_ms` of wall clock.
    ///
    /// Paused and finished sessions do not advance, so paused time never
    /// counts toward gravity. Returns whether anything happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started {
            return false;
        }
        match self.phase {
            Phase::Paused | Phase::GameOver => false,
            Phase::LineBreak => {
                self.break_ms += elapsed_ms;
                let mut advanced = false;
                while self.break_ms >= LINE_BREAK_STEP_MS && self.phase == Phase::LineBreak {
                    self.break_ms -= LINE_BREAK_STEP_MS;
                    self.advance_line_break();
                    advanced = true;
                }
                advanced
            }
            Phase::Running => {
                if let Some(t) = self.grace_ms.as_mut() {
                    *t = t.saturating_add(elapsed_ms);
                }
                if self.active.is_none() {
                    return false;
                }
                self.gravity_ms += elapsed_ms;
                if self.gravity_ms >= self.fall_ms {
                    self.gravity_ms = 0;
                    return self.try_move(0, 1, DropKind::Auto).accepted();
                }
                false
            }
        }
    }

    /// Attempt to move the active piece by `(dx, dy)`.
    ///
    /// Upward moves are never permitted. A blocked descent is a lock
    /// attempt governed by the grace window (hard drops bypass it); any
    /// other blocked move is rejected with no side effect.
    pub fn try_move(&mut self, dx: i8, dy: i8, kind: DropKind) -> MoveOutcome {
        if self.phase != Phase::Running {
            return MoveOutcome::Rejected;
        }
        let Some(piece) = self.active else {
            return MoveOutcome::Rejected;
        };
        if dy < 0 {
            return MoveOutcome::Rejected;
        }

        let target = Point::new(piece.pos.x + dx, piece.pos.y + dy);
        let fits = piece
            .cells_at(target)
            .iter()
            .all(|p| self.board.is_free(p.x, p.y));

        if fits {
            let mut moved = piece;
            moved.pos = target;
            self.active = Some(moved);
            if dy == 1 {
                self.grace_ms = None;
                if kind != DropKind::Auto {
                    self.drop_score += 1;
                }
            }
            self.refresh_ghost();
            self.redraw = true;
            return MoveOutcome::Moved;
        }

        if dx == 0 && dy == 1 {
            // Blocked descent: lock attempt.
            if kind == DropKind::Hard {
                self.lock_active();
                return MoveOutcome::Locked;
            }
            match self.grace_ms {
                None => {
                    self.grace_ms = Some(0);
                    MoveOutcome::Grace
                }
                Some(t) if t < LOCK_GRACE_MS => MoveOutcome::Grace,
                Some(_) => {
                    self.lock_active();
                    MoveOutcome::Locked
                }
            }
        } else {
            MoveOutcome::Rejected
        }
    }

    /// Rotate the active piece; rejected atomically if any target cell is
    /// out of range or occupied. No wall kicks.
    pub fn rotate(&mut self, dir: RotateDir) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let Some(candidate) = piece.rotation_candidate(dir) else {
            return false;
        };

        let fits = candidate
            .blocks
            .iter()
            .all(|b| self.board.is_free(piece.pos.x + b.x, piece.pos.y + b.y));
        if !fits {
            return false;
        }

        let mut rotated = piece;
        rotated.commit_rotation(candidate);
        self.active = Some(rotated);
        self.refresh_ghost();
        self.redraw = true;
        true
    }

    /// Drop the piece until the blocked call locks it.
    pub fn hard_drop(&mut self) -> bool {
        loop {
            match self.try_move(0, 1, DropKind::Hard) {
                MoveOutcome::Moved => continue,
                MoveOutcome::Locked => return true,
                MoveOutcome::Grace | MoveOutcome::Rejected => return false,
            }
        }
    }

    /// Swap the active piece with the held one, at most once per spawn.
    pub fn hold(&mut self) -> bool {
        if self.phase != Phase::Running || !self.can_hold {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let stashed = piece.kind;

        match self.held {
            Some(held_kind) => {
                let swapped = ActivePiece::spawn(held_kind);
                let blocked = swapped
                    .cells()
                    .iter()
                    .any(|p| self.board.is_occupied(p.x, p.y));
                self.active = Some(swapped);
                self.held = Some(stashed);
                if blocked {
                    self.finish_game();
                    return false;
                }
                self.grace_ms = None;
                self.gravity_ms = 0;
                self.refresh_ghost();
                self.redraw = true;
            }
            None => {
                self.held = Some(stashed);
                if !self.spawn_next() {
                    return false;
                }
            }
        }

        self.can_hold = false;
        true
    }

    /// Read-only snapshot for renderers.
    pub fn snapshot(&self) -> Snapshot {
        let mut cells = [[None; BOARD_WIDTH as usize]; blockfall_types::BOARD_HEIGHT as usize];
        for (i, cell) in self.board.cells().iter().enumerate() {
            cells[i / BOARD_WIDTH as usize][i % BOARD_WIDTH as usize] = *cell;
        }

        Snapshot {
            cells,
            active: self.active.as_ref().map(|p| ActiveSnapshot {
                kind: p.kind,
                pos: p.pos,
                cells: p.cells(),
            }),
            ghost_row: self.ghost_row,
            held: self.held,
            next: self.next,
            score: self.score,
            high_score: self.high_score,
            lines: self.lines,
            level: self.level,
            spawn_counts: self.spawn_counts,
            can_hold: self.can_hold,
            paused: self.paused(),
            game_over: self.game_over(),
        }
    }

    /// Draw the next piece and place it at the spawn position.
    ///
    /// Returns false when the spawn cells are already occupied, which ends
    /// the game.
    fn spawn_next(&mut self) -> bool {
        let kind = self.randomizer.next();
        self.next = self.randomizer.peek();

        let piece = ActivePiece::spawn(kind);
        let blocked = piece
            .cells()
            .iter()
            .any(|p| self.board.is_occupied(p.x, p.y));
        self.active = Some(piece);
        self.redraw = true;

        if blocked {
            self.finish_game();
            return false;
        }

        debug!("spawned {}", kind.as_str());
        self.spawn_counts[kind.index()] += 1;
        self.can_hold = true;
        self.grace_ms = None;
        self.gravity_ms = 0;
        self.refresh_ghost();
        true
    }

    /// Write the active piece into the board and either start the clear
    /// animation or spawn the next piece.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.board.lock(&piece.cells(), piece.kind);
        self.score += self.drop_score;
        self.drop_score = 0;
        self.grace_ms = None;
        self.ghost_row = None;
        self.redraw = true;

        let rows = self.board.full_rows();
        if rows.is_empty() {
            debug!("locked {}", piece.kind.as_str());
            self.fall_ms = fall_interval_ms(self.level);
            self.spawn_next();
        } else {
            info!("locked {}: {} full row(s)", piece.kind.as_str(), rows.len());
            self.break_rows = rows;
            self.break_step = 0;
            self.break_ms = 0;
            self.phase = Phase::LineBreak;
        }
    }

    /// One animation step: clear two more cells per captured row, symmetric
    /// about the horizontal center; compaction happens on the last step.
    fn advance_line_break(&mut self) {
        let half = (BOARD_WIDTH / 2) as i8;
        for &y in &self.break_rows {
            self.board.set(half - 1 - self.break_step, y, None);
            self.board.set(half + self.break_step, y, None);
        }
        self.break_step += 1;
        self.redraw = true;

        if self.break_step >= half {
            self.finish_line_break();
        }
    }

    /// Compact the cleared rows, award score, advance the level, and spawn.
    fn finish_line_break(&mut self) {
        let cleared = self.break_rows.len();
        let rows = std::mem::take(&mut self.break_rows);
        self.board.compact(&rows);

        // Score with the level in effect before these lines are counted.
        let points = line_score(cleared, self.level);
        self.score += points;
        self.lines += cleared as u32;
        let new_level = level_for_lines(self.lines);
        if new_level != self.level {
            info!("level up: {} -> {}", self.level, new_level);
        }
        self.level = new_level;
        self.fall_ms = fall_interval_ms(self.level);
        info!("cleared {cleared} row(s) for {points} points");

        self.phase = Phase::Running;
        self.spawn_next();
    }

    /// Terminal transition: persist an improved high score and halt.
    fn finish_game(&mut self) {
        self.phase = Phase::GameOver;
        self.redraw = true;
        info!(
            "game over: score={} lines={} level={}",
            self.score, self.lines, self.level
        );
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(err) = self.store.save(self.score) {
                warn!("failed to save high score: {err:#}");
            }
        }
    }

    fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                self.redraw = true;
                true
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                self.redraw = true;
                true
            }
            _ => false,
        }
    }

    /// Recompute where the active piece would land.
    fn refresh_ghost(&mut self) {
        if !self.ghost_enabled {
            self.ghost_row = None;
            return;
        }
        self.ghost_row = self.active.map(|piece| {
            let mut y = piece.pos.y;
            loop {
                let below = Point::new(piece.pos.x, y + 1);
                let fits = piece
                    .cells_at(below)
                    .iter()
                    .all(|p| self.board.is_free(p.x, p.y));
                if fits {
                    y += 1;
                } else {
                    break;
                }
            }
            y
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomizerKind;
    use crate::store::MemoryStore;
    use blockfall_types::{BOARD_HEIGHT, SPAWN_X};

    fn session() -> GameSession {
        let profile = Profile::default();
        let mut s = GameSession::new(&profile, 12345, Box::new(MemoryStore::default()));
        s.start();
        s
    }

    fn bag_session(seed: u32) -> GameSession {
        let profile = Profile {
            randomizer: RandomizerKind::Bag,
            ghost: true,
        };
        let mut s = GameSession::new(&profile, seed, Box::new(MemoryStore::default()));
        s.start();
        s
    }

    fn force_active(s: &mut GameSession, kind: PieceKind) {
        s.active = Some(ActivePiece::spawn(kind));
        s.grace_ms = None;
        s.drop_score = 0;
        s.refresh_ghost();
    }

    fn fill_row_except(s: &mut GameSession, y: i8, gap_x: i8) {
        for x in 0..BOARD_WIDTH as i8 {
            if x != gap_x {
                s.board.set(x, y, Some(PieceKind::J));
            }
        }
    }

    #[test]
    fn new_session_is_fresh() {
        let profile = Profile::default();
        let s = GameSession::new(&profile, 1, Box::new(MemoryStore::default()));
        assert!(!s.started());
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.score(), 0);
        assert_eq!(s.lines(), 0);
        assert_eq!(s.level(), 0);
        assert!(s.active().is_none());
        assert!(s.held().is_none());
    }

    #[test]
    fn start_spawns_and_counts() {
        let mut s = session();
        let active = s.active().expect("piece after start");
        assert_eq!(active.pos.x, SPAWN_X);
        assert_eq!(active.pos.y, 0);
        assert_eq!(s.spawn_counts().iter().sum::<u32>(), 1);
        assert_eq!(s.spawn_counts()[active.kind.index()], 1);
    }

    #[test]
    fn horizontal_moves_stop_at_walls() {
        let mut s = session();
        let mut lefts = 0;
        while s.try_move(-1, 0, DropKind::Auto) == MoveOutcome::Moved {
            lefts += 1;
        }
        assert!(lefts <= SPAWN_X as u32 + 1);
        // The failing attempt changed nothing.
        assert_eq!(s.try_move(-1, 0, DropKind::Auto), MoveOutcome::Rejected);
    }

    #[test]
    fn upward_moves_are_never_permitted() {
        let mut s = session();
        assert_eq!(s.try_move(0, -1, DropKind::Auto), MoveOutcome::Rejected);
    }

    #[test]
    fn nineteen_drops_then_lock_on_the_twentieth() {
        let mut s = session();
        // Flat I piece: one row tall, so it has exactly 19 free descents on
        // an empty 20-row board.
        force_active(&mut s, PieceKind::I);

        for i in 0..19 {
            assert_eq!(
                s.try_move(0, 1, DropKind::Auto),
                MoveOutcome::Moved,
                "descent {i} should succeed"
            );
        }

        // The 20th attempt is a lock attempt, not a silent failure: it arms
        // the grace window first, then locks once the window has elapsed.
        assert_eq!(s.try_move(0, 1, DropKind::Auto), MoveOutcome::Grace);
        s.tick(LOCK_GRACE_MS + 1);
        assert_eq!(s.try_move(0, 1, DropKind::Auto), MoveOutcome::Locked);

        // All four cells landed on the bottom row.
        let bottom = (BOARD_HEIGHT - 1) as i8;
        let occupied = (0..BOARD_WIDTH as i8)
            .filter(|&x| s.board.is_occupied(x, bottom))
            .count();
        assert_eq!(occupied, 4);
    }

    #[test]
    fn grace_window_allows_sliding() {
        let mut s = session();
        force_active(&mut s, PieceKind::I);
        while s.try_move(0, 1, DropKind::Auto) == MoveOutcome::Moved {}

        // Inside the window the piece can still slide.
        assert_eq!(s.try_move(0, 1, DropKind::Soft), MoveOutcome::Grace);
        assert_eq!(s.try_move(1, 0, DropKind::Auto), MoveOutcome::Moved);
        assert!(s.active().is_some());
    }

    #[test]
    fn hard_drop_bypasses_grace() {
        let mut s = session();
        force_active(&mut s, PieceKind::I);
        assert!(s.hard_drop());
        // Piece locked and the next one spawned; no grace was granted.
        let active = s.active().expect("next piece spawned");
        assert_eq!(active.pos.y, 0);
        let bottom = (BOARD_HEIGHT - 1) as i8;
        assert!((0..BOARD_WIDTH as i8).any(|x| s.board.is_occupied(x, bottom)));
    }

    #[test]
    fn drop_score_committed_at_lock() {
        let mut s = session();
        force_active(&mut s, PieceKind::I);
        assert_eq!(s.try_move(0, 1, DropKind::Soft), MoveOutcome::Moved);
        assert_eq!(s.try_move(0, 1, DropKind::Soft), MoveOutcome::Moved);
        assert_eq!(s.score(), 0, "drop score is provisional until lock");
        s.hard_drop();
        // 2 soft cells + 17 hard cells on an empty board.
        assert_eq!(s.score(), 19);
        assert_eq!(s.drop_score, 0);
    }

    #[test]
    fn auto_drop_earns_no_score() {
        let mut s = session();
        force_active(&mut s, PieceKind::I);
        for _ in 0..19 {
            s.try_move(0, 1, DropKind::Auto);
        }
        s.try_move(0, 1, DropKind::Auto);
        s.tick(LOCK_GRACE_MS + 1);
        s.try_move(0, 1, DropKind::Auto);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn rotation_rejected_for_o_piece() {
        let mut s = session();
        force_active(&mut s, PieceKind::O);
        let before = s.active().unwrap().cells();
        assert!(!s.rotate(RotateDir::Clockwise));
        assert!(!s.rotate(RotateDir::CounterClockwise));
        assert_eq!(s.active().unwrap().cells(), before);
    }

    #[test]
    fn rotation_rejected_atomically_when_blocked() {
        let mut s = session();
        force_active(&mut s, PieceKind::T);
        // Drop to mid-board, then wall in the rotation target cells.
        for _ in 0..5 {
            s.try_move(0, 1, DropKind::Auto);
        }
        let piece = *s.active().unwrap();
        let candidate = piece
            .rotation_candidate(RotateDir::Clockwise)
            .expect("T rotates");
        for b in &candidate.blocks {
            s.board.set(piece.pos.x + b.x, piece.pos.y + b.y, Some(PieceKind::J));
        }

        let before = s.active().unwrap().cells();
        assert!(!s.rotate(RotateDir::Clockwise));
        assert_eq!(s.active().unwrap().cells(), before, "no partial rotation");
    }

    #[test]
    fn four_rotations_restore_orientation() {
        let mut s = session();
        force_active(&mut s, PieceKind::J);
        for _ in 0..8 {
            // Get clear of the top edge so all orientations fit.
            s.try_move(0, 1, DropKind::Auto);
        }
        let before = *s.active().unwrap().blocks();
        for _ in 0..4 {
            assert!(s.rotate(RotateDir::Clockwise));
        }
        assert_eq!(*s.active().unwrap().blocks(), before);
    }

    #[test]
    fn single_line_clear_scores_forty() {
        let mut s = session();
        // A clockwise I piece stands in column SPAWN_X + 1.
        fill_row_except(&mut s, (BOARD_HEIGHT - 1) as i8, SPAWN_X + 1);

        // Vertical I piece dropped into the gap.
        force_active(&mut s, PieceKind::I);
        assert!(s.rotate(RotateDir::Clockwise));
        s.hard_drop();

        assert_eq!(s.phase(), Phase::LineBreak);
        let drop_reward = s.score();

        // Run the animation to completion: width/2 steps.
        for _ in 0..(BOARD_WIDTH / 2) {
            s.tick(LINE_BREAK_STEP_MS);
        }

        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.score(), drop_reward + 40);
        assert_eq!(s.lines(), 1);
        // Bottom row compacted away except the I remnants above it.
        assert!(!s.board.is_row_full((BOARD_HEIGHT - 1) as i8));
    }

    #[test]
    fn line_scores_scale_with_level() {
        let mut s = session();
        s.lines = 40;
        s.level = 4;
        for y in (BOARD_HEIGHT as i8 - 2)..BOARD_HEIGHT as i8 {
            fill_row_except(&mut s, y, SPAWN_X + 1);
        }

        // Vertical I fills the two-row gap and the two rows below stay open.
        force_active(&mut s, PieceKind::I);
        assert!(s.rotate(RotateDir::Clockwise));
        s.hard_drop();
        assert_eq!(s.phase(), Phase::LineBreak);
        let before = s.score();
        while s.phase() == Phase::LineBreak {
            s.tick(LINE_BREAK_STEP_MS);
        }
        // Double at level 4: 100 * 5.
        assert_eq!(s.score() - before, 100 * 5);
        assert_eq!(s.lines(), 42);
    }

    #[test]
    fn line_break_clears_from_center_outward() {
        let mut s = session();
        let bottom = (BOARD_HEIGHT - 1) as i8;
        fill_row_except(&mut s, bottom, SPAWN_X + 1);
        force_active(&mut s, PieceKind::I);
        assert!(s.rotate(RotateDir::Clockwise));
        s.hard_drop();
        assert_eq!(s.phase(), Phase::LineBreak);

        s.tick(LINE_BREAK_STEP_MS);
        let half = (BOARD_WIDTH / 2) as i8;
        assert!(!s.board.is_occupied(half - 1, bottom));
        assert!(!s.board.is_occupied(half, bottom));
        assert!(s.board.is_occupied(0, bottom));
        assert!(s.board.is_occupied(BOARD_WIDTH as i8 - 1, bottom));
    }

    #[test]
    fn hold_with_empty_slot_spawns_fresh() {
        let mut s = session();
        let first = s.active().unwrap().kind;
        let upcoming = s.next_kind();

        assert!(s.apply(Command::Hold));
        assert_eq!(s.held(), Some(first));
        assert_eq!(s.active().unwrap().kind, upcoming);
        assert!(!s.can_hold());

        // Second hold before the next spawn is a no-op.
        assert!(!s.apply(Command::Hold));
    }

    #[test]
    fn hold_swaps_and_resets_position() {
        let mut s = session();
        s.apply(Command::Hold);
        let stashed = s.held().unwrap();

        // Lock the current piece to re-enable holding.
        s.hard_drop();
        assert!(s.can_hold());
        let current = s.active().unwrap().kind;

        assert!(s.apply(Command::Hold));
        assert_eq!(s.active().unwrap().kind, stashed);
        assert_eq!(s.held(), Some(current));
        assert_eq!(s.active().unwrap().pos, Point::new(SPAWN_X, 0));
    }

    #[test]
    fn spawn_collision_ends_the_game() {
        let mut s = session();
        // Wall off the spawn rows.
        for x in 0..BOARD_WIDTH as i8 {
            s.board.set(x, 0, Some(PieceKind::J));
            s.board.set(x, 1, Some(PieceKind::J));
        }
        force_active(&mut s, PieceKind::I);
        // Sink the piece far below the blockage and lock it.
        s.active.as_mut().unwrap().pos.y = (BOARD_HEIGHT - 1) as i8;
        s.lock_active();

        assert_eq!(s.phase(), Phase::GameOver);
        assert!(s.game_over());
        // Finished sessions ignore gameplay.
        assert!(!s.apply(Command::MoveLeft));
        assert!(!s.tick(1000));
    }

    #[test]
    fn game_over_persists_improved_high_score() {
        let profile = Profile::default();
        let mut s = GameSession::new(&profile, 7, Box::new(MemoryStore::new(10)));
        s.start();
        assert_eq!(s.high_score(), 10);
        s.score = 500;
        s.finish_game();
        assert_eq!(s.high_score(), 500);
    }

    #[test]
    fn game_over_keeps_better_stored_score() {
        let profile = Profile::default();
        let mut s = GameSession::new(&profile, 7, Box::new(MemoryStore::new(9999)));
        s.start();
        s.score = 500;
        s.finish_game();
        assert_eq!(s.high_score(), 9999);
    }

    #[test]
    fn pause_freezes_gravity() {
        let mut s = session();
        let y = s.active().unwrap().pos.y;
        assert!(s.apply(Command::Pause));
        assert!(s.paused());
        for _ in 0..200 {
            s.tick(16);
        }
        assert_eq!(s.active().unwrap().pos.y, y);
        // Gameplay commands are ignored while paused.
        assert!(!s.apply(Command::MoveLeft));

        assert!(s.apply(Command::Pause));
        assert!(!s.paused());
    }

    #[test]
    fn gravity_moves_piece_down() {
        let mut s = session();
        let y = s.active().unwrap().pos.y;
        let interval = s.fall_ms;
        s.tick(interval);
        assert_eq!(s.active().unwrap().pos.y, y + 1);
    }

    #[test]
    fn ghost_row_tracks_landing() {
        let mut s = session();
        force_active(&mut s, PieceKind::I);
        assert_eq!(s.ghost_row(), Some((BOARD_HEIGHT - 1) as i8));

        // An obstruction raises the ghost.
        for x in 0..BOARD_WIDTH as i8 {
            s.board.set(x, (BOARD_HEIGHT - 1) as i8, Some(PieceKind::J));
        }
        s.refresh_ghost();
        assert_eq!(s.ghost_row(), Some((BOARD_HEIGHT - 2) as i8));
    }

    #[test]
    fn ghost_disabled_by_profile() {
        let profile = Profile {
            randomizer: RandomizerKind::Simple,
            ghost: false,
        };
        let mut s = GameSession::new(&profile, 3, Box::new(MemoryStore::default()));
        s.start();
        assert_eq!(s.ghost_row(), None);
    }

    #[test]
    fn bag_sessions_never_repeat_within_a_bag() {
        let mut s = bag_session(31337);
        let mut seen = Vec::new();
        // First 7 spawns drain exactly one bag. Count the active piece plus
        // six hard drops.
        seen.push(s.active().unwrap().kind);
        for _ in 0..6 {
            s.hard_drop();
            if s.game_over() {
                return;
            }
            seen.push(s.active().unwrap().kind);
        }
        seen.sort_by_key(|k| k.index());
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn quit_flag_latches() {
        let mut s = session();
        assert!(!s.should_quit());
        assert!(s.apply(Command::Quit));
        assert!(s.should_quit());
    }

    #[test]
    fn redraw_latch_consumes() {
        let mut s = session();
        assert!(s.take_redraw());
        assert!(!s.take_redraw());
        s.apply(Command::MoveRight);
        assert!(s.take_redraw());
    }
}
