//! Terminal blockfall runner (default binary).
//!
//! Reads `~/.blockfall/config`, wires the file-backed high-score store into
//! a game session, and drives it with a fixed-cadence tick loop over
//! crossterm events. Logs go to `~/.blockfall/blockfall.log` so the
//! alternate screen stays clean.

use std::fs::{self, File};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use blockfall::core::{GameSession, MemoryStore, ScoreStore};
use blockfall::input::map_key;
use blockfall::settings;
use blockfall::store::FileStore;
use blockfall::types::TICK_MS;
use blockfall::view::Screen;

fn main() -> Result<()> {
    init_logging();

    let profile = settings::load_profile();
    let store: Box<dyn ScoreStore> = match settings::score_path() {
        Some(path) => Box::new(FileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };

    let mut session = GameSession::new(&profile, settings::time_seed(), store);
    session.start();

    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut session, &mut screen);

    // Always try to restore terminal state.
    let _ = screen.exit();
    info!("session ended: score={}", session.score());
    result
}

fn run(session: &mut GameSession, screen: &mut Screen) -> Result<()> {
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut force_redraw = false;

    loop {
        if session.take_redraw() || force_redraw {
            force_redraw = false;
            screen.draw(&session.snapshot())?;
        }

        if session.should_quit() {
            return Ok(());
        }

        // Input with timeout until the next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(cmd) = map_key(key) {
                        session.apply(cmd);
                    }
                }
                Event::Resize(..) => force_redraw = true,
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            let elapsed = last_tick.elapsed().as_millis() as u32;
            last_tick = Instant::now();
            session.tick(elapsed);
        }
    }
}

/// Route logs to a file; the terminal is busy being a game screen.
fn init_logging() {
    let Some(path) = settings::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(file) = File::create(&path) {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    }
}
