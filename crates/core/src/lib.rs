//! Falling-block game engine: board, piece catalog, randomizers, scoring,
//! and the tick-driven session state machine.
//!
//! The engine is deliberately front-end free. It never draws, never reads
//! input devices, and never touches a clock; a driver feeds it
//! [`Command`]s and elapsed milliseconds and renders from [`Snapshot`]s.

pub mod board;
pub mod config;
pub mod game;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod store;

pub use blockfall_types as types;

pub use board::Board;
pub use config::Profile;
pub use game::{GameSession, MoveOutcome, Phase};
pub use piece::ActivePiece;
pub use pieces::{shape, PieceShape};
pub use rng::{make_randomizer, Lcg, Randomizer, RandomizerKind};
pub use scoring::{fall_interval_ms, frames_per_cell, level_for_lines, line_score};
pub use snapshot::{ActiveSnapshot, Snapshot};
pub use store::{MemoryStore, ScoreStore};

pub use blockfall_types::{Command, DropKind, PieceKind, Point, RotateDir};
