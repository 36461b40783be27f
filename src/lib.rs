//! Blockfall: a terminal falling-block game.
//!
//! The engine lives in `blockfall-core`; this crate adds the crossterm
//! front-end, the config and high-score files, and the default binary.

pub use blockfall_core as core;
pub use blockfall_types as types;

pub mod input;
pub mod settings;
pub mod store;
pub mod view;
