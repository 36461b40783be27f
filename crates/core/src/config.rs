//! Resolved gameplay configuration.
//!
//! The engine only consumes resolved values; reading and tokenizing a
//! config file is the front-end's job. Unknown keys and invalid values
//! leave the previous selection in place, so a broken config line can
//! never take a default away.

use log::warn;

use crate::rng::RandomizerKind;

/// Resolved configuration value set consumed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Piece-supply strategy.
    pub randomizer: RandomizerKind,
    /// Whether the ghost piece is computed and exposed to renderers.
    pub ghost: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            randomizer: RandomizerKind::Simple,
            ghost: true,
        }
    }
}

impl Profile {
    /// Apply one resolved `key`/`value` setting.
    ///
    /// Returns whether the setting was recognized and applied. Unknown
    /// randomizer names or ghost values are logged and ignored.
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "rand_engine" => match RandomizerKind::from_name(value) {
                Some(kind) => {
                    self.randomizer = kind;
                    true
                }
                None => {
                    warn!("unknown rand_engine {value:?}, keeping {}", self.randomizer.as_str());
                    false
                }
            },
            "ghost_piece" => match value {
                "on" => {
                    self.ghost = true;
                    true
                }
                "off" => {
                    self.ghost = false;
                    true
                }
                _ => {
                    warn!("invalid ghost_piece value {value:?}");
                    false
                }
            },
            _ => {
                warn!("unknown config key {key:?}");
                false
            }
        }
    }
}
