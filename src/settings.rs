//! File locations and config parsing.
//!
//! Everything lives under `~/.blockfall/`. The config file is a flat list
//! of `key = value` lines; `#` starts a comment. A missing or unreadable
//! file simply yields the defaults, and bad lines are skipped with a
//! warning, so the game always starts.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use blockfall_core::config::Profile;

const APP_DIR: &str = ".blockfall";

/// `~/.blockfall`, or `None` when `$HOME` is unset.
pub fn app_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(APP_DIR))
}

/// Config file path; `$BLOCKFALL_CONFIG` overrides the default.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("BLOCKFALL_CONFIG") {
        return Some(PathBuf::from(path));
    }
    app_dir().map(|dir| dir.join("config"))
}

pub fn score_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("highscore"))
}

pub fn log_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("blockfall.log"))
}

/// Load the gameplay profile from the default config location.
pub fn load_profile() -> Profile {
    match config_path() {
        Some(path) => profile_from_file(&path),
        None => Profile::default(),
    }
}

/// Parse a config file into a profile, starting from the defaults.
pub fn profile_from_file(path: &Path) -> Profile {
    let mut profile = Profile::default();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("could not read config {}: {err}", path.display());
            }
            return profile;
        }
    };
    apply_config_text(&mut profile, &text);
    profile
}

fn apply_config_text(profile: &mut Profile, text: &str) {
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!("config line {} is not `key = value`: {line:?}", lineno + 1);
            continue;
        };
        profile.apply(key.trim(), value.trim());
    }
}

/// Randomizer seed derived from the wall clock.
pub fn time_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}
