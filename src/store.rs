//! High-score file: a single integer under `~/.blockfall/`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use blockfall_core::store::ScoreStore;

/// Score store backed by a plain text file holding one number.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ScoreStore for FileStore {
    fn load(&mut self) -> Result<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        text.trim()
            .parse::<u32>()
            .with_context(|| format!("malformed high score in {}", self.path.display()))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{score}\n"))
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
