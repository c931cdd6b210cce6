//! High-score persistence: a single decimal integer in a dotfile.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::interfaces::HighScoreStore;

const SCORE_FILE: &str = ".side_shooter_score";

/// `$HOME/.side_shooter_score`, or the working directory when `HOME` is unset.
pub fn default_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SCORE_FILE)
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u32> {
        let text = fs::read_to_string(&self.path)?;
        Ok(text.trim().parse()?)
    }

    fn write(&self, value: u32) -> Result<()> {
        fs::write(&self.path, value.to_string())?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(default_score_path())
    }
}

impl HighScoreStore for FileStore {
    fn get_high_score(&self) -> Option<u32> {
        match self.read() {
            Ok(value) => Some(value),
            Err(crate::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable high score");
                None
            }
        }
    }

    fn set_high_score(&mut self, value: u32) {
        if let Err(e) = self.write(value) {
            warn!(path = %self.path.display(), error = %e, "failed to save high score");
        }
    }
}
