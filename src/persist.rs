//! Persistence
//!
//! The save file is the unredacted wire encoding of the game. Writes go to a
//! sibling temporary file which is synced and then renamed over the save
//! path, so a reader sees either the old snapshot or the new one.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::game::Game;
use crate::wire::{DecodeError, Wire};

/// Persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Read, write, sync, or rename failed.
    #[error("{op} {path}: {source}")]
    Io {
        /// Operation that failed
        op: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File is JSON but not a valid game.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Location of a game's save file.
#[derive(Clone, Debug)]
pub struct SaveFile {
    path: PathBuf,
    temp: PathBuf,
}

impl SaveFile {
    /// Save file at `path`; the temporary file sits beside it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp = path.clone().into_os_string();
        temp.push(".tmp");
        Self { path, temp: temp.into() }
    }

    /// Canonical save path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the save file with `game`.
    pub fn save(&self, game: &Game) -> Result<(), PersistenceError> {
        let text = game.encode().to_string();
        self.write_temp(text.as_bytes())?;
        fs::rename(&self.temp, &self.path).map_err(|source| PersistenceError::Io {
            op: "rename",
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved game to {}", self.path.display());
        Ok(())
    }

    /// Read and validate the save file.
    pub fn load(&self) -> Result<Game, PersistenceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| PersistenceError::Io {
            op: "read",
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(Game::decode(&value)?)
    }

    fn write_temp(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let io = |source| PersistenceError::Io {
            op: "write",
            path: self.temp.clone(),
            source,
        };

        let mut file = File::create(&self.temp).map_err(io)?;
        file.write_all(bytes).map_err(io)?;
        file.sync_all().map_err(io)
    }
}
