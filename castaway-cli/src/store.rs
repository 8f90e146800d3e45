//! Single-slot JSON save file on disk.
use castaway_game::{Snapshot, SnapshotError, SnapshotStore};
use chrono::Local;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SAVE_FILE: &str = "savegame.json";
const SAVE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a valid save: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

/// Writes pretty JSON to `<dir>/savegame.json`, creating `dir` on first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(SAVE_FILE);
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn format_error(&self, source: SnapshotError) -> StoreError {
        StoreError::Format {
            path: self.path.clone(),
            source,
        }
    }
}

/// Wall-clock timestamp in the save file's format.
pub fn save_timestamp() -> String {
    Local::now().format(SAVE_DATE_FORMAT).to_string()
}

impl fmt::Display for JsonFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl SnapshotStore for JsonFileStore {
    type Error = StoreError;

    fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::Io {
            path: self.dir.clone(),
            source: err,
        })?;
        let json = snapshot.to_json().map_err(|err| self.format_error(err))?;
        fs::write(&self.path, json).map_err(|err| self.io_error(err))?;
        log::debug!("saved day {} to {}", snapshot.day, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, Self::Error> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        Snapshot::from_json(&json)
            .map(Some)
            .map_err(|err| self.format_error(err))
    }

    fn exists(&self) -> Result<bool, Self::Error> {
        Ok(self.path.is_file())
    }

    fn delete(&self) -> Result<bool, Self::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
