//! JSON-file store: one `{key}.json` file per key in a data directory.
//!
//! Writes go to `{key}.json.tmp` first and are renamed into place, so a
//! crash mid-write leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::DbError;
use crate::store::{StateStore, validate_key};

/// A [`StateStore`] persisting each key as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the directory cannot be created or
    /// is not a directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            DbError::Config(format!("cannot create data dir {}: {e}", dir.display()))
        })?;
        if !dir.is_dir() {
            return Err(DbError::Config(format!(
                "data dir {} is not a directory",
                dir.display()
            )));
        }
        tracing::info!(dir = %dir.display(), "Opened JSON file store");
        Ok(Self { dir })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DbError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn io_error(key: &str, source: std::io::Error) -> DbError {
        DbError::Io {
            key: key.to_owned(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, DbError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<(), DbError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_error(key, e))?;
        tracing::trace!(key, bytes = json.len(), "Saved key");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), DbError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}
