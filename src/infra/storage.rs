//! File-backed saved-setup repository.
//!
//! The whole collection lives in one schema-versioned JSON document. It is read
//! once when the repository opens and rewritten after every mutation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    domain::setups::{SavedSetup, SetupCollection, SetupRepository},
    util::persistence::storage_dir,
};

pub const SETUPS_SCHEMA_VERSION: u32 = 1;
pub const SETUPS_FILENAME: &str = "saved_setups.v1.json";

#[derive(Debug, Serialize, Deserialize)]
struct SetupsDocument {
    version: u32,
    setups: SetupCollection,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage directory unavailable")]
    Unavailable,
    #[error("saved setups use schema v{found}, expected v{expected}", expected = SETUPS_SCHEMA_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Write-through JSON repository. Without a path it behaves as an in-memory
/// store whose mutations report [`StorageError::Unavailable`].
#[derive(Debug, Default)]
pub struct JsonSetupRepository {
    path: Option<PathBuf>,
    setups: SetupCollection,
}

impl JsonSetupRepository {
    /// Opens the repository in the default storage directory.
    pub fn open_default() -> Self {
        match storage_dir() {
            Some(dir) => Self::open(dir.join(SETUPS_FILENAME)),
            None => {
                warn!(target: "boxrate::storage", "no storage directory; saved setups will not persist");
                Self::default()
            }
        }
    }

    /// Opens `path`, starting empty when the file is missing or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let setups = match read_document(&path) {
            Ok(Some(setups)) => {
                info!(target: "boxrate::storage", count = setups.len(), path = %path.display(), "loaded saved setups");
                setups
            }
            Ok(None) => SetupCollection::default(),
            Err(err) => {
                warn!(target: "boxrate::storage", path = %path.display(), "starting with no saved setups: {err}");
                SetupCollection::default()
            }
        };
        Self {
            path: Some(path),
            setups,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::Unavailable)?;
        write_document(path, &self.setups)
    }

    /// Applies `mutate` and persists; on a failed write the in-memory change is
    /// rolled back so memory and disk stay in step.
    fn mutate<T>(&mut self, mutate: impl FnOnce(&mut SetupCollection) -> T) -> Result<T, StorageError> {
        let previous = self.setups.clone();
        let outcome = mutate(&mut self.setups);
        if self.setups == previous {
            return Ok(outcome);
        }
        if let Err(err) = self.flush() {
            self.setups = previous;
            return Err(err);
        }
        Ok(outcome)
    }
}

impl SetupRepository for JsonSetupRepository {
    type Error = StorageError;

    fn load_all(&self) -> &SetupCollection {
        &self.setups
    }

    fn append(&mut self, setup: SavedSetup) -> Result<(), StorageError> {
        self.mutate(|setups| setups.prepend(setup))
    }

    fn remove(&mut self, id: &str) -> Result<Option<SavedSetup>, StorageError> {
        self.mutate(|setups| setups.remove(id))
    }

    fn rename(&mut self, id: &str, name: &str) -> Result<bool, StorageError> {
        self.mutate(|setups| setups.rename(id, name))
    }
}

fn read_document(path: &Path) -> Result<Option<SetupCollection>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let document: SetupsDocument = serde_json::from_str(&raw)?;
    if document.version != SETUPS_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: document.version,
        });
    }
    Ok(Some(document.setups))
}

fn write_document(path: &Path, setups: &SetupCollection) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let document = SetupsDocument {
        version: SETUPS_SCHEMA_VERSION,
        setups: setups.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
