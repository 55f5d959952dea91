use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "BoxRate";
const APP_NAME: &str = "BoxRate";
const STATE_FILE: &str = "state.json";

/// Overrides the storage directory.
pub const DATA_DIR_ENV: &str = "BOXRATE_DATA_DIR";

/// Directory holding the form state and saved setups.
pub fn storage_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

fn state_file() -> Option<PathBuf> {
    storage_dir().map(|dir| dir.join(STATE_FILE))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    let path = state_file()?;
    load_state_from(&path)
}

fn load_state_from(path: &Path) -> Option<PersistedState> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => {
            debug!(target: "boxrate::storage", path = %path.display(), "restored form state");
            Some(state)
        }
        Err(err) => {
            warn!(target: "boxrate::storage", path = %path.display(), "ignoring unreadable form state: {err}");
            None
        }
    }
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = state_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_state_to(&path, state)
}

fn save_state_to(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
