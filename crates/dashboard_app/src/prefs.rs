use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dashboard_core::{SortKey, StatusFilter, ViewPrefs};
use dashboard_engine::{AtomicFileWriter, PersistError};
use dashboard_logging::{dash_debug, dash_info, dash_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PREFS_FILENAME: &str = ".recruit_dashboard_prefs.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct PersistedPrefs {
    search: String,
    status_filter: String,
    sort_key: String,
}

impl From<&ViewPrefs> for PersistedPrefs {
    fn from(prefs: &ViewPrefs) -> Self {
        Self {
            search: prefs.search.clone(),
            status_filter: prefs.status_filter.to_string(),
            sort_key: prefs.sort_key.as_str().to_string(),
        }
    }
}

impl PersistedPrefs {
    /// Unknown filter or sort names fall back to the defaults.
    fn into_prefs(self) -> ViewPrefs {
        ViewPrefs {
            search: self.search,
            status_filter: StatusFilter::parse(&self.status_filter).unwrap_or_default(),
            sort_key: SortKey::parse(&self.sort_key).unwrap_or_default(),
        }
    }
}

pub fn load_prefs(dir: &Path) -> Option<ViewPrefs> {
    let path = dir.join(PREFS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return None,
        Err(err) => {
            dash_warn!("Failed to read view preferences from {}: {err}", path.display());
            return None;
        }
    };

    match ron::from_str::<PersistedPrefs>(&content) {
        Ok(persisted) => {
            dash_info!("Loaded view preferences from {}", path.display());
            Some(persisted.into_prefs())
        }
        Err(err) => {
            dash_warn!("Failed to parse view preferences from {}: {err}", path.display());
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("could not serialize view preferences: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Write(#[from] PersistError),
}

pub fn save_prefs(dir: &Path, prefs: &ViewPrefs) -> Result<PathBuf, PrefsError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&PersistedPrefs::from(prefs), pretty)?;
    let path = AtomicFileWriter::new(dir.to_path_buf()).write(PREFS_FILENAME, content.as_bytes())?;
    dash_debug!("Saved view preferences to {}", path.display());
    Ok(path)
}

pub fn clear_prefs(dir: &Path) {
    let path = dir.join(PREFS_FILENAME);
    match fs::remove_file(&path) {
        Ok(()) => dash_info!("Cleared view preferences at {}", path.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => dash_warn!("Failed to remove {}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::CandidateStatus;
    use tempfile::TempDir;

    #[test]
    fn prefs_survive_a_save_and_load() {
        let temp = TempDir::new().unwrap();
        let prefs = ViewPrefs {
            search: "python".to_string(),
            status_filter: StatusFilter::Only(CandidateStatus::UnderReview),
            sort_key: SortKey::Score,
        };
        save_prefs(temp.path(), &prefs).unwrap();
        assert_eq!(load_prefs(temp.path()), Some(prefs));

        clear_prefs(temp.path());
        assert_eq!(load_prefs(temp.path()), None);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PREFS_FILENAME),
            "(search: \"go\", status_filter: \"archived\", sort_key: \"salary\")",
        )
        .unwrap();
        assert_eq!(
            load_prefs(temp.path()),
            Some(ViewPrefs {
                search: "go".to_string(),
                ..ViewPrefs::default()
            })
        );
    }

    #[test]
    fn unwritable_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let blocked = temp.path().join("not_a_dir");
        fs::write(&blocked, "file").unwrap();
        let err = save_prefs(&blocked, &ViewPrefs::default()).unwrap_err();
        assert!(matches!(err, PrefsError::Write(_)));
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PREFS_FILENAME), "not ron at all {").unwrap();
        assert_eq!(load_prefs(temp.path()), None);
    }
}
