// GrepMark - app/session.rs
//
// Session persistence: the single "current state" slot holding the last
// word lists and setting name, used to restore state on the next run.
//
// Design principles:
// - The slot is overwritten wholesale on every put; there is no history
//   and no merging.
// - Session is saved atomically (write temp -> rename) so a crash during
//   save never corrupts the previous good session.
// - Load errors are logged and discarded: a corrupt or incompatible
//   session just starts fresh rather than surfacing errors to the user.
// - The snapshot is never visible in the profile list.

use crate::app::store::{read_json, write_json_atomic};
use crate::core::model::SessionSnapshot;
use crate::util::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
///
/// Increment this constant whenever the on-disk session shape changes in a
/// breaking way. Version mismatches silently discard the session.
pub const SESSION_VERSION: u32 = 1;

/// On-disk session document.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    /// Schema version; must equal `SESSION_VERSION` to be accepted.
    version: u32,

    #[serde(flatten)]
    snapshot: SessionSnapshot,
}

/// The durable single-slot session snapshot.
#[derive(Debug, Clone)]
pub struct SessionState {
    path: PathBuf,
}

impl SessionState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with `snapshot` (blank words removed).
    pub fn put(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        let file = SessionFile {
            version: SESSION_VERSION,
            snapshot: SessionSnapshot {
                setting_name: snapshot.setting_name.clone(),
                words: snapshot.words.clone().normalized(),
            },
        };
        write_json_atomic(&self.path, &file)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Current snapshot, or `None` when the slot is empty or unusable.
    pub fn get(&self) -> Option<SessionSnapshot> {
        let file: SessionFile = match read_json(&self.path) {
            Ok(Some(f)) => f,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session file is unusable; starting fresh"
                );
                return None;
            }
        };

        if file.version != SESSION_VERSION {
            tracing::warn!(
                found = file.version,
                expected = SESSION_VERSION,
                "Session file version mismatch; starting fresh"
            );
            return None;
        }

        tracing::debug!(path = %self.path.display(), "Session file loaded");
        Some(SessionSnapshot {
            setting_name: file.snapshot.setting_name,
            words: file.snapshot.words.normalized(),
        })
    }

    /// Empty the slot. Clearing an already empty slot is not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                operation: "remove",
                source,
            }),
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ColoredWord, WordLists};
    use tempfile::TempDir;

    fn sample() -> SessionSnapshot {
        SessionSnapshot {
            setting_name: "backups".to_string(),
            words: WordLists::new(
                vec!["Job".to_string()],
                vec!["Debug".to_string()],
                vec![ColoredWord::new("Failed", "firebrick")],
            ),
        }
    }

    #[test]
    fn test_put_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = SessionState::new(dir.path().join("session.json"));
        state.put(&sample()).unwrap();
        assert_eq!(state.get(), Some(sample()));
    }

    #[test]
    fn test_put_overwrites_without_merge() {
        let dir = TempDir::new().unwrap();
        let state = SessionState::new(dir.path().join("session.json"));
        state.put(&sample()).unwrap();
        let replacement = SessionSnapshot::default();
        state.put(&replacement).unwrap();
        assert_eq!(state.get(), Some(replacement));
    }

    /// Get must return None when the file does not exist (first run).
    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let state = SessionState::new(dir.path().join("none.json"));
        assert!(state.get().is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(SessionState::new(&path).get().is_none());
    }

    #[test]
    fn test_wrong_version_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, br#"{"version":99,"settingName":"","Grep":["a"]}"#).unwrap();
        assert!(SessionState::new(&path).get().is_none());
    }

    /// Older snapshots carry no exclude list.
    #[test]
    fn test_missing_exclude_list_defaults_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            br#"{"version":1,"settingName":"x","Grep":["a",""],"Highlight":[]}"#,
        )
        .unwrap();
        let snap = SessionState::new(&path).get().unwrap();
        assert_eq!(snap.setting_name, "x");
        assert_eq!(snap.words.include, vec!["a"]);
        assert!(snap.words.exclude.is_empty());
    }

    #[test]
    fn test_clear_empties_slot_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let state = SessionState::new(dir.path().join("session.json"));
        state.put(&sample()).unwrap();
        state.clear().unwrap();
        assert!(state.get().is_none());
        state.clear().unwrap();
    }
}
