// GrepMark - app/store.rs
//
// Two-tier profile persistence.
//
// Profiles are keyed by name in a primary tier (the configuration
// namespace) and a backup tier (the session-scoped namespace). The
// rules, per profile name:
// - save writes the primary tier; on success the backup entry is erased
//   (or overwritten with the same data if it cannot be erased), on
//   failure the data goes to the backup tier instead.
// - load consults the backup tier first: a backup entry only exists when
//   the most recent save could not reach the primary tier.
// - delete removes the name from both tiers independently.
// - list is the union of both tiers.
//
// Store files are whole-value JSON documents written atomically
// (write temp -> rename), so a crash mid-write never corrupts the
// previous good file.

use crate::core::model::{Profile, WordLists};
use crate::util::constants::MAX_STORE_FILE_SIZE;
use crate::util::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Tier label used in logs and errors.
pub const PRIMARY_TIER: &str = "primary";

/// Tier label used in logs and errors.
pub const BACKUP_TIER: &str = "backup";

// =============================================================================
// Tier abstraction
// =============================================================================

/// One durable name -> word-lists mapping.
///
/// Each call is an atomic whole-value operation; implementations need no
/// locking beyond that (single writer).
pub trait ProfileTier {
    /// Short label for logs ("primary" / "backup").
    fn label(&self) -> &'static str;

    /// Entry stored under `name`, if any.
    fn get(&self, name: &str) -> Result<Option<WordLists>, StoreError>;

    /// Insert or overwrite the entry under `name`.
    fn put(&mut self, name: &str, words: &WordLists) -> Result<(), StoreError>;

    /// Remove `name`. Returns whether it was present.
    fn remove(&mut self, name: &str) -> Result<bool, StoreError>;

    /// All stored names.
    fn names(&self) -> Result<Vec<String>, StoreError>;
}

/// Tier persisted as one JSON object file mapping names to word lists.
#[derive(Debug, Clone)]
pub struct JsonFileTier {
    label: &'static str,
    path: PathBuf,
}

impl JsonFileTier {
    pub fn new(label: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            label,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, WordLists>, StoreError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }
}

impl ProfileTier for JsonFileTier {
    fn label(&self) -> &'static str {
        self.label
    }

    fn get(&self, name: &str) -> Result<Option<WordLists>, StoreError> {
        Ok(self.read_map()?.remove(name))
    }

    fn put(&mut self, name: &str, words: &WordLists) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(name.to_string(), words.clone());
        write_json_atomic(&self.path, &map)
    }

    fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut map = self.read_map()?;
        if map.remove(name).is_none() {
            return Ok(false);
        }
        write_json_atomic(&self.path, &map)?;
        Ok(true)
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_map()?.into_keys().collect())
    }
}

/// In-process tier with switchable failure. Exercises the failover rules
/// without touching the filesystem.
///
/// Clones share the same entries and switches, so a caller can keep a
/// handle after boxing one clone into a `ProfileStore`.
#[derive(Debug, Default, Clone)]
pub struct MemoryTier {
    label: &'static str,
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, WordLists>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryTier {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inner: Rc::default(),
        }
    }

    /// When set, every write fails with `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// When set, every read fails with `StoreError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    /// Number of stored entries, ignoring the failure switches.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unavailable(&self, operation: &str) -> StoreError {
        StoreError::Unavailable {
            tier: self.label,
            reason: format!("{operation} disabled"),
        }
    }
}

impl ProfileTier for MemoryTier {
    fn label(&self) -> &'static str {
        self.label
    }

    fn get(&self, name: &str) -> Result<Option<WordLists>, StoreError> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(self.unavailable("read"));
        }
        Ok(inner.entries.get(name).cloned())
    }

    fn put(&mut self, name: &str, words: &WordLists) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(self.unavailable("write"));
        }
        inner.entries.insert(name.to_string(), words.clone());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(self.unavailable("write"));
        }
        Ok(inner.entries.remove(name).is_some())
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(self.unavailable("read"));
        }
        Ok(inner.entries.keys().cloned().collect())
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Which tier received a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the primary tier. Any backup entry for the name was
    /// cleared, or refreshed with the same data when it could not be removed.
    Primary,
    /// The primary tier failed; written to the backup tier instead.
    Backup,
}

/// Where a profile name currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Absent,
    /// Only in the primary tier: the reconciled state after a good save.
    PrimaryOnly,
    /// Only in the backup tier: the primary tier has never accepted it.
    BackupOnly,
    /// In both tiers; the backup entry shadows a stale primary entry.
    Both,
}

/// Per-tier result of a delete.
#[derive(Debug)]
pub enum TierRemoval {
    Removed,
    Absent,
    Failed(StoreError),
}

/// Result of deleting a name from both tiers.
#[derive(Debug)]
pub struct DeleteReport {
    pub primary: TierRemoval,
    pub backup: TierRemoval,
}

impl DeleteReport {
    /// True if either tier held the name and dropped it.
    pub fn removed_any(&self) -> bool {
        matches!(self.primary, TierRemoval::Removed) || matches!(self.backup, TierRemoval::Removed)
    }

    /// Per-tier failures, labelled.
    pub fn failures(&self) -> Vec<(&'static str, &StoreError)> {
        let mut out = Vec::new();
        if let TierRemoval::Failed(ref e) = self.primary {
            out.push((PRIMARY_TIER, e));
        }
        if let TierRemoval::Failed(ref e) = self.backup {
            out.push((BACKUP_TIER, e));
        }
        out
    }
}

// =============================================================================
// ProfileStore
// =============================================================================

/// Named profiles over a primary and a backup tier.
pub struct ProfileStore {
    primary: Box<dyn ProfileTier>,
    backup: Box<dyn ProfileTier>,
}

impl ProfileStore {
    pub fn new(primary: Box<dyn ProfileTier>, backup: Box<dyn ProfileTier>) -> Self {
        Self { primary, backup }
    }

    /// Store backed by two JSON files.
    pub fn open(primary_path: &Path, backup_path: &Path) -> Self {
        tracing::debug!(
            primary = %primary_path.display(),
            backup = %backup_path.display(),
            "Opening profile store"
        );
        Self::new(
            Box::new(JsonFileTier::new(PRIMARY_TIER, primary_path)),
            Box::new(JsonFileTier::new(BACKUP_TIER, backup_path)),
        )
    }

    /// Save `words` under `name`, degrading to the backup tier when the
    /// primary tier cannot be written.
    ///
    /// Fails when neither tier accepts the data, or when the primary write
    /// succeeds but an older backup entry can be neither removed nor
    /// overwritten (it would otherwise hide the new data on load).
    pub fn save(&mut self, name: &str, words: &WordLists) -> Result<SaveOutcome, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let words = words.clone().normalized();

        match self.primary.put(name, &words) {
            Ok(()) => {
                match self.backup.remove(name) {
                    Ok(true) => {
                        tracing::debug!(name = %name, "Cleared backup entry after primary save")
                    }
                    Ok(false) => {}
                    Err(remove_err) => {
                        // The backup entry wins on load, so it must hold
                        // the new data if it cannot be removed.
                        tracing::warn!(
                            name = %name,
                            error = %remove_err,
                            "Could not clear backup entry; refreshing it instead"
                        );
                        if let Err(put_err) = self.backup.put(name, &words) {
                            tracing::error!(
                                name = %name,
                                error = %put_err,
                                "Backup entry is stale and shadows the primary entry"
                            );
                            return Err(StoreError::StaleBackup {
                                name: name.to_string(),
                                source: Box::new(put_err),
                            });
                        }
                    }
                }
                tracing::info!(name = %name, "Profile saved");
                Ok(SaveOutcome::Primary)
            }
            Err(primary_err) => {
                tracing::warn!(
                    name = %name,
                    error = %primary_err,
                    "Primary store write failed; saving to backup"
                );
                match self.backup.put(name, &words) {
                    Ok(()) => {
                        tracing::info!(name = %name, "Profile saved to backup");
                        Ok(SaveOutcome::Backup)
                    }
                    Err(backup_err) => Err(StoreError::BothTiersFailed {
                        name: name.to_string(),
                        primary: Box::new(primary_err),
                        backup: Box::new(backup_err),
                    }),
                }
            }
        }
    }

    /// Load `name`, preferring the backup tier.
    ///
    /// An unreadable tier is logged and treated as not holding the name.
    pub fn load(&self, name: &str) -> Result<Profile, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        for tier in [self.backup.as_ref(), self.primary.as_ref()] {
            match tier.get(name) {
                Ok(Some(words)) => {
                    tracing::debug!(name = %name, tier = tier.label(), "Profile loaded");
                    return Ok(Profile::new(name, words.normalized()));
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    name = %name,
                    tier = tier.label(),
                    error = %e,
                    "Profile tier unreadable; skipping"
                ),
            }
        }
        Err(StoreError::NotFound {
            name: name.to_string(),
        })
    }

    /// Remove `name` from both tiers. A failure in one tier does not stop
    /// the attempt on the other.
    pub fn delete(&mut self, name: &str) -> Result<DeleteReport, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let report = DeleteReport {
            primary: remove_from(self.primary.as_mut(), name),
            backup: remove_from(self.backup.as_mut(), name),
        };
        tracing::info!(
            name = %name,
            removed = report.removed_any(),
            failures = report.failures().len(),
            "Profile delete finished"
        );
        Ok(report)
    }

    /// Sorted, deduplicated union of the names in both tiers.
    pub fn list(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for tier in [self.primary.as_ref(), self.backup.as_ref()] {
            match tier.names() {
                Ok(found) => names.extend(found),
                Err(e) => tracing::warn!(
                    tier = tier.label(),
                    error = %e,
                    "Cannot list profile tier"
                ),
            }
        }
        names.into_iter().collect()
    }

    /// Which tier(s) currently hold `name`. Unreadable tiers count as absent.
    pub fn placement(&self, name: &str) -> Placement {
        let holds = |tier: &dyn ProfileTier| matches!(tier.get(name), Ok(Some(_)));
        match (holds(self.primary.as_ref()), holds(self.backup.as_ref())) {
            (false, false) => Placement::Absent,
            (true, false) => Placement::PrimaryOnly,
            (false, true) => Placement::BackupOnly,
            (true, true) => Placement::Both,
        }
    }
}

fn remove_from(tier: &mut dyn ProfileTier, name: &str) -> TierRemoval {
    match tier.remove(name) {
        Ok(true) => TierRemoval::Removed,
        Ok(false) => TierRemoval::Absent,
        Err(e) => {
            tracing::warn!(name = %name, tier = tier.label(), error = %e, "Profile delete failed");
            TierRemoval::Failed(e)
        }
    }
}

// =============================================================================
// JSON file helpers (shared with the session slot)
// =============================================================================

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                operation: "stat",
                source,
            })
        }
    };
    if metadata.len() > MAX_STORE_FILE_SIZE {
        return Err(StoreError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_STORE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        operation: "read",
        source,
    })?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `value` to `path` atomically (write temp -> rename), creating
/// parent directories as needed.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    // A crash between write and rename loses the new value but never
    // corrupts the previous one.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        operation: "write",
        source,
    })?;

    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        StoreError::Io {
            path: path.to_path_buf(),
            operation: "rename",
            source,
        }
    })?;

    tracing::debug!(path = %path.display(), "Store file written");
    Ok(())
}

// =============================================================================
// Unit tests
// =============================================================================
