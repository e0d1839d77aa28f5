// GrepMark - app/orchestrator.rs
//
// Stateless coordination of the core and persistence layers.
// Every function receives all the inputs it needs (lines, word lists,
// the store, the session slot) and returns everything the caller needs
// to show: a result, a user notice, and the refreshed profile name list.
// Nothing is retained between calls.

use crate::app::session::SessionState;
use crate::app::store::{ProfileStore, SaveOutcome};
use crate::core::export::{export_string, import_json};
use crate::core::filter::{filter_lines, WordFilter};
use crate::core::highlight;
use crate::core::model::{Profile, RenderedResult, SessionSnapshot, WordLists};
use crate::util::error::{GrepMarkError, ImportError, StoreError};
use std::fmt;

// =============================================================================
// Notices
// =============================================================================

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reply to a profile operation.
#[derive(Debug, Clone)]
pub struct Reply {
    pub notice: Notice,
    /// Profile names after the operation, for the selection list.
    pub names: Vec<String>,
    /// The loaded or imported profile, when the operation produced one.
    pub profile: Option<Profile>,
}

// =============================================================================
// Run
// =============================================================================

/// Outcome of a filter-and-highlight run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Rendered(RenderedResult),
    /// Filtering left no lines. Informational, not an error.
    NoMatches,
}

impl RunOutcome {
    /// Notice shown for an empty result.
    pub fn no_matches_notice() -> Notice {
        Notice::info("No matches found")
    }
}

/// Filter `lines` by the include/exclude lists, then highlight the
/// survivors.
pub fn run<S: AsRef<str>>(lines: &[S], words: &WordLists) -> RunOutcome {
    let filter = WordFilter::from_lists(words);
    let survivors = filter_lines(lines, &filter);

    tracing::info!(
        input = lines.len(),
        matched = survivors.len(),
        include = filter.include.len(),
        exclude = filter.exclude.len(),
        "Filter complete"
    );

    if survivors.is_empty() {
        return RunOutcome::NoMatches;
    }
    RunOutcome::Rendered(highlight::render(&survivors, &words.highlights))
}

// =============================================================================
// Profiles
// =============================================================================

/// Save `words` as profile `name`, reporting which tier received it.
pub fn save_profile(store: &mut ProfileStore, name: &str, words: &WordLists) -> Reply {
    let notice = match store.save(name, words) {
        Ok(SaveOutcome::Primary) => Notice::info(format!("Settings '{name}' saved")),
        Ok(SaveOutcome::Backup) => Notice::warning(format!("Settings '{name}' saved to Backup")),
        Err(e) => {
            tracing::error!(name = %name, error = %e, "Profile save failed");
            Notice::error(e.to_string())
        }
    };
    Reply {
        notice,
        names: store.list(),
        profile: None,
    }
}

/// Load profile `name` and make it the current session state.
pub fn load_profile(store: &ProfileStore, session: &SessionState, name: &str) -> Reply {
    let (notice, profile) = match store.load(name) {
        Ok(profile) => {
            record_session(session, &profile.name, &profile.words);
            (Notice::info(format!("Settings '{name}' loaded")), Some(profile))
        }
        Err(e @ StoreError::NotFound { .. }) | Err(e @ StoreError::EmptyName) => {
            (Notice::error(e.to_string()), None)
        }
        Err(e) => {
            tracing::error!(name = %name, error = %e, "Profile load failed");
            (Notice::error(e.to_string()), None)
        }
    };
    Reply {
        notice,
        names: store.list(),
        profile,
    }
}

/// Delete profile `name` from both tiers.
pub fn delete_profile(store: &mut ProfileStore, name: &str) -> Reply {
    let notice = match store.delete(name) {
        Err(e) => Notice::error(e.to_string()),
        Ok(report) => {
            let failures = report.failures();
            if !failures.is_empty() {
                let detail = failures
                    .iter()
                    .map(|(tier, e)| format!("{tier}: {e}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                Notice::warning(format!("Settings '{name}' not fully deleted ({detail})"))
            } else if report.removed_any() {
                Notice::info(format!("Settings '{name}' deleted"))
            } else {
                Notice::error(
                    StoreError::NotFound {
                        name: name.to_string(),
                    }
                    .to_string(),
                )
            }
        }
    };
    Reply {
        notice,
        names: store.list(),
        profile: None,
    }
}

/// All profile names across both tiers.
pub fn list_profiles(store: &ProfileStore) -> Vec<String> {
    store.list()
}

// =============================================================================
// Session, import, export
// =============================================================================

/// Overwrite the session slot. Failure is logged, never surfaced: the
/// snapshot only restores convenience state.
pub fn record_session(session: &SessionState, setting_name: &str, words: &WordLists) {
    let snapshot = SessionSnapshot {
        setting_name: setting_name.to_string(),
        words: words.clone(),
    };
    if let Err(e) = session.put(&snapshot) {
        tracing::warn!(error = %e, "Could not save session snapshot");
    }
}

/// Current session snapshot, if one is stored.
pub fn restore_session(session: &SessionState) -> Option<SessionSnapshot> {
    session.get()
}

/// Import canonical JSON as the current session state, optionally also
/// saving it as profile `save_as`.
pub fn import_profile(
    store: &mut ProfileStore,
    session: &SessionState,
    json: &str,
    save_as: Option<&str>,
) -> Result<Reply, ImportError> {
    let words = import_json(json)?;
    let name = save_as.unwrap_or_default();
    record_session(session, name, &words);

    let reply = match save_as {
        Some(name) => {
            let mut reply = save_profile(store, name, &words);
            reply.profile = Some(Profile::new(name, words));
            reply
        }
        None => Reply {
            notice: Notice::info("Settings imported"),
            names: store.list(),
            profile: Some(Profile::new("", words)),
        },
    };
    Ok(reply)
}

/// Canonical JSON for profile `name`, or for the session snapshot when
/// `name` is `None` (an empty slot exports empty lists).
pub fn export_profile(
    store: &ProfileStore,
    session: &SessionState,
    name: Option<&str>,
) -> Result<String, GrepMarkError> {
    let words = match name {
        Some(name) => store.load(name)?.words,
        None => session.get().map(|s| s.words).unwrap_or_default(),
    };
    export_string(&words).map_err(|source| GrepMarkError::Export { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::{MemoryTier, BACKUP_TIER, PRIMARY_TIER};
    use crate::core::model::ColoredWord;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: ProfileStore,
        primary: MemoryTier,
        session: SessionState,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let primary = MemoryTier::new(PRIMARY_TIER);
        let backup = MemoryTier::new(BACKUP_TIER);
        let session = SessionState::new(dir.path().join("session.json"));
        Fixture {
            store: ProfileStore::new(Box::new(primary.clone()), Box::new(backup)),
            primary,
            session,
            _dir: dir,
        }
    }

    fn words() -> WordLists {
        WordLists::new(
            vec!["alpha".to_string()],
            vec!["beta".to_string()],
            vec![ColoredWord::new("alpha", "red")],
        )
    }

    #[test]
    fn test_run_filters_then_highlights() {
        let lines = ["alpha", "beta", "alpha beta"];
        match run(&lines, &words()) {
            RunOutcome::Rendered(result) => {
                assert_eq!(
                    result.lines,
                    vec!["<span class=\"highlight highlight-0\">alpha</span>"]
                );
            }
            RunOutcome::NoMatches => panic!("expected a rendered result"),
        }
    }

    #[test]
    fn test_run_without_matches_signals_no_matches() {
        let lines = ["gamma"];
        assert_eq!(run(&lines, &words()), RunOutcome::NoMatches);
        assert_eq!(RunOutcome::no_matches_notice().level, NoticeLevel::Info);
    }

    #[test]
    fn test_run_with_empty_lists_is_identity_escaped() {
        let lines = ["a<b", "c"];
        match run(&lines, &WordLists::default()) {
            RunOutcome::Rendered(result) => assert_eq!(result.lines, vec!["a&lt;b", "c"]),
            RunOutcome::NoMatches => panic!("expected a rendered result"),
        }
    }

    #[test]
    fn test_save_reports_tier_and_names() {
        let mut f = fixture();
        let reply = save_profile(&mut f.store, "p", &words());
        assert_eq!(reply.notice, Notice::info("Settings 'p' saved"));
        assert_eq!(reply.names, vec!["p"]);

        f.primary.set_fail_writes(true);
        let reply = save_profile(&mut f.store, "q", &words());
        assert_eq!(reply.notice, Notice::warning("Settings 'q' saved to Backup"));
        assert_eq!(reply.names, vec!["p", "q"]);
    }

    #[test]
    fn test_load_updates_session() {
        let mut f = fixture();
        save_profile(&mut f.store, "p", &words());
        let reply = load_profile(&f.store, &f.session, "p");
        assert_eq!(reply.profile.unwrap().words, words());
        let snap = restore_session(&f.session).unwrap();
        assert_eq!(snap.setting_name, "p");
        assert_eq!(snap.words, words());
    }

    #[test]
    fn test_load_missing_reports_not_found() {
        let f = fixture();
        let reply = load_profile(&f.store, &f.session, "ghost");
        assert!(reply.profile.is_none());
        assert_eq!(reply.notice, Notice::error("No settings found for 'ghost'"));
        assert!(restore_session(&f.session).is_none());
    }

    #[test]
    fn test_delete_notices() {
        let mut f = fixture();
        save_profile(&mut f.store, "p", &words());
        assert_eq!(
            delete_profile(&mut f.store, "p").notice,
            Notice::info("Settings 'p' deleted")
        );
        assert_eq!(
            delete_profile(&mut f.store, "p").notice.level,
            NoticeLevel::Error
        );
        assert_eq!(
            delete_profile(&mut f.store, "").notice,
            Notice::error("No setting selected")
        );
    }

    #[test]
    fn test_delete_partial_failure_warns() {
        let mut f = fixture();
        f.primary.set_fail_writes(true);
        save_profile(&mut f.store, "p", &words());
        let reply = delete_profile(&mut f.store, "p");
        assert_eq!(reply.notice.level, NoticeLevel::Warning);
        assert!(reply.notice.message.contains("primary"));
        assert!(reply.names.is_empty());
    }

    #[test]
    fn test_import_sets_session_and_optionally_saves() {
        let mut f = fixture();
        let json = r#"{"Grep":["alpha"],"Grep_v":["beta"],"Highlight":[{"word":"alpha","color":"red"}]}"#;

        let reply = import_profile(&mut f.store, &f.session, json, None).unwrap();
        assert_eq!(reply.profile.unwrap().words, words());
        assert!(reply.names.is_empty());
        assert_eq!(restore_session(&f.session).unwrap().words, words());

        let reply = import_profile(&mut f.store, &f.session, json, Some("imported")).unwrap();
        assert_eq!(reply.names, vec!["imported"]);
        assert_eq!(restore_session(&f.session).unwrap().setting_name, "imported");
    }

    #[test]
    fn test_import_invalid_json_is_error() {
        let mut f = fixture();
        assert!(import_profile(&mut f.store, &f.session, "{", None).is_err());
    }

    #[test]
    fn test_export_round_trips_through_import() {
        let mut f = fixture();
        save_profile(&mut f.store, "p", &words());
        let json = export_profile(&f.store, &f.session, Some("p")).unwrap();
        assert_eq!(import_json(&json).unwrap(), words());

        assert!(export_profile(&f.store, &f.session, Some("ghost")).is_err());
        let empty = export_profile(&f.store, &f.session, None).unwrap();
        assert_eq!(empty, r#"{"Grep":[],"Grep_v":[],"Highlight":[]}"#);
    }
}
