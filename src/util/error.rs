// GrepMark - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so
// diagnostic logging can walk the chain.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all GrepMark operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum GrepMarkError {
    /// Profile store or session persistence failed.
    Store(StoreError),

    /// Profile JSON import failed.
    Import(ImportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Reading the input text failed.
    Input(InputError),

    /// Writing the result page or other command output failed.
    Output { path: PathBuf, source: io::Error },

    /// A profile could not be serialised to canonical JSON.
    Export { source: serde_json::Error },
}

impl fmt::Display for GrepMarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Import(e) => write!(f, "Import error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Output { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::Export { source } => write!(f, "Export error: {source}"),
        }
    }
}

impl std::error::Error for GrepMarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Import(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Output { source, .. } => Some(source),
            Self::Export { source } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors raised by the profile tiers and the session slot.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// The stored JSON could not be parsed or serialised.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A store file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The tier refused the operation (quota, read-only, offline).
    Unavailable { tier: &'static str, reason: String },

    /// The profile name is absent from both tiers.
    NotFound { name: String },

    /// An operation was requested with an empty profile name.
    EmptyName,

    /// A save could reach neither the primary nor the backup tier.
    BothTiersFailed {
        name: String,
        primary: Box<StoreError>,
        backup: Box<StoreError>,
    },

    /// The primary tier took the save, but an older backup entry could be
    /// neither removed nor refreshed and still shadows it on load.
    StaleBackup {
        name: String,
        source: Box<StoreError>,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::Json { path, source } => {
                write!(f, "Malformed store file '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Store file '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Unavailable { tier, reason } => {
                write!(f, "{tier} store unavailable: {reason}")
            }
            Self::NotFound { name } => write!(f, "No settings found for '{name}'"),
            Self::EmptyName => write!(f, "No setting selected"),
            Self::BothTiersFailed {
                name,
                primary,
                backup,
            } => write!(
                f,
                "Settings '{name}' could not be saved (primary: {primary}; backup: {backup})"
            ),
            Self::StaleBackup { name, source } => write!(
                f,
                "Settings '{name}' saved, but an older backup copy could not be replaced: {source}"
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::BothTiersFailed { backup, .. } => Some(backup.as_ref()),
            Self::StaleBackup { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for GrepMarkError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Errors related to importing a profile from its JSON form.
#[derive(Debug)]
pub enum ImportError {
    /// The text is not a valid profile JSON object.
    Json { source: serde_json::Error },

    /// The import text could not be read from its file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "Invalid profile JSON: {source}"),
            Self::Io { path, source } => {
                write!(f, "Cannot read import file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ImportError> for GrepMarkError {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for GrepMarkError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors related to reading the text to be filtered.
#[derive(Debug)]
pub enum InputError {
    /// I/O error reading the input file or stdin.
    Io { path: PathBuf, source: io::Error },

    /// Input exceeds the maximum supported size.
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::TooLarge { path, size, max } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum input of {max} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for GrepMarkError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

/// Convenience type alias for GrepMark results.
pub type Result<T> = std::result::Result<T, GrepMarkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_both_tiers_failed_keeps_backup_cause() {
        let err = StoreError::BothTiersFailed {
            name: "p".to_string(),
            primary: Box::new(StoreError::Unavailable {
                tier: "primary",
                reason: "quota".to_string(),
            }),
            backup: Box::new(StoreError::Unavailable {
                tier: "backup",
                reason: "offline".to_string(),
            }),
        };
        let text = err.to_string();
        assert!(text.contains("primary store unavailable: quota"));
        assert!(text.contains("backup store unavailable: offline"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_export_failure_is_not_reported_as_import() {
        use serde::ser::Error as _;
        let err = GrepMarkError::Export {
            source: serde_json::Error::custom("bad map key"),
        };
        assert_eq!(err.to_string(), "Export error: bad map key");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_top_level_wraps_subsystem_error() {
        let err: GrepMarkError = StoreError::NotFound {
            name: "gone".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Store error: No settings found for 'gone'"
        );
    }
}
