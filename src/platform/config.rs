// GrepMark - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for GrepMark configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/grepmark/ or %APPDATA%\GrepMark\config\).
    /// Holds config.toml and the primary profile tier.
    pub config_dir: PathBuf,

    /// Data directory (e.g. ~/.local/share/grepmark/).
    /// Holds the backup profile tier and the session snapshot.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }

    /// Replace either directory with an explicit override (CLI flags, tests).
    pub fn with_overrides(mut self, config_dir: Option<&Path>, data_dir: Option<&Path>) -> Self {
        if let Some(dir) = config_dir {
            self.config_dir = dir.to_path_buf();
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir.to_path_buf();
        }
        self
    }

    /// Path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Default path of the primary profile tier.
    pub fn primary_store_file(&self) -> PathBuf {
        self.config_dir.join(constants::PRIMARY_STORE_FILE_NAME)
    }

    /// Default path of the backup profile tier.
    pub fn backup_store_file(&self) -> PathBuf {
        self.data_dir.join(constants::BACKUP_STORE_FILE_NAME)
    }

    /// Path of the session snapshot.
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(constants::SESSION_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[store]` section.
    pub store: StoreSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light". Selects the auto-assigned highlight palette.
    pub theme: Option<String>,
    /// Initial result page font size in pixels.
    pub font_size: Option<u32>,
    /// Whether result lines wrap initially.
    pub wrap: Option<bool>,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Override for the primary tier file.
    pub primary_file: Option<String>,
    /// Override for the backup tier file.
    pub backup_file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- UI --
    /// Dark palette (true) or light palette (false).
    pub dark_mode: bool,
    /// Result page font size in pixels.
    pub font_size: u32,
    /// Result page starts with wrapping enabled.
    pub wrap: bool,

    // -- Store --
    /// Primary tier file override.
    pub primary_file: Option<PathBuf>,
    /// Backup tier file override.
    pub backup_file: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            wrap: false,
            primary_file: None,
            backup_file: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given path.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning: the
/// application still starts but the user is informed.
///
/// Called before logging is initialised (the config selects the log level),
/// so the caller is responsible for reporting the warnings.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(source) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(ConfigError::ValueOutOfRange {
                field: "[ui] theme".to_string(),
                value: other.to_string(),
                expected: "\"dark\" or \"light\"".to_string(),
            }),
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[ui] font_size".to_string(),
                value: size.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_FONT_SIZE,
                    constants::MAX_FONT_SIZE,
                    constants::DEFAULT_FONT_SIZE
                ),
            });
        }
    }

    if let Some(wrap) = raw.ui.wrap {
        config.wrap = wrap;
    }

    // -- Store: tier file overrides --
    config.primary_file = raw
        .store
        .primary_file
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    config.backup_file = raw
        .store
        .backup_file
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug, trace".to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}
