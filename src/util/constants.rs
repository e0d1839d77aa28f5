// GrepMark - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "GrepMark";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "GrepMark";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input limits
// =============================================================================

/// File size threshold in bytes above which input is read through `memmap2`
/// instead of being copied into a heap buffer.
pub const LARGE_INPUT_THRESHOLD: u64 = 16 * 1024 * 1024; // 16 MB

/// Hard upper bound on input size. Larger inputs are refused rather than
/// rendered into a result page no browser could open.
pub const MAX_INPUT_BYTES: u64 = 1024 * 1024 * 1024; // 1 GB

// =============================================================================
// Highlighting
// =============================================================================

/// Colour token meaning "do not highlight this word".
pub const NO_COLOR: &str = "none";

/// Prefix of generated highlight class names (`highlight-0`, `highlight-3`, ...).
pub const HIGHLIGHT_CLASS_PREFIX: &str = "highlight-";

/// Base class carried by every highlight span.
pub const HIGHLIGHT_BASE_CLASS: &str = "highlight";

/// Delimiter used to join lines into one buffer and split them back.
/// Source lines never contain it.
pub const LINE_DELIMITER: char = '\n';

// =============================================================================
// Result page defaults
// =============================================================================

/// Default result page font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 15;

/// Minimum font size reachable with the zoom buttons / config (pixels).
pub const MIN_FONT_SIZE: u32 = 10;

/// Maximum font size reachable with the zoom buttons / config (pixels).
pub const MAX_FONT_SIZE: u32 = 40;

/// Title of the generated result page.
pub const RESULT_PAGE_TITLE: &str = "Grep Results";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration and persistence
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Primary profile tier file name (stored in the platform config directory).
pub const PRIMARY_STORE_FILE_NAME: &str = "profiles.json";

/// Backup profile tier file name (stored in the platform data directory).
pub const BACKUP_STORE_FILE_NAME: &str = "profiles.backup.json";

/// Session snapshot file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";

/// Maximum size of a profile store or session file in bytes.
pub const MAX_STORE_FILE_SIZE: u64 = 8 * 1024 * 1024; // 8 MB
