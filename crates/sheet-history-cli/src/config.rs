//! Settings file loading for the CLI
//!
//! The settings decide where a history starts and how many rows list tokens
//! page by. They are read from a TOML file found at an explicit path, in the
//! working directory or in the platform config directory, and checked before
//! a [`History`](sheet_history::History) is built from them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use thiserror::Error;

use sheet_history::{SheetHistoryError, TokenKind, config::AppConfig};

/// Name of the settings file in every searched directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory searched below the working directory
const LOCAL_CONFIG_DIR: &str = "sheet-history";

/// Settings-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Initial fragment `{0}` does not name a known state")]
    UnknownInitialFragment(String),

    #[error("Default count must be at least 1")]
    ZeroDefaultCount,
}

impl From<ConfigError> for SheetHistoryError {
    fn from(err: ConfigError) -> Self {
        SheetHistoryError::Config(err.to_string())
    }
}

/// Find and load the history settings
///
/// Search order:
/// 1. Explicit path if provided
/// 2. `sheet-history/config.toml` below the working directory
/// 3. Platform-specific config directory
/// 4. Default settings, starting at the spreadsheet list
///
/// # Arguments
///
/// * `explicit_path` - Optional path given with `--config`
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Settings file exists but cannot be parsed
/// - The initial fragment or the default count is unusable
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<AppConfig, SheetHistoryError> {
    // An explicit path must exist, it never falls through to the search
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading settings from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading settings from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "sheet-history", "sheet-history") {
        let system_config = proj_dirs.config_dir().join(CONFIG_FILE_NAME);

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading settings from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System settings file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No settings file found, starting at the spreadsheet list");
    Ok(AppConfig::default())
}

/// Load and check settings from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Errors
///
/// Returns error if the file is missing, unreadable, not valid TOML or fails
/// [`validate_config`].
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SheetHistoryError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate_config(&config)?;
    let default_count = config.list().default_count();
    debug!(
        initial_fragment = config.history().initial_fragment(),
        default_count:?;
        "Settings loaded"
    );

    Ok(config)
}

/// Checks the settings describe a usable starting point.
///
/// The initial fragment may degrade while parsing, which is only logged, but
/// it must not be unknown altogether. A default count of zero would page list
/// tokens to nothing.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let fragment = config.history().initial_fragment();
    let token = sheet_history::parse(fragment);
    if matches!(token.kind(), TokenKind::Unknown(_)) {
        return Err(ConfigError::UnknownInitialFragment(fragment.to_string()));
    }
    if token.url_fragment() != fragment.strip_prefix('#').unwrap_or(fragment) {
        warn!(
            initial_fragment = fragment,
            canonical = token.url_fragment();
            "Initial fragment is not canonical"
        );
    }

    if config.list().default_count() == Some(0) {
        return Err(ConfigError::ZeroDefaultCount);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn config_error(content: &str) -> String {
        let (_dir, path) = write_config(content);
        match load_config(Some(&path)).unwrap_err() {
            SheetHistoryError::Config(message) => message,
            err => panic!("Expected a configuration error, got {err}"),
        }
    }

    #[test]
    fn test_explicit_path() {
        let (_dir, path) = write_config(
            "[history]\ninitial_fragment = \"/plugin/*\"\n\n[list]\ndefault_count = 7\n",
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.history().initial_fragment(), "/plugin/*");
        assert_eq!(config.list().default_count(), Some(7));
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(
            matches!(&err, SheetHistoryError::Config(message) if message.contains("Missing")),
            "Unexpected error: {err}"
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(config_error("[history\n").contains("TOML"));
    }

    #[test]
    fn test_unknown_initial_fragment() {
        let message = config_error("[history]\ninitial_fragment = \"/nowhere\"\n");
        assert!(message.contains("/nowhere"), "Unexpected message: {message}");
    }

    #[test]
    fn test_degraded_initial_fragment_is_accepted() {
        let (_dir, path) = write_config(
            "[history]\ninitial_fragment = \"#/123/Name/column/B:C/right/freeze\"\n",
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.history().initial_fragment(),
            "#/123/Name/column/B:C/right/freeze"
        );
    }

    #[test]
    fn test_zero_default_count() {
        let message = config_error("[list]\ndefault_count = 0\n");
        assert!(message.contains("at least 1"), "Unexpected message: {message}");
    }
}
