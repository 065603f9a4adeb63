//! TOML Configuration File Support
//!
//! Configuration for the triage console, read from
//! `~/.config/triage-console/console.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! The configuration file follows XDG Base Directory specification:
//! - `$XDG_CONFIG_HOME/triage-console/console.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! [stream]
//! reveal_interval_ms = 30
//!
//! [drafts]
//! initial_tone = "professional"
//!
//! [store]
//! corpus_path = "/home/me/inbox.json"
//!
//! [ui]
//! theme = "dark"
//! frame_interval_ms = 16
//! log_filter = "info"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |---|---|
//! | `TRIAGE_REVEAL_INTERVAL_MS` | `stream.reveal_interval_ms` |
//! | `TRIAGE_INITIAL_TONE` | `drafts.initial_tone` |
//! | `TRIAGE_CORPUS` | `store.corpus_path` |
//! | `TRIAGE_THEME` | `ui.theme` |
//! | `TRIAGE_LOG_FILTER` | `ui.log_filter` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effects::ThemeMode;
use crate::message::ToneId;
use crate::reveal::DEFAULT_REVEAL_INTERVAL;

/// Environment variable for the reveal interval in milliseconds
pub const ENV_REVEAL_INTERVAL_MS: &str = "TRIAGE_REVEAL_INTERVAL_MS";
/// Environment variable for the initial tone
pub const ENV_INITIAL_TONE: &str = "TRIAGE_INITIAL_TONE";
/// Environment variable for the corpus path
pub const ENV_CORPUS: &str = "TRIAGE_CORPUS";
/// Environment variable for the theme
pub const ENV_THEME: &str = "TRIAGE_THEME";
/// Environment variable for the log filter
pub const ENV_LOG_FILTER: &str = "TRIAGE_LOG_FILTER";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Stream section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamToml {
    /// Delay between revealed characters in milliseconds
    pub reveal_interval_ms: Option<u64>,
}

/// Drafts section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftsToml {
    /// Tone selected at startup
    pub initial_tone: Option<String>,
}

/// Store section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreToml {
    /// JSON corpus to load instead of the demo inbox
    pub corpus_path: Option<PathBuf>,
}

/// UI section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// `dark` or `light`
    pub theme: Option<String>,

    /// Minimum time between frames in milliseconds
    pub frame_interval_ms: Option<u64>,

    /// Default tracing filter directive
    pub log_filter: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleToml {
    /// Stream configuration section
    pub stream: StreamToml,

    /// Drafts configuration section
    pub drafts: DraftsToml,

    /// Store configuration section
    pub store: StoreToml,

    /// UI configuration section
    pub ui: UiToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the console
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfigFile {
    /// Delay between revealed characters
    pub reveal_interval: Duration,

    /// Tone selected at startup
    pub initial_tone: ToneId,

    /// JSON corpus; `None` means the demo inbox
    pub corpus_path: Option<PathBuf>,

    /// Theme at startup
    pub theme: ThemeMode,

    /// Minimum time between frames
    pub frame_interval: Duration,

    /// Default tracing filter directive (`RUST_LOG` still wins)
    pub log_filter: String,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ConsoleConfigFile {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            initial_tone: ToneId::default(),
            corpus_path: None,
            theme: ThemeMode::default(),
            frame_interval: Duration::from_millis(16), // ~60 FPS
            log_filter: "info".to_string(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ConsoleConfigFile {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/triage-console/console.toml` or
/// `~/.config/triage-console/console.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("triage-console").join("console.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// any value fails validation. A missing config file is not an error
/// (defaults are used).
pub fn load_config() -> Result<ConsoleConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if any value fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ConsoleConfigFile, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration from a specific path, then `env`
///
/// `env` maps a variable name to its value; tests pass a map lookup here
/// instead of touching the process environment.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if any value fails validation.
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<ConsoleConfigFile, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = ConsoleConfigFile::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ConsoleToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env)?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ConsoleConfigFile, toml: &ConsoleToml) -> Result<(), ConfigError> {
    if let Some(ms) = toml.stream.reveal_interval_ms {
        config.reveal_interval = positive_millis("stream.reveal_interval_ms", ms)?;
    }
    if let Some(ref tone) = toml.drafts.initial_tone {
        config.initial_tone = parse_tone("drafts.initial_tone", tone)?;
    }
    if let Some(ref path) = toml.store.corpus_path {
        config.corpus_path = Some(path.clone());
    }
    if let Some(ref theme) = toml.ui.theme {
        config.theme = parse_theme("ui.theme", theme)?;
    }
    if let Some(ms) = toml.ui.frame_interval_ms {
        config.frame_interval = positive_millis("ui.frame_interval_ms", ms)?;
    }
    if let Some(ref filter) = toml.ui.log_filter {
        config.log_filter = filter.clone();
    }
    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut ConsoleConfigFile, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(ENV_REVEAL_INTERVAL_MS) {
        let ms = value.trim().parse::<u64>().map_err(|_| {
            ConfigError::ValidationError(format!("{ENV_REVEAL_INTERVAL_MS} must be a number, got `{value}`"))
        })?;
        config.reveal_interval = positive_millis(ENV_REVEAL_INTERVAL_MS, ms)?;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env(ENV_INITIAL_TONE) {
        config.initial_tone = parse_tone(ENV_INITIAL_TONE, &value)?;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env(ENV_CORPUS) {
        if !value.is_empty() {
            config.corpus_path = Some(PathBuf::from(value));
            config.source = ConfigSource::Env;
        }
    }
    if let Some(value) = env(ENV_THEME) {
        config.theme = parse_theme(ENV_THEME, &value)?;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env(ENV_LOG_FILTER) {
        config.log_filter = value;
        config.source = ConfigSource::Env;
    }
    Ok(())
}

fn positive_millis(name: &str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be greater than zero"
        )));
    }
    Ok(Duration::from_millis(ms))
}

fn parse_tone(name: &str, value: &str) -> Result<ToneId, ConfigError> {
    ToneId::parse(value).ok_or_else(|| {
        ConfigError::ValidationError(format!(
            "{name}: unknown tone `{value}` (expected professional, empathetic or direct)"
        ))
    })
}

fn parse_theme(name: &str, value: &str) -> Result<ThemeMode, ConfigError> {
    ThemeMode::parse(value).ok_or_else(|| {
        ConfigError::ValidationError(format!("{name}: unknown theme `{value}` (expected dark or light)"))
    })
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Corpus path override
    pub corpus_path: Option<PathBuf>,

    /// Initial tone override
    pub initial_tone: Option<ToneId>,

    /// Reveal interval override (milliseconds)
    pub reveal_interval_ms: Option<u64>,

    /// Theme override
    pub theme: Option<ThemeMode>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set corpus path override
    #[must_use]
    pub fn with_corpus_path(mut self, path: impl AsRef<Path>) -> Self {
        self.corpus_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set initial tone override
    #[must_use]
    pub fn with_initial_tone(mut self, tone: ToneId) -> Self {
        self.initial_tone = Some(tone);
        self
    }

    /// Set reveal interval override
    #[must_use]
    pub fn with_reveal_interval_ms(mut self, ms: u64) -> Self {
        self.reveal_interval_ms = Some(ms);
        self
    }

    /// Set theme override
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero reveal interval.
    pub fn apply(&self, config: &mut ConsoleConfigFile) -> Result<(), ConfigError> {
        if self.corpus_path.is_some()
            || self.initial_tone.is_some()
            || self.reveal_interval_ms.is_some()
            || self.theme.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref path) = self.corpus_path {
            config.corpus_path = Some(path.clone());
        }
        if let Some(tone) = self.initial_tone {
            config.initial_tone = tone;
        }
        if let Some(ms) = self.reveal_interval_ms {
            config.reveal_interval = positive_millis("--reveal-ms", ms)?;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = ConsoleConfigFile::default();
        assert_eq!(config.reveal_interval, Duration::from_millis(30));
        assert_eq!(config.initial_tone, ToneId::Professional);
        assert_eq!(config.corpus_path, None);
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("triage-console"));
            assert!(p.to_string_lossy().ends_with("console.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[stream]
reveal_interval_ms = 45

[drafts]
initial_tone = "Empathetic"

[store]
corpus_path = "/srv/inbox.json"

[ui]
theme = "light"
frame_interval_ms = 33
log_filter = "triage_core=debug"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.reveal_interval, Duration::from_millis(45));
        assert_eq!(config.initial_tone, ToneId::Empathetic);
        assert_eq!(config.corpus_path, Some(PathBuf::from("/srv/inbox.json")));
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.frame_interval, Duration::from_millis(33));
        assert_eq!(config.log_filter, "triage_core=debug");
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = toml_file("[ui]\ntheme = \"light\"\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.reveal_interval, DEFAULT_REVEAL_INTERVAL);
        assert_eq!(config.initial_tone, ToneId::Professional);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = toml_file("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.reveal_interval, DEFAULT_REVEAL_INTERVAL);
        assert_eq!(config.source(), ConfigSource::File);
    }

    // =========================================================================
    // Missing File Handling Tests
    // =========================================================================

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/console.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.config_file_path, None);
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config, ConsoleConfigFile::default());
    }

    // =========================================================================
    // Malformed / Invalid TOML Tests
    // =========================================================================

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[stream\nreveal_interval_ms = \"fast\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let file = toml_file("[stream]\nreveal_interval_ms = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_tone_rejected() {
        let file = toml_file("[drafts]\ninitial_tone = \"sarcastic\"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(err.to_string().contains("sarcastic"));
    }

    // =========================================================================
    // Priority Ordering Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[drafts]\ninitial_tone = \"direct\"\n[ui]\ntheme = \"light\"\n");
        let env = env_of(&[(ENV_INITIAL_TONE, "empathetic"), (ENV_REVEAL_INTERVAL_MS, "10")]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.initial_tone, ToneId::Empathetic);
        assert_eq!(config.reveal_interval, Duration::from_millis(10));
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_corpus_and_log_filter() {
        let env = env_of(&[(ENV_CORPUS, "/tmp/mail.json"), (ENV_LOG_FILTER, "debug")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.corpus_path, Some(PathBuf::from("/tmp/mail.json")));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_env_value_rejected() {
        let env = env_of(&[(ENV_REVEAL_INTERVAL_MS, "soon")]);
        assert!(matches!(
            load_config_with_env(None, env).unwrap_err(),
            ConfigError::ValidationError(_)
        ));

        let env = env_of(&[(ENV_THEME, "solarized")]);
        assert!(load_config_with_env(None, env).is_err());
    }

    #[test]
    fn test_cli_overrides_everything() {
        let env = env_of(&[(ENV_THEME, "light"), (ENV_INITIAL_TONE, "direct")]);
        let mut config = load_config_with_env(None, env).unwrap();

        ConfigOverrides::new()
            .with_theme(ThemeMode::Dark)
            .with_initial_tone(ToneId::Empathetic)
            .with_reveal_interval_ms(5)
            .with_corpus_path("/data/inbox.json")
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.initial_tone, ToneId::Empathetic);
        assert_eq!(config.reveal_interval, Duration::from_millis(5));
        assert_eq!(config.corpus_path, Some(PathBuf::from("/data/inbox.json")));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = ConsoleConfigFile::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }
}
