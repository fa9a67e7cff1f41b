//! TOML Configuration File Support
//!
//! Loads the vocabulary and animation timing from
//! `~/.config/brief/brief.toml`, environment variables and CLI overrides.
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
//! - `$XDG_CONFIG_HOME/brief/brief.toml` (typically `~/.config/brief/brief.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [highlight]
//! terms = ["critical", "exploit", "patch"]
//!
//! [reveal]
//! speed_ms = 8
//! delay_ms = 500
//!
//! [scramble]
//! category_speed_ms = 100
//! description_speed_ms = 120
//! delay_ms = 0
//!
//! [field]
//! rows = 9
//! columns = 9
//! base_angle = -10.0
//! ```
//!
//! # Environment Variables
//!
//! | Variable                  | Effect                                   |
//! |---------------------------|------------------------------------------|
//! | `BRIEF_VOCABULARY`        | Comma-separated terms, replaces the list |
//! | `BRIEF_REVEAL_SPEED_MS`   | Reveal tick period                       |
//! | `BRIEF_REVEAL_DELAY_MS`   | Reveal start delay                       |
//! | `BRIEF_SCRAMBLE_SPEED_MS` | Both scramble tick periods               |
//! | `BRIEF_FIELD_BASE_ANGLE`  | Pointer field resting angle              |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{RevealConfig, ScrambleConfig};
use crate::highlight::Vocabulary;

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

/// Tracks where the effective configuration came from
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

/// Highlight section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightToml {
    /// Replacement vocabulary
    pub terms: Option<Vec<String>>,
}

/// Reveal section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Milliseconds between revealed characters
    pub speed_ms: Option<u64>,

    /// Milliseconds before the first character
    pub delay_ms: Option<u64>,
}

/// Scramble section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrambleToml {
    /// Tick period for bullet categories
    pub category_speed_ms: Option<u64>,

    /// Tick period for bullet descriptions
    pub description_speed_ms: Option<u64>,

    /// Delay after hover before scrambling starts
    pub delay_ms: Option<u64>,
}

/// Pointer field section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldToml {
    /// Grid rows
    pub rows: Option<usize>,

    /// Grid columns
    pub columns: Option<usize>,

    /// Resting angle in degrees
    pub base_angle: Option<f64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefToml {
    /// Highlight configuration section
    pub highlight: HighlightToml,
    /// Reveal configuration section
    pub reveal: RevealToml,
    /// Scramble configuration section
    pub scramble: ScrambleToml,
    /// Pointer field configuration section
    pub field: FieldToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective configuration for presenting a report
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct BriefConfig {
    /// Terms emphasized in the report
    pub vocabulary: Vocabulary,
    /// Paragraph reveal timing
    pub reveal: RevealConfig,
    /// Scramble timing for bullet categories
    pub category_scramble: ScrambleConfig,
    /// Scramble timing for bullet descriptions
    pub description_scramble: ScrambleConfig,
    /// Pointer field rows
    pub field_rows: usize,
    /// Pointer field columns
    pub field_columns: usize,
    /// Pointer field resting angle in degrees
    pub field_base_angle: f64,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            reveal: RevealConfig::default(),
            category_scramble: ScrambleConfig {
                speed: Duration::from_millis(100),
                delay: Duration::ZERO,
            },
            description_scramble: ScrambleConfig {
                speed: Duration::from_millis(120),
                delay: Duration::ZERO,
            },
            field_rows: 9,
            field_columns: 9,
            field_base_angle: -10.0,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl BriefConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Reject values the animators cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let speeds = [
            ("reveal speed", self.reveal.speed),
            ("category scramble speed", self.category_scramble.speed),
            ("description scramble speed", self.description_scramble.speed),
        ];
        for (name, speed) in speeds {
            if speed.is_zero() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        if self.field_rows == 0 || self.field_columns == 0 {
            return Err(ConfigError::ValidationError(format!(
                "pointer field must be at least 1x1, got {}x{}",
                self.field_rows, self.field_columns
            )));
        }

        if !self.field_base_angle.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "pointer field base angle must be finite, got {}",
                self.field_base_angle
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/brief/brief.toml` or
/// `~/.config/brief/brief.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("brief").join("brief.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail [`BriefConfig::validate`]. A missing config file
/// is not an error (defaults are used).
pub fn load_config() -> Result<BriefConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the result is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<BriefConfig, ConfigError> {
    load_with_env(path, |key| std::env::var(key).ok())
}

fn load_with_env(
    path: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BriefConfig, ConfigError> {
    let mut config = BriefConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: BriefToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
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

    apply_env_config(&mut config, &lookup);
    config.validate()?;

    tracing::debug!(
        source = %config.source,
        terms = config.vocabulary.len(),
        "Configuration ready"
    );
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut BriefConfig, toml: &BriefToml) {
    if let Some(ref terms) = toml.highlight.terms {
        config.vocabulary = Vocabulary::new(terms);
    }

    if let Some(ms) = toml.reveal.speed_ms {
        config.reveal.speed = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.reveal.delay_ms {
        config.reveal.delay = Duration::from_millis(ms);
    }

    if let Some(ms) = toml.scramble.category_speed_ms {
        config.category_scramble.speed = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.scramble.description_speed_ms {
        config.description_scramble.speed = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.scramble.delay_ms {
        config.category_scramble.delay = Duration::from_millis(ms);
        config.description_scramble.delay = Duration::from_millis(ms);
    }

    if let Some(rows) = toml.field.rows {
        config.field_rows = rows;
    }
    if let Some(columns) = toml.field.columns {
        config.field_columns = columns;
    }
    if let Some(angle) = toml.field.base_angle {
        config.field_base_angle = angle;
    }
}

/// Parse one environment value, warning when it is present but unusable
fn env_value<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    if let Ok(value) = raw.trim().parse::<T>() {
        Some(value)
    } else {
        tracing::warn!(var = key, value = %raw, "Ignoring unparsable environment value");
        None
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut BriefConfig, lookup: &impl Fn(&str) -> Option<String>) {
    if let Some(list) = lookup("BRIEF_VOCABULARY") {
        config.vocabulary = Vocabulary::from_csv(&list);
        config.source = ConfigSource::Env;
    }

    if let Some(ms) = env_value::<u64>(lookup, "BRIEF_REVEAL_SPEED_MS") {
        config.reveal.speed = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_value::<u64>(lookup, "BRIEF_REVEAL_DELAY_MS") {
        config.reveal.delay = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_value::<u64>(lookup, "BRIEF_SCRAMBLE_SPEED_MS") {
        config.category_scramble.speed = Duration::from_millis(ms);
        config.description_scramble.speed = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(angle) = env_value::<f64>(lookup, "BRIEF_FIELD_BASE_ANGLE") {
        config.field_base_angle = angle;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Vocabulary override
    pub vocabulary: Option<Vocabulary>,
    /// Reveal speed override (milliseconds)
    pub reveal_speed_ms: Option<u64>,
    /// Reveal delay override (milliseconds)
    pub reveal_delay_ms: Option<u64>,
    /// Pointer field base angle override
    pub field_base_angle: Option<f64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set vocabulary override
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Set reveal speed override
    #[must_use]
    pub fn with_reveal_speed_ms(mut self, ms: u64) -> Self {
        self.reveal_speed_ms = Some(ms);
        self
    }

    /// Set reveal delay override
    #[must_use]
    pub fn with_reveal_delay_ms(mut self, ms: u64) -> Self {
        self.reveal_delay_ms = Some(ms);
        self
    }

    /// Set base angle override
    #[must_use]
    pub fn with_field_base_angle(mut self, angle: f64) -> Self {
        self.field_base_angle = Some(angle);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_none()
            && self.reveal_speed_ms.is_none()
            && self.reveal_delay_ms.is_none()
            && self.field_base_angle.is_none()
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when an override makes the
    /// configuration invalid.
    pub fn apply(&self, config: &mut BriefConfig) -> Result<(), ConfigError> {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref vocabulary) = self.vocabulary {
            config.vocabulary = vocabulary.clone();
        }
        if let Some(ms) = self.reveal_speed_ms {
            config.reveal.speed = Duration::from_millis(ms);
        }
        if let Some(ms) = self.reveal_delay_ms {
            config.reveal.delay = Duration::from_millis(ms);
        }
        if let Some(angle) = self.field_base_angle {
            config.field_base_angle = angle;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
