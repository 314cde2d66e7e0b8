//! Configuration loading and typed config structures for the Agora
//! simulation.
//!
//! The canonical configuration lives in `agora.yaml` at the project root.
//! This module defines strongly-typed structs that mirror the YAML
//! structure. Every field has a default, so an empty or partial file is
//! valid and a missing file means "all defaults".

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use agora_ledger::{EconomyRule, RuleBook, STARTING_BALANCE, STARTING_PROSPERITY};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `agora.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgoraConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,

    /// Snapshot store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cooldown and retention limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Starting values and rule table.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Evolution score parameters.
    #[serde(default)]
    pub evolution: EvolutionConfig,

    /// Scripted-agent driver settings.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AgoraConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `AGORA_HOST` overrides `server.host`
    /// - `AGORA_PORT` overrides `server.port`
    /// - `AGORA_DATA_DIR` overrides `storage.data_dir`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    /// Environment overrides apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file) when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AGORA_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("AGORA_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = %val, "Ignoring AGORA_PORT: {e}"),
            }
        }
        if let Ok(val) = std::env::var("AGORA_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(val));
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.event_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "limits.event_capacity",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.driver.message_probability) {
            return Err(ConfigError::Invalid {
                field: "driver.message_probability",
                reason: format!("{} is not within 0..=1", self.driver.message_probability),
            });
        }
        if self.economy.starting_balance.is_sign_negative() {
            return Err(ConfigError::Invalid {
                field: "economy.starting_balance",
                reason: "must not be negative".to_owned(),
            });
        }
        if self.economy.starting_prosperity.is_sign_negative()
            || self.economy.starting_prosperity > Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::Invalid {
                field: "economy.starting_prosperity",
                reason: "must be within 0..=100".to_owned(),
            });
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Snapshot store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory for JSON snapshots. `null` keeps state in memory only.
    #[serde(default = "default_data_dir")]
    pub data_dir: Option<PathBuf>,

    /// Seconds between periodic snapshots. `0` disables the periodic task;
    /// a final snapshot is still written on shutdown.
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_interval_secs: default_snapshot_interval_secs(),
        }
    }
}

/// Cooldown and retention limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    /// Seconds an agent must wait between mutating actions.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Events retained per society.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Economy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Balance of an agent on first touch.
    #[serde(default = "default_starting_balance")]
    pub starting_balance: Decimal,

    /// Prosperity of a society on first touch.
    #[serde(default = "default_starting_prosperity")]
    pub starting_prosperity: Decimal,

    /// Replacement rule table, in match order. Absent means the standard
    /// table.
    #[serde(default)]
    pub rules: Option<Vec<EconomyRule>>,

    /// Replacement fallback rule.
    #[serde(default)]
    pub fallback: Option<EconomyRule>,
}

impl EconomyConfig {
    /// Build the rule book this configuration describes.
    pub fn rule_book(&self) -> RuleBook {
        let book = self
            .rules
            .clone()
            .map_or_else(RuleBook::standard, RuleBook::new);
        match &self.fallback {
            Some(fallback) => book.with_fallback(fallback.clone()),
            None => book,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            starting_prosperity: default_starting_prosperity(),
            rules: None,
            fallback: None,
        }
    }
}

/// Evolution score configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EvolutionConfig {
    /// Instant from which elapsed time is measured.
    #[serde(default = "default_epoch")]
    pub epoch: DateTime<Utc>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            epoch: default_epoch(),
        }
    }
}

/// Scripted-agent driver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverConfig {
    /// Whether the driver runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base seconds between moves.
    #[serde(default = "default_driver_interval_secs")]
    pub interval_secs: u64,

    /// Maximum random seconds added to or removed from the interval.
    #[serde(default = "default_driver_jitter_secs")]
    pub jitter_secs: u64,

    /// Probability that a move is a message rather than a decision.
    #[serde(default = "default_message_probability")]
    pub message_probability: f64,

    /// Seed for reproducible runs. Absent means seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_driver_interval_secs(),
            jitter_secs: default_driver_jitter_secs(),
            message_probability: default_message_probability(),
            seed: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter (overridden by `RUST_LOG`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3001
}

fn default_data_dir() -> Option<PathBuf> {
    Some(PathBuf::from("data"))
}

const fn default_snapshot_interval_secs() -> u64 {
    60
}

const fn default_cooldown_secs() -> u64 {
    30
}

const fn default_event_capacity() -> usize {
    500
}

const fn default_starting_balance() -> Decimal {
    STARTING_BALANCE
}

const fn default_starting_prosperity() -> Decimal {
    STARTING_PROSPERITY
}

fn default_epoch() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2026, 2, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |n| n.and_utc())
}

const fn default_driver_interval_secs() -> u64 {
    20
}

const fn default_driver_jitter_secs() -> u64 {
    10
}

const fn default_message_probability() -> f64 {
    0.3
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
