// src/config/model.rs

use log::LevelFilter;
use reqwest::Url;
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

/// Top-level runtime config
#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
    pub cadence: LoopConfig,
    pub capture: CaptureConfig,
    pub metrics_listen: Option<SocketAddr>,
}

/// Mirror of the whole TOML document before validation
#[derive(Debug, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceStub,
    #[serde(default, rename = "loop")]
    pub cadence: LoopStub,
    pub capture: CaptureStub,
    #[serde(default)]
    pub metrics: MetricsStub,
}

/// Mirror of the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]            pub enable: bool,
    #[serde(default)]            pub file:   Option<String>,
    #[serde(default = "default_level")] pub level: String,
}
fn default_level() -> String { "INFO".into() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enable: false, file: None, level: default_level() }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to INFO.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.to_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "ERROR" => LevelFilter::Error,
            "WARN" => LevelFilter::Warn,
            "DEBUG" => LevelFilter::Debug,
            "TRACE" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}

/// Mirror of the `[service]` table
#[derive(Debug, Deserialize)]
pub struct ServiceStub {
    #[serde(default = "default_endpoint")]   pub endpoint:        String,
    #[serde(default = "default_field_name")] pub field_name:      String,
    #[serde(default = "default_file_name")]  pub file_name:       String,
    #[serde(default)]                        pub request_timeout: Option<String>,
}
fn default_endpoint() -> String { "http://localhost:8000/verify".into() }
fn default_field_name() -> String { "file".into() }
fn default_file_name() -> String { "frame.jpg".into() }

impl Default for ServiceStub {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            field_name: default_field_name(),
            file_name: default_file_name(),
            request_timeout: None,
        }
    }
}

/// Mirror of the `[loop]` table
#[derive(Debug, Deserialize)]
pub struct LoopStub {
    #[serde(default = "default_period")] pub period:         String,
    #[serde(default = "default_policy")] pub policy:         String,
    #[serde(default = "default_grace")]  pub shutdown_grace: String,
}
fn default_period() -> String { "2s".into() }
fn default_policy() -> String { "latest_issued".into() }
fn default_grace() -> String { "3s".into() }

impl Default for LoopStub {
    fn default() -> Self {
        Self { period: default_period(), policy: default_policy(), shutdown_grace: default_grace() }
    }
}

/// Mirror of the `[capture]` table. **No defaults**: must be present in TOML
#[derive(Debug, Deserialize)]
pub struct CaptureStub {
    pub kind:    String,
    #[serde(default)]
    pub path:    Option<String>,
    #[serde(default)]
    pub command: Option<Vec<String>>,
    #[serde(default)]
    pub timeout: Option<String>,
}

/// Mirror of the `[metrics]` table
#[derive(Debug, Default, Deserialize)]
pub struct MetricsStub {
    #[serde(default)]
    pub listen: Option<String>,
}

/// Fully-typed verification endpoint settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint:        Url,
    pub field_name:      String,
    pub file_name:       String,
    pub request_timeout: Option<Duration>,
}

/// Fully-typed loop cadence
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub period:         Duration,
    pub policy:         OrderingPolicy,
    pub shutdown_grace: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(2_000),
            policy: OrderingPolicy::default(),
            shutdown_grace: Duration::from_secs(3),
        }
    }
}

/// Where snapshots come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureConfig {
    File(PathBuf),
    Directory(PathBuf),
    /// External grabber, killed when it runs past `timeout`.
    Command { argv: Vec<String>, timeout: Option<Duration> },
}

/// How overlapping responses are reconciled with the displayed state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Every response overwrites the state when it arrives.
    Arrival,
    /// Responses older than the displayed state are discarded.
    #[default]
    LatestIssued,
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ordering policy '{0}'")]
    InvalidPolicy(String),

    #[error("invalid capture kind '{0}'")]
    InvalidCaptureKind(String),

    #[error("capture kind '{kind}' requires `{field}`")]
    MissingCaptureField { kind: String, field: &'static str },

    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("loop period must be greater than zero")]
    ZeroPeriod,

    #[error("invalid endpoint '{0}': {1}")]
    InvalidEndpoint(String, String),

    #[error("invalid metrics address '{0}': {1}")]
    InvalidAddress(String, #[source] std::net::AddrParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Allow `"latest_issued"` → `OrderingPolicy::LatestIssued`
impl FromStr for OrderingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "arrival"       => Ok(OrderingPolicy::Arrival),
            "latest_issued" => Ok(OrderingPolicy::LatestIssued),
            other           => Err(ConfigError::InvalidPolicy(other.into())),
        }
    }
}
