// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads the TOML file, deserializes it into `RawConfig`, and converts the
//! raw string settings into a typed runtime `Config`.

use crate::bioguard_log;
use crate::config::model::{
    CaptureConfig, CaptureStub, Config, ConfigError, LoopConfig, LoopStub, RawConfig,
    ServiceConfig, ServiceStub,
};
use log::Level;
use reqwest::Url;
use std::{fs, net::SocketAddr, path::{Path, PathBuf}, time::Duration};

/// Load and parse the configuration from `path`.
/// Logs at DEBUG before reading and INFO on success.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    bioguard_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg = parse(&txt)?;
    bioguard_log!(Level::Info, "config", "Loaded config from {:?}", path);
    Ok(cfg)
}

/// Parse configuration text without touching the filesystem.
pub fn parse(txt: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(txt)?;

    let metrics_listen = raw
        .metrics
        .listen
        .map(|addr| {
            addr.parse::<SocketAddr>()
                .map_err(|e| ConfigError::InvalidAddress(addr.clone(), e))
        })
        .transpose()?;

    Ok(Config {
        logging: raw.logging,
        service: convert_service(raw.service)?,
        cadence: convert_loop(raw.cadence)?,
        capture: convert_capture(raw.capture)?,
        metrics_listen,
    })
}

fn parse_duration(txt: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(txt.trim())
        .map_err(|e| ConfigError::InvalidDuration(txt.into(), e))
}

fn convert_service(stub: ServiceStub) -> Result<ServiceConfig, ConfigError> {
    let endpoint = Url::parse(&stub.endpoint)
        .map_err(|e| ConfigError::InvalidEndpoint(stub.endpoint.clone(), e.to_string()))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEndpoint(
            stub.endpoint,
            "scheme must be http or https".into(),
        ));
    }

    let request_timeout = stub.request_timeout.as_deref().map(parse_duration).transpose()?;

    Ok(ServiceConfig {
        endpoint,
        field_name: stub.field_name,
        file_name: stub.file_name,
        request_timeout,
    })
}

fn convert_loop(stub: LoopStub) -> Result<LoopConfig, ConfigError> {
    let period = parse_duration(&stub.period)?;
    if period.is_zero() {
        return Err(ConfigError::ZeroPeriod);
    }
    let cfg = LoopConfig {
        period,
        policy: stub.policy.parse()?,
        shutdown_grace: parse_duration(&stub.shutdown_grace)?,
    };
    bioguard_log!(
        Level::Debug,
        "config",
        "Loop: period={:?}, policy={:?}, grace={:?}",
        cfg.period,
        cfg.policy,
        cfg.shutdown_grace
    );
    Ok(cfg)
}

fn convert_capture(stub: CaptureStub) -> Result<CaptureConfig, ConfigError> {
    let kind = stub.kind.to_lowercase();
    let path = |field: &'static str| {
        stub.path
            .as_ref()
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingCaptureField { kind: kind.clone(), field })
    };

    match kind.as_str() {
        "file" => Ok(CaptureConfig::File(path("path")?)),
        "directory" | "dir" => Ok(CaptureConfig::Directory(path("path")?)),
        "command" => match stub.command {
            Some(argv) if !argv.is_empty() => Ok(CaptureConfig::Command {
                argv,
                timeout: stub.timeout.as_deref().map(parse_duration).transpose()?,
            }),
            _ => Err(ConfigError::MissingCaptureField { kind: kind.clone(), field: "command" }),
        },
        _ => Err(ConfigError::InvalidCaptureKind(stub.kind)),
    }
}
