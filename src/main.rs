// src/main.rs

//! Agent entry-point.
//!
//! 1. Parse configuration & set up structured logging
//! 2. Optionally expose Prometheus metrics
//! 3. Build the frame source and the verification client
//! 4. Start the verification loop and the console display
//! 5. Wait for Ctrl+C / SIGTERM, then stop the loop cleanly
//!
// ───── std / 3rd-party imports ──────────────────────────────────────────────
use anyhow::Context;
use chrono::Local;
use fern::Dispatch;
use std::{
    path::{Path, PathBuf},
    process,
    sync::Arc,
    thread,
};
use tokio::signal;

// ───── local imports ────────────────────────────────────────────────────────
use bioguard::capture;
use bioguard::config::{self, Config, model::LoggingConfig};
use bioguard::display;
use bioguard::service::HttpVerifier;
use bioguard::session::VerificationLoop;
use bioguard::telemetry;

// ───── helpers ──────────────────────────────────────────────────────────────

/// Print an error with context and terminate the process.
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(1);
    }};
}

/// Directory that contains the running executable.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// First CLI argument, or `default.toml` next to the executable.
fn config_path(exe_dir: &Path) -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| exe_dir.join("default.toml"))
}

/// Configure global logging as requested in `[logging]`.
fn setup_logging(exe_dir: &Path, logging: &LoggingConfig) -> Result<(), fern::InitError> {
    let log_path = logging
        .enable
        .then(|| exe_dir.join(logging.file.as_deref().unwrap_or("bioguard.log")));

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(logging.level_filter())
        // keep HTTP plumbing quiet unless explicitly asked for
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stderr());

    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ───── agent logic ──────────────────────────────────────────────────────────

async fn run(cfg: Config) -> anyhow::Result<()> {
    // 2 ─ Metrics
    if let Some(addr) = cfg.metrics_listen {
        telemetry::install_exporter(addr).context("metrics exporter")?;
        log::info!("Metrics exposed on http://{addr}/metrics");
    }

    // 3 ─ Collaborators
    let source = capture::from_config(&cfg.capture);
    let verifier = HttpVerifier::new(&cfg.service).context("HTTP client")?;
    log::info!("Verifying against {}", verifier.endpoint());

    // 4 ─ Loop & display
    let verification = VerificationLoop::new(source, Arc::new(verifier), cfg.cadence.clone());
    let printer = tokio::spawn(display::render(verification.subscribe(), std::io::stdout()));
    let handle = verification.start();

    // 5 ─ Wait for shutdown
    shutdown_signal().await;
    handle.stop().await;
    drop(verification);
    if let Err(e) = printer.await {
        log::warn!("display task ended abnormally: {e}");
    }

    log::info!("Agent stopped cleanly");
    Ok(())
}

#[tokio::main]
async fn main() {
    // 1 ─ Context
    let exe_dir = exe_dir();
    let path = config_path(&exe_dir);
    let cfg = config::load(&path).unwrap_or_else(|e| fatal!("config", "{}: {}", path.display(), e));

    setup_logging(&exe_dir, &cfg.logging).unwrap_or_else(|e| fatal!("logging", "{}", e));
    log::info!("Agent bootstrap initiated ({})", path.display());

    if let Err(e) = run(cfg).await {
        fatal!("agent", "{:#}", e);
    }
}
