//! Frame sources.
//! -----------------------------------------------------------------------------
//! A **frame source** owns the camera side of the agent and hands out one encoded
//! still image per request.  "No frame yet" is a normal answer (`Ok(None)`): the
//! device may still be warming up, a replay directory may be empty, or the
//! capture command may have printed nothing.  Hard failures come back as
//! `CaptureError` and the loop treats them exactly like a missing frame.

pub mod command;
pub mod directory;
pub mod file;
pub mod frame;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CaptureConfig;

pub use command::CommandSource;
pub use directory::DirectorySource;
pub use file::FileSource;
pub use frame::Frame;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn capture command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("capture command '{program}' did not finish within {after:?}")]
    TimedOut { program: String, after: std::time::Duration },

    #[error("capture command '{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

#[async_trait]
pub trait FrameSource: Send + Sync + 'static {
    /// Display name for logs.
    fn name(&self) -> &'static str;

    /// Grab the current view, or `None` when the device has nothing to give.
    async fn snapshot(&self) -> Result<Option<Frame>, CaptureError>;
}

/// Build the configured source.
pub fn from_config(cfg: &CaptureConfig) -> Arc<dyn FrameSource> {
    match cfg {
        CaptureConfig::File(path) => Arc::new(FileSource::new(path.clone())),
        CaptureConfig::Directory(dir) => Arc::new(DirectorySource::new(dir.clone())),
        CaptureConfig::Command { argv, timeout } => {
            let source = CommandSource::new(argv.clone());
            match timeout {
                Some(limit) => Arc::new(source.with_timeout(*limit)),
                None => Arc::new(source),
            }
        }
    }
}
