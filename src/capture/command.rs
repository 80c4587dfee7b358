// src/capture/command.rs

//! Runs an external grabber per snapshot and takes its stdout as the frame,
//! e.g. `["fswebcam", "-q", "--no-banner", "--jpeg", "85", "-"]` or
//! `["ffmpeg", "-loglevel", "error", "-f", "v4l2", "-i", "/dev/video0",
//!   "-frames:v", "1", "-f", "image2", "-"]`.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use log::Level;
use tokio::process::Command;

use super::{CaptureError, Frame, FrameSource};
use crate::bioguard_log;

pub struct CommandSource {
    argv: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandSource {
    /// `argv[0]` is the program; an empty vector never yields a frame.
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv, timeout: None }
    }

    /// Kill the grabber if it has not exited after `limit`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }
}

#[async_trait]
impl FrameSource for CommandSource {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn snapshot(&self) -> Result<Option<Frame>, CaptureError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Ok(None);
        };

        let run = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        // dropping `run` on timeout kills the child
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| CaptureError::TimedOut { program: program.clone(), after: limit })?,
            None => run.await,
        }
        .map_err(|source| CaptureError::Spawn { program: program.clone(), source })?;

        if !output.status.success() {
            return Err(CaptureError::CommandFailed {
                program: program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            bioguard_log!(Level::Debug, "capture", "'{}' printed no frame", program);
            return Ok(None);
        }
        Ok(Some(Frame::new(output.stdout)))
    }
}
