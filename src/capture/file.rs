// src/capture/file.rs

//! Snapshot = whatever image currently sits at a fixed path.
//!
//! Pairs with any external grabber that keeps overwriting one file
//! (`ffmpeg -update 1 frame.jpg`, a phone camera app on a shared folder, ...).

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use log::Level;

use super::{CaptureError, Frame, FrameSource};
use crate::bioguard_log;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FrameSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn snapshot(&self) -> Result<Option<Frame>, CaptureError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => {
                bioguard_log!(Level::Debug, "capture", "{:?} is empty", self.path);
                Ok(None)
            }
            Ok(bytes) => Ok(Some(Frame::new(bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                bioguard_log!(Level::Debug, "capture", "{:?} not there yet", self.path);
                Ok(None)
            }
            Err(source) => Err(CaptureError::Io { path: self.path.clone(), source }),
        }
    }
}
