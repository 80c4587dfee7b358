// src/capture/directory.rs

//! Replays the images of a directory, one per snapshot, in name order.
//!
//! Handy for kiosks fed by a motion-triggered camera that drops JPEGs into a
//! folder, and for demos without a camera attached.  The directory is listed
//! again on every snapshot so frames added while running are picked up.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use log::Level;

use super::{CaptureError, Frame, FrameSource};
use crate::bioguard_log;

const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png"];

pub struct DirectorySource {
    dir: PathBuf,
    cursor: AtomicUsize,
}

impl DirectorySource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, cursor: AtomicUsize::new(0) }
    }
}

/// Returns `true` if `path` has one of the image extensions.
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.as_str()))
}

/// List image files directly under `dir`, sorted by name.
/// A missing directory is just an empty one.
async fn list_images(dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
    let mut out = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
        Err(source) => return Err(CaptureError::Io { path: dir.to_owned(), source }),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|source| CaptureError::Io { path: dir.to_owned(), source })?
    {
        let p = entry.path();
        if !is_image_file(&p) {
            continue;
        }
        if tokio::fs::metadata(&p).await.is_ok_and(|m| m.is_file()) {
            out.push(p);
        }
    }
    out.sort();

    bioguard_log!(Level::Trace, "capture", "list_images: {:?} → {} entries", dir, out.len());
    Ok(out)
}

#[async_trait]
impl FrameSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn snapshot(&self) -> Result<Option<Frame>, CaptureError> {
        let images = list_images(&self.dir).await?;
        if images.is_empty() {
            bioguard_log!(Level::Debug, "capture", "No images in {:?}", self.dir);
            return Ok(None);
        }

        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % images.len();
        let path = &images[idx];
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CaptureError::Io { path: path.clone(), source })?;

        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Frame::new(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn replays_images_in_name_order_and_wraps() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"B").unwrap();
        std::fs::write(dir.path().join("a.JPEG"), b"A").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
        std::fs::create_dir(dir.path().join("c.jpg")).unwrap();

        let source = DirectorySource::new(dir.path().to_path_buf());
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(source.snapshot().await.unwrap().unwrap().bytes);
        }
        assert_eq!(seen, vec![b"A".to_vec(), b"B".to_vec(), b"A".to_vec()]);
    }

    #[tokio::test]
    async fn missing_or_empty_directory_yields_no_frame() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().to_path_buf());
        assert!(source.snapshot().await.unwrap().is_none());

        let gone = DirectorySource::new(dir.path().join("nope"));
        assert!(gone.snapshot().await.unwrap().is_none());
    }
}
