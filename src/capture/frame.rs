// src/capture/frame.rs

use chrono::{DateTime, Utc};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// One encoded still image.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    /// Wrap freshly captured bytes, sniffing the image type.
    pub fn new(bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes);
        Self { bytes, mime, captured_at: Utc::now() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Cameras hand out JPEG unless the payload clearly says otherwise.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PNG_MAGIC) {
        "image/png"
    } else {
        "image/jpeg"
    }
}
