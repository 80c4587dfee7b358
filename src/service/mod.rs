//! Verification backend boundary.
//!
//! The backend is an opaque collaborator: it takes one image and answers
//! "this is <name>" or "no idea".  Anything that keeps us from hearing that
//! answer (refused connection, timeout, HTTP error) is a `ServiceError`.

pub mod http;
pub mod response;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::capture::Frame;

pub use http::HttpVerifier;
pub use response::VerifyResponse;

/// A well-formed answer from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Match {
        user: String,
        confidence: Option<f64>,
    },
    /// Any non-success status. `message` carries the backend's explanation
    /// when it sent one (e.g. "Add photos to backend/images folder!").
    NoMatch {
        status: String,
        message: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("verification service answered HTTP {0}")]
    Status(u16),

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait VerificationService: Send + Sync + 'static {
    /// Display name for logs.
    fn name(&self) -> &'static str;

    /// Submit one frame and wait for the verdict.
    async fn verify(&self, frame: Frame) -> Result<Verdict, ServiceError>;
}
