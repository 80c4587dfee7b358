// src/service/http.rs

//! `POST /verify` over HTTP with a single multipart file part.

use std::time::Duration;

use async_trait::async_trait;
use log::Level;
use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};

use super::{ServiceError, Verdict, VerificationService, response::parse_body};
use crate::{bioguard_log, capture::Frame, config::ServiceConfig};

pub struct HttpVerifier {
    client: Client,
    endpoint: Url,
    field_name: String,
    file_name: String,
    timeout: Option<Duration>,
}

impl HttpVerifier {
    pub fn new(cfg: &ServiceConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: cfg.endpoint.clone(),
            field_name: cfg.field_name.clone(),
            file_name: cfg.file_name.clone(),
            timeout: cfg.request_timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> ServiceError {
        match self.timeout {
            Some(limit) if err.is_timeout() => ServiceError::Timeout(limit),
            _ => ServiceError::Transport(err),
        }
    }
}

#[async_trait]
impl VerificationService for HttpVerifier {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn verify(&self, frame: Frame) -> Result<Verdict, ServiceError> {
        let size = frame.len();
        let part = Part::bytes(frame.bytes)
            .file_name(self.file_name.clone())
            .mime_str(frame.mime)?;
        let form = Form::new().part(self.field_name.clone(), part);

        bioguard_log!(Level::Trace, "service", "POST {} ({} bytes)", self.endpoint, size);
        let resp = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        Ok(parse_body(&body))
    }
}
