// src/api/mod.rs
// =============================================================================
// The request boundary around the checking engine.
//
// One operation: check-links. Given an Authorization header and a JSON body,
// it either returns a BatchResult or a single ApiError carrying an HTTP-style
// status code:
//
//   403  missing or unknown bearer token      (checked first)
//   400  body is not a JSON array of records, the array is empty, or a
//        record has a blank LinkUrl
//   500  the batch itself failed
//
// Nothing reaches the engine until auth and validation have passed.
// =============================================================================

mod auth;

pub use auth::{bearer_token, parse_token_entry, CredentialVerifier, StaticTokenTable};

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::checker::{BatchError, BatchOrchestrator, BatchResult, LinkRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid or missing token")]
    Forbidden,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Forbidden => 403,
            ApiError::Internal(_) => 500,
        }
    }

    /// JSON error body, `{"detail": "..."}`.
    pub fn body(&self) -> serde_json::Value {
        json!({ "detail": self.to_string() })
    }
}

impl From<BatchError> for ApiError {
    fn from(error: BatchError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// The engine as seen from the boundary.
#[async_trait]
pub trait LinkChecker: Send + Sync {
    async fn check(&self, items: Vec<LinkRecord>) -> Result<BatchResult, BatchError>;
}

#[async_trait]
impl LinkChecker for BatchOrchestrator {
    async fn check(&self, items: Vec<LinkRecord>) -> Result<BatchResult, BatchError> {
        self.check_batch(items).await
    }
}

pub struct CheckLinksHandler<V, C> {
    verifier: V,
    checker: C,
}

impl<V: CredentialVerifier, C: LinkChecker> CheckLinksHandler<V, C> {
    pub fn new(verifier: V, checker: C) -> Self {
        Self { verifier, checker }
    }

    pub async fn handle(
        &self,
        authorization: Option<&str>,
        body: &str,
    ) -> Result<BatchResult, ApiError> {
        let caller = self.authorize(authorization)?;
        let items = parse_records(body)?;

        info!(caller = %caller, items = items.len(), "check-links accepted");
        Ok(self.checker.check(items).await?)
    }

    fn authorize(&self, authorization: Option<&str>) -> Result<String, ApiError> {
        let identity = authorization
            .and_then(bearer_token)
            .and_then(|token| self.verifier.verify(token));

        identity.ok_or_else(|| {
            warn!("check-links rejected: invalid or missing token");
            ApiError::Forbidden
        })
    }
}

// Parses and validates the request body
pub fn parse_records(body: &str) -> Result<Vec<LinkRecord>, ApiError> {
    let items: Vec<LinkRecord> = serde_json::from_str(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    if items.is_empty() {
        return Err(ApiError::BadRequest(
            "Request must be a non-empty JSON array".to_string(),
        ));
    }

    if let Some(index) = items.iter().position(|item| item.url.trim().is_empty()) {
        return Err(ApiError::BadRequest(format!(
            "LinkUrl must not be empty (item {})",
            index
        )));
    }

    Ok(items)
}
