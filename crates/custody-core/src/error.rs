//! Error types for custody core

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while handling custody envelopes
#[derive(Debug, Error)]
pub enum CustodyError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
