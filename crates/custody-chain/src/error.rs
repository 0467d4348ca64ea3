//! Error types for chain verification and trust storage.

use custody_crypto::CryptoError;
use thiserror::Error;

/// Failures arising while verifying or constructing a custody chain.
///
/// `verify_chain` never surfaces these to the caller; it folds them into
/// per-parent failure entries so one bad ancestor cannot suppress reporting
/// on its siblings. Only the envelope wrapper returns them directly.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("cycle detected in custody chain at artifact '{artifact_id}'")]
    CycleDetected { artifact_id: String },

    #[error("custody chain depth exceeds the configured maximum of {max_depth}")]
    ChainTooDeep { max_depth: usize },

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("crypto backend error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Failures persisting trust store mutations.
///
/// Read paths never produce these; lookups degrade to "not trusted".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("trust store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trust store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("agent document carries no usable identifier")]
    MissingAgentId,
}
