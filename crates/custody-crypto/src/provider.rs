//! The sign/verify primitive boundary.
//!
//! The chain verifier treats signing backends as external collaborators. A
//! backend signs an envelope body into a serialized envelope string, and
//! verifies a serialized envelope into either a bare flag or a structured
//! result carrying the recovered payload. Both shapes occur in the wild, so
//! they are modeled as an explicit sum type instead of runtime inspection.

use serde_json::Value;
use thiserror::Error;

/// Raw outcome of a backend's verify call.
///
/// Backends that only check the signature return [`RawVerification::Flag`];
/// backends that re-parse the signed document return
/// [`RawVerification::Structured`] with the document contents. The result
/// normalizer in the chain crate folds both into one canonical outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RawVerification {
    Flag(bool),
    Structured(Value),
}

/// Errors surfaced by a signing backend.
///
/// The chain verifier converts these into failed verification entries; they
/// never cross the `verify_chain` boundary as errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Malformed envelope: {0}")]
    Malformed(String),

    #[error("Crypto backend failure: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A signing backend.
pub trait CryptoProvider {
    /// Sign an envelope body, returning the serialized signed envelope.
    ///
    /// The body is an envelope without its `signature` field; the returned
    /// string is the same document with the signature attached.
    fn sign(&self, body: &Value) -> Result<String, CryptoError>;

    /// Verify a serialized envelope.
    ///
    /// Returns `Ok` with the backend's raw outcome (including a negative
    /// flag for a bad signature); `Err` is reserved for input the backend
    /// cannot process at all.
    fn verify(&self, envelope: &str) -> Result<RawVerification, CryptoError>;
}
