//! Envelope wrapping - turn a raw artifact into a signed envelope.

use chrono::Utc;
use custody_core::{SignedEnvelope, ARTIFACT_TYPE_PREFIX};
use custody_crypto::CryptoProvider;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ChainError;

/// Wrap an artifact payload into a signed envelope.
///
/// Allocates a fresh artifact id and version, tags the artifact type with
/// the custody namespace prefix (a no-op when already prefixed), attaches
/// the parent envelopes verbatim, and delegates signing to the provider.
/// Parents are neither deduplicated nor verified here - chain verification
/// is a separate concern performed by the receiver.
///
/// # Errors
///
/// Returns `ChainError` when the provider cannot sign or returns an
/// envelope this crate cannot parse back.
pub fn wrap_artifact<P: CryptoProvider>(
    provider: &P,
    payload: Value,
    artifact_type: &str,
    parents: Vec<SignedEnvelope>,
) -> Result<SignedEnvelope, ChainError> {
    let artifact_type = if artifact_type.starts_with(ARTIFACT_TYPE_PREFIX) {
        artifact_type.to_string()
    } else {
        format!("{}{}", ARTIFACT_TYPE_PREFIX, artifact_type)
    };

    let body = SignedEnvelope {
        artifact_id: Uuid::new_v4().to_string(),
        artifact_version: Uuid::new_v4().to_string(),
        artifact_type,
        created_at: Utc::now(),
        payload,
        signature: None,
        parents,
    };

    let body_value = serde_json::to_value(&body)
        .map_err(|e| ChainError::MalformedEnvelope(format!("unserializable body: {}", e)))?;
    let signed = provider.sign(&body_value)?;

    serde_json::from_str(&signed).map_err(|e| {
        ChainError::MalformedEnvelope(format!("signer returned an unparseable envelope: {}", e))
    })
}
