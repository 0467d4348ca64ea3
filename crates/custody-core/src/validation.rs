//! Structural validation for custody envelopes.
//!
//! Validation guards ingestion of envelopes received over a transport. It
//! checks wire structure only; signature checking and chain traversal belong
//! to the chain verifier, which stays total over malformed input.

use crate::types::{SignedEnvelope, ARTIFACT_TYPE_PREFIX};
use thiserror::Error;

/// Errors that can occur during envelope validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty artifact id")]
    EmptyArtifactId,

    #[error("Empty artifact version for artifact '{0}'")]
    EmptyArtifactVersion(String),

    #[error("Empty artifact type for artifact '{0}'")]
    EmptyArtifactType(String),

    #[error("Artifact type '{got}' is missing the '{expected}' namespace prefix")]
    MissingTypePrefix { got: String, expected: &'static str },

    #[error("Signature on artifact '{0}' has an empty signer id")]
    EmptySignerId(String),

    #[error("Signature on artifact '{0}' has an empty value")]
    EmptySignatureValue(String),
}

/// Validate an envelope and, recursively, its ancestry.
///
/// # Errors
///
/// Returns `ValidationError` for the first structural defect found.
pub fn validate_envelope(envelope: &SignedEnvelope) -> Result<(), ValidationError> {
    if envelope.artifact_id.is_empty() {
        return Err(ValidationError::EmptyArtifactId);
    }

    if envelope.artifact_version.is_empty() {
        return Err(ValidationError::EmptyArtifactVersion(
            envelope.artifact_id.clone(),
        ));
    }

    validate_artifact_type(envelope)?;

    if let Some(signature) = &envelope.signature {
        if signature.signer_id.is_empty() {
            return Err(ValidationError::EmptySignerId(envelope.artifact_id.clone()));
        }
        if signature.value.is_empty() {
            return Err(ValidationError::EmptySignatureValue(
                envelope.artifact_id.clone(),
            ));
        }
    }

    for parent in &envelope.parents {
        validate_envelope(parent)?;
    }

    Ok(())
}

fn validate_artifact_type(envelope: &SignedEnvelope) -> Result<(), ValidationError> {
    if envelope.artifact_type.is_empty() {
        return Err(ValidationError::EmptyArtifactType(
            envelope.artifact_id.clone(),
        ));
    }

    if !envelope.artifact_type.starts_with(ARTIFACT_TYPE_PREFIX) {
        return Err(ValidationError::MissingTypePrefix {
            got: envelope.artifact_type.clone(),
            expected: ARTIFACT_TYPE_PREFIX,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnvelopeSignature;
    use chrono::Utc;
    use serde_json::json;

    fn minimal_envelope() -> SignedEnvelope {
        SignedEnvelope {
            artifact_id: "art-1".to_string(),
            artifact_version: "v-1".to_string(),
            artifact_type: "a2a-task".to_string(),
            created_at: Utc::now(),
            payload: json!({}),
            signature: Some(EnvelopeSignature {
                signer_id: "agent-a".to_string(),
                signer_version: "1".to_string(),
                value: "ed25519:AAAA".to_string(),
                algorithm: None,
                public_key_hash: None,
            }),
            parents: vec![],
        }
    }

    #[test]
    fn test_valid_envelope() {
        assert!(validate_envelope(&minimal_envelope()).is_ok());
    }

    #[test]
    fn test_empty_artifact_id() {
        let mut envelope = minimal_envelope();
        envelope.artifact_id = "".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::EmptyArtifactId)
        ));
    }

    #[test]
    fn test_empty_artifact_version() {
        let mut envelope = minimal_envelope();
        envelope.artifact_version = "".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::EmptyArtifactVersion(_))
        ));
    }

    #[test]
    fn test_missing_type_prefix() {
        let mut envelope = minimal_envelope();
        envelope.artifact_type = "task".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::MissingTypePrefix { .. })
        ));
    }

    #[test]
    fn test_empty_artifact_type() {
        let mut envelope = minimal_envelope();
        envelope.artifact_type = "".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::EmptyArtifactType(_))
        ));
    }

    #[test]
    fn test_empty_signer_id() {
        let mut envelope = minimal_envelope();
        envelope.signature.as_mut().unwrap().signer_id = "".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::EmptySignerId(_))
        ));
    }

    #[test]
    fn test_empty_signature_value() {
        let mut envelope = minimal_envelope();
        envelope.signature.as_mut().unwrap().value = "".to_string();
        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::EmptySignatureValue(_))
        ));
    }

    #[test]
    fn test_unsigned_envelope_is_structurally_valid() {
        // Missing signatures are a verification failure, not a wire defect
        let mut envelope = minimal_envelope();
        envelope.signature = None;
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[test]
    fn test_defect_in_nested_parent() {
        let mut parent = minimal_envelope();
        parent.artifact_type = "unprefixed".to_string();

        let mut envelope = minimal_envelope();
        envelope.artifact_id = "art-2".to_string();
        envelope.parents = vec![parent];

        assert!(matches!(
            validate_envelope(&envelope),
            Err(ValidationError::MissingTypePrefix { .. })
        ));
    }
}
