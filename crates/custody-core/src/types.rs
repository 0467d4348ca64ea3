//! Core types for artifact chain-of-custody.
//!
//! This module contains the envelope moved between agents, the verification
//! result tree produced by walking its ancestry, and the trust-assessment
//! types that gate cross-agent communication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace prefix applied to artifact type tags, distinguishing custody
/// envelopes from other signed document kinds.
pub const ARTIFACT_TYPE_PREFIX: &str = "a2a-";

/// Extension URI a remote agent's capability descriptor must declare to be
/// recognized as speaking the provenance protocol. Matched exactly.
pub const PROVENANCE_EXTENSION_URI: &str = "https://hai.ai/jacs/extensions/provenance/v1";

/// A signed artifact envelope - the unit exchanged between agents.
///
/// Each parent is a full nested envelope, not a reference; the `parents`
/// sequence is the chain-of-custody edge set. An envelope is immutable once
/// signed - verification never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignedEnvelope {
    /// Stable identifier for the logical artifact
    pub artifact_id: String,

    /// Changes on every re-sign
    pub artifact_version: String,

    /// Namespaced type tag, e.g. "a2a-task"
    pub artifact_type: String,

    /// Signing timestamp
    pub created_at: DateTime<Utc>,

    /// Wrapped application data, opaque to the verifier
    pub payload: serde_json::Value,

    /// Present only after signing; absent on malformed input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<EnvelopeSignature>,

    /// Ancestor envelopes, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<SignedEnvelope>,
}

impl SignedEnvelope {
    /// Check whether the envelope carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Signer identity, if the envelope is signed.
    pub fn signer_id(&self) -> Option<&str> {
        self.signature.as_ref().map(|s| s.signer_id.as_str())
    }
}

/// Signature block attached to an envelope by the signing agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeSignature {
    pub signer_id: String,
    pub signer_version: String,

    /// Signature value, e.g. "ed25519:<base64>"
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_hash: Option<String>,
}

/// Outcome of verifying one envelope and (transitively) its ancestry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Cryptographic outcome for this node only
    pub valid: bool,

    /// Identity recovered from the signature, or "unknown" if absent
    pub signer_id: String,
    pub signer_version: String,

    /// Echoed from the envelope
    pub artifact_type: String,
    pub timestamp: DateTime<Utc>,

    /// Present only when the verify primitive returned a structured result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_payload: Option<serde_json::Map<String, serde_json::Value>>,

    /// Per-parent summaries, in the envelope's parent order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_results: Option<Vec<ParentVerification>>,

    /// True only if this node and every reachable ancestor validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_valid: Option<bool>,

    /// Attached at the root of a verification call only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_assessment: Option<TrustAssessment>,
}

/// Summary of one parent's verification within a [`VerificationResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentVerification {
    /// Position in the child's `parents` sequence
    pub index: usize,

    pub artifact_id: String,

    /// The parent's own cryptographic outcome
    pub valid: bool,

    /// Whether the parent's full ancestry validated
    pub parent_chain_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trust strength, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Untrusted,
    JacsRegistered,
    Trusted,
}

/// Outcome of evaluating a counterparty against the configured policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrustAssessment {
    pub allowed: bool,
    pub trust_level: TrustLevel,

    /// Whether the counterparty declares the provenance extension
    pub extension_declared: bool,

    /// Whether the identity is present in the local trust store
    pub in_trust_store: bool,

    /// Justification, mandatory on every outcome including denials
    pub reason: String,
}

/// Configured strictness governing whether an unfamiliar signer is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrustPolicy {
    Open,
    #[default]
    Verified,
    Strict,
}

impl TrustPolicy {
    /// Parse a policy name as it appears in configuration.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "open" => Some(Self::Open),
            "verified" => Some(Self::Verified),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Verified => "verified",
            Self::Strict => "strict",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf_envelope() -> SignedEnvelope {
        SignedEnvelope {
            artifact_id: "art-1".to_string(),
            artifact_version: "v-1".to_string(),
            artifact_type: "a2a-task".to_string(),
            created_at: Utc::now(),
            payload: json!({"instruction": "summarize"}),
            signature: Some(EnvelopeSignature {
                signer_id: "agent-a".to_string(),
                signer_version: "1".to_string(),
                value: "ed25519:AAAA".to_string(),
                algorithm: Some("ed25519".to_string()),
                public_key_hash: None,
            }),
            parents: vec![],
        }
    }

    #[test]
    fn test_envelope_serialization_roundtrip() {
        let mut envelope = leaf_envelope();
        envelope.parents = vec![leaf_envelope()];

        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: SignedEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope, parsed);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = serde_json::to_value(leaf_envelope()).unwrap();
        assert!(json.get("artifactId").is_some());
        assert!(json.get("artifactVersion").is_some());
        assert!(json.get("artifactType").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["signature"].get("signerId").is_some());
        assert!(json["signature"].get("signerVersion").is_some());
    }

    #[test]
    fn test_empty_parents_omitted_from_wire() {
        let json = serde_json::to_value(leaf_envelope()).unwrap();
        assert!(json.get("parents").is_none());
    }

    #[test]
    fn test_unsigned_envelope_omits_signature() {
        let mut envelope = leaf_envelope();
        envelope.signature = None;

        assert!(!envelope.is_signed());
        assert_eq!(envelope.signer_id(), None);

        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("signature").is_none());
    }

    #[test]
    fn test_parents_default_when_absent() {
        let json = r#"{
            "artifactId": "a",
            "artifactVersion": "v",
            "artifactType": "a2a-task",
            "createdAt": "2025-06-01T00:00:00Z",
            "payload": {}
        }"#;
        let envelope: SignedEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.parents.is_empty());
        assert!(envelope.signature.is_none());
    }

    #[test]
    fn test_trust_level_serialization() {
        assert_eq!(
            serde_json::to_string(&TrustLevel::JacsRegistered).unwrap(),
            "\"jacs_registered\""
        );
        assert_eq!(
            serde_json::to_string(&TrustLevel::Trusted).unwrap(),
            "\"trusted\""
        );
        assert_eq!(
            serde_json::to_string(&TrustLevel::Untrusted).unwrap(),
            "\"untrusted\""
        );
    }

    #[test]
    fn test_trust_level_ordering() {
        assert!(TrustLevel::Trusted > TrustLevel::JacsRegistered);
        assert!(TrustLevel::JacsRegistered > TrustLevel::Untrusted);
    }

    #[test]
    fn test_trust_policy_default() {
        assert_eq!(TrustPolicy::default(), TrustPolicy::Verified);
    }

    #[test]
    fn test_trust_policy_parse() {
        assert_eq!(TrustPolicy::parse("open"), Some(TrustPolicy::Open));
        assert_eq!(TrustPolicy::parse("verified"), Some(TrustPolicy::Verified));
        assert_eq!(TrustPolicy::parse("strict"), Some(TrustPolicy::Strict));
        assert_eq!(TrustPolicy::parse("paranoid"), None);
    }

    #[test]
    fn test_verification_result_optionals_omitted() {
        let result = VerificationResult {
            valid: true,
            signer_id: "agent-a".to_string(),
            signer_version: "1".to_string(),
            artifact_type: "a2a-task".to_string(),
            timestamp: Utc::now(),
            recovered_payload: None,
            parent_results: None,
            chain_valid: None,
            trust_assessment: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("recoveredPayload").is_none());
        assert!(json.get("parentResults").is_none());
        assert!(json.get("chainValid").is_none());
        assert!(json.get("trustAssessment").is_none());
    }
}
