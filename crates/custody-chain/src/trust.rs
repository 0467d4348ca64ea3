//! Trust assessment - decide whether a counterparty is acceptable.
//!
//! Two evidence sources feed the decision: whether the counterparty's
//! capability descriptor declares the provenance extension, and whether its
//! identity sits in the local trust store. The configured policy maps that
//! evidence onto an allow/deny outcome with a mandatory reason, failing
//! closed on a policy value it does not recognize.

use custody_core::{TrustAssessment, TrustLevel, TrustPolicy, PROVENANCE_EXTENSION_URI};
use serde_json::Value;

use crate::store::TrustStore;

/// Policy as configured, retaining unrecognized values so they deny with a
/// reason instead of silently defaulting open.
#[derive(Debug, Clone)]
enum ConfiguredPolicy {
    Known(TrustPolicy),
    Unknown(String),
}

/// Evaluates counterparties against a trust policy and a trust store.
///
/// The policy is fixed for the lifetime of the assessor; the store is an
/// externally-owned read path and is never mutated here.
pub struct TrustAssessor<'a, S: TrustStore> {
    store: &'a S,
    policy: ConfiguredPolicy,
}

impl<'a, S: TrustStore> TrustAssessor<'a, S> {
    pub fn new(store: &'a S, policy: TrustPolicy) -> Self {
        Self {
            store,
            policy: ConfiguredPolicy::Known(policy),
        }
    }

    /// Build an assessor from a configured policy name. An unrecognized
    /// name is retained and denies every assessment.
    pub fn from_policy_name(store: &'a S, name: &str) -> Self {
        let policy = match TrustPolicy::parse(name) {
            Some(policy) => ConfiguredPolicy::Known(policy),
            None => ConfiguredPolicy::Unknown(name.to_string()),
        };
        Self { store, policy }
    }

    /// The configured policy, if it was recognized.
    pub fn policy(&self) -> Option<TrustPolicy> {
        match &self.policy {
            ConfiguredPolicy::Known(policy) => Some(*policy),
            ConfiguredPolicy::Unknown(_) => None,
        }
    }

    /// Assess a remote agent's published capability descriptor.
    pub fn assess(&self, descriptor: &Value) -> TrustAssessment {
        let extension_declared = declares_provenance_extension(descriptor);
        let in_trust_store = descriptor_identity(descriptor)
            .map(|id| self.store.is_trusted(id))
            .unwrap_or(false);
        self.decide(extension_declared, in_trust_store)
    }

    /// Assess a signer identity recovered from a verified custody chain.
    ///
    /// A chain-verified signature is itself proof the counterparty speaks
    /// the provenance protocol, so it stands in for the descriptor's
    /// extension declaration.
    pub fn assess_signer(&self, signer_id: &str) -> TrustAssessment {
        let identified = !signer_id.is_empty() && signer_id != "unknown";
        let extension_declared = identified;
        let in_trust_store = identified && self.store.is_trusted(signer_id);
        self.decide(extension_declared, in_trust_store)
    }

    fn decide(&self, extension_declared: bool, in_trust_store: bool) -> TrustAssessment {
        let assessment = |allowed, trust_level, reason: String| TrustAssessment {
            allowed,
            trust_level,
            extension_declared,
            in_trust_store,
            reason,
        };

        let policy = match &self.policy {
            ConfiguredPolicy::Known(policy) => *policy,
            ConfiguredPolicy::Unknown(name) => {
                return assessment(
                    false,
                    TrustLevel::Untrusted,
                    format!("unknown trust policy '{}', denying", name),
                );
            }
        };

        let earned_level = if in_trust_store {
            TrustLevel::Trusted
        } else if extension_declared {
            TrustLevel::JacsRegistered
        } else {
            TrustLevel::Untrusted
        };

        match policy {
            TrustPolicy::Open => assessment(
                true,
                earned_level,
                "open policy admits every counterparty".to_string(),
            ),
            TrustPolicy::Verified if extension_declared => assessment(
                true,
                earned_level,
                "provenance extension declared, accepted under verified policy".to_string(),
            ),
            TrustPolicy::Verified => assessment(
                false,
                TrustLevel::Untrusted,
                "verified policy requires the provenance extension".to_string(),
            ),
            TrustPolicy::Strict if in_trust_store => assessment(
                true,
                TrustLevel::Trusted,
                "identity present in the local trust store".to_string(),
            ),
            TrustPolicy::Strict => assessment(
                false,
                earned_level,
                "strict policy requires trust store membership".to_string(),
            ),
        }
    }
}

/// Exact-match scan of the descriptor's declared extension list. Absence or
/// a non-list shape yields false.
fn declares_provenance_extension(descriptor: &Value) -> bool {
    descriptor
        .get("capabilities")
        .and_then(|capabilities| capabilities.get("extensions"))
        .and_then(Value::as_array)
        .map(|extensions| {
            extensions.iter().any(|extension| {
                extension.get("uri").and_then(Value::as_str) == Some(PROVENANCE_EXTENSION_URI)
            })
        })
        .unwrap_or(false)
}

/// Identity used for the trust-store lookup: `agentId`, else `name`.
fn descriptor_identity(descriptor: &Value) -> Option<&str> {
    descriptor
        .get("agentId")
        .or_else(|| descriptor.get("name"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}
