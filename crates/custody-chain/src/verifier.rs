//! Chain-of-custody verification - traverse an envelope's ancestry.
//!
//! # Concept
//!
//! An envelope carries its ancestor envelopes in full:
//!
//! ```text
//! Result "review" signed by agent-c
//!   └─ parent: Task "translate" signed by agent-b
//!        └─ parent: Task "ingest" signed by agent-a
//! ```
//!
//! Verification answers: "Does every hop of this custody chain carry a valid
//! signature?" The traversal is depth-first and total - adversarial input
//! (cycles, forged ancestry, missing signatures) produces a failed result
//! tree, never an error or a panic.

use std::collections::HashSet;

use custody_core::{ParentVerification, SignedEnvelope, VerificationResult};
use custody_crypto::CryptoProvider;
use serde_json::{Map, Value};

use crate::error::ChainError;
use crate::normalize::normalize;
use crate::store::TrustStore;
use crate::trust::TrustAssessor;

/// Configuration for chain verification.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Maximum ancestry depth before rejecting with a too-deep failure.
    /// Chains are attacker-supplied, so the bound guards against resource
    /// exhaustion.
    pub max_depth: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl VerifierConfig {
    /// Set the maximum ancestry depth.
    pub fn max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }
}

/// Verifies envelopes and their ancestor chains against a signing backend.
pub struct ChainVerifier<'a, P: CryptoProvider> {
    provider: &'a P,
    config: VerifierConfig,
}

/// Per-node outcome threaded up the recursion: the result plus the failure
/// description a parent entry needs when this node did not validate.
struct NodeOutcome {
    result: VerificationResult,
    error: Option<String>,
}

impl<'a, P: CryptoProvider> ChainVerifier<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            config: VerifierConfig::default(),
        }
    }

    /// Set verification config.
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Verify an envelope and every reachable ancestor.
    ///
    /// Total over arbitrary input: the returned tree's `valid` and
    /// `chain_valid` fields reflect failures instead of raising them. The
    /// envelope is never mutated, and results are computed fresh on every
    /// call - an earlier "valid" outcome is never authoritative for an
    /// envelope presented again.
    pub fn verify_chain(&self, envelope: &SignedEnvelope) -> VerificationResult {
        let mut on_path = HashSet::new();
        match self.verify_node(envelope, &mut on_path, 0) {
            Ok(outcome) => outcome.result,
            // Unreachable with an empty path at depth zero; kept total.
            Err(_) => failed_root(envelope),
        }
    }

    /// Verify a chain and attach a trust assessment of the root signer.
    pub fn verify_chain_trusted<S: TrustStore>(
        &self,
        envelope: &SignedEnvelope,
        assessor: &TrustAssessor<'_, S>,
    ) -> VerificationResult {
        let mut result = self.verify_chain(envelope);
        result.trust_assessment = Some(assessor.assess_signer(&result.signer_id));
        result
    }

    /// Depth-first verification of one node.
    ///
    /// `on_path` holds the artifact ids of the current root-to-node path
    /// only: ids are inserted before descending into parents and removed on
    /// the way back up, so diamond-shaped sharing of an ancestor never
    /// triggers the cycle check. The set belongs to a single top-level call.
    fn verify_node(
        &self,
        envelope: &SignedEnvelope,
        on_path: &mut HashSet<String>,
        depth: usize,
    ) -> Result<NodeOutcome, ChainError> {
        if !envelope.artifact_id.is_empty() && on_path.contains(&envelope.artifact_id) {
            return Err(ChainError::CycleDetected {
                artifact_id: envelope.artifact_id.clone(),
            });
        }
        if depth > self.config.max_depth {
            return Err(ChainError::ChainTooDeep {
                max_depth: self.config.max_depth,
            });
        }

        if !envelope.artifact_id.is_empty() {
            on_path.insert(envelope.artifact_id.clone());
        }

        let (valid, recovered_payload, node_error) = self.check_node(envelope);

        // One bad ancestor must not suppress reporting on its siblings, so
        // every parent failure folds into an entry instead of returning.
        let mut parent_entries = Vec::with_capacity(envelope.parents.len());
        let mut ancestry_valid = true;
        for (index, parent) in envelope.parents.iter().enumerate() {
            match self.verify_node(parent, on_path, depth + 1) {
                Ok(parent_outcome) => {
                    let parent_chain_valid = parent_outcome.result.chain_valid.unwrap_or(true);
                    ancestry_valid &= parent_outcome.result.valid && parent_chain_valid;
                    parent_entries.push(ParentVerification {
                        index,
                        artifact_id: parent.artifact_id.clone(),
                        valid: parent_outcome.result.valid,
                        parent_chain_valid,
                        error: parent_outcome.error,
                    });
                }
                Err(e) => {
                    ancestry_valid = false;
                    parent_entries.push(ParentVerification {
                        index,
                        artifact_id: parent.artifact_id.clone(),
                        valid: false,
                        parent_chain_valid: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        on_path.remove(&envelope.artifact_id);

        let (signer_id, signer_version) = signer_identity(envelope);
        Ok(NodeOutcome {
            result: VerificationResult {
                valid,
                signer_id,
                signer_version,
                artifact_type: envelope.artifact_type.clone(),
                timestamp: envelope.created_at,
                recovered_payload,
                parent_results: (!parent_entries.is_empty()).then_some(parent_entries),
                chain_valid: Some(valid && ancestry_valid),
                trust_assessment: None,
            },
            error: node_error,
        })
    }

    /// Cryptographic check for a single node, via the result normalizer.
    ///
    /// Backend errors and unsigned envelopes become a negative outcome with
    /// a description; nothing here aborts the surrounding traversal.
    fn check_node(
        &self,
        envelope: &SignedEnvelope,
    ) -> (bool, Option<Map<String, Value>>, Option<String>) {
        if !envelope.is_signed() {
            return (false, None, Some("envelope carries no signature".to_string()));
        }

        let serialized = match serde_json::to_string(envelope) {
            Ok(s) => s,
            Err(e) => return (false, None, Some(format!("unserializable envelope: {}", e))),
        };

        match self.provider.verify(&serialized) {
            Ok(raw) => {
                let normalized = normalize(raw);
                let error =
                    (!normalized.valid).then(|| "signature verification failed".to_string());
                (normalized.valid, normalized.recovered_payload, error)
            }
            Err(e) => (false, None, Some(format!("verify primitive failed: {}", e))),
        }
    }
}

fn signer_identity(envelope: &SignedEnvelope) -> (String, String) {
    match &envelope.signature {
        Some(signature) => (signature.signer_id.clone(), signature.signer_version.clone()),
        None => ("unknown".to_string(), "unknown".to_string()),
    }
}

fn failed_root(envelope: &SignedEnvelope) -> VerificationResult {
    let (signer_id, signer_version) = signer_identity(envelope);
    VerificationResult {
        valid: false,
        signer_id,
        signer_version,
        artifact_type: envelope.artifact_type.clone(),
        timestamp: envelope.created_at,
        recovered_payload: None,
        parent_results: None,
        chain_valid: Some(false),
        trust_assessment: None,
    }
}
