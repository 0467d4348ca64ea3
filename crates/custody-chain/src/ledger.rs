//! Chain-of-custody reporting - flatten signed envelopes into audit records.

use chrono::{DateTime, Utc};
use custody_core::SignedEnvelope;
use custody_crypto::sha256_hex;
use serde::{Deserialize, Serialize};

/// One audit-ledger row for a signed envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustodyRecord {
    pub artifact_id: String,
    pub artifact_type: String,
    pub timestamp: DateTime<Utc>,
    pub signer_id: String,
    pub signer_version: String,

    /// SHA-256 of the signature value, so the ledger references the
    /// signature without reproducing it
    pub signature_hash: String,
}

/// Flatten a sequence of envelopes into ledger records, preserving order.
/// Unsigned envelopes are skipped; they have no custody to report.
pub fn custody_ledger(envelopes: &[SignedEnvelope]) -> Vec<CustodyRecord> {
    envelopes
        .iter()
        .filter_map(|envelope| {
            let signature = envelope.signature.as_ref()?;
            Some(CustodyRecord {
                artifact_id: envelope.artifact_id.clone(),
                artifact_type: envelope.artifact_type.clone(),
                timestamp: envelope.created_at,
                signer_id: signature.signer_id.clone(),
                signer_version: signature.signer_version.clone(),
                signature_hash: sha256_hex(signature.value.as_bytes()),
            })
        })
        .collect()
}
