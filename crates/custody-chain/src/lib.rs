//! # Custody Chain
//!
//! Chain-of-custody verification and trust assessment for artifacts
//! exchanged between autonomous agents.
//!
//! An agent wraps an artifact into a signed envelope whose `parents` carry
//! the full envelopes of its ancestors. A receiver walks that ancestry,
//! checking every signature through a pluggable crypto backend, and then
//! asks a policy-driven assessor whether the signer should be trusted.
//!
//! # Example
//!
//! ```
//! use custody_chain::{wrap_artifact, ChainVerifier, MemoryTrustStore, TrustAssessor};
//! use custody_core::TrustPolicy;
//! use custody_crypto::Ed25519Provider;
//! use serde_json::json;
//!
//! let provider = Ed25519Provider::generate();
//!
//! // Wrap a task, then wrap a result that cites the task as its parent.
//! let task = wrap_artifact(&provider, json!({"instruction": "translate"}), "task", vec![])
//!     .expect("wrap failed");
//! let result = wrap_artifact(&provider, json!({"output": "hola"}), "result", vec![task])
//!     .expect("wrap failed");
//!
//! // Verify the whole chain and assess the signer.
//! let store = MemoryTrustStore::new();
//! let assessor = TrustAssessor::new(&store, TrustPolicy::Verified);
//! let verdict = ChainVerifier::new(&provider).verify_chain_trusted(&result, &assessor);
//!
//! assert_eq!(verdict.chain_valid, Some(true));
//! assert!(verdict.trust_assessment.unwrap().allowed);
//! ```

pub mod error;
pub mod ledger;
pub mod normalize;
pub mod store;
pub mod trust;
pub mod verifier;
pub mod wrap;

pub use error::*;
pub use ledger::*;
pub use normalize::*;
pub use store::*;
pub use trust::*;
pub use verifier::*;
pub use wrap::*;
