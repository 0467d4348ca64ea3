//! # Custody Core
//!
//! Data model and validation for signed artifact chain-of-custody envelopes.
//!
//! This crate provides:
//! - The envelope exchanged between agents and its verification-result tree
//! - Trust assessment and policy types
//! - Structural wire validation
//!
//! ## Example
//!
//! ```rust,ignore
//! use custody_core::{SignedEnvelope, validate_envelope};
//!
//! // Parse an envelope received from a peer
//! let envelope: SignedEnvelope = serde_json::from_str(json)?;
//!
//! // Validate structure before handing it to the chain verifier
//! validate_envelope(&envelope)?;
//! ```

pub mod error;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use error::*;
pub use types::*;
pub use validation::*;
