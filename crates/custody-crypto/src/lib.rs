//! # Custody Crypto
//!
//! Signing and verification primitive boundary for custody envelopes.
//!
//! This crate provides:
//! - The [`CryptoProvider`] trait the chain verifier depends on
//! - The two-shaped raw verification outcome ([`RawVerification`])
//! - Canonical JSON serialization and SHA-256 helpers
//! - A concrete Ed25519 backend with peer key registration

mod canonical;
mod ed25519;
mod provider;

pub use canonical::*;
pub use ed25519::*;
pub use provider::*;
