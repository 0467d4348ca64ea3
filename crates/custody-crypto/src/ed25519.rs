//! Ed25519 signing backend.
//!
//! The default [`CryptoProvider`] implementation. Signing bytes are the
//! canonical serialization of the envelope body with the `signature` field
//! stripped, so verification is stable across key orderings and transports.
//!
//! # Example
//!
//! ```
//! use custody_crypto::{CryptoProvider, Ed25519Provider, RawVerification};
//! use serde_json::json;
//!
//! let provider = Ed25519Provider::generate();
//!
//! let body = json!({"artifactId": "a1", "payload": {"x": 1}});
//! let signed = provider.sign(&body).expect("signing failed");
//!
//! match provider.verify(&signed).expect("verify failed") {
//!     RawVerification::Structured(_) => {}
//!     RawVerification::Flag(ok) => assert!(ok),
//! }
//! ```

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::canonical::{canonical_bytes, sha256_hex};
use crate::provider::{CryptoError, CryptoProvider, RawVerification};

/// Ed25519 keypair for signing envelopes.
#[derive(Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Build a keypair from a base64-encoded secret key.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let seed = decode_key_bytes(encoded)?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the secret key as base64.
    pub fn secret_key_base64(&self) -> String {
        BASE64.encode(self.signing_key.to_bytes())
    }

    /// The verifying half of this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Sign raw bytes, producing a signature in "ed25519:<base64>" form.
    pub fn sign_bytes(&self, data: &[u8]) -> String {
        let signature = self.signing_key.sign(data);
        format!("ed25519:{}", BASE64.encode(signature.to_bytes()))
    }
}

/// Public key for verifying envelope signatures.
#[derive(Debug, Clone)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Build from a base64-encoded public key.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = decode_key_bytes(encoded)?;
        let verifying_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {}", e)))?;
        Ok(Self { verifying_key })
    }

    /// Export as base64.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.verifying_key.to_bytes())
    }

    /// Short stable identifier: leading 8 bytes of the key's SHA-256, hex.
    pub fn id(&self) -> String {
        let digest = sha256_hex(self.verifying_key.as_bytes());
        digest[..16].to_string()
    }

    /// Full SHA-256 of the key bytes, hex.
    pub fn fingerprint(&self) -> String {
        sha256_hex(self.verifying_key.as_bytes())
    }

    /// Check a "ed25519:<base64>" signature over raw bytes.
    pub fn verify_bytes(&self, data: &[u8], signature: &str) -> Result<(), CryptoError> {
        let sig_bytes = decode_signature(signature)?;
        self.verifying_key
            .verify(data, &Signature::from_bytes(&sig_bytes))
            .map_err(|_| CryptoError::InvalidSignature("signature verification failed".to_string()))
    }
}

fn decode_key_bytes(encoded: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidKey(format!("invalid base64: {}", e)))?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| CryptoError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))
}

/// Decode a signature string in "ed25519:<base64>" form.
fn decode_signature(signature: &str) -> Result<[u8; 64], CryptoError> {
    let encoded = signature.strip_prefix("ed25519:").ok_or_else(|| {
        CryptoError::InvalidSignature("expected format 'ed25519:<base64>'".to_string())
    })?;

    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidSignature(format!("invalid base64: {}", e)))?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            CryptoError::InvalidSignature(format!("expected 64 bytes, got {}", bytes.len()))
        })
}

/// A signing backend holding one keypair plus the public keys of known peers.
///
/// Envelopes signed by an unknown signer verify negative rather than
/// erroring, matching the backend contract the chain verifier relies on.
pub struct Ed25519Provider {
    keypair: KeyPair,
    signer_id: String,
    signer_version: String,
    peers: HashMap<String, PublicKey>,
}

impl Ed25519Provider {
    /// Wrap an existing keypair.
    pub fn new(keypair: KeyPair) -> Self {
        let signer_id = keypair.public_key().id();
        Self {
            keypair,
            signer_id,
            signer_version: Uuid::new_v4().to_string(),
            peers: HashMap::new(),
        }
    }

    /// Generate a fresh keypair and wrap it.
    pub fn generate() -> Self {
        Self::new(KeyPair::generate())
    }

    pub fn signer_id(&self) -> &str {
        &self.signer_id
    }

    pub fn signer_version(&self) -> &str {
        &self.signer_version
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Register a peer's public key under its signer id.
    pub fn register_peer(&mut self, signer_id: impl Into<String>, key: PublicKey) {
        self.peers.insert(signer_id.into(), key);
    }

    fn key_for(&self, signer_id: &str) -> Option<PublicKey> {
        if signer_id == self.signer_id {
            return Some(self.keypair.public_key());
        }
        self.peers.get(signer_id).cloned()
    }
}

impl CryptoProvider for Ed25519Provider {
    fn sign(&self, body: &Value) -> Result<String, CryptoError> {
        let Value::Object(map) = body else {
            return Err(CryptoError::Malformed(
                "envelope body must be a JSON object".to_string(),
            ));
        };

        let mut signed = map.clone();
        signed.remove("signature");

        let bytes = canonical_bytes(&Value::Object(signed.clone()));
        let value = self.keypair.sign_bytes(&bytes);

        signed.insert(
            "signature".to_string(),
            json!({
                "signerId": self.signer_id,
                "signerVersion": self.signer_version,
                "value": value,
                "algorithm": "ed25519",
                "publicKeyHash": self.keypair.public_key().fingerprint(),
            }),
        );

        Ok(serde_json::to_string(&Value::Object(signed))?)
    }

    fn verify(&self, envelope: &str) -> Result<RawVerification, CryptoError> {
        let parsed: Value = serde_json::from_str(envelope)
            .map_err(|e| CryptoError::Malformed(format!("unparseable envelope: {}", e)))?;

        let Value::Object(mut map) = parsed else {
            return Err(CryptoError::Malformed(
                "envelope must be a JSON object".to_string(),
            ));
        };

        let Some(signature) = map.remove("signature") else {
            return Ok(RawVerification::Flag(false));
        };

        let (Some(signer_id), Some(value)) = (
            signature.get("signerId").and_then(Value::as_str),
            signature.get("value").and_then(Value::as_str),
        ) else {
            return Ok(RawVerification::Flag(false));
        };

        let Some(key) = self.key_for(signer_id) else {
            return Ok(RawVerification::Flag(false));
        };

        let bytes = canonical_bytes(&Value::Object(map.clone()));
        if key.verify_bytes(&bytes, value).is_err() {
            return Ok(RawVerification::Flag(false));
        }

        let payload = match map.get("payload") {
            Some(p @ Value::Object(_)) => p.clone(),
            _ => Value::Object(map),
        };
        Ok(RawVerification::Structured(json!({ "payload": payload })))
    }
}
