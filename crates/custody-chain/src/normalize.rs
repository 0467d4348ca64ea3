//! Result normalization for the verify primitive's two return shapes.
//!
//! Signing backends are not uniform: some return a bare boolean, others a
//! structured result carrying the recovered payload. This module is the
//! single place that encodes the reconciliation contract, so the chain
//! verifier stays shape-agnostic.

use custody_crypto::RawVerification;
use serde_json::{Map, Value};

/// Canonical outcome of one raw verification.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub valid: bool,
    pub recovered_payload: Option<Map<String, Value>>,
}

/// Fold a raw backend outcome into the canonical shape.
///
/// A structured result counts as a successful verification by the backend
/// contract (backends error rather than return a negative structure); its
/// `payload` field is recovered when it is itself an object. A structured
/// result that is not an object (null, string, array) is treated as invalid.
pub fn normalize(raw: RawVerification) -> Normalized {
    match raw {
        RawVerification::Flag(valid) => Normalized {
            valid,
            recovered_payload: None,
        },
        RawVerification::Structured(Value::Object(fields)) => {
            let recovered_payload = match fields.get("payload") {
                Some(Value::Object(payload)) => Some(payload.clone()),
                _ => None,
            };
            Normalized {
                valid: true,
                recovered_payload,
            }
        }
        RawVerification::Structured(_) => Normalized {
            valid: false,
            recovered_payload: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_passthrough() {
        let yes = normalize(RawVerification::Flag(true));
        assert!(yes.valid);
        assert!(yes.recovered_payload.is_none());

        let no = normalize(RawVerification::Flag(false));
        assert!(!no.valid);
        assert!(no.recovered_payload.is_none());
    }

    #[test]
    fn test_structured_with_payload() {
        let raw = RawVerification::Structured(json!({"payload": {"x": 1}}));
        let normalized = normalize(raw);

        assert!(normalized.valid);
        let payload = normalized.recovered_payload.unwrap();
        assert_eq!(payload["x"], 1);
    }

    #[test]
    fn test_structured_without_object_payload() {
        for raw in [
            json!({}),
            json!({"payload": "not an object"}),
            json!({"payload": [1, 2]}),
            json!({"payload": null}),
        ] {
            let normalized = normalize(RawVerification::Structured(raw));
            assert!(normalized.valid);
            assert!(normalized.recovered_payload.is_none());
        }
    }

    #[test]
    fn test_garbage_shapes_invalid() {
        for raw in [json!(null), json!("garbage"), json!(42), json!([true])] {
            let normalized = normalize(RawVerification::Structured(raw));
            assert!(!normalized.valid);
            assert!(normalized.recovered_payload.is_none());
        }
    }
}
