//! Two-dimensional execution weight

use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use std::fmt;

/// Resource bound enforced by the chain on contract execution.
///
/// `ref_time` bounds computation (picoseconds of reference hardware time),
/// `proof_size` bounds the storage proof a validator has to ship. Both
/// components are compact on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode, MaxEncodedLen)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Weight {
    /// Computational bound
    #[codec(compact)]
    pub ref_time: u64,
    /// Proof-size bound in bytes
    #[codec(compact)]
    pub proof_size: u64,
}

impl Weight {
    /// Zero weight
    pub const ZERO: Weight = Weight {
        ref_time: 0,
        proof_size: 0,
    };

    /// Create a weight from its two components
    pub const fn from_parts(ref_time: u64, proof_size: u64) -> Self {
        Self {
            ref_time,
            proof_size,
        }
    }

    /// Returns `true` if both components fit within `limit`
    pub fn all_lte(&self, limit: &Weight) -> bool {
        self.ref_time <= limit.ref_time && self.proof_size <= limit.proof_size
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ref_time: {}, proof_size: {}}}", self.ref_time, self.proof_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_all_lte() {
        let limit = Weight::from_parts(100, 10);
        assert!(Weight::from_parts(100, 10).all_lte(&limit));
        assert!(!Weight::from_parts(101, 1).all_lte(&limit));
        assert!(!Weight::from_parts(1, 11).all_lte(&limit));
        assert!(Weight::ZERO.all_lte(&limit));
    }

    #[test]
    fn test_weight_display() {
        let w = Weight::from_parts(5, 6);
        assert_eq!(w.to_string(), "{ref_time: 5, proof_size: 6}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_weight_serde_camel_case() {
        let w = Weight::from_parts(5, 6);
        let json = serde_json::to_value(w).unwrap();
        assert_eq!(json, serde_json::json!({"refTime": 5, "proofSize": 6}));
        assert_eq!(serde_json::from_value::<Weight>(json).unwrap(), w);
    }
}
