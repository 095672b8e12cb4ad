//! Block and extrinsic hashes

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use std::fmt;
use thiserror::Error;

type Blake2b256 = Blake2b<U32>;

/// Hash parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Text lacks the `0x` prefix nodes put on every hash
    #[error("hash must be 0x-prefixed: {0}")]
    MissingPrefix(String),
    /// Not hex after the prefix
    #[error("invalid hex in hash: {0}")]
    InvalidHex(String),
    /// Decoded to the wrong number of bytes
    #[error("hash is {0} bytes, expected 32")]
    InvalidLength(usize),
}

/// Blake2b-256 digest naming a block or an extrinsic.
///
/// The genesis hash pins a signature to one chain. The extrinsic hash is what
/// `author_submitExtrinsic` answers with, and [`H256::of_extrinsic`] derives
/// the same value from the submitted bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode, MaxEncodedLen)]
pub struct H256([u8; 32]);

impl H256 {
    /// All-zero hash
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Blake2b-256 of `data`
    pub fn blake2_256(data: &[u8]) -> Self {
        H256(Blake2b256::digest(data).into())
    }

    /// Hash of an encoded extrinsic, length prefix included
    pub fn of_extrinsic(extrinsic: &[u8]) -> Self {
        Self::blake2_256(extrinsic)
    }

    /// Parse the `0x`-prefixed hex form used over RPC
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| HashError::MissingPrefix(s.to_string()))?;
        let bytes = hex::decode(digits).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength(bytes.len()))?;
        Ok(H256(bytes))
    }

    /// Raw digest
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

// keeps log lines short; Display gives the full hash
impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}..{}",
            hex::encode(&self.0[..4]),
            hex::encode(&self.0[28..])
        )
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for H256 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for H256 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            H256::from_hex(&s).map_err(serde::de::Error::custom)
        }
    }
}
