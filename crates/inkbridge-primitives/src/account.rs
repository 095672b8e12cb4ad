//! 32-byte account identifier with SS58 address encoding

use blake2::{Blake2b512, Digest};
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Generic Substrate SS58 address prefix
pub const SUBSTRATE_SS58_PREFIX: u16 = 42;

const SS58_HASH_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;

/// Account parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Not valid base58
    #[error("invalid base58: {0}")]
    InvalidBase58(String),
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid account length: {0} bytes")]
    InvalidLength(usize),
    /// Reserved or malformed address prefix
    #[error("invalid ss58 prefix byte: {0:#04x}")]
    InvalidPrefix(u8),
    /// Checksum does not match the payload
    #[error("invalid ss58 checksum")]
    InvalidChecksum,
}

/// Account identifier (public key bytes)
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Encode, Decode, MaxEncodedLen,
)]
pub struct AccountId32([u8; 32]);

impl AccountId32 {
    /// Size of an account id in bytes
    pub const LEN: usize = 32;

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId32(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AccountError> {
        if slice.len() != Self::LEN {
            return Err(AccountError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(AccountId32(bytes))
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AccountError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AccountError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Decode an SS58 address, returning the account and its network prefix
    pub fn from_ss58check_with_version(s: &str) -> Result<(Self, u16), AccountError> {
        let data = bs58::decode(s)
            .into_vec()
            .map_err(|e| AccountError::InvalidBase58(e.to_string()))?;
        if data.len() < 2 {
            return Err(AccountError::InvalidLength(data.len()));
        }

        let (prefix_len, ident) = match data[0] {
            0..=63 => (1, data[0] as u16),
            64..=127 => {
                // two-byte prefix: 6 low bits of the identifier live in the
                // first byte, the remaining 8 are split across the second
                let lower = (data[0] << 2) | (data[1] >> 6);
                let upper = data[1] & 0b0011_1111;
                (2, (lower as u16) | ((upper as u16) << 8))
            }
            other => return Err(AccountError::InvalidPrefix(other)),
        };

        let body_len = prefix_len + Self::LEN;
        if data.len() != body_len + CHECKSUM_LEN {
            return Err(AccountError::InvalidLength(data.len()));
        }

        let hash = ss58_hash(&data[..body_len]);
        if data[body_len..] != hash[..CHECKSUM_LEN] {
            return Err(AccountError::InvalidChecksum);
        }

        let account = Self::from_slice(&data[prefix_len..body_len])?;
        Ok((account, ident))
    }

    /// Decode an SS58 address with any network prefix
    pub fn from_ss58check(s: &str) -> Result<Self, AccountError> {
        Self::from_ss58check_with_version(s).map(|(account, _)| account)
    }

    /// Encode as SS58 address for the given network prefix
    pub fn to_ss58check_with_version(&self, version: u16) -> String {
        // identifiers are 14 bits wide
        let ident = version & 0b0011_1111_1111_1111;
        let mut data = if ident < 64 {
            vec![ident as u8]
        } else {
            let first = ((ident & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((ident >> 8) as u8) | (((ident & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first | 0b0100_0000, second]
        };
        data.extend_from_slice(&self.0);
        let hash = ss58_hash(&data);
        data.extend_from_slice(&hash[..CHECKSUM_LEN]);
        bs58::encode(data).into_string()
    }

    /// Encode as SS58 address using the generic Substrate prefix
    pub fn to_ss58check(&self) -> String {
        self.to_ss58check_with_version(SUBSTRATE_SS58_PREFIX)
    }
}

fn ss58_hash(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_HASH_PREFIX);
    hasher.update(data);
    hasher.finalize().to_vec()
}

impl fmt::Debug for AccountId32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId32({})", self.to_ss58check())
    }
}

impl fmt::Display for AccountId32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ss58check())
    }
}

impl FromStr for AccountId32 {
    type Err = AccountError;

    /// Accepts an SS58 address or a 0x-prefixed hex public key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Self::from_hex(s)
        } else {
            Self::from_ss58check(s)
        }
    }
}

impl From<[u8; 32]> for AccountId32 {
    fn from(bytes: [u8; 32]) -> Self {
        AccountId32(bytes)
    }
}

impl AsRef<[u8]> for AccountId32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for AccountId32 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_ss58check())
        }
    }

    impl<'de> Deserialize<'de> for AccountId32 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        }
    }
}
