//! # inkbridge-scale
//!
//! SCALE (Simple Concatenated Aggregate Little-Endian) encoding/decoding for
//! inkbridge.
//!
//! Wraps the `parity-scale-codec` crate; the primitive types carry derived
//! codec impls in `inkbridge-primitives`.
//!
//! ## Encoding Rules
//!
//! - Fixed-width integers: little-endian, no length prefix
//! - `bool`: `0x00` / `0x01`
//! - `Option<T>`: `0x00` for `None`, `0x01` + value for `Some`
//! - Sequences and strings: compact length + items
//! - Compact integers: two low bits select the mode
//!   - `0b00`: single byte, values `< 2^6`
//!   - `0b01`: two bytes, values `< 2^14`
//!   - `0b10`: four bytes, values `< 2^30`
//!   - `0b11`: big-integer mode, upper six bits hold `byte_len - 4`

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;

pub use error::ScaleError;

// Re-export the codec crate for direct use
pub use parity_scale_codec::{
    Compact, CompactLen, Decode, DecodeAll, Encode, Error, Input, MaxEncodedLen, Output,
};

// Re-export primitives with SCALE support
pub use inkbridge_primitives::{AccountId32, Weight, H256};

/// Encode a value to SCALE bytes
pub fn encode<T: Encode>(value: &T) -> Vec<u8> {
    value.encode()
}

/// Decode a value from the front of `data`; trailing bytes are left unread
pub fn decode<T: Decode>(data: &[u8]) -> Result<T, ScaleError> {
    Ok(T::decode(&mut &data[..])?)
}

/// Decode a value that must consume all of `data`
pub fn decode_all<T: Decode>(data: &[u8]) -> Result<T, ScaleError> {
    Ok(T::decode_all(&mut &data[..])?)
}

/// Helpers for readers that walk a byte slice by hand
pub mod utils {
    use super::*;

    /// Append the compact encoding of `value`
    pub fn encode_compact(value: u128, dest: &mut Vec<u8>) {
        Compact(value).encode_to(dest);
    }

    /// Length of the compact encoding of `value`
    pub fn compact_len(value: u128) -> usize {
        Compact::<u128>::compact_len(&value)
    }

    /// Read a compact integer from the front of `input`
    pub fn decode_compact(input: &mut &[u8]) -> Result<u128, ScaleError> {
        Ok(Compact::<u128>::decode(input)?.0)
    }

    /// Read a compact length prefix
    pub fn read_length(input: &mut &[u8]) -> Result<usize, ScaleError> {
        let len = Compact::<u32>::decode(input)?.0;
        Ok(len as usize)
    }

    /// Split `len` raw bytes off the front of `input`
    pub fn read_bytes<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], ScaleError> {
        if input.len() < len {
            return Err(ScaleError::UnexpectedEof {
                needed: len,
                remaining: input.len(),
            });
        }
        let (head, tail) = input.split_at(len);
        *input = tail;
        Ok(head)
    }
}
