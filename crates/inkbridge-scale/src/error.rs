//! SCALE codec errors

use thiserror::Error;

/// SCALE encoding/decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    /// Error reported by the codec
    #[error("{0}")]
    Codec(String),

    /// Input ended before a raw read was complete
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes required by the read
        needed: usize,
        /// Bytes left in the input
        remaining: usize,
    },
}

impl From<parity_scale_codec::Error> for ScaleError {
    fn from(e: parity_scale_codec::Error) -> Self {
        ScaleError::Codec(e.to_string())
    }
}
