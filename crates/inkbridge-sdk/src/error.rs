//! SDK error types

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Coarse classification of an [`SdkError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Metadata could not be fetched or a wallet extension could not be enabled
    ResourceUnavailable,
    /// No signer exists for the requested extension source
    SignerUnavailable,
    /// The contract rejected the call
    Contract,
    /// Node, RPC or wire failure
    Transport,
    /// Caller mistake detected before anything was dispatched
    InvalidInput,
}

/// Which layer of the contract runtime rejected a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    /// The runtime refused to execute the message (`DispatchError`)
    Dispatch,
    /// The message executed and reverted
    Reverted,
    /// The ink! dispatcher rejected the input (`LangError`)
    Lang,
}

impl fmt::Display for ContractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractErrorKind::Dispatch => write!(f, "dispatch error"),
            ContractErrorKind::Reverted => write!(f, "reverted"),
            ContractErrorKind::Lang => write!(f, "language error"),
        }
    }
}

/// A contract-level failure with its decoded value
#[derive(Debug, Clone, PartialEq)]
pub struct ContractError {
    /// Rejecting layer
    pub kind: ContractErrorKind,
    /// Human-readable decoded error value
    pub value: Value,
    /// Debug buffer returned by the node, if non-empty
    pub debug_message: Option<String>,
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)
    }
}

/// SDK error type
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// A static resource or extension could not be obtained
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// No signer for the given extension source
    #[error("No signer available for source '{0}'")]
    SignerUnavailable(String),

    /// Contract rejected the call
    #[error("Contract error: {0}")]
    Contract(ContractError),

    /// Message not present in the contract metadata
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Contract address was empty
    #[error("Contract address is empty")]
    EmptyAddress,

    /// Address could not be decoded
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Payload to sign is not valid JSON
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Argument encoding error
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Response decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Malformed contract metadata
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Signer rejected or failed to sign
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl SdkError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::ResourceUnavailable(_) => ErrorKind::ResourceUnavailable,
            SdkError::SignerUnavailable(_) => ErrorKind::SignerUnavailable,
            SdkError::Contract(_) => ErrorKind::Contract,
            SdkError::UnknownFunction(_)
            | SdkError::EmptyAddress
            | SdkError::InvalidPayload(_)
            | SdkError::Encode(_) => ErrorKind::InvalidInput,
            SdkError::Transport(_)
            | SdkError::Rpc { .. }
            | SdkError::InvalidAddress(_)
            | SdkError::Decode(_)
            | SdkError::Metadata(_)
            | SdkError::SigningFailed(_)
            | SdkError::Serialization(_)
            | SdkError::InvalidHex(_) => ErrorKind::Transport,
        }
    }

    /// The contract failure, if this is one
    pub fn as_contract_error(&self) -> Option<&ContractError> {
        match self {
            SdkError::Contract(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<inkbridge_scale::ScaleError> for SdkError {
    fn from(e: inkbridge_scale::ScaleError) -> Self {
        SdkError::Decode(e.to_string())
    }
}

impl From<inkbridge_scale::Error> for SdkError {
    fn from(e: inkbridge_scale::Error) -> Self {
        SdkError::Decode(e.to_string())
    }
}

impl From<inkbridge_primitives::AccountError> for SdkError {
    fn from(e: inkbridge_primitives::AccountError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<inkbridge_primitives::HashError> for SdkError {
    fn from(e: inkbridge_primitives::HashError) -> Self {
        SdkError::Decode(e.to_string())
    }
}
