//! Wire types of the contracts runtime API

use inkbridge_primitives::{AccountId32, Balance, Weight};
use inkbridge_scale::{Decode, Encode};
use serde_json::{json, Value};

/// Runtime API function used for dry-run queries
pub const CONTRACTS_API_CALL: &str = "ContractsApi_call";

/// `ReturnFlags` bit set when the contract reverted
pub const FLAG_REVERT: u32 = 0x0000_0001;

/// Arguments of `ContractsApi_call`
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractCallRequest {
    /// Caller account
    pub origin: AccountId32,
    /// Contract account
    pub dest: AccountId32,
    /// Value transferred with the call
    pub value: Balance,
    /// Weight limit; `None` lets the node pick its maximum
    pub gas_limit: Option<Weight>,
    /// Storage deposit limit; `None` means unlimited
    pub storage_deposit_limit: Option<Balance>,
    /// Selector and encoded arguments
    pub input_data: Vec<u8>,
}

/// Storage deposit charged or refunded by a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum StorageDeposit {
    /// Deposit returned to the caller
    Refund(Balance),
    /// Deposit charged from the caller
    Charge(Balance),
}

/// Output of a successfully executed message
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ExecReturnValue {
    /// `ReturnFlags` bits
    pub flags: u32,
    /// SCALE-encoded return value
    pub data: Vec<u8>,
}

impl ExecReturnValue {
    /// Whether the contract reverted its state changes
    pub fn did_revert(&self) -> bool {
        self.flags & FLAG_REVERT != 0
    }
}

/// Error raised by a pallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct ModuleError {
    /// Pallet index
    pub index: u8,
    /// Pallet-specific error bytes
    pub error: [u8; 4],
}

/// Reason the runtime refused to execute a call.
///
/// `Token`, `Arithmetic` and `Transactional` keep the variant index of the
/// nested enum, which is a single byte on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum DispatchError {
    /// Uncategorized error
    #[codec(index = 0)]
    Other,
    /// Failed to look up some data
    #[codec(index = 1)]
    CannotLookup,
    /// Bad origin
    #[codec(index = 2)]
    BadOrigin,
    /// Error raised by a pallet
    #[codec(index = 3)]
    Module(ModuleError),
    /// Account still has consumer references
    #[codec(index = 4)]
    ConsumerRemaining,
    /// Account has no providers
    #[codec(index = 5)]
    NoProviders,
    /// Too many consumers
    #[codec(index = 6)]
    TooManyConsumers,
    /// Token error
    #[codec(index = 7)]
    Token(u8),
    /// Arithmetic error
    #[codec(index = 8)]
    Arithmetic(u8),
    /// Transactional layer error
    #[codec(index = 9)]
    Transactional(u8),
    /// Resources exhausted
    #[codec(index = 10)]
    Exhausted,
    /// State corrupted
    #[codec(index = 11)]
    Corruption,
    /// Resource unavailable
    #[codec(index = 12)]
    Unavailable,
    /// Root origin not allowed
    #[codec(index = 13)]
    RootNotAllowed,
}

const TOKEN_ERRORS: &[&str] = &[
    "FundsUnavailable",
    "OnlyProvider",
    "BelowMinimum",
    "CannotCreate",
    "UnknownAsset",
    "Frozen",
    "Unsupported",
    "CannotCreateHold",
    "NotExpendable",
    "Blocked",
];

const ARITHMETIC_ERRORS: &[&str] = &["Underflow", "Overflow", "DivisionByZero"];

const TRANSACTIONAL_ERRORS: &[&str] = &["LimitReached", "NoLayer"];

fn named(names: &[&str], index: u8) -> Value {
    match names.get(index as usize) {
        Some(name) => Value::String(name.to_string()),
        None => Value::String(index.to_string()),
    }
}

impl DispatchError {
    /// Human-readable rendering
    pub fn to_value(&self) -> Value {
        match self {
            DispatchError::Other => json!("Other"),
            DispatchError::CannotLookup => json!("CannotLookup"),
            DispatchError::BadOrigin => json!("BadOrigin"),
            DispatchError::Module(ModuleError { index, error }) => json!({
                "Module": {
                    "index": index.to_string(),
                    "error": format!("0x{}", hex::encode(error)),
                }
            }),
            DispatchError::ConsumerRemaining => json!("ConsumerRemaining"),
            DispatchError::NoProviders => json!("NoProviders"),
            DispatchError::TooManyConsumers => json!("TooManyConsumers"),
            DispatchError::Token(i) => json!({ "Token": named(TOKEN_ERRORS, *i) }),
            DispatchError::Arithmetic(i) => json!({ "Arithmetic": named(ARITHMETIC_ERRORS, *i) }),
            DispatchError::Transactional(i) => {
                json!({ "Transactional": named(TRANSACTIONAL_ERRORS, *i) })
            }
            DispatchError::Exhausted => json!("Exhausted"),
            DispatchError::Corruption => json!("Corruption"),
            DispatchError::Unavailable => json!("Unavailable"),
            DispatchError::RootNotAllowed => json!("RootNotAllowed"),
        }
    }
}

/// Result of a `ContractsApi_call` dry run.
///
/// Newer runtimes append the emitted events. Decode with [`Decode::decode`],
/// which leaves those bytes unread.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractExecResult {
    /// Weight actually consumed
    pub gas_consumed: Weight,
    /// Weight required to run the call successfully
    pub gas_required: Weight,
    /// Storage deposit outcome
    pub storage_deposit: StorageDeposit,
    /// Debug output of the contract
    pub debug_message: Vec<u8>,
    /// Execution outcome
    pub result: Result<ExecReturnValue, DispatchError>,
}

impl ContractExecResult {
    /// Debug output as text, if any
    pub fn debug_message(&self) -> Option<String> {
        if self.debug_message.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.debug_message).into_owned())
        }
    }
}
