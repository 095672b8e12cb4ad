//! # inkbridge-primitives
//!
//! Primitive types shared by the inkbridge crates.
//!
//! This crate provides the account identifier (with SS58 address encoding),
//! the 256-bit hash type and the two-dimensional weight used to bound
//! contract execution.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod hash;
mod weight;

pub use account::{AccountError, AccountId32, SUBSTRATE_SS58_PREFIX};
pub use hash::{HashError, H256};
pub use weight::Weight;

/// Chain balance type
pub type Balance = u128;

/// Account nonce type
pub type Nonce = u64;
