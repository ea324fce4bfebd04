//! Fundamental types for the FeeVote ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, amounts, timestamps and vote identifiers.

pub mod address;
pub mod amount;
pub mod error;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;
pub use time::Timestamp;

/// Sequential, zero-based identifier of a vote within one ledger.
pub type VoteId = u64;
