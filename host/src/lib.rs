//! Abstract host capabilities for the FeeVote ledger.
//!
//! The ledger is a deterministic state machine. Everything it needs from the
//! outside world (the current time, moving currency, knowing who the owner is)
//! is expressed as a trait here. Production hosts and the test nullables both
//! implement these traits; the ledger depends only on them.

pub mod access;
pub mod clock;
pub mod error;
pub mod transfer;

pub use access::{AccessControl, Ownership};
pub use clock::{Clock, SystemClock};
pub use error::TransferError;
pub use transfer::ValueTransfer;
