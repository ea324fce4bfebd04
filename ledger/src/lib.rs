//! Fee-funded, time-boxed voting ledger.
//!
//! The owner creates votes with a fixed candidate list. Anyone may cast one
//! ballot per vote by paying the ballot fee; the fees form the vote's pool.
//! Once the voting window (3 days by default) has elapsed, anyone may end the
//! vote: the leading candidate (first listed on a tie) receives 90% of the
//! pool and the remainder accrues to the owner as withdrawable fee.
//!
//! The ledger is a deterministic state machine. Time, value transfer and
//! ownership checks come from the capabilities in `feevote-host`.

pub mod config;
pub mod error;
pub mod event;
pub mod fee;
pub mod ledger;
pub mod shared;
pub mod snapshot;
pub mod vote;

pub use config::{LedgerConfig, MIN_CANDIDATES, VOTE_DURATION_SECS, WINNER_PAYOUT_PERCENT};
pub use error::VotingError;
pub use event::{EventBus, LedgerEvent};
pub use fee::FeePolicy;
pub use ledger::VotingLedger;
pub use shared::SharedLedger;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
pub use vote::{Candidate, CandidateRef, Participant, Vote, VoteOutcome};
