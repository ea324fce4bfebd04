use feevote_host::TransferError;
use feevote_types::{Address, Amount, VoteId};
use thiserror::Error;

/// Every way a ledger operation can be rejected.
///
/// A returned error always means the ledger state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    #[error("caller {0} is not the owner")]
    NotOwner(Address),

    #[error("vote name can't be empty")]
    EmptyName,

    #[error("vote description can't be empty")]
    EmptyDescription,

    #[error("amount of candidates must be at least {min}, got {got}")]
    TooFewCandidates { min: usize, got: usize },

    #[error("candidate {0} is listed more than once")]
    DuplicateCandidate(Address),

    #[error("vote with ID {0} doesn't exist")]
    VoteNotFound(VoteId),

    #[error("candidate with index {index} doesn't exist in vote {vote_id}")]
    CandidateNotFound { vote_id: VoteId, index: usize },

    #[error("candidate with address {address} doesn't exist in vote {vote_id}")]
    CandidateAddressNotFound { vote_id: VoteId, address: Address },

    #[error("voting fee isn't enough: required {required}, paid {paid}")]
    InsufficientFee { required: Amount, paid: Amount },

    #[error("voting fee must be exactly {required}, paid {paid}")]
    ExcessiveFee { required: Amount, paid: Amount },

    #[error("voting time for vote {0} is over")]
    VotingClosed(VoteId),

    #[error("{voter} has already voted in vote {vote_id}")]
    AlreadyVoted { vote_id: VoteId, voter: Address },

    #[error("vote {vote_id} is still in progress ({remaining_secs}s remaining)")]
    StillOpen { vote_id: VoteId, remaining_secs: u64 },

    #[error("vote {0} is already ended")]
    AlreadyEnded(VoteId),

    #[error("requested {requested} but only {available} of available fee can be withdrawn")]
    InsufficientAvailableFee { requested: Amount, available: Amount },

    #[error("amount overflow while updating ledger totals")]
    AmountOverflow,

    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("snapshot rejected: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}
