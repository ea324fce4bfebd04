//! Ballot fee acceptance policy.

use feevote_types::Amount;
use serde::{Deserialize, Serialize};

use crate::VotingError;

/// How the fee attached to a ballot is compared against the configured fee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePolicy {
    /// Any amount at or above the fee is accepted; the whole amount joins the pool.
    #[default]
    AtLeast,
    /// Only the exact fee is accepted.
    Exact,
}

impl FeePolicy {
    /// Check `paid` against `required`.
    pub fn check(self, required: Amount, paid: Amount) -> Result<(), VotingError> {
        if paid < required {
            return Err(VotingError::InsufficientFee { required, paid });
        }
        if self == FeePolicy::Exact && paid != required {
            return Err(VotingError::ExcessiveFee { required, paid });
        }
        Ok(())
    }
}
