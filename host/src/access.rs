//! Owner capability checks.

use feevote_types::Address;
use serde::{Deserialize, Serialize};

/// Answers "who is the owner" and "is this caller the owner".
///
/// Ownership transfer, if a host supports it, lives behind this trait; the
/// ledger only consumes the check.
pub trait AccessControl {
    fn owner(&self) -> &Address;

    fn is_owner(&self, caller: &Address) -> bool {
        self.owner() == caller
    }
}

/// Single fixed owner, set once at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }
}

impl AccessControl for Ownership {
    fn owner(&self) -> &Address {
        &self.owner
    }
}
