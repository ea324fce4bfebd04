//! Notifications emitted by the ledger for observers.

use feevote_types::{Address, Amount, Timestamp, VoteId};
use serde::{Deserialize, Serialize};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A vote was created.
    VoteCreated {
        id: VoteId,
        name: String,
        end_time: Timestamp,
    },
    /// A ballot was accepted.
    BallotCast {
        vote_id: VoteId,
        voter: Address,
        candidate: Address,
        fee: Amount,
    },
    /// A vote was closed and its winner paid.
    VoteEnded {
        id: VoteId,
        winner: Address,
        payout: Amount,
    },
    /// The owner withdrew retained fee.
    FeeWithdrawn { owner: Address, amount: Amount },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline after the state change has been committed;
/// keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
