//! Shared handle for hosts that call the ledger from many tasks.
//!
//! The ledger itself is a plain `&mut self` state machine. `SharedLedger`
//! puts it behind one async mutex so that each operation runs to completion
//! before the next one starts, whichever task issued it.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::ledger::VotingLedger;

pub struct SharedLedger<A, C, T> {
    inner: Arc<Mutex<VotingLedger<A, C, T>>>,
}

impl<A, C, T> SharedLedger<A, C, T> {
    pub fn new(ledger: VotingLedger<A, C, T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Wait for exclusive access to the ledger.
    pub async fn lock(&self) -> MutexGuard<'_, VotingLedger<A, C, T>> {
        self.inner.lock().await
    }

    /// Run `f` with exclusive access. `f` must not block.
    pub async fn with<R>(&self, f: impl FnOnce(&mut VotingLedger<A, C, T>) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}

impl<A, C, T> Clone for SharedLedger<A, C, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use feevote_host::Ownership;
    use feevote_nullables::{NullClock, NullTransfer};
    use feevote_types::{Address, Amount};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[tokio::test]
    async fn concurrent_ballots_are_all_counted() {
        let owner = addr(0xAA);
        let config = LedgerConfig::default();
        let fee = config.vote_fee;
        let ledger = VotingLedger::new(
            config,
            Ownership::new(owner.clone()),
            Arc::new(NullClock::new(0)),
            NullTransfer::new(),
        )
        .unwrap();
        let shared = SharedLedger::new(ledger);
        shared
            .with(|l| l.create_vote(&owner, "poll", "concurrent", &[addr(1), addr(2)]))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..50u8 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                shared
                    .with(|l| l.do_vote_by_index(&addr(0x10 + i), 0, usize::from(i % 2), fee))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let guard = shared.lock().await;
        let vote = guard.get_vote(0).unwrap();
        assert_eq!(vote.total_ballots(), 50);
        assert_eq!(vote.pool, Amount::new(fee.raw() * 50));
        assert_eq!(guard.custody(), vote.pool);
    }

    #[tokio::test]
    async fn duplicate_ballots_race_to_one_winner() {
        let owner = addr(0xAA);
        let ledger = VotingLedger::new(
            LedgerConfig::default(),
            Ownership::new(owner.clone()),
            Arc::new(NullClock::new(0)),
            NullTransfer::new(),
        )
        .unwrap();
        let fee = ledger.config().vote_fee;
        let shared = SharedLedger::new(ledger);
        shared
            .with(|l| l.create_vote(&owner, "poll", "race", &[addr(1), addr(2)]))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                shared.with(|l| l.do_vote_by_index(&addr(0x33), 0, 0, fee)).await
            }));
        }
        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(shared.lock().await.get_vote(0).unwrap().total_ballots(), 1);
    }
}
