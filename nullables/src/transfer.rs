//! Nullable value transfer. Records payouts instead of moving funds.

use feevote_host::{TransferError, ValueTransfer};
use feevote_types::{Address, Amount};
use std::collections::HashSet;

/// One transfer the ledger asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub to: Address,
    pub amount: Amount,
}

/// A value-transfer channel for testing.
///
/// Accepts every transfer unless the recipient was marked with
/// [`NullTransfer::reject`] or the channel was switched off with
/// [`NullTransfer::fail_all`].
#[derive(Debug, Default)]
pub struct NullTransfer {
    records: Vec<TransferRecord>,
    rejecting: HashSet<Address>,
    failing: bool,
}

impl NullTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future transfer to `address` fail.
    pub fn reject(&mut self, address: Address) {
        self.rejecting.insert(address);
    }

    /// Stop rejecting transfers to `address`.
    pub fn accept(&mut self, address: &Address) {
        self.rejecting.remove(address);
    }

    /// Make every future transfer fail (or succeed again with `false`).
    pub fn fail_all(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Successful transfers, in order.
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Total amount successfully sent to `address`.
    pub fn total_to(&self, address: &Address) -> Amount {
        self.records
            .iter()
            .filter(|r| &r.to == address)
            .fold(Amount::ZERO, |acc, r| acc + r.amount)
    }
}

impl ValueTransfer for NullTransfer {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.failing {
            return Err(TransferError::Channel("null transfer switched off".into()));
        }
        if self.rejecting.contains(to) {
            return Err(TransferError::Rejected(to.clone()));
        }
        self.records.push(TransferRecord {
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}
