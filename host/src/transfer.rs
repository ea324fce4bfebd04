//! Value-transfer channel.

use feevote_types::{Address, Amount};

use crate::TransferError;

/// Moves currency out of the ledger's custody.
///
/// The ledger decides *how much* and *to whom*; the channel performs the
/// movement. A returned error means nothing was moved, and the ledger aborts
/// the operation that requested the transfer without changing any state.
pub trait ValueTransfer {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError>;
}

impl<T: ValueTransfer + ?Sized> ValueTransfer for Box<T> {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        (**self).transfer(to, amount)
    }
}
