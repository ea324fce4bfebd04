use feevote_types::Address;
use thiserror::Error;

/// Failure reported by a [`ValueTransfer`](crate::ValueTransfer) channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),

    #[error("transfer channel error: {0}")]
    Channel(String),
}
