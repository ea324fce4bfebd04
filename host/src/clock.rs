//! Source of the current time.

use feevote_types::Timestamp;
use std::sync::Arc;

/// Supplies "now" to the ledger.
///
/// Window checks (`VotingClosed`, `StillOpen`) read the time exclusively
/// through this trait, so tests can substitute a clock they control.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
