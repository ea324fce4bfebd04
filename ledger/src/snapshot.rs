//! Ledger snapshots: capture the full voting state at a point in time.
//!
//! Persistence is the host's choice; a snapshot is the unit it stores. The
//! snapshot hash is computed deterministically from the captured state so a
//! host can detect corruption before restoring.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use feevote_types::{Address, Amount, Timestamp};

use crate::vote::Vote;
use crate::VotingError;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A ledger snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the captured state.
    pub hash: [u8; 32],
    /// Ledger time when the snapshot was taken.
    pub created_at: Timestamp,
    pub owner: Address,
    /// Every vote, in id order.
    pub votes: Vec<Vote>,
    pub available_fee: Amount,
    pub custody: Amount,
    /// Snapshot version for compatibility.
    pub version: u32,
}

impl LedgerSnapshot {
    pub fn create(
        owner: Address,
        votes: Vec<Vote>,
        available_fee: Amount,
        custody: Amount,
        created_at: Timestamp,
    ) -> Result<Self, VotingError> {
        let mut snap = Self {
            hash: [0u8; 32],
            created_at,
            owner,
            votes,
            available_fee,
            custody,
            version: SNAPSHOT_VERSION,
        };
        snap.hash = snap.compute_hash()?;
        Ok(snap)
    }

    /// Check the version and recompute the hash.
    pub fn verify(&self) -> Result<(), VotingError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(VotingError::Snapshot(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }
        if self.compute_hash()? != self.hash {
            return Err(VotingError::Snapshot("hash mismatch".into()));
        }
        Ok(())
    }

    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VotingError> {
        bincode::serialize(self).map_err(|e| VotingError::Snapshot(e.to_string()))
    }

    /// Decode from storage and verify.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VotingError> {
        let snap: Self =
            bincode::deserialize(bytes).map_err(|e| VotingError::Snapshot(e.to_string()))?;
        snap.verify()?;
        Ok(snap)
    }

    fn compute_hash(&self) -> Result<[u8; 32], VotingError> {
        let body = bincode::serialize(&(
            self.version,
            self.created_at,
            &self.owner,
            &self.votes,
            self.available_fee,
            self.custody,
        ))
        .map_err(|e| VotingError::Snapshot(e.to_string()))?;

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(&body);
        Ok(hasher.finalize().into())
    }
}
