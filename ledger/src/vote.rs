//! Vote records and their lifecycle.

use std::collections::HashSet;

use feevote_types::{Address, Amount, Timestamp, VoteId};
use serde::{Deserialize, Serialize};

use crate::VotingError;

/// A poll option, identified by the address that receives the payout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub address: Address,
    /// Ballots received. Only grows while the parent vote is open.
    pub vote_count: u64,
}

/// An address that cast a ballot, with the candidate it chose.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub address: Address,
    /// Index into [`Vote::candidates`].
    pub candidate: usize,
}

/// How a ballot names its candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateRef {
    /// Position within the vote's candidate list.
    Index(usize),
    /// The candidate's address.
    Address(Address),
}

impl From<usize> for CandidateRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<Address> for CandidateRef {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

/// One time-boxed poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub name: String,
    pub description: String,
    /// Fixed at creation, in creation order.
    pub candidates: Vec<Candidate>,
    /// At most one entry per address, in ballot order.
    pub participants: Vec<Participant>,
    /// Fees collected so far; zero once the vote has ended.
    pub pool: Amount,
    pub end_time: Timestamp,
    pub is_ended: bool,
}

impl Vote {
    pub(crate) fn new(
        id: VoteId,
        name: String,
        description: String,
        candidates: Vec<Address>,
        end_time: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            candidates: candidates
                .into_iter()
                .map(|address| Candidate {
                    address,
                    vote_count: 0,
                })
                .collect(),
            participants: Vec::new(),
            pool: Amount::ZERO,
            end_time,
            is_ended: false,
        }
    }

    /// Position of the candidate with `address`, if any.
    pub fn candidate_index(&self, address: &Address) -> Option<usize> {
        self.candidates.iter().position(|c| &c.address == address)
    }

    /// Resolve a candidate reference to an index, failing with the error kind
    /// that matches the addressing mode.
    pub fn resolve(&self, selector: &CandidateRef) -> Result<usize, VotingError> {
        match selector {
            CandidateRef::Index(index) if *index < self.candidates.len() => Ok(*index),
            CandidateRef::Index(index) => Err(VotingError::CandidateNotFound {
                vote_id: self.id,
                index: *index,
            }),
            CandidateRef::Address(address) => {
                self.candidate_index(address)
                    .ok_or_else(|| VotingError::CandidateAddressNotFound {
                        vote_id: self.id,
                        address: address.clone(),
                    })
            }
        }
    }

    pub fn has_voted(&self, address: &Address) -> bool {
        self.participants.iter().any(|p| &p.address == address)
    }

    /// Whether ballots are still accepted at `now`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        now < self.end_time
    }

    /// Total ballots accepted.
    pub fn total_ballots(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }

    /// Index of the candidate with the most ballots.
    ///
    /// Ties go to the candidate listed first. Returns `None` only for a vote
    /// with no candidates, which `create_vote` never produces.
    pub fn leading_candidate(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            match best {
                Some((_, count)) if candidate.vote_count <= count => {}
                _ => best = Some((index, candidate.vote_count)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Describe the first way this record disagrees with itself, if any.
    ///
    /// A consistent vote has one participant per address, each pointing at an
    /// existing candidate, per-candidate counts equal to the participants who
    /// chose them, and an empty pool once ended.
    pub(crate) fn inconsistency(&self) -> Option<String> {
        if self.is_ended && !self.pool.is_zero() {
            return Some(format!("vote {} is ended but still holds {}", self.id, self.pool));
        }
        let mut tally = vec![0u64; self.candidates.len()];
        let mut seen = HashSet::with_capacity(self.participants.len());
        for participant in &self.participants {
            if !seen.insert(&participant.address) {
                return Some(format!(
                    "vote {} lists participant {} twice",
                    self.id, participant.address
                ));
            }
            match tally.get_mut(participant.candidate) {
                Some(count) => *count += 1,
                None => {
                    return Some(format!(
                        "vote {} participant {} chose missing candidate {}",
                        self.id, participant.address, participant.candidate
                    ))
                }
            }
        }
        for (index, (candidate, counted)) in self.candidates.iter().zip(tally).enumerate() {
            if candidate.vote_count != counted {
                return Some(format!(
                    "vote {} candidate {index} has {} ballots but {counted} participants",
                    self.id, candidate.vote_count
                ));
            }
        }
        None
    }
}

/// Result of closing a vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub vote_id: VoteId,
    pub winner: Address,
    /// Amount sent to the winner.
    pub payout: Amount,
    /// Amount added to the owner's available fee.
    pub retained: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn vote_with_counts(counts: &[u64]) -> Vote {
        let mut vote = Vote::new(
            0,
            "name".into(),
            "description".into(),
            (0..counts.len()).map(|i| addr(i as u8 + 1)).collect(),
            Timestamp::new(100),
        );
        for (candidate, count) in vote.candidates.iter_mut().zip(counts) {
            candidate.vote_count = *count;
        }
        vote
    }

    #[test]
    fn new_vote_starts_empty() {
        let vote = vote_with_counts(&[0, 0, 0]);
        assert_eq!(vote.candidates.len(), 3);
        assert!(vote.candidates.iter().all(|c| c.vote_count == 0));
        assert!(vote.participants.is_empty());
        assert_eq!(vote.pool, Amount::ZERO);
        assert!(!vote.is_ended);
    }

    #[test]
    fn resolve_by_index_and_address() {
        let vote = vote_with_counts(&[0, 0]);
        assert_eq!(vote.resolve(&CandidateRef::Index(1)), Ok(1));
        assert_eq!(vote.resolve(&CandidateRef::Address(addr(2))), Ok(1));
        assert_eq!(
            vote.resolve(&CandidateRef::Index(2)),
            Err(VotingError::CandidateNotFound { vote_id: 0, index: 2 })
        );
        assert!(matches!(
            vote.resolve(&CandidateRef::Address(addr(9))),
            Err(VotingError::CandidateAddressNotFound { .. })
        ));
    }

    #[test]
    fn leading_candidate_strict_max() {
        assert_eq!(vote_with_counts(&[1, 4, 2]).leading_candidate(), Some(1));
    }

    #[test]
    fn leading_candidate_first_seen_wins_ties() {
        assert_eq!(vote_with_counts(&[1, 3, 3, 2]).leading_candidate(), Some(1));
        assert_eq!(vote_with_counts(&[0, 0, 0]).leading_candidate(), Some(0));
    }

    #[test]
    fn open_until_end_time() {
        let vote = vote_with_counts(&[0, 0]);
        assert!(vote.is_open(Timestamp::new(99)));
        assert!(!vote.is_open(Timestamp::new(100)));
    }

    fn ballot(vote: &mut Vote, voter: u8, candidate: usize) {
        vote.participants.push(Participant {
            address: addr(voter),
            candidate,
        });
        vote.candidates[candidate].vote_count += 1;
        vote.pool = vote.pool + Amount::new(10);
    }

    #[test]
    fn consistent_vote_has_no_inconsistency() {
        let mut vote = vote_with_counts(&[0, 0]);
        ballot(&mut vote, 0x81, 0);
        ballot(&mut vote, 0x82, 1);
        assert_eq!(vote.inconsistency(), None);
    }

    #[test]
    fn ended_vote_with_pool_is_inconsistent() {
        let mut vote = vote_with_counts(&[0, 0]);
        ballot(&mut vote, 0x81, 0);
        vote.is_ended = true;
        assert!(vote.inconsistency().is_some());
        vote.pool = Amount::ZERO;
        assert_eq!(vote.inconsistency(), None);
    }

    #[test]
    fn count_mismatch_is_inconsistent() {
        let mut vote = vote_with_counts(&[0, 0]);
        ballot(&mut vote, 0x81, 0);
        vote.candidates[1].vote_count = 1;
        assert!(vote.inconsistency().is_some());
    }

    #[test]
    fn repeated_participant_is_inconsistent() {
        let mut vote = vote_with_counts(&[0, 0]);
        ballot(&mut vote, 0x81, 0);
        ballot(&mut vote, 0x81, 1);
        assert!(vote.inconsistency().is_some());
    }

    #[test]
    fn participant_with_missing_candidate_is_inconsistent() {
        let mut vote = vote_with_counts(&[0, 0]);
        vote.participants.push(Participant {
            address: addr(0x81),
            candidate: 5,
        });
        assert!(vote.inconsistency().is_some());
    }
}
