//! The voting ledger state machine.
//!
//! Every mutating operation validates everything it needs before touching
//! state, then commits in one step. A rejected call leaves the ledger exactly
//! as it was.

use std::collections::HashSet;

use feevote_host::{AccessControl, Clock, ValueTransfer};
use feevote_types::{Address, Amount, Timestamp, VoteId};
use feevote_utils::format_duration;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::event::{EventBus, LedgerEvent};
use crate::snapshot::LedgerSnapshot;
use crate::vote::{CandidateRef, Participant, Vote, VoteOutcome};
use crate::VotingError;

/// Fee-funded, time-boxed voting ledger with a single owner.
///
/// - `A` answers ownership checks,
/// - `C` supplies the current time,
/// - `T` moves payouts and withdrawals out of custody.
pub struct VotingLedger<A, C, T> {
    config: LedgerConfig,
    access: A,
    clock: C,
    transfer: T,
    /// Append-only; a vote's id is its index.
    votes: Vec<Vote>,
    /// Retained share of closed pools, withdrawable by the owner.
    available_fee: Amount,
    /// Everything the ledger holds: open pools plus available fee.
    custody: Amount,
    events: EventBus,
}

impl<A, C, T> VotingLedger<A, C, T>
where
    A: AccessControl,
    C: Clock,
    T: ValueTransfer,
{
    pub fn new(config: LedgerConfig, access: A, clock: C, transfer: T) -> Result<Self, VotingError> {
        config.validate()?;
        info!(
            owner = %access.owner(),
            vote_fee = %config.vote_fee,
            fee_policy = ?config.fee_policy,
            "voting ledger initialised"
        );
        Ok(Self {
            config,
            access,
            clock,
            transfer,
            votes: Vec::new(),
            available_fee: Amount::ZERO,
            custody: Amount::ZERO,
            events: EventBus::new(),
        })
    }

    /// Rebuild a ledger from a snapshot taken with [`VotingLedger::snapshot`].
    ///
    /// The snapshot must verify, belong to the same owner as `access`, and be
    /// internally consistent: dense ids, tallies matching participants, ended
    /// votes holding nothing, and custody matching open pools plus fee.
    pub fn restore(
        config: LedgerConfig,
        access: A,
        clock: C,
        transfer: T,
        snapshot: LedgerSnapshot,
    ) -> Result<Self, VotingError> {
        config.validate()?;
        snapshot.verify()?;
        if !access.is_owner(&snapshot.owner) {
            return Err(VotingError::Snapshot(format!(
                "snapshot owner {} does not match ledger owner {}",
                snapshot.owner,
                access.owner()
            )));
        }
        let mut expected_custody = snapshot.available_fee;
        for (index, vote) in snapshot.votes.iter().enumerate() {
            if vote.id != index as VoteId {
                return Err(VotingError::Snapshot(format!(
                    "vote at position {index} has id {}",
                    vote.id
                )));
            }
            if vote.candidates.len() < config.min_candidates {
                return Err(VotingError::Snapshot(format!(
                    "vote {} has {} candidates",
                    vote.id,
                    vote.candidates.len()
                )));
            }
            if let Some(problem) = vote.inconsistency() {
                return Err(VotingError::Snapshot(problem));
            }
            expected_custody = expected_custody
                .checked_add(vote.pool)
                .ok_or(VotingError::AmountOverflow)?;
        }
        if expected_custody != snapshot.custody {
            return Err(VotingError::Snapshot(format!(
                "custody {} does not match pools plus fee {}",
                snapshot.custody, expected_custody
            )));
        }

        info!(votes = snapshot.votes.len(), "voting ledger restored from snapshot");
        Ok(Self {
            config,
            access,
            clock,
            transfer,
            votes: snapshot.votes,
            available_fee: snapshot.available_fee,
            custody: snapshot.custody,
            events: EventBus::new(),
        })
    }

    /// Register an observer for [`LedgerEvent`]s.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Create a new vote. Owner only.
    pub fn create_vote(
        &mut self,
        caller: &Address,
        name: &str,
        description: &str,
        candidates: &[Address],
    ) -> Result<VoteId, VotingError> {
        self.ensure_owner(caller)?;
        if name.is_empty() {
            return Err(VotingError::EmptyName);
        }
        if description.is_empty() {
            return Err(VotingError::EmptyDescription);
        }
        if candidates.len() < self.config.min_candidates {
            return Err(VotingError::TooFewCandidates {
                min: self.config.min_candidates,
                got: candidates.len(),
            });
        }
        let mut seen = HashSet::with_capacity(candidates.len());
        for candidate in candidates {
            if !seen.insert(candidate) {
                return Err(VotingError::DuplicateCandidate(candidate.clone()));
            }
        }

        let id = self.votes.len() as VoteId;
        let end_time = self.clock.now().plus_secs(self.config.vote_duration_secs);
        self.votes.push(Vote::new(
            id,
            name.to_string(),
            description.to_string(),
            candidates.to_vec(),
            end_time,
        ));

        info!(
            vote_id = id,
            name,
            candidates = candidates.len(),
            %end_time,
            window = %format_duration(self.config.vote_duration_secs),
            "vote created"
        );
        self.events.emit(&LedgerEvent::VoteCreated {
            id,
            name: name.to_string(),
            end_time,
        });
        Ok(id)
    }

    /// Cast a ballot for the candidate named by `selector`, paying `fee_paid`.
    ///
    /// Checks run in a fixed order: vote exists, candidate resolves, fee is
    /// acceptable, window is open, caller has not voted yet.
    pub fn do_vote(
        &mut self,
        caller: &Address,
        vote_id: VoteId,
        selector: CandidateRef,
        fee_paid: Amount,
    ) -> Result<(), VotingError> {
        let index = self.vote_index(vote_id)?;
        let now = self.clock.now();
        let vote = &self.votes[index];

        let candidate = vote.resolve(&selector)?;
        self.config
            .fee_policy
            .check(self.config.vote_fee, fee_paid)?;
        if !vote.is_open(now) {
            return Err(VotingError::VotingClosed(vote_id));
        }
        if vote.has_voted(caller) {
            return Err(VotingError::AlreadyVoted {
                vote_id,
                voter: caller.clone(),
            });
        }
        let pool = vote
            .pool
            .checked_add(fee_paid)
            .ok_or(VotingError::AmountOverflow)?;
        let custody = self
            .custody
            .checked_add(fee_paid)
            .ok_or(VotingError::AmountOverflow)?;

        // Commit.
        let vote = &mut self.votes[index];
        vote.candidates[candidate].vote_count += 1;
        vote.participants.push(Participant {
            address: caller.clone(),
            candidate,
        });
        vote.pool = pool;
        self.custody = custody;
        let candidate_address = vote.candidates[candidate].address.clone();

        debug!(
            vote_id,
            voter = %caller,
            candidate = %candidate_address,
            fee = %fee_paid,
            pool = %pool,
            "ballot accepted"
        );
        self.events.emit(&LedgerEvent::BallotCast {
            vote_id,
            voter: caller.clone(),
            candidate: candidate_address,
            fee: fee_paid,
        });
        Ok(())
    }

    /// Cast a ballot for the candidate at `candidate_index`.
    pub fn do_vote_by_index(
        &mut self,
        caller: &Address,
        vote_id: VoteId,
        candidate_index: usize,
        fee_paid: Amount,
    ) -> Result<(), VotingError> {
        self.do_vote(caller, vote_id, CandidateRef::Index(candidate_index), fee_paid)
    }

    /// Cast a ballot for the candidate with `candidate`'s address.
    pub fn do_vote_by_address(
        &mut self,
        caller: &Address,
        vote_id: VoteId,
        candidate: &Address,
        fee_paid: Amount,
    ) -> Result<(), VotingError> {
        self.do_vote(
            caller,
            vote_id,
            CandidateRef::Address(candidate.clone()),
            fee_paid,
        )
    }

    /// Close a vote whose window has elapsed and pay its winner.
    ///
    /// Anyone may call this. The payout is transferred before any state
    /// changes; if the transfer fails the vote stays un-ended with its pool
    /// intact and the call can be retried.
    pub fn end_vote(&mut self, vote_id: VoteId) -> Result<VoteOutcome, VotingError> {
        let index = self.vote_index(vote_id)?;
        let now = self.clock.now();
        let vote = &self.votes[index];

        if vote.is_open(now) {
            return Err(VotingError::StillOpen {
                vote_id,
                remaining_secs: vote.end_time.remaining_from(now),
            });
        }
        if vote.is_ended {
            return Err(VotingError::AlreadyEnded(vote_id));
        }

        let winner_index = vote
            .leading_candidate()
            .ok_or(VotingError::TooFewCandidates {
                min: self.config.min_candidates,
                got: 0,
            })?;
        let winner = vote.candidates[winner_index].address.clone();
        let pool = vote.pool;
        let payout = pool.percent(self.config.payout_percent);
        let retained = pool
            .checked_sub(payout)
            .ok_or(VotingError::AmountOverflow)?;
        let available_fee = self
            .available_fee
            .checked_add(retained)
            .ok_or(VotingError::AmountOverflow)?;
        let custody = self
            .custody
            .checked_sub(payout)
            .ok_or(VotingError::AmountOverflow)?;

        if !payout.is_zero() {
            if let Err(e) = self.transfer.transfer(&winner, payout) {
                warn!(vote_id, %winner, %payout, error = %e, "winner payout failed, vote left open for closing");
                return Err(e.into());
            }
        }

        // Commit.
        let vote = &mut self.votes[index];
        vote.pool = Amount::ZERO;
        vote.is_ended = true;
        self.available_fee = available_fee;
        self.custody = custody;

        info!(
            vote_id,
            %winner,
            votes = vote.candidates[winner_index].vote_count,
            %payout,
            %retained,
            "vote ended"
        );
        self.events.emit(&LedgerEvent::VoteEnded {
            id: vote_id,
            winner: winner.clone(),
            payout,
        });
        Ok(VoteOutcome {
            vote_id,
            winner,
            payout,
            retained,
        })
    }

    /// Withdraw retained fee to the owner. Owner only.
    ///
    /// `None` withdraws everything available. Returns the amount withdrawn.
    pub fn withdraw_available_fee(
        &mut self,
        caller: &Address,
        amount: Option<Amount>,
    ) -> Result<Amount, VotingError> {
        self.ensure_owner(caller)?;
        let requested = amount.unwrap_or(self.available_fee);
        if requested.is_zero() || requested > self.available_fee {
            return Err(VotingError::InsufficientAvailableFee {
                requested,
                available: self.available_fee,
            });
        }
        let custody = self
            .custody
            .checked_sub(requested)
            .ok_or(VotingError::AmountOverflow)?;

        let owner = self.access.owner().clone();
        if let Err(e) = self.transfer.transfer(&owner, requested) {
            warn!(%owner, amount = %requested, error = %e, "fee withdrawal failed");
            return Err(e.into());
        }

        // Commit.
        self.available_fee = self.available_fee - requested;
        self.custody = custody;

        info!(%owner, amount = %requested, remaining = %self.available_fee, "available fee withdrawn");
        self.events.emit(&LedgerEvent::FeeWithdrawn {
            owner,
            amount: requested,
        });
        Ok(requested)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_vote(&self, vote_id: VoteId) -> Result<&Vote, VotingError> {
        self.vote_index(vote_id).map(|index| &self.votes[index])
    }

    /// Position of `address` within the candidates of `vote_id`.
    pub fn get_candidate_id(&self, vote_id: VoteId, address: &Address) -> Result<usize, VotingError> {
        self.get_vote(vote_id)?
            .resolve(&CandidateRef::Address(address.clone()))
    }

    pub fn has_voted(&self, vote_id: VoteId, address: &Address) -> Result<bool, VotingError> {
        Ok(self.get_vote(vote_id)?.has_voted(address))
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn available_fee(&self) -> Amount {
        self.available_fee
    }

    pub fn custody(&self) -> Amount {
        self.custody
    }

    pub fn owner(&self) -> &Address {
        self.access.owner()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn transfer_channel(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_channel_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    /// Capture the full ledger state for persistence by the host.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, VotingError> {
        LedgerSnapshot::create(
            self.access.owner().clone(),
            self.votes.clone(),
            self.available_fee,
            self.custody,
            self.clock.now(),
        )
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn ensure_owner(&self, caller: &Address) -> Result<(), VotingError> {
        if self.access.is_owner(caller) {
            Ok(())
        } else {
            Err(VotingError::NotOwner(caller.clone()))
        }
    }

    fn vote_index(&self, vote_id: VoteId) -> Result<usize, VotingError> {
        usize::try_from(vote_id)
            .ok()
            .filter(|index| *index < self.votes.len())
            .ok_or(VotingError::VoteNotFound(vote_id))
    }
}

impl<A, C, T> std::fmt::Debug for VotingLedger<A, C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingLedger")
            .field("votes", &self.votes.len())
            .field("available_fee", &self.available_fee)
            .field("custody", &self.custody)
            .field("events", &self.events)
            .finish()
    }
}
