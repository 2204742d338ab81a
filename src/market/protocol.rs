//! The deferred-acceptance protocol.
//!
//! ## Modes
//!
//! - **Single-step** ([`Market::advance_one`]): one named proposer moves.
//! - **Round** ([`Market::advance_round`]): every proposer unmatched at the
//!   start of the round moves once, in ascending id order. Each proposal sees
//!   the responder state left by earlier proposals of the same round; only
//!   the set of movers is frozen at round start.
//!
//! ## One Move
//!
//! ```text
//! matched or exhausted?  -> NoOp
//! otherwise              -> cursor += 1, proposal_count += 1
//!   responder accepts, held nobody   -> proposer matched
//!   responder rejects                -> proposer stays unmatched
//!   responder accepts, held someone  -> proposer matched,
//!                                       previous holder back to unmatched
//! ```
//!
//! Both modes keep the unmatched set equal to "unmatched and not exhausted".

use tracing::{debug, trace};

use crate::error::Result;
use crate::market::Market;
use crate::participant::{Participant, Response};
use crate::types::{ProposalOutcome, ProposerId, Verdict};

impl Market {
    /// Some proposer can still make a proposal
    #[inline]
    pub fn has_pending_proposals(&self) -> bool {
        !self.unmatched.is_empty()
    }

    /// Proposers still eligible to propose, in ascending id order
    pub fn pending_proposers(&self) -> impl Iterator<Item = ProposerId> + '_ {
        self.unmatched.iter().copied()
    }

    /// Proposals made so far
    #[inline]
    pub fn proposal_count(&self) -> u64 {
        self.proposal_count
    }

    /// Let one proposer make its next proposal.
    ///
    /// Returns the no-op outcome when the proposer is already matched or has
    /// nobody left to propose to. Unknown ids fail with
    /// [`MatchError::UnknownProposer`](crate::MatchError::UnknownProposer).
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::market::Market;
    /// use deferred_acceptance::participant::Preference;
    /// use deferred_acceptance::types::Verdict;
    ///
    /// let mut market = Market::new();
    /// let p = market.register_proposer(None, None).unwrap();
    /// let r = market.register_responder(None, None).unwrap();
    /// market.set_proposer_order(p, vec![r]).unwrap();
    /// market.set_responder_preference(r, Preference::Strict(vec![p])).unwrap();
    ///
    /// let outcome = market.advance_one(p).unwrap();
    /// assert_eq!(outcome.sequence_id(), Some(1));
    /// assert!(!market.has_pending_proposals());
    ///
    /// // Matched proposers only produce no-ops from here on
    /// assert!(market.advance_one(p).unwrap().is_noop());
    /// ```
    pub fn advance_one(&mut self, proposer: ProposerId) -> Result<ProposalOutcome> {
        let key = self.proposer_key(proposer)?;
        self.started = true;

        let outcome = self.make_move(key)?;
        Ok(outcome.unwrap_or(ProposalOutcome::NoOp { proposer }))
    }

    /// Let every currently unmatched proposer make one proposal.
    ///
    /// # Returns
    ///
    /// The round's outcomes in processing order. Proposers that turn out to
    /// have nothing left to propose produce no record and leave the
    /// unmatched set.
    pub fn advance_round(&mut self) -> Result<Vec<ProposalOutcome>> {
        self.started = true;

        let movers: Vec<ProposerId> = self.unmatched.iter().copied().collect();
        let mut outcomes = Vec::with_capacity(movers.len());

        for proposer in movers {
            let key = self.proposer_key(proposer)?;
            if let Some(outcome) = self.make_move(key)? {
                outcomes.push(outcome);
            }
        }

        debug!(
            proposals = outcomes.len(),
            still_unmatched = self.unmatched.len(),
            "round complete"
        );
        Ok(outcomes)
    }

    /// One proposal by the proposer at slab `key`; `None` if it cannot move.
    fn make_move(&mut self, key: usize) -> Result<Option<ProposalOutcome>> {
        let proposer = &self.proposers[key];
        let proposer_id = proposer.id();

        if proposer.matched_to().is_some() {
            return Ok(None);
        }
        let Some(target) = proposer.peek_next() else {
            self.unmatched.remove(&proposer_id);
            trace!(proposer = %proposer_id, "proposal order exhausted");
            return Ok(None);
        };
        // Resolve before touching any state so an unknown id leaves the market intact
        let responder_key = self.responder_key(target)?;

        self.proposers[key].propose_next();
        self.proposal_count += 1;
        let sequence_id = self.proposal_count;

        let response = self.responders[responder_key].respond_to_proposal(proposer_id);
        let verdict = match response {
            Response::Accepted => {
                self.proposers[key].register_response(true)?;
                Verdict::Accepted
            }
            Response::Rejected => {
                self.proposers[key].register_response(false)?;
                Verdict::Rejected
            }
            Response::Displaced(previous) => {
                self.proposers[key].register_response(true)?;
                let previous_key = self.proposer_key(previous)?;
                self.proposers[previous_key].displace()?;
                self.sync_unmatched(previous_key);
                Verdict::Displaced(previous)
            }
        };
        self.sync_unmatched(key);

        debug!(
            sequence_id,
            proposer = %proposer_id,
            responder = %target,
            ?verdict,
            "proposal"
        );

        Ok(Some(ProposalOutcome::Proposed {
            sequence_id,
            proposer: proposer_id,
            responder: target,
            verdict,
        }))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
