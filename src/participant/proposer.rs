//! Proposer state machine.
//!
//! ## Cursor
//!
//! A proposer walks its proposal order strictly front to back:
//!
//! ```text
//! order:  [r1, r2, r3, r4]
//!               ^ cursor (last proposed to)
//! ```
//!
//! - `propose_next()` moves the cursor one step and returns that responder
//! - the cursor never moves back, so a rejected responder is never revisited
//! - `matched_to`, when set, is always `order[cursor]`

use std::collections::HashSet;

use crate::error::{MatchError, Result};
use crate::participant::Participant;
use crate::types::{ProposerId, ResponderId};

/// A participant that actively proposes, most preferred responder first.
#[derive(Debug, Clone)]
pub struct Proposer {
    id: ProposerId,

    name: String,

    /// Responders, most to least preferred
    proposal_order: Vec<ResponderId>,

    /// Index of the last responder proposed to (None = no proposal yet)
    cursor: Option<usize>,

    /// Responder currently holding this proposer
    matched_to: Option<ResponderId>,

    /// A proposal was yielded and its response not yet registered
    awaiting_response: bool,
}

impl Proposer {
    /// Create a proposer with an empty proposal order
    ///
    /// # Arguments
    ///
    /// * `id` - Identity within the proposer side
    /// * `name` - Display name; defaults to `"Proposer {id}"`
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::participant::{Participant, Proposer};
    /// use deferred_acceptance::types::ProposerId;
    ///
    /// let proposer = Proposer::new(ProposerId(1), None);
    /// assert_eq!(proposer.display_name(), "Proposer 1");
    /// assert!(proposer.is_exhausted());
    /// ```
    pub fn new(id: ProposerId, name: Option<String>) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| format!("Proposer {id}")),
            proposal_order: Vec::new(),
            cursor: None,
            matched_to: None,
            awaiting_response: false,
        }
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    /// Replace the proposal order.
    ///
    /// Fails with [`MatchError::ProtocolStarted`] once this proposer has made
    /// a proposal; the cursor is never reset behind the caller's back.
    pub fn set_proposal_order(&mut self, order: Vec<ResponderId>) -> Result<()> {
        if self.cursor.is_some() {
            return Err(MatchError::ProtocolStarted);
        }
        self.proposal_order = order;
        Ok(())
    }

    /// Replace the proposal order from tie-sets.
    ///
    /// Ties are broken by listed order. Returns `true` when every tier holds
    /// at most one responder, i.e. the preference was strict to begin with.
    pub fn set_weak_proposal_order(&mut self, tiers: &[Vec<ResponderId>]) -> Result<bool> {
        let strict = tiers.iter().all(|tier| tier.len() <= 1);
        self.set_proposal_order(tiers.iter().flatten().copied().collect())?;
        Ok(strict)
    }

    /// The proposal order, most preferred first
    #[inline]
    pub fn proposal_order(&self) -> &[ResponderId] {
        &self.proposal_order
    }

    /// Position of `responder` in the proposal order (0 = first choice)
    pub fn position_of(&self, responder: ResponderId) -> Option<usize> {
        self.proposal_order.iter().position(|&r| r == responder)
    }

    // ========================================================================
    // Protocol
    // ========================================================================

    /// Index of the last responder proposed to
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// No responder left to propose to
    pub fn is_exhausted(&self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        next >= self.proposal_order.len()
    }

    /// Unmatched and still has someone to propose to
    #[inline]
    pub fn is_eligible(&self) -> bool {
        self.matched_to.is_none() && !self.is_exhausted()
    }

    /// Responder the next call to `propose_next` would return
    pub fn peek_next(&self) -> Option<ResponderId> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.proposal_order.get(next).copied()
    }

    /// Advance the cursor and return the next responder to propose to.
    ///
    /// Returns `None` when the order is empty or already exhausted; the
    /// cursor never moves past the last element.
    pub fn propose_next(&mut self) -> Option<ResponderId> {
        if self.is_exhausted() {
            return None;
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        self.awaiting_response = true;
        Some(self.proposal_order[next])
    }

    /// Record the response to the pending proposal.
    ///
    /// Accepted: `matched_to` becomes the responder at the cursor.
    /// Rejected: `matched_to` is cleared.
    pub fn register_response(&mut self, accepted: bool) -> Result<()> {
        if !self.awaiting_response {
            return Err(MatchError::NoPendingProposal(self.id));
        }
        self.awaiting_response = false;
        self.matched_to = if accepted {
            self.cursor.map(|c| self.proposal_order[c])
        } else {
            None
        };
        Ok(())
    }

    /// Lose the current match to a better-ranked rival
    pub fn displace(&mut self) -> Result<ResponderId> {
        self.matched_to.take().ok_or(MatchError::NotMatched(self.id))
    }
}

impl Participant for Proposer {
    type Id = ProposerId;
    type Counterpart = ResponderId;

    #[inline]
    fn id(&self) -> ProposerId {
        self.id
    }

    #[inline]
    fn display_name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn matched_to(&self) -> Option<ResponderId> {
        self.matched_to
    }

    fn validate(
        &self,
        known_proposers: &HashSet<ProposerId>,
        known_responders: &HashSet<ResponderId>,
    ) -> bool {
        // A list with duplicates shrinks when collected into a set
        let listed: HashSet<ResponderId> = self.proposal_order.iter().copied().collect();
        known_proposers.contains(&self.id)
            && listed.intersection(known_responders).count() == self.proposal_order.len()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
