//! Responder state machine.
//!
//! ## Ranking
//!
//! Preferences are stored as a rank map, higher = more preferred:
//!
//! ```text
//! strict [p2, p3, p1]         ->  p2: 3, p3: 2, p1: 1
//! weak   [[p2], [p3, p1]]     ->  p2: 2, p3: 1, p1: 1
//! ```
//!
//! A proposer missing from the map is ranked below everyone and is always
//! rejected. Adjudication accepts only a strict improvement, so a tied
//! competitor never displaces the proposal that arrived first.

use std::collections::{HashMap, HashSet};

use crate::error::{MatchError, Result};
use crate::participant::Participant;
use crate::types::{ProposerId, ResponderId};

/// Preference data for a responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference {
    /// Total order, most preferred first
    Strict(Vec<ProposerId>),
    /// Ordered tie-sets, most preferred tier first
    Weak(Vec<Vec<ProposerId>>),
}

impl Preference {
    /// Ordered tiers; a strict order is a list of singleton tiers
    fn tiers(&self) -> Vec<&[ProposerId]> {
        match self {
            Preference::Strict(order) => order.chunks(1).collect(),
            Preference::Weak(tiers) => tiers.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Every tier holds at most one proposer
    pub fn is_strict(&self) -> bool {
        match self {
            Preference::Strict(_) => true,
            Preference::Weak(tiers) => tiers.iter().all(|tier| tier.len() <= 1),
        }
    }
}

/// Answer to a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// Accepted; nobody was held before
    Accepted,
    /// Accepted; the previously held proposer is now rejected
    Displaced(ProposerId),
    /// Declined; the held match (if any) is unchanged
    Rejected,
}

/// A participant that evaluates incoming proposals and keeps the best one.
#[derive(Debug, Clone)]
pub struct Responder {
    id: ResponderId,

    name: String,

    /// Proposer -> rank, higher = more preferred
    preference_rank: HashMap<ProposerId, u32>,

    /// Number of ids supplied with the preference (duplicates included)
    listed: usize,

    /// Proposer currently held
    matched_to: Option<ProposerId>,

    /// Proposals adjudicated so far
    adjudications: u64,
}

impl Responder {
    /// Create a responder with no preferences.
    ///
    /// The display name defaults to `"Responder {id}"`.
    pub fn new(id: ResponderId, name: Option<String>) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| format!("Responder {id}")),
            preference_rank: HashMap::new(),
            listed: 0,
            matched_to: None,
            adjudications: 0,
        }
    }

    /// Build the rank map from a strict or weak preference.
    ///
    /// Returns whether the preference turned out strict. Fails with
    /// [`MatchError::ProtocolStarted`] once this responder has adjudicated a
    /// proposal.
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::participant::{Preference, Responder};
    /// use deferred_acceptance::types::{ProposerId, ResponderId};
    ///
    /// let mut responder = Responder::new(ResponderId(1001), None);
    /// let strict = responder
    ///     .set_preference(Preference::Weak(vec![
    ///         vec![ProposerId(2)],
    ///         vec![ProposerId(3), ProposerId(1)],
    ///     ]))
    ///     .unwrap();
    ///
    /// assert!(!strict);
    /// assert_eq!(responder.rank_of(ProposerId(3)), responder.rank_of(ProposerId(1)));
    /// assert!(responder.rank_of(ProposerId(2)) > responder.rank_of(ProposerId(3)));
    /// assert_eq!(responder.rank_of(ProposerId(9)), None);
    /// ```
    pub fn set_preference(&mut self, preference: Preference) -> Result<bool> {
        if self.adjudications > 0 {
            return Err(MatchError::ProtocolStarted);
        }

        let tiers = preference.tiers();

        let mut preference_rank = HashMap::new();
        for (index, tier) in tiers.iter().enumerate() {
            let rank = tier_rank(tiers.len(), index)?;
            preference_rank.extend(tier.iter().map(|&proposer| (proposer, rank)));
        }

        self.listed = tiers.iter().map(|tier| tier.len()).sum();
        self.preference_rank = preference_rank;

        Ok(preference.is_strict())
    }

    /// Rank of `proposer`, `None` if it is not on this responder's list
    #[inline]
    pub fn rank_of(&self, proposer: ProposerId) -> Option<u32> {
        self.preference_rank.get(&proposer).copied()
    }

    /// Rank of the currently held proposer
    #[inline]
    pub fn held_rank(&self) -> Option<u32> {
        self.matched_to.and_then(|held| self.rank_of(held))
    }

    /// Proposals adjudicated so far
    #[inline]
    pub fn adjudications(&self) -> u64 {
        self.adjudications
    }

    /// Adjudicate a proposal from `candidate`.
    ///
    /// Accepts only if the candidate's rank is strictly greater than the
    /// held proposer's rank. An unranked candidate never wins, and an
    /// equally ranked candidate never displaces.
    pub fn respond_to_proposal(&mut self, candidate: ProposerId) -> Response {
        self.adjudications += 1;

        let candidate_rank = self.rank_of(candidate);
        // None < Some(_): unranked loses against anything, including nothing
        if candidate_rank > self.held_rank() {
            match self.matched_to.replace(candidate) {
                Some(previous) => Response::Displaced(previous),
                None => Response::Accepted,
            }
        } else {
            Response::Rejected
        }
    }
}

/// Rank of the tier at `index`: the first of `tier_count` tiers ranks highest
fn tier_rank(tier_count: usize, index: usize) -> Result<u32> {
    u32::try_from(tier_count - index).map_err(|_| MatchError::TooManyTiers { tiers: tier_count })
}

impl Participant for Responder {
    type Id = ResponderId;
    type Counterpart = ProposerId;

    #[inline]
    fn id(&self) -> ResponderId {
        self.id
    }

    #[inline]
    fn display_name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn matched_to(&self) -> Option<ProposerId> {
        self.matched_to
    }

    fn validate(
        &self,
        known_proposers: &HashSet<ProposerId>,
        known_responders: &HashSet<ResponderId>,
    ) -> bool {
        let ranked_known = self
            .preference_rank
            .keys()
            .filter(|proposer| known_proposers.contains(proposer))
            .count();
        known_responders.contains(&self.id) && ranked_known == self.listed
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn proposers(ids: &[u64]) -> Vec<ProposerId> {
        ids.iter().copied().map(ProposerId).collect()
    }

    fn responder_with(order: &[u64]) -> Responder {
        let mut responder = Responder::new(ResponderId(1001), None);
        responder
            .set_preference(Preference::Strict(proposers(order)))
            .unwrap();
        responder
    }

    #[test]
    fn test_responder_default_name() {
        let responder = Responder::new(ResponderId(1002), None);
        assert_eq!(responder.display_name(), "Responder 1002");
    }

    #[test]
    fn test_responder_first_ranked_proposal_accepted() {
        let mut responder = responder_with(&[2, 3, 1]);

        assert_eq!(responder.respond_to_proposal(ProposerId(1)), Response::Accepted);
        assert_eq!(responder.matched_to(), Some(ProposerId(1)));
    }

    #[test]
    fn test_responder_trades_up() {
        let mut responder = responder_with(&[2, 3, 1]);

        responder.respond_to_proposal(ProposerId(1));
        assert_eq!(
            responder.respond_to_proposal(ProposerId(3)),
            Response::Displaced(ProposerId(1))
        );
        assert_eq!(responder.respond_to_proposal(ProposerId(1)), Response::Rejected);
        assert_eq!(
            responder.respond_to_proposal(ProposerId(2)),
            Response::Displaced(ProposerId(3))
        );
        assert_eq!(responder.matched_to(), Some(ProposerId(2)));
        assert_eq!(responder.adjudications(), 4);
    }

    #[test]
    fn test_responder_unranked_always_rejected() {
        let mut responder = responder_with(&[2]);

        assert_eq!(responder.respond_to_proposal(ProposerId(5)), Response::Rejected);
        assert_eq!(responder.matched_to(), None);

        responder.respond_to_proposal(ProposerId(2));
        assert_eq!(responder.respond_to_proposal(ProposerId(5)), Response::Rejected);
        assert_eq!(responder.matched_to(), Some(ProposerId(2)));
    }

    #[test]
    fn test_responder_tie_never_displaces() {
        let mut responder = Responder::new(ResponderId(1001), None);
        responder
            .set_preference(Preference::Weak(vec![proposers(&[1, 2]), proposers(&[3])]))
            .unwrap();

        assert_eq!(responder.respond_to_proposal(ProposerId(3)), Response::Accepted);
        assert_eq!(
            responder.respond_to_proposal(ProposerId(2)),
            Response::Displaced(ProposerId(3))
        );
        assert_eq!(responder.respond_to_proposal(ProposerId(1)), Response::Rejected);
        assert_eq!(responder.matched_to(), Some(ProposerId(2)));
    }

    #[test]
    fn test_responder_validation() {
        let known_p: HashSet<_> = proposers(&[1, 2, 3]).into_iter().collect();
        let known_r: HashSet<_> = [ResponderId(1001)].into_iter().collect();

        assert!(responder_with(&[2, 3, 1]).validate(&known_p, &known_r));
        assert!(!responder_with(&[2, 3, 1, 2]).validate(&known_p, &known_r), "duplicate");
        assert!(!responder_with(&[2, 4]).validate(&known_p, &known_r), "unknown proposer");

        let other_r: HashSet<_> = [ResponderId(1002)].into_iter().collect();
        assert!(!responder_with(&[1]).validate(&known_p, &other_r), "unknown self");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_tier_rank_checked() {
        assert_eq!(tier_rank(3, 0), Ok(3));
        assert_eq!(tier_rank(3, 2), Ok(1));

        let huge = u32::MAX as usize + 1;
        assert_eq!(tier_rank(huge, 0), Err(MatchError::TooManyTiers { tiers: huge }));
        assert_eq!(tier_rank(huge, 1), Ok(u32::MAX));
    }

    #[test]
    fn test_responder_preference_frozen_after_adjudication() {
        let mut responder = responder_with(&[1]);
        responder.respond_to_proposal(ProposerId(1));

        assert_eq!(
            responder.set_preference(Preference::Strict(proposers(&[2]))),
            Err(MatchError::ProtocolStarted)
        );
    }
}
