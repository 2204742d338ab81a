//! Blocking-pair scan.
//!
//! A pair (p, r) blocks the current matching when p lists r above its
//! current partner (or p is unmatched and lists r) and r ranks p strictly
//! above whoever it holds. A stable matching has no blocking pair.
//!
//! The scan is O(P x R) and meant for verification, not the hot path.

use crate::error::Result;
use crate::market::Market;
use crate::participant::Participant;
use crate::types::{ProposerId, ResponderId};

/// Every blocking pair of the market's current matching, in proposer
/// registration order.
pub fn blocking_pairs(market: &Market) -> Result<Vec<(ProposerId, ResponderId)>> {
    let mut blocking = Vec::new();

    for proposer in market.proposers() {
        let current = proposer
            .matched_to()
            .and_then(|r| proposer.position_of(r))
            .unwrap_or(usize::MAX);

        for &candidate in proposer.proposal_order().iter().take(current) {
            let responder = market.responder(candidate)?;
            let rank = responder.rank_of(proposer.id());
            if rank.is_some() && rank > responder.held_rank() {
                blocking.push((proposer.id(), candidate));
            }
        }
    }

    Ok(blocking)
}

/// No blocking pair exists
pub fn is_stable(market: &Market) -> Result<bool> {
    Ok(blocking_pairs(market)?.is_empty())
}
