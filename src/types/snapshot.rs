//! Point-in-time views of the matching.

use ssz_rs::prelude::*;

use crate::types::{ProposerId, ResponderId};

/// One line of a snapshot.
///
/// Every proposer appears once as `(Some(p), matched_or_none)`. Responders
/// holding nobody appear as `(None, Some(r))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pairing {
    pub proposer: Option<ProposerId>,
    pub responder: Option<ResponderId>,
}

impl Pairing {
    /// Both sides present
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.proposer.is_some() && self.responder.is_some()
    }
}

/// Snapshot of the whole market by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    /// Number of proposals made so far
    pub proposal_count: u64,
    /// Proposers in registration order, then unmatched responders
    pub pairs: Vec<Pairing>,
}

impl MarketSnapshot {
    /// Matched pairs only, sorted by proposer id.
    ///
    /// Two snapshots describe the same matching iff this is equal.
    pub fn matched_pairs(&self) -> Vec<(ProposerId, ResponderId)> {
        let mut pairs: Vec<_> = self
            .pairs
            .iter()
            .filter_map(|pairing| Some((pairing.proposer?, pairing.responder?)))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

/// SSZ container for one matched pair, hashed into the state root.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct PairRecord {
    pub proposer: u64,
    pub responder: u64,
}

impl From<(ProposerId, ResponderId)> for PairRecord {
    fn from((proposer, responder): (ProposerId, ResponderId)) -> Self {
        Self {
            proposer: proposer.get(),
            responder: responder.get(),
        }
    }
}
