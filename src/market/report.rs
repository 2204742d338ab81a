//! Read-only projections of market state: snapshots, narratives, receipts.
//!
//! Nothing in here mutates the market.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::market::Market;
use crate::participant::Participant;
use crate::types::{
    MarketSnapshot, MatchReceipt, PairRecord, Pairing, ProposalOutcome, ProposerId, ResponderId,
};

impl Market {
    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Current pairing by identity.
    ///
    /// Every proposer in registration order as `(Some(p), matched_or_none)`,
    /// followed by `(None, Some(r))` for each responder holding nobody.
    pub fn snapshot_by_id(&self) -> MarketSnapshot {
        let proposers = self.proposers().map(|proposer| Pairing {
            proposer: Some(proposer.id()),
            responder: proposer.matched_to(),
        });
        let lonely_responders = self
            .responders()
            .filter(|responder| responder.matched_to().is_none())
            .map(|responder| Pairing {
                proposer: None,
                responder: Some(responder.id()),
            });

        MarketSnapshot {
            proposal_count: self.proposal_count,
            pairs: proposers.chain(lonely_responders).collect(),
        }
    }

    /// Current pairing as sentences, e.g. `"Proposer 1 matched to Responder 1002"`.
    ///
    /// Absent partners render as `None`.
    pub fn snapshot_text(&self) -> Result<(u64, Vec<String>)> {
        let mut lines = Vec::with_capacity(self.proposer_count());

        for proposer in self.proposers() {
            let partner = match proposer.matched_to() {
                Some(responder) => self.responder(responder)?.display_name(),
                None => "None",
            };
            lines.push(format!("{} matched to {}", proposer.display_name(), partner));
        }
        for responder in self.responders() {
            if responder.matched_to().is_none() {
                lines.push(format!("None matched to {}", responder.display_name()));
            }
        }

        Ok((self.proposal_count, lines))
    }

    /// Narrate one outcome.
    ///
    /// A no-op yields nothing. Otherwise the proposal number, who proposed
    /// to whom, and who got rejected when someone did.
    pub fn describe(&self, outcome: &ProposalOutcome) -> Result<Vec<String>> {
        let ProposalOutcome::Proposed {
            sequence_id,
            proposer,
            responder,
            ..
        } = *outcome
        else {
            return Ok(Vec::new());
        };

        let proposer_name = self.proposer(proposer)?.display_name();
        let responder_name = self.responder(responder)?.display_name();

        let mut lines = vec![
            format!("Proposal No. {sequence_id}"),
            format!("{proposer_name} proposed to {responder_name}"),
        ];
        if let Some(rejected) = outcome.rejected() {
            let rejected_name = self.proposer(rejected)?.display_name();
            lines.push(format!("{responder_name} rejected {rejected_name}"));
        }
        Ok(lines)
    }

    // ========================================================================
    // Name Lookup
    // ========================================================================

    /// Proposer id -> display name
    pub fn proposer_names(&self) -> BTreeMap<ProposerId, String> {
        self.proposers()
            .map(|proposer| (proposer.id(), proposer.display_name().to_owned()))
            .collect()
    }

    /// Responder id -> display name
    pub fn responder_names(&self) -> BTreeMap<ResponderId, String> {
        self.responders()
            .map(|responder| (responder.id(), responder.display_name().to_owned()))
            .collect()
    }

    // ========================================================================
    // State Root & Receipt
    // ========================================================================

    /// Matched pairs sorted by proposer id
    pub fn matched_pairs(&self) -> Vec<(ProposerId, ResponderId)> {
        let mut pairs: Vec<_> = self
            .proposers()
            .filter_map(|proposer| Some((proposer.id(), proposer.matched_to()?)))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// SHA-256 over the SSZ-encoded matched pairs.
    ///
    /// Depends only on who is matched to whom, never on how the matching was
    /// reached.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        let mut bytes = Vec::new();
        for pair in self.matched_pairs() {
            bytes.extend(ssz_rs::serialize(&PairRecord::from(pair))?);
        }
        Ok(MatchReceipt::compute_hash(&bytes))
    }

    /// Summarize the run so far.
    ///
    /// # Arguments
    ///
    /// * `rounds` - Rounds driven by the caller (0 for single-step driving)
    pub fn receipt(&self, rounds: u64) -> Result<MatchReceipt> {
        let mut matched_pairs = 0u64;
        let mut choice_rank_sum = 0u64;
        for proposer in self.proposers() {
            if let Some(position) = proposer.matched_to().and_then(|r| proposer.position_of(r)) {
                matched_pairs += 1;
                choice_rank_sum += position as u64 + 1;
            }
        }

        Ok(MatchReceipt {
            proposals_made: self.proposal_count,
            rounds,
            proposer_count: self.proposer_count() as u64,
            responder_count: self.responder_count() as u64,
            matched_pairs,
            choice_rank_sum,
            state_root: self.state_root()?,
        })
    }
}

/// SHA-256 over the SSZ-encoded outcome records, in order.
///
/// Identical transcripts hash identically; use it to check that a replay
/// made the same moves.
pub fn transcript_root(outcomes: &[ProposalOutcome]) -> Result<[u8; 32]> {
    let mut bytes = Vec::with_capacity(outcomes.len() * 33);
    for outcome in outcomes {
        bytes.extend(ssz_rs::serialize(&outcome.to_record())?);
    }
    Ok(MatchReceipt::compute_hash(&bytes))
}

// ============================================================================
// Unit Tests
// ============================================================================
