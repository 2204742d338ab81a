//! Match receipt summarizing a completed (or in-progress) run.
//!
//! The MatchReceipt is the proof-of-run for a matching: counts, the state
//! root of the final pairing, and a couple of welfare statistics.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Receipt summarizing a matching run.
///
/// ## State Root
///
/// The 32-byte state root is a SHA-256 hash over the SSZ-encoded matched
/// pairs, sorted by proposer id. Two runs that reach the same matching have
/// the same root, whichever drive mode or move order produced it.
///
/// ## Example
///
/// ```
/// use deferred_acceptance::types::MatchReceipt;
///
/// let receipt = MatchReceipt {
///     proposals_made: 5,
///     rounds: 3,
///     proposer_count: 3,
///     responder_count: 3,
///     matched_pairs: 3,
///     choice_rank_sum: 5,
///     state_root: [0u8; 32],
/// };
///
/// assert!(receipt.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct MatchReceipt {
    /// Total proposals made during the run
    pub proposals_made: u64,

    /// Rounds driven (0 when driven move by move)
    pub rounds: u64,

    /// Registered proposers
    pub proposer_count: u64,

    /// Registered responders
    pub responder_count: u64,

    /// Proposers holding a responder at the end of the run
    pub matched_pairs: u64,

    /// Sum over matched proposers of the 1-based position of their partner
    /// in their own proposal order
    pub choice_rank_sum: u64,

    /// SHA-256 of the matched pairs (32 bytes)
    pub state_root: [u8; 32],
}

impl MatchReceipt {
    /// Compute SHA-256 hash of the given data
    pub fn compute_hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Every proposer ended up matched
    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.proposer_count
    }

    /// Proposers without a partner
    pub fn unmatched_proposers(&self) -> u64 {
        self.proposer_count.saturating_sub(self.matched_pairs)
    }

    /// Responders without a partner
    pub fn unmatched_responders(&self) -> u64 {
        self.responder_count.saturating_sub(self.matched_pairs)
    }

    /// Share of proposers that got matched.
    ///
    /// Returns None if the market had no proposers.
    pub fn match_rate(&self) -> Option<Decimal> {
        if self.proposer_count == 0 {
            return None;
        }
        Decimal::from(self.matched_pairs).checked_div(Decimal::from(self.proposer_count))
    }

    /// Average position (1 = first choice) of the partner each matched
    /// proposer received.
    ///
    /// Returns None if nobody got matched.
    pub fn mean_proposer_choice(&self) -> Option<Decimal> {
        if self.matched_pairs == 0 {
            return None;
        }
        Decimal::from(self.choice_rank_sum).checked_div(Decimal::from(self.matched_pairs))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
