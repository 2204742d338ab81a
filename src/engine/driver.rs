//! Run a market to its stable matching.

use tracing::{info, warn};

use crate::error::{MatchError, Result};
use crate::market::{transcript_root, Market};
use crate::types::{MatchReceipt, ProposalOutcome};

/// How the engine drives proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DriveMode {
    /// Repeatedly move the lowest-id pending proposer, one proposal at a time
    SingleStep,
    /// Every pending proposer moves once per round
    #[default]
    Rounds,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Every proposal made, in order (no-ops omitted)
    pub outcomes: Vec<ProposalOutcome>,

    /// Rounds driven (0 in single-step mode)
    pub rounds: u64,

    /// Run summary
    pub receipt: MatchReceipt,
}

impl MatchResult {
    /// Hash of the outcome transcript
    pub fn transcript_root(&self) -> Result<[u8; 32]> {
        transcript_root(&self.outcomes)
    }
}

/// Deterministic deferred-acceptance driver.
///
/// Stateless apart from its mode; the market holds all run state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine {
    mode: DriveMode,
}

impl MatchingEngine {
    /// Create an engine in the given mode
    pub fn new(mode: DriveMode) -> Self {
        Self { mode }
    }

    /// The configured mode
    #[inline]
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Validate `market`, then drive it until no proposer can move.
    ///
    /// # Errors
    ///
    /// - [`MatchError::InvalidSetup`] if [`Market::check_setup`] fails
    /// - [`MatchError::ProposalBudgetExceeded`] if more than
    ///   proposers x responders proposals are made
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::engine::{DriveMode, MatchingEngine};
    /// use deferred_acceptance::market::Market;
    /// use deferred_acceptance::participant::Preference;
    ///
    /// let mut market = Market::new();
    /// let p = market.register_proposer(None, None).unwrap();
    /// let r = market.register_responder(None, None).unwrap();
    /// market.set_proposer_order(p, vec![r]).unwrap();
    /// market.set_responder_preference(r, Preference::Strict(vec![p])).unwrap();
    ///
    /// let result = MatchingEngine::new(DriveMode::Rounds).run(&mut market).unwrap();
    /// assert_eq!(result.outcomes.len(), 1);
    /// assert!(result.receipt.is_complete());
    /// ```
    pub fn run(&self, market: &mut Market) -> Result<MatchResult> {
        if let Err(err) = market.check_setup().into_result() {
            warn!(%err, "refusing to run invalid market");
            return Err(err);
        }

        let budget = market.proposer_count() as u64 * market.responder_count() as u64;
        let mut outcomes = Vec::new();
        let mut rounds = 0u64;

        while market.has_pending_proposals() {
            match self.mode {
                DriveMode::Rounds => {
                    outcomes.extend(market.advance_round()?);
                    rounds += 1;
                }
                DriveMode::SingleStep => {
                    let Some(next) = market.pending_proposers().next() else {
                        break;
                    };
                    let outcome = market.advance_one(next)?;
                    if !outcome.is_noop() {
                        outcomes.push(outcome);
                    }
                }
            }

            if market.proposal_count() > budget {
                return Err(MatchError::ProposalBudgetExceeded { budget });
            }
        }

        let receipt = market.receipt(rounds)?;
        info!(
            mode = ?self.mode,
            proposals = receipt.proposals_made,
            rounds,
            matched = receipt.matched_pairs,
            state_root = %receipt.state_root_hex(),
            "matching complete"
        );

        Ok(MatchResult {
            outcomes,
            rounds,
            receipt,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Preference;
    use crate::types::{ProposerId, ResponderId};

    fn three_by_three() -> Market {
        let mut market = Market::new();
        let m: Vec<_> = (0..3).map(|_| market.register_proposer(None, None).unwrap()).collect();
        let w: Vec<_> = (0..3).map(|_| market.register_responder(None, None).unwrap()).collect();

        market.set_proposer_order(m[0], vec![w[0], w[1], w[2]]).unwrap();
        market.set_proposer_order(m[1], vec![w[2], w[1], w[0]]).unwrap();
        market.set_proposer_order(m[2], vec![w[2], w[0], w[1]]).unwrap();
        market.set_responder_preference(w[0], Preference::Strict(vec![m[1], m[2], m[0]])).unwrap();
        market.set_responder_preference(w[1], Preference::Strict(vec![m[1], m[2], m[0]])).unwrap();
        market.set_responder_preference(w[2], Preference::Strict(vec![m[1], m[0], m[2]])).unwrap();
        market
    }

    #[test]
    fn test_engine_rounds() {
        let mut market = three_by_three();
        let result = MatchingEngine::new(DriveMode::Rounds).run(&mut market).unwrap();

        assert_eq!(result.rounds, 3);
        assert_eq!(result.outcomes.len(), 5);
        assert_eq!(result.receipt.proposals_made, 5);
        assert!(result.receipt.is_complete());
    }

    #[test]
    fn test_engine_single_step() {
        let mut market = three_by_three();
        let result = MatchingEngine::new(DriveMode::SingleStep).run(&mut market).unwrap();

        assert_eq!(result.rounds, 0);
        assert_eq!(result.outcomes.len(), 5);
        assert_eq!(
            market.matched_pairs(),
            vec![
                (ProposerId(1), ResponderId(1002)),
                (ProposerId(2), ResponderId(1003)),
                (ProposerId(3), ResponderId(1001)),
            ]
        );
    }

    #[test]
    fn test_engine_modes_agree() {
        let mut a = three_by_three();
        let mut b = three_by_three();

        let rounds = MatchingEngine::new(DriveMode::Rounds).run(&mut a).unwrap();
        let single = MatchingEngine::new(DriveMode::SingleStep).run(&mut b).unwrap();

        assert_eq!(rounds.receipt.state_root, single.receipt.state_root);
        assert_eq!(rounds.receipt.choice_rank_sum, single.receipt.choice_rank_sum);
    }

    #[test]
    fn test_engine_rejects_invalid_market() {
        let mut market = three_by_three();
        market
            .set_proposer_order(ProposerId(3), vec![ResponderId(1001), ResponderId(1001)])
            .unwrap();

        let err = MatchingEngine::default().run(&mut market).unwrap_err();
        assert!(matches!(err, MatchError::InvalidSetup(_)));
        assert_eq!(market.proposal_count(), 0);
        assert!(!market.is_started());
    }

    #[test]
    fn test_engine_empty_market() {
        let mut market = Market::new();
        let result = MatchingEngine::default().run(&mut market).unwrap();

        assert!(result.outcomes.is_empty());
        assert_eq!(result.rounds, 0);
        assert_eq!(result.receipt.match_rate(), None);
    }
}
