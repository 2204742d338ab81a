//! Pre-flight validation of a market.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{MatchError, Result, SetupError};
use crate::market::Market;
use crate::participant::Participant;
use crate::types::{ProposerId, ResponderId};

/// Findings of [`Market::check_setup`].
///
/// The three flags are independent; `first_error` carries the first problem
/// found, checking bookkeeping, then proposers, then responders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    /// Registered counts match the arenas
    pub market_ok: bool,
    /// Every proposer's proposal order validates
    pub proposers_ok: bool,
    /// Every responder's preference validates
    pub responders_ok: bool,
    /// First problem encountered
    pub first_error: Option<SetupError>,
}

impl SetupReport {
    /// All three checks passed
    pub fn is_valid(&self) -> bool {
        self.market_ok && self.proposers_ok && self.responders_ok
    }

    /// Convert into a result, failing with [`MatchError::InvalidSetup`]
    pub fn into_result(self) -> Result<()> {
        match self.first_error {
            Some(err) => Err(MatchError::InvalidSetup(err)),
            None => Ok(()),
        }
    }
}

impl Market {
    /// Check identity bookkeeping and every participant's preference data.
    ///
    /// Driving the protocol on a market that fails this check gives
    /// unspecified (but memory-safe) results.
    pub fn check_setup(&self) -> SetupReport {
        let mut first_error = None;

        let market_ok = if self.registered_proposers != self.proposers.len() {
            first_error = Some(SetupError::ProposerCountMismatch {
                registered: self.registered_proposers,
                stored: self.proposers.len(),
            });
            false
        } else if self.registered_responders != self.responders.len() {
            first_error = Some(SetupError::ResponderCountMismatch {
                registered: self.registered_responders,
                stored: self.responders.len(),
            });
            false
        } else {
            true
        };

        let known_proposers: HashSet<ProposerId> = self.proposer_index.keys().copied().collect();
        let known_responders: HashSet<ResponderId> = self.responder_index.keys().copied().collect();

        let invalid_proposer = self
            .proposers()
            .find(|proposer| !proposer.validate(&known_proposers, &known_responders));
        if let Some(proposer) = invalid_proposer.filter(|_| first_error.is_none()) {
            first_error = Some(SetupError::InvalidProposer {
                id: proposer.id(),
                name: proposer.display_name().to_owned(),
            });
        }

        let invalid_responder = self
            .responders()
            .find(|responder| !responder.validate(&known_proposers, &known_responders));
        if let Some(responder) = invalid_responder.filter(|_| first_error.is_none()) {
            first_error = Some(SetupError::InvalidResponder {
                id: responder.id(),
                name: responder.display_name().to_owned(),
            });
        }

        if let Some(err) = &first_error {
            warn!(%err, "market setup is invalid");
        }

        SetupReport {
            market_ok,
            proposers_ok: invalid_proposer.is_none(),
            responders_ok: invalid_responder.is_none(),
            first_error,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Preference;

    fn two_by_two() -> Market {
        let mut market = Market::new();
        let p1 = market.register_proposer(None, None).unwrap();
        let p2 = market.register_proposer(None, None).unwrap();
        let r1 = market.register_responder(None, None).unwrap();
        let r2 = market.register_responder(None, None).unwrap();

        market.set_proposer_order(p1, vec![r1, r2]).unwrap();
        market.set_proposer_order(p2, vec![r2, r1]).unwrap();
        market.set_responder_preference(r1, Preference::Strict(vec![p2, p1])).unwrap();
        market.set_responder_preference(r2, Preference::Strict(vec![p1, p2])).unwrap();
        market
    }

    #[test]
    fn test_valid_setup() {
        let report = two_by_two().check_setup();

        assert!(report.is_valid());
        assert_eq!(report.first_error, None);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_duplicate_in_proposal_order() {
        let mut market = two_by_two();
        market
            .set_proposer_order(ProposerId(2), vec![ResponderId(1002), ResponderId(1002)])
            .unwrap();

        let report = market.check_setup();
        assert!(report.market_ok);
        assert!(!report.proposers_ok);
        assert!(report.responders_ok);

        let err = report.first_error.clone().unwrap();
        assert_eq!(err.to_string(), "Proposer 2 is incorrect");
        assert!(matches!(
            report.into_result(),
            Err(MatchError::InvalidSetup(SetupError::InvalidProposer { id: ProposerId(2), .. }))
        ));
    }

    #[test]
    fn test_unknown_proposer_in_responder_preference() {
        let mut market = two_by_two();
        market
            .set_responder_preference(ResponderId(1001), Preference::Strict(vec![ProposerId(7)]))
            .unwrap();

        let report = market.check_setup();
        assert!(report.proposers_ok);
        assert!(!report.responders_ok);
        assert_eq!(report.first_error.unwrap().to_string(), "Responder 1001 is incorrect");
    }

    #[test]
    fn test_count_mismatch_reported_first() {
        let mut market = two_by_two();
        market.register_responder(None, Some(ResponderId(1001))).unwrap();
        market
            .set_proposer_order(ProposerId(1), vec![ResponderId(1001), ResponderId(1001)])
            .unwrap();

        let report = market.check_setup();
        assert!(!report.market_ok);
        assert!(!report.proposers_ok);
        assert!(matches!(
            report.first_error,
            Some(SetupError::ResponderCountMismatch { registered: 3, stored: 2 })
        ));
    }
}
