//! Property-based tests over arbitrary strict markets.
//!
//! Each case builds a market from generated preference lists, drives it to
//! completion and checks the guarantees the kernel makes regardless of the
//! input: bounded proposals, no blocking pair, a consistent pairing, and
//! independence from the order in which single steps are taken.

use deferred_acceptance::engine::{blocking_pairs, DriveMode, MatchingEngine};
use deferred_acceptance::{Market, Participant, Preference, ProposerId, ResponderId};

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

type Lists = (Vec<Vec<usize>>, Vec<Vec<usize>>);

/// Proposers list any subset of responders in any order; responders rank
/// every proposer.
fn market_lists() -> impl Strategy<Value = Lists> {
    (1usize..7, 1usize..7).prop_flat_map(|(proposers, responders)| {
        let all_responders: Vec<usize> = (0..responders).collect();
        let all_proposers: Vec<usize> = (0..proposers).collect();
        (
            prop::collection::vec(
                prop::sample::subsequence(all_responders, 0..=responders).prop_shuffle(),
                proposers,
            ),
            prop::collection::vec(Just(all_proposers).prop_shuffle(), responders),
        )
    })
}

fn build(lists: &Lists) -> Market {
    let (proposer_lists, responder_lists) = lists;
    let mut market = Market::new();

    let ps: Vec<ProposerId> = proposer_lists
        .iter()
        .map(|_| market.register_proposer(None, None).unwrap())
        .collect();
    let rs: Vec<ResponderId> = responder_lists
        .iter()
        .map(|_| market.register_responder(None, None).unwrap())
        .collect();

    for (&p, list) in ps.iter().zip(proposer_lists) {
        market.set_proposer_order(p, list.iter().map(|&i| rs[i]).collect()).unwrap();
    }
    for (&r, list) in rs.iter().zip(responder_lists) {
        let order = list.iter().map(|&i| ps[i]).collect();
        market.set_responder_preference(r, Preference::Strict(order)).unwrap();
    }
    market
}

proptest! {
    #[test]
    fn prop_rounds_end_stable_and_bounded(lists in market_lists()) {
        let mut market = build(&lists);
        let budget = (market.proposer_count() * market.responder_count()) as u64;

        let result = MatchingEngine::new(DriveMode::Rounds).run(&mut market).unwrap();

        prop_assert!(result.receipt.proposals_made <= budget);
        prop_assert!(blocking_pairs(&market).unwrap().is_empty());
        prop_assert!(!market.has_pending_proposals());
    }

    #[test]
    fn prop_pairing_is_consistent(lists in market_lists()) {
        let mut market = build(&lists);
        MatchingEngine::default().run(&mut market).unwrap();

        for (proposer, responder) in market.matched_pairs() {
            prop_assert_eq!(market.responder(responder).unwrap().matched_to(), Some(proposer));
            prop_assert!(market.proposer(proposer).unwrap().position_of(responder).is_some());
            prop_assert!(market.responder(responder).unwrap().rank_of(proposer).is_some());
        }
        for responder in market.responders() {
            if let Some(proposer) = responder.matched_to() {
                prop_assert_eq!(market.proposer(proposer).unwrap().matched_to(), Some(responder.id()));
            }
        }
    }

    #[test]
    fn prop_step_order_does_not_matter(lists in market_lists(), order_seed in any::<u64>()) {
        let mut by_rounds = build(&lists);
        MatchingEngine::new(DriveMode::Rounds).run(&mut by_rounds).unwrap();

        let mut by_steps = build(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(order_seed);
        while by_steps.has_pending_proposals() {
            let pending: Vec<ProposerId> = by_steps.pending_proposers().collect();
            let pick = pending[rng.gen_range(0..pending.len())];
            by_steps.advance_one(pick).unwrap();
        }

        prop_assert_eq!(by_steps.matched_pairs(), by_rounds.matched_pairs());
        prop_assert_eq!(by_steps.state_root().unwrap(), by_rounds.state_root().unwrap());
    }
}
