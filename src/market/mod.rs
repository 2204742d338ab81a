//! The market: participant arenas and the deferred-acceptance protocol.
//!
//! ## Architecture
//!
//! - **state**: slab arenas, registration, preference loading
//! - **validation**: pre-flight [`SetupReport`]
//! - **protocol**: single-step and round-based proposal driving
//! - **report**: snapshots, narratives, state root, receipt
//!
//! ## Invariants
//!
//! | Invariant | Maintained by |
//! |-----------|---------------|
//! | a responder's held rank never decreases | strict `>` in adjudication |
//! | a proposer never re-proposes | monotone cursor |
//! | unmatched set = unmatched and not exhausted | every move re-syncs it |
//! | at most P x R proposals | each proposer walks its list once |
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::market::Market;
//! use deferred_acceptance::participant::Preference;
//!
//! let mut market = Market::new();
//! let alice = market.register_proposer(Some("alice"), None).unwrap();
//! let bob = market.register_proposer(Some("bob"), None).unwrap();
//! let x = market.register_responder(Some("x"), None).unwrap();
//! let y = market.register_responder(Some("y"), None).unwrap();
//!
//! market.set_proposer_order(alice, vec![x, y]).unwrap();
//! market.set_proposer_order(bob, vec![x, y]).unwrap();
//! market.set_responder_preference(x, Preference::Strict(vec![bob, alice])).unwrap();
//! market.set_responder_preference(y, Preference::Strict(vec![alice, bob])).unwrap();
//! assert!(market.check_setup().is_valid());
//!
//! while market.has_pending_proposals() {
//!     market.advance_round().unwrap();
//! }
//! assert_eq!(market.matched_pairs(), vec![(alice, y), (bob, x)]);
//! ```

mod protocol;
mod report;
mod state;
mod validation;

pub use report::transcript_root;
pub use state::Market;
pub use validation::SetupReport;
