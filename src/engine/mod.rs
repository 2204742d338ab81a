//! Matching engine for deferred acceptance.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same market in, same matching (and state root) out
//! 2. **Mode independence**: rounds and single steps reach the same matching
//! 3. **Synchronous Execution**: no async, no shared state
//! 4. **Fail loudly**: invalid setups and unknown ids are errors, not defaults
//!
//! ## Example
//!
//! ```
//! use deferred_acceptance::engine::{blocking_pairs, DriveMode, MatchingEngine};
//! use deferred_acceptance::market::Market;
//! use deferred_acceptance::participant::Preference;
//!
//! let mut market = Market::new();
//! let a = market.register_proposer(None, None).unwrap();
//! let b = market.register_proposer(None, None).unwrap();
//! let x = market.register_responder(None, None).unwrap();
//! let y = market.register_responder(None, None).unwrap();
//! market.set_proposer_order(a, vec![x, y]).unwrap();
//! market.set_proposer_order(b, vec![x, y]).unwrap();
//! market.set_responder_preference(x, Preference::Strict(vec![b, a])).unwrap();
//! market.set_responder_preference(y, Preference::Strict(vec![a, b])).unwrap();
//!
//! let result = MatchingEngine::new(DriveMode::SingleStep).run(&mut market).unwrap();
//!
//! assert_eq!(result.receipt.matched_pairs, 2);
//! assert!(blocking_pairs(&market).unwrap().is_empty());
//! ```

pub mod driver;
pub mod stability;

pub use driver::{DriveMode, MatchResult, MatchingEngine};
pub use stability::{blocking_pairs, is_stable};
