//! Core value types for the matching kernel.
//!
//! ## Types
//!
//! - [`ProposerId`] / [`ResponderId`]: typed participant identities
//! - [`ProposalOutcome`]: what one proposer move produced
//! - [`MarketSnapshot`]: who is matched to whom at a point in time
//! - [`MatchReceipt`]: run summary with a state root
//!
//! Record types that feed a hash (`OutcomeRecord`, `PairRecord`,
//! `MatchReceipt`) derive `SimpleSerialize` for deterministic encoding.

mod ids;
mod outcome;
mod receipt;
mod snapshot;

pub use ids::{ProposerId, ResponderId};
pub use outcome::{OutcomeRecord, ProposalOutcome, Verdict};
pub use receipt::MatchReceipt;
pub use snapshot::{MarketSnapshot, PairRecord, Pairing};
