//! # Deferred Acceptance
//!
//! Deterministic Gale-Shapley matching for two-sided markets.
//!
//! ## Architecture
//!
//! The kernel consists of:
//! - **Types**: identities, proposal outcomes, snapshots, receipts
//! - **Participant**: Proposer and Responder state machines
//! - **Market**: slab-owned participants and the proposal protocol
//! - **Engine**: drives a validated market to its stable matching
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs give identical matchings and state roots
//! 2. **Single Owner**: the market owns every participant; no back-references
//! 3. **Typed Identities**: proposer and responder ids cannot be mixed up
//! 4. **Synchronous Execution**: no async, no locks
//!
//! ## Guarantees
//!
//! - Termination within proposers x responders proposals
//! - The final matching has no blocking pair
//! - Round mode and any single-step order reach the same matching

// ============================================================================
// Module declarations
// ============================================================================

/// Market configuration and JSON descriptions
pub mod config;

/// Error types
pub mod error;

/// Core value types: ids, outcomes, snapshots, receipts
pub mod types;

/// Proposer and Responder state machines
pub mod participant;

/// Market: arenas, validation, protocol, reporting
pub mod market;

/// Matching engine: run-to-completion driver and stability check
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{MarketConfig, MarketDescription};
pub use engine::{DriveMode, MatchResult, MatchingEngine};
pub use error::{MatchError, SetupError};
pub use market::{Market, SetupReport};
pub use participant::{Participant, Preference, Proposer, Responder};
pub use types::{MatchReceipt, ProposalOutcome, ProposerId, ResponderId, Verdict};
