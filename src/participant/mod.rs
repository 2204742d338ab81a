//! Participants of a two-sided market.
//!
//! ## Roles
//!
//! - [`Proposer`]: walks its proposal order one responder at a time and
//!   never revisits a rejection
//! - [`Responder`]: holds the best proposal seen so far and trades up only
//!   on a strict rank improvement
//!
//! Both roles implement [`Participant`], the shared view the market uses for
//! validation, name lookup and snapshots. Participants hold no references to
//! each other; every cross-entity lookup goes through the market's arenas.

pub mod proposer;
pub mod responder;

use std::collections::HashSet;

use crate::types::{ProposerId, ResponderId};

pub use proposer::Proposer;
pub use responder::{Preference, Responder, Response};

/// Behaviour shared by both sides of the market.
pub trait Participant {
    /// Identity type of this side
    type Id: Copy + Eq;
    /// Identity type of the other side
    type Counterpart: Copy + Eq;

    /// This participant's identity
    fn id(&self) -> Self::Id;

    /// Human-readable label
    fn display_name(&self) -> &str;

    /// Current partner, if any
    fn matched_to(&self) -> Option<Self::Counterpart>;

    /// Check that this participant's own id and every id in its preference
    /// data are known, and that the preference data has no duplicates.
    fn validate(
        &self,
        known_proposers: &HashSet<ProposerId>,
        known_responders: &HashSet<ResponderId>,
    ) -> bool;
}
