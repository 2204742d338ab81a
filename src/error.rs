//! Error types for the matching kernel
//!
//! Setup problems are collected into a [`SetupReport`](crate::market::SetupReport)
//! and only become a [`MatchError`] when a caller insists on a valid market.
//! Rejections are ordinary protocol outcomes and never show up here.

use thiserror::Error;

use crate::types::{ProposerId, ResponderId};

/// Top-level matching error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Unknown proposer: {0}")]
    UnknownProposer(ProposerId),

    #[error("Unknown responder: {0}")]
    UnknownResponder(ResponderId),

    #[error("Protocol already started; setup is frozen")]
    ProtocolStarted,

    #[error("Proposer {0} has no pending proposal")]
    NoPendingProposal(ProposerId),

    #[error("Proposer {0} is not matched")]
    NotMatched(ProposerId),

    #[error("Invalid market setup: {0}")]
    InvalidSetup(#[from] SetupError),

    #[error("Proposal budget of {budget} exceeded")]
    ProposalBudgetExceeded { budget: u64 },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Unknown participant name: {0}")]
    UnknownName(String),

    #[error("Participant name used twice on one side: {0}")]
    DuplicateName(String),

    #[error("Preference has {tiers} tiers; ranks are limited to u32")]
    TooManyTiers { tiers: usize },
}

/// Findings of the pre-flight market check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Proposer identities assigned incorrectly: {registered} registered, {stored} stored")]
    ProposerCountMismatch { registered: usize, stored: usize },

    #[error("Responder identities assigned incorrectly: {registered} registered, {stored} stored")]
    ResponderCountMismatch { registered: usize, stored: usize },

    #[error("{name} is incorrect")]
    InvalidProposer { id: ProposerId, name: String },

    #[error("{name} is incorrect")]
    InvalidResponder { id: ResponderId, name: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MatchError>;

impl From<ssz_rs::SerializeError> for MatchError {
    fn from(err: ssz_rs::SerializeError) -> Self {
        MatchError::Encoding(format!("{err:?}"))
    }
}
