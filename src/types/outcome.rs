//! Proposal outcome records.
//!
//! Every call into the protocol yields a [`ProposalOutcome`]: either a
//! no-op (the proposer had nothing to do) or a proposal with the
//! responder's verdict attached.
//!
//! ## SSZ Serialization
//!
//! [`OutcomeRecord`] is the flat wire form of an outcome. It derives
//! `SimpleSerialize` so a transcript of outcomes hashes to the same bytes on
//! every run. Absent ids are encoded as 0 and disambiguated by `kind_raw`.

use ssz_rs::prelude::*;

use crate::types::{ProposerId, ResponderId};

// ============================================================================
// Verdict enum
// ============================================================================

/// How a responder answered a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Accepted; the responder held nobody before.
    Accepted,
    /// Declined outright; the proposer stays unmatched.
    Rejected,
    /// Accepted, displacing the proposer the responder held before.
    Displaced(ProposerId),
}

impl Verdict {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Verdict::Accepted => 1,
            Verdict::Rejected => 2,
            Verdict::Displaced(_) => 3,
        }
    }

    /// True when the proposer ended up holding the responder
    pub fn is_acceptance(self) -> bool {
        !matches!(self, Verdict::Rejected)
    }
}

// ============================================================================
// ProposalOutcome
// ============================================================================

/// Result of asking a proposer to move.
///
/// ## Example
///
/// ```
/// use deferred_acceptance::types::{ProposalOutcome, ProposerId, ResponderId, Verdict};
///
/// let outcome = ProposalOutcome::Proposed {
///     sequence_id: 4,
///     proposer: ProposerId(3),
///     responder: ResponderId(1001),
///     verdict: Verdict::Displaced(ProposerId(1)),
/// };
///
/// assert_eq!(outcome.sequence_id(), Some(4));
/// assert_eq!(outcome.rejected(), Some(ProposerId(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalOutcome {
    /// The proposer made no proposal (already matched or list exhausted).
    NoOp {
        proposer: ProposerId,
    },
    /// A proposal was made and adjudicated.
    Proposed {
        sequence_id: u64,
        proposer: ProposerId,
        responder: ResponderId,
        verdict: Verdict,
    },
}

impl ProposalOutcome {
    /// The proposer this outcome belongs to
    pub fn proposer(&self) -> ProposerId {
        match *self {
            ProposalOutcome::NoOp { proposer } => proposer,
            ProposalOutcome::Proposed { proposer, .. } => proposer,
        }
    }

    /// Global proposal sequence number, `None` for a no-op
    pub fn sequence_id(&self) -> Option<u64> {
        match *self {
            ProposalOutcome::NoOp { .. } => None,
            ProposalOutcome::Proposed { sequence_id, .. } => Some(sequence_id),
        }
    }

    /// Responder proposed to, `None` for a no-op
    pub fn responder(&self) -> Option<ResponderId> {
        match *self {
            ProposalOutcome::NoOp { .. } => None,
            ProposalOutcome::Proposed { responder, .. } => Some(responder),
        }
    }

    /// Proposer that got rejected by this proposal, if any.
    ///
    /// Equal to [`proposer`](Self::proposer) on an outright rejection, a
    /// different id when a held match was displaced.
    pub fn rejected(&self) -> Option<ProposerId> {
        match *self {
            ProposalOutcome::Proposed {
                proposer,
                verdict: Verdict::Rejected,
                ..
            } => Some(proposer),
            ProposalOutcome::Proposed {
                verdict: Verdict::Displaced(previous),
                ..
            } => Some(previous),
            _ => None,
        }
    }

    /// Check whether this is the no-op record
    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self, ProposalOutcome::NoOp { .. })
    }

    /// Flatten into the SSZ wire form
    pub fn to_record(&self) -> OutcomeRecord {
        match *self {
            ProposalOutcome::NoOp { proposer } => OutcomeRecord {
                kind_raw: 0,
                sequence_id: 0,
                proposer: proposer.get(),
                responder: 0,
                rejected: 0,
            },
            ProposalOutcome::Proposed {
                sequence_id,
                proposer,
                responder,
                verdict,
            } => OutcomeRecord {
                kind_raw: verdict.to_u8(),
                sequence_id,
                proposer: proposer.get(),
                responder: responder.get(),
                rejected: self.rejected().map(ProposerId::get).unwrap_or(0),
            },
        }
    }
}

// ============================================================================
// OutcomeRecord (wire form)
// ============================================================================

/// Fixed-size SSZ container for one outcome.
///
/// ## SSZ Layout
///
/// - Total size: 33 bytes (1+8+8+8+8)
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OutcomeRecord {
    /// 0 = no-op, 1 = accepted, 2 = rejected, 3 = displaced
    pub kind_raw: u8,

    /// Proposal sequence number (0 for a no-op)
    pub sequence_id: u64,

    /// Proposer id
    pub proposer: u64,

    /// Responder id (0 for a no-op)
    pub responder: u64,

    /// Rejected proposer id (0 when nobody was rejected)
    pub rejected: u64,
}

impl OutcomeRecord {
    /// Rebuild the typed outcome, `None` if the record is malformed
    pub fn to_outcome(&self) -> Option<ProposalOutcome> {
        let proposer = ProposerId(self.proposer);
        let verdict = match self.kind_raw {
            0 => return Some(ProposalOutcome::NoOp { proposer }),
            1 => Verdict::Accepted,
            2 => Verdict::Rejected,
            3 => Verdict::Displaced(ProposerId(self.rejected)),
            _ => return None,
        };
        Some(ProposalOutcome::Proposed {
            sequence_id: self.sequence_id,
            proposer,
            responder: ResponderId(self.responder),
            verdict,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
