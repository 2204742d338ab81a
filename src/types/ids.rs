//! Typed participant identities.
//!
//! Proposer and Responder identities are both plain `u64` values underneath,
//! but they live in distinct newtypes so a responder id can never be handed
//! to an API that expects a proposer id.
//!
//! The market assigns them from disjoint ranges (see
//! [`MarketConfig`](crate::config::MarketConfig)), so the raw values are also
//! distinguishable when printed side by side.

use std::fmt;

/// Identity of a Proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProposerId(pub u64);

/// Identity of a Responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ResponderId(pub u64);

impl ProposerId {
    /// Raw integer value
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl ResponderId {
    /// Raw integer value
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProposerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for ResponderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_order_by_raw_value() {
        assert!(ProposerId(1) < ProposerId(2));
        assert!(ResponderId(1001) > ResponderId(1000));
    }

    #[test]
    fn test_ids_display_raw_value() {
        assert_eq!(ProposerId(7).to_string(), "7");
        assert_eq!(ResponderId(1003).to_string(), "1003");
    }
}
