//! Market configuration and JSON market descriptions.
//!
//! ## MarketConfig
//!
//! Controls identity assignment and arena pre-allocation. Proposer and
//! responder identities come from disjoint ranges so they stay
//! distinguishable when printed side by side.
//!
//! ## MarketDescription
//!
//! A whole market, participants referenced by name:
//!
//! ```json
//! {
//!   "proposers": [
//!     { "name": "m1", "prefers": ["w1", "w2"] }
//!   ],
//!   "responders": [
//!     { "name": "w1", "prefers": [["m1", "m2"], "m3"] }
//!   ]
//! }
//! ```
//!
//! A preference entry is either a single name or an array of names that
//! share a rank.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::market::Market;
use crate::participant::Preference;
use crate::types::{ProposerId, ResponderId};

/// Default first proposer identity
pub const DEFAULT_PROPOSER_ID_BASE: u64 = 1;

/// Default first responder identity
pub const DEFAULT_RESPONDER_ID_BASE: u64 = 1001;

/// Identity ranges and arena sizing for a [`Market`].
///
/// The bases only set where auto-assignment starts; neither range is
/// bounded. With the defaults, proposer 1001 is reached after 1000
/// registrations and shares its raw value with the first responder.
/// Identities never collide across sides because each side has its own
/// newtype and index, so overlap only affects how raw ids read in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// First identity handed to an auto-registered proposer
    pub proposer_id_base: u64,

    /// First identity handed to an auto-registered responder
    pub responder_id_base: u64,

    /// Participants to pre-allocate on each side
    pub capacity: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            proposer_id_base: DEFAULT_PROPOSER_ID_BASE,
            responder_id_base: DEFAULT_RESPONDER_ID_BASE,
            capacity: 0,
        }
    }
}

impl MarketConfig {
    /// Default ranges with `capacity` slots pre-allocated per side
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

/// One preference position: a single name or a tie-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tier {
    One(String),
    Tied(Vec<String>),
}

impl Tier {
    fn names(&self) -> &[String] {
        match self {
            Tier::One(name) => std::slice::from_ref(name),
            Tier::Tied(names) => names,
        }
    }
}

/// A participant as written in a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub name: String,

    /// Explicit identity; assigned from the configured range when absent
    #[serde(default)]
    pub id: Option<u64>,

    /// Counterparts, most preferred first
    #[serde(default)]
    pub prefers: Vec<Tier>,
}

/// A complete market, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketDescription {
    #[serde(default)]
    pub config: MarketConfig,

    pub proposers: Vec<ParticipantEntry>,

    pub responders: Vec<ParticipantEntry>,
}

impl MarketDescription {
    /// Parse a description from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Register every participant and load every preference.
    ///
    /// Names in `prefers` must refer to participants of the other side;
    /// anything else fails with [`MatchError::UnknownName`]. A name may
    /// appear only once per side ([`MatchError::DuplicateName`]). The
    /// returned market has not been validated; call
    /// [`Market::check_setup`] before driving it.
    pub fn build(&self) -> Result<Market> {
        let mut market = Market::with_config(self.config);

        let mut proposer_ids: HashMap<&str, ProposerId> = HashMap::new();
        let mut proposers = Vec::with_capacity(self.proposers.len());
        for entry in &self.proposers {
            let name = claim_name(&proposer_ids, &entry.name)?;
            let id = market.register_proposer(Some(name), entry.id.map(ProposerId))?;
            proposer_ids.insert(name, id);
            proposers.push((id, entry));
        }

        let mut responder_ids: HashMap<&str, ResponderId> = HashMap::new();
        let mut responders = Vec::with_capacity(self.responders.len());
        for entry in &self.responders {
            let name = claim_name(&responder_ids, &entry.name)?;
            let id = market.register_responder(Some(name), entry.id.map(ResponderId))?;
            responder_ids.insert(name, id);
            responders.push((id, entry));
        }

        for (id, entry) in proposers {
            let tiers = resolve_tiers(&entry.prefers, &responder_ids)?;
            market.set_proposer_weak_order(id, &tiers)?;
        }

        for (id, entry) in responders {
            let tiers = resolve_tiers(&entry.prefers, &proposer_ids)?;
            let preference = if tiers.iter().all(|tier| tier.len() <= 1) {
                Preference::Strict(tiers.into_iter().flatten().collect())
            } else {
                Preference::Weak(tiers)
            };
            market.set_responder_preference(id, preference)?;
        }

        Ok(market)
    }
}

/// Fail if `name` is already taken on this side
fn claim_name<'a, Id>(ids: &HashMap<&str, Id>, name: &'a str) -> Result<&'a str> {
    if ids.contains_key(name) {
        return Err(MatchError::DuplicateName(name.to_owned()));
    }
    Ok(name)
}

fn resolve_tiers<Id: Copy>(tiers: &[Tier], ids: &HashMap<&str, Id>) -> Result<Vec<Vec<Id>>> {
    tiers
        .iter()
        .map(|tier| {
            tier.names()
                .iter()
                .map(|name| {
                    ids.get(name.as_str())
                        .copied()
                        .ok_or_else(|| MatchError::UnknownName(name.clone()))
                })
                .collect::<Result<Vec<Id>>>()
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
