//! Market state: participant arenas, registration and preference loading.
//!
//! ## Memory Model
//!
//! Participants live in two slabs owned by the market. Each side keeps a
//! `HashMap` from typed identity to slab key, so every cross-entity lookup
//! is two O(1) hops and no participant ever holds a reference to another.
//!
//! ```text
//! ProposerId --proposer_index--> slab key --proposers--> Proposer
//! ResponderId --responder_index--> slab key --responders--> Responder
//! ```
//!
//! Participants are never removed, so slab iteration order is registration
//! order.

use std::collections::{BTreeSet, HashMap};

use slab::Slab;
use tracing::debug;

use crate::config::MarketConfig;
use crate::error::{MatchError, Result};
use crate::participant::{Participant, Preference, Proposer, Responder};
use crate::types::{ProposerId, ResponderId};

/// A two-sided market and the state of its deferred-acceptance run.
#[derive(Debug)]
pub struct Market {
    /// Proposer arena
    pub(crate) proposers: Slab<Proposer>,

    /// Proposer id -> slab key
    pub(crate) proposer_index: HashMap<ProposerId, usize>,

    /// Responder arena
    pub(crate) responders: Slab<Responder>,

    /// Responder id -> slab key
    pub(crate) responder_index: HashMap<ResponderId, usize>,

    /// Next auto-assigned proposer id
    next_proposer_id: u64,

    /// Next auto-assigned responder id
    next_responder_id: u64,

    /// Number of successful proposer registrations
    pub(crate) registered_proposers: usize,

    /// Number of successful responder registrations
    pub(crate) registered_responders: usize,

    /// Proposers still eligible to propose, in id order
    pub(crate) unmatched: BTreeSet<ProposerId>,

    /// Proposals made so far; also the last issued sequence id
    pub(crate) proposal_count: u64,

    /// Set by the first protocol call; freezes setup
    pub(crate) started: bool,
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}

impl Market {
    /// Create an empty market with the default identity ranges
    pub fn new() -> Self {
        Self::with_config(MarketConfig::default())
    }

    /// Create an empty market from a config
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_acceptance::config::MarketConfig;
    /// use deferred_acceptance::market::Market;
    /// use deferred_acceptance::types::{ProposerId, ResponderId};
    ///
    /// let mut market = Market::with_config(MarketConfig::with_capacity(16));
    /// assert_eq!(market.register_proposer(None, None).unwrap(), ProposerId(1));
    /// assert_eq!(market.register_responder(None, None).unwrap(), ResponderId(1001));
    /// ```
    pub fn with_config(config: MarketConfig) -> Self {
        Self {
            proposers: Slab::with_capacity(config.capacity),
            proposer_index: HashMap::with_capacity(config.capacity),
            responders: Slab::with_capacity(config.capacity),
            responder_index: HashMap::with_capacity(config.capacity),
            next_proposer_id: config.proposer_id_base,
            next_responder_id: config.responder_id_base,
            registered_proposers: 0,
            registered_responders: 0,
            unmatched: BTreeSet::new(),
            proposal_count: 0,
            started: false,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of distinct proposers
    #[inline]
    pub fn proposer_count(&self) -> usize {
        self.proposers.len()
    }

    /// Number of distinct responders
    #[inline]
    pub fn responder_count(&self) -> usize {
        self.responders.len()
    }

    /// Whether a protocol call has been made
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a proposer with empty preferences.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; defaults to `"Proposer {id}"`
    /// * `id` - Explicit identity. Uniqueness is the caller's responsibility:
    ///   re-using an id replaces the earlier proposer, and
    ///   [`check_setup`](Self::check_setup) reports the count mismatch.
    ///
    /// # Returns
    ///
    /// The proposer's identity. The proposer joins the unmatched set.
    pub fn register_proposer(&mut self, name: Option<&str>, id: Option<ProposerId>) -> Result<ProposerId> {
        self.ensure_setup_phase()?;

        let id = match id {
            Some(id) => id,
            None => self.fresh_proposer_id(),
        };
        let proposer = Proposer::new(id, name.map(str::to_owned));

        match self.proposer_index.get(&id) {
            Some(&key) => self.proposers[key] = proposer,
            None => {
                let key = self.proposers.insert(proposer);
                self.proposer_index.insert(id, key);
            }
        }
        self.unmatched.insert(id);
        self.registered_proposers += 1;

        debug!(proposer = %id, "registered proposer");
        Ok(id)
    }

    /// Register a responder with empty preferences.
    ///
    /// Same identity rules as [`register_proposer`](Self::register_proposer).
    pub fn register_responder(&mut self, name: Option<&str>, id: Option<ResponderId>) -> Result<ResponderId> {
        self.ensure_setup_phase()?;

        let id = match id {
            Some(id) => id,
            None => self.fresh_responder_id(),
        };
        let responder = Responder::new(id, name.map(str::to_owned));

        match self.responder_index.get(&id) {
            Some(&key) => self.responders[key] = responder,
            None => {
                let key = self.responders.insert(responder);
                self.responder_index.insert(id, key);
            }
        }
        self.registered_responders += 1;

        debug!(responder = %id, "registered responder");
        Ok(id)
    }

    /// Next unused id from the proposer range
    fn fresh_proposer_id(&mut self) -> ProposerId {
        loop {
            let id = ProposerId(self.next_proposer_id);
            self.next_proposer_id += 1;
            if !self.proposer_index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Next unused id from the responder range
    fn fresh_responder_id(&mut self) -> ResponderId {
        loop {
            let id = ResponderId(self.next_responder_id);
            self.next_responder_id += 1;
            if !self.responder_index.contains_key(&id) {
                return id;
            }
        }
    }

    // ========================================================================
    // Preference Loading
    // ========================================================================

    /// Set a proposer's strict proposal order, most preferred first
    pub fn set_proposer_order(&mut self, id: ProposerId, order: Vec<ResponderId>) -> Result<()> {
        self.ensure_setup_phase()?;
        let key = self.proposer_key(id)?;
        self.proposers[key].set_proposal_order(order)?;
        self.sync_unmatched(key);
        Ok(())
    }

    /// Set a proposer's order from tie-sets; ties are broken by listed order.
    ///
    /// Returns whether the order was strict.
    pub fn set_proposer_weak_order(&mut self, id: ProposerId, tiers: &[Vec<ResponderId>]) -> Result<bool> {
        self.ensure_setup_phase()?;
        let key = self.proposer_key(id)?;
        let strict = self.proposers[key].set_weak_proposal_order(tiers)?;
        self.sync_unmatched(key);
        Ok(strict)
    }

    /// Set a responder's preference. Returns whether it was strict.
    pub fn set_responder_preference(&mut self, id: ResponderId, preference: Preference) -> Result<bool> {
        self.ensure_setup_phase()?;
        let key = self.responder_key(id)?;
        self.responders[key].set_preference(preference)
    }

    /// Keep the unmatched set in line with a proposer's eligibility
    pub(crate) fn sync_unmatched(&mut self, key: usize) {
        let proposer = &self.proposers[key];
        if proposer.is_eligible() {
            self.unmatched.insert(proposer.id());
        } else {
            self.unmatched.remove(&proposer.id());
        }
    }

    fn ensure_setup_phase(&self) -> Result<()> {
        if self.started {
            Err(MatchError::ProtocolStarted)
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    pub(crate) fn proposer_key(&self, id: ProposerId) -> Result<usize> {
        self.proposer_index
            .get(&id)
            .copied()
            .ok_or(MatchError::UnknownProposer(id))
    }

    #[inline]
    pub(crate) fn responder_key(&self, id: ResponderId) -> Result<usize> {
        self.responder_index
            .get(&id)
            .copied()
            .ok_or(MatchError::UnknownResponder(id))
    }

    /// Look up a proposer; unknown ids are an error
    pub fn proposer(&self, id: ProposerId) -> Result<&Proposer> {
        Ok(&self.proposers[self.proposer_key(id)?])
    }

    /// Look up a responder; unknown ids are an error
    pub fn responder(&self, id: ResponderId) -> Result<&Responder> {
        Ok(&self.responders[self.responder_key(id)?])
    }

    /// All proposers in registration order
    pub fn proposers(&self) -> impl Iterator<Item = &Proposer> + '_ {
        self.proposers.iter().map(|(_, proposer)| proposer)
    }

    /// All responders in registration order
    pub fn responders(&self) -> impl Iterator<Item = &Responder> + '_ {
        self.responders.iter().map(|(_, responder)| responder)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
