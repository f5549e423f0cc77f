//! Walking a prior index chain against the current inventory.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::ChainError;
use crate::types::{IndexNanopub, Nanopub};

/// Current element identities, in file order.
///
/// Elements consumed by reused pages are removed; the rest are paged anew in
/// their original order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    order: Vec<String>,
    present: BTreeSet<String>,
}

impl Inventory {
    /// Inventory from identities in file order. Repeats are kept once.
    pub fn from_identities(identities: impl IntoIterator<Item = String>) -> Self {
        let mut inventory = Self::default();
        for identity in identities {
            if inventory.present.insert(identity.clone()) {
                inventory.order.push(identity);
            }
        }
        inventory
    }

    /// Whether `identity` is still unconsumed.
    pub fn contains(&self, identity: &str) -> bool {
        self.present.contains(identity)
    }

    fn consume(&mut self, identity: &str) {
        self.present.remove(identity);
    }

    /// Unconsumed identities, in file order.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|id| self.present.contains(id.as_str()))
            .map(String::as_str)
    }

    /// Number of unconsumed identities.
    pub fn len(&self) -> usize {
        self.present.len()
    }

    /// Whether everything was consumed.
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

/// What happened to one prior page.
#[derive(Debug, Clone)]
pub enum ChainStep {
    /// All elements present; consumed and counted.
    Reused(IndexNanopub),
    /// No elements; vacuously reused and counted.
    Vacuous(IndexNanopub),
    /// First page with a missing element; the walk stops here.
    Diverged,
    /// After the walk stopped; not examined.
    Ignored,
}

/// Accumulated result of a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReuseResult {
    /// Identity of the last kept page, which new pages append.
    pub last: Option<String>,
    /// Kept pages, empty ones included.
    pub reuse_count: usize,
    /// How many of the kept pages have no elements.
    pub vacuous_count: usize,
    /// Whether the walk stopped before the end of the chain.
    pub stopped: bool,
}

/// Streaming walker over a prior chain.
#[derive(Debug)]
pub struct IndexChainReuser {
    inventory: Inventory,
    result: ChainReuseResult,
    previous: Option<String>,
    seen_any: bool,
}

impl IndexChainReuser {
    /// Walker over `inventory`.
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            result: ChainReuseResult::default(),
            previous: None,
            seen_any: false,
        }
    }

    /// Examine the next prior page.
    pub fn offer(&mut self, nanopub: Nanopub) -> Result<ChainStep, ChainError> {
        if self.result.stopped {
            return Ok(ChainStep::Ignored);
        }
        let index = IndexNanopub::from_nanopub(nanopub)?;
        if !index.subindexes().is_empty() {
            return Err(ChainError::UnsupportedChainShape(index.uri().to_string()));
        }
        self.check_order(&index)?;
        self.seen_any = true;
        self.previous = Some(index.uri().to_string());

        let reusable = index.elements().iter().all(|e| self.inventory.contains(e));
        if !reusable {
            debug!(uri = index.uri(), "prior chain diverges from inventory");
            self.result.stopped = true;
            return Ok(ChainStep::Diverged);
        }

        self.result.last = Some(index.uri().to_string());
        self.result.reuse_count += 1;
        if index.elements().is_empty() {
            self.result.vacuous_count += 1;
            debug!(uri = index.uri(), "kept empty index page");
            return Ok(ChainStep::Vacuous(index));
        }
        for element in index.elements() {
            self.inventory.consume(element);
        }
        debug!(uri = index.uri(), elements = index.elements().len(), "reused index page");
        Ok(ChainStep::Reused(index))
    }

    fn check_order(&self, index: &IndexNanopub) -> Result<(), ChainError> {
        match (self.seen_any, index.appended_index()) {
            (false, Some(appended)) => Err(ChainError::OrderingViolation(format!(
                "first index {} appends {}",
                index.uri(),
                appended
            ))),
            (true, None) => Err(ChainError::OrderingViolation(format!(
                "index {} after the first position appends nothing",
                index.uri()
            ))),
            (true, Some(appended)) if Some(appended) != self.previous.as_deref() => {
                Err(ChainError::OrderingViolation(format!(
                    "index {} appends {} instead of {}",
                    index.uri(),
                    appended,
                    self.previous.as_deref().unwrap_or_default()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Counters so far.
    pub fn result(&self) -> &ChainReuseResult {
        &self.result
    }

    /// End the walk, returning the counters and the unconsumed inventory.
    pub fn finish(self) -> (ChainReuseResult, Inventory) {
        (self.result, self.inventory)
    }
}
