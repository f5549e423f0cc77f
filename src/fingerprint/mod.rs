//! Fingerprint normalization.
//!
//! A fingerprint is the artifact code of a *normalized* view of a
//! nanopublication, with the `RA` prefix stripped. Normalization removes what
//! changes between re-publications of the same content (the identity, the
//! creation timestamp, optionally whole partitions, domain-specific volatile
//! IRIs) so that equal content yields equal fingerprints.
//!
//! ## Strategies
//!
//! | Name           | Normalization                                              |
//! |----------------|------------------------------------------------------------|
//! | `default`      | ignore-flags plus creation-time removal                    |
//! | `disgenet`     | assertion + provenance, DisGeNET placeholders              |
//! | `wikipathways` | assertion + provenance + pubinfo, no timestamps/supersedes |
//!
//! Strategies are looked up by name in a [`FingerprinterRegistry`].

pub mod default;
pub mod disgenet;
pub mod wikipathways;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::error::UnknownStrategy;
use crate::trusty::{artifact_code, make_artifact_code, preprocess, MODULE_ID};
use crate::types::{Nanopub, Statement};
use crate::vocab::is_creation_time_predicate;

pub use default::DefaultFingerprinter;
pub use disgenet::DisgenetFingerprinter;
pub use wikipathways::WikipathwaysFingerprinter;

/// Name of the strategy used when none is configured.
pub const DEFAULT_FINGERPRINTER: &str = "default";

/// Error raised while fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    /// The identity carries no artifact code.
    #[error("not content-addressed: {0}")]
    NotContentAddressed(String),
}

/// Named normalization options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintOptions {
    /// Drop the head graph.
    pub ignore_head: bool,
    /// Drop the provenance graph.
    pub ignore_provenance: bool,
    /// Drop the publication info graph.
    pub ignore_pubinfo: bool,
    /// Predicates treated as creation time in addition to the built-in ones.
    #[serde(default)]
    pub extra_timestamp_predicates: Vec<String>,
}

impl FingerprintOptions {
    /// Whether `predicate` records a creation time.
    pub fn is_creation_time(&self, predicate: &str) -> bool {
        is_creation_time_predicate(predicate)
            || self.extra_timestamp_predicates.iter().any(|p| p == predicate)
    }

    /// Stable hash of the options.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Fingerprint strategy.
pub trait Fingerprinter: Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// The normalized statement list, before self-reference preprocessing.
    fn normalize(&self, nanopub: &Nanopub) -> Vec<Statement>;

    /// Fingerprint of `nanopub`.
    ///
    /// Fails with [`FingerprintError::NotContentAddressed`] when the identity
    /// has no artifact code.
    fn fingerprint(&self, nanopub: &Nanopub) -> Result<String, FingerprintError> {
        let code = artifact_code(nanopub.uri())
            .ok_or_else(|| FingerprintError::NotContentAddressed(nanopub.uri().to_string()))?;
        let normalized = preprocess(&self.normalize(nanopub), code);
        let digest = make_artifact_code(&normalized);
        Ok(digest[MODULE_ID.len()..].to_string())
    }
}

/// Whether `statement` is a pubinfo statement stamping the unit's creation time.
pub(crate) fn is_own_timestamp(nanopub: &Nanopub, statement: &Statement, options: &FingerprintOptions) -> bool {
    statement.has_subject(nanopub.uri()) && options.is_creation_time(&statement.predicate)
}

/// Constructor stored in the registry.
pub type FingerprinterCtor = fn(&FingerprintOptions) -> Box<dyn Fingerprinter>;

/// Name → constructor table of fingerprint strategies.
#[derive(Clone)]
pub struct FingerprinterRegistry {
    ctors: BTreeMap<&'static str, FingerprinterCtor>,
}

impl FingerprinterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self { ctors: BTreeMap::new() }
    }

    /// Registry with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_FINGERPRINTER, |o| Box::new(DefaultFingerprinter::new(o.clone())));
        registry.register("disgenet", |o| Box::new(DisgenetFingerprinter::new(o.clone())));
        registry.register("wikipathways", |o| Box::new(WikipathwaysFingerprinter::new(o.clone())));
        registry
    }

    /// Register or replace a strategy.
    pub fn register(&mut self, name: &'static str, ctor: FingerprinterCtor) {
        self.ctors.insert(name, ctor);
    }

    /// Build the strategy registered under `name`.
    pub fn build(&self, name: &str, options: &FingerprintOptions) -> Result<Box<dyn Fingerprinter>, UnknownStrategy> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| UnknownStrategy::new("fingerprinter", name, self.names()))?;
        Ok(ctor(options))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.ctors.keys().copied().collect()
    }
}

impl std::fmt::Debug for FingerprinterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ctors.keys()).finish()
    }
}

impl Default for FingerprinterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
