//! Topic extraction.
//!
//! A topic is a best-effort key naming what a nanopublication is about. Two
//! successive versions of the same record should share it. Extraction may
//! fail (`None`): an undefined topic never matches anything, not even
//! another undefined topic.
//!
//! Strategies are looked up by name in a [`TopicExtractorRegistry`].

pub mod default;
pub mod uri;
pub mod disgenet;
pub mod wikipathways;
pub mod metabolite;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::error::UnknownStrategy;
use crate::types::Nanopub;

pub use default::DefaultTopicExtractor;
pub use disgenet::DisgenetTopicExtractor;
pub use metabolite::MetaboliteSpeciesTopicExtractor;
pub use uri::{NoTopicExtractor, UriBaseTopicExtractor, UriTailTopicExtractor};
pub use wikipathways::WikipathwaysTopicExtractor;

/// Name of the strategy used when none is configured.
pub const DEFAULT_TOPIC_EXTRACTOR: &str = "default";

/// Topic strategy.
pub trait TopicExtractor: Send + Sync {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Topic of `nanopub`, or `None` when it is undefined.
    fn topic(&self, nanopub: &Nanopub) -> Option<String>;
}

/// Settings shared by topic strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicOptions {
    /// Predicates whose statements do not count toward the main subject.
    pub ignore_predicates: Vec<String>,
}

impl TopicOptions {
    /// Options from a `|`-separated predicate list.
    pub fn from_ignore_list(list: &str) -> Self {
        Self {
            ignore_predicates: list
                .trim()
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Stable hash of the options.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Constructor stored in the registry.
pub type TopicExtractorCtor = fn(&TopicOptions) -> Box<dyn TopicExtractor>;

/// Name → constructor table of topic strategies.
#[derive(Clone)]
pub struct TopicExtractorRegistry {
    ctors: BTreeMap<&'static str, TopicExtractorCtor>,
}

impl TopicExtractorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self { ctors: BTreeMap::new() }
    }

    /// Registry with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_TOPIC_EXTRACTOR, |o| Box::new(DefaultTopicExtractor::new(o)));
        registry.register("none", |_| Box::new(NoTopicExtractor));
        registry.register("uri-base", |_| Box::new(UriBaseTopicExtractor));
        registry.register("uri-tail", |_| Box::new(UriTailTopicExtractor));
        registry.register("disgenet", |_| Box::new(DisgenetTopicExtractor::new()));
        registry.register("wikipathways", |_| Box::new(WikipathwaysTopicExtractor));
        registry.register("metabolite-species", |_| Box::new(MetaboliteSpeciesTopicExtractor));
        registry
    }

    /// Register or replace a strategy.
    pub fn register(&mut self, name: &'static str, ctor: TopicExtractorCtor) {
        self.ctors.insert(name, ctor);
    }

    /// Build the strategy registered under `name`.
    pub fn build(&self, name: &str, options: &TopicOptions) -> Result<Box<dyn TopicExtractor>, UnknownStrategy> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| UnknownStrategy::new("topic extractor", name, self.names()))?;
        Ok(ctor(options))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.ctors.keys().copied().collect()
    }
}

impl std::fmt::Debug for TopicExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ctors.keys()).finish()
    }
}

impl Default for TopicExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
