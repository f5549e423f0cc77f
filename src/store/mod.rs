//! The Corpus Index.
//!
//! An in-memory table built once per run from the *prior* corpus:
//!
//! - fingerprint → prior identity (last writer wins)
//! - topic → [`TopicSlot`], used to decide supersedes links
//! - optionally fingerprint → serialized prior unit, for verbatim replay
//!
//! Uses `BTreeMap` throughout for deterministic iteration order.

pub mod loader;

use std::collections::BTreeMap;

use serde::Serialize;

pub use loader::{CorpusIndexBuilder, IndexLoadError, IndexSource};

/// State of a topic in the prior corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSlot {
    /// Topic never seen.
    Absent,
    /// Exactly one prior unit has this topic.
    Single(String),
    /// Several prior units share the topic; never linked.
    Multiple,
    /// Already consumed by a unit of the current run.
    Matched,
}

/// Counters collected while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Prior units read.
    pub reusable_count: usize,
    /// Distinct fingerprints among them.
    pub unique_reusable_count: usize,
    /// Additional identities found for an already-seen topic.
    pub out_of_corpus_duplicate_topics: usize,
}

/// Lookup tables over the prior corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    fingerprints: BTreeMap<String, String>,
    topics: BTreeMap<String, TopicSlot>,
    replay: Option<BTreeMap<String, String>>,
    reusable_count: usize,
    out_of_corpus_duplicate_topics: usize,
}

impl CorpusIndex {
    /// Empty index without replay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty index keeping serialized prior units for replay.
    pub fn with_replay() -> Self {
        Self {
            replay: Some(BTreeMap::new()),
            ..Self::default()
        }
    }

    /// Record one prior unit.
    pub fn insert(&mut self, identity: &str, fingerprint: &str, topic: Option<&str>) {
        self.reusable_count += 1;
        self.fingerprints.insert(fingerprint.to_string(), identity.to_string());
        if let Some(topic) = topic {
            self.note_topic(topic, identity);
        }
    }

    fn note_topic(&mut self, topic: &str, identity: &str) {
        match self.topics.get_mut(topic) {
            None => {
                self.topics.insert(topic.to_string(), TopicSlot::Single(identity.to_string()));
            }
            Some(TopicSlot::Single(owner)) if owner == identity => {}
            Some(slot) => {
                *slot = TopicSlot::Multiple;
                self.out_of_corpus_duplicate_topics += 1;
            }
        }
    }

    /// Keep the serialized form of a prior unit. No-op without replay.
    pub fn insert_replay(&mut self, fingerprint: &str, serialized: String) {
        if let Some(replay) = self.replay.as_mut() {
            replay.insert(fingerprint.to_string(), serialized);
        }
    }

    /// Prior identity for a fingerprint.
    pub fn lookup(&self, fingerprint: &str) -> Option<&str> {
        self.fingerprints.get(fingerprint).map(String::as_str)
    }

    /// Serialized prior unit for a fingerprint.
    pub fn replayed(&self, fingerprint: &str) -> Option<&str> {
        self.replay.as_ref()?.get(fingerprint).map(String::as_str)
    }

    /// Whether replay text is kept.
    pub fn has_replay(&self) -> bool {
        self.replay.is_some()
    }

    /// Current slot of a topic.
    pub fn topic_slot(&self, topic: &str) -> TopicSlot {
        self.topics.get(topic).cloned().unwrap_or(TopicSlot::Absent)
    }

    /// Mark a topic as consumed by the current run and return its prior slot.
    ///
    /// `Multiple` stays `Multiple`.
    pub fn mark_matched(&mut self, topic: &str) -> TopicSlot {
        let previous = self.topic_slot(topic);
        if previous != TopicSlot::Multiple {
            self.topics.insert(topic.to_string(), TopicSlot::Matched);
        }
        previous
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    /// Whether no prior unit was loaded.
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Load counters.
    pub fn stats(&self) -> LoadStats {
        LoadStats {
            reusable_count: self.reusable_count,
            unique_reusable_count: self.fingerprints.len(),
            out_of_corpus_duplicate_topics: self.out_of_corpus_duplicate_topics,
        }
    }
}
