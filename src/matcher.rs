//! Reuse matching and supersedes linking.
//!
//! The matcher classifies each incoming nanopublication against the
//! [`CorpusIndex`] of a prior corpus and, when lineage tracking is on, links
//! new versions to the unit they replace.

use serde::Serialize;
use tracing::{debug, warn};

use crate::fingerprint::{FingerprintError, Fingerprinter};
use crate::store::{CorpusIndex, TopicSlot};
use crate::topic::TopicExtractor;
use crate::trusty::make_trusty;
use crate::types::{Nanopub, NanopubError, ReuseRecord, Term, TopicField};
use crate::vocab::{DEFAULT_BASE_URI, NPX_SUPERSEDES};

/// Error type for matcher operations.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The unit has no content-derived identity.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    /// Re-identifying a superseding unit failed.
    #[error("cannot relink nanopublication: {0}")]
    Relink(#[from] NanopubError),
}

/// Classification of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReuseAction {
    /// Same fingerprint as a prior unit; keeps the prior identity.
    Reused,
    /// New version of the prior unit owning the same topic.
    Superseded {
        /// Identity of the replaced unit.
        previous: String,
    },
    /// Nothing to reuse or link.
    New,
}

/// Result of [`ReuseMatcher::process`].
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Output identity.
    pub identity: String,
    /// Fingerprint of the unit as it came in.
    pub fingerprint: String,
    /// Topic column; `Omitted` without lineage.
    pub topic: TopicField,
    /// What happened.
    pub action: ReuseAction,
    /// The unit as emitted: unchanged, or relinked when superseded.
    pub nanopub: Nanopub,
}

impl MatchOutcome {
    /// Reuse record line for this unit.
    pub fn record(&self) -> ReuseRecord {
        ReuseRecord::new(self.identity.clone(), self.fingerprint.clone()).with_topic(self.topic.clone())
    }

    /// Whether the unit was reused.
    pub fn is_reused(&self) -> bool {
        self.action == ReuseAction::Reused
    }
}

/// Counters accumulated while matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Units processed.
    pub input_count: usize,
    /// Units reused.
    pub reuse_count: usize,
    /// Units classified New.
    pub new_count: usize,
    /// Units linked to a prior version.
    pub superseded_count: usize,
    /// Topic already consumed in this run.
    pub in_corpus_duplicate_topics: usize,
    /// Topic shared by several prior units.
    pub ambiguous_topic_hits: usize,
}

impl MatchStats {
    /// All topic inconsistencies.
    pub fn matching_errors(&self) -> usize {
        self.in_corpus_duplicate_topics + self.ambiguous_topic_hits
    }

    /// Add another accumulator into this one.
    pub fn merge(&mut self, other: &MatchStats) {
        self.input_count += other.input_count;
        self.reuse_count += other.reuse_count;
        self.new_count += other.new_count;
        self.superseded_count += other.superseded_count;
        self.in_corpus_duplicate_topics += other.in_corpus_duplicate_topics;
        self.ambiguous_topic_hits += other.ambiguous_topic_hits;
    }
}

/// Streaming reuse matcher.
///
/// ## Algorithm
///
/// 1. Fingerprint the unit. A known fingerprint means **Reused**; the unit
///    takes the prior identity and its topic is marked consumed.
/// 2. Otherwise, with lineage on, look the topic up:
///    - absent or undefined: **New**
///    - shared by several prior units: **New**, counted as ambiguous
///    - already consumed in this run: **New**, counted as duplicate
///    - owned by one prior unit: **Superseded**. A `npx:supersedes` statement
///      is added to pubinfo and the unit is re-identified.
/// 3. Without lineage, everything else is **New**.
///
/// Outcomes depend only on the index and the units seen so far.
pub struct ReuseMatcher {
    index: CorpusIndex,
    fingerprinter: Box<dyn Fingerprinter>,
    topics: Option<Box<dyn TopicExtractor>>,
}

impl ReuseMatcher {
    /// Matcher over a loaded index. Lineage is on when `topics` is given.
    pub fn new(
        index: CorpusIndex,
        fingerprinter: Box<dyn Fingerprinter>,
        topics: Option<Box<dyn TopicExtractor>>,
    ) -> Self {
        Self {
            index,
            fingerprinter,
            topics,
        }
    }

    /// The index, with this run's topic bookkeeping applied.
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    /// Whether lineage tracking is on.
    pub fn tracks_lineage(&self) -> bool {
        self.topics.is_some()
    }

    /// Classify one unit.
    pub fn process(&mut self, nanopub: Nanopub, stats: &mut MatchStats) -> Result<MatchOutcome, MatchError> {
        stats.input_count += 1;
        let fingerprint = self.fingerprinter.fingerprint(&nanopub)?;
        let topic = self.topics.as_ref().map(|t| t.topic(&nanopub));
        let topic_field = match &topic {
            Some(topic) => TopicField::from_topic(topic.clone()),
            None => TopicField::Omitted,
        };
        let topic = topic.flatten();

        if let Some(prior) = self.index.lookup(&fingerprint) {
            let identity = prior.to_string();
            stats.reuse_count += 1;
            debug!(uri = nanopub.uri(), prior = %identity, "reused");
            if let Some(topic) = &topic {
                match self.index.mark_matched(topic) {
                    TopicSlot::Matched => {
                        stats.in_corpus_duplicate_topics += 1;
                        warn!(topic = %topic, uri = nanopub.uri(), "reused unit hits a topic already matched");
                    }
                    TopicSlot::Multiple => {
                        stats.ambiguous_topic_hits += 1;
                        warn!(topic = %topic, uri = nanopub.uri(), "reused unit hits an ambiguous topic");
                    }
                    TopicSlot::Absent | TopicSlot::Single(_) => {}
                }
            }
            return Ok(MatchOutcome {
                identity,
                fingerprint,
                topic: topic_field,
                action: ReuseAction::Reused,
                nanopub,
            });
        }

        let action = match &topic {
            Some(topic) => match self.index.topic_slot(topic) {
                TopicSlot::Single(previous) => {
                    self.index.mark_matched(topic);
                    ReuseAction::Superseded { previous }
                }
                TopicSlot::Multiple => {
                    stats.ambiguous_topic_hits += 1;
                    warn!(topic = %topic, uri = nanopub.uri(), "topic shared by several prior units");
                    ReuseAction::New
                }
                TopicSlot::Matched => {
                    stats.in_corpus_duplicate_topics += 1;
                    warn!(topic = %topic, uri = nanopub.uri(), "topic already matched in this run");
                    ReuseAction::New
                }
                TopicSlot::Absent => ReuseAction::New,
            },
            None => ReuseAction::New,
        };

        let nanopub = match &action {
            ReuseAction::Superseded { previous } => {
                stats.superseded_count += 1;
                let linked = supersede(&nanopub, previous)?;
                debug!(uri = nanopub.uri(), previous = %previous, relinked = linked.uri(), "superseded");
                linked
            }
            _ => {
                stats.new_count += 1;
                debug!(uri = nanopub.uri(), "new");
                nanopub
            }
        };

        Ok(MatchOutcome {
            identity: nanopub.uri().to_string(),
            fingerprint,
            topic: topic_field,
            action,
            nanopub,
        })
    }
}

/// Add `uri npx:supersedes previous` to pubinfo and re-identify the unit.
pub fn supersede(nanopub: &Nanopub, previous: &str) -> Result<Nanopub, NanopubError> {
    let linked = nanopub.with_pubinfo(Term::iri(nanopub.uri()), NPX_SUPERSEDES, Term::iri(previous));
    make_trusty(&linked, DEFAULT_BASE_URI)
}
