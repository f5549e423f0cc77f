//! Building a [`CorpusIndex`] from a prior source.
//!
//! Two sources are accepted. A record file is trusted as-is: its lines are
//! inserted without recomputation. A full corpus is fingerprinted in a single
//! pass with the configured strategy, and may additionally keep each unit's
//! serialized form for verbatim replay.

use tracing::{debug, warn};

use super::CorpusIndex;
use crate::fingerprint::{FingerprintError, Fingerprinter};
use crate::io::{writer, RdfSyntax};
use crate::topic::TopicExtractor;
use crate::types::{Nanopub, RecordError, ReuseRecord};

/// Errors while loading the Corpus Index.
#[derive(Debug, thiserror::Error)]
pub enum IndexLoadError {
    /// Replay needs serialized prior units, which a record file lacks.
    #[error("verbatim replay requires a full prior corpus, not a record file")]
    IncompatibleSource,

    /// Bad record line.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A prior unit could not be fingerprinted.
    #[error("prior corpus: {0}")]
    Fingerprint(#[from] FingerprintError),
}

/// What the prior input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Precomputed `identity fingerprint [topic]` lines.
    Records,
    /// Full nanopublications.
    Corpus,
}

/// Incremental loader; feed it records or units, then call [`finish`](Self::finish).
pub struct CorpusIndexBuilder<'a> {
    index: CorpusIndex,
    source: IndexSource,
    fingerprinter: &'a dyn Fingerprinter,
    topics: Option<&'a dyn TopicExtractor>,
    replay: Option<RdfSyntax>,
}

impl<'a> CorpusIndexBuilder<'a> {
    /// Start loading.
    ///
    /// Topic bookkeeping is on when `topics` is given. Asking for replay from
    /// a record source fails before anything is read.
    pub fn begin(
        source: IndexSource,
        fingerprinter: &'a dyn Fingerprinter,
        topics: Option<&'a dyn TopicExtractor>,
        replay: Option<RdfSyntax>,
    ) -> Result<Self, IndexLoadError> {
        if replay.is_some() && source == IndexSource::Records {
            return Err(IndexLoadError::IncompatibleSource);
        }
        let index = if replay.is_some() {
            CorpusIndex::with_replay()
        } else {
            CorpusIndex::new()
        };
        Ok(Self {
            index,
            source,
            fingerprinter,
            topics,
            replay,
        })
    }

    /// Insert a precomputed record.
    ///
    /// Without lineage the topic column is ignored. An undefined or omitted
    /// topic takes no part in topic bookkeeping.
    pub fn add_record(&mut self, record: &ReuseRecord) {
        let topic = if self.topics.is_some() {
            record.topic.as_defined()
        } else {
            None
        };
        self.index.insert(&record.identity, &record.fingerprint, topic);
    }

    /// Fingerprint and insert a prior unit.
    pub fn add_nanopub(&mut self, nanopub: &Nanopub) -> Result<(), IndexLoadError> {
        debug_assert_eq!(self.source, IndexSource::Corpus);
        let fingerprint = self.fingerprinter.fingerprint(nanopub)?;
        let topic = self.topics.and_then(|t| t.topic(nanopub));
        if self.topics.is_some() && topic.is_none() {
            debug!(uri = nanopub.uri(), "prior unit has no topic");
        }
        self.index.insert(nanopub.uri(), &fingerprint, topic.as_deref());
        if let Some(syntax) = self.replay {
            self.index.insert_replay(&fingerprint, writer::to_string(nanopub, syntax));
        }
        Ok(())
    }

    /// Done loading.
    pub fn finish(self) -> CorpusIndex {
        let stats = self.index.stats();
        if stats.out_of_corpus_duplicate_topics > 0 {
            warn!(
                duplicates = stats.out_of_corpus_duplicate_topics,
                "prior corpus has topics shared by several units"
            );
        }
        debug!(
            reusable = stats.reusable_count,
            unique = stats.unique_reusable_count,
            "corpus index loaded"
        );
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{FingerprintOptions, FingerprinterRegistry};
    use crate::store::TopicSlot;
    use crate::topic::{TopicExtractorRegistry, TopicOptions};
    use crate::trusty::make_trusty;
    use crate::types::{Nanopub, TopicField};
    use crate::types::nanopub::tests::make_statements;
    use crate::vocab::DEFAULT_BASE_URI;

    fn make_trusty_nanopub() -> Nanopub {
        let np = Nanopub::from_statements(make_statements("http://purl.org/nanopub/temp/np1")).unwrap();
        make_trusty(&np, DEFAULT_BASE_URI).unwrap()
    }

    #[test]
    fn test_replay_from_records_is_rejected() {
        let fingerprinter = FingerprinterRegistry::with_defaults()
            .build("default", &FingerprintOptions::default())
            .unwrap();
        let result = CorpusIndexBuilder::begin(
            IndexSource::Records,
            fingerprinter.as_ref(),
            None,
            Some(RdfSyntax::TriG),
        );
        assert!(matches!(result, Err(IndexLoadError::IncompatibleSource)));
    }

    #[test]
    fn test_records_ignore_topics_without_lineage() {
        let fingerprinter = FingerprinterRegistry::with_defaults()
            .build("default", &FingerprintOptions::default())
            .unwrap();
        let mut builder =
            CorpusIndexBuilder::begin(IndexSource::Records, fingerprinter.as_ref(), None, None).unwrap();
        builder.add_record(&ReuseRecord::new("u1", "fp1").with_topic(TopicField::Defined("x".into())));
        let index = builder.finish();
        assert_eq!(index.lookup("fp1"), Some("u1"));
        assert_eq!(index.topic_slot("x"), TopicSlot::Absent);
    }

    #[test]
    fn test_records_with_lineage_skip_undefined_topics() {
        let fingerprinter = FingerprinterRegistry::with_defaults()
            .build("default", &FingerprintOptions::default())
            .unwrap();
        let topics = TopicExtractorRegistry::with_defaults()
            .build("default", &TopicOptions::default())
            .unwrap();
        let mut builder = CorpusIndexBuilder::begin(
            IndexSource::Records,
            fingerprinter.as_ref(),
            Some(topics.as_ref()),
            None,
        )
        .unwrap();
        builder.add_record(&ReuseRecord::new("u1", "fp1").with_topic(TopicField::Defined("x".into())));
        builder.add_record(&ReuseRecord::new("u2", "fp2").with_topic(TopicField::Undefined));
        let index = builder.finish();
        assert_eq!(index.topic_slot("x"), TopicSlot::Single("u1".into()));
        assert_eq!(index.stats().reusable_count, 2);
    }

    #[test]
    fn test_corpus_load_fingerprints_and_replays() {
        let fingerprinter = FingerprinterRegistry::with_defaults()
            .build("default", &FingerprintOptions::default())
            .unwrap();
        let np = make_trusty_nanopub();
        let expected = fingerprinter.fingerprint(&np).unwrap();

        let mut builder = CorpusIndexBuilder::begin(
            IndexSource::Corpus,
            fingerprinter.as_ref(),
            None,
            Some(RdfSyntax::NQuads),
        )
        .unwrap();
        builder.add_nanopub(&np).unwrap();
        let index = builder.finish();

        assert_eq!(index.lookup(&expected), Some(np.uri()));
        let replayed = index.replayed(&expected).expect("replay text kept");
        assert!(replayed.contains(np.uri()));
    }

    #[test]
    fn test_corpus_without_artifact_code_fails() {
        let fingerprinter = FingerprinterRegistry::with_defaults()
            .build("default", &FingerprintOptions::default())
            .unwrap();
        let np = Nanopub::from_statements(make_statements("http://ex.org/np1")).unwrap();
        let mut builder =
            CorpusIndexBuilder::begin(IndexSource::Corpus, fingerprinter.as_ref(), None, None).unwrap();
        assert!(matches!(
            builder.add_nanopub(&np),
            Err(IndexLoadError::Fingerprint(FingerprintError::NotContentAddressed(_)))
        ));
    }
}
