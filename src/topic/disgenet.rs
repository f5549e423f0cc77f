//! DisGeNET topics.

use super::default::main_subject;
use super::TopicExtractor;
use crate::types::Nanopub;
use crate::vocab::{DISGENET_GDA_LEGACY_PREFIX, DISGENET_GDA_PREFIX};

/// Main subject, with legacy association IRIs moved to the current namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisgenetTopicExtractor;

impl DisgenetTopicExtractor {
    /// New extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TopicExtractor for DisgenetTopicExtractor {
    fn name(&self) -> &'static str {
        "disgenet"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        let topic = main_subject(nanopub, |_| false)?;
        Some(match topic.strip_prefix(DISGENET_GDA_LEGACY_PREFIX) {
            Some(id) => format!("{}{}", DISGENET_GDA_PREFIX, id),
            None => topic,
        })
    }
}
