//! WikiPathways topics.
//!
//! The main subject alone is too weak for WikiPathways interactions, so the
//! topic also carries the pathways the assertion is part of and the organism
//! names it mentions:
//!
//! ```text
//! <main subject>:|WP1|WP2:|Homo_sapiens
//! ```

use super::default::main_subject;
use super::TopicExtractor;
use crate::types::Nanopub;
use crate::vocab::{DCT_IS_PART_OF, RDF_TYPE, WIKIPATHWAYS_ID_PREFIX, WP_ORGANISM_NAME, WP_PATHWAY_ONTOLOGY_TAG};

/// Main subject plus sorted pathway ids and organism names.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikipathwaysTopicExtractor;

fn skipped(predicate: &str) -> bool {
    predicate == RDF_TYPE || predicate == WP_PATHWAY_ONTOLOGY_TAG
}

fn joined(mut values: Vec<String>) -> String {
    values.sort();
    values.iter().map(|v| format!("|{}", v)).collect()
}

impl TopicExtractor for WikipathwaysTopicExtractor {
    fn name(&self) -> &'static str {
        "wikipathways"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        let subject = main_subject(nanopub, |st| skipped(&st.predicate))?;

        let mut pathways = Vec::new();
        let mut organisms = Vec::new();
        for st in nanopub.assertion() {
            if st.has_subject(nanopub.uri()) || skipped(&st.predicate) {
                continue;
            }
            match st.predicate.as_str() {
                DCT_IS_PART_OF => pathways.push(st.object.value().replace(WIKIPATHWAYS_ID_PREFIX, "")),
                WP_ORGANISM_NAME => organisms.push(st.object.value().replace(' ', "_")),
                _ => {}
            }
        }
        Some(format!("{}:{}:{}", subject, joined(pathways), joined(organisms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::tests::make_nanopub;
    use crate::types::Term;

    #[test]
    fn test_combined_topic() {
        let s = Term::iri("http://ex.org/interaction");
        let np = make_nanopub(
            "http://ex.org/np1",
            &[
                (s.clone(), RDF_TYPE, Term::iri("http://ex.org/Interaction")),
                (s.clone(), DCT_IS_PART_OF, Term::iri("http://identifiers.org/wikipathways/WP2")),
                (s.clone(), DCT_IS_PART_OF, Term::iri("http://identifiers.org/wikipathways/WP1")),
                (s.clone(), WP_ORGANISM_NAME, Term::string("Homo sapiens")),
                (Term::iri("http://ex.org/other"), "http://ex.org/p", Term::string("x")),
            ],
            &[],
        );
        assert_eq!(
            WikipathwaysTopicExtractor.topic(&np).as_deref(),
            Some("http://ex.org/interaction:|WP1|WP2:|Homo_sapiens")
        );
    }

    #[test]
    fn test_empty_lists() {
        let np = make_nanopub(
            "http://ex.org/np1",
            &[(Term::iri("http://ex.org/a"), "http://ex.org/p", Term::string("x"))],
            &[],
        );
        assert_eq!(WikipathwaysTopicExtractor.topic(&np).as_deref(), Some("http://ex.org/a::"));
    }
}
