//! Metabolite/species topics.

use super::TopicExtractor;
use crate::types::{Nanopub, Term};
use crate::vocab::{CHEMINF_000399, SIO_000253, WDT_P703, WIKIDATA_Q2013};

/// `compound>taxon>inchikey>source`, from the first matching statements.
///
/// Undefined when any part is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaboliteSpeciesTopicExtractor;

impl TopicExtractor for MetaboliteSpeciesTopicExtractor {
    fn name(&self) -> &'static str {
        "metabolite-species"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        let found_in = nanopub
            .assertion()
            .iter()
            .find(|st| st.predicate == WDT_P703)
            .map(|st| format!("{}>{}", st.subject.value(), st.object.value()))?;
        let inchikey = nanopub
            .assertion()
            .iter()
            .find(|st| st.predicate == CHEMINF_000399)
            .map(|st| st.object.value().to_string())?;
        let source = nanopub
            .provenance()
            .iter()
            .filter(|st| st.predicate == SIO_000253)
            .find_map(|st| match &st.object {
                Term::Iri(iri) if iri != WIKIDATA_Q2013 => Some(iri.clone()),
                _ => None,
            })?;
        Some(format!("{}>{}>{}", found_in, inchikey, source))
    }
}
