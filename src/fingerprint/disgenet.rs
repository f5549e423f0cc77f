//! DisGeNET fingerprint strategy.
//!
//! DisGeNET releases re-mint association identifiers, import timestamps and
//! versioned VoID IRIs on every release. These are replaced by placeholders,
//! and only the assertion and provenance graphs are kept.

use regex_lite::Regex;

use super::{FingerprintOptions, Fingerprinter};
use crate::types::{Nanopub, Partition, Statement, Term};
use crate::vocab::{
    PAV1_IMPORTED_ON, PAV2_IMPORTED_ON, PLACEHOLDER_ASSERTION, PLACEHOLDER_DISGENET_GDA,
    PLACEHOLDER_PROVENANCE, PLACEHOLDER_TIMESTAMP,
};

const GDA_SUBJECT_PREFIXES: [&str; 2] = [
    "http://rdf.disgenet.org/resource/gda/DGN",
    "http://rdf.disgenet.org/gene-disease-association.ttl#DGN",
];
const ECO_OWL_PREFIX: &str = "http://purl.obolibrary.org/obo/eco.owl#";
const OBO_PREFIX: &str = "http://purl.obolibrary.org/obo/";
const VOID_BASE: &str = "http://rdf.disgenet.org/vx.x.x/void/";

/// Placeholder-substituting strategy for DisGeNET.
#[derive(Debug, Clone)]
pub struct DisgenetFingerprinter {
    void_iri: Regex,
    void_dated: Regex,
    void_prefix: Regex,
}

impl DisgenetFingerprinter {
    /// Build the strategy. Ignore-flags do not apply to it.
    pub fn new(_options: FingerprintOptions) -> Self {
        Self {
            void_iri: Regex::new(r"^http://rdf\.disgenet\.org/v.*/void.*$").expect("valid VoID pattern"),
            void_dated: Regex::new(r"^http://rdf\.disgenet\.org/v.*/void.*(/|#)(.*)-20[0-9]*$")
                .expect("valid dated VoID pattern"),
            void_prefix: Regex::new(r"^http://rdf\.disgenet\.org/v.*/void.*(/|#)").expect("valid VoID prefix pattern"),
        }
    }

    /// Rewrite versioned VoID and ECO IRIs to release-independent forms.
    pub fn transform_iri(&self, iri: &str) -> String {
        if self.void_iri.is_match(iri) {
            if self.void_dated.is_match(iri) {
                return self.void_dated.replace(iri, "http://rdf.disgenet.org/vx.x.x/void/${2}").into_owned();
            }
            return self.void_prefix.replace(iri, VOID_BASE).into_owned();
        }
        if let Some(rest) = iri.strip_prefix(ECO_OWL_PREFIX) {
            return format!("{}{}", OBO_PREFIX, rest);
        }
        iri.to_string()
    }

    fn normalize_statement(&self, nanopub: &Nanopub, partition: Partition, st: &Statement) -> Option<Statement> {
        let mut subject = st.subject.clone();
        let mut predicate = st.predicate.clone();
        let mut object = st.object.clone();
        let graph = match partition {
            Partition::Assertion => {
                if let Term::Iri(iri) = &subject {
                    if GDA_SUBJECT_PREFIXES.iter().any(|p| iri.starts_with(p)) {
                        subject = Term::iri(PLACEHOLDER_DISGENET_GDA);
                    }
                }
                PLACEHOLDER_ASSERTION
            }
            Partition::Provenance => {
                if predicate == PAV1_IMPORTED_ON || predicate == PAV2_IMPORTED_ON {
                    predicate = PAV2_IMPORTED_ON.to_string();
                    object = Term::iri(PLACEHOLDER_TIMESTAMP);
                }
                if subject.is_iri(nanopub.graph_uri(Partition::Assertion)) {
                    subject = Term::iri(PLACEHOLDER_ASSERTION);
                }
                PLACEHOLDER_PROVENANCE
            }
            Partition::Head | Partition::Pubinfo => return None,
        };
        let transform = |iri: &str| self.transform_iri(iri);
        Some(Statement::new(
            subject.map_iri(transform),
            transform(&predicate),
            object.map_iri(transform),
            graph,
        ))
    }
}

impl Fingerprinter for DisgenetFingerprinter {
    fn name(&self) -> &'static str {
        "disgenet"
    }

    fn normalize(&self, nanopub: &Nanopub) -> Vec<Statement> {
        nanopub
            .statements()
            .filter_map(|(partition, st)| self.normalize_statement(nanopub, partition, st))
            .collect()
    }
}
