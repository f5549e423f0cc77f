//! WikiPathways fingerprint strategy.

use super::{is_own_timestamp, FingerprintOptions, Fingerprinter};
use crate::types::{Nanopub, Partition, Statement};
use crate::vocab::{NPX_SUPERSEDES, PLACEHOLDER_ASSERTION, PLACEHOLDER_PROVENANCE, PLACEHOLDER_PUBINFO};

/// Keeps assertion, provenance and pubinfo under placeholder graph IRIs.
///
/// Besides the creation timestamp, the unit's own `npx:supersedes` links are
/// dropped, so a re-linked unit fingerprints like its unlinked form.
#[derive(Debug, Clone, Default)]
pub struct WikipathwaysFingerprinter {
    options: FingerprintOptions,
}

impl WikipathwaysFingerprinter {
    /// Build the strategy. Only the timestamp predicates of `options` apply.
    pub fn new(options: FingerprintOptions) -> Self {
        Self { options }
    }
}

impl Fingerprinter for WikipathwaysFingerprinter {
    fn name(&self) -> &'static str {
        "wikipathways"
    }

    fn normalize(&self, nanopub: &Nanopub) -> Vec<Statement> {
        let mut out = Vec::new();
        for (partition, st) in nanopub.statements() {
            let graph = match partition {
                Partition::Head => continue,
                Partition::Assertion => PLACEHOLDER_ASSERTION,
                Partition::Provenance => PLACEHOLDER_PROVENANCE,
                Partition::Pubinfo => {
                    if is_own_timestamp(nanopub, st, &self.options)
                        || (st.has_subject(nanopub.uri()) && st.predicate == NPX_SUPERSEDES)
                    {
                        continue;
                    }
                    PLACEHOLDER_PUBINFO
                }
            };
            out.push(Statement::new(st.subject.clone(), st.predicate.clone(), st.object.clone(), graph));
        }
        out
    }
}
