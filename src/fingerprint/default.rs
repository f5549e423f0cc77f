//! Default fingerprint strategy.

use super::{is_own_timestamp, FingerprintOptions, Fingerprinter};
use crate::types::{Nanopub, Partition, Statement};

/// Keeps every partition not switched off by an ignore-flag and drops the
/// unit's own creation timestamp from pubinfo.
#[derive(Debug, Clone, Default)]
pub struct DefaultFingerprinter {
    options: FingerprintOptions,
}

impl DefaultFingerprinter {
    /// Strategy with the given options.
    pub fn new(options: FingerprintOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &FingerprintOptions {
        &self.options
    }

    fn ignores(&self, partition: Partition) -> bool {
        match partition {
            Partition::Head => self.options.ignore_head,
            Partition::Assertion => false,
            Partition::Provenance => self.options.ignore_provenance,
            Partition::Pubinfo => self.options.ignore_pubinfo,
        }
    }
}

impl Fingerprinter for DefaultFingerprinter {
    fn name(&self) -> &'static str {
        "default"
    }

    fn normalize(&self, nanopub: &Nanopub) -> Vec<Statement> {
        nanopub
            .statements()
            .filter(|(partition, _)| !self.ignores(*partition))
            .filter(|(partition, st)| {
                *partition != Partition::Pubinfo || !is_own_timestamp(nanopub, st, &self.options)
            })
            .map(|(_, st)| st.clone())
            .collect()
    }
}
