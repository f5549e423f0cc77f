//! `fingerprint`: write `identity fingerprint` records for whole corpora.

use tracing::info;

use super::{close_sink, open_sink};
use crate::config::FingerprintConfig;
use crate::error::{InFile, RunError};
use crate::io::records::write_record;
use crate::io::reader::for_each_nanopub;
use crate::io::{is_gzip_path, open_input, CorpusError};
use crate::types::ReuseRecord;

/// Fingerprint every unit of every input. Returns the number of units.
pub fn run_fingerprint(config: &FingerprintConfig) -> Result<usize, RunError> {
    info!(
        params_hash = %config.params_hash(),
        fingerprinter = %config.fingerprint.fingerprinter,
        "starting fingerprint"
    );
    let fingerprinter = config.fingerprint.build()?;
    let gzip = config.output.as_deref().is_some_and(is_gzip_path);
    let mut total = 0;
    for (i, input) in config.inputs.iter().enumerate() {
        let mut sink = open_sink(config.output.as_deref(), gzip, i)?;
        let reader = open_input(&input.path, input.format.gzip).in_file(&input.path)?;
        let count = for_each_nanopub(reader, input.format.syntax, |np| -> Result<(), RunError> {
            let fingerprint = fingerprinter.fingerprint(&np)?;
            write_record(&mut sink, &ReuseRecord::new(np.uri(), fingerprint)).map_err(CorpusError::from)?;
            Ok(())
        })
        .in_file(&input.path)?;
        close_sink(sink)?;
        info!(file = %input.path.display(), count, "fingerprinted");
        total += count;
    }
    Ok(total)
}
