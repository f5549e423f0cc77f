//! Subcommand runners.
//!
//! Each runner takes its typed config, processes the input files strictly in
//! the order given and returns one summary per file. Failures are tagged with
//! the file they happened in.

pub mod fingerprint;
pub mod index_reuse;
pub mod reuse;
pub mod topic;

pub use fingerprint::run_fingerprint;
pub use index_reuse::run_index_reuse;
pub use reuse::{load_corpus_index, run_reuse};
pub use topic::run_topic;

use std::path::Path;

use crate::error::{InFile, RunError};
use crate::io::{CorpusError, OutputSink};
use crate::summary::append_table_line;

/// Open an output for the `index`-th input file: the first truncates, later ones append.
pub(crate) fn open_sink(path: Option<&Path>, gzip: bool, index: usize) -> Result<OutputSink, RunError> {
    let sink = OutputSink::open(path, gzip, index > 0);
    match path {
        Some(path) => sink.in_file(path),
        None => Ok(sink?),
    }
}

/// Flush and close an output.
pub(crate) fn close_sink(sink: OutputSink) -> Result<(), RunError> {
    sink.finish().map_err(CorpusError::from)?;
    Ok(())
}

/// Append a summary line when a table is configured.
pub(crate) fn append_summary(table: Option<&Path>, line: &str) -> Result<(), RunError> {
    if let Some(table) = table {
        append_table_line(table, line).map_err(CorpusError::from).in_file(table)?;
    }
    Ok(())
}
