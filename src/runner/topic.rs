//! `topic`: write `identity topic` lines for whole corpora.

use std::io::Write;

use tracing::info;

use super::{close_sink, open_sink};
use crate::config::TopicConfig;
use crate::error::{InFile, RunError};
use crate::io::reader::for_each_nanopub;
use crate::io::{is_gzip_path, open_input, CorpusError};
use crate::types::UNDEFINED_TOPIC;

/// Extract the topic of every unit of every input. Returns the number of units.
pub fn run_topic(config: &TopicConfig) -> Result<usize, RunError> {
    info!(
        params_hash = %config.params_hash(),
        extractor = %config.topic.extractor,
        "starting topic extraction"
    );
    let extractor = config.topic.build()?;
    let gzip = config.output.as_deref().is_some_and(is_gzip_path);
    let mut total = 0;
    let mut undefined = 0;
    for (i, input) in config.inputs.iter().enumerate() {
        let mut sink = open_sink(config.output.as_deref(), gzip, i)?;
        let reader = open_input(&input.path, input.format.gzip).in_file(&input.path)?;
        let count = for_each_nanopub(reader, input.format.syntax, |np| -> Result<(), RunError> {
            let topic = extractor.topic(&np);
            if topic.is_none() {
                undefined += 1;
            }
            let topic = topic.unwrap_or_else(|| UNDEFINED_TOPIC.to_string());
            writeln!(sink, "{} {}", np.uri(), topic.replace(['\n', '\r'], " ")).map_err(CorpusError::from)?;
            Ok(())
        })
        .in_file(&input.path)?;
        close_sink(sink)?;
        info!(file = %input.path.display(), count, "topics extracted");
        total += count;
    }
    info!(total, undefined, "topic extraction done");
    Ok(total)
}
