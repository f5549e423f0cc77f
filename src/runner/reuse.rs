//! `reuse`: classify new corpora against a prior one.

use std::io::Write;

use tracing::info;

use super::{append_summary, close_sink, open_sink};
use crate::config::{ContentOutput, CorpusInput, PriorSource, ReuseConfig, TopicSettings};
use crate::error::{InFile, RunError};
use crate::fingerprint::Fingerprinter;
use crate::io::records::{for_each_record, write_record};
use crate::io::reader::for_each_nanopub;
use crate::io::{is_gzip_path, open_input, writer, CorpusError, RdfSyntax};
use crate::matcher::{MatchStats, ReuseMatcher};
use crate::store::{CorpusIndex, CorpusIndexBuilder, IndexSource};
use crate::summary::{display_name, ReuseSummary};
use crate::topic::TopicExtractor;

/// Build the Corpus Index from a prior source.
pub fn load_corpus_index(
    prior: &PriorSource,
    fingerprinter: &dyn Fingerprinter,
    topics: Option<&dyn TopicExtractor>,
    replay: Option<RdfSyntax>,
) -> Result<CorpusIndex, RunError> {
    match prior {
        PriorSource::Records(input) => {
            let mut builder = CorpusIndexBuilder::begin(IndexSource::Records, fingerprinter, topics, replay)?;
            let reader = open_input(&input.path, input.gzip)?;
            for_each_record(reader, |record| -> Result<(), RunError> {
                builder.add_record(&record);
                Ok(())
            })?;
            Ok(builder.finish())
        }
        PriorSource::Corpus(input) => {
            let mut builder = CorpusIndexBuilder::begin(IndexSource::Corpus, fingerprinter, topics, replay)?;
            let reader = open_input(&input.path, input.format.gzip)?;
            for_each_nanopub(reader, input.format.syntax, |np| -> Result<(), RunError> {
                builder.add_nanopub(&np)?;
                Ok(())
            })?;
            Ok(builder.finish())
        }
    }
}

/// Run `reuse` over every input file.
pub fn run_reuse(config: &ReuseConfig) -> Result<Vec<ReuseSummary>, RunError> {
    info!(
        params_hash = %config.params_hash(),
        inputs = config.inputs.len(),
        lineage = config.lineage.is_some(),
        "starting reuse"
    );
    let fingerprinter = config.fingerprint.build()?;
    let topics = config.lineage.as_ref().map(TopicSettings::build).transpose()?;
    let replay = config.all_output.as_ref().map(|target| target.format.syntax);

    let index = load_corpus_index(&config.prior, fingerprinter.as_ref(), topics.as_deref(), replay)
        .in_file(config.prior.path())?;
    let load = index.stats();
    info!(
        reusable = load.reusable_count,
        unique = load.unique_reusable_count,
        out_of_corpus_duplicate_topics = load.out_of_corpus_duplicate_topics,
        "prior corpus loaded"
    );

    let lineage = topics.is_some();
    let mut matcher = ReuseMatcher::new(index, fingerprinter, topics);
    let mut stats = MatchStats::default();
    let mut summaries = Vec::with_capacity(config.inputs.len());
    for (i, input) in config.inputs.iter().enumerate() {
        process_file(&mut matcher, config, input, i, &mut stats).in_file(&input.path)?;

        info!(
            file = %input.path.display(),
            input = stats.input_count,
            reused = stats.reuse_count,
            new = stats.new_count,
            superseded = stats.superseded_count,
            matching_errors = stats.matching_errors(),
            "reuse counts"
        );
        let summary = ReuseSummary {
            file: display_name(&input.path),
            load,
            matched: stats,
            lineage,
        };
        append_summary(config.table.as_deref(), &summary.table_line())?;
        summaries.push(summary);
    }
    Ok(summaries)
}

fn process_file(
    matcher: &mut ReuseMatcher,
    config: &ReuseConfig,
    input: &CorpusInput,
    position: usize,
    stats: &mut MatchStats,
) -> Result<(), RunError> {
    let mut output = match config.content_output() {
        ContentOutput::Off => None,
        _ => Some(open_sink(config.output.path.as_deref(), config.output.format.gzip, position)?),
    };
    let every_unit = config.content_output() == ContentOutput::EveryUnit;
    let mut all_output = match &config.all_output {
        Some(target) => Some((open_sink(target.path.as_deref(), target.format.gzip, position)?, target.format.syntax)),
        None => None,
    };
    let mut records = match &config.records {
        Some(path) => Some(open_sink(Some(path), is_gzip_path(path), position)?),
        None => None,
    };

    let reader = open_input(&input.path, input.format.gzip)?;
    for_each_nanopub(reader, input.format.syntax, |np| -> Result<(), RunError> {
        let outcome = matcher.process(np, stats)?;
        if let Some(sink) = records.as_mut() {
            write_record(sink, &outcome.record()).map_err(CorpusError::from)?;
        }
        if outcome.is_reused() {
            if every_unit {
                if let Some(sink) = output.as_mut() {
                    writer::write_nanopub(sink, &outcome.nanopub, config.output.format.syntax)
                        .map_err(CorpusError::from)?;
                }
            }
            if let Some((sink, _)) = all_output.as_mut() {
                if let Some(text) = matcher.index().replayed(&outcome.fingerprint) {
                    sink.write_all(text.as_bytes()).map_err(CorpusError::from)?;
                }
            }
            return Ok(());
        }
        if let Some(sink) = output.as_mut() {
            writer::write_nanopub(sink, &outcome.nanopub, config.output.format.syntax).map_err(CorpusError::from)?;
        }
        if let Some((sink, syntax)) = all_output.as_mut() {
            writer::write_nanopub(sink, &outcome.nanopub, *syntax).map_err(CorpusError::from)?;
        }
        Ok(())
    })?;

    for sink in [output, records].into_iter().flatten() {
        close_sink(sink)?;
    }
    if let Some((sink, _)) = all_output {
        close_sink(sink)?;
    }
    Ok(())
}
