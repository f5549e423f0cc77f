//! `index-reuse`: republish an index, keeping the reusable prefix of its chain.

use tracing::info;

use super::{append_summary, close_sink, open_sink};
use crate::chain::{ChainStep, IndexChainReuser, IndexCreator, Inventory};
use crate::config::{IndexReuseConfig, RecordInput};
use crate::error::{InFile, RunError};
use crate::io::reader::for_each_nanopub;
use crate::io::records::read_identities;
use crate::io::{open_input, writer, CorpusError};
use crate::summary::{display_name, IndexReuseSummary};

/// Run `index-reuse` over every inventory file.
///
/// Each inventory is walked against the prior chain from scratch.
pub fn run_index_reuse(config: &IndexReuseConfig) -> Result<Vec<IndexReuseSummary>, RunError> {
    info!(
        params_hash = %config.params_hash(),
        inventories = config.inventories.len(),
        base_uri = %config.index.base_uri,
        "starting index reuse"
    );
    let mut summaries = Vec::with_capacity(config.inventories.len());
    for (i, inventory) in config.inventories.iter().enumerate() {
        let summary = process_inventory(config, inventory, i).in_file(&inventory.path)?;
        info!(
            file = %inventory.path.display(),
            reused = summary.reuse_count,
            new_pages = summary.new_pages,
            "index reuse count"
        );
        append_summary(config.table.as_deref(), &summary.table_line())?;
        summaries.push(summary);
    }
    Ok(summaries)
}

fn process_inventory(
    config: &IndexReuseConfig,
    input: &RecordInput,
    position: usize,
) -> Result<IndexReuseSummary, RunError> {
    let identities = read_identities(open_input(&input.path, input.gzip)?)?;
    let mut reuser = IndexChainReuser::new(Inventory::from_identities(identities));

    let mut output = open_sink(config.output.path.as_deref(), config.output.format.gzip, position)?;
    let mut all_output = match &config.all_output {
        Some(target) => Some((open_sink(target.path.as_deref(), target.format.gzip, position)?, target.format.syntax)),
        None => None,
    };

    if let Some(prior) = &config.prior_chain {
        let reader = open_input(&prior.path, prior.format.gzip).in_file(&prior.path)?;
        for_each_nanopub(reader, prior.format.syntax, |np| -> Result<(), RunError> {
            match reuser.offer(np)? {
                ChainStep::Reused(index) | ChainStep::Vacuous(index) => {
                    if let Some((sink, syntax)) = all_output.as_mut() {
                        writer::write_nanopub(sink, index.nanopub(), *syntax).map_err(CorpusError::from)?;
                    }
                }
                ChainStep::Diverged | ChainStep::Ignored => {}
            }
            Ok(())
        })
        .in_file(&prior.path)?;
    }

    let (result, inventory) = reuser.finish();
    let mut creator = IndexCreator::new(config.index.clone(), result.last.clone());
    let mut pages = Vec::new();
    for element in inventory.remaining() {
        if let Some(page) = creator.add_element(element)? {
            pages.push(page);
        }
    }
    let complete = creator.finish()?;
    let index_uri = complete.as_ref().map(|page| page.uri().to_string());
    pages.extend(complete);

    for page in &pages {
        writer::write_nanopub(&mut output, page, config.output.format.syntax).map_err(CorpusError::from)?;
        if let Some((sink, syntax)) = all_output.as_mut() {
            writer::write_nanopub(sink, page, *syntax).map_err(CorpusError::from)?;
        }
    }
    close_sink(output)?;
    if let Some((sink, _)) = all_output {
        close_sink(sink)?;
    }

    Ok(IndexReuseSummary {
        file: display_name(&input.path),
        reuse_count: result.reuse_count,
        new_pages: pages.len(),
        index_uri,
    })
}
