//! `np-reuse`: nanopublication reuse and index-chain reuse.
//!
//! ## Usage
//!
//! ```bash
//! np-reuse reuse new.trig -x prior.txt -u new-records.txt -n -o out.trig
//! np-reuse reuse new.trig.gz -x prior.trig.gz --topics -a all.trig.gz -t table.csv
//! np-reuse index-reuse records.txt -x prior-index.trig -T "My index" -C https://orcid.org/...
//! np-reuse fingerprint corpus.nq -o records.txt
//! np-reuse topic corpus.trig --topic-extractor wikipathways
//! ```
//!
//! ## Logging
//!
//! - `RUST_LOG`: log filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" otherwise (default: pretty)
//!
//! Logs go to stderr; data output may use stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nanopub_reuse::chain::{IndexMetadata, DEFAULT_PAGE_SIZE};
use nanopub_reuse::config::{
    CorpusInput, FingerprintConfig, FingerprintSettings, IndexReuseConfig, OutputTarget, PriorSource,
    RecordInput, ReuseConfig, TopicConfig, TopicSettings,
};
use nanopub_reuse::fingerprint::{FingerprintOptions, DEFAULT_FINGERPRINTER};
use nanopub_reuse::runner::{run_fingerprint, run_index_reuse, run_reuse, run_topic};
use nanopub_reuse::topic::{TopicOptions, DEFAULT_TOPIC_EXTRACTOR};
use nanopub_reuse::vocab::DEFAULT_BASE_URI;

#[derive(Parser)]
#[command(
    name = "np-reuse",
    about = "Reuse unchanged nanopublications and index pages across republications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify new nanopublications as reused, superseding or new
    Reuse(ReuseArgs),

    /// Republish an index, reusing the valid prefix of its prior chain
    IndexReuse(IndexReuseArgs),

    /// Write `identity fingerprint` records for a corpus
    Fingerprint(FingerprintArgs),

    /// Write `identity topic` lines for a corpus
    Topic(TopicArgs),
}

#[derive(Args)]
struct FingerprintFlags {
    /// Leave the head graph out of the fingerprint
    #[arg(long)]
    ignore_head: bool,

    /// Leave the provenance graph out of the fingerprint
    #[arg(long)]
    ignore_prov: bool,

    /// Leave the publication info graph out of the fingerprint
    #[arg(long)]
    ignore_pubinfo: bool,

    /// Extra predicate treated as a creation timestamp (repeatable)
    #[arg(long = "timestamp-predicate", value_name = "IRI")]
    timestamp_predicates: Vec<String>,

    /// Fingerprint strategy
    #[arg(long, default_value = DEFAULT_FINGERPRINTER)]
    fingerprinter: String,
}

impl FingerprintFlags {
    fn settings(&self) -> FingerprintSettings {
        FingerprintSettings {
            fingerprinter: self.fingerprinter.clone(),
            options: FingerprintOptions {
                ignore_head: self.ignore_head,
                ignore_provenance: self.ignore_prov,
                ignore_pubinfo: self.ignore_pubinfo,
                extra_timestamp_predicates: self.timestamp_predicates.clone(),
            },
        }
    }
}

#[derive(Args)]
struct TopicFlags {
    /// Topic strategy
    #[arg(long, default_value = DEFAULT_TOPIC_EXTRACTOR)]
    topic_extractor: String,

    /// Predicates ignored when picking the main subject, separated by `|`
    #[arg(long)]
    ignore_predicates: Option<String>,
}

impl TopicFlags {
    fn settings(&self) -> TopicSettings {
        TopicSettings {
            extractor: self.topic_extractor.clone(),
            options: self
                .ignore_predicates
                .as_deref()
                .map(TopicOptions::from_ignore_list)
                .unwrap_or_default(),
        }
    }
}

#[derive(Args)]
struct ReuseArgs {
    /// New corpus files, processed in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Prior corpus (.trig, .nq, optionally .gz) or records (.txt, .txt.gz)
    #[arg(short = 'x', long = "prior")]
    prior: PathBuf,

    /// Format of the new corpus files: trig, nq, trig.gz, nq.gz
    #[arg(long)]
    in_format: Option<String>,

    /// Format of the prior corpus
    #[arg(long)]
    reuse_format: Option<String>,

    /// Format of the content output
    #[arg(long)]
    out_format: Option<String>,

    /// Content output; receives every nanopublication unless --new is given
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write only new and superseding nanopublications to the content output (default: stdout)
    #[arg(short = 'n', long = "new")]
    output_new: bool,

    /// Write reused (verbatim) and new nanopublications here; needs a full prior corpus
    #[arg(short = 'a', long)]
    all_output: Option<PathBuf>,

    /// Write reuse records here
    #[arg(short = 'u', long)]
    records: Option<PathBuf>,

    /// Append one summary line per input file to this table
    #[arg(short = 't', long)]
    table: Option<PathBuf>,

    #[command(flatten)]
    fingerprint: FingerprintFlags,

    /// Track lineage: link new versions to the prior unit with the same topic
    #[arg(long)]
    topics: bool,

    #[command(flatten)]
    topic: TopicFlags,
}

impl ReuseArgs {
    fn into_config(self) -> Result<ReuseConfig> {
        let inputs = self
            .inputs
            .into_iter()
            .map(|path| CorpusInput::resolve(path, self.in_format.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        let all_output = match self.all_output {
            Some(path) => Some(OutputTarget::resolve(Some(path), self.out_format.as_deref())?),
            None => None,
        };
        Ok(ReuseConfig {
            inputs,
            prior: PriorSource::resolve(self.prior, self.reuse_format.as_deref())?,
            output: OutputTarget::resolve(self.output, self.out_format.as_deref())?,
            output_new: self.output_new,
            all_output,
            records: self.records,
            table: self.table,
            fingerprint: self.fingerprint.settings(),
            lineage: self.topics.then(|| self.topic.settings()),
        })
    }
}

#[derive(Args)]
struct IndexReuseArgs {
    /// Inventory record files (.txt, .txt.gz), processed in order
    #[arg(required = true)]
    inventories: Vec<PathBuf>,

    /// Previously published index chain, in chain order
    #[arg(short = 'x', long = "prior")]
    prior: Option<PathBuf>,

    /// Format of the prior chain
    #[arg(long)]
    reuse_format: Option<String>,

    /// New index pages (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Reused and new index pages
    #[arg(short = 'a', long)]
    all_output: Option<PathBuf>,

    /// Format of the outputs
    #[arg(long)]
    out_format: Option<String>,

    /// Append one summary line per inventory to this table
    #[arg(short = 't', long)]
    table: Option<PathBuf>,

    /// Base URI of new index pages
    #[arg(short = 'U', long, default_value = DEFAULT_BASE_URI)]
    base_uri: String,

    /// Index title
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Index description
    #[arg(short = 'D', long)]
    description: Option<String>,

    /// Index creator IRI (repeatable)
    #[arg(short = 'C', long = "creator")]
    creators: Vec<String>,

    /// 'See also' IRI (repeatable)
    #[arg(short = 'A', long)]
    see_also: Vec<String>,

    /// Maximum elements per index page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Fixed creation time (RFC 3339) for reproducible pages
    #[arg(long)]
    timestamp: Option<DateTime<Utc>>,
}

impl IndexReuseArgs {
    fn into_config(self) -> Result<IndexReuseConfig> {
        let prior_chain = match self.prior {
            Some(path) => Some(CorpusInput::resolve(path, self.reuse_format.as_deref())?),
            None => None,
        };
        let all_output = match self.all_output {
            Some(path) => Some(OutputTarget::resolve(Some(path), self.out_format.as_deref())?),
            None => None,
        };
        Ok(IndexReuseConfig {
            inventories: self.inventories.into_iter().map(RecordInput::new).collect(),
            prior_chain,
            output: OutputTarget::resolve(self.output, self.out_format.as_deref())?,
            all_output,
            table: self.table,
            index: IndexMetadata {
                base_uri: self.base_uri,
                title: self.title,
                description: self.description,
                creators: self.creators,
                see_also: self.see_also,
                page_size: self.page_size,
                timestamp: self.timestamp,
            },
        })
    }
}

#[derive(Args)]
struct FingerprintArgs {
    /// Corpus files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Format of the corpus files
    #[arg(long)]
    in_format: Option<String>,

    /// Record output (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    fingerprint: FingerprintFlags,
}

#[derive(Args)]
struct TopicArgs {
    /// Corpus files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Format of the corpus files
    #[arg(long)]
    in_format: Option<String>,

    /// Output (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    topic: TopicFlags,
}

fn resolve_inputs(paths: Vec<PathBuf>, in_format: Option<&str>) -> Result<Vec<CorpusInput>> {
    Ok(paths
        .into_iter()
        .map(|path| CorpusInput::resolve(path, in_format))
        .collect::<Result<Vec<_>, _>>()?)
}

/// Initialize the tracing subscriber with JSON or pretty format, writing to stderr
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reuse(args) => {
            run_reuse(&args.into_config()?)?;
        }
        Commands::IndexReuse(args) => {
            run_index_reuse(&args.into_config()?)?;
        }
        Commands::Fingerprint(args) => {
            let config = FingerprintConfig {
                inputs: resolve_inputs(args.inputs, args.in_format.as_deref())?,
                output: args.output,
                fingerprint: args.fingerprint.settings(),
            };
            run_fingerprint(&config)?;
        }
        Commands::Topic(args) => {
            let config = TopicConfig {
                inputs: resolve_inputs(args.inputs, args.in_format.as_deref())?,
                output: args.output,
                topic: args.topic.settings(),
            };
            run_topic(&config)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "run failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
