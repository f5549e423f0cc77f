//! Typed run configuration.
//!
//! Each subcommand maps onto one config struct. File formats are resolved
//! when the config is built, so runners never look at extensions again.
//! Strategy settings hash to a stable `params_hash` that runners log at
//! start; paths are not part of the hash.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use crate::chain::IndexMetadata;
use crate::error::UnknownStrategy;
use crate::fingerprint::{FingerprintOptions, Fingerprinter, FingerprinterRegistry, DEFAULT_FINGERPRINTER};
use crate::io::{is_gzip_path, is_record_path, CorpusError, FileFormat};
use crate::topic::{TopicExtractor, TopicExtractorRegistry, TopicOptions, DEFAULT_TOPIC_EXTRACTOR};

/// A corpus file and its resolved format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusInput {
    /// File path.
    pub path: PathBuf,
    /// Resolved format.
    pub format: FileFormat,
}

impl CorpusInput {
    /// Resolve the format from `override_name` or the file name.
    pub fn resolve(path: impl Into<PathBuf>, override_name: Option<&str>) -> Result<Self, CorpusError> {
        let path = path.into();
        let format = FileFormat::resolve(&path, override_name)?;
        Ok(Self { path, format })
    }
}

/// A record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInput {
    /// File path.
    pub path: PathBuf,
    /// Gzip-wrapped.
    pub gzip: bool,
}

impl RecordInput {
    /// Record file at `path`; `.gz` means gzip.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let gzip = is_gzip_path(&path);
        Self { path, gzip }
    }
}

/// Where the Corpus Index comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PriorSource {
    /// Precomputed records (`.txt`, `.txt.gz`).
    Records(RecordInput),
    /// A full prior corpus.
    Corpus(CorpusInput),
}

impl PriorSource {
    /// Records for `.txt`/`.txt.gz` without an override, else a corpus.
    pub fn resolve(path: impl Into<PathBuf>, override_name: Option<&str>) -> Result<Self, CorpusError> {
        let path = path.into();
        if override_name.is_none() && is_record_path(&path) {
            return Ok(PriorSource::Records(RecordInput::new(path)));
        }
        Ok(PriorSource::Corpus(CorpusInput::resolve(path, override_name)?))
    }

    /// Path of the source.
    pub fn path(&self) -> &Path {
        match self {
            PriorSource::Records(r) => &r.path,
            PriorSource::Corpus(c) => &c.path,
        }
    }
}

/// A content output destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTarget {
    /// File path; standard output when `None`.
    pub path: Option<PathBuf>,
    /// Resolved format.
    pub format: FileFormat,
}

impl OutputTarget {
    /// Resolve from override, file name, or plain TriG.
    pub fn resolve(path: Option<PathBuf>, override_name: Option<&str>) -> Result<Self, CorpusError> {
        let format = FileFormat::resolve_output(path.as_deref(), override_name)?;
        Ok(Self { path, format })
    }

    /// Standard output, plain TriG.
    pub fn stdout() -> Self {
        Self {
            path: None,
            format: FileFormat::TRIG,
        }
    }
}

/// Fingerprint strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintSettings {
    /// Registry name.
    pub fingerprinter: String,
    /// Normalization options.
    pub options: FingerprintOptions,
}

impl Default for FingerprintSettings {
    fn default() -> Self {
        Self {
            fingerprinter: DEFAULT_FINGERPRINTER.to_string(),
            options: FingerprintOptions::default(),
        }
    }
}

impl FingerprintSettings {
    /// Instantiate from the built-in registry.
    pub fn build(&self) -> Result<Box<dyn Fingerprinter>, UnknownStrategy> {
        FingerprinterRegistry::with_defaults().build(&self.fingerprinter, &self.options)
    }
}

/// Topic strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSettings {
    /// Registry name.
    pub extractor: String,
    /// Strategy options.
    pub options: TopicOptions,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            extractor: DEFAULT_TOPIC_EXTRACTOR.to_string(),
            options: TopicOptions::default(),
        }
    }
}

impl TopicSettings {
    /// Instantiate from the built-in registry.
    pub fn build(&self) -> Result<Box<dyn TopicExtractor>, UnknownStrategy> {
        TopicExtractorRegistry::with_defaults().build(&self.extractor, &self.options)
    }
}

/// `reuse` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct ReuseConfig {
    /// New corpus files, processed in order.
    pub inputs: Vec<CorpusInput>,
    /// Prior corpus or records.
    pub prior: PriorSource,
    /// Primary content output.
    pub output: OutputTarget,
    /// Write only new and superseded units to `output`. Otherwise every unit
    /// goes there, provided `output` names a file.
    pub output_new: bool,
    /// Reused (replayed) plus new units.
    pub all_output: Option<OutputTarget>,
    /// Reuse record output.
    pub records: Option<PathBuf>,
    /// Summary table, appended to.
    pub table: Option<PathBuf>,
    /// Fingerprint strategy.
    pub fingerprint: FingerprintSettings,
    /// Topic strategy; lineage tracking is on when set.
    pub lineage: Option<TopicSettings>,
}

/// What the `reuse` content output receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOutput {
    /// Nothing; no output file and no `--new`.
    Off,
    /// New and superseding units.
    NewOnly,
    /// Every unit as emitted: reused units as read, superseding units relinked.
    EveryUnit,
}

impl ReuseConfig {
    /// Content output mode implied by `output_new` and `output`.
    pub fn content_output(&self) -> ContentOutput {
        match (self.output_new, self.output.path.is_some()) {
            (true, _) => ContentOutput::NewOnly,
            (false, true) => ContentOutput::EveryUnit,
            (false, false) => ContentOutput::Off,
        }
    }

    /// Stable hash of the strategy settings.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&(&self.fingerprint, &self.lineage))
    }
}

/// `index-reuse` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReuseConfig {
    /// Inventory record files, processed in order.
    pub inventories: Vec<RecordInput>,
    /// Previously published index chain.
    pub prior_chain: Option<CorpusInput>,
    /// New pages.
    pub output: OutputTarget,
    /// Reused plus new pages.
    pub all_output: Option<OutputTarget>,
    /// Summary table, appended to.
    pub table: Option<PathBuf>,
    /// Minting parameters for new pages.
    pub index: IndexMetadata,
}

impl IndexReuseConfig {
    /// Stable hash of the index metadata.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.index)
    }
}

/// `fingerprint` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintConfig {
    /// Corpus files.
    pub inputs: Vec<CorpusInput>,
    /// Record output; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Fingerprint strategy.
    pub fingerprint: FingerprintSettings,
}

impl FingerprintConfig {
    /// Stable hash of the strategy settings.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.fingerprint)
    }
}

/// `topic` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct TopicConfig {
    /// Corpus files.
    pub inputs: Vec<CorpusInput>,
    /// Output; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Topic strategy.
    pub topic: TopicSettings,
}

impl TopicConfig {
    /// Stable hash of the strategy settings.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.topic)
    }
}
