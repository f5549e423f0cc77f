//! # nanopub-reuse
//!
//! Content-addressed reuse and incremental versioning for nanopublication
//! corpora.
//!
//! When a collection is republished, most nanopublications are unchanged in
//! meaning but differ in noise (timestamps, their own identity). This crate
//! answers, for every new unit:
//!
//! > Is this already published, a new version of something published, or new?
//!
//! ## Core Contract
//!
//! 1. Fingerprint each unit over a normalized view of its statements
//! 2. Reuse the prior identity when the fingerprint is already known
//! 3. Otherwise link to the prior unit with the same topic via `npx:supersedes`
//!    and re-identify the unit
//! 4. For index chains, keep the longest still-valid prefix and page the rest
//!
//! ## Architecture
//!
//! ```text
//! prior corpus/records → CorpusIndex ─┐
//!                                     ↓
//! new corpus → Nanopub → Fingerprinter → ReuseMatcher → outputs + records
//!                          TopicExtractor ↗
//!
//! inventory + prior chain → IndexChainReuser → IndexCreator → index pages
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Fingerprints depend only on normalized statement sets, never on order
//! - Classification depends only on the index and the units seen so far
//! - Strategy settings hash to a stable `params_hash`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod vocab;
pub mod types;
pub mod canonical;
pub mod trusty;
pub mod fingerprint;
pub mod topic;
pub mod store;
pub mod matcher;
pub mod chain;
pub mod io;
pub mod config;
pub mod summary;
pub mod runner;
pub mod error;

// Re-exports
pub use types::{
    IndexNanopub, Literal, LiteralTag, Nanopub, NanopubAssembler, NanopubError, Partition,
    ReuseRecord, Statement, Term, TopicField,
};
pub use trusty::{artifact_code, is_trusty, make_artifact_code, make_trusty};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use fingerprint::{FingerprintError, FingerprintOptions, Fingerprinter, FingerprinterRegistry};
pub use topic::{TopicExtractor, TopicExtractorRegistry, TopicOptions};
pub use store::{CorpusIndex, CorpusIndexBuilder, IndexLoadError, IndexSource, LoadStats, TopicSlot};
pub use matcher::{MatchError, MatchOutcome, MatchStats, ReuseAction, ReuseMatcher};
pub use chain::{
    reuse_chain, ChainError, ChainReuse, ChainReuseResult, ChainStep, IndexChainReuser, IndexCreator,
    IndexMetadata, Inventory,
};
pub use io::{CorpusError, FileFormat, RdfSyntax};
pub use config::{
    ContentOutput, CorpusInput, FingerprintConfig, FingerprintSettings, IndexReuseConfig, OutputTarget, PriorSource,
    RecordInput, ReuseConfig, TopicConfig, TopicSettings,
};
pub use summary::{IndexReuseSummary, ReuseSummary};
pub use runner::{run_fingerprint, run_index_reuse, run_reuse, run_topic};
pub use error::{RunError, UnknownStrategy};
