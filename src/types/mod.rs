//! Core types for nanopublication processing.

pub mod term;
pub mod nanopub;
pub mod record;
pub mod index;

pub use term::{Literal, LiteralTag, Statement, Term};
pub use nanopub::{Nanopub, NanopubAssembler, NanopubError, Partition};
pub use record::{RecordError, ReuseRecord, TopicField, UNDEFINED_TOPIC};
pub use index::{IndexNanopub, IndexShapeError};
