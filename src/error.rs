//! Crate-level errors.
//!
//! Module errors stay in their modules. This file holds what crosses module
//! boundaries: unknown strategy names and the per-file wrapper used by the
//! runners, which tags any failure with the input it happened in.

use std::path::PathBuf;

use crate::chain::ChainError;
use crate::fingerprint::FingerprintError;
use crate::io::CorpusError;
use crate::matcher::MatchError;
use crate::store::IndexLoadError;

/// A strategy name that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{name}' (available: {})", available.join(", "))]
pub struct UnknownStrategy {
    /// Strategy family.
    pub kind: &'static str,
    /// Requested name.
    pub name: String,
    /// Registered names.
    pub available: Vec<&'static str>,
}

impl UnknownStrategy {
    /// Build the error.
    pub fn new(kind: &'static str, name: &str, available: Vec<&'static str>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            available,
        }
    }
}

/// Any failure inside a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Failure while processing a specific file.
    #[error("{}: {source}", path.display())]
    InFile {
        /// Offending input or output file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<RunError>,
    },
    /// Reading or writing statements.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    /// Fingerprinting.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    /// Loading the Corpus Index.
    #[error(transparent)]
    IndexLoad(#[from] IndexLoadError),
    /// Matching.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Index chain reuse.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Bad configuration.
    #[error(transparent)]
    Strategy(#[from] UnknownStrategy),
}

impl RunError {
    /// Tag this error with the file it happened in.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            already @ RunError::InFile { .. } => already,
            other => RunError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Extension for tagging results with their file.
pub trait InFile<T> {
    /// Map the error into [`RunError::InFile`].
    fn in_file(self, path: impl Into<PathBuf>) -> Result<T, RunError>;
}

impl<T, E: Into<RunError>> InFile<T> for Result<T, E> {
    fn in_file(self, path: impl Into<PathBuf>) -> Result<T, RunError> {
        self.map_err(|e| e.into().in_file(path))
    }
}
