//! Corpus and record I/O.
//!
//! File formats are resolved once from an explicit override or the file
//! name. Reading streams quads through sophia into a
//! [`NanopubAssembler`](crate::types::NanopubAssembler); writing emits one
//! nanopublication at a time. A `.gz` suffix means gzip on both sides.

pub mod reader;
pub mod records;
pub mod writer;

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::types::{NanopubError, RecordError};

/// Error type for reading and writing corpora and records.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The RDF parser rejected the input.
    #[error("syntax error: {0}")]
    Parse(String),

    /// Statements do not form nanopublications.
    #[error(transparent)]
    Nanopub(#[from] NanopubError),

    /// Bad record line.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Unknown format name or extension.
    #[error("unsupported format '{0}' (expected trig, nq, trig.gz or nq.gz)")]
    UnsupportedFormat(String),

    /// A term sophia produced that has no place in a nanopublication.
    #[error("unsupported {0} term")]
    UnsupportedTerm(&'static str),
}

/// Statement-graph syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfSyntax {
    /// TriG.
    TriG,
    /// N-Quads.
    NQuads,
}

/// Syntax plus compression of a corpus file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFormat {
    /// Syntax.
    pub syntax: RdfSyntax,
    /// Gzip-wrapped.
    pub gzip: bool,
}

impl FileFormat {
    /// Plain TriG, the default for standard output.
    pub const TRIG: FileFormat = FileFormat {
        syntax: RdfSyntax::TriG,
        gzip: false,
    };

    /// Parse a format name: `trig`, `nq`, `trig.gz`, `nq.gz`.
    pub fn parse(name: &str) -> Result<Self, CorpusError> {
        let lower = name.to_ascii_lowercase();
        let (base, gzip) = match lower.strip_suffix(".gz") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };
        let syntax = match base {
            "trig" => RdfSyntax::TriG,
            "nq" | "nquads" => RdfSyntax::NQuads,
            _ => return Err(CorpusError::UnsupportedFormat(name.to_string())),
        };
        Ok(Self { syntax, gzip })
    }

    /// Format implied by a file name.
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let name = file_name(path);
        let lower = name.to_ascii_lowercase();
        let (stem, gzip) = match lower.strip_suffix(".gz") {
            Some(stem) => (stem, true),
            None => (lower.as_str(), false),
        };
        let syntax = if stem.ends_with(".trig") {
            RdfSyntax::TriG
        } else if stem.ends_with(".nq") {
            RdfSyntax::NQuads
        } else {
            return Err(CorpusError::UnsupportedFormat(name));
        };
        Ok(Self { syntax, gzip })
    }

    /// Explicit override if given, else the file name.
    pub fn resolve(path: &Path, override_name: Option<&str>) -> Result<Self, CorpusError> {
        match override_name {
            Some(name) => Self::parse(name),
            None => Self::from_path(path),
        }
    }

    /// Output format: override, else file name, else plain TriG.
    pub fn resolve_output(path: Option<&Path>, override_name: Option<&str>) -> Result<Self, CorpusError> {
        match (path, override_name) {
            (_, Some(name)) => Self::parse(name),
            (Some(path), None) => Self::from_path(path),
            (None, None) => Ok(Self::TRIG),
        }
    }
}

/// Whether `path` names a record file (`.txt` or `.txt.gz`).
pub fn is_record_path(path: &Path) -> bool {
    let name = file_name(path).to_ascii_lowercase();
    name.ends_with(".txt") || name.ends_with(".txt.gz")
}

/// Whether `path` ends in `.gz`.
pub fn is_gzip_path(path: &Path) -> bool {
    file_name(path).to_ascii_lowercase().ends_with(".gz")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Open a file for buffered reading, gunzipping when asked.
pub fn open_input(path: &Path, gzip: bool) -> Result<Box<dyn BufRead>, CorpusError> {
    let file = File::open(path)?;
    if gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Destination of written output.
pub enum OutputSink {
    /// Standard output.
    Stdout(BufWriter<io::Stdout>),
    /// Plain file.
    File(BufWriter<File>),
    /// Gzip-compressed file (one member per opening).
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Open a sink. `None` means standard output.
    ///
    /// With `append`, an existing file is extended rather than truncated.
    pub fn open(path: Option<&Path>, gzip: bool, append: bool) -> Result<Self, CorpusError> {
        let Some(path) = path else {
            return Ok(OutputSink::Stdout(BufWriter::new(io::stdout())));
        };
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = BufWriter::new(options.open(path)?);
        if gzip {
            Ok(OutputSink::Gzip(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(OutputSink::File(file))
        }
    }

    /// Flush and close, completing the gzip member if any.
    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(mut w) => w.flush(),
            OutputSink::File(mut w) => w.flush(),
            OutputSink::Gzip(w) => w.finish()?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout(w) => w.write(buf),
            OutputSink::File(w) => w.write(buf),
            OutputSink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout(w) => w.flush(),
            OutputSink::File(w) => w.flush(),
            OutputSink::Gzip(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        let f = FileFormat::from_path(Path::new("/data/corpus.trig.gz")).unwrap();
        assert_eq!(f, FileFormat { syntax: RdfSyntax::TriG, gzip: true });

        let f = FileFormat::from_path(Path::new("corpus.NQ")).unwrap();
        assert_eq!(f, FileFormat { syntax: RdfSyntax::NQuads, gzip: false });

        assert!(matches!(
            FileFormat::from_path(Path::new("corpus.ttl")),
            Err(CorpusError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_override_wins() {
        let f = FileFormat::resolve(Path::new("corpus.trig"), Some("nq.gz")).unwrap();
        assert_eq!(f, FileFormat { syntax: RdfSyntax::NQuads, gzip: true });
        assert!(FileFormat::parse("jsonld").is_err());
        assert_eq!(FileFormat::resolve_output(None, None).unwrap(), FileFormat::TRIG);
    }

    #[test]
    fn test_record_paths() {
        assert!(is_record_path(&PathBuf::from("prior.txt")));
        assert!(is_record_path(&PathBuf::from("prior.TXT.gz")));
        assert!(!is_record_path(&PathBuf::from("prior.trig")));
    }

    #[test]
    fn test_gzip_append_is_readable_as_one_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");

        let mut first = OutputSink::open(Some(&path), true, false).unwrap();
        first.write_all(b"one\n").unwrap();
        first.finish().unwrap();

        let mut second = OutputSink::open(Some(&path), true, true).unwrap();
        second.write_all(b"two\n").unwrap();
        second.finish().unwrap();

        let mut text = String::new();
        open_input(&path, true).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }
}
