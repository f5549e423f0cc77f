//! Compact reuse records.
//!
//! One line per processed nanopublication:
//!
//! ```text
//! <identity> <fingerprint> [<topic>]
//! ```
//!
//! The topic column, when present, is the rest of the line after the second
//! column. An undefined topic is written as `null`.

use std::fmt;

/// Token standing for an undefined topic.
pub const UNDEFINED_TOPIC: &str = "null";

/// Error raised while reading a record line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The line does not carry an identity and a fingerprint.
    #[error("malformed record at line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What is wrong.
        reason: String,
    },
}

/// Topic column of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicField {
    /// No topic column (lineage tracking was off).
    Omitted,
    /// Column present, topic undefined.
    Undefined,
    /// Column present with a topic.
    Defined(String),
}

impl TopicField {
    /// Field for an extracted topic.
    pub fn from_topic(topic: Option<String>) -> Self {
        match topic {
            Some(t) => TopicField::Defined(t),
            None => TopicField::Undefined,
        }
    }

    /// The topic, if defined.
    pub fn as_defined(&self) -> Option<&str> {
        match self {
            TopicField::Defined(t) => Some(t),
            _ => None,
        }
    }
}

/// One line of a reuse record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReuseRecord {
    /// Current identity of the unit.
    pub identity: String,
    /// Fingerprint (artifact code without its `RA` prefix).
    pub fingerprint: String,
    /// Topic column.
    pub topic: TopicField,
}

impl ReuseRecord {
    /// Record without a topic column.
    pub fn new(identity: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            fingerprint: fingerprint.into(),
            topic: TopicField::Omitted,
        }
    }

    /// Attach a topic column.
    pub fn with_topic(mut self, topic: TopicField) -> Self {
        self.topic = topic;
        self
    }

    /// Parse one line. Blank lines yield `None`.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Self>, RecordError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (identity, rest) = split_column(line);
        let (fingerprint, topic) = split_column(rest);
        if fingerprint.is_empty() {
            return Err(RecordError::Malformed {
                line: line_no,
                reason: format!("expected '<identity> <fingerprint>', got '{}'", line),
            });
        }
        let topic = match topic {
            "" => TopicField::Omitted,
            UNDEFINED_TOPIC => TopicField::Undefined,
            t => TopicField::Defined(t.to_string()),
        };
        Ok(Some(Self {
            identity: identity.to_string(),
            fingerprint: fingerprint.to_string(),
            topic,
        }))
    }
}

fn split_column(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

impl fmt::Display for ReuseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.identity, self.fingerprint)?;
        match &self.topic {
            TopicField::Omitted => Ok(()),
            TopicField::Undefined => write!(f, " {}", UNDEFINED_TOPIC),
            // Keep the record one line per unit.
            TopicField::Defined(t) => write!(f, " {}", t.replace(['\n', '\r'], " ")),
        }
    }
}
