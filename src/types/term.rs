//! RDF terms and statements.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::{RDF_LANG_STRING, XSD_STRING};

/// Datatype or language tag of a literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiteralTag {
    /// Typed literal (`xsd:string` for plain literals).
    Datatype(String),
    /// Language-tagged literal, tag stored lowercase.
    Language(String),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form.
    pub lexical: String,
    /// Datatype or language.
    pub tag: LiteralTag,
}

impl Literal {
    /// Datatype IRI of this literal (`rdf:langString` for tagged ones).
    pub fn datatype(&self) -> &str {
        match &self.tag {
            LiteralTag::Datatype(dt) => dt,
            LiteralTag::Language(_) => RDF_LANG_STRING,
        }
    }
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Absolute IRI.
    Iri(String),
    /// Blank node, identified by its label.
    Blank(String),
    /// Literal value.
    Literal(Literal),
}

impl Term {
    /// IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Plain string literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Self::typed(lexical, XSD_STRING)
    }

    /// Typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            tag: LiteralTag::Datatype(datatype.into()),
        })
    }

    /// Language-tagged literal.
    pub fn lang(lexical: impl Into<String>, tag: &str) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            tag: LiteralTag::Language(tag.to_ascii_lowercase()),
        })
    }

    /// The IRI, if this term is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Whether this term is exactly the IRI `iri`.
    pub fn is_iri(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }

    /// String value: the IRI, blank label or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal(lit) => &lit.lexical,
        }
    }

    /// Apply `f` to the term if it is an IRI; other terms are cloned.
    pub fn map_iri(&self, f: impl Fn(&str) -> String) -> Term {
        match self {
            Term::Iri(iri) => Term::Iri(f(iri)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Term {
    /// N-Quads form of the term.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_literal(&lit.lexical))?;
                match &lit.tag {
                    LiteralTag::Language(tag) => write!(f, "@{}", tag),
                    LiteralTag::Datatype(dt) if dt == XSD_STRING => Ok(()),
                    LiteralTag::Datatype(dt) => write!(f, "^^<{}>", dt),
                }
            }
        }
    }
}

/// Escape a literal's lexical form for N-Quads / TriG output.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// A quad: subject, predicate, object and the named graph it sits in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// Subject (IRI or blank node).
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
    /// Graph IRI.
    pub graph: String,
}

impl Statement {
    /// Build a statement.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term, graph: impl Into<String>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
            graph: graph.into(),
        }
    }

    /// Whether the subject is the IRI `iri`.
    pub fn has_subject(&self, iri: &str) -> bool {
        self.subject.is_iri(iri)
    }

    /// Rewrite every IRI position (subject, predicate, object, graph) with `f`.
    pub fn map_iris(&self, f: &impl Fn(&str) -> String) -> Statement {
        Statement {
            subject: self.subject.map_iri(f),
            predicate: f(&self.predicate),
            object: self.object.map_iri(f),
            graph: f(&self.graph),
        }
    }
}

impl fmt::Display for Statement {
    /// One N-Quads line, without the trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} <{}> .",
            self.subject, self.predicate, self.object, self.graph
        )
    }
}
