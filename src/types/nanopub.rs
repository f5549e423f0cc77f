//! The nanopublication data model.
//!
//! A [`Nanopub`] is built from a flat list of statements. The head graph is
//! located through its `rdf:type np:Nanopublication` statement, and the head
//! then names the assertion, provenance and pubinfo graphs. Every statement
//! must belong to one of these four graphs.
//!
//! [`NanopubAssembler`] groups a stream of statements (as read from a TriG or
//! N-Quads file) into consecutive nanopublications.

use std::collections::BTreeSet;

use super::term::{Statement, Term};
use crate::vocab::{
    NP_HAS_ASSERTION, NP_HAS_PROVENANCE, NP_HAS_PUBINFO, NP_NANOPUBLICATION, RDF_TYPE,
};

/// Error raised when statements do not form a nanopublication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NanopubError {
    /// The statement set is not shaped like a nanopublication.
    #[error("malformed nanopublication: {0}")]
    Malformed(String),
}

fn malformed(reason: impl Into<String>) -> NanopubError {
    NanopubError::Malformed(reason.into())
}

/// The four graphs of a nanopublication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Partition {
    /// Head graph.
    Head,
    /// Assertion graph.
    Assertion,
    /// Provenance graph.
    Provenance,
    /// Publication info graph.
    Pubinfo,
}

impl Partition {
    /// All partitions in serialization order.
    pub const ALL: [Partition; 4] = [
        Partition::Head,
        Partition::Assertion,
        Partition::Provenance,
        Partition::Pubinfo,
    ];
}

/// An immutable nanopublication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nanopub {
    uri: String,
    graphs: [String; 4],
    parts: [Vec<Statement>; 4],
}

impl Nanopub {
    /// Build a nanopublication from its statements.
    pub fn from_statements(statements: Vec<Statement>) -> Result<Self, NanopubError> {
        let (uri, head_graph) = find_head(&statements)?;
        let pointer = |predicate: &str| -> Result<String, NanopubError> {
            let mut found = statements.iter().filter(|st| {
                st.graph == head_graph && st.predicate == predicate && st.has_subject(&uri)
            });
            let first = found
                .next()
                .ok_or_else(|| malformed(format!("{} has no <{}> in its head", uri, predicate)))?;
            if found.next().is_some() {
                return Err(malformed(format!("{} has more than one <{}>", uri, predicate)));
            }
            first
                .object
                .as_iri()
                .map(str::to_string)
                .ok_or_else(|| malformed(format!("{}: <{}> must point to a graph IRI", uri, predicate)))
        };
        let graphs = [
            head_graph.clone(),
            pointer(NP_HAS_ASSERTION)?,
            pointer(NP_HAS_PROVENANCE)?,
            pointer(NP_HAS_PUBINFO)?,
        ];
        let distinct: BTreeSet<&String> = graphs.iter().collect();
        if distinct.len() != graphs.len() {
            return Err(malformed(format!("{}: partitions share a graph", uri)));
        }

        let mut parts: [Vec<Statement>; 4] = Default::default();
        for st in statements {
            let slot = graphs
                .iter()
                .position(|g| *g == st.graph)
                .ok_or_else(|| malformed(format!("{}: statement in foreign graph <{}>", uri, st.graph)))?;
            parts[slot].push(st);
        }
        for partition in [Partition::Assertion, Partition::Provenance, Partition::Pubinfo] {
            if parts[partition as usize].is_empty() {
                return Err(malformed(format!("{}: {:?} graph is empty", uri, partition)));
            }
        }

        Ok(Self { uri, graphs, parts })
    }

    /// The nanopublication's identity.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// IRI of the graph holding `partition`.
    pub fn graph_uri(&self, partition: Partition) -> &str {
        &self.graphs[partition as usize]
    }

    /// Statements of one partition, in input order.
    pub fn partition(&self, partition: Partition) -> &[Statement] {
        &self.parts[partition as usize]
    }

    /// Assertion statements.
    pub fn assertion(&self) -> &[Statement] {
        self.partition(Partition::Assertion)
    }

    /// Provenance statements.
    pub fn provenance(&self) -> &[Statement] {
        self.partition(Partition::Provenance)
    }

    /// Publication info statements.
    pub fn pubinfo(&self) -> &[Statement] {
        self.partition(Partition::Pubinfo)
    }

    /// All statements, partition by partition.
    pub fn statements(&self) -> impl Iterator<Item = (Partition, &Statement)> {
        Partition::ALL
            .into_iter()
            .flat_map(move |p| self.partition(p).iter().map(move |st| (p, st)))
    }

    /// Number of statements over all partitions.
    pub fn len(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    /// Never true for a validated nanopublication.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume into a flat statement list.
    pub fn into_statements(self) -> Vec<Statement> {
        self.parts.into_iter().flatten().collect()
    }

    /// A copy with one more statement in the pubinfo graph.
    pub fn with_pubinfo(&self, subject: Term, predicate: &str, object: Term) -> Nanopub {
        let mut next = self.clone();
        let graph = next.graphs[Partition::Pubinfo as usize].clone();
        next.parts[Partition::Pubinfo as usize].push(Statement::new(subject, predicate, object, graph));
        next
    }

    /// Rebuild with every IRI rewritten by `f`.
    pub fn map_iris(&self, f: impl Fn(&str) -> String) -> Result<Nanopub, NanopubError> {
        let statements = self
            .statements()
            .map(|(_, st)| st.map_iris(&f))
            .collect();
        Nanopub::from_statements(statements)
    }
}

fn find_head(statements: &[Statement]) -> Result<(String, String), NanopubError> {
    let mut heads = statements.iter().filter(|st| {
        st.predicate == RDF_TYPE
            && st.object.is_iri(NP_NANOPUBLICATION)
            && statements.iter().any(|other| {
                other.graph == st.graph
                    && other.predicate == NP_HAS_ASSERTION
                    && other.subject == st.subject
            })
    });
    let head = heads
        .next()
        .ok_or_else(|| malformed("no head graph declaring np:Nanopublication"))?;
    if heads.next().is_some() {
        return Err(malformed("more than one head graph"));
    }
    let uri = head
        .subject
        .as_iri()
        .ok_or_else(|| malformed("nanopublication identity must be an IRI"))?;
    Ok((uri.to_string(), head.graph.clone()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Groups a statement stream into nanopublications.
///
/// A unit is closed once its head has named all three content graphs and a
/// statement arrives in a graph outside the four known ones. Only pointers
/// whose subject is the `np:Nanopublication` in the head graph count; the
/// same predicates used elsewhere are plain content.
#[derive(Debug, Default)]
pub struct NanopubAssembler {
    pending: Vec<Statement>,
    identity: Option<String>,
    deferred: Vec<Statement>,
    head: Option<String>,
    assertion: Option<String>,
    provenance: Option<String>,
    pubinfo: Option<String>,
}

impl NanopubAssembler {
    /// New, empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one statement. Returns the previous nanopublication when this
    /// statement starts a new one.
    pub fn push(&mut self, statement: Statement) -> Result<Option<Nanopub>, NanopubError> {
        let finished = if self.closes_current(&statement) {
            self.take()?
        } else {
            None
        };
        self.observe(&statement);
        self.pending.push(statement);
        Ok(finished)
    }

    /// Flush the last nanopublication at end of input.
    pub fn finish(&mut self) -> Result<Option<Nanopub>, NanopubError> {
        self.take()
    }

    fn closes_current(&self, statement: &Statement) -> bool {
        let known = [&self.head, &self.assertion, &self.provenance, &self.pubinfo];
        known.iter().all(|g| g.is_some())
            && !known.iter().any(|g| g.as_deref() == Some(statement.graph.as_str()))
    }

    fn observe(&mut self, statement: &Statement) {
        if statement.predicate == RDF_TYPE && statement.object.is_iri(NP_NANOPUBLICATION) {
            let uri = statement.subject.as_iri().filter(|_| self.identity.is_none());
            if let Some(uri) = uri {
                self.identity = Some(uri.to_string());
                self.head = Some(statement.graph.clone());
                for pointer in std::mem::take(&mut self.deferred) {
                    self.point(&pointer);
                }
            }
            return;
        }
        if !matches!(statement.predicate.as_str(), NP_HAS_ASSERTION | NP_HAS_PROVENANCE | NP_HAS_PUBINFO) {
            return;
        }
        if self.identity.is_some() {
            self.point(statement);
        } else {
            // Pointers may precede the type statement.
            self.deferred.push(statement.clone());
        }
    }

    fn point(&mut self, statement: &Statement) {
        let (Some(identity), Some(head)) = (&self.identity, &self.head) else {
            return;
        };
        if !statement.subject.is_iri(identity) || statement.graph != *head {
            return;
        }
        let slot = match statement.predicate.as_str() {
            NP_HAS_ASSERTION => &mut self.assertion,
            NP_HAS_PROVENANCE => &mut self.provenance,
            NP_HAS_PUBINFO => &mut self.pubinfo,
            _ => return,
        };
        if let Some(graph) = statement.object.as_iri() {
            *slot = Some(graph.to_string());
        }
    }

    fn take(&mut self) -> Result<Option<Nanopub>, NanopubError> {
        let statements = std::mem::take(&mut self.pending);
        *self = Self::default();
        if statements.is_empty() {
            return Ok(None);
        }
        Nanopub::from_statements(statements).map(Some)
    }
}
