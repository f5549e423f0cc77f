//! Streaming corpus reader.

use std::io::BufRead;

use sophia_api::quad::Quad;
use sophia_api::source::{QuadSource, StreamError};
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_turtle::parser::{nq, trig};

use super::{CorpusError, RdfSyntax};
use crate::types::{Nanopub, NanopubAssembler, NanopubError, Statement, Term};

/// Read nanopublications from `reader` one at a time, handing each to `handle`.
///
/// Stops at the first error, whether from parsing, assembly or `handle`.
pub fn for_each_nanopub<R, E, F>(reader: R, syntax: RdfSyntax, handle: F) -> Result<usize, E>
where
    R: BufRead,
    E: std::error::Error + From<CorpusError> + Send + Sync + 'static,
    F: FnMut(Nanopub) -> Result<(), E>,
{
    match syntax {
        RdfSyntax::NQuads => drive(nq::parse_bufread(reader), handle),
        RdfSyntax::TriG => drive(trig::parse_bufread(reader), handle),
    }
}

/// Read a whole source into memory.
pub fn read_nanopubs<R: BufRead>(reader: R, syntax: RdfSyntax) -> Result<Vec<Nanopub>, CorpusError> {
    let mut out = Vec::new();
    for_each_nanopub(reader, syntax, |np| -> Result<(), CorpusError> {
        out.push(np);
        Ok(())
    })?;
    Ok(out)
}

fn drive<S, E, F>(mut source: S, mut handle: F) -> Result<usize, E>
where
    S: QuadSource,
    E: std::error::Error + From<CorpusError> + Send + Sync + 'static,
    F: FnMut(Nanopub) -> Result<(), E>,
{
    let mut assembler = NanopubAssembler::new();
    let mut count = 0;
    let walked = source.try_for_each_quad(|quad| -> Result<(), E> {
        let statement = statement_from_quad(&quad)?;
        if let Some(np) = assembler.push(statement).map_err(CorpusError::from)? {
            count += 1;
            handle(np)?;
        }
        Ok(())
    });
    match walked {
        Ok(()) => {}
        Err(StreamError::SourceError(e)) => return Err(CorpusError::Parse(e.to_string()).into()),
        Err(StreamError::SinkError(e)) => return Err(e),
    }
    if let Some(np) = assembler.finish().map_err(CorpusError::from)? {
        count += 1;
        handle(np)?;
    }
    Ok(count)
}

fn statement_from_quad<Q: Quad>(quad: &Q) -> Result<Statement, CorpusError> {
    let graph = match quad.g() {
        Some(g) => g.iri().map(|iri| iri.as_str().to_string()),
        None => None,
    }
    .ok_or_else(|| {
        NanopubError::Malformed("statement outside a named graph".to_string())
    })?;
    let predicate = quad
        .p()
        .iri()
        .map(|iri| iri.as_str().to_string())
        .ok_or(CorpusError::UnsupportedTerm("predicate"))?;
    Ok(Statement::new(
        convert_term(quad.s(), "subject")?,
        predicate,
        convert_term(quad.o(), "object")?,
        graph,
    ))
}

fn convert_term<T: SophiaTerm>(term: T, position: &'static str) -> Result<Term, CorpusError> {
    let converted = match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Term::iri(iri.as_str())),
        TermKind::BlankNode => term.bnode_id().map(|id| Term::Blank(id.as_str().to_string())),
        TermKind::Literal => term.lexical_form().and_then(|lex| {
            if let Some(tag) = term.language_tag() {
                Some(Term::lang(&*lex, tag.as_str()))
            } else {
                term.datatype().map(|dt| Term::typed(&*lex, dt.as_str()))
            }
        }),
        _ => None,
    };
    converted.ok_or(CorpusError::UnsupportedTerm(position))
}
