//! Artifact codes and trusty identities.
//!
//! ## Purpose
//!
//! A trusty URI ends in an *artifact code*: the module prefix `RA` followed by
//! the URL-safe base64 (unpadded) SHA-256 digest of the nanopublication's
//! canonical statement set. This module owns that one algorithm. It is used to
//! verify identities, to fingerprint normalized statement lists, and to mint a
//! fresh identity after content has changed.
//!
//! ## Canonical form
//!
//! ```text
//! artifact_code(S) = "RA" + b64url(SHA256(concat(sort(dedup(canon(s) for s in S)))))
//! canon(s)         = graph "\n" subject "\n" predicate "\n" object "\n"
//! ```
//!
//! IRIs are written verbatim, blank nodes as `_:label`, and literals as
//! `"escaped"@lang` or `"escaped"^^datatype`. Statement order and duplicates
//! never affect the code.
//!
//! ## Self references
//!
//! Before hashing, every occurrence of the unit's own artifact code inside an
//! IRI is replaced by a single space. The code therefore does not depend on
//! itself, and the same content under two identities hashes identically.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::types::{LiteralTag, Nanopub, NanopubError, Statement, Term};
use crate::types::term::escape_literal;

/// Module identifier for RDF graph artifact codes.
pub const MODULE_ID: &str = "RA";

/// Length of a full artifact code, module prefix included.
pub const ARTIFACT_CODE_LEN: usize = 45;

/// Stand-in for the unit's own artifact code while hashing.
pub const SELF_PLACEHOLDER: &str = " ";

fn is_code_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// The artifact code at the end of `iri`, if any.
///
/// # Example
///
/// ```rust
/// use nanopub_reuse::trusty::artifact_code;
///
/// let iri = "http://purl.org/np/RAWruhiSmyzgZhVRs8QY8YQPAgOzTKzJZM2d5FjZu7s7O";
/// assert_eq!(artifact_code(iri).map(str::len), Some(45));
/// assert_eq!(artifact_code("http://example.org/np1"), None);
/// ```
pub fn artifact_code(iri: &str) -> Option<&str> {
    let bytes = iri.as_bytes();
    if bytes.len() < ARTIFACT_CODE_LEN {
        return None;
    }
    let start = bytes.len() - ARTIFACT_CODE_LEN;
    let code = &bytes[start..];
    if !code.starts_with(MODULE_ID.as_bytes()) || !code.iter().copied().all(is_code_byte) {
        return None;
    }
    if start > 0 && is_code_byte(bytes[start - 1]) {
        return None;
    }
    // All trailing bytes are ASCII, so `start` is a char boundary.
    Some(&iri[start..])
}

/// Replace the unit's own artifact code inside every IRI.
pub fn preprocess(statements: &[Statement], code: &str) -> Vec<Statement> {
    let replace = |iri: &str| iri.replace(code, SELF_PLACEHOLDER);
    statements.iter().map(|st| st.map_iris(&replace)).collect()
}

fn canonical_term(term: &Term, out: &mut String) {
    match term {
        Term::Iri(iri) => out.push_str(iri),
        Term::Blank(label) => {
            out.push_str("_:");
            out.push_str(label);
        }
        Term::Literal(lit) => {
            out.push('"');
            out.push_str(&escape_literal(&lit.lexical));
            out.push('"');
            match &lit.tag {
                LiteralTag::Language(tag) => {
                    out.push('@');
                    out.push_str(tag);
                }
                LiteralTag::Datatype(dt) => {
                    out.push_str("^^");
                    out.push_str(dt);
                }
            }
        }
    }
}

/// Canonical text of one statement.
pub fn canonical_statement(statement: &Statement) -> String {
    let mut out = String::new();
    out.push_str(&statement.graph);
    out.push('\n');
    canonical_term(&statement.subject, &mut out);
    out.push('\n');
    out.push_str(&statement.predicate);
    out.push('\n');
    canonical_term(&statement.object, &mut out);
    out.push('\n');
    out
}

/// Compute the artifact code (`RA` + 43 characters) of a statement set.
pub fn make_artifact_code(statements: &[Statement]) -> String {
    let mut lines: Vec<String> = statements.iter().map(canonical_statement).collect();
    lines.sort_unstable();
    lines.dedup();

    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
    }
    format!("{}{}", MODULE_ID, URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

/// Whether the nanopublication's identity matches its content.
pub fn is_trusty(nanopub: &Nanopub) -> bool {
    let Some(code) = artifact_code(nanopub.uri()) else {
        return false;
    };
    let statements: Vec<Statement> = nanopub.statements().map(|(_, st)| st.clone()).collect();
    make_artifact_code(&preprocess(&statements, code)) == code
}

/// Whether `rest`, left after stripping a temporary identity, names the
/// identity itself or something under it rather than a sibling IRI.
fn is_local_suffix(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with(['#', '/', '.'])
}

/// Give `nanopub` a fresh trusty identity reflecting its current content.
///
/// If the identity already carries an artifact code, that code is replaced
/// wherever it appears. Otherwise the identity is treated as a temporary IRI
/// and every IRI starting with it is moved under `base`.
pub fn make_trusty(nanopub: &Nanopub, base: &str) -> Result<Nanopub, NanopubError> {
    let uri = nanopub.uri().to_string();
    let placeholder = match artifact_code(&uri) {
        Some(code) => {
            let code = code.to_string();
            nanopub.map_iris(move |iri| iri.replace(&code, SELF_PLACEHOLDER))?
        }
        None => nanopub.map_iris(|iri| match iri.strip_prefix(uri.as_str()) {
            Some(rest) if is_local_suffix(rest) => format!("{}{}{}", base, SELF_PLACEHOLDER, rest),
            _ => iri.to_string(),
        })?,
    };

    let statements: Vec<Statement> = placeholder.statements().map(|(_, st)| st.clone()).collect();
    let code = make_artifact_code(&statements);
    placeholder.map_iris(|iri| iri.replace(SELF_PLACEHOLDER, &code))
}
