//! Minting index pages.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ChainError;
use crate::trusty::make_trusty;
use crate::types::{Nanopub, Statement, Term};
use crate::vocab::{
    DCT_CREATED, DCT_CREATOR, DCT_DESCRIPTION, DCT_TITLE, DEFAULT_BASE_URI, NPX_APPENDS_INDEX,
    NPX_INCLUDES_ELEMENT, NPX_INCOMPLETE_INDEX, NPX_NANOPUB_INDEX, NP_HAS_ASSERTION,
    NP_HAS_PROVENANCE, NP_HAS_PUBINFO, NP_NANOPUBLICATION, PROV_WAS_ATTRIBUTED_TO, RDFS_SEE_ALSO,
    RDF_TYPE, TEMP_NANOPUB_PREFIX, XSD_DATE_TIME,
};

/// Maximum elements per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Descriptive metadata and minting parameters for new pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Prefix of minted identities.
    pub base_uri: String,
    /// `dct:title` of the complete index.
    pub title: Option<String>,
    /// `dct:description` of the complete index.
    pub description: Option<String>,
    /// Creator IRIs.
    pub creators: Vec<String>,
    /// `rdfs:seeAlso` IRIs.
    pub see_also: Vec<String>,
    /// Maximum elements per page.
    pub page_size: usize,
    /// Fixed creation time; the current time when unset.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for IndexMetadata {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            title: None,
            description: None,
            creators: Vec::new(),
            see_also: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            timestamp: None,
        }
    }
}

/// Pages element identities into a chain of index nanopublications.
///
/// Full pages are emitted as incomplete indexes as soon as another element
/// arrives. [`finish`](Self::finish) emits the complete index carrying the
/// descriptive metadata.
#[derive(Debug)]
pub struct IndexCreator {
    metadata: IndexMetadata,
    previous: Option<String>,
    pending: Vec<String>,
    created_at: DateTime<Utc>,
    pages: usize,
}

impl IndexCreator {
    /// Creator whose first page appends `previous`.
    pub fn new(metadata: IndexMetadata, previous: Option<String>) -> Self {
        let created_at = metadata.timestamp.unwrap_or_else(Utc::now);
        Self {
            metadata,
            previous,
            pending: Vec::new(),
            created_at,
            pages: 0,
        }
    }

    /// Add one element. Returns a page when the current one overflows.
    pub fn add_element(&mut self, element: &str) -> Result<Option<Nanopub>, ChainError> {
        let page = if self.pending.len() >= self.metadata.page_size.max(1) {
            Some(self.emit(false)?)
        } else {
            None
        };
        self.pending.push(element.to_string());
        Ok(page)
    }

    /// Emit the complete index.
    ///
    /// Returns `None` when there is nothing to index and nothing to append.
    pub fn finish(mut self) -> Result<Option<Nanopub>, ChainError> {
        if self.pending.is_empty() && self.previous.is_none() {
            return Ok(None);
        }
        let page = self.emit(true)?;
        info!(uri = page.uri(), pages = self.pages, "index complete");
        Ok(Some(page))
    }

    /// Identity of the most recent page, or the initial predecessor.
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    fn emit(&mut self, complete: bool) -> Result<Nanopub, ChainError> {
        let elements = std::mem::take(&mut self.pending);
        let temp = format!("{}index{}", TEMP_NANOPUB_PREFIX, self.pages);
        let draft = Nanopub::from_statements(self.page_statements(&temp, &elements, complete))?;
        let page = make_trusty(&draft, &self.metadata.base_uri)?;
        self.pages += 1;
        self.previous = Some(page.uri().to_string());
        Ok(page)
    }

    fn page_statements(&self, uri: &str, elements: &[String], complete: bool) -> Vec<Statement> {
        let g = |name: &str| format!("{}#{}", uri, name);
        let (head, assertion, provenance, pubinfo) = (g("Head"), g("assertion"), g("provenance"), g("pubinfo"));
        let me = || Term::iri(uri);

        let mut statements = vec![
            Statement::new(me(), RDF_TYPE, Term::iri(NP_NANOPUBLICATION), &head),
            Statement::new(me(), NP_HAS_ASSERTION, Term::iri(&assertion), &head),
            Statement::new(me(), NP_HAS_PROVENANCE, Term::iri(&provenance), &head),
            Statement::new(me(), NP_HAS_PUBINFO, Term::iri(&pubinfo), &head),
        ];

        for element in elements {
            statements.push(Statement::new(me(), NPX_INCLUDES_ELEMENT, Term::iri(element), &assertion));
        }
        if let Some(previous) = &self.previous {
            statements.push(Statement::new(me(), NPX_APPENDS_INDEX, Term::iri(previous), &assertion));
        }

        if self.metadata.creators.is_empty() {
            statements.push(Statement::new(
                Term::iri(&assertion),
                PROV_WAS_ATTRIBUTED_TO,
                Term::iri(&self.metadata.base_uri),
                &provenance,
            ));
        }
        for creator in &self.metadata.creators {
            statements.push(Statement::new(Term::iri(&assertion), PROV_WAS_ATTRIBUTED_TO, Term::iri(creator), &provenance));
        }

        statements.push(Statement::new(me(), RDF_TYPE, Term::iri(NPX_NANOPUB_INDEX), &pubinfo));
        if !complete {
            statements.push(Statement::new(me(), RDF_TYPE, Term::iri(NPX_INCOMPLETE_INDEX), &pubinfo));
        }
        let created = self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        statements.push(Statement::new(me(), DCT_CREATED, Term::typed(created, XSD_DATE_TIME), &pubinfo));
        for creator in &self.metadata.creators {
            statements.push(Statement::new(me(), DCT_CREATOR, Term::iri(creator), &pubinfo));
        }
        if complete {
            if let Some(title) = &self.metadata.title {
                statements.push(Statement::new(me(), DCT_TITLE, Term::string(title), &pubinfo));
            }
            if let Some(description) = &self.metadata.description {
                statements.push(Statement::new(me(), DCT_DESCRIPTION, Term::string(description), &pubinfo));
            }
            for see_also in &self.metadata.see_also {
                statements.push(Statement::new(me(), RDFS_SEE_ALSO, Term::iri(see_also), &pubinfo));
            }
        }
        statements
    }
}
