//! Typed view of index nanopublications.

use super::nanopub::Nanopub;
use crate::vocab::{
    NPX_APPENDS_INDEX, NPX_INCLUDES_ELEMENT, NPX_INCLUDES_SUBINDEX, NPX_INCOMPLETE_INDEX,
    NPX_NANOPUB_INDEX, RDF_TYPE,
};

/// Error raised when a nanopublication cannot be read as an index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexShapeError {
    /// Pubinfo does not type the nanopublication as `npx:NanopubIndex`.
    #[error("not an index nanopublication: {0}")]
    NotAnIndex(String),
    /// More than one `npx:appendsIndex`.
    #[error("index {0} appends more than one index")]
    MultipleAppends(String),
}

/// An index nanopublication with its elements, sub-indexes and predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexNanopub {
    nanopub: Nanopub,
    elements: Vec<String>,
    subindexes: Vec<String>,
    appended: Option<String>,
    incomplete: bool,
}

impl IndexNanopub {
    /// Read `nanopub` as an index.
    pub fn from_nanopub(nanopub: Nanopub) -> Result<Self, IndexShapeError> {
        let uri = nanopub.uri().to_string();
        let typed = |class: &str| {
            nanopub
                .pubinfo()
                .iter()
                .any(|st| st.has_subject(&uri) && st.predicate == RDF_TYPE && st.object.is_iri(class))
        };
        if !typed(NPX_NANOPUB_INDEX) {
            return Err(IndexShapeError::NotAnIndex(uri));
        }
        let incomplete = typed(NPX_INCOMPLETE_INDEX);

        let objects = |predicate: &str| -> Vec<String> {
            nanopub
                .assertion()
                .iter()
                .filter(|st| st.has_subject(&uri) && st.predicate == predicate)
                .filter_map(|st| st.object.as_iri().map(str::to_string))
                .collect()
        };
        let elements = objects(NPX_INCLUDES_ELEMENT);
        let subindexes = objects(NPX_INCLUDES_SUBINDEX);
        let mut appends = objects(NPX_APPENDS_INDEX);
        if appends.len() > 1 {
            return Err(IndexShapeError::MultipleAppends(uri));
        }
        let appended = appends.pop();

        Ok(Self {
            nanopub,
            elements,
            subindexes,
            appended,
            incomplete,
        })
    }

    /// Identity of the index.
    pub fn uri(&self) -> &str {
        self.nanopub.uri()
    }

    /// Element identities, in assertion order.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Sub-index identities.
    pub fn subindexes(&self) -> &[String] {
        &self.subindexes
    }

    /// The index this one appends to.
    pub fn appended_index(&self) -> Option<&str> {
        self.appended.as_deref()
    }

    /// Whether this page is typed `npx:IncompleteIndex`.
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    /// The underlying nanopublication.
    pub fn nanopub(&self) -> &Nanopub {
        &self.nanopub
    }

    /// Consume into the underlying nanopublication.
    pub fn into_nanopub(self) -> Nanopub {
        self.nanopub
    }
}
