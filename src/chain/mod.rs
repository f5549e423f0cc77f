//! Index chain reuse.
//!
//! An index is published as a chain of pages, each appending the previous
//! one. When the indexed collection is republished, the longest prefix of the
//! prior chain whose elements are all still present is kept as-is, and only
//! the remaining elements go into new pages.
//!
//! ```text
//! prior:      P1 ← P2 ← P3 ← P4
//! inventory:  all of P1, P2; one element of P3 missing
//! result:     P1 ← P2 ← N1 ← N2      (reuse count 2)
//! ```

pub mod creator;
pub mod reuse;

use crate::types::{IndexShapeError, Nanopub, NanopubError};

pub use creator::{IndexCreator, IndexMetadata, DEFAULT_PAGE_SIZE};
pub use reuse::{ChainReuseResult, ChainStep, IndexChainReuser, Inventory};

/// Error type for index chain processing.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A prior page declares sub-indexes.
    #[error("unsupported chain shape: index {0} has sub-indexes")]
    UnsupportedChainShape(String),

    /// Predecessor pointers do not form a chain from the first page.
    #[error("chain ordering violation: {0}")]
    OrderingViolation(String),

    /// A prior unit is not an index.
    #[error(transparent)]
    Shape(#[from] IndexShapeError),

    /// A new page could not be built.
    #[error(transparent)]
    Nanopub(#[from] NanopubError),
}

/// Outcome of [`reuse_chain`].
#[derive(Debug, Clone)]
pub struct ChainReuse {
    /// Reused prior pages, in chain order.
    pub reusable_chain: Vec<Nanopub>,
    /// Newly minted pages, in chain order.
    pub new_chain_tail: Vec<Nanopub>,
    /// Number of reused pages, empty ones included.
    pub reuse_count: usize,
}

/// Reuse the longest satisfiable prefix of `prior` and page the rest of
/// `inventory` behind it.
pub fn reuse_chain(
    inventory: Inventory,
    prior: impl IntoIterator<Item = Nanopub>,
    metadata: &IndexMetadata,
) -> Result<ChainReuse, ChainError> {
    let mut reuser = IndexChainReuser::new(inventory);
    let mut reusable_chain = Vec::new();
    for nanopub in prior {
        match reuser.offer(nanopub)? {
            ChainStep::Reused(index) | ChainStep::Vacuous(index) => {
                reusable_chain.push(index.into_nanopub());
            }
            ChainStep::Diverged | ChainStep::Ignored => {}
        }
    }
    let (result, inventory) = reuser.finish();

    let mut creator = IndexCreator::new(metadata.clone(), result.last.clone());
    let mut new_chain_tail = Vec::new();
    for element in inventory.remaining() {
        if let Some(page) = creator.add_element(element)? {
            new_chain_tail.push(page);
        }
    }
    if let Some(page) = creator.finish()? {
        new_chain_tail.push(page);
    }

    Ok(ChainReuse {
        reusable_chain,
        new_chain_tail,
        reuse_count: result.reuse_count,
    })
}
