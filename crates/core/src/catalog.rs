//! Port to the content catalog.
//!
//! Watch parties only need two facts from the catalog: whether a content
//! reference exists, and what to call it. Implementations live outside
//! `core` (see `watchparty_db::catalog::SqlCatalog`).

use async_trait::async_trait;

use crate::error::CoreError;
use crate::watch_party::ContentRef;

/// What the catalog knows about a resolvable content reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Human-readable title, e.g. `"Show - S01E03 - Pilot"`.
    pub title: String,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve a content reference. `Ok(None)` means the content does not
    /// exist; `Err` is reserved for the catalog itself failing.
    async fn resolve(&self, content: &ContentRef) -> Result<Option<CatalogEntry>, CoreError>;
}
