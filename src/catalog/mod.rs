//! Challenge catalog
//!
//! The catalog is the curated, read-only list of weekly units. Each week
//! carries the topics it practices and the problems to solve.

pub mod model;
pub mod storage;

// Re-exports
pub use model::{Catalog, Week};
pub use storage::CatalogLoadError;
