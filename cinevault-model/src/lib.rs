//! Core data model definitions shared across Cinevault crates.
#![allow(missing_docs)]

pub mod asset;
pub mod catalog;
pub mod report;
pub mod request;

// Intentionally curated re-exports for downstream consumers.
pub use asset::{AssetKind, NormalizedAsset, Provenance};
pub use catalog::CatalogEntry;
pub use report::{ImportReport, ImportResult, ImportStatus, ImportSummary};
pub use request::{ImportItem, ImportRequest};
