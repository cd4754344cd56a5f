//! Cinevault import pipeline.
//!
//! Ingests media items from a public third-party archive into the managed
//! catalog: candidate discovery, metadata retrieval, best-file selection,
//! streaming transfer into object storage, and an idempotent catalog
//! upsert, reported per item.

pub mod archive;
pub mod catalog;
pub mod error;
pub mod media;
pub mod normalize;
pub mod pipeline;
pub mod selection;
pub mod transfer;

pub use archive::{ArchiveClient, ArchiveFile, ArchiveItem, HttpArchiveClient};
pub use catalog::{CatalogStore, PostgresCatalog};
pub use error::{ImportError, Result};
pub use pipeline::{DEFAULT_PRESET_QUERY, ImportService};
pub use transfer::{S3TransferEngine, StorageSettings, TransferEngine, TransferRequest};
