//! Clients for the source archive's search and metadata services.

pub mod client;
pub mod types;

pub use client::{ArchiveClient, HttpArchiveClient};
pub use types::{ArchiveFile, ArchiveItem};
