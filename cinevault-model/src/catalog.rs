use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One durable catalog row, keyed by archive identifier.
///
/// Created on the first successful import of an identifier; later imports
/// of the same identifier update the mutable fields in place. Rows are
/// never deleted by the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub archive_identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub playback_url: String,
    pub thumbnail_url: Option<String>,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: String,
    pub duration_secs: Option<i64>,
    pub resolution: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: String,
    pub source_provider: String,
    pub source_url: String,
    pub license: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
