//! Catalog persistence: one durable row per archive identifier, written
//! through an atomic insert-or-update so re-imports never duplicate rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cinevault_model::{CatalogEntry, NormalizedAsset};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Catalog write port. The returned boolean is true when the call created
/// the row, false when it updated an existing one; this is the sole source
/// of the imported-vs-updated status distinction.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn upsert_movie(
        &self,
        identifier: &str,
        asset: &NormalizedAsset,
        playback_url: &str,
    ) -> Result<(CatalogEntry, bool)>;
}

#[derive(Clone, Debug)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogEntryRow {
    id: Uuid,
    archive_identifier: String,
    title: String,
    description: Option<String>,
    kind: String,
    playback_url: String,
    thumbnail_url: Option<String>,
    year: Option<i32>,
    genre: String,
    rating: String,
    duration_secs: Option<i64>,
    resolution: Option<String>,
    file_size: Option<i64>,
    mime_type: String,
    source_provider: String,
    source_url: String,
    license: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    inserted: bool,
}

impl From<CatalogEntryRow> for CatalogEntry {
    fn from(row: CatalogEntryRow) -> Self {
        CatalogEntry {
            id: row.id,
            archive_identifier: row.archive_identifier,
            title: row.title,
            description: row.description,
            kind: row.kind,
            playback_url: row.playback_url,
            thumbnail_url: row.thumbnail_url,
            year: row.year,
            genre: row.genre,
            rating: row.rating,
            duration_secs: row.duration_secs,
            resolution: row.resolution,
            file_size: row.file_size,
            mime_type: row.mime_type,
            source_provider: row.source_provider,
            source_url: row.source_url,
            license: row.license,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalog {
    async fn upsert_movie(
        &self,
        identifier: &str,
        asset: &NormalizedAsset,
        playback_url: &str,
    ) -> Result<(CatalogEntry, bool)> {
        // `xmax = 0` distinguishes a fresh insert from a conflict update on
        // the returned row.
        let row = sqlx::query_as::<_, CatalogEntryRow>(
            r#"
            INSERT INTO catalog_entries (
                id, archive_identifier, title, description, kind,
                playback_url, thumbnail_url, year, genre, rating,
                duration_secs, resolution, file_size, mime_type,
                source_provider, source_url, license, raw_metadata,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, NOW(), NOW()
            )
            ON CONFLICT (archive_identifier) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                playback_url = EXCLUDED.playback_url,
                thumbnail_url = EXCLUDED.thumbnail_url,
                year = EXCLUDED.year,
                genre = EXCLUDED.genre,
                rating = EXCLUDED.rating,
                duration_secs = EXCLUDED.duration_secs,
                resolution = EXCLUDED.resolution,
                file_size = EXCLUDED.file_size,
                mime_type = EXCLUDED.mime_type,
                source_provider = EXCLUDED.source_provider,
                source_url = EXCLUDED.source_url,
                license = EXCLUDED.license,
                raw_metadata = EXCLUDED.raw_metadata,
                updated_at = NOW()
            RETURNING
                id, archive_identifier, title, description, kind,
                playback_url, thumbnail_url, year, genre, rating,
                duration_secs, resolution, file_size, mime_type,
                source_provider, source_url, license,
                created_at, updated_at,
                (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(identifier)
        .bind(&asset.title)
        .bind(&asset.description)
        .bind(asset.kind.as_str())
        .bind(playback_url)
        .bind(&asset.thumbnail_url)
        .bind(asset.year)
        .bind(&asset.genre)
        .bind(&asset.rating)
        .bind(asset.duration_secs.map(|d| d as i64))
        .bind(&asset.resolution)
        .bind(asset.file_size.map(|s| s as i64))
        .bind(&asset.mime_type)
        .bind(&asset.provenance.provider)
        .bind(&asset.provenance.source_url)
        .bind(&asset.provenance.license)
        .bind(&asset.provenance.raw_metadata)
        .fetch_one(&self.pool)
        .await?;

        let created = row.inserted;
        Ok((row.into(), created))
    }
}
