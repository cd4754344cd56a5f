//! Batch orchestrator: resolves the work list, runs each identifier
//! through the full pipeline sequentially, isolates per-item failures, and
//! aggregates the batch report.

use std::sync::Arc;

use cinevault_model::{
    ImportItem, ImportReport, ImportRequest, ImportResult, ImportStatus, ImportSummary,
};
use tracing::{info, warn};

use crate::archive::{ArchiveClient, ArchiveItem};
use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::normalize::{exclusion_for, first_meta_value, normalize_asset};
use crate::selection::select_with_preference;
use crate::transfer::{TransferEngine, TransferRequest, storage_key};

/// Search query used when a request names neither items nor identifiers
/// and carries no preset of its own.
pub const DEFAULT_PRESET_QUERY: &str =
    "collection:(feature_films) AND mediatype:(movies) AND format:(MPEG4)";

/// Search-derived batch size when the request does not set one.
const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// The import pipeline, wired once at startup with its three ports.
pub struct ImportService {
    archive: Arc<dyn ArchiveClient>,
    transfer: Arc<dyn TransferEngine>,
    catalog: Arc<dyn CatalogStore>,
    storage_prefix: String,
    preset_query: String,
}

impl std::fmt::Debug for ImportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportService")
            .field("storage_prefix", &self.storage_prefix)
            .field("preset_query", &self.preset_query)
            .finish_non_exhaustive()
    }
}

impl ImportService {
    pub fn new(
        archive: Arc<dyn ArchiveClient>,
        transfer: Arc<dyn TransferEngine>,
        catalog: Arc<dyn CatalogStore>,
        storage_prefix: impl Into<String>,
        preset_query: Option<String>,
    ) -> Self {
        Self {
            archive,
            transfer,
            catalog,
            storage_prefix: storage_prefix.into(),
            preset_query: preset_query.unwrap_or_else(|| DEFAULT_PRESET_QUERY.to_string()),
        }
    }

    /// Run one batch to completion. Only request-level failures (an upstream
    /// search error) propagate; per-item failures land in the report.
    pub async fn run(&self, request: &ImportRequest) -> Result<ImportReport> {
        let items = self.resolve_work_list(request).await?;
        let mut summary = ImportSummary {
            requested: items.len(),
            ..Default::default()
        };
        let mut results = Vec::with_capacity(items.len());

        // Strictly sequential: one item fully through the pipeline before
        // the next begins, bounding load on the archive and on outbound
        // transfers.
        for item in &items {
            let result = self
                .process_one(item, request.allow_mkv, request.dry_run)
                .await;
            summary.record(result.status);
            results.push(result);
        }

        info!(
            requested = summary.requested,
            imported = summary.imported,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            dry_run = request.dry_run,
            "import batch finished"
        );
        Ok(ImportReport { summary, results })
    }

    /// Work-list priority: explicit items, then bare identifiers, then a
    /// search on the preset query.
    async fn resolve_work_list(&self, request: &ImportRequest) -> Result<Vec<ImportItem>> {
        if let Some(items) = &request.items
            && !items.is_empty()
        {
            return Ok(items.clone());
        }

        if let Some(identifiers) = &request.identifiers
            && !identifiers.is_empty()
        {
            return Ok(identifiers
                .iter()
                .map(|identifier| ImportItem {
                    identifier: identifier.clone(),
                    file_name: None,
                })
                .collect());
        }

        let query = request
            .preset_query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(&self.preset_query);
        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, 50);

        let identifiers = self.archive.search(query, limit).await?;
        Ok(identifiers
            .into_iter()
            .map(|identifier| ImportItem {
                identifier,
                file_name: None,
            })
            .collect())
    }

    /// Never fails across its own boundary: any error inside the item's
    /// pipeline becomes that item's `failed` result.
    async fn process_one(&self, item: &ImportItem, allow_mkv: bool, dry_run: bool) -> ImportResult {
        match self.import_item(item, allow_mkv, dry_run).await {
            Ok(result) => result,
            Err(e) => {
                warn!(identifier = %item.identifier, "import failed: {e}");
                ImportResult::failed(&item.identifier, e.to_string())
            }
        }
    }

    async fn import_item(
        &self,
        item: &ImportItem,
        allow_mkv: bool,
        dry_run: bool,
    ) -> Result<ImportResult> {
        let identifier = &item.identifier;
        let ArchiveItem { metadata, files } = self.archive.fetch_item(identifier).await?;
        let source_url = self.archive.details_url(identifier);

        let Some(file) = select_with_preference(&files, item.file_name.as_deref(), allow_mkv)
        else {
            return Ok(ImportResult {
                identifier: identifier.clone(),
                title: Some(
                    first_meta_value(&metadata, &["title"]).unwrap_or_else(|| identifier.clone()),
                ),
                file_name: None,
                public_url: None,
                file_size: None,
                duration_secs: None,
                source_url: Some(source_url),
                status: ImportStatus::Skipped,
                reason: Some("no playable file found".to_string()),
            });
        };

        let asset = normalize_asset(
            identifier,
            &metadata,
            file,
            source_url.clone(),
            self.archive.thumbnail_url(identifier),
        );

        let mut result = ImportResult {
            identifier: identifier.clone(),
            title: Some(asset.title.clone()),
            file_name: Some(file.name.clone()),
            public_url: None,
            file_size: asset.file_size,
            duration_secs: asset.duration_secs,
            source_url: Some(source_url),
            status: ImportStatus::Ready,
            reason: None,
        };

        // Policy rejections never reach the transfer engine or the catalog.
        if let Some(skip) = exclusion_for(&asset, &file.name) {
            result.status = ImportStatus::Skipped;
            result.reason = Some(skip.message());
            return Ok(result);
        }

        if dry_run {
            return Ok(result);
        }

        let key = storage_key(&self.storage_prefix, identifier, &file.name);
        let public_url = self
            .transfer
            .transfer(TransferRequest {
                source_url: self.archive.download_url(identifier, &file.name),
                key,
                declared_mime: file.mime.clone(),
            })
            .await?;

        let (entry, created) = self
            .catalog
            .upsert_movie(identifier, &asset, &public_url)
            .await?;

        info!(
            identifier = %identifier,
            title = %entry.title,
            created,
            "catalog upsert complete"
        );

        result.public_url = Some(entry.playback_url);
        result.status = if created {
            ImportStatus::Imported
        } else {
            ImportStatus::Updated
        };
        Ok(result)
    }
}
