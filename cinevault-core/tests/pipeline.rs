//! Batch orchestrator behaviour over mocked ports: work-list resolution,
//! per-item failure isolation, exclusion handling, dry-run, and the
//! imported/updated distinction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use cinevault_core::archive::{ArchiveClient, ArchiveFile, ArchiveItem};
use cinevault_core::catalog::CatalogStore;
use cinevault_core::error::{ImportError, Result};
use cinevault_core::pipeline::ImportService;
use cinevault_core::transfer::{TransferEngine, TransferRequest};
use cinevault_model::{CatalogEntry, ImportItem, ImportRequest, ImportStatus, NormalizedAsset};
use mockall::mock;
use mockall::predicate::eq;
use serde_json::json;
use uuid::Uuid;

mock! {
    Archive {}

    #[async_trait]
    impl ArchiveClient for Archive {
        async fn search(&self, query: &str, count: u32) -> Result<Vec<String>>;
        async fn fetch_item(&self, identifier: &str) -> Result<ArchiveItem>;
        fn download_url(&self, identifier: &str, file_name: &str) -> String;
        fn details_url(&self, identifier: &str) -> String;
        fn thumbnail_url(&self, identifier: &str) -> String;
    }
}

mock! {
    Transfer {}

    #[async_trait]
    impl TransferEngine for Transfer {
        async fn transfer(&self, request: TransferRequest) -> Result<String>;
    }
}

mock! {
    Catalog {}

    #[async_trait]
    impl CatalogStore for Catalog {
        async fn upsert_movie(
            &self,
            identifier: &str,
            asset: &NormalizedAsset,
            playback_url: &str,
        ) -> Result<(CatalogEntry, bool)>;
    }
}

fn mp4_720p(name: &str) -> ArchiveFile {
    ArchiveFile {
        name: name.to_string(),
        format: Some("h.264 MPEG4".to_string()),
        size: Some("734003200".to_string()),
        length: Some("1:36:00".to_string()),
        width: Some("1280".to_string()),
        height: Some("720".to_string()),
        ..Default::default()
    }
}

fn feature_item(title: &str, files: Vec<ArchiveFile>) -> ArchiveItem {
    ArchiveItem {
        metadata: json!({"title": title, "date": "1968-10-01"}),
        files,
    }
}

fn entry_for(identifier: &str, playback_url: &str) -> CatalogEntry {
    let now = Utc::now();
    CatalogEntry {
        id: Uuid::new_v4(),
        archive_identifier: identifier.to_string(),
        title: "Night of the Living Dead".to_string(),
        description: None,
        kind: "movie".to_string(),
        playback_url: playback_url.to_string(),
        thumbnail_url: None,
        year: Some(1968),
        genre: "Movie".to_string(),
        rating: "NR".to_string(),
        duration_secs: Some(5760),
        resolution: Some("720p".to_string()),
        file_size: Some(734_003_200),
        mime_type: "video/mp4".to_string(),
        source_provider: "internet_archive".to_string(),
        source_url: format!("https://archive.example/details/{identifier}"),
        license: None,
        created_at: now,
        updated_at: now,
    }
}

fn stub_urls(archive: &mut MockArchive) {
    archive.expect_download_url().returning(|identifier, file| {
        format!("https://archive.example/download/{identifier}/{file}")
    });
    archive
        .expect_details_url()
        .returning(|identifier| format!("https://archive.example/details/{identifier}"));
    archive
        .expect_thumbnail_url()
        .returning(|identifier| format!("https://archive.example/services/img/{identifier}"));
}

fn service(archive: MockArchive, transfer: MockTransfer, catalog: MockCatalog) -> ImportService {
    ImportService::new(
        Arc::new(archive),
        Arc::new(transfer),
        Arc::new(catalog),
        "archive",
        None,
    )
}

fn request_for(identifier: &str) -> ImportRequest {
    ImportRequest {
        identifiers: Some(vec![identifier.to_string()]),
        ..Default::default()
    }
}

#[tokio::test]
async fn scenario_a_fresh_import_creates_row() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_fetch_item()
        .with(eq("night_1968"))
        .times(1)
        .returning(|_| {
            Ok(feature_item(
                "Night of the Living Dead",
                vec![mp4_720p("movie.mp4")],
            ))
        });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .withf(|req| {
            req.key == "archive/night_1968/movie.mp4"
                && req.source_url == "https://archive.example/download/night_1968/movie.mp4"
        })
        .times(1)
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));

    let mut catalog = MockCatalog::new();
    catalog
        .expect_upsert_movie()
        .withf(|identifier, asset, url| {
            identifier == "night_1968"
                && asset.title == "Night of the Living Dead"
                && url == "https://cdn.example/archive/night_1968/movie.mp4"
        })
        .times(1)
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), true)));

    let report = service(archive, transfer, catalog)
        .run(&request_for("night_1968"))
        .await
        .unwrap();

    assert_eq!(report.summary.requested, 1);
    assert_eq!(report.summary.imported, 1);
    assert_eq!(report.results[0].status, ImportStatus::Imported);
    assert_eq!(
        report.results[0].public_url.as_deref(),
        Some("https://cdn.example/archive/night_1968/movie.mp4")
    );
    assert_eq!(report.results[0].file_name.as_deref(), Some("movie.mp4"));
}

#[tokio::test]
async fn scenario_b_reimport_reports_updated() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive.expect_fetch_item().returning(|_| {
        Ok(feature_item(
            "Night of the Living Dead",
            vec![mp4_720p("movie.mp4")],
        ))
    });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));

    let mut catalog = MockCatalog::new();
    // Second import of the same identifier hits the conflict path.
    catalog
        .expect_upsert_movie()
        .times(1)
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), false)));

    let report = service(archive, transfer, catalog)
        .run(&request_for("night_1968"))
        .await
        .unwrap();

    assert_eq!(report.summary.updated, 1);
    assert_eq!(report.summary.imported, 0);
    assert_eq!(report.results[0].status, ImportStatus::Updated);
}

#[tokio::test]
async fn scenario_c_trailer_only_item_is_skipped_before_transfer() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_fetch_item()
        .returning(|_| Ok(feature_item("Some Feature", vec![mp4_720p("trailer_2min.mp4")])));

    let mut transfer = MockTransfer::new();
    transfer.expect_transfer().never();
    let mut catalog = MockCatalog::new();
    catalog.expect_upsert_movie().never();

    let report = service(archive, transfer, catalog)
        .run(&request_for("feature_1950"))
        .await
        .unwrap();

    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.results[0].status, ImportStatus::Skipped);
    assert!(
        report.results[0]
            .reason
            .as_deref()
            .unwrap()
            .contains("keyword")
    );
}

#[tokio::test]
async fn scenario_d_item_failure_does_not_abort_batch() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_fetch_item()
        .with(eq("broken_item"))
        .returning(|_| Err(ImportError::ArchiveStatus(500)));
    archive
        .expect_fetch_item()
        .with(eq("good_item"))
        .returning(|_| {
            Ok(feature_item(
                "Night of the Living Dead",
                vec![mp4_720p("movie.mp4")],
            ))
        });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));
    let mut catalog = MockCatalog::new();
    catalog
        .expect_upsert_movie()
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), true)));

    let request = ImportRequest {
        identifiers: Some(vec!["broken_item".to_string(), "good_item".to_string()]),
        ..Default::default()
    };
    let report = service(archive, transfer, catalog).run(&request).await.unwrap();

    assert_eq!(report.summary.requested, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.imported, 1);
    assert_eq!(report.results[0].status, ImportStatus::Failed);
    assert!(report.results[0].reason.as_deref().unwrap().contains("500"));
    assert_eq!(report.results[1].status, ImportStatus::Imported);
}

#[tokio::test]
async fn scenario_e_mkv_fallback_when_sample_excluded() {
    let mkv = ArchiveFile {
        name: "feature.mkv".to_string(),
        format: Some("Matroska".to_string()),
        length: Some("1:30:00".to_string()),
        height: Some("720".to_string()),
        ..Default::default()
    };
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive.expect_fetch_item().returning(move |_| {
        Ok(feature_item(
            "A Feature",
            vec![mp4_720p("clip_sample.mp4"), mkv.clone()],
        ))
    });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .withf(|req| req.key.ends_with("/feature.mkv"))
        .times(1)
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));
    let mut catalog = MockCatalog::new();
    catalog
        .expect_upsert_movie()
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), true)));

    let request = ImportRequest {
        allow_mkv: true,
        identifiers: Some(vec!["feature_1950".to_string()]),
        ..Default::default()
    };
    let report = service(archive, transfer, catalog).run(&request).await.unwrap();

    assert_eq!(report.results[0].status, ImportStatus::Imported);
    assert_eq!(report.results[0].file_name.as_deref(), Some("feature.mkv"));
}

#[tokio::test]
async fn empty_listing_is_a_skip_not_an_error() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_fetch_item()
        .returning(|_| Ok(feature_item("Empty Item", vec![])));

    let mut transfer = MockTransfer::new();
    transfer.expect_transfer().never();
    let mut catalog = MockCatalog::new();
    catalog.expect_upsert_movie().never();

    let report = service(archive, transfer, catalog)
        .run(&request_for("empty_item"))
        .await
        .unwrap();

    assert_eq!(report.results[0].status, ImportStatus::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("no playable file found")
    );
    assert_eq!(report.results[0].title.as_deref(), Some("Empty Item"));
}

#[tokio::test]
async fn dry_run_previews_without_side_effects() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive.expect_fetch_item().returning(|_| {
        Ok(feature_item(
            "Night of the Living Dead",
            vec![mp4_720p("movie.mp4")],
        ))
    });

    let mut transfer = MockTransfer::new();
    transfer.expect_transfer().never();
    let mut catalog = MockCatalog::new();
    catalog.expect_upsert_movie().never();

    let request = ImportRequest {
        dry_run: true,
        identifiers: Some(vec!["night_1968".to_string()]),
        ..Default::default()
    };
    let report = service(archive, transfer, catalog).run(&request).await.unwrap();

    assert_eq!(report.results[0].status, ImportStatus::Ready);
    assert_eq!(report.results[0].file_name.as_deref(), Some("movie.mp4"));
    assert!(report.results[0].public_url.is_none());
}

#[tokio::test]
async fn preferred_file_wins_when_eligible() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive.expect_fetch_item().returning(|_| {
        Ok(feature_item(
            "A Feature",
            vec![mp4_720p("better.mp4"), mp4_720p("preferred.mp4")],
        ))
    });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .withf(|req| req.key.ends_with("/preferred.mp4"))
        .times(1)
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));
    let mut catalog = MockCatalog::new();
    catalog
        .expect_upsert_movie()
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), true)));

    let request = ImportRequest {
        items: Some(vec![ImportItem {
            identifier: "feature_1950".to_string(),
            file_name: Some("preferred.mp4".to_string()),
        }]),
        // Items take priority over a bare identifier list.
        identifiers: Some(vec!["ignored".to_string()]),
        ..Default::default()
    };
    let report = service(archive, transfer, catalog).run(&request).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].identifier, "feature_1950");
    assert_eq!(report.results[0].status, ImportStatus::Imported);
}

#[tokio::test]
async fn search_resolves_work_list_when_nothing_explicit() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_search()
        .withf(|query, count| query.contains("newsreels") && *count == 50)
        .times(1)
        .returning(|_, _| Ok(vec!["found_a".to_string(), "found_b".to_string()]));
    archive.expect_fetch_item().returning(|_| {
        Ok(feature_item(
            "Night of the Living Dead",
            vec![mp4_720p("movie.mp4")],
        ))
    });

    let mut transfer = MockTransfer::new();
    transfer
        .expect_transfer()
        .times(2)
        .returning(|req| Ok(format!("https://cdn.example/{}", req.key)));
    let mut catalog = MockCatalog::new();
    catalog
        .expect_upsert_movie()
        .times(2)
        .returning(|identifier, _, url| Ok((entry_for(identifier, url), true)));

    let request = ImportRequest {
        preset_query: Some("collection:(newsreels)".to_string()),
        // Over-limit values clamp to the allowed maximum of 50.
        limit: Some(500),
        ..Default::default()
    };
    let report = service(archive, transfer, catalog).run(&request).await.unwrap();

    assert_eq!(report.summary.requested, 2);
    assert_eq!(report.summary.imported, 2);
}

#[tokio::test]
async fn search_failure_is_request_level() {
    let mut archive = MockArchive::new();
    stub_urls(&mut archive);
    archive
        .expect_search()
        .returning(|_, _| Err(ImportError::ArchiveStatus(503)));

    let transfer = MockTransfer::new();
    let catalog = MockCatalog::new();

    let err = service(archive, transfer, catalog)
        .run(&ImportRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::ArchiveStatus(503)));
}
