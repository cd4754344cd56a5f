//! # Cinevault Server
//!
//! Admin-facing import service: pulls public-domain movies from a
//! third-party media archive into the managed catalog.
//!
//! Built on Axum, PostgreSQL for the catalog, and S3-compatible object
//! storage for the media itself.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use cinevault_core::{
    HttpArchiveClient, ImportService, PostgresCatalog, S3TransferEngine, StorageSettings,
};
use cinevault_server::{AppState, Config, create_router};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let shared_aws = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.storage_region.clone()))
        .load()
        .await;
    let mut s3_builder = aws_sdk_s3::config::Builder::from(&shared_aws);
    if let Some(endpoint) = &config.storage_endpoint_url {
        s3_builder = s3_builder.endpoint_url(endpoint);
    }
    if config.storage_force_path_style {
        s3_builder = s3_builder.force_path_style(true);
    }
    let s3 = aws_sdk_s3::Client::from_conf(s3_builder.build());

    let archive = Arc::new(HttpArchiveClient::new(&config.archive_base_url)?);
    let transfer = Arc::new(S3TransferEngine::new(
        s3,
        StorageSettings {
            bucket: config.storage_bucket.clone(),
            region: config.storage_region.clone(),
            endpoint_url: config.storage_endpoint_url.clone(),
            cdn_base_url: config.cdn_base_url.clone(),
        },
    )?);
    let catalog = Arc::new(PostgresCatalog::new(pool));

    let import = Arc::new(ImportService::new(
        archive,
        transfer,
        catalog,
        config.storage_prefix.clone(),
        config.preset_query.clone(),
    ));

    let state = AppState {
        import,
        config: Arc::new(config.clone()),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid server address")?;
    info!("cinevault-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
