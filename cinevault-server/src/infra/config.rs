use anyhow::Context;
use std::env;

/// Server configuration loaded once at startup via environment variables
/// and passed by reference into each component constructor.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Admin auth: static bearer secret checked on /import
    pub admin_token: String,

    // Source archive settings
    pub archive_base_url: String,
    pub preset_query: Option<String>,

    // Object storage settings
    pub storage_bucket: String,
    pub storage_region: String,
    pub storage_endpoint_url: Option<String>,
    pub storage_force_path_style: bool,
    pub storage_prefix: String,
    pub cdn_base_url: Option<String>,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            database_url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,

            admin_token: env::var("ADMIN_TOKEN").context("ADMIN_TOKEN is required")?,

            archive_base_url: env::var("ARCHIVE_BASE_URL")
                .unwrap_or_else(|_| "https://archive.org".to_string()),
            preset_query: env::var("IMPORT_PRESET_QUERY").ok(),

            storage_bucket: env::var("STORAGE_BUCKET").context("STORAGE_BUCKET is required")?,
            storage_region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            storage_endpoint_url: env::var("STORAGE_ENDPOINT_URL").ok(),
            storage_force_path_style: env::var("STORAGE_FORCE_PATH_STYLE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            storage_prefix: env::var("STORAGE_PREFIX").unwrap_or_else(|_| "archive".to_string()),
            cdn_base_url: env::var("CDN_BASE_URL").ok(),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}
