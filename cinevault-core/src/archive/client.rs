use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use tracing::debug;

use super::types::ArchiveItem;
use crate::error::{ImportError, Result};

/// Characters percent-encoded in download path segments. The archive serves
/// files under their literal names, spaces included.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Read side of the source archive: search for candidate identifiers and
/// fetch per-item metadata. The orchestrator only talks to this trait so
/// batch behaviour is testable without a network.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Run a search query, returning at most `count` identifiers in the
    /// archive's relevance order. An empty result set is not an error.
    async fn search(&self, query: &str, count: u32) -> Result<Vec<String>>;

    /// Fetch one item's metadata record and file listing. The listing may
    /// be empty.
    async fn fetch_item(&self, identifier: &str) -> Result<ArchiveItem>;

    /// Public download URL for one file of an item.
    fn download_url(&self, identifier: &str, file_name: &str) -> String;

    /// Human-facing item page on the archive.
    fn details_url(&self, identifier: &str) -> String;

    /// The archive's generated thumbnail for an item.
    fn thumbnail_url(&self, identifier: &str) -> String;
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    response: Option<SearchResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    identifier: String,
}

/// Reqwest-backed archive client. `base_url` is configurable so tests and
/// mirrors can point it elsewhere; the default is the public archive.
#[derive(Debug, Clone)]
pub struct HttpArchiveClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpArchiveClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ArchiveClient for HttpArchiveClient {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<String>> {
        let rows = count.clamp(1, 100);
        let url = format!("{}/advancedsearch.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("fl[]", "identifier"),
                ("rows", &rows.to_string()),
                ("page", "1"),
                ("output", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImportError::ArchiveStatus(response.status().as_u16()));
        }

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| ImportError::Parse(format!("search response: {e}")))?;

        // A missing or empty result list is a valid empty result.
        let identifiers: Vec<String> = envelope
            .response
            .map(|r| r.docs.into_iter().map(|d| d.identifier).collect())
            .unwrap_or_default();

        debug!(query, rows, found = identifiers.len(), "archive search");
        Ok(identifiers)
    }

    async fn fetch_item(&self, identifier: &str) -> Result<ArchiveItem> {
        let url = format!("{}/metadata/{}", self.base_url, identifier);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ImportError::ArchiveStatus(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ImportError::Parse(format!("metadata for {identifier}: {e}")))
    }

    fn download_url(&self, identifier: &str, file_name: &str) -> String {
        format!(
            "{}/download/{}/{}",
            self.base_url,
            identifier,
            utf8_percent_encode(file_name, PATH_SEGMENT)
        )
    }

    fn details_url(&self, identifier: &str) -> String {
        format!("{}/details/{}", self.base_url, identifier)
    }

    fn thumbnail_url(&self, identifier: &str) -> String {
        format!("{}/services/img/{}", self.base_url, identifier)
    }
}
