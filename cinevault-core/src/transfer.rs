//! Transfer engine: streams a selected file from the archive's public
//! download URL into durable object storage and returns the public
//! playback URL.
//!
//! The body is piped through in bounded parts (S3 multipart upload), so
//! multi-gigabyte files never sit in process memory. A failed upload
//! aborts the multipart session so no orphaned parts accrue storage.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_smithy_types::body::SdkBody;
use aws_smithy_types::byte_stream::ByteStream;
use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};
use crate::media::sanitize_file_name;

/// Part size for multipart uploads. Anything ≥ 5 MiB satisfies S3's
/// minimum for non-final parts.
const PART_SIZE: usize = 8 * 1024 * 1024;

/// Deterministic destination key for one (identifier, file) pair. Re-imports
/// of the same pair always target the same object, which is what keeps the
/// catalog upsert idempotent instead of key-colliding.
pub fn storage_key(prefix: &str, identifier: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        prefix.trim_matches('/'),
        identifier,
        sanitize_file_name(file_name)
    )
}

/// Content type preference order: declared file mime, then the source
/// response's header, then the octet-stream fallback.
pub fn resolve_content_type(declared: Option<&str>, header: Option<&str>) -> String {
    declared
        .filter(|ct| !ct.trim().is_empty())
        .or(header.filter(|ct| !ct.trim().is_empty()))
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// One transfer job: where to read, where to write, and the mime the file
/// listing declared (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_url: String,
    pub key: String,
    pub declared_mime: Option<String>,
}

/// Write side of the pipeline. Returns the public URL of the stored object.
#[async_trait]
pub trait TransferEngine: Send + Sync {
    async fn transfer(&self, request: TransferRequest) -> Result<String>;
}

/// Storage destination settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for MinIO-compatible stores; `None` means AWS.
    pub endpoint_url: Option<String>,
    /// When set, public URLs are CDN-fronted instead of direct.
    pub cdn_base_url: Option<String>,
}

/// S3-backed transfer engine.
#[derive(Debug, Clone)]
pub struct S3TransferEngine {
    http: reqwest::Client,
    s3: S3Client,
    settings: StorageSettings,
}

impl S3TransferEngine {
    pub fn new(s3: S3Client, settings: StorageSettings) -> Result<Self> {
        // Connect timeout only: a total-request timeout would kill long
        // feature-length downloads mid-stream.
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { http, s3, settings })
    }

    fn public_url(&self, key: &str) -> String {
        if let Some(cdn) = &self.settings.cdn_base_url {
            format!("{}/{}", cdn.trim_end_matches('/'), key)
        } else if let Some(endpoint) = &self.settings.endpoint_url {
            format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.settings.bucket,
                key
            )
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.settings.bucket, self.settings.region, key
            )
        }
    }

    async fn abort_upload(&self, key: &str, upload_id: &str) {
        if let Err(e) = self
            .s3
            .abort_multipart_upload()
            .bucket(&self.settings.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
        {
            warn!(key, "failed to abort multipart upload: {e}");
        }
    }

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        data: bytes::Bytes,
    ) -> Result<CompletedPart> {
        let part = self
            .s3
            .upload_part()
            .bucket(&self.settings.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::new(SdkBody::from(data)))
            .send()
            .await
            .map_err(|e| ImportError::Storage(format!("upload part {part_number}: {e}")))?;

        Ok(CompletedPart::builder()
            .part_number(part_number)
            .set_e_tag(part.e_tag)
            .build())
    }

    async fn stream_to_object(
        &self,
        response: reqwest::Response,
        key: &str,
        content_type: &str,
    ) -> Result<()> {
        let upload = self
            .s3
            .create_multipart_upload()
            .bucket(&self.settings.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| ImportError::Storage(format!("create upload: {e}")))?;
        let upload_id = upload
            .upload_id
            .ok_or_else(|| ImportError::Storage("no upload id returned".to_string()))?;

        // Drive the body stream, flushing a part whenever the buffer fills.
        // The source stream and the multipart session are both torn down on
        // every failure path: the stream by drop, the session by abort.
        let result = async {
            let mut stream = response.bytes_stream();
            let mut buffer = BytesMut::with_capacity(PART_SIZE);
            let mut parts: Vec<CompletedPart> = Vec::new();

            while let Some(chunk) = stream.next().await {
                let chunk =
                    chunk.map_err(|e| ImportError::Transfer(format!("source stream: {e}")))?;
                buffer.extend_from_slice(&chunk);

                if buffer.len() >= PART_SIZE {
                    let data = buffer.split().freeze();
                    let number = parts.len() as i32 + 1;
                    parts.push(self.upload_part(key, &upload_id, number, data).await?);
                }
            }

            // Final (possibly short, possibly only) part.
            if !buffer.is_empty() || parts.is_empty() {
                let data = buffer.split().freeze();
                let number = parts.len() as i32 + 1;
                parts.push(self.upload_part(key, &upload_id, number, data).await?);
            }

            self.s3
                .complete_multipart_upload()
                .bucket(&self.settings.bucket)
                .key(key)
                .upload_id(&upload_id)
                .multipart_upload(
                    CompletedMultipartUpload::builder()
                        .set_parts(Some(parts))
                        .build(),
                )
                .send()
                .await
                .map_err(|e| ImportError::Storage(format!("complete upload: {e}")))?;
            Ok(())
        }
        .await;

        if result.is_err() {
            self.abort_upload(key, &upload_id).await;
        }
        result
    }
}

#[async_trait]
impl TransferEngine for S3TransferEngine {
    async fn transfer(&self, request: TransferRequest) -> Result<String> {
        let response = self
            .http
            .get(&request.source_url)
            // Avoid compressed, range-susceptible responses for binary assets
            .header(reqwest::header::ACCEPT_ENCODING, "identity")
            .send()
            .await
            .map_err(|e| ImportError::Transfer(format!("source request: {e}")))?;

        if !response.status().is_success() {
            return Err(ImportError::Transfer(format!(
                "source responded HTTP {}",
                response.status()
            )));
        }

        let header_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = resolve_content_type(request.declared_mime.as_deref(), header_type.as_deref());

        debug!(
            key = %request.key,
            content_type = %content_type,
            content_length = ?response.content_length(),
            "starting transfer"
        );

        self.stream_to_object(response, &request.key, &content_type)
            .await?;

        Ok(self.public_url(&request.key))
    }
}
