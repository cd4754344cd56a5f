use serde::{Deserialize, Serialize};

/// Outcome of one identifier's trip through the import pipeline.
///
/// `Skipped` is a policy rejection (excluded content, no playable file),
/// `Failed` an unexpected error. Callers should only consider `Failed`
/// items candidates for re-submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    /// Dry-run preview: the item would import with the reported selection.
    Ready,
    Imported,
    Updated,
    Skipped,
    Failed,
}

/// Per-identifier result record returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub identifier: String,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub status: ImportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ImportResult {
    /// Minimal result for an identifier that never got past metadata fetch.
    pub fn failed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            file_name: None,
            public_url: None,
            file_size: None,
            duration_secs: None,
            source_url: None,
            status: ImportStatus::Failed,
            reason: Some(reason.into()),
        }
    }
}

/// Batch-level counters, one per terminal status plus the request size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub requested: usize,
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn record(&mut self, status: ImportStatus) {
        match status {
            // Dry-run previews are not counted against any terminal bucket.
            ImportStatus::Ready => {}
            ImportStatus::Imported => self.imported += 1,
            ImportStatus::Updated => self.updated += 1,
            ImportStatus::Skipped => self.skipped += 1,
            ImportStatus::Failed => self.failed += 1,
        }
    }
}

/// Everything the caller gets back from one `/import` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub results: Vec<ImportResult>,
}
