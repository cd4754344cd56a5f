use serde::{Deserialize, Serialize};

/// What kind of asset a catalog entry represents. The import pipeline only
/// produces movies today; the enum exists so the catalog schema does not
/// need to change when series support lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Movie,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Movie => "movie",
        }
    }
}

/// Where an asset came from, kept verbatim for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Stable name of the source provider, e.g. `"internet_archive"`.
    pub provider: String,
    /// Human-facing page for the item on the source archive.
    pub source_url: String,
    /// Declared rights/license string, verbatim from the source record.
    pub license: Option<String>,
    /// Raw source metadata record, stored for audit and re-derivation.
    pub raw_metadata: serde_json::Value,
}

/// Catalog-ready fields derived from a raw archive record plus the chosen
/// file's attributes. This is what the exclusion rules run against and what
/// the catalog upsert persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAsset {
    pub title: String,
    pub description: Option<String>,
    pub kind: AssetKind,
    pub year: Option<i32>,
    pub genre: String,
    pub rating: String,
    pub duration_secs: Option<u64>,
    /// `"{height}p"` when the chosen file declares a height.
    pub resolution: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: String,
    pub container_format: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provenance: Provenance,
}
