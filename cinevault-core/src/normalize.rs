//! Metadata normalizer: derives catalog-ready fields from an archive item's
//! free-form metadata record plus the selected file's attributes, and
//! applies the content exclusion rules that keep non-feature material out
//! of the catalog.

use cinevault_model::{AssetKind, NormalizedAsset, Provenance};
use serde_json::Value;

use crate::archive::ArchiveFile;
use crate::media::parse_duration_secs;

/// Keywords that mark an item as non-feature content. Matched case
/// insensitively against both the resolved title and the chosen file name.
const EXCLUDED_KEYWORDS: &[&str] = &[
    "trailer",
    "preview",
    "teaser",
    "promo",
    "commercial",
    "clip",
    "newsreel",
    "short",
    "sample",
];

/// Anything under this duration is not a feature film.
const FEATURE_FLOOR_SECS: u64 = 45 * 60;

/// Metadata keys consulted for each derived field, in preference order.
const GENRE_KEYS: &[&str] = &["genre", "genres", "category", "subject", "tags", "tag"];
const RATING_KEYS: &[&str] = &[
    "rating",
    "content_rating",
    "contentrating",
    "mpaa",
    "maturity",
    "audience",
];
const YEAR_KEYS: &[&str] = &["year", "date", "publicdate", "addeddate"];

/// Stable provider name recorded in provenance and used as the storage key
/// prefix namespace.
pub const SOURCE_PROVIDER: &str = "internet_archive";

/// Why an item was rejected by policy, as opposed to failing unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ExcludedKeywords,
    BelowFeatureFloor { minutes: u64 },
}

impl SkipReason {
    pub fn message(&self) -> String {
        match self {
            SkipReason::ExcludedKeywords => "excluded by title keywords".to_string(),
            SkipReason::BelowFeatureFloor { minutes } => {
                format!("below feature length at {minutes} min")
            }
        }
    }
}

/// First non-empty string found under any of `keys` in the metadata record.
/// The archive stores values as strings, arrays of strings, or numbers.
pub fn first_meta_value(metadata: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let Some(value) = metadata.get(key) else {
            continue;
        };
        let found = match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items.iter().find_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            _ => None,
        };
        if let Some(s) = found {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// First run of four consecutive digits in any year/date field.
fn extract_year(metadata: &Value) -> Option<i32> {
    let raw = first_meta_value(metadata, YEAR_KEYS)?;
    let bytes = raw.as_bytes();
    let mut run_start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i - start == 3 {
                return raw[start..=i].parse().ok();
            }
        } else {
            run_start = None;
        }
    }
    None
}

fn resolve_title(identifier: &str, metadata: &Value) -> String {
    first_meta_value(metadata, &["title"]).unwrap_or_else(|| identifier.to_string())
}

/// Duration in whole seconds, preferring the file's own declared length
/// over the metadata record's runtime fields.
fn resolve_duration_secs(metadata: &Value, file: &ArchiveFile) -> Option<u64> {
    file.duration_secs()
        .or_else(|| {
            first_meta_value(metadata, &["runtime", "length", "duration"])
                .and_then(|raw| parse_duration_secs(&raw))
        })
        .map(|secs| secs.round() as u64)
}

/// Build the catalog-ready view of one item + chosen file.
pub fn normalize_asset(
    identifier: &str,
    metadata: &Value,
    file: &ArchiveFile,
    source_url: String,
    thumbnail_url: String,
) -> NormalizedAsset {
    let genre = first_meta_value(metadata, GENRE_KEYS)
        .map(|g| g.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_else(|| "Movie".to_string());

    NormalizedAsset {
        title: resolve_title(identifier, metadata),
        description: first_meta_value(metadata, &["description"]),
        kind: AssetKind::Movie,
        year: extract_year(metadata),
        genre,
        rating: first_meta_value(metadata, RATING_KEYS).unwrap_or_else(|| "NR".to_string()),
        duration_secs: resolve_duration_secs(metadata, file),
        resolution: file.height().map(|h| format!("{h}p")),
        file_size: file.size_bytes(),
        mime_type: file
            .mime_type()
            .unwrap_or("application/octet-stream")
            .to_string(),
        container_format: file.format.clone(),
        thumbnail_url: Some(thumbnail_url),
        provenance: Provenance {
            provider: SOURCE_PROVIDER.to_string(),
            source_url,
            license: first_meta_value(metadata, &["licenseurl", "license", "rights"]),
            raw_metadata: metadata.clone(),
        },
    }
}

/// Policy check run after normalization and before any transfer. `Some`
/// means the item must be reported `skipped` and never reach the transfer
/// engine or the catalog.
pub fn exclusion_for(asset: &NormalizedAsset, file_name: &str) -> Option<SkipReason> {
    let title = asset.title.to_ascii_lowercase();
    let file_name = file_name.to_ascii_lowercase();
    if EXCLUDED_KEYWORDS
        .iter()
        .any(|kw| title.contains(kw) || file_name.contains(kw))
    {
        return Some(SkipReason::ExcludedKeywords);
    }

    if let Some(secs) = asset.duration_secs
        && secs < FEATURE_FLOOR_SECS
    {
        let minutes = (secs as f64 / 60.0).round() as u64;
        return Some(SkipReason::BelowFeatureFloor { minutes });
    }

    None
}
