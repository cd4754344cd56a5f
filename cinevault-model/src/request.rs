use serde::{Deserialize, Serialize};

/// One explicitly requested item, optionally pinned to a preferred file.
///
/// The preferred file still has to pass the selection engine's eligibility
/// and container gates; an ineligible preference falls back to the scored
/// search over the item's full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Body of `POST /import`.
///
/// Work-list priority: `items` beats `identifiers` beats a search on
/// `preset_query`. `limit` only applies to search-derived batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub allow_mkv: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ImportItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<String>>,
}
