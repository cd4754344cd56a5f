use serde::{Deserialize, Serialize};

use crate::media::{infer_mime, parse_duration_secs};

/// One file entry from an archive item's listing.
///
/// The archive declares nearly every numeric attribute as a string, so the
/// raw fields stay strings and the typed accessors do the parsing. A field
/// that fails to parse is treated the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveFile {
    pub name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    /// Declared duration, either in seconds or `H:MM:SS`.
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub bitrate: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
}

impl ArchiveFile {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref()?.trim().parse().ok()
    }

    pub fn duration_secs(&self) -> Option<f64> {
        parse_duration_secs(self.length.as_deref()?)
    }

    pub fn width(&self) -> Option<u32> {
        self.width.as_deref()?.trim().parse().ok()
    }

    pub fn height(&self) -> Option<u32> {
        self.height.as_deref()?.trim().parse().ok()
    }

    pub fn bitrate(&self) -> Option<u64> {
        // Some records declare fractional bitrates; floor them.
        let raw = self.bitrate.as_deref()?.trim();
        raw.parse::<u64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().map(|b| b as u64))
    }

    /// Declared mime when present, else inferred from the extension.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime.as_deref().or_else(|| infer_mime(&self.name))
    }
}

/// One archive item: its free-form metadata record plus the full file
/// listing. The metadata record stays a raw JSON value because the archive
/// does not enforce any schema on it; the normalizer digs fields out of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveItem {
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub files: Vec<ArchiveFile>,
}
