//! File selection engine: given an item's file listing, pick the single
//! best playable video file, or report that none exists.
//!
//! Selection is pure and deterministic: it depends only on the listing and
//! the allow-mkv policy flag, and ties break toward the earlier file in
//! listing order.

use crate::archive::ArchiveFile;

/// Name fragments that mark a file as non-playable regardless of format.
const NON_PLAYABLE_TOKENS: &[&str] = &["sample", "preview", "thumb"];

/// Subtitle sidecar extensions, never playable video.
const SUBTITLE_EXTENSIONS: &[&str] = &[".srt", ".vtt", ".sub", ".idx", ".sbv", ".smi"];

/// Format-string tokens that indicate video content when no mime type is
/// available.
const VIDEO_FORMAT_TOKENS: &[&str] = &["video", "mpeg4", "h.264", "h264", "avc", "matroska", "mpeg"];

/// Score boosts and penalties. The container/codec boosts dominate the
/// resolution/bitrate terms so a compatible low-resolution file always
/// outranks an incompatible high-resolution one.
const PRIMARY_CONTAINER_BOOST: i64 = 1_000_000;
const COMPAT_CODEC_BOOST: i64 = 500_000;
const MP4_MIME_BOOST: i64 = 200_000;
const LOW_BITRATE_PENALTY: i64 = 200_000;
const HIGH_BITRATE_PENALTY: i64 = 400_000;

/// Computed-bitrate plausibility window in kbit/s. Outside it, the declared
/// size or duration metadata is probably corrupt and the score is docked.
const MIN_PLAUSIBLE_KBPS: f64 = 150.0;
const MAX_PLAUSIBLE_KBPS: f64 = 50_000.0;

fn is_non_playable_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    NON_PLAYABLE_TOKENS.iter().any(|t| lower.contains(t))
        || SUBTITLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn is_video_candidate(file: &ArchiveFile) -> bool {
    if is_non_playable_name(&file.name) {
        return false;
    }

    if file.mime_type().is_some_and(|m| m.starts_with("video/")) {
        return true;
    }

    let format = file.format.as_deref().unwrap_or("").to_ascii_lowercase();
    VIDEO_FORMAT_TOKENS.iter().any(|t| format.contains(t))
}

fn is_primary_container(file: &ArchiveFile) -> bool {
    file.name.to_ascii_lowercase().ends_with(".mp4")
        || file.mime_type() == Some("video/mp4")
}

fn is_secondary_container(file: &ArchiveFile) -> bool {
    file.name.to_ascii_lowercase().ends_with(".mkv")
        || file
            .format
            .as_deref()
            .is_some_and(|f| f.to_ascii_lowercase().contains("matroska"))
        || file.mime_type() == Some("video/x-matroska")
}

fn passes_container_gate(file: &ArchiveFile, allow_mkv: bool) -> bool {
    is_primary_container(file) || (allow_mkv && is_secondary_container(file))
}

fn has_compat_codec(file: &ArchiveFile) -> bool {
    let format = file.format.as_deref().unwrap_or("").to_ascii_lowercase();
    format.contains("h.264") || format.contains("h264") || format.contains("avc")
}

/// Score one file for selection; higher wins. Pure arithmetic over the
/// file's declared attributes so boundary conditions are directly testable.
pub fn score_file(file: &ArchiveFile) -> i64 {
    let mut score = 0i64;

    if is_primary_container(file) {
        score += PRIMARY_CONTAINER_BOOST;
    }
    if has_compat_codec(file) {
        score += COMPAT_CODEC_BOOST;
    }
    if file.mime_type() == Some("video/mp4") {
        score += MP4_MIME_BOOST;
    }

    score += i64::from(file.height().unwrap_or(0)) * 1_000;
    score += i64::from(file.width().unwrap_or(0)) * 10;
    score += file.bitrate().unwrap_or(0) as i64 * 2;
    score += (file.size_bytes().unwrap_or(0) / 1024) as i64;

    // An implausible computed bitrate means the declared size or duration
    // is corrupt; dock the score rather than trusting the raw numbers.
    if let (Some(size), Some(duration)) = (file.size_bytes(), file.duration_secs())
        && duration > 0.0
    {
        let kbps = (size as f64 * 8.0) / duration / 1_000.0;
        if kbps < MIN_PLAUSIBLE_KBPS {
            score -= LOW_BITRATE_PENALTY;
        } else if kbps > MAX_PLAUSIBLE_KBPS {
            score -= HIGH_BITRATE_PENALTY;
        }
    }

    score
}

/// Pick the best playable file from a listing, or `None` when no file
/// survives the eligibility filter and container gate.
pub fn select_best_file(files: &[ArchiveFile], allow_mkv: bool) -> Option<&ArchiveFile> {
    let mut best: Option<(&ArchiveFile, i64)> = None;

    for file in files {
        if !is_video_candidate(file) || !passes_container_gate(file, allow_mkv) {
            continue;
        }
        let score = score_file(file);
        // Strictly-greater comparison keeps the first file on tied scores.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((file, score));
        }
    }

    best.map(|(file, _)| file)
}

/// Selection entry point honoring a caller-preferred file name. The
/// preference is only accepted if the named file itself passes eligibility
/// and the container gate; otherwise the scored search runs over the full
/// listing.
pub fn select_with_preference<'a>(
    files: &'a [ArchiveFile],
    preferred: Option<&str>,
    allow_mkv: bool,
) -> Option<&'a ArchiveFile> {
    if let Some(name) = preferred
        && let Some(file) = files.iter().find(|f| f.name == name)
        && is_video_candidate(file)
        && passes_container_gate(file, allow_mkv)
    {
        return Some(file);
    }

    select_best_file(files, allow_mkv)
}
