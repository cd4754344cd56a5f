//! Small pure helpers shared by the selection engine, normalizer, and
//! transfer engine: mime inference, duration parsing, and file-name
//! sanitization for storage keys.

/// Infer a mime type from a file extension. Only covers the containers the
/// archive actually serves for video items.
pub fn infer_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mkv" => Some("video/x-matroska"),
        "webm" => Some("video/webm"),
        "avi" => Some("video/x-msvideo"),
        "mov" => Some("video/quicktime"),
        "mpg" | "mpeg" => Some("video/mpeg"),
        "ogv" => Some("video/ogg"),
        _ => None,
    }
}

/// Parse a declared duration in any of the archive's forms: `H:MM:SS`,
/// `MM:SS`, or plain (possibly fractional) seconds.
pub fn parse_duration_secs(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains(':') {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() > 3 {
            return None;
        }
        let mut secs = 0.0;
        for part in &parts {
            secs = secs * 60.0 + part.trim().parse::<f64>().ok()?;
        }
        return Some(secs);
    }

    raw.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0)
}

/// Sanitize a source file name for use as a storage key segment. Anything
/// outside `[A-Za-z0-9._-]` becomes an underscore so the key stays
/// deterministic per (identifier, file name) and URL-safe.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
