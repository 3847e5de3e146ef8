use std::path::Path;

use anyhow::{anyhow, Context, Result};

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    infer::get(data).map(|kind| normalize_mime_type(kind.mime_type()))
}

fn normalize_mime_type(mime_type: &str) -> String {
    let lowered = mime_type.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        _ => lowered,
    }
}

// The upload contract of the source portrait: PNG or JPEG only.
pub fn is_supported_source_mime(mime_type: &str) -> bool {
    matches!(mime_type, "image/png" | "image/jpeg")
}

/// Reads a source portrait from disk and verifies it is a decodable PNG/JPEG
/// payload before it is handed to the generation client.
pub fn load_source_image(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read source image {}", path.display()))?;

    let mime_type = detect_mime_type(&bytes)
        .ok_or_else(|| anyhow!("{} is not a recognized image file", path.display()))?;
    if !is_supported_source_mime(&mime_type) {
        return Err(anyhow!(
            "{} has unsupported type {} (expected PNG or JPEG)",
            path.display(),
            mime_type
        ));
    }

    image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode source image {}", path.display()))?;

    Ok(bytes)
}
