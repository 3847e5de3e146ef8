use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use image::DynamicImage;

use crate::config::CONFIG;

/// Encodes a generated image as PNG and writes it to `path`, creating parent
/// directories as needed. Filesystem and encoder faults propagate unchanged.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Timestamped path under the configured output directory, so repeated runs
/// with the same style never overwrite each other.
pub fn default_output_path(style_id: &str) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(&CONFIG.output_dir).join(format!("pfp_{style_id}_{stamp}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_lands_in_output_dir_with_style_and_extension() {
        let path = default_output_path("wif");
        assert!(path.starts_with(&CONFIG.output_dir));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pfp_wif_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("pfp_styler_test_{}", std::process::id()));
        let nested = dir.join("a").join("b").join("out.png");
        let image = DynamicImage::new_rgba8(2, 2);

        save_image(&image, &nested).expect("save must succeed");
        assert!(nested.is_file());

        fs::remove_dir_all(&dir).ok();
    }
}
