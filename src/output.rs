//! File naming, image saving, and format conversion.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::HeadshotError;
use crate::params::format_extension;
use crate::ports::ImageArtifact;

/// Default output filename: `professional-headshot-<unix seconds>.<ext>`.
#[must_use]
pub fn auto_filename(format: &str) -> String {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("professional-headshot-{timestamp}.{}", format_extension(format))
}

/// Resolve the output path for result `index` (1-based) of `total`.
///
/// Uses `explicit` when given, else an auto-generated name. With more than
/// one result, `-<index>` is appended to the file stem.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    format: &str,
    index: u32,
    total: u32,
) -> PathBuf {
    let base = explicit.map_or_else(|| PathBuf::from(auto_filename(format)), PathBuf::from);
    if total <= 1 {
        return base;
    }
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = match base.extension() {
        Some(ext) => format!("{stem}-{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{index}"),
    };
    base.with_file_name(file_name)
}

/// Save a generated image, converting format if necessary.
///
/// # Errors
///
/// Returns an error if the file cannot be written or format conversion fails.
pub fn save_image(
    artifact: &ImageArtifact,
    target_format: &str,
    output_path: &Path,
) -> Result<(), HeadshotError> {
    if mime_matches_format(&artifact.mime_type, target_format) {
        std::fs::write(output_path, &artifact.data).map_err(HeadshotError::Io)
    } else {
        convert_and_save(&artifact.data, target_format, output_path)
    }
}

/// Check if a MIME type matches the requested output format.
fn mime_matches_format(mime: &str, format: &str) -> bool {
    matches!((mime, format), ("image/jpeg", "jpeg") | ("image/png", "png") | ("image/webp", "webp"))
}

/// Convert image bytes to the target format and save.
fn convert_and_save(
    data: &[u8],
    target_format: &str,
    output_path: &Path,
) -> Result<(), HeadshotError> {
    let img = image::load_from_memory(data)
        .map_err(|e| HeadshotError::ImageConversion(format!("Failed to decode image: {e}")))?;

    let image_format = match target_format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(HeadshotError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };

    // JPEG has no alpha channel.
    let img = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, image_format).map_err(|e| {
        HeadshotError::ImageConversion(format!("Failed to save as {target_format}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_artifact() -> ImageArtifact {
        let img = image::DynamicImage::new_rgba8(2, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        ImageArtifact { data: buf.into_inner(), mime_type: "image/png".into() }
    }

    #[test]
    fn auto_filename_format() {
        let name = auto_filename("png");
        assert!(name.starts_with("professional-headshot-"));
        assert_eq!(Path::new(&name).extension().unwrap(), "png");
        assert_eq!(Path::new(&auto_filename("jpeg")).extension().unwrap(), "jpg");
    }

    #[test]
    fn resolve_explicit_single() {
        let path = resolve_output_path(Some("me.png"), "png", 1, 1);
        assert_eq!(path, PathBuf::from("me.png"));
    }

    #[test]
    fn resolve_explicit_multiple_gets_suffix() {
        let path = resolve_output_path(Some("out/me.png"), "png", 2, 3);
        assert_eq!(path, PathBuf::from("out/me-2.png"));
    }

    #[test]
    fn resolve_auto() {
        let path = resolve_output_path(None, "jpeg", 1, 1);
        assert!(path.to_str().unwrap().starts_with("professional-headshot-"));
        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[test]
    fn mime_matches() {
        assert!(mime_matches_format("image/jpeg", "jpeg"));
        assert!(mime_matches_format("image/png", "png"));
        assert!(mime_matches_format("image/webp", "webp"));
        assert!(!mime_matches_format("image/jpeg", "png"));
        assert!(!mime_matches_format("image/png", "jpeg"));
    }

    #[test]
    fn save_same_format_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let artifact = png_artifact();
        save_image(&artifact, "png", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), artifact.data);
    }

    #[test]
    fn save_converts_png_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        save_image(&png_artifact(), "jpeg", &path).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn save_rejects_undecodable_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ImageArtifact { data: vec![1, 2, 3], mime_type: "image/png".into() };
        let err = save_image(&artifact, "jpeg", &dir.path().join("x.jpg")).unwrap_err();
        assert!(matches!(err, HeadshotError::ImageConversion(_)));
    }
}
