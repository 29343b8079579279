//! Source image intake: the only way an image reaches the orchestrator.

use std::path::Path;

use base64::Engine;
use tracing::debug;

use crate::error::HeadshotError;

/// A validated source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME type, always `image/*`.
    pub mime_type: String,
}

impl SourceImage {
    /// Load and decode an image file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`HeadshotError::InvalidImage`] if it is not a decodable image.
    pub fn load(path: &Path) -> Result<Self, HeadshotError> {
        let data = std::fs::read(path)?;
        Self::decode(data, &path.display().to_string())
    }

    /// Sniff and fully decode `data`; `source` names it in errors.
    fn decode(data: Vec<u8>, source: &str) -> Result<Self, HeadshotError> {
        let format = image::guess_format(&data)
            .map_err(|_| HeadshotError::InvalidImage(format!("{source} is not an image file")))?;
        let decoded = image::load_from_memory_with_format(&data, format)
            .map_err(|e| HeadshotError::InvalidImage(format!("Failed to decode {source}: {e}")))?;
        debug!(
            source,
            width = decoded.width(),
            height = decoded.height(),
            "Loaded source image"
        );
        Ok(Self { data, mime_type: format.to_mime_type().to_string() })
    }

    /// Accept base64 data with its MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`HeadshotError::InvalidImage`] for non-image MIME types,
    /// undecodable base64, or bytes that do not decode as an image. The
    /// sniffed format's MIME type replaces the declared one.
    pub fn from_base64(data: &str, mime_type: &str) -> Result<Self, HeadshotError> {
        if !mime_type.starts_with("image/") {
            return Err(HeadshotError::InvalidImage(format!(
                "Please upload an image file (got {mime_type})"
            )));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| HeadshotError::InvalidImage(format!("Invalid base64 data: {e}")))?;
        if bytes.is_empty() {
            return Err(HeadshotError::InvalidImage("Image data is empty".into()));
        }
        let image = Self::decode(bytes, "uploaded data")?;
        if image.mime_type != mime_type {
            debug!(declared = mime_type, sniffed = %image.mime_type, "Upload MIME type corrected");
        }
        Ok(image)
    }

    /// Accept a `data:<mime>;base64,<data>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`HeadshotError::InvalidImage`] if the URL is not a base64
    /// image data URL.
    pub fn from_data_url(url: &str) -> Result<Self, HeadshotError> {
        let (mime_type, data) = url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .ok_or_else(|| HeadshotError::InvalidImage("Not a base64 data URL".into()))?;
        Self::from_base64(data, mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(2, 3);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn load_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selfie.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let image = SourceImage::load(&path).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, png_bytes());
    }

    #[test]
    fn load_rejects_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(matches!(SourceImage::load(&path), Err(HeadshotError::InvalidImage(_))));
    }

    #[test]
    fn load_rejects_truncated_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, &png_bytes()[..20]).unwrap();
        assert!(matches!(SourceImage::load(&path), Err(HeadshotError::InvalidImage(_))));
    }

    #[test]
    fn load_missing_file_is_io() {
        assert!(matches!(
            SourceImage::load(Path::new("/nonexistent/selfie.jpg")),
            Err(HeadshotError::Io(_))
        ));
    }

    fn png_base64() -> String {
        base64::engine::general_purpose::STANDARD.encode(png_bytes())
    }

    #[test]
    fn from_base64_checks_mime() {
        assert!(SourceImage::from_base64(&png_base64(), "image/png").is_ok());
        assert!(SourceImage::from_base64(&png_base64(), "application/pdf").is_err());
        assert!(SourceImage::from_base64("***", "image/jpeg").is_err());
        assert!(SourceImage::from_base64("", "image/jpeg").is_err());
    }

    #[test]
    fn from_base64_decodes_like_load() {
        // Valid base64 of bytes that are not an image.
        assert!(matches!(
            SourceImage::from_base64("AQID", "image/jpeg"),
            Err(HeadshotError::InvalidImage(_))
        ));
        let truncated = base64::engine::general_purpose::STANDARD.encode(&png_bytes()[..20]);
        assert!(matches!(
            SourceImage::from_base64(&truncated, "image/png"),
            Err(HeadshotError::InvalidImage(_))
        ));
    }

    #[test]
    fn from_base64_reports_sniffed_mime() {
        let image = SourceImage::from_base64(&png_base64(), "image/jpeg").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, png_bytes());
    }

    #[test]
    fn from_data_url_splits_mime_and_data() {
        let url = format!("data:image/png;base64,{}", png_base64());
        let image = SourceImage::from_data_url(&url).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, png_bytes());
        assert!(SourceImage::from_data_url("https://example.com/a.png").is_err());
        assert!(SourceImage::from_data_url("data:image/webp;base64,AQID").is_err());
    }
}
