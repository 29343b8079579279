//! Image service port for AI image editing APIs.

use std::future::Future;
use std::pin::Pin;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Aspect ratio requested for every headshot.
pub const HEADSHOT_ASPECT_RATIO: &str = "3:4";

/// A request to edit a source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// The resolved model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// Raw source image bytes.
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,
    /// MIME type of the source image.
    pub mime_type: String,
    /// The assembled instruction payload.
    pub instruction: String,
    /// Desired aspect ratio of the output.
    pub aspect_ratio: String,
}

/// An image returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

impl ImageArtifact {
    /// Render as a `data:` URL for display.
    #[must_use]
    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.data);
        format!("data:{};base64,{encoded}", self.mime_type)
    }
}

/// Boxed future type returned by [`ImageService::submit`].
pub type SubmitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageArtifact, ServiceError>> + Send + 'a>>;

/// Edits images according to an instruction via an external API.
pub trait ImageService: Send + Sync {
    /// Submit an edit request and return the first image produced.
    fn submit(&self, request: &EditRequest) -> SubmitFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_uses_returned_mime_type() {
        let artifact = ImageArtifact { data: vec![1, 2, 3], mime_type: "image/jpeg".into() };
        assert_eq!(artifact.data_url(), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn edit_request_serializes_image_as_base64() {
        let request = EditRequest {
            model: "gemini-2.5-flash-image".into(),
            image: vec![0xFF, 0xD8, 0xFF, 0xE0], // JPEG magic bytes
            mime_type: "image/jpeg".into(),
            instruction: "make it formal".into(),
            aspect_ratio: HEADSHOT_ASPECT_RATIO.into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"], "/9j/4A==");
        let back: EditRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.image, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(back.aspect_ratio, "3:4");
    }
}
