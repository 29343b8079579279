//! Live adapter for the Gemini image editing API.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ServiceError, ServiceErrorKind};
use crate::ports::image_service::{EditRequest, ImageArtifact, ImageService, SubmitFuture};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini image service that calls the Google AI API.
pub struct GeminiImageService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiImageService {
    /// Create a new Gemini service. A missing key is reported on submit.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self { client: Client::new(), api_key, base_url: GEMINI_API_BASE.to_string() }
    }
}

impl ImageService for GeminiImageService {
    fn submit(&self, request: &EditRequest) -> SubmitFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let Some(api_key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
                return Err(ServiceError::missing_credential());
            };

            let url = format!("{}/{}:generateContent", self.base_url, request.model);
            let encoded = base64::engine::general_purpose::STANDARD.encode(&request.image);

            let body = serde_json::json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"data": encoded, "mimeType": request.mime_type}},
                        {"text": request.instruction}
                    ]
                }],
                "generationConfig": {
                    "imageConfig": {
                        "aspectRatio": request.aspect_ratio,
                    }
                }
            });

            debug!(model = %request.model, bytes = request.image.len(), "Submitting edit request");

            let response =
                self.client.post(&url).header("x-goog-api-key", api_key).json(&body).send().await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(ServiceError::new(
                    ServiceErrorKind::TransportFailure,
                    format!("API error ({}): {}", status.as_u16(), truncate(&response_text)),
                ));
            }

            extract_image(&response_text)
        })
    }
}

/// Pull the first inline image out of a `generateContent` response body.
///
/// # Errors
///
/// Returns `MalformedResponse` if the body is not a valid response or the
/// image data is not base64, and `NoImageReturned` if no part carries an image.
pub fn extract_image(response_text: &str) -> Result<ImageArtifact, ServiceError> {
    let parsed: GeminiResponse = serde_json::from_str(response_text).map_err(|e| {
        ServiceError::new(
            ServiceErrorKind::MalformedResponse,
            format!("Failed to parse response: {e}"),
        )
    })?;

    let parts = parsed.candidates.into_iter().filter_map(|c| c.content).flat_map(|c| c.parts);

    let mut texts = Vec::new();
    for part in parts {
        if let Some(inline) = part.inline_data.filter(|i| !i.data.is_empty()) {
            let data =
                base64::engine::general_purpose::STANDARD.decode(&inline.data).map_err(|e| {
                    ServiceError::new(
                        ServiceErrorKind::MalformedResponse,
                        format!("Failed to decode base64: {e}"),
                    )
                })?;
            return Ok(ImageArtifact { data, mime_type: inline.mime_type });
        }
        if let Some(text) = part.text {
            texts.push(text);
        }
    }

    let message = if texts.is_empty() {
        "No image generated in the response.".to_string()
    } else {
        format!("No image generated in the response. Model said: {}", truncate(&texts.join(" ")))
    };
    Err(ServiceError::new(ServiceErrorKind::NoImageReturned, message))
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 500;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_service::HEADSHOT_ASPECT_RATIO;

    #[test]
    fn first_inline_image_wins() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here you go"},
            {"inlineData":{"mimeType":"image/png","data":"AQID"}},
            {"inlineData":{"mimeType":"image/jpeg","data":"BAUG"}}
        ]}}]}"#;
        let artifact = extract_image(body).unwrap();
        assert_eq!(artifact.data, vec![1, 2, 3]);
        assert_eq!(artifact.mime_type, "image/png");
    }

    #[test]
    fn text_only_response_is_no_image() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"I can't edit that photo."}]}}]}"#;
        let err = extract_image(body).unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::NoImageReturned);
        assert!(err.message.contains("I can't edit that photo."));
    }

    #[test]
    fn blocked_prompt_without_candidates_is_no_image() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(extract_image(body).unwrap_err().kind, ServiceErrorKind::NoImageReturned);
    }

    #[test]
    fn empty_inline_data_is_skipped() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"inlineData":{"mimeType":"image/png","data":""}}
        ]}}]}"#;
        assert_eq!(extract_image(body).unwrap_err().kind, ServiceErrorKind::NoImageReturned);
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert_eq!(
            extract_image("<html>502</html>").unwrap_err().kind,
            ServiceErrorKind::MalformedResponse
        );
    }

    #[test]
    fn bad_base64_is_malformed() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"inlineData":{"mimeType":"image/png","data":"!!not base64!!"}}
        ]}}]}"#;
        assert_eq!(extract_image(body).unwrap_err().kind, ServiceErrorKind::MalformedResponse);
    }

    #[test]
    fn truncate_long_text() {
        let long = "x".repeat(600);
        let short = truncate(&long);
        assert_eq!(short.len(), 503);
        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let mut service = GeminiImageService::new(None);
        // Unroutable: any dispatch attempt would surface as a transport failure.
        service.base_url = "http://127.0.0.1:9".into();
        let request = EditRequest {
            model: "gemini-2.5-flash-image".into(),
            image: vec![1],
            mime_type: "image/png".into(),
            instruction: "x".into(),
            aspect_ratio: HEADSHOT_ASPECT_RATIO.into(),
        };
        let err = service.submit(&request).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MissingCredential);

        service.api_key = Some(String::new());
        let err = service.submit(&request).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MissingCredential);
    }
}
