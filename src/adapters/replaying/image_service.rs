//! Replaying adapter for the `ImageService` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::{ServiceError, ServiceErrorKind};
use crate::ports::image_service::{EditRequest, ImageArtifact, ImageService, SubmitFuture};

/// Serves recorded image service results from a cassette.
pub struct ReplayingImageService {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageService {
    /// Create a replaying service backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageService for ReplayingImageService {
    fn submit(&self, _request: &EditRequest) -> SubmitFuture<'_> {
        let replayed = next_output(&self.replayer, "image_service", "submit")
            .and_then(replay_result::<ImageArtifact, ServiceError>);
        Box::pin(async move {
            replayed.unwrap_or_else(|e| {
                Err(ServiceError::new(ServiceErrorKind::MalformedResponse, format!("Replay: {e}")))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ports::image_service::HEADSHOT_ASPECT_RATIO;
    use chrono::Utc;
    use serde_json::json;

    fn service(outputs: Vec<serde_json::Value>) -> ReplayingImageService {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "image_service".into(),
                method: "submit".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette =
            Cassette { name: "t".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions };
        ReplayingImageService::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    fn request() -> EditRequest {
        EditRequest {
            model: "gemini-2.5-flash-image".into(),
            image: vec![],
            mime_type: "image/png".into(),
            instruction: String::new(),
            aspect_ratio: HEADSHOT_ASPECT_RATIO.into(),
        }
    }

    #[tokio::test]
    async fn replays_ok_then_err_then_runs_dry() {
        let service = service(vec![
            json!({"Ok": {"data": "AQID", "mime_type": "image/png"}}),
            json!({"Err": {"kind": "NoImageReturned", "message": "No image generated"}}),
        ]);

        let artifact = service.submit(&request()).await.unwrap();
        assert_eq!(artifact.data, vec![1, 2, 3]);

        let err = service.submit(&request()).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::NoImageReturned);

        let err = service.submit(&request()).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MalformedResponse);
        assert!(err.message.contains("Cassette exhausted"));
    }

    #[tokio::test]
    async fn unreadable_output_is_malformed() {
        let service = service(vec![json!({"Ok": {"unexpected": true}})]);
        let err = service.submit(&request()).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::MalformedResponse);
    }
}
