//! Recording adapter for the `ImageService` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_service::{EditRequest, ImageService, SubmitFuture};

/// Records image service interactions while delegating to an inner implementation.
pub struct RecordingImageService {
    inner: Box<dyn ImageService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageService {
    /// Creates a new recording service wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageService for RecordingImageService {
    fn submit(&self, request: &EditRequest) -> SubmitFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.submit(&request_clone).await;
            record_result(&recorder, "image_service", "submit", &request_clone, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, ServiceErrorKind};
    use crate::ports::image_service::{ImageArtifact, HEADSHOT_ASPECT_RATIO};

    struct Fixed(Result<ImageArtifact, ServiceError>);

    impl ImageService for Fixed {
        fn submit(&self, _request: &EditRequest) -> SubmitFuture<'_> {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    fn request() -> EditRequest {
        EditRequest {
            model: "gemini-2.5-flash-image".into(),
            image: vec![9, 9],
            mime_type: "image/png".into(),
            instruction: "formal".into(),
            aspect_ratio: HEADSHOT_ASPECT_RATIO.into(),
        }
    }

    #[tokio::test]
    async fn records_ok_and_err_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_service.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "abc")));

        let ok = RecordingImageService::new(
            Box::new(Fixed(Ok(ImageArtifact { data: vec![1], mime_type: "image/png".into() }))),
            Arc::clone(&recorder),
        );
        assert!(ok.submit(&request()).await.is_ok());

        let err = RecordingImageService::new(
            Box::new(Fixed(Err(ServiceError::new(ServiceErrorKind::NoImageReturned, "none")))),
            Arc::clone(&recorder),
        );
        assert!(err.submit(&request()).await.is_err());

        drop(ok);
        drop(err);
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("image_service"));
        assert!(content.contains("formal"));
        assert!(content.contains("NoImageReturned"));
    }
}
