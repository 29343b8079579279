//! Generation orchestrator.
//!
//! Drives the [`machine`] with real collaborators: the quota tracker decides
//! whether a generate request is admitted, the prompt assembler builds the
//! payload from the current [`GenerationConfig`], and the image service runs
//! the request. Every state change is broadcast to subscribers, in order.

pub mod machine;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{HeadshotError, ServiceError};
use crate::ports::image_service::{EditRequest, HEADSHOT_ASPECT_RATIO};
use crate::ports::{ImageArtifact, ImageService};
use crate::prompt::assemble;
use crate::quota::{QuotaStore, QuotaTracker};
use crate::selection::GenerationConfig;
use crate::upload::SourceImage;

pub use machine::{Effect, Event, GenerationState, GenerationToken};

/// An admitted request waiting to be sent.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Token the response must be reported under.
    pub token: GenerationToken,
    /// Request for the image service.
    pub request: EditRequest,
}

/// Owns the generation state and the collaborators that move it.
pub struct Orchestrator<S> {
    config: GenerationConfig,
    quota: QuotaTracker<S>,
    service: Box<dyn ImageService>,
    model: String,
    issued: GenerationToken,
    state: GenerationState,
    changes: broadcast::Sender<GenerationState>,
}

/// Buffered state changes per subscriber before it starts lagging.
const STATE_CHANNEL_CAPACITY: usize = 32;

impl<S: QuotaStore> Orchestrator<S> {
    /// Create an idle orchestrator.
    pub fn new(
        config: GenerationConfig,
        quota: QuotaTracker<S>,
        service: Box<dyn ImageService>,
        model: impl Into<String>,
    ) -> Self {
        let (changes, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            config,
            quota,
            service,
            model: model.into(),
            issued: GenerationToken::default(),
            state: GenerationState::Idle,
            changes,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> GenerationState {
        self.state.clone()
    }

    /// Receive every subsequent state change, none skipped.
    ///
    /// The channel closes when the orchestrator is dropped.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationState> {
        self.changes.subscribe()
    }

    /// Current settings.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Settings, for changes between generations.
    pub fn config_mut(&mut self) -> &mut GenerationConfig {
        &mut self.config
    }

    /// The quota tracker.
    #[must_use]
    pub const fn quota(&self) -> &QuotaTracker<S> {
        &self.quota
    }

    /// Accept a decoded source image, replacing any previous one.
    pub fn load_image(&mut self, image: SourceImage) {
        self.step(Event::ImageLoaded(image));
    }

    /// Drop the source image; any in-flight response will be ignored.
    pub fn clear_image(&mut self) {
        self.step(Event::ImageCleared);
    }

    /// Ask to generate with the current settings.
    ///
    /// On admission the attempt is charged to `today` and the request to send
    /// is returned. Returns `Ok(None)` when there is no image or a request is
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`HeadshotError::QuotaExceeded`] if today's allowance is used up;
    /// the state is unchanged and nothing is charged.
    pub fn begin_generation(&mut self, today: &str) -> Result<Option<Dispatch>, HeadshotError> {
        let quota_available = self.quota.may_generate(today);
        let instruction = assemble(
            self.config.outfit(),
            self.config.background(),
            self.config.custom_instruction(),
        );

        let mut dispatch = None;
        for effect in self.step(Event::GenerateRequested { quota_available, instruction }) {
            match effect {
                Effect::RecordAttempt => self.quota.record_attempt(today),
                Effect::Submit { token, image, instruction } => {
                    dispatch = Some(Dispatch {
                        token,
                        request: EditRequest {
                            model: self.model.clone(),
                            image: image.data.clone(),
                            mime_type: image.mime_type.clone(),
                            instruction: instruction.into(),
                            aspect_ratio: HEADSHOT_ASPECT_RATIO.to_string(),
                        },
                    });
                }
                Effect::NotifyQuotaExceeded => {
                    info!("Daily limit of {} reached for {today}", self.quota.limit());
                    return Err(HeadshotError::QuotaExceeded { limit: self.quota.limit() });
                }
            }
        }
        Ok(dispatch)
    }

    /// Send an admitted request to the image service.
    pub async fn submit(&self, dispatch: &Dispatch) -> Result<ImageArtifact, ServiceError> {
        self.service.submit(&dispatch.request).await
    }

    /// Apply a service response; responses for superseded tokens are dropped.
    pub fn complete(&mut self, token: GenerationToken, result: Result<ImageArtifact, ServiceError>) {
        if let Err(ref e) = result {
            debug!(%token, kind = %e.kind, "Generation failed: {e}");
        }
        self.step(Event::ResponseReceived { token, result });
    }

    /// Generate (or regenerate) and wait for the outcome.
    ///
    /// Service failures end in [`GenerationState::Failed`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`HeadshotError::QuotaExceeded`] if today's allowance is used up.
    pub async fn generate(&mut self, today: &str) -> Result<GenerationState, HeadshotError> {
        if let Some(dispatch) = self.begin_generation(today)? {
            let result = self.submit(&dispatch).await;
            self.complete(dispatch.token, result);
        }
        Ok(self.state())
    }

    fn step(&mut self, event: Event) -> Vec<Effect> {
        let stale_token = match &event {
            Event::ResponseReceived { token, .. } => Some(*token),
            _ => None,
        };
        let transition = machine::transition(self.state.clone(), event, self.issued);
        self.issued = transition.issued;

        if transition.state == self.state {
            if let Some(token) = stale_token {
                debug!(%token, state = self.state.name(), "Discarding superseded response");
            }
        } else {
            debug!(from = self.state.name(), to = transition.state.name(), "State transition");
            self.state = transition.state;
            // No subscribers is not an error.
            let _ = self.changes.send(self.state.clone());
        }
        transition.effects
    }
}
