//! Pure generation state machine.
//!
//! [`transition`] takes the current state and an event and returns the next
//! state plus the effects the caller must perform. It never touches storage
//! or the network itself.

use std::fmt;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::ports::ImageArtifact;
use crate::prompt::InstructionPayload;
use crate::upload::SourceImage;

/// Identifies one entry into [`GenerationState::Generating`].
///
/// Tokens only ever increase; a response is applied only if its token
/// matches the state's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct GenerationToken(u64);

impl GenerationToken {
    /// The token minted after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Client-visible generation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    /// No source image.
    #[default]
    Idle,
    /// Source image present, nothing generated yet.
    Ready {
        /// The source image.
        image: Arc<SourceImage>,
    },
    /// A request is in flight.
    Generating {
        /// The source image.
        image: Arc<SourceImage>,
        /// Token of the live request.
        token: GenerationToken,
    },
    /// The last request produced an image.
    Succeeded {
        /// The source image.
        image: Arc<SourceImage>,
        /// The generated headshot.
        artifact: Arc<ImageArtifact>,
    },
    /// The last request failed.
    Failed {
        /// The source image.
        image: Arc<SourceImage>,
        /// Why it failed.
        error: ServiceError,
    },
}

impl GenerationState {
    /// The source image, if one is loaded.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<SourceImage>> {
        match self {
            Self::Idle => None,
            Self::Ready { image }
            | Self::Generating { image, .. }
            | Self::Succeeded { image, .. }
            | Self::Failed { image, .. } => Some(image),
        }
    }

    /// Whether a generate request would be accepted (subject to quota).
    #[must_use]
    pub const fn can_generate(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// Short state name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready { .. } => "ready",
            Self::Generating { .. } => "generating",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum Event {
    /// A new source image finished decoding.
    ImageLoaded(SourceImage),
    /// The user removed the source image.
    ImageCleared,
    /// The user asked to generate (or regenerate).
    GenerateRequested {
        /// Whether the quota tracker allows another attempt.
        quota_available: bool,
        /// Payload assembled from the current settings.
        instruction: InstructionPayload,
    },
    /// The image service answered.
    ResponseReceived {
        /// Token the request was dispatched with.
        token: GenerationToken,
        /// What the service returned.
        result: Result<ImageArtifact, ServiceError>,
    },
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Charge one attempt against today's quota.
    RecordAttempt,
    /// Send the image and instruction to the image service.
    Submit {
        /// Token to report the response under.
        token: GenerationToken,
        /// Image to edit.
        image: Arc<SourceImage>,
        /// Instruction payload.
        instruction: InstructionPayload,
    },
    /// Tell the user the daily limit is reached.
    NotifyQuotaExceeded,
}

/// Result of a [`transition`].
#[derive(Debug)]
pub struct Transition {
    /// The next state.
    pub state: GenerationState,
    /// Effects to perform, in order.
    pub effects: Vec<Effect>,
    /// Latest token minted so far.
    pub issued: GenerationToken,
}

impl Transition {
    fn stay(state: GenerationState, issued: GenerationToken) -> Self {
        Self { state, effects: Vec::new(), issued }
    }
}

/// Advance `state` by `event`. `issued` is the last token handed out.
#[must_use]
pub fn transition(state: GenerationState, event: Event, issued: GenerationToken) -> Transition {
    match event {
        Event::ImageLoaded(image) => {
            Transition::stay(GenerationState::Ready { image: Arc::new(image) }, issued)
        }
        Event::ImageCleared => Transition::stay(GenerationState::Idle, issued),
        Event::GenerateRequested { quota_available, instruction } => {
            if !state.can_generate() {
                return Transition::stay(state, issued);
            }
            if !quota_available {
                return Transition {
                    state,
                    effects: vec![Effect::NotifyQuotaExceeded],
                    issued,
                };
            }
            let Some(image) = state.image().cloned() else {
                return Transition::stay(state, issued);
            };
            let token = issued.next();
            Transition {
                state: GenerationState::Generating { image: Arc::clone(&image), token },
                effects: vec![
                    Effect::RecordAttempt,
                    Effect::Submit { token, image, instruction },
                ],
                issued: token,
            }
        }
        Event::ResponseReceived { token, result } => match state {
            GenerationState::Generating { image, token: live } if live == token => {
                let state = match result {
                    Ok(artifact) => GenerationState::Succeeded { image, artifact: Arc::new(artifact) },
                    Err(error) => GenerationState::Failed { image, error },
                };
                Transition::stay(state, issued)
            }
            stale => Transition::stay(stale, issued),
        },
    }
}
