//! Unified error types for headshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while preparing or running a generation.
#[derive(Debug, Error)]
pub enum HeadshotError {
    /// The outfit/background catalog could not satisfy a lookup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The daily generation allowance is used up.
    #[error(
        "Daily limit reached: you have used all {limit} free generations for today. \
         Please come back tomorrow."
    )]
    QuotaExceeded {
        /// The daily limit that was hit.
        limit: u32,
    },

    /// The image service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The uploaded source is not a usable image.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),
}

/// Failure categories reported by the image service adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceErrorKind {
    /// No API key was available; nothing was sent.
    MissingCredential,
    /// The service answered but returned no inline image.
    NoImageReturned,
    /// The request could not be delivered or the service rejected it.
    TransportFailure,
    /// The response body could not be interpreted.
    MalformedResponse,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingCredential => "missing credential",
            Self::NoImageReturned => "no image returned",
            Self::TransportFailure => "transport failure",
            Self::MalformedResponse => "malformed response",
        };
        f.write_str(label)
    }
}

/// An image service failure with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    /// What went wrong.
    pub kind: ServiceErrorKind,
    /// Message suitable for showing to the user.
    pub message: String,
}

impl ServiceError {
    /// Create a service error of the given kind.
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// The credential was not configured.
    #[must_use]
    pub fn missing_credential() -> Self {
        Self::new(
            ServiceErrorKind::MissingCredential,
            "API key is missing. Set GEMINI_API_KEY (or API_KEY) or add it to the config file.",
        )
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(ServiceErrorKind::TransportFailure, format!("Network error: {e}"))
    }
}
