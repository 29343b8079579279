//! Parameter parsing and validation for CLI and config values.

use crate::catalog::{Background, Gender};
use crate::error::HeadshotError;

/// Parse a gender tag.
///
/// # Errors
///
/// Returns an error if the tag is not `male` or `female`.
pub fn parse_gender(value: &str) -> Result<Gender, HeadshotError> {
    value.parse().map_err(HeadshotError::InvalidArgument)
}

/// Parse a background tag.
///
/// # Errors
///
/// Returns an error if the tag names no preset.
pub fn parse_background(value: &str) -> Result<Background, HeadshotError> {
    value.parse::<Background>().map_err(|e| match e {
        HeadshotError::Configuration(msg) => HeadshotError::InvalidArgument(msg),
        other => other,
    })
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        // png and any unknown format default to png
        _ => "png",
    }
}
