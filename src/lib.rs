//! Professional headshot generation.
//!
//! The core is the generation [`orchestrator`]: it enforces the daily
//! [`quota`], assembles the instruction [`prompt`] from the user's
//! [`selection`] of [`catalog`] entries, and sends the request through an
//! [`ports::ImageService`]. Front ends subscribe to its state changes.

pub mod adapters;
pub mod cassette;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod params;
pub mod ports;
pub mod prompt;
pub mod quota;
pub mod selection;
pub mod upload;
