//! Failure kinds surfaced to the host page.

use thiserror::Error;

/// Errors raised while setting up or driving the star field.
///
/// None of these are retried: a missing context or window is a permanent
/// capability absence for the surface, and the host is expected to fall back
/// to a static presentation.
#[derive(Debug, Error)]
pub enum StarfieldError {
	#[error("no browser window available")]
	NoWindow,
	#[error("2d drawing context unavailable: {0}")]
	ContextUnavailable(String),
	#[error("failed to schedule animation frame: {0}")]
	Schedule(String),
	#[error("failed to register event listener: {0}")]
	Listener(String),
	#[error("invalid starfield config: {0}")]
	Config(#[from] serde_json::Error),
}
