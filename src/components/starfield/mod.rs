//! Animated star field background.
//!
//! Renders a depth-layered field of stars on an HTML canvas with:
//! - Banded, depth-tiered star generation from a seedable random source
//! - Per-star twinkle, phase-offset so stars never pulse in lockstep
//! - Pointer parallax smoothed by a low-pass filter (desktop viewports only)
//! - Device-pixel-correct sizing, capped at 2x
//!
//! # Example
//!
//! ```ignore
//! use starfield::{StarfieldCanvas, StarfieldConfig};
//!
//! view! { <StarfieldCanvas config=StarfieldConfig::default() /> }
//! ```
//!
//! The engine itself is independent of the DOM: [`StarfieldEngine`] drives any
//! [`Surface`] with any [`FrameScheduler`].

mod component;
pub mod config;
mod error;
pub mod particles;
mod render;
pub mod scale;
mod state;
mod surface;
pub mod theme;

#[cfg(test)]
mod testing;

pub use component::StarfieldCanvas;
pub use config::StarfieldConfig;
pub use error::StarfieldError;
pub use particles::{Particle, ParticleField};
pub use render::Bounds;
pub use state::{LoopState, PointerState, StarfieldEngine};
pub use surface::{AnimationFrameScheduler, CanvasSurface, FrameHandle, FrameScheduler, Surface};
pub use theme::Theme;
