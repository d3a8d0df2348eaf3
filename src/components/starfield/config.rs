//! Tunable star field parameters.
//!
//! Every field has a documented default; JSON overrides only need to name the
//! keys they change. Values are passed through [`StarfieldConfig::sanitized`]
//! before the engine uses them.

use serde::Deserialize;

use super::error::StarfieldError;

/// Upper bound on either star count, whatever the config asks for.
pub const MAX_PARTICLES: usize = 10_000;

/// Twinkle oscillation constants.
///
/// Opacity is `base_opacity * (base + sin(t * rate * speed + phase) * amplitude)`.
/// Sanitizing keeps `base - amplitude >= 0` and `base + amplitude <= 1`, so
/// opacity never leaves `[0, base_opacity]`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TwinkleConfig {
	/// Multiplier converting frame timestamps (ms) into oscillation radians.
	pub rate: f64,
	pub base: f64,
	pub amplitude: f64,
}

impl Default for TwinkleConfig {
	fn default() -> Self {
		Self {
			rate: 0.001,
			base: 0.7,
			amplitude: 0.3,
		}
	}
}

/// Star field configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
	/// Viewports strictly wider than this (CSS px) count as desktop.
	pub desktop_breakpoint: f64,
	pub desktop_count: usize,
	pub mobile_count: usize,
	/// Chance that a star is placed inside the horizontal band.
	pub band_probability: f64,
	/// Normalized vertical extent of the band.
	pub band: (f64, f64),
	/// Maximum parallax displacement on desktop (CSS px). Mobile uses 0.
	pub parallax_strength: f64,
	/// Fraction of the remaining pointer distance covered per frame.
	pub smoothing: f64,
	pub max_device_pixel_ratio: f64,
	pub twinkle: TwinkleConfig,
	/// Theme preset name.
	pub theme: String,
}

impl Default for StarfieldConfig {
	fn default() -> Self {
		Self {
			desktop_breakpoint: 768.0,
			desktop_count: 600,
			mobile_count: 200,
			band_probability: 0.4,
			band: (0.35, 0.65),
			parallax_strength: 60.0,
			smoothing: 0.08,
			max_device_pixel_ratio: 2.0,
			twinkle: TwinkleConfig::default(),
			theme: "default".to_string(),
		}
	}
}

impl StarfieldConfig {
	/// Parse a (possibly partial) JSON override.
	pub fn from_json(json: &str) -> Result<Self, StarfieldError> {
		Ok(serde_json::from_str::<Self>(json)?.sanitized())
	}

	/// Clamp values into the ranges the engine relies on.
	///
	/// Smoothing outside `[0, 1]` would overshoot or run away from the target.
	pub fn sanitized(mut self) -> Self {
		self.smoothing = finite_or(self.smoothing, 0.08).clamp(0.0, 1.0);
		self.max_device_pixel_ratio = finite_or(self.max_device_pixel_ratio, 2.0).max(1.0);
		self.band_probability = finite_or(self.band_probability, 0.4).clamp(0.0, 1.0);

		let lo = finite_or(self.band.0, 0.35).clamp(0.0, 1.0);
		let hi = finite_or(self.band.1, 0.65).clamp(0.0, 1.0);
		self.band = (lo.min(hi), lo.max(hi));

		self.desktop_count = self.desktop_count.min(MAX_PARTICLES);
		self.mobile_count = self.mobile_count.min(MAX_PARTICLES);

		self.parallax_strength = finite_or(self.parallax_strength, 60.0);
		self.twinkle.rate = finite_or(self.twinkle.rate, 0.001);
		let base = finite_or(self.twinkle.base, 0.7).clamp(0.0, 1.0);
		let amplitude = finite_or(self.twinkle.amplitude, 0.3).max(0.0);
		self.twinkle.base = base;
		self.twinkle.amplitude = amplitude.min(base).min(1.0 - base);
		self
	}

	pub fn is_desktop(&self, viewport_width: f64) -> bool {
		viewport_width > self.desktop_breakpoint
	}

	/// Number of stars generated for a viewport of this width.
	pub fn particle_count(&self, viewport_width: f64) -> usize {
		if self.is_desktop(viewport_width) {
			self.desktop_count
		} else {
			self.mobile_count
		}
	}

	/// Parallax displacement, disabled on narrow viewports.
	pub fn parallax_for(&self, viewport_width: f64) -> f64 {
		if self.is_desktop(viewport_width) {
			self.parallax_strength
		} else {
			0.0
		}
	}
}

fn finite_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() { value } else { fallback }
}
