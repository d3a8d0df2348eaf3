//! Star generation and per-star twinkle.
//!
//! The field is generated once per mounted surface and never changes size
//! afterwards. Only the renderer's read of the frame timestamp and the pointer
//! smoothing evolve between frames.

use std::f64::consts::TAU;
use std::ops::Range;

use fastrand::Rng;

use super::config::{StarfieldConfig, TwinkleConfig};
use super::theme::{Hsl, StarPalette};

/// Twinkle speed multipliers are drawn from this range.
const TWINKLE_SPEED: Range<f64> = 0.5..2.0;

/// Depth layer a star falls into, which fixes its size and brightness range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthTier {
	/// `z < 0.3`
	Near,
	/// `0.3 <= z < 0.7`
	Mid,
	/// `z >= 0.7`
	Far,
}

impl DepthTier {
	pub fn from_depth(z: f64) -> Self {
		if z < 0.3 {
			DepthTier::Near
		} else if z < 0.7 {
			DepthTier::Mid
		} else {
			DepthTier::Far
		}
	}

	/// Draw radius range in pixels.
	pub fn size_range(self) -> Range<f64> {
		match self {
			DepthTier::Near => 2.5..4.0,
			DepthTier::Mid => 1.5..2.5,
			DepthTier::Far => 0.8..1.5,
		}
	}

	/// Resting opacity range.
	pub fn opacity_range(self) -> Range<f64> {
		match self {
			DepthTier::Near => 0.8..1.0,
			DepthTier::Mid => 0.5..0.8,
			DepthTier::Far => 0.2..0.5,
		}
	}
}

/// A single star. Immutable after generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Normalized horizontal position in `[0, 1]`.
	pub x: f64,
	/// Normalized vertical position in `[0, 1]`.
	pub y: f64,
	/// Depth in `[0, 1]`, 0 nearest.
	pub z: f64,
	pub size: f64,
	pub color: Hsl,
	pub base_opacity: f64,
	pub twinkle_phase: f64, // [0, TAU)
	pub twinkle_speed: f64,
}

impl Particle {
	pub fn tier(&self) -> DepthTier {
		DepthTier::from_depth(self.z)
	}

	/// Opacity at frame time `time` (ms).
	///
	/// With the default constants this stays within
	/// `[0.4, 1.0] * base_opacity`.
	pub fn twinkle_opacity(&self, time: f64, twinkle: &TwinkleConfig) -> f64 {
		let factor = (time * twinkle.rate * self.twinkle_speed + self.twinkle_phase).sin();
		self.base_opacity * (twinkle.base + factor * twinkle.amplitude)
	}
}

fn uniform(rng: &mut Rng, range: Range<f64>) -> f64 {
	range.start + rng.f64() * (range.end - range.start)
}

/// The fixed collection of stars for one surface.
#[derive(Clone, Debug)]
pub struct ParticleField {
	particles: Vec<Particle>,
}

impl ParticleField {
	/// Generate the field for a viewport of the given logical width.
	///
	/// Pure in the viewport width and the random source; nothing here touches
	/// the drawing surface.
	pub fn generate(
		viewport_width: f64,
		config: &StarfieldConfig,
		palette: &StarPalette,
		rng: &mut Rng,
	) -> Self {
		let count = config.particle_count(viewport_width);
		let mut particles = Vec::with_capacity(count);

		for _ in 0..count {
			// Band placement biases stars towards a horizontal strip
			let y = if rng.f64() < config.band_probability {
				uniform(rng, config.band.0..config.band.1)
			} else {
				rng.f64()
			};

			let z = rng.f64();
			let tier = DepthTier::from_depth(z);
			let size = uniform(rng, tier.size_range());
			let base_opacity = uniform(rng, tier.opacity_range());
			let color = palette.pick(rng.f64());

			particles.push(Particle {
				x: rng.f64(),
				y,
				z,
				size,
				color,
				base_opacity,
				twinkle_phase: rng.f64() * TAU,
				twinkle_speed: uniform(rng, TWINKLE_SPEED),
			});
		}

		Self { particles }
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}
