//! Per-frame projection and drawing of the star field.
//!
//! Each star is projected independently: its normalized base position is
//! stretched over the logical surface, displaced by the smoothed pointer in
//! proportion to its depth, and drawn with its current twinkle opacity.
//! Stars are drawn in generation order; there is no occlusion.

use super::config::TwinkleConfig;
use super::particles::Particle;
use super::surface::Surface;

/// Logical surface size stars are laid out against.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

/// Inputs shared by every star in one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams<'a> {
	pub bounds: Bounds,
	/// Smoothed pointer in `[-1, 1]`.
	pub pointer: (f64, f64),
	pub parallax_strength: f64,
	/// Frame timestamp in milliseconds.
	pub time: f64,
	pub twinkle: &'a TwinkleConfig,
}

/// Where and how a star lands on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedStar {
	pub x: f64,
	pub y: f64,
	pub offset_x: f64,
	pub offset_y: f64,
	pub radius: f64,
	pub opacity: f64,
}

/// Project one star for the current frame.
///
/// The parallax offset scales with `z` itself, so deeper stars shift further.
pub fn project(particle: &Particle, params: &FrameParams) -> ProjectedStar {
	let (mouse_x, mouse_y) = params.pointer;
	let offset_x = mouse_x * particle.z * params.parallax_strength;
	let offset_y = mouse_y * particle.z * params.parallax_strength;

	ProjectedStar {
		x: particle.x * params.bounds.width + offset_x,
		y: particle.y * params.bounds.height + offset_y,
		offset_x,
		offset_y,
		radius: particle.size,
		opacity: particle.twinkle_opacity(params.time, params.twinkle),
	}
}

/// Clear the surface and draw every star.
pub fn render<S: Surface>(surface: &mut S, particles: &[Particle], params: &FrameParams) {
	surface.clear(params.bounds.width, params.bounds.height);

	for p in particles {
		let star = project(p, params);
		surface.fill_circle(
			star.x,
			star.y,
			star.radius,
			&p.color.to_css_alpha(star.opacity),
		);
	}
}
