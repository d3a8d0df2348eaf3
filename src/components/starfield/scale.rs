//! Device-pixel scaling for the drawing surface.
//!
//! # Coordinate Spaces
//!
//! - **Logical**: CSS pixels, as reported by layout (`clientWidth`, viewport
//!   size, pointer events). All star positions are computed in this space.
//! - **Backing**: physical pixels of the canvas backing store. The backing
//!   store is `logical * scale`, and the drawing context is scaled by the same
//!   factor so that logical coordinates land on the right physical pixels.
//!
//! The scale is the device pixel ratio capped at a configured maximum (2x by
//! default) to bound memory and fill cost on very dense displays.

/// Browser viewport in logical pixels plus its device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub device_pixel_ratio: f64,
}

impl Viewport {
	/// Normalize a client-space pointer position to `[-1, 1]` on each axis.
	///
	/// Returns `None` when the viewport has no area to normalize against.
	pub fn normalize_pointer(&self, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
		if self.width <= 0.0 || self.height <= 0.0 {
			return None;
		}
		Some((
			(client_x / self.width) * 2.0 - 1.0,
			(client_y / self.height) * 2.0 - 1.0,
		))
	}
}

/// Clamp a reported device pixel ratio to `[.., max]`.
///
/// Missing or nonsensical ratios (zero, negative, NaN) are treated as 1.
pub fn clamp_device_pixel_ratio(ratio: f64, max: f64) -> f64 {
	let ratio = if ratio.is_finite() && ratio > 0.0 {
		ratio
	} else {
		1.0
	};
	ratio.min(max)
}

/// Backing store dimensions and context scale produced by a resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackingStore {
	pub width: u32,
	pub height: u32,
	pub scale: f64,
	/// Logical size the scaled context addresses.
	pub logical_width: f64,
	pub logical_height: f64,
}

impl BackingStore {
	pub fn new(display_width: f64, display_height: f64, device_pixel_ratio: f64, max: f64) -> Self {
		let scale = clamp_device_pixel_ratio(device_pixel_ratio, max);
		let logical_width = display_width.max(0.0);
		let logical_height = display_height.max(0.0);
		Self {
			// Canvas dimensions truncate, as assigning a float to `canvas.width` does.
			width: (logical_width * scale) as u32,
			height: (logical_height * scale) as u32,
			scale,
			logical_width,
			logical_height,
		}
	}
}
