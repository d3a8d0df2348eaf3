//! Recording doubles for driving the engine without a browser.

use super::error::StarfieldError;
use super::scale::Viewport;
use super::surface::{FrameHandle, FrameScheduler, Surface};

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
	Backing(u32, u32),
	Scale(f64),
	Clear(f64, f64),
	Circle(f64, f64, f64, String),
}

/// Surface that records every call. Display size follows the viewport.
pub struct RecordingSurface {
	pub viewport: Viewport,
	pub display: (f64, f64),
	pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
	pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
		Self {
			viewport: Viewport {
				width,
				height,
				device_pixel_ratio,
			},
			display: (width, height),
			ops: Vec::new(),
		}
	}

	pub fn set_viewport(&mut self, width: f64, height: f64) {
		self.viewport.width = width;
		self.viewport.height = height;
		self.display = (width, height);
	}

	pub fn circles(&self) -> Vec<(f64, f64, f64, String)> {
		self.ops
			.iter()
			.filter_map(|op| match op {
				SurfaceOp::Circle(x, y, r, style) => Some((*x, *y, *r, style.clone())),
				_ => None,
			})
			.collect()
	}

	pub fn last_backing(&self) -> Option<(u32, u32)> {
		self.ops.iter().rev().find_map(|op| match op {
			SurfaceOp::Backing(w, h) => Some((*w, *h)),
			_ => None,
		})
	}

	pub fn last_scale(&self) -> Option<f64> {
		self.ops.iter().rev().find_map(|op| match op {
			SurfaceOp::Scale(s) => Some(*s),
			_ => None,
		})
	}
}

impl Surface for RecordingSurface {
	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn display_size(&self) -> (f64, f64) {
		self.display
	}

	fn set_backing_size(&mut self, width: u32, height: u32) {
		self.ops.push(SurfaceOp::Backing(width, height));
	}

	fn set_scale(&mut self, scale: f64) {
		self.ops.push(SurfaceOp::Scale(scale));
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.ops.push(SurfaceOp::Clear(width, height));
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, style: &str) {
		self.ops
			.push(SurfaceOp::Circle(x, y, radius, style.to_string()));
	}
}

/// Scheduler that hands out sequential handles and tracks which are pending.
#[derive(Default)]
pub struct ManualScheduler {
	next: i32,
	pub pending: Vec<FrameHandle>,
	pub requested: usize,
	pub cancelled: Vec<FrameHandle>,
	pub fail: bool,
}

impl ManualScheduler {
	/// Consume the oldest pending request, as firing its callback would.
	pub fn fire(&mut self) -> Option<FrameHandle> {
		if self.pending.is_empty() {
			None
		} else {
			Some(self.pending.remove(0))
		}
	}
}

impl FrameScheduler for ManualScheduler {
	fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError> {
		if self.fail {
			return Err(StarfieldError::Schedule("scheduler unavailable".into()));
		}
		self.next += 1;
		self.requested += 1;
		let handle = FrameHandle(self.next);
		self.pending.push(handle);
		Ok(handle)
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		self.pending.retain(|h| *h != handle);
		self.cancelled.push(handle);
	}
}
