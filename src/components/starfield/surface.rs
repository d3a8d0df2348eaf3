//! Drawing surface and frame scheduling seams.
//!
//! The engine only talks to these traits. In the browser they are backed by an
//! HTML canvas 2D context and `requestAnimationFrame`; tests substitute
//! recording doubles.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::error::StarfieldError;
use super::scale::Viewport;

/// A 2D surface the star field draws onto.
pub trait Surface {
	/// Current browser viewport (logical size and device pixel ratio).
	fn viewport(&self) -> Viewport;
	/// Size the surface occupies in layout, in logical pixels.
	fn display_size(&self) -> (f64, f64);
	/// Resize the physical backing store.
	fn set_backing_size(&mut self, width: u32, height: u32);
	/// Replace (not compose) the context scale.
	fn set_scale(&mut self, scale: f64);
	/// Clear a logical-space rectangle anchored at the origin.
	fn clear(&mut self, width: f64, height: f64);
	/// Fill a circle with a CSS color.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, style: &str);
}

/// Token identifying one pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Source of per-frame callbacks.
pub trait FrameScheduler {
	/// Ask for the frame callback to run once on the next frame.
	fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError>;
	/// Revoke a pending request. Unknown or already-fired handles are ignored.
	fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Canvas-backed [`Surface`].
pub struct CanvasSurface {
	window: Window,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Bind to a canvas, failing when no 2D context can be created.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, StarfieldError> {
		let window = web_sys::window().ok_or(StarfieldError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| StarfieldError::ContextUnavailable(format!("{:?}", e)))?
			.ok_or_else(|| StarfieldError::ContextUnavailable("canvas returned no context".into()))?
			.dyn_into()
			.map_err(|_| StarfieldError::ContextUnavailable("not a 2d context".into()))?;

		Ok(Self {
			window,
			canvas,
			ctx,
		})
	}

	pub fn window(&self) -> &Window {
		&self.window
	}
}

impl Surface for CanvasSurface {
	fn viewport(&self) -> Viewport {
		let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		Viewport {
			width: extent(self.window.inner_width()),
			height: extent(self.window.inner_height()),
			device_pixel_ratio: self.window.device_pixel_ratio(),
		}
	}

	fn display_size(&self) -> (f64, f64) {
		(
			self.canvas.client_width() as f64,
			self.canvas.client_height() as f64,
		)
	}

	fn set_backing_size(&mut self, width: u32, height: u32) {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
	}

	fn set_scale(&mut self, scale: f64) {
		let _ = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0);
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, style: &str) {
		self.ctx.set_fill_style_str(style);
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
	}
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
///
/// Clones share the installed callback, so the callback itself can hold a
/// clone and reschedule. That forms an `Rc` cycle which [`uninstall`] breaks.
///
/// [`uninstall`]: AnimationFrameScheduler::uninstall
#[derive(Clone)]
pub struct AnimationFrameScheduler {
	window: Window,
	callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrameScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			callback: Rc::new(RefCell::new(None)),
		}
	}

	/// Set the closure run on every requested frame. It receives the
	/// high-resolution frame timestamp in milliseconds.
	pub fn install(&self, callback: FrameCallback) {
		*self.callback.borrow_mut() = Some(callback);
	}

	/// Drop the frame closure.
	pub fn uninstall(&self) {
		self.callback.borrow_mut().take();
	}
}

impl FrameScheduler for AnimationFrameScheduler {
	fn request_frame(&mut self) -> Result<FrameHandle, StarfieldError> {
		let callback = self.callback.borrow();
		let cb = callback
			.as_ref()
			.ok_or_else(|| StarfieldError::Schedule("no frame callback installed".into()))?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map(FrameHandle)
			.map_err(|e| StarfieldError::Schedule(format!("{:?}", e)))
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}
