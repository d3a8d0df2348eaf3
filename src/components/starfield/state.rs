//! Engine state: pointer smoothing, the frame loop state machine, and the
//! engine tying them to a surface.
//!
//! The loop is either idle or running. Running always carries the handle of
//! the one pending frame request, so stopping is a matter of revoking that
//! handle, and a callback that still fires after a stop finds the engine idle
//! and draws nothing.

use fastrand::Rng;
use log::{debug, info, warn};

use super::config::StarfieldConfig;
use super::error::StarfieldError;
use super::particles::{Particle, ParticleField};
use super::render::{self, Bounds, FrameParams};
use super::scale::BackingStore;
use super::surface::{FrameHandle, FrameScheduler, Surface};
use super::theme::Theme;

/// Pointer position in normalized `[-1, 1]` space.
///
/// Events only move the target. The displayed position follows it by a fixed
/// fraction per frame, a first-order low-pass filter, so bursts of events
/// between two frames coalesce for free.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerState {
	/// Smoothed position used for drawing.
	pub x: f64,
	pub y: f64,
	/// Latest raw position.
	pub target_x: f64,
	pub target_y: f64,
}

impl PointerState {
	pub fn set_target(&mut self, x: f64, y: f64) {
		self.target_x = x;
		self.target_y = y;
	}

	/// Advance one frame: `value += (target - value) * factor`.
	///
	/// With `factor` in `[0, 1]` the position never overshoots the target.
	pub fn step(&mut self, factor: f64) {
		self.x += (self.target_x - self.x) * factor;
		self.y += (self.target_y - self.y) * factor;
	}
}

/// Frame loop state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	Idle,
	/// A frame is scheduled under this handle.
	Running(FrameHandle),
}

/// Star field bound to one drawing surface.
///
/// Created once per mounted surface. The particle field is generated here and
/// stays fixed for the engine's lifetime.
pub struct StarfieldEngine<S: Surface> {
	surface: S,
	config: StarfieldConfig,
	theme: Theme,
	field: ParticleField,
	pointer: PointerState,
	bounds: Bounds,
	state: LoopState,
}

impl<S: Surface> StarfieldEngine<S> {
	pub fn new(surface: S, config: StarfieldConfig, theme: Theme, rng: &mut Rng) -> Self {
		let config = config.sanitized();
		let viewport = surface.viewport();
		let field = ParticleField::generate(viewport.width, &config, &theme.palette, rng);
		let (width, height) = surface.display_size();

		info!(
			"starfield: generated {} stars for {}px viewport (theme {})",
			field.len(),
			viewport.width,
			theme.name
		);

		Self {
			surface,
			config,
			theme,
			field,
			pointer: PointerState::default(),
			bounds: Bounds { width, height },
			state: LoopState::Idle,
		}
	}

	/// Begin the frame loop. Does nothing if already running.
	pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> Result<(), StarfieldError> {
		if self.is_running() {
			debug!("starfield: start ignored, already running");
			return Ok(());
		}
		let handle = scheduler.request_frame()?;
		self.state = LoopState::Running(handle);
		debug!("starfield: started");
		Ok(())
	}

	/// Cancel the pending frame. Does nothing if idle.
	pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
		if let LoopState::Running(handle) = std::mem::take(&mut self.state) {
			scheduler.cancel_frame(handle);
			debug!("starfield: stopped");
		}
	}

	/// Frame callback: draw, then request the next frame.
	///
	/// A callback arriving while idle is stale and draws nothing. If the next
	/// frame cannot be scheduled the engine drops back to idle.
	pub fn frame(
		&mut self,
		time: f64,
		scheduler: &mut impl FrameScheduler,
	) -> Result<(), StarfieldError> {
		if !self.is_running() {
			return Ok(());
		}
		self.draw(time);
		match scheduler.request_frame() {
			Ok(handle) => {
				self.state = LoopState::Running(handle);
				Ok(())
			}
			Err(e) => {
				self.state = LoopState::Idle;
				Err(e)
			}
		}
	}

	/// Render a single frame at `time` (ms) without touching the loop state.
	pub fn draw(&mut self, time: f64) {
		let viewport = self.surface.viewport();
		self.pointer.step(self.config.smoothing);

		let params = FrameParams {
			bounds: self.bounds,
			pointer: (self.pointer.x, self.pointer.y),
			parallax_strength: self.config.parallax_for(viewport.width),
			time,
			twinkle: &self.config.twinkle,
		};
		render::render(&mut self.surface, self.field.particles(), &params);
	}

	/// Match the backing store to the displayed size at the capped device
	/// pixel ratio, and scale the context so drawing stays in CSS pixels.
	pub fn resize(&mut self) {
		let viewport = self.surface.viewport();
		let (width, height) = self.surface.display_size();
		let store = BackingStore::new(
			width,
			height,
			viewport.device_pixel_ratio,
			self.config.max_device_pixel_ratio,
		);

		if store.width == 0 || store.height == 0 {
			warn!("starfield: resized to an empty surface ({}x{})", width, height);
		}

		self.surface.set_backing_size(store.width, store.height);
		self.surface.set_scale(store.scale);
		self.bounds = Bounds {
			width: store.logical_width,
			height: store.logical_height,
		};
		debug!(
			"starfield: backing store {}x{} at {}x",
			store.width, store.height, store.scale
		);
	}

	/// Record a pointer position given in client coordinates.
	pub fn update_mouse(&mut self, client_x: f64, client_y: f64) {
		match self.surface.viewport().normalize_pointer(client_x, client_y) {
			Some((x, y)) => self.pointer.set_target(x, y),
			None => debug!("starfield: pointer ignored, viewport has no area"),
		}
	}

	pub fn is_running(&self) -> bool {
		matches!(self.state, LoopState::Running(_))
	}

	pub fn loop_state(&self) -> LoopState {
		self.state
	}

	pub fn particles(&self) -> &[Particle] {
		self.field.particles()
	}

	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Parallax displacement for the current viewport.
	pub fn parallax_strength(&self) -> f64 {
		self.config.parallax_for(self.surface.viewport().width)
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::starfield::config::TwinkleConfig;
	use crate::components::starfield::render::project;
	use crate::components::starfield::testing::{ManualScheduler, RecordingSurface, SurfaceOp};

	fn engine(width: f64, height: f64, dpr: f64) -> StarfieldEngine<RecordingSurface> {
		StarfieldEngine::new(
			RecordingSurface::new(width, height, dpr),
			StarfieldConfig::default(),
			Theme::default(),
			&mut Rng::with_seed(7),
		)
	}

	#[test]
	fn smoothing_at_rest_is_a_no_op() {
		let mut pointer = PointerState {
			x: 0.25,
			y: -0.5,
			target_x: 0.25,
			target_y: -0.5,
		};
		pointer.step(0.08);
		assert_eq!((pointer.x, pointer.y), (0.25, -0.5));
	}

	#[test]
	fn smoothing_converges_without_overshoot() {
		let mut pointer = PointerState::default();
		pointer.set_target(1.0, -1.0);
		let mut previous = (1.0 - pointer.x).abs();
		for _ in 0..100 {
			pointer.step(0.08);
			let distance = (1.0 - pointer.x).abs();
			assert!(distance < previous);
			assert!(pointer.x <= 1.0 && pointer.y >= -1.0);
			previous = distance;
		}
		// 0.92^100 is about 2.4e-4
		assert!(previous < 1e-3);
		assert!((pointer.y + 1.0).abs() < 1e-3);
	}

	#[test]
	fn start_is_idempotent() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let mut scheduler = ManualScheduler::default();
		engine.start(&mut scheduler).unwrap();
		engine.start(&mut scheduler).unwrap();
		assert_eq!(scheduler.requested, 1);
		assert_eq!(scheduler.pending.len(), 1);
		assert!(engine.is_running());
	}

	#[test]
	fn frames_reschedule_until_stopped() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let mut scheduler = ManualScheduler::default();
		engine.start(&mut scheduler).unwrap();

		for frame in 0..3 {
			let fired = scheduler.fire().unwrap();
			assert_eq!(engine.loop_state(), LoopState::Running(fired));
			engine.frame(frame as f64 * 16.0, &mut scheduler).unwrap();
			assert_eq!(scheduler.pending.len(), 1);
		}
		assert_eq!(engine.surface().circles().len(), 3 * 600);

		let pending = scheduler.pending[0];
		engine.stop(&mut scheduler);
		assert!(!engine.is_running());
		assert!(scheduler.pending.is_empty());
		assert_eq!(scheduler.cancelled, vec![pending]);

		let drawn = engine.surface().ops.len();
		for frame in 3..10 {
			engine.frame(frame as f64 * 16.0, &mut scheduler).unwrap();
		}
		assert_eq!(engine.surface().ops.len(), drawn);
		assert!(scheduler.pending.is_empty());

		engine.start(&mut scheduler).unwrap();
		scheduler.fire().unwrap();
		engine.frame(200.0, &mut scheduler).unwrap();
		assert!(engine.surface().ops.len() > drawn);
	}

	#[test]
	fn stop_while_idle_is_a_no_op() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let mut scheduler = ManualScheduler::default();
		engine.stop(&mut scheduler);
		assert!(scheduler.cancelled.is_empty());
		assert_eq!(engine.loop_state(), LoopState::Idle);
	}

	#[test]
	fn scheduling_failure_leaves_engine_idle() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let mut scheduler = ManualScheduler::default();
		engine.start(&mut scheduler).unwrap();
		scheduler.fire().unwrap();
		scheduler.fail = true;

		let err = engine.frame(16.0, &mut scheduler).unwrap_err();
		assert!(matches!(err, StarfieldError::Schedule(_)));
		assert!(!engine.is_running());
		assert!(engine.start(&mut scheduler).is_err());
	}

	#[test]
	fn resize_caps_device_pixel_ratio() {
		let mut engine = engine(1280.0, 720.0, 3.0);
		engine.resize();
		assert_eq!(engine.surface().last_backing(), Some((2560, 1440)));
		assert_eq!(engine.surface().last_scale(), Some(2.0));
		assert_eq!(
			engine.bounds(),
			Bounds {
				width: 1280.0,
				height: 720.0
			}
		);
	}

	#[test]
	fn zero_size_resize_recovers() {
		let mut engine = engine(1280.0, 720.0, 1.5);
		engine.surface_mut().display = (0.0, 0.0);
		engine.resize();
		assert_eq!(engine.surface().last_backing(), Some((0, 0)));

		engine.surface_mut().display = (1000.0, 600.0);
		engine.resize();
		assert_eq!(engine.surface().last_backing(), Some((1500, 900)));
		assert_eq!(engine.surface().last_scale(), Some(1.5));
	}

	#[test]
	fn mobile_viewport_disables_parallax() {
		let mut engine = engine(768.0, 1024.0, 2.0);
		assert_eq!(engine.particles().len(), 200);
		assert_eq!(engine.parallax_strength(), 0.0);

		engine.update_mouse(768.0, 0.0);
		for _ in 0..50 {
			engine.draw(16.0);
		}
		let bounds = engine.bounds();
		let circles = engine.surface().circles();
		assert_eq!(circles.len(), 50 * 200);
		for frame in circles.chunks(200) {
			for (p, circle) in engine.particles().iter().zip(frame) {
				assert_eq!(circle.0, p.x * bounds.width);
				assert_eq!(circle.1, p.y * bounds.height);
			}
		}
	}

	#[test]
	fn pointer_events_only_move_the_target() {
		let mut engine = engine(1000.0, 500.0, 1.0);
		engine.update_mouse(750.0, 125.0);
		assert_eq!(engine.pointer().target_x, 0.5);
		assert_eq!(engine.pointer().target_y, -0.5);
		assert_eq!((engine.pointer().x, engine.pointer().y), (0.0, 0.0));

		engine.draw(0.0);
		assert!((engine.pointer().x - 0.04).abs() < 1e-12);
		assert!((engine.pointer().y + 0.04).abs() < 1e-12);
	}

	#[test]
	fn empty_viewport_ignores_pointer() {
		let mut engine = engine(1000.0, 500.0, 1.0);
		engine.update_mouse(100.0, 100.0);
		engine.surface_mut().set_viewport(0.0, 0.0);
		engine.update_mouse(5.0, 5.0);
		assert!((engine.pointer().target_x + 0.8).abs() < 1e-12);
		assert!((engine.pointer().target_y + 0.6).abs() < 1e-12);
	}

	#[test]
	fn desktop_scenario() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let mut scheduler = ManualScheduler::default();
		assert_eq!(engine.particles().len(), 600);

		engine.resize();
		engine.start(&mut scheduler).unwrap();
		assert_eq!(engine.parallax_strength(), 60.0);

		engine.update_mouse(1280.0, 720.0);
		assert_eq!(engine.pointer().target_x, 1.0);
		assert_eq!(engine.pointer().target_y, 1.0);

		scheduler.fire().unwrap();
		engine.frame(1000.0, &mut scheduler).unwrap();

		let ops = &engine.surface().ops;
		let first_clear = ops
			.iter()
			.position(|op| matches!(op, SurfaceOp::Clear(..)))
			.unwrap();
		assert_eq!(ops[first_clear], SurfaceOp::Clear(1280.0, 720.0));

		let twinkle = TwinkleConfig::default();
		let params = FrameParams {
			bounds: engine.bounds(),
			pointer: (0.08, 0.08),
			parallax_strength: 60.0,
			time: 1000.0,
			twinkle: &twinkle,
		};
		let circles = engine.surface().circles();
		assert_eq!(circles.len(), 600);
		for (p, circle) in engine.particles().iter().zip(&circles) {
			let star = project(p, &params);
			assert!((circle.0 - star.x).abs() < 1e-9);
			assert!((circle.1 - star.y).abs() < 1e-9);
			assert_eq!(circle.2, p.size);
			assert_eq!(circle.3, p.color.to_css_alpha(star.opacity));
		}
	}

	#[test]
	fn engine_keeps_its_theme() {
		let engine = StarfieldEngine::new(
			RecordingSurface::new(1280.0, 720.0, 1.0),
			StarfieldConfig::default(),
			Theme::nebula(),
			&mut Rng::with_seed(3),
		);
		assert_eq!(engine.theme().name, "nebula");
	}

	#[test]
	fn particle_count_is_fixed_across_resizes() {
		let mut engine = engine(1280.0, 720.0, 1.0);
		let before = engine.particles().to_vec();
		engine.surface_mut().set_viewport(400.0, 800.0);
		engine.resize();
		engine.draw(50.0);
		assert_eq!(engine.particles(), before.as_slice());
	}
}
