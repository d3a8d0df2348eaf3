//! Leptos component hosting the star field canvas.
//!
//! The component creates a decorative canvas, builds the engine once the
//! canvas is mounted, and forwards window `mousemove` and `resize` events into
//! it. Frames are driven by `requestAnimationFrame`. When the 2D context is
//! unavailable the canvas is left blank so the page's static background shows
//! through.

use std::cell::RefCell;
use std::rc::Rc;

use fastrand::Rng;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, HtmlCanvasElement, MouseEvent, Window};

use super::config::StarfieldConfig;
use super::error::StarfieldError;
use super::state::StarfieldEngine;
use super::surface::{AnimationFrameScheduler, CanvasSurface};
use super::theme::Theme;

type Engine = Rc<RefCell<StarfieldEngine<CanvasSurface>>>;

/// A running star field and the browser hooks feeding it.
///
/// Dropping it stops the loop, detaches the listeners and releases the frame
/// closure.
struct MountedStarfield {
	window: Window,
	engine: Engine,
	scheduler: AnimationFrameScheduler,
	on_pointer: Closure<dyn FnMut(MouseEvent)>,
	on_resize: Closure<dyn FnMut()>,
}

impl MountedStarfield {
	fn mount(
		canvas: HtmlCanvasElement,
		config: StarfieldConfig,
		seed: Option<u64>,
	) -> Result<Self, StarfieldError> {
		let surface = CanvasSurface::new(canvas)?;
		let window = surface.window().clone();
		let theme = Theme::by_name(&config.theme);
		let mut rng = Rng::with_seed(seed.unwrap_or_else(host_seed));

		let engine: Engine = Rc::new(RefCell::new(StarfieldEngine::new(
			surface, config, theme, &mut rng,
		)));

		let scheduler = AnimationFrameScheduler::new(window.clone());
		let (engine_frame, mut scheduler_frame) = (engine.clone(), scheduler.clone());
		scheduler.install(Closure::new(move |time: f64| {
			if let Err(e) = engine_frame.borrow_mut().frame(time, &mut scheduler_frame) {
				warn!("starfield: animation stopped: {}", e);
			}
		}));

		let engine_pointer = engine.clone();
		let on_pointer = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			engine_pointer
				.borrow_mut()
				.update_mouse(ev.client_x() as f64, ev.client_y() as f64);
		});

		let engine_resize = engine.clone();
		let on_resize = Closure::<dyn FnMut()>::new(move || {
			engine_resize.borrow_mut().resize();
		});

		let mut mounted = Self {
			window,
			engine,
			scheduler,
			on_pointer,
			on_resize,
		};
		// On failure `mounted` drops here and unwinds whatever was attached.
		mounted.attach()?;
		Ok(mounted)
	}

	fn attach(&mut self) -> Result<(), StarfieldError> {
		let options = AddEventListenerOptions::new();
		options.set_passive(true);
		self.window
			.add_event_listener_with_callback_and_add_event_listener_options(
				"mousemove",
				self.on_pointer.as_ref().unchecked_ref(),
				&options,
			)
			.map_err(|e| StarfieldError::Listener(format!("{:?}", e)))?;
		self.window
			.add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
			.map_err(|e| StarfieldError::Listener(format!("{:?}", e)))?;

		let mut engine = self.engine.borrow_mut();
		engine.resize();
		engine.start(&mut self.scheduler)?;
		info!(
			"starfield: mounted with {} stars (theme {})",
			engine.particles().len(),
			engine.theme().name
		);
		Ok(())
	}
}

impl Drop for MountedStarfield {
	fn drop(&mut self) {
		if let Ok(mut engine) = self.engine.try_borrow_mut() {
			engine.stop(&mut self.scheduler);
		}
		let _ = self
			.window
			.remove_event_listener_with_callback("mousemove", self.on_pointer.as_ref().unchecked_ref());
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
		self.scheduler.uninstall();
		debug!("starfield: unmounted");
	}
}

/// Seed for the star layout when the caller does not fix one.
fn host_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Renders an animated, depth-layered star field on a canvas.
///
/// The canvas is marked `aria-hidden`; it is purely decorative. Size it with
/// CSS (typically fixed and full-viewport behind the page content). Pass a
/// `seed` for a reproducible layout.
#[component]
pub fn StarfieldCanvas(
	#[prop(optional)] config: Option<StarfieldConfig>,
	#[prop(optional)] seed: Option<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted = StoredValue::new_local(None::<MountedStarfield>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone().unwrap_or_default();

		// Replacing a previous mount drops (and tears down) the old one first.
		mounted.set_value(None);
		match MountedStarfield::mount(canvas, config, seed) {
			Ok(starfield) => mounted.set_value(Some(starfield)),
			Err(e) => warn!("starfield: {}, using static background", e),
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="starfield-canvas"
			aria-hidden="true"
			style="display: block; position: fixed; inset: 0; width: 100%; height: 100%; pointer-events: none;"
		/>
	}
}
