//! starfield: Animated, depth-layered star field background.
//!
//! This crate provides a WASM-based canvas component that renders a twinkling
//! star field with smoothed pointer parallax, plus a landing page hosting it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::starfield::{StarfieldCanvas, StarfieldConfig, StarfieldError, StarfieldEngine};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("starfield: logging initialized");
}

/// Load config overrides from a script element with id="starfield-config".
/// Expected format: a JSON object naming any subset of `StarfieldConfig` keys.
fn load_config() -> Option<StarfieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("starfield-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match StarfieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"starfield: loaded config ({} desktop / {} mobile stars, theme {})",
				config.desktop_count, config.mobile_count, config.theme
			);
			Some(config)
		}
		Err(e) => {
			warn!("starfield: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads config from the DOM and renders the star field behind the page title.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Starfield" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="starfield-page">
			<StarfieldCanvas config=config />
			<div class="starfield-overlay">
				<h1>"Starfield"</h1>
				<p class="subtitle">"Move the pointer to drift through the layers."</p>
			</div>
		</div>
	}
}
