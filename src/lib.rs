//! particle-network: animated particle background for a portfolio hero section.
//!
//! This crate provides a WASM canvas component that simulates a drifting
//! particle network reacting to pointer movement and clicks.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::particle_network::{
	ClickBehavior, ConfigOverrides, NetworkConfig, ParticleNetworkCanvas, ParticleSimulator, Preset,
	Surface,
};
pub use error::{ConfigError, MountError};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-network: logging initialized");
}

/// Load configuration overrides from a script element with id="particle-config".
/// Expected format: JSON such as `{ "preset": "burst", "particle_count": 80 }`
fn load_overrides() -> Option<ConfigOverrides> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match ConfigOverrides::from_json(&json_text) {
		Ok(overrides) => {
			info!("particle-network: loaded config overrides {:?}", overrides);
			Some(overrides)
		}
		Err(e) => {
			warn!("particle-network: ignoring config overrides: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads optional overrides from the DOM and renders the hero background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let overrides = load_overrides();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Particle Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="hero-bg" style="position: relative; width: 100vw; height: 100vh;">
			<ParticleNetworkCanvas overrides=overrides />
		</div>
	}
}
