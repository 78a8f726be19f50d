//! Leptos component wrapping the particle network canvas.
//!
//! The component appends a canvas covering its parent, builds a
//! [`ParticleSimulator`] over the canvas's 2D context and drives it from a
//! [`FrameLoop`]. Pointer events are translated to canvas-local coordinates.
//! Unmounting stops the loop and removes the window resize listener.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::{ConfigOverrides, NetworkConfig};
use super::lifecycle::{FrameLoop, WindowListener};
use super::simulator::ParticleSimulator;
use crate::error::MountError;

type SharedSimulator = Rc<RefCell<Option<ParticleSimulator<CanvasRenderingContext2d>>>>;

/// Browser tasks owned by a mounted canvas.
struct Mounted {
	frame_loop: FrameLoop,
	_resize: WindowListener,
}

impl Mounted {
	fn stop(self) {
		self.frame_loop.stop();
	}
}

fn viewport_width(window: &Window) -> f64 {
	window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(1024.0)
}

/// Size of the canvas's container, falling back to the viewport.
fn container_size(canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or_else(|| {
			(
				viewport_width(window),
				window
					.inner_height()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(768.0),
			)
		})
}

fn local_coords(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn mount(
	canvas: HtmlCanvasElement,
	overrides: Option<&ConfigOverrides>,
	simulator: SharedSimulator,
) -> Result<Mounted, MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(MountError::NoContext)?
		.dyn_into()
		.map_err(|_| MountError::NoContext)?;

	let vw = viewport_width(&window);
	let config = overrides.map_or_else(|| NetworkConfig::for_viewport(vw), |o| o.resolve(vw));
	let (w, h) = container_size(&canvas, &window);
	let seed = js_sys::Date::now() as u64 as u32;
	info!(
		"particle-network: {} particles ({:?}) on {}x{}",
		config.particle_count, config.click_behavior, w, h
	);
	*simulator.borrow_mut() = Some(ParticleSimulator::new(ctx, w, h, config, seed));

	let (sim_resize, canvas_resize) = (simulator.clone(), canvas.clone());
	let resize = WindowListener::new("resize", move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (nw, nh) = container_size(&canvas_resize, &win);
		if let Some(ref mut sim) = *sim_resize.borrow_mut() {
			sim.resize(nw, nh);
		}
		debug!("particle-network: resized to {}x{}", nw, nh);
	})?;

	let frame_loop = FrameLoop::start(move |_| {
		if let Some(ref mut sim) = *simulator.borrow_mut() {
			sim.tick();
		}
	})?;

	Ok(Mounted {
		frame_loop,
		_resize: resize,
	})
}

/// Renders the animated particle network over its parent element.
///
/// The parent should be positioned (e.g. `position: relative`) so the canvas
/// can cover it. Without `overrides` the default preset is sized for the
/// current viewport.
#[component]
pub fn ParticleNetworkCanvas(
	#[prop(default = None)] overrides: Option<ConfigOverrides>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let simulator: SharedSimulator = Rc::new(RefCell::new(None));
	let mounted = StoredValue::new_local(None::<Mounted>);

	let sim_init = simulator.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted.with_value(|m| m.is_some()) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(canvas, overrides.as_ref(), sim_init.clone()) {
			Ok(m) => mounted.set_value(Some(m)),
			Err(e) => error!("particle-network: mount failed: {}", e),
		}
	});

	on_cleanup(move || {
		if let Some(m) = mounted.try_update_value(Option::take).flatten() {
			m.stop();
		}
	});

	let sim_mm = simulator.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_coords(&canvas, &ev);
		if let Some(ref mut sim) = *sim_mm.borrow_mut() {
			sim.on_pointer_move(x, y);
		}
	};

	let sim_ml = simulator.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut sim) = *sim_ml.borrow_mut() {
			sim.on_pointer_leave();
		}
	};

	let sim_md = simulator.clone();
	let on_mousedown = move |_: MouseEvent| {
		if let Some(ref mut sim) = *sim_md.borrow_mut() {
			sim.on_pointer_down();
		}
	};

	let sim_mu = simulator.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut sim) = *sim_mu.borrow_mut() {
			sim.on_pointer_up();
		}
	};

	let sim_click = simulator;
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_coords(&canvas, &ev);
		if let Some(ref mut sim) = *sim_click.borrow_mut() {
			sim.on_click(x, y);
			debug!(
				"particle-network: click at ({:.0}, {:.0}), {} particles",
				x,
				y,
				sim.particles().len()
			);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-network-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:mousedown=on_mousedown
			on:mouseup=on_mouseup
			on:click=on_click
			style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: 1; pointer-events: auto;"
		/>
	}
}
