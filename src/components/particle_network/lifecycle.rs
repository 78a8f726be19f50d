//! Cancelable browser tasks bound to a component's lifetime.
//!
//! [`FrameLoop`] is a repeating `requestAnimationFrame` task and
//! [`WindowListener`] a window event subscription. Both deregister themselves
//! when stopped or dropped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::error::MountError;

/// Scheduling bookkeeping for a frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LoopState {
	/// Pending request id, if a frame is scheduled.
	pending: Option<i32>,
	stopped: bool,
}

impl LoopState {
	fn is_running(&self) -> bool {
		!self.stopped
	}

	fn scheduled(&mut self, id: i32) {
		self.pending = Some(id);
	}

	fn fired(&mut self) {
		self.pending = None;
	}

	/// Marks the loop stopped and hands back the request still to cancel.
	fn stop(&mut self) -> Option<i32> {
		self.stopped = true;
		self.pending.take()
	}
}

struct FrameShared {
	window: Window,
	state: Cell<LoopState>,
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameShared {
	fn update<R>(&self, f: impl FnOnce(&mut LoopState) -> R) -> R {
		let mut state = self.state.get();
		let result = f(&mut state);
		self.state.set(state);
		result
	}

	fn schedule(&self) -> Result<(), MountError> {
		if !self.state.get().is_running() {
			return Ok(());
		}
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return Ok(());
		};
		let id = self
			.window
			.request_animation_frame(cb.as_ref().unchecked_ref())?;
		self.update(|s| s.scheduled(id));
		Ok(())
	}
}

/// Calls a closure once per display refresh until stopped.
pub struct FrameLoop {
	shared: Rc<FrameShared>,
}

impl FrameLoop {
	/// Schedules `frame` on the next refresh and every refresh after it.
	/// The closure receives the frame timestamp in milliseconds.
	pub fn start(mut frame: impl FnMut(f64) + 'static) -> Result<Self, MountError> {
		let window = web_sys::window().ok_or(MountError::NoWindow)?;
		let shared = Rc::new(FrameShared {
			window,
			state: Cell::new(LoopState::default()),
			callback: RefCell::new(None),
		});

		let weak: Weak<FrameShared> = Rc::downgrade(&shared);
		*shared.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let Some(shared) = weak.upgrade() else {
				return;
			};
			shared.update(LoopState::fired);
			frame(timestamp);
			if let Err(e) = shared.schedule() {
				error!("particle-network: could not schedule frame: {}", e);
			}
		}));

		shared.schedule()?;
		debug!("particle-network: frame loop started");
		Ok(Self { shared })
	}

	/// Cancels the pending frame. Idempotent.
	pub fn stop(&self) {
		let (was_running, pending) = self.shared.update(|s| (s.is_running(), s.stop()));
		if let Some(id) = pending {
			let _ = self.shared.window.cancel_animation_frame(id);
		}
		if was_running {
			debug!("particle-network: frame loop stopped");
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
		self.shared.callback.borrow_mut().take();
	}
}

/// A window event listener removed on drop.
pub struct WindowListener {
	window: Window,
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

impl WindowListener {
	pub fn new(event: &'static str, callback: impl FnMut() + 'static) -> Result<Self, MountError> {
		let window = web_sys::window().ok_or(MountError::NoWindow)?;
		let callback = Closure::<dyn FnMut()>::new(callback);
		window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			window,
			event,
			callback,
		})
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}
