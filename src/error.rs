//! Error types for configuration loading and canvas mounting.
//!
//! The simulation itself is infallible; these cover the browser-facing edges.

use std::fmt;

/// Errors that can occur while reading particle network configuration.
#[derive(Debug)]
pub enum ConfigError {
	/// Override JSON could not be parsed.
	Json(serde_json::Error),
	/// A palette entry was not a `#RRGGBB` or `#RGB` color.
	Color(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::Json(e) => write!(f, "Invalid particle config JSON: {}", e),
			ConfigError::Color(s) => write!(f, "Invalid color {:?}, expected #RRGGBB", s),
		}
	}
}

impl std::error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			ConfigError::Json(e) => Some(e),
			ConfigError::Color(_) => None,
		}
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(e: serde_json::Error) -> Self {
		ConfigError::Json(e)
	}
}

/// Errors that can occur while attaching the simulator to a canvas.
#[derive(Debug)]
pub enum MountError {
	/// No global `window` (not running in a browser).
	NoWindow,
	/// The canvas refused to hand out a 2D rendering context.
	NoContext,
	/// A browser API call threw.
	Js(String),
}

impl fmt::Display for MountError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MountError::NoWindow => write!(f, "No browser window available"),
			MountError::NoContext => write!(f, "Canvas 2D context unavailable"),
			MountError::Js(msg) => write!(f, "Browser call failed: {}", msg),
		}
	}
}

impl std::error::Error for MountError {}

impl From<wasm_bindgen::JsValue> for MountError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		MountError::Js(format!("{:?}", value))
	}
}
