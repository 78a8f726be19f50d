//! Drawing surface abstraction.
//!
//! The simulator renders through [`Surface`] so the physics and render passes
//! run unchanged against an HTML canvas or an in-memory recorder.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::color::Color;

/// The raster primitives the render pass needs.
pub trait Surface {
	/// Reallocate the backing store to `width × height`.
	fn resize(&mut self, width: f64, height: f64);
	fn clear(&mut self, width: f64, height: f64);
	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, line_width: f64);
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, line_width: f64);
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);
	/// Radial gradient from `color` at the center to transparent at `radius`.
	fn fill_glow(&mut self, x: f64, y: f64, radius: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn resize(&mut self, width: f64, height: f64) {
		if let Some(canvas) = self.canvas() {
			canvas.set_width(width.max(0.0) as u32);
			canvas.set_height(height.max(0.0) as u32);
		}
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, line_width: f64) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(line_width);
		self.stroke();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, line_width: f64) {
		self.begin_path();
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(line_width);
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.set_fill_style_str(&color.to_css());
		self.fill();
	}

	fn fill_glow(&mut self, x: f64, y: f64, radius: f64, color: Color) {
		let Ok(gradient) = self.create_radial_gradient(x, y, 0.0, x, y, radius) else {
			return;
		};
		let _ = gradient.add_color_stop(0.0, &color.to_css());
		let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");

		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.set_fill_style_canvas_gradient(&gradient);
		self.fill();
	}
}
