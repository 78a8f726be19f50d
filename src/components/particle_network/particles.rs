//! Particle, ripple and pointer state.

use std::f64::consts::TAU;

use super::color::Color;
use super::rng::Rng;

/// A single animated point.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Anchor the home-pull force draws the particle back to.
	pub home_x: f64,
	pub home_y: f64,
	pub size: f64,
	pub color: Color,
	/// Desynchronizes drift and pulsing, in `[0, 2π)`.
	pub phase: f64,
	/// Remaining life for burst particles; `None` for steady ones.
	pub life: Option<f64>,
}

impl Particle {
	/// A steady particle at a random position with an independent random home.
	pub fn random(rng: &mut Rng, colors: &[Color], width: f64, height: f64) -> Self {
		let (x, y) = (rng.range(0.0, width), rng.range(0.0, height));
		let (home_x, home_y) = (rng.range(0.0, width), rng.range(0.0, height));
		Self::at(rng, colors, x, y, home_x, home_y)
	}

	/// A particle at rest at `(x, y)` anchored to `(home_x, home_y)`.
	pub fn at(rng: &mut Rng, colors: &[Color], x: f64, y: f64, home_x: f64, home_y: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			home_x,
			home_y,
			size: rng.range(1.5, 3.5),
			color: rng.pick(colors).copied().unwrap_or(Color::rgb(255, 255, 255)),
			phase: rng.range(0.0, TAU),
			life: None,
		}
	}

	/// Drawing alpha multiplier; burst particles fade with their life.
	pub fn alpha(&self) -> f64 {
		self.life.map_or(1.0, |l| l.clamp(0.0, 1.0))
	}

	pub fn is_expired(&self) -> bool {
		self.life.is_some_and(|l| l <= 0.0)
	}
}

/// An expanding, fading shockwave started by a click.
#[derive(Clone, Debug)]
pub struct Ripple {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	/// Rings are not drawn beyond this; removal is driven by opacity alone.
	pub max_radius: f64,
	pub opacity: f64,
	pub speed: f64,
}

impl Ripple {
	pub fn new(x: f64, y: f64, max_radius: f64, speed: f64) -> Self {
		Self {
			x,
			y,
			radius: 0.0,
			max_radius,
			opacity: 1.0,
			speed,
		}
	}

	/// Advances one tick. Returns `false` once the ripple has faded out.
	pub fn advance(&mut self, fade: f64) -> bool {
		self.radius += self.speed;
		self.opacity -= fade;
		self.opacity > 0.0
	}

	/// Whether a point at `dist` from the center lies on the wavefront band.
	pub fn on_wavefront(&self, dist: f64, wave_width: f64) -> bool {
		dist > self.radius - wave_width && dist < self.radius + wave_width
	}
}

/// Most recent pointer position in surface-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
	#[default]
	Absent,
	Present { x: f64, y: f64, pressed: bool },
}

impl PointerState {
	pub fn position(&self) -> Option<(f64, f64)> {
		match *self {
			PointerState::Absent => None,
			PointerState::Present { x, y, .. } => Some((x, y)),
		}
	}

	pub fn is_pressed(&self) -> bool {
		matches!(self, PointerState::Present { pressed: true, .. })
	}
}
