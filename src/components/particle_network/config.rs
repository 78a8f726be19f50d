//! Simulation and visual configuration.
//!
//! A [`NetworkConfig`] is fixed once the simulator is built. It comes from one
//! of the presets, sized by the viewport width, optionally adjusted by
//! [`ConfigOverrides`] read from page JSON.

use serde::Deserialize;

use super::color::Color;
use crate::error::ConfigError;

/// Viewports narrower than this get the reduced particle count.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

const BURST_SPEED: f64 = 3.0;
const BURST_DECAY: f64 = 0.015;

/// What a click does besides starting a ripple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickBehavior {
	/// Spawn particles around the click that drift home toward the center.
	SpawnWithHomePull,
	/// Spawn short-lived particles flung radially outward.
	BurstWithLifetime,
	/// Ripple only.
	RippleOnly,
}

/// Named starting points for a configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
	/// Free drift with ripples and pointer repulsion, no spawning.
	Swimming,
	/// Home-anchored particles, click spawning, capacity cap, attract on press.
	#[default]
	Magnetic,
	/// Click bursts of fading particles.
	Burst,
}

/// Complete particle network configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
	/// Particles created at construction.
	pub particle_count: usize,
	/// Capacity cap; the oldest particles are evicted past it.
	pub max_particles: usize,
	/// Pairs closer than this are linked by a line.
	pub connection_radius: f64,
	/// Line alpha for two coincident particles.
	pub link_opacity: f64,
	/// Pointer influence radius.
	pub mouse_radius: f64,
	/// Pointer acceleration at zero distance.
	pub mouse_force: f64,
	/// Pointer attracts instead of repels while pressed.
	pub attract_on_press: bool,
	/// Ripple radius growth per tick.
	pub ripple_speed: f64,
	/// Ripple push magnitude at full opacity.
	pub ripple_force: f64,
	/// Rings are not drawn past this radius.
	pub ripple_max_radius: f64,
	/// Ripple opacity lost per tick.
	pub ripple_fade: f64,
	/// Width of the band around the ripple radius that pushes particles.
	pub wave_width: f64,
	/// Particles added per click (spawning behaviors only).
	pub spawn_per_click: usize,
	pub click_behavior: ClickBehavior,
	/// Spring constant toward each particle's home anchor. Zero disables it.
	pub home_pull: f64,
	/// Amplitude of the organic drift.
	pub drift_speed: f64,
	/// Velocity multiplier applied every tick.
	pub friction: f64,
	/// Overscan beyond the surface before a particle wraps.
	pub margin: f64,
	/// Initial outward speed of burst particles.
	pub burst_speed: f64,
	/// Life lost per tick by burst particles.
	pub burst_decay: f64,
	/// Relative size oscillation (0 disables pulsing).
	pub pulse_amount: f64,
	pub pulse_speed: f64,
	/// Seconds added to the drift clock each tick.
	pub time_step: f64,
	pub colors: Vec<Color>,
}

fn default_palette() -> Vec<Color> {
	vec![
		Color::rgb(0, 217, 255),  // Cyan
		Color::rgb(168, 85, 247), // Violet
		Color::rgb(34, 211, 238), // Sky
		Color::rgb(16, 185, 129), // Emerald
	]
}

fn responsive_count(viewport_width: f64) -> usize {
	if viewport_width < MOBILE_BREAKPOINT {
		60
	} else {
		120
	}
}

impl NetworkConfig {
	/// Water-like drift; clicks only make ripples.
	pub fn swimming(viewport_width: f64) -> Self {
		let particle_count = responsive_count(viewport_width);
		Self {
			particle_count,
			max_particles: particle_count,
			connection_radius: 150.0,
			link_opacity: 0.3,
			mouse_radius: 150.0,
			mouse_force: 0.5,
			attract_on_press: false,
			ripple_speed: 8.0,
			ripple_force: 15.0,
			ripple_max_radius: 400.0,
			ripple_fade: 0.015,
			wave_width: 50.0,
			spawn_per_click: 0,
			click_behavior: ClickBehavior::RippleOnly,
			home_pull: 0.0,
			drift_speed: 0.3,
			friction: 0.96,
			margin: 20.0,
			burst_speed: 0.0,
			burst_decay: 0.0,
			pulse_amount: 0.0,
			pulse_speed: 0.0,
			time_step: 1.0 / 60.0,
			colors: default_palette(),
		}
	}

	/// Particles anchored to home positions, click spawning with a capacity cap.
	pub fn magnetic(viewport_width: f64) -> Self {
		let particle_count = responsive_count(viewport_width);
		Self {
			max_particles: particle_count + particle_count / 3,
			attract_on_press: true,
			spawn_per_click: 6,
			click_behavior: ClickBehavior::SpawnWithHomePull,
			home_pull: 0.0006,
			friction: 0.97,
			pulse_amount: 0.15,
			pulse_speed: 2.0,
			..Self::swimming(viewport_width)
		}
	}

	/// Clicks fling out particles that fade away.
	pub fn burst(viewport_width: f64) -> Self {
		let particle_count = responsive_count(viewport_width);
		Self {
			max_particles: particle_count + particle_count / 3,
			spawn_per_click: 8,
			click_behavior: ClickBehavior::BurstWithLifetime,
			friction: 0.97,
			burst_speed: BURST_SPEED,
			burst_decay: BURST_DECAY,
			..Self::swimming(viewport_width)
		}
	}

	pub fn preset(preset: Preset, viewport_width: f64) -> Self {
		match preset {
			Preset::Swimming => Self::swimming(viewport_width),
			Preset::Magnetic => Self::magnetic(viewport_width),
			Preset::Burst => Self::burst(viewport_width),
		}
	}

	/// The default, most complete behavior sized for the viewport.
	pub fn for_viewport(viewport_width: f64) -> Self {
		Self::preset(Preset::default(), viewport_width)
	}

	/// Applies overrides, keeping the capacity cap consistent with the counts.
	pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
		if let Some(v) = overrides.particle_count {
			self.particle_count = v;
		}
		if let Some(v) = overrides.max_particles {
			self.max_particles = v;
		}
		if let Some(v) = overrides.connection_radius {
			self.connection_radius = v.max(0.0);
		}
		if let Some(v) = overrides.mouse_radius {
			self.mouse_radius = v.max(0.0);
		}
		if let Some(v) = overrides.spawn_per_click {
			self.spawn_per_click = v;
		}
		if let Some(v) = overrides.click_behavior {
			self.click_behavior = v;
		}
		if let Some(v) = overrides.friction {
			self.friction = v.clamp(0.0, 1.0);
		}
		if let Some(colors) = overrides.colors.as_ref().filter(|c| !c.is_empty()) {
			self.colors = colors.clone();
		}

		// Burst particles must fade out, even on presets built without bursts.
		if self.click_behavior == ClickBehavior::BurstWithLifetime {
			if self.burst_speed <= 0.0 {
				self.burst_speed = BURST_SPEED;
			}
			if self.burst_decay <= 0.0 {
				self.burst_decay = BURST_DECAY;
			}
		}

		self.max_particles = self.max_particles.max(self.particle_count);
		self.spawn_per_click = self.spawn_per_click.min(self.max_particles);
		self
	}
}

/// Page-supplied adjustments to a preset.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
	pub preset: Option<Preset>,
	pub particle_count: Option<usize>,
	pub max_particles: Option<usize>,
	pub connection_radius: Option<f64>,
	pub mouse_radius: Option<f64>,
	pub spawn_per_click: Option<usize>,
	pub click_behavior: Option<ClickBehavior>,
	pub friction: Option<f64>,
	pub colors: Option<Vec<Color>>,
}

impl ConfigOverrides {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Builds the final configuration for a viewport of the given width.
	pub fn resolve(&self, viewport_width: f64) -> NetworkConfig {
		NetworkConfig::preset(self.preset.unwrap_or_default(), viewport_width).apply(self)
	}
}
