//! Particle network simulation.
//!
//! [`ParticleSimulator`] owns the particles, ripples, pointer state and the
//! surface it draws to. The host calls [`ParticleSimulator::tick`] once per
//! display refresh and forwards pointer input between ticks; every input
//! overwrites the previous pointer state and takes effect on the next tick.

use std::f64::consts::TAU;

use super::config::{ClickBehavior, NetworkConfig};
use super::particles::{Particle, PointerState, Ripple};
use super::render::{self, Frame};
use super::rng::Rng;
use super::surface::Surface;

/// Scale from drift amplitude to per-tick acceleration.
const DRIFT_ACCEL: f64 = 0.02;
/// Scale from ripple force to per-tick acceleration.
const RIPPLE_ACCEL: f64 = 0.1;
/// Spawned particles appear on a ring of this radius range around the click.
const SPAWN_RING: (f64, f64) = (20.0, 50.0);
/// Max angular jitter (radians) around the evenly spaced spawn angles.
const SPAWN_JITTER: f64 = 0.3;
/// How far toward the surface center a spawned particle's home is placed.
const HOME_CENTER_BIAS: f64 = 0.5;

/// The particle network: state, physics and the surface it renders to.
pub struct ParticleSimulator<S: Surface> {
	surface: S,
	config: NetworkConfig,
	particles: Vec<Particle>,
	ripples: Vec<Ripple>,
	pointer: PointerState,
	rng: Rng,
	width: f64,
	height: f64,
	/// Drift clock, seconds.
	elapsed: f64,
	/// Size pulsing clock, seconds.
	pulse_time: f64,
}

impl<S: Surface> ParticleSimulator<S> {
	pub fn new(mut surface: S, width: f64, height: f64, config: NetworkConfig, seed: u32) -> Self {
		surface.resize(width, height);
		let mut rng = Rng::new(seed);
		let particles = (0..config.particle_count)
			.map(|_| Particle::random(&mut rng, &config.colors, width, height))
			.collect();

		Self {
			surface,
			config,
			particles,
			ripples: Vec::new(),
			pointer: PointerState::Absent,
			rng,
			width,
			height,
			elapsed: 0.0,
			pulse_time: 0.0,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn ripples(&self) -> &[Ripple] {
		&self.ripples
	}

	pub fn pointer(&self) -> PointerState {
		self.pointer
	}

	pub fn config(&self) -> &NetworkConfig {
		&self.config
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}

	/// Update bounds and reallocate the surface. Particles keep their positions.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.surface.resize(width, height);
	}

	pub fn on_pointer_move(&mut self, x: f64, y: f64) {
		let pressed = self.pointer.is_pressed();
		self.pointer = PointerState::Present { x, y, pressed };
	}

	pub fn on_pointer_leave(&mut self) {
		self.pointer = PointerState::Absent;
	}

	pub fn on_pointer_down(&mut self) {
		if let PointerState::Present { ref mut pressed, .. } = self.pointer {
			*pressed = true;
		}
	}

	pub fn on_pointer_up(&mut self) {
		if let PointerState::Present { ref mut pressed, .. } = self.pointer {
			*pressed = false;
		}
	}

	/// Start a ripple at the click and apply the configured click behavior.
	pub fn on_click(&mut self, x: f64, y: f64) {
		self.ripples.push(Ripple::new(
			x,
			y,
			self.config.ripple_max_radius,
			self.config.ripple_speed,
		));

		match self.config.click_behavior {
			ClickBehavior::RippleOnly => {}
			ClickBehavior::SpawnWithHomePull => self.spawn_at(x, y, false),
			ClickBehavior::BurstWithLifetime => self.spawn_at(x, y, true),
		}
	}

	/// Evict the oldest particles until `spawn_per_click` more fit under the cap.
	fn make_room(&mut self) {
		let spawn = self.config.spawn_per_click;
		let limit = self.config.max_particles.saturating_sub(spawn);
		if self.particles.len() > limit {
			let excess = self.particles.len() - limit;
			self.particles.drain(..excess);
		}
	}

	/// Evict the oldest burst particles to fit a new burst, leaving steady
	/// particles alone. Returns how many burst particles now fit.
	fn make_burst_room(&mut self) -> usize {
		let spawn = self.config.spawn_per_click;
		let limit = self.config.max_particles.saturating_sub(spawn);
		let mut excess = self.particles.len().saturating_sub(limit);
		if excess > 0 {
			self.particles.retain(|p| {
				if excess > 0 && p.life.is_some() {
					excess -= 1;
					false
				} else {
					true
				}
			});
		}
		spawn.min(
			self.config
				.max_particles
				.saturating_sub(self.particles.len()),
		)
	}

	fn spawn_at(&mut self, x: f64, y: f64, burst: bool) {
		let count = if burst {
			self.make_burst_room()
		} else {
			self.make_room();
			self.config.spawn_per_click
		};
		if count == 0 {
			return;
		}

		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for i in 0..count {
			let angle = i as f64 * TAU / count as f64
				+ self.rng.range(-SPAWN_JITTER, SPAWN_JITTER);
			let dist = self.rng.range(SPAWN_RING.0, SPAWN_RING.1);
			let (ux, uy) = (angle.cos(), angle.sin());
			let (px, py) = (x + ux * dist, y + uy * dist);
			let (home_x, home_y) = (
				px + (cx - px) * HOME_CENTER_BIAS,
				py + (cy - py) * HOME_CENTER_BIAS,
			);

			let mut p = Particle::at(&mut self.rng, &self.config.colors, px, py, home_x, home_y);
			if burst {
				let speed = self.config.burst_speed * self.rng.range(0.6, 1.0);
				p.vx = ux * speed;
				p.vy = uy * speed;
				p.life = Some(1.0);
			}
			self.particles.push(p);
		}
	}

	/// Advance physics, ripples and particle lifetimes by one frame.
	pub fn step(&mut self) {
		self.elapsed += self.config.time_step;
		self.pulse_time += self.config.time_step;

		let time = self.elapsed;
		let config = &self.config;
		let pointer = self.pointer;
		let ripples = &self.ripples;
		let (width, height) = (self.width, self.height);

		for p in &mut self.particles {
			let (ax, ay) = drift(time, p.phase, config.drift_speed);
			p.vx += ax;
			p.vy += ay;

			if config.home_pull > 0.0 && p.life.is_none() {
				p.vx += (p.home_x - p.x) * config.home_pull;
				p.vy += (p.home_y - p.y) * config.home_pull;
			}

			let (ax, ay) = pointer_force(p, pointer, config);
			p.vx += ax;
			p.vy += ay;

			for r in ripples {
				let (ax, ay) = ripple_force(p, r, config);
				p.vx += ax;
				p.vy += ay;
			}

			p.x += p.vx;
			p.y += p.vy;
			p.vx *= config.friction;
			p.vy *= config.friction;

			p.x = wrap(p.x, width, config.margin);
			p.y = wrap(p.y, height, config.margin);
		}

		let fade = self.config.ripple_fade;
		self.ripples.retain_mut(|r| r.advance(fade));

		let decay = self.config.burst_decay;
		for p in &mut self.particles {
			if let Some(life) = p.life.as_mut() {
				*life -= decay;
			}
		}
		self.particles.retain(|p| !p.is_expired());
	}

	/// Draw the current state to the owned surface.
	pub fn render(&mut self) {
		render::render(
			&mut self.surface,
			&Frame {
				particles: &self.particles,
				ripples: &self.ripples,
				pointer: self.pointer,
				config: &self.config,
				pulse_time: self.pulse_time,
				width: self.width,
				height: self.height,
			},
		);
	}

	/// One animation frame: physics then render.
	pub fn tick(&mut self) {
		self.step();
		self.render();
	}
}

/// Desynchronized organic drift acceleration.
fn drift(time: f64, phase: f64, amplitude: f64) -> (f64, f64) {
	(
		(time * 0.5 + phase).sin() * amplitude * DRIFT_ACCEL,
		(time * 0.3 + phase * 1.5).cos() * amplitude * DRIFT_ACCEL,
	)
}

/// Repulsion from the pointer, or attraction while pressed when enabled.
/// Linear falloff to zero at `mouse_radius`; no contribution at zero distance.
fn pointer_force(p: &Particle, pointer: PointerState, config: &NetworkConfig) -> (f64, f64) {
	let Some((mx, my)) = pointer.position() else {
		return (0.0, 0.0);
	};
	let (dx, dy) = (p.x - mx, p.y - my);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist <= 0.0 || dist >= config.mouse_radius {
		return (0.0, 0.0);
	}

	let sign = if config.attract_on_press && pointer.is_pressed() {
		-1.0
	} else {
		1.0
	};
	let force = (config.mouse_radius - dist) / config.mouse_radius * config.mouse_force * sign;
	(dx / dist * force, dy / dist * force)
}

/// Outward push for particles on a ripple's wavefront, scaled by its opacity.
fn ripple_force(p: &Particle, r: &Ripple, config: &NetworkConfig) -> (f64, f64) {
	let (dx, dy) = (p.x - r.x, p.y - r.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist <= 0.0 || !r.on_wavefront(dist, config.wave_width) {
		return (0.0, 0.0);
	}
	let force = config.ripple_force * r.opacity * RIPPLE_ACCEL;
	(dx / dist * force, dy / dist * force)
}

/// Wraps a coordinate into `[-margin, size + margin)`.
fn wrap(v: f64, size: f64, margin: f64) -> f64 {
	let span = size + 2.0 * margin;
	if !v.is_finite() || span <= 0.0 {
		return 0.0;
	}
	if v >= -margin && v < size + margin {
		return v;
	}
	let wrapped = (v + margin).rem_euclid(span);
	// rem_euclid can round up to exactly `span` for tiny negative inputs.
	if wrapped >= span {
		-margin
	} else {
		wrapped - margin
	}
}

#[cfg(test)]
mod tests {
	use super::super::config::ConfigOverrides;
	use super::super::surface::recording::RecordingSurface;
	use super::*;

	fn config(count: usize) -> NetworkConfig {
		NetworkConfig {
			particle_count: count,
			max_particles: count,
			..NetworkConfig::swimming(1024.0)
		}
	}

	fn simulator(config: NetworkConfig) -> ParticleSimulator<RecordingSurface> {
		ParticleSimulator::new(RecordingSurface::default(), 800.0, 600.0, config, 1234)
	}

	fn assert_within_bounds(sim: &ParticleSimulator<RecordingSurface>) {
		let m = sim.config().margin;
		for p in sim.particles() {
			assert!(p.x >= -m && p.x < sim.width() + m, "x out of bounds: {}", p.x);
			assert!(p.y >= -m && p.y < sim.height() + m, "y out of bounds: {}", p.y);
			assert!(p.vx.is_finite() && p.vy.is_finite());
		}
	}

	#[test]
	fn test_construction_scenario() {
		let sim = simulator(config(10));
		assert_eq!(sim.particles().len(), 10);
		assert!(sim.ripples().is_empty());
		assert_eq!(sim.pointer(), PointerState::Absent);
		assert_eq!((sim.surface().width, sim.surface().height), (800.0, 600.0));
		for p in sim.particles() {
			assert!((0.0..800.0).contains(&p.x));
			assert!((0.0..600.0).contains(&p.y));
		}
	}

	#[test]
	fn test_ripple_lifecycle_scenario() {
		let mut sim = simulator(config(10));
		sim.on_click(400.0, 300.0);
		assert_eq!(sim.ripples().len(), 1);
		assert_eq!(sim.ripples()[0].radius, 0.0);
		assert_eq!(sim.ripples()[0].opacity, 1.0);
		assert_eq!(sim.particles().len(), 10);

		let mut last_opacity = 1.0;
		for _ in 0..50 {
			sim.tick();
			let opacity = sim.ripples()[0].opacity;
			assert!(opacity < last_opacity);
			last_opacity = opacity;
		}
		let ripple = &sim.ripples()[0];
		assert!((ripple.opacity - 0.25).abs() < 1e-9);
		assert!((ripple.radius - 50.0 * 8.0).abs() < 1e-9);

		for _ in 50..66 {
			sim.tick();
		}
		assert_eq!(sim.ripples().len(), 1);
		sim.tick();
		assert!(sim.ripples().is_empty());
	}

	#[test]
	fn test_wraparound_invariant() {
		let mut cfg = NetworkConfig::magnetic(1024.0);
		cfg.particle_count = 60;
		let mut sim = simulator(cfg);
		for i in 0..600 {
			if i % 40 == 0 {
				sim.on_click((i % 800) as f64, (i % 600) as f64);
			}
			sim.on_pointer_move(400.0, 300.0);
			sim.step();
			assert_within_bounds(&sim);
		}
	}

	#[test]
	fn test_wrap_reappears_on_opposite_edge() {
		assert_eq!(wrap(-21.0, 800.0, 20.0), 819.0);
		assert_eq!(wrap(820.0, 800.0, 20.0), -20.0);
		assert_eq!(wrap(825.0, 800.0, 20.0), -15.0);
		assert_eq!(wrap(400.0, 800.0, 20.0), 400.0);
		assert_eq!(wrap(-20.0, 800.0, 20.0), -20.0);
		let far = wrap(10_000.0, 800.0, 20.0);
		assert!((-20.0..820.0).contains(&far));
	}

	#[test]
	fn test_zero_sized_surface() {
		let mut sim = ParticleSimulator::new(RecordingSurface::default(), 0.0, 0.0, config(5), 9);
		sim.on_pointer_move(0.0, 0.0);
		sim.on_click(0.0, 0.0);
		for _ in 0..10 {
			sim.tick();
		}
		assert_within_bounds(&sim);
	}

	#[test]
	fn test_absent_pointer_has_no_force() {
		let cfg = config(1);
		let mut rng = Rng::new(1);
		let p = Particle::at(&mut rng, &cfg.colors, 100.0, 100.0, 100.0, 100.0);
		assert_eq!(pointer_force(&p, PointerState::Absent, &cfg), (0.0, 0.0));
	}

	#[test]
	fn test_pointer_repels_and_attracts() {
		let mut cfg = config(1);
		cfg.attract_on_press = true;
		let mut rng = Rng::new(1);
		let p = Particle::at(&mut rng, &cfg.colors, 100.0, 100.0, 100.0, 100.0);

		let released = PointerState::Present {
			x: 50.0,
			y: 100.0,
			pressed: false,
		};
		let (ax, ay) = pointer_force(&p, released, &cfg);
		assert!(ax > 0.0);
		assert_eq!(ay, 0.0);
		// (150 - 50) / 150 * 0.5
		assert!((ax - 1.0 / 3.0).abs() < 1e-12);

		let pressed = PointerState::Present {
			x: 50.0,
			y: 100.0,
			pressed: true,
		};
		let (ax, _) = pointer_force(&p, pressed, &cfg);
		assert!((ax + 1.0 / 3.0).abs() < 1e-12);

		let far = PointerState::Present {
			x: 100.0,
			y: 300.0,
			pressed: false,
		};
		assert_eq!(pointer_force(&p, far, &cfg), (0.0, 0.0));
	}

	#[test]
	fn test_pointer_at_particle_position_stays_finite() {
		let mut sim = simulator(config(5));
		let (x, y) = (sim.particles()[0].x, sim.particles()[0].y);
		sim.on_pointer_move(x, y);
		sim.on_click(x, y);
		sim.tick();
		for p in sim.particles() {
			assert!(p.x.is_finite() && p.y.is_finite());
			assert!(p.vx.is_finite() && p.vy.is_finite());
		}
	}

	#[test]
	fn test_ripple_pushes_outward_on_wavefront() {
		let cfg = config(1);
		let mut rng = Rng::new(1);
		let p = Particle::at(&mut rng, &cfg.colors, 130.0, 100.0, 130.0, 100.0);
		let mut ripple = Ripple::new(100.0, 100.0, 400.0, 30.0);
		ripple.advance(0.0);

		let (ax, ay) = ripple_force(&p, &ripple, &cfg);
		assert!((ax - 15.0 * 0.1).abs() < 1e-12);
		assert_eq!(ay, 0.0);

		let outside = Particle::at(&mut rng, &cfg.colors, 300.0, 100.0, 300.0, 100.0);
		assert_eq!(ripple_force(&outside, &ripple, &cfg), (0.0, 0.0));
	}

	#[test]
	fn test_pointer_press_flags() {
		let mut sim = simulator(config(1));
		sim.on_pointer_down();
		assert_eq!(sim.pointer(), PointerState::Absent);

		sim.on_pointer_move(1.0, 2.0);
		sim.on_pointer_down();
		assert!(sim.pointer().is_pressed());
		sim.on_pointer_move(3.0, 4.0);
		assert!(sim.pointer().is_pressed());
		sim.on_pointer_up();
		assert!(!sim.pointer().is_pressed());
		sim.on_pointer_leave();
		assert_eq!(sim.pointer(), PointerState::Absent);
	}

	#[test]
	fn test_click_spawns_under_cap() {
		let mut cfg = NetworkConfig::magnetic(1024.0);
		cfg.particle_count = 10;
		cfg.max_particles = 30;
		cfg.spawn_per_click = 6;
		let mut sim = simulator(cfg);

		sim.on_click(200.0, 200.0);
		assert_eq!(sim.particles().len(), 16);

		let spawned = &sim.particles()[10..];
		for p in spawned {
			let dist = ((p.x - 200.0).powi(2) + (p.y - 200.0).powi(2)).sqrt();
			assert!(dist > 20.0 - 1e-9 && dist < 50.0 + 1e-9);
			// Homes sit between the spawn point and the surface center.
			assert!(p.home_x > p.x.min(400.0) - 1e-9 && p.home_x < p.x.max(400.0) + 1e-9);
			assert!(p.life.is_none());
		}
	}

	#[test]
	fn test_click_evicts_oldest_at_cap() {
		let mut cfg = NetworkConfig::magnetic(1024.0);
		cfg.particle_count = 10;
		cfg.max_particles = 12;
		cfg.spawn_per_click = 4;
		let mut sim = simulator(cfg);
		let survivors: Vec<(f64, f64)> = sim.particles()[2..]
			.iter()
			.map(|p| (p.x, p.y))
			.collect();

		sim.on_click(100.0, 100.0);
		assert_eq!(sim.particles().len(), 12);
		let kept: Vec<(f64, f64)> = sim.particles()[..8].iter().map(|p| (p.x, p.y)).collect();
		assert_eq!(kept, survivors);

		for _ in 0..5 {
			sim.on_click(300.0, 300.0);
			assert!(sim.particles().len() <= 12);
		}
	}

	#[test]
	fn test_ripple_only_does_not_spawn() {
		let mut sim = simulator(config(10));
		sim.on_click(10.0, 10.0);
		sim.on_click(20.0, 20.0);
		assert_eq!(sim.particles().len(), 10);
		assert_eq!(sim.ripples().len(), 2);
	}

	#[test]
	fn test_burst_particles_expire() {
		let mut cfg = NetworkConfig::burst(1024.0);
		cfg.particle_count = 5;
		cfg.max_particles = 20;
		cfg.spawn_per_click = 8;
		cfg.burst_decay = 0.1;
		let mut sim = simulator(cfg);

		sim.on_click(400.0, 300.0);
		assert_eq!(sim.particles().len(), 13);
		for p in &sim.particles()[5..] {
			assert_eq!(p.life, Some(1.0));
			// Flung away from the click.
			let outward = (p.x - 400.0) * p.vx + (p.y - 300.0) * p.vy;
			assert!(outward > 0.0);
		}

		for _ in 0..5 {
			sim.step();
		}
		assert_eq!(sim.particles().len(), 13);
		for _ in 0..6 {
			sim.step();
		}
		assert_eq!(sim.particles().len(), 5);
		assert!(sim.particles().iter().all(|p| p.life.is_none()));
	}

	#[test]
	fn test_bursts_never_evict_steady_particles() {
		let mut sim = simulator(NetworkConfig::burst(1280.0));
		let steady = sim.particles().len();
		assert_eq!(steady, 120);

		for _ in 0..30 {
			sim.on_click(400.0, 300.0);
			assert!(sim.particles().len() <= sim.config().max_particles);
			let remaining = sim.particles().iter().filter(|p| p.life.is_none()).count();
			assert_eq!(remaining, steady);
		}

		for _ in 0..1000 {
			sim.step();
		}
		assert_eq!(sim.particles().len(), steady);
	}

	#[test]
	fn test_burst_evicts_oldest_burst_first() {
		let mut cfg = NetworkConfig::burst(1280.0);
		cfg.particle_count = 4;
		cfg.max_particles = 10;
		cfg.spawn_per_click = 4;
		let mut sim = simulator(cfg);

		sim.on_click(100.0, 100.0);
		let first: Vec<(f64, f64)> = sim.particles()[4..].iter().map(|p| (p.x, p.y)).collect();
		sim.on_click(600.0, 400.0);
		assert_eq!(sim.particles().len(), 10);

		// Two of the first burst were evicted to make room for the second.
		let kept: Vec<(f64, f64)> = sim.particles()[4..6].iter().map(|p| (p.x, p.y)).collect();
		assert_eq!(kept, &first[2..]);
		assert!(sim.particles()[..4].iter().all(|p| p.life.is_none()));
	}

	#[test]
	fn test_burst_clamped_without_burst_particles_to_evict() {
		let mut cfg = NetworkConfig::burst(1280.0);
		cfg.particle_count = 8;
		cfg.max_particles = 10;
		cfg.spawn_per_click = 6;
		let mut sim = simulator(cfg);

		sim.on_click(100.0, 100.0);
		assert_eq!(sim.particles().len(), 10);
		assert_eq!(sim.particles().iter().filter(|p| p.life.is_none()).count(), 8);
	}

	#[test]
	fn test_burst_override_on_default_preset_expires() {
		let config = ConfigOverrides::from_json(r#"{"click_behavior": "burst_with_lifetime"}"#)
			.unwrap()
			.resolve(1280.0);
		let mut sim = simulator(config);
		let steady = sim.particles().len();

		sim.on_click(400.0, 300.0);
		assert!(sim.particles().len() > steady);
		for p in sim.particles().iter().filter(|p| p.life.is_some()) {
			assert!(p.vx != 0.0 || p.vy != 0.0);
		}

		for _ in 0..1000 {
			sim.step();
		}
		assert_eq!(sim.particles().len(), steady);
	}

	#[test]
	fn test_resize_keeps_positions() {
		let mut sim = simulator(config(10));
		let before: Vec<(f64, f64)> = sim.particles().iter().map(|p| (p.x, p.y)).collect();
		sim.resize(1024.0, 768.0);
		let after: Vec<(f64, f64)> = sim.particles().iter().map(|p| (p.x, p.y)).collect();
		assert_eq!(before, after);
		assert_eq!((sim.width(), sim.height()), (1024.0, 768.0));
		assert_eq!((sim.surface().width, sim.surface().height), (1024.0, 768.0));
	}

	#[test]
	fn test_home_pull_draws_particle_home() {
		let mut cfg = NetworkConfig::magnetic(1024.0);
		cfg.particle_count = 0;
		cfg.drift_speed = 0.0;
		let mut sim = simulator(cfg);
		let mut rng = Rng::new(2);
		sim.particles.push(Particle::at(&mut rng, &[], 100.0, 100.0, 400.0, 300.0));

		let start = ((400.0f64 - 100.0).powi(2) + (300.0f64 - 100.0).powi(2)).sqrt();
		for _ in 0..200 {
			sim.step();
		}
		let p = &sim.particles()[0];
		let now = ((p.home_x - p.x).powi(2) + (p.home_y - p.y).powi(2)).sqrt();
		assert!(now < start);
	}

	#[test]
	fn test_tick_renders() {
		let mut sim = simulator(config(3));
		sim.tick();
		assert!(!sim.surface().calls.is_empty());
		assert!(sim.elapsed() > 0.0);
	}
}
