//! Render pass for the particle network.
//!
//! Draw order, back to front:
//! 1. Ripple rings
//! 2. Connection lines between nearby particles
//! 3. Particle glows and cores
//! 4. Pointer glow

use super::color::Color;
use super::config::NetworkConfig;
use super::particles::{Particle, PointerState, Ripple};
use super::surface::Surface;

const RIPPLE_COLOR: Color = Color::rgb(0, 217, 255);
const LINK_COLOR: Color = Color::rgb(168, 85, 247);
const POINTER_GLOW_COLOR: Color = Color::rgba(0, 217, 255, 0.2);

/// Concentric rings drawn per ripple, and their spacing.
const RIPPLE_RINGS: usize = 3;
const RING_SPACING: f64 = 15.0;

const GLOW_SCALE: f64 = 4.0;
const GLOW_ALPHA: f64 = 0.15;
const CORE_ALPHA: f64 = 0.8;
const POINTER_GLOW_RADIUS: f64 = 80.0;

/// Everything the render pass reads for one frame.
pub struct Frame<'a> {
	pub particles: &'a [Particle],
	pub ripples: &'a [Ripple],
	pub pointer: PointerState,
	pub config: &'a NetworkConfig,
	pub pulse_time: f64,
	pub width: f64,
	pub height: f64,
}

/// A line between two particles, by index.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub a: usize,
	pub b: usize,
	pub alpha: f64,
}

/// Every pair closer than `radius`, with alpha falling off linearly from
/// `max_alpha` at zero distance. Fading burst particles dim their links.
pub fn connections(particles: &[Particle], radius: f64, max_alpha: f64) -> Vec<Link> {
	let mut links = Vec::new();
	if radius <= 0.0 {
		return links;
	}

	for (i, p) in particles.iter().enumerate() {
		for (j, q) in particles.iter().enumerate().skip(i + 1) {
			let (dx, dy) = (p.x - q.x, p.y - q.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < radius {
				links.push(Link {
					a: i,
					b: j,
					alpha: (1.0 - dist / radius) * max_alpha * p.alpha() * q.alpha(),
				});
			}
		}
	}
	links
}

/// Renders the complete frame to the surface.
pub fn render<S: Surface>(surface: &mut S, frame: &Frame<'_>) {
	surface.clear(frame.width, frame.height);

	draw_ripples(surface, frame.ripples);
	draw_links(surface, frame);
	draw_particles(surface, frame);

	if let Some((x, y)) = frame.pointer.position() {
		surface.fill_glow(x, y, POINTER_GLOW_RADIUS, POINTER_GLOW_COLOR);
	}
}

fn draw_ripples<S: Surface>(surface: &mut S, ripples: &[Ripple]) {
	for r in ripples {
		for i in 0..RIPPLE_RINGS {
			let ring = i as f64;
			let ring_radius = r.radius - ring * RING_SPACING;
			if ring_radius <= 0.0 || ring_radius > r.max_radius {
				continue;
			}
			let alpha = r.opacity * (1.0 - ring * 0.3) * 0.5;
			surface.stroke_circle(
				r.x,
				r.y,
				ring_radius,
				RIPPLE_COLOR.with_alpha(alpha),
				2.0 - ring * 0.5,
			);
		}
	}
}

fn draw_links<S: Surface>(surface: &mut S, frame: &Frame<'_>) {
	let links = connections(
		frame.particles,
		frame.config.connection_radius,
		frame.config.link_opacity,
	);
	for link in links {
		let (p, q) = (&frame.particles[link.a], &frame.particles[link.b]);
		surface.stroke_line((p.x, p.y), (q.x, q.y), LINK_COLOR.with_alpha(link.alpha), 1.0);
	}
}

fn draw_particles<S: Surface>(surface: &mut S, frame: &Frame<'_>) {
	let config = frame.config;

	for p in frame.particles {
		let pulse = if config.pulse_amount > 0.0 {
			1.0 + (frame.pulse_time * config.pulse_speed + p.phase).sin() * config.pulse_amount
		} else {
			1.0
		};
		let size = p.size * pulse;
		let alpha = p.alpha();

		surface.fill_glow(p.x, p.y, size * GLOW_SCALE, p.color.with_alpha(GLOW_ALPHA * alpha));
		surface.fill_circle(p.x, p.y, size, p.color.with_alpha(CORE_ALPHA * alpha));
	}
}

#[cfg(test)]
mod tests {
	use super::super::rng::Rng;
	use super::super::surface::recording::{DrawCall, RecordingSurface};
	use super::*;

	fn particle_at(x: f64, y: f64) -> Particle {
		let mut rng = Rng::new(1);
		Particle::at(&mut rng, &[Color::rgb(0, 217, 255)], x, y, x, y)
	}

	#[test]
	fn test_coincident_particles_link_at_max_opacity() {
		let particles = [particle_at(10.0, 10.0), particle_at(10.0, 10.0)];
		let links = connections(&particles, 150.0, 0.3);
		assert_eq!(links, vec![Link { a: 0, b: 1, alpha: 0.3 }]);
	}

	#[test]
	fn test_no_link_at_or_beyond_radius() {
		let particles = [particle_at(0.0, 0.0), particle_at(150.0, 0.0)];
		assert!(connections(&particles, 150.0, 0.3).is_empty());

		let particles = [particle_at(0.0, 0.0), particle_at(300.0, 400.0)];
		assert!(connections(&particles, 150.0, 0.3).is_empty());
	}

	#[test]
	fn test_link_alpha_linear_falloff() {
		let particles = [particle_at(0.0, 0.0), particle_at(75.0, 0.0)];
		let links = connections(&particles, 150.0, 0.3);
		assert_eq!(links.len(), 1);
		assert!((links[0].alpha - 0.15).abs() < 1e-12);
	}

	#[test]
	fn test_fading_particle_dims_link() {
		let mut fading = particle_at(0.0, 0.0);
		fading.life = Some(0.5);
		let particles = [fading, particle_at(0.0, 0.0)];
		let links = connections(&particles, 150.0, 0.3);
		assert!((links[0].alpha - 0.15).abs() < 1e-12);
	}

	#[test]
	fn test_render_layers() {
		let config = NetworkConfig::swimming(1024.0);
		let particles = [particle_at(10.0, 10.0), particle_at(20.0, 10.0)];
		let mut ripple = Ripple::new(100.0, 100.0, 400.0, 20.0);
		ripple.advance(0.015);
		ripple.advance(0.015);
		let ripples = [ripple];
		let mut surface = RecordingSurface::default();

		render(
			&mut surface,
			&Frame {
				particles: &particles,
				ripples: &ripples,
				pointer: PointerState::Present {
					x: 5.0,
					y: 5.0,
					pressed: false,
				},
				config: &config,
				pulse_time: 0.0,
				width: 800.0,
				height: 600.0,
			},
		);

		assert_eq!(surface.calls.first(), Some(&DrawCall::Clear));
		// Radius 40: rings at 40, 25 and 10.
		assert_eq!(surface.rings().len(), 3);
		assert_eq!(surface.lines().len(), 1);
		let discs = surface
			.calls
			.iter()
			.filter(|c| matches!(c, DrawCall::Disc { .. }))
			.count();
		assert_eq!(discs, 2);
		assert!(matches!(
			surface.calls.last(),
			Some(DrawCall::Glow { radius, .. }) if *radius == POINTER_GLOW_RADIUS
		));
	}

	#[test]
	fn test_rings_culled_past_max_radius() {
		let config = NetworkConfig::swimming(1024.0);
		let mut ripple = Ripple::new(0.0, 0.0, 100.0, 110.0);
		ripple.advance(0.015);
		let ripples = [ripple];
		let mut surface = RecordingSurface::default();

		render(
			&mut surface,
			&Frame {
				particles: &[],
				ripples: &ripples,
				pointer: PointerState::Absent,
				config: &config,
				pulse_time: 0.0,
				width: 800.0,
				height: 600.0,
			},
		);

		// 110 is past the cap; 95 and 80 are still drawn.
		assert_eq!(surface.rings().len(), 2);
	}
}
