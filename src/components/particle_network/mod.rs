//! Interactive particle network background.
//!
//! Renders an animated particle field on an HTML canvas with:
//! - Organic drift, friction and wraparound bounds
//! - Pointer repulsion, or attraction while the button is held
//! - Click ripples that push particles outward
//! - Click spawning (home-anchored or short-lived bursts) under a capacity cap
//! - Distance-faded connection lines and glowing particles
//!
//! # Example
//!
//! ```ignore
//! use particle_network::ParticleNetworkCanvas;
//!
//! view! {
//!     <div class="hero-bg" style="position: relative">
//!         <ParticleNetworkCanvas />
//!     </div>
//! }
//! ```

pub mod color;
mod component;
pub mod config;
mod lifecycle;
pub mod particles;
pub mod render;
pub mod rng;
pub mod simulator;
pub mod surface;

pub use color::Color;
pub use component::ParticleNetworkCanvas;
pub use config::{ClickBehavior, ConfigOverrides, NetworkConfig, Preset};
pub use lifecycle::{FrameLoop, WindowListener};
pub use particles::{Particle, PointerState, Ripple};
pub use rng::Rng;
pub use simulator::ParticleSimulator;
pub use surface::Surface;
