//! Particle effects: dust puffs and impact sparks.
//!
//! Particles fly on a fixed 60 FPS step with linear gravity and fade out
//! over their lifetime. Rendering goes through a [`RenderSink`](crate::sink::RenderSink)
//! so the simulation never touches a concrete display.

pub mod particle;
pub mod system;

pub use particle::*;
pub use system::*;
