//! Dino Run effects library.
//!
//! Particle effects for the runner (dust on jump and landing, sparks on
//! impact), the obstacle and power-up catalogs, and a terminal layer that
//! displays particles with ratatui.

pub mod build_info;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod layer;
pub mod particles;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock, FRAME_MS};
pub use config::{BurstConfig, EffectsConfig, ParticleTuning};
pub use error::ConfigError;
pub use layer::{NodeId, ParticleLayer, ParticleNode};
pub use particles::{Particle, ParticleKind, ParticleSystem, Spawn, FIXED_STEP_SECS};
pub use sink::RenderSink;
