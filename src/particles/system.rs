//! The particle system: spawns bursts on gameplay events and ages them out.

use super::particle::{Particle, ParticleKind, Spawn};
use crate::clock::{Clock, SystemClock};
use crate::config::{BurstConfig, EffectsConfig};
use crate::error::ConfigError;
use crate::sink::RenderSink;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Owns every live particle and the sink their nodes live in.
///
/// Construct one at startup and hand it by `&mut` to whatever reacts to
/// gameplay events. Call [`update`](Self::update) exactly once per frame.
pub struct ParticleSystem<S: RenderSink, C: Clock = SystemClock> {
    /// Live particles in spawn order.
    particles: Vec<Particle<S::Handle>>,
    sink: S,
    clock: C,
    rng: StdRng,
    config: EffectsConfig,
}

impl<S: RenderSink> ParticleSystem<S, SystemClock> {
    /// A system driven by real time with the stock effect tuning.
    pub fn new(sink: S) -> Self {
        Self::with_clock(sink, SystemClock::new())
    }
}

impl<S: RenderSink, C: Clock> ParticleSystem<S, C> {
    pub fn with_clock(sink: S, clock: C) -> Self {
        Self {
            particles: Vec::new(),
            sink,
            clock,
            rng: StdRng::from_entropy(),
            config: EffectsConfig::default(),
        }
    }

    /// Replace the random source with a seeded one for reproducible bursts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Install a tuning after checking it with [`EffectsConfig::validate`].
    pub fn with_config(mut self, config: EffectsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Spawn `count` particles of `kind` at `(x, y)` with default lifetimes.
    pub fn emit(&mut self, x: f64, y: f64, kind: ParticleKind, count: usize) {
        let burst = BurstConfig {
            count,
            jitter: 0.0,
            lifetime_ms: None,
            vy_range: None,
        };
        self.spawn_burst(x, y, kind, &burst);
    }

    /// [`emit`](Self::emit) with the configured default count.
    pub fn emit_default(&mut self, x: f64, y: f64, kind: ParticleKind) {
        self.emit(x, y, kind, self.config.default_count);
    }

    /// Dust kicked sideways as the runner takes off.
    pub fn emit_jump(&mut self, x: f64, y: f64) {
        let burst = self.config.jump.clone();
        self.spawn_burst(x, y, ParticleKind::Dust, &burst);
    }

    /// A wider dust puff as the runner lands.
    pub fn emit_land(&mut self, x: f64, y: f64) {
        let burst = self.config.land.clone();
        self.spawn_burst(x, y, ParticleKind::Dust, &burst);
    }

    /// Impact sparks when the runner hits an obstacle.
    pub fn emit_collision(&mut self, x: f64, y: f64) {
        let burst = self.config.collision.clone();
        self.spawn_burst(x, y, ParticleKind::Impact, &burst);
    }

    fn spawn_burst(&mut self, x: f64, y: f64, kind: ParticleKind, burst: &BurstConfig) {
        let now = self.clock.now_ms();
        self.particles.reserve(burst.count);

        for _ in 0..burst.count {
            let jitter = if burst.jitter > 0.0 {
                (self.rng.gen::<f64>() - 0.5) * 2.0 * burst.jitter
            } else {
                0.0
            };
            let spawn = Spawn {
                x: x + jitter,
                y,
                kind,
                lifetime_ms: burst.lifetime_ms,
                vy_range: burst.vy_range,
            };
            let particle = Particle::spawn(
                spawn,
                now,
                &self.config.tuning,
                &mut self.rng,
                &mut self.sink,
            );
            self.particles.push(particle);
        }

        tracing::debug!(
            kind = kind.name(),
            count = burst.count,
            x,
            y,
            live = self.particles.len(),
            "particle burst"
        );
    }

    /// Advance every live particle by one frame.
    ///
    /// Survivors keep their relative order and have their node moved and
    /// faded. Each expired particle has its node destroyed and is dropped.
    pub fn update(&mut self) {
        if self.particles.is_empty() {
            return;
        }

        let now = self.clock.now_ms();
        let previous = std::mem::take(&mut self.particles);
        self.particles.reserve(previous.len());
        let mut expired = 0usize;

        for mut particle in previous {
            if particle.update(now) {
                self.sink
                    .update(particle.handle(), particle.x, particle.y, particle.opacity());
                self.particles.push(particle);
            } else {
                self.sink.destroy(particle.into_handle());
                expired += 1;
            }
        }

        if expired > 0 {
            tracing::trace!(expired, live = self.particles.len(), "particles expired");
        }
    }

    /// Destroy every live particle immediately (e.g. on restart).
    pub fn clear(&mut self) {
        let cleared = self.particles.len();
        for particle in self.particles.drain(..) {
            self.sink.destroy(particle.into_handle());
        }
        if cleared > 0 {
            tracing::debug!(cleared, "particles cleared");
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles in spawn order.
    pub fn particles(&self) -> &[Particle<S::Handle>] {
        &self.particles
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<S, C> std::fmt::Debug for ParticleSystem<S, C>
where
    S: RenderSink,
    C: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("live", &self.particles.len())
            .field("now_ms", &self.clock.now_ms())
            .finish()
    }
}
