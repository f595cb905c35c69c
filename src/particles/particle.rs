//! A single short-lived particle.

use crate::config::ParticleTuning;
use crate::sink::RenderSink;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Simulated duration of one `update` call, in seconds.
///
/// Motion always advances by exactly one 60 FPS frame per call, whatever the
/// real frame time was. A loop running at 30 Hz therefore moves particles at
/// half speed while they still expire on wall-clock time.
pub const FIXED_STEP_SECS: f64 = 1.0 / 60.0;

/// Visual style of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Sand kicked up by the runner's feet.
    Dust,
    /// Sparks from hitting an obstacle.
    Impact,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 2] = [ParticleKind::Dust, ParticleKind::Impact];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dust => "dust",
            Self::Impact => "impact",
        }
    }
}

/// Where and how to spawn one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub x: f64,
    pub y: f64,
    pub kind: ParticleKind,
    /// Fixed lifetime; `None` draws from the tuning's range.
    pub lifetime_ms: Option<f64>,
    /// Replaces the tuning's initial vertical velocity range.
    pub vy_range: Option<[f64; 2]>,
}

impl Spawn {
    /// A dust particle at `(x, y)` with default lifetime and velocity.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: ParticleKind::Dust,
            lifetime_ms: None,
            vy_range: None,
        }
    }

    pub fn kind(mut self, kind: ParticleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn lifetime_ms(mut self, lifetime_ms: f64) -> Self {
        self.lifetime_ms = Some(lifetime_ms);
        self
    }

    pub fn vy_range(mut self, range: [f64; 2]) -> Self {
        self.vy_range = Some(range);
        self
    }
}

/// A live particle holding the sink handle of its visual node.
///
/// The handle can only leave the particle through [`Particle::into_handle`],
/// which consumes the particle, so a node is released at most once.
#[derive(Debug)]
pub struct Particle<H> {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    kind: ParticleKind,
    gravity: f64,
    lifetime_ms: f64,
    born_ms: f64,
    opacity: f64,
    scale: f64,
    handle: H,
}

/// Uniform sample in `[lo, hi)`; returns `lo` for an empty range.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f64; 2]) -> f64 {
    lo + rng.gen::<f64>() * (hi - lo)
}

impl<H> Particle<H> {
    /// Create a particle born at `now_ms` and attach its node to `sink`.
    pub fn spawn<S, R>(
        spawn: Spawn,
        now_ms: f64,
        tuning: &ParticleTuning,
        rng: &mut R,
        sink: &mut S,
    ) -> Self
    where
        S: RenderSink<Handle = H> + ?Sized,
        R: Rng + ?Sized,
    {
        let vx = (rng.gen::<f64>() - 0.5) * tuning.vx_spread;
        let vy = sample(rng, spawn.vy_range.unwrap_or(tuning.vy_range));
        let lifetime_ms = match spawn.lifetime_ms {
            Some(ms) => ms,
            None => sample(rng, tuning.lifetime_ms),
        };
        let scale = sample(rng, tuning.scale_range);
        let handle = sink.create(spawn.kind, spawn.x, spawn.y, scale);

        Self {
            x: spawn.x,
            y: spawn.y,
            vx,
            vy,
            kind: spawn.kind,
            gravity: tuning.gravity,
            lifetime_ms,
            born_ms: now_ms,
            opacity: 1.0,
            scale,
            handle,
        }
    }

    /// Advance one frame. Returns false once the particle has outlived its
    /// lifetime, in which case nothing is moved.
    pub fn update(&mut self, now_ms: f64) -> bool {
        let elapsed = now_ms - self.born_ms;
        if elapsed > self.lifetime_ms {
            return false;
        }

        let step = FIXED_STEP_SECS * 60.0;
        self.x += self.vx * step;
        self.y += self.vy * step;
        self.vy += self.gravity;

        // 0/0 for a zero lifetime; show the node fully faded
        let remaining = 1.0 - elapsed / self.lifetime_ms;
        self.opacity = if remaining.is_nan() {
            0.0
        } else {
            remaining.clamp(0.0, 1.0)
        };
        true
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms > self.lifetime_ms
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn lifetime_ms(&self) -> f64 {
        self.lifetime_ms
    }

    pub fn born_ms(&self) -> f64 {
        self.born_ms
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Give up the particle, returning its node handle for release.
    pub fn into_handle(self) -> H {
        self.handle
    }
}
