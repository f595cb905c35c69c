//! Integration test: particle lifecycle
//!
//! Drives a `ParticleSystem` frame by frame with a manual clock and checks
//! lifetimes, fading, gravity, collection bookkeeping and node cleanup.

use dino_fx::{
    ConfigError, EffectsConfig, ManualClock, Particle, ParticleKind, ParticleLayer,
    ParticleSystem, ParticleTuning, RenderSink, Spawn, FRAME_MS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn layer_system() -> (ParticleSystem<ParticleLayer, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let system = ParticleSystem::with_clock(ParticleLayer::new(), clock.clone()).with_seed(2024);
    (system, clock)
}

/// Advance one 60 FPS frame and update.
fn frame<S: RenderSink>(system: &mut ParticleSystem<S, ManualClock>, clock: &ManualClock) {
    clock.advance_frames(1);
    system.update();
}

/// Sink that records how often each node was released.
#[derive(Default)]
struct ReleaseCounter {
    releases: Vec<u32>,
    updates: Vec<u32>,
}

impl RenderSink for ReleaseCounter {
    type Handle = usize;

    fn create(&mut self, _kind: ParticleKind, _x: f64, _y: f64, _scale: f64) -> usize {
        self.releases.push(0);
        self.updates.push(0);
        self.releases.len() - 1
    }

    fn update(&mut self, handle: &usize, _x: f64, _y: f64, opacity: f64) {
        assert!((0.0..=1.0).contains(&opacity), "opacity {opacity} out of range");
        assert_eq!(self.releases[*handle], 0, "update after release");
        self.updates[*handle] += 1;
    }

    fn destroy(&mut self, handle: usize) {
        self.releases[handle] += 1;
    }
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[test]
fn test_jump_burst_expires_within_fifty_frames() {
    let (mut system, clock) = layer_system();
    system.emit_jump(100.0, 200.0);

    assert_eq!(system.len(), 6);
    assert_eq!(system.sink().len(), 6);
    for p in system.particles() {
        assert_eq!(p.kind(), ParticleKind::Dust);
        assert_eq!(p.lifetime_ms(), 800.0);
        assert!((90.0..=110.0).contains(&p.x), "x out of jitter range: {}", p.x);
        assert_eq!(p.y, 200.0);
        assert!((-4.0..=-1.0).contains(&p.vy), "vy out of range: {}", p.vy);
    }

    for _ in 0..50 {
        frame(&mut system, &clock);
    }

    assert!(system.is_empty());
    assert!(system.sink().is_empty());
    assert_eq!(system.sink().created(), 6);
    assert_eq!(system.sink().removed(), 6);
    assert_eq!(system.sink().stale_removals(), 0);
}

#[test]
fn test_impact_burst_survives_first_update() {
    let (mut system, _clock) = layer_system();
    system.emit(0.0, 0.0, ParticleKind::Impact, 12);

    assert_eq!(system.len(), 12);
    assert!(system
        .particles()
        .iter()
        .all(|p| p.kind() == ParticleKind::Impact));

    system.update();
    assert_eq!(system.len(), 12);
    assert_eq!(system.sink().len(), 12);
}

// =============================================================================
// Per-particle properties
// =============================================================================

#[test]
fn test_dies_exactly_when_elapsed_exceeds_lifetime() {
    let (mut system, clock) = layer_system();
    system.emit_jump(0.0, 0.0); // 800ms

    clock.advance_ms(800.0);
    system.update();
    assert_eq!(system.len(), 6, "elapsed == lifetime is still alive");

    clock.advance_ms(0.001);
    system.update();
    assert!(system.is_empty());
}

#[test]
fn test_opacity_never_increases() {
    let (mut system, clock) = layer_system();
    system.emit(0.0, 0.0, ParticleKind::Dust, 10);

    let mut last: Vec<f64> = system.particles().iter().map(|p| p.opacity()).collect();
    for _ in 0..25 {
        frame(&mut system, &clock);
        if system.len() != last.len() {
            break;
        }
        let now: Vec<f64> = system.particles().iter().map(|p| p.opacity()).collect();
        for (before, after) in last.iter().zip(&now) {
            assert!(after <= before, "opacity rose from {before} to {after}");
            assert!((0.0..=1.0).contains(after));
        }
        last = now;
    }
}

#[test]
fn test_zero_lifetime_never_sends_nan_opacity() {
    let mut sink = ReleaseCounter::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let spawn = Spawn::at(0.0, 0.0).lifetime_ms(0.0);
    let mut p = Particle::spawn(spawn, 0.0, &ParticleTuning::default(), &mut rng, &mut sink);

    assert!(p.update(0.0));
    sink.update(p.handle(), p.x, p.y, p.opacity());
    assert_eq!(p.opacity(), 0.0);
    assert!(!p.update(FRAME_MS));
}

#[test]
fn test_zero_lifetime_burst_config_is_refused() {
    let (system, _clock) = layer_system();
    let mut config = EffectsConfig::default();
    config.jump.lifetime_ms = Some(0.0);

    match system.with_config(config) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "jump.lifetime_ms"),
        other => panic!("expected invalid config, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_gravity_accumulates_per_update() {
    let (mut system, clock) = layer_system();
    system.emit(0.0, 0.0, ParticleKind::Dust, 8);
    let initial: Vec<(f64, f64)> = system.particles().iter().map(|p| (p.vx, p.vy)).collect();

    // 20 frames ≈ 333ms, under the 500ms minimum lifetime
    let n = 20;
    for _ in 0..n {
        frame(&mut system, &clock);
    }

    assert_eq!(system.len(), 8);
    for (p, (vx, vy)) in system.particles().iter().zip(initial) {
        assert!((p.vy - (vy + n as f64 * 0.2)).abs() < 1e-9);
        assert!((p.vx - vx).abs() < f64::EPSILON);
    }
}

#[test]
fn test_position_advances_one_frame_per_update_regardless_of_rate() {
    // Motion is fixed at one 60 FPS frame per call; a 30 Hz caller sees the
    // same displacement per call, only lifetimes follow the clock.
    let (mut fast, fast_clock) = layer_system();
    let (mut slow, slow_clock) = layer_system();
    fast.emit(0.0, 0.0, ParticleKind::Dust, 3);
    slow.emit(0.0, 0.0, ParticleKind::Dust, 3);

    for _ in 0..10 {
        fast_clock.advance_ms(FRAME_MS);
        fast.update();
        slow_clock.advance_ms(FRAME_MS * 2.0);
        slow.update();
    }

    for (a, b) in fast.particles().iter().zip(slow.particles()) {
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }
}

// =============================================================================
// Collection and cleanup
// =============================================================================

#[test]
fn test_collection_holds_exactly_the_survivors() {
    let (mut system, clock) = layer_system();
    system.emit_land(0.0, 0.0); // 8 × 800ms
    clock.advance_ms(600.0);
    system.emit(0.0, 0.0, ParticleKind::Impact, 5); // ≥ 500ms

    let young: HashSet<_> = system.particles()[8..].iter().map(|p| *p.handle()).collect();

    clock.advance_ms(300.0);
    system.update();

    let live: Vec<_> = system.particles().iter().map(|p| *p.handle()).collect();
    let live_set: HashSet<_> = live.iter().copied().collect();
    assert_eq!(live.len(), live_set.len(), "duplicate particles");
    assert_eq!(live_set, young);

    let attached: HashSet<_> = system.sink().nodes().map(|(id, _)| id).collect();
    assert_eq!(attached, live_set);
}

#[test]
fn test_every_node_released_exactly_once() {
    let clock = ManualClock::new();
    let mut system = ParticleSystem::with_clock(ReleaseCounter::default(), clock.clone()).with_seed(5);

    system.emit_jump(10.0, 10.0);
    system.emit_land(10.0, 10.0);
    system.emit_collision(10.0, 10.0);
    let total = 6 + 8 + 12;

    // Long enough for even a 1500ms particle to expire.
    for _ in 0..120 {
        frame(&mut system, &clock);
    }
    // Extra frames after everything is gone must be no-ops.
    for _ in 0..5 {
        frame(&mut system, &clock);
    }

    assert!(system.is_empty());
    let sink = system.sink();
    assert_eq!(sink.releases.len(), total);
    assert!(sink.releases.iter().all(|&r| r == 1));
    assert!(sink.updates.iter().all(|&u| u > 0));
}

#[test]
fn test_clear_releases_live_nodes() {
    let clock = ManualClock::new();
    let mut system = ParticleSystem::with_clock(ReleaseCounter::default(), clock.clone()).with_seed(5);
    system.emit(0.0, 0.0, ParticleKind::Dust, 4);
    frame(&mut system, &clock);
    system.clear();
    system.update();

    assert!(system.sink().releases.iter().all(|&r| r == 1));
}

#[test]
fn test_system_borrowing_an_external_layer() {
    // The container can outlive the system and hold other state.
    let mut layer = ParticleLayer::new();
    {
        let clock = ManualClock::new();
        let mut system = ParticleSystem::with_clock(&mut layer, clock.clone());
        system.emit_collision(0.0, 0.0);
        clock.advance_ms(2_000.0);
        system.update();
    }
    assert!(layer.is_empty());
    assert_eq!(layer.created(), 12);
    assert_eq!(layer.removed(), 12);
}
