//! Power-up catalog.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How often a power-up shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    pub fn weight(&self) -> u32 {
        match self {
            Self::Common => 6,
            Self::Rare => 3,
            Self::Epic => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    DoubleJump,
    SlowMotion,
    ScoreMultiplier,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Shield,
        PowerUpKind::DoubleJump,
        PowerUpKind::SlowMotion,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::Magnet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shield => "Shield",
            Self::DoubleJump => "Double Jump",
            Self::SlowMotion => "Slow Motion",
            Self::ScoreMultiplier => "Score x2",
            Self::Magnet => "Magnet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Shield => "Absorbs the next collision.",
            Self::DoubleJump => "Jump once more while airborne.",
            Self::SlowMotion => "Halves the scroll speed.",
            Self::ScoreMultiplier => "Doubles points earned.",
            Self::Magnet => "Pulls nearby pickups toward the runner.",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Self::Shield => '◆',
            Self::DoubleJump => '⇈',
            Self::SlowMotion => '◷',
            Self::ScoreMultiplier => '×',
            Self::Magnet => '∩',
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            Self::DoubleJump | Self::ScoreMultiplier => Rarity::Common,
            Self::Shield | Self::SlowMotion => Rarity::Rare,
            Self::Magnet => Rarity::Epic,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Shield => 5_000,
            Self::DoubleJump => 8_000,
            Self::SlowMotion => 4_000,
            Self::ScoreMultiplier => 10_000,
            Self::Magnet => 6_000,
        }
    }

    /// Multiplier applied to scroll speed while active.
    pub fn speed_factor(&self) -> f64 {
        match self {
            Self::SlowMotion => 0.5,
            _ => 1.0,
        }
    }

    /// Multiplier applied to points while active.
    pub fn score_multiplier(&self) -> u32 {
        match self {
            Self::ScoreMultiplier => 2,
            _ => 1,
        }
    }

    /// Weighted random pick by rarity.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = Self::ALL.iter().map(|k| k.rarity().weight()).sum();
        let mut pick = rng.gen_range(0..total);
        for kind in Self::ALL {
            let weight = kind.rarity().weight();
            if pick < weight {
                return kind;
            }
            pick -= weight;
        }
        Self::DoubleJump
    }
}

/// A power-up picked up at `started_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub started_ms: f64,
}

impl ActivePowerUp {
    pub fn new(kind: PowerUpKind, started_ms: f64) -> Self {
        Self { kind, started_ms }
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.started_ms + self.kind.duration_ms() as f64 - now_ms).max(0.0)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= self.kind.duration_ms() as f64
    }

    /// Fraction of the duration left, in [0, 1].
    pub fn progress_remaining(&self, now_ms: f64) -> f64 {
        self.remaining_ms(now_ms) / self.kind.duration_ms() as f64
    }
}
