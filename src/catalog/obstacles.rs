//! Obstacle catalog.
//!
//! Sizes are in world units (one unit ≈ one pixel of the classic game), with
//! `ground_offset` measured upward from the ground line.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Types of obstacles the runner must avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    // Ground obstacles -- jump over these
    SmallCactus,
    LargeCactus,
    CactusCluster,
    Rock,
    // Flying obstacles
    LowPterodactyl,  // jump over
    HighPterodactyl, // duck under
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::SmallCactus,
        ObstacleKind::LargeCactus,
        ObstacleKind::CactusCluster,
        ObstacleKind::Rock,
        ObstacleKind::LowPterodactyl,
        ObstacleKind::HighPterodactyl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SmallCactus => "Small Cactus",
            Self::LargeCactus => "Large Cactus",
            Self::CactusCluster => "Cactus Cluster",
            Self::Rock => "Rock",
            Self::LowPterodactyl => "Low Pterodactyl",
            Self::HighPterodactyl => "High Pterodactyl",
        }
    }

    pub fn width(&self) -> f64 {
        match self {
            Self::SmallCactus => 17.0,
            Self::LargeCactus => 25.0,
            Self::CactusCluster => 75.0,
            Self::Rock => 30.0,
            Self::LowPterodactyl | Self::HighPterodactyl => 46.0,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Self::SmallCactus => 35.0,
            Self::LargeCactus | Self::CactusCluster => 50.0,
            Self::Rock => 20.0,
            Self::LowPterodactyl | Self::HighPterodactyl => 40.0,
        }
    }

    /// Gap between the ground and the obstacle's bottom edge.
    pub fn ground_offset(&self) -> f64 {
        match self {
            Self::LowPterodactyl => 10.0,
            Self::HighPterodactyl => 30.0,
            _ => 0.0,
        }
    }

    /// True if this obstacle is airborne.
    pub fn is_flying(&self) -> bool {
        matches!(self, Self::LowPterodactyl | Self::HighPterodactyl)
    }

    /// True if ducking (rather than jumping) clears it.
    pub fn duck_to_avoid(&self) -> bool {
        matches!(self, Self::HighPterodactyl)
    }

    /// Scroll speed (units/frame) at which this obstacle starts appearing.
    pub fn min_speed(&self) -> f64 {
        match self {
            Self::SmallCactus | Self::LargeCactus | Self::Rock => 0.0,
            Self::CactusCluster => 7.0,
            Self::LowPterodactyl | Self::HighPterodactyl => 8.5,
        }
    }

    /// Relative spawn weight among unlocked obstacles.
    pub fn spawn_weight(&self) -> u32 {
        match self {
            Self::SmallCactus => 4,
            Self::LargeCactus => 3,
            Self::CactusCluster => 2,
            Self::Rock => 2,
            Self::LowPterodactyl => 1,
            Self::HighPterodactyl => 1,
        }
    }

    /// Impact particles emitted when the runner hits this obstacle.
    pub fn impact_particles(&self) -> usize {
        match self {
            Self::SmallCactus => 8,
            Self::Rock => 10,
            Self::LargeCactus | Self::LowPterodactyl | Self::HighPterodactyl => 12,
            Self::CactusCluster => 16,
        }
    }

    pub fn is_unlocked(&self, speed: f64) -> bool {
        speed >= self.min_speed()
    }

    /// Weighted random pick among the obstacles unlocked at `speed`.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, speed: f64) -> Self {
        let total: u32 = Self::ALL
            .iter()
            .filter(|k| k.is_unlocked(speed))
            .map(|k| k.spawn_weight())
            .sum();
        if total == 0 {
            return Self::SmallCactus;
        }

        let mut pick = rng.gen_range(0..total);
        for kind in Self::ALL.iter().filter(|k| k.is_unlocked(speed)) {
            if pick < kind.spawn_weight() {
                return *kind;
            }
            pick -= kind.spawn_weight();
        }
        Self::SmallCactus
    }
}
