//! Static gameplay content: obstacles and power-ups.

pub mod obstacles;
pub mod powerups;

pub use obstacles::ObstacleKind;
pub use powerups::{ActivePowerUp, PowerUpKind, Rarity};
