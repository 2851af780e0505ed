//! Character stats: health, energy, XP/level
//!
//! - `StatsModel`: one per actor (player, enemy, destructible target)
//! - `StatsEvent`: notifications for UI/feedback collaborators

pub mod events;
pub mod model;


pub use events::StatsEvent;
pub use model::StatsModel;
