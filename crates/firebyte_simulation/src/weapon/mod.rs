//! Weapon domain: firing / reload state machine
//!
//! - `WeaponState`: one per armed actor
//! - `WeaponEvent`: notifications for HUD/feedback collaborators

pub mod events;
pub mod state;


pub use events::WeaponEvent;
pub use state::{WeaponPhase, WeaponState};
