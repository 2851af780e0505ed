//! Combat module: shots, hit resolution, death, loot drops
//!
//! Pure core:
//! - `HitResolver`: HitResult → damage → death → loot roll
//! - `RayCaster` / `TargetLookup` / `LootSpawner`: collaborator seams
//!
//! ECS layer (FixedUpdate):
//! - intents in (`WeaponFireIntent`, `HitReported`, `ReloadIntent`, `LootCollected`)
//! - notifications out (`ShotResolved`, `EntityDied`, `LootDropped`, model events)

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod hit;
pub mod sphere_caster;
pub mod systems;

#[cfg(test)]
mod hit_tests;

pub use components::{Dead, DespawnAfter, RayCastBackend, StatsEventBuffer, WeaponEventBuffer};
pub use events::{
    CancelReloadIntent, EntityDied, HitReported, LootCollected, LootDropped, ReloadIntent,
    ShotResolved, StatsNotification, WeaponFireIntent, WeaponNotification,
};
pub use hit::{
    HitOutcome, HitResolver, HitResult, LootSpawner, RayCaster, TargetLookup,
    DEFAULT_DEATH_GRACE_SECONDS,
};
pub use sphere_caster::{SphereCollider, SphereRayCaster};

/// Combat Plugin
///
/// Registers combat events and systems in FixedUpdate.
///
/// Execution order:
/// 1. attach_event_buffers: hook new models up to notifications
/// 2. advance_weapons: reload/cooldown timers
/// 3. handle_reload_intents
/// 4. fire_weapons: shoot → ray-cast → resolve
/// 5. resolve_reported_hits: externally ray-cast shots
/// 6. apply_loot_pickups
/// 7. advance_stats: regeneration
/// 8. despawn_after_timeout
/// 9. publish_model_events: model events → Bevy events
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponFireIntent>()
            .add_event::<HitReported>()
            .add_event::<ReloadIntent>()
            .add_event::<CancelReloadIntent>()
            .add_event::<LootCollected>()
            .add_event::<ShotResolved>()
            .add_event::<EntityDied>()
            .add_event::<LootDropped>()
            .add_event::<StatsNotification>()
            .add_event::<WeaponNotification>();

        app.init_resource::<HitResolver>();

        app.add_systems(
            FixedUpdate,
            (
                systems::attach_event_buffers,
                // Timers before intents: a shot fired this tick starts a full cooldown
                systems::advance_weapons,
                systems::handle_reload_intents,
                systems::fire_weapons,
                systems::resolve_reported_hits,
                systems::apply_loot_pickups,
                systems::advance_stats,
                systems::despawn_after_timeout,
                systems::publish_model_events,
            )
                .chain(),
        );
    }
}
