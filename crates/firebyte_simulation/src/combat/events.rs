//! Combat events (input intents from controllers, output for presentation)
//!
//! Input (controller/AI/network → ECS):
//! - `WeaponFireIntent`: trigger pulled, ECS shoots + ray-casts
//! - `HitReported`: ray-cast done elsewhere, ECS resolves the hit
//! - `ReloadIntent` / `CancelReloadIntent`
//! - `LootCollected`: pickup touched by an actor
//!
//! Output (ECS → UI/audio/VFX/loot spawning):
//! - `ShotResolved`, `EntityDied`, `LootDropped`
//! - `StatsNotification` / `WeaponNotification`: per-entity model events

use bevy::prelude::*;

use super::hit::{HitOutcome, HitResult};
use crate::loot::LootRarity;
use crate::stats::StatsEvent;
use crate::weapon::WeaponEvent;

/// Event: actor wants to fire its weapon along `direction`
#[derive(Event, Debug, Clone)]
pub struct WeaponFireIntent {
    pub shooter: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Event: externally ray-cast shot that should be applied
///
/// Ammo is already spent by the reporter (e.g. client-side prediction).
#[derive(Event, Debug, Clone)]
pub struct HitReported {
    pub shooter: Entity,
    pub hit: HitResult<Entity>,
}

#[derive(Event, Debug, Clone)]
pub struct ReloadIntent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct CancelReloadIntent {
    pub entity: Entity,
}

/// Event: `collector` picked up a loot box of `rarity`
#[derive(Event, Debug, Clone)]
pub struct LootCollected {
    pub collector: Entity,
    pub rarity: LootRarity,
}

/// Event: one shot went through hit resolution
#[derive(Event, Debug, Clone)]
pub struct ShotResolved {
    pub shooter: Entity,
    pub target: Option<Entity>,
    pub outcome: HitOutcome,
}

/// Event: entity died (health reached 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Event: spawn a pickup of `rarity` at `position`
#[derive(Event, Debug, Clone)]
pub struct LootDropped {
    pub position: Vec3,
    pub rarity: LootRarity,
    pub dropped_by: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct StatsNotification {
    pub entity: Entity,
    pub event: StatsEvent,
}

#[derive(Event, Debug, Clone)]
pub struct WeaponNotification {
    pub entity: Entity,
    pub event: WeaponEvent,
}
