//! Combat components and resources

use bevy::prelude::*;

use super::hit::RayCaster;
use crate::observer::EventBuffer;
use crate::stats::StatsEvent;
use crate::weapon::WeaponEvent;

/// Marker: entity is dead (death effects playing, no more damage)
#[derive(Component, Debug)]
pub struct Dead;

/// Despawn the entity once `Time<Fixed>` elapsed reaches `despawn_time`
#[derive(Component, Debug)]
pub struct DespawnAfter {
    pub despawn_time: f32,
}

/// Queue of model events for a `StatsModel` on the same entity
///
/// Attached automatically, drained into `StatsNotification` every tick.
#[derive(Component, Debug, Clone, Default)]
pub struct StatsEventBuffer(pub EventBuffer<StatsEvent>);

#[derive(Component, Debug, Clone, Default)]
pub struct WeaponEventBuffer(pub EventBuffer<WeaponEvent>);

/// Physics backend used by `fire_weapons`
///
/// Without it every fired shot resolves as a miss.
#[derive(Resource)]
pub struct RayCastBackend(pub Box<dyn RayCaster>);

impl RayCastBackend {
    pub fn new(caster: impl RayCaster + 'static) -> Self {
        Self(Box::new(caster))
    }
}
