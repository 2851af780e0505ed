//! Scripted shooting-range scenario (headless)
//!
//! The player stands at the origin and holds the trigger on each target in
//! turn until it dies, then picks up every drop. Used by the binary and by
//! the integration tests.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::combat::{LootCollected, LootDropped, RayCastBackend, SphereRayCaster, WeaponFireIntent};
use crate::config::{CombatConfig, ConfigError};
use crate::logger::log_info;
use crate::loot::LootRarity;
use crate::stats::StatsModel;
use crate::weapon::WeaponState;
use crate::{create_combat_app, spawn_armed_actor, spawn_target};

/// Trigger time budget before giving up
pub const MAX_TICKS: u32 = 60 * 30;

pub const TARGET_POSITIONS: [Vec3; 3] = [
    Vec3::new(0.0, 0.0, 10.0),
    Vec3::new(3.0, 0.0, 15.0),
    Vec3::new(-3.0, 0.0, 20.0),
];

const TARGET_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    /// Ticks spent with the trigger held
    pub ticks: u32,
    pub targets_left: usize,
    pub drops: Vec<LootRarity>,
    pub player_level: u32,
    pub player_xp: u32,
    pub player_health: f32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    /// `WeaponState` display line
    pub weapon: String,
}

/// Loot drops seen this frame (filled in `Last`)
#[derive(Resource, Default)]
struct PendingDrops(Vec<LootDropped>);

fn collect_drops(mut drops: EventReader<LootDropped>, mut pending: ResMut<PendingDrops>) {
    pending.0.extend(drops.read().cloned());
}

/// Run the range to completion (all targets dead and despawned, or out of time)
pub fn run_shooting_range(seed: u64, config: CombatConfig) -> Result<RangeSummary, ConfigError> {
    let mut app = create_combat_app(seed, config.clone())?;
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / config.simulation_hz,
    )))
    .init_resource::<PendingDrops>()
    .add_systems(Last, collect_drops);

    // First frame has zero delta (no fixed tick)
    app.update();

    let (player, targets) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_armed_actor(&mut commands, config.player_stats.clone(), config.weapon.clone())?;
        let mut targets = Vec::with_capacity(TARGET_POSITIONS.len());
        for position in TARGET_POSITIONS {
            targets.push((spawn_target(&mut commands, config.enemy_stats.clone())?, position));
        }
        (player, targets)
    };
    // Apply the queued spawns before anything looks the entities up
    app.world_mut().flush();

    let caster = targets.iter().fold(SphereRayCaster::new(), |caster, (entity, position)| {
        caster.with_collider(*entity, *position, TARGET_RADIUS, config.weapon.collision_mask)
    });
    app.insert_resource(RayCastBackend::new(caster));

    let origin = Vec3::ZERO;
    let mut ticks = 0;
    let mut drops = Vec::new();

    while ticks < MAX_TICKS {
        let next_target = targets.iter().find(|(entity, _)| {
            app.world()
                .get::<StatsModel>(*entity)
                .is_some_and(StatsModel::is_alive)
        });

        let Some((_, position)) = next_target else {
            break;
        };

        app.world_mut().send_event(WeaponFireIntent {
            shooter: player,
            origin,
            direction: *position - origin,
        });
        app.update();
        ticks += 1;

        let pending = std::mem::take(&mut app.world_mut().resource_mut::<PendingDrops>().0);
        for drop in pending {
            log_info(&format!("🎁 {:?} drop at {:?}, collecting", drop.rarity, drop.position));
            drops.push(drop.rarity);
            app.world_mut().send_event(LootCollected {
                collector: player,
                rarity: drop.rarity,
            });
        }
    }

    // Let the last pickups and the death grace play out
    let grace_ticks = (config.death_grace_seconds as f64 * config.simulation_hz).ceil() as u32 + 2;
    for _ in 0..grace_ticks {
        app.update();
    }

    let world = app.world();
    let targets_left = targets
        .iter()
        .filter(|(entity, _)| world.get_entity(*entity).is_ok())
        .count();

    let stats = world.get::<StatsModel>(player);
    let weapon = world.get::<WeaponState>(player);

    Ok(RangeSummary {
        ticks,
        targets_left,
        drops,
        player_level: stats.map_or(0, StatsModel::level),
        player_xp: stats.map_or(0, StatsModel::xp),
        player_health: stats.map_or(0.0, StatsModel::health),
        shots_fired: weapon.map_or(0, WeaponState::shots_fired),
        shots_hit: weapon.map_or(0, WeaponState::shots_hit),
        weapon: weapon.map(ToString::to_string).unwrap_or_default(),
    })
}
