//! Combat systems (FixedUpdate)
//!
//! Models stay plain structs; systems only route events into them and
//! publish what they report back.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{Dead, DespawnAfter, RayCastBackend, StatsEventBuffer, WeaponEventBuffer};
use super::events::{
    CancelReloadIntent, EntityDied, HitReported, LootCollected, LootDropped, ReloadIntent,
    ShotResolved, StatsNotification, WeaponFireIntent, WeaponNotification,
};
use super::hit::{HitOutcome, HitResolver, HitResult, LootSpawner, TargetLookup};
use crate::logger::{log, log_info, log_warning};
use crate::loot::LootRarity;
use crate::stats::StatsModel;
use crate::weapon::WeaponState;
use crate::DeterministicRng;

/// Event writers fed by hit resolution
#[derive(SystemParam)]
pub struct HitOutputs<'w> {
    shots: EventWriter<'w, ShotResolved>,
    deaths: EventWriter<'w, EntityDied>,
    loot: EventWriter<'w, LootDropped>,
}

/// Stats lookup over the ECS. The shooter never resolves as its own target.
struct StatsQueryLookup<'q, 'w, 's, 'a> {
    stats: &'q mut Query<'w, 's, &'a mut StatsModel>,
    shooter: Entity,
}

impl TargetLookup<Entity> for StatsQueryLookup<'_, '_, '_, '_> {
    fn stats_mut(&mut self, target: &Entity) -> Option<&mut StatsModel> {
        if *target == self.shooter {
            log_warning(&format!("Self-hit ignored for {:?}", self.shooter));
            return None;
        }
        self.stats.get_mut(*target).ok().map(Mut::into_inner)
    }
}

struct LootEventSpawner<'a, 'w> {
    writer: &'a mut EventWriter<'w, LootDropped>,
    dropped_by: Entity,
}

impl LootSpawner for LootEventSpawner<'_, '_> {
    fn spawn_loot(&mut self, position: Vec3, rarity: LootRarity) {
        self.writer.write(LootDropped {
            position,
            rarity,
            dropped_by: self.dropped_by,
        });
    }
}

/// Resolve one hit and publish the outcome (shared by fired and reported shots)
#[allow(clippy::too_many_arguments)]
fn resolve_and_publish(
    shooter: Entity,
    hit: &HitResult<Entity>,
    weapon: &mut WeaponState,
    stats: &mut Query<&mut StatsModel>,
    resolver: &HitResolver,
    rng: &mut DeterministicRng,
    commands: &mut Commands,
    now: f32,
    outputs: &mut HitOutputs,
) {
    let target = hit.target.filter(|target| *target != shooter);
    let outcome = {
        let mut lookup = StatsQueryLookup { stats, shooter };
        let mut spawner = LootEventSpawner {
            writer: &mut outputs.loot,
            dropped_by: target.unwrap_or(shooter),
        };
        resolver.resolve(hit, weapon, &mut lookup, &mut spawner, &mut rng.rng)
    };

    if let (
        HitOutcome::Killed {
            despawn_after,
            xp_reward,
            ..
        },
        Some(target),
    ) = (outcome, target)
    {
        if let Ok(mut entity_commands) = commands.get_entity(target) {
            entity_commands.insert((
                Dead,
                DespawnAfter {
                    despawn_time: now + despawn_after,
                },
            ));
        }
        outputs.deaths.write(EntityDied {
            entity: target,
            killer: Some(shooter),
        });
        log_info(&format!("Entity {:?} killed by {:?}", target, shooter));

        if xp_reward > 0 {
            if let Ok(mut shooter_stats) = stats.get_mut(shooter) {
                shooter_stats.add_xp(i32::try_from(xp_reward).unwrap_or(i32::MAX));
            }
        }
    }

    outputs.shots.write(ShotResolved {
        shooter,
        target,
        outcome,
    });
}

/// System: subscribe an event buffer to every new model
pub fn attach_event_buffers(
    mut commands: Commands,
    mut new_stats: Query<(Entity, &mut StatsModel), Added<StatsModel>>,
    mut new_weapons: Query<(Entity, &mut WeaponState), Added<WeaponState>>,
) {
    for (entity, mut stats) in new_stats.iter_mut() {
        let buffer = StatsEventBuffer::default();
        stats.subscribe(buffer.0.listener());
        commands.entity(entity).insert(buffer);
    }

    for (entity, mut weapon) in new_weapons.iter_mut() {
        let buffer = WeaponEventBuffer::default();
        weapon.subscribe(buffer.0.listener());
        commands.entity(entity).insert(buffer);
    }
}

/// System: reload/cooldown countdowns
pub fn advance_weapons(mut weapons: Query<&mut WeaponState>, time: Res<Time>) {
    let delta = time.delta_secs();
    for mut weapon in weapons.iter_mut() {
        weapon.advance(delta);
    }
}

pub fn handle_reload_intents(
    mut reloads: EventReader<ReloadIntent>,
    mut cancels: EventReader<CancelReloadIntent>,
    mut weapons: Query<&mut WeaponState>,
) {
    for intent in reloads.read() {
        match weapons.get_mut(intent.entity) {
            Ok(mut weapon) => {
                weapon.reload();
            }
            Err(_) => log_warning(&format!("ReloadIntent: {:?} has no WeaponState", intent.entity)),
        }
    }

    for intent in cancels.read() {
        if let Ok(mut weapon) = weapons.get_mut(intent.entity) {
            weapon.cancel_reload();
        }
    }
}

/// System: trigger → shoot → ray-cast → resolve
///
/// Ammo is consumed before the ray-cast. A refused shot (cooldown, reload,
/// empty) produces nothing. Dead actors don't shoot.
#[allow(clippy::too_many_arguments)]
pub fn fire_weapons(
    mut commands: Commands,
    mut intents: EventReader<WeaponFireIntent>,
    mut weapons: Query<&mut WeaponState, Without<Dead>>,
    mut stats: Query<&mut StatsModel>,
    backend: Option<Res<RayCastBackend>>,
    resolver: Res<HitResolver>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut outputs: HitOutputs,
) {
    let now = time.elapsed_secs();

    for intent in intents.read() {
        let Ok(mut weapon) = weapons.get_mut(intent.shooter) else {
            log_warning(&format!("WeaponFireIntent: {:?} has no WeaponState", intent.shooter));
            continue;
        };

        if !weapon.shoot() {
            continue;
        }

        let hit = match backend.as_deref() {
            Some(RayCastBackend(caster)) => caster.cast_ray(
                intent.origin,
                intent.direction,
                weapon.range(),
                weapon.collision_mask(),
            ),
            None => {
                log("No RayCastBackend - shot resolves as miss");
                HitResult::miss()
            }
        };

        resolve_and_publish(
            intent.shooter,
            &hit,
            &mut weapon,
            &mut stats,
            &resolver,
            &mut rng,
            &mut commands,
            now,
            &mut outputs,
        );
    }
}

/// System: apply hits ray-cast outside the simulation
#[allow(clippy::too_many_arguments)]
pub fn resolve_reported_hits(
    mut commands: Commands,
    mut reports: EventReader<HitReported>,
    mut weapons: Query<&mut WeaponState>,
    mut stats: Query<&mut StatsModel>,
    resolver: Res<HitResolver>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut outputs: HitOutputs,
) {
    let now = time.elapsed_secs();

    for report in reports.read() {
        let Ok(mut weapon) = weapons.get_mut(report.shooter) else {
            log_warning(&format!("HitReported: {:?} has no WeaponState", report.shooter));
            continue;
        };

        resolve_and_publish(
            report.shooter,
            &report.hit,
            &mut weapon,
            &mut stats,
            &resolver,
            &mut rng,
            &mut commands,
            now,
            &mut outputs,
        );
    }
}

/// System: pickups grant their reward to the collector
pub fn apply_loot_pickups(mut pickups: EventReader<LootCollected>, mut stats: Query<&mut StatsModel>) {
    for pickup in pickups.read() {
        match stats.get_mut(pickup.collector) {
            Ok(mut model) => {
                log_info(&format!("🎁 {:?} picked up {:?} loot", pickup.collector, pickup.rarity));
                pickup.rarity.reward().apply(&mut model);
            }
            Err(_) => log_warning(&format!("LootCollected: {:?} has no StatsModel", pickup.collector)),
        }
    }
}

/// System: passive regeneration
pub fn advance_stats(mut stats: Query<&mut StatsModel>, time: Res<Time>) {
    let delta = time.delta_secs();
    for mut model in stats.iter_mut() {
        model.advance(delta);
    }
}

/// System: despawn dead entities after their grace period
pub fn despawn_after_timeout(
    mut commands: Commands,
    time: Res<Time>,
    query: Query<(Entity, &DespawnAfter)>,
) {
    let now = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_time {
            commands.entity(entity).despawn();
            log(&format!("Despawned {:?} after death grace", entity));
        }
    }
}

/// System: drain model buffers into Bevy events
pub fn publish_model_events(
    stats_buffers: Query<(Entity, &StatsEventBuffer)>,
    weapon_buffers: Query<(Entity, &WeaponEventBuffer)>,
    mut stats_events: EventWriter<StatsNotification>,
    mut weapon_events: EventWriter<WeaponNotification>,
) {
    for (entity, buffer) in stats_buffers.iter() {
        for event in buffer.0.drain() {
            stats_events.write(StatsNotification { entity, event });
        }
    }

    for (entity, buffer) in weapon_buffers.iter() {
        for event in buffer.0.drain() {
            weapon_events.write(WeaponNotification { entity, event });
        }
    }
}
