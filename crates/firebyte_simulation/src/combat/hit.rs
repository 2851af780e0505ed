//! Hit resolution: ray-cast result → damage → death → loot
//!
//! Pipeline (strict order):
//! 1. miss → nothing
//! 2. target without stats (scenery) → reported as a hit, no damage
//! 3. target with stats → `take_damage(weapon damage)`, then `register_hit`
//! 4. alive → dead transition → disable damage intake, roll loot,
//!    hand (impact position, rarity) to the loot spawner
//!
//! Physics, loot instantiation and target lookup are collaborators behind
//! traits, so the resolver runs the same inside and outside the ECS.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

use crate::logger::{log, log_info};
use crate::loot::{roll_rarity, LootRarity};
use crate::stats::StatsModel;
use crate::weapon::WeaponState;

/// Default delay between death and actor removal (death animation/effects)
pub const DEFAULT_DEATH_GRACE_SECONDS: f32 = 3.0;

/// Result of one ray-cast (produced by physics, consumed once)
///
/// `H` is the physics layer's opaque target handle (an `Entity` in the ECS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult<H = Entity> {
    pub did_hit: bool,
    pub position: Vec3,
    pub normal: Vec3,
    pub target: Option<H>,
}

impl<H> HitResult<H> {
    pub fn miss() -> Self {
        Self {
            did_hit: false,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            target: None,
        }
    }

    pub fn hit(position: Vec3, normal: Vec3, target: H) -> Self {
        Self {
            did_hit: true,
            position,
            normal,
            target: Some(target),
        }
    }

    /// Hit on something the physics layer can't name (terrain, sky box...)
    pub fn hit_world(position: Vec3, normal: Vec3) -> Self {
        Self {
            did_hit: true,
            position,
            normal,
            target: None,
        }
    }
}

/// Physics query: origin + direction + range + collision mask → HitResult
pub trait RayCaster: Send + Sync {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        collision_mask: u32,
    ) -> HitResult<Entity>;
}

/// Resolves a target handle to its stats (None = scenery)
pub trait TargetLookup<H> {
    fn stats_mut(&mut self, target: &H) -> Option<&mut StatsModel>;
}

impl<H: Eq + Hash> TargetLookup<H> for HashMap<H, StatsModel> {
    fn stats_mut(&mut self, target: &H) -> Option<&mut StatsModel> {
        self.get_mut(target)
    }
}

/// Instantiates a pickup at `position`
pub trait LootSpawner {
    fn spawn_loot(&mut self, position: Vec3, rarity: LootRarity);
}

impl LootSpawner for Vec<(Vec3, LootRarity)> {
    fn spawn_loot(&mut self, position: Vec3, rarity: LootRarity) {
        self.push((position, rarity));
    }
}

/// What one resolved shot did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Miss,
    /// Hit something without stats (impact effects only)
    Scenery { position: Vec3, normal: Vec3 },
    Damaged {
        position: Vec3,
        normal: Vec3,
        /// Health actually removed
        damage: f32,
        remaining_health: f32,
    },
    Killed {
        position: Vec3,
        normal: Vec3,
        damage: f32,
        rarity: LootRarity,
        /// Seconds until the collaborator should remove the actor
        despawn_after: f32,
        /// Victim's `xp_value`, owed to the shooter
        xp_reward: u32,
    },
}

impl HitOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, HitOutcome::Miss)
    }

    pub fn is_kill(&self) -> bool {
        matches!(self, HitOutcome::Killed { .. })
    }

    pub fn impact(&self) -> Option<(Vec3, Vec3)> {
        match *self {
            HitOutcome::Miss => None,
            HitOutcome::Scenery { position, normal }
            | HitOutcome::Damaged { position, normal, .. }
            | HitOutcome::Killed { position, normal, .. } => Some((position, normal)),
        }
    }
}

/// Stateless resolver (only holds the death grace delay)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct HitResolver {
    pub death_grace_seconds: f32,
}

impl Default for HitResolver {
    fn default() -> Self {
        Self {
            death_grace_seconds: DEFAULT_DEATH_GRACE_SECONDS,
        }
    }
}

impl HitResolver {
    pub fn new(death_grace_seconds: f32) -> Self {
        Self { death_grace_seconds }
    }

    /// Apply one ray-cast result fired by `weapon`
    ///
    /// The shot itself (ammo) must already be consumed by `WeaponState::shoot`.
    pub fn resolve<H, L, S, R>(
        &self,
        hit: &HitResult<H>,
        weapon: &mut WeaponState,
        targets: &mut L,
        loot: &mut S,
        rng: &mut R,
    ) -> HitOutcome
    where
        L: TargetLookup<H> + ?Sized,
        S: LootSpawner + ?Sized,
        R: Rng + ?Sized,
    {
        if !hit.did_hit {
            log("❌ Missed - nothing hit");
            return HitOutcome::Miss;
        }

        let position = hit.position;
        let normal = hit.normal;

        let Some(stats) = hit.target.as_ref().and_then(|target| targets.stats_mut(target)) else {
            log(&format!("🧱 Scenery hit at {:?}", position));
            return HitOutcome::Scenery { position, normal };
        };

        let was_alive = stats.is_alive();
        let health_before = stats.health();
        stats.take_damage(weapon.current_damage());
        let damage = health_before - stats.health();
        let remaining_health = stats.health();
        let killed = was_alive && !stats.is_alive();
        let xp_reward = stats.xp_value();
        if killed {
            stats.disable_damage();
        }

        weapon.register_hit();

        if !killed {
            return HitOutcome::Damaged {
                position,
                normal,
                damage,
                remaining_health,
            };
        }

        let rarity = roll_rarity(rng);
        log_info(&format!("💀 Target killed - 🎁 {:?} loot at {:?}", rarity, position));
        loot.spawn_loot(position, rarity);

        HitOutcome::Killed {
            position,
            normal,
            damage,
            rarity,
            despawn_after: self.death_grace_seconds,
            xp_reward,
        }
    }
}
