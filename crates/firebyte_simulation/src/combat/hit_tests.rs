use super::hit::*;
use crate::config::{StatsConfig, WeaponConfig};
use crate::loot::{rarity_for_draw, LootRarity};
use crate::stats::{StatsEvent, StatsModel};
use crate::weapon::WeaponState;
use crate::observer::EventBuffer;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

const TARGET: u32 = 7;

fn setup(target_health: f32) -> (WeaponState, HashMap<u32, StatsModel>, Vec<(Vec3, LootRarity)>, ChaCha8Rng) {
    let weapon = WeaponState::new(WeaponConfig::assault_rifle()).unwrap();
    let mut targets = HashMap::new();
    targets.insert(TARGET, StatsModel::new(StatsConfig::destructible(target_health)).unwrap());
    (weapon, targets, Vec::new(), ChaCha8Rng::seed_from_u64(42))
}

fn hit_target() -> HitResult<u32> {
    HitResult::hit(Vec3::new(1.0, 0.0, 5.0), Vec3::Z, TARGET)
}

#[test]
fn test_miss_changes_nothing() {
    let (mut weapon, mut targets, mut loot, mut rng) = setup(100.0);
    assert!(weapon.shoot());

    let outcome = HitResolver::default().resolve(
        &HitResult::<u32>::miss(),
        &mut weapon,
        &mut targets,
        &mut loot,
        &mut rng,
    );

    assert_eq!(outcome, HitOutcome::Miss);
    assert!(!outcome.is_hit());
    assert_eq!(weapon.shots_hit(), 0);
    assert_eq!(targets[&TARGET].health(), 100.0);
    assert!(loot.is_empty());
}

#[test]
fn test_scenery_hit_without_handle() {
    let (mut weapon, mut targets, mut loot, mut rng) = setup(100.0);
    weapon.shoot();

    let hit = HitResult::<u32>::hit_world(Vec3::new(0.0, 0.0, 20.0), Vec3::Y);
    let outcome = HitResolver::default().resolve(&hit, &mut weapon, &mut targets, &mut loot, &mut rng);

    assert_eq!(
        outcome,
        HitOutcome::Scenery {
            position: Vec3::new(0.0, 0.0, 20.0),
            normal: Vec3::Y
        }
    );
    assert_eq!(weapon.shots_hit(), 0);
}

#[test]
fn test_scenery_hit_unknown_handle() {
    let (mut weapon, mut targets, mut loot, mut rng) = setup(100.0);
    weapon.shoot();

    let hit = HitResult::hit(Vec3::ZERO, Vec3::Y, 999u32);
    let outcome = HitResolver::default().resolve(&hit, &mut weapon, &mut targets, &mut loot, &mut rng);

    assert!(matches!(outcome, HitOutcome::Scenery { .. }));
    assert_eq!(weapon.shots_hit(), 0);
    assert!(loot.is_empty());
}

#[test]
fn test_damaging_hit() {
    let (mut weapon, mut targets, mut loot, mut rng) = setup(100.0);
    weapon.shoot();

    let outcome = HitResolver::default().resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng);

    assert_eq!(
        outcome,
        HitOutcome::Damaged {
            position: Vec3::new(1.0, 0.0, 5.0),
            normal: Vec3::Z,
            damage: 25.0,
            remaining_health: 75.0,
        }
    );
    assert_eq!(weapon.shots_hit(), 1);
    assert_eq!(weapon.accuracy(), 1.0);
    assert!(loot.is_empty());
}

#[test]
fn test_lethal_hit_rolls_loot_once() {
    // 25 damage vs 20 health → dies on the first hit
    let (mut weapon, mut targets, mut loot, _) = setup(20.0);
    let events = EventBuffer::new();
    targets.get_mut(&TARGET).unwrap().subscribe(events.listener());

    // Loot roll must come from the injected source
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut expected_rng = ChaCha8Rng::seed_from_u64(42);
    let expected = rarity_for_draw(rand::Rng::gen::<f64>(&mut expected_rng));

    weapon.shoot();
    let outcome = HitResolver::default().resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng);

    assert_eq!(
        outcome,
        HitOutcome::Killed {
            position: Vec3::new(1.0, 0.0, 5.0),
            normal: Vec3::Z,
            damage: 20.0,
            rarity: expected,
            despawn_after: DEFAULT_DEATH_GRACE_SECONDS,
            xp_reward: 0,
        }
    );
    assert!(outcome.is_kill());
    assert_eq!(loot, vec![(Vec3::new(1.0, 0.0, 5.0), expected)]);

    let died = events.drain().into_iter().filter(|e| *e == StatsEvent::Died).count();
    assert_eq!(died, 1);

    // Corpse: damage intake disabled, no second loot
    let target = &targets[&TARGET];
    assert!(!target.is_alive());
    assert!(!target.damage_enabled());

    weapon.advance(1.0);
    weapon.shoot();
    let second = HitResolver::default().resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng);

    assert!(matches!(second, HitOutcome::Damaged { damage, .. } if damage == 0.0));
    assert_eq!(loot.len(), 1);
    assert!(events.drain().is_empty());
}

#[test]
fn test_kills_take_four_hits_on_enemy() {
    let mut weapon = WeaponState::new(WeaponConfig::assault_rifle()).unwrap();
    let mut targets = HashMap::new();
    targets.insert(TARGET, StatsModel::new(StatsConfig::enemy()).unwrap());
    let mut loot = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let resolver = HitResolver::new(1.5);

    let mut outcomes = Vec::new();
    for _ in 0..4 {
        assert!(weapon.shoot());
        outcomes.push(resolver.resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng));
        weapon.advance(weapon.fire_interval_seconds());
    }

    assert!(outcomes[..3].iter().all(|o| matches!(o, HitOutcome::Damaged { .. })));
    assert!(matches!(
        outcomes[3],
        HitOutcome::Killed { despawn_after, xp_reward, .. } if despawn_after == 1.5 && xp_reward == 50
    ));
    assert_eq!(weapon.shots_hit(), 4);
    assert_eq!(loot.len(), 1);
}

#[test]
fn test_healed_corpse_takes_damage_again() {
    let (mut weapon, mut targets, mut loot, mut rng) = setup(20.0);
    let resolver = HitResolver::default();

    weapon.shoot();
    let outcome = resolver.resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng);
    assert!(outcome.is_kill());
    assert!(!targets[&TARGET].damage_enabled());

    targets.get_mut(&TARGET).unwrap().heal(15.0);
    let target = &targets[&TARGET];
    assert!(target.is_alive());
    assert!(target.damage_enabled());

    // Revived target dies again (and drops again) from the next hit
    weapon.advance(1.0);
    weapon.shoot();
    let second = resolver.resolve(&hit_target(), &mut weapon, &mut targets, &mut loot, &mut rng);

    assert!(matches!(second, HitOutcome::Killed { damage, .. } if damage == 15.0));
    assert_eq!(loot.len(), 2);
}

#[test]
fn test_impact_accessor() {
    assert_eq!(HitOutcome::Miss.impact(), None);
    let scenery = HitOutcome::Scenery {
        position: Vec3::X,
        normal: Vec3::Y,
    };
    assert_eq!(scenery.impact(), Some((Vec3::X, Vec3::Y)));
}
