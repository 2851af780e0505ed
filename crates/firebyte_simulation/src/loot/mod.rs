//! Loot rarity rolls and pickup rewards
//!
//! Weights: Common 60%, Rare 30%, Epic 10%. The roll is a pure function of
//! the random source, so a seeded `ChaCha8Rng` gives reproducible drops.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stats::StatsModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootRarity {
    Common,
    Rare,
    Epic,
}

/// Draw < 0.6 → Common
pub const COMMON_THRESHOLD: f64 = 0.6;
/// 0.6 ≤ draw < 0.9 → Rare, above → Epic
pub const RARE_THRESHOLD: f64 = 0.9;

impl LootRarity {
    pub const ALL: [LootRarity; 3] = [LootRarity::Common, LootRarity::Rare, LootRarity::Epic];

    /// Drop probability
    pub fn weight(self) -> f64 {
        match self {
            LootRarity::Common => 0.6,
            LootRarity::Rare => 0.3,
            LootRarity::Epic => 0.1,
        }
    }

    /// What picking up a box of this rarity grants
    pub fn reward(self) -> LootReward {
        match self {
            LootRarity::Common => LootReward { heal: 25.0, xp: 25 },
            LootRarity::Rare => LootReward { heal: 50.0, xp: 75 },
            LootRarity::Epic => LootReward { heal: 100.0, xp: 150 },
        }
    }
}

/// Map a uniform draw in [0, 1) to a tier
pub fn rarity_for_draw(draw: f64) -> LootRarity {
    if draw < COMMON_THRESHOLD {
        LootRarity::Common
    } else if draw < RARE_THRESHOLD {
        LootRarity::Rare
    } else {
        LootRarity::Epic
    }
}

/// Roll a tier from an injected random source
pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R) -> LootRarity {
    rarity_for_draw(rng.gen::<f64>())
}

/// Pickup bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootReward {
    pub heal: f32,
    pub xp: i32,
}

impl LootReward {
    /// Heal first, then XP (a level-up restores health anyway)
    pub fn apply(&self, stats: &mut StatsModel) {
        stats.heal(self.heal);
        stats.add_xp(self.xp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_thresholds() {
        assert_eq!(rarity_for_draw(0.0), LootRarity::Common);
        assert_eq!(rarity_for_draw(0.5999), LootRarity::Common);
        assert_eq!(rarity_for_draw(0.6), LootRarity::Rare);
        assert_eq!(rarity_for_draw(0.8999), LootRarity::Rare);
        assert_eq!(rarity_for_draw(0.9), LootRarity::Epic);
        assert_eq!(rarity_for_draw(0.999_999), LootRarity::Epic);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = LootRarity::ALL.iter().map(|r| r.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        let rolls_a: Vec<_> = (0..64).map(|_| roll_rarity(&mut a)).collect();
        let rolls_b: Vec<_> = (0..64).map(|_| roll_rarity(&mut b)).collect();

        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_distribution_over_100k_rolls() {
        const ROLLS: usize = 100_000;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut counts = [0usize; 3];

        for _ in 0..ROLLS {
            let index = match roll_rarity(&mut rng) {
                LootRarity::Common => 0,
                LootRarity::Rare => 1,
                LootRarity::Epic => 2,
            };
            counts[index] += 1;
        }

        // σ ≤ sqrt(0.25 / 100k) ≈ 0.0016 → 0.01 is > 6σ
        for (rarity, count) in LootRarity::ALL.iter().zip(counts) {
            let observed = count as f64 / ROLLS as f64;
            assert!(
                (observed - rarity.weight()).abs() < 0.01,
                "{:?}: observed {:.4}, expected {:.2}",
                rarity,
                observed,
                rarity.weight()
            );
        }
    }

    #[test]
    fn test_reward_table() {
        assert_eq!(LootRarity::Common.reward(), LootReward { heal: 25.0, xp: 25 });
        assert_eq!(LootRarity::Rare.reward(), LootReward { heal: 50.0, xp: 75 });
        assert_eq!(LootRarity::Epic.reward(), LootReward { heal: 100.0, xp: 150 });
    }

    #[test]
    fn test_reward_apply_heals_and_grants_xp() {
        let mut stats = StatsModel::new(StatsConfig::player()).unwrap();
        stats.take_damage(60.0);

        LootRarity::Rare.reward().apply(&mut stats);

        assert_eq!(stats.health(), 90.0);
        assert_eq!(stats.xp(), 75);
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn test_epic_reward_levels_up() {
        let mut stats = StatsModel::new(StatsConfig::player()).unwrap();

        LootRarity::Epic.reward().apply(&mut stats);

        assert_eq!(stats.level(), 2);
        assert_eq!(stats.xp(), 50);
    }
}
