//! Progression curve and level-up growth
//!
//! XP needed for the next level: `round(100 * 1.5^(level - 1))`.
//! Growth per level is fixed (no per-class curves).

/// XP required at level 1
pub const BASE_XP_TO_NEXT_LEVEL: f64 = 100.0;

/// Per-level multiplier of the XP requirement
pub const XP_GROWTH_FACTOR: f64 = 1.5;

/// Stats granted on every level-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelGrowth {
    pub max_health: f32,
    pub max_energy: f32,
    pub health_regen_rate: f32,
    pub energy_regen_rate: f32,
}

pub const LEVEL_GROWTH: LevelGrowth = LevelGrowth {
    max_health: 10.0,
    max_energy: 5.0,
    health_regen_rate: 0.2,
    energy_regen_rate: 0.3,
};

/// XP required to go from `level` to `level + 1`
///
/// Levels below 1 are treated as level 1. Saturates at `u32::MAX`.
pub fn xp_to_next_level(level: u32) -> u32 {
    let exponent = level.max(1) - 1;
    let required = (BASE_XP_TO_NEXT_LEVEL * XP_GROWTH_FACTOR.powi(exponent as i32)).round();

    if required >= u32::MAX as f64 {
        u32::MAX
    } else {
        required as u32
    }
}
