//! Stats notifications (UI bars, damage flash, level-up fanfare...)

/// Event emitted by `StatsModel` at the point of the state change
#[derive(Debug, Clone, PartialEq)]
pub enum StatsEvent {
    HealthChanged { current: f32, max: f32 },
    EnergyChanged { current: f32, max: f32 },
    XpChanged { current: u32, to_next: u32, level: u32 },
    LevelUp { level: u32 },
    /// Health crossed from > 0 to 0 (edge-triggered)
    Died,

    /// Amount removed from health (after clamping)
    DamageTaken { amount: f32 },
    /// Amount actually restored (may be less than requested)
    Healed { amount: f32 },
    EnergyUsed { amount: f32 },
    /// XP credited after the multiplier
    XpGained { amount: u32 },
}
