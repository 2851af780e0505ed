//! Health / energy / XP model of one actor
//!
//! Invariants:
//! - 0 ≤ health ≤ max_health, 0 ≤ energy ≤ max_energy
//! - xp_to_next_level = progression curve at the current level
//! - `Died` fires once per crossing to 0 health
//!
//! Regeneration runs on its own fixed period (`regen_interval`),
//! independent of how often `advance` is called.

use bevy::prelude::*;

use crate::config::{ConfigError, StatsConfig};
use crate::logger::log;
use crate::observer::{Listener, ListenerId, Observers};
use crate::progression::{xp_to_next_level, LEVEL_GROWTH};

use super::events::StatsEvent;

/// Absorbs f32 drift when frame deltas add up to exactly one interval
const REGEN_TIMER_EPSILON: f32 = 1e-6;

/// Upper bound on ticks applied by one `advance` call (long pause, huge delta)
pub const MAX_REGEN_CATCH_UP_TICKS: u32 = 10_000;

#[derive(Component, Debug)]
pub struct StatsModel {
    base: StatsConfig,

    health: f32,
    max_health: f32,
    energy: f32,
    max_energy: f32,
    health_regen_rate: f32,
    energy_regen_rate: f32,

    xp: u32,
    level: u32,
    xp_to_next_level: u32,
    xp_multiplier: f32,

    /// Time accumulated towards the next regeneration tick
    regen_elapsed: f32,
    /// Cleared by the death sequence (corpses don't take hits)
    damage_enabled: bool,

    observers: Observers<StatsEvent>,
}

impl StatsModel {
    /// Fails fast on a malformed config
    pub fn new(config: StatsConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            health: config.max_health,
            max_health: config.max_health,
            energy: config.max_energy,
            max_energy: config.max_energy,
            health_regen_rate: config.health_regen_rate,
            energy_regen_rate: config.energy_regen_rate,
            xp: 0,
            level: 1,
            xp_to_next_level: xp_to_next_level(1),
            xp_multiplier: config.xp_multiplier,
            regen_elapsed: 0.0,
            damage_enabled: true,
            observers: Observers::default(),
            base: config,
        })
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl Listener<StatsEvent> + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: StatsEvent) {
        self.observers.emit(&event);
    }

    fn emit_health(&mut self) {
        self.emit(StatsEvent::HealthChanged {
            current: self.health,
            max: self.max_health,
        });
    }

    fn emit_energy(&mut self) {
        self.emit(StatsEvent::EnergyChanged {
            current: self.energy,
            max: self.max_energy,
        });
    }

    fn emit_xp(&mut self) {
        self.emit(StatsEvent::XpChanged {
            current: self.xp,
            to_next: self.xp_to_next_level,
            level: self.level,
        });
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Non-positive (or NaN) damage is ignored. So is damage while disabled.
    pub fn take_damage(&mut self, amount: f32) {
        if !(amount > 0.0) || !self.damage_enabled {
            return;
        }

        let was_alive = self.is_alive();
        let previous = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);

        let applied = previous - self.health;
        if applied <= 0.0 {
            // Already at 0: clamped, nothing to report
            return;
        }

        log(&format!(
            "💥 Damage taken: {:.1} (health {:.1}/{:.1})",
            applied, self.health, self.max_health
        ));

        self.emit_health();
        self.emit(StatsEvent::DamageTaken { amount: applied });

        if was_alive && !self.is_alive() {
            log("💀 Health depleted");
            self.emit(StatsEvent::Died);
        }
    }

    /// Restores up to `amount`. Also the only way back from 0 health.
    ///
    /// Healing a dead actor revives it: damage intake is re-enabled even if
    /// the death sequence turned it off.
    pub fn heal(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }

        let was_alive = self.is_alive();
        let previous = self.health;
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        let actual = self.health - previous;

        if actual <= 0.0 {
            return;
        }

        if !was_alive {
            self.damage_enabled = true;
            log("✨ Revived");
        }

        log(&format!(
            "💚 Healed: {:.1} (health {:.1}/{:.1})",
            actual, self.health, self.max_health
        ));

        self.emit_health();
        self.emit(StatsEvent::Healed { amount: actual });
    }

    /// Returns false (energy untouched) if there is not enough energy
    pub fn use_energy(&mut self, amount: f32) -> bool {
        if !(amount > 0.0) {
            return true;
        }

        if amount > self.energy {
            log(&format!(
                "❌ Not enough energy: need {:.1}, have {:.1}",
                amount, self.energy
            ));
            return false;
        }

        self.energy = (self.energy - amount).clamp(0.0, self.max_energy);
        self.emit_energy();
        self.emit(StatsEvent::EnergyUsed { amount });
        true
    }

    /// Credits `round(amount * xp_multiplier)` and applies every level-up it pays for
    pub fn add_xp(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }

        let gained = (amount as f64 * self.xp_multiplier as f64).round();
        let gained = if gained >= u32::MAX as f64 {
            u32::MAX
        } else {
            gained as u32
        };

        self.xp = self.xp.saturating_add(gained);
        log(&format!(
            "⭐ XP gained: {} (total {}/{})",
            gained, self.xp, self.xp_to_next_level
        ));
        self.emit(StatsEvent::XpGained { amount: gained });

        while self.xp >= self.xp_to_next_level {
            self.level_up();
        }

        self.emit_xp();
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.xp -= self.xp_to_next_level;
        self.xp_to_next_level = xp_to_next_level(self.level);

        self.max_health += LEVEL_GROWTH.max_health;
        self.max_energy += LEVEL_GROWTH.max_energy;
        self.health_regen_rate += LEVEL_GROWTH.health_regen_rate;
        self.energy_regen_rate += LEVEL_GROWTH.energy_regen_rate;

        self.health = self.max_health;
        self.energy = self.max_energy;
        // Full health again, so a corpse levelled by late XP is alive
        self.damage_enabled = true;

        crate::logger::log_info(&format!(
            "🎉 LEVEL UP! Level {} (max health {:.0}, max energy {:.0})",
            self.level, self.max_health, self.max_energy
        ));

        self.emit_health();
        self.emit_energy();
        self.emit(StatsEvent::LevelUp { level: self.level });
    }

    /// Back to level 1 with base stats, full health/energy
    pub fn reset_stats(&mut self) {
        self.max_health = self.base.max_health;
        self.max_energy = self.base.max_energy;
        self.health_regen_rate = self.base.health_regen_rate;
        self.energy_regen_rate = self.base.energy_regen_rate;
        self.xp_multiplier = self.base.xp_multiplier;

        self.health = self.max_health;
        self.energy = self.max_energy;
        self.xp = 0;
        self.level = 1;
        self.xp_to_next_level = xp_to_next_level(1);
        self.regen_elapsed = 0.0;
        self.damage_enabled = true;

        log("🔄 Stats reset");

        self.emit_health();
        self.emit_energy();
        self.emit_xp();
    }

    /// Corpse state: further `take_damage` calls are ignored
    pub fn disable_damage(&mut self) {
        self.damage_enabled = false;
    }

    // ------------------------------------------------------------------
    // Regeneration
    // ------------------------------------------------------------------

    /// Advance the regeneration timer; applies one tick per elapsed `regen_interval`
    ///
    /// At most `MAX_REGEN_CATCH_UP_TICKS` per call, and none once both pools
    /// are full. Leftover time below one interval carries over unless the
    /// cap was hit.
    pub fn advance(&mut self, delta_secs: f32) {
        if !(delta_secs > 0.0) {
            return;
        }

        if !self.is_alive() {
            self.regen_elapsed = 0.0;
            return;
        }

        let interval = self.base.regen_interval;
        self.regen_elapsed += delta_secs;

        let due = ((self.regen_elapsed + REGEN_TIMER_EPSILON) / interval).floor();
        if !(due >= 1.0) {
            return;
        }

        let ticks = if due >= MAX_REGEN_CATCH_UP_TICKS as f32 {
            // Backlog dropped, remainder included
            self.regen_elapsed = 0.0;
            MAX_REGEN_CATCH_UP_TICKS
        } else {
            self.regen_elapsed = (self.regen_elapsed - due * interval).clamp(0.0, interval);
            due as u32
        };

        for _ in 0..ticks {
            if !self.needs_regen() {
                break;
            }
            self.regenerate_tick();
        }
    }

    fn needs_regen(&self) -> bool {
        (self.health < self.max_health && self.health_regen_rate > 0.0)
            || (self.energy < self.max_energy && self.energy_regen_rate > 0.0)
    }

    /// One regeneration step of `regen_interval` seconds
    ///
    /// No-op at max and while dead.
    pub fn regenerate_tick(&mut self) {
        if !self.is_alive() {
            return;
        }

        let interval = self.base.regen_interval;

        if self.health < self.max_health && self.health_regen_rate > 0.0 {
            self.health = (self.health + self.health_regen_rate * interval).min(self.max_health);
            self.emit_health();
        }

        if self.energy < self.max_energy && self.energy_regen_rate > 0.0 {
            self.energy = (self.energy + self.energy_regen_rate * interval).min(self.max_energy);
            self.emit_energy();
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn max_energy(&self) -> f32 {
        self.max_energy
    }

    pub fn health_regen_rate(&self) -> f32 {
        self.health_regen_rate
    }

    pub fn energy_regen_rate(&self) -> f32 {
        self.energy_regen_rate
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.xp_to_next_level
    }

    pub fn xp_multiplier(&self) -> f32 {
        self.xp_multiplier
    }

    /// XP the killer of this actor earns
    pub fn xp_value(&self) -> u32 {
        self.base.xp_value
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn damage_enabled(&self) -> bool {
        self.damage_enabled
    }

    pub fn has_enough_energy(&self, amount: f32) -> bool {
        self.energy >= amount
    }

    pub fn health_fraction(&self) -> f32 {
        self.health / self.max_health
    }

    pub fn energy_fraction(&self) -> f32 {
        self.energy / self.max_energy
    }

    pub fn xp_fraction(&self) -> f32 {
        self.xp as f32 / self.xp_to_next_level as f32
    }
}
