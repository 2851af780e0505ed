//! Firearm state machine (magazine, reserve, fire rate, reload)
//!
//! Phases:
//! - `Ready`: can shoot if the magazine is not empty
//! - `Cooldown`: fire-rate limit after a shot (not cancelable)
//! - `Reloading`: reload timer running (cancelable)
//!
//! Cooldown and reload are independent countdowns: a reload may start while
//! the cooldown is still running, the cooldown keeps ticking underneath.
//! Both durations are fixed when the timer starts.
//!
//! Ammo conservation: magazine + reserve only decreases on `shoot` and only
//! increases on `add_ammo`. Reload moves rounds, never creates them.

use bevy::prelude::*;
use std::fmt;

use crate::config::{ConfigError, WeaponConfig};
use crate::logger::log;
use crate::observer::{Listener, ListenerId, Observers};

use super::events::WeaponEvent;

/// Absorbs f32 drift when frame deltas add up to exactly one duration
const TIMER_EPSILON: f32 = 1e-6;

/// Derived phase of the weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponPhase {
    Ready,
    Cooldown,
    Reloading,
}

#[derive(Component, Debug)]
pub struct WeaponState {
    config: WeaponConfig,

    magazine_ammo: u32,
    reserve_ammo: u32,

    fire_interval: f32,
    cooldown_remaining: f32,
    reloading: bool,
    reload_remaining: f32,

    shots_fired: u32,
    shots_hit: u32,

    observers: Observers<WeaponEvent>,
}

impl WeaponState {
    /// Full magazine, configured reserve. Fails fast on a malformed config.
    pub fn new(config: WeaponConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            magazine_ammo: config.max_ammo,
            reserve_ammo: config.reserve_ammo,
            fire_interval: config.fire_interval_seconds(),
            cooldown_remaining: 0.0,
            reloading: false,
            reload_remaining: 0.0,
            shots_fired: 0,
            shots_hit: 0,
            observers: Observers::default(),
            config,
        })
    }

    pub fn subscribe(&mut self, listener: impl Listener<WeaponEvent> + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: WeaponEvent) {
        self.observers.emit(&event);
    }

    fn emit_ammo(&mut self) {
        self.emit(WeaponEvent::AmmoChanged {
            current: self.magazine_ammo,
            max: self.config.max_ammo,
            reserve: self.reserve_ammo,
        });
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Fire one round. Returns false (silently, no event) when not ready or empty:
    /// "trigger held but weapon not ready" is a normal condition.
    pub fn shoot(&mut self) -> bool {
        if !self.can_shoot() {
            log(&format!(
                "🔫 Can't fire: {:?}, magazine {}/{}",
                self.phase(),
                self.magazine_ammo,
                self.config.max_ammo
            ));
            return false;
        }

        self.magazine_ammo -= 1;
        self.shots_fired += 1;
        self.cooldown_remaining = self.fire_interval;

        log(&format!(
            "🔫 Fired! Magazine {}/{}",
            self.magazine_ammo, self.config.max_ammo
        ));

        self.emit(WeaponEvent::Fired);
        self.emit_ammo();
        true
    }

    /// Start the reload timer. No-op if already reloading, full, or out of reserve.
    pub fn reload(&mut self) -> bool {
        if !self.can_reload() {
            log("🔄 Can't reload: already reloading, magazine full or reserve empty");
            return false;
        }

        self.reloading = true;
        self.reload_remaining = self.config.reload_seconds;

        log(&format!("🔄 Reloading... ({}s)", self.config.reload_seconds));
        self.emit(WeaponEvent::ReloadStarted);
        true
    }

    /// Abort the reload without moving any ammo
    pub fn cancel_reload(&mut self) -> bool {
        if !self.reloading {
            return false;
        }

        self.reloading = false;
        self.reload_remaining = 0.0;

        log("⏹️ Reload cancelled");
        self.emit(WeaponEvent::ReloadCancelled);
        true
    }

    fn finish_reload(&mut self) {
        let deficit = self.config.max_ammo - self.magazine_ammo;
        let to_fill = deficit.min(self.reserve_ammo);

        self.magazine_ammo += to_fill;
        self.reserve_ammo -= to_fill;
        self.reloading = false;
        self.reload_remaining = 0.0;

        log(&format!(
            "✅ Reload complete: {}/{} (reserve {})",
            self.magazine_ammo, self.config.max_ammo, self.reserve_ammo
        ));

        self.emit(WeaponEvent::ReloadFinished);
        self.emit_ammo();
    }

    /// Count a confirmed hit for the last shot(s)
    ///
    /// Hits never outnumber shots fired.
    pub fn register_hit(&mut self) {
        if self.shots_hit >= self.shots_fired {
            return;
        }

        self.shots_hit += 1;
        log(&format!("🎯 Hit! Accuracy {:.1}%", self.accuracy() * 100.0));
    }

    /// Add rounds to the reserve (pickups). Non-positive amounts are ignored.
    pub fn add_ammo(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }

        self.reserve_ammo = self.reserve_ammo.saturating_add(amount as u32);
        log(&format!("📦 +{} ammo (reserve {})", amount, self.reserve_ammo));
        self.emit_ammo();
    }

    /// Clear shot/hit counters
    pub fn reset_stats(&mut self) {
        self.shots_fired = 0;
        self.shots_hit = 0;
    }

    /// Back to factory state: full magazine, configured reserve, no timers
    pub fn reset_weapon(&mut self) {
        self.reloading = false;
        self.reload_remaining = 0.0;
        self.cooldown_remaining = 0.0;
        self.magazine_ammo = self.config.max_ammo;
        self.reserve_ammo = self.config.reserve_ammo;
        self.reset_stats();

        log("🔄 Weapon reset");
        self.emit_ammo();
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Advance reload and cooldown countdowns by `delta_secs`
    ///
    /// Completion transitions run synchronously inside this call. When the
    /// cooldown expires with an empty magazine and rounds in reserve, a
    /// reload starts automatically unless one is already running.
    pub fn advance(&mut self, delta_secs: f32) {
        if !(delta_secs > 0.0) {
            return;
        }

        if self.reloading {
            self.reload_remaining -= delta_secs;
            if self.reload_remaining <= TIMER_EPSILON {
                self.finish_reload();
            }
        }

        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining -= delta_secs;
            if self.cooldown_remaining <= TIMER_EPSILON {
                self.cooldown_remaining = 0.0;

                if self.magazine_ammo == 0 && self.reserve_ammo > 0 && !self.reloading {
                    log("🔄 Magazine empty - auto reload");
                    self.reload();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn phase(&self) -> WeaponPhase {
        if self.reloading {
            WeaponPhase::Reloading
        } else if self.cooldown_remaining > 0.0 {
            WeaponPhase::Cooldown
        } else {
            WeaponPhase::Ready
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.phase() == WeaponPhase::Ready && self.magazine_ammo > 0
    }

    pub fn can_reload(&self) -> bool {
        !self.reloading && self.magazine_ammo < self.config.max_ammo && self.reserve_ammo > 0
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn magazine_ammo(&self) -> u32 {
        self.magazine_ammo
    }

    pub fn reserve_ammo(&self) -> u32 {
        self.reserve_ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.config.max_ammo
    }

    pub fn total_ammo(&self) -> u32 {
        self.magazine_ammo + self.reserve_ammo
    }

    pub fn fire_interval_seconds(&self) -> f32 {
        self.fire_interval
    }

    pub fn reload_seconds(&self) -> f32 {
        self.config.reload_seconds
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn reload_remaining(&self) -> f32 {
        self.reload_remaining
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn shots_hit(&self) -> u32 {
        self.shots_hit
    }

    /// hits / shots, 0.0 before the first shot
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32
        }
    }

    /// Damage applied to a target by one hit
    pub fn current_damage(&self) -> f32 {
        self.config.base_damage
    }

    pub fn range(&self) -> f32 {
        self.config.range
    }

    pub fn collision_mask(&self) -> u32 {
        self.config.collision_mask
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }
}

impl fmt::Display for WeaponState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weapon: {}/{} | Reserve: {} | Accuracy: {:.1}%",
            self.magazine_ammo,
            self.config.max_ammo,
            self.reserve_ammo,
            self.accuracy() * 100.0
        )
    }
}
