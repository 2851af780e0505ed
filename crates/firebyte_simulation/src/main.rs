//! Headless Firebyte simulation
//!
//! Runs the scripted shooting range without rendering.
//!
//! Usage: `firebyte_simulation [config/combat.ron]`

use firebyte_simulation::logger::{set_log_level, LogLevel};
use firebyte_simulation::shooting_range::run_shooting_range;
use firebyte_simulation::*;

fn main() -> Result<(), ConfigError> {
    init_logger();
    set_log_level(LogLevel::Info);

    let config = match std::env::args().nth(1) {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };

    log_info(&format!("Starting Firebyte headless simulation (seed: {})", DEFAULT_SEED));

    let summary = run_shooting_range(DEFAULT_SEED, config)?;

    log_info(&format!(
        "Player: level {} | XP {} | health {:.0}",
        summary.player_level, summary.player_xp, summary.player_health
    ));
    log_info(&summary.weapon);
    log_info(&format!("Drops: {:?}", summary.drops));
    log_info(&format!(
        "Simulation complete after {} ticks: {} target(s) left",
        summary.ticks, summary.targets_left
    ));

    Ok(())
}
