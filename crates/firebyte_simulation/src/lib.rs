//! Firebyte Simulation Core
//!
//! Combat & progression rules of the shooter, engine-agnostic:
//! - `progression`: XP curve
//! - `stats`: health / energy / XP / level per actor
//! - `weapon`: magazine, reserve, fire rate, reload
//! - `loot`: weighted rarity rolls and pickup rewards
//! - `combat`: hit resolution + Bevy ECS wiring (FixedUpdate)
//! - `shooting_range`: scripted headless scenario used by the binary
//!
//! Physics, rendering, input and UI live outside and talk to the simulation
//! through events (`WeaponFireIntent`, `HitReported` in; notifications out).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod combat;
pub mod config;
pub mod logger;
pub mod loot;
pub mod observer;
pub mod progression;
pub mod shooting_range;
pub mod stats;
pub mod weapon;

pub use combat::{
    CombatPlugin, Dead, EntityDied, HitOutcome, HitReported, HitResolver, HitResult, LootCollected,
    LootDropped, RayCastBackend, RayCaster, ShotResolved, SphereRayCaster, StatsNotification,
    WeaponFireIntent, WeaponNotification,
};
pub use config::{CombatConfig, ConfigError, StatsConfig, WeaponConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use loot::{roll_rarity, LootRarity, LootReward};
pub use observer::{EventBuffer, Listener, ListenerId, Observers};
pub use progression::xp_to_next_level;
pub use stats::{StatsEvent, StatsModel};
pub use weapon::{WeaponEvent, WeaponPhase, WeaponState};

/// Main simulation plugin
///
/// Reads `CombatConfig` (default if absent), sets the fixed tick rate and
/// death grace, seeds the RNG if nobody did, then adds `CombatPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<CombatConfig>() {
            Some(config) => config.clone(),
            None => {
                let config = CombatConfig::default();
                app.insert_resource(config.clone());
                config
            }
        };

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.simulation_hz))
            .insert_resource(HitResolver::new(config.death_grace_seconds))
            .add_plugins(CombatPlugin);
    }
}

pub const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource (seeded)
///
/// Every random decision of the simulation (loot rolls) draws from here.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App for headless simulation (no combat systems yet)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Headless app with the full combat simulation, config validated up front
pub fn create_combat_app(seed: u64, config: CombatConfig) -> Result<App, ConfigError> {
    config.validate()?;

    let mut app = create_headless_app(seed);
    app.insert_resource(config).add_plugins(SimulationPlugin);

    Ok(app)
}

/// Spawn an actor with stats and a weapon (player, enemy soldier)
pub fn spawn_armed_actor(
    commands: &mut Commands,
    stats: StatsConfig,
    weapon: WeaponConfig,
) -> Result<Entity, ConfigError> {
    let stats = StatsModel::new(stats)?;
    let weapon = WeaponState::new(weapon)?;
    Ok(commands.spawn((stats, weapon)).id())
}

/// Spawn a shootable actor without a weapon (training dummy, crate)
pub fn spawn_target(commands: &mut Commands, stats: StatsConfig) -> Result<Entity, ConfigError> {
    let stats = StatsModel::new(stats)?;
    Ok(commands.spawn(stats).id())
}

/// World snapshot for determinism comparisons
///
/// Sorted by entity index, serialized through `Debug`.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
