//! Cameleon Simulation Core
//!
//! ECS-симуляция поведения акторов 2D платформера на Bevy 0.16:
//! игрок (движение, лазание, плавание, melee), aggressive враг
//! (Patrol/Chase/Attack) и evasive враг (Patrol/Flee + прыжок через игрока).
//!
//! Один FixedUpdate = один tick. Порядок систем — `SimulationSet`:
//! Clock → Bootstrap → Sensors → Behavior → Combat → Physics.
//!
//! Rapier (bevy_rapier2d) — коллизии и queries: геометрия уровня — Fixed коллайдеры,
//! акторы — KinematicPositionBased + KinematicCharacterController. Velocity
//! интегрируем сами, Rapier только двигает коллайдер с учётом стен.

use bevy::prelude::*;
use bevy_rapier2d::plugin::systems::sync_removals;

// Публичные модули
pub mod ai;
pub mod clock;
pub mod combat;
pub mod components;
pub mod error;
pub mod logger;
pub mod physics;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{
    aggressive_enemy_bundle, evasive_enemy_bundle, AIPlugin, ActorState, ActorStateChanged, AggressiveBrain,
    AggressiveConfig, BehaviorGraph, EvasiveBrain, EvasiveConfig, Facing, MotionIntent, TargetLocator,
};
pub use clock::SimulationClock;
pub use combat::{
    CombatPlugin, CooldownTimer, DamageDealt, DamageRequest, EntityDied, Interrupt, InterruptMailbox,
    KnockbackConfig, KnockbackHandler, PlayerAttackConfig, WaterHazardConfig,
};
pub use components::*;
pub use error::BehaviorError;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed,
    LogLevel, LogPrinter,
};
pub use physics::{spawn_level, KinematicBody, PhysicsPlugin, StaticCollider};
pub use player::{player_bundle, PlayerConfig, PlayerInput, PlayerPlugin};

/// Фазы одного simulation tick (FixedUpdate), выполняются строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Tick детерминистичных часов
    Clock,
    /// Разрешение target locator, проверка зависимостей новых акторов
    Bootstrap,
    /// Результат перемещения (Rapier), ground check
    Sensors,
    /// Controllers: player, aggressive, evasive
    Behavior,
    /// Атаки, hazards, урон, смерть
    Combat,
    /// Gravity, интеграция velocity → character controller
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (совпадает с SimulationClock)
            .insert_resource(Time::<Fixed>::from_hz(clock::DEFAULT_TICK_RATE as f64))
            .init_resource::<SimulationClock>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Clock,
                    SimulationSet::Bootstrap,
                    SimulationSet::Sensors,
                    SimulationSet::Behavior,
                    SimulationSet::Combat,
                    SimulationSet::Physics,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, clock::advance_clock.in_set(SimulationSet::Clock))
            // Подсистемы
            .add_plugins((PhysicsPlugin, PlayerPlugin, AIPlugin, CombatPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Один `update()` сразу: Startup schedules создают Rapier context.
/// Fixed tick'ов он не делает (виртуальное время ещё не шло).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin));
    app.update();
    app
}

/// Прогнать ровно `ticks` simulation tick'ов (без привязки к wall-clock)
///
/// Despawn'ы синхронизируются с Rapier после каждого tick'а
/// (в обычном main loop это делает PostUpdate).
pub fn step_simulation(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        let world = app.world_mut();
        world.run_schedule(FixedUpdate);
        if let Err(error) = world.run_system_cached(sync_removals) {
            log_error(&format!("Rapier sync_removals failed: {}", error));
        }
    }
}

/// Snapshot компонента `T` у всех entities (для сравнения детерминизма)
///
/// Entities сортируются по index, компоненты сериализуются через Debug.
pub fn world_snapshot<T>(world: &mut World) -> Vec<u8>
where
    T: Component + std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entries: Vec<_> = query
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{:?}", component)))
        .collect();
    entries.sort_by_key(|(index, _)| *index);

    let mut snapshot = Vec::new();
    for (index, component) in entries {
        snapshot.extend_from_slice(&index.to_le_bytes());
        snapshot.extend_from_slice(component.as_bytes());
    }
    snapshot
}
