//! AI / behavior core
//!
//! Общая state machine для всех акторов:
//! - `BehaviorGraph` — логика состояний одного варианта (aggressive, evasive, player)
//! - `controller::step_actor` — interrupt → stun → graph, общий для всех
//! - hysteresis для переходов по дистанции, cooldown для повторяемых действий
//!
//! Поток данных за tick: sense → `Step { next, intent, strike }` → apply.

use bevy::prelude::*;

pub mod aggressive;
pub mod controller;
pub mod evasive;
pub mod graph;
pub mod hysteresis;
pub mod intent;
pub mod patrol;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod targeting;


// Re-export основных типов
pub use aggressive::{AggressiveBrain, AggressiveConfig};
pub use controller::step_actor;
pub use evasive::{EvasiveBrain, EvasiveConfig};
pub use graph::{BehaviorGraph, EnemySense, Step, TargetReading};
pub use hysteresis::TransitionThresholds;
pub use intent::{MotionIntent, Strike, VelocityCommand};
pub use patrol::PatrolRoute;
pub use spawn::{aggressive_enemy_bundle, evasive_enemy_bundle};
pub use state::{change_state, ActorState, ActorStateChanged, Facing};
pub use systems::drive_enemies;
pub use targeting::TargetLocator;

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. validate_dependencies — акторы без physics body → Disabled (Bootstrap)
/// 2. resolve_targets — новые враги находят ближайшего Player (Bootstrap)
/// 3. drive_enemies — aggressive, затем evasive (Behavior, после игрока)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActorStateChanged>();

        app.add_systems(
            FixedUpdate,
            (targeting::validate_dependencies, targeting::resolve_targets)
                .chain()
                .in_set(SimulationSet::Bootstrap),
        );

        app.add_systems(
            FixedUpdate,
            (
                drive_enemies::<AggressiveBrain>,
                drive_enemies::<EvasiveBrain>,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Behavior)
                .after(crate::player::drive_player),
        );
    }
}
