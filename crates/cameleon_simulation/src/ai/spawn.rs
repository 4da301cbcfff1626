//! Наборы компонентов для spawn врагов

use bevy::prelude::*;

use crate::ai::{AggressiveBrain, AggressiveConfig, BehaviorGraph, EvasiveBrain, EvasiveConfig, TargetLocator};
use crate::combat::knockback::{InterruptMailbox, KnockbackConfig, KnockbackHandler};
use crate::components::{Enemy, Health};
use crate::physics::{kinematic_body_bundle, layers};

/// Здоровье врагов по умолчанию
pub const ENEMY_HEALTH: f32 = 100.0;

/// Patrol / Chase / Attack враг. Центр патруля — точка spawn.
pub fn aggressive_enemy_bundle(position: Vec2, config: AggressiveConfig) -> impl Bundle {
    let brain = AggressiveBrain::new(config, position.x);
    (
        Name::new("AggressiveEnemy"),
        Enemy,
        Health::new(ENEMY_HEALTH),
        brain.initial_state(),
        brain,
        KnockbackHandler::new(KnockbackConfig::enemy()),
        InterruptMailbox::default(),
        TargetLocator::default(),
        kinematic_body_bundle(position, layers::SOLID),
    )
}

/// Patrol / Flee враг с evasive jump
///
/// Края платформ (`layers::EDGE`) для него — стена: разворачивается, а не падает.
pub fn evasive_enemy_bundle(position: Vec2, config: EvasiveConfig) -> impl Bundle {
    let brain = EvasiveBrain::new(config, position.x);
    (
        Name::new("EvasiveEnemy"),
        Enemy,
        Health::new(ENEMY_HEALTH),
        brain.initial_state(),
        brain,
        KnockbackHandler::new(KnockbackConfig::enemy()),
        InterruptMailbox::default(),
        TargetLocator::default(),
        kinematic_body_bundle(position, layers::SOLID.union(layers::EDGE)),
    )
}
