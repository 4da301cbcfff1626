//! Melee атака игрока
//!
//! Attack trigger → cooldown gate → все живые враги в радиусе `range` от
//! attack point получают `DamageRequest` с knockback от игрока к врагу.
//! Attack point — на `reach` впереди по facing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::ActorState;
use crate::clock::SimulationClock;
use crate::combat::cooldown::{CooldownTimer, MIN_COOLDOWN};
use crate::combat::damage::DamageRequest;
use crate::components::{Dead, Disabled, Enemy, Player};
use crate::error::{clamp_min, BehaviorError};
use crate::player::{PlayerInput, PlayerMotor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAttackConfig {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    /// Смещение attack point вперёд по facing
    pub reach: f32,
}

impl Default for PlayerAttackConfig {
    fn default() -> Self {
        Self {
            damage: 20.0,
            range: 1.5,
            cooldown: 0.5,
            reach: 0.5,
        }
    }
}

impl PlayerAttackConfig {
    pub fn sanitized(self) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let config = Self {
            damage: clamp_min("attack_damage", self.damage, 0.0, &mut errors),
            range: clamp_min("attack_range", self.range, 0.01, &mut errors),
            cooldown: clamp_min("attack_cooldown", self.cooldown, MIN_COOLDOWN, &mut errors),
            reach: clamp_min("attack_reach", self.reach, 0.0, &mut errors),
        };
        (config, errors)
    }
}

/// Компонент: melee атака игрока
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerAttack {
    pub config: PlayerAttackConfig,
    cooldown: CooldownTimer,
}

impl PlayerAttack {
    pub fn new(config: PlayerAttackConfig) -> Self {
        let (config, errors) = config.sanitized();
        for error in &errors {
            error.report();
        }
        Self {
            config,
            cooldown: CooldownTimer::new(config.cooldown),
        }
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }
}

/// Система: обработка attack trigger
///
/// Оглушённый игрок не атакует (trigger всё равно снимается).
pub fn player_attack(
    clock: Res<SimulationClock>,
    mut players: Query<
        (Entity, &Transform, &PlayerMotor, &mut PlayerAttack, &mut PlayerInput, &ActorState),
        (With<Player>, Without<Disabled>),
    >,
    enemies: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for (entity, transform, motor, mut attack, mut input, state) in players.iter_mut() {
        if !input.take_attack() || state.is_stunned() {
            continue;
        }

        if !attack.cooldown.try_fire(clock.now) {
            crate::log(&format!(
                "Player attack on cooldown ({:.2}s left)",
                attack.cooldown.remaining(clock.now)
            ));
            continue;
        }

        let position = transform.translation.truncate();
        let attack_point = position + Vec2::new(motor.facing.sign() * attack.config.reach, 0.0);

        let mut hits = 0;
        for (enemy, enemy_transform) in enemies.iter() {
            let enemy_position = enemy_transform.translation.truncate();
            if enemy_position.distance(attack_point) > attack.config.range {
                continue;
            }

            damage_requests.write(DamageRequest {
                attacker: Some(entity),
                target: enemy,
                amount: attack.config.damage,
                knockback: Some(enemy_position - position),
            });
            hits += 1;
        }

        crate::log(&format!("🗡️ Player attack: {} enemies hit", hits));
    }
}
