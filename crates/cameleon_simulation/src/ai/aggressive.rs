//! Aggressive enemy: Patrol → Chase → Attack
//!
//! Все переходы по дистанции до цели идут через hysteresis:
//! - detection: вход `< detection_range`, выход `> detection_range × 1.5`
//! - attack: вход `< attack_range`, выход `> attack_range × 1.2`
//!
//! Stunned обрабатывает controller (см. `combat::knockback`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::graph::{BehaviorGraph, EnemySense, Step};
use crate::ai::hysteresis::{TransitionThresholds, ATTACK_HYSTERESIS, DETECTION_HYSTERESIS};
use crate::ai::intent::{MotionIntent, Strike};
use crate::ai::patrol::PatrolRoute;
use crate::ai::{ActorState, Facing};
use crate::combat::cooldown::{CooldownTimer, MIN_COOLDOWN};
use crate::error::{clamp_min, BehaviorError};

/// Минимальная дистанция для range параметров
const MIN_RANGE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggressiveConfig {
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub patrol_distance: f32,
    pub detection_range: f32,
    pub detection_hysteresis: f32,
    pub attack_range: f32,
    pub attack_hysteresis: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,
}

impl Default for AggressiveConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            chase_speed: 3.5,
            patrol_distance: 3.0,
            detection_range: 5.0,
            detection_hysteresis: DETECTION_HYSTERESIS,
            attack_range: 1.5,
            attack_hysteresis: ATTACK_HYSTERESIS,
            attack_damage: 15.0,
            attack_cooldown: 1.5,
        }
    }
}

impl AggressiveConfig {
    pub fn sanitized(self) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let config = Self {
            patrol_speed: clamp_min("patrol_speed", self.patrol_speed, 0.0, &mut errors),
            chase_speed: clamp_min("chase_speed", self.chase_speed, 0.0, &mut errors),
            patrol_distance: clamp_min("patrol_distance", self.patrol_distance, MIN_RANGE, &mut errors),
            detection_range: clamp_min("detection_range", self.detection_range, MIN_RANGE, &mut errors),
            detection_hysteresis: self.detection_hysteresis,
            attack_range: clamp_min("attack_range", self.attack_range, MIN_RANGE, &mut errors),
            attack_hysteresis: self.attack_hysteresis,
            attack_damage: clamp_min("attack_damage", self.attack_damage, 0.0, &mut errors),
            attack_cooldown: clamp_min("attack_cooldown", self.attack_cooldown, MIN_COOLDOWN, &mut errors),
        };
        (config, errors)
    }
}

/// Компонент: мозг aggressive врага
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AggressiveBrain {
    pub config: AggressiveConfig,
    detection: TransitionThresholds,
    attack: TransitionThresholds,
    pub route: PatrolRoute,
    attack_cooldown: CooldownTimer,
}

impl AggressiveBrain {
    /// `origin_x` — точка spawn (центр патруля)
    pub fn new(config: AggressiveConfig, origin_x: f32) -> Self {
        let (config, mut errors) = config.sanitized();
        let (detection, detection_errors) =
            TransitionThresholds::sanitized(config.detection_range, config.detection_hysteresis);
        let (attack, attack_errors) =
            TransitionThresholds::sanitized(config.attack_range, config.attack_hysteresis);
        errors.extend(detection_errors);
        errors.extend(attack_errors);

        for error in &errors {
            error.report();
        }

        Self {
            config,
            detection,
            attack,
            route: PatrolRoute::new(origin_x, config.patrol_distance, config.patrol_speed),
            attack_cooldown: CooldownTimer::new(config.attack_cooldown),
        }
    }

    pub fn facing(&self) -> Facing {
        self.route.facing
    }

    pub fn detection(&self) -> &TransitionThresholds {
        &self.detection
    }

    pub fn attack_thresholds(&self) -> &TransitionThresholds {
        &self.attack
    }

    pub fn attack_cooldown(&self) -> &CooldownTimer {
        &self.attack_cooldown
    }

    fn patrol(&mut self, sense: &EnemySense) -> Step {
        let vx = self.route.step(sense.position.x);

        let next = match sense.target {
            Some(target) => self
                .detection
                .transition(ActorState::Patrol, ActorState::Chase, ActorState::Patrol, target.distance),
            None => ActorState::Patrol,
        };

        Step::to(next, MotionIntent::horizontal(vx))
    }

    fn chase(&mut self, sense: &EnemySense) -> Step {
        let Some(target) = sense.target else {
            return self.patrol(sense);
        };

        let direction = target.direction();
        self.route.face(direction.x);
        let intent = MotionIntent::horizontal(direction.x * self.config.chase_speed);

        // Сначала attack band (Chase — его fallback), потом detection band
        let next = match self
            .attack
            .transition(ActorState::Chase, ActorState::Attack, ActorState::Chase, target.distance)
        {
            ActorState::Chase => self.detection.transition(
                ActorState::Chase,
                ActorState::Chase,
                ActorState::Patrol,
                target.distance,
            ),
            next => next,
        };

        Step::to(next, intent)
    }

    fn attack(&mut self, sense: &EnemySense, now: f32) -> Step {
        let Some(target) = sense.target else {
            return self.patrol(sense);
        };

        let direction = target.direction();
        self.route.face(direction.x);
        let intent = MotionIntent::horizontal(0.0);

        // Цель вышла из attack band — удар не наносим
        let next = self
            .attack
            .transition(ActorState::Attack, ActorState::Attack, ActorState::Chase, target.distance);
        if next != ActorState::Attack {
            return Step::to(next, intent);
        }

        let step = Step::stay(ActorState::Attack, intent);
        if self.attack_cooldown.try_fire(now) {
            step.with_strike(Strike {
                amount: self.config.attack_damage,
                direction,
            })
        } else {
            step
        }
    }
}

impl BehaviorGraph for AggressiveBrain {
    type Sense = EnemySense;

    fn initial_state(&self) -> ActorState {
        ActorState::Patrol
    }

    fn tick(&mut self, state: ActorState, sense: &EnemySense, now: f32) -> Step {
        match state {
            ActorState::Chase => self.chase(sense),
            ActorState::Attack => self.attack(sense, now),
            _ => self.patrol(sense),
        }
    }
}
