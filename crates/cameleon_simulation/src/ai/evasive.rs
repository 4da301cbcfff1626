//! Evasive enemy: Patrol → Flee + evasive jump
//!
//! Evasive jump проверяется каждый не-оглушённый tick (в любом состоянии):
//! цель ближе `jump_over_distance`, впереди по facing, актор на земле,
//! jump cooldown готов → прыжок через цель.
//!
//! Возврат Flee → Patrol включается флагом `disengage_when_clear`
//! (в игре выключен: однажды испугавшись, убегает до конца).
//!
//! Край платформы (`layers::EDGE`) впереди → разворот + Idle. В Idle актор
//! стоит у края, работает только evasive jump; выводит из Idle лишь stun
//! (и возвращает обратно в Idle).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::graph::{BehaviorGraph, EnemySense, Step};
use crate::ai::hysteresis::{TransitionThresholds, DETECTION_HYSTERESIS};
use crate::ai::intent::MotionIntent;
use crate::ai::patrol::PatrolRoute;
use crate::ai::{ActorState, Facing};
use crate::combat::cooldown::{CooldownTimer, MIN_COOLDOWN};
use crate::error::{clamp_min, BehaviorError};

const MIN_RANGE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvasiveConfig {
    pub patrol_speed: f32,
    pub flee_speed: f32,
    pub patrol_distance: f32,
    pub detection_range: f32,
    pub flee_hysteresis: f32,
    pub jump_force: f32,
    pub jump_horizontal_speed: f32,
    pub jump_over_distance: f32,
    pub jump_cooldown: f32,
    pub disengage_when_clear: bool,
}

impl Default for EvasiveConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            flee_speed: 4.0,
            patrol_distance: 3.0,
            detection_range: 5.0,
            flee_hysteresis: DETECTION_HYSTERESIS,
            jump_force: 8.0,
            jump_horizontal_speed: 25.0,
            jump_over_distance: 1.5,
            jump_cooldown: 1.0,
            disengage_when_clear: false,
        }
    }
}

impl EvasiveConfig {
    pub fn sanitized(self) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let config = Self {
            patrol_speed: clamp_min("patrol_speed", self.patrol_speed, 0.0, &mut errors),
            flee_speed: clamp_min("flee_speed", self.flee_speed, 0.0, &mut errors),
            patrol_distance: clamp_min("patrol_distance", self.patrol_distance, MIN_RANGE, &mut errors),
            detection_range: clamp_min("detection_range", self.detection_range, MIN_RANGE, &mut errors),
            flee_hysteresis: self.flee_hysteresis,
            jump_force: clamp_min("jump_force", self.jump_force, 0.0, &mut errors),
            jump_horizontal_speed: clamp_min(
                "jump_horizontal_speed",
                self.jump_horizontal_speed,
                0.0,
                &mut errors,
            ),
            jump_over_distance: clamp_min("jump_over_distance", self.jump_over_distance, MIN_RANGE, &mut errors),
            jump_cooldown: clamp_min("jump_cooldown", self.jump_cooldown, MIN_COOLDOWN, &mut errors),
            disengage_when_clear: self.disengage_when_clear,
        };
        (config, errors)
    }
}

/// Компонент: мозг evasive врага
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EvasiveBrain {
    pub config: EvasiveConfig,
    detection: TransitionThresholds,
    pub route: PatrolRoute,
    jump_cooldown: CooldownTimer,
}

impl EvasiveBrain {
    pub fn new(config: EvasiveConfig, origin_x: f32) -> Self {
        let (config, mut errors) = config.sanitized();
        let (detection, detection_errors) =
            TransitionThresholds::sanitized(config.detection_range, config.flee_hysteresis);
        errors.extend(detection_errors);

        for error in &errors {
            error.report();
        }

        Self {
            config,
            detection,
            route: PatrolRoute::new(origin_x, config.patrol_distance, config.patrol_speed),
            jump_cooldown: CooldownTimer::new(config.jump_cooldown),
        }
    }

    pub fn facing(&self) -> Facing {
        self.route.facing
    }

    pub fn jump_cooldown(&self) -> &CooldownTimer {
        &self.jump_cooldown
    }

    fn patrol(&mut self, sense: &EnemySense) -> Step {
        let vx = self.route.step(sense.position.x);

        let next = match sense.target {
            Some(target) => self
                .detection
                .transition(ActorState::Patrol, ActorState::Flee, ActorState::Patrol, target.distance),
            None => ActorState::Patrol,
        };

        Step::to(next, MotionIntent::horizontal(vx))
    }

    fn flee(&mut self, sense: &EnemySense) -> Step {
        let Some(target) = sense.target else {
            return self.patrol(sense);
        };

        let away = -target.direction();
        self.route.face(away.x);
        let intent = MotionIntent::horizontal(away.x * self.config.flee_speed);

        let next = if self.config.disengage_when_clear {
            self.detection
                .transition(ActorState::Flee, ActorState::Flee, ActorState::Patrol, target.distance)
        } else {
            ActorState::Flee
        };

        Step::to(next, intent)
    }

    /// Упёрлись в край: разворот, дальше стоим
    fn turn_at_edge(&mut self) -> Step {
        self.route.facing = self.route.facing.flipped();
        Step::to(ActorState::Idle, MotionIntent::horizontal(0.0))
    }

    /// Прыжок через цель. `facing` — направление на начало tick.
    fn evasive_jump(&mut self, sense: &EnemySense, facing: Facing, now: f32) -> Option<Vec2> {
        let target = sense.target?;

        if !sense.grounded
            || target.distance >= self.config.jump_over_distance
            || !facing.is_ahead(target.offset.x)
        {
            return None;
        }

        if !self.jump_cooldown.try_fire(now) {
            return None;
        }

        Some(Vec2::new(
            facing.sign() * self.config.jump_horizontal_speed,
            self.config.jump_force,
        ))
    }
}

impl BehaviorGraph for EvasiveBrain {
    type Sense = EnemySense;

    fn initial_state(&self) -> ActorState {
        ActorState::Patrol
    }

    fn tick(&mut self, state: ActorState, sense: &EnemySense, now: f32) -> Step {
        let facing = self.route.facing;
        // Нормаль края смотрит на нас: край впереди, если −normal по facing
        let edge_ahead = sense.edge.is_some_and(|normal| facing.is_ahead(-normal.x));

        let mut step = match state {
            ActorState::Idle => Step::stay(ActorState::Idle, MotionIntent::horizontal(0.0)),
            _ if edge_ahead => self.turn_at_edge(),
            ActorState::Flee => self.flee(sense),
            _ => self.patrol(sense),
        };

        if let Some(jump) = self.evasive_jump(sense, facing, now) {
            step.intent = MotionIntent::velocity(jump);
        }

        step
    }
}
