//! BehaviorGraph — общий контракт для вариантов актора
//!
//! Вариант (aggressive / evasive / player) описывает только свои состояния.
//! Stun, прерывания и применение MotionIntent — забота controller'а.

use bevy::prelude::*;

use crate::ai::intent::{MotionIntent, Strike};
use crate::ai::ActorState;

/// Что актор знает о своей цели в этом tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetReading {
    pub position: Vec2,
    /// target − self
    pub offset: Vec2,
    pub distance: f32,
}

impl TargetReading {
    pub fn between(from: Vec2, to: Vec2) -> Self {
        let offset = to - from;
        Self {
            position: to,
            offset,
            distance: offset.length(),
        }
    }

    /// Нормализованное направление на цель (цель в той же точке → ноль)
    pub fn direction(&self) -> Vec2 {
        self.offset.normalize_or_zero()
    }
}

/// Сенсоры врага (читаются заново каждый tick)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemySense {
    pub position: Vec2,
    pub grounded: bool,
    /// None — цели нет (не найдена при spawn или пропала)
    pub target: Option<TargetReading>,
    /// Нормаль края платформы вплотную (`layers::EDGE`), если есть
    pub edge: Option<Vec2>,
}

/// Результат одного tick поведения
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next: ActorState,
    pub intent: MotionIntent,
    pub strike: Option<Strike>,
}

impl Step {
    pub fn stay(state: ActorState, intent: MotionIntent) -> Self {
        Self {
            next: state,
            intent,
            strike: None,
        }
    }

    pub fn to(next: ActorState, intent: MotionIntent) -> Self {
        Self::stay(next, intent)
    }

    pub fn with_strike(mut self, strike: Strike) -> Self {
        self.strike = Some(strike);
        self
    }
}

/// Логика состояний одного варианта актора
pub trait BehaviorGraph {
    /// Сенсорные данные, нужные варианту
    type Sense;

    /// Состояние сразу после spawn
    fn initial_state(&self) -> ActorState;

    /// Один tick в не-оглушённом состоянии
    fn tick(&mut self, state: ActorState, sense: &Self::Sense, now: f32) -> Step;

    /// Прерывание вытесняет `state`: освободить то, что держит поведение
    fn on_interrupt(&mut self, _state: ActorState) -> MotionIntent {
        MotionIntent::keep()
    }

    /// Stun закончился: в какое состояние вернуться вместо сохранённого `state`
    fn on_resume(&mut self, state: ActorState) -> ActorState {
        state
    }
}
