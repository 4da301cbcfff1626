//! Hysteresis transition policy
//!
//! Вход в proximity state (Chase/Attack/Flee): `d < enter`.
//! Выход обратно в fallback: `d > exit`.
//! `enter ≤ d ≤ exit` — dead zone, держим текущее состояние (нет дребезга на границе).

use serde::{Deserialize, Serialize};

use crate::ai::ActorState;
use crate::error::{clamp_max, clamp_min, BehaviorError};

/// Минимальная дистанция входа
pub const MIN_ENTER_DISTANCE: f32 = 0.01;
/// Максимальная дистанция входа: exit = enter × factor остаётся конечным
pub const MAX_ENTER_DISTANCE: f32 = 10_000.0;
/// Минимальный hysteresis factor (строго больше 1 → exit > enter)
pub const MIN_HYSTERESIS_FACTOR: f32 = 1.01;
pub const MAX_HYSTERESIS_FACTOR: f32 = 10.0;

/// Detection → Chase / Flee
pub const DETECTION_HYSTERESIS: f32 = 1.5;
/// Attack range
pub const ATTACK_HYSTERESIS: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionThresholds {
    enter: f32,
    exit: f32,
}

impl TransitionThresholds {
    /// `exit = enter × factor`; невалидные значения зажимаются (с диагностикой)
    pub fn new(enter: f32, factor: f32) -> Self {
        let (thresholds, errors) = Self::sanitized(enter, factor);
        for error in &errors {
            error.report();
        }
        thresholds
    }

    /// Как `new`, но ошибки возвращаются вызывающему
    pub fn sanitized(enter: f32, factor: f32) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let enter = clamp_min("enter_distance", enter, MIN_ENTER_DISTANCE, &mut errors);
        let enter = clamp_max("enter_distance", enter, MAX_ENTER_DISTANCE, &mut errors);
        let factor = clamp_min("hysteresis_factor", factor, MIN_HYSTERESIS_FACTOR, &mut errors);
        let factor = clamp_max("hysteresis_factor", factor, MAX_HYSTERESIS_FACTOR, &mut errors);
        (
            Self {
                enter,
                exit: enter * factor,
            },
            errors,
        )
    }

    /// Явные пороги. `exit ≤ enter`, `enter ≤ 0` или бесконечный `exit` — ошибка конфигурации.
    pub fn try_new(enter: f32, exit: f32) -> Result<Self, BehaviorError> {
        if !(enter > 0.0) {
            return Err(BehaviorError::InvalidConfiguration {
                field: "enter_distance",
                value: enter,
                clamped: MIN_ENTER_DISTANCE,
            });
        }
        if !(exit > enter) || !exit.is_finite() {
            return Err(BehaviorError::InvalidConfiguration {
                field: "exit_distance",
                value: exit,
                clamped: enter * MIN_HYSTERESIS_FACTOR,
            });
        }
        Ok(Self { enter, exit })
    }

    pub fn enter(&self) -> f32 {
        self.enter
    }

    pub fn exit(&self) -> f32 {
        self.exit
    }

    pub fn should_enter(&self, distance: f32) -> bool {
        distance < self.enter
    }

    pub fn should_exit(&self, distance: f32) -> bool {
        distance > self.exit
    }

    /// Один шаг политики
    ///
    /// `engaged` — proximity state, `fallback` — куда возвращаемся.
    /// Состояния кроме этих двух не трогаем.
    pub fn transition(
        &self,
        current: ActorState,
        engaged: ActorState,
        fallback: ActorState,
        distance: f32,
    ) -> ActorState {
        if current == fallback && self.should_enter(distance) {
            engaged
        } else if current == engaged && self.should_exit(distance) {
            fallback
        } else {
            current
        }
    }
}
