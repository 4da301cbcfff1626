//! Knockback / Stun interrupt handler
//!
//! Поток:
//! 1. Damage система кладёт `Interrupt` в `InterruptMailbox` жертвы
//! 2. В начале следующего tick controller вызывает `KnockbackHandler::resolve`
//! 3. Новое прерывание → сохраняем текущий state, impulse, state = Stunned
//! 4. Пока Stunned — ждём `now ≥ end_time`, потом возвращаем сохранённый state
//!
//! Mailbox однослотовый: несколько ударов до границы tick → выигрывает последний.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::ActorState;
use crate::error::{clamp_min, BehaviorError};

/// Минимальная длительность stun (секунды)
pub const MIN_STUN_DURATION: f32 = 0.01;

/// Параметры реакции на удар
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockbackConfig {
    /// Сколько длится оглушение (секунды)
    pub stun_duration: f32,
    /// impulse = damage × knockback_scale
    pub knockback_scale: f32,
    /// Гасить горизонтальную скорость пока оглушён (враги стоят на месте)
    pub brake_while_stunned: bool,
}

impl Default for KnockbackConfig {
    fn default() -> Self {
        Self::enemy()
    }
}

impl KnockbackConfig {
    /// Враги: 15 damage → 9 impulse, 0.5s stun, стоят на месте
    pub fn enemy() -> Self {
        Self {
            stun_duration: 0.5,
            knockback_scale: 0.6,
            brake_while_stunned: true,
        }
    }

    /// Игрок: короткий stun, knockback не гасится
    pub fn player() -> Self {
        Self {
            stun_duration: 0.3,
            knockback_scale: 0.5,
            brake_while_stunned: false,
        }
    }

    pub fn sanitized(self) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let config = Self {
            stun_duration: clamp_min("stun_duration", self.stun_duration, MIN_STUN_DURATION, &mut errors),
            knockback_scale: clamp_min("knockback_scale", self.knockback_scale, 0.0, &mut errors),
            brake_while_stunned: self.brake_while_stunned,
        };
        (config, errors)
    }
}

/// Damage-with-knockback сигнал (или принудительный stun)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Interrupt {
    /// Направление отбрасывания (нормализуется при применении)
    pub direction: Vec2,
    /// Урон, от которого считается сила impulse
    pub magnitude: f32,
}

impl Interrupt {
    pub fn knockback(direction: Vec2, magnitude: f32) -> Self {
        Self { direction, magnitude }
    }

    /// Stun без отбрасывания (не от урона)
    pub fn forced() -> Self {
        Self {
            direction: Vec2::ZERO,
            magnitude: 0.0,
        }
    }

    /// Нулевое направление → нулевой impulse (не NaN)
    pub fn impulse(&self, knockback_scale: f32) -> Vec2 {
        self.direction.normalize_or_zero() * self.magnitude.max(0.0) * knockback_scale
    }
}

/// Однослотовый канал прерываний актора
///
/// Пишет: damage система, ручные stun'ы. Читает: controller (раз в tick).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InterruptMailbox {
    pending: Option<Interrupt>,
}

impl InterruptMailbox {
    /// Last-write-wins: более позднее событие того же tick заменяет раннее
    pub fn post(&mut self, interrupt: Interrupt) {
        self.pending = Some(interrupt);
    }

    pub fn take(&mut self) -> Option<Interrupt> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&Interrupt> {
        self.pending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Запись об оглушении: куда вернуться и когда
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct StunRecord {
    active: bool,
    end_time: f32,
    saved_state: ActorState,
}

impl StunRecord {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    pub fn saved_state(&self) -> ActorState {
        self.saved_state
    }

    /// Оглушить. Повторный stun не затирает сохранённый state, только продлевает.
    pub fn engage(&mut self, current: ActorState, now: f32, duration: f32) {
        if !current.is_stunned() {
            self.saved_state = current;
        }
        self.active = true;
        self.end_time = now + duration;
    }

    /// `Some(state)` когда stun истёк (запись очищается)
    pub fn poll(&mut self, now: f32) -> Option<ActorState> {
        if self.active && now >= self.end_time {
            self.active = false;
            Some(self.saved_state)
        } else {
            None
        }
    }
}

/// Что делать controller'у в этом tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterruptOutcome {
    /// Прерываний нет — работает обычное поведение
    Running,
    /// Новое прерывание: state → Stunned, impulse применить в этом tick
    Preempted { impulse: Vec2, previous: ActorState },
    /// Оглушён, ждём
    Stunned,
    /// Stun закончился — вернуться в state
    Resumed(ActorState),
}

/// Компонент: реакция актора на knockback
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KnockbackHandler {
    pub config: KnockbackConfig,
    pub record: StunRecord,
}

impl KnockbackHandler {
    pub fn new(config: KnockbackConfig) -> Self {
        let (config, errors) = config.sanitized();
        for error in &errors {
            error.report();
        }
        Self {
            config,
            record: StunRecord::default(),
        }
    }

    /// Разрешить прерывание для текущего tick
    pub fn resolve(&mut self, state: ActorState, pending: Option<Interrupt>, now: f32) -> InterruptOutcome {
        if let Some(interrupt) = pending {
            self.record.engage(state, now, self.config.stun_duration);
            return InterruptOutcome::Preempted {
                impulse: interrupt.impulse(self.config.knockback_scale),
                previous: state,
            };
        }

        if !state.is_stunned() {
            return InterruptOutcome::Running;
        }

        if !self.record.is_active() {
            // Stunned без записи (state выставлен снаружи) — не застреваем
            return InterruptOutcome::Resumed(self.record.saved_state());
        }

        match self.record.poll(now) {
            Some(resume) => InterruptOutcome::Resumed(resume),
            None => InterruptOutcome::Stunned,
        }
    }
}
