//! Cooldown gate — минимальный интервал между повторяемыми действиями
//!
//! Используется для: удара врага, evasive jump, swim jump, атаки игрока.
//! Храним timestamp последнего срабатывания, а не убывающий таймер:
//! проверка не требует отдельной системы tick'а.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Минимальная длительность cooldown (секунды) — нулевой cooldown = спам
pub const MIN_COOLDOWN: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct CooldownTimer {
    /// Когда действие сработало последний раз (None — ещё ни разу)
    last_fired: Option<f32>,
    duration: f32,
}

impl CooldownTimer {
    /// Длительность зажимается снизу до `MIN_COOLDOWN`
    pub fn new(duration: f32) -> Self {
        let duration = if duration >= MIN_COOLDOWN { duration } else { MIN_COOLDOWN };
        Self {
            last_fired: None,
            duration,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn last_fired(&self) -> Option<f32> {
        self.last_fired
    }

    /// Разрешено iff `now − last_fired ≥ duration`
    pub fn can_fire(&self, now: f32) -> bool {
        match self.last_fired {
            Some(last) => now - last >= self.duration,
            None => true,
        }
    }

    /// Записывает `now` безусловно (re-arm)
    pub fn fire(&mut self, now: f32) {
        self.last_fired = Some(now);
    }

    /// can_fire + fire одним вызовом
    pub fn try_fire(&mut self, now: f32) -> bool {
        if self.can_fire(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }

    /// Сколько осталось до готовности (0 — готов)
    pub fn remaining(&self, now: f32) -> f32 {
        match self.last_fired {
            Some(last) => (last + self.duration - now).max(0.0),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_timer_is_ready() {
        let timer = CooldownTimer::new(1.5);
        assert!(timer.can_fire(0.0));
        assert_eq!(timer.remaining(0.0), 0.0);
    }

    #[test]
    fn test_attack_cooldown_boundary() {
        let mut timer = CooldownTimer::new(1.5);
        timer.fire(0.0);

        assert!(!timer.can_fire(1.49));
        assert!(timer.can_fire(1.5));
    }

    #[test]
    fn test_try_fire_rearms() {
        let mut timer = CooldownTimer::new(1.0);

        assert!(timer.try_fire(2.0));
        assert!(!timer.try_fire(2.5));
        assert!(timer.try_fire(3.0));
        assert_eq!(timer.last_fired(), Some(3.0));
    }

    #[test]
    fn test_fire_is_unconditional() {
        let mut timer = CooldownTimer::new(1.0);
        timer.fire(0.0);
        timer.fire(0.5); // re-arm до истечения
        assert!(!timer.can_fire(1.2));
        assert!(timer.can_fire(1.5));
    }

    #[test]
    fn test_non_positive_duration_is_clamped() {
        assert_eq!(CooldownTimer::new(0.0).duration(), MIN_COOLDOWN);
        assert_eq!(CooldownTimer::new(-3.0).duration(), MIN_COOLDOWN);
        assert_eq!(CooldownTimer::new(f32::NAN).duration(), MIN_COOLDOWN);

        let mut timer = CooldownTimer::new(0.0);
        timer.fire(1.0);
        assert!(!timer.can_fire(1.0)); // тот же tick — нельзя
    }
}
