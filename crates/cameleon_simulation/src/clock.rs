//! Детерминистичные часы симуляции
//!
//! Все таймеры (cooldown, stun) сравниваются с `SimulationClock::now`,
//! а не с wall-clock временем. Один FixedUpdate = один tick = `step` секунд.

use bevy::prelude::*;

/// Частота simulation tick по умолчанию (Hz)
pub const DEFAULT_TICK_RATE: f32 = 60.0;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    /// Текущее время симуляции (секунды)
    pub now: f32,
    /// Номер текущего tick
    pub tick: u64,
    /// Длительность одного tick (секунды)
    pub step: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::from_hz(DEFAULT_TICK_RATE)
    }
}

impl SimulationClock {
    pub fn from_hz(hz: f32) -> Self {
        Self {
            now: 0.0,
            tick: 0,
            step: 1.0 / hz.max(1.0),
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        // Считаем от номера tick, чтобы не копить ошибку округления f32
        self.now = self.tick as f32 * self.step;
    }
}

/// Система: tick часов (первая в FixedUpdate chain)
pub fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_by_step() {
        let mut clock = SimulationClock::from_hz(60.0);
        assert_eq!(clock.now, 0.0);

        for _ in 0..60 {
            clock.advance();
        }

        assert_eq!(clock.tick, 60);
        assert!((clock.now - 1.0).abs() < 1e-5, "now = {}", clock.now);
    }

    #[test]
    fn test_clock_rejects_zero_rate() {
        let clock = SimulationClock::from_hz(0.0);
        assert_eq!(clock.step, 1.0);
    }
}
