//! Базовые компоненты акторов: Health, маркеры Player/Enemy/Disabled/Dead

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(1.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Возвращает фактически снятое здоровье
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        before - self.current
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);
    }
}

/// Marker: entity которым управляет игрок
///
/// Enemy target locator ищет цель среди entities с этим маркером.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker: враг (цель для атаки игрока)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Marker: актор без обязательных зависимостей — логика отключена (no-op)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Disabled;

/// Marker: актор мертв (Health == 0)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;
