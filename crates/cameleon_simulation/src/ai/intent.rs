//! MotionIntent — что behavior хочет сделать с телом в этом tick
//!
//! Двухфазный tick: `sense → MotionIntent`, затем `apply(MotionIntent)`.
//! Логика состояний не трогает physics body напрямую: её можно тестировать
//! без ECS, а у velocity ровно один writer за tick.

use bevy::prelude::*;

use crate::physics::PhysicsAdapter;

/// Per-axis команда скорости: `None` — оставить как есть
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl VelocityCommand {
    /// Ничего не менять
    pub fn keep() -> Self {
        Self::default()
    }

    /// Задать vx, vy оставить (гравитация, прыжок)
    pub fn horizontal(x: f32) -> Self {
        Self { x: Some(x), y: None }
    }

    pub fn full(velocity: Vec2) -> Self {
        Self {
            x: Some(velocity.x),
            y: Some(velocity.y),
        }
    }

    pub fn resolve(&self, current: Vec2) -> Vec2 {
        Vec2::new(self.x.unwrap_or(current.x), self.y.unwrap_or(current.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionIntent {
    pub velocity: VelocityCommand,
    /// Мгновенный импульс (knockback), применяется после velocity
    pub impulse: Option<Vec2>,
    pub gravity_scale: Option<f32>,
}

impl MotionIntent {
    pub fn keep() -> Self {
        Self::default()
    }

    pub fn horizontal(x: f32) -> Self {
        Self {
            velocity: VelocityCommand::horizontal(x),
            ..default()
        }
    }

    pub fn velocity(velocity: Vec2) -> Self {
        Self {
            velocity: VelocityCommand::full(velocity),
            ..default()
        }
    }

    pub fn impulse(impulse: Vec2) -> Self {
        Self {
            impulse: Some(impulse),
            ..default()
        }
    }

    pub fn with_vertical(mut self, y: f32) -> Self {
        self.velocity.y = Some(y);
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = Some(scale);
        self
    }

    /// Накрыть другим intent'ом (заданные поля `other` побеждают)
    pub fn merged(self, other: MotionIntent) -> Self {
        Self {
            velocity: VelocityCommand {
                x: other.velocity.x.or(self.velocity.x),
                y: other.velocity.y.or(self.velocity.y),
            },
            impulse: match (self.impulse, other.impulse) {
                (Some(a), Some(b)) => Some(a + b),
                (a, b) => a.or(b),
            },
            gravity_scale: other.gravity_scale.or(self.gravity_scale),
        }
    }

    /// Применить к телу (один раз за tick). Порядок: velocity → impulse → gravity.
    pub fn apply(&self, body: &mut impl PhysicsAdapter) {
        let velocity = self.velocity.resolve(body.velocity());
        body.set_velocity(velocity);

        if let Some(impulse) = self.impulse {
            body.apply_impulse(impulse);
        }

        if let Some(scale) = self.gravity_scale {
            body.set_gravity_scale(scale);
        }
    }
}

/// Удар, который behavior хочет нанести в этом tick
///
/// Controller превращает его в `DamageRequest` (attacker = актор, target = его цель).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub amount: f32,
    /// Направление knockback от атакующего к цели
    pub direction: Vec2,
}
