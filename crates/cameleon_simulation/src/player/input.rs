//! Player input snapshot
//!
//! Пишет внешний input layer (клавиатура, геймпад, replay, тест).
//! Оси — уровень (держится пока нажато), jump/attack — edge triggers:
//! читаются и сбрасываются в том же tick, в котором их обработали.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// −1..1 (влево/вправо)
    pub horizontal: f32,
    /// −1..1 (вниз/вверх), используется при лазании
    pub vertical: f32,
    pub jump: bool,
    pub attack: bool,
}

impl PlayerInput {
    /// Оси, зажатые в [−1, 1] (NaN → 0)
    pub fn axes(&self) -> Vec2 {
        Vec2::new(clamp_axis(self.horizontal), clamp_axis(self.vertical))
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn take_attack(&mut self) -> bool {
        std::mem::take(&mut self.attack)
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
