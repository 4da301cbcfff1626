//! Состояние актора + направление взгляда

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Поведенческое состояние актора
///
/// Каждый вариант актора использует своё подмножество:
/// - aggressive enemy: Patrol / Chase / Attack / Stunned
/// - evasive enemy: Patrol / Flee / Stunned
/// - player: Grounded / Climbing / Stunned
///
/// Меняется только через `change_state` (controller, смерть, bootstrap).
/// Наружу (анимации, VFX, HUD) — только чтение.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum ActorState {
    /// Логика отключена (нет зависимостей) или ещё не запущена
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
    Flee,
    /// Прерван knockback'ом, вернётся в сохранённое состояние
    Stunned,
    Grounded,
    Climbing,
}

impl ActorState {
    pub fn is_stunned(&self) -> bool {
        matches!(self, ActorState::Stunned)
    }
}

/// Событие: смена состояния (для анимаций/VFX/debug HUD)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActorStateChanged {
    pub entity: Entity,
    pub from: ActorState,
    pub to: ActorState,
}

/// Записать новый state и сообщить о смене (`ActorStateChanged` с предыдущим state)
///
/// Возвращает false, если state не изменился (событие не пишется).
pub fn change_state(
    entity: Entity,
    state: &mut Mut<ActorState>,
    next: ActorState,
    events: &mut EventWriter<ActorStateChanged>,
) -> bool {
    let previous = **state;
    if previous == next {
        return false;
    }

    events.write(ActorStateChanged {
        entity,
        from: previous,
        to: next,
    });
    crate::log(&format!("🔄 {:?}: {:?} → {:?}", entity, previous, next));
    **state = next;
    true
}

/// Направление взгляда (2D, только по X)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    /// Направление по знаку x; ноль — направление не определено
    pub fn from_x(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Facing::Right)
        } else if x < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// Лежит ли смещение `dx` впереди по направлению взгляда
    pub fn is_ahead(&self, dx: f32) -> bool {
        dx * self.sign() > 0.0
    }
}
