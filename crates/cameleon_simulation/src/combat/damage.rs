//! Damage sink + death handling
//!
//! Поток:
//! 1. Атакующий (enemy strike, player melee, water hazard) пишет `DamageRequest`
//! 2. `apply_damage`: Health −= amount, knockback → `InterruptMailbox` жертвы
//! 3. `DamageDealt` / `EntityDied` события (UI, звуки, VFX)
//! 4. `handle_death`: Dead + Disabled, деспавн через `DEATH_DESPAWN_DELAY`

use bevy::prelude::*;

use crate::ai::{change_state, ActorState, ActorStateChanged};
use crate::clock::SimulationClock;
use crate::combat::knockback::{Interrupt, InterruptMailbox};
use crate::components::{Dead, Disabled, Health};
use crate::physics::KinematicBody;

/// Через сколько секунд после смерти entity удаляется
pub const DEATH_DESPAWN_DELAY: f32 = 0.5;

/// Запрос на урон (damage sink)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    /// Направление отбрасывания; None — урон без knockback (hazards)
    pub knockback: Option<Vec2>,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Фактически снятое здоровье
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DespawnAfter {
    /// Время деспавна (секунды `SimulationClock`)
    pub despawn_time: f32,
}

/// Система: apply damage от DamageRequest событий
///
/// Мёртвых не бьём повторно. Knockback кладётся в mailbox жертвы и
/// применяется её controller'ом в начале следующего tick.
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut targets: Query<(&mut Health, Option<&mut InterruptMailbox>), Without<Dead>>,
) {
    for request in requests.read() {
        let Ok((mut health, mailbox)) = targets.get_mut(request.target) else {
            crate::log_warning(&format!(
                "DamageRequest: target {:?} has no Health (or already dead)",
                request.target
            ));
            continue;
        };

        if !health.is_alive() {
            continue;
        }

        let applied = health.take_damage(request.amount);
        let died = !health.is_alive();

        if let (Some(direction), Some(mut mailbox)) = (request.knockback, mailbox) {
            mailbox.post(Interrupt::knockback(direction, request.amount));
        }

        damage_dealt_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: applied,
            target_died: died,
        });

        if died {
            entity_died_events.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });

            crate::log(&format!("💀 Entity {:?} killed by {:?}", request.target, request.attacker));
        }
    }
}

/// Система: отключение поведения при смерти
///
/// Dead + Disabled маркеры, state = Idle, горизонтальная скорость гасится.
/// Entity удаляется через `DEATH_DESPAWN_DELAY`.
pub fn handle_death(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut death_events: EventReader<EntityDied>,
    mut actors: Query<(Option<&mut ActorState>, Option<&mut KinematicBody>)>,
    mut state_events: EventWriter<ActorStateChanged>,
) {
    for event in death_events.read() {
        if let Ok((state, body)) = actors.get_mut(event.entity) {
            if let Some(mut state) = state {
                change_state(event.entity, &mut state, ActorState::Idle, &mut state_events);
            }
            if let Some(mut body) = body {
                body.velocity.x = 0.0;
            }
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert((
                Dead,
                Disabled,
                DespawnAfter {
                    despawn_time: clock.now + DEATH_DESPAWN_DELAY,
                },
            ));
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    query: Query<(Entity, &DespawnAfter)>,
) {
    for (entity, despawn_after) in query.iter() {
        if clock.now >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
