//! Enemy controller systems
//!
//! Один generic system на вариант врага (`drive_enemies::<AggressiveBrain>`,
//! `drive_enemies::<EvasiveBrain>`). Порядок внутри tick:
//! sense (цель, край платформы) → resolve interrupt → graph → apply intent → strike → DamageRequest.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use bevy_rapier2d::prelude::ReadRapierContext;

use crate::ai::controller::step_actor;
use crate::ai::graph::{BehaviorGraph, EnemySense, TargetReading};
use crate::ai::targeting::TargetLocator;
use crate::ai::{change_state, ActorState, ActorStateChanged};
use crate::clock::SimulationClock;
use crate::combat::damage::DamageRequest;
use crate::combat::knockback::{InterruptMailbox, KnockbackHandler};
use crate::components::{Dead, Disabled};
use crate::error::BehaviorError;
use crate::physics::{layers, CollisionQuery, KinematicBody, PhysicsAdapter};

/// Дальность контакта с краем платформы от центра актора (радиус capsule + зазор)
const EDGE_CONTACT_DISTANCE: f32 = 0.3;

/// Система: tick врагов одного варианта
pub fn drive_enemies<G>(
    clock: Res<SimulationClock>,
    rapier: ReadRapierContext,
    mut actors: Query<
        (
            Entity,
            &mut G,
            &mut ActorState,
            &mut KnockbackHandler,
            &mut InterruptMailbox,
            &mut KinematicBody,
            &Transform,
            Option<&mut TargetLocator>,
        ),
        Without<Disabled>,
    >,
    targets: Query<&Transform, Without<Dead>>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut state_events: EventWriter<ActorStateChanged>,
) where
    G: BehaviorGraph<Sense = EnemySense> + Component<Mutability = Mutable>,
{
    let now = clock.now;
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, mut graph, mut state, mut handler, mut mailbox, mut body, transform, locator) in
        actors.iter_mut()
    {
        let position = transform.translation.truncate();

        // Цель читаем заново каждый tick; пропавшая цель — sensor gap
        let mut target_entity = None;
        let mut target = None;
        if let Some(mut locator) = locator {
            if let Some(tracked) = locator.target {
                match targets.get(tracked) {
                    Ok(target_transform) => {
                        target_entity = Some(tracked);
                        target = Some(TargetReading::between(
                            position,
                            target_transform.translation.truncate(),
                        ));
                    }
                    Err(_) => {
                        locator.lose();
                        BehaviorError::TransientSensorGap {
                            entity,
                            target: tracked,
                        }
                        .report();
                    }
                }
            }
        }

        let edge = [Vec2::X, Vec2::NEG_X]
            .into_iter()
            .find_map(|direction| context.raycast(position, direction, EDGE_CONTACT_DISTANCE, layers::EDGE))
            .map(|hit| hit.normal);

        let sense = EnemySense {
            position,
            grounded: body.is_grounded(),
            target,
            edge,
        };

        let step = step_actor(
            &mut *graph,
            &mut *handler,
            *state,
            mailbox.take(),
            &sense,
            now,
        );

        step.intent.apply(&mut *body);

        if let (Some(strike), Some(victim)) = (step.strike, target_entity) {
            damage_requests.write(DamageRequest {
                attacker: Some(entity),
                target: victim,
                amount: strike.amount,
                knockback: Some(strike.direction),
            });
            crate::log(&format!(
                "⚔️ {:?} strikes {:?} for {} damage",
                entity, victim, strike.amount
            ));
        }

        change_state(entity, &mut state, step.next, &mut state_events);
    }
}
