//! Player controller system

use bevy::prelude::*;

use crate::ai::controller::step_actor;
use crate::ai::{change_state, ActorState, ActorStateChanged};
use crate::clock::SimulationClock;
use crate::combat::knockback::{InterruptMailbox, KnockbackHandler};
use crate::components::{Capabilities, Disabled, Player};
use bevy_rapier2d::prelude::ReadRapierContext;

use crate::physics::{layers, probe_surface, CollisionQuery, KinematicBody, PhysicsAdapter};
use crate::player::{PlayerInput, PlayerMotor, PlayerSense};

/// Система: tick игрока
///
/// Triggers (jump) снимаются с `PlayerInput` каждый tick, даже если игрок
/// оглушён: нажатие во время stun не «копится» до его конца.
pub fn drive_player(
    clock: Res<SimulationClock>,
    rapier: ReadRapierContext,
    mut players: Query<
        (
            Entity,
            &mut PlayerMotor,
            &mut ActorState,
            &mut KnockbackHandler,
            &mut InterruptMailbox,
            &mut KinematicBody,
            &mut PlayerInput,
            &Transform,
            Option<&Capabilities>,
        ),
        (With<Player>, Without<Disabled>),
    >,
    mut state_events: EventWriter<ActorStateChanged>,
) {
    let now = clock.now;
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, mut motor, mut state, mut handler, mut mailbox, mut body, mut input, transform, capabilities) in
        players.iter_mut()
    {
        let position = transform.translation.truncate();
        let snapshot = *input;
        input.take_jump();

        let sense = PlayerSense {
            position,
            velocity: body.velocity(),
            grounded: body.is_grounded(),
            surface: probe_surface(&context, position, motor.config.wall_check_distance),
            input: snapshot,
            capabilities: capabilities.copied().unwrap_or_default(),
            in_water: context.contains_point(position, layers::WATER),
        };

        let step = step_actor(&mut *motor, &mut *handler, *state, mailbox.take(), &sense, now);
        step.intent.apply(&mut *body);

        change_state(entity, &mut state, step.next, &mut state_events);
    }
}
