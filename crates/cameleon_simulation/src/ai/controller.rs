//! Actor controller — общий шаг для всех вариантов
//!
//! Порядок tick:
//! 1. resolve interrupt (knockback из mailbox)
//! 2. Stunned → stun tick (ждём end_time), graph не запускается;
//!    по окончании graph выбирает состояние возврата (`on_resume`)
//! 3. иначе → `graph.tick` (логика текущего состояния)
//! 4. вызывающая система применяет `Step::intent` к physics body

use crate::ai::graph::{BehaviorGraph, Step};
use crate::ai::intent::MotionIntent;
use crate::ai::ActorState;
use crate::combat::knockback::{Interrupt, InterruptOutcome, KnockbackHandler};

/// Один tick актора без побочных эффектов на physics body
pub fn step_actor<G: BehaviorGraph>(
    graph: &mut G,
    handler: &mut KnockbackHandler,
    state: ActorState,
    pending: Option<Interrupt>,
    sense: &G::Sense,
    now: f32,
) -> Step {
    match handler.resolve(state, pending, now) {
        InterruptOutcome::Preempted { impulse, previous } => {
            // Повторный stun — поведение уже было освобождено
            let release = if previous.is_stunned() {
                MotionIntent::keep()
            } else {
                graph.on_interrupt(previous)
            };
            Step::to(ActorState::Stunned, release.merged(MotionIntent::impulse(impulse)))
        }
        InterruptOutcome::Stunned => Step::stay(ActorState::Stunned, stun_intent(handler)),
        InterruptOutcome::Resumed(resume) => Step::to(graph.on_resume(resume), stun_intent(handler)),
        InterruptOutcome::Running => graph.tick(state, sense, now),
    }
}

/// Оглушённый актор не управляет собой; враги гасят горизонтальную скорость
fn stun_intent(handler: &KnockbackHandler) -> MotionIntent {
    if handler.config.brake_while_stunned {
        MotionIntent::horizontal(0.0)
    } else {
        MotionIntent::keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::graph::{EnemySense, TargetReading};
    use crate::ai::AggressiveBrain;
    use crate::combat::knockback::KnockbackConfig;
    use bevy::prelude::*;

    /// Graph который считает вызовы — проверяем что stun его не запускает
    struct CountingGraph {
        ticks: u32,
        interrupts: u32,
    }

    impl BehaviorGraph for CountingGraph {
        type Sense = ();

        fn initial_state(&self) -> ActorState {
            ActorState::Patrol
        }

        fn tick(&mut self, state: ActorState, _sense: &(), _now: f32) -> Step {
            self.ticks += 1;
            Step::stay(state, MotionIntent::horizontal(1.0))
        }

        fn on_interrupt(&mut self, _state: ActorState) -> MotionIntent {
            self.interrupts += 1;
            MotionIntent::keep().with_gravity_scale(1.0)
        }
    }

    #[test]
    fn test_stun_suspends_graph() {
        let mut graph = CountingGraph { ticks: 0, interrupts: 0 };
        let mut handler = KnockbackHandler::new(KnockbackConfig::enemy());

        let step = step_actor(&mut graph, &mut handler, ActorState::Patrol, Some(Interrupt::forced()), &(), 0.0);
        assert_eq!(step.next, ActorState::Stunned);
        assert_eq!(step.intent.gravity_scale, Some(1.0));
        assert_eq!(graph.interrupts, 1);

        let step = step_actor(&mut graph, &mut handler, ActorState::Stunned, None, &(), 0.25);
        assert_eq!(step.next, ActorState::Stunned);
        assert_eq!(step.intent.velocity.x, Some(0.0));
        assert_eq!(graph.ticks, 0);

        // Re-stun: on_interrupt второй раз не зовётся
        step_actor(&mut graph, &mut handler, ActorState::Stunned, Some(Interrupt::forced()), &(), 0.3);
        assert_eq!(graph.interrupts, 1);

        let step = step_actor(&mut graph, &mut handler, ActorState::Stunned, None, &(), 0.8);
        assert_eq!(step.next, ActorState::Patrol);
        assert_eq!(graph.ticks, 0);

        let step = step_actor(&mut graph, &mut handler, ActorState::Patrol, None, &(), 0.81);
        assert_eq!(step.next, ActorState::Patrol);
        assert_eq!(graph.ticks, 1);
    }

    #[test]
    fn test_preempt_tick_writes_only_impulse() {
        let mut graph = AggressiveBrain::new(default(), 0.0);
        let mut handler = KnockbackHandler::new(KnockbackConfig::enemy());
        let sense = EnemySense {
            position: Vec2::ZERO,
            grounded: true,
            target: Some(TargetReading::between(Vec2::ZERO, Vec2::new(1.0, 0.0))),
            edge: None,
        };

        let step = step_actor(
            &mut graph,
            &mut handler,
            ActorState::Attack,
            Some(Interrupt::knockback(Vec2::new(-1.0, 0.0), 20.0)),
            &sense,
            0.0,
        );

        assert_eq!(step.next, ActorState::Stunned);
        assert_eq!(step.intent.velocity.x, None);
        assert_eq!(step.intent.impulse, Some(Vec2::new(-12.0, 0.0)));
        assert!(step.strike.is_none());
    }

    #[test]
    fn test_player_profile_does_not_brake() {
        let mut graph = CountingGraph { ticks: 0, interrupts: 0 };
        let mut handler = KnockbackHandler::new(KnockbackConfig::player());

        step_actor(&mut graph, &mut handler, ActorState::Grounded, Some(Interrupt::forced()), &(), 0.0);
        let step = step_actor(&mut graph, &mut handler, ActorState::Stunned, None, &(), 0.1);
        assert_eq!(step.intent, MotionIntent::keep());
    }
}
