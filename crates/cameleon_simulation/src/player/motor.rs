//! Player motor: Grounded ↔ Climbing (+ Stunned через controller)
//!
//! Climbing:
//! - вход: есть climbable поверхность ∧ `can_wall_climb()` ∧ не на земле ∧
//!   (уже лезем ∨ есть input по любой оси)
//! - gravity 0; потолок → движение по X, стена → по Y, иное → стоим
//! - выход (или потеря способности) → gravity восстанавливается в тот же tick
//! - knockback отрывает от стены: после stun возвращаемся в Grounded
//! - jump во время лазания → wall jump от стены
//!
//! Gravity scale выставляется явно каждый tick (climb / swim / обычная).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::graph::{BehaviorGraph, Step};
use crate::ai::intent::MotionIntent;
use crate::ai::{ActorState, Facing};
use crate::combat::cooldown::{CooldownTimer, MIN_COOLDOWN};
use crate::components::{Capabilities, CapabilityQuery};
use crate::error::{clamp_min, BehaviorError};
use crate::physics::SurfaceContact;
use crate::player::PlayerInput;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_force: f32,
    pub climb_speed: f32,
    /// Длина surface probes
    pub wall_check_distance: f32,
    /// Wall jump: горизонталь (от стены) и вертикаль
    pub wall_jump_x: f32,
    pub wall_jump_y: f32,
    /// Input по модулю ниже — считается нулевым
    pub input_dead_zone: f32,
    pub swim_jump_force: f32,
    pub swim_jump_cooldown: f32,
    /// Gravity scale в воде (если умеем плавать)
    pub swim_gravity_scale: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 10.0,
            climb_speed: 3.0,
            wall_check_distance: 0.6,
            wall_jump_x: 6.0,
            wall_jump_y: 10.0,
            input_dead_zone: 0.1,
            swim_jump_force: 4.0,
            swim_jump_cooldown: 0.3,
            swim_gravity_scale: 0.5,
        }
    }
}

impl PlayerConfig {
    pub fn sanitized(self) -> (Self, Vec<BehaviorError>) {
        let mut errors = Vec::new();
        let config = Self {
            move_speed: clamp_min("move_speed", self.move_speed, 0.0, &mut errors),
            jump_force: clamp_min("jump_force", self.jump_force, 0.0, &mut errors),
            climb_speed: clamp_min("climb_speed", self.climb_speed, 0.0, &mut errors),
            wall_check_distance: clamp_min("wall_check_distance", self.wall_check_distance, 0.01, &mut errors),
            wall_jump_x: clamp_min("wall_jump_x", self.wall_jump_x, 0.0, &mut errors),
            wall_jump_y: clamp_min("wall_jump_y", self.wall_jump_y, 0.0, &mut errors),
            input_dead_zone: clamp_min("input_dead_zone", self.input_dead_zone, 0.0, &mut errors),
            swim_jump_force: clamp_min("swim_jump_force", self.swim_jump_force, 0.0, &mut errors),
            swim_jump_cooldown: clamp_min("swim_jump_cooldown", self.swim_jump_cooldown, MIN_COOLDOWN, &mut errors),
            swim_gravity_scale: clamp_min("swim_gravity_scale", self.swim_gravity_scale, 0.0, &mut errors),
        };
        (config, errors)
    }
}

/// Сенсоры игрока (читаются заново каждый tick)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerSense {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    /// Результат surface probes (right, left, up)
    pub surface: SurfaceContact,
    /// Snapshot input'а этого tick (triggers уже сняты с компонента)
    pub input: PlayerInput,
    pub capabilities: Capabilities,
    /// Внутри water volume
    pub in_water: bool,
}

/// Компонент: движение игрока
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerMotor {
    pub config: PlayerConfig,
    pub facing: Facing,
    /// Gravity scale тела до любых модификаций (climb/swim)
    original_gravity: f32,
    swim_jump_cooldown: CooldownTimer,
}

impl PlayerMotor {
    pub fn new(config: PlayerConfig, original_gravity: f32) -> Self {
        let (config, errors) = config.sanitized();
        for error in &errors {
            error.report();
        }

        Self {
            config,
            facing: Facing::Right,
            original_gravity,
            swim_jump_cooldown: CooldownTimer::new(config.swim_jump_cooldown),
        }
    }

    fn is_active_axis(&self, value: f32) -> bool {
        value.abs() > self.config.input_dead_zone
    }

    fn climb(&self, sense: &PlayerSense, axes: Vec2) -> MotionIntent {
        let speed = self.config.climb_speed;
        let velocity = if sense.surface.is_ceiling() {
            MotionIntent::velocity(Vec2::new(axes.x * speed, 0.0))
        } else if sense.surface.is_wall() {
            MotionIntent::velocity(Vec2::new(sense.velocity.x, axes.y * speed))
        } else {
            MotionIntent::velocity(Vec2::ZERO)
        };
        velocity.with_gravity_scale(0.0)
    }

    fn wall_jump(&self) -> MotionIntent {
        // От стены: противоположно направлению взгляда
        MotionIntent::velocity(Vec2::new(
            -self.facing.sign() * self.config.wall_jump_x,
            self.config.wall_jump_y,
        ))
    }
}

impl BehaviorGraph for PlayerMotor {
    type Sense = PlayerSense;

    fn initial_state(&self) -> ActorState {
        ActorState::Grounded
    }

    fn tick(&mut self, state: ActorState, sense: &PlayerSense, now: f32) -> Step {
        let axes = sense.input.axes();
        let caps = &sense.capabilities;
        let swimming = sense.in_water && caps.can_swim();
        let gravity = if swimming {
            self.config.swim_gravity_scale
        } else {
            self.original_gravity
        };

        if self.is_active_axis(axes.x) {
            if let Some(facing) = Facing::from_x(axes.x) {
                self.facing = facing;
            }
        }

        if caps.can_wall_climb() {
            let wants_to_climb = state == ActorState::Climbing
                || self.is_active_axis(axes.x)
                || self.is_active_axis(axes.y);

            if sense.surface.has_surface && wants_to_climb && !sense.grounded {
                if sense.input.jump {
                    return Step::to(ActorState::Grounded, self.wall_jump().with_gravity_scale(gravity));
                }
                return Step::to(ActorState::Climbing, self.climb(sense, axes));
            }
        }

        // Обычное движение (сюда же попадаем при выходе из Climbing)
        let mut intent = MotionIntent::horizontal(
            axes.x * self.config.move_speed * caps.speed_multiplier(),
        )
        .with_gravity_scale(gravity);

        if sense.input.jump {
            if sense.grounded {
                intent = intent.with_vertical(self.config.jump_force * caps.jump_multiplier());
            } else if swimming && self.swim_jump_cooldown.try_fire(now) {
                intent = intent.with_vertical(self.config.swim_jump_force);
            }
        }

        Step::to(ActorState::Grounded, intent)
    }

    /// Knockback во время лазания: отпускаем стену (gravity обратно)
    fn on_interrupt(&mut self, state: ActorState) -> MotionIntent {
        if state == ActorState::Climbing {
            MotionIntent::keep().with_gravity_scale(self.original_gravity)
        } else {
            MotionIntent::keep()
        }
    }

    /// Стену отпустили в `on_interrupt` — после stun висеть не на чем.
    /// Снова цепляемся обычным путём (surface + input) со следующего tick'а.
    fn on_resume(&mut self, state: ActorState) -> ActorState {
        if state == ActorState::Climbing {
            ActorState::Grounded
        } else {
            state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airborne_at_wall(normal: Vec2) -> PlayerSense {
        PlayerSense {
            grounded: false,
            surface: SurfaceContact::with_normal(normal),
            capabilities: Capabilities::spider(),
            ..default()
        }
    }

    #[test]
    fn test_grounded_movement_uses_speed_multiplier() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let sense = PlayerSense {
            grounded: true,
            input: PlayerInput {
                horizontal: 1.0,
                ..default()
            },
            capabilities: Capabilities {
                speed_multiplier: 2.0,
                ..default()
            },
            ..default()
        };

        let step = motor.tick(ActorState::Grounded, &sense, 0.0);
        assert_eq!(step.next, ActorState::Grounded);
        assert_eq!(step.intent.velocity.x, Some(10.0));
        assert_eq!(step.intent.velocity.y, None);
        assert_eq!(step.intent.gravity_scale, Some(1.0));
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = PlayerSense {
            grounded: true,
            input: PlayerInput {
                jump: true,
                ..default()
            },
            ..default()
        };

        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.0).intent.velocity.y, Some(10.0));

        sense.grounded = false;
        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.1).intent.velocity.y, None);
    }

    #[test]
    fn test_enter_climbing_needs_input() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = airborne_at_wall(Vec2::NEG_X);

        // Нет input — не цепляемся
        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.0).next, ActorState::Grounded);

        // Input ниже dead zone — тоже нет
        sense.input.vertical = 0.05;
        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.0).next, ActorState::Grounded);

        sense.input.vertical = 1.0;
        let step = motor.tick(ActorState::Grounded, &sense, 0.0);
        assert_eq!(step.next, ActorState::Climbing);
        assert_eq!(step.intent.gravity_scale, Some(0.0));
        assert_eq!(step.intent.velocity.y, Some(3.0));
    }

    #[test]
    fn test_climbing_holds_without_input() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let sense = airborne_at_wall(Vec2::NEG_X);

        let step = motor.tick(ActorState::Climbing, &sense, 0.0);
        assert_eq!(step.next, ActorState::Climbing);
        assert_eq!(step.intent.velocity.y, Some(0.0));
    }

    #[test]
    fn test_ceiling_moves_horizontally() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = airborne_at_wall(Vec2::NEG_Y);
        sense.input.horizontal = -1.0;
        sense.input.vertical = 1.0;

        let step = motor.tick(ActorState::Climbing, &sense, 0.0);
        assert_eq!(step.intent.velocity.resolve(Vec2::new(5.0, 5.0)), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_grounded_blocks_climbing() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = airborne_at_wall(Vec2::NEG_X);
        sense.grounded = true;
        sense.input.horizontal = 1.0;

        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.0).next, ActorState::Grounded);
    }

    #[test]
    fn test_wall_jump_pushes_away_from_facing() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = airborne_at_wall(Vec2::NEG_X);
        sense.input.horizontal = 1.0; // смотрим вправо, в стену
        sense.input.jump = true;

        let step = motor.tick(ActorState::Climbing, &sense, 0.0);
        assert_eq!(step.next, ActorState::Grounded);
        assert_eq!(step.intent.velocity.resolve(Vec2::ZERO), Vec2::new(-6.0, 10.0));
        assert_eq!(step.intent.gravity_scale, Some(1.0));
    }

    #[test]
    fn test_capability_loss_forces_exit() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut sense = airborne_at_wall(Vec2::NEG_X);
        sense.capabilities = Capabilities::default();

        let step = motor.tick(ActorState::Climbing, &sense, 0.0);
        assert_eq!(step.next, ActorState::Grounded);
        assert_eq!(step.intent.gravity_scale, Some(1.0));
    }

    #[test]
    fn test_swim_jump_cooldown() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let sense = PlayerSense {
            in_water: true,
            input: PlayerInput {
                jump: true,
                ..default()
            },
            capabilities: Capabilities::frog(),
            ..default()
        };

        let step = motor.tick(ActorState::Grounded, &sense, 0.0);
        assert_eq!(step.intent.velocity.y, Some(4.0));
        assert_eq!(step.intent.gravity_scale, Some(0.5));

        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.2).intent.velocity.y, None);
        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.3).intent.velocity.y, Some(4.0));
    }

    #[test]
    fn test_non_swimmer_in_water_keeps_gravity() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let sense = PlayerSense {
            in_water: true,
            ..default()
        };
        assert_eq!(motor.tick(ActorState::Grounded, &sense, 0.0).intent.gravity_scale, Some(1.0));
    }

    #[test]
    fn test_interrupt_while_climbing_restores_gravity() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        assert_eq!(motor.on_interrupt(ActorState::Climbing).gravity_scale, Some(1.0));
        assert_eq!(motor.on_interrupt(ActorState::Grounded).gravity_scale, None);
    }

    #[test]
    fn test_stun_while_climbing_resumes_grounded() {
        use crate::ai::step_actor;
        use crate::combat::knockback::{Interrupt, KnockbackConfig, KnockbackHandler};

        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        let mut handler = KnockbackHandler::new(KnockbackConfig::player());
        let sense = airborne_at_wall(Vec2::NEG_X);

        let step = step_actor(
            &mut motor,
            &mut handler,
            ActorState::Climbing,
            Some(Interrupt::knockback(Vec2::NEG_X, 10.0)),
            &sense,
            0.0,
        );
        assert_eq!(step.next, ActorState::Stunned);
        assert_eq!(step.intent.gravity_scale, Some(1.0));

        // 0.3s stun игрока истёк
        let step = step_actor(&mut motor, &mut handler, ActorState::Stunned, None, &sense, 0.35);
        assert_eq!(step.next, ActorState::Grounded);

        // Grounded motor снова цепляется за стену, gravity 0 вместе с Climbing
        let step = step_actor(&mut motor, &mut handler, ActorState::Grounded, None, &sense, 0.36);
        assert_eq!(step.next, ActorState::Grounded);
        let mut holding = sense;
        holding.input.vertical = 1.0;
        let step = step_actor(&mut motor, &mut handler, ActorState::Grounded, None, &holding, 0.37);
        assert_eq!(step.next, ActorState::Climbing);
        assert_eq!(step.intent.gravity_scale, Some(0.0));
    }

    #[test]
    fn test_resume_keeps_other_states() {
        let mut motor = PlayerMotor::new(PlayerConfig::default(), 1.0);
        assert_eq!(motor.on_resume(ActorState::Grounded), ActorState::Grounded);
        assert_eq!(motor.on_resume(ActorState::Climbing), ActorState::Grounded);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PlayerConfig = serde_json::from_str(r#"{ "move_speed": 7.5 }"#).expect("parse");
        assert_eq!(config.move_speed, 7.5);
        assert_eq!(config.jump_force, 10.0);
    }
}
