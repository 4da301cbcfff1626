//! Player controller
//!
//! Игрок — такой же актор, как враги: `PlayerMotor` реализует `BehaviorGraph`,
//! stun/knockback обрабатывает общий controller (без торможения — knockback
//! уносит игрока, пока он оглушён).

use bevy::prelude::*;

pub mod input;
pub mod motor;
pub mod systems;

pub use input::PlayerInput;
pub use motor::{PlayerConfig, PlayerMotor, PlayerSense};
pub use systems::drive_player;

use crate::ai::{ActorStateChanged, BehaviorGraph};
use crate::combat::knockback::{InterruptMailbox, KnockbackConfig, KnockbackHandler};
use crate::combat::player_attack::{PlayerAttack, PlayerAttackConfig};
use crate::components::{Capabilities, Health, Player};
use crate::physics::{kinematic_body_bundle, layers, KinematicBody};
use crate::SimulationSet;

/// Здоровье игрока по умолчанию
pub const PLAYER_HEALTH: f32 = 100.0;

/// Набор компонентов игрока
///
/// `Capabilities` по умолчанию — базовая форма (без способностей),
/// система трансформаций заменяет компонент на лету.
pub fn player_bundle(position: Vec2, config: PlayerConfig, attack: PlayerAttackConfig) -> impl Bundle {
    let motor = PlayerMotor::new(config, KinematicBody::default().gravity_scale);
    (
        Name::new("Player"),
        Player,
        Health::new(PLAYER_HEALTH),
        motor.initial_state(),
        motor,
        PlayerInput::default(),
        PlayerAttack::new(attack),
        Capabilities::default(),
        KnockbackHandler::new(KnockbackConfig::player()),
        InterruptMailbox::default(),
        kinematic_body_bundle(position, layers::SOLID),
    )
}

/// Player Plugin
///
/// drive_player — в SimulationSet::Behavior, раньше врагов (фиксированный порядок).
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActorStateChanged>();
        app.add_systems(FixedUpdate, drive_player.in_set(SimulationSet::Behavior));
    }
}
