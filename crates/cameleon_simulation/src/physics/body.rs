//! Kinematic тело актора
//!
//! Архитектура:
//! - Rapier для коллизий (RigidBody::KinematicPositionBased + KinematicCharacterController)
//! - Velocity integration делаем сами (не используем Rapier forces)
//! - Gravity + ground check + impulse
//! - Перемещение: velocity * dt → `KinematicCharacterController::translation`,
//!   Rapier применяет его в начале следующего tick'а (SyncBackend), стены блокируют
//!
//! Детерминизм: fixed timestep из `SimulationClock`, `enhanced-determinism` у Rapier

use bevy::prelude::*;
use bevy_rapier2d::prelude::{
    CharacterLength, Collider, CollisionGroups, Group, KinematicCharacterController,
    KinematicCharacterControllerOutput, LockedAxes, QueryFilterFlags, ReadRapierContext, RigidBody,
};

use crate::clock::SimulationClock;
use crate::physics::collision::{layers, CollisionQuery};

/// Ускорение свободного падения (m/s²)
pub const GRAVITY: f32 = -9.81;

/// Минимальная масса — защита от деления на ноль в impulse
const MIN_MASS: f32 = 0.01;

/// Зазор между коллайдером актора и геометрией (character controller offset)
const SKIN: f32 = 0.01;

/// Расхождение desired/effective, начиная с которого считаем ось заблокированной
const BLOCK_TOLERANCE: f32 = 1e-4;

/// Минимальные операции над физическим телом, нужные behavior core
///
/// Controller пишет в тело ровно один раз за tick (через MotionIntent).
pub trait PhysicsAdapter {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    /// Мгновенный импульс (ForceMode Impulse: Δv = J / m)
    fn apply_impulse(&mut self, impulse: Vec2);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);
    fn is_grounded(&self) -> bool;
}

/// Kinematic тело
///
/// Используем вместо Rapier dynamics: velocity интегрируем сами,
/// Rapier двигает коллайдер через character controller.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub velocity: Vec2,
    pub mass: f32,
    pub gravity_scale: f32,
    /// На земле ли (обновляется ground_detection каждый tick)
    pub grounded: bool,
    /// Смещение точки ground check от центра
    pub foot_offset: Vec2,
    /// Радиус ground check
    pub foot_radius: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            mass: 1.0,
            gravity_scale: 1.0,
            grounded: false,
            foot_offset: Vec2::new(0.0, -0.5),
            foot_radius: 0.2,
        }
    }
}

impl PhysicsAdapter for KinematicBody {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse / self.mass.max(MIN_MASS);
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

/// Система: ground detection через overlap circle под ногами
pub fn ground_detection(rapier: ReadRapierContext, mut query: Query<(&Transform, &mut KinematicBody)>) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (transform, mut body) in query.iter_mut() {
        let foot = transform.translation.truncate() + body.foot_offset;
        body.grounded = context.overlap_circle(foot, body.foot_radius, layers::GROUND);
    }
}

/// Система: гасим velocity по осям, на которых character controller упёрся в геометрию
///
/// Смотрим только на свежий output (перемещение этого tick'а).
pub fn absorb_blocked_motion(
    mut query: Query<
        (&KinematicCharacterControllerOutput, &mut KinematicBody),
        Changed<KinematicCharacterControllerOutput>,
    >,
) {
    for (output, mut body) in query.iter_mut() {
        let lost = output.desired_translation - output.effective_translation;
        if lost.x.abs() > BLOCK_TOLERANCE && lost.x.signum() == body.velocity.x.signum() {
            body.velocity.x = 0.0;
        }
        if lost.y.abs() > BLOCK_TOLERANCE && lost.y.signum() == body.velocity.y.signum() {
            body.velocity.y = 0.0;
        }
    }
}

/// Система: gravity
///
/// На земле гасим только падение (vy < 0), прыжок вверх не трогаем.
pub fn apply_gravity(clock: Res<SimulationClock>, mut query: Query<&mut KinematicBody>) {
    for mut body in query.iter_mut() {
        if body.grounded {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        } else {
            body.velocity.y += GRAVITY * body.gravity_scale * clock.step;
        }
    }
}

/// Система: velocity * dt → запрос перемещения character controller'у
pub fn integrate_velocity(
    clock: Res<SimulationClock>,
    mut query: Query<(&KinematicBody, &mut KinematicCharacterController)>,
) {
    for (body, mut controller) in query.iter_mut() {
        let translation = body.velocity * clock.step;
        controller.translation = (translation != Vec2::ZERO).then_some(translation);
    }
}

/// Набор компонентов физического тела актора
///
/// - Transform
/// - KinematicBody (наша velocity)
/// - Rapier: RigidBody + Collider (capsule) + KinematicCharacterController
///
/// `blocking` — слои геометрии, сквозь которые актор пройти не может.
pub fn kinematic_body_bundle(position: Vec2, blocking: Group) -> impl Bundle {
    (
        Transform::from_translation(position.extend(0.0)),
        KinematicBody::default(),
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(0.25, 0.25), // высота 1.0m (0.25 + 0.25 + 2×0.25)
        LockedAxes::ROTATION_LOCKED,
        actor_collision_groups(),
        KinematicCharacterController {
            offset: CharacterLength::Absolute(SKIN),
            slide: true,
            autostep: None,
            snap_to_ground: None,
            apply_impulse_to_dynamic_bodies: false,
            filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
            filter_groups: Some(CollisionGroups::new(layers::ACTOR, blocking)),
            ..default()
        },
    )
}

/// Акторы не входят ни в один слой уровня: queries геометрии их не видят
pub fn actor_collision_groups() -> CollisionGroups {
    CollisionGroups::new(layers::ACTOR, layers::ACTOR | layers::SOLID)
}
