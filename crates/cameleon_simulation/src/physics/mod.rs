//! Physics adapter
//!
//! Kinematic тела, ground check, surface probes, Rapier (коллизии + character controller).

use bevy::prelude::*;
use bevy_rapier2d::prelude::{NoUserData, PhysicsSet, RapierPhysicsPlugin, TimestepMode};

pub mod body;
pub mod collision;

// Re-export основных типов
pub use body::{actor_collision_groups, kinematic_body_bundle, KinematicBody, PhysicsAdapter, GRAVITY};
pub use collision::{
    layers, probe_surface, spawn_level, CollisionQuery, RayHit, StaticCollider, SurfaceContact,
};

use crate::clock;
use crate::SimulationSet;

/// Physics Plugin
///
/// - Rapier (FixedUpdate): sync → step → writeback, до нашего Clock
/// - SimulationSet::Sensors: результат перемещения + ground_detection (до behavior)
/// - SimulationSet::Physics: gravity → integrate (запрос перемещения на следующий tick)
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        // Rapier шагает ровно раз за FixedUpdate, dt = simulation tick
        app.insert_resource(TimestepMode::Fixed {
            dt: 1.0 / clock::DEFAULT_TICK_RATE,
            substeps: 1,
        });
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());
        app.configure_sets(FixedUpdate, PhysicsSet::Writeback.before(SimulationSet::Clock));

        app.add_systems(
            FixedUpdate,
            (body::absorb_blocked_motion, body::ground_detection)
                .chain()
                .in_set(SimulationSet::Sensors),
        );

        app.add_systems(
            FixedUpdate,
            (body::apply_gravity, body::integrate_velocity)
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
