//! Headless симуляция Cameleon
//!
//! Уровень: пол + стена справа + лужа слева + край платформы для evasive врага.
//! Игрок стоит на месте, aggressive враг подходит и атакует, evasive враг убегает.

use bevy::prelude::*;
use cameleon_simulation::physics::layers;
use cameleon_simulation::{
    aggressive_enemy_bundle, create_headless_app, evasive_enemy_bundle, player_bundle, step_simulation, ActorState,
    spawn_level, AggressiveConfig, EvasiveConfig, Health, PlayerAttackConfig, PlayerConfig, SimulationClock,
    StaticCollider,
};

const TICKS: usize = 600;

fn main() {
    println!("Starting Cameleon headless simulation ({} ticks)", TICKS);

    let mut app = create_headless_app();

    let world = app.world_mut();
    spawn_level(
        world,
        [
            StaticCollider::new(Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5), layers::GROUND),
            StaticCollider::new(Vec2::new(20.0, 5.0), Vec2::new(0.5, 5.0), layers::SOLID),
            StaticCollider::new(Vec2::new(-15.0, 0.5), Vec2::new(3.0, 0.5), layers::WATER),
            StaticCollider::new(Vec2::new(-10.0, 1.0), Vec2::new(0.1, 1.0), layers::EDGE),
        ],
    );

    let player = world
        .spawn(player_bundle(
            Vec2::new(0.0, 0.5),
            PlayerConfig::default(),
            PlayerAttackConfig::default(),
        ))
        .id();
    let brute = world
        .spawn(aggressive_enemy_bundle(Vec2::new(8.0, 0.5), AggressiveConfig::default()))
        .id();
    let ladybug = world
        .spawn(evasive_enemy_bundle(Vec2::new(-4.0, 0.5), EvasiveConfig::default()))
        .id();

    for tick in 0..TICKS {
        step_simulation(&mut app, 1);

        if tick % 60 == 0 {
            let world = app.world();
            let now = world.resource::<SimulationClock>().now;
            let describe = |entity: Entity| {
                let state = world.get::<ActorState>(entity).copied();
                let health = world.get::<Health>(entity).map(|h| h.current);
                let x = world.get::<Transform>(entity).map(|t| t.translation.x);
                format!("{:?} hp={:?} x={:?}", state, health, x)
            };
            println!(
                "t={:.2}s player[{}] brute[{}] ladybug[{}]",
                now,
                describe(player),
                describe(brute),
                describe(ladybug)
            );
        }
    }

    println!("Simulation complete!");
}
