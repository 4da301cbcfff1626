//! Тесты детерминизма
//!
//! Одинаковый уровень + одинаковая последовательность input → идентичный мир

use bevy::prelude::*;
use cameleon_simulation::physics::layers;
use cameleon_simulation::{
    aggressive_enemy_bundle, create_headless_app, evasive_enemy_bundle, player_bundle, step_simulation, world_snapshot,
    spawn_level, ActorState, AggressiveConfig, EvasiveConfig, Health, KinematicBody, PlayerAttackConfig,
    PlayerConfig, PlayerInput, StaticCollider,
};

const ENEMY_COUNT: usize = 12;
const TICK_COUNT: usize = 1200;

#[test]
fn test_determinism_same_input() {
    let snapshot1 = run_simulation(TICK_COUNT);
    let snapshot2 = run_simulation(TICK_COUNT);

    assert_eq!(snapshot1, snapshot2, "Одинаковый input дал разные результаты!");
}

#[test]
fn test_determinism_multiple_runs() {
    let snapshots: Vec<_> = (0..5).map(|_| run_simulation(TICK_COUNT / 2)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

/// Скриптованный input: бег туда-обратно, периодические прыжки и атаки
fn scripted_input(tick: usize) -> PlayerInput {
    PlayerInput {
        horizontal: if (tick / 120) % 2 == 0 { 1.0 } else { -1.0 },
        vertical: 0.0,
        jump: tick % 45 == 0,
        attack: tick % 20 == 0,
    }
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app();
    spawn_level(
        app.world_mut(),
        [
            StaticCollider::new(Vec2::new(0.0, -0.5), Vec2::new(100.0, 0.5), layers::GROUND),
            StaticCollider::new(Vec2::new(30.0, 5.0), Vec2::new(0.5, 5.0), layers::SOLID),
            StaticCollider::new(Vec2::new(-30.0, 0.5), Vec2::new(2.0, 0.5), layers::WATER),
            StaticCollider::new(Vec2::new(-20.0, 1.0), Vec2::new(0.1, 1.0), layers::EDGE),
        ],
    );

    let player = app
        .world_mut()
        .spawn(player_bundle(
            Vec2::new(0.0, 0.5),
            PlayerConfig::default(),
            PlayerAttackConfig::default(),
        ))
        .id();

    for i in 0..ENEMY_COUNT {
        let x = (i as f32 - ENEMY_COUNT as f32 / 2.0) * 4.0;
        let position = Vec2::new(x, 0.5);
        if i % 2 == 0 {
            app.world_mut()
                .spawn(aggressive_enemy_bundle(position, AggressiveConfig::default()));
        } else {
            app.world_mut()
                .spawn(evasive_enemy_bundle(position, EvasiveConfig::default()));
        }
    }

    for tick in 0..tick_count {
        if let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) {
            *input = scripted_input(tick);
        }
        step_simulation(&mut app, 1);
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<KinematicBody>(world));
    snapshot.extend(world_snapshot::<ActorState>(world));
    snapshot.extend(world_snapshot::<Health>(world));
    snapshot
}
