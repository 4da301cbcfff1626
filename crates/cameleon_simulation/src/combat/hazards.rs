//! Water hazard
//!
//! Игрок в water volume без `can_swim()` получает `damage_per_second × dt`
//! урона каждый tick (без knockback). Frog форма плавает: урона нет,
//! gravity уменьшает PlayerMotor.

use bevy::prelude::*;
use bevy_rapier2d::prelude::ReadRapierContext;
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::combat::damage::DamageRequest;
use crate::components::{Capabilities, CapabilityQuery, Dead, Player};
use crate::physics::{layers, CollisionQuery};

#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterHazardConfig {
    /// 999 — фактически мгновенная смерть для не-пловца
    pub damage_per_second: f32,
}

impl Default for WaterHazardConfig {
    fn default() -> Self {
        Self {
            damage_per_second: 999.0,
        }
    }
}

/// Система: урон от воды
pub fn water_hazard(
    clock: Res<SimulationClock>,
    config: Res<WaterHazardConfig>,
    rapier: ReadRapierContext,
    players: Query<(Entity, &Transform, Option<&Capabilities>), (With<Player>, Without<Dead>)>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, transform, capabilities) in players.iter() {
        let can_swim = capabilities.is_some_and(|caps| caps.can_swim());
        if can_swim || !context.contains_point(transform.translation.truncate(), layers::WATER) {
            continue;
        }

        damage_requests.write(DamageRequest {
            attacker: None,
            target: entity,
            amount: config.damage_per_second.max(0.0) * clock.step,
            knockback: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_rapier2d::prelude::{NoUserData, RapierPhysicsPlugin, TimestepMode};

    use crate::physics::StaticCollider;

    /// Лужа x ∈ [-2, 2], y ∈ [-1, 1] в Rapier мире (Rapier шагает в PostUpdate)
    fn setup() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimestepMode::Fixed {
                dt: 1.0 / 60.0,
                substeps: 1,
            })
            .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .insert_resource(SimulationClock::from_hz(60.0))
            .insert_resource(WaterHazardConfig {
                damage_per_second: 60.0,
            })
            .add_event::<DamageRequest>()
            .add_systems(Update, water_hazard);

        // PreStartup создаёт Rapier context, второй update регистрирует лужу
        app.update();
        StaticCollider::new(Vec2::ZERO, Vec2::new(2.0, 1.0), layers::WATER).spawn(app.world_mut());
        app.update();
        app
    }

    fn requests(app: &App) -> Vec<DamageRequest> {
        let events = app.world().resource::<Events<DamageRequest>>();
        events.iter_current_update_events().copied().collect()
    }

    #[test]
    fn test_non_swimmer_takes_damage_per_tick() {
        let mut app = setup();
        let player = app
            .world_mut()
            .spawn((Player, Transform::default(), Capabilities::default()))
            .id();

        app.update();

        let hits = requests(&app);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, player);
        assert!((hits[0].amount - 1.0).abs() < 1e-5);
        assert_eq!(hits[0].knockback, None);
    }

    #[test]
    fn test_swimmer_is_safe() {
        let mut app = setup();
        app.world_mut()
            .spawn((Player, Transform::default(), Capabilities::frog()));

        app.update();
        assert!(requests(&app).is_empty());
    }

    #[test]
    fn test_outside_water_is_safe() {
        let mut app = setup();
        app.world_mut()
            .spawn((Player, Transform::from_xyz(10.0, 0.0, 0.0), Capabilities::default()));

        app.update();
        assert!(requests(&app).is_empty());
    }
}
