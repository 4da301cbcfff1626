//! Bootstrap: target locator + проверка зависимостей
//!
//! Выполняется один раз при появлении актора (`Added<…>`).
//! Отсутствие зависимости не фатально:
//! - нет physics body → `Disabled`, state = Idle
//! - нет цели → переходы, зависящие от цели, просто не срабатывают

use bevy::prelude::*;

use crate::ai::{change_state, ActorState, ActorStateChanged};
use crate::components::{Dead, Disabled, Player};
use crate::error::BehaviorError;
use crate::physics::KinematicBody;

/// Компонент: за кем следит враг
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetLocator {
    /// None — цели нет (не найдена или пропала)
    pub target: Option<Entity>,
}

impl TargetLocator {
    pub fn tracking(target: Entity) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// Цель пропала (despawn/смерть): забываем её
    pub fn lose(&mut self) -> Option<Entity> {
        self.target.take()
    }
}

/// Система: найти ближайшего Player для новых акторов
///
/// Locator с уже заданной целью (`TargetLocator::tracking`) не трогаем.
pub fn resolve_targets(
    mut locators: Query<(Entity, &Transform, &mut TargetLocator), Added<TargetLocator>>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Dead>)>,
) {
    for (entity, transform, mut locator) in locators.iter_mut() {
        if locator.target.is_some() {
            continue;
        }

        let position = transform.translation.truncate();
        let nearest = players
            .iter()
            .map(|(player, player_transform)| {
                (player, position.distance_squared(player_transform.translation.truncate()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(player, _)| player);

        match nearest {
            Some(player) => {
                locator.target = Some(player);
                crate::log(&format!("🎯 {:?} tracking target {:?}", entity, player));
            }
            None => BehaviorError::MissingDependency {
                entity,
                dependency: "Player target",
            }
            .report(),
        }
    }
}

/// Система: акторы без physics body отключаются
pub fn validate_dependencies(
    mut commands: Commands,
    mut actors: Query<(Entity, &mut ActorState), (Added<ActorState>, Without<KinematicBody>)>,
    mut state_events: EventWriter<ActorStateChanged>,
) {
    for (entity, mut state) in actors.iter_mut() {
        change_state(entity, &mut state, ActorState::Idle, &mut state_events);
        commands.entity(entity).insert(Disabled);

        BehaviorError::MissingDependency {
            entity,
            dependency: "KinematicBody",
        }
        .report();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_nearest_player() {
        let mut app = App::new();
        app.add_systems(Update, resolve_targets);

        let far = app.world_mut().spawn((Player, Transform::from_xyz(10.0, 0.0, 0.0))).id();
        let near = app.world_mut().spawn((Player, Transform::from_xyz(-2.0, 0.0, 0.0))).id();
        let enemy = app
            .world_mut()
            .spawn((TargetLocator::default(), Transform::default()))
            .id();

        app.update();

        let locator = app.world().get::<TargetLocator>(enemy).expect("locator");
        assert_eq!(locator.target, Some(near));
        assert_ne!(locator.target, Some(far));
    }

    #[test]
    fn test_no_player_leaves_target_empty() {
        let mut app = App::new();
        app.add_systems(Update, resolve_targets);

        let enemy = app
            .world_mut()
            .spawn((TargetLocator::default(), Transform::default()))
            .id();
        app.update();

        assert_eq!(app.world().get::<TargetLocator>(enemy).expect("locator").target, None);
    }

    #[test]
    fn test_missing_body_disables_actor() {
        let mut app = App::new();
        app.add_event::<ActorStateChanged>()
            .add_systems(Update, validate_dependencies);

        let broken = app.world_mut().spawn(ActorState::Patrol).id();
        let healthy = app
            .world_mut()
            .spawn((ActorState::Patrol, KinematicBody::default()))
            .id();
        app.update();

        assert_eq!(*app.world().get::<ActorState>(broken).expect("state"), ActorState::Idle);
        assert!(app.world().get::<Disabled>(broken).is_some());
        assert_eq!(*app.world().get::<ActorState>(healthy).expect("state"), ActorState::Patrol);
        assert!(app.world().get::<Disabled>(healthy).is_none());
    }

    #[test]
    fn test_missing_body_reports_state_change() {
        let mut app = App::new();
        app.add_event::<ActorStateChanged>()
            .add_systems(Update, validate_dependencies);

        let broken = app.world_mut().spawn(ActorState::Chase).id();
        app.world_mut().spawn((ActorState::Patrol, KinematicBody::default()));
        app.update();

        let events = app.world().resource::<Events<ActorStateChanged>>();
        let changes: Vec<_> = events.iter_current_update_events().copied().collect();
        assert_eq!(
            changes,
            vec![ActorStateChanged {
                entity: broken,
                from: ActorState::Chase,
                to: ActorState::Idle,
            }]
        );
    }

    #[test]
    fn test_idle_actor_without_body_stays_silent() {
        let mut app = App::new();
        app.add_event::<ActorStateChanged>()
            .add_systems(Update, validate_dependencies);

        let broken = app.world_mut().spawn(ActorState::Idle).id();
        app.update();

        assert!(app.world().get::<Disabled>(broken).is_some());
        let events = app.world().resource::<Events<ActorStateChanged>>();
        assert_eq!(events.iter_current_update_events().count(), 0);
    }
}
