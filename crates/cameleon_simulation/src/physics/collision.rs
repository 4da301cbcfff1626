//! Геометрия уровня + collision queries
//!
//! Архитектура:
//! - Геометрия уровня — обычные Rapier коллайдеры (`RigidBody::Fixed` + `Collider::cuboid`)
//! - `CollisionQuery` — минимальный набор запросов (raycast, overlap), реализован поверх `RapierContext`
//! - Surface probes для climbing строятся поверх `CollisionQuery::raycast`
//!
//! Query pipeline Rapier собирается из broad phase, которую обновляет `StepSimulation`:
//! свежезаспавненная геометрия видна запросам начиная с первого tick'а.

use bevy::prelude::*;
use bevy_rapier2d::parry::shape::Ball;
use bevy_rapier2d::prelude::{Collider, CollisionGroups, Group, QueryFilter, RapierContext, RigidBody, Sensor};

/// Collision groups (Rapier `Group` bitmask)
pub mod layers {
    use bevy_rapier2d::prelude::Group;

    /// Акторы (player + enemies)
    pub const ACTOR: Group = Group::GROUP_1;
    /// Пол/платформы — ground check
    pub const GROUND: Group = Group::GROUP_2;
    /// Поверхности по которым можно ползать (стены, потолок)
    pub const CLIMBABLE: Group = Group::GROUP_3;
    /// Водные зоны (trigger volume, без коллизии)
    pub const WATER: Group = Group::GROUP_4;
    /// Невидимые края платформ — блокируют только evasive врагов
    pub const EDGE: Group = Group::GROUP_5;
    /// Стены уровня обычно и пол, и climbable
    pub const SOLID: Group = GROUND.union(CLIMBABLE);
}

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec2,
    /// Нормаль поверхности в точке попадания (unit)
    pub normal: Vec2,
}

/// Collision queries, нужные поведению акторов
pub trait CollisionQuery {
    /// Луч из `origin` вдоль `direction` до `max_distance`.
    /// Луч, стартующий внутри коллайдера, попаданием не считается.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: Group) -> Option<RayHit>;

    /// Пересекает ли круг хоть один коллайдер из `mask`
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: Group) -> bool;

    /// Лежит ли точка внутри коллайдера из `mask` (trigger volumes)
    fn contains_point(&self, point: Vec2, mask: Group) -> bool;
}

/// Фильтр запроса: только геометрия из `mask` (акторы не входят ни в один слой уровня)
fn layer_filter(mask: Group) -> QueryFilter<'static> {
    QueryFilter::new().groups(CollisionGroups::new(Group::ALL, mask))
}

impl CollisionQuery for RapierContext<'_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: Group) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        self.cast_ray_and_get_normal(origin, direction, max_distance, true, layer_filter(mask))
            .filter(|(_, hit)| hit.time_of_impact > 0.0)
            .map(|(_, hit)| RayHit {
                distance: hit.time_of_impact,
                point: hit.point,
                normal: hit.normal,
            })
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: Group) -> bool {
        let mut found = false;
        self.intersect_shape(center, 0.0, &Ball::new(radius), layer_filter(mask), |_| {
            found = true;
            false
        });
        found
    }

    fn contains_point(&self, point: Vec2, mask: Group) -> bool {
        let mut found = false;
        self.intersect_point(point, layer_filter(mask), |_| {
            found = true;
            false
        });
        found
    }
}

/// Прямоугольник геометрии уровня (описание для spawn)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub layers: Group,
}

impl StaticCollider {
    pub fn new(center: Vec2, half_extents: Vec2, layers: Group) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
            layers,
        }
    }

    /// Trigger volume: не блокирует движение, только детектится запросами
    pub fn is_trigger(&self) -> bool {
        !self.layers.intersects(layers::SOLID.union(layers::EDGE))
    }

    /// Спавнит коллайдер в мир (Rapier подхватит его на ближайшем tick'е)
    pub fn spawn(self, world: &mut World) -> Entity {
        let mut entity = world.spawn((
            Transform::from_translation(self.center.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(self.half_extents.x, self.half_extents.y),
            CollisionGroups::new(self.layers, Group::ALL),
        ));
        if self.is_trigger() {
            entity.insert(Sensor);
        }
        entity.id()
    }
}

/// Спавн всей геометрии уровня
pub fn spawn_level(world: &mut World, colliders: impl IntoIterator<Item = StaticCollider>) -> Vec<Entity> {
    colliders.into_iter().map(|collider| collider.spawn(world)).collect()
}

/// Контакт с climbable поверхностью (пересчитывается каждый tick)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct SurfaceContact {
    pub has_surface: bool,
    pub normal: Vec2,
}

impl SurfaceContact {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_normal(normal: Vec2) -> Self {
        Self {
            has_surface: true,
            normal,
        }
    }

    /// Потолок: нормаль смотрит вниз
    pub fn is_ceiling(&self) -> bool {
        self.has_surface && self.normal.y < -0.5
    }

    /// Стена: нормаль горизонтальная
    pub fn is_wall(&self) -> bool {
        self.has_surface && self.normal.x.abs() > 0.5
    }
}

/// Порядок probes: сначала стены (right, left), потом потолок.
/// Пол не пробуем — за него отвечает ground check.
pub const SURFACE_PROBES: [Vec2; 3] = [Vec2::X, Vec2::NEG_X, Vec2::Y];

/// Surface probe: первый hit в порядке `SURFACE_PROBES`
pub fn probe_surface(world: &impl CollisionQuery, origin: Vec2, check_distance: f32) -> SurfaceContact {
    SURFACE_PROBES
        .iter()
        .find_map(|&direction| world.raycast(origin, direction, check_distance, layers::CLIMBABLE))
        .map(|hit| SurfaceContact::with_normal(hit.normal))
        .unwrap_or_default()
}
