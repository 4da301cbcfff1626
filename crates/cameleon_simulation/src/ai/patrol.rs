//! Патрулирование вокруг точки spawn

use serde::{Deserialize, Serialize};

use crate::ai::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    /// X точки spawn
    pub origin_x: f32,
    /// Насколько можно отойти от origin в каждую сторону
    pub distance: f32,
    pub speed: f32,
    pub facing: Facing,
}

impl PatrolRoute {
    pub fn new(origin_x: f32, distance: f32, speed: f32) -> Self {
        Self {
            origin_x,
            distance,
            speed,
            facing: Facing::Right,
        }
    }

    /// Горизонтальная скорость патруля; разворот когда ушли дальше `distance`
    /// в текущем направлении
    pub fn step(&mut self, x: f32) -> f32 {
        let displacement = x - self.origin_x;
        if self.facing.is_ahead(displacement) && displacement.abs() > self.distance {
            self.facing = self.facing.flipped();
        }
        self.facing.sign() * self.speed
    }

    /// Повернуться по знаку `dx` (ноль — не меняем)
    pub fn face(&mut self, dx: f32) {
        if let Some(facing) = Facing::from_x(dx) {
            self.facing = facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_walks_in_facing_direction() {
        let mut route = PatrolRoute::new(0.0, 3.0, 2.0);
        assert_eq!(route.step(1.0), 2.0);
        assert_eq!(route.facing, Facing::Right);
    }

    #[test]
    fn test_patrol_flips_past_distance() {
        let mut route = PatrolRoute::new(0.0, 3.0, 2.0);
        assert_eq!(route.step(3.1), -2.0);
        assert_eq!(route.facing, Facing::Left);

        // Уже идём обратно — не дёргаемся на той же стороне
        assert_eq!(route.step(3.05), -2.0);

        assert_eq!(route.step(-3.2), 2.0);
        assert_eq!(route.facing, Facing::Right);
    }

    #[test]
    fn test_face_ignores_zero() {
        let mut route = PatrolRoute::new(0.0, 3.0, 2.0);
        route.face(-1.0);
        assert_eq!(route.facing, Facing::Left);
        route.face(0.0);
        assert_eq!(route.facing, Facing::Left);
    }
}
