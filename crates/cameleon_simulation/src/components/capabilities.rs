//! Capability / stat query — read-only интерфейс к внешней системе трансформаций
//!
//! Трансформации (Frog, Spider, Ladybug) меняют этот компонент в любой tick.
//! Behavior core никогда не кеширует значения: читает заново каждый tick.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Допустимый диапазон stat multipliers
pub const MULTIPLIER_RANGE: (f32, f32) = (0.1, 3.0);

/// Что core спрашивает у системы трансформаций
pub trait CapabilityQuery {
    fn can_wall_climb(&self) -> bool;
    fn can_swim(&self) -> bool;
    fn can_fit_small_gaps(&self) -> bool;
    /// Множитель скорости передвижения
    fn speed_multiplier(&self) -> f32 {
        1.0
    }
    /// Множитель силы прыжка
    fn jump_multiplier(&self) -> f32 {
        1.0
    }
}

/// Текущие способности актора (пишет система трансформаций)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct Capabilities {
    pub wall_climb: bool,
    pub swim: bool,
    pub small_gaps: bool,
    pub speed_multiplier: f32,
    pub jump_multiplier: f32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            wall_climb: false,
            swim: false,
            small_gaps: false,
            speed_multiplier: 1.0,
            jump_multiplier: 1.0,
        }
    }
}

impl Capabilities {
    /// Spider: ползает по стенам и потолку
    pub fn spider() -> Self {
        Self {
            wall_climb: true,
            ..default()
        }
    }

    /// Frog: плавает
    pub fn frog() -> Self {
        Self {
            swim: true,
            ..default()
        }
    }

    /// Ladybug: пролезает в узкие щели
    pub fn ladybug() -> Self {
        Self {
            small_gaps: true,
            ..default()
        }
    }
}

impl CapabilityQuery for Capabilities {
    fn can_wall_climb(&self) -> bool {
        self.wall_climb
    }

    fn can_swim(&self) -> bool {
        self.swim
    }

    fn can_fit_small_gaps(&self) -> bool {
        self.small_gaps
    }

    fn speed_multiplier(&self) -> f32 {
        clamp_multiplier(self.speed_multiplier)
    }

    fn jump_multiplier(&self) -> f32 {
        clamp_multiplier(self.jump_multiplier)
    }
}

fn clamp_multiplier(value: f32) -> f32 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MULTIPLIER_RANGE.0, MULTIPLIER_RANGE.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_form_has_no_abilities() {
        let caps = Capabilities::default();
        assert!(!caps.can_wall_climb());
        assert!(!caps.can_swim());
        assert!(!caps.can_fit_small_gaps());
    }

    #[test]
    fn test_presets() {
        assert!(Capabilities::spider().can_wall_climb());
        assert!(Capabilities::frog().can_swim());
        assert!(Capabilities::ladybug().can_fit_small_gaps());
    }

    #[test]
    fn test_multipliers_are_clamped() {
        let caps = Capabilities {
            speed_multiplier: 10.0,
            jump_multiplier: 0.0,
            ..default()
        };
        assert_eq!(caps.speed_multiplier(), 3.0);
        assert_eq!(caps.jump_multiplier(), 0.1);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let caps: Capabilities = serde_json::from_str(r#"{ "wall_climb": true }"#).expect("parse");
        assert!(caps.wall_climb);
        assert_eq!(caps.speed_multiplier, 1.0);
    }
}
