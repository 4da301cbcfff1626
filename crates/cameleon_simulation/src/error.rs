//! Диагностика поведения акторов
//!
//! Ни одна ошибка здесь не фатальна: актор деградирует до пассивного поведения
//! (Idle/Patrol), а ошибка один раз уходит в logger.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviorError {
    /// Нет обязательной зависимости при инициализации (physics body, target)
    #[error("actor {entity:?} is missing {dependency}")]
    MissingDependency {
        entity: Entity,
        dependency: &'static str,
    },

    /// Невалидный параметр конфигурации — зажат до безопасного минимума
    #[error("invalid configuration: {field} = {value} (clamped to {clamped})")]
    InvalidConfiguration {
        field: &'static str,
        value: f32,
        clamped: f32,
    },

    /// Target пропал посреди работы (despawn) — считаем что цели нет
    #[error("actor {entity:?} lost target {target:?}")]
    TransientSensorGap { entity: Entity, target: Entity },
}

impl BehaviorError {
    /// Отправить диагностику в logger с уровнем по типу ошибки
    pub fn report(&self) {
        match self {
            BehaviorError::MissingDependency { .. } => crate::log_error(&self.to_string()),
            BehaviorError::InvalidConfiguration { .. } => crate::log_warning(&self.to_string()),
            BehaviorError::TransientSensorGap { .. } => crate::log_info(&self.to_string()),
        }
    }
}

/// Зажать значение снизу; при нарушении — записать InvalidConfiguration
///
/// NaN тоже считается нарушением.
pub fn clamp_min(field: &'static str, value: f32, min: f32, errors: &mut Vec<BehaviorError>) -> f32 {
    if value >= min {
        value
    } else {
        errors.push(BehaviorError::InvalidConfiguration {
            field,
            value,
            clamped: min,
        });
        min
    }
}

/// Зажать значение сверху (бесконечность тоже); при нарушении — InvalidConfiguration
pub fn clamp_max(field: &'static str, value: f32, max: f32, errors: &mut Vec<BehaviorError>) -> f32 {
    if value <= max {
        value
    } else {
        errors.push(BehaviorError::InvalidConfiguration {
            field,
            value,
            clamped: max,
        });
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_min_keeps_valid_value() {
        let mut errors = Vec::new();
        assert_eq!(clamp_min("speed", 2.0, 0.1, &mut errors), 2.0);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_clamp_min_records_violation() {
        let mut errors = Vec::new();
        assert_eq!(clamp_min("cooldown", 0.0, 0.01, &mut errors), 0.01);
        assert_eq!(
            errors,
            vec![BehaviorError::InvalidConfiguration {
                field: "cooldown",
                value: 0.0,
                clamped: 0.01,
            }]
        );
    }

    #[test]
    fn test_clamp_min_rejects_nan() {
        let mut errors = Vec::new();
        assert_eq!(clamp_min("range", f32::NAN, 0.5, &mut errors), 0.5);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_clamp_max_rejects_infinity() {
        let mut errors = Vec::new();
        assert_eq!(clamp_max("range", 40.0, 100.0, &mut errors), 40.0);
        assert_eq!(clamp_max("range", f32::INFINITY, 100.0, &mut errors), 100.0);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_error_messages() {
        let error = BehaviorError::MissingDependency {
            entity: Entity::PLACEHOLDER,
            dependency: "KinematicBody",
        };
        assert!(error.to_string().contains("KinematicBody"));
    }
}
