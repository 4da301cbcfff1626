//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье и маркеры (Health, Player, Disabled, Dead)
//! - capabilities: способности от системы трансформаций (CapabilityQuery)

pub mod actor;
pub mod capabilities;

// Re-exports для удобного импорта
pub use actor::*;
pub use capabilities::*;
