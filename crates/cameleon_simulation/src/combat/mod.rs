//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, cooldowns, stun records
//! - Combat rules: strike → DamageRequest → Health + knockback interrupt
//! - Events: DamageRequest, DamageDealt, EntityDied
//!
//! Knockback не применяется сразу: `apply_damage` кладёт interrupt в mailbox
//! жертвы, controller жертвы разбирает его в начале следующего tick.

use bevy::prelude::*;

pub mod cooldown;
pub mod damage;
pub mod hazards;
pub mod knockback;
pub mod player_attack;


// Re-export основных типов
pub use cooldown::CooldownTimer;
pub use damage::{DamageDealt, DamageRequest, DespawnAfter, EntityDied, DEATH_DESPAWN_DELAY};
pub use hazards::WaterHazardConfig;
pub use knockback::{Interrupt, InterruptMailbox, InterruptOutcome, KnockbackConfig, KnockbackHandler, StunRecord};
pub use player_attack::{PlayerAttack, PlayerAttackConfig};

use crate::ai::ActorStateChanged;
use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (SimulationSet::Combat).
///
/// Порядок выполнения:
/// 1. player_attack — attack trigger → DamageRequest
/// 2. water_hazard — урон от воды не-пловцу
/// 3. apply_damage — Health + knockback в mailbox жертвы
/// 4. handle_death — Dead/Disabled, DespawnAfter
/// 5. despawn_after_timeout — уборка мёртвых
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<ActorStateChanged>()
            .add_event::<EntityDied>()
            .init_resource::<WaterHazardConfig>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: источники урона
                player_attack::player_attack,
                hazards::water_hazard,
                // Фаза 2: применение урона
                damage::apply_damage,
                // Фаза 3: смерть
                damage::handle_death,
                damage::despawn_after_timeout,
            )
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Combat),
        );
    }
}
