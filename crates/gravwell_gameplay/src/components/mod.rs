//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье, invincibility frames, hostile marker
//! - player: player control marker + spawn helpers
//! - animation: параметры для host animation graph (pure producer)

pub mod actor;
pub mod animation;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use player::*;
