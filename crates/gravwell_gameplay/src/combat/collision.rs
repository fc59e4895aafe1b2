//! Collision groups (централизованные константы для host physics backend)
//!
//! - Layer ACTORS: персонажи (kinematic capsules)
//! - Layer ENVIRONMENT: статика (стены, пол)
//! - Layer PROJECTILES: пули (sensor balls)

use bevy_rapier3d::prelude::*;

pub const GROUP_ACTORS: Group = Group::GROUP_2;
pub const GROUP_ENVIRONMENT: Group = Group::GROUP_3;
pub const GROUP_PROJECTILES: Group = Group::GROUP_4;

/// Актор коллайдит с акторами, статикой и пулями
pub fn actor_groups() -> CollisionGroups {
    CollisionGroups::new(
        GROUP_ACTORS,
        GROUP_ACTORS | GROUP_ENVIRONMENT | GROUP_PROJECTILES,
    )
}

/// Пуля коллайдит с акторами и статикой (но не с другими пулями)
pub fn projectile_groups() -> CollisionGroups {
    CollisionGroups::new(GROUP_PROJECTILES, GROUP_ACTORS | GROUP_ENVIRONMENT)
}
