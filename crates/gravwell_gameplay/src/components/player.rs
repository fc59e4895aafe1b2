//! Player control marker + spawn helpers
//!
//! Отмечает entity которым управляет игрок через input.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::combat::{collision, AimAssist, AimState, Weapon};
use crate::components::{AnimatorParams, Health, Hostile, Invincibility};
use crate::movement::{CharacterMotor, DashState, MoveState};

/// Marker component для player-controlled entity
///
/// Input systems используют `With<Player>` filter. В single-player режиме
/// обычно только один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Spawn helper: полный player character
///
/// Собирает entity со всеми gameplay компонентами:
/// - Transform (origin = ноги персонажа)
/// - Health/Invincibility, Weapon, AimState/AimAssist
/// - CharacterMotor + DashState + MoveState
/// - Rapier: kinematic body + capsule collider (для host physics backend)
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Player,
            Transform::from_translation(position),
            Health::default(),
            Invincibility::default(),
            Weapon::sidearm(),
            AimState::default(),
            AimAssist::default(),
            CharacterMotor::default(),
            DashState::default(),
            MoveState::default(),
            AnimatorParams::default(),
            // Rapier physics (host backend)
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.9, 0.4),
            Velocity::default(),
            collision::actor_groups(),
        ))
        .id()
}

/// Spawn helper: враждебный болванчик (цель для aim assist / projectile тестов)
pub fn spawn_hostile(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Hostile,
            Transform::from_translation(position),
            Health::default(),
            Invincibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.9, 0.4),
            Velocity::default(),
            collision::actor_groups(),
        ))
        .id()
}
