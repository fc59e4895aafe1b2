//! Movement подсистема: motor + dash + gravity field
//!
//! Вся интеграция — в FixedUpdate (60Hz) для детерминизма. Update часть
//! одна: сборка camera-relative move direction.

use bevy::prelude::*;

pub mod dash;
pub mod gravity;
pub mod motor;

pub use dash::DashState;
pub use gravity::{GravityField, GravitySource, GravitySourceHandle};
pub use motor::{motor_displacement, CharacterMotor, MoveState};

use crate::{FixedSet, GameplaySet};

/// Movement Plugin
///
/// Порядок FixedUpdate цепочки:
/// 1. tick_dash_timers — expiry/cooldown countdown
/// 2. ground_detection — grounded flag до потребления intents
/// 3. consume_dash_intents / consume_jump_intents
/// 4. apply_gravity — прижим или интеграция поля
/// 5. apply_motor_movement — displacement + floor clamp
/// 6. rotate_toward_heading — slerp корпуса
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GravityField>();

        app.add_systems(
            Update,
            motor::update_move_direction.in_set(GameplaySet::Aim),
        );

        app.add_systems(
            FixedUpdate,
            (
                motor::tick_dash_timers,
                motor::ground_detection,
                motor::consume_dash_intents,
                motor::consume_jump_intents,
                motor::apply_gravity,
                motor::apply_motor_movement,
                motor::rotate_toward_heading,
            )
                .chain()
                .in_set(FixedSet::Movement),
        );
    }
}
