//! Animation parameter sink
//!
//! Core — pure producer: каждый Update тик переписывает параметры, host
//! animation graph их читает. Обратно core ничего не читает.

use bevy::prelude::*;

use crate::combat::Weapon;
use crate::components::Player;
use crate::input::InputSnapshot;
use crate::movement::{CharacterMotor, DashState, MoveState};

/// Именованные параметры для host animation graph
///
/// Зеркало параметров анимационного графа персонажа: скорость движения,
/// флаги grounded/shooting/reloading/dash, вертикальная скорость.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AnimatorParams {
    pub move_speed: f32,
    pub vertical_velocity: f32,
    pub is_grounded: bool,
    pub is_shooting: bool,
    pub is_reloading: bool,
    pub is_dashing: bool,
}

/// System: снять текущее состояние персонажа в AnimatorParams
///
/// Выполняется последней в Update цепочке — после combat и camera, чтобы
/// host видел состояние этого же тика.
pub fn sync_animator_params(
    snapshot: Res<InputSnapshot>,
    mut players: Query<
        (
            &CharacterMotor,
            &MoveState,
            &DashState,
            &Weapon,
            &mut AnimatorParams,
        ),
        With<Player>,
    >,
) {
    for (motor, move_state, dash, weapon, mut params) in players.iter_mut() {
        params.move_speed = move_state.direction.length();
        params.vertical_velocity = motor.velocity.y;
        params.is_grounded = motor.grounded;
        params.is_shooting = snapshot.fire_pressed && weapon.magazine > 0 && !weapon.reloading;
        params.is_reloading = weapon.reloading;
        params.is_dashing = dash.is_dashing();
    }
}
