//! Third-person camera rig
//!
//! Камера висит за спиной против направления прицеливания. Tuning зависит
//! от активного девайса: gamepad получает большую дистанцию, быстрый follow
//! и predictive lead по движению. Всё сглаживание — lerp в Update
//! (camera — визуальный слой, ей не нужен fixed tick).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AimState;
use crate::components::Player;
use crate::input::{InputDevice, InputSnapshot};
use crate::movement::MoveState;
use crate::GameplaySet;

/// Per-device tuning камеры (plain data, host может грузить из файла)
#[derive(Debug, Clone, Copy, Reflect, Serialize, Deserialize)]
pub struct CameraTuning {
    pub distance: f32,
    pub height: f32,
    pub follow_speed: f32,
}

/// Rig третьего лица
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub mouse: CameraTuning,
    pub gamepad: CameraTuning,
    /// Высота pivot над ногами персонажа
    pub pivot_height: f32,
    /// Высота точки взгляда (грудь)
    pub look_height: f32,
    /// Predictive lead по движению (только gamepad)
    pub gamepad_lead: f32,
    /// Сглаженный pivot (world space)
    pub pivot: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mouse: CameraTuning {
                distance: 5.0,
                height: 5.0,
                follow_speed: 5.0,
            },
            gamepad: CameraTuning {
                distance: 8.0,
                height: 4.0,
                follow_speed: 8.0,
            },
            pivot_height: 2.0,
            look_height: 1.5,
            gamepad_lead: 2.0,
            pivot: Vec3::ZERO,
        }
    }
}

/// Spawn helper: camera rig entity
pub fn spawn_camera_rig(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((CameraRig::default(), Transform::from_translation(position)))
        .id()
}

/// System (Update): follow + look-at
///
/// Guard: без player или без rig тик деградирует в no-op.
pub fn update_camera(
    time: Res<Time>,
    snapshot: Res<InputSnapshot>,
    players: Query<(&Transform, &AimState, &MoveState), (With<Player>, Without<CameraRig>)>,
    mut rigs: Query<(&mut Transform, &mut CameraRig), Without<Player>>,
) {
    let Ok((player_transform, aim, move_state)) = players.single() else {
        return;
    };
    let Ok((mut camera_transform, mut rig)) = rigs.single_mut() else {
        return;
    };

    let tuning = match snapshot.device {
        InputDevice::KeyboardMouse => rig.mouse,
        InputDevice::Gamepad => rig.gamepad,
    };
    let t = (tuning.follow_speed * time.delta_secs()).clamp(0.0, 1.0);

    let pivot_target = player_transform.translation + Vec3::Y * rig.pivot_height;
    rig.pivot = rig.pivot.lerp(pivot_target, t);

    let mut aim_direction = aim.direction.normalize_or_zero();
    if aim_direction == Vec3::ZERO {
        aim_direction = Vec3::NEG_Z;
    }

    let mut offset = -aim_direction * tuning.distance + Vec3::Y * tuning.height;
    if snapshot.device == InputDevice::Gamepad && move_state.direction.length() > 0.1 {
        offset += move_state.direction.normalize_or_zero() * rig.gamepad_lead;
    }

    let target_position = rig.pivot + offset;
    camera_transform.translation = camera_transform.translation.lerp(target_position, t);

    let look_target = player_transform.translation + Vec3::Y * rig.look_height;
    camera_transform.look_at(look_target, Vec3::Y);
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_camera.in_set(GameplaySet::Camera));
    }
}
