//! Per-frame InputSnapshot
//!
//! Единственная точка где сырой ввод превращается в gameplay-команды.
//! Snapshot пересобирается первым в Update цепочке — все остальные системы
//! (aim, combat, camera) читают его read-only в этом же тике.

use bevy::prelude::*;

use super::arbiter::{DeviceArbiter, InputDevice, InputSettings};
use super::raw::{Key, MouseButton, PadButton, RawInputState};
use crate::components::Player;

/// Нормализованный снимок ввода за frame
///
/// Биндинги (зеркалят оригинальную схему управления):
/// - fire: LMB / Space / правый триггер / RB / South
/// - reload: R / North
/// - dash: Shift / LB / West
/// - jump: Space / South
#[derive(Resource, Debug, Clone, Default)]
pub struct InputSnapshot {
    pub move_axis: Vec2,
    pub aim_axis: Vec2,
    pub jump_pressed: bool,
    pub dash_pressed: bool,
    /// Held (для automatic fire)
    pub fire_pressed: bool,
    /// Edge (для semi-auto и empty-magazine reload trigger)
    pub fire_just_pressed: bool,
    pub reload_pressed: bool,
    pub device: InputDevice,
    /// Точка прицеливания на ground plane (KM aiming), от host
    pub cursor_ground_point: Option<Vec3>,
}

/// Intent: персонаж хочет прыгнуть (потребляется в FixedUpdate)
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

/// Intent: персонаж хочет dash (потребляется в FixedUpdate)
///
/// Направление НЕ переносим в event: dash стартует от текущего
/// move direction в момент потребления intent.
#[derive(Event, Debug, Clone)]
pub struct DashIntent {
    pub entity: Entity,
}

/// System: device arbitration (первая в Update цепочке)
pub fn arbitrate_device(
    mut arbiter: ResMut<DeviceArbiter>,
    raw: Res<RawInputState>,
    settings: Res<InputSettings>,
) {
    arbiter.update_device(&raw, &settings);
}

/// System: собрать InputSnapshot + emit jump/dash intents
pub fn sample_input(
    mut arbiter: ResMut<DeviceArbiter>,
    raw: Res<RawInputState>,
    settings: Res<InputSettings>,
    time: Res<Time>,
    mut snapshot: ResMut<InputSnapshot>,
    mut jump_events: EventWriter<JumpIntent>,
    mut dash_events: EventWriter<DashIntent>,
    players: Query<Entity, With<Player>>,
) {
    let delta = time.delta_secs();
    let pad = &raw.gamepad;

    let fire_pressed = raw.mouse_button(MouseButton::Left)
        || raw.key(Key::Space)
        || (pad.connected && pad.right_trigger > 0.5)
        || pad.button(PadButton::RightShoulder)
        || pad.button(PadButton::South);

    let fire_just_pressed = raw.mouse_button_down(MouseButton::Left)
        || raw.key_down(Key::Space)
        || pad.button_down(PadButton::RightShoulder)
        || pad.button_down(PadButton::South);

    let reload_pressed = raw.key(Key::R) || pad.button(PadButton::North);

    let dash_pressed =
        raw.key_down(Key::Shift) || pad.button_down(PadButton::LeftShoulder) || pad.button_down(PadButton::West);

    let jump_pressed = raw.key_down(Key::Space) || pad.button_down(PadButton::South);

    *snapshot = InputSnapshot {
        move_axis: arbiter.movement(&raw, &settings),
        aim_axis: arbiter.smoothed_aiming(&raw, &settings, delta),
        jump_pressed,
        dash_pressed,
        fire_pressed,
        fire_just_pressed,
        reload_pressed,
        device: arbiter.active,
        cursor_ground_point: raw.cursor_ground_point,
    };

    // Intents для FixedUpdate систем (guard: нет player entity → нет intents)
    let Ok(player) = players.single() else {
        return;
    };
    if jump_pressed {
        jump_events.write(JumpIntent { entity: player });
    }
    if dash_pressed {
        dash_events.write(DashIntent { entity: player });
    }
}
