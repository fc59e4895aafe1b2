//! Device arbitration: какой девайс "активен" и как из него достать axes
//!
//! Архитектура:
//! - Sticky selection: девайс меняется только при активности другого девайса
//! - Gamepad активность: stick magnitude/trigger выше deadzone или held кнопка
//! - KM активность: just-pressed клавиша/кнопка или сдвиг мыши
//! - Disconnect активного gamepad → принудительно KeyboardMouse
//!
//! Arbiter — обычный Resource с явным lifecycle (вставляется плагином),
//! никакого process-wide static состояния.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::raw::{Key, RawInputState};

/// Активный input девайс
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum InputDevice {
    #[default]
    KeyboardMouse,
    Gamepad,
}

/// Tuning входного слоя (plain data, host может грузить из файла)
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputSettings {
    /// Deadzone для стиков (circular)
    pub stick_deadzone: f32,
    /// Deadzone для триггеров
    pub trigger_deadzone: f32,
    /// Минимальный сдвиг мыши который считается активностью
    pub mouse_motion_threshold: f32,
    /// Smoothing factor для movement axis
    pub move_smoothing: f32,
    /// Smoothing factor для aim axis
    pub aim_smoothing: f32,
    /// Множитель движения на gamepad
    pub gamepad_move_sensitivity: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            stick_deadzone: 0.2,
            trigger_deadzone: 0.1,
            mouse_motion_threshold: 0.01,
            move_smoothing: 0.1,
            aim_smoothing: 0.2,
            gamepad_move_sensitivity: 1.5,
        }
    }
}

/// Circular deadzone remap
///
/// |v| < deadzone → ноль; иначе направление сохраняется, магнитуда линейно
/// перетягивается из [deadzone, 1] в [0, 1] (кламп сверху — диагональ
/// клавиатуры даёт |v| = √2).
pub fn apply_circular_deadzone(input: Vec2, deadzone: f32) -> Vec2 {
    let magnitude = input.length();
    if magnitude < deadzone {
        return Vec2::ZERO;
    }

    let normalized = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    input / magnitude * normalized
}

fn keyboard_axis(raw: &RawInputState, positive: [Key; 2], negative: [Key; 2]) -> f32 {
    let mut value = 0.0;
    if positive.iter().any(|&k| raw.key(k)) {
        value += 1.0;
    }
    if negative.iter().any(|&k| raw.key(k)) {
        value -= 1.0;
    }
    value
}

/// WASD + стрелки
pub fn keyboard_move_axes(raw: &RawInputState) -> Vec2 {
    Vec2::new(
        keyboard_axis(raw, [Key::D, Key::ArrowRight], [Key::A, Key::ArrowLeft]),
        keyboard_axis(raw, [Key::W, Key::ArrowUp], [Key::S, Key::ArrowDown]),
    )
}

/// IJKL (прицеливание с клавиатуры, fallback когда нет мыши/стика)
pub fn keyboard_aim_axes(raw: &RawInputState) -> Vec2 {
    Vec2::new(
        keyboard_axis(raw, [Key::L, Key::ArrowRight], [Key::J, Key::ArrowLeft]),
        keyboard_axis(raw, [Key::I, Key::ArrowUp], [Key::K, Key::ArrowDown]),
    )
}

/// Sticky device selection + производные axes
#[derive(Resource, Debug, Clone, Default)]
pub struct DeviceArbiter {
    pub active: InputDevice,
    gamepad_was_connected: bool,
    smoothed_aim: Vec2,
}

impl DeviceArbiter {
    /// Per-frame device detection
    ///
    /// Порядок важен: сначала disconnect-check (форс-переключение), потом
    /// активность. Gamepad при одновременной активности выигрывает.
    pub fn update_device(&mut self, raw: &RawInputState, settings: &InputSettings) {
        if self.gamepad_was_connected && !raw.gamepad.connected {
            if self.active == InputDevice::Gamepad {
                self.active = InputDevice::KeyboardMouse;
            }
        }
        self.gamepad_was_connected = raw.gamepad.connected;

        let gamepad_active = raw.gamepad.connected
            && (raw.gamepad.left_stick.length() > settings.stick_deadzone
                || raw.gamepad.right_stick.length() > settings.stick_deadzone
                || raw.gamepad.left_trigger > settings.trigger_deadzone
                || raw.gamepad.right_trigger > settings.trigger_deadzone
                || raw.gamepad.any_button_held());

        let keyboard_mouse_active = raw.any_key_down()
            || raw.any_mouse_button_down()
            || raw.mouse_delta.length() > settings.mouse_motion_threshold;

        if gamepad_active {
            self.active = InputDevice::Gamepad;
        } else if keyboard_mouse_active {
            self.active = InputDevice::KeyboardMouse;
        }
        // Ни один девайс не активен → selection sticky (без изменений)
    }

    /// Movement axis после deadzone remap
    pub fn movement(&self, raw: &RawInputState, settings: &InputSettings) -> Vec2 {
        let movement = match self.active {
            InputDevice::KeyboardMouse => keyboard_move_axes(raw),
            InputDevice::Gamepad => {
                let stick = raw.gamepad.left_stick;
                // Fallback на клавиатуру когда стик в deadzone
                if stick.length() < settings.stick_deadzone {
                    keyboard_move_axes(raw)
                } else {
                    stick
                }
            }
        };

        apply_circular_deadzone(movement, settings.stick_deadzone)
    }

    /// Aim axis после deadzone remap
    ///
    /// Mouse-прицеливание идёт через cursor_ground_point (downstream), поэтому
    /// для KM здесь только IJKL fallback. Gamepad: правый стик, fallback на
    /// направление движения.
    pub fn aiming(&self, raw: &RawInputState, settings: &InputSettings) -> Vec2 {
        let mut aiming = match self.active {
            InputDevice::KeyboardMouse => Vec2::ZERO,
            InputDevice::Gamepad => {
                let stick = raw.gamepad.right_stick;
                if stick.length() < settings.stick_deadzone {
                    let movement = self.movement(raw, settings);
                    movement.normalize_or_zero()
                } else {
                    stick
                }
            }
        };

        if aiming.length() < settings.stick_deadzone {
            aiming = keyboard_aim_axes(raw);
        }

        apply_circular_deadzone(aiming, settings.stick_deadzone)
    }

    /// Aim axis через lerp-кэш: тянется к сырому вводу, без ввода затухает
    pub fn smoothed_aiming(
        &mut self,
        raw: &RawInputState,
        settings: &InputSettings,
        delta: f32,
    ) -> Vec2 {
        let raw_aim = self.aiming(raw, settings);

        if raw_aim.length() > settings.stick_deadzone {
            let t = (settings.aim_smoothing * delta * 10.0).clamp(0.0, 1.0);
            self.smoothed_aim = self.smoothed_aim.lerp(raw_aim, t);
        } else {
            let t = (settings.aim_smoothing * delta * 5.0).clamp(0.0, 1.0);
            self.smoothed_aim = self.smoothed_aim.lerp(Vec2::ZERO, t);
        }

        self.smoothed_aim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::raw::PadButton;

    const DZ: f32 = 0.2;

    #[test]
    fn test_deadzone_below_is_zero() {
        for magnitude in [0.0, 0.05, 0.1, 0.19, 0.199] {
            let input = Vec2::new(magnitude, 0.0);
            assert_eq!(apply_circular_deadzone(input, DZ), Vec2::ZERO);
        }
    }

    #[test]
    fn test_deadzone_remap_magnitude() {
        // m ≥ dz → |out| = (m - dz) / (1 - dz)
        let input = Vec2::new(0.6, 0.0);
        let out = apply_circular_deadzone(input, DZ);
        let expected = (0.6 - DZ) / (1.0 - DZ);
        assert!((out.length() - expected).abs() < 1e-6);

        // На границе ровно ноль
        let edge = apply_circular_deadzone(Vec2::new(DZ, 0.0), DZ);
        assert!(edge.length() < 1e-6);

        // Полное отклонение → единица
        let full = apply_circular_deadzone(Vec2::new(1.0, 0.0), DZ);
        assert!((full.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_deadzone_preserves_direction_and_clamps() {
        let input = Vec2::new(1.0, 1.0); // диагональ клавиатуры, |v| = √2
        let out = apply_circular_deadzone(input, DZ);

        assert!((out.length() - 1.0).abs() < 1e-6, "clamped to 1");
        let dir_in = input.normalize();
        let dir_out = out.normalize();
        assert!((dir_in - dir_out).length() < 1e-6, "direction preserved");
    }

    #[test]
    fn test_device_sticky_without_activity() {
        let mut arbiter = DeviceArbiter::default();
        let settings = InputSettings::default();
        let raw = RawInputState::default();

        assert_eq!(arbiter.active, InputDevice::KeyboardMouse);

        // N тихих frames — девайс не меняется
        for _ in 0..60 {
            arbiter.update_device(&raw, &settings);
        }
        assert_eq!(arbiter.active, InputDevice::KeyboardMouse);
    }

    #[test]
    fn test_gamepad_activity_switches_device() {
        let mut arbiter = DeviceArbiter::default();
        let settings = InputSettings::default();
        let mut raw = RawInputState::default();

        raw.gamepad.connected = true;
        raw.gamepad.left_stick = Vec2::new(0.8, 0.0);
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::Gamepad);

        // Стик отпущен → selection sticky
        raw.gamepad.left_stick = Vec2::ZERO;
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::Gamepad);

        // Активность мыши → обратно на KM
        raw.mouse_delta = Vec2::new(5.0, 0.0);
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::KeyboardMouse);
    }

    #[test]
    fn test_disconnect_forces_keyboard_mouse() {
        let mut arbiter = DeviceArbiter::default();
        let settings = InputSettings::default();
        let mut raw = RawInputState::default();

        raw.gamepad.connected = true;
        raw.gamepad.press(PadButton::South);
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::Gamepad);

        raw.gamepad.release(PadButton::South);
        raw.gamepad.connected = false;
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::KeyboardMouse);
    }

    #[test]
    fn test_gamepad_movement_keyboard_fallback() {
        let mut arbiter = DeviceArbiter::default();
        let settings = InputSettings::default();
        let mut raw = RawInputState::default();

        raw.gamepad.connected = true;
        raw.gamepad.press(PadButton::South);
        arbiter.update_device(&raw, &settings);
        assert_eq!(arbiter.active, InputDevice::Gamepad);

        // Стик в deadzone, но W зажата → движение с клавиатуры
        raw.press_key(Key::W);
        let movement = arbiter.movement(&raw, &settings);
        assert!(movement.y > 0.9);
    }
}
