//! Raw input device state
//!
//! Host bridge читает устройства (клавиатура/мышь/gamepad) и каждый frame
//! переливает состояние сюда. Core только читает — lifecycle устройств
//! полностью на стороне host.
//!
//! Flow:
//! 1. Bridge вызывает `begin_frame()` (сброс edge-state)
//! 2. Bridge вызывает `press_key`/`release_key`/`set_left_stick`/...
//! 3. ECS системы (arbiter, snapshot) читают resource в этом же тике

use bevy::prelude::*;
use std::collections::HashSet;

/// Клавиши которые биндит gameplay (не полный scancode-набор)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Key {
    W,
    A,
    S,
    D,
    I,
    J,
    K,
    L,
    R,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MouseButton {
    Left,
    Right,
}

/// Кнопки gamepad в позиционной нотации (South = A на Xbox, Cross на PS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PadButton {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
}

/// Состояние gamepad (один активный pad, как в оригинальной схеме управления)
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    pub connected: bool,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    held: HashSet<PadButton>,
    just_pressed: HashSet<PadButton>,
}

impl GamepadState {
    pub fn button(&self, button: PadButton) -> bool {
        self.held.contains(&button)
    }

    pub fn button_down(&self, button: PadButton) -> bool {
        self.just_pressed.contains(&button)
    }

    pub fn any_button_held(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn press(&mut self, button: PadButton) {
        if self.held.insert(button) {
            self.just_pressed.insert(button);
        }
    }

    pub fn release(&mut self, button: PadButton) {
        self.held.remove(&button);
    }
}

/// Per-frame снимок сырых устройств, заполняется host bridge (или тестами)
#[derive(Resource, Debug, Clone, Default)]
pub struct RawInputState {
    keys_held: HashSet<Key>,
    keys_just_pressed: HashSet<Key>,
    mouse_held: HashSet<MouseButton>,
    mouse_just_pressed: HashSet<MouseButton>,
    /// Сдвиг курсора за frame (экранные единицы)
    pub mouse_delta: Vec2,
    /// Точка пересечения mouse ray с ground plane (world space).
    /// Проекция луча — engine boundary, поэтому host передаёт готовую точку.
    pub cursor_ground_point: Option<Vec3>,
    pub gamepad: GamepadState,
}

impl RawInputState {
    /// Сброс edge-state перед заполнением нового frame
    ///
    /// Held-состояние переживает frame (host шлёт press/release по событиям),
    /// just-pressed и дельты — нет.
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.mouse_just_pressed.clear();
        self.gamepad.just_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.cursor_ground_point = None;
    }

    pub fn key(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    pub fn any_key_down(&self) -> bool {
        !self.keys_just_pressed.is_empty()
    }

    pub fn mouse_button(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_just_pressed.contains(&button)
    }

    pub fn any_mouse_button_down(&self) -> bool {
        !self.mouse_just_pressed.is_empty()
    }

    pub fn press_key(&mut self, key: Key) {
        if self.keys_held.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: Key) {
        self.keys_held.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        if self.mouse_held.insert(button) {
            self.mouse_just_pressed.insert(button);
        }
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_held.remove(&button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_edge_state() {
        let mut raw = RawInputState::default();

        raw.press_key(Key::W);
        assert!(raw.key(Key::W));
        assert!(raw.key_down(Key::W));

        // Повторный press held-клавиши не взводит just-pressed заново
        raw.begin_frame();
        raw.press_key(Key::W);
        assert!(raw.key(Key::W));
        assert!(!raw.key_down(Key::W));

        raw.release_key(Key::W);
        assert!(!raw.key(Key::W));
    }

    #[test]
    fn test_begin_frame_clears_deltas() {
        let mut raw = RawInputState::default();
        raw.mouse_delta = Vec2::new(3.0, 1.0);
        raw.cursor_ground_point = Some(Vec3::ONE);
        raw.gamepad.press(PadButton::South);

        raw.begin_frame();
        assert_eq!(raw.mouse_delta, Vec2::ZERO);
        assert!(raw.cursor_ground_point.is_none());
        assert!(!raw.gamepad.button_down(PadButton::South));
        // Held переживает frame
        assert!(raw.gamepad.button(PadButton::South));
    }
}
