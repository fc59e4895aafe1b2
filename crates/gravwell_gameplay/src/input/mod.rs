//! Input слой: raw device state → device arbitration → InputSnapshot
//!
//! Порядок внутри Update тика:
//! 1. arbitrate_device — sticky выбор активного девайса
//! 2. sample_input — сборка InputSnapshot + jump/dash intents
//! 3. tick_vibration — countdown вибро-пульса
//!
//! Все downstream системы (aim, combat, camera) видят snapshot этого же тика.

use bevy::prelude::*;

pub mod arbiter;
pub mod raw;
pub mod snapshot;
pub mod vibration;

pub use arbiter::{apply_circular_deadzone, DeviceArbiter, InputDevice, InputSettings};
pub use raw::{GamepadState, Key, MouseButton, PadButton, RawInputState};
pub use snapshot::{DashIntent, InputSnapshot, JumpIntent};
pub use vibration::{MotorLevels, Vibration, VibrationPulse};

use crate::GameplaySet;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RawInputState>()
            .init_resource::<InputSettings>()
            .init_resource::<DeviceArbiter>()
            .init_resource::<InputSnapshot>()
            .init_resource::<Vibration>()
            .add_event::<JumpIntent>()
            .add_event::<DashIntent>()
            .add_systems(
                Update,
                (
                    snapshot::arbitrate_device,
                    snapshot::sample_input,
                    vibration::tick_vibration,
                )
                    .chain()
                    .in_set(GameplaySet::Input),
            );
    }
}
