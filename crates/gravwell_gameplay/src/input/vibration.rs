//! Gamepad vibration как tick-driven countdown
//!
//! Пульс хранится в том же resource который его запустил и гасится
//! countdown-системой — никаких отложенных callback'ов с захватом состояния.
//! Host каждый frame читает `motor_levels()` и транслирует в устройство.

use bevy::prelude::*;

use super::raw::RawInputState;

/// Активный вибро-пульс
#[derive(Debug, Clone, Copy)]
pub struct VibrationPulse {
    pub left: f32,
    pub right: f32,
    pub remaining: f32,
}

/// Уровни моторов для host (large + small пары, как у XInput-style pads)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorLevels {
    pub left_large: f32,
    pub right_large: f32,
    pub left_small: f32,
    pub right_small: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Vibration {
    pulse: Option<VibrationPulse>,
}

impl Vibration {
    /// Запросить timed пульс (fire-and-forget)
    ///
    /// Новый запрос перетирает текущий. Интенсивности клампятся в [0, 1].
    pub fn request(&mut self, left: f32, right: f32, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.pulse = Some(VibrationPulse {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
            remaining: duration,
        });
    }

    pub fn is_active(&self) -> bool {
        self.pulse.is_some()
    }

    /// Текущие уровни моторов (нули когда пульса нет)
    pub fn motor_levels(&self) -> MotorLevels {
        match self.pulse {
            Some(pulse) => MotorLevels {
                left_large: pulse.left,
                right_large: pulse.right,
                left_small: pulse.left * 0.5,
                right_small: pulse.right * 0.5,
            },
            None => MotorLevels::default(),
        }
    }

    pub fn tick(&mut self, delta: f32) {
        if let Some(pulse) = self.pulse.as_mut() {
            pulse.remaining -= delta;
            if pulse.remaining <= 0.0 {
                self.pulse = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.pulse = None;
    }
}

/// System: countdown пульса, авто-сброс на expiry или disconnect
pub fn tick_vibration(mut vibration: ResMut<Vibration>, raw: Res<RawInputState>, time: Res<Time>) {
    if !raw.gamepad.connected {
        if vibration.is_active() {
            vibration.clear();
        }
        return;
    }
    vibration.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_expires() {
        let mut vibration = Vibration::default();
        vibration.request(0.5, 0.3, 0.2);
        assert!(vibration.is_active());

        let levels = vibration.motor_levels();
        assert_eq!(levels.left_large, 0.5);
        assert_eq!(levels.left_small, 0.25);

        vibration.tick(0.1);
        assert!(vibration.is_active());

        vibration.tick(0.15);
        assert!(!vibration.is_active());
        assert_eq!(vibration.motor_levels(), MotorLevels::default());
    }

    #[test]
    fn test_intensity_clamped() {
        let mut vibration = Vibration::default();
        vibration.request(2.0, -1.0, 0.1);

        let levels = vibration.motor_levels();
        assert_eq!(levels.left_large, 1.0);
        assert_eq!(levels.right_large, 0.0);
    }

    #[test]
    fn test_zero_duration_ignored() {
        let mut vibration = Vibration::default();
        vibration.request(0.5, 0.5, 0.0);
        assert!(!vibration.is_active());
    }
}
