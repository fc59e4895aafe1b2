//! Dash: timed override движения
//!
//! Пока dash активен, displacement фиксирован (direction × speed), steering
//! игнорируется. После expiry — cooldown; повторный запуск во время
//! cooldown отклоняется (no-op), не ставится в очередь.

use bevy::prelude::*;

/// Dash state персонажа. Таймеры тикают в FixedUpdate.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DashState {
    /// Скорость dash (m/s)
    pub speed: f32,
    /// Длительность dash (секунды)
    pub duration: f32,
    /// Cooldown после dash (секунды)
    pub cooldown: f32,
    /// Направление текущего dash (unit, horizontal)
    pub direction: Vec3,
    /// Оставшееся время активного dash
    pub remaining: f32,
    /// Оставшийся cooldown
    pub cooldown_remaining: f32,
    dashing: bool,
}

impl Default for DashState {
    fn default() -> Self {
        Self {
            speed: 15.0,
            duration: 0.2,
            cooldown: 1.0,
            direction: Vec3::ZERO,
            remaining: 0.0,
            cooldown_remaining: 0.0,
            dashing: false,
        }
    }
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn can_start(&self) -> bool {
        !self.dashing && self.cooldown_remaining <= 0.0
    }

    /// Стартовать dash в направлении движения
    ///
    /// Отклоняется (false) если dash уже активен, cooldown не истёк, или
    /// направление вырождено (стоячий персонаж не dash'ится).
    pub fn try_start(&mut self, direction: Vec3) -> bool {
        if !self.can_start() || direction.length() < 0.1 {
            return false;
        }
        self.dashing = true;
        self.remaining = self.duration;
        self.direction = direction.normalize();
        true
    }

    /// Per-tick countdown: активный dash → expiry → cooldown
    pub fn tick(&mut self, delta: f32) {
        if self.dashing {
            self.remaining -= delta;
            if self.remaining <= 0.0 {
                self.dashing = false;
                self.remaining = 0.0;
                self.cooldown_remaining = self.cooldown;
            }
        } else if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - delta).max(0.0);
        }
    }
}
