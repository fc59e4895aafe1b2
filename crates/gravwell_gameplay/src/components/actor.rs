//! Базовые компоненты живых существ: Health, Invincibility, Hostile

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Invincibility frames после полученного урона
///
/// Пока `remaining > 0` входящий урон игнорируется. Любой урон > 0 заново
/// взводит окно. Таймер тикает в FixedUpdate вместе с damage application.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Invincibility {
    /// Длительность окна (секунды)
    pub window: f32,
    /// Оставшееся время текущего окна (0 = уязвим)
    pub remaining: f32,
}

impl Default for Invincibility {
    fn default() -> Self {
        Self {
            window: 0.5,
            remaining: 0.0,
        }
    }
}

impl Invincibility {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn arm(&mut self) {
        self.remaining = self.window;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }
}

/// Marker: враждебный актор (кандидат для aim assist и projectile hits)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Invincibility)]
pub struct Hostile;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);
        assert_eq!(health.current, 100);

        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(100); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100);
        health.take_damage(50);

        health.heal(30);
        assert_eq!(health.current, 80);

        health.heal(100); // Clamped to max
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_invincibility_window() {
        let mut inv = Invincibility::default();
        assert!(!inv.is_active());

        inv.arm();
        assert!(inv.is_active());

        inv.tick(0.3);
        assert!(inv.is_active());

        inv.tick(0.3);
        assert!(!inv.is_active());
        assert_eq!(inv.remaining, 0.0);
    }
}
