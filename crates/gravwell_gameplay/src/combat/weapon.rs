//! Weapon: ammo/magazine state machine + fire-rate gating
//!
//! ECS владеет всем состоянием оружия (magazine, reserve, cooldown, reload
//! countdown). Host получает только события (WeaponFired, ReloadStarted/
//! Completed) для VFX/audio.
//!
//! Инварианты:
//! - 0 ≤ magazine ≤ magazine_size
//! - reloading ⟺ reload_timer > 0
//! - Никакого частичного reload: перенос патронов происходит один раз,
//!   в момент завершения countdown

use bevy::prelude::*;

/// Исход попытки выстрела
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireResult {
    /// Выстрел произведён из muzzle с данным индексом
    Fired { muzzle: usize },
    /// Fire-rate interval ещё не истёк
    OnCooldown,
    /// Магазин пуст
    Empty,
    /// Идёт перезарядка
    Reloading,
}

/// Исход попытки перезарядки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadResult {
    Started,
    AlreadyReloading,
    /// Магазин полон
    NoAmmoNeeded,
    /// Запас пуст
    NoReserve,
}

/// Оружие персонажа
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    /// Урон одного projectile
    pub damage: u32,
    /// Скорость projectile (m/s)
    pub projectile_speed: f32,
    /// Lifetime projectile до self-despawn (секунды)
    pub projectile_lifetime: f32,
    /// Минимальный интервал между выстрелами (секунды)
    pub fire_interval: f32,
    /// Текущий cooldown (0 = готов)
    pub cooldown_timer: f32,
    /// Held-to-fire вместо per-click
    pub automatic: bool,
    /// Ёмкость магазина
    pub magazine_size: u32,
    /// Патроны в магазине
    pub magazine: u32,
    /// Запас (переносится в магазин при reload)
    pub reserve_ammo: u32,
    /// Длительность перезарядки (секунды)
    pub reload_time: f32,
    /// Оставшийся countdown перезарядки
    pub reload_timer: f32,
    pub reloading: bool,
    /// Локальные offsets точек выстрела (round-robin)
    pub muzzles: Vec<Vec3>,
    /// Индекс следующего muzzle
    pub next_muzzle: usize,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::sidearm()
    }
}

impl Weapon {
    /// Табельный автоматический пистолет
    pub fn sidearm() -> Self {
        Self {
            damage: 10,
            projectile_speed: 30.0,
            projectile_lifetime: 3.0,
            fire_interval: 0.15,
            cooldown_timer: 0.0,
            automatic: true,
            magazine_size: 10,
            magazine: 10,
            reserve_ammo: 30,
            reload_time: 1.5,
            reload_timer: 0.0,
            reloading: false,
            muzzles: vec![Vec3::new(0.0, 1.4, -0.6)],
            next_muzzle: 0,
        }
    }

    /// Перекроить боезапас (spawn-time tuning)
    pub fn with_ammo(mut self, magazine_size: u32, reserve: u32) -> Self {
        self.magazine_size = magazine_size;
        self.magazine = magazine_size;
        self.reserve_ammo = reserve;
        self
    }

    pub fn can_fire(&self) -> bool {
        !self.reloading && self.magazine > 0 && self.cooldown_timer <= 0.0
    }

    /// Попытка выстрела
    ///
    /// Успех: magazine − 1, старт cooldown, round-robin сдвиг muzzle.
    /// Любой отказ оставляет состояние нетронутым.
    pub fn try_fire(&mut self) -> FireResult {
        if self.reloading {
            return FireResult::Reloading;
        }
        if self.magazine == 0 {
            return FireResult::Empty;
        }
        if self.cooldown_timer > 0.0 {
            return FireResult::OnCooldown;
        }

        self.magazine -= 1;
        self.cooldown_timer = self.fire_interval;

        let muzzle = self.next_muzzle;
        self.next_muzzle = (self.next_muzzle + 1) % self.muzzles.len().max(1);

        FireResult::Fired { muzzle }
    }

    /// Попытка начать перезарядку
    pub fn try_reload(&mut self) -> ReloadResult {
        if self.reloading {
            return ReloadResult::AlreadyReloading;
        }
        if self.magazine >= self.magazine_size {
            return ReloadResult::NoAmmoNeeded;
        }
        if self.reserve_ammo == 0 {
            return ReloadResult::NoReserve;
        }

        self.reloading = true;
        self.reload_timer = self.reload_time;
        ReloadResult::Started
    }

    /// Завершение перезарядки: перенос min(нужно, запас) за один раз
    pub fn complete_reload(&mut self) -> u32 {
        let needed = self.magazine_size - self.magazine;
        let loaded = needed.min(self.reserve_ammo);

        self.magazine += loaded;
        self.reserve_ammo -= loaded;
        self.reloading = false;
        self.reload_timer = 0.0;

        loaded
    }

    /// Per-tick countdown: cooldown + reload
    ///
    /// Возвращает Some(loaded) когда reload завершился в этом тике.
    pub fn tick(&mut self, delta: f32) -> Option<u32> {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }

        if self.reloading {
            self.reload_timer -= delta;
            if self.reload_timer <= 0.0 {
                return Some(self.complete_reload());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_decrements_magazine() {
        let mut weapon = Weapon::sidearm();
        assert_eq!(weapon.magazine, 10);

        assert_eq!(weapon.try_fire(), FireResult::Fired { muzzle: 0 });
        assert_eq!(weapon.magazine, 9);
    }

    #[test]
    fn test_fire_on_cooldown() {
        let mut weapon = Weapon::sidearm();
        assert!(matches!(weapon.try_fire(), FireResult::Fired { .. }));

        // Interval не истёк — отказ без изменения состояния
        assert_eq!(weapon.try_fire(), FireResult::OnCooldown);
        assert_eq!(weapon.magazine, 9);

        weapon.tick(weapon.fire_interval);
        assert!(matches!(weapon.try_fire(), FireResult::Fired { .. }));
        assert_eq!(weapon.magazine, 8);
    }

    #[test]
    fn test_fire_empty_magazine_unchanged() {
        let mut weapon = Weapon::sidearm().with_ammo(0, 30);
        let before = weapon.clone();

        assert_eq!(weapon.try_fire(), FireResult::Empty);
        assert_eq!(weapon.magazine, before.magazine);
        assert_eq!(weapon.reserve_ammo, before.reserve_ammo);
        assert_eq!(weapon.cooldown_timer, before.cooldown_timer);
    }

    #[test]
    fn test_fire_while_reloading() {
        let mut weapon = Weapon::sidearm();
        weapon.magazine = 3;
        assert_eq!(weapon.try_reload(), ReloadResult::Started);
        assert_eq!(weapon.try_fire(), FireResult::Reloading);
        assert_eq!(weapon.magazine, 3);
    }

    #[test]
    fn test_muzzle_round_robin() {
        let mut weapon = Weapon::sidearm();
        weapon.muzzles = vec![Vec3::X, Vec3::Y, Vec3::Z];

        for expected in [0usize, 1, 2, 0, 1] {
            weapon.cooldown_timer = 0.0;
            assert_eq!(weapon.try_fire(), FireResult::Fired { muzzle: expected });
        }
    }

    #[test]
    fn test_reload_guards() {
        let mut weapon = Weapon::sidearm();

        // Полный магазин → перезарядка не нужна
        assert_eq!(weapon.try_reload(), ReloadResult::NoAmmoNeeded);

        // Нет запаса
        weapon.magazine = 2;
        weapon.reserve_ammo = 0;
        assert_eq!(weapon.try_reload(), ReloadResult::NoReserve);

        weapon.reserve_ammo = 30;
        assert_eq!(weapon.try_reload(), ReloadResult::Started);
        assert_eq!(weapon.try_reload(), ReloadResult::AlreadyReloading);
    }

    #[test]
    fn test_reload_invariants() {
        let mut weapon = Weapon::sidearm().with_ammo(10, 20);
        weapon.magazine = 0;

        assert_eq!(weapon.try_reload(), ReloadResult::Started);
        assert!(weapon.reloading);
        assert!(weapon.reload_timer > 0.0);

        // Mid-countdown: patrons ещё не перенесены
        weapon.tick(0.5);
        assert_eq!(weapon.magazine, 0);
        assert_eq!(weapon.reserve_ammo, 20);
        assert!(weapon.reloading && weapon.reload_timer > 0.0);

        // Завершение: перенос ровно min(capacity − magazine, reserve)
        let loaded = weapon.tick(1.1);
        assert_eq!(loaded, Some(10));
        assert_eq!(weapon.magazine, 10);
        assert_eq!(weapon.reserve_ammo, 10);
        assert!(!weapon.reloading);
        assert_eq!(weapon.reload_timer, 0.0);
    }

    #[test]
    fn test_reload_partial_reserve() {
        let mut weapon = Weapon::sidearm().with_ammo(10, 4);
        weapon.magazine = 2;
        weapon.reserve_ammo = 4;

        assert_eq!(weapon.try_reload(), ReloadResult::Started);
        let loaded = weapon.tick(weapon.reload_time + 0.01);
        assert_eq!(loaded, Some(4));
        assert_eq!(weapon.magazine, 6);
        assert_eq!(weapon.reserve_ammo, 0);
    }

    #[test]
    fn test_magazine_never_exceeds_capacity() {
        let mut weapon = Weapon::sidearm().with_ammo(10, 100);
        weapon.magazine = 7;

        weapon.try_reload();
        weapon.tick(weapon.reload_time + 0.01);
        assert_eq!(weapon.magazine, weapon.magazine_size);
        assert_eq!(weapon.reserve_ammo, 97);
    }
}
