//! Combat системы (Update: решения, FixedUpdate только интеграция пуль)
//!
//! Порядок в Update цепочке:
//! 1. tick_weapon_timers — cooldown + reload countdown (+completion)
//! 2. player_reload — явный запрос R / fire по пустому магазину
//! 3. player_fire — гейтинг и spawn projectile
//!
//! Все отказы (пустой магазин, cooldown, reload) — тихие no-op.

use bevy::prelude::*;

use super::aim_assist::AimState;
use super::damage::Dead;
use super::projectile::spawn_projectile;
use super::weapon::{FireResult, ReloadResult, Weapon};
use crate::components::Player;
use crate::input::{InputDevice, InputSnapshot, Vibration};
use crate::logger;

/// Event: выстрел произведён (host: muzzle flash, звук)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub muzzle: usize,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Event: перезарядка началась (host: звук, анимация)
#[derive(Event, Debug, Clone)]
pub struct ReloadStarted {
    pub entity: Entity,
}

/// Event: перезарядка завершена
#[derive(Event, Debug, Clone)]
pub struct ReloadCompleted {
    pub entity: Entity,
    /// Сколько патронов перенесено из запаса
    pub loaded: u32,
}

/// System: countdown таймеров оружия
pub fn tick_weapon_timers(
    time: Res<Time>,
    mut weapons: Query<(Entity, &mut Weapon)>,
    mut completed_events: EventWriter<ReloadCompleted>,
) {
    let delta = time.delta_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        if let Some(loaded) = weapon.tick(delta) {
            completed_events.write(ReloadCompleted { entity, loaded });
            logger::log_info(&format!(
                "Reloaded! Magazine: {}/{}, Reserve: {}",
                weapon.magazine, weapon.magazine_size, weapon.reserve_ammo
            ));
        }
    }
}

/// System: запрос перезарядки
///
/// Триггеры: кнопка reload, либо нажатие fire на пустом магазине при
/// непустом запасе.
pub fn player_reload(
    snapshot: Res<InputSnapshot>,
    mut players: Query<(Entity, &mut Weapon), (With<Player>, Without<Dead>)>,
    mut started_events: EventWriter<ReloadStarted>,
    mut vibration: ResMut<Vibration>,
) {
    for (entity, mut weapon) in players.iter_mut() {
        let empty_mag_fire =
            snapshot.fire_just_pressed && weapon.magazine == 0 && weapon.reserve_ammo > 0;
        if !snapshot.reload_pressed && !empty_mag_fire {
            continue;
        }

        if weapon.try_reload() == ReloadResult::Started {
            started_events.write(ReloadStarted { entity });
            if snapshot.device == InputDevice::Gamepad {
                vibration.request(0.2, 0.1, 0.3);
            }
        }
    }
}

/// System: гейтинг выстрела + spawn projectile
pub fn player_fire(
    mut commands: Commands,
    snapshot: Res<InputSnapshot>,
    mut players: Query<(Entity, &Transform, &AimState, &mut Weapon), (With<Player>, Without<Dead>)>,
    mut fired_events: EventWriter<WeaponFired>,
    mut started_events: EventWriter<ReloadStarted>,
    mut vibration: ResMut<Vibration>,
) {
    for (entity, transform, aim, mut weapon) in players.iter_mut() {
        let trigger = if weapon.automatic {
            snapshot.fire_pressed
        } else {
            snapshot.fire_just_pressed
        };
        if !trigger {
            continue;
        }

        let FireResult::Fired { muzzle } = weapon.try_fire() else {
            continue; // OnCooldown / Empty / Reloading — тихий no-op
        };

        // Guard: оружие без muzzle points стрелять визуально не может
        let Some(&muzzle_offset) = weapon.muzzles.get(muzzle) else {
            continue;
        };
        let origin = transform.transform_point(muzzle_offset);
        let direction = aim.direction;

        spawn_projectile(&mut commands, entity, origin, direction, &weapon);
        fired_events.write(WeaponFired {
            shooter: entity,
            muzzle,
            origin,
            direction,
        });

        if snapshot.device == InputDevice::Gamepad {
            vibration.request(0.2, 0.4, 0.1);
        }

        // Магазин опустел → авто-reload если есть запас
        if weapon.magazine == 0
            && weapon.reserve_ammo > 0
            && weapon.try_reload() == ReloadResult::Started
        {
            started_events.write(ReloadStarted { entity });
        }
    }
}
