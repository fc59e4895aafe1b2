//! Combat подсистема
//!
//! ECS владеет: ammo state machine, fire-rate gating, projectiles, aim
//! assist, damage/invincibility. Host получает события (WeaponFired,
//! ReloadStarted/Completed, DamageDealt) для VFX/audio/UI.

use bevy::prelude::*;

pub mod aim_assist;
pub mod collision;
pub mod damage;
pub mod projectile;
pub mod systems;
pub mod weapon;

// Re-export основных типов
pub use aim_assist::{select_assist_target, AimAssist, AimState};
pub use damage::{DamageDealt, Dead, EntityDied};
pub use projectile::{spawn_projectile, Projectile, ProjectileHit};
pub use systems::{ReloadCompleted, ReloadStarted, WeaponFired};
pub use weapon::{FireResult, ReloadResult, Weapon};

use crate::{FixedSet, GameplaySet};

/// Combat Plugin
///
/// Update (после input): aim → таймеры → reload → fire.
/// FixedUpdate: интеграция пуль → детекция попаданий → урон → смерть.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponFired>()
            .add_event::<ReloadStarted>()
            .add_event::<ReloadCompleted>()
            .add_event::<ProjectileHit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            Update,
            aim_assist::update_player_aim.in_set(GameplaySet::Aim),
        );

        app.add_systems(
            Update,
            (
                systems::tick_weapon_timers,
                systems::player_reload,
                systems::player_fire,
            )
                .chain()
                .in_set(GameplaySet::Combat),
        );

        app.add_systems(
            FixedUpdate,
            (
                projectile::integrate_projectiles,
                projectile::detect_projectile_hits,
            )
                .chain()
                .in_set(FixedSet::Projectiles),
        );

        app.add_systems(
            FixedUpdate,
            (
                damage::tick_invincibility,
                damage::apply_projectile_damage,
                damage::handle_deaths,
            )
                .chain()
                .in_set(FixedSet::Damage),
        );
    }
}
