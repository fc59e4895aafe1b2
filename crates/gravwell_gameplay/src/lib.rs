//! GRAVWELL Gameplay Core
//!
//! Headless ECS-симуляция gameplay слоя (Bevy 0.16): input arbitration,
//! третье-личная камера, projectile combat с reload/ammo, dash movement,
//! gravity source registry.
//!
//! Архитектура:
//! - ECS = gameplay state + rules (этот crate, полностью headless)
//! - Host engine = rendering, физика, анимация, audio, raw devices.
//!   Bridge пишет RawInputState и читает producer-компоненты
//!   (AnimatorParams, Vibration::motor_levels, события combat)
//!
//! Два тика:
//! - Update (variable): input → aim → combat decisions → camera → animator
//! - FixedUpdate (60Hz): movement/projectile интеграция, physics таймеры

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod camera;
pub mod combat;
pub mod components;
pub mod input;
pub mod logger;
pub mod movement;

// Re-export базовых типов для удобства
pub use camera::{spawn_camera_rig, CameraPlugin, CameraRig, CameraTuning};
pub use combat::{
    AimAssist, AimState, CombatPlugin, DamageDealt, Dead, EntityDied, FireResult, Projectile,
    ProjectileHit, ReloadCompleted, ReloadResult, ReloadStarted, Weapon, WeaponFired,
};
pub use components::{
    spawn_hostile, spawn_player, AnimatorParams, Health, Hostile, Invincibility, Player,
};
pub use input::{
    DashIntent, DeviceArbiter, InputDevice, InputPlugin, InputSettings, InputSnapshot, JumpIntent,
    Key, MouseButton, PadButton, RawInputState, Vibration,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger};
pub use movement::{
    CharacterMotor, DashState, GravityField, GravitySource, GravitySourceHandle, MoveState,
    MovementPlugin,
};

/// Порядок Update тика: input всегда сэмплируется до потребителей
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Aim,
    Combat,
    Camera,
    Sink,
}

/// Порядок FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedSet {
    Movement,
    Projectiles,
    Damage,
}

/// Главный plugin (объединяет все подсистемы)
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для movement/projectile интеграции
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Aim,
                    GameplaySet::Combat,
                    GameplaySet::Camera,
                    GameplaySet::Sink,
                )
                    .chain(),
            )
            .configure_sets(
                FixedUpdate,
                (FixedSet::Movement, FixedSet::Projectiles, FixedSet::Damage).chain(),
            )
            .add_plugins((InputPlugin, CombatPlugin, MovementPlugin, CameraPlugin))
            .add_systems(
                Update,
                components::animation::sync_animator_params.in_set(GameplaySet::Sink),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// GameplayPlugin добавляет caller (тесты могут собирать app по частям).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты сериализуются через Debug формат, сортировка по Entity ID.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
