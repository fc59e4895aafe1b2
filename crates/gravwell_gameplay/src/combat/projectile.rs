//! Projectiles
//!
//! Kinematic пули: custom интеграция в FixedUpdate, lifetime countdown,
//! overlap-детекция попаданий (sphere check; host physics backend может
//! заменить её своими collision-enter событиями через те же ProjectileHit).

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision;
use super::weapon::Weapon;
use crate::components::Health;

/// Радиус засчитывания попадания (метры)
const HIT_RADIUS: f32 = 0.6;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    /// Кто выстрелил (self-hit фильтруется)
    pub owner: Entity,
    pub damage: u32,
    /// Скорость (m/s)
    pub speed: f32,
    /// Направление полёта (unit)
    pub direction: Vec3,
    /// Оставшееся время жизни (секунды)
    pub lifetime: f32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            damage: 10,
            speed: 30.0,
            direction: Vec3::NEG_Z,
            lifetime: 3.0,
        }
    }
}

/// Event: projectile попал в цель
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub shooter: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Spawn helper: одна пуля из muzzle
pub fn spawn_projectile(
    commands: &mut Commands,
    owner: Entity,
    origin: Vec3,
    direction: Vec3,
    weapon: &Weapon,
) -> Entity {
    let direction = direction.normalize_or_zero();

    commands
        .spawn((
            Projectile {
                owner,
                damage: weapon.damage,
                speed: weapon.projectile_speed,
                direction,
                lifetime: weapon.projectile_lifetime,
            },
            Transform::from_translation(origin).looking_to(direction, Vec3::Y),
            // Rapier sensor (host collision backend)
            RigidBody::KinematicPositionBased,
            Collider::ball(0.1),
            Sensor,
            Velocity::linear(direction * weapon.projectile_speed),
            collision::projectile_groups(),
        ))
        .id()
}

/// System (FixedUpdate): интеграция полёта + lifetime countdown
pub fn integrate_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        transform.translation += projectile.direction * projectile.speed * delta;

        projectile.lifetime -= delta;
        if projectile.lifetime <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// System (FixedUpdate): overlap-детекция попаданий
///
/// Owner пропускается (пуля рождается внутри капсулы стрелка). Пуля
/// despawn'ится на первом попадании.
pub fn detect_projectile_hits(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile, &Transform)>,
    targets: Query<(Entity, &Transform), With<Health>>,
    mut hit_events: EventWriter<ProjectileHit>,
) {
    for (projectile_entity, projectile, projectile_transform) in projectiles.iter() {
        let projectile_pos = projectile_transform.translation;

        for (target_entity, target_transform) in targets.iter() {
            if target_entity == projectile.owner {
                continue;
            }

            // Центр капсулы цели примерно на высоте груди
            let target_pos = target_transform.translation + Vec3::Y * 0.9;
            if projectile_pos.distance(target_pos) < HIT_RADIUS {
                hit_events.write(ProjectileHit {
                    projectile: projectile_entity,
                    shooter: projectile.owner,
                    target: target_entity,
                    damage: projectile.damage,
                });
                commands.entity(projectile_entity).despawn();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_integration_step() {
        let mut projectile = Projectile {
            direction: Vec3::Z,
            speed: 30.0,
            lifetime: 3.0,
            ..default()
        };
        let mut position = Vec3::ZERO;
        let delta = 1.0 / 60.0;

        position += projectile.direction * projectile.speed * delta;
        projectile.lifetime -= delta;

        assert!((position.z - 0.5).abs() < 1e-6);
        assert!(projectile.lifetime < 3.0);
    }

    #[test]
    fn test_hit_radius_check() {
        let projectile_pos = Vec3::new(0.0, 0.9, 0.0);

        let near = Vec3::ZERO + Vec3::Y * 0.9;
        let far = Vec3::new(2.0, 0.9, 0.0);

        assert!(projectile_pos.distance(near) < HIT_RADIUS);
        assert!(projectile_pos.distance(far) > HIT_RADIUS);
    }
}
