//! Damage application
//!
//! ProjectileHit → Health (с учётом invincibility окна) → DamageDealt /
//! EntityDied. Трупы остаются на месте (Dead marker), движение гасится.

use bevy::prelude::*;

use super::projectile::ProjectileHit;
use crate::components::{Health, Invincibility};
use crate::logger;
use crate::movement::{CharacterMotor, MoveState};

/// Event: урон нанесён (для host UI/VFX)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Event: entity умер (health дошёл до 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Marker: entity мёртв. Despawn не автоматический.
#[derive(Component, Debug)]
pub struct Dead;

/// System (FixedUpdate): countdown invincibility окон
pub fn tick_invincibility(time: Res<Time<Fixed>>, mut query: Query<&mut Invincibility>) {
    let delta = time.delta_secs();
    for mut invincibility in query.iter_mut() {
        invincibility.tick(delta);
    }
}

/// System (FixedUpdate): применение урона от попаданий
pub fn apply_projectile_damage(
    mut hit_events: EventReader<ProjectileHit>,
    mut targets: Query<(&mut Health, Option<&mut Invincibility>)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for hit in hit_events.read() {
        // Paranoid guard: self-hit уже отфильтрован при детекции
        if hit.shooter == hit.target {
            logger::log_warning(&format!(
                "⚠️ Self-hit detected for {:?}, dropping",
                hit.shooter
            ));
            continue;
        }

        let Ok((mut health, mut invincibility)) = targets.get_mut(hit.target) else {
            continue;
        };

        if !health.is_alive() {
            continue;
        }
        if invincibility.as_ref().is_some_and(|inv| inv.is_active()) {
            continue;
        }

        let was_alive = health.is_alive();
        health.take_damage(hit.damage);
        let died = was_alive && !health.is_alive();

        if hit.damage > 0 {
            if let Some(inv) = invincibility.as_deref_mut() {
                inv.arm();
            }
        }

        damage_events.write(DamageDealt {
            attacker: hit.shooter,
            target: hit.target,
            damage: hit.damage,
            target_died: died,
        });

        if died {
            died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.shooter),
            });
            logger::log_info(&format!(
                "💀 Entity {:?} killed by {:?}",
                hit.target, hit.shooter
            ));
        }
    }
}

/// System (FixedUpdate): гашение движения мёртвых + Dead marker
pub fn handle_deaths(
    mut commands: Commands,
    mut died_events: EventReader<EntityDied>,
    mut motors: Query<(Option<&mut CharacterMotor>, Option<&mut MoveState>)>,
) {
    for event in died_events.read() {
        if let Ok((motor, move_state)) = motors.get_mut(event.entity) {
            if let Some(mut motor) = motor {
                motor.velocity = Vec3::ZERO;
            }
            if let Some(mut move_state) = move_state {
                move_state.direction = Vec3::ZERO;
                move_state.smoothed_axis = Vec2::ZERO;
            }
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_dealt_event() {
        let event = DamageDealt {
            attacker: Entity::PLACEHOLDER,
            target: Entity::PLACEHOLDER,
            damage: 10,
            target_died: false,
        };
        assert_eq!(event.damage, 10);
        assert!(!event.target_died);
    }

    #[test]
    fn test_invincibility_blocks_damage_logic() {
        let mut health = Health::new(100);
        let mut inv = Invincibility::default();

        // Первое попадание проходит и взводит окно
        health.take_damage(10);
        inv.arm();
        assert_eq!(health.current, 90);

        // Пока окно активно — урон игнорируется (guard в системе)
        assert!(inv.is_active());

        inv.tick(0.6);
        assert!(!inv.is_active());
    }
}
