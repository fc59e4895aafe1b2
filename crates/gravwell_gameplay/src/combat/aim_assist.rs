//! Aim direction + aim assist
//!
//! Направление прицеливания:
//! - KM: от персонажа к cursor ground point (host отдаёт точку пересечения
//!   mouse ray с ground plane), IJKL как fallback
//! - Gamepad: camera-relative правый стик, с blend'ом к ближайшей цели
//!   в переднем конусе
//! - Без ввода держится последнее направление (gamepad-у нечем "отпустить"
//!   прицел)
//!
//! Assist target — weak ссылка, пересчитывается каждый frame.

use bevy::prelude::*;

use super::damage::Dead;
use crate::camera::CameraRig;
use crate::components::{Hostile, Player};
use crate::input::{InputDevice, InputSnapshot};

/// Состояние прицеливания персонажа
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AimState {
    /// Текущее направление (unit, horizontal)
    pub direction: Vec3,
    /// Последнее направление от активного ввода (держится при отпущенном стике)
    pub last_direction: Vec3,
    /// Цель aim assist (если есть в конусе)
    pub assist_target: Option<Entity>,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Z,
            last_direction: Vec3::NEG_Z,
            assist_target: None,
        }
    }
}

/// Tuning aim assist
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AimAssist {
    /// Радиус поиска целей (метры)
    pub radius: f32,
    /// Cos порога конуса: цель качается только если dot(aim, to_target) выше
    pub snap_threshold: f32,
    /// Сила blend'а к цели (0 = нет assist, 1 = полный snap)
    pub strength: f32,
}

impl Default for AimAssist {
    fn default() -> Self {
        Self {
            radius: 10.0,
            snap_threshold: 0.8,
            strength: 0.3,
        }
    }
}

/// Выбор цели: ближайшая из тех что в радиусе И в переднем конусе
///
/// Не "ближайшая в пространстве", а "ближайшая среди тех куда примерно
/// целимся" — боковая цель вне конуса проигрывает дальней фронтальной.
pub fn select_assist_target(
    origin: Vec3,
    aim_direction: Vec3,
    radius: f32,
    snap_threshold: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<Entity> {
    let aim = aim_direction.normalize_or_zero();
    if aim == Vec3::ZERO {
        return None;
    }

    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        let to_target = position - origin;
        let distance = to_target.length();
        if distance < 1e-4 || distance > radius {
            continue;
        }

        let dot = aim.dot(to_target / distance);
        if dot <= snap_threshold {
            continue; // вне конуса
        }

        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }

    best.map(|(entity, _)| entity)
}

/// System (Update): направление прицеливания + assist blend
pub fn update_player_aim(
    snapshot: Res<InputSnapshot>,
    cameras: Query<&Transform, (With<CameraRig>, Without<Player>)>,
    hostiles: Query<(Entity, &Transform), (With<Hostile>, Without<Dead>)>,
    mut players: Query<(&Transform, &mut AimState, &AimAssist), With<Player>>,
) {
    for (transform, mut aim, assist) in players.iter_mut() {
        let origin = transform.translation;

        // 1. Сырое направление от активного девайса
        let raw_direction = match snapshot.device {
            InputDevice::KeyboardMouse => snapshot
                .cursor_ground_point
                .map(|point| flatten(point - origin))
                .filter(|d| *d != Vec3::ZERO)
                .or_else(|| stick_direction(&cameras, snapshot.aim_axis)),
            InputDevice::Gamepad => stick_direction(&cameras, snapshot.aim_axis),
        };

        let mut direction = match raw_direction {
            Some(dir) => {
                aim.last_direction = dir;
                dir
            }
            // Нет ввода → держим последнее направление
            None => aim.last_direction,
        };

        // 2. Скан целей (каждый frame, weak ссылка)
        aim.assist_target = select_assist_target(
            origin,
            direction,
            assist.radius,
            assist.snap_threshold,
            hostiles.iter().map(|(entity, t)| (entity, t.translation)),
        );

        // 3. Blend к цели — только для стика (мышь целится точно сама)
        if snapshot.device == InputDevice::Gamepad && raw_direction.is_some() {
            if let Some(target) = aim.assist_target {
                if let Ok((_, target_transform)) = hostiles.get(target) {
                    let to_target = flatten(target_transform.translation - origin);
                    if to_target != Vec3::ZERO {
                        direction = direction
                            .lerp(to_target, assist.strength)
                            .normalize_or_zero();
                        if direction == Vec3::ZERO {
                            direction = aim.last_direction;
                        }
                    }
                }
            }
        }

        aim.direction = direction;
    }
}

/// Camera-relative направление из stick axis
fn stick_direction(
    cameras: &Query<&Transform, (With<CameraRig>, Without<Player>)>,
    axis: Vec2,
) -> Option<Vec3> {
    if axis.length_squared() < 1e-6 {
        return None;
    }
    let camera = cameras.single().ok()?;

    let forward = flatten(camera.forward().as_vec3());
    let right = flatten(camera.right().as_vec3());
    let direction = flatten(forward * axis.y + right * axis.x);
    (direction != Vec3::ZERO).then_some(direction)
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_beats_distance() {
        // Прицел вперёд (+Z): фронтальная цель на 5м выигрывает у боковой
        // на 2м — боковая не проходит cone test (cos 0.8)
        let forward = Entity::from_raw(1);
        let lateral = Entity::from_raw(2);

        let selected = select_assist_target(
            Vec3::ZERO,
            Vec3::Z,
            10.0,
            0.8,
            [
                (forward, Vec3::new(0.0, 0.0, 5.0)),
                (lateral, Vec3::new(2.0, 0.0, 0.0)),
            ],
        );

        assert_eq!(selected, Some(forward));
    }

    #[test]
    fn test_closest_among_qualifying() {
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);

        let selected = select_assist_target(
            Vec3::ZERO,
            Vec3::Z,
            10.0,
            0.8,
            [
                (far, Vec3::new(0.0, 0.0, 8.0)),
                (near, Vec3::new(0.0, 0.0, 3.0)),
            ],
        );

        assert_eq!(selected, Some(near));
    }

    #[test]
    fn test_out_of_radius_ignored() {
        let target = Entity::from_raw(1);
        let selected = select_assist_target(
            Vec3::ZERO,
            Vec3::Z,
            10.0,
            0.8,
            [(target, Vec3::new(0.0, 0.0, 15.0))],
        );
        assert_eq!(selected, None);
    }

    #[test]
    fn test_degenerate_aim_direction() {
        let target = Entity::from_raw(1);
        let selected = select_assist_target(
            Vec3::ZERO,
            Vec3::ZERO,
            10.0,
            0.8,
            [(target, Vec3::new(0.0, 0.0, 5.0))],
        );
        assert_eq!(selected, None);
    }

    #[test]
    fn test_assist_blend_partial() {
        // Blend strength 0.3 тянет прицел к цели, но не снапает полностью
        let aim = Vec3::Z;
        let to_target = Vec3::new(1.0, 0.0, 1.0).normalize();

        let blended = aim.lerp(to_target, 0.3).normalize();
        let angle_to_aim = blended.angle_between(aim);
        let angle_to_target = blended.angle_between(to_target);

        assert!(angle_to_aim > 0.0, "прицел сдвинулся");
        assert!(
            angle_to_aim < angle_to_target,
            "но остался ближе к вводу игрока"
        );
    }
}
