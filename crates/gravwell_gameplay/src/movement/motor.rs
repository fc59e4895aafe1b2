//! Kinematic character motor
//!
//! Архитектура:
//! - Move direction собирается в Update (там живёт camera transform),
//!   интеграция — строго в FixedUpdate (детерминизм независимо от frame rate)
//! - Custom velocity integration; Rapier компоненты на entity — для
//!   host collision backend, не для сил
//! - Ground check — plane-stub (floor y=0), host character controller
//!   заменяет его своим sweep-результатом

use bevy::prelude::*;

use super::dash::DashState;
use super::gravity::GravityField;
use crate::camera::CameraRig;
use crate::components::Player;
use crate::input::{DashIntent, InputDevice, InputSettings, InputSnapshot, JumpIntent, Vibration};

/// Floor plane для headless ground check
const FLOOR_HEIGHT: f32 = 0.0;
const GROUND_EPSILON: f32 = 0.01;
/// Прижим к земле когда grounded (отрицательная вертикальная скорость)
const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Kinematic контроллер персонажа. Мутируется один раз за physics step.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterMotor {
    /// Скорость бега (m/s)
    pub move_speed: f32,
    /// Скорость доворота корпуса (slerp rate, 1/s)
    pub rotation_speed: f32,
    /// Высота прыжка (метры); стартовая скорость v = √(2·g_eff·h)
    pub jump_height: f32,
    /// Множитель к гравитации поля
    pub gravity_multiplier: f32,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Default for CharacterMotor {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 10.0,
            jump_height: 1.25,
            gravity_multiplier: 2.0,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Camera-relative направление движения (пишется в Update, читается в FixedUpdate)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MoveState {
    /// Smoothed input axis (lerp-кэш)
    pub smoothed_axis: Vec2,
    /// Горизонтальное направление в world space.
    /// Магнитуда может превышать 1 (gamepad sensitivity).
    pub direction: Vec3,
}

/// Displacement персонажа за один fixed tick
///
/// Dash — override: steering игнорируется пока dash активен. Вертикальная
/// velocity применяется всегда.
pub fn motor_displacement(
    move_direction: Vec3,
    dash: &DashState,
    motor: &CharacterMotor,
    delta: f32,
) -> Vec3 {
    let steering = if dash.is_dashing() {
        dash.direction * dash.speed
    } else {
        move_direction * motor.move_speed
    };
    (steering + motor.velocity) * delta
}

/// System (Update): smoothed axis + проекция на горизонт через camera basis
///
/// Guard: без camera rig направление не обновляется (поведение деградирует,
/// тик не падает).
pub fn update_move_direction(
    time: Res<Time>,
    settings: Res<InputSettings>,
    snapshot: Res<InputSnapshot>,
    cameras: Query<&Transform, (With<CameraRig>, Without<Player>)>,
    mut players: Query<&mut MoveState, With<Player>>,
) {
    let delta = time.delta_secs();

    for mut move_state in players.iter_mut() {
        let t = (settings.move_smoothing * delta * 20.0).clamp(0.0, 1.0);
        let smoothed = move_state.smoothed_axis.lerp(snapshot.move_axis, t);
        move_state.smoothed_axis = smoothed;

        let Ok(camera) = cameras.single() else {
            continue;
        };

        let forward = horizontal(camera.forward().as_vec3());
        let right = horizontal(camera.right().as_vec3());

        let mut direction =
            (forward * smoothed.y + right * smoothed.x).normalize_or_zero();
        if smoothed.length() < 0.1 {
            direction = Vec3::ZERO;
        }
        if snapshot.device == InputDevice::Gamepad {
            direction *= settings.gamepad_move_sensitivity;
        }
        move_state.direction = direction;
    }
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// System (FixedUpdate): countdown dash таймеров
pub fn tick_dash_timers(time: Res<Time<Fixed>>, mut query: Query<&mut DashState>) {
    let delta = time.delta_secs();
    for mut dash in query.iter_mut() {
        dash.tick(delta);
    }
}

/// System (FixedUpdate): ground check (plane-stub вместо host sweep)
pub fn ground_detection(mut query: Query<(&Transform, &mut CharacterMotor)>) {
    for (transform, mut motor) in query.iter_mut() {
        motor.grounded = transform.translation.y <= FLOOR_HEIGHT + GROUND_EPSILON;
    }
}

/// System (FixedUpdate): потребление DashIntent
///
/// Отклонённый dash (cooldown/уже активен/стоячий персонаж) — тихий no-op.
pub fn consume_dash_intents(
    mut events: EventReader<DashIntent>,
    mut vibration: ResMut<Vibration>,
    mut query: Query<(&MoveState, &mut DashState)>,
) {
    for event in events.read() {
        let Ok((move_state, mut dash)) = query.get_mut(event.entity) else {
            continue;
        };
        if dash.try_start(move_state.direction) {
            vibration.request(0.5, 0.5, 0.3);
        }
    }
}

/// System (FixedUpdate): потребление JumpIntent
///
/// Только с земли. Стартовая скорость из кинематики: v = √(2·g_eff·h).
pub fn consume_jump_intents(
    mut events: EventReader<JumpIntent>,
    gravity: Res<GravityField>,
    mut vibration: ResMut<Vibration>,
    mut query: Query<(&Transform, &mut CharacterMotor)>,
) {
    for event in events.read() {
        let Ok((transform, mut motor)) = query.get_mut(event.entity) else {
            continue;
        };
        if !motor.grounded {
            continue;
        }

        let g_eff = (gravity.gravity_at(transform.translation).length()
            * motor.gravity_multiplier)
            .max(0.01);
        motor.velocity.y = (2.0 * g_eff * motor.jump_height).sqrt();
        motor.grounded = false;
        vibration.request(0.3, 0.1, 0.2);
    }
}

/// System (FixedUpdate): интеграция гравитации
///
/// Grounded → прижим (малая отрицательная vy), airborne → velocity += g·dt
/// из суммарного поля (включая point sources).
pub fn apply_gravity(
    gravity: Res<GravityField>,
    time: Res<Time<Fixed>>,
    mut query: Query<(&Transform, &mut CharacterMotor)>,
) {
    let delta = time.delta_secs();

    for (transform, mut motor) in query.iter_mut() {
        if motor.grounded {
            motor.velocity.y = GROUND_STICK_VELOCITY;
        } else {
            let g = gravity.gravity_at(transform.translation) * motor.gravity_multiplier;
            motor.velocity += g * delta;
        }
    }
}

/// System (FixedUpdate): применение displacement + floor clamp
pub fn apply_motor_movement(
    time: Res<Time<Fixed>>,
    mut query: Query<(&MoveState, &DashState, &mut CharacterMotor, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (move_state, dash, mut motor, mut transform) in query.iter_mut() {
        let displacement = motor_displacement(move_state.direction, dash, &motor, delta);
        transform.translation += displacement;

        // Floor plane stub (host character controller делает это sweep'ом)
        if transform.translation.y < FLOOR_HEIGHT {
            transform.translation.y = FLOOR_HEIGHT;
            if motor.velocity.y < 0.0 {
                motor.velocity.y = 0.0;
            }
        }
    }
}

/// System (FixedUpdate): доворот корпуса к heading через slerp
///
/// Никогда не snap'ается мгновенно; во время dash heading не меняется.
pub fn rotate_toward_heading(
    time: Res<Time<Fixed>>,
    mut query: Query<(&MoveState, &DashState, &CharacterMotor, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (move_state, dash, motor, mut transform) in query.iter_mut() {
        if dash.is_dashing() {
            continue;
        }
        let heading = move_state.direction.normalize_or_zero();
        if heading.length_squared() < 0.01 {
            continue;
        }

        let target = Transform::IDENTITY.looking_to(heading, Vec3::Y).rotation;
        let t = (motor.rotation_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(target, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn test_dash_overrides_steering() {
        let mut dash = DashState::default();
        assert!(dash.try_start(Vec3::Z));

        let motor = CharacterMotor {
            velocity: Vec3::ZERO,
            ..default()
        };

        // Steering в сторону X игнорируется пока dash активен
        let displacement = motor_displacement(Vec3::X, &dash, &motor, TICK);
        let expected = Vec3::Z * dash.speed * TICK;
        assert!((displacement - expected).length() < 1e-6);
    }

    #[test]
    fn test_displacement_without_dash() {
        let dash = DashState::default();
        let motor = CharacterMotor {
            velocity: Vec3::new(0.0, -2.0, 0.0),
            ..default()
        };

        let displacement = motor_displacement(Vec3::X, &dash, &motor, TICK);
        assert!((displacement.x - motor.move_speed * TICK).abs() < 1e-6);
        assert!((displacement.y - (-2.0 * TICK)).abs() < 1e-6);
    }

    #[test]
    fn test_jump_velocity_from_height() {
        // v = √(2·g_eff·h); g_eff = 9.81 × 2, h = 1.25 → v ≈ 7.0
        let motor = CharacterMotor::default();
        let g_eff = 9.81 * motor.gravity_multiplier;
        let v = (2.0 * g_eff * motor.jump_height).sqrt();
        assert!((v - 7.0).abs() < 0.01, "v = {}", v);
    }

    #[test]
    fn test_gravity_integration_airborne() {
        let field = GravityField::default();
        let mut motor = CharacterMotor {
            grounded: false,
            ..default()
        };

        // Один fixed tick гравитации
        let g = field.gravity_at(Vec3::ZERO) * motor.gravity_multiplier;
        motor.velocity += g * TICK;

        // -9.81 × 2 / 60 ≈ -0.327
        assert!(motor.velocity.y < -0.32 && motor.velocity.y > -0.33);
    }
}
