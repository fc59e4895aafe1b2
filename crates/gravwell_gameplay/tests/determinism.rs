//! Детерминизм: одинаковый seed + одинаковый скрипт ввода → идентичный мир
//!
//! Время шагается вручную (ManualDuration), поэтому прогоны не зависят от
//! wall clock.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use gravwell_gameplay::*;
// Разрешаем glob-конфликт с bevy_input прелюдией
use gravwell_gameplay::{Key, MouseButton};

const SEED: u64 = 12345;
const TICKS: usize = 300;

#[test]
fn test_determinism_same_seed() {
    let snapshot1 = run_scripted_session(SEED, TICKS);
    let snapshot2 = run_scripted_session(SEED, TICKS);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    let snapshots: Vec<_> = (0..3)
        .map(|_| run_scripted_session(SEED, TICKS))
        .collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

/// Скриптованная сессия: бег + стрельба по болванчикам, snapshot в конце
fn run_scripted_session(seed: u64, ticks: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(GameplayPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(
        16_667,
    )));

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_player(&mut commands, Vec3::ZERO);
        spawn_camera_rig(&mut commands, Vec3::new(0.0, 5.0, 5.0));
        spawn_hostile(&mut commands, Vec3::new(0.0, 0.0, -6.0));
        spawn_hostile(&mut commands, Vec3::new(3.0, 0.0, -8.0));
        spawn_hostile(&mut commands, Vec3::new(-4.0, 0.0, -5.0));
    }
    app.update();

    {
        let mut raw = app.world_mut().resource_mut::<RawInputState>();
        raw.press_key(Key::W);
        raw.press_mouse(MouseButton::Left);
    }

    for tick in 0..ticks {
        // Host-образный frame: сброс edge-state + периодические действия
        app.world_mut()
            .resource_mut::<RawInputState>()
            .begin_frame();

        if tick == 60 {
            app.world_mut()
                .resource_mut::<RawInputState>()
                .press_key(Key::Shift); // dash
        }
        if tick == 62 {
            app.world_mut()
                .resource_mut::<RawInputState>()
                .release_key(Key::Shift);
        }

        app.update();
    }

    // Snapshot: позиции + здоровье + боезапас
    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<Health>(world));
    snapshot.extend(world_snapshot::<Weapon>(world));
    snapshot
}
