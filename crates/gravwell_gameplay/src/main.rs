//! Headless симуляция GRAVWELL
//!
//! Запускает gameplay core без рендера: player бежит вперёд и стреляет,
//! болванчики расставлены seeded RNG. Для smoke-проверки детерминизма.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;

use gravwell_gameplay::*;
// Разрешаем glob-конфликт с bevy_input прелюдией
use gravwell_gameplay::{Key, MouseButton};

fn main() {
    let seed = 42;
    println!("Starting GRAVWELL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(GameplayPlugin);
    // Фиксированный шаг времени: прогон не зависит от wall clock
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_micros(
        16_667,
    )));

    let positions: Vec<Vec3> = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        (0..5)
            .map(|_| {
                Vec3::new(
                    rng.rng.gen_range(-8.0..8.0),
                    0.0,
                    rng.rng.gen_range(3.0..12.0),
                )
            })
            .collect()
    };

    let player = {
        let world = app.world_mut();
        let mut commands = world.commands();
        let player = spawn_player(&mut commands, Vec3::ZERO);
        spawn_camera_rig(&mut commands, Vec3::new(0.0, 5.0, 5.0));
        for position in &positions {
            spawn_hostile(&mut commands, *position);
        }
        player
    };
    app.update(); // flush spawn commands

    // Скриптованный ввод: бег вперёд + зажатый fire
    {
        let mut raw = app.world_mut().resource_mut::<RawInputState>();
        raw.press_key(Key::W);
        raw.press_mouse(MouseButton::Left);
    }

    for tick in 0..600 {
        app.update();

        if tick % 100 == 0 {
            let position = app
                .world()
                .get::<Transform>(player)
                .map(|t| t.translation)
                .unwrap_or_default();
            let (magazine, reserve) = app
                .world()
                .get::<Weapon>(player)
                .map(|w| (w.magazine, w.reserve_ammo))
                .unwrap_or_default();
            println!(
                "Tick {}: pos=({:.2}, {:.2}, {:.2}) ammo={}/{} entities={}",
                tick,
                position.x,
                position.y,
                position.z,
                magazine,
                reserve,
                app.world().entities().len()
            );
        }
    }

    println!("Simulation complete!");
}
