//! Headless демо: персонаж бежит, прыгает и проводит combo без рендера.

use std::sync::Arc;

use bevy::prelude::*;

use ashfall_simulation::animation::{AnimationCallback, AnimationEvent};
use ashfall_simulation::combat::WeaponConfig;
use ashfall_simulation::create_headless_app;
use ashfall_simulation::input::PlayerInput;
use ashfall_simulation::physics::GroundSensor;
use ashfall_simulation::player::{Player, PlayerStateData};

fn main() {
    println!("Starting Ashfall headless simulation");

    let mut app = create_headless_app();
    app.update();

    let player = app.world_mut().spawn(Player).id();
    {
        let mut entity = app.world_mut().entity_mut(player);
        let ground = Entity::from_raw(9999);
        entity
            .get_mut::<GroundSensor>()
            .unwrap()
            .set_grounded_for_tests(true, ground);
        entity.get_mut::<PlayerStateData>().unwrap().weapon =
            Some(Arc::new(WeaponConfig::training_sword()));
    }

    let mut last_path = String::new();
    for tick in 0..600 {
        // Сценарий: бег, затем два удара
        {
            let mut entity = app.world_mut().entity_mut(player);
            let mut input = entity.get_mut::<PlayerInput>().unwrap();
            input.movement = if tick < 120 { Vec2::new(0.0, 1.0) } else { Vec2::ZERO };
            if tick == 150 || tick == 200 {
                input.attack_pressed = true;
            }
        }
        // Анимационные сигналы подаём вручную (нет движка анимации)
        if tick == 170 {
            app.world_mut().send_event(AnimationCallback {
                entity: player,
                event: AnimationEvent::WindupFinished,
                mid_transition: false,
            });
        }
        if tick == 190 {
            app.world_mut().send_event(AnimationCallback {
                entity: player,
                event: AnimationEvent::SwingFinished,
                mid_transition: false,
            });
        }

        app.update();

        let path = app
            .world()
            .entity(player)
            .get::<PlayerStateData>()
            .unwrap()
            .current_state_path
            .clone();
        if path != last_path {
            println!("Tick {:4}: {}", tick, path);
            last_path = path;
        }
    }

    println!("Simulation complete!");
}
