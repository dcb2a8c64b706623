//! Player HFSM integration test
//!
//! Headless App, полный цикл: input → блэкборд → дерево состояний →
//! физика/аниматор. Анимационные сигналы подаём вручную, как это делал бы
//! движок анимации.

use std::sync::Arc;

use bevy::prelude::*;

use ashfall_simulation::animation::{AnimationCallback, AnimationEvent};
use ashfall_simulation::combat::{HitWindowClosed, HitWindowOpened, WeaponConfig};
use ashfall_simulation::create_headless_app;
use ashfall_simulation::input::PlayerInput;
use ashfall_simulation::physics::{GroundSensor, PhysicsBody};
use ashfall_simulation::player::{Player, PlayerStateData};

const GROUND: u32 = 9000;

/// Helper: App + игрок на земле с тренировочным мечом.
fn spawn_player_on_ground(app: &mut App) -> Entity {
    let player = app.world_mut().spawn(Player).id();
    let mut entity = app.world_mut().entity_mut(player);
    entity
        .get_mut::<GroundSensor>()
        .unwrap()
        .set_grounded_for_tests(true, Entity::from_raw(GROUND));
    entity.get_mut::<PlayerStateData>().unwrap().weapon =
        Some(Arc::new(WeaponConfig::training_sword()));
    app.update();
    player
}

fn state_path(app: &App, player: Entity) -> String {
    app.world()
        .entity(player)
        .get::<PlayerStateData>()
        .unwrap()
        .current_state_path
        .clone()
}

fn data(app: &App, player: Entity) -> &PlayerStateData {
    app.world().entity(player).get::<PlayerStateData>().unwrap()
}

fn set_input(app: &mut App, player: Entity, f: impl FnOnce(&mut PlayerInput)) {
    let mut input = app.world_mut().get_mut::<PlayerInput>(player).unwrap();
    f(&mut input);
}

fn set_grounded(app: &mut App, player: Entity, grounded: bool) {
    let mut sensor = app.world_mut().get_mut::<GroundSensor>(player).unwrap();
    sensor.set_grounded_for_tests(grounded, Entity::from_raw(GROUND));
}

fn set_vertical_speed(app: &mut App, player: Entity, vy: f32) {
    let mut body = app.world_mut().get_mut::<PhysicsBody>(player).unwrap();
    body.velocity.y = vy;
}

fn send_animation_event(app: &mut App, player: Entity, event: AnimationEvent) {
    app.world_mut().send_event(AnimationCallback {
        entity: player,
        event,
        mid_transition: false,
    });
}

fn drain_opened(app: &mut App) -> Vec<HitWindowOpened> {
    app.world_mut()
        .resource_mut::<Events<HitWindowOpened>>()
        .drain()
        .collect()
}

fn drain_closed(app: &mut App) -> Vec<HitWindowClosed> {
    app.world_mut()
        .resource_mut::<Events<HitWindowClosed>>()
        .drain()
        .collect()
}

#[test]
fn test_player_starts_grounded_idle() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
}

#[test]
fn test_locomotion_follows_input() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.movement = Vec2::new(0.0, 1.0));
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Run");

    set_input(&mut app, player, |i| i.prefer_walk = true);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Walk");

    set_input(&mut app, player, |i| {
        i.prefer_walk = false;
        i.sprint = true;
    });
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Sprint");

    set_input(&mut app, player, |i| {
        i.movement = Vec2::ZERO;
        i.sprint = false;
    });
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
}

#[test]
fn test_jump_and_light_landing() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.jump = true);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/JumpStart");
    assert!(data(&app, player).vertical_speed >= 0.0);

    // Толчок оторвал сенсор от земли
    set_grounded(&mut app, player, false);
    set_input(&mut app, player, |i| i.jump = false);
    app.update();
    assert_eq!(state_path(&app, player), "environment/airborne/Jump");

    // Подъём сменился медленным падением
    set_vertical_speed(&mut app, player, -3.0);
    app.update();
    assert_eq!(state_path(&app, player), "environment/airborne/Fall");

    set_grounded(&mut app, player, true);
    app.update();
    assert_eq!(state_path(&app, player), "environment/airborne/LightLand");

    // Земля возвращается только после окончания клипа приземления
    app.update();
    assert_eq!(state_path(&app, player), "environment/airborne/LightLand");

    send_animation_event(&mut app, player, AnimationEvent::Exit);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
}

#[test]
fn test_fast_fall_without_input_is_hard_landing() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_grounded(&mut app, player, false);
    set_vertical_speed(&mut app, player, -9.0);
    app.update();
    app.update();
    assert_eq!(state_path(&app, player), "environment/airborne/Fall");

    set_grounded(&mut app, player, true);
    set_vertical_speed(&mut app, player, -9.0);
    app.update();

    assert_eq!(state_path(&app, player), "environment/airborne/HardLand");
    assert!(!data(&app, player).can_move);
}

#[test]
fn test_fast_fall_with_input_becomes_roll() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.movement = Vec2::new(0.0, 1.0));
    set_grounded(&mut app, player, false);
    set_vertical_speed(&mut app, player, -9.0);
    app.update();
    app.update();

    set_grounded(&mut app, player, true);
    set_vertical_speed(&mut app, player, -9.0);
    app.update();

    assert_eq!(state_path(&app, player), "environment/airborne/RollLand");
    assert!(data(&app, player).can_move);
}

#[test]
fn test_full_combo_chain_and_retirement() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    // Первый удар: буфер конвертируется в wind-up в том же логическом тике
    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );
    assert!(data(&app, player).is_attacking_action);

    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/attack/Swing");
    let opened = drain_opened(&mut app);
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].combo_index, 0);
    assert_eq!(data(&app, player).final_move_speed_modifier(), 0.0);

    // Второй удар буферизуется во время свинга
    set_input(&mut app, player, |i| i.attack_pressed = true);
    send_animation_event(&mut app, player, AnimationEvent::SwingFinished);
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Recovery"
    );
    assert!(!drain_closed(&mut app).is_empty());

    // Цепочка: recovery → windup следующего шага
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );
    assert_eq!(data(&app, player).combo_index, 1);

    // Второй шаг и цепочка на третий, последний
    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(drain_opened(&mut app)[0].combo_index, 1);
    set_input(&mut app, player, |i| i.attack_pressed = true);
    send_animation_event(&mut app, player, AnimationEvent::SwingFinished);
    app.update();
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );
    assert_eq!(data(&app, player).combo_index, 2);

    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(drain_opened(&mut app)[0].combo_index, 2);

    // Таблица исчерпана: нажатие в последнем recovery не даёт
    // четвёртого wind-up, индекс не уходит за последний шаг
    set_input(&mut app, player, |i| i.attack_pressed = true);
    send_animation_event(&mut app, player, AnimationEvent::SwingFinished);
    app.update();
    for _ in 0..4 {
        app.update();
        assert_eq!(
            state_path(&app, player),
            "environment/grounded/attack/Recovery"
        );
    }
    assert_eq!(data(&app, player).combo_index, 2);
    assert!(drain_opened(&mut app).is_empty());

    // Невостребованный сигнал гасим, иначе он откроет новую сессию
    app.world_mut()
        .get_mut::<PlayerStateData>(player)
        .unwrap()
        .attack_buffer
        .consume();

    send_animation_event(&mut app, player, AnimationEvent::ComboWindowOver);
    app.update();
    app.update();

    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
    let after = data(&app, player);
    assert_eq!(after.combo_index, 0);
    assert_eq!(after.action_movement_multiplier, 1.0);
    assert_eq!(after.rotation_speed_multiplier, 1.0);
}

#[test]
fn test_hit_interrupts_swing_and_closes_window() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    app.update();
    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/attack/Swing");
    drain_opened(&mut app);

    // Попадание по персонажу посреди свинга
    app.world_mut()
        .get_mut::<PlayerStateData>(player)
        .unwrap()
        .is_under_attack = true;
    app.update();

    assert_eq!(state_path(&app, player), "environment/grounded/hit/Hit");
    assert!(!drain_closed(&mut app).is_empty(), "окно должно закрыться");
    assert!(!data(&app, player).is_attacking_action);

    // Восстановление после клипа реакции
    send_animation_event(&mut app, player, AnimationEvent::Exit);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
    assert_eq!(data(&app, player).action_movement_multiplier, 1.0);
}

#[test]
fn test_unarmed_attack_press_is_ignored() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);
    app.world_mut()
        .get_mut::<PlayerStateData>(player)
        .unwrap()
        .weapon = None;

    set_input(&mut app, player, |i| i.attack_pressed = true);
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(state_path(&app, player), "environment/grounded/Idle");
    assert!(drain_opened(&mut app).is_empty());
}

#[test]
fn test_mid_transition_callback_is_dropped() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );

    app.world_mut().send_event(AnimationCallback {
        entity: player,
        event: AnimationEvent::WindupFinished,
        mid_transition: true,
    });
    app.update();

    // Сигнал пришёл во время блендинга — должен быть отброшен
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );
}

#[test]
fn test_repeated_phase_signal_is_idempotent() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    app.update();

    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/attack/Swing");
    assert_eq!(drain_opened(&mut app).len(), 1);
}

#[test]
fn test_modifier_invariant_holds_through_combo() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| {
        i.movement = Vec2::new(0.0, 1.0);
        i.attack_pressed = true;
    });
    for tick in 0..20 {
        if tick == 3 {
            send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
        }
        if tick == 6 {
            send_animation_event(&mut app, player, AnimationEvent::SwingFinished);
        }
        app.update();
        let d = data(&app, player);
        let expected = d.movement_speed_modifier * d.action_movement_multiplier;
        assert_eq!(d.final_move_speed_modifier(), expected);
        assert!(d.final_move_speed_modifier().is_finite());
    }
}

#[test]
fn test_combo_session_resets_after_aborted_swing() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    // Цепляем второй шаг combo, затем обрываем его ударом посреди свинга
    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    app.update();
    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    set_input(&mut app, player, |i| i.attack_pressed = true);
    send_animation_event(&mut app, player, AnimationEvent::SwingFinished);
    app.update();
    app.update();
    send_animation_event(&mut app, player, AnimationEvent::WindupFinished);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/attack/Swing");
    assert_eq!(data(&app, player).combo_index, 1);

    app.world_mut()
        .get_mut::<PlayerStateData>(player)
        .unwrap()
        .is_under_attack = true;
    app.update();
    send_animation_event(&mut app, player, AnimationEvent::Exit);
    app.update();
    assert_eq!(state_path(&app, player), "environment/grounded/Idle");

    // Новая сессия начинается с нулевого индекса и чистых флагов
    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    let d = data(&app, player);
    assert_eq!(d.combo_index, 0);
    assert!(!d.attack_windup_finished);
    assert!(!d.attack_swing_finished);
    assert!(!d.attack_combo_window_finished);
    app.update();
    assert_eq!(
        state_path(&app, player),
        "environment/grounded/attack/Windup"
    );
}

#[test]
fn test_state_path_is_a_single_chain() {
    let mut app = create_headless_app();
    let player = spawn_player_on_ground(&mut app);

    set_input(&mut app, player, |i| i.attack_pressed = true);
    app.update();
    app.update();

    let path = state_path(&app, player);
    assert_eq!(path.matches('/').count(), 3, "path: {}", path);
    assert!(path.starts_with("environment/grounded/"));
}
