//! ECS glue: the systems that drive the state tree and the plugin wiring
//! them into the schedules.
//!
//! Logic runs in `Update` (variable rate), physics forwarding in
//! `FixedUpdate` between the rapier sync systems. The tree itself never
//! sees the ECS; each system borrows the entity's components into a
//! [`StateContext`] for the duration of the call.

use bevy::prelude::*;

use crate::animation::{AnimationCallback, AnimationParams, Animator};
use crate::combat::{CombatNotice, HitWindowClosed, HitWindowOpened};
use crate::config::PlayerConfig;
use crate::input::{AimInput, CameraYaw, PlayerInput};
use crate::logger::log_warning;
use crate::physics::{
    apply_gravity, integrate_velocity_to_transform, sync_bodies_to_rapier, update_ground_sensors,
    GroundSensor, PhysicsBody,
};
use crate::player::context::StateContext;
use crate::player::data::{AttackBuffer, PlayerStateData};
use crate::player::root::PlayerHfsm;

/// Marker for player-controlled characters; pulls in the full component
/// set a character needs.
#[derive(Component, Default)]
#[require(
    PlayerStateData,
    PlayerHfsm,
    PlayerInput,
    AimInput,
    PhysicsBody,
    GroundSensor,
    Animator,
    AnimationParams,
    PlayerConfig,
    bevy_rapier3d::prelude::Velocity,
    Transform
)]
pub struct Player;

type CharacterComponents = (
    Entity,
    &'static mut PlayerHfsm,
    &'static mut PlayerStateData,
    &'static mut PhysicsBody,
    &'static mut Animator,
    &'static AnimationParams,
    &'static PlayerConfig,
    &'static Transform,
);

/// Size the attack buffer from the character's tuning on spawn.
fn init_attack_buffers(
    mut query: Query<(&PlayerConfig, &mut PlayerStateData), Added<PlayerStateData>>,
) {
    for (config, mut data) in &mut query {
        data.attack_buffer = AttackBuffer::new(config.input_buffer_window);
    }
}

/// Snapshot device input into the blackboard. Attack presses are
/// edge-triggered: consumed here, timestamped into the buffer.
fn intake_input(
    time: Res<Time>,
    mut query: Query<(
        &mut PlayerInput,
        &AimInput,
        &GroundSensor,
        &mut PlayerStateData,
    )>,
) {
    let now = time.elapsed_secs();
    for (mut input, aim, sensor, mut data) in &mut query {
        data.movement_input = input.movement;
        data.jump_input = input.jump;
        data.is_sprinting = input.sprint;
        data.prefer_walk = input.prefer_walk;
        data.aim_world_point = aim.world_point;
        data.is_grounded = sensor.is_grounded();

        if input.attack_pressed {
            data.attack_buffer.signal(now);
            input.attack_pressed = false;
        }
    }
}

/// Deliver animation completion signals to the owning character's active
/// leaf. Callbacks fired while the animator is already blending away are
/// stale and dropped.
fn route_animation_callbacks(
    time: Res<Time>,
    camera_yaw: Res<CameraYaw>,
    mut callbacks: EventReader<AnimationCallback>,
    mut query: Query<CharacterComponents>,
) {
    let mut notices: Vec<CombatNotice> = Vec::new();
    for callback in callbacks.read() {
        if callback.mid_transition {
            log_warning(&format!(
                "🎬 dropped mid-transition animation event {:?}",
                callback.event
            ));
            continue;
        }
        let Ok((_, mut hfsm, mut data, mut body, mut animator, params, config, transform)) =
            query.get_mut(callback.entity)
        else {
            continue;
        };
        let mut ctx = StateContext {
            data: &mut data,
            body: &mut body,
            animator: animator.driver.as_mut(),
            params,
            config,
            notices: &mut notices,
            body_position: transform.translation,
            camera_yaw: camera_yaw.0,
            dt: time.delta_secs(),
            now: time.elapsed_secs(),
        };
        hfsm.handle_animation_event(&mut ctx, callback.event);
    }
    debug_assert!(notices.is_empty(), "events must not open hit windows");
}

/// Variable-rate logic tick: transitions, leaf behavior, notice drain.
fn logic_tick(
    time: Res<Time>,
    camera_yaw: Res<CameraYaw>,
    mut query: Query<CharacterComponents>,
    mut window_opened: EventWriter<HitWindowOpened>,
    mut window_closed: EventWriter<HitWindowClosed>,
) {
    let mut notices: Vec<CombatNotice> = Vec::new();
    for (entity, mut hfsm, mut data, mut body, mut animator, params, config, transform) in
        &mut query
    {
        let mut ctx = StateContext {
            data: &mut data,
            body: &mut body,
            animator: animator.driver.as_mut(),
            params,
            config,
            notices: &mut notices,
            body_position: transform.translation,
            camera_yaw: camera_yaw.0,
            dt: time.delta_secs(),
            now: time.elapsed_secs(),
        };
        hfsm.tick(&mut ctx);

        for notice in notices.drain(..) {
            match notice {
                CombatNotice::HitWindowOpened {
                    combo_index,
                    damage_multiplier,
                } => {
                    window_opened.write(HitWindowOpened {
                        attacker: entity,
                        combo_index,
                        damage_multiplier,
                    });
                }
                CombatNotice::HitWindowClosed => {
                    window_closed.write(HitWindowClosed { attacker: entity });
                }
            }
        }
    }
}

/// Fixed-rate forwarding into the active chain: rotation and forces.
fn physics_step(
    time: Res<Time>,
    camera_yaw: Res<CameraYaw>,
    mut query: Query<CharacterComponents>,
) {
    let mut notices: Vec<CombatNotice> = Vec::new();
    for (_, mut hfsm, mut data, mut body, mut animator, params, config, transform) in &mut query {
        let mut ctx = StateContext {
            data: &mut data,
            body: &mut body,
            animator: animator.driver.as_mut(),
            params,
            config,
            notices: &mut notices,
            body_position: transform.translation,
            camera_yaw: camera_yaw.0,
            dt: time.delta_secs(),
            now: time.elapsed_secs(),
        };
        hfsm.physics_tick(&mut ctx);
    }
}

/// Character simulation: input intake, the state tree, rapier bridging.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraYaw>()
            // rapier регистрирует это сам; без его plugin'а (headless
            // тесты) события всё равно нужны ground-сенсорам
            .add_event::<bevy_rapier3d::prelude::CollisionEvent>()
            .add_event::<AnimationCallback>()
            .add_event::<HitWindowOpened>()
            .add_event::<HitWindowClosed>()
            .add_systems(
                Update,
                (
                    init_attack_buffers,
                    intake_input,
                    route_animation_callbacks,
                    logic_tick,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    update_ground_sensors,
                    apply_gravity,
                    physics_step,
                    integrate_velocity_to_transform,
                    sync_bodies_to_rapier,
                )
                    .chain()
                    .before(bevy_rapier3d::plugin::PhysicsSet::SyncBackend),
            );
    }
}
