//! Body-yaw resolution: pick a target heading, then spring toward it.
//!
//! Runs from the physics tick of whatever state is active, so rotation
//! policy (mode and speed multiplier) is state-owned while the math lives
//! here once.

use bevy::prelude::*;

use crate::math::smooth_damp_angle;
use crate::player::context::StateContext;
use crate::player::data::RotationMode;

/// Below this multiplier the body is considered rotation-locked.
const LOCK_THRESHOLD: f32 = 0.001;

/// Ignore aim vectors shorter than this (squared), e.g. cursor on top of
/// the character.
const MIN_AIM_SQR: f32 = 0.01;

/// Resolve the target yaw for this tick and advance the spring toward it.
pub fn handle_rotation(ctx: &mut StateContext) {
    let desired = match ctx.data.rotation_mode {
        RotationMode::OrientToCursor => cursor_yaw(ctx),
        RotationMode::OrientToMovement => movement_yaw(ctx),
    };

    if let Some(yaw) = desired {
        // Rewrite the target only on an actual change; resetting the
        // elapsed clock on redundant writes would starve the spring.
        if (yaw - ctx.data.target_yaw).abs() > f32::EPSILON {
            ctx.data.target_yaw = yaw;
            ctx.data.rotation_damp_elapsed = 0.0;
        }
    }

    rotate_towards_target(ctx);
}

/// Yaw toward the world-space aim point, flattened to the ground plane.
fn cursor_yaw(ctx: &StateContext) -> Option<f32> {
    let mut to_aim = ctx.data.aim_world_point - ctx.body_position;
    to_aim.y = 0.0;
    if to_aim.length_squared() <= MIN_AIM_SQR {
        return None;
    }
    Some(direction_to_yaw(to_aim))
}

/// Yaw along the movement input, rotated into camera space.
fn movement_yaw(ctx: &StateContext) -> Option<f32> {
    let input = ctx.data.movement_input;
    if input.length_squared() < 1e-6 {
        return None;
    }
    let local = Vec3::new(input.x, 0.0, input.y);
    let world = Quat::from_rotation_y(ctx.camera_yaw.to_radians()) * local;
    Some(direction_to_yaw(world))
}

/// World direction -> yaw in degrees, matching [`PhysicsBody::yaw_degrees`].
pub fn direction_to_yaw(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z).to_degrees()
}

/// Critically-damped turn toward `target_yaw`.
///
/// The state's rotation multiplier scales the smoothing time, so 2.0 turns
/// twice as fast and anything at or below the lock threshold freezes the
/// body outright (infinite smoothing time, zero velocity — no NaN path).
fn rotate_towards_target(ctx: &mut StateContext) {
    let multiplier = ctx.data.rotation_speed_multiplier;
    let smooth_time = if multiplier > LOCK_THRESHOLD {
        ctx.config.rotation.reach_time / multiplier
    } else {
        f32::MAX
    };

    let current = ctx.body.yaw_degrees();
    let mut damp_velocity = ctx.data.rotation_damp_velocity;
    let yaw = smooth_damp_angle(
        current,
        ctx.data.target_yaw,
        &mut damp_velocity,
        smooth_time,
        ctx.dt,
    );
    ctx.data.rotation_damp_velocity = damp_velocity;
    ctx.data.rotation_damp_elapsed += ctx.dt;

    ctx.body.move_rotation(Quat::from_rotation_y(yaw.to_radians()));
}
