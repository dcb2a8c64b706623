//! Движение, общее для всех стоек: плавный разгон модификатора скорости,
//! силовое перемещение и ограничение падения.

use bevy::prelude::*;

use crate::math::move_towards;
use crate::physics::ForceMode;
use crate::player::context::StateContext;
use crate::player::rotation::handle_rotation;

/// Logic-rate part of locomotion: blend the speed modifier toward the
/// leaf's target and publish speeds to the animator.
///
/// The modifier is the *smoothed* throttle; the action multiplier applied
/// on top of it is instant and owned by combat states.
pub fn movement_tick(ctx: &mut StateContext) {
    let grounded = &ctx.config.grounded;
    let has_input = ctx.data.movement_input.length() > grounded.movement_input_threshold;
    let target = if has_input {
        ctx.data.target_movement_speed_modifier
    } else {
        0.0
    };

    ctx.data.movement_speed_modifier = move_towards(
        ctx.data.movement_speed_modifier,
        target,
        grounded.speed_modifier_transition_rate * ctx.dt,
    );

    ctx.data.current_speed = ctx.body.horizontal_velocity().length();
    ctx.data.vertical_speed = ctx.body.velocity.y;
    ctx.animator
        .set_float(ctx.params.speed, ctx.data.current_speed);
}

/// Fixed-rate part of locomotion: resolve rotation, then steer the body
/// toward the desired horizontal velocity with a single velocity-change
/// force.
///
/// Below the input threshold, or with a zeroed modifier, no force is
/// applied at all: attack lunges and knockback keep their momentum
/// instead of being steered back to zero by the controller.
pub fn movement_physics_tick(ctx: &mut StateContext) {
    handle_rotation(ctx);

    if !ctx.data.can_move {
        return;
    }

    let grounded = &ctx.config.grounded;
    let input = ctx.data.movement_input;
    let final_modifier = ctx.data.final_move_speed_modifier();
    if input.length() <= grounded.movement_input_threshold || final_modifier <= 0.0 {
        return;
    }

    let local = Vec3::new(input.x, 0.0, input.y).clamp_length_max(1.0);
    let world = Quat::from_rotation_y(ctx.camera_yaw.to_radians()) * local;
    let target_velocity = world * grounded.base_speed * final_modifier;
    let correction = target_velocity - ctx.body.horizontal_velocity();
    ctx.body.add_force(correction, ForceMode::VelocityChange);
}

/// Launch the body upward and tell the animator.
pub fn start_jump(ctx: &mut StateContext) {
    ctx.body
        .add_force(ctx.config.airborne.jump_force, ForceMode::VelocityChange);
    ctx.data.is_jumping = true;
    ctx.animator.set_trigger(ctx.params.jump);
}

/// Clamp downward speed to the configured terminal velocity.
pub fn limit_fall_speed(ctx: &mut StateContext) {
    let limit = -ctx.config.airborne.fall_speed_limit;
    if ctx.body.velocity.y < limit {
        ctx.body.velocity.y = limit;
    }
}
