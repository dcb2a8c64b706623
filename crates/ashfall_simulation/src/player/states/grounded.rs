//! Ground locomotion leaves: Idle, Walk, Run, Sprint and the jump kick-off.

use crate::player::context::StateContext;
use crate::player::machine::StateNode;
use crate::player::states::common;

/// Stand still; input only rotates the body.
pub struct Idle;

impl StateNode for Idle {
    fn name(&self) -> &str {
        "Idle"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.target_movement_speed_modifier = ctx.config.grounded.idle_speed_modifier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

pub struct Walk;

impl StateNode for Walk {
    fn name(&self) -> &str {
        "Walk"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.target_movement_speed_modifier = ctx.config.grounded.walk_speed_modifier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

pub struct Run;

impl StateNode for Run {
    fn name(&self) -> &str {
        "Run"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.target_movement_speed_modifier = ctx.config.grounded.run_speed_modifier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

pub struct Sprint;

impl StateNode for Sprint {
    fn name(&self) -> &str {
        "Sprint"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.target_movement_speed_modifier = ctx.config.grounded.sprint_speed_modifier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

/// One-shot jump kick-off. Applies the impulse on entry; the ground sensor
/// losing contact then hands control to the airborne machine at the
/// environment level.
pub struct JumpStart;

impl StateNode for JumpStart {
    fn name(&self) -> &str {
        "JumpStart"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        common::start_jump(ctx);
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}
