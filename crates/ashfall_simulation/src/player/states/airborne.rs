//! Airborne leaves: rising, falling and the three landings.
//!
//! Landings differ only in their animation and whether movement stays
//! locked; all three release the environment machine through the same
//! `has_finished_airborne` flag, set strictly by the landing clip's exit
//! signal so the return to ground can never outrun the animation.

use crate::animation::AnimationEvent;
use crate::player::context::StateContext;
use crate::player::machine::StateNode;
use crate::player::states::common;

/// Rising after a jump. Releasing the jump button cuts the ascent for
/// variable jump height.
pub struct Jump;

impl StateNode for Jump {
    fn name(&self) -> &str {
        "Jump"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        // Air control applies from the first rising tick, not only once
        // the fall starts.
        ctx.data.target_movement_speed_modifier = ctx.config.airborne.fall_speed_modifier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
        if !ctx.data.jump_input && ctx.body.velocity.y > 0.0 {
            ctx.body.reset_vertical_velocity();
        }
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

pub struct Fall;

impl StateNode for Fall {
    fn name(&self) -> &str {
        "Fall"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.target_movement_speed_modifier = ctx.config.airborne.fall_speed_modifier;
        ctx.animator.set_bool(ctx.params.fall, true);
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        ctx.animator.set_bool(ctx.params.fall, false);
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
        common::limit_fall_speed(ctx);
    }
}

/// Shared landing behavior: kill momentum, play the landing animation and
/// wait for its exit signal.
fn enter_landing(ctx: &mut StateContext) {
    ctx.body.reset_velocity();
    ctx.data.target_movement_speed_modifier = 0.0;
    ctx.data.is_jumping = false;
    ctx.animator.set_bool(ctx.params.landing, true);
}

fn exit_landing(ctx: &mut StateContext) {
    ctx.animator.set_bool(ctx.params.landing, false);
    ctx.data.can_move = true;
}

fn landing_event(ctx: &mut StateContext, event: AnimationEvent) {
    if event == AnimationEvent::Exit {
        ctx.data.has_finished_airborne = true;
    }
}

/// Soft touchdown, movement stays responsive.
pub struct LightLand;

impl StateNode for LightLand {
    fn name(&self) -> &str {
        "LightLand"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        enter_landing(ctx);
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        exit_landing(ctx);
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }

    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        landing_event(ctx, event);
    }
}

/// Fast fall with no input: the character is staggered and rooted until
/// the recovery animation lets go.
pub struct HardLand;

impl StateNode for HardLand {
    fn name(&self) -> &str {
        "HardLand"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        enter_landing(ctx);
        ctx.data.can_move = false;
        ctx.animator.set_trigger(ctx.params.hard_land);
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        exit_landing(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }

    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        landing_event(ctx, event);
    }
}

/// Fast fall converted into a roll because the player was steering into
/// the landing.
pub struct RollLand;

impl StateNode for RollLand {
    fn name(&self) -> &str {
        "RollLand"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        enter_landing(ctx);
        ctx.animator.set_trigger(ctx.params.roll);
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        exit_landing(ctx);
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }

    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        landing_event(ctx, event);
    }
}
