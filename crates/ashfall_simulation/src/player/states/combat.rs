//! Melee combo leaves and the hit reaction.
//!
//! Phase timing is animation-driven: the clip fires windup/swing/window
//! signals, the leaves turn them into blackboard flags, and the machine's
//! transition rules consume the flags on the next logic tick. The leaves
//! themselves hold no timers.

use crate::animation::AnimationEvent;
use crate::combat::CombatNotice;
use crate::logger::log_warning;
use crate::physics::ForceMode;
use crate::player::context::StateContext;
use crate::player::data::RotationMode;
use crate::player::machine::StateNode;
use crate::player::states::common;

/// Combat stance between attacks: full mobility, facing the movement
/// direction again. The machine idles here until buffered intent and a
/// resolvable combo step line up.
pub struct AttackIdle;

impl StateNode for AttackIdle {
    fn name(&self) -> &str {
        "AttackIdle"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.action_movement_multiplier = 1.0;
        ctx.data.rotation_speed_multiplier = 1.0;
        ctx.data.rotation_mode = RotationMode::OrientToMovement;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

/// Wind-up of the current combo step. Consumes the buffered intent,
/// cross-fades into the step's clip and applies the step's movement and
/// rotation throttles. The body turns toward the cursor here so the swing
/// goes where the player is aiming.
pub struct Windup;

impl StateNode for Windup {
    fn name(&self) -> &str {
        "Windup"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.attack_buffer.consume();
        ctx.data.attack_windup_finished = false;
        ctx.data.is_attacking_action = true;
        ctx.data.rotation_mode = RotationMode::OrientToCursor;

        let Some(step) = ctx.data.current_attack_step() else {
            // Transitions guard against this; an empty table mid-state
            // means the weapon was swapped out under us.
            log_warning("⚔️ windup entered with no combo step, attack will stall");
            return;
        };
        ctx.animator
            .cross_fade(&step.animation, step.cross_fade_duration);
        ctx.data.action_movement_multiplier = step.movement_multiplier;
        ctx.data.rotation_speed_multiplier = step.rotation_multiplier;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

/// The strike itself. Rooted and rotation-locked; opens the hit window on
/// entry and guarantees it closes on exit, whatever caused the exit.
pub struct Swing;

impl StateNode for Swing {
    fn name(&self) -> &str {
        "Swing"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.attack_swing_finished = false;
        ctx.data.action_movement_multiplier = 0.0;
        ctx.data.rotation_speed_multiplier = 0.0;

        if let Some(step) = ctx.data.current_attack_step() {
            // Lunge in the facing direction.
            let impulse = ctx.body.rotation * step.impulse;
            ctx.body.add_force(impulse, ForceMode::Impulse);
            ctx.notices.push(CombatNotice::HitWindowOpened {
                combo_index: ctx.data.combo_index,
                damage_multiplier: step.damage_multiplier,
            });
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        ctx.notices.push(CombatNotice::HitWindowClosed);
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

/// Follow-through after the swing. Partial mobility per the step's
/// multipliers; a buffered press inside the combo window chains into the
/// next wind-up, otherwise the window-over signal retires the combo.
pub struct Recovery;

impl StateNode for Recovery {
    fn name(&self) -> &str {
        "Recovery"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        if let Some(step) = ctx.data.current_attack_step() {
            ctx.data.action_movement_multiplier = step.movement_multiplier;
            ctx.data.rotation_speed_multiplier = step.rotation_multiplier;
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        // Advance the combo so a chained wind-up reads the next step. The
        // machine's enter hook rewinds this to zero for a fresh session.
        ctx.data.combo_index += 1;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }
}

/// Hit reaction: flinch clip, rooted, until the clip's exit signal says
/// the character has recovered.
pub struct Hit;

impl StateNode for Hit {
    fn name(&self) -> &str {
        "Hit"
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        ctx.data.is_under_attack = false;
        ctx.data.has_recovered_from_hit = false;
        ctx.data.action_movement_multiplier = 0.0;
        ctx.data.rotation_speed_multiplier = 0.0;
        ctx.animator.cross_fade(ctx.params.hit_clip, 0.05);
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        ctx.data.action_movement_multiplier = 1.0;
        ctx.data.rotation_speed_multiplier = 1.0;
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        common::movement_tick(ctx);
    }

    fn physics_tick(&mut self, ctx: &mut StateContext) {
        common::movement_physics_tick(ctx);
    }

    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        if event == AnimationEvent::Exit {
            ctx.data.has_recovered_from_hit = true;
        }
    }
}
