//! Wiring of the character tree: which leaves live in which machine and
//! the transition tables between them.
//!
//! All the behavior lives in the leaves and hooks; this module is pure
//! configuration and the single place to read the whole graph.

use crate::player::context::StateContext;
use crate::player::data::RotationMode;
use crate::player::machine::StateMachine;
use crate::player::states::{airborne, combat, grounded};

fn has_move_input(ctx: &StateContext) -> bool {
    ctx.data.movement_input.length() > ctx.config.grounded.movement_input_threshold
}

fn fast_fall(ctx: &StateContext) -> bool {
    ctx.data.peak_fall_speed < -ctx.config.airborne.fast_fall_threshold
}

/// Top of the tree: grounded vs airborne.
///
/// Returning to ground waits for `has_finished_airborne`, so a landing
/// animation always plays out before ground control resumes.
pub fn environment_machine() -> StateMachine {
    StateMachine::new("environment")
        .add_boxed_state("grounded", Box::new(grounded_machine()))
        .add_boxed_state("airborne", Box::new(airborne_machine()))
        .start_at("grounded")
        .add_transition("grounded", "airborne", |ctx| !ctx.data.is_grounded)
        .add_transition("airborne", "grounded", |ctx| {
            ctx.data.is_grounded && ctx.data.has_finished_airborne
        })
}

/// Ground layer: locomotion leaves plus the combat and hit sub-machines.
///
/// Declaration order is interrupt priority: the hit reaction preempts
/// everything, combat entry preempts locomotion shuffling.
pub fn grounded_machine() -> StateMachine {
    StateMachine::new("grounded")
        .add_state("Idle", grounded::Idle)
        .add_state("Walk", grounded::Walk)
        .add_state("Run", grounded::Run)
        .add_state("Sprint", grounded::Sprint)
        .add_state("JumpStart", grounded::JumpStart)
        .add_boxed_state("attack", Box::new(attack_machine()))
        .add_boxed_state("hit", Box::new(hit_machine()))
        .start_at("Idle")
        .with_enter_hook(|ctx| {
            ctx.data.can_jump = true;
            ctx.animator.set_bool(ctx.params.grounded, true);
        })
        .with_exit_hook(|ctx| {
            ctx.animator.set_bool(ctx.params.grounded, false);
        })
        // Hit reaction interrupts everything, including mid-combo.
        .add_transition("Idle", "hit", |ctx| ctx.data.is_under_attack)
        .add_transition("Walk", "hit", |ctx| ctx.data.is_under_attack)
        .add_transition("Run", "hit", |ctx| ctx.data.is_under_attack)
        .add_transition("Sprint", "hit", |ctx| ctx.data.is_under_attack)
        .add_transition("attack", "hit", |ctx| ctx.data.is_under_attack)
        .add_transition("hit", "Idle", |ctx| ctx.data.has_recovered_from_hit)
        // Combat entry requires both buffered intent and a usable weapon;
        // unarmed presses simply expire in the buffer.
        .add_transition("Idle", "attack", |ctx| ctx.data.attack_serviceable(ctx.now))
        .add_transition("Walk", "attack", |ctx| ctx.data.attack_serviceable(ctx.now))
        .add_transition("Run", "attack", |ctx| ctx.data.attack_serviceable(ctx.now))
        .add_transition("Sprint", "attack", |ctx| ctx.data.attack_serviceable(ctx.now))
        .add_transition("attack", "Idle", |ctx| ctx.data.attack_combo_window_finished)
        // Jump kick-off.
        .add_transition("Idle", "JumpStart", |ctx| ctx.data.jump_input && ctx.data.can_jump)
        .add_transition("Walk", "JumpStart", |ctx| ctx.data.jump_input && ctx.data.can_jump)
        .add_transition("Run", "JumpStart", |ctx| ctx.data.jump_input && ctx.data.can_jump)
        .add_transition("Sprint", "JumpStart", |ctx| {
            ctx.data.jump_input && ctx.data.can_jump
        })
        .add_transition("JumpStart", "Idle", |ctx| !ctx.data.jump_input)
        // Locomotion shuffle.
        .add_transition("Idle", "Sprint", |ctx| has_move_input(ctx) && ctx.data.is_sprinting)
        .add_transition("Idle", "Walk", |ctx| has_move_input(ctx) && ctx.data.prefer_walk)
        .add_transition("Idle", "Run", has_move_input)
        .add_transition("Walk", "Idle", |ctx| !has_move_input(ctx))
        .add_transition("Walk", "Sprint", |ctx| ctx.data.is_sprinting)
        .add_transition("Walk", "Run", |ctx| !ctx.data.prefer_walk)
        .add_transition("Run", "Idle", |ctx| !has_move_input(ctx))
        .add_transition("Run", "Sprint", |ctx| ctx.data.is_sprinting)
        .add_transition("Run", "Walk", |ctx| ctx.data.prefer_walk)
        .add_transition("Sprint", "Idle", |ctx| !has_move_input(ctx))
        .add_transition("Sprint", "Walk", |ctx| {
            !ctx.data.is_sprinting && ctx.data.prefer_walk
        })
        .add_transition("Sprint", "Run", |ctx| !ctx.data.is_sprinting)
}

/// Air layer. Entered at Jump even for walked-off ledges; the fall
/// detection rule drops straight through on the first tick in that case.
pub fn airborne_machine() -> StateMachine {
    StateMachine::new("airborne")
        .add_state("Jump", airborne::Jump)
        .add_state("Fall", airborne::Fall)
        .add_state("LightLand", airborne::LightLand)
        .add_state("HardLand", airborne::HardLand)
        .add_state("RollLand", airborne::RollLand)
        .start_at("Jump")
        .with_enter_hook(|ctx| {
            ctx.data.has_finished_airborne = false;
            ctx.data.peak_fall_speed = 0.0;
            ctx.data.can_jump = false;
        })
        // Track the most negative vertical speed for landing classification.
        .with_logic_hook(|ctx| {
            if ctx.body.velocity.y < ctx.data.peak_fall_speed {
                ctx.data.peak_fall_speed = ctx.body.velocity.y;
            }
        })
        .add_transition("Jump", "Fall", |ctx| {
            ctx.body.velocity.y < -ctx.config.airborne.fall_detection_speed
                || ctx.data.is_grounded
        })
        // Landing classification, most severe first.
        .add_transition("Fall", "RollLand", |ctx| {
            ctx.data.is_grounded && fast_fall(ctx) && has_move_input(ctx)
        })
        .add_transition("Fall", "HardLand", |ctx| ctx.data.is_grounded && fast_fall(ctx))
        .add_transition("Fall", "LightLand", |ctx| ctx.data.is_grounded)
}

/// Melee combo loop. The enter hook opens a fresh combo session; the exit
/// hook guarantees mobility and the neutral pose come back no matter how
/// the machine was left (combo retired, hit reaction, knocked airborne).
pub fn attack_machine() -> StateMachine {
    StateMachine::new("attack")
        .add_state("AttackIdle", combat::AttackIdle)
        .add_state("Windup", combat::Windup)
        .add_state("Swing", combat::Swing)
        .add_state("Recovery", combat::Recovery)
        .start_at("AttackIdle")
        .with_enter_hook(|ctx| {
            ctx.data.reset_combat_flags();
            ctx.data.combo_index = 0;
            ctx.data.can_jump = false;
            ctx.animator.set_bool(ctx.params.in_combat, true);
        })
        .with_exit_hook(|ctx| {
            ctx.data.reset_combat_flags();
            ctx.data.combo_index = 0;
            ctx.data.is_attacking_action = false;
            ctx.data.can_jump = true;
            ctx.data.action_movement_multiplier = 1.0;
            ctx.data.rotation_speed_multiplier = 1.0;
            ctx.data.rotation_mode = RotationMode::OrientToMovement;
            ctx.animator.set_bool(ctx.params.in_combat, false);
            ctx.animator.cross_fade(ctx.params.neutral_clip, 0.1);
        })
        .add_transition("AttackIdle", "Windup", |ctx| {
            ctx.data.attack_serviceable(ctx.now)
        })
        .add_transition("Windup", "Swing", |ctx| ctx.data.attack_windup_finished)
        .add_transition("Swing", "Recovery", |ctx| ctx.data.attack_swing_finished)
        // Chain: only while a further step exists; Recovery's exit advances
        // the index, so compare against the next one.
        .add_transition("Recovery", "Windup", |ctx| {
            ctx.data.attack_buffer.wants_attack(ctx.now)
                && ctx.data.combo_index + 1 < ctx.data.combo_len()
        })
}

/// Hit-reaction layer. A single leaf today, a machine so stagger levels
/// can slot in alongside it.
pub fn hit_machine() -> StateMachine {
    StateMachine::new("hit")
        .add_state("Hit", combat::Hit)
        .start_at("Hit")
}
