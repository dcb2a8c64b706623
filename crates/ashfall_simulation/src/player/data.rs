//! Shared per-character state ("blackboard").
//!
//! Every state reads and writes this one record. It is owned by the
//! character entity, created once at spawn, and never copied or pooled —
//! the machines keep themselves consistent by all looking at the same data.
//! It is deliberately NOT global: two characters means two blackboards with
//! zero shared mutable state.

use std::sync::Arc;

use bevy::prelude::*;

use crate::combat::{AttackStep, WeaponConfig};

/// Which way the body turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Face the movement input, camera-relative (exploration).
    #[default]
    OrientToMovement,
    /// Face the world-space aim point (combat).
    OrientToCursor,
}

/// Buffered attack intent: a timestamp, not a boolean.
///
/// A press stays "wanted" for `window` seconds, so an input landing a few
/// frames before Recovery opens still chains the combo. Consuming the
/// signal expires the timestamp; there is no queue to drain. The clock is
/// injected (`now`), which keeps the buffer frame-rate independent and
/// trivially testable.
#[derive(Debug, Clone, Copy)]
pub struct AttackBuffer {
    last_signal_time: f32,
    window: f32,
}

/// Sentinel meaning "no unexpired signal".
const EXPIRED: f32 = -999.0;

impl AttackBuffer {
    pub fn new(window: f32) -> Self {
        Self {
            last_signal_time: EXPIRED,
            window,
        }
    }

    /// Record an attack press at time `now`.
    pub fn signal(&mut self, now: f32) {
        self.last_signal_time = now;
    }

    /// True while an unconsumed signal is inside the buffer window.
    pub fn wants_attack(&self, now: f32) -> bool {
        now - self.last_signal_time <= self.window
    }

    /// Consume the signal (the attack actually started).
    pub fn consume(&mut self) {
        self.last_signal_time = EXPIRED;
    }
}

impl Default for AttackBuffer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// The blackboard. Field groups mirror who writes them: input intake,
/// locomotion states, the airborne machine, the combat machines, the
/// rotation resolver.
#[derive(Component, Debug, Clone)]
pub struct PlayerStateData {
    // === Input snapshot (written by intake, read by everyone) ===
    pub movement_input: Vec2,
    pub jump_input: bool,
    pub is_sprinting: bool,
    pub prefer_walk: bool,
    pub attack_buffer: AttackBuffer,

    // === Locomotion ===
    /// Smoothed throttle: blends toward `target_movement_speed_modifier`.
    pub movement_speed_modifier: f32,
    /// Set by the active locomotion leaf.
    pub target_movement_speed_modifier: f32,
    /// Brake applied by actions: attacks set 0 (rooted) or a fraction.
    /// Takes effect immediately, no blending.
    pub action_movement_multiplier: f32,
    pub can_move: bool,
    pub can_jump: bool,
    /// Horizontal speed published for animation.
    pub current_speed: f32,
    /// Vertical speed published for animation.
    pub vertical_speed: f32,

    // === Ground / air flags ===
    pub is_grounded: bool,
    pub is_jumping: bool,
    /// Landing animation finished; the environment machine may return to
    /// grounded. Set by landing leaves on their animation exit event only.
    pub has_finished_airborne: bool,
    /// Most negative vertical velocity since the airborne machine was
    /// entered. Classifies the landing (light / hard / roll).
    pub peak_fall_speed: f32,

    // === Combat ===
    pub combo_index: usize,
    pub attack_windup_finished: bool,
    pub attack_swing_finished: bool,
    pub attack_combo_window_finished: bool,
    pub is_attacking_action: bool,
    /// Written by the combat collaborator when a hit lands on us.
    pub is_under_attack: bool,
    /// Written by the combat collaborator when the hit reaction may end.
    pub has_recovered_from_hit: bool,
    /// Immutable combo table of the equipped weapon. `None` = unarmed:
    /// attack intent simply stays unserviceable.
    pub weapon: Option<Arc<WeaponConfig>>,

    // === Rotation ===
    pub rotation_mode: RotationMode,
    /// 1.0 = normal turn rate, 0.0 = locked.
    pub rotation_speed_multiplier: f32,
    /// Target yaw in degrees. Only rewritten when it actually changes.
    pub target_yaw: f32,
    /// Damping velocity carried across frames by the spring smoother.
    pub rotation_damp_velocity: f32,
    /// Seconds since the target yaw last changed. Reset exactly on target
    /// change so the spring restarts cleanly, never on redundant writes.
    pub rotation_damp_elapsed: f32,
    /// World-space aim point, maintained by the input layer.
    pub aim_world_point: Vec3,

    // === Published for debugging / HUD ===
    /// Full path of the active state, e.g. "environment/grounded/Idle".
    pub current_state_path: String,
}

impl Default for PlayerStateData {
    fn default() -> Self {
        Self {
            movement_input: Vec2::ZERO,
            jump_input: false,
            is_sprinting: false,
            prefer_walk: false,
            attack_buffer: AttackBuffer::default(),

            movement_speed_modifier: 0.0,
            target_movement_speed_modifier: 0.0,
            action_movement_multiplier: 1.0,
            can_move: true,
            can_jump: true,
            current_speed: 0.0,
            vertical_speed: 0.0,

            is_grounded: true,
            is_jumping: false,
            has_finished_airborne: false,
            peak_fall_speed: 0.0,

            combo_index: 0,
            attack_windup_finished: false,
            attack_swing_finished: false,
            attack_combo_window_finished: false,
            is_attacking_action: false,
            is_under_attack: false,
            has_recovered_from_hit: false,
            weapon: None,

            rotation_mode: RotationMode::OrientToMovement,
            rotation_speed_multiplier: 1.0,
            target_yaw: 0.0,
            rotation_damp_velocity: 0.0,
            rotation_damp_elapsed: 0.0,
            aim_world_point: Vec3::ZERO,

            current_state_path: String::new(),
        }
    }
}

impl PlayerStateData {
    /// The one value the movement physics reads:
    /// throttle (smoothed) times action gate (instant). At zero the
    /// controller stops steering entirely.
    pub fn final_move_speed_modifier(&self) -> f32 {
        self.movement_speed_modifier * self.action_movement_multiplier
    }

    /// Combo step for the current index, clamped to the table end.
    /// `None` when unarmed or the table is empty — the caller must then
    /// skip animation, impulse and index advancement entirely.
    pub fn current_attack_step(&self) -> Option<AttackStep> {
        self.weapon
            .as_ref()
            .and_then(|weapon| weapon.step(self.combo_index).cloned())
    }

    /// True when an attack could actually start right now: buffered intent
    /// plus a resolvable combo step.
    pub fn attack_serviceable(&self, now: f32) -> bool {
        self.attack_buffer.wants_attack(now) && self.current_attack_step().is_some()
    }

    pub fn combo_len(&self) -> usize {
        self.weapon.as_ref().map_or(0, |weapon| weapon.combo_len())
    }

    /// Reset the attack phase flags. Does NOT touch the attack buffer —
    /// that belongs to the input side.
    pub fn reset_combat_flags(&mut self) {
        self.attack_windup_finished = false;
        self.attack_swing_finished = false;
        self.attack_combo_window_finished = false;
    }
}
