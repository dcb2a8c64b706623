//! Combat data and the seam to the damage layer.
//!
//! ECS responsibility here is deliberately narrow:
//! - `WeaponConfig`: the immutable combo-step table the attack machine reads
//! - `HitWindowOpened` / `HitWindowClosed`: events the Swing state emits
//!
//! Damage application, hitbox collision and attribute math belong to the
//! combat collaborator (engine side); it answers back by writing the
//! `is_under_attack` / `has_recovered_from_hit` flags on the blackboard.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod weapon_tests;

/// One step of a melee combo: animation, timing and force data.
///
/// The animation clip carries the real durations; the timings here define
/// the *logic* windows, which are hand-tuned rather than derived — feel
/// survives clip swaps that way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackStep {
    /// Animation clip id the windup cross-fades to.
    pub animation: String,
    /// Cross-fade blend duration (seconds).
    pub cross_fade_duration: f32,

    /// Seconds into the step when the hit window opens (windup ends).
    pub damage_active_time: f32,
    /// Seconds into the step when the hit window closes (swing ends).
    pub damage_end_time: f32,
    /// Seconds until the whole step is over.
    pub recovery_time: f32,

    /// Damage scale for this step, applied by the combat collaborator.
    pub damage_multiplier: f32,
    /// Movement allowance during windup (0 = rooted, 1 = free).
    pub movement_multiplier: f32,
    /// Turn-rate allowance during windup (0 = locked).
    pub rotation_multiplier: f32,
    /// One-shot impulse in local space, fired on swing start
    /// (forward lunges, upward launchers).
    pub impulse: Vec3,
}

/// Ordered combo-step table for one weapon. Immutable at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    /// Index 0 is the combo opener; the list length is the combo cap.
    pub combo_steps: Vec<AttackStep>,
}

impl WeaponConfig {
    /// Step for a combo index, clamped to the last entry.
    /// `None` only when the table is empty.
    pub fn step(&self, index: usize) -> Option<&AttackStep> {
        if self.combo_steps.is_empty() {
            return None;
        }
        Some(&self.combo_steps[index.min(self.combo_steps.len() - 1)])
    }

    pub fn combo_len(&self) -> usize {
        self.combo_steps.len()
    }

    /// Three-hit starter sword used by tests and the headless demo.
    pub fn training_sword() -> Self {
        Self {
            name: "Training Sword".to_string(),
            combo_steps: vec![
                AttackStep {
                    animation: "Attack_0".to_string(),
                    cross_fade_duration: 0.1,
                    damage_active_time: 0.25,
                    damage_end_time: 0.45,
                    recovery_time: 0.8,
                    damage_multiplier: 1.0,
                    movement_multiplier: 0.0,
                    rotation_multiplier: 0.3,
                    impulse: Vec3::new(0.0, 0.0, 1.5),
                },
                AttackStep {
                    animation: "Attack_1".to_string(),
                    cross_fade_duration: 0.1,
                    damage_active_time: 0.2,
                    damage_end_time: 0.4,
                    recovery_time: 0.75,
                    damage_multiplier: 1.1,
                    movement_multiplier: 0.0,
                    rotation_multiplier: 0.3,
                    impulse: Vec3::new(0.0, 0.0, 2.0),
                },
                AttackStep {
                    animation: "Attack_2".to_string(),
                    cross_fade_duration: 0.15,
                    damage_active_time: 0.3,
                    damage_end_time: 0.55,
                    recovery_time: 1.0,
                    damage_multiplier: 1.5,
                    movement_multiplier: 0.0,
                    rotation_multiplier: 0.15,
                    impulse: Vec3::new(0.0, 0.5, 3.0),
                },
            ],
        }
    }
}

/// Event: the swing state opened its hit-detection window.
///
/// The combat collaborator enables the weapon hitbox and applies
/// `damage_multiplier` to whatever it hits while the window is open.
#[derive(Event, Debug, Clone)]
pub struct HitWindowOpened {
    pub attacker: Entity,
    pub combo_index: usize,
    pub damage_multiplier: f32,
}

/// Event: the swing state closed its hit-detection window.
#[derive(Event, Debug, Clone)]
pub struct HitWindowClosed {
    pub attacker: Entity,
}

/// Notices a state raises during a tick, drained into Bevy events by the
/// driving system. States never hold `EventWriter`s directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatNotice {
    HitWindowOpened {
        combo_index: usize,
        damage_multiplier: f32,
    },
    HitWindowClosed,
}
