//! Tuning data for the player character.
//!
//! Everything the state machine reads as a constant lives here so design can
//! iterate on handling without touching state code. Loaded from serialized
//! assets in production; `Default` is the in-repo tuning used by tests and
//! the headless demo.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-character tuning, immutable at runtime.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub grounded: GroundedConfig,
    pub airborne: AirborneConfig,
    pub rotation: RotationConfig,

    /// How long a buffered attack press stays valid (seconds).
    pub input_buffer_window: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            grounded: GroundedConfig::default(),
            airborne: AirborneConfig::default(),
            rotation: RotationConfig::default(),
            input_buffer_window: 0.5,
        }
    }
}

/// Ground locomotion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedConfig {
    /// Base speed in m/s; leaf states scale it through their modifiers.
    pub base_speed: f32,
    /// Speed modifier targets per locomotion leaf.
    pub idle_speed_modifier: f32,
    pub walk_speed_modifier: f32,
    pub run_speed_modifier: f32,
    pub sprint_speed_modifier: f32,
    /// Units of modifier per second when blending toward the target.
    pub speed_modifier_transition_rate: f32,
    /// Movement-input magnitude below which the stick is considered idle.
    pub movement_input_threshold: f32,
}

impl Default for GroundedConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            idle_speed_modifier: 0.0,
            walk_speed_modifier: 0.45,
            run_speed_modifier: 1.0,
            sprint_speed_modifier: 1.35,
            speed_modifier_transition_rate: 4.0,
            movement_input_threshold: 0.1,
        }
    }
}

/// Airborne tuning: jump impulse, fall clamping, landing classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirborneConfig {
    /// Applied as a velocity change on jump start.
    pub jump_force: Vec3,
    /// Speed modifier while rising/falling (air control strength).
    pub fall_speed_modifier: f32,
    /// Downward speed clamp (m/s, positive number).
    pub fall_speed_limit: f32,
    /// Peak downward speed beyond which a landing counts as a fast fall
    /// (m/s, positive number). Fast fall + movement input = roll,
    /// fast fall + no input = hard landing.
    pub fast_fall_threshold: f32,
    /// Vertical speed below which rising flips to falling (m/s).
    pub fall_detection_speed: f32,
}

impl Default for AirborneConfig {
    fn default() -> Self {
        Self {
            jump_force: Vec3::new(0.0, 6.0, 0.0),
            fall_speed_modifier: 1.0,
            fall_speed_limit: 10.0,
            fast_fall_threshold: 7.0,
            fall_detection_speed: 0.1,
        }
    }
}

/// Rotation damping tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Seconds to reach the target yaw at multiplier 1.0.
    pub reach_time: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { reach_time: 0.14 }
    }
}
