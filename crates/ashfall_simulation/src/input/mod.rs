//! Input snapshot components.
//!
//! The input layer (engine bindings, AI driver, or a test script) writes
//! these once per frame; the intake system copies them onto the blackboard.
//! Явная передача данных вместо глобального event bus: state machine
//! никогда не лезет во внешние менеджеры сама.

use bevy::prelude::*;

/// Per-frame control snapshot for one character.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Stick/WASD vector, unnormalized, each axis in [-1, 1].
    pub movement: Vec2,
    /// Level-triggered: held while the jump key is down.
    pub jump: bool,
    /// Level-triggered sprint key.
    pub sprint: bool,
    /// Toggle: prefer walking over running at low intent.
    pub prefer_walk: bool,
    /// Edge-triggered: true only on the frame the attack key was pressed.
    /// Intake converts it into a buffered signal with a decay window.
    pub attack_pressed: bool,
}

/// World-space aim point resolved by the input layer (cursor raycast,
/// gamepad projection, whatever the platform does).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AimInput {
    pub world_point: Vec3,
}

/// Camera yaw in degrees, used to make movement input camera-relative.
/// The camera rig itself is out of scope; it just publishes this.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraYaw(pub f32);
