//! Per-tick view handed to every state.
//!
//! Borrowed fresh each tick from the entity's components by the driving
//! systems, so states never store references or entity handles themselves.

use bevy::prelude::*;

use crate::animation::{AnimationDriver, AnimationParams};
use crate::combat::CombatNotice;
use crate::config::PlayerConfig;
use crate::physics::PhysicsBody;
use crate::player::data::PlayerStateData;

pub struct StateContext<'a> {
    pub data: &'a mut PlayerStateData,
    pub body: &'a mut PhysicsBody,
    pub animator: &'a mut dyn AnimationDriver,
    pub params: &'a AnimationParams,
    pub config: &'a PlayerConfig,
    /// Notices drained into Bevy events after the tick.
    pub notices: &'a mut Vec<CombatNotice>,
    /// World position of the body this tick.
    pub body_position: Vec3,
    /// Camera yaw in degrees, to make movement input camera-relative.
    pub camera_yaw: f32,
    /// Duration of this tick (variable for logic, fixed for physics).
    pub dt: f32,
    /// Elapsed simulation time in seconds.
    pub now: f32,
}
