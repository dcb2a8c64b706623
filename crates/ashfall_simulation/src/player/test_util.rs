//! Общий стенд для unit-тестов состояний: блэкборд, тело и записывающий
//! аниматор без ECS.

use bevy::prelude::*;

use crate::animation::{AnimationParams, RecordingAnimator};
use crate::combat::CombatNotice;
use crate::config::PlayerConfig;
use crate::physics::PhysicsBody;
use crate::player::context::StateContext;
use crate::player::data::PlayerStateData;
use crate::player::machine::StateNode;

pub struct TestRig {
    pub data: PlayerStateData,
    pub body: PhysicsBody,
    pub animator: RecordingAnimator,
    pub params: AnimationParams,
    pub config: PlayerConfig,
    pub notices: Vec<CombatNotice>,
    pub body_position: Vec3,
    pub camera_yaw: f32,
    pub now: f32,
    pub dt: f32,
}

impl TestRig {
    pub fn new() -> Self {
        Self {
            data: PlayerStateData::default(),
            body: PhysicsBody::default(),
            animator: RecordingAnimator::default(),
            params: AnimationParams::default(),
            config: PlayerConfig::default(),
            notices: Vec::new(),
            body_position: Vec3::ZERO,
            camera_yaw: 0.0,
            now: 0.0,
            dt: 1.0 / 60.0,
        }
    }

    pub fn ctx(&mut self) -> StateContext<'_> {
        StateContext {
            data: &mut self.data,
            body: &mut self.body,
            animator: &mut self.animator,
            params: &self.params,
            config: &self.config,
            notices: &mut self.notices,
            body_position: self.body_position,
            camera_yaw: self.camera_yaw,
            dt: self.dt,
            now: self.now,
        }
    }

    /// Один логический тик с продвижением часов.
    pub fn tick(&mut self, node: &mut dyn StateNode) {
        self.now += self.dt;
        let mut ctx = self.ctx();
        node.tick(&mut ctx);
    }

    pub fn physics_tick(&mut self, node: &mut dyn StateNode) {
        let mut ctx = self.ctx();
        node.physics_tick(&mut ctx);
    }
}
