//! Root coordinator: owns the state tree and is the only thing the ECS
//! systems talk to.

use bevy::prelude::*;

use crate::animation::AnimationEvent;
use crate::logger::log_warning;
use crate::player::context::StateContext;
use crate::player::machine::{resolve_leaf_mut, StateMachine, StateNode};
use crate::player::machines::environment_machine;

/// The character's state tree, stored as a component on the entity.
#[derive(Component)]
pub struct PlayerHfsm {
    environment: StateMachine,
}

impl Default for PlayerHfsm {
    fn default() -> Self {
        Self {
            environment: environment_machine(),
        }
    }
}

impl PlayerHfsm {
    /// Logic-rate tick: transitions plus the active leaf's behavior.
    /// Publishes the active path to the blackboard afterwards.
    pub fn tick(&mut self, ctx: &mut StateContext) {
        self.environment.tick(ctx);
        ctx.data.current_state_path = self.environment.state_path();
    }

    /// Fixed-rate tick, forwarded down the active chain. Never transitions.
    pub fn physics_tick(&mut self, ctx: &mut StateContext) {
        self.environment.physics_tick(ctx);
    }

    /// Deliver an animation signal to the active leaf. Before the first
    /// tick there is no leaf; the signal is dropped with a warning rather
    /// than poking a half-built tree.
    pub fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        match resolve_leaf_mut(&mut self.environment) {
            Some(leaf) => leaf.handle_animation_event(ctx, event),
            None => log_warning(&format!(
                "🎬 animation event {:?} arrived before the state tree started, dropped",
                event
            )),
        }
    }

    pub fn current_state_path(&self) -> String {
        self.environment.state_path()
    }
}
