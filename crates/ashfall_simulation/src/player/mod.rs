//! Player character control: hierarchical state tree over a shared
//! blackboard, driven by ECS systems.

pub mod context;
pub mod data;
pub mod machine;
pub mod machines;
pub mod root;
pub mod rotation;
pub mod states;
pub mod systems;

pub use context::StateContext;
pub use data::{AttackBuffer, PlayerStateData, RotationMode};
pub use machine::{resolve_leaf_mut, StateMachine, StateNode, Transition};
pub use root::PlayerHfsm;
pub use systems::{Player, PlayerPlugin};

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod data_tests;
#[cfg(test)]
pub(crate) mod test_util;
