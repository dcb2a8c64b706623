//! Leaf states of the character tree.
//!
//! Shared movement behavior lives in `common` as free functions; leaves
//! stay small and only decide *policy* (target modifier, rotation mode,
//! which animation to drive).

pub mod airborne;
pub mod combat;
pub mod common;
pub mod grounded;

#[cfg(test)]
mod combat_tests;
