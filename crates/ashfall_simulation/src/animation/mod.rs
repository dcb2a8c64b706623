//! Animation seam between the state machine and the engine's player.
//!
//! The simulation never talks to a concrete animation system. States write
//! named parameters and cross-fade requests through `AnimationDriver`; the
//! engine layer implements it over its animator, and completion callbacks
//! come back as `AnimationCallback` events routed to the active leaf.
//!
//! Flow:
//!
//! ```text
//! state tick ──set_bool/set_float/cross_fade──▶ AnimationDriver (engine)
//! engine clip events ──AnimationCallback──▶ root HFSM ──▶ active leaf
//! ```

use bevy::prelude::*;

/// Parameter writes and clip control the states are allowed to issue.
///
/// Implementations must be cheap to call every frame; the engine side is
/// expected to dedupe redundant writes itself.
pub trait AnimationDriver: Send + Sync {
    fn set_bool(&mut self, param: &str, value: bool);
    fn set_float(&mut self, param: &str, value: f32);
    fn set_int(&mut self, param: &str, value: i32);
    fn set_trigger(&mut self, param: &str);
    fn cross_fade(&mut self, clip: &str, blend_duration: f32);
}

/// Animator parameter names, grouped the way the animation controller
/// groups its layers. Kept as data so clips can be re-authored without
/// touching state code.
#[derive(Component, Debug, Clone)]
pub struct AnimationParams {
    // State group
    pub grounded: &'static str,
    pub landing: &'static str,

    // Grounded
    pub speed: &'static str,

    // Airborne
    pub jump: &'static str,
    pub fall: &'static str,
    pub roll: &'static str,
    pub hard_land: &'static str,

    // Combat
    pub in_combat: &'static str,
    /// Neutral clip the attack machine cross-fades to on exit.
    pub neutral_clip: &'static str,
    /// Hit-reaction clip.
    pub hit_clip: &'static str,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            grounded: "Grounded",
            landing: "Landing",
            speed: "Speed",
            jump: "isJumping",
            fall: "isFalling",
            roll: "isRolling",
            hard_land: "isHardLanding",
            in_combat: "isInCombat",
            neutral_clip: "Null",
            hit_clip: "Hit_Light",
        }
    }
}

/// Completion signals from the animation player. Edge-triggered: the
/// receiving leaf sets a flag, the next logic tick consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A tagged animation state was entered.
    Enter,
    /// A tagged animation state exited (landing clips end on this).
    Exit,
    /// The animator started a transition between tagged states.
    Transition,
    /// Attack windup portion of the current clip finished.
    WindupFinished,
    /// Attack swing portion finished.
    SwingFinished,
    /// The combo input window closed.
    ComboWindowOver,
}

/// Engine → simulation animation callback, routed to the entity's HFSM.
///
/// `mid_transition` mirrors the animator's "is transitioning" flag at fire
/// time; stale callbacks from a layer that is already blending away are
/// dropped by the routing system instead of poking the machine.
#[derive(Event, Debug, Clone)]
pub struct AnimationCallback {
    pub entity: Entity,
    pub event: AnimationEvent,
    pub mid_transition: bool,
}

/// Component wrapper owning the engine-facing driver.
#[derive(Component)]
pub struct Animator {
    pub driver: Box<dyn AnimationDriver>,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            driver: Box::new(NullAnimator),
        }
    }
}

impl Animator {
    pub fn new(driver: Box<dyn AnimationDriver>) -> Self {
        Self { driver }
    }
}

/// Driver that swallows everything. Default for headless runs where no
/// animation backend exists.
pub struct NullAnimator;

impl AnimationDriver for NullAnimator {
    fn set_bool(&mut self, _param: &str, _value: bool) {}
    fn set_float(&mut self, _param: &str, _value: f32) {}
    fn set_int(&mut self, _param: &str, _value: i32) {}
    fn set_trigger(&mut self, _param: &str) {}
    fn cross_fade(&mut self, _clip: &str, _blend_duration: f32) {}
}

/// Driver that records every write, for asserting animation side effects
/// in tests.
#[derive(Default)]
pub struct RecordingAnimator {
    pub bools: Vec<(String, bool)>,
    pub floats: Vec<(String, f32)>,
    pub ints: Vec<(String, i32)>,
    pub triggers: Vec<String>,
    pub cross_fades: Vec<(String, f32)>,
}

impl RecordingAnimator {
    pub fn last_bool(&self, param: &str) -> Option<bool> {
        self.bools
            .iter()
            .rev()
            .find(|(name, _)| name == param)
            .map(|(_, value)| *value)
    }

    pub fn last_cross_fade(&self) -> Option<&str> {
        self.cross_fades.last().map(|(clip, _)| clip.as_str())
    }
}

impl AnimationDriver for RecordingAnimator {
    fn set_bool(&mut self, param: &str, value: bool) {
        self.bools.push((param.to_string(), value));
    }

    fn set_float(&mut self, param: &str, value: f32) {
        self.floats.push((param.to_string(), value));
    }

    fn set_int(&mut self, param: &str, value: i32) {
        self.ints.push((param.to_string(), value));
    }

    fn set_trigger(&mut self, param: &str) {
        self.triggers.push(param.to_string());
    }

    fn cross_fade(&mut self, clip: &str, blend_duration: f32) {
        self.cross_fades.push((clip.to_string(), blend_duration));
    }
}
