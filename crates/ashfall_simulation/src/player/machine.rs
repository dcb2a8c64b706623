//! Hierarchical state machine core.
//!
//! A machine is itself a state, so machines nest: the environment machine
//! holds the grounded and airborne machines, the grounded machine holds the
//! attack and hit machines. Exactly one child is active per machine, which
//! gives exactly one active *leaf* per character.
//!
//! Transition rules are checked in declaration order every logic tick,
//! before the active child runs. Order IS priority: a hit-reaction rule
//! declared first preempts a combat rule declared later, with no separate
//! priority numbers to keep in sync.

use crate::animation::AnimationEvent;
use crate::logger::log;
use crate::player::context::StateContext;

/// Node of the state tree: either a leaf behavior or a nested machine.
///
/// All methods take the shared [`StateContext`]; nodes keep no per-tick
/// state of their own beyond what the blackboard holds.
pub trait StateNode: Send + Sync {
    /// Short name used in state paths and transition logs.
    fn name(&self) -> &str;

    fn on_enter(&mut self, _ctx: &mut StateContext) {}

    fn on_exit(&mut self, _ctx: &mut StateContext) {}

    /// Variable-rate logic tick.
    fn tick(&mut self, _ctx: &mut StateContext) {}

    /// Fixed-rate physics tick.
    fn physics_tick(&mut self, _ctx: &mut StateContext) {}

    /// Animation completion signal, delivered to the active leaf only.
    ///
    /// The default turns phase signals into blackboard flags so that most
    /// leaves never have to override this.
    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        match event {
            AnimationEvent::WindupFinished => ctx.data.attack_windup_finished = true,
            AnimationEvent::SwingFinished => ctx.data.attack_swing_finished = true,
            AnimationEvent::ComboWindowOver => ctx.data.attack_combo_window_finished = true,
            _ => {}
        }
    }

    /// True for nested machines. Leaves keep the default.
    fn is_composite(&self) -> bool {
        false
    }

    /// Active child of a composite, `None` for leaves.
    fn active_child_mut(&mut self) -> Option<&mut (dyn StateNode + '_)> {
        None
    }

    /// Path of this node and its active descendants. Leaves report their
    /// own name; machines append their active child's registration name.
    fn state_path(&self) -> String {
        self.name().to_string()
    }
}

/// Edge of the transition graph. `condition` is a pure read of the context.
pub struct Transition {
    pub from: &'static str,
    pub to: &'static str,
    pub condition: fn(&StateContext) -> bool,
}

/// A composite state: named children plus an ordered transition list.
///
/// Optional hooks let a parent configure behavior without subclassing:
/// `enter_hook`/`exit_hook` run around the machine's own activation (the
/// attack machine resets combo bookkeeping there), `logic_hook` runs every
/// tick before transitions (the airborne machine tracks peak fall speed).
pub struct StateMachine {
    name: &'static str,
    states: Vec<(&'static str, Box<dyn StateNode>)>,
    transitions: Vec<Transition>,
    active: usize,
    start: usize,
    entered: bool,
    pub enter_hook: Option<fn(&mut StateContext)>,
    pub exit_hook: Option<fn(&mut StateContext)>,
    pub logic_hook: Option<fn(&mut StateContext)>,
}

impl StateMachine {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            states: Vec::new(),
            transitions: Vec::new(),
            active: 0,
            start: 0,
            entered: false,
            enter_hook: None,
            exit_hook: None,
            logic_hook: None,
        }
    }

    pub fn add_state(self, name: &'static str, state: impl StateNode + 'static) -> Self {
        self.add_boxed_state(name, Box::new(state))
    }

    pub fn add_boxed_state(mut self, name: &'static str, state: Box<dyn StateNode>) -> Self {
        // Registration names are the path vocabulary; a nested machine
        // must be registered under its own name or the two diverge.
        debug_assert!(
            !state.is_composite() || state.name() == name,
            "machine '{}' registered as '{}'",
            state.name(),
            name
        );
        self.states.push((name, state));
        self
    }

    /// Declare a transition. Call order defines interrupt priority.
    pub fn add_transition(
        mut self,
        from: &'static str,
        to: &'static str,
        condition: fn(&StateContext) -> bool,
    ) -> Self {
        self.transitions.push(Transition {
            from,
            to,
            condition,
        });
        self
    }

    /// State the machine (re)starts in on every entry.
    pub fn start_at(mut self, name: &'static str) -> Self {
        self.start = self.index_of(name);
        self
    }

    pub fn with_enter_hook(mut self, hook: fn(&mut StateContext)) -> Self {
        self.enter_hook = Some(hook);
        self
    }

    pub fn with_exit_hook(mut self, hook: fn(&mut StateContext)) -> Self {
        self.exit_hook = Some(hook);
        self
    }

    pub fn with_logic_hook(mut self, hook: fn(&mut StateContext)) -> Self {
        self.logic_hook = Some(hook);
        self
    }

    fn index_of(&self, name: &'static str) -> usize {
        self.states
            .iter()
            .position(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("state machine '{}' has no state '{}'", self.name, name))
    }

    pub fn active_state_name(&self) -> &'static str {
        self.states.get(self.active).map(|(n, _)| *n).unwrap_or("")
    }

    fn switch_to(&mut self, ctx: &mut StateContext, next: usize) {
        let from = self.active_state_name();
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.on_exit(ctx);
        }
        self.active = next;
        let to = self.active_state_name();
        log(&format!("🔀 [{}] {} -> {}", self.name, from, to));
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.on_enter(ctx);
        }
    }

    /// Evaluate transitions for the active child, first match wins.
    fn apply_transitions(&mut self, ctx: &mut StateContext) {
        let from = self.active_state_name();
        let hit = self
            .transitions
            .iter()
            .find(|t| t.from == from && (t.condition)(ctx))
            .map(|t| t.to);
        if let Some(to) = hit {
            let next = self.index_of(to);
            if next != self.active {
                self.switch_to(ctx, next);
            }
        }
    }
}

impl StateNode for StateMachine {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter(&mut self, ctx: &mut StateContext) {
        if let Some(hook) = self.enter_hook {
            hook(ctx);
        }
        self.active = self.start;
        self.entered = true;
        log(&format!(
            "▶️ [{}] entered at {}",
            self.name,
            self.active_state_name()
        ));
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.on_enter(ctx);
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext) {
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.on_exit(ctx);
        }
        self.entered = false;
        if let Some(hook) = self.exit_hook {
            hook(ctx);
        }
    }

    fn tick(&mut self, ctx: &mut StateContext) {
        if !self.entered {
            // Root machine: first tick doubles as entry.
            self.on_enter(ctx);
        }
        if let Some(hook) = self.logic_hook {
            hook(ctx);
        }
        self.apply_transitions(ctx);
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.tick(ctx);
        }
    }

    /// Physics ticks forward only. Transitions are a logic-rate concern;
    /// re-evaluating them here would make behavior depend on the frame
    /// rate / physics rate ratio.
    fn physics_tick(&mut self, ctx: &mut StateContext) {
        if !self.entered {
            return;
        }
        if let Some((_, state)) = self.states.get_mut(self.active) {
            state.physics_tick(ctx);
        }
    }

    fn is_composite(&self) -> bool {
        true
    }

    fn active_child_mut(&mut self) -> Option<&mut (dyn StateNode + '_)> {
        if !self.entered {
            return None;
        }
        // `map` would pin the trait object to 'static; coerce explicitly.
        match self.states.get_mut(self.active) {
            Some((_, state)) => Some(state.as_mut()),
            None => None,
        }
    }

    fn handle_animation_event(&mut self, ctx: &mut StateContext, event: AnimationEvent) {
        // Composites never consume events themselves.
        if let Some(child) = self.active_child_mut() {
            child.handle_animation_event(ctx, event);
        }
    }

    /// Full path down to the active leaf, e.g. "grounded/attack/Swing".
    /// Segments are the registration names, not what the nodes call
    /// themselves, so the path matches the transition tables verbatim.
    fn state_path(&self) -> String {
        if !self.entered {
            return self.name.to_string();
        }
        let Some((registered, child)) = self.states.get(self.active) else {
            return self.name.to_string();
        };
        if child.is_composite() {
            format!("{}/{}", self.name, child.state_path())
        } else {
            format!("{}/{}", self.name, registered)
        }
    }
}

/// Walk the active-child chain down to the leaf.
///
/// Returns `None` when the tree has no resolvable leaf (machine not yet
/// entered); callers turn that into a logged no-op rather than a panic.
pub fn resolve_leaf_mut(root: &mut dyn StateNode) -> Option<&mut (dyn StateNode + '_)> {
    let mut current: Option<&mut (dyn StateNode + '_)> = Some(root);
    while let Some(node) = current.take() {
        if !node.is_composite() {
            return Some(node);
        }
        current = node.active_child_mut();
    }
    None
}
