/*!
Generic finite state machine.

States are values of a single type `S` (usually an enum) registered by id. The machine
owns the current state instance; every transition builds a fresh instance from the
registry, so per-state data (timers, jump arcs) starts clean on each entry.

Collaborators are not stored in the machine. They are passed in on every call through
`S::Context`, a borrowed bundle the caller assembles for the duration of one call.

Lifecycle of `set_state(next)`:
1. If `next` is already current, nothing happens.
2. The current state (if any) gets `exit`.
3. A new instance of `next` is built and gets `enter` with the previous instance.
4. The new instance becomes current.
*/

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub trait State: Sized {
    type Id: Copy + Eq + Hash + Debug;
    type Context<'a>;

    fn id(&self) -> Self::Id;

    fn enter(&mut self, _ctx: &mut Self::Context<'_>, _previous: Option<&Self>) {}

    /// Advance the state. Returning `Some(id)` asks the machine to transition.
    fn update(&mut self, _ctx: &mut Self::Context<'_>, _dt: f32, _elapsed: f32) -> Option<Self::Id> {
        None
    }

    fn exit(&mut self, _ctx: &mut Self::Context<'_>) {}
}

pub struct StateMachine<S: State> {
    registry: HashMap<S::Id, fn() -> S>,
    current: Option<S>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            current: None,
        }
    }

    /// Register (or replace) the constructor for `id`.
    pub fn add_state(&mut self, id: S::Id, build: fn() -> S) -> &mut Self {
        self.registry.insert(id, build);
        self
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.current.as_mut()
    }

    pub fn current_id(&self) -> Option<S::Id> {
        self.current.as_ref().map(State::id)
    }

    /// Transition to `id`. Returns `false` when `id` was already current.
    ///
    /// # Panics
    /// If `id` was never registered. The current state is left untouched in that case.
    pub fn set_state(&mut self, id: S::Id, ctx: &mut S::Context<'_>) -> bool {
        if self.current_id() == Some(id) {
            return false;
        }
        let Some(build) = self.registry.get(&id).copied() else {
            panic!("state {id:?} is not registered");
        };

        let mut previous = self.current.take();
        if let Some(prev) = previous.as_mut() {
            prev.exit(ctx);
        }

        let mut next = build();
        next.enter(ctx, previous.as_ref());
        log::trace!(
            "state transition {:?} -> {:?}",
            previous.as_ref().map(State::id),
            id
        );
        self.current = Some(next);
        true
    }

    /// Forward the tick to the current state and apply the transition it requests.
    pub fn update(&mut self, ctx: &mut S::Context<'_>, dt: f32, elapsed: f32) {
        let next = match self.current.as_mut() {
            Some(state) => state.update(ctx, dt, elapsed),
            None => None,
        };
        if let Some(id) = next {
            self.set_state(id, ctx);
        }
    }
}
