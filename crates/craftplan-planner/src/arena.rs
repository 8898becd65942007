//! State interning.
//!
//! The search refers to states by dense [`StateId`]s so that its cost and
//! predecessor tables are plain vectors and each generated state is hashed
//! once, on insertion.

use std::collections::HashMap;
use std::rc::Rc;

use craftplan_core::State;

/// Index of an interned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// Position of the state in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Append-only store of distinct states.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<Rc<State>>,
    index: HashMap<Rc<State>, StateId>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `state`, returning its id and whether it was newly added.
    pub fn intern(&mut self, state: State) -> (StateId, bool) {
        if let Some(&id) = self.index.get(&state) {
            return (id, false);
        }
        let id = StateId(self.states.len());
        let state = Rc::new(state);
        self.states.push(Rc::clone(&state));
        self.index.insert(state, id);
        (id, true)
    }

    /// Borrow the state behind `id`.
    pub fn get(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// Shared handle to the state behind `id`, independent of the arena's
    /// borrow.
    pub fn share(&self, id: StateId) -> Rc<State> {
        Rc::clone(&self.states[id.0])
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
