//! Alternating state/action sequences, the candidate execution traces.

use crate::error::{Error, Result};

/// A non-empty sequence `s0, a0, s1, a1, ..., sn` that starts and ends with a state.
///
/// # Invariants
///
/// - `states.len() == actions.len() + 1`
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct AlternatingSequence<S, A> {
    states: Vec<S>,
    actions: Vec<A>,
}

impl<S, A> AlternatingSequence<S, A> {
    /// Creates a sequence holding a single state.
    pub fn new(first: S) -> Self {
        Self {
            states: vec![first],
            actions: Vec::new(),
        }
    }

    pub fn from_parts(states: Vec<S>, actions: Vec<A>) -> Result<Self> {
        if states.len() != actions.len() + 1 {
            return Err(Error::MalformedSequence {
                states: states.len(),
                actions: actions.len(),
            });
        }
        Ok(Self { states, actions })
    }

    /// Appends `action, state` to the end of the sequence.
    pub fn then(mut self, action: A, state: S) -> Self {
        self.actions.push(action);
        self.states.push(state);
        self
    }

    pub fn head(&self) -> &S {
        &self.states[0]
    }

    pub fn last(&self) -> &S {
        &self.states[self.states.len() - 1]
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Number of steps (actions) in the sequence.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates over consecutive `(state, action, next_state)` steps.
    pub fn steps(&self) -> impl Iterator<Item = (&S, &A, &S)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(move |(i, a)| (&self.states[i], a, &self.states[i + 1]))
    }
}
