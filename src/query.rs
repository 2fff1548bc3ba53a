//! Graph queries over a [`TransitionSystem`].
//!
//! All queries are pure filters over the transition relation. Results are sets:
//! the order in which transitions are stored never matters.
//!
//! | query                          | meaning                                             |
//! |--------------------------------|-----------------------------------------------------|
//! | `post(s)`, `post_set(C)`       | successors of a state / of a set of states          |
//! | `post_action(s, a)`, ...       | successors restricted to action `a`                 |
//! | `pre(s)`, `pre_set(C)`, ...    | predecessors (symmetric to `post`)                  |
//! | `reach()`                      | least fixed point of `initial` closed under `post`  |
//! | `is_state_terminal(s)`         | `post(s)` is empty                                  |
//! | `is_action_deterministic()`    | at most one initial state, one edge per action      |
//! | `is_ap_deterministic()`        | at most one initial state, one edge per label       |
//! | `is_execution*(e)`             | validation of alternating sequences                 |

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use crate::error::{show, Error, Result};
use crate::sequence::AlternatingSequence;
use crate::transition::Transition;
use crate::ts::TransitionSystem;

// Successors and predecessors
impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Clone + Eq + Hash,
    A: Eq + Hash,
{
    fn select<F, G>(&self, filter: F, project: G) -> HashSet<S>
    where
        F: Fn(&Transition<S, A>) -> bool,
        G: Fn(&Transition<S, A>) -> &S,
    {
        self.transitions()
            .iter()
            .filter(|&t| filter(t))
            .map(|t| project(t).clone())
            .collect()
    }

    pub fn post(&self, s: &S) -> HashSet<S> {
        self.select(|t| &t.from == s, |t| &t.to)
    }

    pub fn post_set(&self, c: &HashSet<S>) -> HashSet<S> {
        self.select(|t| c.contains(&t.from), |t| &t.to)
    }

    pub fn post_action(&self, s: &S, a: &A) -> HashSet<S> {
        self.select(|t| &t.from == s && &t.action == a, |t| &t.to)
    }

    pub fn post_set_action(&self, c: &HashSet<S>, a: &A) -> HashSet<S> {
        self.select(|t| c.contains(&t.from) && &t.action == a, |t| &t.to)
    }

    pub fn pre(&self, s: &S) -> HashSet<S> {
        self.select(|t| &t.to == s, |t| &t.from)
    }

    pub fn pre_set(&self, c: &HashSet<S>) -> HashSet<S> {
        self.select(|t| c.contains(&t.to), |t| &t.from)
    }

    pub fn pre_action(&self, s: &S, a: &A) -> HashSet<S> {
        self.select(|t| &t.to == s && &t.action == a, |t| &t.from)
    }

    pub fn pre_set_action(&self, c: &HashSet<S>, a: &A) -> HashSet<S> {
        self.select(|t| c.contains(&t.to) && &t.action == a, |t| &t.from)
    }

    /// Groups transitions by source state: `s -> [(a, s')]`.
    pub(crate) fn outgoing(&self) -> HashMap<&S, Vec<(&A, &S)>> {
        let mut index: HashMap<&S, Vec<(&A, &S)>> = HashMap::new();
        for t in self.transitions() {
            index.entry(&t.from).or_default().push((&t.action, &t.to));
        }
        index
    }

    /// Computes the set of states reachable from the initial states.
    ///
    /// Depth-first traversal with an explicit stack and a visited set, so it
    /// terminates on cyclic graphs and does work linear in the number of edges.
    pub fn reach(&self) -> HashSet<S> {
        let outgoing = self.outgoing();
        let mut visited: HashSet<S> = HashSet::new();
        let mut stack: Vec<&S> = self.initial_states().iter().collect();

        while let Some(s) = stack.pop() {
            if !visited.insert(s.clone()) {
                continue;
            }
            if let Some(edges) = outgoing.get(s) {
                for &(_, to) in edges {
                    if !visited.contains(to) {
                        stack.push(to);
                    }
                }
            }
        }

        debug!("reach: {} of {} states", visited.len(), self.states().len());
        visited
    }
}

// Determinism
impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    P: Clone + Eq + Hash + Debug,
{
    /// Checks that there is at most one initial state and that no state has two
    /// outgoing transitions with the same action.
    pub fn is_action_deterministic(&self) -> bool {
        if self.initial_states().len() > 1 {
            return false;
        }
        let mut seen: HashSet<(&S, &A)> = HashSet::new();
        self.transitions().iter().all(|t| seen.insert((&t.from, &t.action)))
    }

    /// Checks that there is at most one initial state and that no state has two
    /// outgoing transitions leading to equally labeled states.
    pub fn is_ap_deterministic(&self) -> bool {
        if self.initial_states().len() > 1 {
            return false;
        }
        let mut seen: HashMap<&S, Vec<&HashSet<P>>> = HashMap::new();
        for t in self.transitions() {
            // Endpoints are registered, so the label always exists.
            let Some(label) = self.labeling_function().get(&t.to) else {
                continue;
            };
            let labels = seen.entry(&t.from).or_default();
            if labels.contains(&label) {
                return false;
            }
            labels.push(label);
        }
        true
    }

    /// Checks that a registered state has no successors.
    pub fn is_state_terminal(&self, s: &S) -> Result<bool> {
        if !self.states().contains(s) {
            return Err(Error::StateNotFound(show(s)));
        }
        Ok(self.transitions().iter().all(|t| &t.from != s))
    }
}

// Executions
impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    P: Clone + Eq + Hash + Debug,
{
    /// Checks that every step of `e` is a transition of this system.
    ///
    /// Fails if a visited state or action is not registered. Returns `false` at
    /// the first step whose target is not a successor of its source.
    pub fn is_execution_fragment(&self, e: &AlternatingSequence<S, A>) -> Result<bool> {
        for (from, action, to) in e.steps() {
            if !self.states().contains(from) {
                return Err(Error::StateNotFound(show(from)));
            }
            if !self.actions().contains(action) {
                return Err(Error::ActionNotFound(show(action)));
            }
            if !self.post_action(from, action).contains(to) {
                return Ok(false);
            }
        }
        let last = e.last();
        if !self.states().contains(last) {
            return Err(Error::StateNotFound(show(last)));
        }
        Ok(true)
    }

    /// Checks that `e` starts in an initial state.
    pub fn is_initial_execution_fragment(&self, e: &AlternatingSequence<S, A>) -> Result<bool> {
        let head = e.head();
        if !self.states().contains(head) {
            return Err(Error::StateNotFound(show(head)));
        }
        Ok(self.initial_states().contains(head))
    }

    /// Checks that `e` ends in a terminal state.
    pub fn is_maximal_execution_fragment(&self, e: &AlternatingSequence<S, A>) -> Result<bool> {
        self.is_state_terminal(e.last())
    }

    /// An execution is an initial, maximal execution fragment.
    pub fn is_execution(&self, e: &AlternatingSequence<S, A>) -> Result<bool> {
        Ok(self.is_execution_fragment(e)?
            && self.is_initial_execution_fragment(e)?
            && self.is_maximal_execution_fragment(e)?)
    }
}
