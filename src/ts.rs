//! The transition-system data type.
//!
//! A [`TransitionSystem`] is a mutable container for states, actions, atomic
//! propositions, transitions, initial states and a labeling function.
//! Referential integrity is enforced at mutation time:
//!
//! - a transition may only connect registered states via a registered action,
//! - an initial state must be a registered state,
//! - a label may only mention registered atomic propositions,
//! - nothing that is still referenced can be removed (removal never cascades).
//!
//! # Examples
//!
//! ```
//! use lts_rs::transition::Transition;
//! use lts_rs::ts::TransitionSystem;
//!
//! let mut ts = TransitionSystem::new();
//! ts.add_state("off");
//! ts.add_state("on");
//! ts.add_action("toggle");
//! ts.add_atomic_proposition("lit");
//!
//! ts.add_initial_state("off").unwrap();
//! ts.add_transition(Transition::new("off", "toggle", "on")).unwrap();
//! ts.add_transition(Transition::new("on", "toggle", "off")).unwrap();
//! ts.add_to_label("on", "lit").unwrap();
//!
//! assert_eq!(ts.reach().len(), 2);
//! assert!(ts.is_action_deterministic());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{show, Error, Result, TsPart};
use crate::transition::Transition;

#[derive(Debug, Clone)]
pub struct TransitionSystem<S, A, P> {
    name: Option<String>,
    states: HashSet<S>,
    initial: HashSet<S>,
    actions: HashSet<A>,
    atomic_propositions: HashSet<P>,
    transitions: HashSet<Transition<S, A>>,
    /// Total over `states`: every registered state has an entry, possibly empty.
    labels: HashMap<S, HashSet<P>>,
}

impl<S, A, P> Default for TransitionSystem<S, A, P> {
    fn default() -> Self {
        Self {
            name: None,
            states: HashSet::new(),
            initial: HashSet::new(),
            actions: HashSet::new(),
            atomic_propositions: HashSet::new(),
            transitions: HashSet::new(),
            labels: HashMap::new(),
        }
    }
}

impl<S, A, P> TransitionSystem<S, A, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn states(&self) -> &HashSet<S> {
        &self.states
    }

    pub fn initial_states(&self) -> &HashSet<S> {
        &self.initial
    }

    pub fn actions(&self) -> &HashSet<A> {
        &self.actions
    }

    pub fn atomic_propositions(&self) -> &HashSet<P> {
        &self.atomic_propositions
    }

    pub fn transitions(&self) -> &HashSet<Transition<S, A>> {
        &self.transitions
    }

    pub fn labeling_function(&self) -> &HashMap<S, HashSet<P>> {
        &self.labels
    }
}

// Construction
impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    P: Clone + Eq + Hash + Debug,
{
    /// Registers a state with an empty label. Re-adding keeps the existing label.
    pub fn add_state(&mut self, state: S) {
        if self.states.insert(state.clone()) {
            self.labels.entry(state).or_default();
        }
    }

    pub fn add_all_states(&mut self, states: impl IntoIterator<Item = S>) {
        for state in states {
            self.add_state(state);
        }
    }

    pub fn add_action(&mut self, action: A) {
        self.actions.insert(action);
    }

    pub fn add_all_actions(&mut self, actions: impl IntoIterator<Item = A>) {
        self.actions.extend(actions);
    }

    pub fn add_atomic_proposition(&mut self, p: P) {
        self.atomic_propositions.insert(p);
    }

    pub fn add_all_atomic_propositions(&mut self, ps: impl IntoIterator<Item = P>) {
        self.atomic_propositions.extend(ps);
    }

    /// Marks a registered state as initial.
    pub fn add_initial_state(&mut self, state: S) -> Result<()> {
        if !self.states.contains(&state) {
            return Err(Error::InvalidInitialState(show(&state)));
        }
        self.initial.insert(state);
        Ok(())
    }

    /// Adds a transition whose endpoints and action are already registered.
    pub fn add_transition(&mut self, t: Transition<S, A>) -> Result<()> {
        if !self.states.contains(&t.from) || !self.states.contains(&t.to) || !self.actions.contains(&t.action) {
            return Err(Error::InvalidTransition(t.to_string()));
        }
        self.transitions.insert(t);
        Ok(())
    }

    /// Adds proposition `p` to the label of state `s`.
    pub fn add_to_label(&mut self, s: S, p: P) -> Result<()> {
        if !self.states.contains(&s) {
            return Err(Error::StateNotFound(show(&s)));
        }
        if !self.atomic_propositions.contains(&p) {
            return Err(Error::InvalidLabelingPair {
                state: show(&s),
                proposition: show(&p),
            });
        }
        self.labels.entry(s).or_default().insert(p);
        Ok(())
    }

    /// Returns the label of a registered state.
    pub fn label(&self, s: &S) -> Result<&HashSet<P>> {
        self.labels.get(s).ok_or_else(|| Error::StateNotFound(show(s)))
    }
}

// Removal
impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    P: Clone + Eq + Hash + Debug,
{
    /// Removes a state that is not initial, has an empty label and touches no transition.
    pub fn remove_state(&mut self, state: &S) -> Result<()> {
        let attached = |part| Error::DeletionOfAttachedState {
            state: show(state),
            part,
        };
        if self.initial.contains(state) {
            return Err(attached(TsPart::InitialStates));
        }
        if self.labels.get(state).is_some_and(|label| !label.is_empty()) {
            return Err(attached(TsPart::LabelingFunction));
        }
        if self.transitions.iter().any(|t| &t.from == state || &t.to == state) {
            return Err(attached(TsPart::Transitions));
        }
        self.states.remove(state);
        self.labels.remove(state);
        Ok(())
    }

    /// Removes an action that no transition carries.
    pub fn remove_action(&mut self, action: &A) -> Result<()> {
        if self.transitions.iter().any(|t| &t.action == action) {
            return Err(Error::DeletionOfAttachedAction {
                action: show(action),
                part: TsPart::Transitions,
            });
        }
        self.actions.remove(action);
        Ok(())
    }

    /// Removes an atomic proposition that no label mentions.
    pub fn remove_atomic_proposition(&mut self, p: &P) -> Result<()> {
        if self.labels.values().any(|label| label.contains(p)) {
            return Err(Error::DeletionOfAttachedAtomicProposition {
                proposition: show(p),
                part: TsPart::LabelingFunction,
            });
        }
        self.atomic_propositions.remove(p);
        Ok(())
    }

    pub fn remove_initial_state(&mut self, state: &S) {
        self.initial.remove(state);
    }

    pub fn remove_transition(&mut self, t: &Transition<S, A>) {
        self.transitions.remove(t);
    }

    pub fn remove_label(&mut self, s: &S, p: &P) {
        if let Some(label) = self.labels.get_mut(s) {
            label.remove(p);
        }
    }
}

impl<S, A, P> PartialEq for TransitionSystem<S, A, P>
where
    S: Eq + Hash,
    A: Eq + Hash,
    P: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.states == other.states
            && self.initial == other.initial
            && self.actions == other.actions
            && self.atomic_propositions == other.atomic_propositions
            && self.transitions == other.transitions
            && self.labels == other.labels
    }
}

impl<S, A, P> Eq for TransitionSystem<S, A, P>
where
    S: Eq + Hash,
    A: Eq + Hash,
    P: Eq + Hash,
{
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn toggle() -> TransitionSystem<&'static str, &'static str, &'static str> {
        let mut ts = TransitionSystem::new();
        ts.add_all_states(["off", "on"]);
        ts.add_action("toggle");
        ts.add_atomic_proposition("lit");
        ts.add_initial_state("off").unwrap();
        ts.add_transition(Transition::new("off", "toggle", "on")).unwrap();
        ts.add_transition(Transition::new("on", "toggle", "off")).unwrap();
        ts.add_to_label("on", "lit").unwrap();
        ts
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut ts = toggle();
        ts.add_state("on");
        ts.add_action("toggle");
        ts.add_atomic_proposition("lit");
        assert_eq!(ts.states().len(), 2);
        assert_eq!(ts.actions().len(), 1);
        assert_eq!(ts.atomic_propositions().len(), 1);
        // Re-adding a state must not wipe its label.
        assert!(ts.label(&"on").unwrap().contains("lit"));
    }

    #[test]
    fn test_label_is_total() {
        let ts = toggle();
        assert!(ts.label(&"off").unwrap().is_empty());
        assert_eq!(ts.labeling_function().len(), ts.states().len());
        assert_eq!(ts.label(&"dim"), Err(Error::StateNotFound("\"dim\"".to_string())));
    }

    #[test]
    fn test_invalid_initial_state() {
        let mut ts = toggle();
        assert!(matches!(ts.add_initial_state("dim"), Err(Error::InvalidInitialState(_))));
    }

    #[test]
    fn test_invalid_transition() {
        let mut ts = toggle();
        let bad_to = Transition::new("off", "toggle", "dim");
        let bad_action = Transition::new("off", "push", "on");
        assert!(matches!(ts.add_transition(bad_to), Err(Error::InvalidTransition(_))));
        assert!(matches!(ts.add_transition(bad_action), Err(Error::InvalidTransition(_))));
        assert_eq!(ts.transitions().len(), 2);
    }

    #[test]
    fn test_invalid_label() {
        let mut ts = toggle();
        assert!(matches!(ts.add_to_label("dim", "lit"), Err(Error::StateNotFound(_))));
        assert!(matches!(
            ts.add_to_label("on", "hot"),
            Err(Error::InvalidLabelingPair { .. })
        ));
    }

    #[test]
    fn test_remove_attached_state() {
        let mut ts = toggle();
        let part = |r: Result<()>| match r {
            Err(Error::DeletionOfAttachedState { part, .. }) => Some(part),
            _ => None,
        };

        assert_eq!(part(ts.remove_state(&"off")), Some(TsPart::InitialStates));
        assert_eq!(part(ts.remove_state(&"on")), Some(TsPart::LabelingFunction));

        ts.remove_label(&"on", &"lit");
        assert_eq!(part(ts.remove_state(&"on")), Some(TsPart::Transitions));

        ts.add_state("dim");
        assert!(ts.remove_state(&"dim").is_ok());
        assert!(!ts.states().contains("dim"));
        assert!(!ts.labeling_function().contains_key("dim"));
    }

    #[test]
    fn test_remove_attached_action() {
        let mut ts = toggle();
        assert!(matches!(
            ts.remove_action(&"toggle"),
            Err(Error::DeletionOfAttachedAction {
                part: TsPart::Transitions,
                ..
            })
        ));

        ts.remove_transition(&Transition::new("off", "toggle", "on"));
        ts.remove_transition(&Transition::new("on", "toggle", "off"));
        ts.remove_action(&"toggle").unwrap();
        assert!(ts.actions().is_empty());
    }

    #[test]
    fn test_remove_attached_proposition() {
        let mut ts = toggle();
        assert!(matches!(
            ts.remove_atomic_proposition(&"lit"),
            Err(Error::DeletionOfAttachedAtomicProposition {
                part: TsPart::LabelingFunction,
                ..
            })
        ));
        ts.remove_label(&"on", &"lit");
        ts.remove_atomic_proposition(&"lit").unwrap();
        assert!(ts.atomic_propositions().is_empty());
    }

    #[test]
    fn test_equality() {
        let a = toggle();
        let mut b = toggle();
        assert_eq!(a, b);

        b.remove_initial_state(&"off");
        assert_ne!(a, b);
        b.add_initial_state("off").unwrap();
        assert_eq!(a, b);

        b.set_name("toggle");
        assert_ne!(a, b);
        assert_eq!(b.name(), Some("toggle"));
    }
}
