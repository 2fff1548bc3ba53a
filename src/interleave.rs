//! Parallel composition of transition systems and program graphs.
//!
//! # Transition systems
//!
//! The product of `ts1` and `ts2` under a set `H` of handshake actions has
//! pairs `(s1, s2)` as states. From a product state, three rules generate
//! outgoing edges, and a state may use several of them at once:
//!
//! ```text
//!   s1 -a-> s1', a ∉ H            ⟹  (s1, s2) -a-> (s1', s2)
//!   s2 -a-> s2', a ∉ H            ⟹  (s1, s2) -a-> (s1, s2')
//!   s1 -a-> s1', s2 -a-> s2', a ∈ H  ⟹  (s1, s2) -a-> (s1', s2')
//! ```
//!
//! A handshake action never fires on one side only. With `H = ∅` this is pure
//! interleaving.
//!
//! Only the fragment reachable from `initial1 × initial2` is built. Each
//! reachable pair is labeled with the union of its components' labels.
//!
//! # Program graphs
//!
//! Program graphs are composed by pure interleaving over the full product of
//! locations. Every transition of either component stays enabled whatever the
//! other location is, and keeps its guard and action. Initializations compose
//! by concatenation: one sequence from each side yields one sequence of the
//! product.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use crate::error::Result;
use crate::pg::{PgTransition, ProgramGraph};
use crate::transition::Transition;
use crate::ts::TransitionSystem;

impl<S1, A, P> TransitionSystem<S1, A, P>
where
    S1: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    P: Clone + Eq + Hash + Debug,
{
    /// Pure interleaving: no action synchronizes.
    pub fn interleave<S2>(&self, other: &TransitionSystem<S2, A, P>) -> Result<TransitionSystem<(S1, S2), A, P>>
    where
        S2: Clone + Eq + Hash + Debug,
    {
        self.interleave_with_handshake(other, &HashSet::new())
    }

    /// Interleaving where the actions in `handshake` must fire jointly.
    pub fn interleave_with_handshake<S2>(
        &self,
        other: &TransitionSystem<S2, A, P>,
        handshake: &HashSet<A>,
    ) -> Result<TransitionSystem<(S1, S2), A, P>>
    where
        S2: Clone + Eq + Hash + Debug,
    {
        debug!(
            "interleave(|S1| = {}, |S2| = {}, |H| = {})",
            self.states().len(),
            other.states().len(),
            handshake.len()
        );

        let out1 = self.outgoing();
        let out2 = other.outgoing();

        let mut ts = TransitionSystem::new();
        ts.add_all_actions(self.actions().iter().chain(other.actions()).cloned());
        ts.add_all_atomic_propositions(
            self.atomic_propositions()
                .iter()
                .chain(other.atomic_propositions())
                .cloned(),
        );

        // Registers a product state together with its label.
        let register = |ts: &mut TransitionSystem<(S1, S2), A, P>, state: &(S1, S2)| -> Result<()> {
            ts.add_state(state.clone());
            let (s1, s2) = state;
            for p in self.label(s1)?.iter().chain(other.label(s2)?) {
                ts.add_to_label(state.clone(), p.clone())?;
            }
            Ok(())
        };

        let mut stack: Vec<(S1, S2)> = Vec::new();
        for s1 in self.initial_states() {
            for s2 in other.initial_states() {
                let state = (s1.clone(), s2.clone());
                register(&mut ts, &state)?;
                ts.add_initial_state(state.clone())?;
                stack.push(state);
            }
        }

        let mut visited: HashSet<(S1, S2)> = HashSet::new();
        while let Some(state) = stack.pop() {
            if visited.contains(&state) {
                continue;
            }
            visited.insert(state.clone());

            let (s1, s2) = &state;
            let edges1 = out1.get(s1).map(Vec::as_slice).unwrap_or(&[]);
            let edges2 = out2.get(s2).map(Vec::as_slice).unwrap_or(&[]);

            let mut successors: Vec<(A, (S1, S2))> = Vec::new();
            for &(a, t1) in edges1 {
                if handshake.contains(a) {
                    for &(b, t2) in edges2 {
                        if a == b {
                            successors.push((a.clone(), (t1.clone(), t2.clone())));
                        }
                    }
                } else {
                    successors.push((a.clone(), (t1.clone(), s2.clone())));
                }
            }
            for &(a, t2) in edges2 {
                if !handshake.contains(a) {
                    successors.push((a.clone(), (s1.clone(), t2.clone())));
                }
            }

            for (a, next) in successors {
                if !ts.states().contains(&next) {
                    register(&mut ts, &next)?;
                }
                ts.add_transition(Transition::new(state.clone(), a, next.clone()))?;
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }

        debug!(
            "interleave: {} states, {} transitions",
            ts.states().len(),
            ts.transitions().len()
        );
        Ok(ts)
    }
}

impl<L1, A> ProgramGraph<L1, A>
where
    L1: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    pub fn interleave<L2>(&self, other: &ProgramGraph<L2, A>) -> Result<ProgramGraph<(L1, L2), A>>
    where
        L2: Clone + Eq + Hash + Debug,
    {
        let mut pg = ProgramGraph::new();

        for l1 in self.locations() {
            for l2 in other.locations() {
                pg.add_location((l1.clone(), l2.clone()));
            }
        }
        for l1 in self.initial_locations() {
            for l2 in other.initial_locations() {
                pg.add_initial_location((l1.clone(), l2.clone()))?;
            }
        }

        for t in self.transitions() {
            for l2 in other.locations() {
                pg.add_transition(PgTransition::new(
                    (t.from.clone(), l2.clone()),
                    t.condition.clone(),
                    t.action.clone(),
                    (t.to.clone(), l2.clone()),
                ))?;
            }
        }
        for t in other.transitions() {
            for l1 in self.locations() {
                pg.add_transition(PgTransition::new(
                    (l1.clone(), t.from.clone()),
                    t.condition.clone(),
                    t.action.clone(),
                    (l1.clone(), t.to.clone()),
                ))?;
            }
        }

        for init1 in self.initializations() {
            for init2 in other.initializations() {
                pg.add_initialization(init1.iter().chain(init2).cloned());
            }
        }

        debug!(
            "interleave: {} locations, {} transitions, {} initializations",
            pg.locations().len(),
            pg.transitions().len(),
            pg.initializations().len()
        );
        Ok(pg)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    type Ts = TransitionSystem<&'static str, &'static str, &'static str>;

    fn build(edges: &[(&'static str, &'static str, &'static str)], initial: &[&'static str]) -> Ts {
        let mut ts = Ts::new();
        for &(from, a, to) in edges {
            ts.add_state(from);
            ts.add_state(to);
            ts.add_action(a);
        }
        for &s in initial {
            ts.add_state(s);
            ts.add_initial_state(s).unwrap();
        }
        for &(from, a, to) in edges {
            ts.add_transition(Transition::new(from, a, to)).unwrap();
        }
        ts
    }

    #[test]
    fn test_handshake_fires_jointly() {
        // Producer: idle -put-> full -done-> idle. Consumer: wait -put-> busy -eat-> wait.
        let producer = build(&[("idle", "put", "full"), ("full", "done", "idle")], &["idle"]);
        let consumer = build(&[("wait", "put", "busy"), ("busy", "eat", "wait")], &["wait"]);
        let h = HashSet::from(["put"]);

        let ts = producer.interleave_with_handshake(&consumer, &h).unwrap();

        let puts: Vec<_> = ts.transitions().iter().filter(|t| t.action == "put").collect();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].from, ("idle", "wait"));
        assert_eq!(puts[0].to, ("full", "busy"));

        assert_eq!(
            ts.states(),
            &HashSet::from([("idle", "wait"), ("full", "busy"), ("idle", "busy"), ("full", "wait")])
        );
        assert_eq!(ts.reach(), ts.states().clone());
    }

    #[test]
    fn test_nondeterministic_handshake_pairs_all_successors() {
        let left = build(&[("a0", "h", "a1"), ("a0", "h", "a2")], &["a0"]);
        let right = build(&[("b0", "h", "b1"), ("b0", "h", "b2")], &["b0"]);
        let h = HashSet::from(["h"]);

        let ts = left.interleave_with_handshake(&right, &h).unwrap();

        let expected: HashSet<_> = [("a1", "b1"), ("a1", "b2"), ("a2", "b1"), ("a2", "b2")]
            .into_iter()
            .map(|to| Transition::new(("a0", "b0"), "h", to))
            .collect();
        assert_eq!(ts.transitions(), &expected);
        assert_eq!(ts.states().len(), 5);
        assert!(!ts.is_action_deterministic());
    }

    #[test]
    fn test_handshake_blocks_one_sided_action() {
        let left = build(&[("a0", "sync", "a1")], &["a0"]);
        let right = build(&[("b0", "tick", "b1")], &["b0"]);
        let h = HashSet::from(["sync"]);

        let ts = left.interleave_with_handshake(&right, &h).unwrap();
        assert!(ts.transitions().iter().all(|t| t.action != "sync"));
        assert_eq!(ts.states(), &HashSet::from([("a0", "b0"), ("a0", "b1")]));
        // The alphabet is still the union.
        assert!(ts.actions().contains("sync"));
    }

    #[test]
    fn test_cycles_terminate() {
        let left = build(&[("x", "a", "y"), ("y", "a", "x")], &["x"]);
        let right = build(&[("u", "b", "u")], &["u"]);

        let ts = left.interleave(&right).unwrap();
        assert_eq!(ts.states().len(), 2);
        assert_eq!(ts.transitions().len(), 4);
        assert!(ts.transitions().contains(&Transition::new(("x", "u"), "b", ("x", "u"))));
    }

    #[test]
    fn test_labels_are_unions() {
        let mut left = build(&[("x", "a", "y")], &["x"]);
        left.add_atomic_proposition("p");
        left.add_to_label("y", "p").unwrap();
        let mut right = build(&[("u", "b", "v")], &["u"]);
        right.add_atomic_proposition("q");
        right.add_to_label("u", "q").unwrap();

        let ts = left.interleave(&right).unwrap();
        assert_eq!(ts.atomic_propositions(), &HashSet::from(["p", "q"]));
        assert_eq!(ts.label(&("x", "u")).unwrap(), &HashSet::from(["q"]));
        assert_eq!(ts.label(&("y", "u")).unwrap(), &HashSet::from(["p", "q"]));
        assert_eq!(ts.label(&("y", "v")).unwrap(), &HashSet::from(["p"]));
        assert!(ts.label(&("x", "v")).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_pairs_are_not_added() {
        let mut left = build(&[("x", "a", "y")], &["x"]);
        left.add_state("z");
        let right = build(&[], &["u"]);

        let ts = left.interleave(&right).unwrap();
        assert_eq!(ts.states(), &HashSet::from([("x", "u"), ("y", "u")]));
    }

    #[test]
    fn test_program_graph_interleave() {
        let mut pg1: ProgramGraph<&str, &str> = ProgramGraph::new();
        pg1.add_location("p0");
        pg1.add_location("p1");
        pg1.add_initial_location("p0").unwrap();
        pg1.add_transition(PgTransition::new("p0", "x < 1", "x := x + 1", "p1"))
            .unwrap();
        pg1.add_initialization(["x := 0"]);
        pg1.add_initialization(["x := 5"]);

        let mut pg2: ProgramGraph<&str, &str> = ProgramGraph::new();
        pg2.add_location("q0");
        pg2.add_location("q1");
        pg2.add_initial_location("q0").unwrap();
        pg2.add_transition(PgTransition::new("q1", "", "y := 1", "q0")).unwrap();
        pg2.add_initialization(["y := 0"]);

        let pg = pg1.interleave(&pg2).unwrap();

        assert_eq!(pg.locations().len(), 4);
        assert_eq!(pg.initial_locations(), &HashSet::from([("p0", "q0")]));
        assert_eq!(pg.transitions().len(), 4);
        assert!(pg.transitions().contains(&PgTransition::new(
            ("p0", "q1"),
            "x < 1",
            "x := x + 1",
            ("p1", "q1")
        )));
        assert!(pg.transitions().contains(&PgTransition::new(("p1", "q1"), "", "y := 1", ("p1", "q0"))));

        let expected: HashSet<Vec<String>> = HashSet::from([
            vec!["x := 0".to_string(), "y := 0".to_string()],
            vec!["x := 5".to_string(), "y := 0".to_string()],
        ]);
        assert_eq!(pg.initializations(), &expected);
    }
}
