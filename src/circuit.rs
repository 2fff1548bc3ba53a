//! Unrolling sequential circuits into transition systems.
//!
//! A circuit is consumed as an opaque oracle (see [`Circuit`]). The unrolled
//! system has states `(inputs, registers)` and uses the full input alphabet as
//! actions: from `(x, r)`, every input assignment `x'` leads to
//! `(x', update_registers(x, r))`.
//!
//! Exploration starts from every input assignment paired with all-false
//! registers, so there are `2^k` initial states for `k` inputs. At most
//! `2^(inputs + registers)` states are ever reachable (see
//! [`state_space_bound`]), so unrolling always terminates.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use num_bigint::BigUint;

use crate::error::Result;
use crate::transition::Transition;
use crate::ts::TransitionSystem;

/// A full boolean assignment over named ports or registers.
pub type Assignment = BTreeMap<String, bool>;

/// State of an unrolled circuit: `(inputs, registers)`.
pub type CircuitState = (Assignment, Assignment);

/// Transition system produced by [`TransitionSystem::from_circuit`].
pub type CircuitTs = TransitionSystem<CircuitState, Assignment, String>;

/// A synchronous boolean circuit with input ports, registers and outputs.
///
/// Both functions must be pure: their results depend only on the arguments.
pub trait Circuit {
    fn input_port_names(&self) -> Vec<String>;

    fn register_names(&self) -> Vec<String>;

    /// Values of the combinational outputs for the given inputs and registers.
    fn compute_outputs(&self, inputs: &Assignment, registers: &Assignment) -> Assignment;

    /// Register values after the next clock tick.
    fn update_registers(&self, inputs: &Assignment, registers: &Assignment) -> Assignment;
}

/// Enumerates all `2^n` assignments over `names`.
pub fn all_assignments(names: &[String]) -> Vec<Assignment> {
    let mut result = vec![Assignment::new()];
    for name in names {
        result = result
            .into_iter()
            .flat_map(|partial| {
                [false, true].map(|value| {
                    let mut extended = partial.clone();
                    extended.insert(name.clone(), value);
                    extended
                })
            })
            .collect();
    }
    result
}

/// Upper bound `2^(inputs + registers)` on the number of reachable states.
pub fn state_space_bound(circuit: &impl Circuit) -> BigUint {
    let bits = circuit.input_port_names().len() + circuit.register_names().len();
    BigUint::from(1u32) << bits
}

fn true_names(assignment: &Assignment) -> impl Iterator<Item = &String> {
    assignment.iter().filter(|(_, &value)| value).map(|(name, _)| name)
}

impl CircuitTs {
    /// Unrolls the reachable state space of `circuit`.
    pub fn from_circuit(circuit: &impl Circuit) -> Result<Self> {
        let inputs = circuit.input_port_names();
        let registers = circuit.register_names();
        debug!(
            "from_circuit(inputs = {:?}, registers = {:?}, bound = {})",
            inputs,
            registers,
            state_space_bound(circuit)
        );

        let alphabet = all_assignments(&inputs);
        let reset: Assignment = registers.iter().map(|r| (r.clone(), false)).collect();

        let mut ts = TransitionSystem::new();
        ts.add_all_actions(alphabet.iter().cloned());

        // Registers a state labeled with the names of its true inputs, registers and outputs.
        let register = |ts: &mut CircuitTs, state: &CircuitState| -> Result<()> {
            let (x, r) = state;
            ts.add_state(state.clone());
            let outputs = circuit.compute_outputs(x, r);
            for name in true_names(x).chain(true_names(r)).chain(true_names(&outputs)) {
                ts.add_atomic_proposition(name.clone());
                ts.add_to_label(state.clone(), name.clone())?;
            }
            Ok(())
        };

        let mut stack: Vec<CircuitState> = Vec::new();
        for x in &alphabet {
            let state = (x.clone(), reset.clone());
            register(&mut ts, &state)?;
            ts.add_initial_state(state.clone())?;
            stack.push(state);
        }

        let mut visited: HashSet<CircuitState> = HashSet::new();
        while let Some(state) = stack.pop() {
            if visited.contains(&state) {
                continue;
            }
            visited.insert(state.clone());

            let next_registers = circuit.update_registers(&state.0, &state.1);
            for x in &alphabet {
                let next = (x.clone(), next_registers.clone());
                if !ts.states().contains(&next) {
                    register(&mut ts, &next)?;
                }
                ts.add_transition(Transition::new(state.clone(), x.clone(), next.clone()))?;
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }

        debug!(
            "from_circuit: {} states, {} transitions",
            ts.states().len(),
            ts.transitions().len()
        );
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn assign(pairs: &[(&str, bool)]) -> Assignment {
        pairs.iter().map(|&(n, v)| (n.to_string(), v)).collect()
    }

    /// One input `x`, one register `r' = r xor x`, one output `y = x and r`.
    struct Accumulator;

    impl Circuit for Accumulator {
        fn input_port_names(&self) -> Vec<String> {
            vec!["x".to_string()]
        }

        fn register_names(&self) -> Vec<String> {
            vec!["r".to_string()]
        }

        fn compute_outputs(&self, inputs: &Assignment, registers: &Assignment) -> Assignment {
            assign(&[("y", inputs["x"] && registers["r"])])
        }

        fn update_registers(&self, inputs: &Assignment, registers: &Assignment) -> Assignment {
            assign(&[("r", inputs["x"] ^ registers["r"])])
        }
    }

    #[test]
    fn test_all_assignments() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let all = all_assignments(&names);
        assert_eq!(all.len(), 8);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 8);
        assert!(all.iter().all(|a| a.len() == 3));

        assert_eq!(all_assignments(&[]), vec![Assignment::new()]);
    }

    #[test]
    fn test_state_space_bound() {
        assert_eq!(state_space_bound(&Accumulator), BigUint::from(4u32));
    }

    #[test]
    fn test_unroll_accumulator() {
        let ts = CircuitTs::from_circuit(&Accumulator).unwrap();

        assert_eq!(ts.actions().len(), 2);
        assert_eq!(ts.initial_states().len(), 2);
        assert_eq!(ts.states().len(), 4);
        assert_eq!(ts.transitions().len(), 8);
        assert_eq!(ts.reach(), ts.states().clone());

        let x1_r0 = (assign(&[("x", true)]), assign(&[("r", false)]));
        let x1_r1 = (assign(&[("x", true)]), assign(&[("r", true)]));
        let x0_r1 = (assign(&[("x", false)]), assign(&[("r", true)]));

        // x = 1 flips the register on the next tick.
        assert!(ts.post(&x1_r0).contains(&x0_r1));
        assert!(ts.transitions().contains(&Transition::new(x1_r0.clone(), assign(&[("x", true)]), x1_r1.clone())));

        assert_eq!(
            ts.label(&x1_r1).unwrap(),
            &HashSet::from(["x".to_string(), "r".to_string(), "y".to_string()])
        );
        assert_eq!(ts.label(&x0_r1).unwrap(), &HashSet::from(["r".to_string()]));
        assert!(ts.label(&(assign(&[("x", false)]), assign(&[("r", false)]))).unwrap().is_empty());
    }
}
