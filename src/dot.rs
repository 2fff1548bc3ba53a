//! Transition system to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **States** are numbered `s0, s1, ...` in the order of their `Debug` rendering,
//!   so the output does not depend on hash order.
//! - **Initial states** get a distinct shape and, optionally, an incoming arrow
//!   from an invisible point node.
//! - **Edges** are labeled with the action. Parallel edges are kept.
//! - **Labels** (atomic propositions) are shown under the state name.
//!
//! # Examples
//!
//! ```
//! use lts_rs::transition::Transition;
//! use lts_rs::ts::TransitionSystem;
//!
//! let mut ts: TransitionSystem<u32, &str, &str> = TransitionSystem::new();
//! ts.add_all_states([0, 1]);
//! ts.add_action("go");
//! ts.add_initial_state(0).unwrap();
//! ts.add_transition(Transition::new(0, "go", 1)).unwrap();
//!
//! let dot = ts.to_dot().unwrap();
//! assert!(dot.contains("s0 -> s1 [label=\"\\\"go\\\"\"];"));
//! // Render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::HashMap;
use std::fmt::{Debug, Write as _};
use std::hash::Hash;

use crate::ts::TransitionSystem;

/// Configuration options for DOT output generation.
///
/// ```
/// use lts_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     rankdir: "TB",
///     show_labels: false,
///     ..DotConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for non-initial states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for initial states (default: "doublecircle")
    pub initial_shape: &'static str,
    /// Whether to print atomic propositions inside states (default: true)
    pub show_labels: bool,
    /// Whether to draw an arrow into each initial state (default: true)
    pub show_initial_arrow: bool,
    /// Graph layout direction (default: "LR")
    pub rankdir: &'static str,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            initial_shape: "doublecircle",
            show_labels: true,
            show_initial_arrow: true,
            rankdir: "LR",
        }
    }
}

/// Escapes a string for use inside a double-quoted DOT attribute.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<S, A, P> TransitionSystem<S, A, P>
where
    S: Eq + Hash + Debug,
    A: Debug,
    P: Debug,
{
    /// Converts the transition system to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the transition system to DOT format.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut states: Vec<(String, &S)> = self.states().iter().map(|s| (format!("{:?}", s), s)).collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        let ids: HashMap<&S, usize> = states.iter().enumerate().map(|(i, &(_, s))| (s, i)).collect();

        let mut dot = String::new();
        match self.name() {
            Some(name) => writeln!(dot, "digraph \"{}\" {{", escape(name))?,
            None => writeln!(dot, "digraph {{")?,
        }
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "node [shape={}];", config.state_shape)?;

        for (i, (name, s)) in states.iter().enumerate() {
            let mut text = escape(name);
            if config.show_labels {
                let mut props: Vec<String> = self
                    .labeling_function()
                    .get(*s)
                    .into_iter()
                    .flatten()
                    .map(|p| format!("{:?}", p))
                    .collect();
                props.sort();
                if !props.is_empty() {
                    write!(text, "\\n{{{}}}", escape(&props.join(", ")))?;
                }
            }
            if self.initial_states().contains(*s) {
                writeln!(dot, "s{} [shape={}, label=\"{}\"];", i, config.initial_shape, text)?;
            } else {
                writeln!(dot, "s{} [label=\"{}\"];", i, text)?;
            }
        }

        if config.show_initial_arrow {
            for (i, (_, s)) in states.iter().enumerate() {
                if self.initial_states().contains(*s) {
                    writeln!(dot, "init{} [shape=point, style=invis];", i)?;
                    writeln!(dot, "init{} -> s{};", i, i)?;
                }
            }
        }

        let mut edges: Vec<(usize, usize, String)> = self
            .transitions()
            .iter()
            .filter_map(|t| {
                let from = *ids.get(&t.from)?;
                let to = *ids.get(&t.to)?;
                Some((from, to, format!("{:?}", t.action)))
            })
            .collect();
        edges.sort();
        for (from, to, action) in edges {
            writeln!(dot, "s{} -> s{} [label=\"{}\"];", from, to, escape(&action))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
