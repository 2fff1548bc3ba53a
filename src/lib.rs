//! # lts-rs: Labeled transition systems in Rust
//!
//! **`lts-rs`** is a library of explicit-state building blocks for model checking:
//! labeled transition systems, program graphs, and the constructions that turn
//! one into another.
//!
//! ## What is a transition system?
//!
//! A transition system is a tuple `(S, Act, →, I, AP, L)`: states, actions, a
//! transition relation `→ ⊆ S × Act × S`, initial states, atomic propositions
//! and a labeling function `L: S → 2^AP`. It is the semantic model underneath
//! temporal-logic model checking.
//!
//! ## Key Features
//!
//! - **Checked construction**: every mutation of a [`TransitionSystem`][crate::ts::TransitionSystem]
//!   validates its references and returns a typed [`Error`][crate::error::Error].
//! - **Queries**: successors, predecessors, reachability, determinism and execution checks.
//! - **Products**: interleaving of transition systems (with handshaking) and of program graphs.
//! - **Unrolling**: sequential circuits and program graphs become transition systems.
//! - **Visualization**: DOT export for Graphviz.
//!
//! ## Basic Usage
//!
//! ```rust
//! use lts_rs::transition::Transition;
//! use lts_rs::ts::TransitionSystem;
//!
//! let mut ts: TransitionSystem<&str, &str, &str> = TransitionSystem::new();
//!
//! // 1. Register the vocabulary
//! ts.add_all_states(["red", "green"]);
//! ts.add_action("switch");
//! ts.add_atomic_proposition("go");
//!
//! // 2. Wire it up (references must already be registered)
//! ts.add_initial_state("red").unwrap();
//! ts.add_transition(Transition::new("red", "switch", "green")).unwrap();
//! ts.add_transition(Transition::new("green", "switch", "red")).unwrap();
//! ts.add_to_label("green", "go").unwrap();
//!
//! // 3. Ask questions
//! assert_eq!(ts.reach().len(), 2);
//! assert!(ts.is_action_deterministic());
//! assert!(ts.add_transition(Transition::new("red", "switch", "blue")).is_err());
//! ```
//!
//! ## Core Components
//!
//! - **[`ts`]**: the [`TransitionSystem`][crate::ts::TransitionSystem] container.
//! - **[`query`]**: post/pre, reachability and execution-fragment checks.
//! - **[`interleave`]**: parallel composition.
//! - **[`circuit`]** and **[`expand`]**: building transition systems from circuits and program graphs.
//! - **[`dot`]**: utilities for visualizing transition systems using Graphviz.

pub mod circuit;
pub mod dot;
pub mod error;
pub mod expand;
pub mod expr;
pub mod interleave;
pub mod pg;
pub mod query;
pub mod sequence;
pub mod transition;
pub mod ts;

pub use error::{Error, Result};
