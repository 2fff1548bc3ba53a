//! Expanding program graphs into transition systems.
//!
//! The expanded system has states `(location, valuation)`. Guards and actions
//! are interpreted by pluggable evaluators, tried in registration order; the
//! first evaluator that accepts a text is the one used:
//!
//! - a guard accepted by no [`ConditionDef`] is treated as unsatisfied,
//! - an action accepted by no [`ActionDef`] leaves the valuation unchanged,
//! - an initialization statement accepted by no [`ActionDef`] is an error.
//!
//! Initial states come from every initial location combined with every
//! initialization sequence, applied statement by statement to the empty
//! valuation. Each state is labeled with its location name (see
//! [`LocationName`]) and one `name = value` proposition per variable.
//!
//! # Examples
//!
//! ```
//! use lts_rs::expand::Evaluators;
//! use lts_rs::pg::{PgTransition, ProgramGraph};
//!
//! let mut pg = ProgramGraph::new();
//! pg.add_location("l");
//! pg.add_initial_location("l").unwrap();
//! pg.add_transition(PgTransition::new("l", "x < 2", "x := x + 1", "l")).unwrap();
//! pg.add_initialization(["x := 0"]);
//!
//! let ts = pg.expand(&Evaluators::standard()).unwrap();
//! assert_eq!(ts.states().len(), 3);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::expr::{AssignActionDef, EvalError, ExprConditionDef, Valuation};
use crate::pg::{LocationName, PgTransition, ProgramGraph};
use crate::transition::Transition;
use crate::ts::TransitionSystem;

/// Interprets guards.
pub trait ConditionDef {
    /// Whether this evaluator understands `condition`.
    fn can_evaluate(&self, condition: &str) -> bool;

    /// Whether `eval` satisfies `condition`.
    fn evaluate(&self, eval: &Valuation, condition: &str) -> std::result::Result<bool, EvalError>;
}

/// Interprets actions and initialization statements.
pub trait ActionDef {
    /// Whether this evaluator understands `action`.
    fn is_matching_action(&self, action: &str) -> bool;

    /// Applies `action` to `eval`, producing the successor valuation.
    fn effect(&self, eval: &Valuation, action: &str) -> std::result::Result<Valuation, EvalError>;
}

/// Ordered collections of action and condition evaluators. First match wins.
#[derive(Default)]
pub struct Evaluators {
    actions: Vec<Box<dyn ActionDef>>,
    conditions: Vec<Box<dyn ConditionDef>>,
}

impl Debug for Evaluators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluators")
            .field("actions", &self.actions.len())
            .field("conditions", &self.conditions.len())
            .finish()
    }
}

impl Evaluators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluators for the bundled statement language (see [`crate::expr`]).
    pub fn standard() -> Self {
        Self::new().with_action(AssignActionDef).with_condition(ExprConditionDef)
    }

    pub fn with_action(mut self, def: impl ActionDef + 'static) -> Self {
        self.actions.push(Box::new(def));
        self
    }

    pub fn with_condition(mut self, def: impl ConditionDef + 'static) -> Self {
        self.conditions.push(Box::new(def));
        self
    }

    /// Applies `action` with the first matching evaluator, or returns `None` if none matches.
    pub fn apply_action(&self, eval: &Valuation, action: &str) -> Result<Option<Valuation>> {
        match self.actions.iter().find(|def| def.is_matching_action(action)) {
            Some(def) => Ok(Some(def.effect(eval, action)?)),
            None => Ok(None),
        }
    }

    /// Evaluates `condition` with the first matching evaluator, or returns `None` if none matches.
    pub fn check_condition(&self, eval: &Valuation, condition: &str) -> Result<Option<bool>> {
        match self.conditions.iter().find(|def| def.can_evaluate(condition)) {
            Some(def) => Ok(Some(def.evaluate(eval, condition)?)),
            None => Ok(None),
        }
    }
}

/// State of an expanded program graph: `(location, valuation)`.
pub type PgState<L> = (L, Valuation);

/// Transition system produced by [`ProgramGraph::expand`].
pub type PgTs<L, A> = TransitionSystem<PgState<L>, A, String>;

impl<L, A> ProgramGraph<L, A>
where
    L: Clone + Eq + Hash + Debug + LocationName,
    A: Clone + Eq + Hash + Debug + AsRef<str>,
{
    /// Expands the reachable `(location, valuation)` space into a transition system.
    pub fn expand(&self, evaluators: &Evaluators) -> Result<PgTs<L, A>> {
        debug!(
            "expand(|L| = {}, |T| = {}, inits = {})",
            self.locations().len(),
            self.transitions().len(),
            self.initializations().len()
        );

        let mut outgoing: HashMap<&L, Vec<&PgTransition<L, A>>> = HashMap::new();
        for t in self.transitions() {
            outgoing.entry(&t.from).or_default().push(t);
        }

        let mut ts = TransitionSystem::new();
        let mut stack: Vec<PgState<L>> = Vec::new();

        for location in self.initial_locations() {
            for init in self.initializations() {
                let mut eval = Valuation::new();
                for statement in init {
                    eval = evaluators
                        .apply_action(&eval, statement)?
                        .ok_or_else(|| Error::NoMatchingAction(statement.clone()))?;
                }
                let state = (location.clone(), eval);
                if !ts.states().contains(&state) {
                    register(&mut ts, &state)?;
                }
                ts.add_initial_state(state.clone())?;
                stack.push(state);
            }
        }

        let mut visited: HashSet<PgState<L>> = HashSet::new();
        while let Some(state) = stack.pop() {
            if visited.contains(&state) {
                continue;
            }
            visited.insert(state.clone());

            let (location, eval) = &state;
            let Some(edges) = outgoing.get(location) else {
                continue;
            };
            for t in edges {
                match evaluators.check_condition(eval, &t.condition)? {
                    Some(true) => {}
                    Some(false) => continue,
                    None => {
                        warn!("no condition evaluator accepts {:?}, treating as unsatisfied", t.condition);
                        continue;
                    }
                }
                let next_eval = evaluators
                    .apply_action(eval, t.action.as_ref())?
                    .unwrap_or_else(|| eval.clone());
                let next = (t.to.clone(), next_eval);
                if !ts.states().contains(&next) {
                    register(&mut ts, &next)?;
                }
                ts.add_action(t.action.clone());
                ts.add_transition(Transition::new(state.clone(), t.action.clone(), next.clone()))?;
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }

        debug!(
            "expand: {} states, {} transitions",
            ts.states().len(),
            ts.transitions().len()
        );
        Ok(ts)
    }
}

/// Registers a state labeled with its location and its variable values.
fn register<L, A>(ts: &mut PgTs<L, A>, state: &PgState<L>) -> Result<()>
where
    L: Clone + Eq + Hash + Debug + LocationName,
    A: Clone + Eq + Hash + Debug,
{
    let (location, eval) = state;
    ts.add_state(state.clone());
    let props = std::iter::once(location.location_name())
        .chain(eval.iter().map(|(name, value)| format!("{} = {}", name, value)));
    for p in props {
        ts.add_atomic_proposition(p.clone());
        ts.add_to_label(state.clone(), p)?;
    }
    Ok(())
}
