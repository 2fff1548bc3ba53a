//! Program graphs: the symbolic, unexpanded model of a sequential process.
//!
//! A program graph has locations, guarded transitions that carry an action,
//! and a set of alternative initializations of the shared variables. Guards
//! and initialization statements are kept as text. They only get a meaning
//! when the graph is expanded (see [`crate::expand`]).

use std::collections::HashSet;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use crate::error::{show, Error, PgPart, Result};

/// Renders a location as the atomic proposition that names it in expanded systems.
pub trait LocationName {
    fn location_name(&self) -> String;
}

macro_rules! impl_location_name {
    ($($t:ty),* $(,)?) => {
        $(
            impl LocationName for $t {
                fn location_name(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_location_name!(String, &str, char, bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Product locations render as `<l1,l2>`.
impl<L1: LocationName, L2: LocationName> LocationName for (L1, L2) {
    fn location_name(&self) -> String {
        format!("<{},{}>", self.0.location_name(), self.1.location_name())
    }
}

/// A guarded edge `from --[condition] action--> to`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PgTransition<L, A> {
    pub from: L,
    pub condition: String,
    pub action: A,
    pub to: L,
}

impl<L, A> PgTransition<L, A> {
    pub fn new(from: L, condition: impl Into<String>, action: A, to: L) -> Self {
        Self {
            from,
            condition: condition.into(),
            action,
            to,
        }
    }
}

impl<L, A> Display for PgTransition<L, A>
where
    L: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -[{}] {:?}-> {:?}",
            self.from, self.condition, self.action, self.to
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProgramGraph<L, A> {
    name: Option<String>,
    locations: HashSet<L>,
    initial: HashSet<L>,
    transitions: HashSet<PgTransition<L, A>>,
    /// Each sequence is one alternative way to initialize the variables.
    initializations: HashSet<Vec<String>>,
}

impl<L, A> Default for ProgramGraph<L, A> {
    fn default() -> Self {
        Self {
            name: None,
            locations: HashSet::new(),
            initial: HashSet::new(),
            transitions: HashSet::new(),
            initializations: HashSet::new(),
        }
    }
}

impl<L, A> ProgramGraph<L, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn locations(&self) -> &HashSet<L> {
        &self.locations
    }

    pub fn initial_locations(&self) -> &HashSet<L> {
        &self.initial
    }

    pub fn transitions(&self) -> &HashSet<PgTransition<L, A>> {
        &self.transitions
    }

    pub fn initializations(&self) -> &HashSet<Vec<String>> {
        &self.initializations
    }
}

impl<L, A> ProgramGraph<L, A>
where
    L: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    pub fn add_location(&mut self, location: L) {
        self.locations.insert(location);
    }

    pub fn add_initial_location(&mut self, location: L) -> Result<()> {
        if !self.locations.contains(&location) {
            return Err(Error::InvalidInitialLocation(show(&location)));
        }
        self.initial.insert(location);
        Ok(())
    }

    pub fn add_transition(&mut self, t: PgTransition<L, A>) -> Result<()> {
        if !self.locations.contains(&t.from) || !self.locations.contains(&t.to) {
            return Err(Error::InvalidPgTransition(t.to_string()));
        }
        self.transitions.insert(t);
        Ok(())
    }

    pub fn add_initialization<I, T>(&mut self, statements: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.initializations
            .insert(statements.into_iter().map(Into::into).collect());
    }

    /// Removes a location that is neither initial nor an endpoint of a transition.
    pub fn remove_location(&mut self, location: &L) -> Result<()> {
        if self.transitions.iter().any(|t| &t.from == location || &t.to == location) {
            return Err(Error::DeletionOfAttachedLocation {
                location: show(location),
                part: PgPart::Transitions,
            });
        }
        if self.initial.contains(location) {
            return Err(Error::DeletionOfAttachedLocation {
                location: show(location),
                part: PgPart::InitialLocations,
            });
        }
        self.locations.remove(location);
        Ok(())
    }

    pub fn remove_initial_location(&mut self, location: &L) {
        self.initial.remove(location);
    }

    pub fn remove_transition(&mut self, t: &PgTransition<L, A>) {
        self.transitions.remove(t);
    }
}

impl<L, A> PartialEq for ProgramGraph<L, A>
where
    L: Eq + Hash,
    A: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.locations == other.locations
            && self.initial == other.initial
            && self.transitions == other.transitions
            && self.initializations == other.initializations
    }
}

impl<L, A> Eq for ProgramGraph<L, A>
where
    L: Eq + Hash,
    A: Eq + Hash,
{
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn counter() -> ProgramGraph<&'static str, &'static str> {
        let mut pg = ProgramGraph::new();
        pg.add_location("loop");
        pg.add_location("done");
        pg.add_initial_location("loop").unwrap();
        pg.add_transition(PgTransition::new("loop", "x < 3", "x := x + 1", "loop"))
            .unwrap();
        pg.add_transition(PgTransition::new("loop", "x == 3", "skip", "done"))
            .unwrap();
        pg.add_initialization(["x := 0"]);
        pg
    }

    #[test]
    fn test_build() {
        let pg = counter();
        assert_eq!(pg.locations().len(), 2);
        assert_eq!(pg.initial_locations().len(), 1);
        assert_eq!(pg.transitions().len(), 2);
        assert!(pg.initializations().contains(&vec!["x := 0".to_string()]));
    }

    #[test]
    fn test_invalid_endpoints() {
        let mut pg = counter();
        assert!(matches!(
            pg.add_initial_location("nowhere"),
            Err(Error::InvalidInitialLocation(_))
        ));
        assert!(matches!(
            pg.add_transition(PgTransition::new("done", "", "skip", "nowhere")),
            Err(Error::InvalidPgTransition(_))
        ));
        assert!(matches!(
            pg.add_transition(PgTransition::new("nowhere", "", "skip", "done")),
            Err(Error::InvalidPgTransition(_))
        ));
    }

    #[test]
    fn test_remove_location() {
        let mut pg = counter();
        assert!(matches!(
            pg.remove_location(&"done"),
            Err(Error::DeletionOfAttachedLocation {
                part: PgPart::Transitions,
                ..
            })
        ));

        pg.add_location("spare");
        pg.add_initial_location("spare").unwrap();
        assert!(matches!(
            pg.remove_location(&"spare"),
            Err(Error::DeletionOfAttachedLocation {
                part: PgPart::InitialLocations,
                ..
            })
        ));
        pg.remove_initial_location(&"spare");
        pg.remove_location(&"spare").unwrap();

        pg.remove_transition(&PgTransition::new("loop", "x == 3", "skip", "done"));
        pg.remove_location(&"done").unwrap();
        assert_eq!(pg.locations().len(), 1);
    }

    #[test]
    fn test_location_names() {
        assert_eq!("l0".location_name(), "l0");
        assert_eq!("l0".to_string().location_name(), "l0");
        assert_eq!(7u32.location_name(), "7");
        assert_eq!(("p0", 1u8).location_name(), "<p0,1>");
        assert_eq!((("a", "b"), "c").location_name(), "<<a,b>,c>");
    }

    #[test]
    fn test_equality() {
        let a = counter();
        let mut b = counter();
        assert_eq!(a, b);
        b.add_initialization(["x := 1"]);
        assert_ne!(a, b);
    }
}
