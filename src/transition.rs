use std::fmt::{self, Debug, Display};

/// A labeled edge `from --action--> to` of a transition system.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transition<S, A> {
    pub from: S,
    pub action: A,
    pub to: S,
}

impl<S, A> Transition<S, A> {
    pub fn new(from: S, action: A, to: S) -> Self {
        Self { from, action, to }
    }
}

impl<S, A> Display for Transition<S, A>
where
    S: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -{:?}-> {:?}", self.from, self.action, self.to)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_structural_equality() {
        let t1 = Transition::new("s0", 'a', "s1");
        let t2 = Transition::new("s0", 'a', "s1");
        let t3 = Transition::new("s0", 'b', "s1");
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
    }

    #[test]
    fn test_display() {
        let t = Transition::new(0, "go", 1);
        assert_eq!(t.to_string(), "0 -\"go\"-> 1");
    }
}
