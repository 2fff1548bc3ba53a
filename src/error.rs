//! Error types shared by every part of the kernel.
//!
//! All errors are precondition violations: the offending element is rendered
//! with its `Debug` representation so that `Error` stays non-generic.

use std::fmt;

use thiserror::Error;

use crate::expr::EvalError;

/// Part of a transition system that still references an element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TsPart {
    Transitions,
    LabelingFunction,
    InitialStates,
}

impl fmt::Display for TsPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsPart::Transitions => write!(f, "transitions"),
            TsPart::LabelingFunction => write!(f, "labeling function"),
            TsPart::InitialStates => write!(f, "initial states"),
        }
    }
}

/// Part of a program graph that still references a location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PgPart {
    Transitions,
    InitialLocations,
}

impl fmt::Display for PgPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgPart::Transitions => write!(f, "transitions"),
            PgPart::InitialLocations => write!(f, "initial locations"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("state not found: {0}")]
    StateNotFound(String),

    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("initial state is not a registered state: {0}")]
    InvalidInitialState(String),

    #[error("transition references unregistered state or action: {0}")]
    InvalidTransition(String),

    #[error("invalid labeling pair ({state}, {proposition}): proposition is not registered")]
    InvalidLabelingPair { state: String, proposition: String },

    #[error("cannot delete state {state}: still referenced by {part}")]
    DeletionOfAttachedState { state: String, part: TsPart },

    #[error("cannot delete action {action}: still referenced by {part}")]
    DeletionOfAttachedAction { action: String, part: TsPart },

    #[error("cannot delete atomic proposition {proposition}: still referenced by {part}")]
    DeletionOfAttachedAtomicProposition { proposition: String, part: TsPart },

    #[error("initial location is not a registered location: {0}")]
    InvalidInitialLocation(String),

    #[error("program graph transition references unregistered location: {0}")]
    InvalidPgTransition(String),

    #[error("cannot delete location {location}: still referenced by {part}")]
    DeletionOfAttachedLocation { location: String, part: PgPart },

    #[error("no action evaluator accepts statement {0:?}")]
    NoMatchingAction(String),

    #[error("alternating sequence needs n + 1 states for n actions, got {states} states and {actions} actions")]
    MalformedSequence { states: usize, actions: usize },

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Renders an element for an error message.
pub(crate) fn show<T: fmt::Debug + ?Sized>(value: &T) -> String {
    format!("{:?}", value)
}
