use std::fmt;

use crate::catalogue::ProviderError;
use crate::core::step::{SideCategory, StepKind};

/// Everything that can go wrong while navigating.
///
/// No variant implies a stack mutation: a failed operation leaves the stack
/// exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// `close()` with nothing open.
    EmptyStack,
    /// A step out of the fixed order. `from` is `None` when nothing is open;
    /// `to` is `None` when no step can follow `from`.
    InvalidTransition {
        from: Option<StepKind>,
        to: Option<StepKind>,
    },
    /// The side-category was already entered on this path.
    DuplicateCategory(SideCategory),
    /// The provider failed while loading `step` beneath `parent_code`.
    ProviderFetch {
        step: StepKind,
        parent_code: String,
        source: ProviderError,
    },
    /// The stack moved on (or a newer request was issued) before the result
    /// arrived; the result was discarded.
    Superseded,
    /// A segment of a restored code matched no option.
    PathNotFound { code: String, segment: String },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::EmptyStack => write!(f, "no step is open"),
            NavError::InvalidTransition { from, to } => match (from, to) {
                (Some(from), Some(to)) => write!(f, "cannot open {to} from {from}"),
                (None, Some(to)) => write!(f, "cannot open {to} without a root"),
                (Some(from), None) => write!(f, "no step follows {from}"),
                (None, None) => write!(f, "no step is open"),
            },
            NavError::DuplicateCategory(category) => {
                write!(f, "{category} is already open on this path")
            }
            NavError::ProviderFetch {
                step,
                parent_code,
                source,
            } => write!(f, "failed to load {step} under '{parent_code}': {source}"),
            NavError::Superseded => write!(f, "result discarded: navigation moved on"),
            NavError::PathNotFound { code, segment } => {
                write!(f, "no match for '{segment}' while restoring '{code}'")
            }
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavError::ProviderFetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
