use thiserror::Error;

use crate::models::{Decision, Phase};

/// Controller operation names, used in error reports and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BeginDrag,
    UpdateDrag,
    EndDrag,
    ForceDecide,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::BeginDrag => "begin_drag",
            Operation::UpdateDrag => "update_drag",
            Operation::EndDrag => "end_drag",
            Operation::ForceDecide => "force_decide",
        };
        f.write_str(name)
    }
}

/// Errors reported by the swipe controller
///
/// None of these leave the controller in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwipeError {
    #[error("{operation} is not valid while {phase}")]
    InvalidStateTransition { operation: Operation, phase: Phase },

    #[error("No candidates left in the deck")]
    EmptyDeck,

    #[error("Animation interrupted before {dropped:?} was committed")]
    AnimationInterrupted { dropped: Decision },

    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

impl SwipeError {
    /// Whether this is the terminal "no more candidates" condition rather than a misuse
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwipeError::EmptyDeck)
    }
}
