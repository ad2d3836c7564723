//! Outcome of an action or a judge step

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(PlayerId),
    /// Every player lost at once, or the turn limit was reached
    Draw,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner(id) => write!(f, "player {id} wins"),
            GameOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// Uniform result of executing an action or advancing the judge
///
/// `Error` is a rejected action; the tabletop was left unchanged. `Terminal`
/// means the game is over. Both report `has_error() == true`, so a driver
/// loop that stops on error also stops at game end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionResult {
    Success,
    Error { messages: Vec<String> },
    Terminal {
        outcome: GameOutcome,
        messages: Vec<String>,
    },
}

impl ExecutionResult {
    /// The "nothing to report" sentinel
    pub const fn success() -> Self {
        ExecutionResult::Success
    }

    pub fn error(message: impl Into<String>) -> Self {
        ExecutionResult::Error {
            messages: vec![message.into()],
        }
    }

    pub fn terminal(outcome: GameOutcome, message: impl Into<String>) -> Self {
        ExecutionResult::Terminal {
            outcome,
            messages: vec![message.into()],
        }
    }

    pub fn has_error(&self) -> bool {
        !matches!(self, ExecutionResult::Success)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionResult::Terminal { .. })
    }

    /// Ordered human-readable messages; empty for `Success`
    pub fn messages(&self) -> &[String] {
        match self {
            ExecutionResult::Success => &[],
            ExecutionResult::Error { messages } | ExecutionResult::Terminal { messages, .. } => {
                messages
            }
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            ExecutionResult::Terminal { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.outcome() {
            Some(GameOutcome::Winner(id)) => Some(id),
            _ => None,
        }
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        ExecutionResult::Success
    }
}
