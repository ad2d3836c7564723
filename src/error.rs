//! Error types for the tabletop engine
//!
//! Everything here is a configuration or programmer fault. Game-rule
//! outcomes (illegal actions, a finished game) are reported as
//! [`ExecutionResult`](crate::game::ExecutionResult) values instead.

use crate::core::{ActionKind, CardType, CostKind, EffectKind, PartKind};
use thiserror::Error;

/// Which registry a handler fault came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerFamily {
    Cost,
    Action,
    Effect,
}

impl std::fmt::Display for HandlerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerFamily::Cost => write!(f, "cost"),
            HandlerFamily::Action => write!(f, "action"),
            HandlerFamily::Effect => write!(f, "effect"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TabletopError {
    #[error("No {family} handler bound for kind {kind}")]
    MissingHandler { family: HandlerFamily, kind: String },

    #[error("A {family} handler is already bound for kind {kind}")]
    DuplicateHandler { family: HandlerFamily, kind: String },

    #[error("Action handler for {handler:?} was given an action of kind {action:?}")]
    ActionKindMismatch { handler: ActionKind, action: ActionKind },

    #[error("Cost handler for {handler:?} was given a cost of kind {cost:?}")]
    CostKindMismatch { handler: CostKind, cost: CostKind },

    #[error("Effect handler for {handler:?} was given an effect of kind {effect:?}")]
    EffectKindMismatch { handler: EffectKind, effect: EffectKind },

    #[error("Card {card} has no {kind:?} part")]
    MissingPart { card: u32, kind: PartKind },

    #[error("Card {card} already has a {kind:?} part")]
    DuplicatePart { card: u32, kind: PartKind },

    #[error("Card {card} is not a {expected:?}")]
    PartKindMismatch { card: u32, expected: CardType },

    #[error("Invalid mana notation {input:?}: {reason}")]
    ManaParse { input: String, reason: String },

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TabletopError>;
