//! Cost, action and effect handlers and the execution manager
//!
//! Every [`CostKind`](crate::core::CostKind), [`ActionKind`](crate::core::ActionKind)
//! and [`EffectKind`](crate::core::EffectKind) is bound to exactly one
//! handler. The [`ExecutionManager`] looks handlers up by kind and runs an
//! action through legality, cost payment and effect resolution.

pub mod actions;
pub mod costs;
pub mod effects;
pub mod manager;
pub mod registry;

use crate::core::{CardId, Cost, Effect, PlayerId, TargetRef};

pub use actions::{ActionHandler, ActivateAbilityHandler, CastSpellHandler, PlayLandHandler};
pub use costs::{CostHandler, ManaCostHandler, PayLifeCostHandler, TapCostHandler};
pub use effects::{
    DealDamageHandler, DrawCardsHandler, EffectHandler, GainLifeHandler, ProduceManaHandler,
};
pub use manager::{ExecutionManager, ExecutionManagerBuilder};
pub use registry::{HandlerKind, Registry};

/// Answer of a legality or cost check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Legality {
    Legal,
    /// Not allowed right now, with a human-readable reason
    Illegal(String),
}

impl Legality {
    pub fn illegal(reason: impl Into<String>) -> Self {
        Legality::Illegal(reason.into())
    }

    pub fn is_legal(&self) -> bool {
        matches!(self, Legality::Legal)
    }

    /// `Legal` if `condition` holds, otherwise `Illegal(reason())`
    pub fn require(condition: bool, reason: impl FnOnce() -> String) -> Self {
        if condition {
            Legality::Legal
        } else {
            Legality::Illegal(reason())
        }
    }
}

/// Who is paying and resolving, from which source, at which target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionContext {
    pub player: PlayerId,
    /// The permanent whose ability is activated, or the spell being cast
    pub source: Option<CardId>,
    pub target: Option<TargetRef>,
}

/// What an action costs and what it does, as decided by its handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub context: ResolutionContext,
    pub costs: Vec<Cost>,
    pub effects: Vec<Effect>,
}
