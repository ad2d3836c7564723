//! Card effects

use crate::core::{CardId, ManaCost, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target reference for effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// Target a player
    Player(PlayerId),
    /// Target a permanent on the battlefield
    Permanent(CardId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Player(id) => write!(f, "player {id}"),
            TargetRef::Permanent(id) => write!(f, "permanent {id}"),
        }
    }
}

/// Discriminant for [`Effect`]; each kind is resolved by exactly one effect handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    ProduceMana,
    DealDamage,
    GainLife,
    DrawCards,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::ProduceMana,
        EffectKind::DealDamage,
        EffectKind::GainLife,
        EffectKind::DrawCards,
    ];
}

/// Game-state changes applied when an action resolves
///
/// Amounts are fixed by the card definition. Who is affected comes from
/// the resolving action: its controller, or its chosen target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Add mana to the controller's pool
    /// Example: "{T}: Add {G}"
    ProduceMana { mana: ManaCost },

    /// Deal damage to the chosen target
    /// Example: "Lightning Bolt deals 3 damage to any target"
    DealDamage { amount: u32 },

    /// The controller gains life
    GainLife { amount: u32 },

    /// The controller draws cards
    DrawCards { count: u32 },
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::ProduceMana { .. } => EffectKind::ProduceMana,
            Effect::DealDamage { .. } => EffectKind::DealDamage,
            Effect::GainLife { .. } => EffectKind::GainLife,
            Effect::DrawCards { .. } => EffectKind::DrawCards,
        }
    }

    pub fn needs_target(&self) -> bool {
        matches!(self, Effect::DealDamage { .. })
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ProduceMana { mana } => write!(f, "add {mana}"),
            Effect::DealDamage { amount } => write!(f, "deal {amount} damage"),
            Effect::GainLife { amount } => write!(f, "gain {amount} life"),
            Effect::DrawCards { count } => write!(f, "draw {count}"),
        }
    }
}
