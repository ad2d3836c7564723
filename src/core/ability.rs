//! Abilities granted by a card's characteristics

use crate::core::{Cost, Effect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// "{T}: Add {G}" style abilities; usable in any phase
    ProducingMana,
    /// Any other activated ability; main phase only
    Activated,
}

/// Zero or more costs paid for zero or more effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    #[serde(default)]
    pub costs: SmallVec<[Cost; 2]>,
    #[serde(default)]
    pub effects: SmallVec<[Effect; 1]>,
}

impl Ability {
    pub fn new(kind: AbilityKind) -> Self {
        Ability {
            kind,
            costs: SmallVec::new(),
            effects: SmallVec::new(),
        }
    }

    /// The usual "{T}: Add <mana>" ability
    pub fn tap_for_mana(mana: crate::core::ManaCost) -> Self {
        Ability::new(AbilityKind::ProducingMana)
            .with_cost(Cost::Tap)
            .with_effect(Effect::ProduceMana { mana })
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_mana_ability(&self) -> bool {
        self.kind == AbilityKind::ProducingMana
    }

    pub fn needs_target(&self) -> bool {
        self.effects.iter().any(Effect::needs_target)
    }
}
