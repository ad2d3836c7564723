//! Actions a player can ask the engine to perform
//!
//! Every playable choice is one of these: playing a land, casting a spell,
//! or activating an ability of a permanent. Lands and spells resolve
//! immediately; there is no stack.

use crate::core::{CardId, PlayerId, TargetRef};
use serde::{Deserialize, Serialize};

/// Discriminant for [`Action`]; each kind is judged by exactly one action handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    PlayLand,
    CastSpell,
    ActivateAbility,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [
        ActionKind::PlayLand,
        ActionKind::CastSpell,
        ActionKind::ActivateAbility,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Put a land from hand onto the battlefield (one per turn)
    PlayLand { player: PlayerId, card: CardId },

    /// Cast a spell from hand, paying its mana cost
    CastSpell {
        player: PlayerId,
        card: CardId,
        target: Option<TargetRef>,
    },

    /// Activate ability `ability_index` of a permanent the player controls
    ActivateAbility {
        player: PlayerId,
        source: CardId,
        ability_index: usize,
        target: Option<TargetRef>,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PlayLand { .. } => ActionKind::PlayLand,
            Action::CastSpell { .. } => ActionKind::CastSpell,
            Action::ActivateAbility { .. } => ActionKind::ActivateAbility,
        }
    }

    /// The acting player
    pub fn player(&self) -> PlayerId {
        match self {
            Action::PlayLand { player, .. }
            | Action::CastSpell { player, .. }
            | Action::ActivateAbility { player, .. } => *player,
        }
    }

    /// The card being played or activated
    pub fn card(&self) -> CardId {
        match self {
            Action::PlayLand { card, .. } | Action::CastSpell { card, .. } => *card,
            Action::ActivateAbility { source, .. } => *source,
        }
    }

    pub fn target(&self) -> Option<TargetRef> {
        match self {
            Action::PlayLand { .. } => None,
            Action::CastSpell { target, .. } | Action::ActivateAbility { target, .. } => *target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;

    #[test]
    fn test_action_accessors() {
        let player = EntityId::new(0);
        let card = EntityId::new(7);

        let land = Action::PlayLand { player, card };
        assert_eq!(land.kind(), ActionKind::PlayLand);
        assert_eq!(land.card(), card);
        assert_eq!(land.target(), None);

        let ability = Action::ActivateAbility {
            player,
            source: card,
            ability_index: 1,
            target: Some(TargetRef::Player(player)),
        };
        assert_eq!(ability.kind(), ActionKind::ActivateAbility);
        assert_eq!(ability.player(), player);
        assert_eq!(ability.target(), Some(TargetRef::Player(player)));
    }
}
