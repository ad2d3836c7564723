//! Action handlers
//!
//! An action handler judges whether an action is allowed, says what it
//! costs and does (its [`ActionPlan`]), and performs the zone moves that
//! complete it once costs are paid and effects resolved.

use crate::core::{Ability, Action, ActionKind, CardId, Cost, CreatureProxy, PlayerId, TargetRef};
use crate::game::Tabletop;
use crate::handlers::{ActionPlan, Legality, ResolutionContext};
use crate::{Result, TabletopError};

pub trait ActionHandler {
    fn kind(&self) -> ActionKind;

    /// Is `action` allowed in the current state? Never mutates.
    fn check(&self, table: &Tabletop, action: &Action) -> Result<Legality>;

    /// Costs to pay and effects to resolve; only called for legal actions
    fn plan(&self, table: &Tabletop, action: &Action) -> Result<ActionPlan>;

    /// Runs after every effect has resolved
    fn finish(&self, _table: &mut Tabletop, _action: &Action) -> Result<()> {
        Ok(())
    }
}

fn kind_mismatch(handler: ActionKind, action: &Action) -> TabletopError {
    TabletopError::ActionKindMismatch {
        handler,
        action: action.kind(),
    }
}

/// Lands, sorcery-speed spells and non-mana abilities: the active player's main phase
fn main_phase_timing(table: &Tabletop, player: PlayerId) -> Legality {
    if !table.phase.is_main() {
        return Legality::illegal(format!("not allowed during {}", table.phase));
    }
    Legality::require(table.active_player_id() == player, || {
        "only the active player may do this".to_string()
    })
}

fn in_hand(table: &Tabletop, player: PlayerId, card: CardId) -> Result<Legality> {
    let hand = &table.get_player(player)?.zones.hand;
    Ok(Legality::require(hand.contains(card), || {
        format!("card {card} is not in the player's hand")
    }))
}

/// A target must be given exactly when an effect needs one, and must be a
/// living player or a creature on the battlefield
pub fn check_target(table: &Tabletop, needs_target: bool, target: Option<TargetRef>) -> Legality {
    match (needs_target, target) {
        (false, None) => Legality::Legal,
        (false, Some(_)) => Legality::illegal("this takes no target"),
        (true, None) => Legality::illegal("a target is required"),
        (true, Some(TargetRef::Player(id))) => Legality::require(
            table.get_player(id).is_ok_and(|p| !p.has_lost()),
            || format!("player {id} is not a legal target"),
        ),
        (true, Some(TargetRef::Permanent(id))) => Legality::require(
            table
                .permanent(id)
                .is_some_and(|p| CreatureProxy::new(p).is_ok()),
            || format!("{id} is not a creature on the battlefield"),
        ),
    }
}

/// Ability `index` of permanent `source`, if both exist
pub fn ability_of(table: &Tabletop, source: CardId, index: usize) -> Option<&Ability> {
    table
        .permanent(source)?
        .card
        .characteristics()?
        .abilities
        .get(index)
}

/// One-line log description, e.g. "Alice casts Lightning Bolt targeting player 1"
pub fn describe_action(table: &Tabletop, action: &Action) -> String {
    let player = table
        .get_player(action.player())
        .map(|p| p.name.to_string())
        .unwrap_or_else(|_| format!("player {}", action.player()));
    let card = table
        .find_card(action.card())
        .map(|c| c.name.to_string())
        .unwrap_or_else(|_| format!("card {}", action.card()));
    let verb = match action {
        Action::PlayLand { .. } => "plays",
        Action::CastSpell { .. } => "casts",
        Action::ActivateAbility { .. } => "activates",
    };
    match action.target() {
        Some(target) => format!("{player} {verb} {card} ({}) targeting {target}", action.card()),
        None => format!("{player} {verb} {card} ({})", action.card()),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlayLandHandler;

impl ActionHandler for PlayLandHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::PlayLand
    }

    fn check(&self, table: &Tabletop, action: &Action) -> Result<Legality> {
        let Action::PlayLand { player, card } = *action else {
            return Err(kind_mismatch(self.kind(), action));
        };
        let timing = main_phase_timing(table, player);
        if !timing.is_legal() {
            return Ok(timing);
        }
        let held = in_hand(table, player, card)?;
        if !held.is_legal() {
            return Ok(held);
        }
        if !table.card(card)?.is_land() {
            return Ok(Legality::illegal(format!("card {card} is not a land")));
        }
        Ok(Legality::require(
            table.get_player(player)?.can_play_land(),
            || "no land drop left this turn".to_string(),
        ))
    }

    fn plan(&self, _table: &Tabletop, action: &Action) -> Result<ActionPlan> {
        let Action::PlayLand { player, card } = *action else {
            return Err(kind_mismatch(self.kind(), action));
        };
        Ok(ActionPlan {
            context: ResolutionContext {
                player,
                source: Some(card),
                target: None,
            },
            costs: Vec::new(),
            effects: Vec::new(),
        })
    }

    fn finish(&self, table: &mut Tabletop, action: &Action) -> Result<()> {
        let Action::PlayLand { player, card } = *action else {
            return Err(kind_mismatch(self.kind(), action));
        };
        table.move_to_battlefield(card, player)?;
        table.get_player_mut(player)?.play_land();
        Ok(())
    }
}

/// Spells resolve immediately: permanents enter the battlefield, instants
/// and sorceries apply their spell effects and go to the graveyard
#[derive(Debug, Default, Clone, Copy)]
pub struct CastSpellHandler;

impl ActionHandler for CastSpellHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CastSpell
    }

    fn check(&self, table: &Tabletop, action: &Action) -> Result<Legality> {
        let Action::CastSpell {
            player,
            card,
            target,
        } = *action
        else {
            return Err(kind_mismatch(self.kind(), action));
        };
        let timing = main_phase_timing(table, player);
        if !timing.is_legal() {
            return Ok(timing);
        }
        let held = in_hand(table, player, card)?;
        if !held.is_legal() {
            return Ok(held);
        }
        let spell = table.card(card)?;
        if spell.is_land() {
            return Ok(Legality::illegal(format!("{} is a land", spell.name)));
        }
        let needs_target = spell
            .characteristics()
            .is_some_and(|c| c.spell_effects.iter().any(|e| e.needs_target()));
        Ok(check_target(table, needs_target, target))
    }

    fn plan(&self, table: &Tabletop, action: &Action) -> Result<ActionPlan> {
        let Action::CastSpell {
            player,
            card,
            target,
        } = *action
        else {
            return Err(kind_mismatch(self.kind(), action));
        };
        let spell = table.card(card)?;
        let costs = if spell.mana_cost.is_empty() {
            Vec::new()
        } else {
            vec![Cost::Mana(spell.mana_cost)]
        };
        let effects = match spell.characteristics() {
            Some(c) if !spell.is_permanent_card() => c.spell_effects.clone(),
            _ => Vec::new(),
        };
        Ok(ActionPlan {
            context: ResolutionContext {
                player,
                source: Some(card),
                target,
            },
            costs,
            effects,
        })
    }

    fn finish(&self, table: &mut Tabletop, action: &Action) -> Result<()> {
        let Action::CastSpell { player, card, .. } = *action else {
            return Err(kind_mismatch(self.kind(), action));
        };
        if table.card(card)?.is_permanent_card() {
            table.move_to_battlefield(card, player)
        } else {
            table.move_to_graveyard(card)
        }
    }
}

/// Mana abilities can be activated at any time; others at sorcery speed
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivateAbilityHandler;

impl ActionHandler for ActivateAbilityHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::ActivateAbility
    }

    fn check(&self, table: &Tabletop, action: &Action) -> Result<Legality> {
        let Action::ActivateAbility {
            player,
            source,
            ability_index,
            target,
        } = *action
        else {
            return Err(kind_mismatch(self.kind(), action));
        };
        let Some(permanent) = table.permanent(source) else {
            return Ok(Legality::illegal(format!("{source} is not on the battlefield")));
        };
        if permanent.controller != player {
            return Ok(Legality::illegal(format!(
                "{} is controlled by another player",
                permanent.name()
            )));
        }
        let Some(ability) = ability_of(table, source, ability_index) else {
            return Ok(Legality::illegal(format!(
                "{} has no ability {ability_index}",
                permanent.name()
            )));
        };
        if !ability.is_mana_ability() {
            let timing = main_phase_timing(table, player);
            if !timing.is_legal() {
                return Ok(timing);
            }
        }
        Ok(check_target(table, ability.needs_target(), target))
    }

    fn plan(&self, table: &Tabletop, action: &Action) -> Result<ActionPlan> {
        let Action::ActivateAbility {
            player,
            source,
            ability_index,
            target,
        } = *action
        else {
            return Err(kind_mismatch(self.kind(), action));
        };
        let ability = ability_of(table, source, ability_index).ok_or_else(|| {
            TabletopError::InvalidArgument(format!("{source} has no ability {ability_index}"))
        })?;
        Ok(ActionPlan {
            context: ResolutionContext {
                player,
                source: Some(source),
                target,
            },
            costs: ability.costs.to_vec(),
            effects: ability.effects.to_vec(),
        })
    }
}
