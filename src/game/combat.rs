//! Combat: declaring attackers, declaring blockers, and combat damage
//!
//! Each attacker can be blocked by at most one creature and each blocker
//! blocks at most one attacker. All combat damage is computed from the
//! declared state first and then applied at once.

use crate::core::{CardId, CreatureProxy, CreatureProxyMut, PlayerId};
use crate::game::Tabletop;
use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combat state for the current combat phase
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// Attacker -> the player it attacks
    pub attackers: BTreeMap<CardId, PlayerId>,
    /// Attacker -> the creature blocking it
    pub blocks: BTreeMap<CardId, CardId>,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_attacker(&mut self, attacker: CardId, defending_player: PlayerId) {
        self.attackers.insert(attacker, defending_player);
    }

    /// Record a block; refused if the attacker is not attacking, is
    /// already blocked, or the blocker is already blocking
    pub fn declare_blocker(&mut self, blocker: CardId, attacker: CardId) -> bool {
        if !self.is_attacking(attacker) || self.is_blocked(attacker) || self.is_blocking(blocker)
        {
            return false;
        }
        self.blocks.insert(attacker, blocker);
        true
    }

    pub fn is_attacking(&self, card_id: CardId) -> bool {
        self.attackers.contains_key(&card_id)
    }

    pub fn is_blocking(&self, card_id: CardId) -> bool {
        self.blocks.values().any(|&b| b == card_id)
    }

    pub fn is_blocked(&self, attacker: CardId) -> bool {
        self.blocks.contains_key(&attacker)
    }

    pub fn blocker_of(&self, attacker: CardId) -> Option<CardId> {
        self.blocks.get(&attacker).copied()
    }

    pub fn defending_player(&self, attacker: CardId) -> Option<PlayerId> {
        self.attackers.get(&attacker).copied()
    }

    pub fn get_attackers(&self) -> Vec<CardId> {
        self.attackers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty()
    }

    pub fn clear(&mut self) {
        self.attackers.clear();
        self.blocks.clear();
    }
}

/// Creatures `player` could attack with: untapped and not summoning sick
pub fn attack_candidates(table: &Tabletop, player: PlayerId) -> Vec<CardId> {
    table
        .permanents_of(player)
        .filter_map(|p| CreatureProxy::new(p).ok())
        .filter(|c| c.can_attack())
        .map(|c| c.id())
        .collect()
}

/// Creatures `player` could block with: untapped
pub fn block_candidates(table: &Tabletop, player: PlayerId) -> Vec<CardId> {
    table
        .permanents_of(player)
        .filter_map(|p| CreatureProxy::new(p).ok())
        .filter(|c| c.can_block())
        .map(|c| c.id())
        .collect()
}

/// Declare and tap the chosen attackers; choices outside `candidates` are ignored
pub fn declare_attackers(
    table: &mut Tabletop,
    combat: &mut CombatState,
    chosen: &[CardId],
    candidates: &[CardId],
    defender: PlayerId,
) -> Result<Vec<String>> {
    let mut events = Vec::new();
    for &attacker in chosen {
        if !candidates.contains(&attacker) || combat.is_attacking(attacker) {
            continue;
        }
        let permanent = table
            .permanent_mut(attacker)
            .ok_or(TabletopError::EntityNotFound(attacker.as_u32()))?;
        permanent.tap();
        events.push(format!("{} ({attacker}) attacks", permanent.name()));
        combat.declare_attacker(attacker, defender);
    }
    Ok(events)
}

/// Record blocks; invalid pairs are ignored
pub fn declare_blockers(
    table: &Tabletop,
    combat: &mut CombatState,
    chosen: &[(CardId, CardId)],
    candidates: &[CardId],
) -> Vec<String> {
    let mut events = Vec::new();
    for &(blocker, attacker) in chosen {
        if !candidates.contains(&blocker) {
            continue;
        }
        if combat.declare_blocker(blocker, attacker) {
            let name = table.permanent(blocker).map_or("?", |p| p.name());
            events.push(format!("{name} ({blocker}) blocks {attacker}"));
        }
    }
    events
}

enum Hit {
    Player(PlayerId, i32),
    Creature(CardId, i32),
}

/// Deal all combat damage simultaneously
///
/// Unblocked attackers damage the defending player; an attacker and its
/// blocker damage each other. Deaths are left to state-based actions.
pub fn resolve_combat_damage(table: &mut Tabletop, combat: &CombatState) -> Result<Vec<String>> {
    let power_of = |id: CardId| -> Option<i32> {
        table
            .permanent(id)
            .and_then(|p| CreatureProxy::new(p).ok())
            .map(|c| c.power().max(0))
    };

    let mut hits = Vec::new();
    for (&attacker, &defender) in &combat.attackers {
        // An attacker removed before damage deals none
        let Some(power) = power_of(attacker) else {
            continue;
        };
        match combat.blocker_of(attacker) {
            Some(blocker) => {
                if let Some(blocker_power) = power_of(blocker) {
                    hits.push(Hit::Creature(blocker, power));
                    hits.push(Hit::Creature(attacker, blocker_power));
                }
            }
            None => hits.push(Hit::Player(defender, power)),
        }
    }

    let mut events = Vec::new();
    for hit in hits {
        match hit {
            Hit::Player(player, amount) => {
                let player = table.get_player_mut(player)?;
                player.lose_life(amount);
                events.push(format!(
                    "{} takes {amount} combat damage ({} life)",
                    player.name, player.life
                ));
            }
            Hit::Creature(id, amount) => {
                let permanent = table
                    .permanent_mut(id)
                    .ok_or(TabletopError::EntityNotFound(id.as_u32()))?;
                let name = permanent.name().to_string();
                CreatureProxyMut::new(permanent)?.deal_damage(amount);
                events.push(format!("{name} ({id}) takes {amount} combat damage"));
            }
        }
    }
    Ok(events)
}
