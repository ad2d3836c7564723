//! Point-in-time summaries of the tabletop for observers
//!
//! A snapshot is a flat, serializable copy of what a spectator would see:
//! life totals, pools, zone sizes and the battlefield. It holds no references
//! into the live tabletop, so observers may keep a history of them.

use crate::core::{CardId, CreatureProxy, LossReason, PlayerId};
use crate::game::{Phase, Tabletop};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub life: i32,
    pub mana: String,
    pub library: usize,
    pub hand: usize,
    pub graveyard: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<LossReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentSummary {
    pub id: CardId,
    pub name: String,
    pub controller: PlayerId,
    pub tapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletopSnapshot {
    pub turn: u32,
    pub phase: Phase,
    pub active_player: Option<PlayerId>,
    pub players: Vec<PlayerSummary>,
    pub battlefield: Vec<PermanentSummary>,
}

impl TabletopSnapshot {
    pub fn capture(table: &Tabletop) -> Self {
        let players = table
            .players
            .iter()
            .map(|p| PlayerSummary {
                id: p.id,
                name: p.name.to_string(),
                life: p.life,
                mana: p.mana_pool.to_string(),
                library: p.zones.library.len(),
                hand: p.zones.hand.len(),
                graveyard: p.zones.graveyard.len(),
                loss: p.loss,
            })
            .collect();

        let battlefield = table
            .battlefield
            .iter()
            .map(|perm| {
                let creature = CreatureProxy::new(perm).ok();
                PermanentSummary {
                    id: perm.id(),
                    name: perm.name().to_string(),
                    controller: perm.controller,
                    tapped: perm.tapped,
                    power: creature.as_ref().map(|c| c.power()),
                    toughness: creature.as_ref().map(|c| c.toughness()),
                    damage: creature.as_ref().map(|c| c.damage()),
                }
            })
            .collect();

        TabletopSnapshot {
            turn: table.turn,
            phase: table.phase,
            active_player: table.players.get(table.active_player_idx).map(|p| p.id),
            players,
            battlefield,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for TabletopSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Turn {} - {} ===", self.turn, self.phase)?;
        for p in &self.players {
            let marker = if Some(p.id) == self.active_player {
                "*"
            } else {
                " "
            };
            write!(
                f,
                "{marker} {} ({}): life {}, pool [{}], library {}, hand {}, graveyard {}",
                p.name, p.id, p.life, p.mana, p.library, p.hand, p.graveyard
            )?;
            if let Some(reason) = p.loss {
                write!(f, ", lost ({reason:?})")?;
            }
            writeln!(f)?;
        }
        for perm in &self.battlefield {
            write!(f, "    {} ({}) [P{}]", perm.name, perm.id, perm.controller)?;
            if let (Some(power), Some(toughness)) = (perm.power, perm.toughness) {
                write!(f, " {power}/{toughness}")?;
            }
            if let Some(damage) = perm.damage.filter(|&d| d > 0) {
                write!(f, " damage {damage}")?;
            }
            if perm.tapped {
                write!(f, " (tapped)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, CreaturePart};

    #[test]
    fn test_capture_summarizes_table() {
        let mut table = Tabletop::new();
        let alice = table.add_player("Alice", 20);
        table.add_player("Bob", 18);

        let id = table.next_card_id();
        let card = Card::new(id, "Grizzly Bears", alice)
            .with_type(CardType::Creature)
            .with_part(CreaturePart::new(2, 2))
            .unwrap();
        table.add_card_to_hand(card).unwrap();
        table.move_to_battlefield(id, alice).unwrap();

        let land = table.next_card_id();
        table
            .add_card_to_library(Card::new(land, "Forest", alice).with_type(CardType::Land))
            .unwrap();

        let snapshot = TabletopSnapshot::capture(&table);
        assert_eq!(snapshot.active_player, Some(alice));
        assert_eq!(snapshot.players[0].library, 1);
        assert_eq!(snapshot.players[0].hand, 0);
        assert_eq!(snapshot.players[1].life, 18);
        assert_eq!(snapshot.battlefield.len(), 1);
        assert_eq!(snapshot.battlefield[0].power, Some(2));

        let text = snapshot.to_string();
        assert!(text.contains("Grizzly Bears"));
        assert!(text.contains("2/2"));
    }

    #[test]
    fn test_snapshot_json() {
        let mut table = Tabletop::new();
        table.add_player("Alice", 20);
        let json = TabletopSnapshot::capture(&table).to_json().unwrap();
        let parsed: TabletopSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.players[0].name, "Alice");
    }
}
