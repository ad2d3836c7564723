//! The tabletop: authoritative state of one game
//!
//! Cards outside the battlefield live in `cards` and are referenced by ID
//! from their owner's zones. A card entering the battlefield is taken out of
//! the store and wrapped in a [`Permanent`]; leaving the battlefield puts it
//! back.

use crate::core::{
    Card, CardId, CreaturePart, CreatureProxy, CreatureProxyMut, EntityId, EntityStore,
    LossReason, Permanent, Player, PlayerId, PlayerName, Shuffler,
};
use crate::game::{GameLogger, Phase};
use crate::zones::Zone;
use crate::{Result, TabletopError};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Tabletop {
    /// Starts at 0 and only ever increases
    pub turn: u32,
    pub phase: Phase,
    /// Index into `players` (stable turn order)
    pub active_player_idx: usize,
    pub players: Vec<Player>,
    /// Cards in libraries, hands and graveyards
    pub cards: EntityStore<Card>,
    /// Shared battlefield, in order of entry
    pub battlefield: Vec<Permanent>,
    /// Unified entity ID generator (players and cards)
    next_entity_id: u32,
    #[serde(skip)]
    pub logger: GameLogger,
}

impl Tabletop {
    pub fn new() -> Self {
        Self::with_logger(GameLogger::new())
    }

    pub fn with_logger(logger: GameLogger) -> Self {
        Tabletop {
            turn: 0,
            phase: Phase::FIRST,
            active_player_idx: 0,
            players: Vec::new(),
            cards: EntityStore::new(),
            battlefield: Vec::new(),
            next_entity_id: 0,
            logger,
        }
    }

    fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn next_card_id(&mut self) -> CardId {
        self.next_id()
    }

    /// Seat a new player; turn order is seating order
    pub fn add_player(&mut self, name: impl Into<PlayerName>, starting_life: i32) -> PlayerId {
        let id = self.next_id();
        self.players.push(Player::new(id, name, starting_life));
        id
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TabletopError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TabletopError::EntityNotFound(id.as_u32()))
    }

    pub fn player_idx(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Panics if no player has been seated
    pub fn active_player(&self) -> &Player {
        &self.players[self.active_player_idx]
    }

    pub fn active_player_id(&self) -> PlayerId {
        self.active_player().id
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.has_lost())
    }

    /// Index of the first player after `idx` in turn order who has not lost
    pub fn next_alive_player_idx(&self, idx: usize) -> Option<usize> {
        let count = self.players.len();
        (1..=count)
            .map(|offset| (idx + offset) % count)
            .find(|&i| !self.players[i].has_lost())
    }

    /// The player `player` attacks: the next living opponent in turn order
    pub fn next_opponent(&self, player: PlayerId) -> Option<PlayerId> {
        let idx = self.player_idx(player)?;
        self.next_alive_player_idx(idx)
            .map(|i| self.players[i].id)
            .filter(|&id| id != player)
    }

    /// Add a card to its owner's library (on top)
    pub fn add_card_to_library(&mut self, card: Card) -> Result<CardId> {
        self.add_card_to_zone(card, Zone::Library)
    }

    pub fn add_card_to_hand(&mut self, card: Card) -> Result<CardId> {
        self.add_card_to_zone(card, Zone::Hand)
    }

    fn add_card_to_zone(&mut self, card: Card, zone: Zone) -> Result<CardId> {
        let id = card.id;
        let owner = self.get_player_mut(card.owner)?;
        match owner.zones.get_zone_mut(zone) {
            Some(cards) => cards.add(id),
            None => {
                return Err(TabletopError::InvalidArgument(format!(
                    "cannot add card {id} to {zone:?} directly"
                )))
            }
        }
        self.cards.insert(id, card);
        Ok(id)
    }

    /// A card outside the battlefield
    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn permanent(&self, id: CardId) -> Option<&Permanent> {
        self.battlefield.iter().find(|p| p.id() == id)
    }

    pub fn permanent_mut(&mut self, id: CardId) -> Option<&mut Permanent> {
        self.battlefield.iter_mut().find(|p| p.id() == id)
    }

    /// Permanents controlled by `player`, in order of entry
    pub fn permanents_of(&self, player: PlayerId) -> impl Iterator<Item = &Permanent> {
        self.battlefield
            .iter()
            .filter(move |p| p.controller == player)
    }

    /// Card data wherever it is: in play or in the store
    pub fn find_card(&self, id: CardId) -> Result<&Card> {
        match self.permanent(id) {
            Some(permanent) => Ok(&permanent.card),
            None => self.cards.get(id),
        }
    }

    /// Which zone holds a card
    pub fn zone_of(&self, id: CardId) -> Option<Zone> {
        if self.permanent(id).is_some() {
            return Some(Zone::Battlefield);
        }
        let owner = self.cards.get(id).ok()?.owner;
        self.get_player(owner).ok()?.zones.zone_of(id)
    }

    /// Move a card from its owner's hand (or other zone) onto the battlefield
    ///
    /// Creatures enter summoning sick.
    pub fn move_to_battlefield(&mut self, id: CardId, controller: PlayerId) -> Result<()> {
        let owner = self.cards.get(id)?.owner;
        if self.get_player(owner)?.zones.zone_of(id).is_none() {
            return Err(TabletopError::InvalidArgument(format!(
                "card {id} is not in any of its owner's zones"
            )));
        }
        self.remove_from_owner_zones(owner, id)?;

        let mut card = self.cards.take(id)?;
        if card.is_creature() {
            card.part_mut::<CreaturePart>()?.summoning_sick = true;
        }
        self.battlefield.push(Permanent::new(card, controller));
        Ok(())
    }

    /// Put a card into its owner's graveyard from wherever it is
    pub fn move_to_graveyard(&mut self, id: CardId) -> Result<()> {
        if let Some(pos) = self.battlefield.iter().position(|p| p.id() == id) {
            let mut card = self.battlefield.remove(pos).into_card();
            if let Ok(creature) = card.part_mut::<CreaturePart>() {
                creature.damage = 0;
                creature.summoning_sick = false;
            }
            let owner = card.owner;
            self.get_player_mut(owner)?.zones.graveyard.add(id);
            self.cards.insert(id, card);
            return Ok(());
        }

        let owner = self.cards.get(id)?.owner;
        self.remove_from_owner_zones(owner, id)?;
        self.get_player_mut(owner)?.zones.graveyard.add(id);
        Ok(())
    }

    fn remove_from_owner_zones(&mut self, owner: PlayerId, id: CardId) -> Result<()> {
        let zones = &mut self.get_player_mut(owner)?.zones;
        let _ = zones.hand.remove(id) || zones.library.remove(id) || zones.graveyard.remove(id);
        Ok(())
    }

    /// Move the top card of the library to the hand; `None` if the library is empty
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Option<CardId>> {
        let zones = &mut self.get_player_mut(player)?.zones;
        let drawn = zones.library.draw_top();
        if let Some(id) = drawn {
            zones.hand.add(id);
        }
        Ok(drawn)
    }

    pub fn shuffle_library(&mut self, player: PlayerId, shuffler: &mut Shuffler) -> Result<()> {
        self.get_player_mut(player)?.zones.library.shuffle(shuffler);
        Ok(())
    }

    /// Untap everything `player` controls and clear summoning sickness
    pub fn untap_all(&mut self, player: PlayerId) {
        for permanent in self.battlefield.iter_mut().filter(|p| p.controller == player) {
            permanent.untap();
            if let Ok(mut creature) = CreatureProxyMut::new(permanent) {
                creature.set_summoning_sick(false);
            }
        }
    }

    /// Damage wears off at end of turn
    pub fn clear_damage(&mut self) {
        for permanent in self.battlefield.iter_mut() {
            if let Ok(mut creature) = CreatureProxyMut::new(permanent) {
                creature.clear_damage();
            }
        }
    }

    pub fn empty_mana_pools(&mut self) {
        for player in &mut self.players {
            player.empty_mana_pool();
        }
    }

    /// Players at 0 life lose; creatures with lethal damage die
    ///
    /// Returns one message per change, in the order applied.
    pub fn apply_state_based_actions(&mut self) -> Result<Vec<String>> {
        let mut events = Vec::new();

        for player in self.players.iter_mut() {
            if !player.has_lost() && player.life <= 0 {
                player.lose(LossReason::LifeDepleted);
                events.push(format!("{} has {} life and loses", player.name, player.life));
            }
        }

        let dying: Vec<(CardId, String)> = self
            .battlefield
            .iter()
            .filter_map(|p| CreatureProxy::new(p).ok())
            .filter(|c| c.has_lethal_damage())
            .map(|c| (c.id(), c.name().to_string()))
            .collect();
        for (id, name) in dying {
            self.move_to_graveyard(id)?;
            events.push(format!("{name} ({id}) dies"));
        }

        Ok(events)
    }
}

impl Default for Tabletop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardType, LandPart};

    fn two_players() -> (Tabletop, PlayerId, PlayerId) {
        let mut table = Tabletop::new();
        let alice = table.add_player("Alice", 20);
        let bob = table.add_player("Bob", 20);
        (table, alice, bob)
    }

    fn bears(table: &mut Tabletop, owner: PlayerId) -> Card {
        let id = table.next_card_id();
        Card::new(id, "Grizzly Bears", owner)
            .with_type(CardType::Creature)
            .with_part(CreaturePart::new(2, 2))
            .unwrap()
    }

    #[test]
    fn test_new_table_starts_at_turn_zero() {
        let (table, alice, bob) = two_players();
        assert_eq!(table.turn, 0);
        assert_eq!(table.phase, Phase::Beginning);
        assert_eq!(table.active_player_id(), alice);
        assert_ne!(alice, bob);
    }

    #[test]
    fn test_draw_card() {
        let (mut table, alice, _) = two_players();
        let card = bears(&mut table, alice);
        let id = table.add_card_to_library(card).unwrap();

        assert_eq!(table.draw_card(alice).unwrap(), Some(id));
        assert_eq!(table.zone_of(id), Some(Zone::Hand));
        assert_eq!(table.draw_card(alice).unwrap(), None);
    }

    #[test]
    fn test_creature_enters_summoning_sick() {
        let (mut table, alice, _) = two_players();
        let card = bears(&mut table, alice);
        let id = table.add_card_to_hand(card).unwrap();

        table.move_to_battlefield(id, alice).unwrap();
        assert!(!table.cards.contains(id));
        let creature = CreatureProxy::new(table.permanent(id).unwrap()).unwrap();
        assert!(creature.is_summoning_sick());

        table.untap_all(alice);
        let creature = CreatureProxy::new(table.permanent(id).unwrap()).unwrap();
        assert!(!creature.is_summoning_sick());
    }

    #[test]
    fn test_lethal_damage_moves_creature_to_graveyard() {
        let (mut table, alice, _) = two_players();
        let card = bears(&mut table, alice);
        let id = table.add_card_to_hand(card).unwrap();
        table.move_to_battlefield(id, alice).unwrap();

        CreatureProxyMut::new(table.permanent_mut(id).unwrap())
            .unwrap()
            .deal_damage(2);
        let events = table.apply_state_based_actions().unwrap();

        assert_eq!(events.len(), 1);
        assert!(table.permanent(id).is_none());
        assert_eq!(table.zone_of(id), Some(Zone::Graveyard));
        // Damage does not follow the card to the graveyard
        assert_eq!(table.card(id).unwrap().part::<CreaturePart>().unwrap().damage, 0);
    }

    #[test]
    fn test_zero_life_loses() {
        let (mut table, _, bob) = two_players();
        table.get_player_mut(bob).unwrap().lose_life(20);
        table.apply_state_based_actions().unwrap();

        let bob = table.get_player(bob).unwrap();
        assert_eq!(bob.loss, Some(LossReason::LifeDepleted));
        assert_eq!(table.alive_players().count(), 1);
    }

    #[test]
    fn test_next_opponent_skips_losers() {
        let mut table = Tabletop::new();
        let a = table.add_player("A", 20);
        let b = table.add_player("B", 20);
        let c = table.add_player("C", 20);

        assert_eq!(table.next_opponent(a), Some(b));
        table.get_player_mut(b).unwrap().lose(LossReason::Decking);
        assert_eq!(table.next_opponent(a), Some(c));
        table.get_player_mut(c).unwrap().lose(LossReason::Decking);
        assert_eq!(table.next_opponent(a), None);
    }

    #[test]
    fn test_cannot_add_card_to_battlefield_zone() {
        let (mut table, alice, _) = two_players();
        let id = table.next_card_id();
        let land = Card::new(id, "Forest", alice)
            .with_type(CardType::Land)
            .with_part(LandPart::default())
            .unwrap();
        assert!(table.add_card_to_zone(land, Zone::Battlefield).is_err());
        assert!(!table.cards.contains(id));
    }
}
