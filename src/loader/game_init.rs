//! Game initialization from decks
//!
//! Seats the players, fills and shuffles their libraries, deals opening
//! hands and hands everything to a [`RoundJudge`].

use crate::config::JudgeConfig;
use crate::core::{PlayerId, Shuffler};
use crate::game::{GameLogger, RoundJudge, Strategy, StrategyKind, Tabletop};
use crate::handlers::ExecutionManager;
use crate::loader::{CardDatabase, DeckList};
use crate::{Result, TabletopError};

/// Everything needed to seat one player
#[derive(Debug, Clone)]
pub struct PlayerDefinition {
    pub name: String,
    pub deck: DeckList,
    pub strategy: StrategyKind,
}

impl PlayerDefinition {
    pub fn new(name: impl Into<String>, deck: DeckList, strategy: StrategyKind) -> Self {
        PlayerDefinition {
            name: name.into(),
            deck,
            strategy,
        }
    }
}

/// Builds the decision strategy for a seated player
pub trait PlayerFactory {
    fn strategy_for(&self, definition: &PlayerDefinition, seed: u64) -> Box<dyn Strategy>;
}

/// Builds the strategy named in the definition
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPlayerFactory;

impl PlayerFactory for DefaultPlayerFactory {
    fn strategy_for(&self, definition: &PlayerDefinition, seed: u64) -> Box<dyn Strategy> {
        definition.strategy.build(seed)
    }
}

/// Per-seat seed derived from the game seed, so seats never share a stream
pub fn seat_seed(game_seed: u64, seat: usize) -> u64 {
    game_seed ^ 0x9E37_79B9_7F4A_7C15u64.wrapping_mul(seat as u64 + 1)
}

pub struct GameInitializer<'a> {
    card_db: &'a CardDatabase,
    factory: &'a dyn PlayerFactory,
}

impl<'a> GameInitializer<'a> {
    pub fn new(card_db: &'a CardDatabase) -> Self {
        GameInitializer {
            card_db,
            factory: &DefaultPlayerFactory,
        }
    }

    pub fn with_factory(mut self, factory: &'a dyn PlayerFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Build the tabletop alone: seated, libraries shuffled, hands dealt
    pub fn init_tabletop(
        &self,
        players: &[PlayerDefinition],
        config: &JudgeConfig,
    ) -> Result<Tabletop> {
        let mut table = Tabletop::with_logger(GameLogger::with_verbosity(config.verbosity));
        let ids: Vec<PlayerId> = players
            .iter()
            .map(|def| table.add_player(def.name.as_str(), config.starting_life))
            .collect();

        for (def, &player) in players.iter().zip(&ids) {
            self.load_deck_into_game(&mut table, player, &def.deck)?;
        }

        let mut shuffler = Shuffler::new(config.seed);
        for &player in &ids {
            table.shuffle_library(player, &mut shuffler)?;
        }
        for &player in &ids {
            for _ in 0..config.opening_hand_size {
                if table.draw_card(player)?.is_none() {
                    break;
                }
            }
        }
        Ok(table)
    }

    /// Initialize a full game ready for the judge to run
    pub fn init_game(
        &self,
        players: &[PlayerDefinition],
        config: &JudgeConfig,
    ) -> Result<RoundJudge> {
        let table = self.init_tabletop(players, config)?;
        let strategies = players
            .iter()
            .enumerate()
            .map(|(seat, def)| self.factory.strategy_for(def, seat_seed(config.seed, seat)))
            .collect();
        let manager = ExecutionManager::with_default_handlers()?;
        RoundJudge::new(table, manager, strategies, config.clone())
    }

    /// Load a deck into a player's library
    fn load_deck_into_game(
        &self,
        table: &mut Tabletop,
        player: PlayerId,
        deck: &DeckList,
    ) -> Result<()> {
        for entry in &deck.main_deck {
            let card_def = self.card_db.get_card(&entry.card_name).ok_or_else(|| {
                TabletopError::InvalidDeckFormat(format!(
                    "Card not found in database: {}",
                    entry.card_name
                ))
            })?;

            for _ in 0..entry.count {
                let card_id = table.next_card_id();
                let card = card_def.instantiate(card_id, player)?;
                table.add_card_to_library(card)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ZeroStrategy;
    use crate::loader::{DeckEntry, DeckLoader, SAMPLE_GREEN};

    fn players(strategy: StrategyKind) -> Vec<PlayerDefinition> {
        let deck = DeckLoader::parse(SAMPLE_GREEN).unwrap();
        vec![
            PlayerDefinition::new("Alice", deck.clone(), strategy),
            PlayerDefinition::new("Bob", deck, strategy),
        ]
    }

    #[test]
    fn test_init_tabletop_deals_hands() {
        let db = CardDatabase::builtin().unwrap();
        let table = GameInitializer::new(&db)
            .init_tabletop(&players(StrategyKind::Zero), &JudgeConfig::default())
            .unwrap();

        assert_eq!(table.players.len(), 2);
        for player in &table.players {
            assert_eq!(player.life, 20);
            assert_eq!(player.zones.hand.len(), 7);
            assert_eq!(player.zones.library.len(), 23);
        }
        assert_eq!(table.cards.len(), 60);
    }

    #[test]
    fn test_same_seed_same_libraries() {
        let db = CardDatabase::builtin().unwrap();
        let init = GameInitializer::new(&db);
        let config = JudgeConfig::default().with_seed(9);

        let a = init.init_tabletop(&players(StrategyKind::Zero), &config).unwrap();
        let b = init.init_tabletop(&players(StrategyKind::Zero), &config).unwrap();
        assert_eq!(
            a.players[0].zones.library.cards,
            b.players[0].zones.library.cards
        );
        assert_eq!(a.players[1].zones.hand.cards, b.players[1].zones.hand.cards);
    }

    #[test]
    fn test_missing_card_error() {
        let db = CardDatabase::new();
        let deck = DeckList {
            name: None,
            main_deck: vec![DeckEntry {
                card_name: "Nonexistent Card".to_string(),
                count: 1,
            }],
            sideboard: vec![],
        };
        let defs = vec![
            PlayerDefinition::new("Alice", deck.clone(), StrategyKind::Zero),
            PlayerDefinition::new("Bob", deck, StrategyKind::Zero),
        ];
        let result = GameInitializer::new(&db).init_game(&defs, &JudgeConfig::default());
        assert!(matches!(result, Err(TabletopError::InvalidDeckFormat(_))));
    }

    struct AlwaysZero;

    impl PlayerFactory for AlwaysZero {
        fn strategy_for(&self, _definition: &PlayerDefinition, _seed: u64) -> Box<dyn Strategy> {
            Box::new(ZeroStrategy)
        }
    }

    #[test]
    fn test_custom_factory() {
        let db = CardDatabase::builtin().unwrap();
        let factory = AlwaysZero;
        let judge = GameInitializer::new(&db)
            .with_factory(&factory)
            .init_game(&players(StrategyKind::Random), &JudgeConfig::default())
            .unwrap();
        assert_eq!(judge.tabletop().turn, 0);
    }

    #[test]
    fn test_seat_seeds_differ() {
        assert_ne!(seat_seed(1, 0), seat_seed(1, 1));
        assert_eq!(seat_seed(1, 0), seat_seed(1, 0));
    }
}
