//! Batch mode: many independent games in parallel
//!
//! Each game gets its own tabletop, judge, handler registries and
//! strategies; nothing is shared between games except the read-only card
//! database and deck lists. Game `i` is seeded from the master seed and
//! `i`, so a batch is reproducible regardless of scheduling.

use crate::config::JudgeConfig;
use crate::game::{GameOutcome, StrategyKind, VerbosityLevel};
use crate::loader::{CardDatabase, DeckList, GameInitializer, PlayerDefinition};
use crate::{Result, TabletopError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub games: usize,
    pub p1: StrategyKind,
    pub p2: StrategyKind,
    /// Base configuration; each game overrides the seed and runs silent
    pub judge: JudgeConfig,
}

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub game_idx: usize,
    pub seed: u64,
    pub deck1: String,
    pub deck2: String,
    pub outcome: GameOutcome,
    /// Seat of the winner (0 or 1), if any
    pub winning_seat: Option<usize>,
    pub turns: u32,
}

/// Results of a batch run
#[derive(Debug, Default)]
pub struct TournamentStats {
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    pub total_turns: u64,
    pub deck_wins: BTreeMap<String, usize>,
    pub deck_games: BTreeMap<String, usize>,
    pub elapsed: Duration,
}

impl TournamentStats {
    pub fn games(&self) -> usize {
        self.p1_wins + self.p2_wins + self.draws
    }

    fn record(&mut self, game: &GameRecord) {
        *self.deck_games.entry(game.deck1.clone()).or_insert(0) += 1;
        *self.deck_games.entry(game.deck2.clone()).or_insert(0) += 1;
        self.total_turns += u64::from(game.turns);
        match game.winning_seat {
            Some(0) => {
                self.p1_wins += 1;
                *self.deck_wins.entry(game.deck1.clone()).or_insert(0) += 1;
            }
            Some(_) => {
                self.p2_wins += 1;
                *self.deck_wins.entry(game.deck2.clone()).or_insert(0) += 1;
            }
            None => self.draws += 1,
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

impl fmt::Display for TournamentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.games();
        writeln!(f, "=== Batch Complete ===")?;
        writeln!(f, "Total games played: {total}")?;
        writeln!(f, "Elapsed time: {:.2}s", self.elapsed.as_secs_f64())?;
        if total > 0 {
            writeln!(
                f,
                "Average turns: {:.1}",
                self.total_turns as f64 / total as f64
            )?;
        }
        writeln!(f)?;
        writeln!(f, "=== Player Position Statistics ===")?;
        writeln!(f, "P1 wins: {} ({:.1}%)", self.p1_wins, percent(self.p1_wins, total))?;
        writeln!(f, "P2 wins: {} ({:.1}%)", self.p2_wins, percent(self.p2_wins, total))?;
        writeln!(f, "Draws: {} ({:.1}%)", self.draws, percent(self.draws, total))?;
        writeln!(f)?;
        writeln!(f, "=== Deck Win Rates ===")?;
        for (deck, played) in &self.deck_games {
            let wins = self.deck_wins.get(deck).copied().unwrap_or(0);
            writeln!(
                f,
                "  {deck}: {wins}/{played} ({:.1}%)",
                percent(wins, *played)
            )?;
        }
        Ok(())
    }
}

/// Seed of game `game_idx` in a batch
pub fn game_seed(master_seed: u64, game_idx: usize) -> u64 {
    master_seed.wrapping_add((game_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn deck_label(deck: &DeckList, idx: usize) -> String {
    deck.name.clone().unwrap_or_else(|| format!("deck {idx}"))
}

/// Play one game of a batch silently and record how it ended
pub fn play_game(
    card_db: &CardDatabase,
    decks: &[DeckList],
    settings: &BatchSettings,
    game_idx: usize,
) -> Result<GameRecord> {
    let seed = game_seed(settings.judge.seed, game_idx);
    // Deck pairing uses a stream separate from the game's shuffles
    let mut deck_rng = ChaCha12Rng::seed_from_u64(!seed);
    let deck1_idx = deck_rng.gen_range(0..decks.len());
    let deck2_idx = deck_rng.gen_range(0..decks.len());

    let players = [
        PlayerDefinition::new("Player 1", decks[deck1_idx].clone(), settings.p1),
        PlayerDefinition::new("Player 2", decks[deck2_idx].clone(), settings.p2),
    ];
    let config = JudgeConfig {
        seed,
        verbosity: VerbosityLevel::Silent,
        ..settings.judge.clone()
    };

    let mut judge = GameInitializer::new(card_db).init_game(&players, &config)?;
    let result = judge.run_to_completion()?;
    let outcome = result.outcome().unwrap_or(GameOutcome::Draw);
    let table = judge.tabletop();
    let winning_seat = result.winner().and_then(|id| table.player_idx(id));

    Ok(GameRecord {
        game_idx,
        seed,
        deck1: deck_label(&decks[deck1_idx], deck1_idx),
        deck2: deck_label(&decks[deck2_idx], deck2_idx),
        outcome,
        winning_seat,
        turns: table.turn,
    })
}

/// Run `settings.games` games in parallel with rayon
pub fn run_batch(
    card_db: &CardDatabase,
    decks: &[DeckList],
    settings: &BatchSettings,
) -> Result<TournamentStats> {
    if decks.is_empty() {
        return Err(TabletopError::InvalidArgument(
            "batch mode needs at least one deck".to_string(),
        ));
    }

    let start = Instant::now();
    let records = (0..settings.games)
        .into_par_iter()
        .map(|game_idx| play_game(card_db, decks, settings, game_idx))
        .collect::<Result<Vec<_>>>()?;

    let mut stats = TournamentStats::default();
    for record in &records {
        stats.record(record);
    }
    stats.elapsed = start.elapsed();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DeckLoader, SAMPLE_GREEN, SAMPLE_RED_GREEN};

    fn settings(games: usize) -> BatchSettings {
        BatchSettings {
            games,
            p1: StrategyKind::Zero,
            p2: StrategyKind::Random,
            judge: JudgeConfig {
                max_turns: 40,
                ..JudgeConfig::default()
            },
        }
    }

    fn decks() -> Vec<DeckList> {
        vec![
            DeckLoader::parse(SAMPLE_GREEN).unwrap(),
            DeckLoader::parse(SAMPLE_RED_GREEN).unwrap(),
        ]
    }

    #[test]
    fn test_batch_counts_every_game() {
        let db = CardDatabase::builtin().unwrap();
        let stats = run_batch(&db, &decks(), &settings(6)).unwrap();
        assert_eq!(stats.games(), 6);
        assert_eq!(stats.deck_games.values().sum::<usize>(), 12);
        assert!(stats.to_string().contains("Total games played: 6"));
    }

    #[test]
    fn test_game_is_reproducible() {
        let db = CardDatabase::builtin().unwrap();
        let decks = decks();
        let a = play_game(&db, &decks, &settings(1), 3).unwrap();
        let b = play_game(&db, &decks, &settings(1), 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_deck_list_is_rejected() {
        let db = CardDatabase::builtin().unwrap();
        assert!(run_batch(&db, &[], &settings(1)).is_err());
    }
}
