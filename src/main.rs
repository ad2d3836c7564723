//! Tabletop judge - command-line driver
//!
//! `tabletop run` plays one game and prints its log; `tabletop batch` plays
//! many games in parallel and prints statistics.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tabletop_judge::{
    config::JudgeConfig,
    game::{
        compute_state_hash, format_hash, InteractiveObserver, LoggingObserver, OutputFormat,
        StepControl, StrategyKind, Tabletop, TabletopSnapshot, VerbosityLevel,
    },
    loader::{
        CardDatabase, DeckList, DeckLoader, GameInitializer, PlayerDefinition, SAMPLE_GREEN,
        SAMPLE_RED_GREEN,
    },
    tournament::{run_batch, BatchSettings},
};

/// Strategy for an AI seat
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always chooses the first meaningful action
    Zero,
    /// Makes seeded random choices
    Random,
}

impl From<ControllerType> for StrategyKind {
    fn from(controller: ControllerType) -> Self {
        match controller {
            ControllerType::Zero => StrategyKind::Zero,
            ControllerType::Random => StrategyKind::Random,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "tabletop")]
#[command(about = "Turn-based card game rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Run {
        /// Deck file (.dck) for player 1 (default: built-in green deck)
        #[arg(long, value_name = "DECK")]
        deck1: Option<PathBuf>,

        /// Deck file (.dck) for player 2 (default: built-in red-green deck)
        #[arg(long, value_name = "DECK")]
        deck2: Option<PathBuf>,

        /// Directory of JSON card definitions, added to the built-in set
        #[arg(long, value_name = "DIR")]
        cards: Option<PathBuf>,

        /// Judge configuration file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Random seed for deterministic games
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value = "zero")]
        p1: ControllerType,

        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// The game is a draw after this many turns
        #[arg(long)]
        max_turns: Option<u32>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,

        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Pause after every phase and wait for input
        #[arg(long)]
        step: bool,
    },

    /// Play many games in parallel and report statistics
    Batch {
        /// Deck files (.dck); games pair them at random (default: built-in decks)
        #[arg(value_name = "DECKS")]
        decks: Vec<PathBuf>,

        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, value_enum, default_value = "zero")]
        p1: ControllerType,

        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        #[arg(long, value_name = "DIR")]
        cards: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            deck1,
            deck2,
            cards,
            config,
            seed,
            p1,
            p2,
            p1_name,
            p2_name,
            max_turns,
            verbosity,
            format,
            step,
        } => {
            let mut config = match config {
                Some(path) => JudgeConfig::from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => JudgeConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(max_turns) = max_turns {
                config.max_turns = max_turns;
            }
            if let Some(verbosity) = verbosity {
                config.verbosity = verbosity;
            }

            let card_db = load_card_database(cards.as_deref())?;
            let players = [
                PlayerDefinition::new(
                    p1_name,
                    load_deck(deck1.as_deref(), SAMPLE_GREEN)?,
                    p1.into(),
                ),
                PlayerDefinition::new(
                    p2_name,
                    load_deck(deck2.as_deref(), SAMPLE_RED_GREEN)?,
                    p2.into(),
                ),
            ];
            run_game(&card_db, &players, &config, format.into(), step)?;
        }
        Commands::Batch {
            decks,
            games,
            seed,
            p1,
            p2,
            max_turns,
            cards,
        } => {
            let card_db = load_card_database(cards.as_deref())?;
            let decks = if decks.is_empty() {
                vec![
                    DeckLoader::parse(SAMPLE_GREEN)?,
                    DeckLoader::parse(SAMPLE_RED_GREEN)?,
                ]
            } else {
                decks
                    .iter()
                    .map(|path| load_deck(Some(path.as_path()), SAMPLE_GREEN))
                    .collect::<Result<Vec<_>>>()?
            };
            let settings = BatchSettings {
                games,
                p1: p1.into(),
                p2: p2.into(),
                judge: JudgeConfig {
                    seed,
                    max_turns,
                    ..JudgeConfig::default()
                },
            };
            println!("Running {games} games with {} decks (seed {seed})", decks.len());
            let stats = run_batch(&card_db, &decks, &settings)?;
            print!("{stats}");
        }
    }

    Ok(())
}

fn load_card_database(cards: Option<&Path>) -> Result<CardDatabase> {
    let mut db = CardDatabase::builtin()?;
    if let Some(dir) = cards {
        db.add_dir(dir)
            .with_context(|| format!("loading cards from {}", dir.display()))?;
    }
    Ok(db)
}

fn load_deck(path: Option<&Path>, fallback: &str) -> Result<DeckList> {
    match path {
        Some(path) => DeckLoader::load_from_file(path)
            .with_context(|| format!("loading deck {}", path.display())),
        None => Ok(DeckLoader::parse(fallback)?),
    }
}

fn run_game(
    card_db: &CardDatabase,
    players: &[PlayerDefinition],
    config: &JudgeConfig,
    format: OutputFormat,
    step: bool,
) -> Result<()> {
    let judge = GameInitializer::new(card_db).init_game(players, config)?;
    let mut judge = if step {
        judge.with_observer(Box::new(InteractiveObserver::new(prompt_step)))
    } else if config.verbosity >= VerbosityLevel::Verbose {
        judge.with_observer(Box::new(LoggingObserver::new()))
    } else {
        judge
    };
    judge.logger_mut().set_output_format(format);

    let result = judge.run_to_completion()?;
    if !result.is_terminal() {
        bail!("game stopped without an outcome");
    }

    if config.verbosity >= VerbosityLevel::Normal {
        let hash = compute_state_hash(judge.tabletop())?;
        println!("Final state hash: {}", format_hash(hash));
    }
    Ok(())
}

/// Ask on stdin how far to run; end of input runs the game out
fn prompt_step(table: &Tabletop) -> StepControl {
    print!("{}", TabletopSnapshot::capture(table));
    print!("[enter] next phase, [t] next turn, [r] run to end > ");
    if io::stdout().flush().is_err() {
        return StepControl::RunToEnd;
    }

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => StepControl::RunToEnd,
        Ok(_) => match line.trim() {
            "t" => StepControl::NextTurn,
            "r" | "q" => StepControl::RunToEnd,
            _ => StepControl::Step,
        },
    }
}
