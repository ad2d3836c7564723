//! Card and deck loaders
//!
//! Card definitions are structured JSON; deck lists use the `.dck` text
//! format.

pub mod card;
pub mod database;
pub mod deck;
pub mod game_init;

pub use card::CardDefinition;
pub use database::CardDatabase;
pub use deck::{DeckEntry, DeckList, DeckLoader, SAMPLE_GREEN, SAMPLE_RED_GREEN};
pub use game_init::{
    seat_seed, DefaultPlayerFactory, GameInitializer, PlayerDefinition, PlayerFactory,
};
