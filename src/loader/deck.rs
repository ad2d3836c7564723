//! Deck list loader (.dck format)
//!
//! ```text
//! [metadata]
//! Name=Stompy
//!
//! [Main]
//! 16 Forest
//! 4 Llanowar Elves
//!
//! [Sideboard]
//! 2 Hill Giant
//! ```

use crate::{Result, TabletopError};
use std::fs;
use std::path::Path;

/// A green creature deck, playable with the built-in card database
pub const SAMPLE_GREEN: &str = "\
[metadata]
Name=Green Stompy

[Main]
16 Forest
4 Llanowar Elves
8 Grizzly Bears
2 Harmonize
";

/// A red-green deck with burn, playable with the built-in card database
pub const SAMPLE_RED_GREEN: &str = "\
[metadata]
Name=Red Green Burn

[Main]
8 Forest
8 Mountain
4 Llanowar Elves
6 Grizzly Bears
2 Hill Giant
6 Lightning Bolt
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metadata,
    Main,
    Sideboard,
}

pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = None;
        let mut main_deck = Vec::new();
        let mut sideboard = Vec::new();
        let mut section = Section::Main;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                section = match line.to_lowercase().as_str() {
                    "[metadata]" => Section::Metadata,
                    "[sideboard]" => Section::Sideboard,
                    _ => Section::Main,
                };
                continue;
            }
            if section == Section::Metadata {
                if let Some(value) = line.strip_prefix("Name=") {
                    name = Some(value.trim().to_string());
                }
                continue;
            }

            // "4 Card Name" or "4 Card Name|SET"
            let entry = line
                .split_once(' ')
                .and_then(|(count, rest)| {
                    let count = count.parse::<u8>().ok()?;
                    let card_name = rest.split('|').next().unwrap_or(rest).trim();
                    (!card_name.is_empty()).then(|| DeckEntry {
                        card_name: card_name.to_string(),
                        count,
                    })
                })
                .ok_or_else(|| {
                    TabletopError::InvalidDeckFormat(format!(
                        "line {}: expected \"<count> <card name>\", got {line:?}",
                        line_no + 1
                    ))
                })?;

            if section == Section::Sideboard {
                sideboard.push(entry);
            } else {
                main_deck.push(entry);
            }
        }

        if main_deck.is_empty() {
            return Err(TabletopError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList {
            name,
            main_deck,
            sideboard,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: Option<String>,
    pub main_deck: Vec<DeckEntry>,
    /// Parsed for completeness; games only use the main deck
    pub sideboard: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    pub fn sideboard_size(&self) -> usize {
        self.sideboard.iter().map(|e| e.count as usize).sum()
    }
}
