//! Card database for looking up card definitions
//!
//! Lookup is by name, case-insensitive. Definitions come from JSON files in
//! a directory, from the built-in basic set, or are added by hand.

use crate::core::{Ability, CardType, Effect, ManaCost};
use crate::loader::card::CardDefinition;
use crate::{Result, TabletopError};
use std::collections::HashMap;
use std::path::Path;

pub struct CardDatabase {
    cards: HashMap<String, CardDefinition>,
}

impl CardDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        CardDatabase {
            cards: HashMap::new(),
        }
    }

    /// The basic set every sample deck is built from
    pub fn builtin() -> Result<Self> {
        let mut db = CardDatabase::new();
        let basic_land = |name: &str, mana: &str| -> Result<CardDefinition> {
            Ok(CardDefinition::new(name, CardType::Land)
                .with_subtype(name)
                .with_ability(Ability::tap_for_mana(ManaCost::parse(mana)?)))
        };

        db.add_card(basic_land("Forest", "{G}")?);
        db.add_card(basic_land("Mountain", "{R}")?);
        db.add_card(basic_land("Plains", "{W}")?);
        db.add_card(
            CardDefinition::new("Llanowar Elves", CardType::Creature)
                .with_cost("{G}")?
                .with_stats(1, 1)
                .with_ability(Ability::tap_for_mana(ManaCost::parse("{G}")?)),
        );
        db.add_card(
            CardDefinition::new("Grizzly Bears", CardType::Creature)
                .with_cost("{1}{G}")?
                .with_stats(2, 2),
        );
        db.add_card(
            CardDefinition::new("Hill Giant", CardType::Creature)
                .with_cost("{3}{R}")?
                .with_stats(3, 3),
        );
        db.add_card(
            CardDefinition::new("Lightning Bolt", CardType::Instant)
                .with_cost("{R}")?
                .with_spell_effect(Effect::DealDamage { amount: 3 }),
        );
        db.add_card(
            CardDefinition::new("Harmonize", CardType::Sorcery)
                .with_cost("{2}{G}{G}")?
                .with_spell_effect(Effect::DrawCards { count: 3 }),
        );
        db.add_card(
            CardDefinition::new("Healing Salve", CardType::Instant)
                .with_cost("{W}")?
                .with_spell_effect(Effect::GainLife { amount: 3 }),
        );
        Ok(db)
    }

    /// Load every `.json` file under `dir`, recursively
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut db = CardDatabase::new();
        db.add_dir(dir)?;
        Ok(db)
    }

    /// Add every definition under `dir`; same-named cards are replaced
    pub fn add_dir(&mut self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Err(TabletopError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Card directory not found: {dir:?}"),
            )));
        }
        self.load_directory(dir)
    }

    /// Recursively load definitions from a directory
    fn load_directory(&mut self, dir: &Path) -> Result<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        // Later files override earlier ones, so keep the order stable
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.load_directory(&path)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
                for def in CardDefinition::load_from_file(&path)? {
                    def.validate()?;
                    self.add_card(def);
                }
            }
        }
        Ok(())
    }

    /// Add a single card definition, replacing any of the same name
    pub fn add_card(&mut self, card_def: CardDefinition) {
        let name_lower = card_def.name.to_lowercase();
        self.cards.insert(name_lower, card_def);
    }

    /// Look up a card by name (case-insensitive)
    pub fn get_card(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for CardDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert_eq!(db.len(), 0);
        assert!(db.is_empty());
        assert!(db.get_card("Lightning Bolt").is_none());
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let db = CardDatabase::builtin().unwrap();
        assert!(db.contains("Lightning Bolt"));
        assert!(db.contains("lightning bolt"));

        let bolt = db.get_card("LIGHTNING BOLT").unwrap();
        assert_eq!(bolt.mana_cost.converted_amount(), 1);
        assert!(bolt.spell_effects[0].needs_target());
    }

    #[test]
    fn test_manual_add_replaces() {
        let mut db = CardDatabase::new();
        db.add_card(CardDefinition::new("Wastes", CardType::Land));
        db.add_card(CardDefinition::new("wastes", CardType::Land).with_subtype("Wastes"));
        assert_eq!(db.len(), 1);
        assert_eq!(db.get_card("Wastes").unwrap().subtypes.len(), 1);
    }

    #[test]
    fn test_missing_dir() {
        assert!(CardDatabase::load_from_dir(Path::new("/nonexistent/cards")).is_err());
    }
}
