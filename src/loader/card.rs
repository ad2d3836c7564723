//! Structured card definitions
//!
//! A definition is the parsed, rules-level description of a card. Cards in
//! a game are instantiated from definitions, one per copy.

use crate::core::{
    Ability, Card, CardId, CardType, CharacteristicsPart, CreaturePart, Effect, LandPart, ManaCost,
    PlayerId,
};
use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: String,
    pub types: Vec<CardType>,
    /// Mana notation, e.g. "{1}{G}"; absent for lands
    #[serde(default, skip_serializing_if = "ManaCost::is_empty")]
    pub mana_cost: ManaCost,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toughness: Option<i32>,
    /// Land types such as "Forest"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    /// What an instant or sorcery does when cast
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spell_effects: Vec<Effect>,
}

impl CardDefinition {
    pub fn new(name: impl Into<String>, card_type: CardType) -> Self {
        CardDefinition {
            name: name.into(),
            types: vec![card_type],
            mana_cost: ManaCost::EMPTY,
            power: None,
            toughness: None,
            subtypes: Vec::new(),
            abilities: Vec::new(),
            spell_effects: Vec::new(),
        }
    }

    /// Parse the cost notation; fails on malformed notation
    pub fn with_cost(mut self, notation: &str) -> Result<Self> {
        self.mana_cost = ManaCost::parse(notation)?;
        Ok(self)
    }

    pub fn with_stats(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_spell_effect(mut self, effect: Effect) -> Self {
        self.spell_effects.push(effect);
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    /// Reject definitions that could never be played consistently
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TabletopError::InvalidArgument(
                "card definition without a name".into(),
            ));
        }
        if self.types.is_empty() {
            return Err(TabletopError::InvalidArgument(format!(
                "{} has no card type",
                self.name
            )));
        }
        if self.is_type(CardType::Creature) && (self.power.is_none() || self.toughness.is_none())
        {
            return Err(TabletopError::InvalidArgument(format!(
                "creature {} needs power and toughness",
                self.name
            )));
        }
        for (index, ability) in self.abilities.iter().enumerate() {
            for (i, cost) in ability.costs.iter().enumerate() {
                if ability.costs[..i].iter().any(|c| c.kind() == cost.kind()) {
                    return Err(TabletopError::InvalidArgument(format!(
                        "ability {index} of {} lists more than one {:?} cost",
                        self.name,
                        cost.kind()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build one card instance with its parts
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Result<Card> {
        self.validate()?;

        let mut card = Card::new(id, self.name.as_str(), owner).with_mana_cost(self.mana_cost);
        for &card_type in &self.types {
            card = card.with_type(card_type);
        }
        card = card.with_part(CharacteristicsPart {
            abilities: self.abilities.clone(),
            spell_effects: self.spell_effects.clone(),
        })?;
        if let (Some(power), Some(toughness)) = (self.power, self.toughness) {
            if self.is_type(CardType::Creature) {
                card = card.with_part(CreaturePart::new(power, toughness))?;
            }
        }
        if self.is_type(CardType::Land) {
            card = card.with_part(LandPart {
                subtypes: self.subtypes.iter().cloned().collect(),
            })?;
        }
        Ok(card)
    }

    /// Load one definition, or a list of them, from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Vec<CardDefinition>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_json(&content)
    }

    pub fn parse_json(content: &str) -> Result<Vec<CardDefinition>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(CardDefinition),
            Many(Vec<CardDefinition>),
        }

        Ok(match serde_json::from_str(content)? {
            OneOrMany::One(def) => vec![def],
            OneOrMany::Many(defs) => defs,
        })
    }
}
