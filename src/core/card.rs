//! Cards and permanents

use crate::core::{
    CardId, CardName, CharacteristicsPart, GameEntity, ManaCost, Part, PartData, PartKind,
    PartSet, PlayerId,
};
use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
}

/// A card instance
///
/// Everything beyond identity, types and cost lives in the card's parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: CardName,
    pub owner: PlayerId,
    pub mana_cost: ManaCost,
    /// A card can be several types at once ("Artifact Creature")
    pub types: SmallVec<[CardType; 2]>,
    pub parts: PartSet,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<CardName>, owner: PlayerId) -> Self {
        Card {
            id,
            name: name.into(),
            owner,
            mana_cost: ManaCost::EMPTY,
            types: SmallVec::new(),
            parts: PartSet::new(),
        }
    }

    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    pub fn with_mana_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = cost;
        self
    }

    /// Attach a part, failing if the card already has one of that kind
    pub fn with_part(mut self, part: impl PartData) -> Result<Self> {
        self.add_part(part.into_part())?;
        Ok(self)
    }

    pub fn add_part(&mut self, part: Part) -> Result<()> {
        self.parts
            .insert(part)
            .map_err(|rejected| TabletopError::DuplicatePart {
                card: self.id.as_u32(),
                kind: rejected.kind(),
            })
    }

    /// The card's unique part of `kind`
    pub fn find_part(&self, kind: PartKind) -> Result<&Part> {
        self.parts.find(kind).ok_or(TabletopError::MissingPart {
            card: self.id.as_u32(),
            kind,
        })
    }

    pub fn find_part_mut(&mut self, kind: PartKind) -> Result<&mut Part> {
        let card = self.id.as_u32();
        self.parts
            .find_mut(kind)
            .ok_or(TabletopError::MissingPart { card, kind })
    }

    /// Typed part lookup: `card.part::<CreaturePart>()`
    pub fn part<T: PartData>(&self) -> Result<&T> {
        self.parts.get::<T>().ok_or(TabletopError::MissingPart {
            card: self.id.as_u32(),
            kind: T::KIND,
        })
    }

    pub fn part_mut<T: PartData>(&mut self) -> Result<&mut T> {
        let card = self.id.as_u32();
        self.parts
            .get_mut::<T>()
            .ok_or(TabletopError::MissingPart { card, kind: T::KIND })
    }

    /// The characteristics part, if the card has one
    pub fn characteristics(&self) -> Option<&CharacteristicsPart> {
        self.parts.get::<CharacteristicsPart>()
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    /// Instants and sorceries never become permanents
    pub fn is_permanent_card(&self) -> bool {
        !self.is_type(CardType::Instant) && !self.is_type(CardType::Sorcery)
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A card on the battlefield
///
/// The card keeps its ID while in play. Tapped state only exists here and is
/// lost when the card leaves the battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permanent {
    pub card: Card,
    pub controller: PlayerId,
    pub tapped: bool,
}

impl Permanent {
    pub fn new(card: Card, controller: PlayerId) -> Self {
        Permanent {
            card,
            controller,
            tapped: false,
        }
    }

    pub fn id(&self) -> CardId {
        self.card.id
    }

    pub fn name(&self) -> &str {
        self.card.name.as_str()
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    pub fn into_card(self) -> Card {
        self.card
    }
}
