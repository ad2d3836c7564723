//! Card parts
//!
//! A card is a bag of typed parts. The set of part kinds is closed: each
//! variant of [`Part`] carries one kind of data, and a card holds at most
//! one part per [`PartKind`].

use crate::core::{Ability, Effect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Discriminant for [`Part`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Characteristics,
    Creature,
    Land,
}

/// Granted abilities plus, for instants and sorceries, the effects of the spell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicsPart {
    pub abilities: Vec<Ability>,
    pub spell_effects: Vec<Effect>,
}

/// Combat stats and per-turn creature state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreaturePart {
    pub power: i32,
    pub toughness: i32,
    /// Damage marked this turn
    pub damage: i32,
    pub summoning_sick: bool,
}

impl CreaturePart {
    pub fn new(power: i32, toughness: i32) -> Self {
        CreaturePart {
            power,
            toughness,
            damage: 0,
            summoning_sick: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandPart {
    /// Land types such as "Forest"
    pub subtypes: SmallVec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    Characteristics(CharacteristicsPart),
    Creature(CreaturePart),
    Land(LandPart),
}

impl Part {
    pub fn kind(&self) -> PartKind {
        match self {
            Part::Characteristics(_) => PartKind::Characteristics,
            Part::Creature(_) => PartKind::Creature,
            Part::Land(_) => PartKind::Land,
        }
    }
}

/// Typed access to the payload of one [`Part`] variant
pub trait PartData: Sized {
    const KIND: PartKind;

    fn from_part(part: &Part) -> Option<&Self>;
    fn from_part_mut(part: &mut Part) -> Option<&mut Self>;
    fn into_part(self) -> Part;
}

macro_rules! part_data {
    ($ty:ty, $variant:ident) => {
        impl PartData for $ty {
            const KIND: PartKind = PartKind::$variant;

            fn from_part(part: &Part) -> Option<&Self> {
                match part {
                    Part::$variant(data) => Some(data),
                    _ => None,
                }
            }

            fn from_part_mut(part: &mut Part) -> Option<&mut Self> {
                match part {
                    Part::$variant(data) => Some(data),
                    _ => None,
                }
            }

            fn into_part(self) -> Part {
                Part::$variant(self)
            }
        }
    };
}

part_data!(CharacteristicsPart, Characteristics);
part_data!(CreaturePart, Creature);
part_data!(LandPart, Land);

/// Ordered parts of one card, unique by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSet {
    parts: SmallVec<[Part; 3]>,
}

impl PartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part. Returns the part back if one of that kind is already present.
    pub fn insert(&mut self, part: Part) -> std::result::Result<(), Part> {
        if self.contains(part.kind()) {
            return Err(part);
        }
        self.parts.push(part);
        Ok(())
    }

    pub fn contains(&self, kind: PartKind) -> bool {
        self.parts.iter().any(|p| p.kind() == kind)
    }

    pub fn find(&self, kind: PartKind) -> Option<&Part> {
        self.parts.iter().find(|p| p.kind() == kind)
    }

    pub fn find_mut(&mut self, kind: PartKind) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.kind() == kind)
    }

    pub fn get<T: PartData>(&self) -> Option<&T> {
        self.find(T::KIND).and_then(T::from_part)
    }

    pub fn get_mut<T: PartData>(&mut self) -> Option<&mut T> {
        self.find_mut(T::KIND).and_then(T::from_part_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
