//! Core game types and entities

pub mod ability;
pub mod action;
pub mod card;
pub mod costs;
pub mod effects;
pub mod entity;
pub mod mana;
pub mod part;
pub mod player;
pub mod proxy;
pub mod shuffle;
pub mod types;

pub use ability::{Ability, AbilityKind};
pub use action::{Action, ActionKind};
pub use card::{Card, CardType, Permanent};
pub use costs::{Cost, CostKind};
pub use effects::{Effect, EffectKind, TargetRef};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use mana::{Color, ManaCost, ManaPool};
pub use part::{CharacteristicsPart, CreaturePart, LandPart, Part, PartData, PartKind, PartSet};
pub use player::{LossReason, Player};
pub use proxy::{CreatureProxy, CreatureProxyMut, LandProxy, LandProxyMut};
pub use shuffle::Shuffler;
pub use types::{CardName, PlayerName};

pub type CardId = EntityId<Card>;
pub type PlayerId = EntityId<Player>;
