//! Narrow typed views over a permanent
//!
//! A proxy checks the permanent's card type and resolves its part when it
//! is built, then keeps the borrowed part for its whole lifetime. The
//! `*Mut` proxies write straight into that part, so a change is visible to
//! any later read through the same or a fresh proxy.

use crate::core::{
    Ability, CardId, CardType, CharacteristicsPart, CreaturePart, LandPart, Permanent, PlayerId,
};
use crate::{Result, TabletopError};

fn ensure_type(permanent: &Permanent, expected: CardType) -> Result<()> {
    if permanent.card.is_type(expected) {
        Ok(())
    } else {
        Err(TabletopError::PartKindMismatch {
            card: permanent.id().as_u32(),
            expected,
        })
    }
}

/// Read-only creature view
#[derive(Debug, Clone, Copy)]
pub struct CreatureProxy<'a> {
    permanent: &'a Permanent,
    part: &'a CreaturePart,
}

impl<'a> CreatureProxy<'a> {
    pub fn new(permanent: &'a Permanent) -> Result<Self> {
        ensure_type(permanent, CardType::Creature)?;
        let part = permanent.card.part::<CreaturePart>()?;
        Ok(CreatureProxy { permanent, part })
    }

    pub fn id(&self) -> CardId {
        self.permanent.id()
    }

    pub fn name(&self) -> &'a str {
        self.permanent.name()
    }

    pub fn controller(&self) -> PlayerId {
        self.permanent.controller
    }

    pub fn power(&self) -> i32 {
        self.part.power
    }

    pub fn toughness(&self) -> i32 {
        self.part.toughness
    }

    pub fn damage(&self) -> i32 {
        self.part.damage
    }

    pub fn is_summoning_sick(&self) -> bool {
        self.part.summoning_sick
    }

    pub fn is_tapped(&self) -> bool {
        self.permanent.tapped
    }

    /// Untapped and not summoning sick
    pub fn can_attack(&self) -> bool {
        !self.is_tapped() && !self.is_summoning_sick()
    }

    pub fn can_block(&self) -> bool {
        !self.is_tapped()
    }

    /// Marked damage has reached toughness
    pub fn has_lethal_damage(&self) -> bool {
        self.part.damage >= self.part.toughness
    }
}

/// Read-write creature view
#[derive(Debug)]
pub struct CreatureProxyMut<'a> {
    id: CardId,
    tapped: &'a mut bool,
    part: &'a mut CreaturePart,
}

impl<'a> CreatureProxyMut<'a> {
    pub fn new(permanent: &'a mut Permanent) -> Result<Self> {
        ensure_type(permanent, CardType::Creature)?;
        let id = permanent.id();
        let Permanent { card, tapped, .. } = permanent;
        let part = card.part_mut::<CreaturePart>()?;
        Ok(CreatureProxyMut { id, tapped, part })
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn power(&self) -> i32 {
        self.part.power
    }

    pub fn toughness(&self) -> i32 {
        self.part.toughness
    }

    pub fn damage(&self) -> i32 {
        self.part.damage
    }

    pub fn is_summoning_sick(&self) -> bool {
        self.part.summoning_sick
    }

    pub fn is_tapped(&self) -> bool {
        *self.tapped
    }

    pub fn set_power(&mut self, power: i32) {
        self.part.power = power;
    }

    pub fn set_toughness(&mut self, toughness: i32) {
        self.part.toughness = toughness;
    }

    pub fn deal_damage(&mut self, amount: i32) {
        self.part.damage += amount;
    }

    pub fn clear_damage(&mut self) {
        self.part.damage = 0;
    }

    pub fn set_summoning_sick(&mut self, sick: bool) {
        self.part.summoning_sick = sick;
    }

    pub fn tap(&mut self) {
        *self.tapped = true;
    }

    pub fn untap(&mut self) {
        *self.tapped = false;
    }
}

/// Read-only land view
#[derive(Debug, Clone, Copy)]
pub struct LandProxy<'a> {
    permanent: &'a Permanent,
    part: &'a LandPart,
}

impl<'a> LandProxy<'a> {
    pub fn new(permanent: &'a Permanent) -> Result<Self> {
        ensure_type(permanent, CardType::Land)?;
        let part = permanent.card.part::<LandPart>()?;
        Ok(LandProxy { permanent, part })
    }

    pub fn id(&self) -> CardId {
        self.permanent.id()
    }

    pub fn is_tapped(&self) -> bool {
        self.permanent.tapped
    }

    pub fn subtypes(&self) -> &'a [String] {
        &self.part.subtypes
    }

    /// Mana abilities granted by the card's characteristics
    pub fn mana_abilities(&self) -> impl Iterator<Item = (usize, &'a Ability)> {
        self.permanent
            .card
            .characteristics()
            .map(|c: &'a CharacteristicsPart| c.abilities.as_slice())
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter(|(_, ability)| ability.is_mana_ability())
    }
}

/// Read-write land view
#[derive(Debug)]
pub struct LandProxyMut<'a> {
    id: CardId,
    tapped: &'a mut bool,
    part: &'a mut LandPart,
}

impl<'a> LandProxyMut<'a> {
    pub fn new(permanent: &'a mut Permanent) -> Result<Self> {
        ensure_type(permanent, CardType::Land)?;
        let id = permanent.id();
        let Permanent { card, tapped, .. } = permanent;
        let part = card.part_mut::<LandPart>()?;
        Ok(LandProxyMut { id, tapped, part })
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn is_tapped(&self) -> bool {
        *self.tapped
    }

    pub fn subtypes(&self) -> &[String] {
        &self.part.subtypes
    }

    pub fn add_subtype(&mut self, subtype: impl Into<String>) {
        self.part.subtypes.push(subtype.into());
    }

    pub fn tap(&mut self) {
        *self.tapped = true;
    }

    pub fn untap(&mut self) {
        *self.tapped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, EntityId, ManaCost};

    fn bears() -> Permanent {
        let owner = EntityId::new(0);
        let card = Card::new(EntityId::new(10), "Grizzly Bears", owner)
            .with_type(CardType::Creature)
            .with_part(CreaturePart::new(2, 2))
            .unwrap();
        Permanent::new(card, owner)
    }

    fn forest() -> Permanent {
        let owner = EntityId::new(0);
        let mut land = LandPart::default();
        land.subtypes.push("Forest".to_string());
        let characteristics = CharacteristicsPart {
            abilities: vec![Ability::tap_for_mana(ManaCost::parse("{G}").unwrap())],
            spell_effects: Vec::new(),
        };
        let card = Card::new(EntityId::new(11), "Forest", owner)
            .with_type(CardType::Land)
            .with_part(land)
            .unwrap()
            .with_part(characteristics)
            .unwrap();
        Permanent::new(card, owner)
    }

    #[test]
    fn test_creature_proxy_reads_part_values() {
        let permanent = bears();
        let proxy = CreatureProxy::new(&permanent).unwrap();
        let raw = permanent.card.part::<CreaturePart>().unwrap();

        assert_eq!(proxy.power(), raw.power);
        assert_eq!(proxy.toughness(), raw.toughness);
        assert_eq!(proxy.damage(), raw.damage);
        assert_eq!(proxy.is_summoning_sick(), raw.summoning_sick);
        assert_eq!(proxy.name(), "Grizzly Bears");
    }

    #[test]
    fn test_creature_proxy_writes_are_visible() {
        let mut permanent = bears();
        {
            let mut proxy = CreatureProxyMut::new(&mut permanent).unwrap();
            proxy.deal_damage(1);
            assert_eq!(proxy.damage(), 1);
            proxy.tap();
            assert!(proxy.is_tapped());
        }

        let fresh = CreatureProxy::new(&permanent).unwrap();
        assert_eq!(fresh.damage(), 1);
        assert!(fresh.is_tapped());
        assert!(!fresh.has_lethal_damage());
        assert_eq!(permanent.card.part::<CreaturePart>().unwrap().damage, 1);
    }

    #[test]
    fn test_proxy_rejects_wrong_card_type() {
        let land = forest();
        assert!(matches!(
            CreatureProxy::new(&land),
            Err(TabletopError::PartKindMismatch {
                expected: CardType::Creature,
                ..
            })
        ));

        let mut creature = bears();
        assert!(matches!(
            LandProxyMut::new(&mut creature),
            Err(TabletopError::PartKindMismatch {
                expected: CardType::Land,
                ..
            })
        ));
    }

    #[test]
    fn test_proxy_rejects_missing_part() {
        let owner = EntityId::new(0);
        // Typed as a creature but built without a creature part
        let card = Card::new(EntityId::new(12), "Broken", owner).with_type(CardType::Creature);
        let permanent = Permanent::new(card, owner);
        assert!(matches!(
            CreatureProxy::new(&permanent),
            Err(TabletopError::MissingPart { card: 12, .. })
        ));
    }

    #[test]
    fn test_land_proxy() {
        let mut permanent = forest();
        {
            let proxy = LandProxy::new(&permanent).unwrap();
            assert_eq!(proxy.subtypes(), &["Forest".to_string()]);
            assert_eq!(proxy.mana_abilities().count(), 1);
            assert!(!proxy.is_tapped());
        }

        LandProxyMut::new(&mut permanent).unwrap().tap();
        assert!(LandProxy::new(&permanent).unwrap().is_tapped());
    }
}
