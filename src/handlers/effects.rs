//! Effect handlers

use crate::core::{CreatureProxyMut, Effect, EffectKind, LossReason, ManaPool, TargetRef};
use crate::game::Tabletop;
use crate::handlers::ResolutionContext;
use crate::{Result, TabletopError};

pub trait EffectHandler {
    fn kind(&self) -> EffectKind;

    /// Apply `effect`; `execute` has already checked its kind
    fn resolve(&self, table: &mut Tabletop, ctx: &ResolutionContext, effect: &Effect)
        -> Result<()>;

    /// Kind-checked entry point used by the execution manager
    ///
    /// An effect of another kind is a dispatch bug: it is reported as
    /// [`TabletopError::EffectKindMismatch`] before anything is touched.
    fn execute(&self, table: &mut Tabletop, ctx: &ResolutionContext, effect: &Effect) -> Result<()> {
        if effect.kind() != self.kind() {
            return Err(kind_mismatch(self.kind(), effect));
        }
        self.resolve(table, ctx, effect)
    }
}

fn kind_mismatch(handler: EffectKind, effect: &Effect) -> TabletopError {
    TabletopError::EffectKindMismatch {
        handler,
        effect: effect.kind(),
    }
}

fn life_amount(amount: u32) -> Result<i32> {
    i32::try_from(amount).map_err(|_| TabletopError::InvalidArgument(format!("amount {amount}")))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProduceManaHandler;

impl EffectHandler for ProduceManaHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::ProduceMana
    }

    fn resolve(
        &self,
        table: &mut Tabletop,
        ctx: &ResolutionContext,
        effect: &Effect,
    ) -> Result<()> {
        let Effect::ProduceMana { mana } = effect else {
            return Err(kind_mismatch(self.kind(), effect));
        };
        table
            .get_player_mut(ctx.player)?
            .mana_pool
            .add(&ManaPool::from(mana));
        Ok(())
    }
}

/// Damage to a player costs life; damage to a creature is marked on it
#[derive(Debug, Default, Clone, Copy)]
pub struct DealDamageHandler;

impl EffectHandler for DealDamageHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::DealDamage
    }

    fn resolve(
        &self,
        table: &mut Tabletop,
        ctx: &ResolutionContext,
        effect: &Effect,
    ) -> Result<()> {
        let Effect::DealDamage { amount } = effect else {
            return Err(kind_mismatch(self.kind(), effect));
        };
        let amount = life_amount(*amount)?;
        match ctx.target {
            Some(TargetRef::Player(player)) => table.get_player_mut(player)?.lose_life(amount),
            Some(TargetRef::Permanent(id)) => {
                let permanent = table
                    .permanent_mut(id)
                    .ok_or(TabletopError::EntityNotFound(id.as_u32()))?;
                CreatureProxyMut::new(permanent)?.deal_damage(amount);
            }
            None => {
                return Err(TabletopError::InvalidArgument(
                    "damage effect resolved without a target".into(),
                ))
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GainLifeHandler;

impl EffectHandler for GainLifeHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::GainLife
    }

    fn resolve(
        &self,
        table: &mut Tabletop,
        ctx: &ResolutionContext,
        effect: &Effect,
    ) -> Result<()> {
        let Effect::GainLife { amount } = effect else {
            return Err(kind_mismatch(self.kind(), effect));
        };
        let amount = life_amount(*amount)?;
        table.get_player_mut(ctx.player)?.gain_life(amount);
        Ok(())
    }
}

/// Drawing from an empty library loses the game
#[derive(Debug, Default, Clone, Copy)]
pub struct DrawCardsHandler;

impl EffectHandler for DrawCardsHandler {
    fn kind(&self) -> EffectKind {
        EffectKind::DrawCards
    }

    fn resolve(
        &self,
        table: &mut Tabletop,
        ctx: &ResolutionContext,
        effect: &Effect,
    ) -> Result<()> {
        let Effect::DrawCards { count } = effect else {
            return Err(kind_mismatch(self.kind(), effect));
        };
        for _ in 0..*count {
            if table.draw_card(ctx.player)?.is_none() {
                table.get_player_mut(ctx.player)?.lose(LossReason::Decking);
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, Color, ManaCost, PlayerId};

    fn table() -> (Tabletop, PlayerId, PlayerId) {
        let mut table = Tabletop::new();
        let alice = table.add_player("Alice", 20);
        let bob = table.add_player("Bob", 20);
        (table, alice, bob)
    }

    fn ctx(player: PlayerId, target: Option<TargetRef>) -> ResolutionContext {
        ResolutionContext {
            player,
            source: None,
            target,
        }
    }

    #[test]
    fn test_produce_mana() {
        let (mut table, alice, _) = table();
        let effect = Effect::ProduceMana {
            mana: ManaCost::parse("{1}{G}{G}").unwrap(),
        };
        ProduceManaHandler
            .execute(&mut table, &ctx(alice, None), &effect)
            .unwrap();

        let pool = table.get_player(alice).unwrap().mana_pool;
        assert_eq!(pool.amount(Color::Green), 2);
        assert_eq!(pool.colorless(), 1);
        assert_eq!(pool.total(), 3);
    }

    #[test]
    fn test_kind_mismatch_does_not_mutate() {
        let (mut table, alice, _) = table();
        let before = serde_json::to_value(&table).unwrap();

        let err = ProduceManaHandler
            .execute(&mut table, &ctx(alice, None), &Effect::GainLife { amount: 5 })
            .unwrap_err();

        assert!(matches!(
            err,
            TabletopError::EffectKindMismatch {
                handler: EffectKind::ProduceMana,
                effect: EffectKind::GainLife
            }
        ));
        assert_eq!(serde_json::to_value(&table).unwrap(), before);
    }

    #[test]
    fn test_damage_to_player_and_creature() {
        let (mut table, alice, bob) = table();
        let bolt = Effect::DealDamage { amount: 3 };

        DealDamageHandler
            .execute(&mut table, &ctx(alice, Some(TargetRef::Player(bob))), &bolt)
            .unwrap();
        assert_eq!(table.get_player(bob).unwrap().life, 17);

        let id = table.next_card_id();
        let card = Card::new(id, "Grizzly Bears", bob)
            .with_type(CardType::Creature)
            .with_part(crate::core::CreaturePart::new(2, 2))
            .unwrap();
        table.add_card_to_hand(card).unwrap();
        table.move_to_battlefield(id, bob).unwrap();

        DealDamageHandler
            .execute(&mut table, &ctx(alice, Some(TargetRef::Permanent(id))), &bolt)
            .unwrap();
        let creature = crate::core::CreatureProxy::new(table.permanent(id).unwrap()).unwrap();
        assert!(creature.has_lethal_damage());
    }

    #[test]
    fn test_draw_from_empty_library_loses() {
        let (mut table, alice, _) = table();
        DrawCardsHandler
            .execute(&mut table, &ctx(alice, None), &Effect::DrawCards { count: 2 })
            .unwrap();
        assert_eq!(
            table.get_player(alice).unwrap().loss,
            Some(LossReason::Decking)
        );
    }

    #[test]
    fn test_gain_life() {
        let (mut table, alice, _) = table();
        GainLifeHandler
            .execute(&mut table, &ctx(alice, None), &Effect::GainLife { amount: 4 })
            .unwrap();
        assert_eq!(table.get_player(alice).unwrap().life, 24);
    }
}
