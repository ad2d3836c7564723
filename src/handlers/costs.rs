//! Cost handlers
//!
//! `check` never mutates; `pay` is only called after every cost of the
//! action has passed `check`, so a rejected action leaves nothing paid.

use crate::core::{Cost, CostKind, CreatureProxy};
use crate::game::Tabletop;
use crate::handlers::{Legality, ResolutionContext};
use crate::{Result, TabletopError};

pub trait CostHandler {
    fn kind(&self) -> CostKind;

    /// Can `cost` be paid right now?
    fn check(&self, table: &Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<Legality>;

    /// Pay `cost`; only called after a successful `check`
    fn pay(&self, table: &mut Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<()>;
}

fn kind_mismatch(handler: CostKind, cost: &Cost) -> TabletopError {
    TabletopError::CostKindMismatch {
        handler,
        cost: cost.kind(),
    }
}

/// `{T}`: tap the source permanent
#[derive(Debug, Default, Clone, Copy)]
pub struct TapCostHandler;

impl CostHandler for TapCostHandler {
    fn kind(&self) -> CostKind {
        CostKind::Tap
    }

    fn check(&self, table: &Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<Legality> {
        if !matches!(cost, Cost::Tap) {
            return Err(kind_mismatch(self.kind(), cost));
        }
        let Some(source) = ctx.source else {
            return Ok(Legality::illegal("tap cost without a source permanent"));
        };
        let Some(permanent) = table.permanent(source) else {
            return Ok(Legality::illegal(format!("{source} is not on the battlefield")));
        };
        if permanent.controller != ctx.player {
            return Ok(Legality::illegal(format!(
                "{} is not controlled by the activating player",
                permanent.name()
            )));
        }
        if permanent.tapped {
            return Ok(Legality::illegal(format!("{} is already tapped", permanent.name())));
        }
        if let Ok(creature) = CreatureProxy::new(permanent) {
            if creature.is_summoning_sick() {
                return Ok(Legality::illegal(format!(
                    "{} has summoning sickness",
                    permanent.name()
                )));
            }
        }
        Ok(Legality::Legal)
    }

    fn pay(&self, table: &mut Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<()> {
        if !matches!(cost, Cost::Tap) {
            return Err(kind_mismatch(self.kind(), cost));
        }
        let source = ctx
            .source
            .ok_or_else(|| TabletopError::InvalidArgument("tap cost without a source".into()))?;
        table
            .permanent_mut(source)
            .ok_or(TabletopError::EntityNotFound(source.as_u32()))?
            .tap();
        Ok(())
    }
}

/// Drain the payer's mana pool
#[derive(Debug, Default, Clone, Copy)]
pub struct ManaCostHandler;

impl CostHandler for ManaCostHandler {
    fn kind(&self) -> CostKind {
        CostKind::Mana
    }

    fn check(&self, table: &Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<Legality> {
        let Cost::Mana(mana) = cost else {
            return Err(kind_mismatch(self.kind(), cost));
        };
        let pool = &table.get_player(ctx.player)?.mana_pool;
        Ok(Legality::require(pool.can_pay(mana), || {
            format!("cannot pay {mana} from pool {pool}")
        }))
    }

    fn pay(&self, table: &mut Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<()> {
        let Cost::Mana(mana) = cost else {
            return Err(kind_mismatch(self.kind(), cost));
        };
        table
            .get_player_mut(ctx.player)?
            .mana_pool
            .pay(mana)
            .map_err(TabletopError::InvalidArgument)
    }
}

/// Pay N life; a player may not pay more life than they have
#[derive(Debug, Default, Clone, Copy)]
pub struct PayLifeCostHandler;

impl CostHandler for PayLifeCostHandler {
    fn kind(&self) -> CostKind {
        CostKind::PayLife
    }

    fn check(&self, table: &Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<Legality> {
        let Cost::PayLife(amount) = cost else {
            return Err(kind_mismatch(self.kind(), cost));
        };
        let player = table.get_player(ctx.player)?;
        Ok(Legality::require(
            i64::from(player.life) >= i64::from(*amount),
            || format!("{} cannot pay {amount} life with {}", player.name, player.life),
        ))
    }

    fn pay(&self, table: &mut Tabletop, ctx: &ResolutionContext, cost: &Cost) -> Result<()> {
        let Cost::PayLife(amount) = cost else {
            return Err(kind_mismatch(self.kind(), cost));
        };
        let amount = i32::try_from(*amount)
            .map_err(|_| TabletopError::InvalidArgument(format!("life payment {amount}")))?;
        table.get_player_mut(ctx.player)?.lose_life(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardType, Color, CreaturePart, ManaCost, PlayerId};

    fn table_with_bears() -> (Tabletop, PlayerId, crate::core::CardId) {
        let mut table = Tabletop::new();
        let alice = table.add_player("Alice", 20);
        table.add_player("Bob", 20);
        let id = table.next_card_id();
        let card = Card::new(id, "Grizzly Bears", alice)
            .with_type(CardType::Creature)
            .with_part(CreaturePart::new(2, 2))
            .unwrap();
        table.add_card_to_hand(card).unwrap();
        table.move_to_battlefield(id, alice).unwrap();
        (table, alice, id)
    }

    fn ctx(player: PlayerId, source: Option<crate::core::CardId>) -> ResolutionContext {
        ResolutionContext {
            player,
            source,
            target: None,
        }
    }

    #[test]
    fn test_tap_cost_rejects_summoning_sick_creature() {
        let (mut table, alice, bears) = table_with_bears();
        let handler = TapCostHandler;
        let ctx = ctx(alice, Some(bears));

        assert!(!handler.check(&table, &ctx, &Cost::Tap).unwrap().is_legal());

        table.untap_all(alice);
        assert!(handler.check(&table, &ctx, &Cost::Tap).unwrap().is_legal());
        handler.pay(&mut table, &ctx, &Cost::Tap).unwrap();
        assert!(table.permanent(bears).unwrap().tapped);
        assert!(!handler.check(&table, &ctx, &Cost::Tap).unwrap().is_legal());
    }

    #[test]
    fn test_mana_cost() {
        let (mut table, alice, _) = table_with_bears();
        let handler = ManaCostHandler;
        let ctx = ctx(alice, None);
        let cost = Cost::Mana(ManaCost::parse("{1}{G}").unwrap());

        assert!(!handler.check(&table, &ctx, &cost).unwrap().is_legal());

        let pool = &mut table.get_player_mut(alice).unwrap().mana_pool;
        pool.add_color(Color::Green, 1);
        pool.add_color(Color::Red, 1);
        assert!(handler.check(&table, &ctx, &cost).unwrap().is_legal());

        handler.pay(&mut table, &ctx, &cost).unwrap();
        assert!(table.get_player(alice).unwrap().mana_pool.is_empty());
    }

    #[test]
    fn test_pay_life() {
        let (mut table, alice, _) = table_with_bears();
        let handler = PayLifeCostHandler;
        let ctx = ctx(alice, None);

        assert!(handler.check(&table, &ctx, &Cost::PayLife(20)).unwrap().is_legal());
        assert!(!handler.check(&table, &ctx, &Cost::PayLife(21)).unwrap().is_legal());

        handler.pay(&mut table, &ctx, &Cost::PayLife(3)).unwrap();
        assert_eq!(table.get_player(alice).unwrap().life, 17);
    }

    #[test]
    fn test_wrong_cost_kind_is_a_fault() {
        let (table, alice, _) = table_with_bears();
        let err = TapCostHandler
            .check(&table, &ctx(alice, None), &Cost::PayLife(1))
            .unwrap_err();
        assert!(matches!(
            err,
            TabletopError::CostKindMismatch {
                handler: CostKind::Tap,
                cost: CostKind::PayLife
            }
        ));
    }
}
