//! Execution manager: legality, cost payment, effect resolution

use crate::core::{Action, ActionKind, CostKind, EffectKind};
use crate::game::{ExecutionResult, Observer, Tabletop, VerbosityLevel};
use crate::handlers::actions::describe_action;
use crate::handlers::{
    ActionHandler, ActionPlan, ActivateAbilityHandler, CastSpellHandler, CostHandler,
    DealDamageHandler, DrawCardsHandler, EffectHandler, GainLifeHandler, Legality,
    ManaCostHandler, PayLifeCostHandler, PlayLandHandler, ProduceManaHandler, Registry,
    TapCostHandler,
};
use crate::{Result, TabletopError};

/// Collects handler bindings; [`build`](Self::build) refuses an incomplete set
#[derive(Debug, Default)]
pub struct ExecutionManagerBuilder {
    costs: Registry<CostKind, dyn CostHandler>,
    actions: Registry<ActionKind, dyn ActionHandler>,
    effects: Registry<EffectKind, dyn EffectHandler>,
}

impl ExecutionManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cost_handler(mut self, handler: impl CostHandler + 'static) -> Result<Self> {
        self.costs.register(handler.kind(), Box::new(handler))?;
        Ok(self)
    }

    pub fn action_handler(mut self, handler: impl ActionHandler + 'static) -> Result<Self> {
        self.actions.register(handler.kind(), Box::new(handler))?;
        Ok(self)
    }

    pub fn effect_handler(mut self, handler: impl EffectHandler + 'static) -> Result<Self> {
        self.effects.register(handler.kind(), Box::new(handler))?;
        Ok(self)
    }

    /// Bind the built-in handler for every kind
    pub fn with_default_handlers(self) -> Result<Self> {
        self.cost_handler(TapCostHandler)?
            .cost_handler(ManaCostHandler)?
            .cost_handler(PayLifeCostHandler)?
            .action_handler(PlayLandHandler)?
            .action_handler(CastSpellHandler)?
            .action_handler(ActivateAbilityHandler)?
            .effect_handler(ProduceManaHandler)?
            .effect_handler(DealDamageHandler)?
            .effect_handler(GainLifeHandler)?
            .effect_handler(DrawCardsHandler)
    }

    pub fn build(self) -> Result<ExecutionManager> {
        self.costs.validate()?;
        self.actions.validate()?;
        self.effects.validate()?;
        Ok(ExecutionManager {
            costs: self.costs,
            actions: self.actions,
            effects: self.effects,
        })
    }
}

/// Owns one handler per kind and runs actions through them
///
/// Every kind is guaranteed bound once the manager exists, so a
/// `MissingHandler` fault can only come from a broken build.
#[derive(Debug)]
pub struct ExecutionManager {
    costs: Registry<CostKind, dyn CostHandler>,
    actions: Registry<ActionKind, dyn ActionHandler>,
    effects: Registry<EffectKind, dyn EffectHandler>,
}

impl ExecutionManager {
    pub fn builder() -> ExecutionManagerBuilder {
        ExecutionManagerBuilder::new()
    }

    pub fn with_default_handlers() -> Result<Self> {
        ExecutionManagerBuilder::new()
            .with_default_handlers()?
            .build()
    }

    /// Global and player-level checks, then the action handler's
    fn check_legality(&self, table: &Tabletop, action: &Action) -> Result<Legality> {
        if table.alive_players().count() <= 1 {
            return Ok(Legality::illegal("the game is over"));
        }
        let player = match table.get_player(action.player()) {
            Ok(player) => player,
            Err(_) => {
                return Ok(Legality::illegal(format!(
                    "unknown player {}",
                    action.player()
                )))
            }
        };
        if player.has_lost() {
            return Ok(Legality::illegal(format!("{} has already lost", player.name)));
        }
        self.actions.get(action.kind())?.check(table, action)
    }

    /// Every cost must pass its check before any is paid
    fn check_costs(&self, table: &Tabletop, plan: &ActionPlan) -> Result<Legality> {
        for (i, cost) in plan.costs.iter().enumerate() {
            if plan.costs[..i].iter().any(|c| c.kind() == cost.kind()) {
                return Err(TabletopError::InvalidArgument(format!(
                    "action lists more than one {:?} cost",
                    cost.kind()
                )));
            }
            let verdict = self
                .costs
                .get(cost.kind())?
                .check(table, &plan.context, cost)?;
            if !verdict.is_legal() {
                return Ok(verdict);
            }
        }
        Ok(Legality::Legal)
    }

    /// Would `action` succeed right now, costs included? Never mutates.
    pub fn check(&self, table: &Tabletop, action: &Action) -> Result<Legality> {
        let legality = self.check_legality(table, action)?;
        if !legality.is_legal() {
            return Ok(legality);
        }
        let plan = self.actions.get(action.kind())?.plan(table, action)?;
        self.check_costs(table, &plan)
    }

    /// Run `action` through the full pipeline
    ///
    /// A rule violation (illegal action, unpayable cost) returns
    /// [`ExecutionResult::Error`] with the tabletop untouched. `observer` is
    /// notified once, after every effect and zone move has been applied.
    pub fn execute(
        &self,
        table: &mut Tabletop,
        action: &Action,
        observer: &mut dyn Observer,
    ) -> Result<ExecutionResult> {
        // 1. Legality
        if let Legality::Illegal(reason) = self.check_legality(table, action)? {
            return Ok(self.reject(table, action, reason));
        }
        let handler = self.actions.get(action.kind())?;
        let plan = handler.plan(table, action)?;

        // 2. Costs: check all, then pay all
        if let Legality::Illegal(reason) = self.check_costs(table, &plan)? {
            return Ok(self.reject(table, action, reason));
        }
        let cost_handlers = plan
            .costs
            .iter()
            .map(|cost| self.costs.get(cost.kind()))
            .collect::<Result<Vec<_>>>()?;
        let effect_handlers = plan
            .effects
            .iter()
            .map(|effect| self.effects.get(effect.kind()))
            .collect::<Result<Vec<_>>>()?;

        let description = describe_action(table, action);
        for (cost, cost_handler) in plan.costs.iter().zip(cost_handlers) {
            cost_handler.pay(table, &plan.context, cost)?;
        }

        // 3. Effects, then the handler's zone moves
        for (effect, effect_handler) in plan.effects.iter().zip(effect_handlers) {
            effect_handler.execute(table, &plan.context, effect)?;
        }
        handler.finish(table, action)?;

        table
            .logger
            .event(VerbosityLevel::Normal, "action", &description);
        observer.notify(table);
        Ok(ExecutionResult::success())
    }

    fn reject(&self, table: &Tabletop, action: &Action, reason: String) -> ExecutionResult {
        table.logger.event(
            VerbosityLevel::Verbose,
            "rejected",
            &format!("{} rejected: {reason}", describe_action(table, action)),
        );
        ExecutionResult::error(reason)
    }
}
