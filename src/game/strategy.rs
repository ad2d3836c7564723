//! Decision strategies and the read-only view they decide from
//!
//! The round judge asks the active player's strategy for an action from the
//! list of currently legal ones, and asks for attack and block declarations
//! during combat. Strategies never touch the tabletop directly.

use crate::core::{Action, CardId, Color, CreatureProxy, Effect, ManaPool, Player, PlayerId};
use crate::game::{Phase, Tabletop};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Read-only view of the tabletop from one player's seat
pub struct TabletopView<'a> {
    table: &'a Tabletop,
    player: PlayerId,
}

impl<'a> TabletopView<'a> {
    pub fn new(table: &'a Tabletop, player: PlayerId) -> Self {
        TabletopView { table, player }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player
    }

    pub fn table(&self) -> &'a Tabletop {
        self.table
    }

    pub fn turn(&self) -> u32 {
        self.table.turn
    }

    pub fn phase(&self) -> Phase {
        self.table.phase
    }

    pub fn me(&self) -> Option<&'a Player> {
        self.table.get_player(self.player).ok()
    }

    pub fn life(&self) -> i32 {
        self.me().map_or(0, |p| p.life)
    }

    pub fn mana_pool(&self) -> ManaPool {
        self.me().map(|p| p.mana_pool).unwrap_or_default()
    }

    pub fn hand(&self) -> &'a [CardId] {
        self.me()
            .map(|p| p.zones.hand.cards.as_slice())
            .unwrap_or(&[])
    }

    /// Creatures on the battlefield controlled by `controller`
    pub fn creatures(&self, controller: PlayerId) -> impl Iterator<Item = CreatureProxy<'a>> {
        self.table
            .permanents_of(controller)
            .filter_map(|p| CreatureProxy::new(p).ok())
    }

    pub fn opponents(&self) -> impl Iterator<Item = &'a Player> {
        let me = self.player;
        self.table.alive_players().filter(move |p| p.id != me)
    }
}

pub trait Strategy {
    fn name(&self) -> &str;

    /// Pick one of `legal` (never empty), or `None` to pass
    fn choose_action(&mut self, view: &TabletopView, legal: &[Action]) -> Option<Action>;

    /// Choose attackers among `candidates` (untapped, not summoning sick)
    fn declare_attackers(&mut self, _view: &TabletopView, _candidates: &[CardId]) -> Vec<CardId> {
        Vec::new()
    }

    /// Pair blockers with attackers as `(blocker, attacker)`
    fn declare_blockers(
        &mut self,
        _view: &TabletopView,
        _blockers: &[CardId],
        _attackers: &[CardId],
    ) -> Vec<(CardId, CardId)> {
        Vec::new()
    }
}

/// Built-in strategies selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Zero,
    Random,
}

impl StrategyKind {
    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Zero => Box::new(ZeroStrategy),
            StrategyKind::Random => Box::new(RandomStrategy::with_seed(seed)),
        }
    }
}

fn is_mana_activation(view: &TabletopView, action: &Action) -> bool {
    produced_mana(view, action).is_some()
}

/// Mana an activation would add to the pool, if it is a mana ability
fn produced_mana(view: &TabletopView, action: &Action) -> Option<ManaPool> {
    let Action::ActivateAbility {
        source,
        ability_index,
        ..
    } = *action
    else {
        return None;
    };
    let ability = crate::handlers::actions::ability_of(view.table(), source, ability_index)?;
    if !ability.is_mana_ability() {
        return None;
    }
    let mut produced = ManaPool::new();
    for effect in &ability.effects {
        if let Effect::ProduceMana { mana } = effect {
            produced.add(&ManaPool::from(mana));
        }
    }
    Some(produced)
}

/// Always takes the first meaningful action and attacks with everything
///
/// Mana abilities are only used toward a spell in hand that every untapped
/// source together could pay for, colors included. The source tapped first
/// is one that makes a color the spell still lacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroStrategy;

impl Strategy for ZeroStrategy {
    fn name(&self) -> &str {
        "zero"
    }

    fn choose_action(&mut self, view: &TabletopView, legal: &[Action]) -> Option<Action> {
        if let Some(action) = legal.iter().find(|a| !is_mana_activation(view, a)) {
            return Some(*action);
        }

        let sources: Vec<(Action, ManaPool)> = legal
            .iter()
            .filter_map(|a| produced_mana(view, a).map(|mana| (*a, mana)))
            .collect();
        let pool = view.mana_pool();
        let mut potential = pool;
        for (_, mana) in &sources {
            potential.add(mana);
        }

        let target = view
            .hand()
            .iter()
            .filter_map(|&id| view.table().card(id).ok())
            .filter(|card| !card.is_land())
            .map(|card| card.mana_cost)
            .find(|cost| potential.can_pay(cost) && !pool.can_pay(cost))?;

        let lacking = |color: Color| pool.amount(color) < target.amount(color);
        let lacks_color = Color::ALL.iter().any(|&c| lacking(c));
        sources
            .iter()
            .find(|(_, mana)| Color::ALL.iter().any(|&c| lacking(c) && mana.amount(c) > 0))
            .or_else(|| if lacks_color { None } else { sources.first() })
            .map(|(action, _)| *action)
    }

    fn declare_attackers(&mut self, _view: &TabletopView, candidates: &[CardId]) -> Vec<CardId> {
        candidates.to_vec()
    }
}

/// Uniformly random choices from a seeded RNG
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: ChaCha12Rng,
}

impl RandomStrategy {
    pub fn with_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, _view: &TabletopView, legal: &[Action]) -> Option<Action> {
        // Index `legal.len()` stands for passing
        let index = self.rng.gen_range(0..=legal.len());
        legal.get(index).copied()
    }

    fn declare_attackers(&mut self, _view: &TabletopView, candidates: &[CardId]) -> Vec<CardId> {
        candidates
            .iter()
            .copied()
            .filter(|_| self.rng.gen_bool(0.5))
            .collect()
    }

    fn declare_blockers(
        &mut self,
        _view: &TabletopView,
        blockers: &[CardId],
        attackers: &[CardId],
    ) -> Vec<(CardId, CardId)> {
        let mut pairs = Vec::new();
        for &blocker in blockers {
            if self.rng.gen_bool(0.5) {
                if let Some(&attacker) = attackers.choose(&mut self.rng) {
                    pairs.push((blocker, attacker));
                }
            }
        }
        pairs
    }
}
