//! Round judge: the phase/turn state machine
//!
//! Owns the tabletop for the length of a game and drives it one phase at a
//! time. Player decisions come from the strategies, rules from the
//! execution manager. Once a game is over every further call reports the
//! same terminal result.

/// Log a message only when the verbose-logging feature is compiled in,
/// so benchmark builds skip the `format!` allocations
macro_rules! log_if_verbose {
    ($table:expr, $category:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $table
                .logger
                .event(VerbosityLevel::Normal, $category, &format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$table;
        }
    };
}

use crate::config::JudgeConfig;
use crate::core::{Action, LossReason, Player, PlayerId, TargetRef};
use crate::game::combat::{self, CombatState};
use crate::game::{
    ExecutionResult, GameLogger, GameOutcome, NoopObserver, Observer, Phase, Strategy, Tabletop,
    TabletopView, VerbosityLevel,
};
use crate::handlers::ExecutionManager;
use crate::{Result, TabletopError};

pub struct RoundJudge {
    table: Tabletop,
    manager: ExecutionManager,
    /// Index-aligned with `table.players`
    strategies: Vec<Box<dyn Strategy>>,
    observer: Box<dyn Observer>,
    config: JudgeConfig,
    terminal: Option<ExecutionResult>,
}

impl RoundJudge {
    /// A judge over a seated tabletop; one strategy per player, in seat order
    pub fn new(
        table: Tabletop,
        manager: ExecutionManager,
        strategies: Vec<Box<dyn Strategy>>,
        config: JudgeConfig,
    ) -> Result<Self> {
        if table.players.len() < 2 {
            return Err(TabletopError::InvalidArgument(format!(
                "a game needs at least two players, got {}",
                table.players.len()
            )));
        }
        if strategies.len() != table.players.len() {
            return Err(TabletopError::InvalidArgument(format!(
                "{} strategies for {} players",
                strategies.len(),
                table.players.len()
            )));
        }
        Ok(RoundJudge {
            table,
            manager,
            strategies,
            observer: Box::new(NoopObserver),
            config,
            terminal: None,
        })
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn tabletop(&self) -> &Tabletop {
        &self.table
    }

    /// The game log, for hosts that change its format or capture it
    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.table.logger
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    pub fn manager(&self) -> &ExecutionManager {
        &self.manager
    }

    /// The result that ended the game, if it has ended
    pub fn terminal_result(&self) -> Option<&ExecutionResult> {
        self.terminal.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn into_tabletop(self) -> Tabletop {
        self.table
    }

    /// Advance exactly one phase and run it
    ///
    /// Wrapping from the last phase starts a new turn: the turn counter goes
    /// up by one and the next player still in the game becomes active.
    pub fn execute_next_phase(&mut self) -> Result<ExecutionResult> {
        if let Some(result) = &self.terminal {
            return Ok(result.clone());
        }

        let (next, wrapped) = self.table.phase.next();
        if wrapped {
            self.table.turn += 1;
            let current = self.table.active_player_idx;
            self.table.active_player_idx = self
                .table
                .next_alive_player_idx(current)
                .unwrap_or(current);
            log_if_verbose!(
                self.table,
                "turn",
                "=== Turn {} ({}) ===",
                self.table.turn,
                self.table.active_player().name
            );
        }
        self.table.phase = next;
        log_if_verbose!(self.table, "phase", "--- {} ---", next);

        match next {
            Phase::Beginning => self.run_beginning()?,
            Phase::PreCombatMain | Phase::PostCombatMain => self.run_main()?,
            Phase::Combat => self.run_combat()?,
            Phase::Ending => self.table.clear_damage(),
        }
        self.table.empty_mana_pools();
        self.run_state_based_actions()?;

        let result = self.settle_terminal().unwrap_or_else(ExecutionResult::success);
        self.observer.notify(&self.table);
        Ok(result)
    }

    /// Advance to the start of the next turn (turn counter +1 exactly)
    pub fn execute_next_turn(&mut self) -> Result<ExecutionResult> {
        let start = self.table.turn;
        loop {
            let result = self.execute_next_phase()?;
            if result.is_terminal() || self.table.turn != start {
                return Ok(result);
            }
        }
    }

    /// Play turns until the game ends; the turn limit guarantees it does
    pub fn run_to_completion(&mut self) -> Result<ExecutionResult> {
        loop {
            let result = self.execute_next_turn()?;
            if result.is_terminal() {
                return Ok(result);
            }
        }
    }

    /// Execute a single action on behalf of the host, outside any strategy
    pub fn execute_action(&mut self, action: &Action) -> Result<ExecutionResult> {
        if let Some(result) = &self.terminal {
            return Ok(result.clone());
        }
        let result = self
            .manager
            .execute(&mut self.table, action, self.observer.as_mut())?;
        if result.has_error() {
            return Ok(result);
        }
        self.run_state_based_actions()?;
        Ok(self.settle_terminal().unwrap_or(result))
    }

    /// Every action `player` could execute right now, costs included
    ///
    /// Candidates are generated from the hand and the player's permanents,
    /// with one candidate per possible target, then filtered through the
    /// execution manager's checks.
    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>> {
        let table = &self.table;
        let me = table.get_player(player)?;
        let targets = self.target_candidates();
        let mut candidates = Vec::new();

        for &card in me.zones.hand.cards.iter() {
            let spell = table.card(card)?;
            if spell.is_land() {
                candidates.push(Action::PlayLand { player, card });
                continue;
            }
            let needs_target = spell
                .characteristics()
                .is_some_and(|c| c.spell_effects.iter().any(|e| e.needs_target()));
            for target in target_options(needs_target, &targets) {
                candidates.push(Action::CastSpell {
                    player,
                    card,
                    target,
                });
            }
        }

        for permanent in table.permanents_of(player) {
            let Some(characteristics) = permanent.card.characteristics() else {
                continue;
            };
            for (ability_index, ability) in characteristics.abilities.iter().enumerate() {
                for target in target_options(ability.needs_target(), &targets) {
                    candidates.push(Action::ActivateAbility {
                        player,
                        source: permanent.id(),
                        ability_index,
                        target,
                    });
                }
            }
        }

        let mut legal = Vec::with_capacity(candidates.len());
        for action in candidates {
            if self.manager.check(table, &action)?.is_legal() {
                legal.push(action);
            }
        }
        Ok(legal)
    }

    /// Living players, then creatures on the battlefield
    fn target_candidates(&self) -> Vec<TargetRef> {
        let players = self.table.alive_players().map(|p| TargetRef::Player(p.id));
        let creatures = self
            .table
            .battlefield
            .iter()
            .filter(|p| p.card.is_creature())
            .map(|p| TargetRef::Permanent(p.id()));
        players.chain(creatures).collect()
    }

    fn strategy_index(&self, player: PlayerId) -> Result<usize> {
        self.table
            .player_idx(player)
            .ok_or(TabletopError::EntityNotFound(player.as_u32()))
    }

    fn run_beginning(&mut self) -> Result<()> {
        let active = self.table.active_player_id();
        self.table.untap_all(active);
        self.table.get_player_mut(active)?.reset_lands_played();

        match self.table.draw_card(active)? {
            Some(card) => {
                log_if_verbose!(
                    self.table,
                    "draw",
                    "{} draws {}",
                    self.table.active_player().name,
                    self.table.card(card).map_or("?", |c| c.name.as_str())
                );
            }
            None => {
                let player = self.table.get_player_mut(active)?;
                player.lose(LossReason::Decking);
                let message = format!("{} cannot draw from an empty library", player.name);
                self.table
                    .logger
                    .event(VerbosityLevel::Normal, "loss", &message);
            }
        }
        Ok(())
    }

    /// Offer the active player legal actions until they pass
    fn run_main(&mut self) -> Result<()> {
        let player = self.table.active_player_id();
        let idx = self.strategy_index(player)?;

        for _ in 0..self.config.max_actions_per_phase {
            if self.table.alive_players().count() <= 1 || self.table.get_player(player)?.has_lost()
            {
                break;
            }
            let legal = self.legal_actions(player)?;
            if legal.is_empty() {
                break;
            }
            let choice = {
                let view = TabletopView::new(&self.table, player);
                self.strategies[idx].choose_action(&view, &legal)
            };
            let Some(action) = choice else {
                break;
            };
            let result = self
                .manager
                .execute(&mut self.table, &action, self.observer.as_mut())?;
            if result.has_error() {
                // The strategy proposed something the rules refuse; it loses the phase
                break;
            }
            self.run_state_based_actions()?;
        }
        Ok(())
    }

    fn run_combat(&mut self) -> Result<()> {
        let attacking_player = self.table.active_player_id();
        let Some(defender) = self.table.next_opponent(attacking_player) else {
            return Ok(());
        };
        let candidates = combat::attack_candidates(&self.table, attacking_player);
        if candidates.is_empty() {
            return Ok(());
        }

        let attacker_idx = self.strategy_index(attacking_player)?;
        let chosen = {
            let view = TabletopView::new(&self.table, attacking_player);
            self.strategies[attacker_idx].declare_attackers(&view, &candidates)
        };
        let mut state = CombatState::new();
        let events =
            combat::declare_attackers(&mut self.table, &mut state, &chosen, &candidates, defender)?;
        self.log_events("combat", &events);
        if state.is_empty() {
            return Ok(());
        }

        let defender_idx = self.strategy_index(defender)?;
        let blockers = combat::block_candidates(&self.table, defender);
        let attackers = state.get_attackers();
        let pairs = {
            let view = TabletopView::new(&self.table, defender);
            self.strategies[defender_idx].declare_blockers(&view, &blockers, &attackers)
        };
        let events = combat::declare_blockers(&self.table, &mut state, &pairs, &blockers);
        self.log_events("combat", &events);

        let events = combat::resolve_combat_damage(&mut self.table, &state)?;
        self.log_events("combat", &events);
        Ok(())
    }

    fn run_state_based_actions(&mut self) -> Result<()> {
        let events = self.table.apply_state_based_actions()?;
        self.log_events("state", &events);
        Ok(())
    }

    fn log_events(&self, category: &str, events: &[String]) {
        for event in events {
            self.table
                .logger
                .event(VerbosityLevel::Normal, category, event);
        }
    }

    /// Record and log the terminal result once the game has ended
    fn settle_terminal(&mut self) -> Option<ExecutionResult> {
        let result = self.check_terminal()?;
        for message in result.messages() {
            self.table
                .logger
                .event(VerbosityLevel::Minimal, "game_over", message);
        }
        self.terminal = Some(result.clone());
        Some(result)
    }

    fn check_terminal(&self) -> Option<ExecutionResult> {
        let alive: Vec<&Player> = self.table.alive_players().collect();
        match alive.as_slice() {
            [winner] => Some(ExecutionResult::terminal(
                GameOutcome::Winner(winner.id),
                format!("{} wins on turn {}", winner.name, self.table.turn),
            )),
            [] => Some(ExecutionResult::terminal(
                GameOutcome::Draw,
                "every player lost at once",
            )),
            _ if self.table.turn >= self.config.max_turns => Some(ExecutionResult::terminal(
                GameOutcome::Draw,
                format!("turn limit {} reached", self.config.max_turns),
            )),
            _ => None,
        }
    }
}

/// `None` alone when nothing is targeted, otherwise one entry per target
fn target_options(needs_target: bool, targets: &[TargetRef]) -> Vec<Option<TargetRef>> {
    if needs_target {
        targets.iter().copied().map(Some).collect()
    } else {
        vec![None]
    }
}

impl std::fmt::Debug for RoundJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundJudge")
            .field("turn", &self.table.turn)
            .field("phase", &self.table.phase)
            .field("terminal", &self.terminal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ability, Card, CardType, CharacteristicsPart, Effect, LandPart, ManaCost};
    use crate::game::ZeroStrategy;

    fn judge_with_libraries(cards_each: usize, config: JudgeConfig) -> RoundJudge {
        let mut table = Tabletop::new();
        let alice = table.add_player("Alice", 20);
        let bob = table.add_player("Bob", 20);
        for owner in [alice, bob] {
            for _ in 0..cards_each {
                let id = table.next_card_id();
                let land = Card::new(id, "Wastes", owner)
                    .with_type(CardType::Land)
                    .with_part(LandPart::default())
                    .unwrap();
                table.add_card_to_library(land).unwrap();
            }
        }
        let strategies: Vec<Box<dyn Strategy>> = vec![Box::new(ZeroStrategy), Box::new(ZeroStrategy)];
        let manager = ExecutionManager::with_default_handlers().unwrap();
        RoundJudge::new(table, manager, strategies, config).unwrap()
    }

    #[test]
    fn test_phase_cycle_increments_turn_on_wrap_only() {
        let mut judge = judge_with_libraries(10, JudgeConfig::default());
        assert_eq!(judge.tabletop().turn, 0);

        for expected in &Phase::ALL[1..] {
            let result = judge.execute_next_phase().unwrap();
            assert!(!result.has_error());
            assert_eq!(judge.tabletop().phase, *expected);
            assert_eq!(judge.tabletop().turn, 0);
        }

        judge.execute_next_phase().unwrap();
        assert_eq!(judge.tabletop().phase, Phase::Beginning);
        assert_eq!(judge.tabletop().turn, 1);
        assert_eq!(judge.tabletop().active_player_idx, 1);
    }

    #[test]
    fn test_next_turn_from_any_phase() {
        let mut judge = judge_with_libraries(10, JudgeConfig::default());
        judge.execute_next_phase().unwrap();
        judge.execute_next_phase().unwrap();
        assert_eq!(judge.tabletop().phase, Phase::Combat);

        judge.execute_next_turn().unwrap();
        assert_eq!(judge.tabletop().turn, 1);
        assert_eq!(judge.tabletop().phase, Phase::Beginning);

        judge.execute_next_turn().unwrap();
        assert_eq!(judge.tabletop().turn, 2);
    }

    #[test]
    fn test_lands_are_played_in_main_phase() {
        let mut judge = judge_with_libraries(10, JudgeConfig::default());
        // Turn 1 belongs to Bob, who draws and then plays the land
        judge.execute_next_turn().unwrap();
        judge.execute_next_phase().unwrap();

        let bob = judge.tabletop().players[1].id;
        assert_eq!(judge.tabletop().permanents_of(bob).count(), 1);
        assert!(judge.legal_actions(bob).unwrap().is_empty());
    }

    #[test]
    fn test_decking_ends_game_and_result_is_sticky() {
        let mut judge = judge_with_libraries(0, JudgeConfig::default());
        let alice = judge.tabletop().players[0].id;

        let result = judge.execute_next_turn().unwrap();
        assert!(result.is_terminal());
        assert_eq!(result.winner(), Some(alice));
        assert_eq!(
            judge.tabletop().players[1].loss,
            Some(LossReason::Decking)
        );

        let turn = judge.tabletop().turn;
        let phase = judge.tabletop().phase;
        assert_eq!(judge.execute_next_phase().unwrap(), result);
        assert_eq!(judge.execute_next_turn().unwrap(), result);
        assert_eq!(judge.tabletop().turn, turn);
        assert_eq!(judge.tabletop().phase, phase);
    }

    #[test]
    fn test_lethal_host_action_ends_game() {
        let mut judge = judge_with_libraries(10, JudgeConfig::default());
        let alice = judge.table.players[0].id;
        let bob = judge.table.players[1].id;
        judge.table.phase = Phase::PreCombatMain;
        judge.table.get_player_mut(bob).unwrap().life = 3;

        let mountain = judge.table.next_card_id();
        let land = Card::new(mountain, "Mountain", alice)
            .with_type(CardType::Land)
            .with_part(LandPart::default())
            .unwrap()
            .with_part(CharacteristicsPart {
                abilities: vec![Ability::tap_for_mana(ManaCost::parse("{R}").unwrap())],
                spell_effects: Vec::new(),
            })
            .unwrap();
        judge.table.add_card_to_hand(land).unwrap();
        judge.table.move_to_battlefield(mountain, alice).unwrap();

        let bolt = judge.table.next_card_id();
        let spell = Card::new(bolt, "Lightning Bolt", alice)
            .with_type(CardType::Instant)
            .with_mana_cost(ManaCost::parse("{R}").unwrap())
            .with_part(CharacteristicsPart {
                abilities: Vec::new(),
                spell_effects: vec![Effect::DealDamage { amount: 3 }],
            })
            .unwrap();
        judge.table.add_card_to_hand(spell).unwrap();

        let tap = Action::ActivateAbility {
            player: alice,
            source: mountain,
            ability_index: 0,
            target: None,
        };
        assert_eq!(judge.execute_action(&tap).unwrap(), ExecutionResult::Success);
        let cast = Action::CastSpell {
            player: alice,
            card: bolt,
            target: Some(TargetRef::Player(bob)),
        };
        let result = judge.execute_action(&cast).unwrap();

        assert!(result.is_terminal());
        assert_eq!(result.winner(), Some(alice));
        assert!(judge.is_over());
        assert!(judge.tabletop().get_player(bob).unwrap().has_lost());

        // No further phase runs
        assert_eq!(judge.execute_next_phase().unwrap(), result);
        assert_eq!(judge.tabletop().phase, Phase::PreCombatMain);
        assert!(judge.legal_actions(alice).unwrap().is_empty());
    }

    #[test]
    fn test_turn_limit_is_a_draw() {
        let config = JudgeConfig {
            max_turns: 3,
            ..JudgeConfig::default()
        };
        let mut judge = judge_with_libraries(10, config);
        let result = judge.run_to_completion().unwrap();
        assert_eq!(result.outcome(), Some(GameOutcome::Draw));
        assert_eq!(judge.tabletop().turn, 3);
    }

    #[test]
    fn test_new_validates_seating() {
        let mut table = Tabletop::new();
        table.add_player("Alice", 20);
        let manager = ExecutionManager::with_default_handlers().unwrap();
        let err = RoundJudge::new(
            table,
            manager,
            vec![Box::new(ZeroStrategy)],
            JudgeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TabletopError::InvalidArgument(_)));

        let mut table = Tabletop::new();
        table.add_player("Alice", 20);
        table.add_player("Bob", 20);
        let manager = ExecutionManager::with_default_handlers().unwrap();
        assert!(RoundJudge::new(
            table,
            manager,
            vec![Box::new(ZeroStrategy)],
            JudgeConfig::default()
        )
        .is_err());
    }
}
