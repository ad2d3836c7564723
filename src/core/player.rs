//! Player representation

use crate::core::{GameEntity, ManaPool, PlayerId, PlayerName};
use crate::zones::PlayerZones;
use serde::{Deserialize, Serialize};

/// Why a player lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Life total reached zero or less
    LifeDepleted,
    /// Had to draw from an empty library
    Decking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub mana_pool: ManaPool,
    /// Set once and never cleared
    pub loss: Option<LossReason>,
    pub lands_played_this_turn: u8,
    pub max_lands_per_turn: u8,
    pub zones: PlayerZones,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            mana_pool: ManaPool::new(),
            loss: None,
            lands_played_this_turn: 0,
            max_lands_per_turn: 1,
            zones: PlayerZones::new(id),
        }
    }

    pub fn has_lost(&self) -> bool {
        self.loss.is_some()
    }

    /// Record a loss; the first reason sticks
    pub fn lose(&mut self, reason: LossReason) {
        self.loss.get_or_insert(reason);
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn can_play_land(&self) -> bool {
        self.lands_played_this_turn < self.max_lands_per_turn
    }

    pub fn play_land(&mut self) {
        self.lands_played_this_turn += 1;
    }

    pub fn reset_lands_played(&mut self) {
        self.lands_played_this_turn = 0;
    }

    pub fn empty_mana_pool(&mut self) {
        self.mana_pool.clear();
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
