//! Judge configuration
//!
//! Loaded from a JSON file or built in code; every field has a default so a
//! partial file is enough.

use crate::game::VerbosityLevel;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Seed for library shuffles and seeded strategies
    pub seed: u64,
    pub starting_life: i32,
    pub opening_hand_size: usize,
    /// The game is a draw once this many turns have passed
    pub max_turns: u32,
    /// Cap on actions a player may take in one main phase
    pub max_actions_per_phase: usize,
    pub verbosity: VerbosityLevel,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            seed: 0,
            starting_life: 20,
            opening_hand_size: 7,
            max_turns: 1000,
            max_actions_per_phase: 64,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

impl JudgeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
