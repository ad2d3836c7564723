//! Turn phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a turn, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PreCombatMain,
    Combat,
    PostCombatMain,
    Ending,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Beginning,
        Phase::PreCombatMain,
        Phase::Combat,
        Phase::PostCombatMain,
        Phase::Ending,
    ];

    /// The phase every turn starts in
    pub const FIRST: Phase = Phase::Beginning;

    /// The following phase, and whether advancing wrapped into a new turn
    pub fn next(self) -> (Phase, bool) {
        match self {
            Phase::Beginning => (Phase::PreCombatMain, false),
            Phase::PreCombatMain => (Phase::Combat, false),
            Phase::Combat => (Phase::PostCombatMain, false),
            Phase::PostCombatMain => (Phase::Ending, false),
            Phase::Ending => (Phase::Beginning, true),
        }
    }

    /// Lands, sorceries and non-mana abilities are only playable here
    pub fn is_main(self) -> bool {
        matches!(self, Phase::PreCombatMain | Phase::PostCombatMain)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Beginning => "Beginning",
            Phase::PreCombatMain => "Main 1",
            Phase::Combat => "Combat",
            Phase::PostCombatMain => "Main 2",
            Phase::Ending => "Ending",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
