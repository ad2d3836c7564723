//! Game state, turn structure and the round judge

pub mod combat;
pub mod judge;
pub mod logger;
pub mod observer;
pub mod phase;
pub mod result;
pub mod snapshot;
pub mod state_hash;
pub mod strategy;
pub mod tabletop;

pub use combat::CombatState;
pub use judge::RoundJudge;
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use observer::{InteractiveObserver, LoggingObserver, NoopObserver, Observer, StepControl};
pub use phase::Phase;
pub use result::{ExecutionResult, GameOutcome};
pub use snapshot::{PermanentSummary, PlayerSummary, TabletopSnapshot};
pub use state_hash::{compute_state_hash, format_hash};
pub use strategy::{RandomStrategy, Strategy, StrategyKind, TabletopView, ZeroStrategy};
pub use tabletop::Tabletop;
