//! Observers notified after every successful state change
//!
//! The execution manager notifies after each executed action; the round
//! judge notifies after each phase. Observers only read the tabletop.

use crate::game::{OutputFormat, Tabletop, TabletopSnapshot, VerbosityLevel};

pub trait Observer {
    fn notify(&mut self, table: &Tabletop);
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&mut self, _table: &Tabletop) {}
}

/// Records a snapshot per notification and logs it at verbose level
#[derive(Debug, Default, Clone)]
pub struct LoggingObserver {
    history: Vec<TabletopSnapshot>,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[TabletopSnapshot] {
        &self.history
    }

    pub fn last(&self) -> Option<&TabletopSnapshot> {
        self.history.last()
    }
}

impl Observer for LoggingObserver {
    fn notify(&mut self, table: &Tabletop) {
        let snapshot = TabletopSnapshot::capture(table);
        let logger = &table.logger;
        if logger.enabled(VerbosityLevel::Verbose) || logger.is_capturing() {
            let rendered = match logger.output_format() {
                OutputFormat::Text => snapshot.to_string(),
                OutputFormat::Json => snapshot
                    .to_json()
                    .unwrap_or_else(|e| format!("snapshot unavailable: {e}")),
            };
            logger.event(VerbosityLevel::Verbose, "snapshot", rendered.trim_end());
        }
        self.history.push(snapshot);
    }
}

/// What an interactive session wants after a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
    /// Pause again at the next notification
    Step,
    /// Run until the turn counter advances
    NextTurn,
    /// Never pause again
    RunToEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Stepping,
    UntilTurn(u32),
    Running,
}

/// Logging observer that hands control to a callback at chosen points
///
/// The callback sees the tabletop at the pause and decides how far to run
/// before the next one. Used by the CLI `--step` mode to wait for input.
pub struct InteractiveObserver<F>
where
    F: FnMut(&Tabletop) -> StepControl,
{
    inner: LoggingObserver,
    prompt: F,
    mode: Mode,
    pauses: usize,
}

impl<F> InteractiveObserver<F>
where
    F: FnMut(&Tabletop) -> StepControl,
{
    pub fn new(prompt: F) -> Self {
        InteractiveObserver {
            inner: LoggingObserver::new(),
            prompt,
            mode: Mode::Stepping,
            pauses: 0,
        }
    }

    pub fn snapshots(&self) -> &[TabletopSnapshot] {
        self.inner.snapshots()
    }

    /// How many times the callback has been invoked
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    fn should_pause(&self, table: &Tabletop) -> bool {
        match self.mode {
            Mode::Stepping => true,
            Mode::UntilTurn(turn) => table.turn >= turn,
            Mode::Running => false,
        }
    }
}

impl<F> Observer for InteractiveObserver<F>
where
    F: FnMut(&Tabletop) -> StepControl,
{
    fn notify(&mut self, table: &Tabletop) {
        self.inner.notify(table);
        if !self.should_pause(table) {
            return;
        }
        self.pauses += 1;
        self.mode = match (self.prompt)(table) {
            StepControl::Step => Mode::Stepping,
            StepControl::NextTurn => Mode::UntilTurn(table.turn + 1),
            StepControl::RunToEnd => Mode::Running,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_observer_records_history() {
        let mut table = Tabletop::new();
        table.add_player("Alice", 20);
        table.logger.enable_capture();

        let mut observer = LoggingObserver::new();
        observer.notify(&table);
        table.turn = 1;
        observer.notify(&table);

        assert_eq!(observer.snapshots().len(), 2);
        assert_eq!(observer.last().unwrap().turn, 1);

        let logs = table.logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].category.as_deref(), Some("snapshot"));
    }

    #[test]
    fn test_interactive_next_turn_skips_same_turn() {
        let mut table = Tabletop::new();
        table.add_player("Alice", 20);

        let mut observer = InteractiveObserver::new(|_: &Tabletop| StepControl::NextTurn);
        observer.notify(&table);
        observer.notify(&table);
        observer.notify(&table);
        assert_eq!(observer.pauses(), 1);

        table.turn = 1;
        observer.notify(&table);
        assert_eq!(observer.pauses(), 2);
        assert_eq!(observer.snapshots().len(), 4);
    }

    #[test]
    fn test_interactive_run_to_end() {
        let table = Tabletop::new();
        let mut observer = InteractiveObserver::new(|_: &Tabletop| StepControl::RunToEnd);
        for _ in 0..5 {
            observer.notify(&table);
        }
        assert_eq!(observer.pauses(), 1);
    }

    #[test]
    fn test_interactive_step_pauses_every_time() {
        let table = Tabletop::new();
        let mut observer = InteractiveObserver::new(|_: &Tabletop| StepControl::Step);
        for _ in 0..3 {
            observer.notify(&table);
        }
        assert_eq!(observer.pauses(), 3);
    }
}
