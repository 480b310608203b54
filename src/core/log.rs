//! Game log sinks.
//!
//! The game log is a side channel: a readable account of what happened
//! in a match. It never feeds back into game behaviour. Sinks are
//! injected into `GameState`; tests use `NullSink` or `MemorySink`.

use super::player::SeatIndex;

/// One line of the game log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Turn number when the entry was written.
    pub turn: u32,
    /// Seat the entry concerns, if any.
    pub seat: Option<SeatIndex>,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(turn: u32, seat: Option<SeatIndex>, message: impl Into<String>) -> Self {
        Self {
            turn,
            seat,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.seat {
            Some(seat) => write!(f, "[turn {}] {}: {}", self.turn, seat, self.message),
            None => write!(f, "[turn {}] {}", self.turn, self.message),
        }
    }
}

/// Destination for game log entries.
pub trait LogSink: std::fmt::Debug {
    fn record(&mut self, entry: &LogEntry);
}

/// Forwards entries to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&mut self, entry: &LogEntry) {
        tracing::info!(target: "sitewar::game_log", turn = entry.turn, "{}", entry);
    }
}

/// Discards every entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&mut self, _entry: &LogEntry) {}
}

/// Keeps every entry in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    entries: Vec<LogEntry>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl LogSink for MemorySink {
    fn record(&mut self, entry: &LogEntry) {
        self.entries.push(entry.clone());
    }
}
