//! Game event log
//!
//! Every entry carries the turn it belongs to and a `LogCategory`. Entries are
//! filtered by `VerbosityLevel` before printing; capture to memory keeps all of
//! them regardless of verbosity, which is what tests inspect.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// No output
    Silent = 0,
    /// Game outcome only
    Minimal = 1,
    /// Committed turns
    #[default]
    Normal = 2,
    /// Rejected actions, undo, state dumps
    Verbose = 3,
}

/// What an entry is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    /// A committed turn
    Turn,
    /// An action that failed validation
    Rejected,
    /// A turn that was rewound
    Undo,
    /// Game end, stall or turn cap
    Outcome,
}

/// Where entries go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Capture only, nothing printed
    Memory,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub category: LogCategory,
    /// Turn number at the time of the entry
    pub turn: u32,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            LogCategory::Outcome => write!(f, "{}", self.message),
            _ => write!(f, "  [turn {:>3}] {}", self.turn, self.message),
        }
    }
}

/// Per-game logger
///
/// Logging takes `&self` so a game can log while parts of it are borrowed.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    captured: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            captured: RefCell::new(Vec::new()),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to memory only
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Captured entries, oldest first
    pub fn logs(&self) -> Ref<'_, [LogEntry]> {
        Ref::map(self.captured.borrow(), Vec::as_slice)
    }

    /// Number of captured entries in `category`
    pub fn count(&self, category: LogCategory) -> usize {
        self.captured
            .borrow()
            .iter()
            .filter(|entry| entry.category == category)
            .count()
    }

    /// Remove and return everything captured so far
    pub fn take_logs(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.captured.borrow_mut())
    }

    pub fn clear_logs(&mut self) {
        self.captured.get_mut().clear();
    }

    pub fn log(&self, level: VerbosityLevel, category: LogCategory, turn: u32, message: &str) {
        let printed = self.output_mode != OutputMode::Memory && level <= self.verbosity;
        if !printed && !self.is_capturing() {
            return;
        }

        let entry = LogEntry {
            level,
            category,
            turn,
            message: message.to_string(),
        };
        if printed {
            println!("{}", entry);
        }
        if self.is_capturing() {
            self.captured.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn turn(&self, turn: u32, message: &str) {
        self.log(VerbosityLevel::Normal, LogCategory::Turn, turn, message);
    }

    #[inline]
    pub fn rejected(&self, turn: u32, message: &str) {
        self.log(VerbosityLevel::Verbose, LogCategory::Rejected, turn, message);
    }

    #[inline]
    pub fn undo(&self, turn: u32, message: &str) {
        self.log(VerbosityLevel::Verbose, LogCategory::Undo, turn, message);
    }

    #[inline]
    pub fn outcome(&self, turn: u32, message: &str) {
        self.log(VerbosityLevel::Minimal, LogCategory::Outcome, turn, message);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("captured", &self.captured.borrow().len())
            .finish()
    }
}

/// Clones keep settings but start with nothing captured
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            captured: RefCell::new(Vec::new()),
        }
    }
}
