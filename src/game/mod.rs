//! Game state, turn engine and the controllers that drive it

pub mod actions;
pub mod controller;
pub mod game_loop;
pub mod logger;
pub mod random_controller;
pub mod snapshot;
pub mod state;

pub use actions::{CardRef, PlayerAction, Transaction};
pub use controller::{GameStateView, PlayerController};
pub use game_loop::{GameEndReason, GameLoop, GameResult};
pub use logger::{GameLogger, LogCategory, LogEntry, OutputMode, VerbosityLevel};
pub use random_controller::RandomController;
pub use snapshot::GameSnapshot;
pub use state::GameState;
