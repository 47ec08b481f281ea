//! Splendor rules engine
//!
//! Validates and applies turns of the gem-trading card game: taking tokens
//! from the bank, reserving development cards and buying them. Every action
//! is planned against an immutable state first and committed atomically, so a
//! rejected move never changes the game.

pub mod catalog;
pub mod core;
pub mod error;
pub mod game;
pub mod notation;
pub mod ruleset;
pub mod shop;
pub mod tournament;
pub mod undo;

pub use error::{Result, SplendorError};
