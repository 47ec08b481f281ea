//! Core game types: tokens, cards, nobles, players

pub mod card;
pub mod player;
pub mod tokens;

pub use card::{CardId, DevelopmentCard, Noble};
pub use player::{Player, PlayerId};
pub use tokens::{Gem, GemPool, Token, TokenPool};
