//! Player representation

use crate::core::{DevelopmentCard, GemPool, Noble, TokenPool};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Seat index of a player (0-based, fixed for the whole game)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    pub fn new(seat: u8) -> Self {
        PlayerId(seat)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Per-seat holdings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Player name
    pub name: String,

    /// Tokens in hand (six-kind pool)
    pub tokens: TokenPool,

    /// Cards taken from the shop but not yet paid for
    pub reserved: SmallVec<[DevelopmentCard; 3]>,

    /// Purchased development cards
    pub cards: Vec<DevelopmentCard>,

    /// Nobles that have visited this player
    pub nobles: Vec<Noble>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            tokens: TokenPool::new(),
            reserved: SmallVec::new(),
            cards: Vec::new(),
            nobles: Vec::new(),
        }
    }

    /// Gems produced per color by owned cards
    pub fn production(&self) -> GemPool {
        let mut production = GemPool::new();
        for card in &self.cards {
            production[card.gem] += 1;
        }
        production
    }

    /// Prestige from owned cards and visiting nobles
    pub fn prestige(&self) -> u32 {
        let cards: u32 = self.cards.iter().map(|card| u32::from(card.prestige)).sum();
        let nobles: u32 = self.nobles.iter().map(|noble| u32::from(noble.prestige)).sum();
        cards + nobles
    }

    pub fn token_count(&self) -> i32 {
        self.tokens.total()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}pp | tokens {} | cards {} | production {} | reserved {}",
            self.id,
            self.name,
            self.prestige(),
            self.tokens,
            self.cards.len(),
            self.production(),
            self.reserved.len()
        )
    }
}
