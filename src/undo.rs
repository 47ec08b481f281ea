//! Undo log of committed turns
//!
//! Every turn is committed as a short sequence of atomic `GameAction`s. The
//! log keeps them in order with a mark at the start of each turn, so a whole
//! turn can be rewound without deep-copying the game state.

use crate::core::{DevelopmentCard, PlayerId, TokenPool};
use serde::{Deserialize, Serialize};

/// Atomic game actions that can be logged and undone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move tokens from the bank to a player (negative counts flow back)
    TransferTokens { player: PlayerId, amount: TokenPool },

    /// Take the face-up card at `(tier, column)`; the slot was refilled with
    /// `replacement` from the restock pile
    TakeShopCard {
        tier: usize,
        column: usize,
        card: DevelopmentCard,
        replacement: Option<DevelopmentCard>,
    },

    /// Take the top card of a tier's restock pile without revealing it
    DrawPileCard { tier: usize, card: DevelopmentCard },

    /// Add a card to the end of a player's reserved cards
    ReserveCard { player: PlayerId, card: DevelopmentCard },

    /// Remove the reserved card at `index`
    ReleaseReservedCard {
        player: PlayerId,
        index: usize,
        card: DevelopmentCard,
    },

    /// Add a card to a player's owned cards
    GainCard { player: PlayerId, card: DevelopmentCard },

    /// Pass the turn
    AdvanceTurn { from: PlayerId, to: PlayerId },
}

/// Undo log for tracking and rewinding committed turns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoLog {
    /// Stack of actions (most recent at end)
    actions: Vec<GameAction>,

    /// Is logging enabled? (disabled for simulation throughput)
    enabled: bool,

    /// Index into `actions` where each committed turn starts
    turn_marks: Vec<usize>,
}

impl UndoLog {
    pub fn new() -> Self {
        UndoLog {
            actions: Vec::new(),
            enabled: true,
            turn_marks: Vec::new(),
        }
    }

    /// Create a disabled undo log (for simulation and benchmarking)
    pub fn disabled() -> Self {
        UndoLog {
            actions: Vec::new(),
            enabled: false,
            turn_marks: Vec::new(),
        }
    }

    /// Record a committed turn
    pub fn log_turn(&mut self, actions: impl IntoIterator<Item = GameAction>) {
        if self.enabled {
            self.turn_marks.push(self.actions.len());
            self.actions.extend(actions);
        }
    }

    /// Remove the most recent turn, returning its actions in commit order
    pub fn pop_turn(&mut self) -> Option<Vec<GameAction>> {
        let mark = self.turn_marks.pop()?;
        Some(self.actions.split_off(mark))
    }

    /// Number of actions in the log
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of turns that can still be undone
    pub fn turn_count(&self) -> usize {
        self.turn_marks.len()
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}
