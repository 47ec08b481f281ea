//! Error types for the Splendor engine

use std::fmt;
use thiserror::Error;

/// Which player-count bound a ruleset violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCountBound {
    AboveMaximum(usize),
    BelowMinimum(usize),
}

impl fmt::Display for PlayerCountBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCountBound::AboveMaximum(max) => write!(f, "maximum is {}", max),
            PlayerCountBound::BelowMinimum(min) => write!(f, "minimum is {}", min),
        }
    }
}

/// Why a token selection was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionViolation {
    /// A requested count was negative
    NegativeCount,
    /// Nothing was requested
    Empty,
    /// Gold can only be gained by reserving a card
    GoldNotSelectable,
    /// More tokens than a single selection allows
    TooMany,
    /// A double pick was combined with other tokens
    DoubleWithOthers,
    /// A double pick from a pile below the threshold
    PileTooSmallForDouble,
    /// Three tokens that are not three distinct kinds
    NotDistinct,
    /// The bank has none of a requested kind left
    PileExhausted,
    /// The discard is negative, unaffordable, or more than needed
    InvalidDiscard,
}

impl fmt::Display for SelectionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SelectionViolation::NegativeCount => "negative token count",
            SelectionViolation::Empty => "no tokens selected",
            SelectionViolation::GoldNotSelectable => "gold cannot be selected",
            SelectionViolation::TooMany => "too many tokens selected",
            SelectionViolation::DoubleWithOthers => "a double pick must be the only pick",
            SelectionViolation::PileTooSmallForDouble => "pile too small for a double pick",
            SelectionViolation::NotDistinct => "three tokens must be of distinct kinds",
            SelectionViolation::PileExhausted => "the bank has no tokens of a requested kind",
            SelectionViolation::InvalidDiscard => "invalid discard",
        };
        f.write_str(reason)
    }
}

/// Why a reservation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationViolation {
    /// The player already holds the maximum number of reserved cards
    LimitExceeded { limit: usize },
    /// No such shop tier
    TierOutOfRange { tier: usize },
    /// The targeted slot holds no card
    EmptySlot,
    /// The tier's restock pile is empty
    EmptyPile,
    /// The discard is negative, not held, or not exactly what the gold grant needs
    InvalidDiscard,
}

impl fmt::Display for ReservationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservationViolation::LimitExceeded { limit } => {
                write!(f, "already holding {} reserved cards", limit)
            }
            ReservationViolation::TierOutOfRange { tier } => write!(f, "no tier {}", tier),
            ReservationViolation::EmptySlot => write!(f, "slot is empty"),
            ReservationViolation::EmptyPile => write!(f, "restock pile is empty"),
            ReservationViolation::InvalidDiscard => write!(f, "invalid discard"),
        }
    }
}

/// Why a purchase target could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseViolation {
    TierOutOfRange { tier: usize },
    EmptySlot,
    NoSuchReservedCard { index: usize },
}

impl fmt::Display for PurchaseViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseViolation::TierOutOfRange { tier } => write!(f, "no tier {}", tier),
            PurchaseViolation::EmptySlot => write!(f, "slot is empty"),
            PurchaseViolation::NoSuchReservedCard { index } => {
                write!(f, "no reserved card at index {}", index)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SplendorError {
    #[error("Invalid player count {count}: {bound}")]
    InvalidPlayerCount { count: usize, bound: PlayerCountBound },

    #[error("Invalid shop tier count: expected {expected} card pools, found {found}")]
    InvalidShopTierCount { expected: usize, found: usize },

    #[error("Invalid ruleset: {0}")]
    InvalidRuleset(String),

    #[error("Illegal token selection: {0}")]
    IllegalTokenSelection(SelectionViolation),

    #[error("Illegal card reservation: {0}")]
    IllegalCardReservation(ReservationViolation),

    #[error("Illegal card purchase: {0}")]
    IllegalCardPurchase(PurchaseViolation),

    #[error("Over player token limit: {total} tokens, limit is {limit}")]
    OverPlayerTokenLimit { total: i32, limit: i32 },

    #[error("Insufficient funds: short by {shortfall} tokens")]
    InsufficientFunds { shortfall: i32 },

    #[error("The game is over")]
    GameOver,

    #[error("Unknown token kind: {0}")]
    UnknownTokenKind(String),

    #[error("Slot {index} out of range (tier has {width} slots)")]
    SlotOutOfRange { index: usize, width: usize },

    #[error("Tier {tier} out of range (shop has {count} tiers)")]
    TierOutOfRange { tier: usize, count: usize },

    #[error("No player in seat {0}")]
    UnknownPlayer(usize),

    #[error("{controllers} controllers supplied for {players} players")]
    ControllerMismatch { controllers: usize, players: usize },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SplendorError {
    /// True for errors that reject a move but leave the game untouched, so the
    /// same player may retry
    pub fn is_illegal_action(&self) -> bool {
        matches!(
            self,
            SplendorError::IllegalTokenSelection(_)
                | SplendorError::IllegalCardReservation(_)
                | SplendorError::IllegalCardPurchase(_)
                | SplendorError::OverPlayerTokenLimit { .. }
                | SplendorError::InsufficientFunds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SplendorError>;
