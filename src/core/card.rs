//! Development cards and nobles

use crate::core::{Gem, GemPool};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a catalog card
///
/// Assigned once when the catalog is built; a card keeps its id as it moves
/// from restock pile to shop slot to a player's reserved or owned cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u16);

impl CardId {
    pub fn new(id: u16) -> Self {
        CardId(id)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A development card: produces one gem forever once owned
/// Copy-eligible: the cost is five i32 counts and the rest are scalars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevelopmentCard {
    pub id: CardId,

    /// Gem color this card produces for its owner
    pub gem: Gem,

    /// Prestige points awarded on purchase
    pub prestige: u8,

    /// Purchase cost in gem tokens
    pub cost: GemPool,

    /// Shop tier (1-3)
    pub tier: u8,
}

impl DevelopmentCard {
    pub fn new(id: CardId, gem: Gem, prestige: u8, cost: GemPool, tier: u8) -> Self {
        DevelopmentCard {
            id,
            gem,
            prestige,
            cost,
            tier,
        }
    }
}

impl fmt::Display for DevelopmentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} T{} {} +{}pp [{}]",
            self.id, self.tier, self.gem, self.prestige, self.cost
        )
    }
}

/// A noble: awards prestige to a player whose owned cards meet its requirement
///
/// The requirement counts development cards per color, not tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Noble {
    pub requirement: GemPool,
    pub prestige: u8,
}

impl Noble {
    pub fn new(requirement: GemPool, prestige: u8) -> Self {
        Noble {
            requirement,
            prestige,
        }
    }
}

impl fmt::Display for Noble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Noble +{}pp [{}]", self.prestige, self.requirement)
    }
}
