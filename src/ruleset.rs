//! Ruleset: every numeric limit of a game variant plus its card pools
//!
//! A ruleset is resolved once, before the game starts, and is read-only from
//! then on. `Ruleset::classic` builds the standard variant for a player count;
//! custom variants can be loaded from JSON and are checked by `validate`.

use crate::catalog;
use crate::core::{DevelopmentCard, Noble};
use crate::error::PlayerCountBound;
use crate::{Result, SplendorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Most tokens a player may hold at the end of a turn
    pub max_player_tokens: i32,

    /// Most cards a player may hold in reserve
    pub max_player_reserved_cards: usize,

    pub player_count: usize,
    pub min_players: usize,
    pub max_players: usize,

    /// Visible card slots per shop tier
    pub shop_tier_cards_count: usize,

    pub shop_tier_count: usize,

    /// Tokens of each gem color in the bank at game start
    pub community_gems_count: i32,

    /// Gold tokens in the bank at game start
    pub community_gold_count: i32,

    /// Most tokens a single selection may take
    pub max_tokens_per_selection: i32,

    /// A pile must hold at least this many tokens before two can be taken from it
    pub min_pile_for_double: i32,

    /// Prestige that triggers the final round
    pub prestige_to_win: u32,

    /// Nobles revealed at game start
    pub noble_count: usize,

    /// Card pool per tier, tier 1 first
    pub tier_pools: Vec<Vec<DevelopmentCard>>,

    pub nobles: Vec<Noble>,
}

impl Ruleset {
    pub const CLASSIC_MIN_PLAYERS: usize = 2;
    pub const CLASSIC_MAX_PLAYERS: usize = 4;

    /// The classic variant for `player_count` players
    pub fn classic(player_count: usize) -> Result<Self> {
        check_player_count(
            player_count,
            Self::CLASSIC_MIN_PLAYERS,
            Self::CLASSIC_MAX_PLAYERS,
        )?;

        Ok(Ruleset {
            max_player_tokens: 10,
            max_player_reserved_cards: 3,
            player_count,
            min_players: Self::CLASSIC_MIN_PLAYERS,
            max_players: Self::CLASSIC_MAX_PLAYERS,
            shop_tier_cards_count: 4,
            shop_tier_count: 3,
            community_gems_count: community_gems_for(player_count),
            community_gold_count: 5,
            max_tokens_per_selection: 3,
            min_pile_for_double: 4,
            prestige_to_win: 15,
            noble_count: player_count + 1,
            tier_pools: catalog::classic_tier_pools(),
            nobles: catalog::classic_nobles(),
        })
    }

    /// Parse a ruleset from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let ruleset: Ruleset = serde_json::from_str(json)
            .map_err(|e| SplendorError::SerializationError(e.to_string()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Load a ruleset from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SplendorError::SerializationError(e.to_string()))
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(SplendorError::InvalidRuleset(format!(
                "player bounds {}..={} are empty",
                self.min_players, self.max_players
            )));
        }
        check_player_count(self.player_count, self.min_players, self.max_players)?;

        if self.tier_pools.len() != self.shop_tier_count {
            return Err(SplendorError::InvalidShopTierCount {
                expected: self.shop_tier_count,
                found: self.tier_pools.len(),
            });
        }
        if self.shop_tier_count == 0 || self.shop_tier_cards_count == 0 {
            return Err(SplendorError::InvalidRuleset(
                "shop must have at least one tier and one slot per tier".to_string(),
            ));
        }
        if self.max_player_tokens < 0
            || self.community_gems_count < 0
            || self.community_gold_count < 0
            || self.max_tokens_per_selection < 1
        {
            return Err(SplendorError::InvalidRuleset(
                "token limits must be non-negative".to_string(),
            ));
        }
        if self.noble_count > self.nobles.len() {
            return Err(SplendorError::InvalidRuleset(format!(
                "{} nobles requested but only {} defined",
                self.noble_count,
                self.nobles.len()
            )));
        }
        Ok(())
    }
}

/// Gem tokens per color in the bank: fewer players, smaller piles
fn community_gems_for(player_count: usize) -> i32 {
    match player_count {
        0..=2 => 4,
        3 => 5,
        _ => 7,
    }
}

fn check_player_count(count: usize, min: usize, max: usize) -> Result<()> {
    if count > max {
        return Err(SplendorError::InvalidPlayerCount {
            count,
            bound: PlayerCountBound::AboveMaximum(max),
        });
    }
    if count < min {
        return Err(SplendorError::InvalidPlayerCount {
            count,
            bound: PlayerCountBound::BelowMinimum(min),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_community_seeding_by_player_count() {
        assert_eq!(Ruleset::classic(2).unwrap().community_gems_count, 4);
        assert_eq!(Ruleset::classic(3).unwrap().community_gems_count, 5);
        assert_eq!(Ruleset::classic(4).unwrap().community_gems_count, 7);
        assert_eq!(Ruleset::classic(4).unwrap().community_gold_count, 5);
    }

    #[test]
    fn test_player_count_bounds() {
        assert!(matches!(
            Ruleset::classic(5),
            Err(SplendorError::InvalidPlayerCount {
                count: 5,
                bound: PlayerCountBound::AboveMaximum(4)
            })
        ));
        assert!(matches!(
            Ruleset::classic(1),
            Err(SplendorError::InvalidPlayerCount {
                count: 1,
                bound: PlayerCountBound::BelowMinimum(2)
            })
        ));
        assert!(Ruleset::classic(0).is_err());
    }

    #[test]
    fn test_validate_tier_pool_count() {
        let mut ruleset = Ruleset::classic(2).unwrap();
        ruleset.tier_pools.pop();
        assert!(matches!(
            ruleset.validate(),
            Err(SplendorError::InvalidShopTierCount {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_custom_limits() {
        let mut ruleset = Ruleset::classic(3).unwrap();
        ruleset.max_player_tokens = 12;

        let json = ruleset.to_json().unwrap();
        let loaded = Ruleset::from_json(&json).unwrap();
        assert_eq!(loaded.max_player_tokens, 12);
        assert_eq!(loaded, ruleset);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Ruleset::from_json("{not json"),
            Err(SplendorError::SerializationError(_))
        ));
    }
}
