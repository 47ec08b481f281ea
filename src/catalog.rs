//! Static card and noble tables for the classic game
//!
//! Costs are listed as `[diamond, sapphire, emerald, ruby, onyx]`.

use crate::core::{CardId, DevelopmentCard, Gem, GemPool, Noble};

type CardRow = (Gem, u8, [i32; 5]);

const TIER_ONE: [CardRow; 40] = [
    (Gem::Onyx, 0, [1, 1, 1, 1, 0]),
    (Gem::Onyx, 0, [1, 2, 1, 1, 0]),
    (Gem::Onyx, 0, [2, 2, 0, 1, 0]),
    (Gem::Onyx, 0, [0, 0, 1, 3, 1]),
    (Gem::Onyx, 0, [0, 0, 2, 1, 0]),
    (Gem::Onyx, 0, [2, 0, 2, 0, 0]),
    (Gem::Onyx, 0, [0, 0, 3, 0, 0]),
    (Gem::Onyx, 1, [0, 4, 0, 0, 0]),
    (Gem::Sapphire, 0, [1, 0, 1, 1, 1]),
    (Gem::Sapphire, 0, [1, 0, 1, 2, 1]),
    (Gem::Sapphire, 0, [1, 0, 2, 2, 0]),
    (Gem::Sapphire, 0, [0, 1, 3, 1, 0]),
    (Gem::Sapphire, 0, [1, 0, 0, 0, 2]),
    (Gem::Sapphire, 0, [0, 0, 2, 0, 2]),
    (Gem::Sapphire, 0, [0, 0, 0, 0, 3]),
    (Gem::Sapphire, 1, [0, 0, 0, 4, 0]),
    (Gem::Diamond, 0, [0, 1, 1, 1, 1]),
    (Gem::Diamond, 0, [0, 1, 2, 1, 1]),
    (Gem::Diamond, 0, [0, 2, 2, 0, 1]),
    (Gem::Diamond, 0, [3, 1, 0, 0, 1]),
    (Gem::Diamond, 0, [0, 0, 0, 2, 1]),
    (Gem::Diamond, 0, [0, 2, 0, 0, 2]),
    (Gem::Diamond, 0, [0, 3, 0, 0, 0]),
    (Gem::Diamond, 1, [0, 0, 4, 0, 0]),
    (Gem::Emerald, 0, [1, 1, 0, 1, 1]),
    (Gem::Emerald, 0, [1, 1, 0, 1, 2]),
    (Gem::Emerald, 0, [0, 1, 0, 2, 2]),
    (Gem::Emerald, 0, [1, 3, 1, 0, 0]),
    (Gem::Emerald, 0, [2, 1, 0, 0, 0]),
    (Gem::Emerald, 0, [0, 2, 0, 2, 0]),
    (Gem::Emerald, 0, [0, 0, 0, 3, 0]),
    (Gem::Emerald, 1, [0, 0, 0, 0, 4]),
    (Gem::Ruby, 0, [1, 1, 1, 0, 1]),
    (Gem::Ruby, 0, [2, 1, 1, 0, 1]),
    (Gem::Ruby, 0, [2, 0, 1, 0, 2]),
    (Gem::Ruby, 0, [1, 0, 0, 1, 3]),
    (Gem::Ruby, 0, [0, 2, 1, 0, 0]),
    (Gem::Ruby, 0, [2, 0, 0, 2, 0]),
    (Gem::Ruby, 0, [3, 0, 0, 0, 0]),
    (Gem::Ruby, 1, [4, 0, 0, 0, 0]),
];

const TIER_TWO: [CardRow; 30] = [
    (Gem::Onyx, 1, [3, 2, 2, 0, 0]),
    (Gem::Onyx, 1, [3, 0, 3, 0, 2]),
    (Gem::Onyx, 2, [0, 1, 4, 2, 0]),
    (Gem::Onyx, 2, [0, 0, 5, 3, 0]),
    (Gem::Onyx, 2, [5, 0, 0, 0, 0]),
    (Gem::Onyx, 3, [0, 0, 0, 0, 6]),
    (Gem::Sapphire, 1, [0, 2, 2, 3, 0]),
    (Gem::Sapphire, 1, [0, 2, 3, 0, 3]),
    (Gem::Sapphire, 2, [5, 3, 0, 0, 0]),
    (Gem::Sapphire, 2, [2, 0, 0, 1, 4]),
    (Gem::Sapphire, 2, [0, 5, 0, 0, 0]),
    (Gem::Sapphire, 3, [0, 6, 0, 0, 0]),
    (Gem::Diamond, 1, [0, 0, 3, 2, 2]),
    (Gem::Diamond, 1, [2, 3, 0, 3, 0]),
    (Gem::Diamond, 2, [0, 0, 1, 4, 2]),
    (Gem::Diamond, 2, [0, 0, 0, 5, 3]),
    (Gem::Diamond, 2, [0, 0, 0, 5, 0]),
    (Gem::Diamond, 3, [6, 0, 0, 0, 0]),
    (Gem::Emerald, 1, [3, 0, 2, 3, 0]),
    (Gem::Emerald, 1, [2, 3, 0, 0, 2]),
    (Gem::Emerald, 2, [4, 2, 0, 0, 1]),
    (Gem::Emerald, 2, [0, 5, 3, 0, 0]),
    (Gem::Emerald, 2, [0, 0, 5, 0, 0]),
    (Gem::Emerald, 3, [0, 0, 6, 0, 0]),
    (Gem::Ruby, 1, [2, 0, 0, 2, 3]),
    (Gem::Ruby, 1, [0, 3, 0, 2, 3]),
    (Gem::Ruby, 2, [1, 4, 2, 0, 0]),
    (Gem::Ruby, 2, [3, 0, 0, 0, 5]),
    (Gem::Ruby, 2, [0, 0, 0, 0, 5]),
    (Gem::Ruby, 3, [0, 0, 0, 6, 0]),
];

const TIER_THREE: [CardRow; 20] = [
    (Gem::Onyx, 3, [3, 3, 5, 3, 0]),
    (Gem::Onyx, 4, [0, 0, 0, 7, 0]),
    (Gem::Onyx, 4, [0, 0, 3, 6, 3]),
    (Gem::Onyx, 5, [0, 0, 0, 7, 3]),
    (Gem::Sapphire, 3, [3, 0, 3, 3, 5]),
    (Gem::Sapphire, 4, [7, 0, 0, 0, 0]),
    (Gem::Sapphire, 4, [6, 3, 0, 0, 3]),
    (Gem::Sapphire, 5, [7, 3, 0, 0, 0]),
    (Gem::Diamond, 3, [0, 3, 3, 5, 3]),
    (Gem::Diamond, 4, [0, 0, 0, 0, 7]),
    (Gem::Diamond, 4, [3, 0, 0, 3, 6]),
    (Gem::Diamond, 5, [3, 0, 0, 0, 7]),
    (Gem::Emerald, 3, [5, 3, 0, 3, 3]),
    (Gem::Emerald, 4, [0, 7, 0, 0, 0]),
    (Gem::Emerald, 4, [3, 6, 3, 0, 0]),
    (Gem::Emerald, 5, [0, 7, 3, 0, 0]),
    (Gem::Ruby, 3, [3, 5, 3, 0, 3]),
    (Gem::Ruby, 4, [0, 0, 7, 0, 0]),
    (Gem::Ruby, 4, [0, 3, 6, 3, 0]),
    (Gem::Ruby, 5, [0, 0, 7, 3, 0]),
];

const NOBLES: [[i32; 5]; 10] = [
    [0, 0, 4, 4, 0],
    [0, 0, 0, 4, 4],
    [0, 4, 4, 0, 0],
    [4, 4, 0, 0, 0],
    [4, 0, 0, 0, 4],
    [3, 3, 0, 0, 3],
    [3, 3, 3, 0, 0],
    [0, 3, 3, 3, 0],
    [0, 0, 3, 3, 3],
    [3, 0, 0, 3, 3],
];

const NOBLE_PRESTIGE: u8 = 3;

fn cost([diamond, sapphire, emerald, ruby, onyx]: [i32; 5]) -> GemPool {
    GemPool {
        ruby,
        emerald,
        sapphire,
        diamond,
        onyx,
    }
}

/// The three classic tier pools, unshuffled
///
/// Card ids are assigned sequentially across tiers, starting at 0 with tier 1.
pub fn classic_tier_pools() -> Vec<Vec<DevelopmentCard>> {
    let mut next_id: u16 = 0;
    [&TIER_ONE[..], &TIER_TWO[..], &TIER_THREE[..]]
        .iter()
        .zip(1u8..)
        .map(|(rows, tier)| {
            rows.iter()
                .map(|&(gem, prestige, costs)| {
                    let card = DevelopmentCard::new(CardId::new(next_id), gem, prestige, cost(costs), tier);
                    next_id += 1;
                    card
                })
                .collect()
        })
        .collect()
}

/// The ten classic nobles
pub fn classic_nobles() -> Vec<Noble> {
    NOBLES
        .iter()
        .map(|&requirement| Noble::new(cost(requirement), NOBLE_PRESTIGE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pool_sizes() {
        let pools = classic_tier_pools();
        let sizes: Vec<usize> = pools.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![40, 30, 20]);
        assert_eq!(classic_nobles().len(), 10);
    }

    #[test]
    fn test_card_ids_are_unique_and_tiers_match() {
        let pools = classic_tier_pools();
        let mut ids = HashSet::new();
        for (index, pool) in pools.iter().enumerate() {
            for card in pool {
                assert!(ids.insert(card.id), "duplicate id {}", card.id);
                assert_eq!(usize::from(card.tier), index + 1);
                assert!(card.cost.is_nonnegative());
                assert!(card.cost.total() > 0);
            }
        }
    }

    #[test]
    fn test_each_color_has_eight_tier_one_cards() {
        let pools = classic_tier_pools();
        for gem in Gem::ALL {
            let count = pools[0].iter().filter(|card| card.gem == gem).count();
            assert_eq!(count, 8, "{}", gem);
        }
    }
}
