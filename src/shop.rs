//! The card shop: three tiers of face-up slots, each backed by a restock pile

use crate::core::{DevelopmentCard, Noble};
use crate::ruleset::Ruleset;
use crate::{Result, SplendorError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One tier of the shop
///
/// Invariant: after any take, every slot is occupied unless the restock pile is
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopTier {
    /// Tier numeral (1-based)
    pub tier: u8,

    /// Face-down cards, drawn from the end
    restock_pile: Vec<DevelopmentCard>,

    /// Face-up slots, fixed width for the whole game
    slots: Vec<Option<DevelopmentCard>>,
}

impl ShopTier {
    /// Create a tier and fill its `width` slots from the end of `restock_pile`
    pub fn new(tier: u8, mut restock_pile: Vec<DevelopmentCard>, width: usize) -> Self {
        let slots = (0..width).map(|_| restock_pile.pop()).collect();
        ShopTier {
            tier,
            restock_pile,
            slots,
        }
    }

    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<DevelopmentCard>] {
        &self.slots
    }

    /// The card in slot `index`, if any
    pub fn slot(&self, index: usize) -> Result<Option<&DevelopmentCard>> {
        self.slots
            .get(index)
            .map(Option::as_ref)
            .ok_or(SplendorError::SlotOutOfRange {
                index,
                width: self.slots.len(),
            })
    }

    pub fn pile_len(&self) -> usize {
        self.restock_pile.len()
    }

    /// The card the next take or blind draw would reveal
    pub fn peek_replacement(&self) -> Option<&DevelopmentCard> {
        self.restock_pile.last()
    }

    /// Remove the card in slot `index` and refill the slot from the pile
    ///
    /// The slot is refilled whether or not it held a card; it is left empty
    /// only when the pile is exhausted.
    pub fn take_and_replace(&mut self, index: usize) -> Result<Option<DevelopmentCard>> {
        let width = self.slots.len();
        let replacement = self.restock_pile.pop();
        match self.slots.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, replacement)),
            None => {
                // Out of range: put the replacement back untouched
                if let Some(card) = replacement {
                    self.restock_pile.push(card);
                }
                Err(SplendorError::SlotOutOfRange { index, width })
            }
        }
    }

    /// Take the top card of the restock pile without revealing it in a slot
    pub fn draw_from_pile(&mut self) -> Option<DevelopmentCard> {
        self.restock_pile.pop()
    }

    /// Put `card` back into slot `index`, returning the slot's previous occupant
    pub(crate) fn restore_slot(
        &mut self,
        index: usize,
        card: Option<DevelopmentCard>,
    ) -> Result<Option<DevelopmentCard>> {
        let width = self.slots.len();
        self.slots
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, card))
            .ok_or(SplendorError::SlotOutOfRange { index, width })
    }

    /// Push `card` back on top of the restock pile
    pub(crate) fn return_to_pile(&mut self, card: DevelopmentCard) {
        self.restock_pile.push(card);
    }
}

/// All shop tiers plus the revealed nobles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    tiers: Vec<ShopTier>,

    /// Nobles on display (visits are not resolved by the engine)
    pub nobles: Vec<Noble>,
}

impl Shop {
    /// Shuffle each pool independently and lay out the shop
    pub fn from_pools<R: Rng + ?Sized>(
        ruleset: &Ruleset,
        mut pools: Vec<Vec<DevelopmentCard>>,
        mut nobles: Vec<Noble>,
        rng: &mut R,
    ) -> Result<Self> {
        for pool in pools.iter_mut() {
            pool.shuffle(rng);
        }
        nobles.shuffle(rng);
        Self::from_ordered_pools(ruleset, pools, nobles)
    }

    /// Lay out the shop from pools in their given order (the last card of each
    /// pool is drawn first)
    pub fn from_ordered_pools(
        ruleset: &Ruleset,
        pools: Vec<Vec<DevelopmentCard>>,
        mut nobles: Vec<Noble>,
    ) -> Result<Self> {
        if pools.len() != ruleset.shop_tier_count {
            return Err(SplendorError::InvalidShopTierCount {
                expected: ruleset.shop_tier_count,
                found: pools.len(),
            });
        }

        let tiers = pools
            .into_iter()
            .zip(1u8..)
            .map(|(pool, tier)| ShopTier::new(tier, pool, ruleset.shop_tier_cards_count))
            .collect();
        nobles.truncate(ruleset.noble_count);

        Ok(Shop { tiers, nobles })
    }

    /// Shuffle the ruleset's own card and noble pools into a fresh shop
    pub fn from_ruleset<R: Rng + ?Sized>(ruleset: &Ruleset, rng: &mut R) -> Result<Self> {
        Self::from_pools(ruleset, ruleset.tier_pools.clone(), ruleset.nobles.clone(), rng)
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn tiers(&self) -> &[ShopTier] {
        &self.tiers
    }

    /// Tier by 1-based numeral
    pub fn tier(&self, tier: usize) -> Result<&ShopTier> {
        let count = self.tiers.len();
        tier.checked_sub(1)
            .and_then(|index| self.tiers.get(index))
            .ok_or(SplendorError::TierOutOfRange { tier, count })
    }

    /// Mutable tier by 1-based numeral
    pub fn tier_mut(&mut self, tier: usize) -> Result<&mut ShopTier> {
        let count = self.tiers.len();
        tier.checked_sub(1)
            .and_then(|index| self.tiers.get_mut(index))
            .ok_or(SplendorError::TierOutOfRange { tier, count })
    }

    /// Every face-up card with its `(tier, column)` position
    pub fn visible_cards(&self) -> impl Iterator<Item = (usize, usize, &DevelopmentCard)> {
        self.tiers.iter().enumerate().flat_map(|(index, tier)| {
            tier.slots
                .iter()
                .enumerate()
                .filter_map(move |(column, slot)| slot.as_ref().map(|card| (index + 1, column, card)))
        })
    }

    /// Total cards left in the shop, visible and face-down
    pub fn card_count(&self) -> usize {
        self.tiers
            .iter()
            .map(|tier| tier.pile_len() + tier.slots.iter().flatten().count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, Gem, GemPool};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn cards(ids: std::ops::Range<u16>) -> Vec<DevelopmentCard> {
        ids.map(|id| DevelopmentCard::new(CardId::new(id), Gem::Ruby, 0, GemPool::new(), 1))
            .collect()
    }

    #[test]
    fn test_tier_fills_slots_from_pile_end() {
        let tier = ShopTier::new(1, cards(0..6), 4);
        let ids: Vec<u16> = tier
            .slots()
            .iter()
            .map(|slot| slot.unwrap().id.as_u16())
            .collect();
        assert_eq!(ids, vec![5, 4, 3, 2]);
        assert_eq!(tier.pile_len(), 2);
        assert_eq!(tier.peek_replacement().unwrap().id, CardId::new(1));
    }

    #[test]
    fn test_take_and_replace() {
        let mut tier = ShopTier::new(1, cards(0..5), 4);

        let taken = tier.take_and_replace(2).unwrap().unwrap();
        assert_eq!(taken.id, CardId::new(2));
        assert_eq!(tier.slot(2).unwrap().unwrap().id, CardId::new(0));
        assert_eq!(tier.pile_len(), 0);

        // Pile exhausted: the slot is left empty
        let taken = tier.take_and_replace(0).unwrap();
        assert_eq!(taken.unwrap().id, CardId::new(4));
        assert!(tier.slot(0).unwrap().is_none());

        // Taking from an emptied slot returns nothing
        assert!(tier.take_and_replace(0).unwrap().is_none());
    }

    #[test]
    fn test_take_and_replace_out_of_range() {
        let mut tier = ShopTier::new(1, cards(0..6), 4);
        assert!(matches!(
            tier.take_and_replace(4),
            Err(SplendorError::SlotOutOfRange { index: 4, width: 4 })
        ));
        // The pile was not disturbed
        assert_eq!(tier.pile_len(), 2);
    }

    #[test]
    fn test_tier_lookup_is_one_based() {
        let ruleset = Ruleset::classic(2).unwrap();
        let shop = Shop::from_ordered_pools(&ruleset, ruleset.tier_pools.clone(), Vec::new()).unwrap();

        assert_eq!(shop.tier(1).unwrap().tier, 1);
        assert_eq!(shop.tier(3).unwrap().tier, 3);
        assert!(matches!(
            shop.tier(0),
            Err(SplendorError::TierOutOfRange { tier: 0, count: 3 })
        ));
        assert!(matches!(
            shop.tier(4),
            Err(SplendorError::TierOutOfRange { tier: 4, count: 3 })
        ));
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let ruleset = Ruleset::classic(3).unwrap();
        let a = Shop::from_ruleset(&ruleset, &mut ChaCha12Rng::seed_from_u64(7)).unwrap();
        let b = Shop::from_ruleset(&ruleset, &mut ChaCha12Rng::seed_from_u64(7)).unwrap();
        let c = Shop::from_ruleset(&ruleset, &mut ChaCha12Rng::seed_from_u64(8)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.nobles.len(), 4);
        assert_eq!(a.visible_cards().count(), 12);
        assert_eq!(a.card_count(), 90);
    }

    #[test]
    fn test_pool_count_must_match_tiers() {
        let ruleset = Ruleset::classic(2).unwrap();
        let result = Shop::from_ordered_pools(&ruleset, vec![cards(0..10)], Vec::new());
        assert!(matches!(
            result,
            Err(SplendorError::InvalidShopTierCount { .. })
        ));
    }
}
