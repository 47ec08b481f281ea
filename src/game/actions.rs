//! Player actions and their planners
//!
//! A planner validates one `PlayerAction` against an immutable game state and
//! returns the `Transaction` that would carry it out. Nothing is mutated until
//! every check has passed; `GameState::commit` applies the result.

use crate::core::{Gem, GemPool, Player, Token, TokenPool};
use crate::error::{PurchaseViolation, ReservationViolation, SelectionViolation};
use crate::game::GameState;
use crate::undo::GameAction;
use crate::{Result, SplendorError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Ordered atomic mutations for one turn
pub type Transaction = SmallVec<[GameAction; 4]>;

/// Where a card to buy is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardRef {
    /// Face-up shop card, 1-based tier and 0-based column
    Shop { tier: usize, column: usize },
    /// Index into the buyer's reserved cards
    Reserved { index: usize },
}

/// One complete turn a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Take tokens from the bank, returning `discard` to stay within the limit
    SelectTokens { take: TokenPool, discard: TokenPool },

    /// Reserve a face-up card; `discard` makes room for the gold grant
    ReserveCard {
        tier: usize,
        column: usize,
        discard: TokenPool,
    },

    /// Reserve the top card of a tier's restock pile without looking
    ReserveFromPile { tier: usize, discard: TokenPool },

    BuyCard(CardRef),
}

impl PlayerAction {
    /// A selection with nothing to discard
    pub fn take(take: TokenPool) -> Self {
        PlayerAction::SelectTokens {
            take,
            discard: TokenPool::new(),
        }
    }

    /// Take one token of each listed gem
    pub fn take_gems(gems: &[Gem]) -> Self {
        let tokens: Vec<Token> = gems.iter().copied().map(Token::from).collect();
        Self::take(TokenPool::from_tokens(&tokens))
    }

    pub fn reserve(tier: usize, column: usize) -> Self {
        PlayerAction::ReserveCard {
            tier,
            column,
            discard: TokenPool::new(),
        }
    }

    pub fn reserve_from_pile(tier: usize) -> Self {
        PlayerAction::ReserveFromPile {
            tier,
            discard: TokenPool::new(),
        }
    }

    /// The same action with `discard` returned to the bank
    pub fn with_discard(self, discard: TokenPool) -> Self {
        match self {
            PlayerAction::SelectTokens { take, .. } => PlayerAction::SelectTokens { take, discard },
            PlayerAction::ReserveCard { tier, column, .. } => PlayerAction::ReserveCard {
                tier,
                column,
                discard,
            },
            PlayerAction::ReserveFromPile { tier, .. } => {
                PlayerAction::ReserveFromPile { tier, discard }
            }
            buy @ PlayerAction::BuyCard(_) => buy,
        }
    }

    /// Tokens handed back to the bank as part of this action
    pub fn discard(&self) -> TokenPool {
        match self {
            PlayerAction::SelectTokens { discard, .. }
            | PlayerAction::ReserveCard { discard, .. }
            | PlayerAction::ReserveFromPile { discard, .. } => *discard,
            PlayerAction::BuyCard(_) => TokenPool::new(),
        }
    }

    pub fn buy_from_shop(tier: usize, column: usize) -> Self {
        PlayerAction::BuyCard(CardRef::Shop { tier, column })
    }

    pub fn buy_reserved(index: usize) -> Self {
        PlayerAction::BuyCard(CardRef::Reserved { index })
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::SelectTokens { take, .. } => write!(f, "takes {}", take)?,
            PlayerAction::ReserveCard { tier, column, .. } => {
                write!(f, "reserves tier {} column {}", tier, column)?
            }
            PlayerAction::ReserveFromPile { tier, .. } => {
                write!(f, "reserves from the tier {} pile", tier)?
            }
            PlayerAction::BuyCard(CardRef::Shop { tier, column }) => {
                write!(f, "buys tier {} column {}", tier, column)?
            }
            PlayerAction::BuyCard(CardRef::Reserved { index }) => {
                write!(f, "buys reserved card {}", index)?
            }
        }
        let discard = self.discard();
        if !discard.is_zero() {
            write!(f, ", discards {}", discard)?;
        }
        Ok(())
    }
}

/// Validate `action` for the current player and plan its mutations
pub fn plan_action(game: &GameState, action: &PlayerAction) -> Result<Transaction> {
    if game.is_finished() {
        return Err(SplendorError::GameOver);
    }
    let player = game.current_player();
    match action {
        PlayerAction::SelectTokens { take, discard } => {
            plan_select_tokens(game, player, take, discard)
        }
        PlayerAction::ReserveCard {
            tier,
            column,
            discard,
        } => plan_reserve_card(game, player, *tier, *column, discard),
        PlayerAction::ReserveFromPile { tier, discard } => {
            plan_reserve_from_pile(game, player, *tier, discard)
        }
        PlayerAction::BuyCard(card_ref) => plan_buy_card(game, player, *card_ref),
    }
}

fn illegal_selection<T>(violation: SelectionViolation) -> Result<T> {
    Err(SplendorError::IllegalTokenSelection(violation))
}

fn plan_select_tokens(
    game: &GameState,
    player: &Player,
    take: &TokenPool,
    discard: &TokenPool,
) -> Result<Transaction> {
    let rules = &game.ruleset;
    let bank = &game.bank;

    if !take.is_nonnegative() {
        return illegal_selection(SelectionViolation::NegativeCount);
    }
    let total = take.total();
    if total == 0 {
        return illegal_selection(SelectionViolation::Empty);
    }
    if take.gold != 0 {
        return illegal_selection(SelectionViolation::GoldNotSelectable);
    }
    if total > rules.max_tokens_per_selection {
        return illegal_selection(SelectionViolation::TooMany);
    }
    if let Some((kind, _)) = take.kinds().find(|(_, count)| *count > 1) {
        if total != 2 {
            return illegal_selection(SelectionViolation::DoubleWithOthers);
        }
        if bank[kind] < rules.min_pile_for_double {
            return illegal_selection(SelectionViolation::PileTooSmallForDouble);
        }
    }
    if total == 3 && take.kinds().any(|(_, count)| count > 1) {
        return illegal_selection(SelectionViolation::NotDistinct);
    }
    if !(*bank - *take).is_nonnegative() {
        return illegal_selection(SelectionViolation::PileExhausted);
    }

    settle_discard(
        game,
        player,
        take,
        discard,
        SplendorError::IllegalTokenSelection(SelectionViolation::InvalidDiscard),
    )?;

    let mut transaction = Transaction::new();
    transaction.push(GameAction::TransferTokens {
        player: player.id,
        amount: *take,
    });
    transaction.extend(discard_transfer(player, discard));
    Ok(transaction)
}

/// Check the token limit after `player` gains `gained` and returns `discard`
///
/// A discard that is negative, not held, or not needed fails with `invalid`.
fn settle_discard(
    game: &GameState,
    player: &Player,
    gained: &TokenPool,
    discard: &TokenPool,
    invalid: SplendorError,
) -> Result<()> {
    let limit = game.ruleset.max_player_tokens;
    let after = player.tokens + *gained - *discard;
    if !discard.is_nonnegative() || !after.is_nonnegative() {
        return Err(invalid);
    }
    if after.total() > limit {
        return Err(SplendorError::OverPlayerTokenLimit {
            total: after.total(),
            limit,
        });
    }
    if !discard.is_zero() && after.total() != limit {
        return Err(invalid);
    }
    Ok(())
}

fn discard_transfer(player: &Player, discard: &TokenPool) -> Option<GameAction> {
    (!discard.is_zero()).then(|| GameAction::TransferTokens {
        player: player.id,
        amount: -*discard,
    })
}

fn check_reservation_limit(game: &GameState, player: &Player) -> Result<()> {
    let limit = game.ruleset.max_player_reserved_cards;
    if player.reserved.len() >= limit {
        return Err(SplendorError::IllegalCardReservation(
            ReservationViolation::LimitExceeded { limit },
        ));
    }
    Ok(())
}

/// One gold if the bank has any
fn gold_grant(game: &GameState) -> TokenPool {
    TokenPool::single(Token::Gold, game.bank.gold.clamp(0, 1))
}

/// Gold grant plus discard, checked against the token limit
fn reservation_tokens(
    game: &GameState,
    player: &Player,
    discard: &TokenPool,
) -> Result<SmallVec<[GameAction; 2]>> {
    let grant = gold_grant(game);
    settle_discard(
        game,
        player,
        &grant,
        discard,
        SplendorError::IllegalCardReservation(ReservationViolation::InvalidDiscard),
    )?;

    let mut transfers = SmallVec::new();
    if !grant.is_zero() {
        transfers.push(GameAction::TransferTokens {
            player: player.id,
            amount: grant,
        });
    }
    transfers.extend(discard_transfer(player, discard));
    Ok(transfers)
}

fn plan_reserve_card(
    game: &GameState,
    player: &Player,
    tier: usize,
    column: usize,
    discard: &TokenPool,
) -> Result<Transaction> {
    check_reservation_limit(game, player)?;
    let shop_tier = game.shop.tier(tier).map_err(|_| {
        SplendorError::IllegalCardReservation(ReservationViolation::TierOutOfRange { tier })
    })?;
    let card = *shop_tier
        .slot(column)?
        .ok_or(SplendorError::IllegalCardReservation(ReservationViolation::EmptySlot))?;
    let tokens = reservation_tokens(game, player, discard)?;

    let mut transaction = Transaction::new();
    transaction.push(GameAction::TakeShopCard {
        tier,
        column,
        card,
        replacement: shop_tier.peek_replacement().copied(),
    });
    transaction.push(GameAction::ReserveCard {
        player: player.id,
        card,
    });
    transaction.extend(tokens);
    Ok(transaction)
}

fn plan_reserve_from_pile(
    game: &GameState,
    player: &Player,
    tier: usize,
    discard: &TokenPool,
) -> Result<Transaction> {
    check_reservation_limit(game, player)?;
    let shop_tier = game.shop.tier(tier).map_err(|_| {
        SplendorError::IllegalCardReservation(ReservationViolation::TierOutOfRange { tier })
    })?;
    let card = *shop_tier
        .peek_replacement()
        .ok_or(SplendorError::IllegalCardReservation(ReservationViolation::EmptyPile))?;
    let tokens = reservation_tokens(game, player, discard)?;

    let mut transaction = Transaction::new();
    transaction.push(GameAction::DrawPileCard { tier, card });
    transaction.push(GameAction::ReserveCard {
        player: player.id,
        card,
    });
    transaction.extend(tokens);
    Ok(transaction)
}

fn plan_buy_card(game: &GameState, player: &Player, card_ref: CardRef) -> Result<Transaction> {
    let (card, removal) = match card_ref {
        CardRef::Shop { tier, column } => {
            let shop_tier = game.shop.tier(tier).map_err(|_| {
                SplendorError::IllegalCardPurchase(PurchaseViolation::TierOutOfRange { tier })
            })?;
            let card = *shop_tier
                .slot(column)?
                .ok_or(SplendorError::IllegalCardPurchase(PurchaseViolation::EmptySlot))?;
            let removal = GameAction::TakeShopCard {
                tier,
                column,
                card,
                replacement: shop_tier.peek_replacement().copied(),
            };
            (card, removal)
        }
        CardRef::Reserved { index } => {
            let card = *player.reserved.get(index).ok_or(SplendorError::IllegalCardPurchase(
                PurchaseViolation::NoSuchReservedCard { index },
            ))?;
            let removal = GameAction::ReleaseReservedCard {
                player: player.id,
                index,
                card,
            };
            (card, removal)
        }
    };

    let payment = payment_for(player, &card.cost)?;

    let mut transaction = Transaction::new();
    if !payment.is_zero() {
        transaction.push(GameAction::TransferTokens {
            player: player.id,
            amount: -payment,
        });
    }
    transaction.push(removal);
    transaction.push(GameAction::GainCard {
        player: player.id,
        card,
    });
    Ok(transaction)
}

/// Tokens `player` would hand over for a card costing `cost`
///
/// Card production discounts each gem first; the rest is paid in that gem's
/// tokens, and gold covers whatever is left.
pub fn payment_for(player: &Player, cost: &GemPool) -> Result<TokenPool> {
    let production = player.production();
    let mut payment = TokenPool::new();
    let mut shortfall = 0;

    for (gem, price) in cost.kinds() {
        let need = (price - production[gem]).max(0);
        let held = player.tokens[Token::from(gem)].max(0);
        let paid = need.min(held);
        payment[Token::from(gem)] = paid;
        shortfall += need - paid;
    }

    let gold = player.tokens.gold.max(0);
    if shortfall > gold {
        return Err(SplendorError::InsufficientFunds {
            shortfall: shortfall - gold,
        });
    }
    payment.gold = shortfall;
    Ok(payment)
}

/// Discards that make room for a reservation's gold grant
///
/// Just the empty discard when none is needed; otherwise one option per kind
/// the player could hand back, the granted gold included.
fn reservation_discards(game: &GameState, player: &Player) -> Vec<TokenPool> {
    let after = player.tokens + gold_grant(game);
    let excess = after.total() - game.ruleset.max_player_tokens;
    if excess <= 0 {
        return vec![TokenPool::new()];
    }
    after
        .kinds()
        .filter(|(_, held)| *held >= excess)
        .map(|(kind, _)| TokenPool::single(kind, excess))
        .collect()
}

/// Every action the current player could take right now
///
/// Selections are enumerated without discards; reservations include the
/// single-kind discards a gold grant may need.
pub fn legal_actions(game: &GameState) -> Vec<PlayerAction> {
    if game.is_finished() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    let discards = reservation_discards(game, game.current_player());

    for (i, first) in Gem::ALL.iter().enumerate() {
        candidates.push(PlayerAction::take_gems(&[*first]));
        candidates.push(PlayerAction::take(TokenPool::single(Token::from(*first), 2)));
        for (j, second) in Gem::ALL.iter().enumerate().skip(i + 1) {
            candidates.push(PlayerAction::take_gems(&[*first, *second]));
            for third in Gem::ALL.iter().skip(j + 1) {
                candidates.push(PlayerAction::take_gems(&[*first, *second, *third]));
            }
        }
    }

    for shop_tier in game.shop.tiers() {
        let tier = usize::from(shop_tier.tier);
        for (column, slot) in shop_tier.slots().iter().enumerate() {
            if slot.is_some() {
                candidates.extend(
                    discards
                        .iter()
                        .map(|discard| PlayerAction::reserve(tier, column).with_discard(*discard)),
                );
                candidates.push(PlayerAction::buy_from_shop(tier, column));
            }
        }
        if shop_tier.pile_len() > 0 {
            candidates.extend(
                discards
                    .iter()
                    .map(|discard| PlayerAction::reserve_from_pile(tier).with_discard(*discard)),
            );
        }
    }

    for index in 0..game.current_player().reserved.len() {
        candidates.push(PlayerAction::buy_reserved(index));
    }

    candidates
        .into_iter()
        .filter(|action| plan_action(game, action).is_ok())
        .collect()
}
