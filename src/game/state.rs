//! Main game state structure and the turn engine

use crate::core::{Player, PlayerId, Token, TokenPool};
use crate::game::actions::{self, PlayerAction, Transaction};
use crate::game::{GameLogger, GameStateView};
use crate::error::PurchaseViolation;
use crate::ruleset::Ruleset;
use crate::shop::Shop;
use crate::undo::{GameAction, UndoLog};
use crate::{Result, SplendorError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Complete game state
///
/// Tokens are conserved: for every kind, bank plus all players always equals
/// the initial bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Resolved rules for this game, read-only after construction
    pub ruleset: Ruleset,

    /// Players in seat order
    pub players: Vec<Player>,

    pub shop: Shop,

    /// Community token pool
    pub bank: TokenPool,

    /// Seat whose turn it is
    current_player: usize,

    /// Turns committed so far
    turn_number: u32,

    /// Seed the shop was shuffled with, when known
    seed: Option<u64>,

    /// Undo log for committed turns
    pub undo_log: UndoLog,

    #[serde(skip)]
    pub logger: GameLogger,
}

impl GameState {
    /// Start a game with a caller-built shop
    pub fn new(ruleset: Ruleset, shop: Shop) -> Result<Self> {
        ruleset.validate()?;
        if shop.tier_count() != ruleset.shop_tier_count {
            return Err(SplendorError::InvalidShopTierCount {
                expected: ruleset.shop_tier_count,
                found: shop.tier_count(),
            });
        }

        let players = (0..ruleset.player_count)
            .map(|seat| {
                let seat = u8::try_from(seat).map_err(|_| {
                    SplendorError::InvalidRuleset(format!("{} seats is too many", ruleset.player_count))
                })?;
                Ok(Player::new(PlayerId::new(seat), format!("Player {}", seat + 1)))
            })
            .collect::<Result<Vec<_>>>()?;
        let bank = Self::initial_bank(&ruleset);

        Ok(GameState {
            ruleset,
            players,
            shop,
            bank,
            current_player: 0,
            turn_number: 0,
            seed: None,
            undo_log: UndoLog::new(),
            logger: GameLogger::new(),
        })
    }

    /// Start a game with a shop shuffled from OS entropy
    pub fn from_ruleset(ruleset: Ruleset) -> Result<Self> {
        Self::from_ruleset_seeded(ruleset, rand::random())
    }

    /// Start a game whose shop layout is fixed by `seed`
    pub fn from_ruleset_seeded(ruleset: Ruleset, seed: u64) -> Result<Self> {
        ruleset.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let shop = Shop::from_ruleset(&ruleset, &mut rng)?;
        let mut game = Self::new(ruleset, shop)?;
        game.seed = Some(seed);
        Ok(game)
    }

    /// Bank contents at game start
    pub fn initial_bank(ruleset: &Ruleset) -> TokenPool {
        let mut bank = TokenPool::single(Token::Gold, ruleset.community_gold_count);
        for kind in Token::ALL.into_iter().filter(|kind| kind.as_gem().is_some()) {
            bank[kind] = ruleset.community_gems_count;
        }
        bank
    }

    /// Check a state that did not come from `new`, such as a loaded snapshot
    pub fn check_consistency(&self) -> Result<()> {
        let corrupt = |msg: String| Err(SplendorError::SerializationError(msg));
        let rules = &self.ruleset;

        if self.players.len() != rules.player_count {
            return corrupt(format!(
                "{} players seated for a {}-player ruleset",
                self.players.len(),
                rules.player_count
            ));
        }
        if self.current_player >= self.players.len() {
            return corrupt(format!(
                "current player {} is not one of {} seats",
                self.current_player,
                self.players.len()
            ));
        }
        if self.shop.tier_count() != rules.shop_tier_count {
            return Err(SplendorError::InvalidShopTierCount {
                expected: rules.shop_tier_count,
                found: self.shop.tier_count(),
            });
        }
        if !self.bank.is_nonnegative() {
            return corrupt(format!("bank holds a negative pile: {}", self.bank));
        }
        for (seat, player) in self.players.iter().enumerate() {
            if player.id.index() != seat {
                return corrupt(format!("{} sits in seat {}", player.id, seat));
            }
            if !player.tokens.is_nonnegative() {
                return corrupt(format!("{} holds a negative pile: {}", player.id, player.tokens));
            }
            if player.token_count() > rules.max_player_tokens {
                return corrupt(format!(
                    "{} holds {} tokens, over the limit of {}",
                    player.id,
                    player.token_count(),
                    rules.max_player_tokens
                ));
            }
            if player.reserved.len() > rules.max_player_reserved_cards {
                return corrupt(format!(
                    "{} has {} reserved cards, over the limit of {}",
                    player.id,
                    player.reserved.len(),
                    rules.max_player_reserved_cards
                ));
            }
        }
        if self.total_tokens() != Self::initial_bank(rules) {
            return corrupt(format!(
                "tokens in play {} do not match the starting bank",
                self.total_tokens()
            ));
        }
        Ok(())
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn current_player_id(&self) -> PlayerId {
        self.players[self.current_player].id
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id.index())
            .ok_or(SplendorError::UnknownPlayer(id.index()))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Stop recording turns (simulation throughput)
    pub fn disable_undo(&mut self) {
        self.undo_log = UndoLog::disabled();
    }

    /// Bank plus every player's holdings
    pub fn total_tokens(&self) -> TokenPool {
        self.players
            .iter()
            .fold(self.bank, |total, player| total + player.tokens)
    }

    /// True once a player has reached the prestige target and the round is complete
    pub fn is_finished(&self) -> bool {
        self.turn_number > 0
            && self.current_player == 0
            && self
                .players
                .iter()
                .any(|player| player.prestige() >= self.ruleset.prestige_to_win)
    }

    /// Highest prestige wins; ties go to fewer owned cards, then the earlier seat
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_finished() {
            return None;
        }
        self.players
            .iter()
            .min_by_key(|player| (Reverse(player.prestige()), player.cards.len(), player.id.index()))
            .map(|player| player.id)
    }

    /// Every action the current player could take right now
    pub fn legal_actions(&self) -> Vec<PlayerAction> {
        actions::legal_actions(self)
    }

    /// Validate and commit one turn for the current player
    ///
    /// On any error the state is unchanged and the same player is still to move.
    pub fn perform_turn(&mut self, action: PlayerAction) -> Result<GameStateView<'_>> {
        #[cfg(feature = "verbose-logging")]
        let (actor, turn) = (self.current_player_id(), self.turn_number + 1);

        let transaction = match actions::plan_action(self, &action) {
            Ok(transaction) => transaction,
            Err(err) => {
                #[cfg(feature = "verbose-logging")]
                self.logger
                    .rejected(turn, &format!("{} cannot {}: {}", actor, action, err));
                return Err(err);
            }
        };
        self.commit(transaction)?;

        #[cfg(feature = "verbose-logging")]
        self.logger.turn(turn, &format!("{} {}", actor, action));

        #[cfg(feature = "verbose-logging")]
        if let Some(winner) = self.winner() {
            self.logger.outcome(
                self.turn_number,
                &format!("Game over after {} turns: {} wins", self.turn_number, winner),
            );
        }

        let viewer = self.current_player_id();
        Ok(GameStateView::new(self, viewer))
    }

    /// Apply a planned turn and pass to the next seat, all or nothing
    fn commit(&mut self, transaction: Transaction) -> Result<()> {
        let from = self.current_player_id();
        let to = self.players[(self.current_player + 1) % self.players.len()].id;

        let mut applied = Vec::with_capacity(transaction.len() + 1);
        for action in transaction
            .into_iter()
            .chain(std::iter::once(GameAction::AdvanceTurn { from, to }))
        {
            if let Err(err) = self.apply(&action) {
                for done in applied.iter().rev() {
                    self.revert(done)?;
                }
                return Err(err);
            }
            applied.push(action);
        }

        self.undo_log.log_turn(applied);
        Ok(())
    }

    /// Revert the most recent committed turn
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo_turn(&mut self) -> Result<bool> {
        let Some(turn) = self.undo_log.pop_turn() else {
            return Ok(false);
        };
        for action in turn.iter().rev() {
            self.revert(action)?;
        }
        #[cfg(feature = "verbose-logging")]
        self.logger
            .undo(self.turn_number + 1, &format!("Undid turn {}", self.turn_number + 1));
        Ok(true)
    }

    fn apply(&mut self, action: &GameAction) -> Result<()> {
        match action {
            GameAction::TransferTokens { player, amount } => {
                seat_mut(&mut self.players, *player)?.tokens += *amount;
                self.bank -= *amount;
            }
            GameAction::TakeShopCard {
                tier, column, card, ..
            } => {
                let taken = self.shop.tier_mut(*tier)?.take_and_replace(*column)?;
                debug_assert_eq!(taken, Some(*card));
            }
            GameAction::DrawPileCard { tier, card } => {
                let drawn = self.shop.tier_mut(*tier)?.draw_from_pile();
                debug_assert_eq!(drawn, Some(*card));
            }
            GameAction::ReserveCard { player, card } => {
                seat_mut(&mut self.players, *player)?.reserved.push(*card);
            }
            GameAction::ReleaseReservedCard {
                player,
                index,
                card,
            } => {
                let reserved = &mut seat_mut(&mut self.players, *player)?.reserved;
                if *index >= reserved.len() {
                    return Err(SplendorError::IllegalCardPurchase(
                        PurchaseViolation::NoSuchReservedCard { index: *index },
                    ));
                }
                let released = reserved.remove(*index);
                debug_assert_eq!(released, *card);
            }
            GameAction::GainCard { player, card } => {
                seat_mut(&mut self.players, *player)?.cards.push(*card);
            }
            GameAction::AdvanceTurn { to, .. } => {
                self.current_player = to.index();
                self.turn_number += 1;
            }
        }
        Ok(())
    }

    fn revert(&mut self, action: &GameAction) -> Result<()> {
        match action {
            GameAction::TransferTokens { player, amount } => {
                seat_mut(&mut self.players, *player)?.tokens -= *amount;
                self.bank += *amount;
            }
            GameAction::TakeShopCard {
                tier, column, card, ..
            } => {
                let shop_tier = self.shop.tier_mut(*tier)?;
                if let Some(replacement) = shop_tier.restore_slot(*column, Some(*card))? {
                    shop_tier.return_to_pile(replacement);
                }
            }
            GameAction::DrawPileCard { tier, card } => {
                self.shop.tier_mut(*tier)?.return_to_pile(*card);
            }
            GameAction::ReserveCard { player, .. } => {
                seat_mut(&mut self.players, *player)?.reserved.pop();
            }
            GameAction::ReleaseReservedCard {
                player,
                index,
                card,
            } => {
                let reserved = &mut seat_mut(&mut self.players, *player)?.reserved;
                let index = (*index).min(reserved.len());
                reserved.insert(index, *card);
            }
            GameAction::GainCard { player, .. } => {
                seat_mut(&mut self.players, *player)?.cards.pop();
            }
            GameAction::AdvanceTurn { from, .. } => {
                self.current_player = from.index();
                self.turn_number = self.turn_number.saturating_sub(1);
            }
        }
        Ok(())
    }
}

fn seat_mut(players: &mut [Player], id: PlayerId) -> Result<&mut Player> {
    players
        .get_mut(id.index())
        .ok_or(SplendorError::UnknownPlayer(id.index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, DevelopmentCard, Gem, GemPool};
    use crate::game::LogCategory;

    fn two_player_game() -> GameState {
        let ruleset = Ruleset::classic(2).unwrap();
        GameState::from_ruleset_seeded(ruleset, 42).unwrap()
    }

    #[test]
    fn test_initial_bank() {
        let game = two_player_game();
        assert_eq!(game.bank.ruby, 4);
        assert_eq!(game.bank.onyx, 4);
        assert_eq!(game.bank.gold, 5);
        assert_eq!(game.total_tokens(), game.bank);
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.seed(), Some(42));
    }

    #[test]
    fn test_turn_pointer_wraps() {
        let mut game = two_player_game();
        game.perform_turn(PlayerAction::take_gems(&[Gem::Ruby])).unwrap();
        assert_eq!(game.current_player_index(), 1);
        game.perform_turn(PlayerAction::take_gems(&[Gem::Onyx])).unwrap();
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_rejected_turn_keeps_pointer() {
        let mut game = two_player_game();
        let result = game.perform_turn(PlayerAction::take(TokenPool::new()));
        assert!(result.is_err());
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.turn_number(), 0);
        assert!(game.undo_log.is_empty());
    }

    #[test]
    fn test_undo_turn_restores_state() {
        let mut game = two_player_game();
        let before = serde_json::to_value(&game).unwrap();

        game.perform_turn(PlayerAction::reserve(1, 0)).unwrap();
        assert_eq!(game.players[0].reserved.len(), 1);
        assert_eq!(game.players[0].tokens.gold, 1);

        assert!(game.undo_turn().unwrap());
        assert_eq!(serde_json::to_value(&game).unwrap(), before);
        assert!(!game.undo_turn().unwrap());
    }

    #[test]
    fn test_failed_apply_rolls_back() {
        let mut game = two_player_game();
        let before = serde_json::to_value(&game).unwrap();

        // A stale transaction: the second step refers to a seat that does not exist
        let mut transaction = Transaction::new();
        transaction.push(GameAction::TransferTokens {
            player: PlayerId::new(0),
            amount: TokenPool::single(Token::Ruby, 1),
        });
        transaction.push(GameAction::TransferTokens {
            player: PlayerId::new(7),
            amount: TokenPool::single(Token::Ruby, 1),
        });

        assert!(matches!(
            game.commit(transaction),
            Err(SplendorError::UnknownPlayer(7))
        ));
        assert_eq!(serde_json::to_value(&game).unwrap(), before);
    }

    #[test]
    fn test_winner_requires_finished_game() {
        let game = two_player_game();
        assert!(!game.is_finished());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_turn_is_logged() {
        let mut game = two_player_game();
        game.logger.enable_capture();
        game.perform_turn(PlayerAction::take_gems(&[Gem::Ruby, Gem::Onyx]))
            .unwrap();
        let _ = game.perform_turn(PlayerAction::buy_reserved(0));

        let logs = game.logger.logs();
        if cfg!(feature = "verbose-logging") {
            assert_eq!(logs.len(), 2);
            assert_eq!(logs[0].message, "Player 1 takes ruby=1 onyx=1");
            assert_eq!(logs[0].turn, 1);
            assert_eq!(logs[1].category, LogCategory::Rejected);
            assert_eq!(logs[1].turn, 2);
        }
    }

    #[test]
    fn test_consistency_check() {
        let mut game = two_player_game();
        game.perform_turn(PlayerAction::reserve(1, 0)).unwrap();
        assert!(game.check_consistency().is_ok());

        let corruptions: [fn(&mut GameState); 5] = [
            |game| game.current_player = 5,
            |game| {
                game.players.pop();
            },
            |game| {
                game.bank.ruby = -1;
                game.players[1].tokens.ruby += 5;
            },
            |game| game.players[0].tokens.gold += 1,
            |game| {
                let card = game.players[0].reserved[0];
                game.players[0].reserved.extend([card; 3]);
            },
        ];
        for corrupt in corruptions {
            let mut broken = game.clone();
            corrupt(&mut broken);
            assert!(matches!(
                broken.check_consistency(),
                Err(SplendorError::SerializationError(_))
            ));
        }
    }

    #[test]
    fn test_game_over_is_logged() {
        let mut game = two_player_game();
        game.players[0].cards.push(DevelopmentCard::new(
            CardId::new(900),
            Gem::Emerald,
            15,
            GemPool::new(),
            3,
        ));
        game.logger.enable_capture();
        game.perform_turn(PlayerAction::take_gems(&[Gem::Ruby])).unwrap();
        game.perform_turn(PlayerAction::take_gems(&[Gem::Onyx])).unwrap();
        assert!(game.is_finished());

        let logs = game.logger.logs();
        let outcomes: Vec<_> = logs
            .iter()
            .filter(|entry| entry.category == LogCategory::Outcome)
            .collect();
        if cfg!(feature = "verbose-logging") {
            assert_eq!(outcomes.len(), 1);
            assert_eq!(outcomes[0].message, "Game over after 2 turns: Player 1 wins");
        } else {
            assert!(outcomes.is_empty());
        }
    }
}
