//! Player controller trait and game state view
//!
//! The game loop asks a controller for each turn. The controller inspects a
//! read-only view of the game and picks one of the legal actions.

use crate::core::{DevelopmentCard, Noble, Player, PlayerId, TokenPool};
use crate::game::{GameState, PlayerAction};
use std::fmt;

/// Read-only view of game state
///
/// Returned by `GameState::perform_turn` and handed to controllers. It cannot
/// mutate the game.
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    /// Create a view of the game from a player's perspective
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    /// The player this view is for
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Seat whose turn it is
    pub fn current_player(&self) -> &'a Player {
        self.game.current_player()
    }

    pub fn players(&self) -> &'a [Player] {
        &self.game.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&'a Player> {
        self.game.players.get(id.index())
    }

    /// The viewing player's own holdings
    pub fn me(&self) -> Option<&'a Player> {
        self.player(self.player_id)
    }

    pub fn bank(&self) -> &'a TokenPool {
        &self.game.bank
    }

    /// Face-up slots of a 1-based tier; empty for an unknown tier
    pub fn shop_slots(&self, tier: usize) -> &'a [Option<DevelopmentCard>] {
        self.game
            .shop
            .tier(tier)
            .map(|shop_tier| shop_tier.slots())
            .unwrap_or(&[])
    }

    pub fn nobles(&self) -> &'a [Noble] {
        &self.game.shop.nobles
    }

    pub fn turn_number(&self) -> u32 {
        self.game.turn_number()
    }

    pub fn is_finished(&self) -> bool {
        self.game.is_finished()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.game.winner()
    }
}

/// Table dump for the console
impl fmt::Display for GameStateView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {} | bank {}", self.turn_number(), self.bank())?;
        for shop_tier in self.game.shop.tiers().iter().rev() {
            write!(f, "  Tier {} ({} in pile):", shop_tier.tier, shop_tier.pile_len())?;
            for (column, slot) in shop_tier.slots().iter().enumerate() {
                match slot {
                    Some(card) => write!(f, "\n    [{}] {}", column, card)?,
                    None => write!(f, "\n    [{}] (empty)", column)?,
                }
            }
            writeln!(f)?;
        }
        for noble in self.nobles() {
            writeln!(f, "  {}", noble)?;
        }
        for player in self.players() {
            let marker = if player.id == self.current_player().id {
                ">"
            } else {
                " "
            };
            writeln!(f, "{} {}", marker, player)?;
            for (index, card) in player.reserved.iter().enumerate() {
                writeln!(f, "      reserved [{}] {}", index, card)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for GameStateView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStateView")
            .field("player_id", &self.player_id)
            .field("turn", &self.turn_number())
            .field("current_player", &self.current_player().id)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players or connect to a UI.
pub trait PlayerController {
    /// The seat this controller plays
    fn player_id(&self) -> PlayerId;

    /// Choose one of `available_actions`, or `None` to give up the game
    fn choose_action(
        &mut self,
        view: &GameStateView,
        available_actions: &[PlayerAction],
    ) -> Option<PlayerAction>;

    /// Called when the game ends
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
