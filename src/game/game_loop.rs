//! Game loop: one controller per seat, turn after turn

use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::{GameState, VerbosityLevel};
use crate::{Result, SplendorError};

/// Result of running a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Winner of the game (None unless the game finished)
    pub winner: Option<PlayerId>,
    /// Turns played by this loop
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// A player reached the prestige target and the round completed
    PrestigeReached,
    /// The player to move had no legal action, or its controller gave up
    Stalled,
    /// Game reached the maximum turn limit
    TurnLimit,
    /// `run_turns` used up its budget while the game was still running
    Manual,
}

/// Game loop manager
pub struct GameLoop<'a> {
    pub game: &'a mut GameState,
    /// Maximum turns before the loop gives up
    max_turns: u32,
    /// Turn counter for the loop
    turns_elapsed: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            max_turns: 1000,
            turns_elapsed: 0,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Run until the game ends
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        self.check_controllers(controllers)?;
        loop {
            if let Some(result) = self.run_turn_once(controllers)? {
                self.notify_game_end(controllers, result.winner);
                return Ok(result);
            }
        }
    }

    /// Run at most `turns_to_run` turns, stopping early if the game ends
    pub fn run_turns(
        &mut self,
        controllers: &mut [Box<dyn PlayerController>],
        turns_to_run: u32,
    ) -> Result<GameResult> {
        self.check_controllers(controllers)?;
        for _ in 0..turns_to_run {
            if let Some(result) = self.run_turn_once(controllers)? {
                return Ok(result);
            }
        }
        Ok(GameResult {
            winner: None,
            turns_played: self.turns_elapsed,
            end_reason: GameEndReason::Manual,
        })
    }

    fn check_controllers(&self, controllers: &[Box<dyn PlayerController>]) -> Result<()> {
        let players = self.game.player_count();
        let seats_match = controllers
            .iter()
            .zip(&self.game.players)
            .all(|(controller, player)| controller.player_id() == player.id);
        if controllers.len() != players || !seats_match {
            return Err(SplendorError::ControllerMismatch {
                controllers: controllers.len(),
                players,
            });
        }
        Ok(())
    }

    /// Run one turn
    ///
    /// Returns `Ok(Some(result))` once the game should end.
    pub fn run_turn_once(
        &mut self,
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<Option<GameResult>> {
        if self.game.is_finished() {
            return Ok(Some(self.result(GameEndReason::PrestigeReached)));
        }
        if self.turns_elapsed >= self.max_turns {
            #[cfg(feature = "verbose-logging")]
            self.game.logger.outcome(
                self.game.turn_number(),
                &format!("Turn limit of {} reached", self.max_turns),
            );
            return Ok(Some(self.result(GameEndReason::TurnLimit)));
        }

        let available = self.game.legal_actions();
        let seat = self.game.current_player_index();
        let player_id = self.game.current_player_id();
        let controller = controllers
            .get_mut(seat)
            .ok_or(SplendorError::UnknownPlayer(seat))?;

        let choice = {
            let view = GameStateView::new(self.game, player_id);
            controller.choose_action(&view, &available)
        };
        let Some(action) = choice else {
            #[cfg(feature = "verbose-logging")]
            self.game.logger.outcome(
                self.game.turn_number(),
                &format!("{} has no move", player_id),
            );
            return Ok(Some(self.result(GameEndReason::Stalled)));
        };

        self.game.perform_turn(action)?;
        self.turns_elapsed += 1;

        if self.game.is_finished() {
            return Ok(Some(self.result(GameEndReason::PrestigeReached)));
        }
        Ok(None)
    }

    fn result(&self, end_reason: GameEndReason) -> GameResult {
        GameResult {
            winner: self.game.winner(),
            turns_played: self.turns_elapsed,
            end_reason,
        }
    }

    fn notify_game_end(
        &self,
        controllers: &mut [Box<dyn PlayerController>],
        winner: Option<PlayerId>,
    ) {
        for controller in controllers.iter_mut() {
            let player_id = controller.player_id();
            controller.on_game_end(
                &GameStateView::new(self.game, player_id),
                winner == Some(player_id),
            );
        }
    }
}
