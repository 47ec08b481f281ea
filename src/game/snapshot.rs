//! Game snapshots for stop-and-resume play
//!
//! Snapshots are taken between turns, so the saved state is always a clean
//! turn boundary. The undo log travels with the state: a resumed game can
//! still undo turns played before the save.

use crate::game::state::GameState;
use crate::{Result, SplendorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// The complete game state (logger settings excepted)
    pub game_state: GameState,

    /// Turn number when this snapshot was created
    pub saved_turn: u32,
}

impl GameSnapshot {
    pub fn new(game_state: GameState) -> Self {
        let saved_turn = game_state.turn_number();
        GameSnapshot {
            game_state,
            saved_turn,
        }
    }

    /// Snapshot a running game without consuming it
    pub fn capture(game: &GameState) -> Self {
        Self::new(game.clone())
    }

    /// Save this snapshot to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SplendorError::SerializationError(e.to_string()))?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load a snapshot from a JSON file
    ///
    /// The file is rejected unless its ruleset validates and its state is one
    /// a real game could reach: seats match the ruleset, the turn pointer is
    /// in range and every pile is within its limits.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let snapshot: GameSnapshot = serde_json::from_str(&json)
            .map_err(|e| SplendorError::SerializationError(e.to_string()))?;

        if snapshot.saved_turn != snapshot.game_state.turn_number() {
            return Err(SplendorError::SerializationError(format!(
                "snapshot says turn {} but its state is at turn {}",
                snapshot.saved_turn,
                snapshot.game_state.turn_number()
            )));
        }
        snapshot.game_state.ruleset.validate()?;
        snapshot.game_state.check_consistency()?;
        Ok(snapshot)
    }

    /// Take the game back out of the snapshot
    pub fn resume(self) -> GameState {
        self.game_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Gem;
    use crate::game::PlayerAction;
    use crate::ruleset::Ruleset;

    #[test]
    fn test_snapshot_records_turn() {
        let mut game = GameState::from_ruleset_seeded(Ruleset::classic(2).unwrap(), 11).unwrap();
        game.perform_turn(PlayerAction::take_gems(&[Gem::Diamond, Gem::Emerald]))
            .unwrap();

        let snapshot = GameSnapshot::capture(&game);
        assert_eq!(snapshot.saved_turn, 1);
        assert_eq!(snapshot.game_state.players[0].tokens.diamond, 1);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let game = GameState::from_ruleset_seeded(Ruleset::classic(3).unwrap(), 11).unwrap();
        let snapshot = GameSnapshot::new(game);

        let json = serde_json::to_string(&snapshot).unwrap();
        let loaded: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.game_state.shop, snapshot.game_state.shop);
        assert_eq!(loaded.game_state.seed(), Some(11));
    }

    #[test]
    fn test_load_rejects_out_of_range_turn_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pointer.json");
        let game = GameState::from_ruleset_seeded(Ruleset::classic(2).unwrap(), 11).unwrap();
        GameSnapshot::new(game).save_to_file(&path).unwrap();
        assert!(GameSnapshot::load_from_file(&path).is_ok());

        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["game_state"]["current_player"] = 5.into();
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(
            GameSnapshot::load_from_file(&path),
            Err(SplendorError::SerializationError(_))
        ));
    }
}
