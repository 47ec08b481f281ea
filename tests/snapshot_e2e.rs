//! Snapshot save/load tests: stop a game, resume it from disk, keep undoing

use splendor_rs::{
    core::{Gem, PlayerId},
    game::{
        GameLoop, GameSnapshot, GameState, PlayerAction, PlayerController, RandomController,
        VerbosityLevel,
    },
    ruleset::Ruleset,
    Result, SplendorError,
};

fn controllers(game: &GameState, seed: u64) -> Vec<Box<dyn PlayerController>> {
    game.players
        .iter()
        .map(|player| {
            Box::new(RandomController::with_seed(
                player.id,
                seed + player.id.index() as u64,
            )) as Box<dyn PlayerController>
        })
        .collect()
}

#[test]
fn test_save_and_resume_matches_uninterrupted_game() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");

    let mut reference = GameState::from_ruleset_seeded(Ruleset::classic(2)?, 77)?;
    let mut interrupted = reference.clone();

    // Uninterrupted: 30 turns in one go
    let mut reference_controllers = controllers(&reference, 5);
    GameLoop::new(&mut reference)
        .with_verbosity(VerbosityLevel::Silent)
        .run_turns(&mut reference_controllers, 30)?;

    // Interrupted: 12 turns, save, load, 18 more with the same controllers
    let mut interrupted_controllers = controllers(&interrupted, 5);
    GameLoop::new(&mut interrupted)
        .with_verbosity(VerbosityLevel::Silent)
        .run_turns(&mut interrupted_controllers, 12)?;
    GameSnapshot::capture(&interrupted).save_to_file(&path)?;

    let loaded = GameSnapshot::load_from_file(&path)?;
    assert_eq!(loaded.saved_turn, interrupted.turn_number());
    let mut resumed = loaded.resume();
    GameLoop::new(&mut resumed)
        .with_verbosity(VerbosityLevel::Silent)
        .run_turns(&mut interrupted_controllers, 18)?;

    assert_eq!(
        serde_json::to_value(&resumed).unwrap(),
        serde_json::to_value(&reference).unwrap()
    );
    Ok(())
}

#[test]
fn test_resumed_game_can_undo_earlier_turns() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("opening.json");

    let mut game = GameState::from_ruleset_seeded(Ruleset::classic(3)?, 3)?;
    let start = serde_json::to_value(&game).unwrap();
    game.perform_turn(PlayerAction::take_gems(&[Gem::Ruby, Gem::Emerald, Gem::Onyx]))?;
    game.perform_turn(PlayerAction::reserve(3, 0))?;
    GameSnapshot::capture(&game).save_to_file(&path)?;

    let mut resumed = GameSnapshot::load_from_file(&path)?.resume();
    assert_eq!(resumed.current_player_id(), PlayerId::new(2));
    assert_eq!(resumed.undo_log.turn_count(), 2);

    assert!(resumed.undo_turn()?);
    assert!(resumed.undo_turn()?);
    assert!(!resumed.undo_turn()?);
    assert_eq!(serde_json::to_value(&resumed).unwrap(), start);
    Ok(())
}

#[test]
fn test_corrupt_snapshot_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "{ not json")?;
    assert!(matches!(
        GameSnapshot::load_from_file(&garbage),
        Err(SplendorError::SerializationError(_))
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        GameSnapshot::load_from_file(&missing),
        Err(SplendorError::IoError(_))
    ));

    // Turn counter disagrees with the saved state
    let game = GameState::from_ruleset_seeded(Ruleset::classic(2)?, 1)?;
    let mut snapshot = GameSnapshot::new(game);
    snapshot.saved_turn = 4;
    let mismatched = dir.path().join("mismatched.json");
    snapshot.save_to_file(&mismatched)?;
    assert!(matches!(
        GameSnapshot::load_from_file(&mismatched),
        Err(SplendorError::SerializationError(_))
    ));

    // Hand-edited states that no game could reach
    let edits: [(&str, fn(&mut serde_json::Value)); 4] = [
        ("pointer", |state| state["current_player"] = 5.into()),
        ("bank", |state| state["bank"]["ruby"] = (-1).into()),
        ("seats", |state| {
            if let Some(players) = state["players"].as_array_mut() {
                players.pop();
            }
        }),
        ("reserved", |state| {
            let card = state["shop"]["tiers"][0]["slots"][0].clone();
            state["players"][0]["reserved"] = serde_json::Value::Array(vec![card; 4]);
        }),
    ];
    let clean = dir.path().join("clean.json");
    GameSnapshot::capture(&GameState::from_ruleset_seeded(Ruleset::classic(3)?, 9)?)
        .save_to_file(&clean)?;
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&clean)?)
        .map_err(|e| SplendorError::SerializationError(e.to_string()))?;

    for (name, edit) in edits {
        let mut value = saved.clone();
        edit(&mut value["game_state"]);
        let path = dir.path().join(format!("{}.json", name));
        std::fs::write(&path, value.to_string())?;
        assert!(
            matches!(
                GameSnapshot::load_from_file(&path),
                Err(SplendorError::SerializationError(_))
            ),
            "{} edit was accepted",
            name
        );
    }
    Ok(())
}
