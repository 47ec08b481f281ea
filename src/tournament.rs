//! Simulation mode: many random games in parallel, with aggregate statistics
//!
//! Games are independent, so they run on the rayon pool with no coordination.
//! Every game seed is derived from the master seed and the game index, which
//! makes a whole report reproducible regardless of thread scheduling.

use crate::core::PlayerId;
use crate::game::{
    GameEndReason, GameLoop, GameResult, GameState, PlayerController, RandomController,
    VerbosityLevel,
};
use crate::ruleset::Ruleset;
use crate::Result;
use rayon::prelude::*;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub ruleset: Ruleset,
    pub games: usize,
    /// Master seed
    pub seed: u64,
    /// Turn cap per game
    pub max_turns: u32,
}

/// Outcome of one simulated game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub index: usize,
    pub seed: u64,
    pub result: GameResult,
    /// Prestige per seat when the game stopped
    pub final_prestige: Vec<u32>,
    /// Bank plus holdings still equal the starting bank
    pub tokens_conserved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub games: Vec<GameSummary>,
    /// Games that returned an error, with the message
    pub failures: Vec<(usize, String)>,
}

/// Seed for game `index` of a run with `master_seed`
pub fn game_seed(master_seed: u64, index: usize) -> u64 {
    master_seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one game with a random controller in every seat
pub fn play_random_game(ruleset: &Ruleset, seed: u64, max_turns: u32) -> Result<GameSummary> {
    let mut game = GameState::from_ruleset_seeded(ruleset.clone(), seed)?;
    game.disable_undo();

    let mut controllers: Vec<Box<dyn PlayerController>> = game
        .players
        .iter()
        .map(|player| {
            let controller_seed = seed
                .wrapping_add(0x1234_5678_9ABC_DEF0)
                .wrapping_add(player.id.index() as u64);
            Box::new(RandomController::with_seed(player.id, controller_seed))
                as Box<dyn PlayerController>
        })
        .collect();

    let result = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_max_turns(max_turns)
        .run_game(&mut controllers)?;

    Ok(GameSummary {
        index: 0,
        seed,
        result,
        final_prestige: game.players.iter().map(|player| player.prestige()).collect(),
        tokens_conserved: game.total_tokens() == GameState::initial_bank(&game.ruleset),
    })
}

/// Run `config.games` random games in parallel
pub fn run_simulation(config: &SimulationConfig) -> SimulationReport {
    let outcomes: Vec<(usize, Result<GameSummary>)> = (0..config.games)
        .into_par_iter()
        .map(|index| {
            let seed = game_seed(config.seed, index);
            let outcome = play_random_game(&config.ruleset, seed, config.max_turns)
                .map(|summary| GameSummary { index, ..summary });
            (index, outcome)
        })
        .collect();

    let mut report = SimulationReport {
        games: Vec::with_capacity(outcomes.len()),
        failures: Vec::new(),
    };
    for (index, outcome) in outcomes {
        match outcome {
            Ok(summary) => report.games.push(summary),
            Err(e) => report.failures.push((index, e.to_string())),
        }
    }
    report
}

impl SimulationReport {
    /// Games ending for `reason`
    pub fn count(&self, reason: GameEndReason) -> usize {
        self.games
            .iter()
            .filter(|game| game.result.end_reason == reason)
            .count()
    }

    /// Wins per seat
    pub fn seat_wins(&self, player_count: usize) -> Vec<usize> {
        let mut wins = vec![0; player_count];
        for winner in self.games.iter().filter_map(|game| game.result.winner) {
            if let Some(slot) = wins.get_mut(winner.index()) {
                *slot += 1;
            }
        }
        wins
    }

    pub fn conservation_failures(&self) -> usize {
        self.games.iter().filter(|game| !game.tokens_conserved).count()
    }

    pub fn average_turns(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        let turns: u64 = self
            .games
            .iter()
            .map(|game| u64::from(game.result.turns_played))
            .sum();
        turns as f64 / self.games.len() as f64
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.games.len();
        writeln!(f, "=== Simulation Complete ===")?;
        writeln!(f, "Games played: {}", total)?;
        writeln!(f, "Average turns: {:.1}", self.average_turns())?;
        for (label, reason) in [
            ("Finished", GameEndReason::PrestigeReached),
            ("Stalled", GameEndReason::Stalled),
            ("Turn limit", GameEndReason::TurnLimit),
        ] {
            let count = self.count(reason);
            let share = if total > 0 {
                100.0 * count as f64 / total as f64
            } else {
                0.0
            };
            writeln!(f, "{}: {} ({:.1}%)", label, count, share)?;
        }

        let player_count = self
            .games
            .first()
            .map(|game| game.final_prestige.len())
            .unwrap_or(0);
        writeln!(f, "\n=== Seat Statistics ===")?;
        for (seat, wins) in self.seat_wins(player_count).into_iter().enumerate() {
            let seat = PlayerId::new(u8::try_from(seat).unwrap_or(u8::MAX));
            writeln!(f, "{} wins: {}", seat, wins)?;
        }

        writeln!(f, "\nConservation failures: {}", self.conservation_failures())?;
        for (index, message) in &self.failures {
            writeln!(f, "Game {} failed: {}", index, message)?;
        }
        Ok(())
    }
}
