//! Splendor - command line front end
//!
//! `play` runs one game from a script file or stdin, one action per line.
//! `simulate` runs many random games in parallel and prints statistics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use splendor_rs::{
    game::{GameSnapshot, GameState, GameStateView, VerbosityLevel},
    notation::{format_action, parse_action, strip_comment},
    ruleset::Ruleset,
    tournament::{run_simulation, SimulationConfig},
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Verbosity level for game output (names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "splendor")]
#[command(about = "Splendor rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game, reading actions from a script or stdin
    Play {
        /// Number of players
        #[arg(long, short = 'p', default_value_t = 2)]
        players: usize,

        /// Seed for the shop shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Action script, one action per line (default: stdin)
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,

        /// Custom ruleset (JSON) instead of the classic rules
        #[arg(long, value_name = "FILE")]
        ruleset: Option<PathBuf>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Save the game to this file when input ends
        #[arg(long, value_name = "FILE")]
        snapshot_output: Option<PathBuf>,

        /// Resume a game from a snapshot file
        #[arg(long, value_name = "SNAPSHOT_FILE")]
        start_from: Option<PathBuf>,
    },

    /// Run random games in parallel and report statistics
    Simulate {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Number of players
        #[arg(long, short = 'p', default_value_t = 2)]
        players: usize,

        /// Master seed for deterministic runs
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Turn cap per game
        #[arg(long, default_value_t = 500)]
        max_turns: u32,

        /// Custom ruleset (JSON) instead of the classic rules
        #[arg(long, value_name = "FILE")]
        ruleset: Option<PathBuf>,

        /// Verbosity level for the report (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            players,
            seed,
            script,
            ruleset,
            verbosity,
            snapshot_output,
            start_from,
        } => {
            let game = match start_from {
                Some(path) => GameSnapshot::load_from_file(&path)
                    .with_context(|| format!("loading snapshot {}", path.display()))?
                    .resume(),
                None => {
                    let ruleset = load_ruleset(ruleset.as_deref(), players)?;
                    match seed {
                        Some(seed) => GameState::from_ruleset_seeded(ruleset, seed)?,
                        None => GameState::from_ruleset(ruleset)?,
                    }
                }
            };
            run_play(game, script, verbosity.into(), snapshot_output)
        }
        Commands::Simulate {
            games,
            players,
            seed,
            max_turns,
            ruleset,
            verbosity,
        } => {
            let config = SimulationConfig {
                ruleset: load_ruleset(ruleset.as_deref(), players)?,
                games,
                seed,
                max_turns,
            };
            run_simulate(&config, verbosity.into());
            Ok(())
        }
    }
}

/// The ruleset file with `players` seats, or the classic rules
fn load_ruleset(path: Option<&Path>, players: usize) -> Result<Ruleset> {
    match path {
        Some(path) => {
            let mut ruleset = Ruleset::load(path)
                .with_context(|| format!("loading ruleset {}", path.display()))?;
            ruleset.player_count = players;
            ruleset.validate()?;
            Ok(ruleset)
        }
        None => Ok(Ruleset::classic(players)?),
    }
}

fn run_play(
    mut game: GameState,
    script: Option<PathBuf>,
    verbosity: VerbosityLevel,
    snapshot_output: Option<PathBuf>,
) -> Result<()> {
    game.logger.set_verbosity(verbosity);

    let input: Box<dyn BufRead> = match &script {
        Some(path) => Box::new(std::io::BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    };

    if verbosity >= VerbosityLevel::Normal {
        print!("{}", GameStateView::new(&game, game.current_player_id()));
    }

    for (index, line) in input.lines().enumerate() {
        let line = line.context("reading actions")?;
        let command = strip_comment(&line);
        if command.is_empty() {
            continue;
        }

        match command {
            "undo" => {
                if !game.undo_turn()? {
                    eprintln!("line {}: nothing to undo", index + 1);
                }
                continue;
            }
            "show" => {
                print!("{}", GameStateView::new(&game, game.current_player_id()));
                continue;
            }
            "moves" => {
                for action in game.legal_actions() {
                    println!("  {}", format_action(&action));
                }
                continue;
            }
            _ => {}
        }

        let action = match parse_action(command) {
            Ok(action) => action,
            Err(e) => {
                eprintln!("line {}: {}", index + 1, e);
                continue;
            }
        };
        match game.perform_turn(action) {
            Ok(view) => {
                if verbosity >= VerbosityLevel::Verbose {
                    print!("{}", view);
                }
            }
            Err(e) => eprintln!("line {}: {}", index + 1, e),
        }

        if game.is_finished() {
            break;
        }
    }

    if let Some(path) = snapshot_output {
        GameSnapshot::capture(&game)
            .save_to_file(&path)
            .with_context(|| format!("saving snapshot {}", path.display()))?;
        if verbosity >= VerbosityLevel::Minimal {
            println!("Snapshot saved to {}", path.display());
        }
    }

    if verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Standings after turn {} ===", game.turn_number());
        for player in &game.players {
            println!("  {}", player);
        }
        if let Some(winner) = game.winner() {
            println!("Winner: {}", winner);
        }
    }
    Ok(())
}

fn run_simulate(config: &SimulationConfig, verbosity: VerbosityLevel) {
    if verbosity >= VerbosityLevel::Normal {
        println!(
            "Running {} games with {} players (seed {})\n",
            config.games, config.ruleset.player_count, config.seed
        );
    }

    let start = Instant::now();
    let report = run_simulation(config);
    let elapsed = start.elapsed();

    if verbosity >= VerbosityLevel::Minimal {
        print!("{}", report);
        println!("Elapsed time: {:.2}s", elapsed.as_secs_f64());
        println!(
            "Games per second: {:.2}",
            report.games.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }
    if verbosity >= VerbosityLevel::Verbose {
        for game in &report.games {
            println!(
                "  game {} seed {}: {:?} after {} turns, prestige {:?}",
                game.index,
                game.seed,
                game.result.end_reason,
                game.result.turns_played,
                game.final_prestige
            );
        }
    }
}
