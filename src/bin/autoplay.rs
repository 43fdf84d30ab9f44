//! Headless autoplay: plays one seeded game with scripted answers and
//! prints a JSON summary.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rust_pathquest::core::{BoardConfig, BoardError, BoardRng};
use rust_pathquest::effects::Prompt;
use rust_pathquest::path::layout;
use rust_pathquest::{Board, GameOutcome, MinigameOutcome};

const AUTOPLAY_STREAM: &str = "autoplay";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Number of tiles on a generated serpentine path.
    #[arg(long, default_value_t = 24)]
    tiles: usize,
    /// Play the classic hand-laid board instead of a generated one.
    #[arg(long)]
    classic: bool,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Probability of winning each minigame.
    #[arg(long, default_value_t = 0.5)]
    win_rate: f64,
    /// Probability of answering each quiz correctly.
    #[arg(long, default_value_t = 0.5)]
    quiz_rate: f64,
    /// Board configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frame length in seconds.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,
    /// Stop after this many player decisions.
    #[arg(long, default_value_t = 10_000)]
    max_actions: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    tiles: usize,
    outcome: Option<GameOutcome>,
    score: i64,
    turns_played: u32,
    final_tile: usize,
    minigame_wins: u32,
    minigame_losses: u32,
    rolls: Vec<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => serde_json::from_str::<BoardConfig>(&fs::read_to_string(path)?)?,
        None => BoardConfig::default(),
    };

    let mut board = if cli.classic {
        Board::new(layout::classic_path()?, config, cli.seed)?
    } else {
        Board::generate(&layout::serpentine(cli.tiles, 6, 1.5), config, cli.seed)?
    };
    let mut player = BoardRng::new(cli.seed).for_context(AUTOPLAY_STREAM);

    info!(seed = cli.seed, tiles = board.path().len(), "autoplay_started");

    for _ in 0..cli.max_actions {
        if board.outcome().is_some() {
            break;
        }
        take_action(&mut board, &mut player, &cli)?;

        match board.run_until_settled(cli.dt, 1_000_000) {
            Ok(_) => {}
            Err(err @ BoardError::MinigameLoad { .. }) => warn!(error = %err, "minigame_skipped"),
            Err(err) => return Err(err.into()),
        }
    }

    let state = board.state();
    let summary = Summary {
        seed: cli.seed,
        tiles: board.path().len(),
        outcome: board.outcome(),
        score: state.score(),
        turns_played: state.turn.saturating_sub(1),
        final_tile: state.current_tile_index,
        minigame_wins: state.minigame_wins,
        minigame_losses: state.minigame_losses,
        rolls: state.history.iter().map(|r| r.roll).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Make whatever decision the board is waiting on.
fn take_action(board: &mut Board, player: &mut BoardRng, cli: &Cli) -> Result<(), BoardError> {
    match board.pending_prompt() {
        Some(Prompt::Quiz(_)) => return board.answer_quiz(player.chance(cli.quiz_rate)),
        Some(Prompt::Story(story)) => {
            let choice = player.index(story.choices.len()).unwrap_or(0);
            return board.choose_story_option(choice);
        }
        None => {}
    }

    if board.active_minigame().is_some() {
        let outcome = if player.chance(cli.win_rate) {
            MinigameOutcome::Win
        } else {
            MinigameOutcome::Loss
        };
        board.report_minigame(outcome, None)?;
        return Ok(());
    }

    if board.is_quiescent() {
        board.roll_dice()?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
