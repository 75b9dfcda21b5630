//! BlockTris command-line runner.
//!
//! `play` drives a game from a list of inputs and prints the board; when the
//! game ends it prints the finalized payload as JSON. `verify` replays a
//! stored payload or replay log and prints the recomputed commitment.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blocktris::core::{BlockDefinition, ReplayLog};
use blocktris::engine::{verify_claim, verify_replay, Engine, EngineConfig, FinalizedGame};

#[derive(Parser)]
#[command(name = "blocktris")]
#[command(about = "Deterministic falling-block engine with verifiable replays")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a scripted game
    Play {
        #[arg(long)]
        game_id: String,
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file holding an array of block definitions
        #[arg(long)]
        sequence: Option<PathBuf>,
        /// Comma-separated input names, e.g. `left,rotateClockwise,hardDrop`
        #[arg(long, value_delimiter = ',')]
        inputs: Vec<String>,
        /// Apply one gravity tick after every K inputs
        #[arg(long)]
        gravity_every: Option<usize>,
        /// Keep hard-dropping after the inputs run out until the game ends
        #[arg(long)]
        finish: bool,
    },
    /// Replay a finalized game (or a bare replay log) and print its commitment
    Verify {
        #[arg(long)]
        replay: PathBuf,
        /// Required for bare replay logs; checked against the claim otherwise
        #[arg(long)]
        game_id: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayFile {
    Finalized(FinalizedGame),
    Log(ReplayLog),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env();
    match Args::parse().command {
        Command::Play {
            game_id,
            seed,
            sequence,
            inputs,
            gravity_every,
            finish,
        } => play(
            config,
            PlayOptions {
                game_id,
                seed,
                sequence,
                inputs,
                gravity_every,
                finish,
            },
        ),
        Command::Verify { replay, game_id } => verify(&config, &replay, game_id.as_deref()),
    }
}

struct PlayOptions {
    game_id: String,
    seed: Option<u64>,
    sequence: Option<PathBuf>,
    inputs: Vec<String>,
    gravity_every: Option<usize>,
    finish: bool,
}

fn play(config: EngineConfig, opts: PlayOptions) -> Result<()> {
    let block_sequence = opts
        .sequence
        .as_deref()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read sequence: {}", path.display()))?;
            serde_json::from_str::<Vec<BlockDefinition>>(&text)
                .with_context(|| format!("invalid block sequence in {}", path.display()))
        })
        .transpose()?;

    let mut engine = Engine::with_config(opts.game_id, opts.seed, block_sequence, config)?;

    let mut rejected = 0usize;
    for (i, name) in opts.inputs.iter().map(|s| s.trim()).enumerate() {
        if name.is_empty() {
            continue;
        }
        if !engine.handle_input_str(name) {
            rejected += 1;
        }
        if let Some(k) = opts.gravity_every.filter(|&k| k > 0) {
            if (i + 1) % k == 0 {
                engine.tick();
            }
        }
    }
    if opts.finish {
        while !engine.is_game_over() {
            engine.handle_input_str("hardDrop");
        }
    }

    info!(
        inputs = opts.inputs.len(),
        rejected,
        replay_events = engine.replay_data().len(),
        "inputs applied"
    );
    println!("{}", engine.snapshot());

    if engine.is_game_over() {
        let finalized = engine.finalize_game()?;
        println!("{}", serde_json::to_string_pretty(&finalized)?);
    }
    Ok(())
}

fn verify(config: &EngineConfig, path: &Path, game_id: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read replay: {}", path.display()))?;
    let file: ReplayFile = serde_json::from_str(&text)
        .with_context(|| format!("{} is neither a finalized game nor a replay log", path.display()))?;

    let verified = match file {
        ReplayFile::Finalized(game) => {
            if let Some(id) = game_id {
                if id != game.game_data.game_id {
                    bail!(
                        "game id {id} does not match the claim ({})",
                        game.game_data.game_id
                    );
                }
            }
            verify_claim(&game.game_data, &game.replay_data, config)?
        }
        ReplayFile::Log(log) => {
            let id = game_id.ok_or_else(|| anyhow!("--game-id is required for a bare replay log"))?;
            verify_replay(id, &log, config)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&verified)?);
    Ok(())
}
