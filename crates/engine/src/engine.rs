//! Host-facing engine facade
//!
//! One `Engine` per game. Hosts feed it player inputs and gravity ticks on
//! their own schedule, render from [`Engine::snapshot`], and call
//! [`Engine::finalize_game`] once the game is over to obtain the payload they
//! submit: the commitment hash plus the replay needed to check it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::core::scoring::scaled_gravity_interval_ms;
use crate::core::{
    to_hex, Board, BlockDefinition, BlockSource, Commitment, CommitmentBuilder, GameSnapshot,
    LockEvent, ReplayLog, Simulation,
};
use crate::error::EngineError;
use crate::types::{GameStatus, InputKind, ReplayAction};

/// Everything a host renders, captured between two calls
pub type EngineSnapshot = GameSnapshot;

/// Result summary a host submits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub game_id: String,
    pub score: u64,
    /// Lowercase hex of the canonical board bytes
    pub board_state: String,
    /// Lowercase hex of the combined commitment hash
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedGame {
    pub game_data: GameData,
    pub replay_data: ReplayLog,
}

#[derive(Debug, Clone)]
pub struct Engine {
    sim: Simulation,
    commitments: CommitmentBuilder,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration.
    ///
    /// At least one of `seed` and `block_sequence` is required:
    /// - seed only: built-in blocks drawn from a seeded 7-bag
    /// - sequence only: the sequence in order; running out ends the game
    /// - both: the seed picks from the sequence as a catalog, endlessly
    pub fn new(
        game_id: impl Into<String>,
        seed: Option<u64>,
        block_sequence: Option<Vec<BlockDefinition>>,
    ) -> Result<Self, EngineError> {
        Self::with_config(game_id, seed, block_sequence, EngineConfig::default())
    }

    pub fn with_config(
        game_id: impl Into<String>,
        seed: Option<u64>,
        block_sequence: Option<Vec<BlockDefinition>>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let source = BlockSource::new(seed, block_sequence)?;
        let sim = Simulation::new(game_id, source)?;
        Ok(Self {
            sim,
            commitments: CommitmentBuilder::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn game_id(&self) -> &str {
        &self.sim.session().game_id
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.sim.snapshot()
    }

    pub fn board(&self) -> &Board {
        self.sim.board()
    }

    pub fn score(&self) -> u64 {
        self.sim.score()
    }

    pub fn lines_cleared(&self) -> u32 {
        self.sim.lines_cleared()
    }

    pub fn level(&self) -> u32 {
        self.sim.level()
    }

    pub fn status(&self) -> GameStatus {
        self.sim.status()
    }

    pub fn is_game_over(&self) -> bool {
        self.sim.is_over()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Take and clear the last lock event (line clear flashes, sounds).
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.sim.take_last_lock()
    }

    /// Suggested delay before the next [`Engine::tick`]
    pub fn gravity_interval_ms(&self) -> u32 {
        scaled_gravity_interval_ms(self.sim.level(), self.config.base_gravity_ms)
    }

    pub fn handle_input(&mut self, kind: InputKind) -> bool {
        self.sim.handle_input(kind)
    }

    /// Input by host name (`"left"`, `"hardDrop"`, ...). Unknown names are
    /// rejected without touching state.
    pub fn handle_input_str(&mut self, name: &str) -> bool {
        match InputKind::from_str(name) {
            Some(kind) => self.handle_input(kind),
            None => {
                debug!(name, "ignoring unknown input");
                false
            }
        }
    }

    /// One gravity step
    pub fn tick(&mut self) -> bool {
        self.sim.gravity_tick()
    }

    pub(crate) fn apply_recorded(&mut self, action: ReplayAction) -> bool {
        self.sim.apply_recorded(action)
    }

    /// Copy of the replay so far
    pub fn replay_data(&self) -> ReplayLog {
        self.sim.recorder().snapshot()
    }

    /// The commitment of a finished game. Repeated calls return the same value.
    pub fn commitment(&mut self) -> Result<Commitment, EngineError> {
        Ok(self.commitments.finalize_simulation(&self.sim)?)
    }

    /// Result payload for submission. Fails unless the game has ended.
    pub fn finalize_game(&mut self) -> Result<FinalizedGame, EngineError> {
        let commitment = self.commitment()?;
        Ok(FinalizedGame {
            game_data: GameData {
                game_id: commitment.game_id.clone(),
                score: commitment.final_score,
                board_state: hex::encode(self.sim.board().canonical_bytes()),
                hash: to_hex(&commitment.combined_hash),
            },
            replay_data: self.replay_data(),
        })
    }
}
