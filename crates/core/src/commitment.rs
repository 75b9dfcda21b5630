//! Commitment module - the tamper-evident summary of a finished game
//!
//! ```text
//! combined = sha256("BLOCKTRIS/v1"
//!                   || u32 LE len(game_id) || game_id
//!                   || u64 LE score || u32 LE lines_cleared
//!                   || source_digest || board_state_hash || replay_hash)
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::error::CommitError;
use crate::hash::{sha256, to_hex, Hash32};
use crate::replay::ReplayRecorder;
use crate::simulation::{GameSession, Simulation};
use crate::types::GameStatus;

/// Domain separation prefix of the combined hash
pub const COMMITMENT_DOMAIN: &[u8] = b"BLOCKTRIS/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub game_id: String,
    pub final_score: u64,
    pub lines_cleared: u32,
    #[serde(with = "hex_hash")]
    pub source_digest: Hash32,
    #[serde(with = "hex_hash")]
    pub board_state_hash: Hash32,
    #[serde(with = "hex_hash")]
    pub replay_hash: Hash32,
    #[serde(with = "hex_hash")]
    pub combined_hash: Hash32,
}

impl Commitment {
    pub fn combined_hex(&self) -> String {
        to_hex(&self.combined_hash)
    }
}

/// Hash the commitment fields in their fixed order.
pub fn combine(
    game_id: &str,
    final_score: u64,
    lines_cleared: u32,
    source_digest: &Hash32,
    board_state_hash: &Hash32,
    replay_hash: &Hash32,
) -> Hash32 {
    let mut bytes = Vec::with_capacity(COMMITMENT_DOMAIN.len() + 16 + game_id.len() + 96);
    bytes.extend_from_slice(COMMITMENT_DOMAIN);
    bytes.extend_from_slice(&(game_id.len() as u32).to_le_bytes());
    bytes.extend_from_slice(game_id.as_bytes());
    bytes.extend_from_slice(&final_score.to_le_bytes());
    bytes.extend_from_slice(&lines_cleared.to_le_bytes());
    bytes.extend_from_slice(source_digest);
    bytes.extend_from_slice(board_state_hash);
    bytes.extend_from_slice(replay_hash);
    sha256(&bytes)
}

/// Builds the commitment once per session and hands out the cached copy
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommitmentBuilder {
    cached: Option<Commitment>,
}

impl CommitmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finalized(&self) -> bool {
        self.cached.is_some()
    }

    pub fn finalize(
        &mut self,
        session: &GameSession,
        board: &Board,
        replay: &ReplayRecorder,
        source_digest: Hash32,
    ) -> Result<Commitment, CommitError> {
        if let Some(cached) = &self.cached {
            return Ok(cached.clone());
        }
        if session.status != GameStatus::Ended {
            return Err(CommitError::InvalidState {
                status: session.status,
            });
        }

        let board_state_hash = board.state_hash();
        let replay_hash = replay.hash();
        let combined_hash = combine(
            &session.game_id,
            session.score,
            session.lines_cleared,
            &source_digest,
            &board_state_hash,
            &replay_hash,
        );
        let commitment = Commitment {
            game_id: session.game_id.clone(),
            final_score: session.score,
            lines_cleared: session.lines_cleared,
            source_digest,
            board_state_hash,
            replay_hash,
            combined_hash,
        };
        info!(
            game_id = %commitment.game_id,
            score = commitment.final_score,
            events = replay.len(),
            hash = %commitment.combined_hex(),
            "game finalized"
        );
        self.cached = Some(commitment.clone());
        Ok(commitment)
    }

    /// Convenience wrapper over [`CommitmentBuilder::finalize`] for a controller
    pub fn finalize_simulation(&mut self, sim: &Simulation) -> Result<Commitment, CommitError> {
        self.finalize(
            sim.session(),
            sim.board(),
            sim.recorder(),
            sim.source().source_digest(),
        )
    }
}

mod hex_hash {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::hash::{to_hex, Hash32};

    pub fn serialize<S: Serializer>(hash: &Hash32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash32, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(&text, &mut out).map_err(D::Error::custom)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::BlockSource;
    use crate::shape::builtin_block;
    use crate::types::InputKind;

    fn finished_game() -> Simulation {
        let source = BlockSource::new(None, Some(vec![builtin_block(2); 2])).unwrap();
        let mut sim = Simulation::new("game-1", source).unwrap();
        sim.handle_input(InputKind::HardDrop);
        sim.handle_input(InputKind::Left);
        sim.handle_input(InputKind::HardDrop);
        assert!(sim.is_over());
        sim
    }

    #[test]
    fn refuses_unfinished_sessions() {
        let sim = Simulation::new("g", BlockSource::new(Some(1), None).unwrap()).unwrap();
        let mut builder = CommitmentBuilder::new();
        let err = builder.finalize_simulation(&sim).unwrap_err();
        assert_eq!(
            err,
            CommitError::InvalidState {
                status: GameStatus::New
            }
        );
        assert_eq!(err.code(), "invalid_state");
        assert!(!builder.is_finalized());
    }

    #[test]
    fn finalize_is_idempotent() {
        let sim = finished_game();
        let mut builder = CommitmentBuilder::new();
        let first = builder.finalize_simulation(&sim).unwrap();
        let second = builder.finalize_simulation(&sim).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.board_state_hash, sim.board().state_hash());
        assert_eq!(first.replay_hash, sim.recorder().hash());
    }

    #[test]
    fn combined_hash_binds_every_field() {
        let zero = [0u8; 32];
        let base = combine("g", 10, 1, &zero, &zero, &zero);
        assert_ne!(base, combine("h", 10, 1, &zero, &zero, &zero));
        assert_ne!(base, combine("g", 11, 1, &zero, &zero, &zero));
        assert_ne!(base, combine("g", 10, 2, &zero, &zero, &zero));
        assert_ne!(base, combine("g", 10, 1, &[1; 32], &zero, &zero));
        assert_ne!(base, combine("g", 10, 1, &zero, &[1; 32], &zero));
        assert_ne!(base, combine("g", 10, 1, &zero, &zero, &[1; 32]));
    }

    #[test]
    fn commitment_json_uses_hex() {
        let sim = finished_game();
        let commitment = CommitmentBuilder::new().finalize_simulation(&sim).unwrap();
        let json = serde_json::to_value(&commitment).unwrap();
        assert_eq!(json["combinedHash"], commitment.combined_hex());
        let back: Commitment = serde_json::from_value(json).unwrap();
        assert_eq!(back, commitment);
    }
}
