//! Replay verification
//!
//! Re-runs a replay log through a fresh engine and recomputes the
//! commitment. A replay is rejected as soon as it stops matching what the
//! recorder would have produced: a gap in the ordinals, an event the
//! simulation refuses, or an event after the game ended.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::core::replay::REPLAY_VERSION;
use crate::core::{Commitment, ReplayLog};
use crate::engine::{Engine, GameData};
use crate::error::VerifyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedGame {
    pub game_data: GameData,
    pub commitment: Commitment,
    pub events_applied: u32,
}

/// Replay `replay` for `game_id` and return the recomputed result.
pub fn verify_replay(
    game_id: &str,
    replay: &ReplayLog,
    config: &EngineConfig,
) -> Result<VerifiedGame, VerifyError> {
    let result = replay_events(game_id, replay, config);
    if let Err(error) = &result {
        warn!(game_id, code = error.code(), %error, "replay rejected");
    }
    result
}

fn replay_events(
    game_id: &str,
    replay: &ReplayLog,
    config: &EngineConfig,
) -> Result<VerifiedGame, VerifyError> {
    if replay.version != REPLAY_VERSION {
        return Err(VerifyError::UnsupportedVersion {
            version: replay.version,
        });
    }
    if replay.len() > config.max_replay_events as usize {
        return Err(VerifyError::TooLong {
            len: replay.len(),
            max: config.max_replay_events,
        });
    }
    if let Some((index, ordinal)) = replay.first_gap() {
        return Err(VerifyError::OrdinalGap { index, ordinal });
    }

    let mut engine = Engine::with_config(
        game_id,
        replay.seed,
        replay.block_sequence.clone(),
        config.clone(),
    )?;

    for event in &replay.events {
        if engine.is_game_over() {
            return Err(VerifyError::EventAfterEnd {
                ordinal: event.ordinal,
            });
        }
        if !engine.apply_recorded(event.action) {
            return Err(VerifyError::RejectedEvent {
                ordinal: event.ordinal,
                action: event.action,
            });
        }
    }

    let commitment = engine.commitment()?;
    let finalized = engine.finalize_game()?;
    debug!(game_id, events = replay.len(), "replay verified");
    Ok(VerifiedGame {
        game_data: finalized.game_data,
        commitment,
        events_applied: replay.len() as u32,
    })
}

/// Replay and compare against a claimed result.
pub fn verify_claim(
    claim: &GameData,
    replay: &ReplayLog,
    config: &EngineConfig,
) -> Result<VerifiedGame, VerifyError> {
    let verified = verify_replay(&claim.game_id, replay, config)?;
    let computed = &verified.game_data;

    let mismatch = if claim.score != computed.score {
        Some(VerifyError::ScoreMismatch {
            claimed: claim.score,
            computed: computed.score,
        })
    } else if !claim.board_state.eq_ignore_ascii_case(&computed.board_state) {
        Some(VerifyError::BoardMismatch)
    } else if !claim.hash.eq_ignore_ascii_case(&computed.hash) {
        Some(VerifyError::HashMismatch {
            claimed: claim.hash.clone(),
            computed: computed.hash.clone(),
        })
    } else {
        None
    };

    match mismatch {
        Some(error) => {
            warn!(game_id = %claim.game_id, code = error.code(), %error, "claim rejected");
            Err(error)
        }
        None => Ok(verified),
    }
}
