use crate::core::{CommitError, ConfigurationError};
use crate::types::ReplayAction;

/// Failures surfaced by the [`Engine`](crate::Engine) facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Configuration(err) => err.code(),
            EngineError::Commit(err) => err.code(),
        }
    }
}

/// Why a replay or a claimed result was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("replay describes an invalid game: {0}")]
    Configuration(ConfigurationError),

    #[error("replay version {version} is not supported")]
    UnsupportedVersion { version: u8 },

    #[error("replay has {len} events, more than the limit of {max}")]
    TooLong { len: usize, max: u32 },

    #[error("event {index} has ordinal {ordinal}, expected {index}")]
    OrdinalGap { index: usize, ordinal: u32 },

    #[error("event {ordinal} ({action:?}) was rejected by the simulation")]
    RejectedEvent { ordinal: u32, action: ReplayAction },

    #[error("event {ordinal} arrives after the game ended")]
    EventAfterEnd { ordinal: u32 },

    #[error("replay does not reach the end of the game: {0}")]
    NotEnded(CommitError),

    #[error("score mismatch: claimed {claimed}, computed {computed}")]
    ScoreMismatch { claimed: u64, computed: u64 },

    #[error("board state mismatch")]
    BoardMismatch,

    #[error("hash mismatch: claimed {claimed}, computed {computed}")]
    HashMismatch { claimed: String, computed: String },
}

impl VerifyError {
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::Configuration(_) => "invalid_configuration",
            VerifyError::UnsupportedVersion { .. } => "unsupported_version",
            VerifyError::TooLong { .. } => "replay_too_long",
            VerifyError::OrdinalGap { .. } => "ordinal_gap",
            VerifyError::RejectedEvent { .. } => "rejected_event",
            VerifyError::EventAfterEnd { .. } => "event_after_end",
            VerifyError::NotEnded(_) => "not_ended",
            VerifyError::ScoreMismatch { .. } => "score_mismatch",
            VerifyError::BoardMismatch => "board_mismatch",
            VerifyError::HashMismatch { .. } => "hash_mismatch",
        }
    }
}

impl From<EngineError> for VerifyError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::Configuration(err) => VerifyError::Configuration(err),
            EngineError::Commit(err) => VerifyError::NotEnded(err),
        }
    }
}
