//! Error types for the simulation core.
//!
//! Rejected player input is not an error (it returns `false`). These types
//! cover construction problems, sequence exhaustion, misuse of the replay
//! recorder, and finalizing a session too early.

use crate::types::GameStatus;

/// Problems with a block shape matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("shape has no rows")]
    Empty,

    #[error("shape row {row} has width {width}, expected {expected}")]
    NotRectangular { row: usize, width: usize, expected: usize },

    #[error("shape is {width}x{height}, larger than the {max}x{max} limit")]
    TooLarge { width: usize, height: usize, max: u8 },

    #[error("shape has no occupied cells")]
    NoOccupiedCells,

    #[error("shape has an empty {edge} edge")]
    UntrimmedEdge { edge: ShapeEdge },
}

/// Side of a shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl std::fmt::Display for ShapeEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShapeEdge::Top => "top",
            ShapeEdge::Bottom => "bottom",
            ShapeEdge::Left => "left",
            ShapeEdge::Right => "right",
        })
    }
}

/// Engine construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no block source: a seed or a block sequence is required")]
    NoBlockSource,

    #[error("block sequence is empty")]
    EmptySequence,

    #[error("game id is empty")]
    EmptyGameId,
}

impl ConfigurationError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigurationError::NoBlockSource => "no_block_source",
            ConfigurationError::EmptySequence => "empty_sequence",
            ConfigurationError::EmptyGameId => "empty_game_id",
        }
    }
}

/// A fixed block sequence has no block at the requested cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("block sequence exhausted at cursor {cursor} (length {len})")]
pub struct SequenceExhausted {
    pub cursor: u32,
    pub len: usize,
}

/// Replay recorder misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("replay log is sealed after {len} events")]
    Sealed { len: usize },
}

/// Commitment builder failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("cannot finalize a session in state {status:?}; it must be ended")]
    InvalidState { status: GameStatus },
}

impl CommitError {
    pub fn code(&self) -> &'static str {
        match self {
            CommitError::InvalidState { .. } => "invalid_state",
        }
    }
}
