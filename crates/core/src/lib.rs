//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules, the block sequence, the replay log and
//! the commitment. It has **zero dependencies** on UI, networking, clocks or
//! I/O, which makes it:
//!
//! - **Deterministic**: the same block source and the same recorded actions
//!   always produce the same board, score and hashes
//! - **Verifiable**: a replay log can be re-run anywhere to check a claim
//! - **Fast**: stack-allocated shape cells and row clears on the hot path
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 board with collision checks, row clears and canonical bytes
//! - [`shape`]: block definitions, derived rotations and wall kicks
//! - [`sequencer`]: seeded, fixed and seeded-catalog block sources
//! - [`scoring`]: line, drop and level rules
//! - [`simulation`]: the controller that applies inputs and gravity
//! - [`replay`]: the ordered log of accepted actions
//! - [`commitment`]: SHA-256 commitment over a finished game
//! - [`snapshot`]: read-only view for hosts
//!
//! # Rules
//!
//! - A block spawns top-center in its North orientation
//! - Left/right/rotate apply only when the result is legal; rejected inputs
//!   return `false` and are not recorded
//! - `down` falls one row (1 point) or locks; hard drop falls to the floor
//!   (2 points per row) and locks
//! - Clearing `n` rows at once scores `LINE_SCORES[n] * (level + 1)`; the
//!   level goes up every 10 lines
//! - The game ends when a block cannot spawn or a fixed sequence runs out
//!
//! # Example
//!
//! ```
//! use blocktris_core::{BlockSource, CommitmentBuilder, Simulation};
//! use blocktris_core::types::InputKind;
//!
//! let source = BlockSource::new(Some(42), None).unwrap();
//! let mut sim = Simulation::new("demo", source).unwrap();
//!
//! sim.handle_input(InputKind::Right);
//! sim.handle_input(InputKind::HardDrop);
//! assert!(sim.score() > 0);
//!
//! // Finalizing requires an ended game.
//! assert!(CommitmentBuilder::new().finalize_simulation(&sim).is_err());
//! ```
//!
//! # Timing
//!
//! There is no clock. Hosts call [`Simulation::gravity_tick`] on their own
//! schedule (see [`scoring::gravity_interval_ms`]) and every accepted tick is
//! recorded, so replays never depend on wall time.

pub mod board;
pub mod commitment;
pub mod error;
pub mod hash;
pub mod replay;
pub mod scoring;
pub mod sequencer;
pub mod shape;
pub mod simulation;
pub mod snapshot;

pub use blocktris_types as types;

pub use board::{Board, ClearedRows};
pub use commitment::{Commitment, CommitmentBuilder};
pub use error::{
    CommitError, ConfigurationError, ReplayError, SequenceExhausted, ShapeEdge,
    ShapeError,
};
pub use hash::{sha256, to_hex, Hash32};
pub use replay::{InputEvent, ReplayLog, ReplayRecorder};
pub use sequencer::BlockSource;
pub use shape::{try_rotate, BlockDefinition, RotationFamily, ShapeMatrix};
pub use simulation::{ActiveBlock, GameSession, LockEvent, Simulation};
pub use snapshot::{GameSnapshot, Position};
