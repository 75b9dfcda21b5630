//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data, usable from the simulation core, the host facade,
//! and any external verifier that needs to agree on encodings.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: horizontally centered on row 0
//!
//! # Canonical Codes
//!
//! Several enums carry a stable `code()` byte. These bytes feed the canonical
//! serialization that commitments hash, so they must never be renumbered:
//!
//! | Type | Codes |
//! |------|-------|
//! | `ReplayAction` | left=1, right=2, down=3, rotateClockwise=4, rotateCounterClockwise=5, hardDrop=6, gravity=7 |
//! | `Rarity` | common=0, rare=1, legendary=2 |
//! | `SpecialEffect` | glow=1, sparkle=2, prism=3 |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{InputKind, Rotation, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let input = InputKind::from_str("hardDrop").unwrap();
//! assert_eq!(input, InputKind::HardDrop);
//! assert_eq!(InputKind::from_str("jump"), None);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Largest bounding box side a block shape may use.
pub const MAX_SHAPE_SPAN: u8 = 5;

/// Upper bound on occupied cells in one shape.
pub const MAX_SHAPE_CELLS: usize = (MAX_SHAPE_SPAN as usize) * (MAX_SHAPE_SPAN as usize);

/// Base gravity interval at level 0 (1000ms = 1 second per row)
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8. Advisory only: the host picks the
/// cadence, the simulation only sees recorded gravity events.
pub const GRAVITY_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Gravity interval floor after the table runs out (120ms)
pub const GRAVITY_INTERVAL_FLOOR_MS: u32 = 120;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table, indexed by rows cleared in one lock.
///
/// - 1 line: 40
/// - 2 lines: 100
/// - 3 lines: 300
/// - 4 lines: 1200
/// - 5 lines: 2000 (only reachable with five-tall custom shapes)
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 6] = [0, 40, 100, 300, 1200, 2000];

/// Points per row for a soft drop (`down`)
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Rotation states (North = spawn orientation)
///
/// The rotation cycle goes: North → East → South → West → North.
/// `index()` gives the 0..=3 rotation state used by the shape math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use blocktris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Player inputs accepted by the simulation.
///
/// These are the only kinds a host may deliver. Gravity is not an input;
/// see [`ReplayAction::Gravity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Move block one cell left
    Left,
    /// Move block one cell right
    Right,
    /// Move block one cell down, locking it if it cannot move
    Down,
    /// Rotate 90° clockwise (with wall kicks)
    RotateClockwise,
    /// Rotate 90° counter-clockwise (with wall kicks)
    RotateCounterClockwise,
    /// Drop to the lowest legal row and lock
    HardDrop,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        InputKind::Left,
        InputKind::Right,
        InputKind::Down,
        InputKind::RotateClockwise,
        InputKind::RotateCounterClockwise,
        InputKind::HardDrop,
    ];

    /// Parse input from the host's string names (case-insensitive).
    ///
    /// Unknown names return `None`; the engine treats them as rejected input.
    ///
    /// ```
    /// use blocktris_types::InputKind;
    ///
    /// assert_eq!(InputKind::from_str("left"), Some(InputKind::Left));
    /// assert_eq!(InputKind::from_str("rotateCounterClockwise"), Some(InputKind::RotateCounterClockwise));
    /// assert_eq!(InputKind::from_str("HARDDROP"), Some(InputKind::HardDrop));
    /// assert_eq!(InputKind::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(InputKind::Left),
            "right" => Some(InputKind::Right),
            "down" => Some(InputKind::Down),
            "rotateclockwise" | "rotatecw" => Some(InputKind::RotateClockwise),
            "rotatecounterclockwise" | "rotateccw" => Some(InputKind::RotateCounterClockwise),
            "harddrop" => Some(InputKind::HardDrop),
            _ => None,
        }
    }

    /// Convert to the camelCase name used by hosts
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Left => "left",
            InputKind::Right => "right",
            InputKind::Down => "down",
            InputKind::RotateClockwise => "rotateClockwise",
            InputKind::RotateCounterClockwise => "rotateCounterClockwise",
            InputKind::HardDrop => "hardDrop",
        }
    }
}

/// One step in the replay log: a player input or a synthetic gravity tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplayAction {
    Left,
    Right,
    Down,
    RotateClockwise,
    RotateCounterClockwise,
    HardDrop,
    Gravity,
}

impl ReplayAction {
    /// Stable byte code used in canonical replay encoding.
    pub fn code(&self) -> u8 {
        match self {
            ReplayAction::Left => 1,
            ReplayAction::Right => 2,
            ReplayAction::Down => 3,
            ReplayAction::RotateClockwise => 4,
            ReplayAction::RotateCounterClockwise => 5,
            ReplayAction::HardDrop => 6,
            ReplayAction::Gravity => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ReplayAction::Left),
            2 => Some(ReplayAction::Right),
            3 => Some(ReplayAction::Down),
            4 => Some(ReplayAction::RotateClockwise),
            5 => Some(ReplayAction::RotateCounterClockwise),
            6 => Some(ReplayAction::HardDrop),
            7 => Some(ReplayAction::Gravity),
            _ => None,
        }
    }

    /// The player input this action came from, `None` for gravity.
    pub fn input(&self) -> Option<InputKind> {
        match self {
            ReplayAction::Left => Some(InputKind::Left),
            ReplayAction::Right => Some(InputKind::Right),
            ReplayAction::Down => Some(InputKind::Down),
            ReplayAction::RotateClockwise => Some(InputKind::RotateClockwise),
            ReplayAction::RotateCounterClockwise => Some(InputKind::RotateCounterClockwise),
            ReplayAction::HardDrop => Some(InputKind::HardDrop),
            ReplayAction::Gravity => None,
        }
    }
}

impl From<InputKind> for ReplayAction {
    fn from(value: InputKind) -> Self {
        match value {
            InputKind::Left => ReplayAction::Left,
            InputKind::Right => ReplayAction::Right,
            InputKind::Down => ReplayAction::Down,
            InputKind::RotateClockwise => ReplayAction::RotateClockwise,
            InputKind::RotateCounterClockwise => ReplayAction::RotateCounterClockwise,
            InputKind::HardDrop => ReplayAction::HardDrop,
        }
    }
}

/// Block rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn code(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Legendary => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Cosmetic trait carried by rare and legendary blocks.
///
/// Effects have no gameplay rules; they are part of the block identity so a
/// spectator replaying the seed sees the same special blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialEffect {
    Glow,
    Sparkle,
    Prism,
}

impl SpecialEffect {
    pub const ALL: [SpecialEffect; 3] = [
        SpecialEffect::Glow,
        SpecialEffect::Sparkle,
        SpecialEffect::Prism,
    ];

    pub fn code(&self) -> u8 {
        match self {
            SpecialEffect::Glow => 1,
            SpecialEffect::Sparkle => 2,
            SpecialEffect::Prism => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialEffect::Glow => "glow",
            SpecialEffect::Sparkle => "sparkle",
            SpecialEffect::Prism => "prism",
        }
    }
}

/// A filled cell on the board.
///
/// The board stores `Option<Cell>`; `None` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub color_id: u8,
    pub block_type_id: u8,
}

/// Session lifecycle: `New → Playing → Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    New,
    Playing,
    Ended,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::New => "new",
            GameStatus::Playing => "playing",
            GameStatus::Ended => "ended",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    /// The next block could not be placed at the spawn position
    TopOut,
    /// A fixed block sequence ran out
    SequenceExhausted,
}
