//! Shape module - block definitions, derived rotations and wall kicks
//!
//! A block is described by a boolean matrix in its spawn orientation. The
//! other three orientations are derived by rotating that matrix clockwise, so
//! a definition never stores more than one matrix.
//!
//! Coordinates are `(x, y)` offsets from the top-left of the rotated bounding
//! box, with `y` growing downward.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::{ShapeEdge, ShapeError};
use crate::types::{
    Cell, Rarity, Rotation, SpecialEffect, BOARD_WIDTH, MAX_SHAPE_CELLS, MAX_SHAPE_SPAN,
};

/// Offset of a single cell relative to the bounding box origin
pub type CellOffset = (i8, i8);

/// Occupied cells of one orientation, stack allocated
pub type ShapeCells = ArrayVec<CellOffset, MAX_SHAPE_CELLS>;

/// Rectangular matrix of occupied flags, rows top to bottom.
///
/// Construction validates the matrix: rectangular, at most
/// `MAX_SHAPE_SPAN` on each side, and trimmed so every edge row and column
/// has an occupied cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct ShapeMatrix {
    rows: Vec<Vec<bool>>,
}

impl ShapeMatrix {
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self, ShapeError> {
        let expected = rows.first().map(|r| r.len()).ok_or(ShapeError::Empty)?;
        if expected == 0 {
            return Err(ShapeError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(ShapeError::NotRectangular {
                    row,
                    width: cells.len(),
                    expected,
                });
            }
        }
        if expected > MAX_SHAPE_SPAN as usize || rows.len() > MAX_SHAPE_SPAN as usize {
            return Err(ShapeError::TooLarge {
                width: expected,
                height: rows.len(),
                max: MAX_SHAPE_SPAN,
            });
        }
        if !rows.iter().flatten().any(|&filled| filled) {
            return Err(ShapeError::NoOccupiedCells);
        }
        let column_used = |x: usize| rows.iter().any(|row| row[x]);
        let edges = [
            (ShapeEdge::Top, rows[0].iter().any(|&f| f)),
            (ShapeEdge::Bottom, rows[rows.len() - 1].iter().any(|&f| f)),
            (ShapeEdge::Left, column_used(0)),
            (ShapeEdge::Right, column_used(expected - 1)),
        ];
        if let Some(&(edge, _)) = edges.iter().find(|(_, used)| !used) {
            return Err(ShapeError::UntrimmedEdge { edge });
        }
        Ok(Self { rows })
    }

    /// Build from ASCII art, `#` marks an occupied cell.
    ///
    /// ```
    /// use blocktris_core::shape::ShapeMatrix;
    ///
    /// let t = ShapeMatrix::from_art(&[".#.", "###"]).unwrap();
    /// assert_eq!((t.width(), t.height()), (3, 2));
    /// assert!(ShapeMatrix::from_art(&["...", "..."]).is_err());
    /// ```
    pub fn from_art(art: &[&str]) -> Result<Self, ShapeError> {
        Self::new(art_rows(art))
    }

    pub fn width(&self) -> u8 {
        self.rows[0].len() as u8
    }

    pub fn height(&self) -> u8 {
        self.rows.len() as u8
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Bounding box `(width, height)` for a rotation
    pub fn dims(&self, rotation: Rotation) -> (u8, u8) {
        if rotation.index() % 2 == 0 {
            (self.width(), self.height())
        } else {
            (self.height(), self.width())
        }
    }

    /// Occupied cells for a rotation, in row-major order of the spawn matrix.
    pub fn cells(&self, rotation: Rotation) -> ShapeCells {
        let w = self.width() as i8;
        let h = self.height() as i8;
        let mut out = ShapeCells::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &filled) in row.iter().enumerate() {
                if filled {
                    out.push(rotate_offset((x as i8, y as i8), w, h, rotation));
                }
            }
        }
        out
    }

    /// Rotation family, derived from the matrix itself
    pub fn family(&self) -> RotationFamily {
        let (w, h) = (self.width(), self.height());
        if w == h {
            let mut north = self.cells(Rotation::North);
            let mut east = self.cells(Rotation::East);
            north.sort_unstable();
            east.sort_unstable();
            if north == east {
                return RotationFamily::Fixed;
            }
        }
        if w.min(h) == 1 && w.max(h) >= 4 {
            RotationFamily::Line
        } else {
            RotationFamily::Standard
        }
    }

    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(self.width());
        out.push(self.height());
        out.extend(self.rows.iter().flatten().map(|&filled| u8::from(filled)));
    }
}

impl TryFrom<Vec<Vec<bool>>> for ShapeMatrix {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<ShapeMatrix> for Vec<Vec<bool>> {
    fn from(value: ShapeMatrix) -> Self {
        value.rows
    }
}

fn art_rows(art: &[&str]) -> Vec<Vec<bool>> {
    art.iter()
        .map(|line| line.chars().map(|c| c == '#').collect())
        .collect()
}

/// Map a spawn-orientation offset into a rotated bounding box.
///
/// `w`/`h` are the spawn matrix dimensions.
fn rotate_offset((x, y): CellOffset, w: i8, h: i8, rotation: Rotation) -> CellOffset {
    match rotation {
        Rotation::North => (x, y),
        Rotation::East => (h - 1 - y, x),
        Rotation::South => (w - 1 - x, h - 1 - y),
        Rotation::West => (y, w - 1 - x),
    }
}

/// How a shape rotates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationFamily {
    /// Identical under rotation (squares, single cells); rotation is refused
    Fixed,
    /// Straight bars of length 4 or more
    Line,
    /// Everything else
    Standard,
}

/// One block in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    pub block_type_id: u8,
    pub shape: ShapeMatrix,
    pub color_id: u8,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialEffect>,
}

impl BlockDefinition {
    /// A common block with no special effect
    pub fn new(block_type_id: u8, shape: ShapeMatrix, color_id: u8) -> Self {
        Self {
            block_type_id,
            shape,
            color_id,
            rarity: Rarity::Common,
            special: None,
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity, special: Option<SpecialEffect>) -> Self {
        self.rarity = rarity;
        self.special = special;
        self
    }

    /// The board cell this block leaves behind when it locks
    pub fn cell(&self) -> Cell {
        Cell {
            color_id: self.color_id,
            block_type_id: self.block_type_id,
        }
    }

    /// Top-center spawn position for the North orientation
    pub fn spawn_position(&self) -> (i8, i8) {
        let w = self.shape.width() as i8;
        ((BOARD_WIDTH as i8 - w) / 2, 0)
    }

    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(self.block_type_id);
        out.push(self.color_id);
        out.push(self.rarity.code());
        out.push(self.special.map_or(0, |s| s.code()));
        self.shape.write_canonical(out);
    }
}

/// Number of built-in block families
pub const FAMILY_COUNT: usize = 7;

/// Built-in family names, indexed by `block_type_id`
pub const FAMILY_NAMES: [&str; FAMILY_COUNT] = ["I", "O", "T", "S", "Z", "J", "L"];

const FAMILY_ART: [&[&str]; FAMILY_COUNT] = [
    &["####"],
    &["##", "##"],
    &[".#.", "###"],
    &[".##", "##."],
    &["##.", ".##"],
    &["#..", "###"],
    &["..#", "###"],
];

/// The common-rarity definition of a built-in family.
///
/// `block_type_id` and `color_id` both equal the family index.
pub fn builtin_block(family: usize) -> BlockDefinition {
    let family = family % FAMILY_COUNT;
    BlockDefinition::new(
        family as u8,
        ShapeMatrix {
            rows: art_rows(FAMILY_ART[family]),
        },
        family as u8,
    )
}

/// Wall kick offsets, tried in order after the pivot adjustment.
/// Indexed by `kick_index(from, clockwise)`.
pub type KickTable = [[CellOffset; 5]; 8];

fn kick_table(family: RotationFamily) -> &'static KickTable {
    match family {
        RotationFamily::Line => &LINE_KICKS,
        RotationFamily::Standard | RotationFamily::Fixed => &STANDARD_KICKS,
    }
}

const STANDARD_KICKS: KickTable = [
    // N->E
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // N->W
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // E->N
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // E->S
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // S->E
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // S->W
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // W->S
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // W->N
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

const LINE_KICKS: KickTable = [
    // N->E
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // N->W
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // E->N
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // E->S
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // S->E
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // S->W
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // W->S
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // W->N
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

fn kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Result of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// The kick that succeeded, `(0, 0)` for an unkicked rotation
    pub kick: CellOffset,
}

/// Try to rotate a block with wall kicks.
///
/// The bounding box first shifts so its center stays put, then each kick of
/// the family's table is tried in order. `can_place(rotation, x, y)` decides
/// legality. Returns `None` for `Fixed` shapes and when every kick is blocked.
pub fn try_rotate(
    definition: &BlockDefinition,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    can_place: impl Fn(Rotation, i8, i8) -> bool,
) -> Option<RotationOutcome> {
    let family = definition.shape.family();
    if family == RotationFamily::Fixed {
        return None;
    }

    let target = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let (w, h) = definition.shape.dims(rotation);
    let (w, h) = (w as i8, h as i8);
    let pivot_x = x + (w - h) / 2;
    let pivot_y = y + (h - w) / 2;

    let kicks = &kick_table(family)[kick_index(rotation, clockwise)];
    kicks.iter().find_map(|&(dx, dy)| {
        let (nx, ny) = (pivot_x + dx, pivot_y + dy);
        can_place(target, nx, ny).then_some(RotationOutcome {
            rotation: target,
            x: nx,
            y: ny,
            kick: (dx, dy),
        })
    })
}
