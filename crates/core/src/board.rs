//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the identity of
//! the block that locked there. Uses a flat array for cache locality and
//! zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::hash::{sha256, Hash32};
use crate::shape::BlockDefinition;
use crate::types::{Cell, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Length of [`Board::canonical_bytes`]: 2 header bytes plus 3 per cell
pub const CANONICAL_BOARD_LEN: usize = 2 + 3 * BOARD_SIZE;

/// Rows removed by one clear, bottom to top
pub type ClearedRows = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Option<Cell>; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Option<Cell>> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Meant for test setup; gameplay writes go
    /// through [`Board::place`].
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Option<Cell>) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Every occupied cell of the rotated shape at `position` is in bounds
    /// and unoccupied.
    pub fn can_place(
        &self,
        definition: &BlockDefinition,
        rotation: Rotation,
        (x, y): (i8, i8),
    ) -> bool {
        definition
            .shape
            .cells(rotation)
            .iter()
            .all(|&(dx, dy)| self.is_free(x + dx, y + dy))
    }

    /// Write the block's cells onto the board.
    ///
    /// # Panics
    ///
    /// Panics if the placement is not legal. Callers check
    /// [`Board::can_place`] first.
    pub fn place(&mut self, definition: &BlockDefinition, rotation: Rotation, (x, y): (i8, i8)) {
        assert!(
            self.can_place(definition, rotation, (x, y)),
            "illegal placement of block {} at ({x}, {y})",
            definition.block_type_id
        );
        let cell = definition.cell();
        for &(dx, dy) in definition.shape.cells(rotation).iter() {
            self.set(x + dx, y + dy, Some(cell));
        }
    }

    /// Clear all full rows and return the row indices that were cleared
    /// (bottom to top, as they were before compaction).
    /// Two-pointer compaction, no allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Fresh empty rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }

    /// Rows top to bottom, for renderers and snapshots
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Height of the stack in column `x` (0 for an empty column)
    pub fn column_height(&self, x: u8) -> u8 {
        (0..BOARD_HEIGHT)
            .find(|&y| self.is_occupied(x, y))
            .map_or(0, |top| BOARD_HEIGHT - top)
    }

    fn is_occupied(&self, x: u8, y: u8) -> bool {
        matches!(self.get(x as i8, y as i8), Some(Some(_)))
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Fixed-width encoding: `[width, height]`, then per cell in row-major
    /// order `[0, 0, 0]` when empty or `[1, block_type_id, color_id]`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CANONICAL_BOARD_LEN);
        out.push(BOARD_WIDTH);
        out.push(BOARD_HEIGHT);
        for cell in &self.cells {
            match cell {
                None => out.extend_from_slice(&[0, 0, 0]),
                Some(c) => out.extend_from_slice(&[1, c.block_type_id, c.color_id]),
            }
        }
        out
    }

    pub fn state_hash(&self) -> Hash32 {
        sha256(&self.canonical_bytes())
    }

    /// Build a board from ASCII rows for tests: `.` is empty, any other
    /// character fills the cell with block type and color 0.
    #[cfg(test)]
    pub(crate) fn from_art(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let offset = BOARD_HEIGHT as usize - rows.len();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c != '.' {
                    board.set(
                        x as i8,
                        (y + offset) as i8,
                        Some(Cell {
                            color_id: 0,
                            block_type_id: 0,
                        }),
                    );
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
