//! Snapshot module - point-in-time read model for hosts
//!
//! A `GameSnapshot` is a plain copy of everything a renderer needs. It owns
//! its data, so holding one never borrows the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::{BlockDefinition, CellOffset};
use crate::types::{Cell, EndReason, GameStatus, Rotation, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Locked cells, rows top to bottom
    pub board: Vec<Vec<Option<Cell>>>,
    pub current_block: Option<BlockDefinition>,
    pub current_block_position: Option<Position>,
    pub current_rotation: Rotation,
    /// Occupied offsets of the current block in its current rotation
    pub current_cells: Vec<CellOffset>,
    pub ghost_y: Option<i8>,
    pub next_block: Option<BlockDefinition>,
    pub score: u64,
    pub lines_cleared: u32,
    pub level: u32,
    pub game_over: bool,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub replay_len: u32,
}

impl GameSnapshot {
    /// Absolute board coordinates covered by the current block
    pub fn active_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let origin = self.current_block_position;
        self.current_cells
            .iter()
            .filter_map(move |&(dx, dy)| origin.map(|p| (p.x + dx, p.y + dy)))
    }
}

/// Plain-text board: `.` empty, `#` locked, `@` the falling block.
impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active: Vec<(i8, i8)> = self.active_cells().collect();
        for (y, row) in self.board.iter().enumerate() {
            let line: String = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    if active.contains(&(x as i8, y as i8)) {
                        '@'
                    } else if cell.is_some() {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            writeln!(f, "|{line}|")?;
        }
        writeln!(f, "+{}+", "-".repeat(BOARD_WIDTH as usize))?;
        write!(
            f,
            "score {}  lines {}  level {}  status {}",
            self.score,
            self.lines_cleared,
            self.level,
            self.status.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::sequencer::BlockSource;
    use crate::simulation::Simulation;
    use crate::types::InputKind;

    #[test]
    fn display_overlays_the_falling_block() {
        let mut sim = Simulation::new("g", BlockSource::new(Some(3), None).unwrap()).unwrap();
        sim.handle_input(InputKind::HardDrop);
        let snap = sim.snapshot();
        let text = snap.to_string();
        assert_eq!(text.matches('@').count(), 4);
        assert_eq!(text.matches('#').count(), 4);
        assert!(text.ends_with("status playing"));
    }

    #[test]
    fn snapshot_serializes_with_host_field_names() {
        let sim = Simulation::new("g", BlockSource::new(Some(3), None).unwrap()).unwrap();
        let json = serde_json::to_value(sim.snapshot()).unwrap();
        assert_eq!(json["gameOver"], false);
        assert_eq!(json["status"], "new");
        assert!(json["currentBlock"].is_null());
        assert!(json["nextBlock"]["shape"].is_array());
    }
}
