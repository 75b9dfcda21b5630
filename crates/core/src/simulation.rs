//! Simulation module - the game controller
//!
//! Ties together board, block source, scoring and the replay recorder. Every
//! public operation runs to completion before returning, so state observed
//! between calls is never partial.
//!
//! Lifecycle: `New -> Playing -> Ended`. The first accepted input starts the
//! game; a rejected one leaves it `New`, and gravity never starts it. `Ended`
//! is terminal and seals the replay recorder.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, ClearedRows};
use crate::error::ConfigurationError;
use crate::replay::ReplayRecorder;
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score, gravity_interval_ms};
use crate::sequencer::BlockSource;
use crate::shape::{try_rotate, BlockDefinition};
use crate::snapshot::{GameSnapshot, Position};
use crate::types::{EndReason, GameStatus, InputKind, ReplayAction, Rotation};

/// The falling block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlock {
    pub definition: BlockDefinition,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveBlock {
    /// A block at its spawn position in the North orientation
    pub fn spawn(definition: BlockDefinition) -> Self {
        let (x, y) = definition.spawn_position();
        Self {
            definition,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    pub fn position(&self) -> (i8, i8) {
        (self.x, self.y)
    }

    fn fits_at(&self, board: &Board, dx: i8, dy: i8) -> bool {
        board.can_place(&self.definition, self.rotation, (self.x + dx, self.y + dy))
    }

    /// Rows the block can fall before it rests on something
    fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance = 0;
        while self.fits_at(board, 0, distance + 1) {
            distance += 1;
        }
        distance
    }
}

/// Session counters. Score, lines and level never decrease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub game_id: String,
    pub seed: Option<u64>,
    /// Blocks drawn from the source so far; the preview is the block at this cursor
    pub sequence_cursor: u32,
    pub score: u64,
    pub lines_cleared: u32,
    pub level: u32,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
}

/// What happened on the most recent lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub block_type_id: u8,
    /// Cleared row indices, bottom to top
    pub cleared_rows: ClearedRows,
    pub line_score: u32,
}

impl LockEvent {
    pub fn lines_cleared(&self) -> u32 {
        self.cleared_rows.len() as u32
    }
}

/// Game controller
#[derive(Debug, Clone)]
pub struct Simulation {
    session: GameSession,
    board: Board,
    source: BlockSource,
    active: Option<ActiveBlock>,
    next: Option<BlockDefinition>,
    recorder: ReplayRecorder,
    last_lock: Option<LockEvent>,
}

impl Simulation {
    pub fn new(game_id: impl Into<String>, source: BlockSource) -> Result<Self, ConfigurationError> {
        let game_id = game_id.into();
        if game_id.is_empty() {
            return Err(ConfigurationError::EmptyGameId);
        }
        let next = source.next_block(0).ok();
        Ok(Self {
            session: GameSession {
                game_id,
                seed: source.seed(),
                sequence_cursor: 0,
                score: 0,
                lines_cleared: 0,
                level: 0,
                status: GameStatus::New,
                end_reason: None,
            },
            board: Board::new(),
            recorder: ReplayRecorder::new(&source),
            source,
            active: None,
            next,
            last_lock: None,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn source(&self) -> &BlockSource {
        &self.source
    }

    pub fn active(&self) -> Option<&ActiveBlock> {
        self.active.as_ref()
    }

    pub fn next_block(&self) -> Option<&BlockDefinition> {
        self.next.as_ref()
    }

    pub fn recorder(&self) -> &ReplayRecorder {
        &self.recorder
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn is_over(&self) -> bool {
        self.session.status == GameStatus::Ended
    }

    pub fn score(&self) -> u64 {
        self.session.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.session.lines_cleared
    }

    pub fn level(&self) -> u32 {
        self.session.level
    }

    pub fn last_lock(&self) -> Option<&LockEvent> {
        self.last_lock.as_ref()
    }

    /// Take and clear the last lock event.
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Suggested gravity cadence for the current level
    pub fn gravity_interval_ms(&self) -> u32 {
        gravity_interval_ms(self.session.level)
    }

    /// Row the active block would land on
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active.as_ref()?;
        Some(active.y + active.drop_distance(&self.board))
    }

    /// Leave `New` and spawn the first block. No-op in any other state.
    pub fn start(&mut self) -> bool {
        if self.session.status != GameStatus::New {
            return false;
        }
        self.session.status = GameStatus::Playing;
        info!(game_id = %self.session.game_id, seed = ?self.session.seed, "game started");
        self.spawn();
        true
    }

    /// Apply a player input. Returns whether it changed state; only accepted
    /// inputs are recorded.
    pub fn handle_input(&mut self, kind: InputKind) -> bool {
        self.advance(kind.into(), true)
    }

    /// One gravity step: fall a row or lock. Returns false (and records
    /// nothing) unless the game is playing with an active block.
    pub fn gravity_tick(&mut self) -> bool {
        self.advance(ReplayAction::Gravity, false)
    }

    /// Replay path: starts the game like an input would, then applies the
    /// recorded action.
    pub fn apply_recorded(&mut self, action: ReplayAction) -> bool {
        self.advance(action, true)
    }

    fn advance(&mut self, action: ReplayAction, start_if_new: bool) -> bool {
        if self.session.status == GameStatus::Ended {
            return false;
        }
        // Start provisionally; a refused first input restores `New`.
        let before_start = (start_if_new && self.session.status == GameStatus::New)
            .then(|| self.clone());
        if before_start.is_some() {
            self.start();
        }
        if self.active.is_none() {
            if let Some(before) = before_start {
                *self = before;
            }
            return false;
        }

        let accepted = match action {
            ReplayAction::Left => self.try_shift(-1),
            ReplayAction::Right => self.try_shift(1),
            ReplayAction::Down => {
                if self.try_fall() {
                    self.session.score += u64::from(calculate_drop_score(1, false));
                } else {
                    self.lock();
                }
                true
            }
            ReplayAction::RotateClockwise => self.try_rotate(true),
            ReplayAction::RotateCounterClockwise => self.try_rotate(false),
            ReplayAction::HardDrop => {
                self.hard_drop();
                true
            }
            ReplayAction::Gravity => {
                if !self.try_fall() {
                    self.lock();
                }
                true
            }
        };

        if !accepted {
            if let Some(before) = before_start {
                debug!(?action, "first input refused, game stays new");
                *self = before;
            }
            return false;
        }
        if let Err(error) = self.recorder.append(action) {
            warn!(%error, ?action, "replay recorder refused an accepted action");
        }
        if self.session.status == GameStatus::Ended {
            self.recorder.seal();
        }
        true
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        match self.active.as_mut() {
            Some(active) if active.fits_at(&self.board, dx, 0) => {
                active.x += dx;
                true
            }
            _ => false,
        }
    }

    fn try_fall(&mut self) -> bool {
        match self.active.as_mut() {
            Some(active) if active.fits_at(&self.board, 0, 1) => {
                active.y += 1;
                true
            }
            _ => false,
        }
    }

    fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let board = &self.board;
        let definition = &active.definition;
        let outcome = try_rotate(
            definition,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |rotation, x, y| board.can_place(definition, rotation, (x, y)),
        );
        match outcome {
            Some(outcome) => {
                active.rotation = outcome.rotation;
                active.x = outcome.x;
                active.y = outcome.y;
                true
            }
            None => false,
        }
    }

    fn hard_drop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            let distance = active.drop_distance(&self.board);
            active.y += distance;
            self.session.score += u64::from(calculate_drop_score(distance as u32, true));
        }
        self.lock();
    }

    fn lock(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .place(&active.definition, active.rotation, active.position());
        let cleared_rows = self.board.clear_full_rows();
        let lines = cleared_rows.len() as u32;

        // The multiplier uses the level in force before this clear.
        let line_score = calculate_line_score(cleared_rows.len(), self.session.level);
        self.session.score += u64::from(line_score);
        self.session.lines_cleared += lines;
        self.session.level = calculate_level(self.session.lines_cleared);

        debug!(
            block_type_id = active.definition.block_type_id,
            x = active.x,
            y = active.y,
            lines,
            line_score,
            score = self.session.score,
            "block locked"
        );

        self.last_lock = Some(LockEvent {
            block_type_id: active.definition.block_type_id,
            cleared_rows,
            line_score,
        });

        self.spawn();
    }

    fn spawn(&mut self) {
        let cursor = self.session.sequence_cursor;
        let definition = match self.source.next_block(cursor) {
            Ok(definition) => definition,
            Err(exhausted) => {
                debug!(%exhausted, "no block to spawn");
                self.end(EndReason::SequenceExhausted);
                return;
            }
        };
        self.session.sequence_cursor = cursor + 1;
        self.next = self.source.peek(cursor);

        let block = ActiveBlock::spawn(definition);
        if !block.fits_at(&self.board, 0, 0) {
            debug!(block_type_id = block.definition.block_type_id, "spawn blocked");
            self.end(EndReason::TopOut);
            return;
        }
        debug!(
            cursor,
            block_type_id = block.definition.block_type_id,
            rarity = block.definition.rarity.as_str(),
            "block spawned"
        );
        self.active = Some(block);
    }

    fn end(&mut self, reason: EndReason) {
        self.active = None;
        self.session.status = GameStatus::Ended;
        self.session.end_reason = Some(reason);
        info!(
            game_id = %self.session.game_id,
            ?reason,
            score = self.session.score,
            lines = self.session.lines_cleared,
            "game over"
        );
    }

    /// Consistent read-only view for hosts
    pub fn snapshot(&self) -> GameSnapshot {
        let active = self.active.as_ref();
        GameSnapshot {
            board: self.board.rows().map(<[_]>::to_vec).collect(),
            current_block: active.map(|a| a.definition.clone()),
            current_block_position: active.map(|a| Position { x: a.x, y: a.y }),
            current_rotation: active.map_or(Rotation::North, |a| a.rotation),
            current_cells: active
                .map(|a| a.definition.shape.cells(a.rotation))
                .unwrap_or_else(ArrayVec::new)
                .to_vec(),
            ghost_y: self.ghost_y(),
            next_block: self.next.clone(),
            score: self.session.score,
            lines_cleared: self.session.lines_cleared,
            level: self.session.level,
            game_over: self.is_over(),
            status: self.session.status,
            end_reason: self.session.end_reason,
            replay_len: self.recorder.len() as u32,
        }
    }
}
