//! Replay module - ordered log of accepted actions
//!
//! The recorder only ever sees actions the controller accepted, so replaying
//! a log through a fresh session reproduces the board exactly. Once the
//! session ends the recorder is sealed.

use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::hash::{sha256, Hash32};
use crate::sequencer::BlockSource;
use crate::shape::BlockDefinition;
use crate::types::ReplayAction;

/// Current replay format version
pub const REPLAY_VERSION: u8 = 1;

/// Leading bytes of [`ReplayLog::canonical_bytes`]
pub const REPLAY_MAGIC: &[u8; 4] = b"BTRP";

/// One accepted action. Ordinals are contiguous from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    pub ordinal: u32,
    pub action: ReplayAction,
}

/// A self-contained replay: block source plus the accepted actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayLog {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_sequence: Option<Vec<BlockDefinition>>,
    pub events: Vec<InputEvent>,
}

impl ReplayLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// `BTRP`, version byte, event count u32 LE, then per event the ordinal
    /// u32 LE and the action code.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        encode_events(self.version, &self.events)
    }

    pub fn hash(&self) -> Hash32 {
        sha256(&self.canonical_bytes())
    }

    /// First ordinal that breaks the `0, 1, 2, ...` run, if any
    pub fn first_gap(&self) -> Option<(usize, u32)> {
        self.events
            .iter()
            .enumerate()
            .find(|(i, e)| e.ordinal as usize != *i)
            .map(|(i, e)| (i, e.ordinal))
    }
}

fn encode_events(version: u8, events: &[InputEvent]) -> Vec<u8> {
    let mut out = Vec::with_capacity(REPLAY_MAGIC.len() + 5 + events.len() * 5);
    out.extend_from_slice(REPLAY_MAGIC);
    out.push(version);
    out.extend_from_slice(&(events.len() as u32).to_le_bytes());
    for event in events {
        out.extend_from_slice(&event.ordinal.to_le_bytes());
        out.push(event.action.code());
    }
    out
}

/// Append-only recorder owned by the controller.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    seed: Option<u64>,
    block_sequence: Option<Vec<BlockDefinition>>,
    events: Vec<InputEvent>,
    sealed: bool,
}

impl ReplayRecorder {
    pub fn new(source: &BlockSource) -> Self {
        Self {
            seed: source.seed(),
            block_sequence: source.definitions().map(<[BlockDefinition]>::to_vec),
            events: Vec::new(),
            sealed: false,
        }
    }

    /// Record an accepted action and return its ordinal.
    pub fn append(&mut self, action: ReplayAction) -> Result<u32, ReplayError> {
        if self.sealed {
            return Err(ReplayError::Sealed {
                len: self.events.len(),
            });
        }
        let ordinal = self.events.len() as u32;
        self.events.push(InputEvent { ordinal, action });
        Ok(ordinal)
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Read-only copy for hosts and verifiers
    pub fn snapshot(&self) -> ReplayLog {
        ReplayLog {
            version: REPLAY_VERSION,
            seed: self.seed,
            block_sequence: self.block_sequence.clone(),
            events: self.events.clone(),
        }
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        encode_events(REPLAY_VERSION, &self.events)
    }

    pub fn hash(&self) -> Hash32 {
        sha256(&self.canonical_bytes())
    }
}
