//! BlockTris (workspace facade crate).
//!
//! Re-exports the dedicated crates under `crates/` as
//! `blocktris::{types, core, engine}`.

pub use blocktris_core as core;
pub use blocktris_engine as engine;
pub use blocktris_types as types;
