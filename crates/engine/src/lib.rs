//! Host-facing engine: the [`Engine`] facade, replay verification and
//! environment-driven configuration.
//!
//! ```
//! use blocktris_engine::{verify_claim, Engine, EngineConfig};
//!
//! let mut engine = Engine::new("demo", Some(42), None).unwrap();
//! while !engine.is_game_over() {
//!     engine.handle_input_str("hardDrop");
//! }
//! let game = engine.finalize_game().unwrap();
//!
//! let verified = verify_claim(&game.game_data, &game.replay_data, &EngineConfig::default()).unwrap();
//! assert_eq!(verified.game_data.hash, game.game_data.hash);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod verify;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use config::EngineConfig;
pub use engine::{Engine, EngineSnapshot, FinalizedGame, GameData};
pub use error::{EngineError, VerifyError};
pub use verify::{verify_claim, verify_replay, VerifiedGame};
