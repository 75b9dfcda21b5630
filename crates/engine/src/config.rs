//! Engine configuration
//!
//! Nothing here changes simulation results: the replay bound only limits how
//! much work a verifier accepts, and the gravity base only rescales the
//! cadence suggested to hosts.

use std::env;

use crate::types::BASE_GRAVITY_MS;

/// Default upper bound on replay events a verifier will run
pub const DEFAULT_MAX_REPLAY_EVENTS: u32 = 200_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub max_replay_events: u32,
    pub base_gravity_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_replay_events: DEFAULT_MAX_REPLAY_EVENTS,
            base_gravity_ms: BASE_GRAVITY_MS,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `BLOCKTRIS_MAX_REPLAY_EVENTS`
    /// - `BLOCKTRIS_GRAVITY_MS`
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_replay_events = lookup("BLOCKTRIS_MAX_REPLAY_EVENTS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_replay_events);

        let base_gravity_ms = lookup("BLOCKTRIS_GRAVITY_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.base_gravity_ms);

        Self {
            max_replay_events,
            base_gravity_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_from_env() {
        let _config = EngineConfig::from_env();
    }

    #[test]
    fn lookup_overrides_and_falls_back() {
        let config = EngineConfig::from_lookup(|key| match key {
            "BLOCKTRIS_MAX_REPLAY_EVENTS" => Some(" 500 ".to_string()),
            "BLOCKTRIS_GRAVITY_MS" => Some("fast".to_string()),
            _ => None,
        });
        assert_eq!(config.max_replay_events, 500);
        assert_eq!(config.base_gravity_ms, BASE_GRAVITY_MS);

        let zero = EngineConfig::from_lookup(|key| {
            (key == "BLOCKTRIS_GRAVITY_MS").then(|| "0".to_string())
        });
        assert_eq!(zero, EngineConfig::default());
    }
}
