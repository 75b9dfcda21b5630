//! Replay tests - stored payloads survive JSON and re-verify

use blocktris::core::{InputEvent, ReplayLog};
use blocktris::engine::{verify_claim, verify_replay, Engine, EngineConfig, FinalizedGame, VerifyError};
use blocktris::types::{InputKind, ReplayAction};

fn play_to_end(seed: u64) -> FinalizedGame {
    let mut engine = Engine::new("stored", Some(seed), None).unwrap();
    let script = [
        InputKind::Left,
        InputKind::RotateClockwise,
        InputKind::Down,
        InputKind::HardDrop,
        InputKind::Right,
        InputKind::Right,
        InputKind::RotateCounterClockwise,
        InputKind::HardDrop,
    ];
    let mut i = 0;
    while !engine.is_game_over() {
        engine.handle_input(script[i % script.len()]);
        if i % 4 == 0 {
            engine.tick();
        }
        i += 1;
    }
    engine.finalize_game().unwrap()
}

#[test]
fn finalized_game_round_trips_through_json() {
    let game = play_to_end(11);
    let json = serde_json::to_string(&game).unwrap();
    assert!(json.contains("\"gameData\""));
    assert!(json.contains("\"replayData\""));

    let stored: FinalizedGame = serde_json::from_str(&json).unwrap();
    assert_eq!(stored, game);

    let verified = verify_claim(&stored.game_data, &stored.replay_data, &EngineConfig::default())
        .unwrap();
    assert_eq!(verified.game_data, game.game_data);
    assert_eq!(verified.commitment.combined_hex(), game.game_data.hash);
}

#[test]
fn replay_records_gravity_ticks() {
    let game = play_to_end(12);
    assert!(game
        .replay_data
        .events
        .iter()
        .any(|e| e.action == ReplayAction::Gravity));
    assert!(game
        .replay_data
        .events
        .iter()
        .enumerate()
        .all(|(i, e)| e.ordinal as usize == i));
}

#[test]
fn swapping_an_action_breaks_the_claim() {
    let game = play_to_end(13);
    let mut replay = game.replay_data.clone();
    let idx = replay
        .events
        .iter()
        .position(|e| e.action == ReplayAction::HardDrop)
        .unwrap();
    replay.events[idx].action = ReplayAction::Down;

    assert!(verify_claim(&game.game_data, &replay, &EngineConfig::default()).is_err());
}

#[test]
fn replay_from_another_seed_is_rejected() {
    let game = play_to_end(14);
    let replay = ReplayLog {
        seed: Some(15),
        ..game.replay_data.clone()
    };
    let result = verify_claim(&game.game_data, &replay, &EngineConfig::default());
    assert!(result.is_err());
}

#[test]
fn bare_log_without_an_ending_is_not_finalizable() {
    let replay = ReplayLog {
        version: 1,
        seed: Some(3),
        block_sequence: None,
        events: vec![InputEvent {
            ordinal: 0,
            action: ReplayAction::Left,
        }],
    };
    let err = verify_replay("bare", &replay, &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, VerifyError::NotEnded(_)));
}
