//! Property tests for the engine.
//!
//! Run more cases with: PROPTEST_CASES=2000 cargo test --release prop_engine

use proptest::prelude::*;

use blocktris::core::{Board, Simulation, BlockSource};
use blocktris::engine::{verify_claim, Engine, EngineConfig};
use blocktris::types::{Cell, InputKind, ReplayAction, BOARD_HEIGHT, BOARD_WIDTH};

/// Scripted step: a player input or a gravity tick
#[derive(Debug, Clone, Copy)]
enum Step {
    Input(InputKind),
    Gravity,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => prop::sample::select(InputKind::ALL.to_vec()).prop_map(Step::Input),
        1 => Just(Step::Gravity),
    ]
}

fn run(engine: &mut Engine, steps: &[Step]) {
    for step in steps {
        match *step {
            Step::Input(kind) => {
                engine.handle_input(kind);
            }
            Step::Gravity => {
                engine.tick();
            }
        }
    }
}

fn finish(engine: &mut Engine) {
    while !engine.is_game_over() {
        engine.handle_input(InputKind::HardDrop);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn identical_inputs_give_identical_commitments(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..300),
    ) {
        let mut a = Engine::new("prop", Some(seed), None).unwrap();
        let mut b = Engine::new("prop", Some(seed), None).unwrap();
        run(&mut a, &steps);
        run(&mut b, &steps);
        prop_assert_eq!(a.snapshot(), b.snapshot());

        finish(&mut a);
        finish(&mut b);
        prop_assert_eq!(a.finalize_game().unwrap(), b.finalize_game().unwrap());
    }

    #[test]
    fn counters_are_monotonic(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..400),
    ) {
        let mut engine = Engine::new("mono", Some(seed), None).unwrap();
        let mut last = (0u64, 0u32, 0u32);
        for step in &steps {
            run(&mut engine, std::slice::from_ref(step));
            let now = (engine.score(), engine.lines_cleared(), engine.level());
            prop_assert!(now.0 >= last.0);
            prop_assert!(now.1 >= last.1);
            prop_assert!(now.2 >= last.2);
            last = now;
        }
    }

    #[test]
    fn rejected_inputs_change_nothing(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        // Covers the first input too: a refused one must not start the game.
        let mut engine = Engine::new("reject", Some(seed), None).unwrap();
        for step in &steps {
            let before = engine.snapshot();
            let accepted = match *step {
                Step::Input(kind) => engine.handle_input(kind),
                Step::Gravity => engine.tick(),
            };
            if !accepted {
                prop_assert_eq!(engine.snapshot(), before);
            } else {
                prop_assert_eq!(engine.snapshot().replay_len, before.replay_len + 1);
            }
        }
    }

    #[test]
    fn finalize_is_idempotent_and_verifiable(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..150),
    ) {
        let mut engine = Engine::new("final", Some(seed), None).unwrap();
        run(&mut engine, &steps);
        finish(&mut engine);
        let first = engine.finalize_game().unwrap();
        let second = engine.finalize_game().unwrap();
        prop_assert_eq!(&first, &second);

        let verified = verify_claim(&first.game_data, &first.replay_data, &EngineConfig::default());
        prop_assert!(verified.is_ok(), "{:?}", verified.err());
    }

    #[test]
    fn replaying_the_log_rebuilds_the_board(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..200),
    ) {
        let mut engine = Engine::new("rebuild", Some(seed), None).unwrap();
        run(&mut engine, &steps);

        let log = engine.replay_data();
        let mut sim = Simulation::new("rebuild", BlockSource::new(Some(seed), None).unwrap()).unwrap();
        for event in &log.events {
            prop_assert!(sim.apply_recorded(event.action));
        }
        prop_assert_eq!(sim.board(), engine.board());
        prop_assert_eq!(sim.score(), engine.score());
        prop_assert_eq!(sim.recorder().hash(), log.hash());
    }

    #[test]
    fn one_full_row_is_removed_and_rows_shift(
        target in 0usize..BOARD_HEIGHT as usize,
        holes in prop::collection::vec(0u8..BOARD_WIDTH, BOARD_HEIGHT as usize),
        fill_seed in any::<u64>(),
    ) {
        let mut board = Board::new();
        let filled = Some(Cell { color_id: 1, block_type_id: 1 });
        for y in 0..BOARD_HEIGHT as usize {
            for x in 0..BOARD_WIDTH {
                let keep_hole = y != target && x == holes[y];
                let pseudo = (fill_seed >> ((x as usize + y) % 64)) & 1 == 1;
                if !keep_hole && (y == target || pseudo) {
                    board.set(x as i8, y as i8, filled);
                }
            }
        }
        let before: Vec<Vec<Option<Cell>>> = board.rows().map(|r| r.to_vec()).collect();

        let cleared = board.clear_full_rows();
        prop_assert_eq!(cleared.as_slice(), &[target]);

        let after: Vec<Vec<Option<Cell>>> = board.rows().map(|r| r.to_vec()).collect();
        prop_assert_eq!(after.len(), BOARD_HEIGHT as usize);
        prop_assert!(after[0].iter().all(|c| c.is_none()));
        for y in 1..=target {
            prop_assert_eq!(&after[y], &before[y - 1]);
        }
        for y in target + 1..BOARD_HEIGHT as usize {
            prop_assert_eq!(&after[y], &before[y]);
        }
    }
}

#[test]
fn gravity_is_recorded_as_its_own_action() {
    let mut engine = Engine::new("g", Some(5), None).unwrap();
    engine.handle_input(InputKind::Left);
    assert!(engine.tick());
    let log = engine.replay_data();
    assert_eq!(log.events[1].action, ReplayAction::Gravity);
}
