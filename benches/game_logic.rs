use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blocktris::core::shape::builtin_block;
use blocktris::core::{try_rotate, Board, BlockSource};
use blocktris::engine::{verify_claim, Engine, EngineConfig};
use blocktris::types::{Cell, InputKind, Rotation};

fn finished_engine(seed: u64) -> Engine {
    let mut engine = Engine::new("bench", Some(seed), None).unwrap();
    let mut i = 0u32;
    while !engine.is_game_over() {
        let kind = match i % 5 {
            0 => InputKind::Left,
            1 => InputKind::RotateClockwise,
            2 => InputKind::Right,
            3 => InputKind::Down,
            _ => InputKind::HardDrop,
        };
        engine.handle_input(kind);
        i += 1;
    }
    engine
}

fn bench_gravity_tick(c: &mut Criterion) {
    let mut engine = Engine::new("bench", Some(12345), None).unwrap();
    engine.handle_input(InputKind::Left);

    c.bench_function("gravity_tick", |b| {
        b.iter(|| {
            if !engine.tick() {
                engine.handle_input(InputKind::HardDrop);
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let filled = Some(Cell {
        color_id: 0,
        block_type_id: 0,
    });
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, filled);
                }
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_next_block(c: &mut Criterion) {
    let source = BlockSource::new(Some(12345), None).unwrap();
    let mut cursor = 0u32;

    c.bench_function("next_block", |b| {
        b.iter(|| {
            cursor = cursor.wrapping_add(1);
            black_box(source.next_block(black_box(cursor)).ok());
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let board = Board::new();
    let t = builtin_block(2);

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            try_rotate(&t, Rotation::North, black_box(4), 8, true, |r, x, y| {
                board.can_place(&t, r, (x, y))
            })
        })
    });
}

fn bench_finalize_and_verify(c: &mut Criterion) {
    let finished = finished_engine(12345);
    let game = finished.clone().finalize_game().unwrap();
    let config = EngineConfig::default();

    c.bench_function("finalize_game", |b| {
        b.iter(|| {
            let mut fresh = finished.clone();
            black_box(fresh.finalize_game().unwrap());
        })
    });

    c.bench_function("verify_claim", |b| {
        b.iter(|| verify_claim(&game.game_data, black_box(&game.replay_data), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_gravity_tick,
    bench_line_clear,
    bench_next_block,
    bench_try_rotate,
    bench_finalize_and_verify
);
criterion_main!(benches);
