use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rand::{Rng, thread_rng};
use coup_engine::{Game, GameConfig};

fn complete_game(num_players: usize, seed: u64) {
    let config = GameConfig::new(num_players).with_seed(seed);
    let mut game = black_box(Game::with_random_players(config).unwrap());
    game.play_to_end(Some(10_000)).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = thread_rng();
    let mut group = c.benchmark_group("complete_game");
    for num_players in 3..=6usize {
        group.bench_with_input(BenchmarkId::from_parameter(num_players), &num_players, |b, &num_players| {
            b.iter(|| complete_game(num_players, rng.gen()))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
