use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use conquest_core::combat::resolve;
use conquest_core::core::config::{CombatConfig, GeneratorConfig};
use conquest_core::core::types::{Army, CountryId};
use conquest_core::simulation::plan_attacks;

fn bench_plan_attacks(c: &mut Criterion) {
    let config = GeneratorConfig::default();
    let mut group = c.benchmark_group("plan_attacks");

    for count in [10usize, 200, 2_000] {
        let countries: Vec<CountryId> = (0..count)
            .map(|i| CountryId::new(format!("C{}", i)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &countries, |b, countries| {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| plan_attacks(&mut rng, black_box(countries), &config));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let config = CombatConfig::default();
    let defender = Army::new(3_000, 100, 20, 20);
    let force = Army::new(100, 10, 2, 2);

    c.bench_function("resolve", |b| {
        b.iter(|| resolve(black_box(&defender), black_box(&force), &config))
    });
}

criterion_group!(benches, bench_plan_attacks, bench_resolve);
criterion_main!(benches);
