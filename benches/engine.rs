//! Benchmarks for the evolution engine.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use pareto_seq::{EvolutionConfig, EvolutionEngine, SequenceEvaluator};

fn bench_engine_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_run");

    for size in [8, 16, 32, 64] {
        let config = EvolutionConfig {
            population_size: size,
            generation_count: 10,
            max_genes: 40,
            block_action_size: 2,
            gene_range: 512.0,
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| {
                let mut engine =
                    EvolutionEngine::new(config.clone(), SequenceEvaluator).unwrap();
                engine.run().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine_run);
criterion_main!(benches);
