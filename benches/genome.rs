use criterion::{criterion_group, criterion_main, Criterion};
use genome_core::evolution::{advanced_crossover, MutagenicFactors};
use genome_core::{GeneticsConfig, Genome};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_genome(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let p1 = Genome::founder_with(GeneticsConfig::default(), &mut rng);
    let p2 = Genome::founder_with(GeneticsConfig::default(), &mut rng);
    let factors = MutagenicFactors::new();

    c.bench_function("mutation_tick_pressure_0.8", |b| {
        let mut genome = p1.clone();
        b.iter(|| genome.advanced_mutation(0.8, &factors, &mut rng))
    });

    c.bench_function("crossover_founders", |b| {
        b.iter(|| advanced_crossover(&p1, &p2, 0.5, &mut rng))
    });

    c.bench_function("phenotype_founder", |b| b.iter(|| p1.phenotype()));

    c.bench_function("distance_founders", |b| b.iter(|| p1.distance_to(&p2)));
}

criterion_group!(benches, bench_genome);
criterion_main!(benches);
