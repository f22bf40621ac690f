use std::sync::Arc;

use criterion::*;
use entity_index::test_util::Shape;
use entity_index::{EntityIndex, IdSource, Registry};
use rayon::prelude::*;

fn register_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("register entity");

    for log_entities in (0..=12).step_by(4) {
        let entities = 1 << log_entities;
        group.throughput(Throughput::Elements(entities));

        group.bench_with_input(BenchmarkId::new("sequential", format!("{entities} entities")), &entities, |b, &entities| {
            b.iter_batched(
                || (Registry::new("bench", Arc::new(IdSource::new())), Shape::diagonal(entities as usize)),
                |(registry, shapes): (Registry<Shape>, _)| {
                    for shape in &shapes {
                        registry.register(shape);
                    }
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("parallel", format!("{entities} entities")), &entities, |b, &entities| {
            b.iter_batched(
                || (Registry::new("bench", Arc::new(IdSource::new())), Shape::diagonal(entities as usize)),
                |(registry, shapes): (Registry<Shape>, _)| {
                    shapes.par_iter().for_each(|shape| {
                        registry.register(shape);
                    });
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, register_entity);
criterion_main!(benches);
