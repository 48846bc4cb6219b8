use criterion::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use signet::registry::ReconcilePolicy;
use signet::test_util::{self, Locator, Movement, Position, Render, Sprite, Velocity};
use signet::{Entity, Registry};

fn populate(policy: ReconcilePolicy, entities: usize) -> (Registry, Vec<Entity>) {
    let mut registry = test_util::registry_with(policy);
    registry.add_system(Locator).expect("new system");
    registry.add_system(Movement::default()).expect("new system");
    registry.add_system(Render::default()).expect("new system");

    let mut rng = StdRng::seed_from_u64(entities as u64);
    let entities = (0..entities)
        .map(|_| {
            let mut entity = registry.spawn();
            entity.add(Position::default()).expect("valid entity");
            if rng.gen_bool(0.5) {
                entity.add(Velocity::default()).expect("valid entity");
            }
            if rng.gen_bool(0.5) {
                entity.add(Sprite::new("bench", rng.gen_range(0..8))).expect("valid entity");
            }
            entity.entity()
        })
        .collect();
    registry.update();

    (registry, entities)
}

fn update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for policy in [ReconcilePolicy::Incremental, ReconcilePolicy::ActivationOnly] {
        for log_entities in (4..=12).step_by(4) {
            let entities = 1 << log_entities;
            group.throughput(Throughput::Elements(entities as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("toggle velocity, {policy:?}"), format!("{entities} entities")),
                &entities,
                |b, &entities| {
                    let mut rng = StdRng::seed_from_u64(0);
                    b.iter_batched(
                        || populate(policy, entities),
                        |(mut registry, entities)| {
                            for &entity in &entities {
                                if rng.gen_bool(0.25)
                                    && !registry.remove_component::<Velocity>(entity).expect("valid entity")
                                {
                                    registry.add_component(entity, Velocity::default()).expect("valid entity");
                                }
                            }
                            registry.update();
                            registry
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }
}

criterion_group!(benches, update);
criterion_main!(benches);
