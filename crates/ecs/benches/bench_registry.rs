use std::hint::black_box;
use std::time::Instant;

use omelette_common::{Entity, Vector3};
use omelette_ecs::{MeshComponent, MeshData, Registry, RigidBodyComponent};
use omelette_physics::RigidBody;

fn make_registry(entity_count: usize) -> Registry {
    let mut registry = Registry::new();
    let vertices: Vec<Vector3> = (0..8)
        .map(|i| Vector3::new((i & 1) as f32, ((i >> 1) & 1) as f32, (i >> 2) as f32))
        .collect();
    for i in 0..entity_count {
        let entity = Entity::new(i as u32);
        registry.add_entity(entity);
        let mesh = registry.add_component(
            entity,
            MeshComponent::owned(MeshData::new(vertices.clone(), vec![0, 1, 2, 2, 3, 0])),
        );
        if i % 2 == 0 {
            registry.add_component(entity, RigidBodyComponent::linked_to(RigidBody::default(), mesh));
        }
    }
    registry.drain_events();
    registry
}

fn bench_snapshot(entity_count: usize, iterations: usize) {
    let registry = make_registry(entity_count);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(registry.components());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  snapshot ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_variant_query(entity_count: usize, iterations: usize) {
    let registry = make_registry(entity_count);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(registry.entities_with::<RigidBodyComponent>());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  entities_with ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_update(entity_count: usize, iterations: usize) {
    let mut registry = make_registry(entity_count);

    let start = Instant::now();
    for _ in 0..iterations {
        registry.update(black_box(1.0 / 60.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  update ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Registry Benchmarks ===\n");

    println!("Component snapshot:");
    bench_snapshot(100, 1000);
    bench_snapshot(1000, 100);
    bench_snapshot(10000, 10);

    println!("\nVariant query:");
    bench_variant_query(1000, 1000);
    bench_variant_query(10000, 100);

    println!("\nRegistry update (linked meshes):");
    bench_update(100, 1000);
    bench_update(1000, 100);

    println!("\n=== Done ===");
}
