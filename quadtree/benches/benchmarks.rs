use common::shapes::Rect;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::quadtree::{CollisionResults, QuadTree, QuadTreeAnalytics};
use quadtree::{Collider, ColliderRef};
use rand::prelude::*;

const WORLD: f32 = 1000.0;

fn random_collider(rng: &mut StdRng, area: &Rect, id: usize) -> ColliderRef {
    let rect = area.random_rect_inside(5.0, 5.0, rng);
    Collider::new(format!("c{}", id), None, Some(rect)).into_ref()
}

fn filled_tree(depth: usize, count: usize, rng: &mut StdRng) -> (QuadTree, Vec<ColliderRef>) {
    let area = Rect::new(0.0, WORLD, WORLD, WORLD);
    let mut quadtree = QuadTree::new(WORLD, depth);
    let colliders: Vec<ColliderRef> = (0..count)
        .map(|i| {
            let c = random_collider(rng, &area, i);
            quadtree.add_collision(&c);
            c
        })
        .collect();
    (quadtree, colliders)
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let area = Rect::new(0.0, WORLD, WORLD, WORLD);
    let mut quadtree = QuadTree::new(WORLD, 6);
    let mut next_id = 0;

    c.bench_function("quadtree_add_collision", |b| {
        b.iter(|| {
            let collider = random_collider(&mut rng, &area, next_id);
            next_id += 1;
            quadtree.add_collision(black_box(&collider));
        })
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let (mut quadtree, colliders) = filled_tree(6, 1000, &mut rng);

    c.bench_function("quadtree_remove_collision", |b| {
        b.iter(|| {
            let index = rng.gen_range(0..colliders.len());
            let collider = &colliders[index];
            quadtree.remove_collision(black_box(collider.borrow().id()));
            quadtree.add_collision(collider);
        })
    });
}

fn move_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let area = Rect::new(0.0, WORLD, WORLD, WORLD);
    let (mut quadtree, colliders) = filled_tree(6, 1000, &mut rng);

    c.bench_function("quadtree_move", |b| {
        b.iter(|| {
            for collider in &colliders {
                let rect = area.random_rect_inside(5.0, 5.0, &mut rng);
                collider.borrow_mut().set_bounds(&rect);
                quadtree.add_collision(black_box(collider));
            }
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let query = Collider::new("query", None, Some(Rect::new(400.0, 200.0, 600.0, 200.0)));

    for depth in [3usize, 5, 7] {
        let mut rng = StdRng::seed_from_u64(4);
        let (quadtree, _colliders) = filled_tree(depth, 5000, &mut rng);

        let mut analytics = QuadTreeAnalytics::default();
        let mut results = CollisionResults::new();
        quadtree.check_for_collision_with(&query, &mut results, Some(&mut analytics));
        println!(
            "depth {}: {} hits, {} nodes tested, {} intersection tests",
            depth,
            results.len(),
            analytics.nodes_tested,
            analytics.intersection_tests
        );

        c.bench_function(&format!("quadtree_check_for_collision_depth_{}", depth), |b| {
            b.iter(|| {
                let results = quadtree.check_for_collision(black_box(&query));
                black_box(results.len());
            })
        });
    }
}

fn linear_scan_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let (_quadtree, colliders) = filled_tree(1, 5000, &mut rng);
    let query = Collider::new("query", None, Some(Rect::new(400.0, 200.0, 600.0, 200.0)));

    c.bench_function("linear_scan", |b| {
        b.iter(|| {
            let hits = colliders
                .iter()
                .filter(|collider| collider.borrow().is_colliding(black_box(&query)))
                .count();
            black_box(hits);
        })
    });
}

criterion_group!(
    quadtree_benchmarks,
    insert_benchmark,
    remove_benchmark,
    move_benchmark,
    query_benchmark,
    linear_scan_benchmark
);
criterion_main!(quadtree_benchmarks);
