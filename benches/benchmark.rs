use bucket_td::{
    BucketEliminationDecomposer, Hypergraph, MaximumCardinalityOrdering, MinDegreeOrdering,
    MinFillOrdering, OrderingAlgorithm,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn grid(size: usize) -> Hypergraph {
    let mut graph = Hypergraph::new(size * size);
    for r in 0..size {
        for c in 0..size {
            let v = r * size + c + 1;
            if c + 1 < size {
                graph.add_edge(&[v, v + 1]).unwrap();
            }
            if r + 1 < size {
                graph.add_edge(&[v, v + size]).unwrap();
            }
        }
    }
    graph
}

fn orderings(c: &mut Criterion) {
    let graph = grid(15);

    c.bench_function("grid_min_fill_ordering", |b| {
        b.iter(|| MinFillOrdering::new().compute_ordering(black_box(&graph)))
    });

    c.bench_function("grid_min_degree_ordering", |b| {
        b.iter(|| MinDegreeOrdering::new().compute_ordering(black_box(&graph)))
    });

    c.bench_function("grid_max_cardinality_ordering", |b| {
        b.iter(|| MaximumCardinalityOrdering::new().compute_ordering(black_box(&graph)))
    });
}

fn decomposition(c: &mut Criterion) {
    let graph = grid(15);
    let ordering = MinFillOrdering::new().compute_ordering(&graph);
    let decomposer = BucketEliminationDecomposer::new(MinFillOrdering::new());

    c.bench_function("grid_bucket_elimination", |b| {
        b.iter(|| decomposer.decompose_with_ordering(black_box(&graph), &ordering))
    });

    c.bench_function("grid_bucket_elimination_uncompressed", |b| {
        let decomposer = BucketEliminationDecomposer::new(MinFillOrdering::new()).compress(false);
        b.iter(|| decomposer.decompose_with_ordering(black_box(&graph), &ordering))
    });
}

criterion_group!(benches, orderings, decomposition);
criterion_main!(benches);
