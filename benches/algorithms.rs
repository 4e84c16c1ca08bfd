//! Benchmarks for graph query performance
//!
//! Exercises the path, circuit and connectivity queries on layered DAGs and
//! on rings with chords, the shapes that dominate their running time.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphscope::graph::WeightedGraph;

/// Create a layered DAG where every node links to each node of the next layer
fn create_layered_dag(layers: usize, width: usize) -> WeightedGraph<usize> {
    let mut graph = WeightedGraph::with_capacity(layers * width, layers * width * width);

    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                let source = layer * width + i;
                let target = (layer + 1) * width + j;
                let weight = ((source * 31 + target * 17) % 10) as f64 + 1.0;
                graph.add_edge(source, target, weight);
            }
        }
    }

    graph
}

/// Create a ring with a chord every `stride` nodes
fn create_chorded_ring(nodes: usize, stride: usize) -> WeightedGraph<usize> {
    let mut graph = WeightedGraph::with_capacity(nodes, nodes * 2);

    for i in 0..nodes {
        graph.add_edge(i, (i + 1) % nodes, 1.0);
        if i % stride == 0 {
            graph.add_edge(i, (i + stride / 2 + 1) % nodes, 2.5);
        }
    }

    graph
}

/// Benchmark shortest path queries
fn bench_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    for layers in [10, 50, 100].iter() {
        let graph = create_layered_dag(*layers, 8);
        let target = layers * 8 - 1;
        group.bench_with_input(BenchmarkId::from_parameter(layers), &graph, |b, graph| {
            b.iter(|| graph.shortest_path(black_box(&0), black_box(&target)))
        });
    }

    group.finish();
}

/// Benchmark the longest path dynamic program
fn bench_longest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_path");

    for layers in [10, 50, 100].iter() {
        let graph = create_layered_dag(*layers, 8);
        group.bench_with_input(BenchmarkId::from_parameter(layers), &graph, |b, graph| {
            b.iter(|| graph.longest_path())
        });
    }

    group.finish();
}

/// Benchmark circuit enumeration
fn bench_find_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_circuits");

    for nodes in [16, 32, 64].iter() {
        let graph = create_chorded_ring(*nodes, 4);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &graph, |b, graph| {
            b.iter(|| graph.find_circuits())
        });
    }

    group.finish();
}

/// Benchmark connectivity queries
fn bench_connectivity(c: &mut Criterion) {
    let graph = create_chorded_ring(200, 10);

    c.bench_function("connected_components_200", |b| {
        b.iter(|| black_box(&graph).connected_components())
    });

    c.bench_function("graph_diameter_200", |b| {
        b.iter(|| black_box(&graph).graph_diameter())
    });
}

criterion_group!(
    benches,
    bench_shortest_path,
    bench_longest_path,
    bench_find_circuits,
    bench_connectivity
);
criterion_main!(benches);
