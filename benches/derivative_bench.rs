//! Benchmarks for the full derivative pipeline.
//!
//! Run with: `cargo bench --bench derivative_bench`
//!
//! Measures one derivative request (halo exchange, assembly, solve,
//! interface coupling) on a single rank and on 8 thread ranks.

use std::f64::consts::PI;

use cfd_rs::{
    Axis, Bounds3D, CartesianTopology, CompactDerivative, CompactScheme, CpuSolver, Decomposition,
    DerivativeConfig, GlobalGrid, LocalCluster, PaddedField, SingleProcess,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn config(grid: GlobalGrid, scheme: CompactScheme) -> DerivativeConfig {
    DerivativeConfig::default()
        .with_scheme(scheme)
        .with_bounds(&Bounds3D::cube(0.0, 2.0 * PI), grid)
}

/// Single rank, every axis, both schemes.
fn bench_single_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivative_single_rank");
    group.sample_size(30);

    for n in [32, 64] {
        let grid = GlobalGrid::cube(n);
        for scheme in [CompactScheme::Pade4, CompactScheme::Pade6] {
            let config = config(grid, scheme);
            let topology = CartesianTopology::new([1, 1, 1], [true; 3], 1).unwrap();
            let decomp = Decomposition::new(grid, topology, scheme.halo_width()).unwrap();
            let comm = SingleProcess::new();
            let mut d =
                CompactDerivative::new(comm, decomp, config.clone(), CpuSolver::new()).unwrap();
            let sub = d.subdomain().clone();
            let dx = config.spacing;
            let mut field = PaddedField::from_global_fn(&sub, |[k, j, i]| {
                (k as f64 * dx[0]).sin() + (j as f64 * dx[1]).cos() + (i as f64 * dx[2]).sin()
            });

            for axis in Axis::ALL {
                let id = BenchmarkId::new(format!("{}_{}", scheme, axis), format!("{}^3", n));
                group.bench_function(id, |b| {
                    b.iter(|| d.derivative(black_box(axis), &mut field).unwrap());
                });
            }
        }
    }

    group.finish();
}

/// Eight thread ranks on a 2x2x2 topology; each iteration is a full
/// collective request including thread start-up.
fn bench_thread_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivative_2x2x2");
    group.sample_size(20);

    for n in [32, 64] {
        let grid = GlobalGrid::cube(n);
        let config = config(grid, CompactScheme::Pade4);

        group.bench_with_input(BenchmarkId::new("x", format!("{}^3", n)), &n, |b, _| {
            b.iter(|| {
                LocalCluster::run(8, |comm| {
                    let topology = CartesianTopology::new([2, 2, 2], [true; 3], 8).unwrap();
                    let decomp = Decomposition::new(grid, topology, 1).unwrap();
                    let mut d =
                        CompactDerivative::new(comm, decomp, config.clone(), CpuSolver::serial())
                            .unwrap();
                    let mut field = d.new_field();
                    d.derivative(Axis::X, &mut field).unwrap().max_abs()
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_rank, bench_thread_cluster);
criterion_main!(benches);
