//! Helpers shared by the integration tests.

#![allow(dead_code)]

use cfd_rs::{
    Axis, CartesianTopology, CompactDerivative, CpuSolver, Decomposition, DerivativeConfig, Field3,
    GlobalGrid, LocalCluster, PaddedField,
};

/// Physical position of global grid index `g`, origin at zero.
pub fn position(config: &DerivativeConfig, g: [usize; 3]) -> [f64; 3] {
    [
        g[0] as f64 * config.spacing[0],
        g[1] as f64 * config.spacing[1],
        g[2] as f64 * config.spacing[2],
    ]
}

/// Sample `f` at every point of `grid`.
pub fn sample<F>(grid: GlobalGrid, config: &DerivativeConfig, f: F) -> Field3
where
    F: Fn([f64; 3]) -> f64,
{
    Field3::from_fn(grid.extent(), |k, j, i| f(position(config, [k, j, i])))
}

/// Differentiate `f` along `axis` on a `dims` process grid of threads and
/// collect the global result.
pub fn distributed<F>(
    grid: GlobalGrid,
    dims: [usize; 3],
    config: &DerivativeConfig,
    axis: Axis,
    f: F,
) -> Field3
where
    F: Fn([f64; 3]) -> f64 + Sync,
{
    let size = dims.iter().product();
    let halo = config.scheme.halo_width();
    let parts = LocalCluster::run(size, |comm| {
        let topology = CartesianTopology::new(dims, config.periodicity(), size).unwrap();
        let decomp = Decomposition::new(grid, topology, halo).unwrap();
        let mut d =
            CompactDerivative::new(comm, decomp, config.clone(), CpuSolver::serial()).unwrap();
        let sub = d.subdomain().clone();
        let mut field = PaddedField::from_global_fn(&sub, |g| f(position(config, g)));
        let df = d.derivative(axis, &mut field).unwrap();
        (sub.offset, df)
    });

    let mut global = Field3::zeros(grid.extent());
    for ([oz, oy, ox], df) in parts {
        let e = df.extent();
        for k in 0..e.nz {
            for j in 0..e.ny {
                for i in 0..e.nx {
                    global.set(oz + k, oy + j, ox + i, df.get(k, j, i));
                }
            }
        }
    }
    global
}
