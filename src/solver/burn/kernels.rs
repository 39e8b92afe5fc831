//! Tensor kernels for the batched Thomas algorithm.
//!
//! Systems are rows of a `[num_systems, system_size]` tensor. Each
//! elimination step updates one column for every system at once, so the
//! sequential dependency runs along the columns while the batch dimension
//! is fully parallel on the device.

use burn::prelude::*;

#[inline]
fn column<B: Backend>(t: &Tensor<B, 2>, i: usize) -> Tensor<B, 2> {
    let [rows, _] = t.dims();
    t.clone().slice([0..rows, i..i + 1])
}

/// Back substitution `x[i] = d[i] - c2[i] x[i+1]` over swept columns.
fn back_substitute<B: Backend>(
    swept: Vec<Tensor<B, 2>>,
    mut scale: impl FnMut(usize, Tensor<B, 2>) -> Tensor<B, 2>,
) -> Tensor<B, 2> {
    let n = swept.len();
    let mut x = Vec::with_capacity(n);
    let mut next = swept[n - 1].clone();
    x.push(next.clone());
    for i in (0..n - 1).rev() {
        next = swept[i].clone().sub(scale(i, next));
        x.push(next.clone());
    }
    x.reverse();
    Tensor::cat(x, 1)
}

/// Solve systems sharing host-side coefficients.
///
/// # Arguments
/// * `a`, `b` - Sub-diagonal and diagonal [system_size]
/// * `c2` - Modified super-diagonal from [`thomas::eliminate`](crate::solver::thomas::eliminate)
/// * `d` - Right-hand sides [num_systems, system_size]
///
/// # Returns
/// Solutions [num_systems, system_size]
pub fn thomas_uniform<B: Backend>(
    a: &[f64],
    b: &[f64],
    c2: &[f64],
    d: Tensor<B, 2>,
) -> Tensor<B, 2> {
    let [_, n] = d.dims();
    let mut swept = Vec::with_capacity(n);
    let mut prev = column(&d, 0).div_scalar(b[0]);
    swept.push(prev.clone());
    for i in 1..n {
        let pivot = b[i] - a[i] * c2[i - 1];
        prev = column(&d, i).sub(prev.mul_scalar(a[i])).div_scalar(pivot);
        swept.push(prev.clone());
    }
    back_substitute(swept, |i, next| next.mul_scalar(c2[i]))
}

/// Solve systems with their own coefficients.
///
/// # Arguments
/// * `a`, `b`, `c` - Diagonals [num_systems, system_size]
/// * `d` - Right-hand sides [num_systems, system_size]
///
/// # Returns
/// Solutions [num_systems, system_size]
pub fn thomas_per_system<B: Backend>(
    a: Tensor<B, 2>,
    b: Tensor<B, 2>,
    c: Tensor<B, 2>,
    d: Tensor<B, 2>,
) -> Tensor<B, 2> {
    let [_, n] = d.dims();
    let mut c2 = Vec::with_capacity(n);
    let mut swept = Vec::with_capacity(n);

    let b0 = column(&b, 0);
    let mut prev_c2 = column(&c, 0).div(b0.clone());
    let mut prev = column(&d, 0).div(b0);
    c2.push(prev_c2.clone());
    swept.push(prev.clone());
    for i in 1..n {
        let a_i = column(&a, i);
        let pivot = column(&b, i).sub(a_i.clone().mul(prev_c2.clone()));
        prev = column(&d, i).sub(a_i.mul(prev)).div(pivot.clone());
        prev_c2 = column(&c, i).div(pivot);
        c2.push(prev_c2.clone());
        swept.push(prev.clone());
    }
    back_substitute(swept, |i, next| next.mul(c2[i].clone()))
}

#[cfg(all(test, feature = "burn-ndarray"))]
mod tests {
    use super::*;
    use crate::solver::thomas;
    use burn_ndarray::NdArray;

    type B = NdArray<f64>;

    fn matrix(data: Vec<f64>, rows: usize, cols: usize) -> Tensor<B, 2> {
        let device = burn_ndarray::NdArrayDevice::Cpu;
        Tensor::from_data(burn::tensor::TensorData::new(data, vec![rows, cols]), &device)
    }

    #[test]
    fn test_uniform_matches_host() {
        let n = 6;
        let a = vec![0.25; n];
        let b = vec![1.0; n];
        let c = vec![0.25; n];
        let mut c2 = vec![0.0; n];
        thomas::eliminate(&a, &b, &c, &mut c2);

        let rhs: Vec<f64> = (0..2 * n).map(|k| (k as f64).sin()).collect();
        let x = thomas_uniform(&a, &b, &c2, matrix(rhs.clone(), 2, n));
        let x = x.to_data().to_vec::<f64>().unwrap();

        for s in 0..2 {
            let host = thomas::thomas_solve(&a, &b, &c, &rhs[s * n..(s + 1) * n]);
            for (dev, h) in x[s * n..(s + 1) * n].iter().zip(&host) {
                assert!((dev - h).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_per_system_matches_host() {
        let n = 4;
        let a: Vec<f64> = (0..2 * n).map(|k| 0.1 * (k % 3) as f64).collect();
        let b: Vec<f64> = (0..2 * n).map(|k| 3.0 + k as f64).collect();
        let c: Vec<f64> = (0..2 * n).map(|k| -0.3 * (k % 2) as f64).collect();
        let d: Vec<f64> = (0..2 * n).map(|k| k as f64 - 2.0).collect();

        let x = thomas_per_system(
            matrix(a.clone(), 2, n),
            matrix(b.clone(), 2, n),
            matrix(c.clone(), 2, n),
            matrix(d.clone(), 2, n),
        );
        let x = x.to_data().to_vec::<f64>().unwrap();

        for s in 0..2 {
            let r = s * n..(s + 1) * n;
            let host =
                thomas::thomas_solve(&a[r.clone()], &b[r.clone()], &c[r.clone()], &d[r.clone()]);
            for (dev, h) in x[r].iter().zip(&host) {
                assert!((dev - h).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn test_single_column() {
        let x = thomas_uniform(&[0.0], &[2.0], &[0.0], matrix(vec![4.0, 6.0], 2, 1));
        assert_eq!(x.to_data().to_vec::<f64>().unwrap(), vec![2.0, 3.0]);
    }
}
