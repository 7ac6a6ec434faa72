#![allow(dead_code)]

use nestad::{Matrix, Scalar};

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock<T: Scalar>(x: &[T]) -> T {
    let one = T::from_literal(1.0);
    let hundred = T::from_literal(100.0);
    let mut sum = T::zero();
    for i in 0..x.len() - 1 {
        let t1 = one - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum = sum + t1 * t1 + hundred * t2 * t2;
    }
    sum
}

pub fn rosenbrock_f64(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum += t1 * t1 + 100.0 * t2 * t2;
    }
    sum
}

// ─── Rastrigin ─────────────────────────────────────────────────────────────
// f(x) = 10n + Σ[x_i² - 10·cos(2π·x_i)]

pub fn rastrigin<T: Scalar>(x: &[T]) -> T {
    let ten = T::from_literal(10.0);
    let two_pi = T::from_literal(2.0 * std::f64::consts::PI);
    let mut sum = ten * T::from_literal(x.len() as f64);
    for &xi in x {
        sum = sum + xi * xi - ten * (two_pi * xi).cos();
    }
    sum
}

// ─── Finite Differences ────────────────────────────────────────────────────

pub fn finite_diff_gradient(f: impl Fn(&[f64]) -> f64, x: &[f64], h: f64) -> Vec<f64> {
    let n = x.len();
    let mut grad = vec![0.0; n];
    for i in 0..n {
        let mut xp = x.to_vec();
        let mut xm = x.to_vec();
        xp[i] += h;
        xm[i] -= h;
        grad[i] = (f(&xp) - f(&xm)) / (2.0 * h);
    }
    grad
}

// ─── Helpers ───────────────────────────────────────────────────────────────

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}

pub fn make_direction(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.1 * (i + 1) as f64).collect()
}

/// Diagonally dominant symmetric matrix, hence positive definite.
pub fn make_spd(n: usize) -> Matrix<f64> {
    Matrix::from_fn(n, n, |i, j| {
        if i == j {
            n as f64 + 1.0
        } else {
            1.0 / (1.0 + (i as f64 - j as f64).abs())
        }
    })
}
