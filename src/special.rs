//! Gamma-family special functions on primitive floats.
//!
//! These are the kernels behind [`Scalar::lgamma`](crate::Scalar::lgamma) and
//! [`Scalar::polygamma`](crate::Scalar::polygamma); the AD types supply the
//! chain rule on top.

use crate::Float;

const LANCZOS_G: f64 = 7.0;
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Bernoulli numbers B_2, B_4, ..., B_14.
const BERNOULLI: [f64; 7] = [
    1.0 / 6.0,
    -1.0 / 30.0,
    1.0 / 42.0,
    -1.0 / 30.0,
    5.0 / 66.0,
    -691.0 / 2730.0,
    7.0 / 6.0,
];

/// Below this the recurrence shifts the argument upward before the
/// asymptotic series is applied.
const ASYMPTOTIC_THRESHOLD: f64 = 12.0;

#[inline]
fn lit<F: Float>(x: f64) -> F {
    F::from_f64(x).unwrap_or_else(F::nan)
}

/// `ln |Γ(x)|` via the Lanczos approximation, with reflection for `x < 0.5`.
///
/// Returns `+∞` at the poles (non-positive integers).
pub fn lgamma<F: Float>(x: F) -> F {
    if x <= F::zero() && x == x.floor() {
        return F::infinity();
    }
    if x < lit(0.5) {
        // ln Γ(x) = ln π - ln |sin(πx)| - ln Γ(1-x)
        let sin_pi_x = (F::PI() * x).sin().abs();
        F::PI().ln() - sin_pi_x.ln() - lgamma(F::one() - x)
    } else {
        lgamma_positive(x)
    }
}

fn lgamma_positive<F: Float>(x: F) -> F {
    let z = x - F::one();
    let mut ag: F = lit(LANCZOS_COEFFICIENTS[0]);
    for (i, &c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        ag = ag + lit::<F>(c) / (z + lit(i as f64));
    }
    let t = z + lit(LANCZOS_G + 0.5);
    lit::<F>(LN_SQRT_2PI) + (z + lit(0.5)) * t.ln() - t + ag.ln()
}

/// Digamma function `ψ(x) = Γ'(x)/Γ(x)`.
#[inline]
pub fn digamma<F: Float>(x: F) -> F {
    polygamma(0, x)
}

/// Polygamma function `ψ⁽ⁿ⁾(x)`, the `n`-th derivative of the digamma function.
///
/// Uses the upward recurrence `ψ⁽ⁿ⁾(x) = ψ⁽ⁿ⁾(x+1) - (-1)ⁿ n! / xⁿ⁺¹` until the
/// argument is large enough for the asymptotic series, and the reflection
/// formula for negative arguments of the digamma function. Returns NaN at the
/// poles.
pub fn polygamma<F: Float>(n: u32, x: F) -> F {
    if x <= F::zero() && x == x.floor() {
        return F::nan();
    }
    if n == 0 && x < F::zero() {
        // ψ(x) = ψ(1-x) - π / tan(πx)
        return polygamma(0, F::one() - x) - F::PI() / (F::PI() * x).tan();
    }

    let n_fact = factorial(n);
    let sign: f64 = if n % 2 == 0 { 1.0 } else { -1.0 };
    let xf = match x.to_f64() {
        Some(v) => v,
        None => return F::nan(),
    };

    let mut shift = 0.0;
    let mut xx = xf;
    while xx < ASYMPTOTIC_THRESHOLD {
        // ψ⁽ⁿ⁾(x) = ψ⁽ⁿ⁾(x+1) - (-1)ⁿ n! x^{-(n+1)}
        shift -= sign * n_fact / xx.powi(n as i32 + 1);
        xx += 1.0;
    }

    lit(shift + asymptotic(n, xx))
}

fn asymptotic(n: u32, x: f64) -> f64 {
    let inv2 = 1.0 / (x * x);
    if n == 0 {
        let mut series = 0.0;
        let mut pow = inv2;
        for (k, b) in BERNOULLI.iter().enumerate() {
            let two_k = 2.0 * (k as f64 + 1.0);
            series += b / two_k * pow;
            pow *= inv2;
        }
        return x.ln() - 0.5 / x - series;
    }

    // (-1)^(n+1) [ (n-1)!/xⁿ + n!/(2xⁿ⁺¹) + Σ B₂ₖ (2k+n-1)!/((2k)! x^{2k+n}) ]
    let nf = n as i32;
    let mut total = factorial(n - 1) / x.powi(nf) + factorial(n) / (2.0 * x.powi(nf + 1));
    for (k, b) in BERNOULLI.iter().enumerate() {
        let two_k = 2 * (k as u32 + 1);
        total += b * factorial(two_k + n - 1) / factorial(two_k) / x.powi(two_k as i32 + nf);
    }
    if n % 2 == 0 {
        -total
    } else {
        total
    }
}

fn factorial(n: u32) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}
