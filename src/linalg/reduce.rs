use num_traits::{Float, One, Zero};

use crate::check::check_nonempty;
use crate::container::{Container, Matrix};
use crate::error::Result;
use crate::scalar::Scalar;

use super::{dot, sum_of};

/// Sum of all elements; zero for an empty container.
pub fn sum<C: Container>(c: &C) -> C::Elem {
    sum_of(&c.entries())
}

/// Arithmetic mean; fails on an empty container.
pub fn mean<C: Container>(c: &C) -> Result<C::Elem> {
    check_nonempty("mean", "c", c)?;
    Ok(sum(c) / C::Elem::from_literal(c.len() as f64))
}

/// Product of all elements; one for an empty container.
pub fn prod<C: Container>(c: &C) -> C::Elem {
    c.entries()
        .into_iter()
        .fold(C::Elem::one(), |acc, x| acc * x)
}

/// Smallest element by primal value. The result is that element, so its
/// derivative is the derivative of the selected entry.
pub fn min<C: Container>(c: &C) -> Result<C::Elem> {
    check_nonempty("min", "c", c)?;
    let entries = c.entries();
    let mut best = entries[0];
    for &x in &entries[1..] {
        if x.value() < best.value() {
            best = x;
        }
    }
    Ok(best)
}

/// Largest element by primal value.
pub fn max<C: Container>(c: &C) -> Result<C::Elem> {
    check_nonempty("max", "c", c)?;
    let entries = c.entries();
    let mut best = entries[0];
    for &x in &entries[1..] {
        if x.value() > best.value() {
            best = x;
        }
    }
    Ok(best)
}

/// `ln Σ exp(xᵢ)`, shifted by the largest primal value for stability.
pub fn log_sum_exp<C: Container>(c: &C) -> Result<C::Elem> {
    let m = max(c)?.value();
    if !m.is_finite() {
        return Ok(C::Elem::from_f(m));
    }
    let shift = C::Elem::from_f(m);
    let terms: Vec<C::Elem> = c.entries().into_iter().map(|x| (x - shift).exp()).collect();
    Ok(shift + sum_of(&terms).ln())
}

/// Sample variance (divisor `n - 1`); zero for a single element.
pub fn variance<C: Container>(c: &C) -> Result<C::Elem> {
    check_nonempty("variance", "c", c)?;
    let n = c.len();
    if n == 1 {
        return Ok(C::Elem::zero());
    }
    let mu = mean(c)?;
    let centered: Vec<C::Elem> = c.entries().into_iter().map(|x| x - mu).collect();
    Ok(dot(&centered, &centered) / C::Elem::from_literal((n - 1) as f64))
}

/// Sample standard deviation; zero for a single element.
pub fn sd<C: Container>(c: &C) -> Result<C::Elem> {
    check_nonempty("sd", "c", c)?;
    if c.len() == 1 {
        return Ok(C::Elem::zero());
    }
    Ok(variance(c)?.sqrt())
}

/// Sum of the diagonal.
pub fn trace<T: Scalar>(m: &Matrix<T>) -> T {
    let n = m.nrows().min(m.ncols());
    let diag: Vec<T> = (0..n).map(|i| m[(i, i)]).collect();
    sum_of(&diag)
}
