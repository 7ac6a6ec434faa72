//! Argument validation shared by the linear-algebra layer and the densities.
//!
//! Each check names the calling function and the offending argument so the
//! resulting [`Error`] reads on its own.

use num_traits::{Float, One, Zero};

use crate::container::Container;
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Absolute tolerance for symmetry and simplex checks.
pub const CONSTRAINT_TOLERANCE: f64 = 1e-8;

/// Same number of rows and columns.
pub fn check_square<C: Container>(function: &'static str, arg: &'static str, m: &C) -> Result<()> {
    if m.rows() != m.cols() {
        return Err(Error::NotSquare {
            function,
            arg,
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    Ok(())
}

/// One row or one column.
pub fn check_vector<C: Container>(function: &'static str, arg: &'static str, v: &C) -> Result<()> {
    if v.rows() != 1 && v.cols() != 1 {
        return Err(Error::NotVector {
            function,
            arg,
            rows: v.rows(),
            cols: v.cols(),
        });
    }
    Ok(())
}

/// At least one element.
pub fn check_nonempty<C: Container>(function: &'static str, arg: &'static str, c: &C) -> Result<()> {
    if c.is_empty() {
        return Err(Error::Empty { function, arg });
    }
    Ok(())
}

fn mismatch<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Error {
    Error::DimensionMismatch {
        function,
        lhs,
        lhs_rows: a.rows(),
        lhs_cols: a.cols(),
        rhs,
        rhs_rows: b.rows(),
        rhs_cols: b.cols(),
    }
}

/// Same number of rows and of columns.
pub fn check_matching_dims<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Result<()> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(mismatch(function, lhs, a, rhs, b));
    }
    Ok(())
}

/// Same total number of elements.
pub fn check_matching_sizes<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Result<()> {
    if a.len() != b.len() {
        return Err(mismatch(function, lhs, a, rhs, b));
    }
    Ok(())
}

/// Columns of `a` match rows of `b`.
pub fn check_multiplicable<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(mismatch(function, lhs, a, rhs, b));
    }
    Ok(())
}

/// Same number of rows.
pub fn check_matching_rows<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Result<()> {
    if a.rows() != b.rows() {
        return Err(mismatch(function, lhs, a, rhs, b));
    }
    Ok(())
}

/// Same number of columns.
pub fn check_matching_cols<A: Container, B: Container>(
    function: &'static str,
    lhs: &'static str,
    a: &A,
    rhs: &'static str,
    b: &B,
) -> Result<()> {
    if a.cols() != b.cols() {
        return Err(mismatch(function, lhs, a, rhs, b));
    }
    Ok(())
}

/// `requested` does not exceed the number of elements available.
pub fn check_size_bound(
    function: &'static str,
    arg: &'static str,
    requested: usize,
    available: usize,
) -> Result<()> {
    if requested > available {
        return Err(Error::SizeExceeded {
            function,
            arg,
            requested,
            available,
        });
    }
    Ok(())
}

/// `index < size`.
pub fn check_range(function: &'static str, arg: &'static str, index: usize, size: usize) -> Result<()> {
    if index >= size {
        return Err(Error::IndexOutOfRange {
            function,
            arg,
            index,
            size,
        });
    }
    Ok(())
}

/// Square, and `|m[i,j] - m[j,i]| <= CONSTRAINT_TOLERANCE` on primal values.
pub fn check_symmetric<C: Container>(function: &'static str, arg: &'static str, m: &C) -> Result<()> {
    check_square(function, arg, m)?;
    let tol = lit::<C::Elem>(CONSTRAINT_TOLERANCE);
    for j in 0..m.cols() {
        for i in (j + 1)..m.rows() {
            let diff = (m.entry(i, j).value() - m.entry(j, i).value()).abs();
            if !(diff <= tol) {
                return Err(Error::NotSymmetric {
                    function,
                    arg,
                    row: i,
                    col: j,
                });
            }
        }
    }
    Ok(())
}

/// Strictly positive primal value.
pub fn check_positive<T: Scalar>(function: &'static str, arg: &'static str, x: T) -> Result<()> {
    let v = x.value();
    if !(v > T::Float::zero()) {
        return Err(Error::Domain {
            function,
            arg,
            reason: format!("must be positive, got {}", v),
        });
    }
    Ok(())
}

/// Every primal value is finite.
pub fn check_finite<C: Container>(function: &'static str, arg: &'static str, c: &C) -> Result<()> {
    for (k, x) in c.entries().iter().enumerate() {
        if !x.value().is_finite() {
            return Err(Error::Domain {
                function,
                arg,
                reason: format!("must be finite, element {} is {}", k, x.value()),
            });
        }
    }
    Ok(())
}

/// Finite primal value.
pub fn check_finite_value<T: Scalar>(function: &'static str, arg: &'static str, x: T) -> Result<()> {
    if !x.value().is_finite() {
        return Err(Error::Domain {
            function,
            arg,
            reason: format!("must be finite, got {}", x.value()),
        });
    }
    Ok(())
}

/// Non-negative entries summing to one within [`CONSTRAINT_TOLERANCE`].
pub fn check_simplex<C: Container>(function: &'static str, arg: &'static str, c: &C) -> Result<()> {
    check_vector(function, arg, c)?;
    check_nonempty(function, arg, c)?;
    let entries = c.entries();
    let zero = <C::Elem as Scalar>::Float::zero();
    let mut total = zero;
    for (k, x) in entries.iter().enumerate() {
        let v = x.value();
        if !(v >= zero) {
            return Err(Error::Domain {
                function,
                arg,
                reason: format!("is not a valid simplex, element {} is {}", k, v),
            });
        }
        total = total + v;
    }
    let tol = lit::<C::Elem>(CONSTRAINT_TOLERANCE);
    if !((total - <C::Elem as Scalar>::Float::one()).abs() <= tol) {
        return Err(Error::Domain {
            function,
            arg,
            reason: format!("is not a valid simplex, sum is {}", total),
        });
    }
    Ok(())
}

#[inline]
fn lit<T: Scalar>(x: f64) -> T::Float {
    T::from_literal(x).value()
}
