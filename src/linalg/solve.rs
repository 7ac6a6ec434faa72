//! Triangular, general and symmetric positive-definite solves.
//!
//! Solutions are computed by substitution in the element type, so for
//! `X = A⁻¹B` the tangents satisfy `dX = A⁻¹(dB − dA·X)` without a
//! hand-written adjoint. Triangular routines read only the declared triangle
//! of `A`; the other half never influences values or derivatives.

use num_traits::Float;

use crate::check::{check_multiplicable, check_square, check_symmetric};
use crate::container::{Container, LeftSolveOperand, Matrix, RightSolveOperand};
use crate::error::{Error, Result};
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

use super::decompose::cholesky_decompose;
use super::{cols_of, dot, lift_lhs, lift_matrix_lhs, lift_matrix_rhs, lift_rhs, rows_of, sum_of};

/// Which triangle of a matrix is meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Triangle {
    Lower,
    Upper,
}

/// Solve `op(A) x = b` in place, where `op(A)` is `A` or `Aᵀ`, reading only
/// the `tri` triangle of `A`.
fn substitute<T: Scalar>(a: &Matrix<T>, tri: Triangle, transposed: bool, b: &mut [T]) {
    let n = b.len();
    let coef = |i: usize, j: usize| if transposed { a[(j, i)] } else { a[(i, j)] };
    // op(A) is lower triangular exactly when A is lower and not transposed,
    // or upper and transposed.
    let forward = (tri == Triangle::Lower) != transposed;
    if forward {
        for i in 0..n {
            let row: Vec<T> = (0..i).map(|j| coef(i, j)).collect();
            b[i] = (b[i] - dot(&row, &b[..i])) / a[(i, i)];
        }
    } else {
        for i in (0..n).rev() {
            let row: Vec<T> = ((i + 1)..n).map(|j| coef(i, j)).collect();
            b[i] = (b[i] - dot(&row, &b[i + 1..])) / a[(i, i)];
        }
    }
}

/// Solve against every column of a column-major entry list.
fn solve_columns<T: Scalar>(
    entries: Vec<T>,
    rows: usize,
    cols: usize,
    mut solve: impl FnMut(&mut [T]),
) -> Vec<T> {
    let mut out = Vec::with_capacity(rows * cols);
    for mut col in cols_of(&entries, rows, cols) {
        solve(&mut col);
        out.extend(col);
    }
    out
}

/// Solve against every row of a column-major entry list, returning the
/// column-major result.
fn solve_rows<T: Scalar>(
    entries: Vec<T>,
    rows: usize,
    cols: usize,
    mut solve: impl FnMut(&mut [T]),
) -> Vec<T> {
    let solved: Vec<Vec<T>> = rows_of(&entries, rows, cols)
        .into_iter()
        .map(|mut row| {
            solve(&mut row);
            row
        })
        .collect();
    let mut out = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for row in &solved {
            out.push(row[j]);
        }
    }
    out
}

fn identity<T: Scalar>(n: usize) -> Vec<T> {
    let mut e = vec![T::zero(); n * n];
    for i in 0..n {
        e[i * n + i] = T::one();
    }
    e
}

/// `A⁻¹ · B` for triangular `A`.
pub fn mdivide_left_tri<A, C>(tri: Triangle, a: &Matrix<A>, b: &C) -> Result<C::Like<Promoted<A, C::Elem>>>
where
    A: Promote<C::Elem>,
    C: Container,
    C::Class: LeftSolveOperand,
{
    check_square("mdivide_left_tri", "a", a)?;
    check_multiplicable("mdivide_left_tri", "a", a, "b", b)?;
    let a = lift_matrix_lhs::<A, C::Elem>(a);
    let x = solve_columns(lift_rhs::<A, C>(b), b.rows(), b.cols(), |col| {
        substitute(&a, tri, false, col)
    });
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// [`mdivide_left_tri`] with a lower-triangular `A`.
pub fn mdivide_left_tri_low<A, C>(a: &Matrix<A>, b: &C) -> Result<C::Like<Promoted<A, C::Elem>>>
where
    A: Promote<C::Elem>,
    C: Container,
    C::Class: LeftSolveOperand,
{
    mdivide_left_tri(Triangle::Lower, a, b)
}

/// `A⁻¹` for triangular `A`, solving against the identity.
pub fn inverse_tri<T: Scalar>(tri: Triangle, a: &Matrix<T>) -> Result<Matrix<T>> {
    check_square("inverse_tri", "a", a)?;
    let n = a.nrows();
    let x = solve_columns(identity(n), n, n, |col| substitute(a, tri, false, col));
    Ok(Matrix::from_vec(n, n, x))
}

/// `B · A⁻¹` for triangular `A`.
pub fn mdivide_right_tri<C, A>(tri: Triangle, b: &C, a: &Matrix<A>) -> Result<C::Like<Promoted<C::Elem, A>>>
where
    C: Container,
    C::Class: RightSolveOperand,
    A: Scalar,
    C::Elem: Promote<A>,
{
    check_square("mdivide_right_tri", "a", a)?;
    check_multiplicable("mdivide_right_tri", "b", b, "a", a)?;
    let a = lift_matrix_rhs::<C::Elem, A>(a);
    let x = solve_rows(lift_lhs::<C, A>(b), b.rows(), b.cols(), |row| {
        substitute(&a, tri, true, row)
    });
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// [`mdivide_right_tri`] with a lower-triangular `A`.
pub fn mdivide_right_tri_low<C, A>(b: &C, a: &Matrix<A>) -> Result<C::Like<Promoted<C::Elem, A>>>
where
    C: Container,
    C::Class: RightSolveOperand,
    A: Scalar,
    C::Elem: Promote<A>,
{
    mdivide_right_tri(Triangle::Lower, b, a)
}

/// LU factorization with partial pivoting chosen on primal values.
struct Lu<T: Scalar> {
    lu: Matrix<T>,
    perm: Vec<usize>,
    odd: bool,
}

impl<T: Scalar> Lu<T> {
    /// `None` when a pivot is exactly zero.
    fn factor(a: &Matrix<T>) -> Option<Self> {
        let n = a.nrows();
        let mut lu = a.clone();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut odd = false;
        for k in 0..n {
            let mut p = k;
            let mut best = lu[(k, k)].value().abs();
            for i in (k + 1)..n {
                let v = lu[(i, k)].value().abs();
                if v > best {
                    best = v;
                    p = i;
                }
            }
            if best == <T::Float as num_traits::Zero>::zero() {
                return None;
            }
            if p != k {
                lu.swap_rows(p, k);
                perm.swap(p, k);
                odd = !odd;
            }
            let pivot = lu[(k, k)];
            for i in (k + 1)..n {
                let l = lu[(i, k)] / pivot;
                lu[(i, k)] = l;
                for j in (k + 1)..n {
                    lu[(i, j)] = lu[(i, j)] - l * lu[(k, j)];
                }
            }
        }
        Some(Lu { lu, perm, odd })
    }

    fn solve(&self, b: &mut [T]) {
        let permuted: Vec<T> = self.perm.iter().map(|&p| b[p]).collect();
        b.copy_from_slice(&permuted);
        let n = b.len();
        for i in 0..n {
            let row: Vec<T> = (0..i).map(|j| self.lu[(i, j)]).collect();
            b[i] = b[i] - dot(&row, &b[..i]);
        }
        substitute(&self.lu, Triangle::Upper, false, b);
    }

    fn diagonal(&self) -> Vec<T> {
        (0..self.lu.nrows()).map(|i| self.lu[(i, i)]).collect()
    }
}

fn factor_or_singular<T: Scalar>(function: &'static str, a: &Matrix<T>) -> Result<Lu<T>> {
    Lu::factor(a).ok_or_else(|| {
        log::debug!("{}: LU factorization hit a zero pivot", function);
        Error::Singular { function, arg: "a" }
    })
}

/// `A⁻¹ · B` for general square `A`.
pub fn mdivide_left<A, C>(a: &Matrix<A>, b: &C) -> Result<C::Like<Promoted<A, C::Elem>>>
where
    A: Promote<C::Elem>,
    C: Container,
    C::Class: LeftSolveOperand,
{
    check_square("mdivide_left", "a", a)?;
    check_multiplicable("mdivide_left", "a", a, "b", b)?;
    let lu = factor_or_singular("mdivide_left", &lift_matrix_lhs::<A, C::Elem>(a))?;
    let x = solve_columns(lift_rhs::<A, C>(b), b.rows(), b.cols(), |col| lu.solve(col));
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// `B · A⁻¹` for general square `A`.
pub fn mdivide_right<C, A>(b: &C, a: &Matrix<A>) -> Result<C::Like<Promoted<C::Elem, A>>>
where
    C: Container,
    C::Class: RightSolveOperand,
    A: Scalar,
    C::Elem: Promote<A>,
{
    check_square("mdivide_right", "a", a)?;
    check_multiplicable("mdivide_right", "b", b, "a", a)?;
    let at = Container::transpose(&lift_matrix_rhs::<C::Elem, A>(a));
    let lu = factor_or_singular("mdivide_right", &at)?;
    let x = solve_rows(lift_lhs::<C, A>(b), b.rows(), b.cols(), |row| lu.solve(row));
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// `A⁻¹ · B` for symmetric positive-definite `A`, via its Cholesky factor.
pub fn mdivide_left_spd<A, C>(a: &Matrix<A>, b: &C) -> Result<C::Like<Promoted<A, C::Elem>>>
where
    A: Promote<C::Elem>,
    C: Container,
    C::Class: LeftSolveOperand,
{
    check_symmetric("mdivide_left_spd", "a", a)?;
    check_multiplicable("mdivide_left_spd", "a", a, "b", b)?;
    let l = cholesky_decompose(&lift_matrix_lhs::<A, C::Elem>(a))?;
    let x = solve_columns(lift_rhs::<A, C>(b), b.rows(), b.cols(), |col| {
        substitute(&l, Triangle::Lower, false, col);
        substitute(&l, Triangle::Lower, true, col);
    });
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// `B · A⁻¹` for symmetric positive-definite `A`.
pub fn mdivide_right_spd<C, A>(b: &C, a: &Matrix<A>) -> Result<C::Like<Promoted<C::Elem, A>>>
where
    C: Container,
    C::Class: RightSolveOperand,
    A: Scalar,
    C::Elem: Promote<A>,
{
    check_symmetric("mdivide_right_spd", "a", a)?;
    check_multiplicable("mdivide_right_spd", "b", b, "a", a)?;
    let l = cholesky_decompose(&lift_matrix_rhs::<C::Elem, A>(a))?;
    let x = solve_rows(lift_lhs::<C, A>(b), b.rows(), b.cols(), |row| {
        substitute(&l, Triangle::Lower, false, row);
        substitute(&l, Triangle::Lower, true, row);
    });
    Ok(C::assemble(b.rows(), b.cols(), x))
}

/// `A⁻¹`. Fails with [`Error::Singular`] when elimination meets a zero pivot.
pub fn inverse<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>> {
    check_square("inverse", "a", a)?;
    let n = a.nrows();
    let lu = factor_or_singular("inverse", a)?;
    let x = solve_columns(identity(n), n, n, |col| lu.solve(col));
    Ok(Matrix::from_vec(n, n, x))
}

/// `A⁻¹` for symmetric positive-definite `A`; the result is exactly
/// symmetric.
pub fn inverse_spd<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>> {
    check_symmetric("inverse_spd", "a", a)?;
    let l = cholesky_decompose(a)?;
    let l_inv = inverse_tri(Triangle::Lower, &l)?;
    Ok(super::crossprod(&l_inv))
}

/// `det(A)`; zero for a singular matrix.
pub fn determinant<T: Scalar>(a: &Matrix<T>) -> Result<T> {
    check_square("determinant", "a", a)?;
    match Lu::factor(a) {
        Some(lu) => {
            let det = lu.diagonal().into_iter().fold(T::one(), |acc, u| acc * u);
            Ok(if lu.odd { -det } else { det })
        }
        None => Ok(T::zero()),
    }
}

/// `ln |det(A)|`; negative infinity for a singular matrix.
pub fn log_determinant<T: Scalar>(a: &Matrix<T>) -> Result<T> {
    check_square("log_determinant", "a", a)?;
    match Lu::factor(a) {
        Some(lu) => {
            let logs: Vec<T> = lu.diagonal().into_iter().map(|u| u.abs().ln()).collect();
            Ok(sum_of(&logs))
        }
        None => Ok(T::neg_infinity()),
    }
}
