//! Dense linear algebra over any [`Scalar`].
//!
//! Every routine is ordinary arithmetic on the element type, so derivatives
//! of every order flow through by composition: the same code serves `f64`,
//! `Reverse<f64>` and `Dual<Dual<Reverse<f64>>>`. Inner products go through
//! [`Scalar::dot`], which records a single tape statement for reverse-mode
//! elements.
//!
//! Operations with shape preconditions validate them first and return
//! [`Error`](crate::Error) without touching the tape. Operands of different
//! element types are combined in their [`Promote`] type.

mod arith;
mod decompose;
mod product;
mod reduce;
mod slice;
mod solve;

pub use arith::{add, divide, elt_divide, elt_multiply, exp, log, minus, multiply, scale, subtract, Multiply};
pub use decompose::{cholesky_decompose, eigenvalues, eigenvalues_sym, eigenvectors_sym};
pub use product::{
    columns_dot_product, crossprod, diag_post_multiply, diag_pre_multiply, distance, dot_product,
    dot_product_n, dot_self, multiply_lower_tri_self_transpose, quad_form, quad_form_diag,
    quad_form_sym, quad_form_sym_vec, quad_form_vec, rows_dot_product, squared_distance,
    tcrossprod, trace_quad_form,
};
pub use reduce::{log_sum_exp, max, mean, min, prod, sd, sum, trace, variance};
pub use slice::{
    append_col, append_row, diag_matrix, diagonal, head, rep_matrix, segment, tail, transpose,
};
pub use solve::{
    determinant, inverse, inverse_spd, inverse_tri, log_determinant, mdivide_left,
    mdivide_left_spd, mdivide_left_tri, mdivide_left_tri_low, mdivide_right, mdivide_right_spd,
    mdivide_right_tri, mdivide_right_tri_low, Triangle,
};

use crate::container::{Container, Matrix};
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

/// Entries of `c` lifted as the left operand of a promotion with `R`.
fn lift_lhs<C, R>(c: &C) -> Vec<Promoted<C::Elem, R>>
where
    C: Container,
    R: Scalar,
    C::Elem: Promote<R>,
{
    c.entries().into_iter().map(<C::Elem as Promote<R>>::lift).collect()
}

/// Entries of `c` lifted as the right operand of a promotion with `L`.
fn lift_rhs<L, C>(c: &C) -> Vec<Promoted<L, C::Elem>>
where
    L: Promote<C::Elem>,
    C: Container,
{
    c.entries().into_iter().map(L::lift_rhs).collect()
}

/// Matrix lifted as the left operand.
fn lift_matrix_lhs<A: Promote<B>, B: Scalar>(m: &Matrix<A>) -> Matrix<Promoted<A, B>> {
    m.map(<A as Promote<B>>::lift)
}

/// Matrix lifted as the right operand.
fn lift_matrix_rhs<A: Promote<B>, B: Scalar>(m: &Matrix<B>) -> Matrix<Promoted<A, B>> {
    m.map(A::lift_rhs)
}

#[inline]
fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    T::dot(a, b)
}

#[inline]
fn sum_of<T: Scalar>(xs: &[T]) -> T {
    T::sum(xs)
}

/// Rows of a column-major entry list as owned vectors.
fn rows_of<T: Scalar>(entries: &[T], rows: usize, cols: usize) -> Vec<Vec<T>> {
    (0..rows)
        .map(|i| (0..cols).map(|j| entries[j * rows + i]).collect())
        .collect()
}

/// Columns of a column-major entry list as owned vectors.
fn cols_of<T: Scalar>(entries: &[T], rows: usize, cols: usize) -> Vec<Vec<T>> {
    (0..cols)
        .map(|j| entries[j * rows..(j + 1) * rows].to_vec())
        .collect()
}

/// Column-major product of `a` (given by rows) and `b` (given by columns).
fn product_entries<T: Scalar>(a_rows: &[Vec<T>], b_cols: &[Vec<T>]) -> Vec<T> {
    let mut out = Vec::with_capacity(a_rows.len() * b_cols.len());
    for col in b_cols {
        for row in a_rows {
            out.push(T::dot(row, col));
        }
    }
    out
}

/// `a · b` for same-typed matrices whose shapes are already validated.
fn matmul<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let a_rows = rows_of(&a.entries(), a.nrows(), a.ncols());
    let b_cols = cols_of(&b.entries(), b.nrows(), b.ncols());
    Matrix::from_vec(a.nrows(), b.ncols(), product_entries(&a_rows, &b_cols))
}

/// Symmetric `m × m` matrix whose `(i, j)` entry is `f(i, j)` for `j <= i`,
/// mirrored into the upper triangle.
fn symmetric_from_lower<T: Scalar>(m: usize, mut f: impl FnMut(usize, usize) -> T) -> Matrix<T> {
    let mut out = Matrix::from_element(m, m, T::zero());
    for j in 0..m {
        for i in j..m {
            let v = f(i, j);
            out[(i, j)] = v;
            out[(j, i)] = v;
        }
    }
    out
}
