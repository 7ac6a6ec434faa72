use num_traits::Float;

use crate::check::{
    check_matching_dims, check_matching_sizes, check_multiplicable, check_size_bound,
    check_square, check_symmetric, check_vector,
};
use crate::container::{Container, Matrix, RowVector, Vector};
use crate::error::{Error, Result};
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

use super::{
    cols_of, dot, lift_lhs, lift_matrix_lhs, lift_matrix_rhs, lift_rhs, matmul, rows_of, sum_of,
    symmetric_from_lower,
};

/// Inner product of two vectors of any orientation.
///
/// The partial with respect to `a[i]` is the primal value of `b[i]` and vice
/// versa; reverse-mode elements record the whole sum as one tape statement.
pub fn dot_product<A, B>(a: &A, b: &B) -> Result<Promoted<A::Elem, B::Elem>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_vector("dot_product", "a", a)?;
    check_vector("dot_product", "b", b)?;
    check_matching_sizes("dot_product", "a", a, "b", b)?;
    let a = lift_lhs::<A, B::Elem>(a);
    let b = lift_rhs::<A::Elem, B>(b);
    Ok(dot(&a, &b))
}

/// Inner product over the first `length` elements.
///
/// Fails if either operand holds fewer than `length` elements. Elements past
/// `length` have zero partial.
pub fn dot_product_n<A, B>(a: &A, b: &B, length: usize) -> Result<Promoted<A::Elem, B::Elem>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_vector("dot_product_n", "a", a)?;
    check_vector("dot_product_n", "b", b)?;
    check_size_bound("dot_product_n", "a", length, a.len())?;
    check_size_bound("dot_product_n", "b", length, b.len())?;
    let a = lift_lhs::<A, B::Elem>(a);
    let b = lift_rhs::<A::Elem, B>(b);
    Ok(dot(&a[..length], &b[..length]))
}

/// `v · v`.
pub fn dot_self<C: Container>(v: &C) -> Result<C::Elem> {
    check_vector("dot_self", "v", v)?;
    let e = v.entries();
    Ok(dot(&e, &e))
}

/// Inner product of each pair of corresponding rows.
pub fn rows_dot_product<A, B>(a: &A, b: &B) -> Result<Vector<Promoted<A::Elem, B::Elem>>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("rows_dot_product", "a", a, "b", b)?;
    let a_rows = rows_of(&lift_lhs::<A, B::Elem>(a), a.rows(), a.cols());
    let b_rows = rows_of(&lift_rhs::<A::Elem, B>(b), b.rows(), b.cols());
    let entries: Vec<_> = a_rows
        .iter()
        .zip(b_rows.iter())
        .map(|(x, y)| dot(x, y))
        .collect();
    Ok(Vector::from_vec(entries))
}

/// Inner product of each pair of corresponding columns.
pub fn columns_dot_product<A, B>(a: &A, b: &B) -> Result<RowVector<Promoted<A::Elem, B::Elem>>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("columns_dot_product", "a", a, "b", b)?;
    let a_cols = cols_of(&lift_lhs::<A, B::Elem>(a), a.rows(), a.cols());
    let b_cols = cols_of(&lift_rhs::<A::Elem, B>(b), b.rows(), b.cols());
    let entries: Vec<_> = a_cols
        .iter()
        .zip(b_cols.iter())
        .map(|(x, y)| dot(x, y))
        .collect();
    Ok(RowVector::from_vec(entries))
}

/// `Σ (aᵢ - bᵢ)²` between two vectors of equal length.
pub fn squared_distance<A, B>(a: &A, b: &B) -> Result<Promoted<A::Elem, B::Elem>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_vector("squared_distance", "a", a)?;
    check_vector("squared_distance", "b", b)?;
    check_matching_sizes("squared_distance", "a", a, "b", b)?;
    let diff: Vec<_> = lift_lhs::<A, B::Elem>(a)
        .into_iter()
        .zip(lift_rhs::<A::Elem, B>(b))
        .map(|(x, y)| x - y)
        .collect();
    Ok(dot(&diff, &diff))
}

/// Euclidean distance between two vectors.
pub fn distance<A, B>(a: &A, b: &B) -> Result<Promoted<A::Elem, B::Elem>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    Ok(squared_distance(a, b)?.sqrt())
}

/// `L · Lᵀ` using only the lower triangle of `l`; entries above the
/// diagonal are never read.
pub fn multiply_lower_tri_self_transpose<T: Scalar>(l: &Matrix<T>) -> Matrix<T> {
    let rows = rows_of(&l.entries(), l.nrows(), l.ncols());
    symmetric_from_lower(l.nrows(), |i, j| {
        let k = (j + 1).min(l.ncols());
        T::dot(&rows[i][..k], &rows[j][..k])
    })
}

/// `M · Mᵀ`.
pub fn tcrossprod<T: Scalar>(m: &Matrix<T>) -> Matrix<T> {
    let rows = rows_of(&m.entries(), m.nrows(), m.ncols());
    symmetric_from_lower(m.nrows(), |i, j| T::dot(&rows[i], &rows[j]))
}

/// `Mᵀ · M`.
pub fn crossprod<T: Scalar>(m: &Matrix<T>) -> Matrix<T> {
    let cols = cols_of(&m.entries(), m.nrows(), m.ncols());
    symmetric_from_lower(m.ncols(), |i, j| T::dot(&cols[i], &cols[j]))
}

fn diag_length_mismatch<V: Container, B: Scalar>(
    function: &'static str,
    v: &V,
    m: &Matrix<B>,
) -> Error {
    Error::DimensionMismatch {
        function,
        lhs: "v",
        lhs_rows: v.rows(),
        lhs_cols: v.cols(),
        rhs: "m",
        rhs_rows: m.nrows(),
        rhs_cols: m.ncols(),
    }
}

/// `diag(v) · M`.
pub fn diag_pre_multiply<V, B>(v: &V, m: &Matrix<B>) -> Result<Matrix<Promoted<V::Elem, B>>>
where
    V: Container,
    B: Scalar,
    V::Elem: Promote<B>,
{
    check_vector("diag_pre_multiply", "v", v)?;
    if v.len() != m.nrows() {
        return Err(diag_length_mismatch("diag_pre_multiply", v, m));
    }
    let d = lift_lhs::<V, B>(v);
    let m = lift_matrix_rhs::<V::Elem, B>(m);
    Ok(Matrix::from_fn(m.nrows(), m.ncols(), |i, j| d[i] * m[(i, j)]))
}

/// `M · diag(v)`.
pub fn diag_post_multiply<A, V>(m: &Matrix<A>, v: &V) -> Result<Matrix<Promoted<A, V::Elem>>>
where
    A: Promote<V::Elem>,
    V: Container,
{
    check_vector("diag_post_multiply", "v", v)?;
    if v.len() != m.ncols() {
        return Err(diag_length_mismatch("diag_post_multiply", v, m));
    }
    let d = lift_rhs::<A, V>(v);
    let m = lift_matrix_lhs::<A, V::Elem>(m);
    Ok(Matrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)] * d[j]))
}

fn check_quad_form<A: Scalar, C: Container>(function: &'static str, a: &Matrix<A>, b: &C) -> Result<()> {
    check_square(function, "a", a)?;
    check_multiplicable(function, "a", a, "b", b)
}

/// `Bᵀ · A · B`.
pub fn quad_form<A: Promote<B>, B: Scalar>(a: &Matrix<A>, b: &Matrix<B>) -> Result<Matrix<Promoted<A, B>>> {
    check_quad_form("quad_form", a, b)?;
    let a = lift_matrix_lhs::<A, B>(a);
    let b = lift_matrix_rhs::<A, B>(b);
    let ab = matmul(&a, &b);
    Ok(matmul(&Container::transpose(&b), &ab))
}

/// `bᵀ · A · b` for a column vector `b`.
pub fn quad_form_vec<A: Promote<B>, B: Scalar>(a: &Matrix<A>, b: &Vector<B>) -> Result<Promoted<A, B>> {
    check_quad_form("quad_form_vec", a, b)?;
    let a_rows = rows_of(&lift_lhs::<_, B>(a), a.nrows(), a.ncols());
    let b = lift_rhs::<A, _>(b);
    let ab: Vec<_> = a_rows.iter().map(|row| dot(row, &b)).collect();
    Ok(dot(&b, &ab))
}

/// [`quad_form`] for symmetric `A`; the result is symmetrized.
pub fn quad_form_sym<A: Promote<B>, B: Scalar>(a: &Matrix<A>, b: &Matrix<B>) -> Result<Matrix<Promoted<A, B>>> {
    check_symmetric("quad_form_sym", "a", a)?;
    let r = quad_form(a, b)?;
    let half = <Promoted<A, B> as Scalar>::from_literal(0.5);
    Ok(symmetric_from_lower(r.nrows(), |i, j| {
        if i == j {
            r[(i, i)]
        } else {
            half * (r[(i, j)] + r[(j, i)])
        }
    }))
}

/// [`quad_form_vec`] for symmetric `A`.
pub fn quad_form_sym_vec<A: Promote<B>, B: Scalar>(a: &Matrix<A>, b: &Vector<B>) -> Result<Promoted<A, B>> {
    check_symmetric("quad_form_sym_vec", "a", a)?;
    quad_form_vec(a, b)
}

/// `trace(Bᵀ · A · B)`.
pub fn trace_quad_form<A: Promote<B>, B: Scalar>(a: &Matrix<A>, b: &Matrix<B>) -> Result<Promoted<A, B>> {
    check_quad_form("trace_quad_form", a, b)?;
    let a = lift_matrix_lhs::<A, B>(a);
    let b = lift_matrix_rhs::<A, B>(b);
    let ab = matmul(&a, &b);
    let b_cols = cols_of(&b.entries(), b.nrows(), b.ncols());
    let ab_cols = cols_of(&ab.entries(), ab.nrows(), ab.ncols());
    let diag: Vec<_> = b_cols
        .iter()
        .zip(ab_cols.iter())
        .map(|(x, y)| dot(x, y))
        .collect();
    Ok(sum_of(&diag))
}

/// `diag(v) · M · diag(v)`.
pub fn quad_form_diag<A, V>(m: &Matrix<A>, v: &V) -> Result<Matrix<Promoted<A, V::Elem>>>
where
    A: Promote<V::Elem>,
    V: Container,
{
    check_square("quad_form_diag", "m", m)?;
    check_vector("quad_form_diag", "v", v)?;
    if v.len() != m.nrows() {
        return Err(diag_length_mismatch("quad_form_diag", v, m));
    }
    let d = lift_rhs::<A, V>(v);
    let m = lift_matrix_lhs::<A, V::Elem>(m);
    Ok(Matrix::from_fn(m.nrows(), m.ncols(), |i, j| d[i] * m[(i, j)] * d[j]))
}
