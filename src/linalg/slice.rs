use num_traits::Zero;

use crate::check::{
    check_matching_cols, check_matching_rows, check_range, check_size_bound, check_vector,
};
use crate::container::{Container, Matrix, Vector, VectorClass};
use crate::error::Result;
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

use super::{lift_lhs, lift_rhs};

fn sub_vector<C>(v: &C, start: usize, n: usize) -> C
where
    C: Container,
    C::Class: VectorClass,
{
    let entries = v.entries()[start..start + n].to_vec();
    let (rows, cols) = <C::Class as VectorClass>::shape(n);
    C::rebuild(rows, cols, entries)
}

/// First `n` elements.
pub fn head<C>(v: &C, n: usize) -> Result<C>
where
    C: Container,
    C::Class: VectorClass,
{
    check_vector("head", "v", v)?;
    check_size_bound("head", "v", n, v.len())?;
    Ok(sub_vector(v, 0, n))
}

/// Last `n` elements.
pub fn tail<C>(v: &C, n: usize) -> Result<C>
where
    C: Container,
    C::Class: VectorClass,
{
    check_vector("tail", "v", v)?;
    check_size_bound("tail", "v", n, v.len())?;
    Ok(sub_vector(v, v.len() - n, n))
}

/// `n` elements starting at zero-based index `start`.
pub fn segment<C>(v: &C, start: usize, n: usize) -> Result<C>
where
    C: Container,
    C::Class: VectorClass,
{
    check_vector("segment", "v", v)?;
    if n > 0 {
        check_range("segment", "v", start, v.len())?;
    }
    check_size_bound("segment", "v", start + n, v.len())?;
    Ok(sub_vector(v, start, n))
}

/// Columns of `a` followed by columns of `b`.
pub fn append_col<A, B>(a: &A, b: &B) -> Result<Matrix<Promoted<A::Elem, B::Elem>>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_matching_rows("append_col", "a", a, "b", b)?;
    let mut entries = lift_lhs::<A, B::Elem>(a);
    entries.extend(lift_rhs::<A::Elem, B>(b));
    Ok(Matrix::from_vec(a.rows(), a.cols() + b.cols(), entries))
}

/// Rows of `a` followed by rows of `b`.
pub fn append_row<A, B>(a: &A, b: &B) -> Result<Matrix<Promoted<A::Elem, B::Elem>>>
where
    A: Container,
    B: Container,
    A::Elem: Promote<B::Elem>,
{
    check_matching_cols("append_row", "a", a, "b", b)?;
    let top = lift_lhs::<A, B::Elem>(a);
    let bottom = lift_rhs::<A::Elem, B>(b);
    let (ra, rb) = (a.rows(), b.rows());
    Ok(Matrix::from_fn(ra + rb, a.cols(), |i, j| {
        if i < ra {
            top[j * ra + i]
        } else {
            bottom[j * rb + (i - ra)]
        }
    }))
}

/// `rows × cols` matrix filled with `x`.
pub fn rep_matrix<T: Scalar>(x: T, rows: usize, cols: usize) -> Matrix<T> {
    Matrix::from_element(rows, cols, x)
}

/// Transpose; a column vector becomes a row vector and back.
pub fn transpose<C: Container>(c: &C) -> C::Transposed {
    Container::transpose(c)
}

/// Square matrix with `v` on the diagonal and constant zeros elsewhere.
pub fn diag_matrix<C: Container>(v: &C) -> Result<Matrix<C::Elem>> {
    check_vector("diag_matrix", "v", v)?;
    let d = v.entries();
    Ok(Matrix::from_fn(d.len(), d.len(), |i, j| {
        if i == j {
            d[i]
        } else {
            C::Elem::zero()
        }
    }))
}

/// Main diagonal as a column vector.
pub fn diagonal<T: Scalar>(m: &Matrix<T>) -> Vector<T> {
    let n = m.nrows().min(m.ncols());
    Vector::from_iterator(n, (0..n).map(|i| m[(i, i)]))
}
