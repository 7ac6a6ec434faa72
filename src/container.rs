//! Dense containers of AD scalars.
//!
//! Storage is nalgebra's dynamically sized matrix family. The [`Container`]
//! trait gives the linear-algebra layer one view over matrices, column
//! vectors, row vectors and plain `Vec`s, so each operation is written once
//! per shape class instead of once per operand combination.

use std::fmt::Debug;

use nalgebra::{DMatrix, DVector, RowDVector};
use num_traits::Zero;

use crate::dual::Dual;
use crate::error::{Error, Result};
use crate::promote::Promote;
use crate::scalar::Scalar;

/// Dense column-major matrix.
pub type Matrix<T> = DMatrix<T>;
/// Dense column vector.
pub type Vector<T> = DVector<T>;
/// Dense row vector.
pub type RowVector<T> = RowDVector<T>;

/// Marker for the shape class of a container type.
pub trait ShapeClass {
    /// Human-readable class name used in diagnostics.
    const NAME: &'static str;

    /// Whether a container of this class can have the given dimensions.
    fn accepts(rows: usize, cols: usize) -> bool;
}

/// Shape classes that hold a single run of elements.
pub trait VectorClass: ShapeClass {
    /// Dimensions of a container of this class holding `len` elements.
    fn shape(len: usize) -> (usize, usize);
}

/// Shape classes allowed on the right of a left division `A \ B`.
pub trait LeftSolveOperand: ShapeClass {}

/// Shape classes allowed on the left of a right division `B / A`.
pub trait RightSolveOperand: ShapeClass {}

#[derive(Clone, Copy, Debug)]
pub struct MatrixShape;
#[derive(Clone, Copy, Debug)]
pub struct ColumnShape;
#[derive(Clone, Copy, Debug)]
pub struct RowShape;
#[derive(Clone, Copy, Debug)]
pub struct SeqShape;

impl ShapeClass for MatrixShape {
    const NAME: &'static str = "matrix";
    fn accepts(_rows: usize, _cols: usize) -> bool {
        true
    }
}

impl ShapeClass for ColumnShape {
    const NAME: &'static str = "vector";
    fn accepts(_rows: usize, cols: usize) -> bool {
        cols == 1
    }
}

impl ShapeClass for RowShape {
    const NAME: &'static str = "row vector";
    fn accepts(rows: usize, _cols: usize) -> bool {
        rows == 1
    }
}

impl ShapeClass for SeqShape {
    const NAME: &'static str = "sequence";
    fn accepts(_rows: usize, cols: usize) -> bool {
        cols == 1
    }
}

impl VectorClass for ColumnShape {
    fn shape(len: usize) -> (usize, usize) {
        (len, 1)
    }
}

impl VectorClass for RowShape {
    fn shape(len: usize) -> (usize, usize) {
        (1, len)
    }
}

impl VectorClass for SeqShape {
    fn shape(len: usize) -> (usize, usize) {
        (len, 1)
    }
}

impl LeftSolveOperand for MatrixShape {}
impl LeftSolveOperand for ColumnShape {}
impl RightSolveOperand for MatrixShape {}
impl RightSolveOperand for RowShape {}

/// A dense two-dimensional view over a container of scalars.
///
/// Entries are exchanged in column-major order. `Like<U>` is the container of
/// the same shape class holding `U`, which is how operations on mixed element
/// types name their promoted result.
pub trait Container: Clone + Debug {
    type Elem: Scalar;
    type Class: ShapeClass;
    type Like<U: Scalar>: Container<Elem = U, Class = Self::Class>;
    type Transposed: Container<Elem = Self::Elem>;

    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    #[inline]
    fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at row `i`, column `j`.
    fn entry(&self, i: usize, j: usize) -> Self::Elem;

    /// All elements, column-major.
    fn entries(&self) -> Vec<Self::Elem>;

    /// Build a container of this class with another element type.
    ///
    /// # Panics
    ///
    /// Panics if `entries.len() != rows * cols` or the class cannot have
    /// these dimensions.
    fn assemble<U: Scalar>(rows: usize, cols: usize, entries: Vec<U>) -> Self::Like<U>;

    /// Build a container of exactly this type.
    fn rebuild(rows: usize, cols: usize, entries: Vec<Self::Elem>) -> Self;

    fn transpose(&self) -> Self::Transposed;
}

impl<T: Scalar> Container for DMatrix<T> {
    type Elem = T;
    type Class = MatrixShape;
    type Like<U: Scalar> = DMatrix<U>;
    type Transposed = DMatrix<T>;

    #[inline]
    fn rows(&self) -> usize {
        self.nrows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.ncols()
    }

    #[inline]
    fn entry(&self, i: usize, j: usize) -> T {
        self[(i, j)]
    }

    fn entries(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    fn assemble<U: Scalar>(rows: usize, cols: usize, entries: Vec<U>) -> DMatrix<U> {
        DMatrix::from_vec(rows, cols, entries)
    }

    fn rebuild(rows: usize, cols: usize, entries: Vec<T>) -> Self {
        DMatrix::from_vec(rows, cols, entries)
    }

    fn transpose(&self) -> DMatrix<T> {
        DMatrix::from_fn(self.ncols(), self.nrows(), |i, j| self[(j, i)])
    }
}

impl<T: Scalar> Container for DVector<T> {
    type Elem = T;
    type Class = ColumnShape;
    type Like<U: Scalar> = DVector<U>;
    type Transposed = RowDVector<T>;

    #[inline]
    fn rows(&self) -> usize {
        self.nrows()
    }

    #[inline]
    fn cols(&self) -> usize {
        1
    }

    #[inline]
    fn entry(&self, i: usize, _j: usize) -> T {
        self[i]
    }

    fn entries(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    fn assemble<U: Scalar>(rows: usize, cols: usize, entries: Vec<U>) -> DVector<U> {
        assert_eq!(cols, 1, "a column vector has exactly one column");
        assert_eq!(rows, entries.len());
        DVector::from_vec(entries)
    }

    fn rebuild(rows: usize, cols: usize, entries: Vec<T>) -> Self {
        Self::assemble(rows, cols, entries)
    }

    fn transpose(&self) -> RowDVector<T> {
        RowDVector::from_vec(self.entries())
    }
}

impl<T: Scalar> Container for RowDVector<T> {
    type Elem = T;
    type Class = RowShape;
    type Like<U: Scalar> = RowDVector<U>;
    type Transposed = DVector<T>;

    #[inline]
    fn rows(&self) -> usize {
        1
    }

    #[inline]
    fn cols(&self) -> usize {
        self.ncols()
    }

    #[inline]
    fn entry(&self, _i: usize, j: usize) -> T {
        self[j]
    }

    fn entries(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    fn assemble<U: Scalar>(rows: usize, cols: usize, entries: Vec<U>) -> RowDVector<U> {
        assert_eq!(rows, 1, "a row vector has exactly one row");
        assert_eq!(cols, entries.len());
        RowDVector::from_vec(entries)
    }

    fn rebuild(rows: usize, cols: usize, entries: Vec<T>) -> Self {
        Self::assemble(rows, cols, entries)
    }

    fn transpose(&self) -> DVector<T> {
        DVector::from_vec(self.entries())
    }
}

impl<T: Scalar> Container for Vec<T> {
    type Elem = T;
    type Class = SeqShape;
    type Like<U: Scalar> = Vec<U>;
    type Transposed = RowDVector<T>;

    #[inline]
    fn rows(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn cols(&self) -> usize {
        1
    }

    #[inline]
    fn entry(&self, i: usize, _j: usize) -> T {
        self[i]
    }

    fn entries(&self) -> Vec<T> {
        self.clone()
    }

    fn assemble<U: Scalar>(rows: usize, cols: usize, entries: Vec<U>) -> Vec<U> {
        assert_eq!(cols, 1, "a sequence has exactly one column");
        assert_eq!(rows, entries.len());
        entries
    }

    fn rebuild(rows: usize, cols: usize, entries: Vec<T>) -> Self {
        Self::assemble(rows, cols, entries)
    }

    fn transpose(&self) -> RowDVector<T> {
        RowDVector::from_vec(self.clone())
    }
}

/// Matrix from row-major literals, like a comma initializer.
///
/// # Panics
///
/// Panics if `data.len() != rows * cols`.
pub fn matrix_from_rows<T: Scalar>(rows: usize, cols: usize, data: &[T::Float]) -> Matrix<T> {
    assert_eq!(data.len(), rows * cols, "initializer length must be rows * cols");
    DMatrix::from_fn(rows, cols, |i, j| T::from_f(data[i * cols + j]))
}

/// Column vector from literals.
pub fn vector_from<T: Scalar>(data: &[T::Float]) -> Vector<T> {
    DVector::from_iterator(data.len(), data.iter().map(|&x| T::from_f(x)))
}

/// Row vector from literals.
pub fn row_vector_from<T: Scalar>(data: &[T::Float]) -> RowVector<T> {
    RowDVector::from_iterator(data.len(), data.iter().map(|&x| T::from_f(x)))
}

/// Resize `c` to `rows × cols`, discarding its contents (all entries become
/// zero).
pub fn resize<C: Container>(c: &mut C, rows: usize, cols: usize) -> Result<()> {
    if !C::Class::accepts(rows, cols) {
        return Err(Error::NotVector {
            function: "resize",
            arg: C::Class::NAME,
            rows,
            cols,
        });
    }
    *c = C::rebuild(rows, cols, vec![C::Elem::zero(); rows * cols]);
    Ok(())
}

/// Apply `f` to every element, keeping the shape.
pub fn map<C, U, G>(c: &C, f: G) -> C::Like<U>
where
    C: Container,
    U: Scalar,
    G: FnMut(C::Elem) -> U,
{
    let entries = c.entries().into_iter().map(f).collect();
    C::assemble(c.rows(), c.cols(), entries)
}

/// Innermost primal values.
pub fn values<C>(c: &C) -> C::Like<<C::Elem as Scalar>::Float>
where
    C: Container,
    <C::Elem as Scalar>::Float: Scalar,
{
    map(c, |x| x.value())
}

/// Lift every element into `U`.
pub fn promote<C, U>(c: &C) -> C::Like<U>
where
    C: Container,
    U: Promote<C::Elem, Common = U>,
{
    map(c, U::lift_rhs)
}

/// Pair a container of values with an equally shaped container of tangents.
pub fn to_dual<C, D>(values: &C, tangents: &D) -> Result<C::Like<Dual<C::Elem>>>
where
    C: Container,
    D: Container<Elem = C::Elem, Class = C::Class>,
{
    crate::check::check_matching_dims("to_dual", "values", values, "tangents", tangents)?;
    let entries = values
        .entries()
        .into_iter()
        .zip(tangents.entries())
        .map(|(re, eps)| Dual::new(re, eps))
        .collect();
    Ok(C::assemble(values.rows(), values.cols(), entries))
}
