use num_traits::Float;

use crate::check::{check_matching_dims, check_multiplicable};
use crate::container::{Container, Matrix, RowVector, Vector};
use crate::error::Result;
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

use super::{
    cols_of, dot, lift_lhs, lift_matrix_lhs, lift_matrix_rhs, lift_rhs, product_entries, rows_of,
};

type Like<A, B> = <A as Container>::Like<Promoted<<A as Container>::Elem, <B as Container>::Elem>>;

fn zip_with<A, B>(
    a: &A,
    b: &B,
    f: impl Fn(Promoted<A::Elem, B::Elem>, Promoted<A::Elem, B::Elem>) -> Promoted<A::Elem, B::Elem>,
) -> Like<A, B>
where
    A: Container,
    B: Container<Class = A::Class>,
    A::Elem: Promote<B::Elem>,
{
    let entries = lift_lhs::<A, B::Elem>(a)
        .into_iter()
        .zip(lift_rhs::<A::Elem, B>(b))
        .map(|(x, y)| f(x, y))
        .collect();
    A::assemble(a.rows(), a.cols(), entries)
}

/// Elementwise sum of two same-shaped containers.
pub fn add<A, B>(a: &A, b: &B) -> Result<Like<A, B>>
where
    A: Container,
    B: Container<Class = A::Class>,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("add", "a", a, "b", b)?;
    Ok(zip_with(a, b, |x, y| x + y))
}

/// Elementwise difference of two same-shaped containers.
pub fn subtract<A, B>(a: &A, b: &B) -> Result<Like<A, B>>
where
    A: Container,
    B: Container<Class = A::Class>,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("subtract", "a", a, "b", b)?;
    Ok(zip_with(a, b, |x, y| x - y))
}

/// Elementwise product. Each result element depends only on the two
/// elements at the same position.
pub fn elt_multiply<A, B>(a: &A, b: &B) -> Result<Like<A, B>>
where
    A: Container,
    B: Container<Class = A::Class>,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("elt_multiply", "a", a, "b", b)?;
    Ok(zip_with(a, b, |x, y| x * y))
}

/// Elementwise quotient.
pub fn elt_divide<A, B>(a: &A, b: &B) -> Result<Like<A, B>>
where
    A: Container,
    B: Container<Class = A::Class>,
    A::Elem: Promote<B::Elem>,
{
    check_matching_dims("elt_divide", "a", a, "b", b)?;
    Ok(zip_with(a, b, |x, y| x / y))
}

/// Elementwise negation.
pub fn minus<C: Container>(c: &C) -> C {
    C::rebuild(c.rows(), c.cols(), c.entries().into_iter().map(|x| -x).collect())
}

/// Elementwise `eˣ`.
pub fn exp<C: Container>(c: &C) -> C {
    C::rebuild(c.rows(), c.cols(), c.entries().into_iter().map(|x| x.exp()).collect())
}

/// Elementwise natural log.
pub fn log<C: Container>(c: &C) -> C {
    C::rebuild(c.rows(), c.cols(), c.entries().into_iter().map(|x| x.ln()).collect())
}

/// Scalar times container.
pub fn scale<S, C>(k: S, c: &C) -> C::Like<Promoted<S, C::Elem>>
where
    S: Promote<C::Elem>,
    C: Container,
{
    let k = <S as Promote<C::Elem>>::lift(k);
    let entries = lift_rhs::<S, C>(c).into_iter().map(|x| k * x).collect();
    C::assemble(c.rows(), c.cols(), entries)
}

/// Container divided by a scalar.
pub fn divide<C, S>(c: &C, k: S) -> C::Like<Promoted<C::Elem, S>>
where
    C: Container,
    S: Scalar,
    C::Elem: Promote<S>,
{
    let k = <C::Elem as Promote<S>>::lift_rhs(k);
    let entries = lift_lhs::<C, S>(c).into_iter().map(|x| x / k).collect();
    C::assemble(c.rows(), c.cols(), entries)
}

/// Products between the matrix and vector shapes.
///
/// Every output element is an inner product of a row of the left operand
/// with a column of the right one, so `∂Cᵢⱼ/∂Aᵢₖ = Bₖⱼ` and
/// `∂Cᵢⱼ/∂Bₖⱼ = Aᵢₖ` fall out of [`Scalar::dot`].
pub trait Multiply<Rhs> {
    type Output;

    fn multiply(&self, rhs: &Rhs) -> Result<Self::Output>;
}

/// `a · b` for any pair of shapes that [`Multiply`] supports.
pub fn multiply<L: Multiply<R>, R>(a: &L, b: &R) -> Result<L::Output> {
    a.multiply(b)
}

impl<A: Promote<B>, B: Scalar> Multiply<Matrix<B>> for Matrix<A> {
    type Output = Matrix<Promoted<A, B>>;

    fn multiply(&self, rhs: &Matrix<B>) -> Result<Self::Output> {
        check_multiplicable("multiply", "a", self, "b", rhs)?;
        let a = lift_matrix_lhs::<A, B>(self);
        let b = lift_matrix_rhs::<A, B>(rhs);
        Ok(super::matmul(&a, &b))
    }
}

impl<A: Promote<B>, B: Scalar> Multiply<Vector<B>> for Matrix<A> {
    type Output = Vector<Promoted<A, B>>;

    fn multiply(&self, rhs: &Vector<B>) -> Result<Self::Output> {
        check_multiplicable("multiply", "a", self, "b", rhs)?;
        let a_rows = rows_of(&lift_lhs::<_, B>(self), self.nrows(), self.ncols());
        let b = lift_rhs::<A, _>(rhs);
        let entries: Vec<_> = a_rows.iter().map(|row| dot(row, &b)).collect();
        Ok(Vector::from_vec(entries))
    }
}

impl<A: Promote<B>, B: Scalar> Multiply<Matrix<B>> for RowVector<A> {
    type Output = RowVector<Promoted<A, B>>;

    fn multiply(&self, rhs: &Matrix<B>) -> Result<Self::Output> {
        check_multiplicable("multiply", "a", self, "b", rhs)?;
        let a = lift_lhs::<_, B>(self);
        let b_cols = cols_of(&lift_rhs::<A, _>(rhs), rhs.nrows(), rhs.ncols());
        let entries = product_entries(&[a], &b_cols);
        Ok(RowVector::from_vec(entries))
    }
}

impl<A: Promote<B>, B: Scalar> Multiply<Vector<B>> for RowVector<A> {
    type Output = Promoted<A, B>;

    fn multiply(&self, rhs: &Vector<B>) -> Result<Self::Output> {
        check_multiplicable("multiply", "a", self, "b", rhs)?;
        let a = lift_lhs::<_, B>(self);
        let b = lift_rhs::<A, _>(rhs);
        Ok(dot(&a, &b))
    }
}

/// Outer product.
impl<A: Promote<B>, B: Scalar> Multiply<RowVector<B>> for Vector<A> {
    type Output = Matrix<Promoted<A, B>>;

    fn multiply(&self, rhs: &RowVector<B>) -> Result<Self::Output> {
        let a = lift_lhs::<_, B>(self);
        let b = lift_rhs::<A, _>(rhs);
        Ok(Matrix::from_fn(a.len(), b.len(), |i, j| a[i] * b[j]))
    }
}
