//! The [`Scalar`] trait for writing AD-generic numeric code.
//!
//! Functions written as `fn f<T: Scalar>(x: T) -> T` work transparently with plain
//! `f64`, `Reverse<f64>`, `Dual<f64>` and any nesting such as
//! `Dual<Dual<Reverse<f64>>>`.

use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FromPrimitive};

use crate::dual::Dual;
use crate::float::Float;
use crate::reverse::Reverse;
use crate::special;
use crate::tape::{self, TapeThreadLocal};

/// The central trait for AD-generic numeric code.
///
/// Every linear-algebra routine and density in this crate is written once
/// against this trait and monomorphizes per nesting depth.
pub trait Scalar:
    num_traits::Float
    + num_traits::FloatConst
    + FromPrimitive
    + Copy
    + Default
    + Debug
    + Display
    + Send
    + 'static
{
    /// The underlying primitive float type.
    type Float: Float;

    /// True for primitive floats, which never carry derivative information.
    const IS_CONSTANT: bool = false;

    /// Lift a plain float to this scalar (constant, zero derivative).
    fn from_f(val: Self::Float) -> Self;

    /// Extract the innermost primal value.
    fn value(&self) -> Self::Float;

    /// Natural log of the absolute value of the gamma function.
    fn lgamma(self) -> Self;

    /// Polygamma function of order `n` (order 0 is the digamma function).
    fn polygamma(self, n: u32) -> Self;

    /// Digamma function, the derivative of [`lgamma`](Scalar::lgamma).
    #[inline]
    fn digamma(self) -> Self {
        self.polygamma(0)
    }

    /// Lift an `f64` literal.
    #[inline]
    fn from_literal(val: f64) -> Self {
        Self::from_f(Self::Float::from_f64(val).unwrap_or_else(Self::Float::nan))
    }

    /// Sum of a slice.
    fn sum(xs: &[Self]) -> Self {
        xs.iter().fold(Self::zero(), |acc, &x| acc + x)
    }

    /// Inner product of two slices of equal length.
    fn dot(a: &[Self], b: &[Self]) -> Self {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .fold(Self::zero(), |acc, (&x, &y)| acc + x * y)
    }
}

macro_rules! impl_scalar_primitive {
    ($f:ty) => {
        impl Scalar for $f {
            type Float = $f;

            const IS_CONSTANT: bool = true;

            #[inline]
            fn from_f(val: $f) -> Self {
                val
            }

            #[inline]
            fn value(&self) -> $f {
                *self
            }

            #[inline]
            fn lgamma(self) -> Self {
                special::lgamma(self)
            }

            #[inline]
            fn polygamma(self, n: u32) -> Self {
                special::polygamma(n, self)
            }
        }
    };
}

impl_scalar_primitive!(f32);
impl_scalar_primitive!(f64);

impl<T: Scalar> Scalar for Dual<T> {
    type Float = T::Float;

    #[inline]
    fn from_f(val: T::Float) -> Self {
        Dual::constant(T::from_f(val))
    }

    #[inline]
    fn value(&self) -> T::Float {
        self.re.value()
    }

    #[inline]
    fn lgamma(self) -> Self {
        Dual::lgamma(self)
    }

    #[inline]
    fn polygamma(self, n: u32) -> Self {
        Dual::polygamma(self, n)
    }

    /// `d(a·b) = a·db + da·b`, with each term reusing the inner type's
    /// inner product.
    fn dot(a: &[Self], b: &[Self]) -> Self {
        debug_assert_eq!(a.len(), b.len());
        let a_re: Vec<T> = a.iter().map(|x| x.re).collect();
        let a_eps: Vec<T> = a.iter().map(|x| x.eps).collect();
        let b_re: Vec<T> = b.iter().map(|x| x.re).collect();
        let b_eps: Vec<T> = b.iter().map(|x| x.eps).collect();
        Dual {
            re: T::dot(&a_re, &b_re),
            eps: T::dot(&a_re, &b_eps) + T::dot(&a_eps, &b_re),
        }
    }

    fn sum(xs: &[Self]) -> Self {
        let re: Vec<T> = xs.iter().map(|x| x.re).collect();
        let eps: Vec<T> = xs.iter().map(|x| x.eps).collect();
        Dual {
            re: T::sum(&re),
            eps: T::sum(&eps),
        }
    }
}

impl<F: Float + TapeThreadLocal> Scalar for Reverse<F> {
    type Float = F;

    #[inline]
    fn from_f(val: F) -> Self {
        Reverse::constant(val)
    }

    #[inline]
    fn value(&self) -> F {
        self.value
    }

    #[inline]
    fn lgamma(self) -> Self {
        let index = tape::record_unary(self.index, special::digamma(self.value));
        Reverse {
            value: special::lgamma(self.value),
            index,
        }
    }

    #[inline]
    fn polygamma(self, n: u32) -> Self {
        let index = tape::record_unary(self.index, special::polygamma(n + 1, self.value));
        Reverse {
            value: special::polygamma(n, self.value),
            index,
        }
    }

    /// One tape statement for the whole sum.
    fn sum(xs: &[Self]) -> Self {
        let value = xs.iter().fold(F::zero(), |acc, x| acc + x.value);
        let operands: Vec<(u32, F)> = xs.iter().map(|x| (x.index, F::one())).collect();
        let index = tape::record_nary(&operands);
        Reverse { value, index }
    }

    /// One tape statement whose partials are the primal values of the
    /// opposite operand.
    fn dot(a: &[Self], b: &[Self]) -> Self {
        debug_assert_eq!(a.len(), b.len());
        let mut value = F::zero();
        let mut operands = Vec::with_capacity(2 * a.len());
        for (x, y) in a.iter().zip(b.iter()) {
            value = value + x.value * y.value;
            operands.push((x.index, y.value));
            operands.push((y.index, x.value));
        }
        let index = tape::record_nary(&operands);
        Reverse { value, index }
    }
}
