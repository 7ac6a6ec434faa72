//! Type promotion between plain floats and AD scalars.
//!
//! Binary operations that accept two different element types compute in the
//! promoted type: combining `f64` with `Dual<Reverse<f64>>` yields
//! `Dual<Reverse<f64>>`, combining a type with itself yields that type.
//! Any two of `F`, `Reverse<F>`, `Dual<Reverse<F>>` and
//! `Dual<Dual<Reverse<F>>>` promote to the more deeply nested one.

use crate::dual::Dual;
use crate::float::Float;
use crate::reverse::Reverse;
use crate::scalar::Scalar;
use crate::tape::TapeThreadLocal;

/// Promotion rule for mixing `Self` with `Rhs`.
pub trait Promote<Rhs: Scalar>: Scalar {
    /// The common type both operands are lifted into.
    type Common: Scalar;

    /// Lift the left operand.
    fn lift(self) -> Self::Common;

    /// Lift the right operand.
    fn lift_rhs(rhs: Rhs) -> Self::Common;
}

/// Shorthand for the promoted type of `A` and `B`.
pub type Promoted<A, B> = <A as Promote<B>>::Common;

impl<T: Scalar> Promote<T> for T {
    type Common = T;

    #[inline]
    fn lift(self) -> T {
        self
    }

    #[inline]
    fn lift_rhs(rhs: T) -> T {
        rhs
    }
}

macro_rules! impl_promote_primitive {
    ($f:ty) => {
        impl<T: Scalar<Float = $f>> Promote<Dual<T>> for $f {
            type Common = Dual<T>;

            #[inline]
            fn lift(self) -> Dual<T> {
                Dual::constant(T::from_f(self))
            }

            #[inline]
            fn lift_rhs(rhs: Dual<T>) -> Dual<T> {
                rhs
            }
        }

        impl<T: Scalar<Float = $f>> Promote<$f> for Dual<T> {
            type Common = Dual<T>;

            #[inline]
            fn lift(self) -> Dual<T> {
                self
            }

            #[inline]
            fn lift_rhs(rhs: $f) -> Dual<T> {
                Dual::constant(T::from_f(rhs))
            }
        }

        impl Promote<Reverse<$f>> for $f {
            type Common = Reverse<$f>;

            #[inline]
            fn lift(self) -> Reverse<$f> {
                Reverse::constant(self)
            }

            #[inline]
            fn lift_rhs(rhs: Reverse<$f>) -> Reverse<$f> {
                rhs
            }
        }

        impl Promote<$f> for Reverse<$f> {
            type Common = Reverse<$f>;

            #[inline]
            fn lift(self) -> Reverse<$f> {
                self
            }

            #[inline]
            fn lift_rhs(rhs: $f) -> Reverse<$f> {
                Reverse::constant(rhs)
            }
        }
    };
}

impl_promote_primitive!(f32);
impl_promote_primitive!(f64);

/// A tape variable enters a forward layer as a constant tangent-free value.
impl<F, T> Promote<Dual<T>> for Reverse<F>
where
    F: Float + TapeThreadLocal,
    T: Scalar,
    Reverse<F>: Promote<T, Common = T>,
{
    type Common = Dual<T>;

    #[inline]
    fn lift(self) -> Dual<T> {
        Dual::constant(<Reverse<F> as Promote<T>>::lift(self))
    }

    #[inline]
    fn lift_rhs(rhs: Dual<T>) -> Dual<T> {
        rhs
    }
}

impl<F, T> Promote<Reverse<F>> for Dual<T>
where
    F: Float + TapeThreadLocal,
    T: Promote<Reverse<F>, Common = T>,
{
    type Common = Dual<T>;

    #[inline]
    fn lift(self) -> Dual<T> {
        self
    }

    #[inline]
    fn lift_rhs(rhs: Reverse<F>) -> Dual<T> {
        Dual::constant(<T as Promote<Reverse<F>>>::lift_rhs(rhs))
    }
}

// One forward layer against two, over the same base.
macro_rules! impl_promote_nested_dual {
    ([$($g:tt)*] $base:ty) => {
        impl<$($g)*> Promote<Dual<Dual<$base>>> for Dual<$base> {
            type Common = Dual<Dual<$base>>;

            #[inline]
            fn lift(self) -> Dual<Dual<$base>> {
                Dual::constant(self)
            }

            #[inline]
            fn lift_rhs(rhs: Dual<Dual<$base>>) -> Dual<Dual<$base>> {
                rhs
            }
        }

        impl<$($g)*> Promote<Dual<$base>> for Dual<Dual<$base>> {
            type Common = Dual<Dual<$base>>;

            #[inline]
            fn lift(self) -> Dual<Dual<$base>> {
                self
            }

            #[inline]
            fn lift_rhs(rhs: Dual<$base>) -> Dual<Dual<$base>> {
                Dual::constant(rhs)
            }
        }
    };
}

impl_promote_nested_dual!([] f32);
impl_promote_nested_dual!([] f64);
impl_promote_nested_dual!([F: Float + TapeThreadLocal] Reverse<F>);
