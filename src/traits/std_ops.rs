use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign,
};

use crate::dual::Dual;
use crate::float::Float;
use crate::reverse::Reverse;
use crate::scalar::Scalar;
use crate::tape::{self, TapeThreadLocal};

// ──────────────────────────────────────────────
//  Dual<T> operators
// ──────────────────────────────────────────────

impl<T: Scalar> Add for Dual<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Dual {
            re: self.re + rhs.re,
            eps: self.eps + rhs.eps,
        }
    }
}

impl<T: Scalar> Sub for Dual<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Dual {
            re: self.re - rhs.re,
            eps: self.eps - rhs.eps,
        }
    }
}

impl<T: Scalar> Mul for Dual<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Dual {
            re: self.re * rhs.re,
            eps: self.re * rhs.eps + self.eps * rhs.re,
        }
    }
}

impl<T: Scalar> Div for Dual<T> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let re = self.re / rhs.re;
        Dual {
            re,
            eps: (self.eps - re * rhs.eps) / rhs.re,
        }
    }
}

impl<T: Scalar> Neg for Dual<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Dual {
            re: -self.re,
            eps: -self.eps,
        }
    }
}

impl<T: Scalar> Rem for Dual<T> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        Dual {
            re: self.re % rhs.re,
            eps: self.eps,
        }
    }
}

impl<T: Scalar> AddAssign for Dual<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> SubAssign for Dual<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar> MulAssign for Dual<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Scalar> DivAssign for Dual<T> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// Mixed ops: Dual<T> with the primitive float at the bottom of T.
// The primitive is treated as a constant with zero tangent.
macro_rules! impl_dual_scalar_ops {
    ($f:ty) => {
        impl<T: Scalar<Float = $f>> Add<$f> for Dual<T> {
            type Output = Dual<T>;
            #[inline]
            fn add(self, rhs: $f) -> Dual<T> {
                Dual {
                    re: self.re + T::from_f(rhs),
                    eps: self.eps,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Add<Dual<T>> for $f {
            type Output = Dual<T>;
            #[inline]
            fn add(self, rhs: Dual<T>) -> Dual<T> {
                Dual {
                    re: T::from_f(self) + rhs.re,
                    eps: rhs.eps,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Sub<$f> for Dual<T> {
            type Output = Dual<T>;
            #[inline]
            fn sub(self, rhs: $f) -> Dual<T> {
                Dual {
                    re: self.re - T::from_f(rhs),
                    eps: self.eps,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Sub<Dual<T>> for $f {
            type Output = Dual<T>;
            #[inline]
            fn sub(self, rhs: Dual<T>) -> Dual<T> {
                Dual {
                    re: T::from_f(self) - rhs.re,
                    eps: -rhs.eps,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Mul<$f> for Dual<T> {
            type Output = Dual<T>;
            #[inline]
            fn mul(self, rhs: $f) -> Dual<T> {
                let k = T::from_f(rhs);
                Dual {
                    re: self.re * k,
                    eps: self.eps * k,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Mul<Dual<T>> for $f {
            type Output = Dual<T>;
            #[inline]
            fn mul(self, rhs: Dual<T>) -> Dual<T> {
                let k = T::from_f(self);
                Dual {
                    re: k * rhs.re,
                    eps: k * rhs.eps,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Div<$f> for Dual<T> {
            type Output = Dual<T>;
            #[inline]
            fn div(self, rhs: $f) -> Dual<T> {
                let k = T::from_f(rhs);
                Dual {
                    re: self.re / k,
                    eps: self.eps / k,
                }
            }
        }

        impl<T: Scalar<Float = $f>> Div<Dual<T>> for $f {
            type Output = Dual<T>;
            #[inline]
            fn div(self, rhs: Dual<T>) -> Dual<T> {
                let re = T::from_f(self) / rhs.re;
                Dual {
                    re,
                    eps: -re * rhs.eps / rhs.re,
                }
            }
        }

    };
}

impl_dual_scalar_ops!(f32);
impl_dual_scalar_ops!(f64);

impl<T: Scalar> PartialEq for Dual<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
    }
}

impl<T: Scalar> PartialOrd for Dual<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.re.partial_cmp(&other.re)
    }
}

// ──────────────────────────────────────────────
//  Reverse<F> operators
// ──────────────────────────────────────────────

impl<F: Float + TapeThreadLocal> Add for Reverse<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let value = self.value + rhs.value;
        let index = tape::record_binary(self.index, F::one(), rhs.index, F::one());
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> Sub for Reverse<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let value = self.value - rhs.value;
        let index = tape::record_binary(self.index, F::one(), rhs.index, -F::one());
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> Mul for Reverse<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let value = self.value * rhs.value;
        let index = tape::record_binary(self.index, rhs.value, rhs.index, self.value);
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> Div for Reverse<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.value;
        let value = self.value * inv;
        let index = tape::record_binary(self.index, inv, rhs.index, -value * inv);
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> Neg for Reverse<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        let value = -self.value;
        let index = tape::record_unary(self.index, -F::one());
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> Rem for Reverse<F> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        let value = self.value % rhs.value;
        let index = tape::record_binary(self.index, F::one(), rhs.index, F::zero());
        Reverse { value, index }
    }
}

impl<F: Float + TapeThreadLocal> AddAssign for Reverse<F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float + TapeThreadLocal> SubAssign for Reverse<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float + TapeThreadLocal> MulAssign for Reverse<F> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<F: Float + TapeThreadLocal> DivAssign for Reverse<F> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// Mixed ops: Reverse<F> with primitive floats.
macro_rules! impl_reverse_scalar_ops {
    ($f:ty) => {
        impl Add<$f> for Reverse<$f> {
            type Output = Reverse<$f>;
            #[inline]
            fn add(self, rhs: $f) -> Reverse<$f> {
                let value = self.value + rhs;
                let index = tape::record_unary(self.index, 1.0);
                Reverse { value, index }
            }
        }

        impl Add<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn add(self, rhs: Reverse<$f>) -> Reverse<$f> {
                let value = self + rhs.value;
                let index = tape::record_unary(rhs.index, 1.0);
                Reverse { value, index }
            }
        }

        impl Sub<$f> for Reverse<$f> {
            type Output = Reverse<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> Reverse<$f> {
                let value = self.value - rhs;
                let index = tape::record_unary(self.index, 1.0);
                Reverse { value, index }
            }
        }

        impl Sub<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn sub(self, rhs: Reverse<$f>) -> Reverse<$f> {
                let value = self - rhs.value;
                let index = tape::record_unary(rhs.index, -1.0);
                Reverse { value, index }
            }
        }

        impl Mul<$f> for Reverse<$f> {
            type Output = Reverse<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> Reverse<$f> {
                let value = self.value * rhs;
                let index = tape::record_unary(self.index, rhs);
                Reverse { value, index }
            }
        }

        impl Mul<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn mul(self, rhs: Reverse<$f>) -> Reverse<$f> {
                let value = self * rhs.value;
                let index = tape::record_unary(rhs.index, self);
                Reverse { value, index }
            }
        }

        impl Div<$f> for Reverse<$f> {
            type Output = Reverse<$f>;
            #[inline]
            fn div(self, rhs: $f) -> Reverse<$f> {
                let inv: $f = 1.0 / rhs;
                let value = self.value * inv;
                let index = tape::record_unary(self.index, inv);
                Reverse { value, index }
            }
        }

        impl Div<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn div(self, rhs: Reverse<$f>) -> Reverse<$f> {
                let inv: $f = 1.0 / rhs.value;
                let value = self * inv;
                let index = tape::record_unary(rhs.index, -value * inv);
                Reverse { value, index }
            }
        }

    };
}

impl_reverse_scalar_ops!(f32);
impl_reverse_scalar_ops!(f64);

impl<F: Float> PartialEq for Reverse<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: Float> PartialOrd for Reverse<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}
