use std::fmt::{self, Display};

use num_traits::Zero;

use crate::Scalar;

/// Forward-mode dual number: a value paired with its tangent (derivative).
///
/// `Dual { re, eps }` represents `re + eps·ε` where `ε² = 0`. The components
/// are themselves any [`Scalar`], so `Dual<Reverse<f64>>` records both
/// components on a tape (forward-over-reverse) and `Dual<Dual<T>>` carries
/// second-order tangents.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dual<T: Scalar> {
    /// Primal (real) value.
    pub re: T,
    /// Tangent (derivative) value.
    pub eps: T,
}

impl<T: Scalar> Display for Dual<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.re, self.eps)
    }
}

impl<T: Scalar> Dual<T> {
    /// Create a new dual number.
    #[inline]
    pub fn new(re: T, eps: T) -> Self {
        Dual { re, eps }
    }

    /// Create a constant (zero derivative).
    #[inline]
    pub fn constant(re: T) -> Self {
        Dual { re, eps: T::zero() }
    }

    /// Create a variable (unit derivative) for differentiation.
    #[inline]
    pub fn variable(re: T) -> Self {
        Dual { re, eps: T::one() }
    }

    /// Apply the chain rule: given `f(self.re)` and `f'(self.re)`, produce the dual result.
    #[inline]
    fn chain(self, f_val: T, f_deriv: T) -> Self {
        Dual {
            re: f_val,
            eps: self.eps * f_deriv,
        }
    }

    #[inline]
    fn two() -> T {
        T::one() + T::one()
    }

    // ── Powers ──

    #[inline]
    pub fn recip(self) -> Self {
        let inv = T::one() / self.re;
        self.chain(inv, -inv * inv)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, T::one() / (Self::two() * s))
    }

    #[inline]
    pub fn cbrt(self) -> Self {
        let c = self.re.cbrt();
        let three = T::from_literal(3.0);
        self.chain(c, T::one() / (three * c * c))
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        let val = self.re.powi(n);
        let deriv = T::from_literal(f64::from(n)) * self.re.powi(n - 1);
        self.chain(val, deriv)
    }

    #[inline]
    pub fn powf(self, n: Self) -> Self {
        // d/dx (x^y) = y * x^(y-1) * dx + x^y * ln(x) * dy
        let val = self.re.powf(n.re);
        let dx = n.re * self.re.powf(n.re - T::one());
        Dual {
            re: val,
            eps: self.eps * dx + n.eps * val * self.re.ln(),
        }
    }

    // ── Exp/Log ──

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    #[inline]
    pub fn exp2(self) -> Self {
        let e = self.re.exp2();
        self.chain(e, e * T::LN_2())
    }

    #[inline]
    pub fn exp_m1(self) -> Self {
        self.chain(self.re.exp_m1(), self.re.exp())
    }

    #[inline]
    pub fn ln(self) -> Self {
        self.chain(self.re.ln(), T::one() / self.re)
    }

    #[inline]
    pub fn log2(self) -> Self {
        self.chain(self.re.log2(), T::one() / (self.re * T::LN_2()))
    }

    #[inline]
    pub fn log10(self) -> Self {
        self.chain(self.re.log10(), T::one() / (self.re * T::LN_10()))
    }

    #[inline]
    pub fn ln_1p(self) -> Self {
        self.chain(self.re.ln_1p(), T::one() / (T::one() + self.re))
    }

    #[inline]
    pub fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    // ── Trig ──

    #[inline]
    pub fn sin(self) -> Self {
        self.chain(self.re.sin(), self.re.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.chain(self.re.cos(), -self.re.sin())
    }

    #[inline]
    pub fn tan(self) -> Self {
        let c = self.re.cos();
        self.chain(self.re.tan(), T::one() / (c * c))
    }

    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.re.sin_cos();
        (
            Dual {
                re: s,
                eps: self.eps * c,
            },
            Dual {
                re: c,
                eps: self.eps * (-s),
            },
        )
    }

    #[inline]
    pub fn asin(self) -> Self {
        self.chain(
            self.re.asin(),
            T::one() / (T::one() - self.re * self.re).sqrt(),
        )
    }

    #[inline]
    pub fn acos(self) -> Self {
        self.chain(
            self.re.acos(),
            -T::one() / (T::one() - self.re * self.re).sqrt(),
        )
    }

    #[inline]
    pub fn atan(self) -> Self {
        self.chain(self.re.atan(), T::one() / (T::one() + self.re * self.re))
    }

    #[inline]
    pub fn atan2(self, other: Self) -> Self {
        // d/dx atan2(y,x) = x/(x²+y²) dy - y/(x²+y²) dx
        let denom = self.re * self.re + other.re * other.re;
        Dual {
            re: self.re.atan2(other.re),
            eps: (other.re * self.eps - self.re * other.eps) / denom,
        }
    }

    // ── Hyperbolic ──

    #[inline]
    pub fn sinh(self) -> Self {
        self.chain(self.re.sinh(), self.re.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        self.chain(self.re.cosh(), self.re.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let c = self.re.cosh();
        self.chain(self.re.tanh(), T::one() / (c * c))
    }

    #[inline]
    pub fn asinh(self) -> Self {
        self.chain(
            self.re.asinh(),
            T::one() / (self.re * self.re + T::one()).sqrt(),
        )
    }

    #[inline]
    pub fn acosh(self) -> Self {
        self.chain(
            self.re.acosh(),
            T::one() / (self.re * self.re - T::one()).sqrt(),
        )
    }

    #[inline]
    pub fn atanh(self) -> Self {
        self.chain(self.re.atanh(), T::one() / (T::one() - self.re * self.re))
    }

    // ── Gamma family ──

    #[inline]
    pub fn lgamma(self) -> Self {
        self.chain(self.re.lgamma(), self.re.digamma())
    }

    #[inline]
    pub fn polygamma(self, n: u32) -> Self {
        self.chain(self.re.polygamma(n), self.re.polygamma(n + 1))
    }

    // ── Misc ──

    #[inline]
    pub fn abs(self) -> Self {
        if self.re.value() < T::Float::zero() {
            -self
        } else {
            self
        }
    }

    #[inline]
    pub fn signum(self) -> Self {
        Dual::constant(self.re.signum())
    }

    #[inline]
    pub fn floor(self) -> Self {
        Dual::constant(self.re.floor())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Dual::constant(self.re.ceil())
    }

    #[inline]
    pub fn round(self) -> Self {
        Dual::constant(self.re.round())
    }

    #[inline]
    pub fn trunc(self) -> Self {
        Dual::constant(self.re.trunc())
    }

    #[inline]
    pub fn fract(self) -> Self {
        Dual {
            re: self.re.fract(),
            eps: self.eps,
        }
    }

    #[inline]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        // d(x*a + b) = a*dx + x*da + db
        Dual {
            re: self.re * a.re + b.re,
            eps: self.eps * a.re + self.re * a.eps + b.eps,
        }
    }

    #[inline]
    pub fn hypot(self, other: Self) -> Self {
        let h = self.re.hypot(other.re);
        Dual {
            re: h,
            eps: (self.re * self.eps + other.re * other.eps) / h,
        }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.re.value() >= other.re.value() {
            self
        } else {
            other
        }
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.re.value() <= other.re.value() {
            self
        } else {
            other
        }
    }
}
