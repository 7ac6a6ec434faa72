//! Log densities built on the scalar and linear-algebra layers.
//!
//! Each density takes a `PROPTO` const parameter. With `PROPTO = true`, a
//! summand is dropped when every input it depends on is a primitive float
//! ([`Scalar::IS_CONSTANT`]), so the result is correct up to an additive
//! constant that cannot affect derivatives.

use num_traits::{Float, One, Zero};

use crate::check::{
    check_finite, check_finite_value, check_matching_sizes, check_multiplicable, check_nonempty,
    check_positive, check_simplex, check_square, check_vector,
};
use crate::container::{Container, Matrix, Vector};
use crate::error::Result;
use crate::linalg::mdivide_left_tri_low;
use crate::promote::{Promote, Promoted};
use crate::scalar::Scalar;

type Promoted3<A, B, C> = Promoted<Promoted<A, B>, C>;

/// `ln(2π) / 2`.
fn half_log_two_pi<T: Scalar>() -> T {
    T::from_literal(0.5) * (T::from_literal(2.0) * T::PI()).ln()
}

/// Dirichlet log density of the simplex `theta` with concentrations `alpha`.
///
/// `ln Γ(Σα) − Σ ln Γ(αᵢ) + Σ (αᵢ − 1) ln θᵢ`
pub fn dirichlet_log<const PROPTO: bool, Th, Al>(
    theta: &Th,
    alpha: &Al,
) -> Result<Promoted<Th::Elem, Al::Elem>>
where
    Th: Container,
    Al: Container,
    Th::Elem: Promote<Al::Elem>,
{
    check_simplex("dirichlet_log", "theta", theta)?;
    check_vector("dirichlet_log", "alpha", alpha)?;
    check_matching_sizes("dirichlet_log", "theta", theta, "alpha", alpha)?;
    let alpha = alpha.entries();
    for &a in &alpha {
        check_positive("dirichlet_log", "alpha", a)?;
        check_finite_value("dirichlet_log", "alpha", a)?;
    }
    let theta = theta.entries();

    let mut lp = <Promoted<Th::Elem, Al::Elem>>::zero();
    if !PROPTO || !Al::Elem::IS_CONSTANT {
        let lgammas: Vec<Al::Elem> = alpha.iter().map(|&a| a.lgamma()).collect();
        let norm = Al::Elem::sum(&alpha).lgamma() - Al::Elem::sum(&lgammas);
        lp = lp + <Th::Elem as Promote<Al::Elem>>::lift_rhs(norm);
    }
    if !PROPTO || !(Th::Elem::IS_CONSTANT && Al::Elem::IS_CONSTANT) {
        let weights: Vec<_> = alpha
            .iter()
            .map(|&a| <Th::Elem as Promote<Al::Elem>>::lift_rhs(a - Al::Elem::one()))
            .collect();
        let logs: Vec<_> = theta
            .iter()
            .map(|&t| <Th::Elem as Promote<Al::Elem>>::lift(t.ln()))
            .collect();
        lp = lp + <Promoted<Th::Elem, Al::Elem> as Scalar>::dot(&weights, &logs);
    }
    Ok(lp)
}

/// Univariate normal log density.
pub fn normal_log<const PROPTO: bool, Y, M, S>(y: Y, mu: M, sigma: S) -> Result<Promoted3<Y, M, S>>
where
    Y: Promote<M>,
    M: Scalar,
    S: Scalar,
    Promoted<Y, M>: Promote<S>,
{
    check_finite_value("normal_log", "y", y)?;
    check_finite_value("normal_log", "mu", mu)?;
    check_positive("normal_log", "sigma", sigma)?;
    check_finite_value("normal_log", "sigma", sigma)?;

    let mut lp = <Promoted3<Y, M, S>>::zero();
    if !PROPTO {
        lp = lp - half_log_two_pi::<Promoted3<Y, M, S>>();
    }
    if !PROPTO || !S::IS_CONSTANT {
        lp = lp - <Promoted<Y, M> as Promote<S>>::lift_rhs(sigma.ln());
    }
    if !PROPTO || !(Y::IS_CONSTANT && M::IS_CONSTANT && S::IS_CONSTANT) {
        let diff = <Y as Promote<M>>::lift(y) - <Y as Promote<M>>::lift_rhs(mu);
        let z = <Promoted<Y, M> as Promote<S>>::lift(diff)
            / <Promoted<Y, M> as Promote<S>>::lift_rhs(sigma);
        lp = lp - <Promoted3<Y, M, S>>::from_literal(0.5) * z * z;
    }
    Ok(lp)
}

/// Multivariate normal log density parameterized by the lower Cholesky
/// factor `l` of the covariance.
///
/// Only the lower triangle of `l` is read. The quadratic term is
/// `‖L⁻¹(y − μ)‖²`, computed with a lower-triangular solve.
pub fn multi_normal_cholesky_log<const PROPTO: bool, Y, M, L>(
    y: &Y,
    mu: &M,
    l: &Matrix<L>,
) -> Result<Promoted3<Y::Elem, M::Elem, L>>
where
    Y: Container,
    M: Container,
    L: Scalar,
    Y::Elem: Promote<M::Elem>,
    Promoted<Y::Elem, M::Elem>: Promote<L>,
{
    check_vector("multi_normal_cholesky_log", "y", y)?;
    check_vector("multi_normal_cholesky_log", "mu", mu)?;
    check_nonempty("multi_normal_cholesky_log", "y", y)?;
    check_matching_sizes("multi_normal_cholesky_log", "y", y, "mu", mu)?;
    check_finite("multi_normal_cholesky_log", "y", y)?;
    check_finite("multi_normal_cholesky_log", "mu", mu)?;
    check_square("multi_normal_cholesky_log", "L", l)?;

    let diff: Vector<Promoted3<Y::Elem, M::Elem, L>> = Vector::from_vec(
        y.entries()
            .into_iter()
            .zip(mu.entries())
            .map(|(a, b)| {
                let d = <Y::Elem as Promote<M::Elem>>::lift(a)
                    - <Y::Elem as Promote<M::Elem>>::lift_rhs(b);
                <Promoted<Y::Elem, M::Elem> as Promote<L>>::lift(d)
            })
            .collect(),
    );
    check_multiplicable("multi_normal_cholesky_log", "L", l, "y", &diff)?;

    let n = diff.len();
    let mut lp = <Promoted3<Y::Elem, M::Elem, L>>::zero();
    if !PROPTO {
        lp = lp - <Promoted3<Y::Elem, M::Elem, L>>::from_literal(n as f64)
            * half_log_two_pi::<Promoted3<Y::Elem, M::Elem, L>>();
    }
    if !PROPTO || !L::IS_CONSTANT {
        let logs: Vec<L> = (0..n).map(|i| l[(i, i)].ln()).collect();
        lp = lp - <Promoted<Y::Elem, M::Elem> as Promote<L>>::lift_rhs(L::sum(&logs));
    }
    if !PROPTO || !(Y::Elem::IS_CONSTANT && M::Elem::IS_CONSTANT && L::IS_CONSTANT) {
        let l = l.map(<Promoted<Y::Elem, M::Elem> as Promote<L>>::lift_rhs);
        let z = mdivide_left_tri_low(&l, &diff)?;
        let z = z.as_slice();
        let half = <Promoted3<Y::Elem, M::Elem, L>>::from_literal(0.5);
        lp = lp - half * <Promoted3<Y::Elem, M::Elem, L> as Scalar>::dot(z, z);
    }
    Ok(lp)
}
