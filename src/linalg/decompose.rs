use num_traits::Float;

use crate::check::{check_square, check_symmetric};
use crate::container::{Matrix, Vector};
use crate::error::{Error, Result};
use crate::scalar::Scalar;

use super::dot;

/// Upper bound on Jacobi sweeps; convergence is quadratic, so this is only
/// reached for pathological input.
const MAX_SWEEPS: usize = 64;

/// Iteration budget per eigenvalue for the Hessenberg QR solver.
const MAX_QR_ITERATIONS: usize = 60;

/// Lower-triangular `L` with `A = L·Lᵀ`.
///
/// `A` must be symmetric and positive definite. Only its lower triangle is
/// read.
pub fn cholesky_decompose<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>> {
    check_symmetric("cholesky_decompose", "a", a)?;
    let n = a.nrows();
    let mut rows: Vec<Vec<T>> = vec![Vec::with_capacity(n); n];
    for j in 0..n {
        let s = a[(j, j)] - dot(&rows[j][..j], &rows[j][..j]);
        if !(s.value() > <T::Float as num_traits::Zero>::zero()) {
            log::debug!(
                "cholesky_decompose: non-positive pivot {} at column {}",
                s.value(),
                j
            );
            return Err(Error::NotPositiveDefinite {
                function: "cholesky_decompose",
                arg: "a",
            });
        }
        let d = s.sqrt();
        rows[j].push(d);
        for i in (j + 1)..n {
            let l = (a[(i, j)] - dot(&rows[i][..j], &rows[j][..j])) / d;
            rows[i].push(l);
        }
    }
    Ok(Matrix::from_fn(n, n, |i, j| {
        if j <= i {
            rows[i][j]
        } else {
            T::zero()
        }
    }))
}

/// Cyclic Jacobi eigen-solver on the lower triangle of `a`.
///
/// Returns eigenvalues in ascending order and the matching eigenvectors as
/// columns. Each rotation is ordinary arithmetic on the entries, so the
/// eigenvalues carry derivatives of every order; the rotated diagonal keeps
/// the trace exactly.
fn jacobi<T: Scalar>(a: &Matrix<T>) -> (Vec<T>, Matrix<T>) {
    let n = a.nrows();
    let mut s = Matrix::from_fn(n, n, |i, j| if i >= j { a[(i, j)] } else { a[(j, i)] });
    let mut v = Matrix::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() });
    let eps = <T::Float as num_traits::Float>::epsilon();
    let one = T::one();

    for sweep in 0..MAX_SWEEPS {
        let mut off = <T::Float as num_traits::Zero>::zero();
        let mut diag = off;
        for j in 0..n {
            for i in 0..n {
                let x = s[(i, j)].value();
                if i == j {
                    diag = diag + x * x;
                } else {
                    off = off + x * x;
                }
            }
        }
        if off <= eps * eps * diag {
            log::trace!("jacobi converged after {} sweeps", sweep);
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = s[(p, q)];
                if apq.value() == <T::Float as num_traits::Zero>::zero() {
                    continue;
                }
                let theta = (s[(q, q)] - s[(p, p)]) / (T::from_literal(2.0) * apq);
                let t = if theta.value() >= <T::Float as num_traits::Zero>::zero() {
                    one / (theta + (theta * theta + one).sqrt())
                } else {
                    -one / (-theta + (theta * theta + one).sqrt())
                };
                let c = one / (t * t + one).sqrt();
                let sn = t * c;

                let app = s[(p, p)];
                let aqq = s[(q, q)];
                s[(p, p)] = app - t * apq;
                s[(q, q)] = aqq + t * apq;
                s[(p, q)] = T::zero();
                s[(q, p)] = T::zero();
                for r in 0..n {
                    if r != p && r != q {
                        let arp = s[(r, p)];
                        let arq = s[(r, q)];
                        let new_rp = c * arp - sn * arq;
                        let new_rq = sn * arp + c * arq;
                        s[(r, p)] = new_rp;
                        s[(p, r)] = new_rp;
                        s[(r, q)] = new_rq;
                        s[(q, r)] = new_rq;
                    }
                }
                for r in 0..n {
                    let vrp = v[(r, p)];
                    let vrq = v[(r, q)];
                    v[(r, p)] = c * vrp - sn * vrq;
                    v[(r, q)] = sn * vrp + c * vrq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        s[(i, i)]
            .value()
            .partial_cmp(&s[(j, j)].value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let values = order.iter().map(|&k| s[(k, k)]).collect();
    let vectors = Matrix::from_fn(n, n, |i, j| v[(i, order[j])]);
    (values, vectors)
}

/// Householder reduction to upper Hessenberg form, a similarity transform.
fn hessenberg<T: Scalar>(a: &Matrix<T>) -> Matrix<T> {
    let n = a.nrows();
    let zero = <T::Float as num_traits::Zero>::zero();
    let mut h = a.clone();
    for k in 0..n.saturating_sub(2) {
        let x: Vec<T> = ((k + 1)..n).map(|i| h[(i, k)]).collect();
        if x[1..].iter().all(|xi| xi.value() == zero) {
            continue;
        }
        let norm = dot(&x, &x).sqrt();
        let alpha = if x[0].value() >= zero { -norm } else { norm };
        let mut v = x;
        v[0] = v[0] - alpha;
        let beta = T::from_literal(2.0) / dot(&v, &v);
        let m = v.len();

        for j in k..n {
            let s = beta * (0..m).fold(T::zero(), |acc, i| acc + v[i] * h[(k + 1 + i, j)]);
            for i in 0..m {
                h[(k + 1 + i, j)] = h[(k + 1 + i, j)] - s * v[i];
            }
        }
        for i in 0..n {
            let s = beta * (0..m).fold(T::zero(), |acc, j| acc + h[(i, k + 1 + j)] * v[j]);
            for j in 0..m {
                h[(i, k + 1 + j)] = h[(i, k + 1 + j)] - s * v[j];
            }
        }
        for i in (k + 2)..n {
            h[(i, k)] = T::zero();
        }
    }
    h
}

/// `|a|` carrying the sign of `b`.
fn with_sign<T: Scalar>(a: T, b: T) -> T {
    if b.value() >= <T::Float as num_traits::Zero>::zero() {
        a.abs()
    } else {
        -a.abs()
    }
}

/// Francis double-shift QR on an upper Hessenberg matrix.
///
/// Returns the real parts of the eigenvalues, ascending; a complex pair
/// contributes its shared real part twice. Deflation and shift decisions
/// look at primal values only, so the iteration count is fixed by the
/// primal matrix and derivatives follow the same sequence of rotations.
fn hessenberg_qr<T: Scalar>(mut h: Matrix<T>) -> Result<Vec<T>> {
    let n = h.nrows();
    let zero = <T::Float as num_traits::Zero>::zero();
    let half = T::from_literal(0.5);
    let mut anorm = zero;
    for i in 0..n {
        for j in i.saturating_sub(1)..n {
            anorm = anorm + h[(i, j)].value().abs();
        }
    }

    let mut out = Vec::with_capacity(n);
    let mut shift = T::zero();
    let mut end = n;
    while end > 0 {
        let nn = end - 1;
        let mut its = 0;
        loop {
            let mut l = nn;
            while l > 0 {
                let mut s = h[(l - 1, l - 1)].value().abs() + h[(l, l)].value().abs();
                if s == zero {
                    s = anorm;
                }
                if h[(l, l - 1)].value().abs() + s == s {
                    h[(l, l - 1)] = T::zero();
                    break;
                }
                l -= 1;
            }

            let mut x = h[(nn, nn)];
            if l == nn {
                out.push(x + shift);
                end -= 1;
                break;
            }
            let mut y = h[(nn - 1, nn - 1)];
            let mut w = h[(nn, nn - 1)] * h[(nn - 1, nn)];
            if l == nn - 1 {
                let p = half * (y - x);
                let q = p * p + w;
                let x = x + shift;
                if q.value() >= zero {
                    let z = p + with_sign(q.abs().sqrt(), p);
                    out.push(x + z);
                    out.push(if z.value() != zero { x - w / z } else { x + z });
                } else {
                    out.push(x + p);
                    out.push(x + p);
                }
                end -= 2;
                break;
            }

            if its == MAX_QR_ITERATIONS {
                log::debug!("eigenvalues: QR stalled with {} values left", end);
                return Err(Error::NoConvergence {
                    function: "eigenvalues",
                    arg: "a",
                    iterations: its,
                });
            }
            if its == 10 || its == 20 {
                // exceptional shift
                shift = shift + x;
                for i in 0..=nn {
                    h[(i, i)] = h[(i, i)] - x;
                }
                let s = h[(nn, nn - 1)].abs() + h[(nn - 1, nn - 2)].abs();
                x = T::from_literal(0.75) * s;
                y = x;
                w = T::from_literal(-0.4375) * s * s;
            }
            its += 1;

            // look for two consecutive small subdiagonal elements
            let mut m = nn - 2;
            let mut p;
            let mut q;
            let mut r;
            loop {
                let z = h[(m, m)];
                let rr = x - z;
                let ss = y - z;
                p = (rr * ss - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - rr - ss;
                r = h[(m + 2, m + 1)];
                let s = p.abs() + q.abs() + r.abs();
                p = p / s;
                q = q / s;
                r = r / s;
                if m == l {
                    break;
                }
                let u = h[(m, m - 1)].value().abs() * (q.value().abs() + r.value().abs());
                let v = p.value().abs()
                    * (h[(m - 1, m - 1)].value().abs()
                        + z.value().abs()
                        + h[(m + 1, m + 1)].value().abs());
                if u + v == v {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=nn {
                h[(i, i - 2)] = T::zero();
                if i != m + 2 {
                    h[(i, i - 3)] = T::zero();
                }
            }

            for k in m..nn {
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if k != nn - 1 { h[(k + 2, k - 1)] } else { T::zero() };
                    x = p.abs() + q.abs() + r.abs();
                    if x.value() != zero {
                        p = p / x;
                        q = q / x;
                        r = r / x;
                    }
                }
                let s = with_sign((p * p + q * q + r * r).sqrt(), p);
                if s.value() == zero {
                    continue;
                }
                if k == m {
                    if l != m {
                        h[(k, k - 1)] = -h[(k, k - 1)];
                    }
                } else {
                    h[(k, k - 1)] = -s * x;
                }
                p = p + s;
                x = p / s;
                y = q / s;
                let z = r / s;
                q = q / p;
                r = r / p;

                for j in k..=nn {
                    let mut t = h[(k, j)] + q * h[(k + 1, j)];
                    if k != nn - 1 {
                        t = t + r * h[(k + 2, j)];
                        h[(k + 2, j)] = h[(k + 2, j)] - t * z;
                    }
                    h[(k + 1, j)] = h[(k + 1, j)] - t * y;
                    h[(k, j)] = h[(k, j)] - t * x;
                }
                for i in l..=nn.min(k + 3) {
                    let mut t = x * h[(i, k)] + y * h[(i, k + 1)];
                    if k != nn - 1 {
                        t = t + z * h[(i, k + 2)];
                        h[(i, k + 2)] = h[(i, k + 2)] - t * r;
                    }
                    h[(i, k + 1)] = h[(i, k + 1)] - t * q;
                    h[(i, k)] = h[(i, k)] - t;
                }
            }
        }
    }

    out.sort_by(|a, b| {
        a.value()
            .partial_cmp(&b.value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(out)
}

/// Real parts of the eigenvalues of a general square matrix, ascending.
///
/// Every entry is read. Use [`eigenvalues_sym`] for symmetric input.
pub fn eigenvalues<T: Scalar>(a: &Matrix<T>) -> Result<Vector<T>> {
    check_square("eigenvalues", "a", a)?;
    Ok(Vector::from_vec(hessenberg_qr(hessenberg(a))?))
}

/// Eigenvalues of a symmetric matrix, ascending.
pub fn eigenvalues_sym<T: Scalar>(a: &Matrix<T>) -> Result<Vector<T>> {
    check_symmetric("eigenvalues_sym", "a", a)?;
    Ok(Vector::from_vec(jacobi(a).0))
}

/// Unit eigenvectors of a symmetric matrix as columns, ordered like
/// [`eigenvalues_sym`].
pub fn eigenvectors_sym<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>> {
    check_symmetric("eigenvectors_sym", "a", a)?;
    Ok(jacobi(a).1)
}
