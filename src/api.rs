use crate::dual::Dual;
use crate::float::Float;
use crate::reverse::Reverse;
use crate::scalar::Scalar;
use crate::tape::{Tape, TapeGuard, TapeThreadLocal, CONSTANT};

/// Register one leaf per input on `tape`; leaves occupy indices `0..n`.
fn leaves<F: Float + TapeThreadLocal>(tape: &mut Tape<F>, x: &[F]) -> Vec<Reverse<F>> {
    x.iter()
        .map(|&val| {
            let (idx, v) = tape.new_variable(val);
            Reverse::from_tape(v, idx)
        })
        .collect()
}

/// Adjoints of the first `n` variables after sweeping from `seed`.
fn leaf_adjoints<F: Float>(tape: &Tape<F>, seed: u32, n: usize) -> Vec<F> {
    if seed == CONSTANT {
        return vec![F::zero(); n];
    }
    let adjoints = tape.reverse(seed);
    adjoints[..n].to_vec()
}

/// Compute the gradient of a scalar function `f : R^n → R` using reverse mode.
///
/// ```
/// let g = nestad::grad(|x: &[nestad::Reverse<f64>]| {
///     x[0] * x[0] + x[1] * x[1]
/// }, &[3.0, 4.0]);
/// assert!((g[0] - 6.0).abs() < 1e-10);
/// assert!((g[1] - 8.0).abs() < 1e-10);
/// ```
pub fn grad<F: Float + TapeThreadLocal>(
    f: impl FnOnce(&[Reverse<F>]) -> Reverse<F>,
    x: &[F],
) -> Vec<F> {
    let n = x.len();
    let mut tape = Tape::with_capacity(n * 10);
    let inputs = leaves(&mut tape, x);

    let output = {
        let _guard = TapeGuard::new(&mut tape);
        f(&inputs)
    };

    leaf_adjoints(&tape, output.index, n)
}

/// Jacobian-vector product (forward mode): `(f(x), J·v)`.
///
/// Works over any element type, so `T = Reverse<f64>` yields tangents that
/// can themselves be differentiated.
pub fn jvp<T: Scalar>(
    f: impl Fn(&[Dual<T>]) -> Vec<Dual<T>>,
    x: &[T],
    v: &[T],
) -> (Vec<T>, Vec<T>) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<T>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, vi))
        .collect();
    let outputs = f(&inputs);
    let values = outputs.iter().map(|d| d.re).collect();
    let tangents = outputs.iter().map(|d| d.eps).collect();
    (values, tangents)
}

/// Vector-Jacobian product (reverse mode): `(f(x), wᵀ·J)`.
pub fn vjp<F: Float + TapeThreadLocal>(
    f: impl FnOnce(&[Reverse<F>]) -> Vec<Reverse<F>>,
    x: &[F],
    w: &[F],
) -> (Vec<F>, Vec<F>) {
    let n = x.len();
    let mut tape = Tape::with_capacity(n * 10);
    let inputs = leaves(&mut tape, x);

    let outputs = {
        let _guard = TapeGuard::new(&mut tape);
        f(&inputs)
    };

    assert_eq!(
        outputs.len(),
        w.len(),
        "output length must match weight vector length"
    );

    let values: Vec<F> = outputs.iter().map(|r| r.value).collect();
    let seeds: Vec<(u32, F)> = outputs
        .iter()
        .zip(w.iter())
        .map(|(r, &wi)| (r.index, wi))
        .collect();
    let adjoints = tape.reverse_seeded(&seeds);

    (values, adjoints[..n].to_vec())
}

/// Full Jacobian of `f : R^n → R^m` using forward mode, one pass per input.
///
/// Returns `(f(x), J)` where `J[i][j] = ∂f_i/∂x_j`.
pub fn jacobian<T: Scalar>(
    f: impl Fn(&[Dual<T>]) -> Vec<Dual<T>>,
    x: &[T],
) -> (Vec<T>, Vec<Vec<T>>) {
    let n = x.len();

    let const_inputs: Vec<Dual<T>> = x.iter().map(|&xi| Dual::constant(xi)).collect();
    let const_outputs = f(&const_inputs);
    let m = const_outputs.len();
    let values: Vec<T> = const_outputs.iter().map(|d| d.re).collect();

    let mut jac = vec![vec![T::zero(); n]; m];
    for j in 0..n {
        let inputs: Vec<Dual<T>> = x
            .iter()
            .enumerate()
            .map(|(k, &xi)| {
                if k == j {
                    Dual::variable(xi)
                } else {
                    Dual::constant(xi)
                }
            })
            .collect();
        let outputs = f(&inputs);
        for (row, out) in jac.iter_mut().zip(outputs.iter()) {
            row[j] = out.eps;
        }
    }

    (values, jac)
}

/// Evaluate `f` in forward-over-reverse mode along `direction`, recording on
/// `tape` against the shared `inputs`.
fn directional<F: Float + TapeThreadLocal>(
    f: &impl Fn(&[Dual<Reverse<F>>]) -> Dual<Reverse<F>>,
    tape: &mut Tape<F>,
    inputs: &[Reverse<F>],
    direction: impl Fn(usize) -> F,
) -> Dual<Reverse<F>> {
    let duals: Vec<Dual<Reverse<F>>> = inputs
        .iter()
        .enumerate()
        .map(|(i, &r)| Dual::new(r, Reverse::constant(direction(i))))
        .collect();
    let _guard = TapeGuard::new(tape);
    f(&duals)
}

/// Hessian-vector product via forward-over-reverse.
///
/// Returns `(gradient, H·v)`. The tangent of the output is itself a tape
/// node, so one extra reverse sweep from it yields `H·v`.
pub fn hvp<F: Float + TapeThreadLocal>(
    f: impl Fn(&[Dual<Reverse<F>>]) -> Dual<Reverse<F>>,
    x: &[F],
    v: &[F],
) -> (Vec<F>, Vec<F>) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let n = x.len();
    let mut tape = Tape::with_capacity(n * 20);
    let inputs = leaves(&mut tape, x);
    let y = directional(&f, &mut tape, &inputs, |i| v[i]);
    (
        leaf_adjoints(&tape, y.re.index, n),
        leaf_adjoints(&tape, y.eps.index, n),
    )
}

/// Value, gradient and full Hessian via forward-over-reverse.
///
/// Runs one forward pass per input direction on a single tape. Returns
/// `(value, gradient, hessian)` where `hessian[i][j] = ∂²f/∂x_i∂x_j`.
pub fn grad_hessian<F: Float + TapeThreadLocal>(
    f: impl Fn(&[Dual<Reverse<F>>]) -> Dual<Reverse<F>>,
    x: &[F],
) -> (F, Vec<F>, Vec<Vec<F>>) {
    let n = x.len();
    let mut tape = Tape::with_capacity(n * n * 10 + 10);
    let inputs = leaves(&mut tape, x);

    let y = directional(&f, &mut tape, &inputs, |_| F::zero());
    let value = y.re.value;
    let gradient = leaf_adjoints(&tape, y.re.index, n);

    let mut hessian = Vec::with_capacity(n);
    for j in 0..n {
        let y = directional(&f, &mut tape, &inputs, |i| if i == j { F::one() } else { F::zero() });
        hessian.push(leaf_adjoints(&tape, y.eps.index, n));
    }
    log::debug!(
        "grad_hessian: {} inputs, {} tape statements",
        n,
        tape.num_statements()
    );

    (value, gradient, hessian)
}

/// Full Hessian matrix via forward-over-reverse.
pub fn hessian<F: Float + TapeThreadLocal>(
    f: impl Fn(&[Dual<Reverse<F>>]) -> Dual<Reverse<F>>,
    x: &[F],
) -> Vec<Vec<F>> {
    grad_hessian(f, x).2
}
