use approx::assert_relative_eq;
use nestad::tape::{Tape, TapeGuard};
use nestad::{Reverse, Scalar};
use num_traits::Float;

/// Run a single-variable reverse-mode differentiation.
fn reverse_grad(f: impl FnOnce(Reverse<f64>) -> Reverse<f64>, x_val: f64) -> f64 {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(x_val);
    let y = f(x);
    y.grad(&[x])[0]
}

/// Central finite difference for comparison.
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-7;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

fn check_reverse_elemental(
    f_rev: impl FnOnce(Reverse<f64>) -> Reverse<f64>,
    f_f64: impl Fn(f64) -> f64,
    x: f64,
) {
    let grad = reverse_grad(f_rev, x);
    assert_relative_eq!(grad, finite_diff(&f_f64, x), max_relative = 1e-5);
}

// ── Arithmetic ──

#[test]
fn x_squared() {
    assert_relative_eq!(reverse_grad(|x| x * x, 3.0), 6.0, max_relative = 1e-12);
}

#[test]
fn x_times_y() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(3.0);
    let y = Reverse::variable(4.0);
    let g = (x * y).grad(&[x, y]);
    assert_relative_eq!(g[0], 4.0);
    assert_relative_eq!(g[1], 3.0);
}

#[test]
fn quotient() {
    // d/dx x/y = 1/y, d/dy x/y = -x/y²
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(3.0);
    let y = Reverse::variable(4.0);
    let g = (x / y).grad(&[x, y]);
    assert_relative_eq!(g[0], 0.25, max_relative = 1e-12);
    assert_relative_eq!(g[1], -3.0 / 16.0, max_relative = 1e-12);
}

#[test]
fn diamond_pattern() {
    // z = x² + x³, dz/dx = 2x + 3x²
    let grad = reverse_grad(|x| x * x + x * x * x, 2.0);
    assert_relative_eq!(grad, 16.0, max_relative = 1e-12);
}

#[test]
fn fan_out() {
    assert_relative_eq!(reverse_grad(|x| x + x + x, 5.0), 3.0, max_relative = 1e-12);
}

#[test]
fn chain_depth() {
    // ((x²)²)² = x⁸
    let grad = reverse_grad(
        |x| {
            let a = x * x;
            let b = a * a;
            b * b
        },
        2.0,
    );
    assert_relative_eq!(grad, 8.0 * 2.0_f64.powi(7), max_relative = 1e-10);
}

#[test]
fn primitive_operands() {
    assert_relative_eq!(reverse_grad(|x| 3.0 * x, 2.0), 3.0);
    assert_relative_eq!(reverse_grad(|x| x + 5.0, 2.0), 1.0);
    assert_relative_eq!(reverse_grad(|x| 1.0 - x, 2.0), -1.0);
    assert_relative_eq!(reverse_grad(|x| 1.0 / x, 2.0), -0.25, max_relative = 1e-12);
    assert_relative_eq!(reverse_grad(|x| x / 4.0, 2.0), 0.25, max_relative = 1e-12);
}

#[test]
fn compound_assignment() {
    let grad = reverse_grad(
        |x| {
            let mut y = x;
            y *= x;
            y += x;
            y -= Reverse::constant(1.0);
            y
        },
        3.0,
    );
    // x² + x - 1
    assert_relative_eq!(grad, 7.0);
}

// ── Elementals ──

#[test]
fn elementals_match_finite_differences() {
    check_reverse_elemental(|x| x.sin(), |x| x.sin(), 1.0);
    check_reverse_elemental(|x| x.cos(), |x| x.cos(), 1.0);
    check_reverse_elemental(|x| x.tan(), |x| x.tan(), 0.5);
    check_reverse_elemental(|x| x.exp(), |x| x.exp(), 1.0);
    check_reverse_elemental(|x| x.ln(), |x| x.ln(), 2.0);
    check_reverse_elemental(|x| x.sqrt(), |x| x.sqrt(), 4.0);
    check_reverse_elemental(|x| x.cbrt(), |x| x.cbrt(), 8.0);
    check_reverse_elemental(|x| x.recip(), |x| x.recip(), 2.5);
    check_reverse_elemental(|x| x.powi(3), |x| x.powi(3), 2.0);
    check_reverse_elemental(|x| x.powf(Reverse::constant(2.5)), |x| x.powf(2.5), 1.7);
    check_reverse_elemental(|x| x.tanh(), |x| x.tanh(), 1.0);
    check_reverse_elemental(|x| x.asin(), |x| x.asin(), 0.5);
    check_reverse_elemental(|x| x.acos(), |x| x.acos(), 0.5);
    check_reverse_elemental(|x| x.atan(), |x| x.atan(), 1.0);
    check_reverse_elemental(|x| x.sinh(), |x| x.sinh(), 1.0);
    check_reverse_elemental(|x| x.cosh(), |x| x.cosh(), 1.0);
    check_reverse_elemental(|x| x.asinh(), |x| x.asinh(), 1.0);
    check_reverse_elemental(|x| x.acosh(), |x| x.acosh(), 2.0);
    check_reverse_elemental(|x| x.atanh(), |x| x.atanh(), 0.5);
    check_reverse_elemental(|x| x.exp2(), |x| x.exp2(), 1.5);
    check_reverse_elemental(|x| x.log2(), |x| x.log2(), 2.0);
    check_reverse_elemental(|x| x.log10(), |x| x.log10(), 2.0);
    check_reverse_elemental(|x| x.exp_m1(), |x| x.exp_m1(), 0.5);
    check_reverse_elemental(|x| x.ln_1p(), |x| x.ln_1p(), 0.5);
}

#[test]
fn lgamma_and_digamma() {
    let grad = reverse_grad(|x| x.lgamma(), 3.5);
    assert_relative_eq!(grad, 3.5_f64.digamma(), max_relative = 1e-12);
    let grad = reverse_grad(|x| x.digamma(), 3.5);
    assert_relative_eq!(grad, 3.5_f64.polygamma(1), max_relative = 1e-12);
}

#[test]
fn abs_follows_sign() {
    assert_relative_eq!(reverse_grad(|x| x.abs(), 3.0), 1.0);
    assert_relative_eq!(reverse_grad(|x| x.abs(), -3.0), -1.0);
}

#[test]
fn max_selects_operand() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(1.0);
    let y = Reverse::variable(2.0);
    let g = x.max(y).grad(&[x, y]);
    assert_eq!(g, vec![0.0, 1.0]);
}

#[test]
fn composition() {
    // f(x) = x sin x + cos(x²)
    let x_val = 1.5;
    let grad = reverse_grad(|x| x * x.sin() + (x * x).cos(), x_val);
    let expected = x_val.sin() + x_val * x_val.cos() - 2.0 * x_val * (x_val * x_val).sin();
    assert_relative_eq!(grad, expected, max_relative = 1e-10);
}

// ── Constants and tape usage ──

#[test]
fn constants_never_touch_the_tape() {
    let mut tape = Tape::<f64>::new();
    {
        let _guard = TapeGuard::new(&mut tape);
        let a = Reverse::constant(2.0);
        let b = Reverse::constant(3.0);
        let c = (a * b + a).sin() / b;
        assert!(c.is_constant());
        assert_relative_eq!(c.val(), (8.0_f64).sin() / 3.0, max_relative = 1e-12);
    }
    assert_eq!(tape.len(), 0);
    assert_eq!(tape.num_statements(), 0);
}

#[test]
fn unrelated_input_has_zero_gradient() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(2.0);
    let unused = Reverse::variable(7.0);
    let c = Reverse::constant(1.0);
    let y = x * x;
    assert_eq!(y.grad(&[x, unused, c]), vec![4.0, 0.0, 0.0]);
}

#[test]
fn repeated_grad_calls_are_independent() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(3.0);
    let y = x * x;
    let z = y * x;
    assert_eq!(y.grad(&[x]), vec![6.0]);
    assert_eq!(z.grad(&[x]), vec![27.0]);
    assert_eq!(y.grad(&[x]), vec![6.0]);
}

#[test]
fn interior_nodes_report_adjoints() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(3.0);
    let y = x * x;
    let z = Reverse::constant(2.0) * y;
    let g = z.grad(&[x, y]);
    assert_relative_eq!(g[0], 12.0);
    assert_relative_eq!(g[1], 2.0);
}

#[test]
fn scalar_dot_is_one_statement() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let a: Vec<Reverse<f64>> = [1.0, 2.0, 3.0].iter().map(|&v| Reverse::variable(v)).collect();
    let b: Vec<Reverse<f64>> = [4.0, -2.0, -1.0].iter().map(|&v| Reverse::variable(v)).collect();
    let before = nestad::tape::with_active_tape(|t: &mut Tape<f64>| t.num_statements());
    let d = <Reverse<f64> as Scalar>::dot(&a, &b);
    let after = nestad::tape::with_active_tape(|t: &mut Tape<f64>| t.num_statements());
    assert_eq!(after - before, 1);
    assert_relative_eq!(d.val(), -3.0);
    let mut inputs = a.clone();
    inputs.extend(b.iter().copied());
    assert_eq!(d.grad(&inputs), vec![4.0, -2.0, -1.0, 1.0, 2.0, 3.0]);
}
