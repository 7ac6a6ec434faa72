use approx::assert_relative_eq;
use nestad::container::{matrix_from_rows, row_vector_from, vector_from};
use nestad::linalg::{
    inverse_tri, mdivide_left_tri, mdivide_left_tri_low, mdivide_right_tri, mdivide_right_tri_low,
    Triangle,
};
use nestad::tape::{Tape, TapeGuard};
use nestad::{Dual, DualReverse64, Error, Matrix, Reverse, RowVector, Vector};

const Y: [f64; 9] = [1.0, 0.0, 0.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0];
const Z: [f64; 3] = [1.0, 2.0, 3.0];

#[test]
fn forward_over_reverse_lower_solve() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let y_leaves: Vec<Reverse<f64>> = Y.iter().map(|&v| Reverse::variable(v)).collect();
    let z_leaves: Vec<Reverse<f64>> = Z.iter().map(|&v| Reverse::variable(v)).collect();
    let two = Reverse::constant(2.0);
    let y: Matrix<DualReverse64> = Matrix::from_fn(3, 3, |i, j| Dual::new(y_leaves[i * 3 + j], two));
    let z: Vector<DualReverse64> = Vector::from_iterator(3, z_leaves.iter().map(|&r| Dual::new(r, two)));

    let x = mdivide_left_tri_low(&y, &z).unwrap();

    assert_relative_eq!(x[0].re.val(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(x[1].re.val(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(x[2].re.val(), -1.0 / 6.0, epsilon = 1e-12);

    // dX = Y⁻¹(dZ − dY·X) with dY restricted to the lower triangle
    assert_relative_eq!(x[0].eps.val(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(x[1].eps.val(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(x[2].eps.val(), 5.0 / 90.0, epsilon = 1e-12);

    // x₀ = z₀ / y₀₀
    let g = x[0].re.grad(&y_leaves);
    assert_relative_eq!(g[0], -1.0, epsilon = 1e-12);
    // tangent of x₀ is 2/y₀₀ − 2z₀/y₀₀²
    let g = x[0].eps.grad(&y_leaves);
    assert_relative_eq!(g[0], 2.0, epsilon = 1e-12);
}

#[test]
fn upper_triangle_never_contributes() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let y_leaves: Vec<Reverse<f64>> = Y.iter().map(|&v| Reverse::variable(v)).collect();
    let two = Reverse::constant(2.0);
    let y: Matrix<DualReverse64> = Matrix::from_fn(3, 3, |i, j| Dual::new(y_leaves[i * 3 + j], two));
    let z: Vector<f64> = vector_from(&Z);

    let x = mdivide_left_tri_low(&y, &z).unwrap();
    let upper = [1, 2, 5];
    for xi in x.iter() {
        let g_re = xi.re.grad(&y_leaves);
        let g_eps = xi.eps.grad(&y_leaves);
        for &k in &upper {
            assert_eq!(g_re[k], 0.0);
            assert_eq!(g_eps[k], 0.0);
        }
    }
}

#[test]
fn upper_values_do_not_change_the_result() {
    let clean = matrix_from_rows::<f64>(3, 3, &Y);
    let mut noisy = clean.clone();
    noisy[(0, 1)] = 17.0;
    noisy[(0, 2)] = -4.5;
    noisy[(1, 2)] = 1e6;
    let z: Vector<f64> = vector_from(&Z);

    let a = mdivide_left_tri_low(&clean, &z).unwrap();
    let b = mdivide_left_tri_low(&noisy, &z).unwrap();
    assert_eq!(a, b);

    let r: RowVector<f64> = row_vector_from(&Z);
    let a = mdivide_right_tri_low(&r, &clean).unwrap();
    let b = mdivide_right_tri_low(&r, &noisy).unwrap();
    assert_eq!(a, b);
}

#[test]
fn upper_triangular_solve() {
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 1.0, 99.0, 4.0]);
    let b: Vector<f64> = vector_from(&[3.0, 8.0]);
    let x = mdivide_left_tri(Triangle::Upper, &a, &b).unwrap();
    assert_relative_eq!(x[0], 0.5);
    assert_relative_eq!(x[1], 2.0);
}

#[test]
fn right_division() {
    // x · A = b
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 0.0, 1.0, 4.0]);
    let b: RowVector<f64> = row_vector_from(&[4.0, 8.0]);
    let x = mdivide_right_tri_low(&b, &a).unwrap();
    assert_relative_eq!(x[0], 1.0);
    assert_relative_eq!(x[1], 2.0);

    let u = a.transpose();
    let x = mdivide_right_tri(Triangle::Upper, &b, &u).unwrap();
    // x · Aᵀ = b
    assert_relative_eq!(x[0] * 2.0, 4.0);
    assert_relative_eq!(x[0] * 1.0 + x[1] * 4.0, 8.0);
}

#[test]
fn matrix_right_hand_side() {
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 0.0, 1.0, 4.0]);
    let b = matrix_from_rows::<f64>(2, 2, &[2.0, 4.0, 5.0, 6.0]);
    let x = mdivide_left_tri_low(&a, &b).unwrap();
    let back = nestad::linalg::multiply(&a, &x).unwrap();
    for (p, q) in back.iter().zip(b.iter()) {
        assert_relative_eq!(*p, *q, max_relative = 1e-14);
    }
}

#[test]
fn triangular_inverse() {
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 0.0, 1.0, 4.0]);
    let inv = inverse_tri(Triangle::Lower, &a).unwrap();
    assert_relative_eq!(inv[(0, 0)], 0.5);
    assert_relative_eq!(inv[(0, 1)], 0.0);
    assert_relative_eq!(inv[(1, 0)], -0.125);
    assert_relative_eq!(inv[(1, 1)], 0.25);
}

#[test]
fn shape_errors() {
    let rect = matrix_from_rows::<f64>(2, 3, &[1.0; 6]);
    let b: Vector<f64> = vector_from(&[1.0, 2.0]);
    assert!(matches!(
        mdivide_left_tri_low(&rect, &b),
        Err(Error::NotSquare { function: "mdivide_left_tri", arg: "a", rows: 2, cols: 3 })
    ));

    let a = matrix_from_rows::<f64>(3, 3, &Y);
    let err = mdivide_left_tri_low(&a, &b).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));

    let r: RowVector<f64> = row_vector_from(&[1.0, 2.0]);
    assert!(mdivide_right_tri_low(&r, &a).is_err());
    assert!(matches!(
        inverse_tri(Triangle::Upper, &rect),
        Err(Error::NotSquare { .. })
    ));
}
