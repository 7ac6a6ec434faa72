use approx::assert_relative_eq;
use nestad::container::matrix_from_rows;
use nestad::linalg::{
    cholesky_decompose, eigenvalues, eigenvalues_sym, eigenvectors_sym, multiply,
    multiply_lower_tri_self_transpose, sum, transpose,
};
use nestad::tape::{Tape, TapeGuard};
use nestad::{Error, Matrix, Reverse};

#[test]
fn cholesky_round_trip() {
    let a = matrix_from_rows::<f64>(2, 2, &[3.0, -1.0, -1.0, 1.0]);
    let l = cholesky_decompose(&a).unwrap();
    assert_relative_eq!(l[(0, 0)], 3.0_f64.sqrt(), max_relative = 1e-14);
    assert_relative_eq!(l[(1, 0)], -1.0 / 3.0_f64.sqrt(), max_relative = 1e-14);
    assert_relative_eq!(l[(1, 1)], (2.0_f64 / 3.0).sqrt(), max_relative = 1e-14);
    assert_eq!(l[(0, 1)], 0.0);

    let back = multiply_lower_tri_self_transpose(&l);
    for (p, q) in back.iter().zip(a.iter()) {
        assert_relative_eq!(*p, *q, epsilon = 1e-14);
    }
}

#[test]
fn cholesky_gradient_of_the_leading_entry() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let leaves: Vec<Reverse<f64>> = [4.0, 2.0, 2.0, 5.0].iter().map(|&v| Reverse::variable(v)).collect();
    let a = Matrix::from_fn(2, 2, |i, j| leaves[i * 2 + j]);

    let l = cholesky_decompose(&a).unwrap();
    // L₀₀ = √a₀₀
    assert_eq!(l[(0, 0)].grad(&leaves), vec![0.25, 0.0, 0.0, 0.0]);
    // L₁₀ = a₁₀ / √a₀₀, read from the lower triangle only
    let g = l[(1, 0)].grad(&leaves);
    assert_relative_eq!(g[0], -2.0 / 16.0, epsilon = 1e-14);
    assert_eq!(g[1], 0.0);
    assert_relative_eq!(g[2], 0.5, epsilon = 1e-14);
}

#[test]
fn cholesky_rejects_non_positive_definite() {
    let a = matrix_from_rows::<f64>(2, 2, &[1.0, 2.0, 2.0, 1.0]);
    assert!(matches!(
        cholesky_decompose(&a),
        Err(Error::NotPositiveDefinite { function: "cholesky_decompose", .. })
    ));
    let asym = matrix_from_rows::<f64>(2, 2, &[1.0, 2.0, 0.0, 1.0]);
    assert!(matches!(cholesky_decompose(&asym), Err(Error::NotSymmetric { .. })));
}

#[test]
fn eigenvalues_are_ascending() {
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 1.0, 1.0, 2.0]);
    let e = eigenvalues_sym(&a).unwrap();
    assert_relative_eq!(e[0], 1.0, epsilon = 1e-14);
    assert_relative_eq!(e[1], 3.0, epsilon = 1e-14);

    let d = matrix_from_rows::<f64>(3, 3, &[5.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 2.0]);
    let e = eigenvalues(&d).unwrap();
    assert_eq!(e.as_slice(), &[-1.0, 2.0, 5.0]);
}

#[test]
fn eigenvalue_sum_follows_the_trace() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    // lower triangle as leaves, mirrored into the upper triangle
    let lower = [(0, 0, 2.0), (1, 0, 1.0), (1, 1, 3.0), (2, 0, 0.5), (2, 1, 1.0), (2, 2, 4.0)];
    let leaves: Vec<Reverse<f64>> = lower.iter().map(|&(_, _, v)| Reverse::variable(v)).collect();
    let mut a = Matrix::from_element(3, 3, Reverse::constant(0.0));
    for (k, &(i, j, _)) in lower.iter().enumerate() {
        a[(i, j)] = leaves[k];
        a[(j, i)] = leaves[k];
    }

    let e = eigenvalues_sym(&a).unwrap();
    assert_relative_eq!(sum(&e).val(), 9.0, epsilon = 1e-12);
    let g = sum(&e).grad(&leaves);
    for (k, &(i, j, _)) in lower.iter().enumerate() {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert_relative_eq!(g[k], expected, epsilon = 1e-10);
    }
}

#[test]
fn eigenvectors_are_orthonormal_and_satisfy_the_equation() {
    let a = matrix_from_rows::<f64>(3, 3, &[2.0, 1.0, 0.5, 1.0, 3.0, 1.0, 0.5, 1.0, 4.0]);
    let values = eigenvalues_sym(&a).unwrap();
    let v = eigenvectors_sym(&a).unwrap();

    let vtv = multiply(&transpose(&v), &v).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(vtv[(i, j)], expected, epsilon = 1e-12);
        }
    }

    let av = multiply(&a, &v).unwrap();
    for j in 0..3 {
        for i in 0..3 {
            assert_relative_eq!(av[(i, j)], values[j] * v[(i, j)], epsilon = 1e-12);
        }
    }
}

#[test]
fn eigen_shape_errors() {
    let rect = matrix_from_rows::<f64>(2, 3, &[1.0; 6]);
    assert!(matches!(eigenvalues(&rect), Err(Error::NotSquare { .. })));
    let asym = matrix_from_rows::<f64>(2, 2, &[1.0, 2.0, 0.0, 1.0]);
    assert!(matches!(eigenvectors_sym(&asym), Err(Error::NotSymmetric { .. })));
    let e = eigenvalues(&asym).unwrap();
    assert_eq!(e.as_slice(), &[1.0, 1.0]);
}

#[test]
fn general_eigenvalues_read_the_whole_matrix() {
    let a = matrix_from_rows::<f64>(2, 2, &[2.0, 0.0, 1.0, 3.0]);
    let e = eigenvalues(&a).unwrap();
    assert_relative_eq!(e[0], 2.0, epsilon = 1e-14);
    assert_relative_eq!(e[1], 3.0, epsilon = 1e-14);

    let a = matrix_from_rows::<f64>(3, 3, &[1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 13.0, 11.0, 19.0]);
    let e = eigenvalues(&a).unwrap();
    let expected = [-0.858_905_585_967_207_2, 1.315_909_060_739_341, 26.542_996_525_227_81];
    for (got, want) in e.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-10);
    }
}

#[test]
fn complex_pairs_report_their_real_part() {
    // rotation block with eigenvalues 1 ± 2i next to a real triangular block
    let a = matrix_from_rows::<f64>(
        4,
        4,
        &[1.0, -2.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.0, 4.0],
    );
    let e = eigenvalues(&a).unwrap();
    for (got, want) in e.iter().zip([1.0, 1.0, 3.0, 4.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
}

#[test]
fn general_eigenvalue_gradients() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let values = [1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 13.0, 11.0, 19.0];
    let leaves: Vec<Reverse<f64>> = values.iter().map(|&v| Reverse::variable(v)).collect();
    let a = Matrix::from_fn(3, 3, |i, j| leaves[3 * i + j]);

    let e = eigenvalues(&a).unwrap();
    let total = sum(&e);
    assert_relative_eq!(total.val(), 27.0, epsilon = 1e-10);
    let g = total.grad(&leaves);
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(g[3 * i + j], expected, epsilon = 1e-8);
        }
    }
    // ∂λ_max/∂a₀₁, checked against a central difference
    assert_relative_eq!(e[2].grad(&leaves)[1], 0.223_812_6, epsilon = 1e-6);
}

#[test]
fn two_by_two_eigenvalue_partials() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let leaves: Vec<Reverse<f64>> =
        [2.0, 0.0, 1.0, 3.0].iter().map(|&v| Reverse::variable(v)).collect();
    let a = Matrix::from_fn(2, 2, |i, j| leaves[2 * i + j]);
    let e = eigenvalues(&a).unwrap();
    let lo = e[0].grad(&leaves);
    let hi = e[1].grad(&leaves);
    for (got, want) in lo.iter().zip([1.0, -1.0, 0.0, 0.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
    for (got, want) in hi.iter().zip([0.0, 1.0, 0.0, 1.0]) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
}
