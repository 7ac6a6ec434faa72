use approx::assert_relative_eq;
use nestad::container::{matrix_from_rows, row_vector_from, vector_from};
use nestad::linalg::{
    append_col, append_row, diag_matrix, diagonal, head, rep_matrix, segment, tail, transpose,
};
use nestad::tape::{Tape, TapeGuard};
use nestad::{Error, Matrix, Reverse, RowVector, Vector};

#[test]
fn head_tail_and_segment() {
    let v: Vector<f64> = vector_from(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(head(&v, 2).unwrap().as_slice(), &[1.0, 2.0]);
    assert_eq!(tail(&v, 3).unwrap().as_slice(), &[2.0, 3.0, 4.0]);
    assert_eq!(segment(&v, 1, 2).unwrap().as_slice(), &[2.0, 3.0]);
    assert_eq!(head(&v, 0).unwrap().len(), 0);

    let r: RowVector<f64> = row_vector_from(&[1.0, 2.0, 3.0]);
    let t = tail(&r, 1).unwrap();
    assert_eq!((t.nrows(), t.ncols()), (1, 1));

    let s = vec![5.0_f64, 6.0, 7.0];
    assert_eq!(segment(&s, 2, 1).unwrap(), vec![7.0]);
}

#[test]
fn slicing_bounds() {
    let v: Vector<f64> = vector_from(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        head(&v, 4),
        Err(Error::SizeExceeded { function: "head", requested: 4, available: 3, .. })
    ));
    assert!(matches!(tail(&v, 4), Err(Error::SizeExceeded { .. })));
    assert!(matches!(
        segment(&v, 3, 1),
        Err(Error::IndexOutOfRange { index: 3, size: 3, .. })
    ));
    assert!(matches!(
        segment(&v, 2, 2),
        Err(Error::SizeExceeded { requested: 4, .. })
    ));
}

#[test]
fn slices_keep_derivatives() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let leaves: Vec<Reverse<f64>> = [1.0, 2.0, 3.0].iter().map(|&v| Reverse::variable(v)).collect();
    let v = Vector::from_vec(leaves.clone());
    let s = segment(&v, 1, 1).unwrap();
    assert_eq!(s[0].grad(&leaves), vec![0.0, 1.0, 0.0]);
}

#[test]
fn appending() {
    let a = matrix_from_rows::<f64>(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let c: Vector<f64> = vector_from(&[5.0, 6.0]);
    let r: RowVector<f64> = row_vector_from(&[7.0, 8.0]);

    let wide = append_col(&a, &c).unwrap();
    assert_eq!(wide, matrix_from_rows::<f64>(2, 3, &[1.0, 2.0, 5.0, 3.0, 4.0, 6.0]));
    let tall = append_row(&a, &r).unwrap();
    assert_eq!(tall, matrix_from_rows::<f64>(3, 2, &[1.0, 2.0, 3.0, 4.0, 7.0, 8.0]));

    assert!(matches!(
        append_col(&a, &vector_from::<f64>(&[1.0, 2.0, 3.0])),
        Err(Error::DimensionMismatch { function: "append_col", .. })
    ));
    assert!(matches!(
        append_row(&a, &row_vector_from::<f64>(&[1.0])),
        Err(Error::DimensionMismatch { function: "append_row", .. })
    ));
}

#[test]
fn appending_promotes_mixed_operands() {
    let mut tape = Tape::<f64>::new();
    let _guard = TapeGuard::new(&mut tape);
    let x = Reverse::variable(2.0);
    let a: Matrix<f64> = matrix_from_rows::<f64>(1, 1, &[1.0]);
    let b: Matrix<Reverse<f64>> = Matrix::from_element(1, 1, x);
    let m = append_col(&a, &b).unwrap();
    assert!(m[(0, 0)].is_constant());
    assert_relative_eq!(m[(0, 1)].grad(&[x])[0], 1.0);
}

#[test]
fn diagonals_and_builders() {
    let v: Vector<f64> = vector_from(&[1.0, 2.0]);
    let d = diag_matrix(&v).unwrap();
    assert_eq!(d, matrix_from_rows::<f64>(2, 2, &[1.0, 0.0, 0.0, 2.0]));
    assert_eq!(diagonal(&d).as_slice(), &[1.0, 2.0]);

    let m = matrix_from_rows::<f64>(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    assert!(matches!(diag_matrix(&m), Err(Error::NotVector { .. })));

    let rep = rep_matrix(0.5_f64, 2, 3);
    assert_eq!((rep.nrows(), rep.ncols()), (2, 3));
    assert!(rep.iter().all(|&x| x == 0.5));

    let t = transpose(&m);
    assert_eq!(t, matrix_from_rows::<f64>(2, 2, &[1.0, 3.0, 2.0, 4.0]));
    let col = transpose(&row_vector_from::<f64>(&[1.0, 2.0]));
    assert_eq!(col.nrows(), 2);
}
