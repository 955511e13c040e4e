//! Integration tests for ttrain-kernels with ttrain-core
//!
//! Every kernel result is checked against the same computation carried out on
//! dense arrays built with `to_dense` / `to_dense_matrix`.

use scirs2_core::ndarray_ext::{array, Array1, Array2, Array3, ArrayD, IxDyn};
use ttrain_core::{TtError, TtMatrix, TtTensor};
use ttrain_kernels::{
    add, cholesky, determinant, hadamard, inner_product, inverse, is_left_orthogonal,
    is_right_orthogonal, kronecker_product, left_orthogonalize, log_determinant, matmul,
    matvec_dense, norm, quadratic_form, right_orthogonalize, sum, thin_svd, to_dense,
    to_dense_matrix,
};

fn max_abs_diff(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn max_abs_diff2(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn random_operator(rows: &[usize], cols: &[usize], rank: usize, seed: u64) -> TtMatrix<f64> {
    let shape: Vec<usize> = rows.iter().zip(cols).map(|(p, q)| p * q).collect();
    let ranks = vec![rank; shape.len() - 1];
    let tensor = TtTensor::random(&shape, &ranks, seed).unwrap();
    TtMatrix::from_tensor(tensor, rows.to_vec(), cols.to_vec()).unwrap()
}

#[test]
fn test_orthogonalization_preserves_values() {
    let tt = TtTensor::<f64>::random(&[3, 4, 2, 5], &[2, 3, 2], 11).unwrap();
    let dense = to_dense(&tt).unwrap();

    let left = left_orthogonalize(&tt).unwrap();
    assert!(max_abs_diff(&to_dense(&left).unwrap(), &dense) < 1e-12);
    for k in 0..3 {
        assert!(is_left_orthogonal(left.core(k), 1e-10));
    }

    let right = right_orthogonalize(&tt).unwrap();
    assert!(max_abs_diff(&to_dense(&right).unwrap(), &dense) < 1e-12);
    for k in 1..4 {
        assert!(is_right_orthogonal(right.core(k), 1e-10));
    }

    // The norm concentrates in the last (resp. first) core
    let n = norm(&tt).unwrap();
    let last: f64 = left.core(3).as_array().iter().map(|v| v * v).sum::<f64>().sqrt();
    let first: f64 = right.core(0).as_array().iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((last - n).abs() < 1e-10 * n);
    assert!((first - n).abs() < 1e-10 * n);
}

#[test]
fn test_algebra_against_dense() {
    let a = TtTensor::<f64>::random(&[2, 3, 4], &[2, 2], 1).unwrap();
    let b = TtTensor::<f64>::random(&[2, 3, 4], &[3, 1], 2).unwrap();
    let (da, db) = (to_dense(&a).unwrap(), to_dense(&b).unwrap());

    let s = add(&a, &b).unwrap();
    assert_eq!(s.tt_ranks(), vec![1, 5, 3, 1]);
    assert!(max_abs_diff(&to_dense(&s).unwrap(), &(&da + &db)) < 1e-12);

    let h = hadamard(&a, &b).unwrap();
    assert_eq!(h.tt_ranks(), vec![1, 6, 2, 1]);
    assert!(max_abs_diff(&to_dense(&h).unwrap(), &(&da * &db)) < 1e-12);

    let ip: f64 = (&da * &db).sum();
    assert!((inner_product(&a, &b).unwrap() - ip).abs() < 1e-10 * (1.0 + ip.abs()));
    assert!((sum(&a) - da.sum()).abs() < 1e-10 * (1.0 + da.sum().abs()));

    let n = da.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!((norm(&a).unwrap() - n).abs() < 1e-10 * n);
}

#[test]
fn test_matmul_against_dense() {
    let op = random_operator(&[2, 3, 2], &[3, 2, 2], 2, 5);
    let x = TtTensor::<f64>::random(&[3, 2, 2], &[2, 2], 6).unwrap();
    let y = matmul(&op, &x).unwrap();
    assert_eq!(y.raw_shape(), vec![2, 3, 2]);
    assert_eq!(y.tt_ranks(), vec![1, 4, 4, 1]);

    let dense_op = to_dense_matrix(&op).unwrap();
    let dense_x: Array1<f64> = to_dense(&x).unwrap().iter().cloned().collect();
    let expected = dense_op.dot(&dense_x);
    let got: Array1<f64> = to_dense(&y).unwrap().iter().cloned().collect();
    for (g, e) in got.iter().zip(expected.iter()) {
        assert!((g - e).abs() < 1e-10 * (1.0 + e.abs()));
    }

    // Same product without building the right operand as a train
    let direct = matvec_dense(&op, &dense_x.view()).unwrap();
    for (g, e) in direct.iter().zip(expected.iter()) {
        assert!((g - e).abs() < 1e-10 * (1.0 + e.abs()));
    }

    // ⟨z, A x⟩
    let z = TtTensor::<f64>::random(&[2, 3, 2], &[1, 2], 7).unwrap();
    let dense_z: Array1<f64> = to_dense(&z).unwrap().iter().cloned().collect();
    let q = quadratic_form(&z, &op, &x).unwrap();
    let expected_q = dense_z.dot(&expected);
    assert!((q - expected_q).abs() < 1e-10 * (1.0 + expected_q.abs()));
}

#[test]
fn test_operator_composition() {
    let a = random_operator(&[2, 2], &[3, 2], 2, 8);
    let b = random_operator(&[3, 2], &[2, 4], 3, 9);
    let c = matmul(&a, &b).unwrap();
    assert_eq!(c.row_shape(), &[2, 2]);
    assert_eq!(c.col_shape(), &[2, 4]);
    assert_eq!(c.tt_ranks(), vec![1, 6, 1]);

    let expected = to_dense_matrix(&a).unwrap().dot(&to_dense_matrix(&b).unwrap());
    assert!(max_abs_diff2(&to_dense_matrix(&c).unwrap(), &expected) < 1e-10);

    let mismatched = random_operator(&[2, 2], &[2, 2], 1, 10);
    assert!(matches!(
        matmul(&a, &mismatched),
        Err(TtError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_kronecker_functions_against_dense() {
    let a = array![[4.0, 1.0], [1.0, 3.0]];
    let b = array![[2.0, 0.5, 0.0], [0.5, 2.0, 0.5], [0.0, 0.5, 2.0]];
    let m = TtMatrix::from_kronecker_factors(&[a.clone(), b.clone()]).unwrap();
    let dense = kronecker_product(&a.view(), &b.view());
    assert!(max_abs_diff2(&to_dense_matrix(&m).unwrap(), &dense) < 1e-14);

    let expected_det = scirs2_linalg::det(&dense.view(), None).unwrap();
    let det = determinant(&m).unwrap();
    assert!((det - expected_det).abs() < 1e-9 * expected_det.abs());
    let logdet = log_determinant(&m).unwrap();
    assert!((logdet - expected_det.ln()).abs() < 1e-10);

    let inv = inverse(&m).unwrap();
    assert!(inv.is_kronecker());
    let eye = to_dense_matrix(&matmul(&m, &inv).unwrap()).unwrap();
    assert!(max_abs_diff2(&eye, &Array2::eye(6)) < 1e-12);

    let l = to_dense_matrix(&cholesky(&m).unwrap()).unwrap();
    assert!(max_abs_diff2(&l.dot(&l.t()), &dense) < 1e-12);
    for i in 0..6 {
        for j in (i + 1)..6 {
            assert_eq!(l[[i, j]], 0.0);
        }
    }
}

#[test]
fn test_kronecker_functions_reject_general_operators() {
    let m = random_operator(&[2, 2], &[2, 2], 2, 12);
    assert!(matches!(determinant(&m), Err(TtError::NotKronecker(_))));
    assert!(matches!(inverse(&m), Err(TtError::NotKronecker(_))));

    let rect = TtMatrix::from_kronecker_factors(&[array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]]).unwrap();
    assert!(matches!(log_determinant(&rect), Err(TtError::NotKronecker(_))));

    let indefinite = TtMatrix::from_kronecker_factors(&[array![[1.0, 2.0], [2.0, 1.0]]]).unwrap();
    assert!(matches!(
        cholesky(&indefinite),
        Err(TtError::IllConditionedInput { .. })
    ));
    assert!(matches!(
        log_determinant(&indefinite),
        Err(TtError::IllConditionedInput { .. })
    ));
}

#[test]
fn test_thin_svd_reconstructs() {
    let m = Array2::from_shape_fn((6, 4), |(i, j)| ((i * 4 + j) as f64 * 0.7).sin());
    let svd = thin_svd(&m.view()).unwrap();
    assert_eq!(svd.s.len(), 4);
    for w in svd.s.windows(2) {
        assert!(w[0] >= w[1]);
    }
    let us = &svd.u * &svd.s;
    assert!(max_abs_diff2(&us.dot(&svd.vt), &m) < 1e-12);

    let bad = Array2::from_elem((2, 2), f64::NAN);
    assert!(matches!(
        thin_svd(&bad.view()),
        Err(TtError::IllConditionedInput { .. })
    ));
}

#[test]
fn test_dense_conversion_layout() {
    // Row-major: the last mode varies fastest
    // A(i, j) = 10 i + j
    let tt = TtTensor::from_arrays(vec![first_core(), last_core()]).unwrap();
    let dense = to_dense(&tt).unwrap();
    assert_eq!(dense.shape(), &[2, 3]);
    let flat: Vec<f64> = dense.iter().cloned().collect();
    assert_eq!(flat, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    assert_eq!(dense[IxDyn(&[1, 2])], tt.evaluate(&[1, 2]).unwrap());
}

fn first_core() -> Array3<f64> {
    Array3::from_shape_fn((1, 2, 2), |(_, i, r)| {
        if r == 0 {
            10.0 * i as f64
        } else {
            1.0
        }
    })
}

fn last_core() -> Array3<f64> {
    Array3::from_shape_fn((2, 3, 1), |(l, j, _)| {
        if l == 0 {
            1.0
        } else {
            j as f64
        }
    })
}
