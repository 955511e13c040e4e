//! Integration tests for the ttrain-core data model
//!
//! Construction, validation, entry evaluation and the exact structural
//! operations, checked entry by entry against closed forms.

use scirs2_core::ndarray_ext::{array, Array3};
use ttrain_core::ops::{add, hadamard, negate, sub};
use ttrain_core::{
    CoreBlock, ErrorSplit, RankSpec, Truncation, TruncationOptions, TtError, TtMatrix, TtTensor,
};

fn indices(shape: &[usize]) -> Vec<Vec<usize>> {
    let total: usize = shape.iter().product();
    (0..total)
        .map(|mut flat| {
            let mut idx = vec![0; shape.len()];
            for k in (0..shape.len()).rev() {
                idx[k] = flat % shape[k];
                flat /= shape[k];
            }
            idx
        })
        .collect()
}

/// Rank-2 train of `A(i, j, k) = i + j + k`
fn index_sum() -> TtTensor<f64> {
    let first = Array3::from_shape_fn((1, 3, 2), |(_, i, r)| if r == 0 { 1.0 } else { i as f64 });
    let middle = Array3::from_shape_fn((2, 4, 2), |(l, j, r)| match (l, r) {
        (0, 0) | (1, 1) => 1.0,
        (0, 1) => j as f64,
        _ => 0.0,
    });
    let last = Array3::from_shape_fn((2, 5, 1), |(l, k, _)| if l == 0 { k as f64 } else { 1.0 });
    TtTensor::from_arrays(vec![first, middle, last]).unwrap()
}

#[test]
fn test_index_sum_entries() {
    let tt = index_sum();
    assert_eq!(tt.raw_shape(), vec![3, 4, 5]);
    assert_eq!(tt.tt_ranks(), vec![1, 2, 2, 1]);
    assert_eq!(tt.num_parameters(), 6 + 16 + 10);
    for idx in indices(&[3, 4, 5]) {
        let expected = (idx[0] + idx[1] + idx[2]) as f64;
        assert_eq!(tt.evaluate(&idx).unwrap(), expected);
    }
}

#[test]
fn test_validation_errors() {
    let bad_boundary = vec![CoreBlock::new(Array3::<f64>::ones((2, 3, 1))).unwrap()];
    assert!(matches!(
        TtTensor::new(bad_boundary),
        Err(TtError::InvalidStructure(_))
    ));

    let broken_chain = vec![
        CoreBlock::new(Array3::<f64>::ones((1, 3, 2))).unwrap(),
        CoreBlock::new(Array3::<f64>::ones((3, 3, 1))).unwrap(),
    ];
    assert!(matches!(
        TtTensor::new(broken_chain),
        Err(TtError::InvalidStructure(_))
    ));

    assert!(matches!(
        TtTensor::<f64>::new(vec![]),
        Err(TtError::InvalidStructure(_))
    ));
    assert!(CoreBlock::new(Array3::<f64>::zeros((1, 0, 1))).is_err());
    assert!(matches!(
        TtTensor::<f64>::random(&[2, 2], &[0], 0),
        Err(TtError::InvalidRankSpec(_))
    ));

    let tt = index_sum();
    assert!(matches!(
        tt.evaluate(&[0, 0]),
        Err(TtError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        tt.evaluate(&[3, 0, 0]),
        Err(TtError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_structural_ops_entrywise() {
    let a = index_sum();
    let b = TtTensor::<f64>::random(&[3, 4, 5], &[2, 3], 5).unwrap();

    let sum = add(&a, &b).unwrap();
    let diff = sub(&a, &b).unwrap();
    let prod = hadamard(&a, &b).unwrap();
    let neg = negate(&a);
    assert_eq!(sum.tt_ranks(), vec![1, 4, 5, 1]);
    assert_eq!(prod.tt_ranks(), vec![1, 4, 6, 1]);

    for idx in indices(&[3, 4, 5]) {
        let (x, y) = (a.evaluate(&idx).unwrap(), b.evaluate(&idx).unwrap());
        assert!((sum.evaluate(&idx).unwrap() - (x + y)).abs() < 1e-12);
        assert!((diff.evaluate(&idx).unwrap() - (x - y)).abs() < 1e-12);
        assert!((prod.evaluate(&idx).unwrap() - x * y).abs() < 1e-12);
        assert_eq!(neg.evaluate(&idx).unwrap(), -x);
    }
}

#[test]
fn test_random_is_reproducible() {
    let a = TtTensor::<f64>::random(&[4, 4, 4], &[3, 3], 77).unwrap();
    let b = TtTensor::<f64>::random(&[4, 4, 4], &[3, 3], 77).unwrap();
    let c = TtTensor::<f64>::random(&[4, 4, 4], &[3, 3], 78).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_matrix_entries_and_transpose() {
    let f1 = array![[1.0, 2.0, 0.0], [0.0, 1.0, 3.0]];
    let f2 = array![[2.0], [5.0]];
    let m = TtMatrix::from_kronecker_factors(&[f1.clone(), f2.clone()]).unwrap();
    assert_eq!(m.row_shape(), &[2, 2]);
    assert_eq!(m.col_shape(), &[3, 1]);
    assert_eq!((m.nrows(), m.ncols()), (4, 3));

    let t = m.transpose().unwrap();
    for i1 in 0..2 {
        for j1 in 0..3 {
            for i2 in 0..2 {
                let expected = f1[[i1, j1]] * f2[[i2, 0]];
                assert_eq!(m.evaluate(&[i1, i2], &[j1, 0]).unwrap(), expected);
                assert_eq!(t.evaluate(&[j1, 0], &[i1, i2]).unwrap(), expected);
            }
        }
    }
    assert_eq!(m.mode_matrix(0, 0, 0), f1);
}

#[test]
fn test_truncation_options() {
    let opts = TruncationOptions::default();
    assert_eq!(opts.truncation, Truncation::ToleranceDriven { epsilon: 1e-10 });
    assert_eq!(opts.error_split, ErrorSplit::RootSumSquare);
    assert_eq!(opts.resolve(3).unwrap(), None);

    let opts = TruncationOptions::ranks(RankSpec::Uniform(4));
    assert_eq!(opts.resolve(3).unwrap(), Some(vec![4, 4, 4]));

    let opts = TruncationOptions::capped(1e-6, vec![2, 3]);
    assert_eq!(opts.resolve(2).unwrap(), Some(vec![2, 3]));
    assert!(matches!(opts.resolve(3), Err(TtError::InvalidRankSpec(_))));

    assert!(TruncationOptions::tolerance(f64::NAN).resolve(2).is_err());
    assert!(TruncationOptions::default()
        .with_zero_tolerance(-1.0)
        .resolve(2)
        .is_err());

    assert!((ErrorSplit::RootSumSquare.per_cut(1.0, 4) - 0.5).abs() < 1e-15);
    assert!((ErrorSplit::Linear.per_cut(1.0, 4) - 0.25).abs() < 1e-15);
}
