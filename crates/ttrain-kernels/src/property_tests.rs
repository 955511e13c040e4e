//! Property-based tests for train kernels
//!
//! These check algebraic identities against brute-force dense computations on
//! small random trains.

use super::*;
use proptest::prelude::*;
use scirs2_core::ndarray_ext::ArrayD;
use ttrain_core::{TtMatrix, TtTensor};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    }
}

/// Small shapes with 1-4 modes and bond ranks up to 3
fn shape_and_ranks() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(1usize..4, 1..=4).prop_flat_map(|shape| {
        let bonds = shape.len() - 1;
        (Just(shape), prop::collection::vec(1usize..4, bonds))
    })
}

fn max_abs_diff(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn prop_add_is_exact((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let a = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let b = TtTensor::<f64>::random(&shape, &ranks, seed + 1).unwrap();
        let sum = add(&a, &b).unwrap();
        let expected = to_dense(&a).unwrap() + to_dense(&b).unwrap();
        prop_assert!(max_abs_diff(&to_dense(&sum).unwrap(), &expected) < 1e-12);
    }

    #[test]
    fn prop_hadamard_is_exact((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let a = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let b = TtTensor::<f64>::random(&shape, &ranks, seed + 7).unwrap();
        let prod = hadamard(&a, &b).unwrap();
        let expected = to_dense(&a).unwrap() * to_dense(&b).unwrap();
        prop_assert!(max_abs_diff(&to_dense(&prod).unwrap(), &expected) < 1e-12);
    }

    #[test]
    fn prop_inner_product_matches_dense((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let a = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let b = TtTensor::<f64>::random(&shape, &ranks, seed + 3).unwrap();
        let dense: f64 = (to_dense(&a).unwrap() * to_dense(&b).unwrap()).sum();
        let ip = inner_product(&a, &b).unwrap();
        prop_assert!((ip - dense).abs() <= 1e-10 * (1.0 + dense.abs()));
    }

    #[test]
    fn prop_norm_squared_is_self_inner((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let a = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let n = norm(&a).unwrap();
        let ip = inner_product(&a, &a).unwrap();
        prop_assert!((n * n - ip).abs() <= 1e-10 * (1.0 + ip));
    }

    #[test]
    fn prop_orthogonalization_preserves_array((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let a = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let dense = to_dense(&a).unwrap();
        for direction in [SweepDirection::LeftToRight, SweepDirection::RightToLeft] {
            let ortho = orthogonalize(&a, direction).unwrap();
            prop_assert!(max_abs_diff(&to_dense(&ortho).unwrap(), &dense) < 1e-10);
            prop_assert!(ortho.max_rank() <= a.max_rank());
        }
    }

    #[test]
    fn prop_identity_matmul_is_noop((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
        let x = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
        let eye = TtMatrix::<f64>::identity(&shape).unwrap();
        let y = matmul(&eye, &x).unwrap();
        prop_assert!(max_abs_diff(&to_dense(&y).unwrap(), &to_dense(&x).unwrap()) < 1e-12);
    }
}
