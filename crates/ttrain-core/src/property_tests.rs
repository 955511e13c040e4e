//! Property-based tests for the train data model

#[cfg(test)]
mod tests {
    use crate::{CoreBlock, RankSpec, TtMatrix, TtTensor};
    use proptest::prelude::*;
    use scirs2_core::ndarray_ext::Array3;

    fn shape_and_ranks() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        prop::collection::vec(1usize..5, 1..=4).prop_flat_map(|shape| {
            let bonds = shape.len() - 1;
            (Just(shape), prop::collection::vec(1usize..4, bonds))
        })
    }

    proptest! {
        #[test]
        fn prop_random_train_has_requested_ranks((shape, ranks) in shape_and_ranks(), seed in 0u64..1000) {
            let tt = TtTensor::<f64>::random(&shape, &ranks, seed).unwrap();
            prop_assert_eq!(tt.raw_shape(), shape.clone());
            prop_assert_eq!(tt.bond_ranks(), ranks);
            let full = tt.tt_ranks();
            prop_assert_eq!(full[0], 1);
            prop_assert_eq!(full[shape.len()], 1);
            prop_assert!(tt.is_finite());
        }

        #[test]
        fn prop_unfoldings_fold_back(l in 1usize..4, n in 1usize..5, r in 1usize..4) {
            let data = Array3::from_shape_fn((l, n, r), |(a, b, c)| (a * 100 + b * 10 + c) as f64);
            let core = CoreBlock::new(data).unwrap();
            let left = CoreBlock::from_left_unfolding(&core.left_unfolding().view(), l, n).unwrap();
            let right = CoreBlock::from_right_unfolding(&core.right_unfolding().view(), n, r).unwrap();
            prop_assert_eq!(&left, &core);
            prop_assert_eq!(&right, &core);
        }

        #[test]
        fn prop_uniform_rank_spec_resolves(rank in 1usize..10, bonds in 0usize..6) {
            let ranks = RankSpec::Uniform(rank).resolve(bonds).unwrap();
            prop_assert_eq!(ranks.len(), bonds);
            prop_assert!(ranks.iter().all(|&r| r == rank));
        }

        #[test]
        fn prop_double_transpose_is_identity(p in 1usize..4, q in 1usize..4, seed in 0u64..100) {
            let tt = TtTensor::<f64>::random(&[p * q, q * p], &[2], seed).unwrap();
            let m = TtMatrix::from_tensor(tt, vec![p, q], vec![q, p]).unwrap();
            let back = m.transpose().unwrap().transpose().unwrap();
            prop_assert_eq!(back, m);
        }
    }
}
