//! Functional API over the whole stack
//!
//! Thin, stable entry points for hosts that only need the eight basic
//! operations. Each call forwards to the crate that owns the algorithm;
//! results that carry an `error_bound` are reduced to the train itself.

use scirs2_core::ndarray_ext::{ArrayD, ArrayViewD};
use ttrain_core::{TruncationOptions, TtMatrix, TtResult, TtScalar, TtTensor};
use ttrain_kernels::MatmulOperand;

/// Dense array → tensor train
///
/// `truncation` is a [`TruncationOptions`] or a bare
/// [`Truncation`](ttrain_core::Truncation).
///
/// # Example
///
/// ```
/// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
/// use ttrain::{decompose, to_dense, TruncationOptions};
///
/// let dense = ArrayD::from_shape_fn(IxDyn(&[3, 4, 5]), |idx| (idx[0] + idx[1] + idx[2]) as f64);
/// let tt = decompose(&dense.view(), TruncationOptions::tolerance(1e-12))?;
/// assert_eq!(tt.tt_ranks(), vec![1, 2, 2, 1]);
/// assert!((to_dense(&tt)? - &dense).iter().all(|v| v.abs() < 1e-10));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn decompose<T: TtScalar>(
    dense: &ArrayViewD<T>,
    truncation: impl Into<TruncationOptions>,
) -> TtResult<TtTensor<T>> {
    ttrain_decomp::tt_svd(dense, &truncation.into()).map(|result| result.tt)
}

/// Rank reduction of an existing train
pub fn round<T: TtScalar>(
    tt: &TtTensor<T>,
    truncation: impl Into<TruncationOptions>,
) -> TtResult<TtTensor<T>> {
    ttrain_decomp::tt_round(tt, &truncation.into()).map(|result| result.tt)
}

/// Exact sum; ranks add
pub fn add<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    ttrain_kernels::add(a, b)
}

/// Exact Hadamard product; ranks multiply
pub fn multiply_elementwise<T: TtScalar>(
    a: &TtTensor<T>,
    b: &TtTensor<T>,
) -> TtResult<TtTensor<T>> {
    ttrain_kernels::hadamard(a, b)
}

/// `op · x` for a [`TtTensor`] or a [`TtMatrix`] operand
///
/// # Example
///
/// ```
/// use ttrain::{matmul, TtMatrix, TtTensor};
///
/// let op = TtMatrix::<f64>::identity(&[2, 3])?;
/// let x = TtTensor::<f64>::random(&[2, 3], &[2], 0)?;
/// assert_eq!(matmul(&op, &x)?.tt_ranks(), x.tt_ranks());
/// assert_eq!(matmul(&op, &op)?.tt_ranks(), vec![1, 1, 1]);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn matmul<T, X>(op: &TtMatrix<T>, x: &X) -> TtResult<X::Output>
where
    T: TtScalar,
    X: MatmulOperand<T>,
{
    ttrain_kernels::matmul(op, x)
}

/// `⟨a, b⟩`
pub fn inner_product<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<T> {
    ttrain_kernels::inner_product(a, b)
}

/// Frobenius norm
pub fn norm<T: TtScalar>(a: &TtTensor<T>) -> TtResult<T> {
    ttrain_kernels::norm(a)
}

/// Full row-major array
pub fn to_dense<T: TtScalar>(a: &TtTensor<T>) -> TtResult<ArrayD<T>> {
    ttrain_kernels::to_dense(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::IxDyn;
    use ttrain_core::{RankSpec, Truncation, TtError};

    #[test]
    fn test_decompose_accepts_bare_truncation() {
        let dense = ArrayD::from_shape_fn(IxDyn(&[4, 4, 4]), |idx| {
            ((idx[0] + 1) * (idx[1] + 2) * (idx[2] + 3)) as f64
        });
        let tt = decompose(&dense.view(), Truncation::ToleranceDriven { epsilon: 1e-12 }).unwrap();
        assert_eq!(tt.tt_ranks(), vec![1, 1, 1, 1]);

        let tt = decompose(
            &dense.view(),
            Truncation::RankDriven {
                ranks: RankSpec::PerBond(vec![2, 3]),
            },
        )
        .unwrap();
        assert_eq!(tt.tt_ranks(), vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_round_after_multiply() {
        let a = TtTensor::<f64>::random(&[3, 3, 3], &[2, 2], 1).unwrap();
        let ones = TtTensor::<f64>::ones(&[3, 3, 3]).unwrap();
        let product = multiply_elementwise(&a, &ones).unwrap();
        assert_eq!(product.tt_ranks(), a.tt_ranks());

        let doubled = add(&product, &a).unwrap();
        let rounded = round(&doubled, TruncationOptions::tolerance(1e-10)).unwrap();
        assert_eq!(rounded.tt_ranks(), a.tt_ranks());
        let expected = 2.0 * norm(&a).unwrap();
        assert!((norm(&rounded).unwrap() - expected).abs() < 1e-9 * expected);
        let ip = inner_product(&rounded, &a).unwrap();
        assert!((ip - expected * expected / 2.0).abs() < 1e-8 * expected * expected);
    }

    #[test]
    fn test_shape_errors_surface() {
        let a = TtTensor::<f64>::ones(&[2, 3]).unwrap();
        let b = TtTensor::<f64>::ones(&[3, 2]).unwrap();
        assert!(matches!(add(&a, &b), Err(TtError::ShapeMismatch { .. })));
        assert!(matches!(
            multiply_elementwise(&a, &b),
            Err(TtError::ShapeMismatch { .. })
        ));
        assert!(matches!(inner_product(&a, &b), Err(TtError::ShapeMismatch { .. })));

        let op = TtMatrix::<f64>::identity(&[3, 2]).unwrap();
        assert!(matches!(matmul(&op, &a), Err(TtError::ShapeMismatch { .. })));
        assert!(matmul(&op, &b).is_ok());
    }
}
