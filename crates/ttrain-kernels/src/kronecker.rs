//! Kronecker-structured TT-matrices
//!
//! A TT-matrix whose ranks are all 1 is the Kronecker product of its mode
//! matrices, `A = A_1 ⊗ A_2 ⊗ … ⊗ A_d`. When every `A_k` is square (`p_k = q_k`)
//! several dense-matrix functions factor over the modes:
//!
//! ```text
//! det(A)     = ∏ det(A_k)^(N / n_k)        with N = ∏ n_k
//! log det(A) = Σ (N / n_k) · log det(A_k)
//! A⁻¹        = A_1⁻¹ ⊗ … ⊗ A_d⁻¹
//! chol(A)    = chol(A_1) ⊗ … ⊗ chol(A_d)
//! ```
//!
//! Each function raises [`TtError::NotKronecker`] when a rank exceeds 1 or a
//! mode matrix is not square. The plain determinant can overflow for large
//! `N`; prefer [`log_determinant`] there.
//!
//! # SciRS2 Integration
//!
//! Per-mode factorizations use `scirs2_linalg::{det, inv, cholesky}`.

use scirs2_core::ndarray_ext::{Array2, ArrayView2};
use scirs2_linalg::{cholesky as dense_cholesky, det, inv};
use ttrain_core::{TtError, TtMatrix, TtResult, TtScalar};

/// Dense Kronecker product of two matrices
///
/// For `a` of shape `m × n` and `b` of shape `p × q` the result is `mp × nq`
/// with `C[i·p + k, j·q + l] = a[i, j] · b[k, l]`.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use ttrain_kernels::kronecker::kronecker_product;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[0.0, 1.0], [1.0, 0.0]];
/// let c = kronecker_product(&a.view(), &b.view());
/// assert_eq!(c.shape(), &[4, 4]);
/// assert_eq!(c[[0, 1]], 1.0);
/// assert_eq!(c[[3, 2]], 4.0);
/// ```
pub fn kronecker_product<T: TtScalar>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T> {
    let (p, q) = b.dim();
    let (m, n) = a.dim();
    Array2::from_shape_fn((m * p, n * q), |(row, col)| {
        a[[row / p, col / q]] * b[[row % p, col % q]]
    })
}

/// Square mode matrices `A_k` of a Kronecker-structured operator
pub fn kronecker_factors<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<Vec<Array2<T>>> {
    if !m.is_kronecker() {
        return Err(TtError::NotKronecker(format!(
            "all ranks must be 1, got {:?}",
            m.tt_ranks()
        )));
    }
    for (k, (&p, &q)) in m.row_shape().iter().zip(m.col_shape()).enumerate() {
        if p != q {
            return Err(TtError::NotKronecker(format!(
                "mode {} has a {}x{} factor, square factors required",
                k, p, q
            )));
        }
    }
    Ok((0..m.ndims()).map(|k| m.mode_matrix(k, 0, 0)).collect())
}

fn factor_det<T: TtScalar>(operation: &str, k: usize, factor: &Array2<T>) -> TtResult<T> {
    det(&factor.view(), None).map_err(|e| {
        TtError::ill_conditioned(operation, format!("determinant of factor {} failed: {}", k, e))
    })
}

/// Determinant of a Kronecker-structured square TT-matrix
///
/// # Example
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use ttrain_core::TtMatrix;
/// use ttrain_kernels::kronecker::determinant;
///
/// let a = array![[2.0_f64, 0.0], [0.0, 3.0]];
/// let m = TtMatrix::from_kronecker_factors(&[a.clone(), a]).unwrap();
/// // det(A ⊗ A) = det(A)^2 · det(A)^2 = 6^4
/// assert!((determinant(&m).unwrap() - 1296.0).abs() < 1e-8);
/// ```
pub fn determinant<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<T> {
    let factors = kronecker_factors(m)?;
    let total: usize = m.nrows();

    let mut result = T::one();
    for (k, factor) in factors.iter().enumerate() {
        let power = T::from_f64_lossy((total / factor.nrows()) as f64);
        result *= factor_det("determinant", k, factor)?.powf(power);
    }
    Ok(result)
}

/// Log-determinant of a Kronecker-structured square TT-matrix
///
/// Every factor must have a positive determinant.
pub fn log_determinant<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<T> {
    let factors = kronecker_factors(m)?;
    let total: usize = m.nrows();

    let mut result = T::zero();
    for (k, factor) in factors.iter().enumerate() {
        let d = factor_det("log_determinant", k, factor)?;
        if d <= T::zero() {
            return Err(TtError::ill_conditioned(
                "log_determinant",
                format!("factor {} has non-positive determinant {}", k, d),
            ));
        }
        let power = T::from_f64_lossy((total / factor.nrows()) as f64);
        result += d.ln() * power;
    }
    Ok(result)
}

/// Inverse of a Kronecker-structured square TT-matrix, again rank 1
pub fn inverse<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<TtMatrix<T>> {
    let factors = kronecker_factors(m)?
        .iter()
        .enumerate()
        .map(|(k, factor)| {
            inv(&factor.view(), None).map_err(|e| {
                TtError::ill_conditioned("inverse", format!("factor {} is singular: {}", k, e))
            })
        })
        .collect::<TtResult<Vec<_>>>()?;
    TtMatrix::from_kronecker_factors(&factors)
}

/// Lower Cholesky factor of a Kronecker product of symmetric positive-definite
/// matrices, again rank 1
pub fn cholesky<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<TtMatrix<T>> {
    let factors = kronecker_factors(m)?
        .iter()
        .enumerate()
        .map(|(k, factor)| {
            dense_cholesky(&factor.view(), None).map_err(|e| {
                TtError::ill_conditioned(
                    "cholesky",
                    format!("factor {} is not positive definite: {}", k, e),
                )
            })
        })
        .collect::<TtResult<Vec<_>>>()?;
    TtMatrix::from_kronecker_factors(&factors)
}
