//! TT-SVD: dense array → tensor train
//!
//! Sequential unfolding algorithm. The remainder starts as the input flattened
//! to `1 × (n_1 ⋯ n_d)`; at cut `k` it is split with a thin SVD, the left
//! factor becomes core `k` and `Σ · Vᵗ` becomes the next remainder. The last
//! remainder is the last core.
//!
//! Rank selection per cut follows [`crate::truncation`]. With the default
//! root-sum-square split the relative reconstruction error stays within ε.
//!
//! # Complexity
//!
//! Time: `O(N · max_k(r_{k-1} n_k))` for `N = ∏ n_k`, dominated by the first SVD.
//! Space: `O(N)`.
//!
//! # References
//!
//! - Oseledets, I. V. (2011). "Tensor-Train Decomposition", SIAM J. Sci. Comput.

use crate::truncation::TruncationPlan;
use log::{debug, warn};
use scirs2_core::ndarray_ext::{s, Array2, ArrayD, ArrayView2, ArrayViewD, IxDyn};
use ttrain_core::{
    CoreBlock, TruncationOptions, TtError, TtMatrix, TtResult, TtScalar, TtTensor,
};
use ttrain_kernels::thin_svd;

/// Result of a decomposition or rounding sweep
#[derive(Debug, Clone)]
pub struct TtDecomposition<T> {
    /// The train
    pub tt: TtTensor<T>,
    /// Upper bound on `‖result − input‖_F / ‖input‖_F` from the discarded
    /// singular values (0 for exact sweeps and zero inputs)
    pub error_bound: f64,
}

impl<T: TtScalar> TtDecomposition<T> {
    /// Ranks `(r_0, …, r_d)` of the train
    pub fn ranks(&self) -> Vec<usize> {
        self.tt.tt_ranks()
    }

    /// Take the train
    pub fn into_tt(self) -> TtTensor<T> {
        self.tt
    }
}

/// Result of decomposing a dense operator into a TT-matrix
#[derive(Debug, Clone)]
pub struct TtMatrixDecomposition<T> {
    /// The TT-matrix
    pub matrix: TtMatrix<T>,
    /// Upper bound on the relative Frobenius error
    pub error_bound: f64,
}

/// Frobenius norm of a dense array, accumulated in `f64` relative to the
/// largest magnitude so that finite entries never overflow the sum
pub(crate) fn dense_norm<T: TtScalar>(data: &ArrayViewD<T>) -> f64 {
    let scale = data
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.to_f64_lossy().abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = data
        .iter()
        .map(|v| {
            let x = v.to_f64_lossy() / scale;
            x * x
        })
        .sum();
    scale * sum.sqrt()
}

/// Decompose a dense array into a tensor train
///
/// # Arguments
///
/// * `dense` - Input array of shape `(n_1, …, n_d)`, `d ≥ 1`, no empty axis
/// * `opts` - Truncation strategy and error split
///
/// # Errors
///
/// - [`TtError::InvalidStructure`] for a 0-dimensional or empty input, or an
///   invalid tolerance
/// - [`TtError::InvalidRankSpec`] for a zero rank or a wrong number of ranks
/// - [`TtError::IllConditionedInput`] for NaN/infinite input
/// - [`TtError::ToleranceUnsatisfiable`] when a rank cap prevents meeting ε
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
/// use ttrain_core::TruncationOptions;
/// use ttrain_decomp::tt_svd;
///
/// let data: Vec<f64> = (1..=8).map(|v| v as f64).collect();
/// let dense = ArrayD::from_shape_vec(IxDyn(&[2, 2, 2]), data).unwrap();
/// let result = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-10)).unwrap();
/// let ranks = result.tt.tt_ranks();
/// assert!(ranks[1] <= 2 && ranks[2] <= 2);
/// assert!(result.error_bound <= 1e-10);
/// ```
pub fn tt_svd<T: TtScalar>(
    dense: &ArrayViewD<T>,
    opts: &TruncationOptions,
) -> TtResult<TtDecomposition<T>> {
    let shape = dense.shape().to_vec();
    if shape.is_empty() {
        return Err(TtError::invalid_structure(
            "tt_svd needs an array with at least one axis",
        ));
    }
    if shape.contains(&0) {
        return Err(TtError::invalid_structure(format!(
            "tt_svd input has an empty axis: {:?}",
            shape
        )));
    }

    let d = shape.len();
    let norm = dense_norm(dense);
    let mut plan = TruncationPlan::new(opts, d - 1, norm)?;

    if !norm.is_finite() || dense.iter().any(|v| !v.is_finite()) {
        return Err(TtError::ill_conditioned(
            "tt_svd",
            "input contains NaN or infinite entries",
        ));
    }

    if norm == 0.0 {
        warn!("tt_svd: input {:?} has zero norm, returning rank-1 zero train", shape);
        return Ok(TtDecomposition {
            tt: TtTensor::zeros(&shape)?,
            error_bound: 0.0,
        });
    }

    debug!(
        "tt_svd: shape {:?}, per-cut budget {:?}, norm {:.3e}",
        shape,
        plan.delta(),
        norm
    );

    let total: usize = shape.iter().product();
    // r_0 = 1: the remainder is always r_left × (n_k ⋯ n_d)
    let mut remainder = Array2::from_shape_vec((1, total), dense.iter().cloned().collect())
        .map_err(|e| TtError::shape_mismatch("tt_svd", e.to_string()))?;
    let mut cores = Vec::with_capacity(d);
    let mut r_left = 1;

    for (k, &n_k) in shape.iter().enumerate().take(d - 1) {
        let rows = r_left * n_k;
        let cols = remainder.len() / rows;
        let unfolding = reshape(&remainder.view(), rows, cols)?;

        let svd = thin_svd(&unfolding.view())?;
        let rank = plan.select("tt_svd", k, &svd.s, (rows, cols));

        let u = svd.u.slice(s![.., ..rank]);
        cores.push(CoreBlock::from_left_unfolding(&u, r_left, n_k)?);

        // Σ · Vᵗ restricted to the kept values
        let mut next = svd.vt.slice(s![..rank, ..]).to_owned();
        for (mut row, &sigma) in next.rows_mut().into_iter().zip(svd.s.iter()) {
            row.mapv_inplace(|v| v * sigma);
        }
        remainder = next;
        r_left = rank;
    }

    cores.push(CoreBlock::from_right_unfolding(
        &remainder.view(),
        shape[d - 1],
        1,
    )?);

    debug!("tt_svd: bond ranks {:?}", plan.chosen());
    let error_bound = plan.finish()?;
    Ok(TtDecomposition {
        tt: TtTensor::new(cores)?,
        error_bound,
    })
}

fn reshape<T: TtScalar>(matrix: &ArrayView2<T>, rows: usize, cols: usize) -> TtResult<Array2<T>> {
    Array2::from_shape_vec((rows, cols), matrix.iter().cloned().collect())
        .map_err(|e| TtError::shape_mismatch("tt_svd", e.to_string()))
}

/// Decompose a dense operator into a TT-matrix
///
/// `dense` has shape `(∏ p_k) × (∏ q_k)`; rows and columns are read as
/// row-major multi-indices over `row_shape` and `col_shape`. Mode `k` of the
/// result pairs row factor `p_k` with column factor `q_k`.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::Array2;
/// use ttrain_core::TruncationOptions;
/// use ttrain_decomp::tt_matrix_svd;
///
/// let eye = Array2::<f64>::eye(6);
/// let m = tt_matrix_svd(&eye.view(), &[2, 3], &[2, 3], &TruncationOptions::default()).unwrap();
/// assert_eq!(m.matrix.tt_ranks(), vec![1, 1, 1]);
/// ```
pub fn tt_matrix_svd<T: TtScalar>(
    dense: &ArrayView2<T>,
    row_shape: &[usize],
    col_shape: &[usize],
    opts: &TruncationOptions,
) -> TtResult<TtMatrixDecomposition<T>> {
    if row_shape.len() != col_shape.len() || row_shape.is_empty() {
        return Err(TtError::shape_mismatch(
            "tt_matrix_svd",
            format!(
                "row shape {:?} and column shape {:?} must have the same non-zero length",
                row_shape, col_shape
            ),
        ));
    }
    let (n_rows, n_cols) = (row_shape.iter().product::<usize>(), col_shape.iter().product::<usize>());
    if dense.dim() != (n_rows, n_cols) {
        return Err(TtError::shape_mismatch(
            "tt_matrix_svd",
            format!(
                "matrix is {:?}, shapes {:?} x {:?} need ({}, {})",
                dense.dim(),
                row_shape,
                col_shape,
                n_rows,
                n_cols
            ),
        ));
    }

    let d = row_shape.len();
    let mode_shape: Vec<usize> = row_shape
        .iter()
        .zip(col_shape)
        .map(|(p, q)| p * q)
        .collect();

    // Interleave: mode k index is i_k · q_k + j_k
    let tensor = ArrayD::from_shape_fn(IxDyn(&mode_shape), |index| {
        let (mut row, mut col) = (0, 0);
        for k in 0..d {
            row = row * row_shape[k] + index[k] / col_shape[k];
            col = col * col_shape[k] + index[k] % col_shape[k];
        }
        dense[[row, col]]
    });

    let decomposition = tt_svd(&tensor.view(), opts)?;
    Ok(TtMatrixDecomposition {
        matrix: TtMatrix::from_tensor(decomposition.tt, row_shape.to_vec(), col_shape.to_vec())?,
        error_bound: decomposition.error_bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttrain_core::{ErrorSplit, RankSpec};
    use ttrain_kernels::{to_dense, to_dense_matrix};

    fn counting(shape: &[usize]) -> ArrayD<f64> {
        let total: usize = shape.iter().product();
        ArrayD::from_shape_vec(IxDyn(shape), (1..=total).map(|v| v as f64).collect()).unwrap()
    }

    fn rel_error(a: &ArrayD<f64>, b: &ArrayD<f64>) -> f64 {
        let diff: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
        let base: f64 = b.iter().map(|x| x * x).sum();
        (diff / base).sqrt()
    }

    #[test]
    fn test_two_by_two_by_two_counting() {
        let dense = counting(&[2, 2, 2]);
        let result = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-10)).unwrap();
        let ranks = result.tt.tt_ranks();
        assert!(ranks[1] <= 2 && ranks[2] <= 2);
        assert_eq!(ranks[0], 1);
        assert_eq!(ranks[3], 1);
        let recon = to_dense(&result.tt).unwrap();
        for (x, y) in recon.iter().zip(dense.iter()) {
            assert!((x - y).abs() < 1e-8);
        }
    }

    #[test]
    fn test_counting_tensor_is_rank_two() {
        // A(i, j, k) = 1 + 4i + 2j + k is a sum of separable terms: rank 2 everywhere
        let dense = counting(&[2, 2, 2]);
        let result = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-10)).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_zero_input() {
        let dense = ArrayD::<f64>::zeros(IxDyn(&[3, 4, 2]));
        let result = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-6)).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 1, 1, 1]);
        assert!(to_dense(&result.tt).unwrap().iter().all(|&v| v == 0.0));
        assert_eq!(result.error_bound, 0.0);
    }

    #[test]
    fn test_single_mode() {
        let dense = counting(&[5]);
        let result = tt_svd(&dense.view(), &TruncationOptions::default()).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 1]);
        assert_eq!(to_dense(&result.tt).unwrap(), dense);
    }

    #[test]
    fn test_single_mode_any_options() {
        let dense = counting(&[7]).mapv(|v| v.sin());
        for opts in [
            TruncationOptions::tolerance(0.0),
            TruncationOptions::tolerance(0.5),
            TruncationOptions::ranks(Vec::<usize>::new()),
        ] {
            let result = tt_svd(&dense.view(), &opts).unwrap();
            assert_eq!(result.tt.tt_ranks(), vec![1, 1]);
            assert_eq!(result.error_bound, 0.0);
            assert_eq!(to_dense(&result.tt).unwrap(), dense);
        }
    }

    #[test]
    fn test_large_magnitude_input() {
        let dense = counting(&[2, 2, 2]).mapv(|v| v * 1e160);
        assert!((dense_norm(&dense.view()) / (204f64.sqrt() * 1e160) - 1.0).abs() < 1e-14);

        let result = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-10)).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 2, 2, 1]);
        assert!(result.error_bound <= 1e-10);
        let recon = to_dense(&result.tt).unwrap();
        for (x, y) in recon.iter().zip(dense.iter()) {
            assert!(((x - y) / 1e160).abs() < 1e-10);
        }
    }

    #[test]
    fn test_dense_norm_edge_values() {
        let zero = ArrayD::<f64>::zeros(IxDyn(&[3]));
        assert_eq!(dense_norm(&zero.view()), 0.0);
        let inf = ArrayD::from_elem(IxDyn(&[2]), f64::INFINITY);
        assert!(dense_norm(&inf.view()).is_infinite());
        let tiny = ArrayD::from_elem(IxDyn(&[4]), 1e-300);
        assert!((dense_norm(&tiny.view()) / 2e-300 - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_rank_driven_exact_ranks() {
        let dense = counting(&[3, 4, 5]).mapv(|v| 1.0 / v);
        let result = tt_svd(&dense.view(), &TruncationOptions::ranks(vec![2, 3])).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 2, 3, 1]);
        assert!(result.error_bound > 0.0);
    }

    #[test]
    fn test_rank_request_clipped() {
        let dense = counting(&[2, 3]).mapv(|v| v.sqrt());
        let result = tt_svd(&dense.view(), &TruncationOptions::ranks(RankSpec::Uniform(10))).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 2, 1]);
    }

    #[test]
    fn test_tolerance_bound_holds() {
        let dense = counting(&[4, 3, 5, 2]).mapv(|v| (v * 0.91).cos() + 0.01 * v);
        for eps in [1e-1, 1e-2, 1e-4] {
            for split in [ErrorSplit::RootSumSquare, ErrorSplit::Linear] {
                let opts = TruncationOptions::tolerance(eps).with_error_split(split);
                let result = tt_svd(&dense.view(), &opts).unwrap();
                let err = rel_error(&to_dense(&result.tt).unwrap(), &dense);
                assert!(err <= eps * (1.0 + 1e-8), "eps {} err {}", eps, err);
                assert!(err <= result.error_bound * (1.0 + 1e-8) + 1e-14);
            }
        }
    }

    #[test]
    fn test_capped_unsatisfiable() {
        let dense = counting(&[4, 4, 4]).mapv(|v| (v * 1.3).sin());
        let opts = TruncationOptions::capped(1e-12, RankSpec::Uniform(1));
        assert!(matches!(
            tt_svd(&dense.view(), &opts),
            Err(TtError::ToleranceUnsatisfiable { .. })
        ));
    }

    #[test]
    fn test_capped_satisfiable() {
        let dense = counting(&[2, 2, 2]);
        let opts = TruncationOptions::capped(1e-10, RankSpec::Uniform(4));
        let result = tt_svd(&dense.view(), &opts).unwrap();
        assert_eq!(result.tt.tt_ranks(), vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_invalid_inputs() {
        let nan = ArrayD::from_elem(IxDyn(&[2, 2]), f64::NAN);
        assert!(matches!(
            tt_svd(&nan.view(), &TruncationOptions::default()),
            Err(TtError::IllConditionedInput { .. })
        ));

        let dense = counting(&[2, 2, 2]);
        assert!(matches!(
            tt_svd(&dense.view(), &TruncationOptions::ranks(vec![1])),
            Err(TtError::InvalidRankSpec(_))
        ));
        assert!(matches!(
            tt_svd(&dense.view(), &TruncationOptions::tolerance(-1.0)),
            Err(TtError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_matrix_svd_round_trip() {
        let dense = Array2::from_shape_fn((6, 4), |(i, j)| ((i * 4 + j) as f64 * 0.3).cos());
        let result =
            tt_matrix_svd(&dense.view(), &[2, 3], &[2, 2], &TruncationOptions::tolerance(1e-12))
                .unwrap();
        assert_eq!(result.matrix.row_shape(), &[2, 3]);
        assert_eq!(result.matrix.col_shape(), &[2, 2]);
        let back = to_dense_matrix(&result.matrix).unwrap();
        for (x, y) in back.iter().zip(dense.iter()) {
            assert!((x - y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_matrix_svd_shape_checked() {
        let dense = Array2::<f64>::eye(4);
        assert!(tt_matrix_svd(&dense.view(), &[2, 2], &[2], &TruncationOptions::default()).is_err());
        assert!(tt_matrix_svd(&dense.view(), &[2, 3], &[2, 2], &TruncationOptions::default()).is_err());
    }
}
