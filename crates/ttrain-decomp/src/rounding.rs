//! TT rounding: rank reduction of an existing train
//!
//! Two sweeps. A right-to-left QR sweep moves all scale into the first core,
//! so `‖A‖ = ‖G_1‖_F` and the left unfolding of the current core carries the
//! singular values of the full unfolding at each cut. A left-to-right SVD
//! sweep then truncates every bond with the same rule and error bookkeeping
//! as [`crate::tt_svd()`].
//!
//! A train whose bonds are already at their numerical ranks comes back with
//! the same ranks, so rounding a rounded train at a tolerance that only drops
//! numerically-zero directions is idempotent.
//!
//! # Complexity
//!
//! `O(d · n · r³)` for mode size `n` and maximum rank `r`; no dense array is formed.

use crate::truncation::TruncationPlan;
use crate::tt_svd::TtDecomposition;
use log::{debug, warn};
use scirs2_core::ndarray_ext::{s, Array2};
use ttrain_core::{CoreBlock, TruncationOptions, TtError, TtResult, TtScalar, TtTensor};
use ttrain_kernels::{right_orthogonalize, thin_svd};

/// Reduce the ranks of a train
///
/// # Errors
///
/// Same as [`crate::tt_svd()`]; non-finite cores give
/// [`ttrain_core::TtError::IllConditionedInput`].
///
/// # Example
///
/// ```
/// use ttrain_core::{TruncationOptions, TtTensor};
/// use ttrain_decomp::tt_round;
/// use ttrain_kernels::add;
///
/// let a = TtTensor::<f64>::random(&[3, 4, 3], &[2, 2], 7).unwrap();
/// let doubled = add(&a, &a).unwrap();
/// assert_eq!(doubled.tt_ranks(), vec![1, 4, 4, 1]);
///
/// let rounded = tt_round(&doubled, &TruncationOptions::tolerance(1e-10)).unwrap();
/// assert_eq!(rounded.tt.tt_ranks(), vec![1, 2, 2, 1]);
/// ```
pub fn tt_round<T: TtScalar>(
    tt: &TtTensor<T>,
    opts: &TruncationOptions,
) -> TtResult<TtDecomposition<T>> {
    let d = tt.ndims();
    // Validate before any numerical work
    TruncationPlan::new(opts, d - 1, 1.0)?;

    if !tt.is_finite() {
        return Err(TtError::ill_conditioned(
            "tt_round",
            "train contains NaN or infinite core entries",
        ));
    }

    // A zero core zeroes the whole train
    let has_zero_core = tt
        .cores()
        .iter()
        .any(|core| core.frobenius_norm() == T::zero());
    let ortho = if has_zero_core {
        None
    } else {
        Some(right_orthogonalize(tt)?)
    };
    let norm = ortho
        .as_ref()
        .map(|o| o.core(0).frobenius_norm().to_f64_lossy())
        .unwrap_or(0.0);

    let ortho = match ortho {
        Some(o) if norm > 0.0 => o,
        _ => {
            warn!(
                "tt_round: train of shape {:?} has zero norm, returning rank-1 zero train",
                tt.raw_shape()
            );
            return Ok(TtDecomposition {
                tt: TtTensor::zeros(&tt.raw_shape())?,
                error_bound: 0.0,
            });
        }
    };
    let mut plan = TruncationPlan::new(opts, d - 1, norm)?;

    debug!(
        "tt_round: ranks {:?} -> budget {:?} per cut",
        tt.tt_ranks(),
        plan.delta()
    );

    let mut cores: Vec<CoreBlock<T>> = Vec::with_capacity(d);
    let mut carry: Option<Array2<T>> = None;

    for (k, core) in ortho.cores().iter().enumerate() {
        let n = core.mode_size();
        let current = match carry.take() {
            Some(c) => {
                let merged = c.dot(&core.right_unfolding());
                CoreBlock::from_right_unfolding(&merged.view(), n, core.right_rank())?
            }
            None => core.clone(),
        };

        if k + 1 == d {
            cores.push(current);
            break;
        }

        let unfolding = current.left_unfolding();
        let svd = thin_svd(&unfolding.view())?;
        let rank = plan.select("tt_round", k, &svd.s, unfolding.dim());

        cores.push(CoreBlock::from_left_unfolding(
            &svd.u.slice(s![.., ..rank]),
            current.left_rank(),
            n,
        )?);

        let mut next = svd.vt.slice(s![..rank, ..]).to_owned();
        for (mut row, &sigma) in next.rows_mut().into_iter().zip(svd.s.iter()) {
            row.mapv_inplace(|v| v * sigma);
        }
        carry = Some(next);
    }

    debug!("tt_round: bond ranks {:?}", plan.chosen());
    let error_bound = plan.finish()?;
    Ok(TtDecomposition {
        tt: TtTensor::new(cores)?,
        error_bound,
    })
}
