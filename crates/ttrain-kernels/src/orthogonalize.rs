//! Orthogonalization sweeps
//!
//! A left-to-right sweep makes cores `1..d-1` left-orthogonal (their left
//! unfoldings have orthonormal columns) and leaves all scale in the last core.
//! A right-to-left sweep is the mirror image: cores `2..d` become
//! right-orthogonal and the first core carries the scale.
//!
//! At each step the current core is factored with a thin QR (LQ for the
//! right-to-left direction) and the triangular remainder is contracted into the
//! neighbouring core along the shared rank axis. Ranks never grow; a bond whose
//! rank exceeds what its unfolding admits shrinks to `min(rows, cols)`.
//!
//! Sweeps are functional: the input train is never modified.
//!
//! # References
//!
//! - Oseledets, I. V. (2011). "Tensor-Train Decomposition"

use crate::linalg::{thin_lq, thin_qr};
use log::debug;
use scirs2_core::ndarray_ext::Array2;
use ttrain_core::{CoreBlock, TtError, TtResult, TtScalar, TtTensor};

/// Direction of an orthogonalization sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Cores `1..d-1` become left-orthogonal; the last core carries the scale
    LeftToRight,
    /// Cores `2..d` become right-orthogonal; the first core carries the scale
    RightToLeft,
}

/// Sweep a train into left- or right-orthogonal form
///
/// # Errors
///
/// [`TtError::IllConditionedInput`] if a core contains NaN or infinite values or
/// a factorization fails.
///
/// # Example
///
/// ```rust
/// use ttrain_core::TtTensor;
/// use ttrain_kernels::orthogonalize::{is_left_orthogonal, orthogonalize, SweepDirection};
///
/// let tt = TtTensor::<f64>::random(&[3, 4, 5], &[2, 3], 0).unwrap();
/// let ortho = orthogonalize(&tt, SweepDirection::LeftToRight).unwrap();
/// assert!(is_left_orthogonal(ortho.core(0), 1e-10));
/// assert!(is_left_orthogonal(ortho.core(1), 1e-10));
/// ```
pub fn orthogonalize<T: TtScalar>(
    tt: &TtTensor<T>,
    direction: SweepDirection,
) -> TtResult<TtTensor<T>> {
    if !tt.is_finite() {
        return Err(TtError::ill_conditioned(
            "orthogonalize",
            "train contains NaN or infinite core entries",
        ));
    }

    match direction {
        SweepDirection::LeftToRight => left_to_right(tt),
        SweepDirection::RightToLeft => right_to_left(tt),
    }
}

/// Shorthand for [`orthogonalize`] with [`SweepDirection::LeftToRight`]
pub fn left_orthogonalize<T: TtScalar>(tt: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    orthogonalize(tt, SweepDirection::LeftToRight)
}

/// Shorthand for [`orthogonalize`] with [`SweepDirection::RightToLeft`]
pub fn right_orthogonalize<T: TtScalar>(tt: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    orthogonalize(tt, SweepDirection::RightToLeft)
}

fn left_to_right<T: TtScalar>(tt: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    let d = tt.ndims();
    let mut cores: Vec<CoreBlock<T>> = Vec::with_capacity(d);
    let mut carry: Option<Array2<T>> = None;

    for (k, core) in tt.cores().iter().enumerate() {
        let n = core.mode_size();
        // Absorb the remainder of the previous step: R · C_k (right unfolding)
        let current = match carry.take() {
            Some(r) => {
                let merged = r.dot(&core.right_unfolding());
                CoreBlock::from_right_unfolding(&merged.view(), n, core.right_rank())?
            }
            None => core.clone(),
        };

        if k + 1 == d {
            cores.push(current);
            break;
        }

        let (q, r) = thin_qr(&current.left_unfolding().view())?;
        if q.ncols() < current.right_rank() {
            debug!(
                "orthogonalize: bond {} shrinks from {} to {}",
                k + 1,
                current.right_rank(),
                q.ncols()
            );
        }
        cores.push(CoreBlock::from_left_unfolding(
            &q.view(),
            current.left_rank(),
            n,
        )?);
        carry = Some(r);
    }

    TtTensor::new(cores)
}

fn right_to_left<T: TtScalar>(tt: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    let d = tt.ndims();
    let mut reversed: Vec<CoreBlock<T>> = Vec::with_capacity(d);
    let mut carry: Option<Array2<T>> = None;

    for k in (0..d).rev() {
        let core = tt.core(k);
        let n = core.mode_size();
        // Absorb the remainder of the previous step: C_k (left unfolding) · L
        let current = match carry.take() {
            Some(l) => {
                let merged = core.left_unfolding().dot(&l);
                CoreBlock::from_left_unfolding(&merged.view(), core.left_rank(), n)?
            }
            None => core.clone(),
        };

        if k == 0 {
            reversed.push(current);
            break;
        }

        let (l, q) = thin_lq(&current.right_unfolding().view())?;
        if q.nrows() < current.left_rank() {
            debug!(
                "orthogonalize: bond {} shrinks from {} to {}",
                k,
                current.left_rank(),
                q.nrows()
            );
        }
        reversed.push(CoreBlock::from_right_unfolding(
            &q.view(),
            n,
            current.right_rank(),
        )?);
        carry = Some(l);
    }

    reversed.reverse();
    TtTensor::new(reversed)
}

/// True when the left unfolding of `core` has orthonormal columns within `tol`
pub fn is_left_orthogonal<T: TtScalar>(core: &CoreBlock<T>, tol: f64) -> bool {
    let unfolding = core.left_unfolding();
    is_identity(&unfolding.t().dot(&unfolding), tol)
}

/// True when the right unfolding of `core` has orthonormal rows within `tol`
pub fn is_right_orthogonal<T: TtScalar>(core: &CoreBlock<T>, tol: f64) -> bool {
    let unfolding = core.right_unfolding();
    is_identity(&unfolding.dot(&unfolding.t()), tol)
}

fn is_identity<T: TtScalar>(gram: &Array2<T>, tol: f64) -> bool {
    gram.indexed_iter().all(|((i, j), &v)| {
        let target = if i == j { 1.0 } else { 0.0 };
        (v.to_f64_lossy() - target).abs() <= tol
    })
}
