//! Batch helpers: many independent decompositions or roundings
//!
//! Items never share state, so with the `parallel` feature they run on the
//! `scirs2_core::parallel_ops` thread pool. A sweep is never interrupted: the
//! optional cancel flag is read before each item starts, and a cancelled batch
//! returns [`TtError::Cancelled`] with the number of items that finished.
//!
//! On failure the error of the first failing item (in input order) is returned.

use log::debug;
use scirs2_core::ndarray_ext::ArrayD;
use std::sync::atomic::{AtomicBool, Ordering};
use ttrain_core::{TruncationOptions, TtError, TtResult, TtScalar, TtTensor};
use ttrain_decomp::{tt_round, tt_svd, TtDecomposition};

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Run `job` on every item, skipping items that start after cancellation
fn run_batch<I, R, F>(
    operation: &str,
    items: &[I],
    cancel: Option<&AtomicBool>,
    job: F,
) -> TtResult<Vec<R>>
where
    I: Sync,
    R: Send,
    F: Fn(&I) -> TtResult<R> + Sync + Send,
{
    let run_one = |item: &I| -> Option<TtResult<R>> {
        if is_cancelled(cancel) {
            None
        } else {
            Some(job(item))
        }
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Option<TtResult<R>>> = items.par_iter().map(run_one).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Option<TtResult<R>>> = {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let outcome = run_one(item);
            let stop = outcome.is_none();
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    };

    let completed = outcomes.iter().filter(|o| o.is_some()).count();
    if completed < items.len() {
        debug!(
            "{}: cancelled after {} of {} item(s)",
            operation,
            completed,
            items.len()
        );
        return Err(TtError::Cancelled { completed });
    }

    outcomes.into_iter().flatten().collect()
}

/// Decompose every array with the same options
///
/// # Example
///
/// ```
/// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
/// use ttrain::batch::decompose_batch;
/// use ttrain::TruncationOptions;
///
/// let inputs: Vec<ArrayD<f64>> = (1..=4)
///     .map(|s| ArrayD::from_elem(IxDyn(&[2, 3, 4]), s as f64))
///     .collect();
/// let results = decompose_batch(&inputs, &TruncationOptions::default(), None)?;
/// assert!(results.iter().all(|r| r.ranks() == vec![1, 1, 1, 1]));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn decompose_batch<T: TtScalar>(
    inputs: &[ArrayD<T>],
    opts: &TruncationOptions,
    cancel: Option<&AtomicBool>,
) -> TtResult<Vec<TtDecomposition<T>>> {
    run_batch("decompose_batch", inputs, cancel, |dense| {
        tt_svd(&dense.view(), opts)
    })
}

/// Round every train with the same options
pub fn round_batch<T: TtScalar>(
    trains: &[TtTensor<T>],
    opts: &TruncationOptions,
    cancel: Option<&AtomicBool>,
) -> TtResult<Vec<TtDecomposition<T>>> {
    run_batch("round_batch", trains, cancel, |tt| tt_round(tt, opts))
}
