//! Rank selection at a single cut, and error bookkeeping across a sweep
//!
//! Given the descending singular values `σ` of an `m × n` unfolding:
//!
//! 1. values with `σ_i ≤ zero_tol · σ_max` count as numerically zero, where
//!    `zero_tol` defaults to `16 · max(m, n) · machine_epsilon`;
//! 2. tolerance-driven: the smallest `r ≥ 1` whose tail energy
//!    `sqrt(Σ_{i ≥ r} σ_i²)` is at most the per-cut budget `δ`, never above the
//!    numerical rank;
//! 3. rank-driven: exactly `min(requested, min(m, n))`, zero values included;
//! 4. capped: the tolerance rank, then clipped to the cap. A sweep in which a
//!    cap was binding and the total error bound exceeds ε fails with
//!    [`TtError::ToleranceUnsatisfiable`].
//!
//! The per-cut budget is `δ = ErrorSplit::per_cut(ε‖A‖, d - 1)`. Since the
//! discarded energies of a TT-SVD sweep add up, `sqrt(Σ discarded) / ‖A‖` is a
//! bound on the relative reconstruction error. A plan measures singular values
//! relative to the reference norm, so squared energies stay finite for any
//! finite input.

use log::warn;
use scirs2_core::ndarray_ext::Array1;
use ttrain_core::{Truncation, TruncationOptions, TtError, TtResult, TtScalar};

/// Default numerical-zero threshold in units of `max(m, n) · machine_epsilon`
pub const ZERO_TOLERANCE_FACTOR: f64 = 16.0;

/// Default relative numerical-zero threshold for an `m × n` unfolding of
/// `T`-valued data
pub fn default_zero_tolerance<T: TtScalar>(shape: (usize, usize)) -> f64 {
    ZERO_TOLERANCE_FACTOR * shape.0.max(shape.1) as f64 * T::epsilon().to_f64_lossy()
}

/// What a single cut is asked to achieve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutTarget {
    /// Tail energy at most `delta` (absolute)
    Tolerance {
        /// Absolute per-cut budget
        delta: f64,
    },
    /// Exactly this many singular values
    Rank {
        /// Requested rank
        rank: usize,
    },
    /// Tolerance rank, at most `cap`
    Capped {
        /// Absolute per-cut budget
        delta: f64,
        /// Upper bound on the rank
        cap: usize,
    },
}

/// Outcome of rank selection at one cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSelection {
    /// Number of singular values kept (at least 1)
    pub rank: usize,
    /// Squared Frobenius norm of the discarded singular values
    pub discarded_sq: f64,
    /// Set when a rank request exceeded the number of singular values
    pub clipped_from: Option<usize>,
    /// True when a cap forced the rank below the tolerance rank
    pub cap_binding: bool,
}

/// Select the rank at one cut
///
/// `sigma` must be sorted in descending order; `zero_threshold` is absolute.
///
/// # Examples
///
/// ```
/// use ttrain_decomp::truncation::{select_rank, CutTarget};
///
/// let sigma = [10.0, 1.0, 0.1, 0.01];
/// // Tail after 2 values is sqrt(0.1² + 0.01²) ≈ 0.1005
/// let sel = select_rank(&sigma, CutTarget::Tolerance { delta: 0.2 }, 0.0);
/// assert_eq!(sel.rank, 2);
///
/// let sel = select_rank(&sigma, CutTarget::Rank { rank: 9 }, 0.0);
/// assert_eq!(sel.rank, 4);
/// assert_eq!(sel.clipped_from, Some(9));
/// ```
pub fn select_rank(sigma: &[f64], target: CutTarget, zero_threshold: f64) -> RankSelection {
    let k = sigma.len();
    if k == 0 {
        return RankSelection {
            rank: 1,
            discarded_sq: 0.0,
            clipped_from: None,
            cap_binding: false,
        };
    }

    // tail_sq[r] = Σ_{i ≥ r} σ_i², with tail_sq[k] = 0
    let mut tail_sq = vec![0.0; k + 1];
    for i in (0..k).rev() {
        tail_sq[i] = tail_sq[i + 1] + sigma[i] * sigma[i];
    }

    let numerical_rank = sigma.iter().filter(|&&s| s > zero_threshold).count().max(1);
    let tolerance_rank = |delta: f64| {
        let budget_sq = delta * delta;
        (1..=numerical_rank)
            .find(|&r| tail_sq[r] <= budget_sq)
            .unwrap_or(numerical_rank)
    };

    let (rank, clipped_from, cap_binding) = match target {
        CutTarget::Tolerance { delta } => (tolerance_rank(delta), None, false),
        CutTarget::Rank { rank } => {
            let clipped = if rank > k { Some(rank) } else { None };
            (rank.clamp(1, k), clipped, false)
        }
        CutTarget::Capped { delta, cap } => {
            let wanted = tolerance_rank(delta);
            let rank = wanted.min(cap).clamp(1, k);
            (rank, None, rank < wanted)
        }
    };

    RankSelection {
        rank,
        discarded_sq: tail_sq[rank],
        clipped_from,
        cap_binding,
    }
}

/// Per-sweep truncation state: targets per bond, accumulated discarded energy
#[derive(Debug, Clone)]
pub(crate) struct TruncationPlan {
    truncation: Truncation,
    ranks: Option<Vec<usize>>,
    delta: Option<f64>,
    zero_tolerance: Option<f64>,
    norm: f64,
    /// Discarded energy relative to `norm²`
    discarded_sq: f64,
    cap_binding: bool,
    chosen: Vec<usize>,
}

impl TruncationPlan {
    /// Validate `opts` for a train with `n_bonds` bonds and a reference norm
    pub(crate) fn new(opts: &TruncationOptions, n_bonds: usize, norm: f64) -> TtResult<Self> {
        let ranks = opts.resolve(n_bonds)?;
        let delta = opts
            .truncation
            .epsilon()
            .map(|eps| opts.error_split.per_cut(eps * norm, n_bonds));
        Ok(Self {
            truncation: opts.truncation.clone(),
            ranks,
            delta,
            zero_tolerance: opts.zero_tolerance,
            norm,
            discarded_sq: 0.0,
            cap_binding: false,
            chosen: Vec::with_capacity(n_bonds),
        })
    }

    /// Per-cut absolute budget, if tolerance-driven
    pub(crate) fn delta(&self) -> Option<f64> {
        self.delta
    }

    /// Choose the rank for `bond` from the singular values of an `m × n` unfolding
    pub(crate) fn select<T: TtScalar>(
        &mut self,
        operation: &str,
        bond: usize,
        sigma: &Array1<T>,
        shape: (usize, usize),
    ) -> usize {
        let unit = if self.norm > 0.0 { self.norm } else { 1.0 };
        let values: Vec<f64> = sigma.iter().map(|s| s.to_f64_lossy() / unit).collect();
        let sigma_max = values.first().copied().unwrap_or(0.0);
        let relative_zero = self
            .zero_tolerance
            .unwrap_or_else(|| default_zero_tolerance::<T>(shape));
        let zero_threshold = relative_zero * sigma_max;
        let delta = self.delta.map(|d| d / unit);

        let target = match (&self.truncation, &self.ranks, delta) {
            (Truncation::RankDriven { .. }, Some(ranks), _) => CutTarget::Rank { rank: ranks[bond] },
            (Truncation::Capped { .. }, Some(caps), Some(delta)) => CutTarget::Capped {
                delta,
                cap: caps[bond],
            },
            (_, _, delta) => CutTarget::Tolerance {
                delta: delta.unwrap_or(0.0),
            },
        };

        let selection = select_rank(&values, target, zero_threshold);
        if let Some(requested) = selection.clipped_from {
            warn!(
                "{}: requested rank {} at bond {} exceeds {} available singular values, clipped",
                operation,
                requested,
                bond + 1,
                values.len()
            );
        }

        self.discarded_sq += selection.discarded_sq;
        self.cap_binding |= selection.cap_binding;
        self.chosen.push(selection.rank);
        selection.rank
    }

    /// Ranks chosen so far
    pub(crate) fn chosen(&self) -> &[usize] {
        &self.chosen
    }

    /// Relative error bound of the sweep, or `ToleranceUnsatisfiable` when a
    /// rank cap kept the sweep from meeting ε
    pub(crate) fn finish(self) -> TtResult<f64> {
        let bound = if self.norm > 0.0 {
            self.discarded_sq.sqrt()
        } else {
            0.0
        };

        if let Truncation::Capped { epsilon, .. } = self.truncation {
            if self.cap_binding && bound > epsilon {
                return Err(TtError::ToleranceUnsatisfiable {
                    requested: epsilon,
                    achieved: bound,
                });
            }
        }
        Ok(bound)
    }
}
