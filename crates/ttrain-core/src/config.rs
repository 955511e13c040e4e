//! Truncation configuration for decomposition and rounding
//!
//! Decomposition and rounding accept exactly one of three strategies:
//!
//! - [`Truncation::ToleranceDriven`]: smallest ranks whose discarded energy stays
//!   within a relative Frobenius tolerance ε
//! - [`Truncation::RankDriven`]: exactly the requested ranks (clipped to what the
//!   unfolding admits), whatever error results
//! - [`Truncation::Capped`]: tolerance-driven ranks, never above a cap; failing to
//!   meet ε under the cap is an error rather than a silent choice
//!
//! The per-cut error budget follows [`ErrorSplit`].
//!
//! # Examples
//!
//! ```
//! use ttrain_core::{ErrorSplit, RankSpec, TruncationOptions};
//!
//! let opts = TruncationOptions::tolerance(1e-6);
//! assert_eq!(opts.error_split, ErrorSplit::RootSumSquare);
//!
//! let capped = TruncationOptions::capped(1e-3, RankSpec::Uniform(8))
//!     .with_error_split(ErrorSplit::Linear);
//! assert_eq!(capped.error_split, ErrorSplit::Linear);
//! ```

use crate::error::{TtError, TtResult};

/// Rank request for the `d - 1` internal bonds of a train
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RankSpec {
    /// Same rank for every bond
    Uniform(usize),
    /// One rank per bond, `ranks[k]` sits between core `k` and core `k + 1`
    PerBond(Vec<usize>),
}

impl RankSpec {
    /// Expand into one rank per bond, validating length and positivity
    pub fn resolve(&self, n_bonds: usize) -> TtResult<Vec<usize>> {
        let ranks = match self {
            RankSpec::Uniform(r) => vec![*r; n_bonds],
            RankSpec::PerBond(ranks) => {
                if ranks.len() != n_bonds {
                    return Err(TtError::invalid_rank(format!(
                        "expected {} bond ranks, got {}",
                        n_bonds,
                        ranks.len()
                    )));
                }
                ranks.clone()
            }
        };

        if let Some(k) = ranks.iter().position(|&r| r == 0) {
            return Err(TtError::invalid_rank(format!(
                "rank of bond {} must be at least 1",
                k
            )));
        }

        Ok(ranks)
    }
}

impl From<usize> for RankSpec {
    fn from(rank: usize) -> Self {
        RankSpec::Uniform(rank)
    }
}

impl From<Vec<usize>> for RankSpec {
    fn from(ranks: Vec<usize>) -> Self {
        RankSpec::PerBond(ranks)
    }
}

impl From<&[usize]> for RankSpec {
    fn from(ranks: &[usize]) -> Self {
        RankSpec::PerBond(ranks.to_vec())
    }
}

/// Truncation strategy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Truncation {
    /// Relative Frobenius tolerance ε (`0.0` requests the exact numerical rank)
    ToleranceDriven {
        /// Relative tolerance
        epsilon: f64,
    },
    /// Explicit target ranks
    RankDriven {
        /// Requested ranks
        ranks: RankSpec,
    },
    /// Tolerance with an upper bound on every rank
    Capped {
        /// Relative tolerance
        epsilon: f64,
        /// Rank caps
        max_ranks: RankSpec,
    },
}

impl Truncation {
    /// Relative tolerance, if the strategy has one
    pub fn epsilon(&self) -> Option<f64> {
        match self {
            Truncation::ToleranceDriven { epsilon } | Truncation::Capped { epsilon, .. } => {
                Some(*epsilon)
            }
            Truncation::RankDriven { .. } => None,
        }
    }

    /// Rank request or cap, if the strategy has one
    pub fn rank_spec(&self) -> Option<&RankSpec> {
        match self {
            Truncation::RankDriven { ranks } => Some(ranks),
            Truncation::Capped { max_ranks, .. } => Some(max_ranks),
            Truncation::ToleranceDriven { .. } => None,
        }
    }

    /// Check the tolerance domain (finite, non-negative)
    pub fn validate(&self) -> TtResult<()> {
        if let Some(eps) = self.epsilon() {
            if !eps.is_finite() || eps < 0.0 {
                return Err(TtError::invalid_structure(format!(
                    "tolerance must be finite and non-negative, got {}",
                    eps
                )));
            }
        }
        Ok(())
    }
}

/// How the global error budget ε·‖A‖ is divided over the `d - 1` cuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSplit {
    /// `δ = ε‖A‖ / √(d-1)`; the squared per-cut errors add up to the budget
    #[default]
    RootSumSquare,
    /// `δ = ε‖A‖ / (d-1)`; stricter, yields larger ranks at the margin
    Linear,
}

impl ErrorSplit {
    /// Per-cut threshold for a total absolute budget spread over `n_cuts` cuts
    pub fn per_cut(self, total_budget: f64, n_cuts: usize) -> f64 {
        if n_cuts == 0 {
            return total_budget;
        }
        match self {
            ErrorSplit::RootSumSquare => total_budget / (n_cuts as f64).sqrt(),
            ErrorSplit::Linear => total_budget / n_cuts as f64,
        }
    }
}

/// Full set of knobs for TT-SVD and rounding
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruncationOptions {
    /// Truncation strategy
    pub truncation: Truncation,

    /// Per-cut error budget convention
    pub error_split: ErrorSplit,

    /// Relative threshold (w.r.t. the largest singular value) below which a
    /// singular value counts as numerically zero.
    /// `None` selects `16 · max(m, n) · machine_epsilon` for an `m × n` unfolding.
    pub zero_tolerance: Option<f64>,
}

impl Default for TruncationOptions {
    fn default() -> Self {
        Self {
            truncation: Truncation::ToleranceDriven { epsilon: 1e-10 },
            error_split: ErrorSplit::default(),
            zero_tolerance: None,
        }
    }
}

impl TruncationOptions {
    /// Tolerance-driven truncation
    pub fn tolerance(epsilon: f64) -> Self {
        Self {
            truncation: Truncation::ToleranceDriven { epsilon },
            ..Default::default()
        }
    }

    /// Rank-driven truncation
    pub fn ranks(ranks: impl Into<RankSpec>) -> Self {
        Self {
            truncation: Truncation::RankDriven {
                ranks: ranks.into(),
            },
            ..Default::default()
        }
    }

    /// Tolerance-driven truncation with rank caps
    pub fn capped(epsilon: f64, max_ranks: impl Into<RankSpec>) -> Self {
        Self {
            truncation: Truncation::Capped {
                epsilon,
                max_ranks: max_ranks.into(),
            },
            ..Default::default()
        }
    }

    /// Replace the error split convention
    pub fn with_error_split(mut self, error_split: ErrorSplit) -> Self {
        self.error_split = error_split;
        self
    }

    /// Replace the numerical-zero threshold
    pub fn with_zero_tolerance(mut self, zero_tolerance: f64) -> Self {
        self.zero_tolerance = Some(zero_tolerance);
        self
    }

    /// Validate the options for a train with `n_bonds` internal bonds and
    /// return the resolved per-bond rank request, if any
    pub fn resolve(&self, n_bonds: usize) -> TtResult<Option<Vec<usize>>> {
        self.truncation.validate()?;
        if let Some(zt) = self.zero_tolerance {
            if !zt.is_finite() || zt < 0.0 {
                return Err(TtError::invalid_structure(format!(
                    "zero tolerance must be finite and non-negative, got {}",
                    zt
                )));
            }
        }
        self.truncation
            .rank_spec()
            .map(|spec| spec.resolve(n_bonds))
            .transpose()
    }
}

impl From<Truncation> for TruncationOptions {
    fn from(truncation: Truncation) -> Self {
        Self {
            truncation,
            ..Default::default()
        }
    }
}
