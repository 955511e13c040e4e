//! # ttrain-decomp
//!
//! Approximation engine for tensor trains: TT-SVD of dense arrays and rounding
//! of existing trains, both with tolerance-driven, rank-driven or capped
//! truncation.
//!
//! ## Overview
//!
//! A tensor train represents
//!
//! ```text
//! A(i₁, …, i_d) = G₁[i₁] · G₂[i₂] ⋯ G_d[i_d]
//! ```
//!
//! with `G_k[i_k]` an `r_{k-1} × r_k` matrix and `r_0 = r_d = 1`.
//!
//! **Algorithms:**
//! - [`tt_svd()`]: sequential SVD of the dense unfoldings
//! - [`tt_matrix_svd`]: the same for a dense operator, producing a TT-matrix
//! - [`tt_round`]: QR sweep followed by a truncating SVD sweep
//! - [`bond_spectra`]: singular values at every cut, without truncation
//!
//! Every sweep reports `error_bound`, the relative Frobenius norm of what it
//! discarded. For tolerance-driven truncation with the default
//! [`ErrorSplit::RootSumSquare`](ttrain_core::ErrorSplit) it never exceeds ε.
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//! use ttrain_core::{RankSpec, TruncationOptions};
//! use ttrain_decomp::{tt_round, tt_svd};
//!
//! let dense = ArrayD::from_shape_fn(IxDyn(&[4, 5, 6]), |idx| {
//!     1.0 / (1.0 + idx[0] as f64 + idx[1] as f64 + idx[2] as f64)
//! });
//!
//! let fine = tt_svd(&dense.view(), &TruncationOptions::tolerance(1e-8))?;
//! println!("ranks {:?}, bound {:.2e}", fine.ranks(), fine.error_bound);
//!
//! let coarse = tt_round(&fine.tt, &TruncationOptions::ranks(RankSpec::Uniform(2)))?;
//! assert_eq!(coarse.ranks(), vec![1, 2, 2, 1]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## SciRS2 Integration
//!
//! Arrays come from `scirs2_core::ndarray_ext`. Factorizations go through
//! `ttrain_kernels::linalg`, which wraps `scirs2_linalg`.
//!
//! ## References
//!
//! - Oseledets (2011), "Tensor-Train Decomposition"
//! - Oseledets & Tyrtyshnikov (2010), "TT-cross approximation for multidimensional arrays"

pub mod rounding;
pub mod spectrum;
pub mod truncation;
pub mod tt_svd;


pub use rounding::tt_round;
pub use spectrum::bond_spectra;
pub use truncation::{default_zero_tolerance, select_rank, CutTarget, RankSelection};
pub use tt_svd::{tt_matrix_svd, tt_svd, TtDecomposition, TtMatrixDecomposition};
