//! # ttrain - Tensor Train Decomposition and Algebra
//!
//! Compact rank-structured representations of large multidimensional arrays
//! and exact arithmetic on them.
//!
//! This is the **meta crate**: it re-exports every layer and adds the plain
//! functional API plus batch helpers.
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray::Dimension;
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//! use ttrain::prelude::*;
//!
//! // Σ_k sin(x_k) sampled on a 6^4 grid has TT-rank 2
//! let dense = ArrayD::from_shape_fn(IxDyn(&[6, 6, 6, 6]), |idx| {
//!     idx.slice().iter().map(|&i| (i as f64 * 0.5).sin()).sum::<f64>()
//! });
//!
//! let a = decompose(&dense.view(), TruncationOptions::tolerance(1e-10))?;
//! assert_eq!(a.tt_ranks(), vec![1, 2, 2, 2, 1]);
//!
//! // Exact arithmetic grows ranks; rounding brings them back
//! let b = add(&a, &a)?;
//! assert_eq!(b.tt_ranks(), vec![1, 4, 4, 4, 1]);
//! let b = round(&b, TruncationOptions::tolerance(1e-10))?;
//! assert_eq!(b.tt_ranks(), vec![1, 2, 2, 2, 1]);
//!
//! let ratio = norm(&b)? / norm(&a)?;
//! assert!((ratio - 2.0).abs() < 1e-10);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Data Model ([`core`])
//!
//! Core blocks, [`TtTensor`], [`TtMatrix`], [`TtError`] and the truncation
//! configuration ([`TruncationOptions`], [`Truncation`], [`RankSpec`],
//! [`ErrorSplit`]).
//!
//! ### Kernels ([`kernels`])
//!
//! Orthogonalization sweeps, inner products and norms, TT-matrix products,
//! dense conversion and Kronecker-structured operations.
//!
//! ```
//! use ttrain::kernels::{determinant, inverse};
//! use ttrain::TtMatrix;
//! use scirs2_core::ndarray_ext::array;
//!
//! let a = array![[2.0, 1.0], [1.0, 2.0]];
//! let m = TtMatrix::from_kronecker_factors(&[a.clone(), a.clone(), a])?;
//! // det(A ⊗ A ⊗ A) = det(A)^(3 · 4)
//! assert!((determinant(&m)? / 3f64.powi(12) - 1.0).abs() < 1e-10);
//! assert!(inverse(&m)?.is_kronecker());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Decompositions ([`decomp`])
//!
//! TT-SVD, TT-matrix SVD, rounding and bond spectra, each reporting an error
//! bound.
//!
//! ### Functional API ([`api`]) and batches ([`batch`])
//!
//! `decompose`, `round`, `add`, `multiply_elementwise`, `matmul`,
//! `inner_product`, `norm`, `to_dense`; `decompose_batch` and `round_batch`
//! with an optional cancel flag checked between items.
//!
//! ## Features
//!
//! - `parallel` (default): batch helpers run items on the `scirs2-core` thread pool
//! - `serde`: `Serialize`/`Deserialize` for trains and configuration
//!
//! ## Logging
//!
//! Every crate logs through the `log` facade (`debug!` per sweep, `warn!` for
//! clipped ranks and zero inputs). No logger is installed.

pub use ttrain_core as core;
pub use ttrain_decomp as decomp;
pub use ttrain_kernels as kernels;

pub mod api;
pub mod batch;

pub use api::{
    add, decompose, inner_product, matmul, multiply_elementwise, norm, round, to_dense,
};
pub use ttrain_core::{
    CoreBlock, ErrorSplit, RankSpec, Truncation, TruncationOptions, TtError, TtMatrix, TtResult,
    TtScalar, TtTensor,
};

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use ttrain::prelude::*;
    //!
    //! let tt = TtTensor::<f64>::ones(&[2, 3, 4]).unwrap();
    //! assert!((norm(&tt).unwrap() - 24f64.sqrt()).abs() < 1e-12);
    //! ```

    // Data model
    pub use crate::core::{
        ErrorSplit, RankSpec, Truncation, TruncationOptions, TtError, TtMatrix, TtResult,
        TtScalar, TtTensor,
    };

    // Functional API
    pub use crate::api::{
        add, decompose, inner_product, matmul, multiply_elementwise, norm, round, to_dense,
    };

    // Batches
    pub use crate::batch::{decompose_batch, round_batch};

    // Results with error bounds
    pub use crate::decomp::{tt_round, tt_svd, TtDecomposition};
}
