//! # ttrain-kernels
//!
//! Kernels that operate directly on tensor trains, without forming dense arrays.
//!
//! ## Overview
//!
//! - **Linear algebra primitive** ([`linalg`]) - thin QR, LQ and sorted SVD over
//!   `scirs2-linalg`, with non-finite input rejected up front
//! - **Orthogonalizer** ([`orthogonalize`]) - left-to-right and right-to-left
//!   QR sweeps, plus per-core orthogonality checks
//! - **Algebra engine** ([`algebra`]) - inner product, norm, TT-matrix products,
//!   dense conversion, and re-exports of the exact structural operations
//! - **Kronecker operations** ([`kronecker`]) - determinant, log-determinant,
//!   inverse and Cholesky factor of rank-1 TT-matrices
//!
//! ## Quick Start
//!
//! ```rust
//! use ttrain_core::{TtMatrix, TtTensor};
//! use ttrain_kernels::{add, inner_product, matmul, norm};
//!
//! let a = TtTensor::<f64>::random(&[3, 4, 5], &[2, 2], 1).unwrap();
//! let b = TtTensor::<f64>::random(&[3, 4, 5], &[3, 2], 2).unwrap();
//!
//! let c = add(&a, &b).unwrap();
//! assert_eq!(c.tt_ranks(), vec![1, 5, 4, 1]);
//!
//! let ip = inner_product(&a, &a).unwrap();
//! let n = norm(&a).unwrap();
//! assert!((ip - n * n).abs() < 1e-10);
//!
//! let eye = TtMatrix::<f64>::identity(&[3, 4, 5]).unwrap();
//! let y = matmul(&eye, &a).unwrap();
//! assert_eq!(y.tt_ranks(), a.tt_ranks());
//! ```
//!
//! ## Complexity
//!
//! With mode size `n`, rank `r` and `d` modes:
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `orthogonalize` | `O(d · n · r³)` |
//! | `inner_product` | `O(d · n · r³)` |
//! | `norm` | `O(d · n · r³)` |
//! | `matmul` | `O(d · p · q · r_A² · r_B²)` |
//! | `to_dense` | `O(∏ n_k · r)` |
//!
//! ## SciRS2 Integration
//!
//! Arrays come from `scirs2_core::ndarray_ext`; QR, SVD, determinants, inverses
//! and Cholesky factors from `scirs2_linalg`.

pub mod algebra;
pub mod kronecker;
pub mod linalg;
pub mod orthogonalize;

#[cfg(test)]
mod property_tests;

pub use algebra::{
    add, hadamard, inner_product, matmul, matvec_dense, negate, norm, quadratic_form, scale,
    sub, sum, to_dense, to_dense_matrix, MatmulOperand,
};
pub use kronecker::{cholesky, determinant, inverse, kronecker_product, log_determinant};
pub use linalg::{thin_lq, thin_qr, thin_svd, ThinSvd};
pub use orthogonalize::{
    is_left_orthogonal, is_right_orthogonal, left_orthogonalize, orthogonalize,
    right_orthogonalize, SweepDirection,
};
