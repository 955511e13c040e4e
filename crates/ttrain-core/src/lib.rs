//! # ttrain-core
//!
//! Core types for the tensor-train (TT) stack.
//!
//! This crate owns the data model every other crate builds on:
//!
//! - **Core blocks** ([`CoreBlock`]): 3-index arrays `(r_{k-1}, n_k, r_k)`
//!   with their left/right unfoldings
//! - **TT-tensors** ([`TtTensor`]): validated chains of cores with boundary
//!   ranks equal to 1
//! - **TT-matrices** ([`TtMatrix`]): trains whose modes factor as `p_k · q_k`
//! - **Truncation options** ([`TruncationOptions`], [`Truncation`],
//!   [`RankSpec`], [`ErrorSplit`])
//! - **Structural algebra** ([`ops`]): exact sum, difference, scaling and
//!   Hadamard product, with `std::ops` impls on references
//! - **Errors** ([`TtError`], [`TtResult`]) shared by the whole stack
//!
//! ## Quick Start
//!
//! ```
//! use ttrain_core::{TtMatrix, TtTensor};
//!
//! let tt = TtTensor::<f64>::random(&[4, 5, 6], &[2, 3], 42).unwrap();
//! assert_eq!(tt.tt_ranks(), vec![1, 2, 3, 1]);
//! assert!(tt.compression_ratio() > 1.0);
//!
//! let eye = TtMatrix::<f64>::identity(&[2, 2]).unwrap();
//! assert_eq!(eye.evaluate(&[1, 0], &[1, 0]).unwrap(), 1.0);
//! ```
//!
//! ## Conventions
//!
//! - Dense arrays are row-major: the last index varies fastest.
//! - Core `k` of a TT-matrix indexes its middle axis as `i · q_k + j`.
//! - Trains are immutable values; operations return new trains.
//!
//! ## SciRS2 Integration
//!
//! Arrays, numeric traits and random numbers come from `scirs2-core`
//! (`ndarray_ext`, `num_traits`, `random`). Direct use of `ndarray`, `rand`
//! or `num-traits` is avoided.
//!
//! ## Features
//!
//! - `serde`: serialization of cores, trains, matrices and options

pub mod config;
pub mod core_block;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod scalar;
pub mod tensor;

#[cfg(test)]
mod property_tests;

pub use config::{ErrorSplit, RankSpec, Truncation, TruncationOptions};
pub use core_block::CoreBlock;
pub use error::{TtError, TtResult};
pub use matrix::TtMatrix;
pub use scalar::TtScalar;
pub use tensor::TtTensor;
