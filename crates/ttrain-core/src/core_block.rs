//! Core blocks: the 3-index storage unit of a tensor train
//!
//! A core for mode `k` has shape `(r_{k-1}, n_k, r_k)`. The two matricizations
//! used throughout the sweeps are
//!
//! - the *left unfolding* `(r_{k-1} · n_k) × r_k`
//! - the *right unfolding* `r_{k-1} × (n_k · r_k)`
//!
//! both in row-major order, so folding an unfolding back is lossless.

use crate::error::{TtError, TtResult};
use crate::scalar::TtScalar;
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayView2, ArrayView3, Axis};

/// Dense 3-index block `(r_left, mode_size, r_right)`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "T: serde::Serialize")))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct CoreBlock<T> {
    data: Array3<T>,
}

impl<T: TtScalar> CoreBlock<T> {
    /// Wrap a 3-way array; every axis must be non-empty
    pub fn new(data: Array3<T>) -> TtResult<Self> {
        let (r_left, n, r_right) = data.dim();
        if r_left == 0 || n == 0 || r_right == 0 {
            return Err(TtError::invalid_structure(format!(
                "core block axes must be non-empty, got ({}, {}, {})",
                r_left, n, r_right
            )));
        }
        Ok(Self { data })
    }

    /// Zero-filled block
    pub fn zeros(r_left: usize, mode_size: usize, r_right: usize) -> TtResult<Self> {
        Self::new(Array3::zeros((r_left, mode_size, r_right)))
    }

    /// Fold a `(r_left · mode_size) × r_right` matrix into a block
    pub fn from_left_unfolding(
        matrix: &ArrayView2<T>,
        r_left: usize,
        mode_size: usize,
    ) -> TtResult<Self> {
        if matrix.nrows() != r_left * mode_size {
            return Err(TtError::shape_mismatch(
                "from_left_unfolding",
                format!(
                    "matrix has {} rows, expected {} x {}",
                    matrix.nrows(),
                    r_left,
                    mode_size
                ),
            ));
        }
        let r_right = matrix.ncols();
        let data = Array3::from_shape_vec(
            (r_left, mode_size, r_right),
            matrix.iter().cloned().collect(),
        )
        .map_err(|e| TtError::shape_mismatch("from_left_unfolding", e.to_string()))?;
        Self::new(data)
    }

    /// Fold a `r_left × (mode_size · r_right)` matrix into a block
    pub fn from_right_unfolding(
        matrix: &ArrayView2<T>,
        mode_size: usize,
        r_right: usize,
    ) -> TtResult<Self> {
        if matrix.ncols() != mode_size * r_right {
            return Err(TtError::shape_mismatch(
                "from_right_unfolding",
                format!(
                    "matrix has {} columns, expected {} x {}",
                    matrix.ncols(),
                    mode_size,
                    r_right
                ),
            ));
        }
        let r_left = matrix.nrows();
        let data = Array3::from_shape_vec(
            (r_left, mode_size, r_right),
            matrix.iter().cloned().collect(),
        )
        .map_err(|e| TtError::shape_mismatch("from_right_unfolding", e.to_string()))?;
        Self::new(data)
    }

    /// `(r_left, mode_size, r_right)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Left rank `r_{k-1}`
    pub fn left_rank(&self) -> usize {
        self.data.shape()[0]
    }

    /// Mode size `n_k`
    pub fn mode_size(&self) -> usize {
        self.data.shape()[1]
    }

    /// Right rank `r_k`
    pub fn right_rank(&self) -> usize {
        self.data.shape()[2]
    }

    /// Number of stored scalars
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed block; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Borrow the underlying array
    pub fn as_array(&self) -> &Array3<T> {
        &self.data
    }

    /// Take the underlying array
    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    /// Matrix `C[:, i, :]` of shape `r_left × r_right`
    pub fn mode_slice(&self, i: usize) -> ArrayView2<'_, T> {
        self.data.index_axis(Axis(1), i)
    }

    /// Left unfolding `(r_left · mode_size) × r_right`
    pub fn left_unfolding(&self) -> Array2<T> {
        let (r_left, n, r_right) = self.dim();
        Array2::from_shape_fn((r_left * n, r_right), |(row, col)| {
            self.data[[row / n, row % n, col]]
        })
    }

    /// Right unfolding `r_left × (mode_size · r_right)`
    pub fn right_unfolding(&self) -> Array2<T> {
        let (r_left, n, r_right) = self.dim();
        Array2::from_shape_fn((r_left, n * r_right), |(row, col)| {
            self.data[[row, col / r_right, col % r_right]]
        })
    }

    /// True when no entry is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Copy with every entry multiplied by `alpha`
    pub fn scaled(&self, alpha: T) -> Self {
        Self {
            data: self.data.mapv(|v| v * alpha),
        }
    }

    /// Squared Frobenius norm of the block
    pub fn frobenius_norm_sq(&self) -> T {
        self.data.iter().map(|&v| v * v).sum()
    }

    /// Frobenius norm of the block, summed relative to the largest magnitude
    /// so that it stays finite whenever every entry is
    pub fn frobenius_norm(&self) -> T {
        let scale = self.data.iter().fold(T::zero(), |acc, &v| acc.max(v.abs()));
        if scale == T::zero() || !scale.is_finite() {
            return scale;
        }
        let sum: T = self
            .data
            .iter()
            .map(|&v| {
                let x = v / scale;
                x * x
            })
            .sum();
        scale * sum.sqrt()
    }
}
