//! TT-matrix: a train whose modes are paired row/column factors
//!
//! Mode `k` of a TT-matrix has size `n_k = p_k · q_k`. The middle axis of core
//! `k` is indexed as `i · q_k + j` for row index `i < p_k` and column index
//! `j < q_k`, i.e. a row-major `(p_k, q_k)` flattening. The train represents
//! the operator mapping the tensorized space `(q₁, …, q_d)` to `(p₁, …, p_d)`.

use crate::core_block::CoreBlock;
use crate::error::{TtError, TtResult};
use crate::scalar::TtScalar;
use crate::tensor::TtTensor;
use scirs2_core::ndarray_ext::{Array2, Array3};

/// Linear operator in tensor-train format
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "T: serde::Serialize")))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct TtMatrix<T> {
    tt: TtTensor<T>,
    row_shape: Vec<usize>,
    col_shape: Vec<usize>,
}

impl<T: TtScalar> TtMatrix<T> {
    /// Build from cores and the row/column factorization of every mode
    pub fn new(
        cores: Vec<CoreBlock<T>>,
        row_shape: Vec<usize>,
        col_shape: Vec<usize>,
    ) -> TtResult<Self> {
        Self::from_tensor(TtTensor::new(cores)?, row_shape, col_shape)
    }

    /// Reinterpret a train as an operator
    pub fn from_tensor(
        tt: TtTensor<T>,
        row_shape: Vec<usize>,
        col_shape: Vec<usize>,
    ) -> TtResult<Self> {
        if row_shape.len() != tt.ndims() || col_shape.len() != tt.ndims() {
            return Err(TtError::shape_mismatch(
                "TtMatrix::from_tensor",
                format!(
                    "train has {} modes, row shape has {}, column shape has {}",
                    tt.ndims(),
                    row_shape.len(),
                    col_shape.len()
                ),
            ));
        }
        for (k, core) in tt.cores().iter().enumerate() {
            let expected = row_shape[k] * col_shape[k];
            if core.mode_size() != expected {
                return Err(TtError::shape_mismatch(
                    "TtMatrix::from_tensor",
                    format!(
                        "core {} has mode size {}, expected {} x {}",
                        k,
                        core.mode_size(),
                        row_shape[k],
                        col_shape[k]
                    ),
                ));
            }
        }
        Ok(Self {
            tt,
            row_shape,
            col_shape,
        })
    }

    /// Identity operator on the tensorized space `shape` (all ranks 1)
    pub fn identity(shape: &[usize]) -> TtResult<Self> {
        let cores = shape
            .iter()
            .map(|&n| {
                CoreBlock::new(Array3::from_shape_fn((1, n * n, 1), |(_, ij, _)| {
                    if ij / n == ij % n {
                        T::one()
                    } else {
                        T::zero()
                    }
                }))
            })
            .collect::<TtResult<Vec<_>>>()?;
        Self::new(cores, shape.to_vec(), shape.to_vec())
    }

    /// Kronecker product `F₁ ⊗ F₂ ⊗ … ⊗ F_d` as a rank-1 TT-matrix
    pub fn from_kronecker_factors(factors: &[Array2<T>]) -> TtResult<Self> {
        let mut cores = Vec::with_capacity(factors.len());
        let mut row_shape = Vec::with_capacity(factors.len());
        let mut col_shape = Vec::with_capacity(factors.len());
        for factor in factors {
            let (p, q) = factor.dim();
            let data = Array3::from_shape_fn((1, p * q, 1), |(_, ij, _)| factor[[ij / q, ij % q]]);
            cores.push(CoreBlock::new(data)?);
            row_shape.push(p);
            col_shape.push(q);
        }
        Self::new(cores, row_shape, col_shape)
    }

    /// Row factors `(p₁, …, p_d)`
    pub fn row_shape(&self) -> &[usize] {
        &self.row_shape
    }

    /// Column factors `(q₁, …, q_d)`
    pub fn col_shape(&self) -> &[usize] {
        &self.col_shape
    }

    /// Total number of rows `∏ p_k`
    pub fn nrows(&self) -> usize {
        self.row_shape.iter().product()
    }

    /// Total number of columns `∏ q_k`
    pub fn ncols(&self) -> usize {
        self.col_shape.iter().product()
    }

    /// Number of modes `d`
    pub fn ndims(&self) -> usize {
        self.tt.ndims()
    }

    /// Ranks `(r₀, …, r_d)`
    pub fn tt_ranks(&self) -> Vec<usize> {
        self.tt.tt_ranks()
    }

    /// Core `k`
    pub fn core(&self, k: usize) -> &CoreBlock<T> {
        self.tt.core(k)
    }

    /// All cores in order
    pub fn cores(&self) -> &[CoreBlock<T>] {
        self.tt.cores()
    }

    /// View as a plain train over the flattened modes
    pub fn as_tensor(&self) -> &TtTensor<T> {
        &self.tt
    }

    /// Take the underlying train
    pub fn into_tensor(self) -> TtTensor<T> {
        self.tt
    }

    /// True when every rank is 1, i.e. the operator is a Kronecker product
    pub fn is_kronecker(&self) -> bool {
        self.tt.max_rank() == 1
    }

    /// Matrix `C_k[l, :, r]` reshaped to `p_k × q_k`
    pub fn mode_matrix(&self, k: usize, l: usize, r: usize) -> Array2<T> {
        let core = self.tt.core(k).as_array();
        let q = self.col_shape[k];
        Array2::from_shape_fn((self.row_shape[k], q), |(i, j)| core[[l, i * q + j, r]])
    }

    /// Transposed operator (row and column factors swapped in every core)
    pub fn transpose(&self) -> TtResult<Self> {
        let mut cores = Vec::with_capacity(self.ndims());
        for (k, core) in self.tt.cores().iter().enumerate() {
            let (p, q) = (self.row_shape[k], self.col_shape[k]);
            let src = core.as_array();
            let data = Array3::from_shape_fn(core.dim(), |(l, ji, r)| {
                let (j, i) = (ji / p, ji % p);
                src[[l, i * q + j, r]]
            });
            cores.push(CoreBlock::new(data)?);
        }
        Self::new(cores, self.col_shape.clone(), self.row_shape.clone())
    }

    /// Entry at a row multi-index and a column multi-index
    pub fn evaluate(&self, row: &[usize], col: &[usize]) -> TtResult<T> {
        if row.len() != self.ndims() || col.len() != self.ndims() {
            return Err(TtError::shape_mismatch(
                "TtMatrix::evaluate",
                format!(
                    "expected {} row and column indices, got {} and {}",
                    self.ndims(),
                    row.len(),
                    col.len()
                ),
            ));
        }
        let mut combined = Vec::with_capacity(self.ndims());
        for k in 0..self.ndims() {
            if row[k] >= self.row_shape[k] || col[k] >= self.col_shape[k] {
                return Err(TtError::shape_mismatch(
                    "TtMatrix::evaluate",
                    format!("index ({}, {}) out of bounds for mode {}", row[k], col[k], k),
                ));
            }
            combined.push(row[k] * self.col_shape[k] + col[k]);
        }
        self.tt.evaluate(&combined)
    }
}
