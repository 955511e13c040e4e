//! TT-tensor: an ordered chain of core blocks
//!
//! A train of `d` cores `[C₁, …, C_d]` represents the array
//!
//! ```text
//! A(i₁, …, i_d) = C₁[:, i₁, :] · C₂[:, i₂, :] · … · C_d[:, i_d, :]
//! ```
//!
//! with boundary ranks `r₀ = r_d = 1` and matching adjacent ranks. Trains are
//! immutable values: every transformation returns a new train, so a train can
//! be shared read-only across threads without locking.

use crate::core_block::CoreBlock;
use crate::error::{TtError, TtResult};
use crate::scalar::TtScalar;
use scirs2_core::ndarray_ext::{Array2, Array3};
use scirs2_core::random::{rngs::StdRng, Distribution, RandNormal as Normal, SeedableRng};

/// Tensor-train representation of a `d`-dimensional array
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "T: serde::Serialize")))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct TtTensor<T> {
    cores: Vec<CoreBlock<T>>,
}

impl<T: TtScalar> TtTensor<T> {
    /// Build a train from cores, checking boundary ranks and the rank chain
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::Array3;
    /// use ttrain_core::{CoreBlock, TtTensor};
    ///
    /// let cores = vec![
    ///     CoreBlock::new(Array3::<f64>::ones((1, 3, 2))).unwrap(),
    ///     CoreBlock::new(Array3::<f64>::ones((2, 4, 1))).unwrap(),
    /// ];
    /// let tt = TtTensor::new(cores).unwrap();
    /// assert_eq!(tt.raw_shape(), vec![3, 4]);
    /// assert_eq!(tt.tt_ranks(), vec![1, 2, 1]);
    /// ```
    pub fn new(cores: Vec<CoreBlock<T>>) -> TtResult<Self> {
        if cores.is_empty() {
            return Err(TtError::invalid_structure("a train needs at least one core"));
        }
        if cores[0].left_rank() != 1 {
            return Err(TtError::invalid_structure(format!(
                "first core must have left rank 1, got {}",
                cores[0].left_rank()
            )));
        }
        let last = &cores[cores.len() - 1];
        if last.right_rank() != 1 {
            return Err(TtError::invalid_structure(format!(
                "last core must have right rank 1, got {}",
                last.right_rank()
            )));
        }
        for (k, pair) in cores.windows(2).enumerate() {
            if pair[0].right_rank() != pair[1].left_rank() {
                return Err(TtError::invalid_structure(format!(
                    "rank mismatch between cores {} and {}: {} vs {}",
                    k,
                    k + 1,
                    pair[0].right_rank(),
                    pair[1].left_rank()
                )));
            }
        }
        Ok(Self { cores })
    }

    /// Build a train from raw 3-way arrays
    pub fn from_arrays(arrays: Vec<Array3<T>>) -> TtResult<Self> {
        let cores = arrays
            .into_iter()
            .map(CoreBlock::new)
            .collect::<TtResult<Vec<_>>>()?;
        Self::new(cores)
    }

    /// Rank-1 train of the all-zero array
    pub fn zeros(shape: &[usize]) -> TtResult<Self> {
        Self::filled(shape, T::zero())
    }

    /// Rank-1 train of the all-ones array
    pub fn ones(shape: &[usize]) -> TtResult<Self> {
        Self::filled(shape, T::one())
    }

    fn filled(shape: &[usize], value: T) -> TtResult<Self> {
        let cores = shape
            .iter()
            .map(|&n| CoreBlock::new(Array3::from_elem((1, n, 1), value)))
            .collect::<TtResult<Vec<_>>>()?;
        Self::new(cores)
    }

    /// Train with i.i.d. standard normal core entries and the given bond ranks
    ///
    /// Entries of core `k` are scaled by `1/√(r_{k-1}·n_k)` so the represented
    /// array keeps an O(1) magnitude as the number of modes grows.
    pub fn random(shape: &[usize], ranks: &[usize], seed: u64) -> TtResult<Self> {
        if shape.is_empty() {
            return Err(TtError::invalid_structure("shape must have at least one mode"));
        }
        if ranks.len() + 1 != shape.len() {
            return Err(TtError::invalid_rank(format!(
                "expected {} bond ranks for {} modes, got {}",
                shape.len() - 1,
                shape.len(),
                ranks.len()
            )));
        }
        if ranks.contains(&0) {
            return Err(TtError::invalid_rank("bond ranks must be at least 1"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| TtError::invalid_structure(format!("normal distribution: {}", e)))?;
        let mut full_ranks = Vec::with_capacity(shape.len() + 1);
        full_ranks.push(1);
        full_ranks.extend_from_slice(ranks);
        full_ranks.push(1);

        let mut cores = Vec::with_capacity(shape.len());
        for (k, &n) in shape.iter().enumerate() {
            let (r_left, r_right) = (full_ranks[k], full_ranks[k + 1]);
            let scale = 1.0 / ((r_left * n) as f64).sqrt();
            let data = Array3::from_shape_simple_fn((r_left, n, r_right), || {
                T::from_f64_lossy(normal.sample(&mut rng) * scale)
            });
            cores.push(CoreBlock::new(data)?);
        }
        Self::new(cores)
    }

    /// Number of modes `d`
    pub fn ndims(&self) -> usize {
        self.cores.len()
    }

    /// Mode sizes `(n₁, …, n_d)`
    pub fn raw_shape(&self) -> Vec<usize> {
        self.cores.iter().map(|c| c.mode_size()).collect()
    }

    /// Ranks `(r₀, …, r_d)` including both boundary ones
    pub fn tt_ranks(&self) -> Vec<usize> {
        let mut ranks = Vec::with_capacity(self.cores.len() + 1);
        ranks.push(1);
        ranks.extend(self.cores.iter().map(|c| c.right_rank()));
        ranks
    }

    /// Internal bond ranks `(r₁, …, r_{d-1})`
    pub fn bond_ranks(&self) -> Vec<usize> {
        self.cores[..self.cores.len() - 1]
            .iter()
            .map(|c| c.right_rank())
            .collect()
    }

    /// Largest rank of the train
    pub fn max_rank(&self) -> usize {
        self.tt_ranks().into_iter().max().unwrap_or(1)
    }

    /// Core `k`
    pub fn core(&self, k: usize) -> &CoreBlock<T> {
        &self.cores[k]
    }

    /// All cores in order
    pub fn cores(&self) -> &[CoreBlock<T>] {
        &self.cores
    }

    /// Take the cores
    pub fn into_cores(self) -> Vec<CoreBlock<T>> {
        self.cores
    }

    /// Number of scalars stored across all cores
    pub fn num_parameters(&self) -> usize {
        self.cores.iter().map(|c| c.len()).sum()
    }

    /// Number of entries of the represented dense array
    pub fn full_size(&self) -> usize {
        self.cores.iter().map(|c| c.mode_size()).product()
    }

    /// Dense size over stored size
    pub fn compression_ratio(&self) -> f64 {
        self.full_size() as f64 / self.num_parameters() as f64
    }

    /// Entry at a multi-index, computed as a chain of small matrix products
    pub fn evaluate(&self, index: &[usize]) -> TtResult<T> {
        if index.len() != self.ndims() {
            return Err(TtError::shape_mismatch(
                "evaluate",
                format!("index has {} entries, train has {} modes", index.len(), self.ndims()),
            ));
        }

        let mut acc = Array2::<T>::ones((1, 1));
        for (k, (core, &i)) in self.cores.iter().zip(index.iter()).enumerate() {
            if i >= core.mode_size() {
                return Err(TtError::shape_mismatch(
                    "evaluate",
                    format!("index {} out of bounds for mode {} of size {}", i, k, core.mode_size()),
                ));
            }
            acc = acc.dot(&core.mode_slice(i));
        }
        Ok(acc[[0, 0]])
    }

    /// Copy of the train scaled by `alpha` (the last core absorbs the factor)
    pub fn scale(&self, alpha: T) -> Self {
        let mut cores = self.cores.clone();
        let last = cores.len() - 1;
        cores[last] = cores[last].scaled(alpha);
        Self { cores }
    }

    /// True when every core is finite
    pub fn is_finite(&self) -> bool {
        self.cores.iter().all(|c| c.is_finite())
    }
}
