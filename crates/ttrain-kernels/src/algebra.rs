//! Algebra engine: contractions on trains that never form the dense array
//!
//! - [`inner_product`]: left-to-right sweep of a running `r_A × r_B` matrix
//! - [`norm`]: Frobenius norm read off the last core of a left-orthogonal form
//! - [`matmul`]: TT-matrix applied to a TT-tensor or a TT-matrix (ranks multiply)
//! - [`matvec_dense`]: TT-matrix applied to a dense vector, mode by mode
//! - [`quadratic_form`], [`sum`]
//! - [`to_dense`] / [`to_dense_matrix`]: full contraction, for small shapes only
//!
//! The exact structural operations (`add`, `sub`, `scale`, `negate`,
//! `hadamard`) live next to the train type and are re-exported here.

use crate::orthogonalize::left_orthogonalize;
use scirs2_core::ndarray_ext::{Array1, Array2, Array3, ArrayD, ArrayView1, IxDyn};
use ttrain_core::{CoreBlock, TtError, TtMatrix, TtResult, TtScalar, TtTensor};

pub use ttrain_core::ops::{add, hadamard, negate, scale, sub};

/// Operand of a TT-matrix product
///
/// Applying a [`TtMatrix`] to a [`TtTensor`] yields a [`TtTensor`]; applying it
/// to another [`TtMatrix`] yields a [`TtMatrix`]. In both cases rank `k` of
/// the result is the product of the operand ranks at `k`.
pub trait MatmulOperand<T: TtScalar> {
    /// Result of `op · self`
    type Output;

    /// Compute `op · self`
    fn apply(op: &TtMatrix<T>, operand: &Self) -> TtResult<Self::Output>;
}

impl<T: TtScalar> MatmulOperand<T> for TtTensor<T> {
    type Output = TtTensor<T>;

    fn apply(op: &TtMatrix<T>, x: &Self) -> TtResult<TtTensor<T>> {
        if op.col_shape() != x.raw_shape().as_slice() {
            return Err(TtError::shape_mismatch(
                "matmul",
                format!(
                    "operator columns {:?} vs operand shape {:?}",
                    op.col_shape(),
                    x.raw_shape()
                ),
            ));
        }

        let mut cores = Vec::with_capacity(op.ndims());
        for k in 0..op.ndims() {
            let (p, q) = (op.row_shape()[k], op.col_shape()[k]);
            let a = op.core(k).as_array();
            let b = x.core(k).as_array();
            let (la, _, ra) = op.core(k).dim();
            let (lb, _, rb) = x.core(k).dim();

            let data = Array3::from_shape_fn((la * lb, p, ra * rb), |(l, i, r)| {
                let (al, bl, ar, br) = (l / lb, l % lb, r / rb, r % rb);
                (0..q)
                    .map(|j| a[[al, i * q + j, ar]] * b[[bl, j, br]])
                    .sum()
            });
            cores.push(CoreBlock::new(data)?);
        }
        TtTensor::new(cores)
    }
}

impl<T: TtScalar> MatmulOperand<T> for TtMatrix<T> {
    type Output = TtMatrix<T>;

    fn apply(op: &TtMatrix<T>, x: &Self) -> TtResult<TtMatrix<T>> {
        if op.col_shape() != x.row_shape() {
            return Err(TtError::shape_mismatch(
                "matmul",
                format!(
                    "left columns {:?} vs right rows {:?}",
                    op.col_shape(),
                    x.row_shape()
                ),
            ));
        }

        let mut cores = Vec::with_capacity(op.ndims());
        for k in 0..op.ndims() {
            let (p, q, t) = (op.row_shape()[k], op.col_shape()[k], x.col_shape()[k]);
            let a = op.core(k).as_array();
            let b = x.core(k).as_array();
            let (la, _, ra) = op.core(k).dim();
            let (lb, _, rb) = x.core(k).dim();

            let data = Array3::from_shape_fn((la * lb, p * t, ra * rb), |(l, it, r)| {
                let (al, bl, ar, br) = (l / lb, l % lb, r / rb, r % rb);
                let (i, c) = (it / t, it % t);
                (0..q)
                    .map(|j| a[[al, i * q + j, ar]] * b[[bl, j * t + c, br]])
                    .sum()
            });
            cores.push(CoreBlock::new(data)?);
        }
        TtMatrix::new(cores, op.row_shape().to_vec(), x.col_shape().to_vec())
    }
}

/// TT-matrix product `op · x` for a tensor or matrix operand
///
/// # Example
///
/// ```rust
/// use ttrain_core::{TtMatrix, TtTensor};
/// use ttrain_kernels::algebra::{matmul, to_dense};
///
/// let eye = TtMatrix::<f64>::identity(&[2, 3]).unwrap();
/// let x = TtTensor::<f64>::random(&[2, 3], &[2], 0).unwrap();
/// let y = matmul(&eye, &x).unwrap();
/// assert_eq!(y.tt_ranks(), x.tt_ranks());
/// assert!((to_dense(&y).unwrap() - to_dense(&x).unwrap()).iter().all(|v| v.abs() < 1e-14));
/// ```
pub fn matmul<T, X>(op: &TtMatrix<T>, x: &X) -> TtResult<X::Output>
where
    T: TtScalar,
    X: MatmulOperand<T>,
{
    X::apply(op, x)
}

fn check_same_shape<T: TtScalar>(
    operation: &str,
    a: &TtTensor<T>,
    b: &TtTensor<T>,
) -> TtResult<()> {
    if a.raw_shape() != b.raw_shape() {
        return Err(TtError::shape_mismatch(
            operation,
            format!("{:?} vs {:?}", a.raw_shape(), b.raw_shape()),
        ));
    }
    Ok(())
}

/// `⟨A, B⟩ = Σ A(i) · B(i)`
///
/// Sweeps left to right with `W_k = Σ_i A_k[:, i, :]ᵗ · W_{k-1} · B_k[:, i, :]`.
/// Cost is `O(d · n · r³)`.
pub fn inner_product<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<T> {
    check_same_shape("inner_product", a, b)?;

    let mut w = Array2::<T>::ones((1, 1));
    for (ca, cb) in a.cores().iter().zip(b.cores()) {
        let mut next = Array2::<T>::zeros((ca.right_rank(), cb.right_rank()));
        for i in 0..ca.mode_size() {
            next += &ca.mode_slice(i).t().dot(&w).dot(&cb.mode_slice(i));
        }
        w = next;
    }
    Ok(w[[0, 0]])
}

/// Frobenius norm `‖A‖`
///
/// The train is left-orthogonalized first, so the norm equals the Frobenius
/// norm of the last core and no cancellation occurs.
pub fn norm<T: TtScalar>(a: &TtTensor<T>) -> TtResult<T> {
    let ortho = left_orthogonalize(a)?;
    let last = ortho.core(ortho.ndims() - 1);
    Ok(last.frobenius_norm())
}

/// Sum of all entries
pub fn sum<T: TtScalar>(a: &TtTensor<T>) -> T {
    let mut acc = Array2::<T>::ones((1, 1));
    for core in a.cores() {
        let mut collapsed = Array2::<T>::zeros((core.left_rank(), core.right_rank()));
        for i in 0..core.mode_size() {
            collapsed += &core.mode_slice(i);
        }
        acc = acc.dot(&collapsed);
    }
    acc[[0, 0]]
}

/// Full array of shape `raw_shape`, row-major
///
/// Memory is `∏ n_k`; intended for small shapes and testing.
pub fn to_dense<T: TtScalar>(a: &TtTensor<T>) -> TtResult<ArrayD<T>> {
    // Running (n_1 ⋯ n_k) × r_k matrix
    let mut acc = a.core(0).left_unfolding();
    for core in &a.cores()[1..] {
        let (_, n, r_right) = core.dim();
        let product = acc.dot(&core.right_unfolding());
        let rows = product.nrows() * n;
        acc = Array2::from_shape_vec((rows, r_right), product.iter().cloned().collect())
            .map_err(|e| TtError::shape_mismatch("to_dense", e.to_string()))?;
    }

    ArrayD::from_shape_vec(IxDyn(&a.raw_shape()), acc.iter().cloned().collect())
        .map_err(|e| TtError::shape_mismatch("to_dense", e.to_string()))
}

/// Dense `(∏ p_k) × (∏ q_k)` matrix of a TT-matrix
///
/// Row and column multi-indices are flattened row-major over `row_shape` and
/// `col_shape` respectively.
pub fn to_dense_matrix<T: TtScalar>(m: &TtMatrix<T>) -> TtResult<Array2<T>> {
    let dense = to_dense(m.as_tensor())?;
    let (rows, cols) = (m.row_shape(), m.col_shape());
    let d = m.ndims();

    Ok(Array2::from_shape_fn((m.nrows(), m.ncols()), |(row, col)| {
        let mut index = vec![0; d];
        let (mut r, mut c) = (row, col);
        for k in (0..d).rev() {
            index[k] = (r % rows[k]) * cols[k] + c % cols[k];
            r /= rows[k];
            c /= cols[k];
        }
        dense[IxDyn(&index)]
    }))
}

/// `op · x` for a dense vector `x` of length `∏ q_k`
///
/// The operator is applied one mode at a time to the tensorized vector, so the
/// dense operator is never formed. Intermediate state has shape
/// `(p_1 ⋯ p_k) × r_k × (q_{k+1} ⋯ q_d)`.
pub fn matvec_dense<T: TtScalar>(op: &TtMatrix<T>, x: &ArrayView1<T>) -> TtResult<Array1<T>> {
    if x.len() != op.ncols() {
        return Err(TtError::shape_mismatch(
            "matvec_dense",
            format!("vector length {} vs {} operator columns", x.len(), op.ncols()),
        ));
    }

    let mut state = Array3::from_shape_vec((1, 1, x.len()), x.iter().cloned().collect())
        .map_err(|e| TtError::shape_mismatch("matvec_dense", e.to_string()))?;

    for (k, core) in op.cores().iter().enumerate() {
        let (p, q) = (op.row_shape()[k], op.col_shape()[k]);
        let (done, r, cols) = state.dim();
        let rest = cols / q;
        let r_next = core.right_rank();
        let a = core.as_array();

        let mut next = Array3::<T>::zeros((done * p, r_next, rest));
        for ((row, b_next, c), out) in next.indexed_iter_mut() {
            let (prev, i) = (row / p, row % p);
            let mut acc = T::zero();
            for b in 0..r {
                for j in 0..q {
                    acc += a[[b, i * q + j, b_next]] * state[[prev, b, j * rest + c]];
                }
            }
            *out = acc;
        }
        state = next;
    }

    Ok(state.iter().cloned().collect())
}

/// Bilinear form `⟨x, A · y⟩`
pub fn quadratic_form<T: TtScalar>(
    x: &TtTensor<T>,
    a: &TtMatrix<T>,
    y: &TtTensor<T>,
) -> TtResult<T> {
    if x.raw_shape().as_slice() != a.row_shape() {
        return Err(TtError::shape_mismatch(
            "quadratic_form",
            format!(
                "left operand shape {:?} vs operator rows {:?}",
                x.raw_shape(),
                a.row_shape()
            ),
        ));
    }
    let ay = matmul(a, y)?;
    inner_product(x, &ay)
}
