//! Thin QR / LQ / SVD primitives
//!
//! Every sweep in the stack goes through these three functions. They
//!
//! - reject non-finite input before factorizing,
//! - scale by the largest magnitude so that huge or tiny entries factor alike,
//! - slice the factors to the economy size `k = min(m, n)`,
//! - map factorization failures into [`TtError::IllConditionedInput`].
//!
//! QR is Householder (`scirs2_linalg::qr`), applied to the leading `k`
//! columns so that wide matrices factor too. The SVD is a one-sided Jacobi
//! iteration in `f64`: it orthogonalizes the columns of the narrower
//! orientation, so singular values are accurate to machine precision and
//! the left vectors come out orthonormal. Its reconstruction residual is
//! checked before the factors are returned.

use log::debug;
use scirs2_core::ndarray_ext::{s, Array1, Array2, ArrayView2};
use scirs2_linalg::qr;
use std::cmp::Ordering;
use ttrain_core::{TtError, TtResult, TtScalar};

/// Upper limit on Jacobi sweeps; convergence is quadratic and typically
/// takes well under ten
const MAX_SWEEPS: usize = 60;

/// Largest accepted `‖A − UΣVᵗ‖_F / ‖A‖_F`
const RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Economy SVD `A = U · diag(σ) · Vᵗ`
#[derive(Debug, Clone)]
pub struct ThinSvd<T> {
    /// Left singular vectors, `m × k`, orthonormal columns
    pub u: Array2<T>,
    /// Singular values, descending and non-negative, length `k`
    pub s: Array1<T>,
    /// Right singular vectors (transposed), `k × n`
    pub vt: Array2<T>,
}

fn ensure_finite<T: TtScalar>(operation: &str, matrix: &ArrayView2<T>) -> TtResult<()> {
    if matrix.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TtError::ill_conditioned(
            operation,
            format!(
                "{}x{} matrix contains NaN or infinite entries",
                matrix.nrows(),
                matrix.ncols()
            ),
        ))
    }
}

fn ensure_non_empty(operation: &str, rows: usize, cols: usize) -> TtResult<()> {
    if rows == 0 || cols == 0 {
        Err(TtError::ill_conditioned(
            operation,
            format!("cannot factor an empty {}x{} matrix", rows, cols),
        ))
    } else {
        Ok(())
    }
}

fn max_abs<T: TtScalar>(matrix: &ArrayView2<T>) -> f64 {
    matrix
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.to_f64_lossy().abs()))
}

/// First `cols` columns of the `rows × rows` identity (or rows, if wide)
fn leading_identity(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| if i == j { 1.0 } else { 0.0 })
}

fn frobenius(matrix: &Array2<f64>) -> f64 {
    matrix.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Economy QR `A = Q · R` with `Q` of shape `m × k` (orthonormal columns)
/// and `R` of shape `k × n`, `k = min(m, n)`
///
/// For a wide matrix `R` is upper trapezoidal only in its leading `k × k`
/// block.
pub fn thin_qr<T: TtScalar>(matrix: &ArrayView2<T>) -> TtResult<(Array2<T>, Array2<T>)> {
    ensure_finite("thin_qr", matrix)?;
    let (m, n) = matrix.dim();
    ensure_non_empty("thin_qr", m, n)?;
    let k = m.min(n);

    let scale = max_abs(matrix);
    if scale == 0.0 {
        return Ok((
            leading_identity(m, k).mapv(T::from_f64_lossy),
            Array2::zeros((k, n)),
        ));
    }
    let scaled = matrix.mapv(|v| v.to_f64_lossy() / scale);

    // The leading m × k block is square or tall, which Householder QR accepts;
    // its Q spans the column space of the whole matrix
    let (q_full, _) = qr(&scaled.slice(s![.., ..k]), None)
        .map_err(|e| TtError::ill_conditioned("thin_qr", format!("QR failed: {}", e)))?;
    if q_full.nrows() != m || q_full.ncols() < k {
        return Err(TtError::ill_conditioned(
            "thin_qr",
            format!("QR returned Q of shape {:?} for a {}x{} matrix", q_full.dim(), m, n),
        ));
    }

    let q = q_full.slice(s![.., ..k]).to_owned();
    let r = q.t().dot(&scaled) * scale;
    if !q.iter().chain(r.iter()).all(|v| v.is_finite()) {
        return Err(TtError::ill_conditioned(
            "thin_qr",
            "QR produced non-finite factors",
        ));
    }
    Ok((q.mapv(T::from_f64_lossy), r.mapv(T::from_f64_lossy)))
}

/// Economy LQ `A = L · Q` with `L` of shape `m × k` and `Q` of shape `k × n`
/// (orthonormal rows), computed from the QR of `Aᵗ`
pub fn thin_lq<T: TtScalar>(matrix: &ArrayView2<T>) -> TtResult<(Array2<T>, Array2<T>)> {
    let transposed = matrix.t().to_owned();
    let (q, r) = thin_qr(&transposed.view())?;
    Ok((r.t().to_owned(), q.t().to_owned()))
}

/// Economy SVD with singular values stably sorted in descending order
///
/// Equal singular values keep the order of their columns, so repeated runs on
/// the same input select the same vectors. Left vectors belonging to zero
/// singular values are completed to an orthonormal set.
///
/// # Errors
///
/// [`TtError::IllConditionedInput`] for non-finite or empty input, or when
/// the factors fail to reconstruct the input.
pub fn thin_svd<T: TtScalar>(matrix: &ArrayView2<T>) -> TtResult<ThinSvd<T>> {
    ensure_finite("thin_svd", matrix)?;
    let (m, n) = matrix.dim();
    ensure_non_empty("thin_svd", m, n)?;
    let k = m.min(n);

    let scale = max_abs(matrix);
    if scale == 0.0 {
        return Ok(ThinSvd {
            u: leading_identity(m, k).mapv(T::from_f64_lossy),
            s: Array1::zeros(k),
            vt: leading_identity(k, n).mapv(T::from_f64_lossy),
        });
    }

    // Orthogonalize the columns of the orientation with fewer columns
    let transposed = m < n;
    let work = if transposed {
        matrix.t().mapv(|v| v.to_f64_lossy() / scale)
    } else {
        matrix.mapv(|v| v.to_f64_lossy() / scale)
    };

    let (u, sigma, v) = one_sided_jacobi(work.clone());

    let residual = frobenius(&(&work - &(&u * &sigma).dot(&v.t())));
    let norm = frobenius(&work);
    if !(residual <= RESIDUAL_TOLERANCE * norm) {
        return Err(TtError::ill_conditioned(
            "thin_svd",
            format!(
                "SVD of a {}x{} matrix has relative residual {:.3e}",
                m,
                n,
                residual / norm
            ),
        ));
    }

    let (u, vt) = if transposed {
        (v, u.t().to_owned())
    } else {
        (u, v.t().to_owned())
    };
    Ok(ThinSvd {
        u: u.mapv(T::from_f64_lossy),
        s: sigma.mapv(|s| T::from_f64_lossy(s * scale)),
        vt: vt.mapv(T::from_f64_lossy),
    })
}

/// One-sided Jacobi SVD of a matrix with at least as many rows as columns
///
/// Returns `(U, σ, V)` with `B = U · diag(σ) · Vᵗ`, `σ` sorted descending.
fn one_sided_jacobi(mut b: Array2<f64>) -> (Array2<f64>, Array1<f64>, Array2<f64>) {
    let (rows, cols) = b.dim();
    let mut v = Array2::<f64>::eye(cols);
    // Column dot products carry a rounding error of about rows · eps
    let tol = rows as f64 * f64::EPSILON;

    let mut converged = cols < 2;
    for sweep in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        let mut rotated = false;
        for p in 0..cols {
            for q in (p + 1)..cols {
                let (alpha, beta, gamma) = {
                    let (bp, bq) = (b.column(p), b.column(q));
                    (bp.dot(&bp), bq.dot(&bq), bp.dot(&bq))
                };
                if gamma == 0.0 || gamma.abs() <= tol * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + zeta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = c * t;
                rotate_columns(&mut b, p, q, c, s);
                rotate_columns(&mut v, p, q, c, s);
            }
        }
        if !rotated {
            debug!("thin_svd: {}x{} converged after {} sweep(s)", rows, cols, sweep + 1);
            converged = true;
        }
    }
    if !converged {
        debug!("thin_svd: {}x{} stopped after {} sweeps", rows, cols, MAX_SWEEPS);
    }

    let norms: Vec<f64> = (0..cols)
        .map(|j| b.column(j).dot(&b.column(j)).sqrt())
        .collect();
    let mut order: Vec<usize> = (0..cols).collect();
    order.sort_by(|&i, &j| norms[j].partial_cmp(&norms[i]).unwrap_or(Ordering::Equal));

    let mut u = Array2::<f64>::zeros((rows, cols));
    let mut v_sorted = Array2::<f64>::zeros((cols, cols));
    let mut sigma = Array1::<f64>::zeros(cols);
    let mut missing = Vec::new();
    for (new, &old) in order.iter().enumerate() {
        v_sorted.column_mut(new).assign(&v.column(old));
        if norms[old] > 0.0 {
            sigma[new] = norms[old];
            u.column_mut(new)
                .assign(&b.column(old).mapv(|x| x / norms[old]));
        } else {
            missing.push(new);
        }
    }
    complete_orthonormal(&mut u, &missing);

    (u, sigma, v_sorted)
}

/// Apply the rotation `[c s; -s c]` to columns `p` and `q`
fn rotate_columns(matrix: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for mut row in matrix.rows_mut() {
        let (x, y) = (row[p], row[q]);
        row[p] = c * x - s * y;
        row[q] = s * x + c * y;
    }
}

/// Fill the zero columns listed in `missing` with unit vectors orthogonal to
/// every other column
fn complete_orthonormal(u: &mut Array2<f64>, missing: &[usize]) {
    let rows = u.nrows();
    // At least one basis vector keeps a squared residual of 1 / rows
    let threshold = 0.5 / rows as f64;

    for &j in missing {
        for i in 0..rows {
            let mut candidate = Array1::<f64>::zeros(rows);
            candidate[i] = 1.0;
            for _ in 0..2 {
                for col in u.columns() {
                    let proj = col.dot(&candidate);
                    candidate.scaled_add(-proj, &col);
                }
            }
            let norm_sq = candidate.dot(&candidate);
            if norm_sq >= threshold {
                u.column_mut(j).assign(&(candidate / norm_sq.sqrt()));
                break;
            }
        }
    }
}
