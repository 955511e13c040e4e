//! Singular values at every cut of a train

use scirs2_core::ndarray_ext::{Array1, Array2};
use ttrain_core::{CoreBlock, TtResult, TtScalar, TtTensor};
use ttrain_kernels::{right_orthogonalize, thin_svd};

/// Singular values of the unfolding `A(i_1…i_k ; i_{k+1}…i_d)` for every bond `k`
///
/// The train is right-orthogonalized and swept left to right without
/// truncation, so entry `k - 1` holds the exact spectrum at bond `k` (up to the
/// current bond rank). Values are descending.
///
/// # Example
///
/// ```
/// use ttrain_core::TtTensor;
/// use ttrain_decomp::bond_spectra;
///
/// let tt = TtTensor::<f64>::random(&[3, 4, 3], &[2, 3], 3).unwrap();
/// let spectra = bond_spectra(&tt).unwrap();
/// assert_eq!(spectra.len(), 2);
/// assert!(spectra[0][0] >= spectra[0][1]);
/// ```
pub fn bond_spectra<T: TtScalar>(tt: &TtTensor<T>) -> TtResult<Vec<Array1<T>>> {
    let d = tt.ndims();
    let ortho = right_orthogonalize(tt)?;
    let mut spectra = Vec::with_capacity(d - 1);
    let mut carry: Option<Array2<T>> = None;

    for core in ortho.cores().iter().take(d - 1) {
        let current = match carry.take() {
            Some(c) => {
                let merged = c.dot(&core.right_unfolding());
                CoreBlock::from_right_unfolding(&merged.view(), core.mode_size(), core.right_rank())?
            }
            None => core.clone(),
        };

        let svd = thin_svd(&current.left_unfolding().view())?;
        let mut next = svd.vt;
        for (mut row, &sigma) in next.rows_mut().into_iter().zip(svd.s.iter()) {
            row.mapv_inplace(|v| v * sigma);
        }
        spectra.push(svd.s);
        carry = Some(next);
    }

    Ok(spectra)
}
