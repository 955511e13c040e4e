//! Exact structural algebra on trains: sum, difference, scaling, Hadamard product
//!
//! None of these operations truncate. Ranks grow as
//!
//! - addition / subtraction: `r_k(A) + r_k(B)` (block-diagonal cores)
//! - Hadamard product: `r_k(A) · r_k(B)` (Kronecker-structured cores)
//!
//! and callers are expected to round the result when rank growth matters.
//! The `std::ops` impls on references forward here; `+` and `-` between trains
//! return [`TtResult`] because the operands may disagree in shape.
//!
//! # Examples
//!
//! ```
//! use ttrain_core::TtTensor;
//!
//! let a = TtTensor::<f64>::ones(&[2, 3]).unwrap();
//! let b = TtTensor::<f64>::ones(&[2, 3]).unwrap();
//! let sum = (&a + &b).unwrap();
//! assert_eq!(sum.tt_ranks(), vec![1, 2, 1]);
//! assert_eq!(sum.evaluate(&[1, 2]).unwrap(), 2.0);
//!
//! let halved = &sum * 0.5;
//! assert_eq!(halved.evaluate(&[0, 0]).unwrap(), 1.0);
//! ```

use crate::core_block::CoreBlock;
use crate::error::{TtError, TtResult};
use crate::scalar::TtScalar;
use crate::tensor::TtTensor;
use scirs2_core::ndarray_ext::{s, Array3};
use std::ops::{Add, Mul, Neg, Sub};

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

/// `A + B` with block-diagonal cores
pub fn add<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    check_same_shape("add", a, b)?;
    let d = a.ndims();

    if d == 1 {
        let data = a.core(0).as_array() + b.core(0).as_array();
        return TtTensor::new(vec![CoreBlock::new(data)?]);
    }

    let mut cores = Vec::with_capacity(d);
    for k in 0..d {
        let (ca, cb) = (a.core(k), b.core(k));
        let (la, n, ra) = ca.dim();
        let (lb, _, rb) = cb.dim();

        let data = if k == 0 {
            let mut data = Array3::zeros((1, n, ra + rb));
            data.slice_mut(s![.., .., ..ra]).assign(ca.as_array());
            data.slice_mut(s![.., .., ra..]).assign(cb.as_array());
            data
        } else if k == d - 1 {
            let mut data = Array3::zeros((la + lb, n, 1));
            data.slice_mut(s![..la, .., ..]).assign(ca.as_array());
            data.slice_mut(s![la.., .., ..]).assign(cb.as_array());
            data
        } else {
            let mut data = Array3::zeros((la + lb, n, ra + rb));
            data.slice_mut(s![..la, .., ..ra]).assign(ca.as_array());
            data.slice_mut(s![la.., .., ra..]).assign(cb.as_array());
            data
        };
        cores.push(CoreBlock::new(data)?);
    }

    TtTensor::new(cores)
}

/// `A - B`
pub fn sub<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    check_same_shape("sub", a, b)?;
    add(a, &negate(b))
}

/// `alpha · A`
pub fn scale<T: TtScalar>(a: &TtTensor<T>, alpha: T) -> TtTensor<T> {
    a.scale(alpha)
}

/// `-A`
pub fn negate<T: TtScalar>(a: &TtTensor<T>) -> TtTensor<T> {
    a.scale(-T::one())
}

/// Element-wise product `A ⊙ B`
///
/// Core `k` of the result is `C[(a, b), i, (a', b')] = A[a, i, a'] · B[b, i, b']`
/// with the `A` rank index varying slowest.
pub fn hadamard<T: TtScalar>(a: &TtTensor<T>, b: &TtTensor<T>) -> TtResult<TtTensor<T>> {
    check_same_shape("hadamard", a, b)?;

    let cores = a
        .cores()
        .iter()
        .zip(b.cores())
        .map(|(ca, cb)| {
            let (la, n, ra) = ca.dim();
            let (lb, _, rb) = cb.dim();
            let (xa, xb) = (ca.as_array(), cb.as_array());
            CoreBlock::new(Array3::from_shape_fn(
                (la * lb, n, ra * rb),
                |(l, i, r)| xa[[l / lb, i, r / rb]] * xb[[l % lb, i, r % rb]],
            ))
        })
        .collect::<TtResult<Vec<_>>>()?;

    TtTensor::new(cores)
}

impl<T: TtScalar> Add for &TtTensor<T> {
    type Output = TtResult<TtTensor<T>>;

    fn add(self, rhs: Self) -> Self::Output {
        add(self, rhs)
    }
}

impl<T: TtScalar> Sub for &TtTensor<T> {
    type Output = TtResult<TtTensor<T>>;

    fn sub(self, rhs: Self) -> Self::Output {
        sub(self, rhs)
    }
}

impl<T: TtScalar> Neg for &TtTensor<T> {
    type Output = TtTensor<T>;

    fn neg(self) -> Self::Output {
        negate(self)
    }
}

impl<T: TtScalar> Mul<T> for &TtTensor<T> {
    type Output = TtTensor<T>;

    fn mul(self, rhs: T) -> Self::Output {
        scale(self, rhs)
    }
}
