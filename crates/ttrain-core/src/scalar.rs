//! Scalar trait shared by every tensor-train routine

use scirs2_core::ndarray_ext::ScalarOperand;
use scirs2_core::num_traits::{Float, FromPrimitive, NumAssign, NumCast};
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Element type of cores and dense arrays (implemented for `f32` and `f64`)
pub trait TtScalar:
    Float
    + FromPrimitive
    + NumAssign
    + NumCast
    + Sum
    + Send
    + Sync
    + ScalarOperand
    + Debug
    + Display
    + 'static
{
    /// Convert from `f64`, yielding NaN when the value is not representable
    fn from_f64_lossy(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }

    /// Convert to `f64`, yielding NaN when the value is not representable
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }
}

impl<T> TtScalar for T where
    T: Float
        + FromPrimitive
        + NumAssign
        + NumCast
        + Sum
        + Send
        + Sync
        + ScalarOperand
        + Debug
        + Display
        + 'static
{
}
