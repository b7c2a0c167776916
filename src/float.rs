use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FromPrimitive};

/// Marker trait for coefficient types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits the term store and the algebra
/// kernels need. `Send + Sync` lets gduals cross threads and feed the
/// data-parallel kernels.
pub trait Float: NumFloat + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static {
    /// Widen to `f64`, used for error reporting.
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// `n!` as a float. Exact for the small orders this crate works at.
pub(crate) fn factorial<F: Float>(n: u32) -> F {
    let mut acc = F::one();
    for i in 2..=n {
        acc = acc * F::from_u32(i).unwrap_or_else(F::nan);
    }
    acc
}
