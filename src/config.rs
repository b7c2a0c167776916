use crate::Float;

/// Parameters controlling truncated-series division.
#[derive(Debug, Clone)]
pub struct DivisionConfig<F> {
    /// A denominator whose constant term satisfies `|c0| <= singular_tolerance`
    /// is rejected as singular (default: 0, only an exact zero is singular).
    pub singular_tolerance: F,
}

impl<F: Float> Default for DivisionConfig<F> {
    fn default() -> Self {
        DivisionConfig {
            singular_tolerance: F::zero(),
        }
    }
}

impl<F: Float> DivisionConfig<F> {
    /// Config with the given singular tolerance. Negative values are clamped to zero.
    pub fn with_tolerance(singular_tolerance: F) -> Self {
        DivisionConfig {
            singular_tolerance: singular_tolerance.max(F::zero()),
        }
    }

    /// Whether a constant term is treated as zero.
    #[inline]
    pub fn is_singular(&self, constant: F) -> bool {
        !(constant.abs() > self.singular_tolerance)
    }
}
