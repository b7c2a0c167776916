use thiserror::Error;

/// Errors raised by gdual arithmetic and queries.
///
/// Every variant is reported by the call that triggered it; no operation
/// returns a partial result alongside an error.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GDualError {
    /// The denominator's constant term is zero (or within the configured
    /// tolerance of zero), so it has no truncated-series inverse.
    #[error("singular denominator: constant term {constant} is within {tolerance} of zero")]
    SingularDenominator {
        /// Constant term of the denominator.
        constant: f64,
        /// Tolerance that was applied.
        tolerance: f64,
    },

    /// The requested derivative has a total degree above the truncation
    /// order, so it was never computed.
    #[error("derivative of total degree {degree} exceeds truncation order {order}")]
    DerivativeOutOfRange {
        /// Total degree of the requested multi-index.
        degree: u32,
        /// Truncation order of the gdual.
        order: u32,
    },

    /// A multi-index does not have one exponent per symbol.
    #[error("multi-index has {found} exponents, symbol set has {expected} symbols")]
    ArityMismatch {
        /// Size of the symbol set.
        expected: usize,
        /// Length of the supplied multi-index.
        found: usize,
    },

    /// The same symbol name was listed twice when building a gdual from raw terms.
    #[error("symbol `{name}` listed more than once")]
    DuplicateSymbol {
        /// Offending symbol name.
        name: String,
    },
}
