//! Arbitrary-order automatic differentiation with generalized dual numbers.
//!
//! A [`GDual`] is a truncated multivariate Taylor expansion. Arithmetic on
//! gduals reproduces the expansion of the combined function, and every
//! partial derivative up to the truncation order is a scaled coefficient:
//!
//! ```
//! use gdual::{GDual, SymbolRegistry};
//!
//! let reg = SymbolRegistry::new();
//! let x = GDual::variable(&reg, "x", 1.0_f64, 3);
//! let y = GDual::variable(&reg, "y", 2.0, 3);
//! let f = (&x * &x * &y).try_div(&(&x + &y)).unwrap();
//! // ∂f/∂x at (1, 2)
//! let dfdx = f.derivative(&[1, 0]).unwrap();
//! assert!((dfdx - 10.0 / 9.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod float;
pub mod gdual;
pub mod gdual_ops;
pub mod monomial;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod symbol;
pub mod term_store;
mod traits;

pub use config::DivisionConfig;
pub use error::GDualError;
pub use float::Float;
pub use gdual::GDual;
#[cfg(feature = "serde")]
pub use gdual::GDualSnapshot;
pub use monomial::MultiIndex;
pub use symbol::{Symbol, SymbolRegistry};
pub use term_store::TermStore;

/// Type alias for generalized dual numbers over `f64`.
pub type GDual64 = GDual<f64>;
/// Type alias for generalized dual numbers over `f32`.
pub type GDual32 = GDual<f32>;
