//! Multi-indices: one exponent per symbol plus the derived total degree.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

/// Inline capacity before exponents spill to the heap.
const INLINE_VARS: usize = 8;

/// Exponent tuple identifying one monomial `x_1^{a_1} ⋯ x_n^{a_n}`.
///
/// The total degree is cached on construction and kept in sync by every
/// operation, so degree filtering in the multiplication kernel is O(1).
/// Degrees saturate at `u32::MAX` instead of wrapping.
#[derive(Clone, Debug, Default)]
pub struct MultiIndex {
    exps: SmallVec<[u32; INLINE_VARS]>,
    degree: u32,
}

impl MultiIndex {
    /// The all-zero index of the given arity (the constant monomial).
    pub fn zero(arity: usize) -> Self {
        MultiIndex {
            exps: SmallVec::from_elem(0, arity),
            degree: 0,
        }
    }

    /// Unit exponent on `axis`, zero elsewhere.
    pub fn unit(axis: usize, arity: usize) -> Self {
        let mut m = Self::zero(arity);
        m.exps[axis] = 1;
        m.degree = 1;
        m
    }

    /// Build from an exponent slice.
    pub fn from_exponents(exps: &[u32]) -> Self {
        MultiIndex {
            exps: SmallVec::from_slice(exps),
            degree: total_degree(exps),
        }
    }

    /// Exponents, one per axis.
    #[inline]
    pub fn exponents(&self) -> &[u32] {
        &self.exps
    }

    /// Exponent on `axis`.
    #[inline]
    pub fn exponent(&self, axis: usize) -> u32 {
        self.exps[axis]
    }

    /// Number of axes.
    #[inline]
    pub fn arity(&self) -> usize {
        self.exps.len()
    }

    /// Total degree `a_1 + ⋯ + a_n`.
    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Whether all exponents are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.degree == 0
    }

    /// Elementwise sum (monomial product). Both operands must share an arity.
    #[inline]
    pub fn product(&self, other: &Self) -> Self {
        debug_assert_eq!(self.arity(), other.arity());
        MultiIndex {
            exps: self
                .exps
                .iter()
                .zip(other.exps.iter())
                .map(|(a, b)| a.saturating_add(*b))
                .collect(),
            degree: self.degree.saturating_add(other.degree),
        }
    }

    /// Re-express in a wider axis set: axis `i` moves to `axes[i]`, every
    /// other axis of the `arity`-long result is zero.
    pub fn embed(&self, axes: &[usize], arity: usize) -> Self {
        debug_assert_eq!(axes.len(), self.arity());
        let mut exps = SmallVec::from_elem(0, arity);
        for (&e, &axis) in self.exps.iter().zip(axes) {
            exps[axis] = e;
        }
        MultiIndex {
            exps,
            degree: self.degree,
        }
    }

    /// Lower the exponent on `axis` by one, returning the exponent it had.
    /// `None` if it was already zero.
    pub fn lower(&self, axis: usize) -> Option<(u32, Self)> {
        let e = self.exps[axis];
        if e == 0 {
            return None;
        }
        let mut out = self.clone();
        out.exps[axis] = e - 1;
        out.degree = total_degree(&out.exps);
        Some((e, out))
    }

    /// `a_1! ⋯ a_n!`, the factor between a Taylor coefficient and the
    /// corresponding partial derivative.
    pub fn factorial<F: crate::Float>(&self) -> F {
        self.exps
            .iter()
            .fold(F::one(), |acc, &e| acc * crate::float::factorial::<F>(e))
    }

    /// Graded lexicographic comparison: total degree first, then exponents
    /// from the first axis, higher exponents first.
    pub fn cmp_grlex(&self, other: &Self) -> Ordering {
        self.degree
            .cmp(&other.degree)
            .then_with(|| other.exps.cmp(&self.exps))
    }
}

/// `a_1 + ⋯ + a_n`, saturating at `u32::MAX`.
pub(crate) fn total_degree(exps: &[u32]) -> u32 {
    exps.iter().fold(0u32, |acc, &e| acc.saturating_add(e))
}

impl PartialEq for MultiIndex {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.exps == other.exps
    }
}

impl Eq for MultiIndex {}

impl Hash for MultiIndex {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exps.hash(state);
    }
}

/// Renders as `x^2*y` using the given symbol names; `1` for the zero index.
pub(crate) struct MonomialDisplay<'a, S> {
    pub index: &'a MultiIndex,
    pub names: &'a [S],
}

impl<S: AsRef<str>> fmt::Display for MonomialDisplay<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (e, name) in self.index.exps.iter().zip(self.names) {
            if *e == 0 {
                continue;
            }
            if !first {
                f.write_str("*")?;
            }
            first = false;
            f.write_str(name.as_ref())?;
            if *e > 1 {
                write!(f, "^{}", e)?;
            }
        }
        if first {
            f.write_str("1")?;
        }
        Ok(())
    }
}
