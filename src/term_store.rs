//! Sparse coefficient table keyed by multi-index.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::monomial::MultiIndex;
use crate::Float;

/// Map from multi-index to Taylor coefficient.
///
/// Sparse: an absent key and a key stored with a zero coefficient mean the
/// same thing, and every lookup treats them identically. All keys share the
/// store's arity. Iteration order is unspecified; [`sorted`](Self::sorted)
/// gives a deterministic order for rendering.
#[derive(Clone, Debug)]
pub struct TermStore<F> {
    terms: FxHashMap<MultiIndex, F>,
    arity: usize,
}

impl<F: Float> TermStore<F> {
    /// Empty store (the zero polynomial).
    pub fn new(arity: usize) -> Self {
        TermStore {
            terms: FxHashMap::default(),
            arity,
        }
    }

    /// Empty store with room for `capacity` terms.
    pub fn with_capacity(arity: usize, capacity: usize) -> Self {
        let mut terms = FxHashMap::default();
        terms.reserve(capacity);
        TermStore { terms, arity }
    }

    /// Store holding a single constant term.
    pub fn constant(value: F, arity: usize) -> Self {
        let mut store = Self::with_capacity(arity, 1);
        store.terms.insert(MultiIndex::zero(arity), value);
        store
    }

    /// Number of axes of every key.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of stored terms (including explicit zeros).
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient at `index`, zero if absent.
    #[inline]
    pub fn get(&self, index: &MultiIndex) -> F {
        self.terms.get(index).copied().unwrap_or_else(F::zero)
    }

    /// Whether `index` is stored (possibly with a zero coefficient).
    #[inline]
    pub fn contains(&self, index: &MultiIndex) -> bool {
        self.terms.contains_key(index)
    }

    /// Coefficient of the constant monomial.
    pub fn constant_term(&self) -> F {
        self.get(&MultiIndex::zero(self.arity))
    }

    /// Set the coefficient at `index`, replacing any previous value.
    pub fn insert(&mut self, index: MultiIndex, value: F) {
        debug_assert_eq!(index.arity(), self.arity);
        self.terms.insert(index, value);
    }

    /// Add `value` to the coefficient at `index`.
    #[inline]
    pub fn accumulate(&mut self, index: MultiIndex, value: F) {
        debug_assert_eq!(index.arity(), self.arity);
        match self.terms.entry(index) {
            Entry::Occupied(mut e) => {
                let c = e.get_mut();
                *c = *c + value;
            }
            Entry::Vacant(e) => {
                e.insert(value);
            }
        }
    }

    /// Remove the term at `index`, returning its coefficient (zero if absent).
    pub fn remove(&mut self, index: &MultiIndex) -> F {
        self.terms.remove(index).unwrap_or_else(F::zero)
    }

    /// Add every term of `other` into `self`. Arities must match.
    pub fn absorb(&mut self, other: TermStore<F>) {
        debug_assert_eq!(other.arity, self.arity);
        if self.terms.len() < other.terms.len() {
            let small = std::mem::replace(self, other);
            for (k, v) in small.terms {
                self.accumulate(k, v);
            }
        } else {
            for (k, v) in other.terms {
                self.accumulate(k, v);
            }
        }
    }

    /// Unordered iteration over `(index, coefficient)`.
    pub fn iter(&self) -> impl Iterator<Item = (&MultiIndex, F)> + '_ {
        self.terms.iter().map(|(k, &v)| (k, v))
    }

    /// Terms sorted by graded lexicographic order of their indices.
    pub fn sorted(&self) -> Vec<(&MultiIndex, F)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_by(|a, b| a.0.cmp_grlex(b.0));
        v
    }

    /// Terms sorted by ascending total degree, ties in unspecified order.
    pub fn by_degree(&self) -> Vec<(&MultiIndex, F)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_by_key(|(k, _)| k.degree());
        v
    }

    /// Drop every term of total degree above `order`.
    pub fn truncate(&mut self, order: u32) {
        self.terms.retain(|k, _| k.degree() <= order);
    }

    /// Keep only the terms for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&MultiIndex, F) -> bool) {
        self.terms.retain(|k, v| f(k, *v));
    }

    /// Apply `f` to every coefficient.
    pub fn map_coeffs(&self, f: impl Fn(F) -> F) -> Self {
        TermStore {
            terms: self.terms.iter().map(|(k, &v)| (k.clone(), f(v))).collect(),
            arity: self.arity,
        }
    }

    /// Re-express every key in a wider axis set (see [`MultiIndex::embed`]).
    pub fn embed(&self, axes: &[usize], arity: usize) -> Self {
        let mut out = Self::with_capacity(arity, self.len());
        for (k, &v) in &self.terms {
            out.terms.insert(k.embed(axes, arity), v);
        }
        out
    }

    /// Highest total degree carrying a non-zero coefficient (0 for the zero
    /// polynomial).
    pub fn max_degree(&self) -> u32 {
        self.terms
            .iter()
            .filter(|(_, v)| !v.is_zero())
            .map(|(k, _)| k.degree())
            .max()
            .unwrap_or(0)
    }

    /// Whether every coefficient at the union of both key sets agrees,
    /// counting absent keys as zero.
    pub fn same_coeffs(&self, other: &Self) -> bool {
        self.arity == other.arity
            && self.terms.iter().all(|(k, &v)| other.get(k) == v)
            && other.terms.iter().all(|(k, &v)| self.get(k) == v)
    }
}
