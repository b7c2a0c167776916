//! Generalized dual numbers: `GDual<F>`.
//!
//! A gdual is the degree-≤`m` Taylor expansion of a scalar function in the
//! symbols of its symbol set. Coefficient at multi-index `a` is
//! `∂^|a| f / ∂x^a / a!` evaluated at the expansion point, so every partial
//! derivative up to order `m` is a scaled coefficient.
//!
//! Operations are value-producing: operands are never mutated. Binary
//! operations reconcile the two symbol sets first, and the result is
//! truncated at `min(order(lhs), order(rhs))`: combining expansions of
//! different orders keeps only what the less precise one knows.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::DivisionConfig;
use crate::error::GDualError;
use crate::gdual_ops;
use crate::monomial::{MonomialDisplay, MultiIndex};
use crate::symbol::{self, Symbol, SymbolRegistry};
use crate::term_store::TermStore;
use crate::Float;

/// Truncated multivariate Taylor expansion.
#[derive(Clone, Debug)]
pub struct GDual<F: Float> {
    order: u32,
    symbols: Arc<[Symbol]>,
    terms: TermStore<F>,
    registry: SymbolRegistry,
}

impl<F: Float> Display for GDual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.symbols.iter().map(Symbol::name).collect();
        let mut first = true;
        for (k, c) in self.terms.sorted() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if k.is_zero() {
                write!(f, "{}", c)?;
            } else {
                let mono = MonomialDisplay {
                    index: k,
                    names: &names[..],
                };
                write!(f, "{}*{}", c, mono)?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl<F: Float> PartialEq for GDual<F> {
    /// Equal orders and equal coefficients after reconciling symbol sets;
    /// absent terms compare as zero.
    ///
    /// Operands from different registries are compared by symbol name and
    /// neither registry is modified.
    fn eq(&self, other: &Self) -> bool {
        if self.order != other.order {
            return false;
        }
        if self.registry.same_as(&other.registry) {
            let (_, a, b) = self.aligned(other);
            return a.same_coeffs(&b);
        }
        self.named_terms() == other.named_terms()
    }
}

impl<F: Float> GDual<F> {
    // ── Construction ──

    /// Constant expansion: empty symbol set, single constant term.
    pub fn constant(registry: &SymbolRegistry, value: F, order: u32) -> Self {
        GDual {
            order,
            symbols: Arc::from(Vec::new()),
            terms: TermStore::constant(value, 0),
            registry: registry.clone(),
        }
    }

    /// Independent variable `name` at nominal value `value`: `value + 1·name`.
    ///
    /// At order 0 only the value term is kept.
    pub fn variable(registry: &SymbolRegistry, name: &str, value: F, order: u32) -> Self {
        let symbol = registry.intern(name);
        let mut terms = TermStore::constant(value, 1);
        if order >= 1 {
            terms.insert(MultiIndex::unit(0, 1), F::one());
        }
        GDual {
            order,
            symbols: Arc::from(vec![symbol]),
            terms,
            registry: registry.clone(),
        }
    }

    /// Build from raw Taylor coefficients.
    ///
    /// `symbols` names the axes of every exponent vector in `terms`, in the
    /// caller's order. Terms above `order` are dropped, repeated indices
    /// accumulate.
    pub fn from_terms<I>(
        registry: &SymbolRegistry,
        order: u32,
        symbols: &[&str],
        terms: I,
    ) -> Result<Self, GDualError>
    where
        I: IntoIterator<Item = (Vec<u32>, F)>,
    {
        let interned: Vec<Symbol> = symbols.iter().map(|n| registry.intern(n)).collect();
        let mut sorted = interned.clone();
        sorted.sort_by_key(Symbol::id);
        if let Some(dup) = sorted.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(GDualError::DuplicateSymbol {
                name: dup[0].name().to_string(),
            });
        }
        let axes: Vec<usize> = interned
            .iter()
            .map(|s| sorted.iter().position(|t| t.id() == s.id()).unwrap_or(0))
            .collect();

        let n = sorted.len();
        let mut store = TermStore::new(n);
        for (exps, c) in terms {
            if exps.len() != n {
                return Err(GDualError::ArityMismatch {
                    expected: n,
                    found: exps.len(),
                });
            }
            let index = MultiIndex::from_exponents(&exps).embed(&axes, n);
            if index.degree() <= order {
                store.accumulate(index, c);
            }
        }
        Ok(GDual {
            order,
            symbols: sorted.into(),
            terms: store,
            registry: registry.clone(),
        })
    }

    /// Constant of the same order, sharing this gdual's registry.
    pub fn constant_like(&self, value: F) -> Self {
        Self::constant(&self.registry, value, self.order)
    }

    /// Zero of the same order and symbol set.
    pub fn zero_like(&self) -> Self {
        self.with_terms(self.order, TermStore::new(self.symbols.len()))
    }

    fn with_terms(&self, order: u32, terms: TermStore<F>) -> Self {
        self.rebuilt(order, Arc::clone(&self.symbols), terms)
    }

    /// New gdual in this one's registry.
    pub(crate) fn rebuilt(&self, order: u32, symbols: Arc<[Symbol]>, terms: TermStore<F>) -> Self {
        GDual {
            order,
            symbols,
            terms,
            registry: self.registry.clone(),
        }
    }

    // ── Queries ──

    /// Truncation order `m`.
    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Active symbols, sorted by registry index.
    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Names of the active symbols, in axis order.
    pub fn symbol_names(&self) -> Vec<&str> {
        self.symbols.iter().map(Symbol::name).collect()
    }

    /// Number of active symbols.
    #[inline]
    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Registry this gdual was built from.
    #[inline]
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// The underlying term store.
    #[inline]
    pub fn terms(&self) -> &TermStore<F> {
        &self.terms
    }

    /// Number of stored terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Degree of the represented polynomial: highest total degree with a
    /// non-zero coefficient.
    pub fn degree(&self) -> u32 {
        self.terms.max_degree()
    }

    /// Value at the expansion point (the constant coefficient).
    #[inline]
    pub fn constant_term(&self) -> F {
        self.terms.constant_term()
    }

    /// Raw Taylor coefficient at `exponents`, zero if absent.
    pub fn coefficient(&self, exponents: &[u32]) -> Result<F, GDualError> {
        self.check_arity(exponents)?;
        Ok(self.terms.get(&MultiIndex::from_exponents(exponents)))
    }

    /// Partial derivative `∂^|a| f / ∂x_1^{a_1} ⋯ ∂x_n^{a_n}` at the expansion
    /// point: the coefficient at `a` times `a_1! ⋯ a_n!`.
    ///
    /// Fails with [`GDualError::DerivativeOutOfRange`] when `|a|` exceeds the
    /// truncation order: that derivative was never computed.
    pub fn derivative(&self, exponents: &[u32]) -> Result<F, GDualError> {
        self.check_arity(exponents)?;
        let index = MultiIndex::from_exponents(exponents);
        self.check_degree(index.degree())?;
        Ok(self.terms.get(&index) * index.factorial::<F>())
    }

    /// [`derivative`](Self::derivative) keyed by symbol name.
    ///
    /// Repeated names add up. A symbol outside the set with a positive
    /// exponent gives zero: the expansion does not depend on it.
    pub fn derivative_by_name(&self, orders: &[(&str, u32)]) -> Result<F, GDualError> {
        let degree = orders.iter().fold(0u32, |acc, &(_, k)| acc.saturating_add(k));
        self.check_degree(degree)?;
        let mut exps = vec![0u32; self.symbols.len()];
        for &(name, k) in orders {
            match self.axis_of(name) {
                Some(axis) => exps[axis] += k,
                None if k > 0 => return Ok(F::zero()),
                None => {}
            }
        }
        let index = MultiIndex::from_exponents(&exps);
        Ok(self.terms.get(&index) * index.factorial::<F>())
    }

    /// Evaluate the expansion at displacements from the expansion point.
    /// Symbols not listed are held at zero displacement; unknown names are ignored.
    pub fn evaluate(&self, displacements: &[(&str, F)]) -> F {
        let mut dx = vec![F::zero(); self.symbols.len()];
        for &(name, v) in displacements {
            if let Some(axis) = self.axis_of(name) {
                dx[axis] = v;
            }
        }
        gdual_ops::evaluate(&self.terms, &dx)
    }

    /// Whether every coefficient is within `tolerance` of zero.
    pub fn is_zero(&self, tolerance: F) -> bool {
        self.terms.iter().all(|(_, c)| c.abs() <= tolerance)
    }

    /// Non-zero terms keyed by `(name, exponent)` pairs with positive exponents.
    fn named_terms(&self) -> FxHashMap<Vec<(&str, u32)>, F> {
        self.terms
            .iter()
            .filter(|(_, c)| !c.is_zero())
            .map(|(k, c)| {
                let key = self
                    .symbols
                    .iter()
                    .zip(k.exponents())
                    .filter(|&(_, &e)| e > 0)
                    .map(|(s, &e)| (s.name(), e))
                    .collect();
                (key, c)
            })
            .collect()
    }

    fn axis_of(&self, name: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.name() == name)
    }

    fn check_arity(&self, exponents: &[u32]) -> Result<(), GDualError> {
        if exponents.len() != self.symbols.len() {
            return Err(GDualError::ArityMismatch {
                expected: self.symbols.len(),
                found: exponents.len(),
            });
        }
        Ok(())
    }

    fn check_degree(&self, degree: u32) -> Result<(), GDualError> {
        if degree > self.order {
            return Err(GDualError::DerivativeOutOfRange {
                degree,
                order: self.order,
            });
        }
        Ok(())
    }

    // ── Symbol sets ──

    /// Both operands' terms re-expressed over the union of their symbol sets.
    pub(crate) fn aligned<'a>(
        &'a self,
        rhs: &'a Self,
    ) -> (Arc<[Symbol]>, Cow<'a, TermStore<F>>, Cow<'a, TermStore<F>>) {
        let r = symbol::reconcile(&self.registry, &self.symbols, &rhs.registry, &rhs.symbols);
        let n = r.symbols.len();
        let a = match &r.lhs_axes {
            Some(axes) => Cow::Owned(self.terms.embed(axes, n)),
            None => Cow::Borrowed(&self.terms),
        };
        let b = match &r.rhs_axes {
            Some(axes) => Cow::Owned(rhs.terms.embed(axes, n)),
            None => Cow::Borrowed(&rhs.terms),
        };
        (r.symbols, a, b)
    }

    /// Same expansion over a larger symbol set: the new axes carry zero
    /// exponents everywhere.
    pub fn extend_symbols(&self, names: &[&str]) -> Self {
        let mut extra: Vec<Symbol> = names.iter().map(|n| self.registry.intern(n)).collect();
        extra.sort_by_key(Symbol::id);
        extra.dedup_by_key(|s| s.id());
        let carrier = GDual {
            order: self.order,
            symbols: extra.into(),
            terms: TermStore::new(0),
            registry: self.registry.clone(),
        };
        let (symbols, terms, _) = self.aligned(&carrier);
        self.rebuilt(self.order, symbols, terms.into_owned())
    }

    fn binary(
        &self,
        rhs: &Self,
        kernel: impl FnOnce(&TermStore<F>, &TermStore<F>, u32) -> TermStore<F>,
    ) -> Self {
        let order = self.order.min(rhs.order);
        let (symbols, a, b) = self.aligned(rhs);
        let terms = kernel(&a, &b, order);
        self.rebuilt(order, symbols, terms)
    }

    // ── Arithmetic ──

    /// `self + rhs`, at order `min(order(self), order(rhs))`.
    pub fn add(&self, rhs: &Self) -> Self {
        self.binary(rhs, gdual_ops::add)
    }

    /// `self - rhs`, at order `min(order(self), order(rhs))`.
    pub fn sub(&self, rhs: &Self) -> Self {
        self.binary(rhs, gdual_ops::sub)
    }

    /// `self · rhs` truncated at `min(order(self), order(rhs))`.
    pub fn mul(&self, rhs: &Self) -> Self {
        self.binary(rhs, gdual_ops::mul)
    }

    /// `self / rhs` with the default [`DivisionConfig`].
    pub fn try_div(&self, rhs: &Self) -> Result<Self, GDualError> {
        self.try_div_with(rhs, &DivisionConfig::default())
    }

    /// `self / rhs`, computed as `self · (1/rhs)` with the truncated
    /// geometric-series inverse.
    ///
    /// Fails with [`GDualError::SingularDenominator`] when the constant term
    /// of `rhs` is within `config.singular_tolerance` of zero.
    pub fn try_div_with(&self, rhs: &Self, config: &DivisionConfig<F>) -> Result<Self, GDualError> {
        self.divide(rhs, config, gdual_ops::mul)
    }

    pub(crate) fn divide(
        &self,
        rhs: &Self,
        config: &DivisionConfig<F>,
        mul: impl Fn(&TermStore<F>, &TermStore<F>, u32) -> TermStore<F> + Copy,
    ) -> Result<Self, GDualError> {
        let c0 = rhs.constant_term();
        singular_check(c0, config)?;
        let order = self.order.min(rhs.order);
        let (symbols, a, b) = self.aligned(rhs);
        let inv = gdual_ops::inverse_with(&b, c0, order, mul);
        Ok(self.rebuilt(order, symbols, mul(&a, &inv, order)))
    }

    /// `1 / self` with the default [`DivisionConfig`].
    pub fn try_recip(&self) -> Result<Self, GDualError> {
        self.try_recip_with(&DivisionConfig::default())
    }

    /// `1 / self` via the truncated geometric-series inverse.
    pub fn try_recip_with(&self, config: &DivisionConfig<F>) -> Result<Self, GDualError> {
        let c0 = self.constant_term();
        singular_check(c0, config)?;
        let inv = gdual_ops::inverse(&self.terms, c0, self.order);
        Ok(self.with_terms(self.order, inv))
    }

    /// `self^n` by repeated squaring; negative powers go through the series
    /// inverse and fail on a singular base.
    pub fn try_powi(&self, n: i32) -> Result<Self, GDualError> {
        let base = if n < 0 {
            self.try_recip()?
        } else {
            self.clone()
        };
        let mut exp = n.unsigned_abs();
        let mut acc = self.with_terms(self.order, TermStore::constant(F::one(), self.symbols.len()));
        let mut sq = base;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc.mul(&sq);
            }
            exp >>= 1;
            if exp > 0 {
                sq = sq.mul(&sq);
            }
        }
        Ok(acc)
    }

    /// `self^n`.
    ///
    /// # Panics
    /// If `n < 0` and the constant term is zero.
    pub fn powi(&self, n: i32) -> Self {
        match self.try_powi(n) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// `self + s`
    pub fn add_scalar(&self, s: F) -> Self {
        self.with_terms(self.order, gdual_ops::add_scalar(&self.terms, s))
    }

    /// `s · self`
    pub fn scale(&self, s: F) -> Self {
        self.with_terms(self.order, gdual_ops::scale(&self.terms, s))
    }

    /// `-self`
    pub fn neg(&self) -> Self {
        self.with_terms(self.order, gdual_ops::neg(&self.terms))
    }

    /// Formal partial derivative of the expansion along `name`.
    ///
    /// Differentiating loses one order of accuracy, so the result has order
    /// `m - 1`; at order 0 the result is the zero expansion of order 0.
    pub fn partial(&self, name: &str) -> Self {
        let order = self.order.saturating_sub(1);
        if self.order == 0 {
            return self.with_terms(0, TermStore::new(self.symbols.len()));
        }
        let terms = match self.axis_of(name) {
            Some(axis) => {
                let mut t = gdual_ops::partial(&self.terms, axis);
                t.truncate(order);
                t
            }
            None => TermStore::new(self.symbols.len()),
        };
        self.with_terms(order, terms)
    }

    /// Copy without the coefficients whose magnitude is at most `epsilon`.
    pub fn trim(&self, epsilon: F) -> Self {
        let mut terms = self.terms.clone();
        terms.retain(|_, c| c.abs() > epsilon);
        self.with_terms(self.order, terms)
    }
}

fn singular_check<F: Float>(c0: F, config: &DivisionConfig<F>) -> Result<(), GDualError> {
    if config.is_singular(c0) {
        return Err(GDualError::SingularDenominator {
            constant: c0.to_f64_lossy(),
            tolerance: config.singular_tolerance.to_f64_lossy(),
        });
    }
    Ok(())
}

#[cfg(feature = "serde")]
mod gdual_serde {
    use serde::{Deserialize, Serialize, Serializer};

    use super::GDual;
    use crate::error::GDualError;
    use crate::symbol::SymbolRegistry;
    use crate::Float;

    /// Registry-free form of a gdual: order, symbol names and terms in graded
    /// lexicographic order.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GDualSnapshot<F> {
        pub order: u32,
        pub symbols: Vec<String>,
        pub terms: Vec<(Vec<u32>, F)>,
    }

    impl<F: Float> GDualSnapshot<F> {
        /// Rebuild the gdual, interning its symbols in `registry`.
        pub fn into_gdual(self, registry: &SymbolRegistry) -> Result<GDual<F>, GDualError> {
            let names: Vec<&str> = self.symbols.iter().map(String::as_str).collect();
            GDual::from_terms(registry, self.order, &names, self.terms)
        }
    }

    impl<F: Float> GDual<F> {
        /// Snapshot suitable for serialization.
        pub fn snapshot(&self) -> GDualSnapshot<F> {
            GDualSnapshot {
                order: self.order,
                symbols: self.symbol_names().into_iter().map(str::to_string).collect(),
                terms: self
                    .terms
                    .sorted()
                    .into_iter()
                    .map(|(k, c)| (k.exponents().to_vec(), c))
                    .collect(),
            }
        }
    }

    impl<F: Float + Serialize> Serialize for GDual<F> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.snapshot().serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
pub use gdual_serde::GDualSnapshot;
