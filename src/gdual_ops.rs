//! Truncated-polynomial kernels over term stores.
//!
//! Convention: coefficient at multi-index `a` = `∂^|a| f / ∂x^a (x₀) / a!`.
//! Every function here assumes its operands already share an axis set (the
//! gdual layer reconciles symbols first) and truncates its output at the
//! given `order`.

use crate::monomial::MultiIndex;
use crate::term_store::TermStore;
use crate::Float;

// ══════════════════════════════════════════════
//  Linear
// ══════════════════════════════════════════════

/// `c = a + b`, truncated at `order`.
pub fn add<F: Float>(a: &TermStore<F>, b: &TermStore<F>, order: u32) -> TermStore<F> {
    combine(a, b, order, |x, y| x + y)
}

/// `c = a - b`, truncated at `order`.
pub fn sub<F: Float>(a: &TermStore<F>, b: &TermStore<F>, order: u32) -> TermStore<F> {
    combine(a, b, order, |x, y| x - y)
}

/// Keywise `op(a_k, b_k)` over the union of keys, absent keys read as zero.
fn combine<F: Float>(
    a: &TermStore<F>,
    b: &TermStore<F>,
    order: u32,
    op: impl Fn(F, F) -> F,
) -> TermStore<F> {
    debug_assert_eq!(a.arity(), b.arity());
    let mut c = TermStore::with_capacity(a.arity(), a.len().max(b.len()));
    for (k, v) in a.iter() {
        if k.degree() <= order {
            c.insert(k.clone(), op(v, b.get(k)));
        }
    }
    for (k, v) in b.iter() {
        if k.degree() <= order && !a.contains(k) {
            c.insert(k.clone(), op(F::zero(), v));
        }
    }
    c
}

/// `c = -a`
pub fn neg<F: Float>(a: &TermStore<F>) -> TermStore<F> {
    a.map_coeffs(|v| -v)
}

/// `c = s · a`
pub fn scale<F: Float>(a: &TermStore<F>, s: F) -> TermStore<F> {
    a.map_coeffs(|v| v * s)
}

/// `c = a + s`, shifting only the constant term.
pub fn add_scalar<F: Float>(a: &TermStore<F>, s: F) -> TermStore<F> {
    let mut c = a.clone();
    c.accumulate(MultiIndex::zero(a.arity()), s);
    c
}

// ══════════════════════════════════════════════
//  Multiplication
// ══════════════════════════════════════════════

/// `c = a · b` in the ring of polynomials modulo monomials of degree > `order`.
///
/// Every pair of terms whose combined degree exceeds `order` is skipped.
/// The right operand is walked in ascending degree so each left term stops
/// as soon as the remaining right terms are all too high.
pub fn mul<F: Float>(a: &TermStore<F>, b: &TermStore<F>, order: u32) -> TermStore<F> {
    debug_assert_eq!(a.arity(), b.arity());
    if a.is_empty() || b.is_empty() {
        return TermStore::new(a.arity());
    }
    // Scalar fast paths: a lone constant term is plain scaling.
    if let Some(s) = lone_constant(a) {
        let mut c = scale(b, s);
        c.truncate(order);
        return c;
    }
    if let Some(s) = lone_constant(b) {
        let mut c = scale(a, s);
        c.truncate(order);
        return c;
    }

    let rhs = b.by_degree();
    let mut c = TermStore::with_capacity(a.arity(), a.len().max(b.len()));
    mul_into(a.iter(), &rhs, order, &mut c);
    c
}

/// Accumulate `Σ lhs_i · rhs_j` into `out`, skipping pairs above `order`.
/// `rhs` must be sorted by ascending degree.
pub(crate) fn mul_into<'a, F: Float>(
    lhs: impl Iterator<Item = (&'a MultiIndex, F)>,
    rhs: &[(&MultiIndex, F)],
    order: u32,
    out: &mut TermStore<F>,
) {
    for (ka, va) in lhs {
        if ka.degree() > order {
            continue;
        }
        let budget = order - ka.degree();
        for &(kb, vb) in rhs {
            if kb.degree() > budget {
                break;
            }
            out.accumulate(ka.product(kb), va * vb);
        }
    }
}

/// The coefficient of `a` if its only term is the constant monomial.
fn lone_constant<F: Float>(a: &TermStore<F>) -> Option<F> {
    if a.len() != 1 {
        return None;
    }
    a.iter().next().filter(|(k, _)| k.is_zero()).map(|(_, v)| v)
}

// ══════════════════════════════════════════════
//  Series inverse
// ══════════════════════════════════════════════

/// `c = 1/a` for `a` with non-zero constant term `c0`, truncated at `order`.
///
/// Writes `a = c0 + d` with every term of `d` of degree ≥ 1. Then
/// `1/a = (1/c0) · Σ_{k=0}^{order} (-d/c0)^k`, and `(-d/c0)^k` has no term of
/// degree below `k`, so the sum is exact after `order + 1` terms.
/// `mul` is the truncated product used for each power, so the caller can
/// swap in the parallel kernel.
pub(crate) fn inverse_with<F: Float>(
    a: &TermStore<F>,
    c0: F,
    order: u32,
    mul: impl Fn(&TermStore<F>, &TermStore<F>, u32) -> TermStore<F>,
) -> TermStore<F> {
    let arity = a.arity();
    let inv_c0 = F::one() / c0;

    let mut q = scale(a, -inv_c0);
    q.remove(&MultiIndex::zero(arity));
    q.truncate(order);

    tracing::debug!(order, terms = a.len(), constant = %c0, "series inverse");

    let mut sum = TermStore::constant(F::one(), arity);
    let mut power = TermStore::constant(F::one(), arity);
    for k in 1..=order {
        power = mul(&power, &q, order);
        tracing::trace!(k, terms = power.len(), "series power");
        if power.is_empty() {
            break;
        }
        sum.absorb(power.clone());
    }
    scale(&sum, inv_c0)
}

/// `c = 1/a` with the serial multiplication kernel.
pub fn inverse<F: Float>(a: &TermStore<F>, c0: F, order: u32) -> TermStore<F> {
    inverse_with(a, c0, order, mul::<F>)
}

// ══════════════════════════════════════════════
//  Calculus on the polynomial
// ══════════════════════════════════════════════

/// Formal partial derivative along `axis`: `a_k x^k ↦ k · a_k x^{k-e_axis}`.
pub fn partial<F: Float>(a: &TermStore<F>, axis: usize) -> TermStore<F> {
    let mut c = TermStore::with_capacity(a.arity(), a.len());
    for (k, v) in a.iter() {
        if let Some((e, lowered)) = k.lower(axis) {
            let e = F::from_u32(e).unwrap_or_else(F::nan);
            c.accumulate(lowered, v * e);
        }
    }
    c
}

/// Evaluate the polynomial at displacement `dx` (one value per axis).
pub fn evaluate<F: Float>(a: &TermStore<F>, dx: &[F]) -> F {
    debug_assert_eq!(dx.len(), a.arity());
    let mut sum = F::zero();
    for (k, v) in a.iter() {
        let mut term = v;
        for (&e, &x) in k.exponents().iter().zip(dx) {
            if e > 0 {
                term = term * x.powi(e as i32);
            }
        }
        sum = sum + term;
    }
    sum
}
