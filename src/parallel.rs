//! Data-parallel truncated multiplication.
//!
//! The left operand's terms are split into chunks; each rayon worker
//! accumulates its chunk's products into a private term store and the
//! partial stores are summed. Accumulation is a commutative reduction keyed
//! by multi-index, so only floating-point summation order differs from the
//! serial kernel.

use rayon::prelude::*;

use crate::config::DivisionConfig;
use crate::error::GDualError;
use crate::gdual::GDual;
use crate::gdual_ops;
use crate::term_store::TermStore;
use crate::Float;

/// Below this many term pairs the serial kernel is used.
const PAR_THRESHOLD: usize = 4096;

/// Left-operand terms handed to one worker.
const CHUNK: usize = 64;

/// `c = a · b` truncated at `order`, parallelized over the terms of `a`.
pub fn mul_par<F: Float>(a: &TermStore<F>, b: &TermStore<F>, order: u32) -> TermStore<F> {
    if a.len().saturating_mul(b.len()) < PAR_THRESHOLD {
        return gdual_ops::mul(a, b, order);
    }
    let arity = a.arity();
    let lhs: Vec<_> = a.iter().collect();
    let rhs = b.by_degree();
    lhs.par_chunks(CHUNK)
        .map(|chunk| {
            let mut out = TermStore::new(arity);
            gdual_ops::mul_into(chunk.iter().copied(), &rhs, order, &mut out);
            out
        })
        .reduce(
            || TermStore::new(arity),
            |mut acc, part| {
                acc.absorb(part);
                acc
            },
        )
}

impl<F: Float> GDual<F> {
    /// [`mul`](GDual::mul) with the parallel kernel.
    pub fn mul_par(&self, rhs: &Self) -> Self {
        let order = self.order().min(rhs.order());
        let (symbols, a, b) = self.aligned(rhs);
        self.rebuilt(order, symbols, mul_par(&a, &b, order))
    }

    /// [`try_div`](GDual::try_div) with the parallel kernel for every
    /// truncated product, including the powers of the series inverse.
    pub fn try_div_par(&self, rhs: &Self) -> Result<Self, GDualError> {
        self.divide(rhs, &DivisionConfig::default(), mul_par::<F>)
    }
}
