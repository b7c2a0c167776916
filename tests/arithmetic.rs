//! Addition, subtraction, multiplication and truncation semantics.

use approx::assert_relative_eq;
use gdual::{GDual, GDual64, SymbolRegistry};

fn max_abs_diff(a: &GDual64, b: &GDual64) -> f64 {
    (a - b).terms().iter().map(|(_, c)| c.abs()).fold(0.0, f64::max)
}

// ══════════════════════════════════════════════
//  Construction
// ══════════════════════════════════════════════

#[test]
fn constant_has_no_symbols() {
    let reg = SymbolRegistry::new();
    let c = GDual::constant(&reg, 3.5, 4);
    assert_eq!(c.order(), 4);
    assert_eq!(c.num_symbols(), 0);
    assert_eq!(c.len(), 1);
    assert_eq!(c.degree(), 0);
    assert_relative_eq!(c.constant_term(), 3.5);
}

#[test]
fn variable_is_value_plus_unit_term() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 1.25, 3);
    assert_eq!(x.symbol_names(), ["x"]);
    assert_eq!(x.order(), 3);
    assert_eq!(x.degree(), 1);
    assert_relative_eq!(x.coefficient(&[0]).unwrap(), 1.25);
    assert_relative_eq!(x.coefficient(&[1]).unwrap(), 1.0);
    assert_relative_eq!(x.coefficient(&[2]).unwrap(), 0.0);
}

#[test]
fn order_zero_variable_keeps_only_value() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 0);
    assert_eq!(x.len(), 1);
    assert_eq!(x.degree(), 0);
}

#[test]
fn from_terms_reorders_axes_by_registry() {
    let reg = SymbolRegistry::new();
    reg.intern("x");
    reg.intern("y");
    // Axes given as (y, x).
    let p = GDual::from_terms(&reg, 2, &["y", "x"], vec![(vec![2, 0], 3.0), (vec![0, 1], 1.0)])
        .unwrap();
    assert_eq!(p.symbol_names(), ["x", "y"]);
    assert_relative_eq!(p.coefficient(&[0, 2]).unwrap(), 3.0);
    assert_relative_eq!(p.coefficient(&[1, 0]).unwrap(), 1.0);
}

#[test]
fn from_terms_drops_terms_above_order() {
    let reg = SymbolRegistry::new();
    let p = GDual::from_terms(&reg, 1, &["x"], vec![(vec![0], 1.0), (vec![2], 5.0)]).unwrap();
    assert_eq!(p.len(), 1);
}

#[test]
fn from_terms_drops_oversized_exponents() {
    let reg = SymbolRegistry::new();
    let p = GDual::from_terms(
        &reg,
        2,
        &["x", "y"],
        vec![(vec![u32::MAX, 1], 5.0), (vec![1, 1], 2.0)],
    )
    .unwrap();
    assert_eq!(p.len(), 1);
    assert!(p.terms().iter().all(|(k, _)| k.degree() <= 2));
    assert_relative_eq!(p.coefficient(&[1, 1]).unwrap(), 2.0);
}

#[test]
fn from_terms_rejects_bad_input() {
    let reg = SymbolRegistry::new();
    let dup = GDual::<f64>::from_terms(&reg, 2, &["x", "x"], Vec::new());
    assert!(matches!(dup, Err(gdual::GDualError::DuplicateSymbol { .. })));
    let arity = GDual::from_terms(&reg, 2, &["x"], vec![(vec![1, 0], 1.0)]);
    assert!(matches!(
        arity,
        Err(gdual::GDualError::ArityMismatch {
            expected: 1,
            found: 2
        })
    ));
}

// ══════════════════════════════════════════════
//  Addition / subtraction
// ══════════════════════════════════════════════

#[test]
fn additive_identity_is_exact() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.7, 3);
    let y = GDual::variable(&reg, "y", -1.3, 3);
    let f = &(&x * &y) + &(&x * &x);
    let zero = f.zero_like();
    let sum = &f + &zero;
    assert_eq!(sum, f);
    for (k, c) in f.terms().iter() {
        assert_eq!(sum.terms().get(k), c);
    }
    assert_eq!(&zero + &f, f);
}

#[test]
fn sub_self_is_zero() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 3);
    let f = &x * &x;
    let d = &f - &f;
    assert!(d.is_zero(0.0));
}

#[test]
fn add_merges_symbol_sets() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 1.0, 2);
    let y = GDual::variable(&reg, "y", 2.0, 2);
    let s = &y + &x;
    assert_eq!(s.symbol_names(), ["x", "y"]);
    assert_relative_eq!(s.constant_term(), 3.0);
    assert_relative_eq!(s.coefficient(&[1, 0]).unwrap(), 1.0);
    assert_relative_eq!(s.coefficient(&[0, 1]).unwrap(), 1.0);
}

#[test]
fn mismatched_orders_truncate_to_smaller() {
    let reg = SymbolRegistry::new();
    let x3 = GDual::variable(&reg, "x", 0.0, 3);
    let y2 = GDual::variable(&reg, "y", 0.0, 2);
    let cube = &(&x3 * &x3) * &x3;
    assert_relative_eq!(cube.coefficient(&[3]).unwrap(), 1.0);

    let s = &cube + &y2;
    assert_eq!(s.order(), 2);
    assert!(s.terms().iter().all(|(k, _)| k.degree() <= 2));
    assert_relative_eq!(s.coefficient(&[3, 0]).unwrap(), 0.0);
}

#[test]
fn scalar_mixed_ops() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 2);
    let a = x.clone() + 1.0;
    let b = 1.0_f64 - x.clone();
    let c = 3.0_f64 * x.clone();
    let d = x.clone() / 4.0;
    assert_relative_eq!(a.constant_term(), 3.0);
    assert_relative_eq!(b.constant_term(), -1.0);
    assert_relative_eq!(b.coefficient(&[1]).unwrap(), -1.0);
    assert_relative_eq!(c.coefficient(&[1]).unwrap(), 3.0);
    assert_relative_eq!(d.coefficient(&[1]).unwrap(), 0.25);
}

#[test]
fn scalar_ops_on_borrowed_operands() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 2);
    assert_eq!(&x + 1.0, x.add_scalar(1.0));
    assert_eq!(3.0_f64 + &x, x.add_scalar(3.0));
    assert_eq!(&x - 0.5, x.add_scalar(-0.5));
    assert_eq!(1.0_f64 - &x, 1.0_f64 - x.clone());
    assert_eq!(&x * 2.0, x.scale(2.0));
    assert_eq!(2.0_f64 * &x, x.scale(2.0));
    assert_eq!(&x / 4.0, x.scale(0.25));
    assert_eq!(1.0_f64 / &x, x.try_recip().unwrap());
    // Operand still usable afterwards.
    assert_relative_eq!(x.constant_term(), 2.0);
}

#[test]
fn compound_assignment_replaces_value() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 1.0, 3);
    let mut acc = GDual::constant(&reg, 1.0, 3);
    acc += &x;
    acc *= &x;
    acc -= 1.0;
    // (1 + x)·x - 1 at x = 1 + dx: 1 + 3dx + dx²
    assert_relative_eq!(acc.constant_term(), 1.0);
    assert_relative_eq!(acc.coefficient(&[1]).unwrap(), 3.0);
    assert_relative_eq!(acc.coefficient(&[2]).unwrap(), 1.0);
    // Operand untouched.
    assert_relative_eq!(x.constant_term(), 1.0);
}

// ══════════════════════════════════════════════
//  Multiplication
// ══════════════════════════════════════════════

#[test]
fn product_of_binomials() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 2);
    let y = GDual::variable(&reg, "y", 3.0, 2);
    // (2 + dx)(3 + dy) = 6 + 3dx + 2dy + dxdy
    let p = &x * &y;
    assert_relative_eq!(p.coefficient(&[0, 0]).unwrap(), 6.0);
    assert_relative_eq!(p.coefficient(&[1, 0]).unwrap(), 3.0);
    assert_relative_eq!(p.coefficient(&[0, 1]).unwrap(), 2.0);
    assert_relative_eq!(p.coefficient(&[1, 1]).unwrap(), 1.0);
}

#[test]
fn multiplication_truncates_at_order() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.0, 2);
    let cube = &(&x * &x) * &x;
    assert!(cube.terms().iter().all(|(k, _)| k.degree() <= 2));
    assert_eq!(cube.degree(), 0);
}

#[test]
fn multiplication_is_commutative() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.5, 4);
    let y = GDual::variable(&reg, "y", -1.5, 4);
    let a = &(&x + &y) * &x;
    let b = &y * &(&x * &x);
    assert!(max_abs_diff(&(&a * &b), &(&b * &a)) < 1e-12);
}

#[test]
fn constant_operand_reduces_to_scaling() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 1.0, 3);
    let f = &x * &x;
    let two = GDual::constant(&reg, 2.0, 3);
    assert_eq!(&two * &f, f.scale(2.0));
}

#[test]
fn distributivity() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.3, 3);
    let y = GDual::variable(&reg, "y", 1.7, 3);
    let z = GDual::variable(&reg, "z", -0.4, 3);
    let a = &x * &y + 1.0;
    let b = &y * &z;
    let c = &x * &x - &z;
    let lhs = &a * &(&b + &c);
    let rhs = &(&a * &b) + &(&a * &c);
    assert!(max_abs_diff(&lhs, &rhs) < 1e-12);
}

#[test]
fn term_count_matches_dense_binomial() {
    // (1 + x + y + z)^3 truncated at 3 is dense: C(3 + 3, 3) = 20 terms.
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.0, 3);
    let y = GDual::variable(&reg, "y", 0.0, 3);
    let z = GDual::variable(&reg, "z", 0.0, 3);
    let s: GDual64 = &(&x + &y) + &z + 1.0;
    let p = s.powi(3);
    assert_eq!(p.trim(0.0).len(), 20);
    // Multinomial coefficient of xyz is 3! = 6.
    assert_relative_eq!(p.coefficient(&[1, 1, 1]).unwrap(), 6.0);
}

#[test]
fn powi_matches_repeated_products() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 2.0, 4);
    let cube = x.powi(3);
    assert_relative_eq!(cube.coefficient(&[0]).unwrap(), 8.0);
    assert_relative_eq!(cube.coefficient(&[1]).unwrap(), 12.0);
    assert_relative_eq!(cube.coefficient(&[2]).unwrap(), 6.0);
    assert_relative_eq!(cube.coefficient(&[3]).unwrap(), 1.0);
    assert_relative_eq!(cube.coefficient(&[4]).unwrap(), 0.0);

    let one = x.powi(0);
    assert_relative_eq!(one.constant_term(), 1.0);
    assert_eq!(one.degree(), 0);
}

// ══════════════════════════════════════════════
//  Rendering and helpers
// ══════════════════════════════════════════════

#[test]
fn display_is_graded_and_skips_zeros() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.0, 2);
    let y = GDual::variable(&reg, "y", 0.0, 2);
    let f: GDual64 = (&x * &x) * 3.0 + &y - 1.0;
    assert_eq!(f.to_string(), "-1 + 1*y + 3*x^2");
    assert_eq!(f.zero_like().to_string(), "0");
}

#[test]
fn trim_and_is_zero() {
    let reg = SymbolRegistry::new();
    let x = GDual::variable(&reg, "x", 0.0, 2);
    let f = &x * &x;
    // Explicit zeros at degree 0 and 1.
    assert_eq!(f.len(), 3);
    let t = f.trim(0.0);
    assert_eq!(t.len(), 1);
    assert_eq!(t, f);
    assert!(!f.is_zero(1e-12));
    assert!(f.scale(1e-15).is_zero(1e-12));
}

#[test]
fn equality_requires_same_order() {
    let reg = SymbolRegistry::new();
    let a = GDual::variable(&reg, "x", 1.0, 2);
    let b = GDual::variable(&reg, "x", 1.0, 3);
    assert_ne!(a, b);
    assert_eq!(a, GDual::variable(&reg, "x", 1.0, 2));
}
