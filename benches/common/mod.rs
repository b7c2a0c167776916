use gdual::{GDual64, SymbolRegistry};

// ─── Sweep ─────────────────────────────────────────────────────────────────

/// Truncation orders swept by the benches.
pub const ORDERS: std::ops::Range<u32> = 5..10;

/// Variable counts swept by the benches.
pub const VARS: std::ops::Range<usize> = 5..12;

// ─── Operands ──────────────────────────────────────────────────────────────
// num = 1 + Σ dx_i², den = 1 + dx_0·Σ dx_i, every dx_i expanded at zero.

pub fn make_operands(order: u32, n: usize) -> (GDual64, GDual64) {
    let reg = SymbolRegistry::new();
    let vars: Vec<GDual64> = (0..n)
        .map(|i| GDual64::variable(&reg, &format!("dx{i}"), 0.0, order))
        .collect();
    let mut num = GDual64::constant(&reg, 1.0, order);
    let mut den = GDual64::constant(&reg, 1.0, order);
    for v in &vars {
        num += v * v;
    }
    for v in &vars {
        den += &vars[0] * v;
    }
    (num, den)
}
