//! Symbols and the shared symbol registry.
//!
//! A [`Symbol`] is a named differentiation direction. The [`SymbolRegistry`]
//! assigns every name a stable, append-only index; symbol sets attached to
//! gduals are kept sorted by that index, which fixes the axis order of their
//! multi-indices.
//!
//! The registry is an explicit, cloneable handle rather than a global: every
//! gdual carries the handle it was built from, and gduals derived from it
//! share the same registry.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

/// A named indeterminate, interned in a [`SymbolRegistry`].
///
/// Identity is the name: two symbols with the same name are the same
/// direction, even when interned in different registries.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: u32,
    name: Arc<str>,
}

impl Symbol {
    /// Registry index (registration order).
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Symbol name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Default)]
struct RegistryInner {
    names: Vec<Arc<str>>,
    index: FxHashMap<Arc<str>, u32>,
}

/// Shared, thread-safe name → index table.
///
/// Cloning the handle shares the table. Indices are assigned on first
/// [`intern`](SymbolRegistry::intern) and never change afterwards.
#[derive(Clone, Default)]
pub struct SymbolRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl fmt::Debug for SymbolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl SymbolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name`, registering it if unseen.
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(symbol) = self.lookup(name) {
            return symbol;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have registered it between the two locks.
        if let Some(&id) = inner.index.get(name) {
            return Symbol {
                id,
                name: Arc::clone(&inner.names[id as usize]),
            };
        }
        let id = u32::try_from(inner.names.len()).expect("symbol registry overflow");
        let name: Arc<str> = Arc::from(name);
        inner.names.push(Arc::clone(&name));
        inner.index.insert(Arc::clone(&name), id);
        tracing::trace!(symbol = %name, id, "registered symbol");
        Symbol { id, name }
    }

    /// Look up `name` without registering it.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.index.get(name).map(|&id| Symbol {
            id,
            name: Arc::clone(&inner.names[id as usize]),
        })
    }

    /// Name registered at `id`, if any.
    pub fn name(&self, id: u32) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.names.get(id as usize).map(|n| n.to_string())
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .len()
    }

    /// Whether no symbol has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered symbols in registration order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .names
            .iter()
            .enumerate()
            .map(|(id, name)| Symbol {
                id: id as u32,
                name: Arc::clone(name),
            })
            .collect()
    }

    /// Whether both handles share one table.
    #[inline]
    pub fn same_as(&self, other: &SymbolRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Ordered union of two symbol sets, with the axis maps that re-express each
/// operand's multi-indices in the union.
///
/// `lhs_axes[i]` is the union position of the left operand's `i`-th symbol;
/// `None` means the operand's axes already are the union's.
pub(crate) struct Reconciled {
    pub symbols: Arc<[Symbol]>,
    pub lhs_axes: Option<Vec<usize>>,
    pub rhs_axes: Option<Vec<usize>>,
}

/// Reconcile two symbol sets. Both are id-sorted in `registry`, except that
/// `rhs` may belong to `rhs_registry`, in which case it is adopted by name.
///
/// The union is sorted by registry index, so it does not depend on which
/// operand is on the left.
pub(crate) fn reconcile(
    registry: &SymbolRegistry,
    lhs: &Arc<[Symbol]>,
    rhs_registry: &SymbolRegistry,
    rhs: &Arc<[Symbol]>,
) -> Reconciled {
    let same_registry = registry.same_as(rhs_registry);
    if same_registry && (Arc::ptr_eq(lhs, rhs) || same_ids(lhs, rhs)) {
        return Reconciled {
            symbols: Arc::clone(lhs),
            lhs_axes: None,
            rhs_axes: None,
        };
    }

    // Positions of the rhs axes after adoption, before sorting.
    let rhs_local: Vec<Symbol> = if same_registry {
        rhs.to_vec()
    } else {
        rhs.iter().map(|s| registry.intern(s.name())).collect()
    };

    let mut union: Vec<Symbol> = lhs.iter().chain(rhs_local.iter()).cloned().collect();
    union.sort_by_key(Symbol::id);
    union.dedup_by_key(|s| s.id);

    // Every operand symbol is in the union.
    let position = |s: &Symbol| {
        union
            .binary_search_by_key(&s.id, Symbol::id)
            .unwrap_or_else(|at| at)
    };

    let lhs_axes = if union.len() == lhs.len() {
        None
    } else {
        Some(lhs.iter().map(position).collect())
    };
    let rhs_positions: Vec<usize> = rhs_local.iter().map(position).collect();
    let rhs_axes = if rhs_positions.iter().copied().eq(0..union.len()) {
        None
    } else {
        Some(rhs_positions)
    };

    if lhs_axes.is_some() || rhs_axes.is_some() {
        tracing::trace!(
            lhs = lhs.len(),
            rhs = rhs.len(),
            union = union.len(),
            "reconciled symbol sets"
        );
    }

    Reconciled {
        symbols: union.into(),
        lhs_axes,
        rhs_axes,
    }
}

fn same_ids(a: &[Symbol], b: &[Symbol]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id == y.id)
}
