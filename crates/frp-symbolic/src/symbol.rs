//! Symbol construction and fresh-name generation

use crate::quantity::Quantity;
use crate::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SYMBOL: AtomicUsize = AtomicUsize::new(0);

/// A quantity standing for the named variable
pub fn symbol(name: &str) -> Result<Quantity> {
    Quantity::symbol(name)
}

/// Several symbols at once, in the order given
pub fn symbols(names: &[&str]) -> Result<Vec<Quantity>> {
    names.iter().map(|name| symbol(name)).collect()
}

/// A symbol with a process-unique `#x_{n}` name
///
/// The `#` prefix cannot be produced by quantity parsing, so generated
/// names never collide with user symbols read from text.
pub fn gen_symbol() -> Quantity {
    let n = NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed);
    match Quantity::symbol(&format!("#x_{{{n}}}")) {
        Ok(q) => q,
        Err(_) => unreachable!("generated names are never empty"),
    }
}
