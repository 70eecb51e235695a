//! String interner implementation.
//!
//! The table is global and safe for concurrent use: lookups go through a
//! lock-free `DashMap` keyed by the string itself, and a side vector under
//! an `RwLock` provides O(1) index-to-string resolution for
//! [`Symbol::as_str`]. Interned strings are leaked to obtain `'static`
//! references; nothing is ever removed from the table.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, RwLock};

use ahash::RandomState;
use dashmap::DashMap;

use super::Symbol;

/// Global string table instance
///
/// Initialized on first use. The C keyword set is pre-interned so that
/// keywords occupy stable low indices.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// The keyword spellings pre-interned at table initialisation
const KNOWN_SYMBOLS: &[&str] = &[
    // Statement keywords
    "if", "else", "while", "do", "for", "switch", "case", "default", "break", "continue",
    "return", "goto",
    // Storage classes and qualifiers
    "typedef", "extern", "static", "auto", "register", "inline", "const", "volatile",
    "restrict",
    // Type specifiers
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
    "struct", "union", "enum",
    // C11 underscore keywords
    "_Bool", "_Atomic", "_Thread_local", "_Noreturn", "_Alignas", "_Complex",
    // Operators
    "sizeof",
];

/// Thread-safe string table
pub struct StringTable {
    /// Maps interned string to its symbol index
    names: DashMap<&'static str, u32, RandomState>,

    /// Index-to-string side table; all inserts happen under this lock so
    /// the index assignment is race-free
    strings: RwLock<Vec<&'static str>>,

    /// Number of lookups that found an existing entry
    hits: AtomicUsize,

    /// Number of lookups that allocated a new entry
    misses: AtomicUsize,
}

impl StringTable {
    fn new() -> Self {
        Self {
            names: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Pre-intern the keyword set
    ///
    /// Called exactly once while constructing the global table.
    fn initialize_known_symbols(&self) {
        for keyword in KNOWN_SYMBOLS {
            self.intern(keyword);
        }
    }

    /// Intern a string, returning its symbol
    ///
    /// Fast path is a single lock-free map lookup. On a miss the string is
    /// copied once, leaked, and registered under the side-table lock.
    pub fn intern(&self, string: &str) -> Symbol {
        if let Some(entry) = self.names.get(string) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Symbol { index: *entry };
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut strings = self
            .strings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another thread may have interned the same string between the
        // lookup above and taking the lock.
        if let Some(entry) = self.names.get(string) {
            return Symbol { index: *entry };
        }

        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(interned);
        self.names.insert(interned, index);

        Symbol { index }
    }

    /// Get the string for a symbol, if the index is valid
    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.strings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(symbol.index as usize)
            .copied()
    }

    /// Number of distinct interned strings
    pub fn len(&self) -> usize {
        self.strings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns true if the table holds no strings
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses) counters for profiling
    pub fn stats(&self) -> (usize, usize) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
