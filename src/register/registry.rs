//! The types register store.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use url::Url;

use crate::base::Ul;
use crate::register::entry::TypeEntry;

/// A second entry reused an already-registered universal label.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("an entry with identifier {0} is already registered")]
pub struct DuplicateEntryError(pub Ul);

/// Symbol lookups are scoped by namespace.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct SymbolKey {
    symbol: SmolStr,
    namespace: Option<Url>,
}

/// Register entries in insertion order, addressable by universal label
/// and by `(symbol, namespace)` pair.
///
/// Labels are unique and duplicates are rejected. Symbols carry no
/// uniqueness constraint: the first entry to claim a `(symbol,
/// namespace)` pair keeps it. Entries are never removed or replaced.
#[derive(Clone, Debug, Default)]
pub struct TypesRegister {
    entries: IndexMap<Ul, TypeEntry>,
    by_symbol: FxHashMap<SymbolKey, Ul>,
}

impl TypesRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn add(&mut self, entry: TypeEntry) -> Result<(), DuplicateEntryError> {
        if self.entries.contains_key(&entry.ul) {
            return Err(DuplicateEntryError(entry.ul));
        }
        if let Some(symbol) = entry.symbol.clone() {
            let key = SymbolKey {
                symbol,
                namespace: entry.namespace.clone(),
            };
            self.by_symbol.entry(key).or_insert(entry.ul);
        }
        self.entries.insert(entry.ul, entry);
        Ok(())
    }

    /// Look an entry up by universal label.
    pub fn entry_by_ul(&self, ul: Ul) -> Option<&TypeEntry> {
        self.entries.get(&ul)
    }

    /// Look an entry up by symbol within a namespace.
    pub fn entry_by_symbol(&self, symbol: &str, namespace: Option<&Url>) -> Option<&TypeEntry> {
        let key = SymbolKey {
            symbol: SmolStr::new(symbol),
            namespace: namespace.cloned(),
        };
        self.by_symbol.get(&key).and_then(|ul| self.entries.get(ul))
    }

    pub fn contains(&self, ul: Ul) -> bool {
        self.entries.contains_key(&ul)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
