//! In-memory whitelist lookup used at evaluation time.
use std::collections::HashMap;

use crate::whitelist::WhitelistRecord;

/// Resolves whitelist names to records for the visibility engine.
///
/// Returning `None` means the whitelist is unavailable; the engine then falls
/// back to its configured missing-whitelist policy.
pub trait WhitelistLookup {
    fn lookup(&self, name: &str) -> Option<&WhitelistRecord>;
}

impl<T: WhitelistLookup + ?Sized> WhitelistLookup for &T {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&WhitelistRecord> {
        (**self).lookup(name)
    }
}

impl WhitelistLookup for HashMap<String, WhitelistRecord> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&WhitelistRecord> {
        self.get(name)
    }
}

/// Records keyed by their name.
#[derive(Debug, Clone, Default)]
pub struct WhitelistCatalog {
    records: HashMap<String, WhitelistRecord>,
}

impl WhitelistCatalog {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Inserts or replaces the record stored under `record.name`.
    pub fn insert(&mut self, record: WhitelistRecord) -> Option<WhitelistRecord> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<WhitelistRecord> {
        self.records.remove(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl WhitelistLookup for WhitelistCatalog {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&WhitelistRecord> {
        self.records.get(name)
    }
}

impl FromIterator<WhitelistRecord> for WhitelistCatalog {
    fn from_iter<I: IntoIterator<Item = WhitelistRecord>>(iter: I) -> Self {
        let mut catalog = WhitelistCatalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}
