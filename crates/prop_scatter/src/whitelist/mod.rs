//! Versioned whitelist records, their file store, and evaluation-time lookup.
pub mod catalog;
pub mod record;
pub mod store;

pub use catalog::{WhitelistCatalog, WhitelistLookup};
pub use record::{TrustLevel, WhitelistMode, WhitelistRecord};
pub use store::{WhitelistStore, WhitelistStoreConfig};
