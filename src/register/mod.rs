//! The types register: entry model, store and row-driven import.
//!
//! - [`TypeEntry`], [`Facet`] - the entry model
//! - [`TypesRegister`] - insertion-ordered store with symbol lookup
//! - [`TypesRegister::from_rows`] / [`TypesRegister::from_csv`] - import
//! - [`Row`] - one decoded table row

mod entry;
mod import;
mod registry;
mod rows;

pub use entry::{EntryKind, Facet, TypeEntry, TypeKind, TypeQualifiers};
pub use import::{AUID_TYPE, ImportError, SMPTE_NAMESPACE};
pub use registry::{DuplicateEntryError, TypesRegister};
pub use rows::Row;
