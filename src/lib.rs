//! # regml-base
//!
//! Core library for SMPTE metadata register import and RegXML
//! metadictionary composition.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! interchange → XML documents (feature `interchange`)
//!   ↓
//! dict        → metadictionaries, groups, definition resolution
//!   ↓
//! register    → row import, construction rules, types register
//!   ↓
//! base        → identifier primitives (Ul, Auid)
//! ```

/// Identifier primitives: universal labels and AUIDs
pub mod base;

/// Metadictionaries: definitions, groups, definition resolution
pub mod dict;

/// Register import: row grammar, construction rules, types register
pub mod register;

/// XML interchange for registers and metadictionaries
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export foundation identifier types
pub use base::{Auid, Ul};

// Re-export the importer entry point
pub use register::TypesRegister;
