//! Metadictionaries: definitions, per-namespace stores and the
//! multi-namespace resolver.
//!
//! - [`Definition`], [`DefinitionPayload`] - the definition model
//! - [`MetaDictionary`] - one namespace's definitions
//! - [`MetaDictionaryGroup`] - namespace-routed composition
//! - [`DefinitionResolver`] - shared query surface
//! - [`from_types_register`] - register to dictionaries

mod definition;
mod dictionary;
mod group;
mod import;

pub use definition::{
    Definition, DefinitionInfo, DefinitionPayload, EnumerationElement,
    ExtendibleEnumerationElement, RecordMember,
};
pub use dictionary::{DefinitionResolver, DictionaryError, MetaDictionary};
pub use group::MetaDictionaryGroup;
pub use import::{FromRegisterError, from_types_register};
