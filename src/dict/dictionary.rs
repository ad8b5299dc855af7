//! Per-namespace metadictionaries.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use url::Url;

use crate::base::Auid;
use crate::dict::definition::{Definition, DefinitionPayload};

/// Errors raised when composing dictionaries.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DictionaryError {
    #[error("a dictionary for namespace {0} is already present")]
    DuplicateDictionary(Url),

    #[error("a definition identified by {0} is already present")]
    DuplicateDefinition(Auid),

    #[error("symbol {symbol} is already defined in {namespace}")]
    DuplicateSymbol { symbol: SmolStr, namespace: Url },

    #[error("definition {identification} belongs to {definition_namespace}, not {dictionary_namespace}")]
    NamespaceMismatch {
        identification: Auid,
        definition_namespace: Url,
        dictionary_namespace: Url,
    },
}

/// Read-only definition queries, answered by a single dictionary or by
/// a group of them.
pub trait DefinitionResolver {
    /// The definition identified by `id`.
    fn definition(&self, id: Auid) -> Option<&Definition>;

    /// Identifications of the direct subclasses of a class definition,
    /// absent when the resolver has not indexed the class.
    fn subclasses_of(&self, class: &Definition) -> Option<Vec<Auid>>;

    /// Identifications of the properties that are members of a class
    /// definition, absent when the resolver has not indexed the class.
    fn members_of(&self, class: &Definition) -> Option<Vec<Auid>>;
}

/// All definitions of one namespace.
///
/// `add` maintains the subclass and membership indexes incrementally;
/// queries never mutate. A definition must carry this dictionary's
/// namespace, an unused identification and an unused symbol.
#[derive(Clone, Debug)]
pub struct MetaDictionary {
    scheme_uri: Url,
    definitions: IndexMap<Auid, Definition>,
    by_symbol: FxHashMap<SmolStr, Auid>,
    /// Class identification to subclass identifications.
    subclasses: FxHashMap<Auid, Vec<Auid>>,
    /// Class identification to member property identifications.
    members: FxHashMap<Auid, Vec<Auid>>,
}

impl MetaDictionary {
    pub fn new(scheme_uri: Url) -> Self {
        Self {
            scheme_uri,
            definitions: IndexMap::new(),
            by_symbol: FxHashMap::default(),
            subclasses: FxHashMap::default(),
            members: FxHashMap::default(),
        }
    }

    /// The namespace this dictionary defines.
    pub fn scheme_uri(&self) -> &Url {
        &self.scheme_uri
    }

    /// Add a definition.
    pub fn add(&mut self, definition: Definition) -> Result<(), DictionaryError> {
        if definition.namespace() != &self.scheme_uri {
            return Err(DictionaryError::NamespaceMismatch {
                identification: definition.identification(),
                definition_namespace: definition.namespace().clone(),
                dictionary_namespace: self.scheme_uri.clone(),
            });
        }
        let id = definition.identification();
        if self.definitions.contains_key(&id) {
            return Err(DictionaryError::DuplicateDefinition(id));
        }
        if self.by_symbol.contains_key(definition.symbol()) {
            return Err(DictionaryError::DuplicateSymbol {
                symbol: definition.info.symbol.clone(),
                namespace: self.scheme_uri.clone(),
            });
        }

        match &definition.payload {
            DefinitionPayload::Class {
                parent_class: Some(parent),
                ..
            } => self.subclasses.entry(*parent).or_default().push(id),
            DefinitionPayload::Property {
                member_of: Some(owner),
                ..
            } => self.members.entry(*owner).or_default().push(id),
            _ => {}
        }

        self.by_symbol.insert(definition.info.symbol.clone(), id);
        self.definitions.insert(id, definition);
        Ok(())
    }

    pub fn definition_by_symbol(&self, symbol: &str) -> Option<&Definition> {
        self.by_symbol
            .get(symbol)
            .and_then(|id| self.definitions.get(id))
    }

    /// Definitions in insertion order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionResolver for MetaDictionary {
    fn definition(&self, id: Auid) -> Option<&Definition> {
        self.definitions.get(&id)
    }

    fn subclasses_of(&self, class: &Definition) -> Option<Vec<Auid>> {
        self.subclasses.get(&class.identification()).cloned()
    }

    fn members_of(&self, class: &Definition) -> Option<Vec<Auid>> {
        self.members.get(&class.identification()).cloned()
    }
}
