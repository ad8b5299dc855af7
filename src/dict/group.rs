//! Composition of metadictionaries into one resolver.

use indexmap::IndexMap;
use url::Url;

use crate::base::Auid;
use crate::dict::definition::Definition;
use crate::dict::dictionary::{DefinitionResolver, DictionaryError, MetaDictionary};

/// A group of metadictionaries, one per namespace, queried as a unit.
///
/// Resolution visits member dictionaries in the order they joined the
/// group; a group assembled the same way answers the same way. Queries
/// never mutate member dictionaries.
#[derive(Clone, Debug, Default)]
pub struct MetaDictionaryGroup {
    dictionaries: IndexMap<Url, MetaDictionary>,
}

impl MetaDictionaryGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a whole dictionary. Its namespace must be new to the group.
    pub fn add_dictionary(&mut self, dictionary: MetaDictionary) -> Result<(), DictionaryError> {
        let namespace = dictionary.scheme_uri().clone();
        if self.dictionaries.contains_key(&namespace) {
            return Err(DictionaryError::DuplicateDictionary(namespace));
        }
        self.dictionaries.insert(namespace, dictionary);
        Ok(())
    }

    /// Route a definition to its namespace's dictionary, creating that
    /// dictionary the first time the namespace appears.
    pub fn add_definition(&mut self, definition: Definition) -> Result<(), DictionaryError> {
        let namespace = definition.namespace().clone();
        self.dictionaries
            .entry(namespace.clone())
            .or_insert_with(|| MetaDictionary::new(namespace))
            .add(definition)
    }

    pub fn dictionary(&self, namespace: &Url) -> Option<&MetaDictionary> {
        self.dictionaries.get(namespace)
    }

    /// Member dictionaries in join order.
    pub fn dictionaries(&self) -> impl Iterator<Item = &MetaDictionary> {
        self.dictionaries.values()
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

impl DefinitionResolver for MetaDictionaryGroup {
    fn definition(&self, id: Auid) -> Option<&Definition> {
        self.dictionaries.values().find_map(|d| d.definition(id))
    }

    fn subclasses_of(&self, class: &Definition) -> Option<Vec<Auid>> {
        let mut all = Vec::new();
        for dictionary in self.dictionaries.values() {
            if let Some(ids) = dictionary.subclasses_of(class) {
                all.extend(ids);
            }
        }
        Some(all)
    }

    fn members_of(&self, class: &Definition) -> Option<Vec<Auid>> {
        let mut all = Vec::new();
        for dictionary in self.dictionaries.values() {
            if let Some(ids) = dictionary.members_of(class) {
                all.extend(ids);
            }
        }
        Some(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Ul;
    use crate::dict::definition::{DefinitionInfo, DefinitionPayload};

    fn ns(n: u8) -> Url {
        Url::parse(&format!("http://example.com/reg/{n}")).unwrap()
    }

    fn id(tail: u8) -> Auid {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x06;
        bytes[15] = tail;
        Auid::Ul(Ul::new(bytes))
    }

    fn class_in(namespace: Url, tail: u8, symbol: &str, parent: Option<Auid>) -> Definition {
        Definition::new(
            DefinitionInfo::new(id(tail), symbol, namespace),
            DefinitionPayload::Class {
                parent_class: parent,
                is_concrete: true,
            },
        )
    }

    #[test]
    fn test_add_definition_routes_by_namespace() {
        let mut group = MetaDictionaryGroup::new();
        group.add_definition(class_in(ns(1), 1, "A", None)).unwrap();
        group.add_definition(class_in(ns(2), 2, "B", None)).unwrap();
        group.add_definition(class_in(ns(1), 3, "C", None)).unwrap();

        assert_eq!(group.len(), 2);
        assert_eq!(group.dictionary(&ns(1)).map(MetaDictionary::len), Some(2));
        assert_eq!(group.dictionary(&ns(2)).map(MetaDictionary::len), Some(1));
    }

    #[test]
    fn test_duplicate_namespace_is_rejected() {
        let mut group = MetaDictionaryGroup::new();
        group.add_dictionary(MetaDictionary::new(ns(1))).unwrap();
        let err = group.add_dictionary(MetaDictionary::new(ns(1))).unwrap_err();
        assert_eq!(err, DictionaryError::DuplicateDictionary(ns(1)));
    }

    #[test]
    fn test_resolution_visits_dictionaries_in_join_order() {
        // The same identification can appear in two namespaces; the
        // dictionary that joined first answers.
        let mut group = MetaDictionaryGroup::new();
        group.add_definition(class_in(ns(1), 1, "First", None)).unwrap();
        group.add_definition(class_in(ns(2), 1, "Second", None)).unwrap();

        assert_eq!(group.definition(id(1)).map(Definition::symbol), Some("First"));
    }

    #[test]
    fn test_unknown_identification_resolves_to_none() {
        let mut group = MetaDictionaryGroup::new();
        group.add_definition(class_in(ns(1), 1, "A", None)).unwrap();
        assert!(group.definition(id(9)).is_none());
    }

    #[test]
    fn test_hierarchy_unions_span_dictionaries() {
        let mut group = MetaDictionaryGroup::new();
        group.add_definition(class_in(ns(1), 1, "Base", None)).unwrap();
        group.add_definition(class_in(ns(1), 2, "Derived", Some(id(1)))).unwrap();
        group.add_definition(class_in(ns(2), 3, "Extension", Some(id(1)))).unwrap();

        let base = group.definition(id(1)).unwrap().clone();
        assert_eq!(group.subclasses_of(&base), Some(vec![id(2), id(3)]));

        // Nothing is indexed for the leaf class; the union is empty,
        // not absent.
        let derived = group.definition(id(2)).unwrap().clone();
        assert_eq!(group.subclasses_of(&derived), Some(vec![]));
        assert_eq!(group.members_of(&derived), Some(vec![]));
    }
}
