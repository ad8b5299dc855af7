//! Register entry model: entries, facets, kinds and qualifiers.

use std::fmt;

use smol_str::SmolStr;
use url::Url;

use crate::base::Ul;

/// Structural role of a register entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EntryKind {
    /// Grouping node of the register tree; carries no type semantics
    /// and never receives facets.
    Node,
    /// Concrete type definition.
    Leaf,
}

/// Type-system kind of a leaf entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKind {
    Integer,
    Rename,
    Record,
    FixedArray,
    VariableArray,
    String,
    Character,
    Enumeration,
    Set,
    Stream,
    Indirect,
    Opaque,
    StrongReference,
    WeakReference,
}

impl TypeKind {
    /// Canonical kind name, as written in documents.
    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Integer => "Integer",
            TypeKind::Rename => "Rename",
            TypeKind::Record => "Record",
            TypeKind::FixedArray => "FixedArray",
            TypeKind::VariableArray => "VariableArray",
            TypeKind::String => "String",
            TypeKind::Character => "Character",
            TypeKind::Enumeration => "Enumeration",
            TypeKind::Set => "Set",
            TypeKind::Stream => "Stream",
            TypeKind::Indirect => "Indirect",
            TypeKind::Opaque => "Opaque",
            TypeKind::StrongReference => "StrongReference",
            TypeKind::WeakReference => "WeakReference",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Representation qualifiers of a leaf entry.
    ///
    /// Construction rules only ever add qualifiers; an empty set means
    /// the kind carries no extra representation constraints.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeQualifiers: u8 {
        /// Signed numeric representation.
        const SIGNED = 1 << 0;
        /// Numeric value semantics.
        const NUMERIC = 1 << 1;
        /// Element order is significant.
        const ORDERED = 1 << 2;
        /// Element size is implied by the element type.
        const SIZE_IMPLICIT = 1 << 3;
        /// Element count is implied by the encoded length.
        const COUNT_IMPLICIT = 1 << 4;
        /// Elements are addressed by identity rather than position.
        const IDENTIFIED = 1 << 5;
    }
}

/// Child row of a record or enumeration entry.
///
/// For records a facet is one field (`facet_type` set); for
/// enumerations it is one enumerant (`value` set). Facet order is the
/// row order of the source table and is semantically significant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Facet {
    pub symbol: Option<SmolStr>,
    pub name: Option<String>,
    pub definition: Option<String>,
    pub applications: Option<String>,
    pub notes: Option<String>,
    pub deprecated: bool,
    /// Field type of a record member.
    pub facet_type: Option<Ul>,
    /// Enumerant value; for identifier-valued enumerations this is the
    /// URN text of the row identifier.
    pub value: Option<String>,
}

/// One register entry, keyed by universal label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeEntry {
    pub ul: Ul,
    pub kind: EntryKind,
    /// Set exactly for leaf entries.
    pub type_kind: Option<TypeKind>,
    /// Element, alias, referent or enumeration base type.
    pub base_type: Option<Ul>,
    /// Width for integers and characters, element count for fixed
    /// arrays; 0 where the size is implicit or variable.
    pub type_size: u64,
    pub qualifiers: TypeQualifiers,
    pub symbol: Option<SmolStr>,
    pub name: Option<String>,
    pub definition: Option<String>,
    pub applications: Option<String>,
    pub notes: Option<String>,
    pub defining_document: Option<String>,
    pub deprecated: bool,
    /// Owning dictionary namespace; absent after a tolerated
    /// malformed-namespace row.
    pub namespace: Option<Url>,
    pub facets: Vec<Facet>,
}

impl TypeEntry {
    /// Create a leaf entry with empty metadata.
    pub fn new(ul: Ul) -> Self {
        Self {
            ul,
            kind: EntryKind::Leaf,
            type_kind: None,
            base_type: None,
            type_size: 0,
            qualifiers: TypeQualifiers::empty(),
            symbol: None,
            name: None,
            definition: None,
            applications: None,
            notes: None,
            defining_document: None,
            deprecated: false,
            namespace: None,
            facets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ul() -> Ul {
        Ul::new([
            0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ])
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = TypeEntry::new(sample_ul());
        assert_eq!(entry.kind, EntryKind::Leaf);
        assert_eq!(entry.type_kind, None);
        assert_eq!(entry.type_size, 0);
        assert_eq!(entry.qualifiers, TypeQualifiers::empty());
        assert!(entry.facets.is_empty());
        assert!(!entry.deprecated);
    }

    #[test]
    fn test_qualifiers_compose() {
        let quals = TypeQualifiers::SIGNED | TypeQualifiers::NUMERIC;
        assert!(quals.contains(TypeQualifiers::SIGNED));
        assert!(quals.contains(TypeQualifiers::NUMERIC));
        assert!(!quals.contains(TypeQualifiers::ORDERED));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TypeKind::FixedArray.name(), "FixedArray");
        assert_eq!(TypeKind::StrongReference.to_string(), "StrongReference");
    }
}
