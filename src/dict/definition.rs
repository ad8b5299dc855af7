//! Dictionary definitions.
//!
//! A definition is the dictionary-side image of a register entry: the
//! common identification fields plus a kinded payload. Classes and
//! properties come from class registers, the type payloads from the
//! types register.

use smol_str::SmolStr;
use url::Url;

use crate::base::{Auid, Ul};

/// Fields every definition carries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefinitionInfo {
    pub identification: Auid,
    pub symbol: SmolStr,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Namespace of the owning dictionary.
    pub namespace: Url,
}

impl DefinitionInfo {
    pub fn new(
        identification: impl Into<Auid>,
        symbol: impl Into<SmolStr>,
        namespace: Url,
    ) -> Self {
        Self {
            identification: identification.into(),
            symbol: symbol.into(),
            name: None,
            description: None,
            namespace,
        }
    }
}

/// One field of a record type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordMember {
    pub name: SmolStr,
    pub member_type: Auid,
}

/// One enumerant of an enumeration type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumerationElement {
    pub name: SmolStr,
    pub value: String,
    pub description: Option<String>,
}

/// One registered value of an extendible enumeration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendibleEnumerationElement {
    pub value: Ul,
    pub description: Option<String>,
}

/// Kind-specific payload of a definition.
///
/// `Set` elements and reference targets may be absent, mirroring the
/// tolerated register anomalies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DefinitionPayload {
    Class {
        parent_class: Option<Auid>,
        is_concrete: bool,
    },
    Property {
        member_of: Option<Auid>,
        property_type: Auid,
        is_optional: bool,
        is_unique_identifier: bool,
        local_identification: Option<u16>,
    },
    Integer {
        size: u64,
        is_signed: bool,
    },
    Rename {
        renamed_type: Auid,
    },
    Record {
        members: Vec<RecordMember>,
    },
    FixedArray {
        element_type: Auid,
        element_count: u64,
    },
    VariableArray {
        element_type: Auid,
    },
    String {
        element_type: Auid,
    },
    Character,
    Enumeration {
        element_type: Auid,
        elements: Vec<EnumerationElement>,
    },
    ExtendibleEnumeration {
        elements: Vec<ExtendibleEnumerationElement>,
    },
    Set {
        element_type: Option<Auid>,
    },
    Stream,
    Indirect,
    Opaque,
    StrongReference {
        referenced_type: Option<Auid>,
    },
    WeakReference {
        referenced_type: Option<Auid>,
    },
}

impl DefinitionPayload {
    /// Definition kind name, also the document element name.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            DefinitionPayload::Class { .. } => "ClassDefinition",
            DefinitionPayload::Property { .. } => "PropertyDefinition",
            DefinitionPayload::Integer { .. } => "IntegerTypeDefinition",
            DefinitionPayload::Rename { .. } => "RenameTypeDefinition",
            DefinitionPayload::Record { .. } => "RecordTypeDefinition",
            DefinitionPayload::FixedArray { .. } => "FixedArrayTypeDefinition",
            DefinitionPayload::VariableArray { .. } => "VariableArrayTypeDefinition",
            DefinitionPayload::String { .. } => "StringTypeDefinition",
            DefinitionPayload::Character => "CharacterTypeDefinition",
            DefinitionPayload::Enumeration { .. } => "EnumerationTypeDefinition",
            DefinitionPayload::ExtendibleEnumeration { .. } => {
                "ExtendibleEnumerationTypeDefinition"
            }
            DefinitionPayload::Set { .. } => "SetTypeDefinition",
            DefinitionPayload::Stream => "StreamTypeDefinition",
            DefinitionPayload::Indirect => "IndirectTypeDefinition",
            DefinitionPayload::Opaque => "OpaqueTypeDefinition",
            DefinitionPayload::StrongReference { .. } => "StrongReferenceTypeDefinition",
            DefinitionPayload::WeakReference { .. } => "WeakReferenceTypeDefinition",
        }
    }
}

/// A dictionary definition: common fields plus a kinded payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Definition {
    pub info: DefinitionInfo,
    pub payload: DefinitionPayload,
}

impl Definition {
    pub fn new(info: DefinitionInfo, payload: DefinitionPayload) -> Self {
        Self { info, payload }
    }

    #[inline]
    pub fn identification(&self) -> Auid {
        self.info.identification
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.info.symbol
    }

    #[inline]
    pub fn namespace(&self) -> &Url {
        &self.info.namespace
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        matches!(self.payload, DefinitionPayload::Class { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Url {
        Url::parse("http://example.com/reg").unwrap()
    }

    fn id(tail: u8) -> Auid {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x06;
        bytes[15] = tail;
        Auid::Ul(Ul::new(bytes))
    }

    #[test]
    fn test_definition_accessors() {
        let def = Definition::new(
            DefinitionInfo::new(id(1), "LengthType", ns()),
            DefinitionPayload::Integer {
                size: 8,
                is_signed: true,
            },
        );
        assert_eq!(def.identification(), id(1));
        assert_eq!(def.symbol(), "LengthType");
        assert_eq!(def.namespace(), &ns());
        assert!(!def.is_class());
    }

    #[test]
    fn test_kind_names() {
        let class = DefinitionPayload::Class {
            parent_class: None,
            is_concrete: true,
        };
        assert_eq!(class.kind_name(), "ClassDefinition");
        assert_eq!(
            DefinitionPayload::Set { element_type: None }.kind_name(),
            "SetTypeDefinition"
        );
        assert_eq!(DefinitionPayload::Character.kind_name(), "CharacterTypeDefinition");
    }
}
