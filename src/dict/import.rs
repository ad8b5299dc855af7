//! Building metadictionaries from an imported register.

use thiserror::Error;
use tracing::warn;

use crate::base::{Auid, Ul};
use crate::dict::definition::{
    Definition, DefinitionInfo, DefinitionPayload, EnumerationElement,
    ExtendibleEnumerationElement, RecordMember,
};
use crate::dict::dictionary::DictionaryError;
use crate::dict::group::MetaDictionaryGroup;
use crate::register::{AUID_TYPE, EntryKind, TypeEntry, TypeKind, TypeQualifiers, TypesRegister};

/// Errors converting a register into dictionaries.
#[derive(Debug, Error)]
pub enum FromRegisterError {
    /// A leaf entry carries no type kind.
    #[error("entry {0} has no type kind")]
    MissingTypeKind(Ul),

    /// A kind that requires an element or target type lacks one.
    #[error("entry {0} has no element type")]
    MissingElementType(Ul),

    /// A record field facet lacks a type.
    #[error("record field {symbol} of {parent} has no type")]
    MissingMemberType { parent: Ul, symbol: String },

    /// An identifier enumerant's stored value is not a label URN.
    #[error("enumerant value {value:?} of {parent} is not a label")]
    BadEnumerationValue { parent: Ul, value: String },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Convert every leaf entry of a register into a definition, routed to
/// its namespace's dictionary.
///
/// Node entries carry no type semantics and are skipped. Entries left
/// without a namespace by the tolerated malformed-namespace rule cannot
/// be routed anywhere and are skipped with a warning.
pub fn from_types_register(
    register: &TypesRegister,
) -> Result<MetaDictionaryGroup, FromRegisterError> {
    let mut group = MetaDictionaryGroup::new();
    for entry in register.entries() {
        if entry.kind == EntryKind::Node {
            continue;
        }
        let Some(namespace) = entry.namespace.clone() else {
            warn!(entry = %entry.ul, "skipping entry without a namespace");
            continue;
        };
        let payload = type_payload(entry)?;
        let mut info = DefinitionInfo::new(
            entry.ul,
            entry.symbol.clone().unwrap_or_default(),
            namespace,
        );
        info.name = entry.name.clone();
        info.description = entry.definition.clone();
        group.add_definition(Definition::new(info, payload))?;
    }
    Ok(group)
}

fn required_element(entry: &TypeEntry) -> Result<Auid, FromRegisterError> {
    entry
        .base_type
        .map(Auid::Ul)
        .ok_or(FromRegisterError::MissingElementType(entry.ul))
}

fn type_payload(entry: &TypeEntry) -> Result<DefinitionPayload, FromRegisterError> {
    let kind = entry
        .type_kind
        .ok_or(FromRegisterError::MissingTypeKind(entry.ul))?;
    Ok(match kind {
        TypeKind::Integer => DefinitionPayload::Integer {
            size: entry.type_size,
            is_signed: entry.qualifiers.contains(TypeQualifiers::SIGNED),
        },
        TypeKind::Rename => DefinitionPayload::Rename {
            renamed_type: required_element(entry)?,
        },
        TypeKind::Record => DefinitionPayload::Record {
            members: record_members(entry)?,
        },
        TypeKind::FixedArray => DefinitionPayload::FixedArray {
            element_type: required_element(entry)?,
            element_count: entry.type_size,
        },
        TypeKind::VariableArray => DefinitionPayload::VariableArray {
            element_type: required_element(entry)?,
        },
        TypeKind::String => DefinitionPayload::String {
            element_type: required_element(entry)?,
        },
        TypeKind::Character => DefinitionPayload::Character,
        TypeKind::Enumeration => {
            if entry.base_type == Some(AUID_TYPE) {
                DefinitionPayload::ExtendibleEnumeration {
                    elements: extendible_elements(entry)?,
                }
            } else {
                DefinitionPayload::Enumeration {
                    element_type: required_element(entry)?,
                    elements: enumeration_elements(entry),
                }
            }
        }
        // The tolerated weak set has no element type.
        TypeKind::Set => DefinitionPayload::Set {
            element_type: entry.base_type.map(Auid::Ul),
        },
        TypeKind::Stream => DefinitionPayload::Stream,
        TypeKind::Indirect => DefinitionPayload::Indirect,
        TypeKind::Opaque => DefinitionPayload::Opaque,
        TypeKind::StrongReference => DefinitionPayload::StrongReference {
            referenced_type: entry.base_type.map(Auid::Ul),
        },
        TypeKind::WeakReference => DefinitionPayload::WeakReference {
            referenced_type: entry.base_type.map(Auid::Ul),
        },
    })
}

fn record_members(entry: &TypeEntry) -> Result<Vec<RecordMember>, FromRegisterError> {
    entry
        .facets
        .iter()
        .map(|facet| {
            let member_type = facet.facet_type.map(Auid::Ul).ok_or_else(|| {
                FromRegisterError::MissingMemberType {
                    parent: entry.ul,
                    symbol: facet.symbol.clone().unwrap_or_default().into(),
                }
            })?;
            Ok(RecordMember {
                name: facet.symbol.clone().unwrap_or_default(),
                member_type,
            })
        })
        .collect()
}

fn enumeration_elements(entry: &TypeEntry) -> Vec<EnumerationElement> {
    entry
        .facets
        .iter()
        .map(|facet| EnumerationElement {
            name: facet.symbol.clone().unwrap_or_default(),
            value: facet.value.clone().unwrap_or_default(),
            description: facet.definition.clone(),
        })
        .collect()
}

fn extendible_elements(
    entry: &TypeEntry,
) -> Result<Vec<ExtendibleEnumerationElement>, FromRegisterError> {
    entry
        .facets
        .iter()
        .map(|facet| {
            let text = facet.value.as_deref().unwrap_or_default();
            let value =
                Ul::from_urn(text).ok_or_else(|| FromRegisterError::BadEnumerationValue {
                    parent: entry.ul,
                    value: text.to_owned(),
                })?;
            Ok(ExtendibleEnumerationElement {
                value,
                description: facet.definition.clone(),
            })
        })
        .collect()
}
