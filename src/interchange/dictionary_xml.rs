//! Writing metadictionaries as XML documents.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::base::Auid;
use crate::dict::{Definition, DefinitionPayload, MetaDictionary};

use super::{bool_element, optional_element, text_element};

/// Write `dictionary` as an XML document to `out`.
///
/// The root element carries the dictionary's scheme URI as default
/// xmlns, so documents from different dictionaries never collide.
/// Definitions appear in insertion order under their kind name.
pub fn write_dictionary<W: io::Write>(dictionary: &MetaDictionary, out: W) -> io::Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("MetaDictionary");
    root.push_attribute(("xmlns", dictionary.scheme_uri().as_str()));
    writer.write_event(Event::Start(root))?;

    text_element(&mut writer, "SchemeURI", dictionary.scheme_uri().as_str())?;

    writer.write_event(Event::Start(BytesStart::new("Definitions")))?;
    for definition in dictionary.definitions() {
        write_definition(&mut writer, definition)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Definitions")))?;

    writer.write_event(Event::End(BytesEnd::new("MetaDictionary")))
}

/// File name a dictionary document is conventionally written under:
/// authority and path of the scheme URI with every character outside
/// ASCII alphanumerics replaced by `-`, suffixed `.xml`.
pub fn dictionary_file_name(dictionary: &MetaDictionary) -> String {
    let uri = dictionary.scheme_uri();
    let mut name: String = format!("{}{}", uri.authority(), uri.path())
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    name.push_str(".xml");
    name
}

fn write_definition<W: io::Write>(writer: &mut Writer<W>, definition: &Definition) -> io::Result<()> {
    let element = definition.payload.kind_name();
    writer.write_event(Event::Start(BytesStart::new(element)))?;

    text_element(writer, "Identification", &definition.identification().to_string())?;
    text_element(writer, "Symbol", definition.symbol())?;
    optional_element(writer, "Name", definition.info.name.as_deref())?;
    optional_element(writer, "Description", definition.info.description.as_deref())?;
    write_payload(writer, &definition.payload)?;

    writer.write_event(Event::End(BytesEnd::new(element)))
}

fn write_payload<W: io::Write>(writer: &mut Writer<W>, payload: &DefinitionPayload) -> io::Result<()> {
    match payload {
        DefinitionPayload::Class {
            parent_class,
            is_concrete,
        } => {
            bool_element(writer, "IsConcrete", *is_concrete)?;
            auid_element(writer, "ParentClass", *parent_class)?;
        }
        DefinitionPayload::Property {
            member_of,
            property_type,
            is_optional,
            is_unique_identifier,
            local_identification,
        } => {
            text_element(writer, "Type", &property_type.to_string())?;
            bool_element(writer, "IsOptional", *is_optional)?;
            bool_element(writer, "IsUniqueIdentifier", *is_unique_identifier)?;
            auid_element(writer, "MemberOf", *member_of)?;
            if let Some(local) = local_identification {
                text_element(writer, "LocalIdentification", &local.to_string())?;
            }
        }
        DefinitionPayload::Integer { size, is_signed } => {
            text_element(writer, "Size", &size.to_string())?;
            bool_element(writer, "IsSigned", *is_signed)?;
        }
        DefinitionPayload::Rename { renamed_type } => {
            text_element(writer, "RenamedType", &renamed_type.to_string())?;
        }
        DefinitionPayload::Record { members } => {
            writer.write_event(Event::Start(BytesStart::new("Members")))?;
            for member in members {
                writer.write_event(Event::Start(BytesStart::new("Member")))?;
                text_element(writer, "Name", &member.name)?;
                text_element(writer, "Type", &member.member_type.to_string())?;
                writer.write_event(Event::End(BytesEnd::new("Member")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Members")))?;
        }
        DefinitionPayload::FixedArray {
            element_type,
            element_count,
        } => {
            text_element(writer, "ElementType", &element_type.to_string())?;
            text_element(writer, "ElementCount", &element_count.to_string())?;
        }
        DefinitionPayload::VariableArray { element_type }
        | DefinitionPayload::String { element_type } => {
            text_element(writer, "ElementType", &element_type.to_string())?;
        }
        DefinitionPayload::Enumeration {
            element_type,
            elements,
        } => {
            text_element(writer, "ElementType", &element_type.to_string())?;
            writer.write_event(Event::Start(BytesStart::new("Elements")))?;
            for element in elements {
                writer.write_event(Event::Start(BytesStart::new("Element")))?;
                text_element(writer, "Name", &element.name)?;
                text_element(writer, "Value", &element.value)?;
                optional_element(writer, "Description", element.description.as_deref())?;
                writer.write_event(Event::End(BytesEnd::new("Element")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Elements")))?;
        }
        DefinitionPayload::ExtendibleEnumeration { elements } => {
            writer.write_event(Event::Start(BytesStart::new("Elements")))?;
            for element in elements {
                writer.write_event(Event::Start(BytesStart::new("Element")))?;
                text_element(writer, "Value", &element.value.to_string())?;
                optional_element(writer, "Description", element.description.as_deref())?;
                writer.write_event(Event::End(BytesEnd::new("Element")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Elements")))?;
        }
        DefinitionPayload::Set { element_type } => {
            auid_element(writer, "ElementType", *element_type)?;
        }
        DefinitionPayload::StrongReference { referenced_type }
        | DefinitionPayload::WeakReference { referenced_type } => {
            auid_element(writer, "ReferencedType", *referenced_type)?;
        }
        DefinitionPayload::Character
        | DefinitionPayload::Stream
        | DefinitionPayload::Indirect
        | DefinitionPayload::Opaque => {}
    }
    Ok(())
}

fn auid_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    id: Option<Auid>,
) -> io::Result<()> {
    match id {
        Some(id) => text_element(writer, name, &id.to_string()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Ul;
    use crate::dict::DefinitionInfo;
    use url::Url;

    fn scheme() -> Url {
        Url::parse("http://www.smpte-ra.org/reg/2003/2012").unwrap()
    }

    fn id(tail: u8) -> Auid {
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&[0x06, 0x0e, 0x2b, 0x34]);
        bytes[15] = tail;
        Auid::Ul(Ul::new(bytes))
    }

    fn render(dictionary: &MetaDictionary) -> String {
        let mut buffer = Vec::new();
        write_dictionary(dictionary, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_namespace_scoped_root() {
        let mut dictionary = MetaDictionary::new(scheme());
        dictionary
            .add(Definition::new(
                DefinitionInfo::new(id(1), "UInt32", scheme()),
                DefinitionPayload::Integer {
                    size: 4,
                    is_signed: false,
                },
            ))
            .unwrap();

        let doc = render(&dictionary);
        assert!(doc.contains("<MetaDictionary xmlns=\"http://www.smpte-ra.org/reg/2003/2012\">"));
        assert!(doc.contains("<SchemeURI>http://www.smpte-ra.org/reg/2003/2012</SchemeURI>"));
        assert!(doc.contains("<IntegerTypeDefinition>"));
        assert!(doc.contains("<Symbol>UInt32</Symbol>"));
        assert!(doc.contains("<Size>4</Size>"));
        assert!(doc.contains("<IsSigned>false</IsSigned>"));
    }

    #[test]
    fn test_definitions_in_insertion_order() {
        let mut dictionary = MetaDictionary::new(scheme());
        dictionary
            .add(Definition::new(
                DefinitionInfo::new(id(2), "Second", scheme()),
                DefinitionPayload::Stream,
            ))
            .unwrap();
        dictionary
            .add(Definition::new(
                DefinitionInfo::new(id(1), "First", scheme()),
                DefinitionPayload::Indirect,
            ))
            .unwrap();

        let doc = render(&dictionary);
        let second = doc.find("<Symbol>Second</Symbol>").unwrap();
        let first = doc.find("<Symbol>First</Symbol>").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_absent_set_element_type_is_omitted() {
        let mut dictionary = MetaDictionary::new(scheme());
        dictionary
            .add(Definition::new(
                DefinitionInfo::new(id(3), "LooseSet", scheme()),
                DefinitionPayload::Set { element_type: None },
            ))
            .unwrap();

        let doc = render(&dictionary);
        assert!(doc.contains("<SetTypeDefinition>"));
        assert!(!doc.contains("<ElementType>"));
    }

    #[test]
    fn test_dictionary_file_name() {
        let dictionary = MetaDictionary::new(scheme());
        assert_eq!(
            dictionary_file_name(&dictionary),
            "www-smpte-ra-org-reg-2003-2012.xml"
        );

        let with_port =
            MetaDictionary::new(Url::parse("http://localhost:8080/reg/custom").unwrap());
        assert_eq!(dictionary_file_name(&with_port), "localhost-8080-reg-custom.xml");
    }
}
