//! Writing a types register as one XML document.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use url::Url;

use crate::register::{EntryKind, Facet, SMPTE_NAMESPACE, TypeEntry, TypeQualifiers, TypesRegister};

use super::{bool_element, optional_element, text_element};

/// Write `register` as an XML document to `out`.
///
/// The root carries the SMPTE register namespace as default xmlns and
/// entries appear in registry order, so the same register always
/// produces the same document.
pub fn write_register<W: io::Write>(register: &TypesRegister, out: W) -> io::Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("TypesRegister");
    root.push_attribute(("xmlns", SMPTE_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("Entries")))?;
    for entry in register.entries() {
        write_entry(&mut writer, entry)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Entries")))?;

    writer.write_event(Event::End(BytesEnd::new("TypesRegister")))
}

fn write_entry<W: io::Write>(writer: &mut Writer<W>, entry: &TypeEntry) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Entry")))?;

    text_element(writer, "UL", &entry.ul.to_string())?;
    let kind = match entry.kind {
        EntryKind::Node => "NODE",
        EntryKind::Leaf => "LEAF",
    };
    text_element(writer, "Kind", kind)?;
    optional_element(writer, "Symbol", entry.symbol.as_deref())?;
    optional_element(writer, "Name", entry.name.as_deref())?;
    optional_element(writer, "Definition", entry.definition.as_deref())?;
    optional_element(writer, "Applications", entry.applications.as_deref())?;
    optional_element(writer, "Notes", entry.notes.as_deref())?;
    optional_element(writer, "DefiningDocument", entry.defining_document.as_deref())?;
    bool_element(writer, "IsDeprecated", entry.deprecated)?;
    optional_element(writer, "NamespaceName", entry.namespace.as_ref().map(Url::as_str))?;

    if let Some(type_kind) = entry.type_kind {
        text_element(writer, "TypeKind", type_kind.name())?;
    }
    if let Some(base) = entry.base_type {
        text_element(writer, "BaseType", &base.to_string())?;
    }
    if entry.type_size != 0 {
        text_element(writer, "TypeSize", &entry.type_size.to_string())?;
    }
    if !entry.qualifiers.is_empty() {
        text_element(writer, "TypeQualifiers", &qualifier_tokens(entry.qualifiers))?;
    }

    if !entry.facets.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Facets")))?;
        for facet in &entry.facets {
            write_facet(writer, facet)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Facets")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Entry")))
}

fn write_facet<W: io::Write>(writer: &mut Writer<W>, facet: &Facet) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Facet")))?;
    optional_element(writer, "Symbol", facet.symbol.as_deref())?;
    optional_element(writer, "Name", facet.name.as_deref())?;
    optional_element(writer, "Definition", facet.definition.as_deref())?;
    optional_element(writer, "Applications", facet.applications.as_deref())?;
    optional_element(writer, "Notes", facet.notes.as_deref())?;
    bool_element(writer, "IsDeprecated", facet.deprecated)?;
    if let Some(facet_type) = facet.facet_type {
        text_element(writer, "Type", &facet_type.to_string())?;
    }
    optional_element(writer, "Value", facet.value.as_deref())?;
    writer.write_event(Event::End(BytesEnd::new("Facet")))
}

/// Space-separated qualifier tokens, in declaration order.
fn qualifier_tokens(qualifiers: TypeQualifiers) -> String {
    const TOKENS: [(TypeQualifiers, &str); 6] = [
        (TypeQualifiers::SIGNED, "isSigned"),
        (TypeQualifiers::NUMERIC, "isNumeric"),
        (TypeQualifiers::ORDERED, "isOrdered"),
        (TypeQualifiers::SIZE_IMPLICIT, "isSizeImplicit"),
        (TypeQualifiers::COUNT_IMPLICIT, "isCountImplicit"),
        (TypeQualifiers::IDENTIFIED, "isIdentified"),
    ];

    let mut out = String::new();
    for (flag, token) in TOKENS {
        if qualifiers.contains(flag) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
    }
    out
}
