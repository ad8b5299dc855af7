//! XML documents written from imported registers and dictionaries.
//!
//! Drives the pipeline end to end: rows into a register, the register
//! into dictionaries, both out as XML. Documents are checked by shape
//! rather than byte-for-byte, but ordering assertions pin the
//! deterministic output contract.
#![cfg(feature = "interchange")]

use regml::base::Ul;
use regml::dict::{MetaDictionary, from_types_register};
use regml::interchange::{dictionary_file_name, write_dictionary, write_register};
use regml::register::{Row, SMPTE_NAMESPACE, TypesRegister};
use url::Url;

const UINT8: &str = "06.0E.2B.34.01.04.01.01.01.01.01.01.00.00.00.00";
const RATIONAL: &str = "06.0E.2B.34.01.04.01.01.03.01.01.00.00.00.00.00";

fn sample_register() -> TypesRegister {
    let rows = vec![
        Row::from_fields([
            "_rxi", "n:urn", "n:node", "n:kind", "n:qualif", "n:sym", "n:name", "n:deprecated",
            "n:type_urn",
        ]),
        Row::from_fields(["", UINT8, "Leaf", "integer", "1", "UInt8", "Unsigned 8-bit", "No", ""]),
        Row::from_fields(["", RATIONAL, "Leaf", "record", "", "Rational", "Rational", "No", ""]),
        Row::from_fields([
            "",
            "",
            "Link",
            "",
            "",
            "Numerator",
            "Numerator",
            "No",
            &Ul::from_dot_value(UINT8).unwrap().to_string(),
        ]),
    ];
    TypesRegister::from_rows(rows).unwrap()
}

fn register_document(register: &TypesRegister) -> String {
    let mut buffer = Vec::new();
    write_register(register, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

fn dictionary_document(dictionary: &MetaDictionary) -> String {
    let mut buffer = Vec::new();
    write_dictionary(dictionary, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_register_document_shape() {
    let doc = register_document(&sample_register());

    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(doc.contains(&format!("<TypesRegister xmlns=\"{SMPTE_NAMESPACE}\">")));
    assert!(doc.contains("<Symbol>UInt8</Symbol>"));
    assert!(doc.contains("<TypeQualifiers>isNumeric</TypeQualifiers>"));
    assert!(doc.contains("<Facet>"));
    assert!(doc.ends_with("</TypesRegister>"));
}

#[test]
fn test_register_document_preserves_entry_order() {
    let doc = register_document(&sample_register());
    let seed = doc.find("StrongReferenceNameValue").unwrap();
    let uint8 = doc.find("<Symbol>UInt8</Symbol>").unwrap();
    let rational = doc.find("<Symbol>Rational</Symbol>").unwrap();
    assert!(seed < uint8, "the seeded entry was registered first");
    assert!(uint8 < rational);
}

#[test]
fn test_dictionary_document_is_namespace_scoped() {
    let group = from_types_register(&sample_register()).unwrap();
    let base = group
        .dictionary(&Url::parse(SMPTE_NAMESPACE).unwrap())
        .unwrap();
    let doc = dictionary_document(base);

    assert!(doc.contains(&format!("<MetaDictionary xmlns=\"{SMPTE_NAMESPACE}\">")));
    assert!(doc.contains(&format!("<SchemeURI>{SMPTE_NAMESPACE}</SchemeURI>")));
    assert!(doc.contains("<IntegerTypeDefinition>"));
    assert!(doc.contains("<RecordTypeDefinition>"));
    assert!(doc.contains("<Member>"));
    assert!(doc.contains("<Name>Numerator</Name>"));
    assert!(
        doc.contains("<Identification>urn:smpte:ul:060e2b34.01040101.01010101.00000000</Identification>"),
        "identifications are written in URN form"
    );
}

#[test]
fn test_dictionary_file_names_flatten_the_scheme_uri() {
    let base = MetaDictionary::new(Url::parse(SMPTE_NAMESPACE).unwrap());
    assert_eq!(dictionary_file_name(&base), "www-smpte-ra-org-reg-2003-2012.xml");

    let derived = MetaDictionary::new(Url::parse(&format!("{SMPTE_NAMESPACE}/16/2")).unwrap());
    assert_eq!(
        dictionary_file_name(&derived),
        "www-smpte-ra-org-reg-2003-2012-16-2.xml"
    );
}
