//! Row-driven register import.
//!
//! A register table arrives as a flat row sequence: one header row
//! naming the columns, administrative rows, entry rows and facet rows.
//! The importer walks the sequence once, in order. Facet rows attach to
//! the most recently opened leaf entry, which joins the register when
//! the next entry row opens or the input ends; element-type lookups
//! therefore see exactly the entries of earlier rows.
//!
//! Known data-quality anomalies of the published catalog are handled by
//! named rules rather than scattered conditions:
//!
//! - [`discarded_identifier`] - reserved-class and misregistered rows
//! - [`renamed_base_default`] - EIDRIdentifierType's missing target
//! - weak-set element lookup failures leave the base type absent
//! - weak-reference link rows are dropped, not treated as facets

use std::io;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::base::Ul;
use crate::register::entry::{EntryKind, Facet, TypeEntry, TypeKind, TypeQualifiers};
use crate::register::registry::{DuplicateEntryError, TypesRegister};
use crate::register::rows::Row;

// ============================================================================
// TABLE VOCABULARY
// ============================================================================

/// Base namespace of SMPTE-registered entries.
pub const SMPTE_NAMESPACE: &str = "http://www.smpte-ra.org/reg/2003/2012";

/// The register's AUID type. Enumerations based on it hold identifier
/// values rather than named numeric enumerants.
pub const AUID_TYPE: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x01, 0x03, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

/// EIDRIdentifierType, published as a rename without a target.
const EIDR_IDENTIFIER_TYPE: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x01, 0x20, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

/// CanonicalDOINameType, the type EIDRIdentifierType renames.
const CANONICAL_DOI_NAME_TYPE: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x01, 0x20, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

/// A UUID misregistered as a universal label.
const MISREGISTERED_UUID: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x04, 0x01, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

/// StrongReferenceNameValue, referenced by published record types but
/// missing from the table.
const NAME_VALUE_REFERENCE: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x05, 0x02, 0x29, 0x00, 0x00, 0x00, 0x00, 0x00,
]);

/// Referent of [`NAME_VALUE_REFERENCE`].
const NAME_VALUE_TARGET: Ul = Ul::new([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x7f, 0x01, 0x01, 0x0d, 0x01, 0x04, 0x01, 0x01, 0x1f, 0x01, 0x00,
]);

// Column names of the published types register table.
const COL_UL: &str = "n:urn";
const COL_NODE: &str = "n:node";
const COL_KIND: &str = "n:kind";
const COL_QUALIFIER: &str = "n:qualif";
const COL_TARGET: &str = "n:target_urn";
const COL_MIN_OCCURS: &str = "n:minOccurs";
const COL_VALUE: &str = "n:value";
const COL_SYMBOL: &str = "n:sym";
const COL_NAME: &str = "n:name";
const COL_DEFINITION: &str = "n:detail";
const COL_DEPRECATED: &str = "n:deprecated";
const COL_NAMESPACE: &str = "n:ns_uri";
const COL_DOCUMENT: &str = "n:docs";
const COL_APPLICATIONS: &str = "i:app";
const COL_NOTES: &str = "i:notes";
const COL_FACET_TYPE: &str = "n:type_urn";
const COL_ADMIN_URN: &str = "a:urn";

/// First field of the header row.
const HEADER_MARKER: &str = "_rxi";
/// First-field prefix of administrative rows.
const ADMIN_PREFIX: char = '_';
/// `n:node` value marking a facet row.
const LINK_MARKER: &str = "Link";
/// `n:node` value marking a grouping node.
const NODE_MARKER: &str = "Node";

// ============================================================================
// ERRORS
// ============================================================================

/// Errors that abort a register import.
///
/// Every error is fatal: no partial register escapes a failed build.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A mandatory column was missing or could not be parsed.
    #[error("malformed row for {subject}: {reason}")]
    MalformedRow { subject: String, reason: String },

    /// A required type reference did not resolve.
    #[error("unresolved reference for {subject}: {reason}")]
    UnresolvedReference { subject: String, reason: String },

    #[error(transparent)]
    Duplicate(#[from] DuplicateEntryError),

    /// The underlying table could not be decoded.
    #[error("failed to decode register table")]
    Csv(#[from] csv::Error),
}

impl ImportError {
    fn malformed(subject: impl ToString, reason: impl Into<String>) -> Self {
        ImportError::MalformedRow {
            subject: subject.to_string(),
            reason: reason.into(),
        }
    }

    fn unresolved(subject: impl ToString, reason: impl Into<String>) -> Self {
        ImportError::UnresolvedReference {
            subject: subject.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// NAMED ANOMALY RULES
// ============================================================================

/// Rows whose identifier falls in a reserved class (13 organizationally
/// registered, 14 company registered, 15 experimental), and the one
/// UUID misregistered as a label, do not become entries.
fn discarded_identifier(ul: Ul) -> bool {
    ul.is_class_13() || ul.is_class_14() || ul.is_class_15() || ul == MISREGISTERED_UUID
}

/// EIDRIdentifierType is published as a rename without a target; it
/// renames CanonicalDOINameType.
fn renamed_base_default(ul: Ul) -> Option<Ul> {
    (ul == EIDR_IDENTIFIER_TYPE).then_some(CANONICAL_DOI_NAME_TYPE)
}

/// Deprecated unless the column reads `No`.
fn deprecated_flag(field: Option<&str>) -> bool {
    !field.is_some_and(|v| v.eq_ignore_ascii_case("No"))
}

/// Target columns hold either URN or dotted-hex labels; anything else
/// reads as absent.
fn parse_type_reference(text: &str) -> Option<Ul> {
    Ul::from_urn(text).or_else(|| Ul::from_dot_value(text))
}

fn parse_count(field: Option<&str>, ul: Ul, column: &str) -> Result<u64, ImportError> {
    let text = field.ok_or_else(|| ImportError::malformed(ul, format!("missing {column}")))?;
    text.parse()
        .map_err(|_| ImportError::malformed(ul, format!("{column} is not a count: {text}")))
}

// ============================================================================
// IMPORTER
// ============================================================================

/// Outcome of rewriting a container symbol to its element symbol.
enum Rewrite {
    /// The symbol does not carry the container prefix.
    NotApplicable,
    /// The prefix matched but the element symbol is not registered.
    Missing(String),
    Found(Ul),
}

/// Row-loop state: the register accumulated so far, the header map and
/// the open leaf entry.
struct Importer {
    register: TypesRegister,
    /// Column name to index, captured from the most recent header row.
    columns: FxHashMap<SmolStr, usize>,
    /// Most recently opened leaf entry; facet rows attach here.
    open: Option<TypeEntry>,
    base_namespace: Url,
}

fn column_field<'r>(columns: &FxHashMap<SmolStr, usize>, row: &'r Row, column: &str) -> Option<&'r str> {
    columns.get(column).and_then(|&index| row.field(index))
}

impl Importer {
    fn new() -> Self {
        let base_namespace =
            Url::parse(SMPTE_NAMESPACE).expect("the base register namespace is a valid URI");
        let mut register = TypesRegister::new();
        register
            .add(name_value_reference_entry(&base_namespace))
            .expect("the seeded entry cannot collide in an empty register");
        Self {
            register,
            columns: FxHashMap::default(),
            open: None,
            base_namespace,
        }
    }

    fn field<'r>(&self, row: &'r Row, column: &str) -> Option<&'r str> {
        column_field(&self.columns, row, column)
    }

    fn owned(&self, row: &Row, column: &str) -> Option<String> {
        self.field(row, column).map(str::to_owned)
    }

    fn push_row(&mut self, row: &Row) -> Result<(), ImportError> {
        let first = row.field(0);
        if first.is_some_and(|f| f.eq_ignore_ascii_case(HEADER_MARKER)) {
            self.capture_header(row);
            return Ok(());
        }
        if first.is_some_and(|f| f.starts_with(ADMIN_PREFIX)) {
            return Ok(());
        }
        let is_link = self
            .field(row, COL_NODE)
            .is_some_and(|v| v.eq_ignore_ascii_case(LINK_MARKER));
        if is_link {
            if let Some(open) = self.open.as_mut() {
                return attach_facet(&self.columns, open, row);
            }
        }
        self.push_entry(row)
    }

    /// A header row resets the column map; every named field is
    /// captured and a repeated name keeps its last position.
    fn capture_header(&mut self, row: &Row) {
        self.columns.clear();
        for index in 0..row.len() {
            if let Some(name) = row.field(index) {
                self.columns.insert(SmolStr::new(name), index);
            }
        }
    }

    fn push_entry(&mut self, row: &Row) -> Result<(), ImportError> {
        let symbol = self.field(row, COL_SYMBOL);
        let Some(urn) = self.field(row, COL_UL) else {
            return Err(ImportError::malformed(
                symbol.unwrap_or("row without a symbol"),
                format!("missing {COL_UL}"),
            ));
        };
        let Some(ul) = Ul::from_dot_value(urn) else {
            return Err(ImportError::malformed(
                symbol.unwrap_or(urn),
                format!("{COL_UL} is not a dotted-hex label: {urn}"),
            ));
        };

        // Discarded rows also end the open entry: no facet may attach
        // across the gap.
        if discarded_identifier(ul) {
            debug!(entry = %ul, "discarding reserved identifier row");
            return self.close_open();
        }

        let mut entry = TypeEntry::new(ul);
        entry.symbol = symbol.map(SmolStr::new);
        entry.name = self.owned(row, COL_NAME);
        entry.definition = self.owned(row, COL_DEFINITION);
        entry.applications = self.owned(row, COL_APPLICATIONS);
        entry.notes = self.owned(row, COL_NOTES);
        entry.defining_document = self.owned(row, COL_DOCUMENT);
        entry.deprecated = deprecated_flag(self.field(row, COL_DEPRECATED));
        entry.namespace = self.namespace_for(row, ul);

        let is_node = self
            .field(row, COL_NODE)
            .is_some_and(|v| v.eq_ignore_ascii_case(NODE_MARKER));
        if is_node {
            entry.kind = EntryKind::Node;
            self.close_open()?;
            self.register.add(entry)?;
            return Ok(());
        }

        if self
            .field(row, COL_KIND)
            .is_some_and(|k| k.eq_ignore_ascii_case("formal"))
        {
            // Unsupported kind: the row vanishes and the open entry
            // keeps accepting facets.
            debug!(entry = %ul, "dropping formal type row");
            return Ok(());
        }

        self.close_open()?;
        self.leaf_semantics(&mut entry, row)?;
        self.open = Some(entry);
        Ok(())
    }

    /// Fill in kind, size, base type and qualifiers of a leaf entry.
    fn leaf_semantics(&self, entry: &mut TypeEntry, row: &Row) -> Result<(), ImportError> {
        let ul = entry.ul;
        let kind = self
            .field(row, COL_KIND)
            .ok_or_else(|| ImportError::malformed(ul, format!("missing {COL_KIND}")))?;
        let qualifier = self.field(row, COL_QUALIFIER);
        let target = self.field(row, COL_TARGET).and_then(parse_type_reference);

        match kind.to_ascii_lowercase().as_str() {
            "integer" => {
                entry.type_kind = Some(TypeKind::Integer);
                entry.type_size = parse_count(qualifier, ul, COL_QUALIFIER)?;
                entry.qualifiers |= TypeQualifiers::NUMERIC;
                if self.field(row, COL_VALUE) == Some("True") {
                    entry.qualifiers |= TypeQualifiers::SIGNED;
                }
                if target.is_some() {
                    return Err(ImportError::malformed(ul, "integer type carries a target type"));
                }
            }
            "rename" => {
                entry.type_kind = Some(TypeKind::Rename);
                let base = target
                    .or_else(|| renamed_base_default(ul))
                    .ok_or_else(|| ImportError::unresolved(ul, "rename without a target type"))?;
                entry.base_type = Some(base);
            }
            "record" => {
                entry.type_kind = Some(TypeKind::Record);
            }
            "array" => match qualifier {
                Some("fixed") => {
                    entry.type_kind = Some(TypeKind::FixedArray);
                    entry.type_size =
                        parse_count(self.field(row, COL_MIN_OCCURS), ul, COL_MIN_OCCURS)?;
                    entry.base_type = Some(target.ok_or_else(|| {
                        ImportError::unresolved(ul, "fixed array without an element type")
                    })?);
                    entry.qualifiers |= TypeQualifiers::SIZE_IMPLICIT
                        | TypeQualifiers::ORDERED
                        | TypeQualifiers::COUNT_IMPLICIT;
                }
                Some("varying") => {
                    entry.type_kind = Some(TypeKind::VariableArray);
                    entry.base_type = Some(target.ok_or_else(|| {
                        ImportError::unresolved(ul, "variable array without an element type")
                    })?);
                    entry.qualifiers |= TypeQualifiers::ORDERED;
                }
                Some("strong") => {
                    entry.type_kind = Some(TypeKind::VariableArray);
                    entry.qualifiers |= TypeQualifiers::ORDERED;
                    let base = self.vector_element(
                        entry,
                        target,
                        "StrongReferenceVector",
                        "StrongReference",
                    )?;
                    entry.base_type = Some(base);
                }
                Some("weak") => {
                    entry.type_kind = Some(TypeKind::VariableArray);
                    entry.qualifiers |= TypeQualifiers::ORDERED;
                    let base = self.vector_element(
                        entry,
                        target,
                        "WeakReferenceVector",
                        "WeakReference",
                    )?;
                    entry.base_type = Some(base);
                }
                other => {
                    return Err(ImportError::malformed(
                        ul,
                        format!("unknown array qualifier {other:?}"),
                    ));
                }
            },
            "character" => {
                entry.type_kind = Some(TypeKind::Character);
                entry.type_size = parse_count(qualifier, ul, COL_QUALIFIER)?;
            }
            "string" => {
                entry.type_kind = Some(TypeKind::String);
                entry.base_type = Some(target.ok_or_else(|| {
                    ImportError::unresolved(ul, "string without an element type")
                })?);
                entry.qualifiers |= TypeQualifiers::COUNT_IMPLICIT
                    | TypeQualifiers::ORDERED
                    | TypeQualifiers::SIZE_IMPLICIT;
            }
            "enumeration" => {
                entry.type_kind = Some(TypeKind::Enumeration);
                entry.base_type = Some(target.ok_or_else(|| {
                    ImportError::unresolved(ul, "enumeration without a base type")
                })?);
            }
            "extendible" => {
                entry.type_kind = Some(TypeKind::Enumeration);
                entry.base_type = Some(AUID_TYPE);
            }
            "set" => {
                entry.type_kind = Some(TypeKind::Set);
                entry.qualifiers |= TypeQualifiers::SIZE_IMPLICIT | TypeQualifiers::IDENTIFIED;
                entry.base_type = self.set_element(entry, target)?;
            }
            "stream" => {
                entry.type_kind = Some(TypeKind::Stream);
            }
            "indirect" => {
                entry.type_kind = Some(TypeKind::Indirect);
            }
            "opaque" => {
                entry.type_kind = Some(TypeKind::Opaque);
            }
            "reference" => {
                entry.type_kind = Some(match qualifier {
                    Some(q) if q.eq_ignore_ascii_case("strong") => TypeKind::StrongReference,
                    Some(q) if q.eq_ignore_ascii_case("weak") => TypeKind::WeakReference,
                    other => {
                        return Err(ImportError::malformed(
                            ul,
                            format!("unknown reference qualifier {other:?}"),
                        ));
                    }
                });
                // Published reference rows may omit the referent.
                entry.base_type = target;
            }
            other => {
                return Err(ImportError::malformed(ul, format!("unknown kind {other}")));
            }
        }
        Ok(())
    }

    /// Element type of a strong or weak reference vector: the target
    /// column when present, else the container symbol rewritten to its
    /// element symbol and resolved against earlier rows.
    fn vector_element(
        &self,
        entry: &TypeEntry,
        target: Option<Ul>,
        prefix: &str,
        replacement: &str,
    ) -> Result<Ul, ImportError> {
        if let Some(target) = target {
            return Ok(target);
        }
        match self.rewrite_lookup(entry, prefix, replacement) {
            Rewrite::Found(ul) => Ok(ul),
            Rewrite::Missing(element) => Err(ImportError::unresolved(
                entry.ul,
                format!("element type {element} is not registered"),
            )),
            Rewrite::NotApplicable => Err(ImportError::unresolved(
                entry.ul,
                "reference vector without an element type",
            )),
        }
    }

    /// Element type of a set row: the target column when present, else
    /// the container symbol rewritten to its element symbol. A strong
    /// set whose element is unregistered is an error; the weak set
    /// published before its element type is tolerated without a base.
    fn set_element(&self, entry: &TypeEntry, target: Option<Ul>) -> Result<Option<Ul>, ImportError> {
        if target.is_some() {
            return Ok(target);
        }
        match self.rewrite_lookup(entry, "StrongReferenceSet", "StrongReference") {
            Rewrite::Found(ul) => return Ok(Some(ul)),
            Rewrite::Missing(element) => {
                return Err(ImportError::unresolved(
                    entry.ul,
                    format!("element type {element} is not registered"),
                ));
            }
            Rewrite::NotApplicable => {}
        }
        match self.rewrite_lookup(entry, "WeakReferenceSet", "WeakReference") {
            Rewrite::Found(ul) => Ok(Some(ul)),
            Rewrite::Missing(element) => {
                debug!(entry = %entry.ul, element, "weak set element is not registered, base type left absent");
                Ok(None)
            }
            Rewrite::NotApplicable => Err(ImportError::unresolved(
                entry.ul,
                "set without an element type",
            )),
        }
    }

    fn rewrite_lookup(&self, entry: &TypeEntry, prefix: &str, replacement: &str) -> Rewrite {
        let Some(rest) = entry.symbol.as_deref().and_then(|s| s.strip_prefix(prefix)) else {
            return Rewrite::NotApplicable;
        };
        let element = format!("{replacement}{rest}");
        match self.register.entry_by_symbol(&element, entry.namespace.as_ref()) {
            Some(found) => Rewrite::Found(found.ul),
            None => Rewrite::Missing(element),
        }
    }

    /// Owning namespace of an entry: the explicit `n:ns_uri` column
    /// when present (a malformed URI degrades to no namespace at all),
    /// the base namespace for labels whose octet 8 is 12 or less, and a
    /// class-derived extension of the base namespace otherwise.
    fn namespace_for(&self, row: &Row, ul: Ul) -> Option<Url> {
        if let Some(explicit) = self.field(row, COL_NAMESPACE) {
            return match Url::parse(explicit) {
                Ok(url) => Some(url),
                Err(error) => {
                    warn!(entry = %ul, uri = explicit, %error, "ignoring malformed namespace URI");
                    None
                }
            };
        }
        if ul.octet(8) <= 12 {
            Some(self.base_namespace.clone())
        } else {
            let derived = format!("{SMPTE_NAMESPACE}/{}/{}", ul.octet(8), ul.octet(9));
            Some(Url::parse(&derived).expect("class-derived namespaces are valid URIs"))
        }
    }

    /// Move the open entry into the register.
    fn close_open(&mut self) -> Result<(), ImportError> {
        if let Some(entry) = self.open.take() {
            self.register.add(entry)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<TypesRegister, ImportError> {
        self.close_open()?;
        Ok(self.register)
    }
}

/// Attach a facet row to the open entry.
fn attach_facet(
    columns: &FxHashMap<SmolStr, usize>,
    open: &mut TypeEntry,
    row: &Row,
) -> Result<(), ImportError> {
    let field = |column: &str| column_field(columns, row, column);
    let mut facet = Facet {
        applications: field(COL_APPLICATIONS).map(str::to_owned),
        notes: field(COL_NOTES).map(str::to_owned),
        definition: field(COL_DEFINITION).map(str::to_owned),
        deprecated: deprecated_flag(field(COL_DEPRECATED)),
        ..Facet::default()
    };

    match open.type_kind {
        Some(TypeKind::Record) => {
            facet.symbol = field(COL_SYMBOL).map(SmolStr::new);
            facet.name = field(COL_NAME).map(str::to_owned);
            let facet_type = field(COL_FACET_TYPE).and_then(Ul::from_urn).ok_or_else(|| {
                let subject = field(COL_ADMIN_URN)
                    .or(field(COL_SYMBOL))
                    .map(str::to_owned)
                    .unwrap_or_else(|| open.ul.to_string());
                ImportError::malformed(
                    subject,
                    format!("record field without a parsable {COL_FACET_TYPE}"),
                )
            })?;
            facet.facet_type = Some(facet_type);
        }
        Some(TypeKind::Enumeration) => {
            if open.base_type == Some(AUID_TYPE) {
                // Identifier-valued enumerants carry nothing but the
                // row identifier, stored in URN form.
                let value = field(COL_UL).and_then(Ul::from_dot_value).ok_or_else(|| {
                    ImportError::malformed(
                        open.ul,
                        format!("identifier enumerant without a parsable {COL_UL}"),
                    )
                })?;
                facet.value = Some(value.to_string());
            } else {
                facet.symbol = field(COL_SYMBOL).map(SmolStr::new);
                facet.name = field(COL_NAME).map(str::to_owned);
                facet.value = field(COL_VALUE).map(str::to_owned);
            }
        }
        Some(TypeKind::WeakReference) => {
            // The catalog encodes weak-reference target paths as extra
            // link rows; they are not facets and vanish here.
            debug!(entry = %open.ul, "dropping weak reference link row");
            return Ok(());
        }
        kind => {
            let described = kind.map_or("an entry without a kind".to_owned(), |k| {
                format!("a {k} entry")
            });
            return Err(ImportError::malformed(
                open.ul,
                format!("facet row attached to {described}"),
            ));
        }
    }

    open.facets.push(facet);
    Ok(())
}

/// StrongReferenceNameValue is referenced by published record types but
/// absent from the table; every import starts with it registered.
fn name_value_reference_entry(namespace: &Url) -> TypeEntry {
    let mut entry = TypeEntry::new(NAME_VALUE_REFERENCE);
    entry.kind = EntryKind::Leaf;
    entry.type_kind = Some(TypeKind::StrongReference);
    entry.base_type = Some(NAME_VALUE_TARGET);
    entry.symbol = Some(SmolStr::new("StrongReferenceNameValue"));
    entry.name = Some("StrongReferenceNameValue".to_owned());
    entry.deprecated = false;
    entry.namespace = Some(namespace.clone());
    entry
}

// ============================================================================
// PUBLIC CONSTRUCTORS
// ============================================================================

impl TypesRegister {
    /// Build a register from decoded rows.
    pub fn from_rows<I>(rows: I) -> Result<TypesRegister, ImportError>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut importer = Importer::new();
        for row in rows {
            importer.push_row(&row)?;
        }
        importer.finish()
    }

    /// Build a register from CSV text, the form in which register
    /// tables are published.
    pub fn from_csv<R: io::Read>(reader: R) -> Result<TypesRegister, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut importer = Importer::new();
        for record in reader.records() {
            importer.push_row(&Row::from(record?))?;
        }
        importer.finish()
    }
}
