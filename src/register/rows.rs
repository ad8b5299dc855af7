//! Decoded register table rows.

use csv::StringRecord;

/// One row of a register table: an ordered list of optional text fields.
///
/// Empty source fields decode as absent, matching the spreadsheet
/// convention of the published registers. Indexing past the end of a
/// short row is also absent, never an error.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row {
    fields: Vec<Option<String>>,
}

impl Row {
    pub fn new(fields: Vec<Option<String>>) -> Self {
        Self { fields }
    }

    /// Build a row from plain text fields, mapping `""` to absent.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|f| {
                let f = f.as_ref();
                if f.is_empty() { None } else { Some(f.to_owned()) }
            })
            .collect();
        Self { fields }
    }

    /// The field at `index`, if present and non-empty.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&StringRecord> for Row {
    fn from(record: &StringRecord) -> Self {
        Row::from_fields(record.iter())
    }
}

impl From<StringRecord> for Row {
    fn from(record: StringRecord) -> Self {
        Row::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_absent() {
        let row = Row::from_fields(["first", "", "third"]);
        assert_eq!(row.field(0), Some("first"));
        assert_eq!(row.field(1), None);
        assert_eq!(row.field(2), Some("third"));
    }

    #[test]
    fn test_out_of_range_is_absent() {
        let row = Row::from_fields(["only"]);
        assert_eq!(row.field(7), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_from_string_record() {
        let record = StringRecord::from(vec!["a", "", "c"]);
        let row = Row::from(&record);
        assert_eq!(row, Row::from_fields(["a", "", "c"]));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let row = Row::from_fields([" ", "x"]);
        assert_eq!(row.field(0), Some(" "));
    }
}
