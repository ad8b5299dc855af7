//! XML interchange for registers and metadictionaries.
//!
//! Available with the `interchange` feature. The writers emit
//! deterministic documents: entries and definitions appear in insertion
//! order, optional elements are omitted when absent, and roots carry
//! the owning namespace.

mod dictionary_xml;
mod register_xml;

pub use dictionary_xml::{dictionary_file_name, write_dictionary};
pub use register_xml::write_register;

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

fn text_element<W: io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn optional_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: Option<&str>,
) -> io::Result<()> {
    match text {
        Some(text) => text_element(writer, name, text),
        None => Ok(()),
    }
}

fn bool_element<W: io::Write>(writer: &mut Writer<W>, name: &str, value: bool) -> io::Result<()> {
    text_element(writer, name, if value { "true" } else { "false" })
}
