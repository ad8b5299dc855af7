//! SMPTE universal labels.

use std::fmt;

const URN_PREFIX: &str = "urn:smpte:ul:";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// A 16-octet SMPTE universal label.
///
/// `Ul` is a plain value type: comparisons, hashing and copies are all
/// byte-wise. Register tables write labels in dotted-hex form
/// (`06.0E.2B.34...`), dictionaries and documents in URN form
/// (`urn:smpte:ul:060e2b34.01040101...`); both parse here and `Display`
/// renders the URN form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ul([u8; 16]);

impl Ul {
    /// Create a label from its 16 octets.
    #[inline]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The raw octets.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Value of one octet.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 16 or more.
    #[inline]
    pub const fn octet(self, index: usize) -> u8 {
        self.0[index]
    }

    /// Whether octet 8 places the label in class 13 (organizationally
    /// registered data).
    #[inline]
    pub const fn is_class_13(self) -> bool {
        self.0[8] == 13
    }

    /// Whether octet 8 places the label in class 14 (company registered
    /// data).
    #[inline]
    pub const fn is_class_14(self) -> bool {
        self.0[8] == 14
    }

    /// Whether octet 8 places the label in class 15 (experimental data).
    #[inline]
    pub const fn is_class_15(self) -> bool {
        self.0[8] == 15
    }

    /// Parse the dotted-hex form used by register tables: 16 two-digit
    /// hex octets separated by dots, e.g. `06.0E.2B.34.01.04.01.01...`.
    pub fn from_dot_value(s: &str) -> Option<Ul> {
        let mut bytes = [0u8; 16];
        let mut parts = s.split('.');
        for byte in &mut bytes {
            parse_hex_octets(parts.next()?, std::slice::from_mut(byte))?;
        }
        match parts.next() {
            Some(_) => None,
            None => Some(Ul(bytes)),
        }
    }

    /// Parse the URN form: `urn:smpte:ul:` followed by four dot-separated
    /// groups of eight hex digits.
    pub fn from_urn(s: &str) -> Option<Ul> {
        let groups = s.strip_prefix(URN_PREFIX)?;
        let mut bytes = [0u8; 16];
        let mut parts = groups.split('.');
        for chunk in bytes.chunks_exact_mut(4) {
            parse_hex_octets(parts.next()?, chunk)?;
        }
        match parts.next() {
            Some(_) => None,
            None => Some(Ul(bytes)),
        }
    }

    /// Render the dotted-hex form, uppercase, as register tables write it.
    pub fn to_dot_value(self) -> String {
        let mut out = String::with_capacity(47);
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(HEX_UPPER[(b >> 4) as usize] as char);
            out.push(HEX_UPPER[(b & 0x0f) as usize] as char);
        }
        out
    }
}

/// Fill `out` from a group of exactly `2 * out.len()` hex digits.
fn parse_hex_octets(group: &str, out: &mut [u8]) -> Option<()> {
    if group.len() != 2 * out.len() || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    for (byte, pair) in out.iter_mut().zip(group.as_bytes().chunks_exact(2)) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        *byte = ((hi << 4) | lo) as u8;
    }
    Some(())
}

impl fmt::Display for Ul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{URN_PREFIX}")?;
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 && i % 4 == 0 {
                write!(f, ".")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ul({self})")
    }
}

impl From<[u8; 16]> for Ul {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<Ul> for [u8; 16] {
    #[inline]
    fn from(ul: Ul) -> Self {
        ul.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Ul = Ul::new([
        0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01, 0x01, 0x03, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ]);

    #[test]
    fn test_from_dot_value() {
        let parsed = Ul::from_dot_value("06.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00.00");
        assert_eq!(parsed, Some(SAMPLE));
    }

    #[test]
    fn test_from_dot_value_lowercase() {
        let parsed = Ul::from_dot_value("06.0e.2b.34.01.04.01.01.01.03.01.00.00.00.00.00");
        assert_eq!(parsed, Some(SAMPLE));
    }

    #[test]
    fn test_from_dot_value_rejects_malformed() {
        assert_eq!(Ul::from_dot_value(""), None);
        assert_eq!(Ul::from_dot_value("06.0E.2B"), None);
        assert_eq!(
            Ul::from_dot_value("06.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00"),
            None,
            "fifteen octets"
        );
        assert_eq!(
            Ul::from_dot_value("06.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00.00.00"),
            None,
            "seventeen octets"
        );
        assert_eq!(
            Ul::from_dot_value("06.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00.ZZ"),
            None,
            "non-hex octet"
        );
        assert_eq!(
            Ul::from_dot_value("6.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00.00"),
            None,
            "one-digit octet"
        );
    }

    #[test]
    fn test_from_urn() {
        let parsed = Ul::from_urn("urn:smpte:ul:060e2b34.01040101.01030100.00000000");
        assert_eq!(parsed, Some(SAMPLE));
        let upper = Ul::from_urn("urn:smpte:ul:060E2B34.01040101.01030100.00000000");
        assert_eq!(upper, Some(SAMPLE));
    }

    #[test]
    fn test_from_urn_rejects_malformed() {
        assert_eq!(Ul::from_urn("urn:uuid:060e2b34.01040101.01030100.00000000"), None);
        assert_eq!(Ul::from_urn("060e2b34.01040101.01030100.00000000"), None);
        assert_eq!(Ul::from_urn("urn:smpte:ul:060e2b34.01040101.01030100"), None);
        assert_eq!(
            Ul::from_urn("urn:smpte:ul:060e2b34.01040101.01030100.00000000.00000000"),
            None
        );
        assert_eq!(Ul::from_urn("urn:smpte:ul:060e2b34.01040101.01030100.0000000g"), None);
    }

    #[test]
    fn test_display_is_urn_form() {
        assert_eq!(
            SAMPLE.to_string(),
            "urn:smpte:ul:060e2b34.01040101.01030100.00000000"
        );
        assert_eq!(Ul::from_urn(&SAMPLE.to_string()), Some(SAMPLE));
    }

    #[test]
    fn test_to_dot_value() {
        assert_eq!(
            SAMPLE.to_dot_value(),
            "06.0E.2B.34.01.04.01.01.01.03.01.00.00.00.00.00"
        );
        assert_eq!(Ul::from_dot_value(&SAMPLE.to_dot_value()), Some(SAMPLE));
    }

    #[test]
    fn test_octet_and_classes() {
        assert_eq!(SAMPLE.octet(0), 0x06);
        assert_eq!(SAMPLE.octet(8), 0x01);
        assert!(!SAMPLE.is_class_13());

        let mut bytes = *SAMPLE.as_bytes();
        bytes[8] = 13;
        assert!(Ul::new(bytes).is_class_13());
        bytes[8] = 14;
        assert!(Ul::new(bytes).is_class_14());
        bytes[8] = 15;
        assert!(Ul::new(bytes).is_class_15());
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let mut bytes = *SAMPLE.as_bytes();
        bytes[15] = 0x01;
        let larger = Ul::new(bytes);
        assert!(SAMPLE < larger);
    }

    #[test]
    fn test_ul_size() {
        assert_eq!(std::mem::size_of::<Ul>(), 16);
    }
}
