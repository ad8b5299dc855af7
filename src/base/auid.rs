//! AUID identifiers: a universal label or an RFC 4122 UUID.

use std::fmt;

use uuid::Uuid;

use crate::base::Ul;

/// The identifier space of dictionary definitions.
///
/// Most definitions are identified by a [`Ul`]; extension definitions
/// coming from outside the register may carry a UUID instead. The two
/// URN schemes (`urn:smpte:ul:`, `urn:uuid:`) keep the forms distinct
/// in text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Auid {
    Ul(Ul),
    Uuid(Uuid),
}

impl Auid {
    /// Parse either URN scheme.
    pub fn from_urn(s: &str) -> Option<Auid> {
        if let Some(ul) = Ul::from_urn(s) {
            return Some(Auid::Ul(ul));
        }
        if s.starts_with("urn:uuid:") {
            return Uuid::parse_str(s).ok().map(Auid::Uuid);
        }
        None
    }

    /// The universal label, when this identifier is one.
    #[inline]
    pub const fn as_ul(self) -> Option<Ul> {
        match self {
            Auid::Ul(ul) => Some(ul),
            Auid::Uuid(_) => None,
        }
    }

    #[inline]
    pub const fn is_ul(self) -> bool {
        matches!(self, Auid::Ul(_))
    }
}

impl fmt::Display for Auid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auid::Ul(ul) => ul.fmt(f),
            Auid::Uuid(uuid) => uuid.urn().fmt(f),
        }
    }
}

impl fmt::Debug for Auid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Auid({self})")
    }
}

impl From<Ul> for Auid {
    #[inline]
    fn from(ul: Ul) -> Self {
        Auid::Ul(ul)
    }
}

impl From<Uuid> for Auid {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Auid::Uuid(uuid)
    }
}
