//! Foundation types for the register and dictionary layers.
//!
//! - [`Ul`] - 16-octet SMPTE universal labels
//! - [`Auid`] - UL-or-UUID definition identifiers
//!
//! This module has NO dependencies on other regml modules.

mod auid;
mod ul;

pub use auid::Auid;
pub use ul::Ul;
