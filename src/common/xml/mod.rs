//! XML text helpers shared by the package and slide writers.

pub mod escape;

pub use escape::{escape_xml, strip_invalid_xml_chars};
