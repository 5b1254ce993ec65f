//! Office Open XML support.
//!
//! - [`opc`]: the Open Packaging Conventions container (ZIP members, content
//!   types, relationships)
//! - [`pptx`]: PresentationML on top of it

pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
pub use opc::{OpcPackage, PackURI};
