/// Open Packaging Conventions (OPC) implementation.
///
/// The container layer of a .pptx file: a ZIP archive of parts, a content
/// type registry, and relationships between parts. Packages are read fully
/// into memory, edited part by part, and written back as a whole.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
