/// In-memory OPC package.
///
/// `OpcPackage` owns every part of a package together with the package-level
/// relationships and content type registry, and can write itself back out.
use crate::ooxml::opc::constants::{content_type, relationship_type};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::{ContentTypeMap, PackageReader};
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::path::Path;

pub struct OpcPackage {
    rels: Relationships,
    content_types: ContentTypeMap,
    /// Parts keyed by partname; BTreeMap keeps saved archives deterministic
    parts: BTreeMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            content_types: {
                let mut map = ContentTypeMap::new();
                map.add_default("rels", content_type::OPC_RELATIONSHIPS);
                map.add_default("xml", content_type::XML);
                map
            },
            parts: BTreeMap::new(),
        }
    }

    /// Open a package file (.pptx).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::unmarshal(PhysPkgReader::open(path)?)
    }

    /// Load a package from its bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::unmarshal(PhysPkgReader::from_bytes(data)?)
    }

    fn unmarshal(phys_reader: PhysPkgReader) -> Result<Self> {
        let (rels, mut content_types, sparts) =
            PackageReader::from_phys_reader(phys_reader)?.into_parts();
        if content_types.default_for("rels").is_none() {
            content_types.add_default("rels", content_type::OPC_RELATIONSHIPS);
        }

        let mut parts = BTreeMap::new();
        for spart in sparts {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            *part.rels_mut() = spart.rels;
            parts.insert(part.partname().to_string(), part);
        }

        Ok(Self {
            rels,
            content_types,
            parts,
        })
    }

    /// The part targeted by the package's officeDocument relationship
    /// (`/ppt/presentation.xml` for decks).
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    pub fn main_document_part(&self) -> Result<&dyn Part> {
        let partname = self.main_document_partname()?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname.as_str())
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        self.parts
            .get_mut(partname.as_str())
            .map(|b| &mut **b as &mut dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Add a part, registering its content type.
    ///
    /// A Default entry for the extension is added if none exists; a part
    /// whose content type differs from the existing Default gets an Override.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        let partname = part.partname().clone();
        let content_type = part.content_type();
        match self.content_types.default_for(partname.ext()) {
            Some(existing) if existing == content_type => {},
            None if partname.ext() != "xml" => {
                self.content_types.add_default(partname.ext(), content_type)
            },
            _ => self
                .content_types
                .add_override(partname.as_str(), content_type),
        }
        self.parts.insert(partname.to_string(), part);
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    /// Partnames of all parts with the given content type, in partname order.
    pub fn partnames_with_content_type(&self, content_type: &str) -> Vec<PackURI> {
        self.iter_parts()
            .filter(|part| part.content_type() == content_type)
            .map(|part| part.partname().clone())
            .collect()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn content_types(&self) -> &ContentTypeMap {
        &self.content_types
    }

    /// First free partname for a template with a `%d` placeholder, e.g.
    /// `/ppt/slides/slide%d.xml`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=10_000u32)
            .map(|n| template.replace("%d", &n.to_string()))
            .find(|candidate| !self.parts.contains_key(candidate))
            .ok_or_else(|| {
                OpcError::InvalidPackUri(format!("no free partname for template {}", template))
            })
            .and_then(|candidate| PackURI::new(candidate).map_err(OpcError::InvalidPackUri))
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::BlobPart;
    use crate::ooxml::opc::phys_pkg::PhysPkgWriter;

    fn minimal_package() -> Vec<u8> {
        let mut writer = PhysPkgWriter::new();
        let write = |writer: &mut PhysPkgWriter, name: &str, body: &str| {
            writer
                .write(&PackURI::new(name).unwrap(), body.as_bytes())
                .unwrap();
        };
        write(
            &mut writer,
            "/[Content_Types].xml",
            r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#,
        );
        write(
            &mut writer,
            "/_rels/.rels",
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#,
        );
        write(&mut writer, "/ppt/presentation.xml", "<p:presentation/>");
        write(&mut writer, "/docProps/custom.bin", "opaque");
        writer.finish().unwrap()
    }

    #[test]
    fn test_open_package() {
        let pkg = OpcPackage::from_bytes(minimal_package()).unwrap();
        // Unknown members are kept so they can be written back
        assert_eq!(pkg.part_count(), 2);

        let main_part = pkg.main_document_part().unwrap();
        assert_eq!(main_part.content_type(), ct::PML_PRESENTATION_MAIN);
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = OpcPackage::new();
        let first = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(first.as_str(), "/ppt/media/image1.png");

        pkg.add_part(Box::new(BlobPart::new(first, ct::PNG.into(), vec![1])));
        assert_eq!(
            pkg.next_partname("/ppt/media/image%d.png").unwrap().as_str(),
            "/ppt/media/image2.png"
        );
        assert_eq!(pkg.content_types().default_for("png"), Some(ct::PNG));
    }

    #[test]
    fn test_save_round_trip_keeps_parts() {
        let mut pkg = OpcPackage::from_bytes(minimal_package()).unwrap();
        let partname = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        pkg.add_part(Box::new(BlobPart::new(partname.clone(), ct::PNG.into(), vec![7, 7])));

        let reopened = OpcPackage::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.part_count(), 3);
        assert_eq!(reopened.get_part(&partname).unwrap().blob(), &[7, 7]);
        assert_eq!(
            reopened.main_document_part().unwrap().content_type(),
            ct::PML_PRESENTATION_MAIN
        );
    }
}
