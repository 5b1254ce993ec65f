//! Low-level, read-only view of a serialized OPC package.
//!
//! Resolves `[Content_Types].xml` and every `.rels` member, producing one
//! [`SerializedPart`] per remaining member. Unlike a viewer, the deck editor
//! must write back every member it read, so parts unreachable from the
//! relationship graph are kept as well.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{BTreeMap, HashMap};

/// Part content as loaded from the physical package.
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    pub rels: Relationships,
}

/// `[Content_Types].xml`: Default elements keyed by extension and Override
/// elements keyed by partname.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeMap {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `[Content_Types].xml`.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let kind = match e.local_name().as_ref() {
                        b"Default" => Some(true),
                        b"Override" => Some(false),
                        _ => None,
                    };

                    if let Some(is_default) = kind {
                        let mut key = None;
                        let mut content_type = None;
                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Extension" | b"PartName" => {
                                    key = Some(attr.unescape_value()?.into_owned())
                                },
                                b"ContentType" => {
                                    content_type = Some(attr.unescape_value()?.into_owned())
                                },
                                _ => {},
                            }
                        }

                        if let (Some(key), Some(content_type)) = (key, content_type) {
                            if is_default {
                                map.add_default(&key, &content_type);
                            } else {
                                map.add_override(&key, &content_type);
                            }
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    pub fn add_override(&mut self, partname: &str, content_type: &str) {
        self.overrides
            .insert(partname.to_string(), content_type.to_string());
    }

    /// Default content type registered for an extension.
    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Content type of a part: its override, else the default for its
    /// extension.
    pub fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(pack_uri.as_str()) {
            return Ok(ct);
        }
        self.default_for(pack_uri.ext())
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }

    /// Serialize to `[Content_Types].xml`. Overrides are sorted by partname.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES));
        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }
        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Package contents split into relationships, content types and parts.
pub struct PackageReader {
    pkg_rels: Relationships,
    content_types: ContentTypeMap,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    pub fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let mut content_types_xml = None;
        let mut rels_xml: HashMap<PackURI, Vec<u8>> = HashMap::new();
        let mut blobs: Vec<(PackURI, Vec<u8>)> = Vec::new();

        for (membername, blob) in phys_reader.into_members() {
            let pack_uri = PackURI::from_membername(&membername);
            if pack_uri.as_str() == CONTENT_TYPES_URI {
                content_types_xml = Some(blob);
            } else if let Some(source) = PackURI::source_of_rels(&membername) {
                rels_xml.insert(source, blob);
            } else {
                blobs.push((pack_uri, blob));
            }
        }

        let content_types_xml = content_types_xml
            .ok_or_else(|| OpcError::PartNotFound(CONTENT_TYPES_URI.to_string()))?;
        let content_types = ContentTypeMap::from_xml(&content_types_xml)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let pkg_rels = match rels_xml.remove(&package_uri) {
            Some(xml) => Relationships::from_xml(package_uri.base_uri(), &xml)?,
            None => Relationships::default(),
        };

        let mut sparts = Vec::with_capacity(blobs.len());
        for (partname, blob) in blobs {
            let content_type = content_types
                .get(&partname)
                .unwrap_or(ct::OCTET_STREAM)
                .to_string();
            let rels = match rels_xml.remove(&partname) {
                Some(xml) => Relationships::from_xml(partname.base_uri(), &xml)?,
                None => Relationships::new(partname.base_uri().to_string()),
            };
            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                rels,
            });
        }

        Ok(Self {
            pkg_rels,
            content_types,
            sparts,
        })
    }

    /// Take apart the reader: package relationships, content types, parts.
    pub fn into_parts(self) -> (Relationships, ContentTypeMap, Vec<SerializedPart>) {
        (self.pkg_rels, self.content_types, self.sparts)
    }
}
