/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package. Only the pieces the
/// deck editor touches are modelled: the slide size and the slide id list.
use crate::common::unit::SlideSize;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as _;

/// Smallest id PowerPoint accepts in `p:sldId`.
pub const MIN_SLIDE_ID: u32 = 256;

/// One `<p:sldId id=".." r:id=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideIdEntry {
    pub id: u32,
    pub r_id: String,
}

/// Read access to the presentation part.
pub struct PresentationPart<'a> {
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Slide size from `p:sldSz`, or the 4:3 default when absent.
    pub fn slide_size(&self) -> Result<SlideSize> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"sldSz" =>
                {
                    let mut size = SlideSize::DEFAULT;
                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = atoi_simd::parse::<i64>(attr.value.as_ref()).ok();
                        match (attr.key.as_ref(), value) {
                            (b"cx", Some(cx)) if cx > 0 => size.width = cx,
                            (b"cy", Some(cy)) if cy > 0 => size.height = cy,
                            _ => {},
                        }
                    }
                    return Ok(size);
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(SlideSize::DEFAULT)
    }

    /// The `p:sldIdLst` entries in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideIdEntry>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut entries = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"sldId" =>
                {
                    entries.push(parse_slide_id(e)?);
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(entries)
    }
}

fn parse_slide_id(e: &BytesStart<'_>) -> Result<SlideIdEntry> {
    let mut id = None;
    let mut r_id = None;
    for attr in e.attributes() {
        let attr = attr?;
        // `id` is unqualified; the relationship id is `r:id` under whatever
        // prefix the document bound to the relationships namespace
        if attr.key.local_name().as_ref() != b"id" {
            continue;
        }
        if attr.key.prefix().is_some() {
            r_id = Some(attr.unescape_value()?.into_owned());
        } else {
            id = atoi_simd::parse::<u32>(attr.value.as_ref()).ok();
        }
    }

    match (id, r_id) {
        (Some(id), Some(r_id)) => Ok(SlideIdEntry { id, r_id }),
        _ => Err(OoxmlError::InvalidFormat(
            "p:sldId is missing its id or r:id attribute".to_string(),
        )),
    }
}

/// Rewrite the `p:sldIdLst` of a presentation document.
///
/// Everything outside the list is kept byte for byte. A missing list is
/// created in schema position, right before `p:sldSz` (or `p:notesSz`).
pub fn replace_slide_id_list(xml: &str, entries: &[SlideIdEntry]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut prefixes = Prefixes::default();
    let mut root_seen = false;
    let mut list_span: Option<(usize, usize)> = None;
    let mut insert_at: Option<usize> = None;
    let mut list_start: Option<usize> = None;

    loop {
        let event_start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(e)) if !root_seen => {
                root_seen = true;
                prefixes = Prefixes::from_root(&e)?;
            },
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldIdLst" => {
                list_start = Some(event_start);
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sldIdLst" => {
                if let Some(start) = list_start.take() {
                    list_span = Some((start, reader.buffer_position() as usize));
                    break;
                }
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldIdLst" => {
                list_span = Some((event_start, reader.buffer_position() as usize));
                break;
            },
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if insert_at.is_none()
                    && matches!(e.local_name().as_ref(), b"sldSz" | b"notesSz") =>
            {
                insert_at = Some(event_start);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    let (start, end) = match (list_span, insert_at) {
        (Some(span), _) => span,
        (None, Some(at)) => (at, at),
        (None, None) => {
            return Err(OoxmlError::InvalidFormat(
                "presentation has neither p:sldIdLst nor p:sldSz".to_string(),
            ));
        },
    };

    let mut list = String::with_capacity(32 + entries.len() * 48);
    let p = prefixes.pml.as_deref().map(|p| format!("{}:", p)).unwrap_or_default();
    let r = &prefixes.rels;
    if entries.is_empty() {
        write!(list, "<{}sldIdLst/>", p).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    } else {
        write!(list, "<{}sldIdLst>", p).map_err(|e| OoxmlError::Xml(e.to_string()))?;
        for entry in entries {
            write!(
                list,
                r#"<{}sldId id="{}" {}:id="{}"/>"#,
                p, entry.id, r, entry.r_id
            )
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        write!(list, "</{}sldIdLst>", p).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }

    let mut out = String::with_capacity(xml.len() + list.len());
    out.push_str(&xml[..start]);
    out.push_str(&list);
    out.push_str(&xml[end..]);
    Ok(out)
}

/// Prefixes bound on the root element.
#[derive(Debug, Default)]
struct Prefixes {
    /// `None` when PresentationML is the default namespace
    pml: Option<String>,
    rels: String,
}

impl Prefixes {
    fn from_root(e: &BytesStart<'_>) -> Result<Self> {
        let mut pml = e
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
        let mut rels = None;
        for attr in e.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            let value = attr.value.as_ref();
            if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                let prefix = String::from_utf8_lossy(prefix).into_owned();
                if value == namespace::OFC_RELATIONSHIPS.as_bytes() {
                    rels = Some(prefix);
                } else if value == namespace::PML_MAIN.as_bytes() && pml.is_none() {
                    pml = Some(prefix);
                }
            }
        }

        Ok(Self {
            pml,
            rels: rels.ok_or_else(|| {
                OoxmlError::InvalidFormat(
                    "presentation does not declare the relationships namespace".to_string(),
                )
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::packuri::PackURI;
    use crate::ooxml::opc::part::XmlPart;

    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
  <p:sldIdLst>
    <p:sldId id="256" r:id="rId2"/>
    <p:sldId id="257" r:id="rId3"/>
  </p:sldIdLst>
  <p:sldSz cx="12192000" cy="6858000"/>
  <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#;

    fn part(xml: &str) -> XmlPart {
        XmlPart::new(
            PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            xml.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_slide_size_and_ids() {
        let part = part(PRESENTATION);
        let pres = PresentationPart::from_part(&part).unwrap();
        assert_eq!(pres.slide_size().unwrap(), SlideSize::new(12_192_000, 6_858_000));

        let ids = pres.slide_ids().unwrap();
        assert_eq!(
            ids,
            vec![
                SlideIdEntry { id: 256, r_id: "rId2".into() },
                SlideIdEntry { id: 257, r_id: "rId3".into() },
            ]
        );
    }

    #[test]
    fn test_missing_slide_size_defaults() {
        let xml = PRESENTATION.replace(r#"<p:sldSz cx="12192000" cy="6858000"/>"#, "");
        let part = part(&xml);
        let pres = PresentationPart::from_part(&part).unwrap();
        assert_eq!(pres.slide_size().unwrap(), SlideSize::DEFAULT);
    }

    #[test]
    fn test_replace_slide_id_list() {
        let entries = vec![
            SlideIdEntry { id: 256, r_id: "rId2".into() },
            SlideIdEntry { id: 258, r_id: "rId9".into() },
            SlideIdEntry { id: 257, r_id: "rId3".into() },
        ];
        let xml = replace_slide_id_list(PRESENTATION, &entries).unwrap();
        assert!(xml.contains(
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="258" r:id="rId9"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst>"#
        ));
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));

        let part = part(&xml);
        let ids = PresentationPart::from_part(&part).unwrap().slide_ids().unwrap();
        assert_eq!(ids, entries);
    }

    #[test]
    fn test_replace_creates_missing_list() {
        let start = PRESENTATION.find("<p:sldIdLst>").unwrap();
        let end = PRESENTATION.find("</p:sldIdLst>").unwrap() + "</p:sldIdLst>".len();
        let xml = format!("{}{}", &PRESENTATION[..start], &PRESENTATION[end..]);

        let entries = vec![SlideIdEntry { id: 256, r_id: "rId7".into() }];
        let out = replace_slide_id_list(&xml, &entries).unwrap();
        let list_pos = out.find("<p:sldIdLst>").unwrap();
        assert!(list_pos < out.find("<p:sldSz").unwrap());
        assert!(list_pos > out.find("</p:sldMasterIdLst>").unwrap());
    }

    #[test]
    fn test_replace_empty_list_element() {
        let xml = r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst/><p:sldSz cx="1" cy="1"/></p:presentation>"#;
        let entries = vec![SlideIdEntry { id: 300, r_id: "rId1".into() }];
        let out = replace_slide_id_list(xml, &entries).unwrap();
        assert!(out.contains(r#"<p:sldIdLst><p:sldId id="300" rel:id="rId1"/></p:sldIdLst>"#));
    }
}
