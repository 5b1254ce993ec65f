/// Slide parts and related types.
///
/// This module contains parts for slides and slide layouts: the blank slide
/// template, shape-tree splicing, and a reader that lists a slide's shapes.
use crate::common::unit::Rect;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::text::{
    TextBody, TextParagraph, TextRun, RunStyle, alignment_from_attrs, run_style_from_attrs,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// XML of a slide with an empty shape tree.
pub fn blank_slide_xml() -> String {
    let mut xml = String::with_capacity(640);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    ));
    xml.push_str("<p:cSld>");
    xml.push_str("<p:spTree>");

    // Group shape properties are required even for an empty tree
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");

    xml
}

/// Insert a serialized shape at the end of the slide's `p:spTree`, ahead of
/// its `p:extLst` if it has one.
pub fn append_to_shape_tree(xml: &str, fragment: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    // Nesting below p:spTree; 0 until the tree opens.
    let mut depth = 0usize;

    loop {
        let event_start = reader.buffer_position() as usize;
        let insert_at = match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    if e.local_name().as_ref() == b"spTree" {
                        depth = 1;
                    }
                    None
                } else if depth == 1 && e.local_name().as_ref() == b"extLst" {
                    Some(event_start)
                } else {
                    depth += 1;
                    None
                }
            },
            Ok(Event::Empty(e)) if depth == 1 && e.local_name().as_ref() == b"extLst" => {
                Some(event_start)
            },
            Ok(Event::End(_)) if depth == 1 => Some(event_start),
            Ok(Event::End(_)) if depth > 1 => {
                depth -= 1;
                None
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => None,
        };

        if let Some(at) = insert_at {
            let mut out = String::with_capacity(xml.len() + fragment.len());
            out.push_str(&xml[..at]);
            out.push_str(fragment);
            out.push_str(&xml[at..]);
            return Ok(out);
        }
    }

    Err(OoxmlError::InvalidFormat(
        "slide has no p:spTree".to_string(),
    ))
}

/// A shape read back from a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSummary {
    Picture {
        name: String,
        r_id: Option<String>,
        frame: Option<Rect>,
    },
    TextBox {
        name: String,
        body: TextBody,
        frame: Option<Rect>,
    },
    /// Any other `p:sp` (placeholders, autoshapes)
    Other { name: String },
}

impl ShapeSummary {
    pub fn name(&self) -> &str {
        match self {
            ShapeSummary::Picture { name, .. }
            | ShapeSummary::TextBox { name, .. }
            | ShapeSummary::Other { name } => name,
        }
    }
}

#[derive(Default)]
struct ShapeBuilder {
    is_picture: bool,
    is_text_box: bool,
    name: String,
    r_id: Option<String>,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
    in_body: bool,
    body: TextBody,
    paragraph: Option<TextParagraph>,
    run_style: RunStyle,
    text: Option<String>,
}

impl ShapeBuilder {
    fn finish(self) -> ShapeSummary {
        let frame = match (self.offset, self.extent) {
            (Some((x, y)), Some((cx, cy))) => Some(Rect::new(x, y, cx, cy)),
            _ => None,
        };
        if self.is_picture {
            ShapeSummary::Picture {
                name: self.name,
                r_id: self.r_id,
                frame,
            }
        } else if self.is_text_box {
            ShapeSummary::TextBox {
                name: self.name,
                body: self.body,
                frame,
            }
        } else {
            ShapeSummary::Other { name: self.name }
        }
    }
}

/// A slide part.
///
/// Corresponds to `/ppt/slides/slideN.xml` in the package.
pub struct SlidePart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlidePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Largest `cNvPr` id on the slide. New shapes take the next one.
    pub fn max_shape_id(&self) -> Result<u32> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut max_id = 0u32;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"cNvPr" =>
                {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"id"
                            && let Ok(id) = atoi_simd::parse::<u32>(attr.value.as_ref())
                        {
                            max_id = max_id.max(id);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(max_id)
    }

    /// Namespace declarations a shape fragment needs on its own root
    /// element, for prefixes the slide does not bind the usual way.
    pub fn missing_namespace_decls(&self) -> Result<String> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        let mut buf = Vec::new();
        let mut wanted = [
            ("p", namespace::PML_MAIN, false),
            ("a", namespace::DML_MAIN, false),
            ("r", namespace::OFC_RELATIONSHIPS, false),
        ];

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        for (prefix, uri, bound) in wanted.iter_mut() {
                            if attr.key.as_ref().strip_prefix(b"xmlns:") == Some(prefix.as_bytes())
                                && attr.value.as_ref() == uri.as_bytes()
                            {
                                *bound = true;
                            }
                        }
                    }
                    break;
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(wanted
            .iter()
            .filter(|(_, _, bound)| !bound)
            .map(|(prefix, uri, _)| format!(r#" xmlns:{}="{}""#, prefix, uri))
            .collect())
    }

    /// Pictures and text shapes on the slide, in document order.
    pub fn shapes(&self) -> Result<Vec<ShapeSummary>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        let mut buf = Vec::new();
        let mut shapes = Vec::new();
        let mut current: Option<ShapeBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"pic" | b"sp" => {
                        current = Some(ShapeBuilder {
                            is_picture: e.local_name().as_ref() == b"pic",
                            ..ShapeBuilder::default()
                        });
                    },
                    _ => {
                        if let Some(shape) = current.as_mut() {
                            shape_element(shape, e, true)?;
                        }
                    },
                },
                Ok(Event::Empty(ref e)) => {
                    if let Some(shape) = current.as_mut() {
                        shape_element(shape, e, false)?;
                    }
                },
                Ok(Event::Text(ref e)) => {
                    if let Some(text) = current.as_mut().and_then(|s| s.text.as_mut()) {
                        let t = std::str::from_utf8(e.as_ref())
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        text.push_str(t);
                    }
                },
                Ok(Event::GeneralRef(ref e)) => {
                    if let Some(text) = current.as_mut().and_then(|s| s.text.as_mut()) {
                        match &**e {
                            b"amp" => text.push('&'),
                            b"lt" => text.push('<'),
                            b"gt" => text.push('>'),
                            b"quot" => text.push('"'),
                            b"apos" => text.push('\''),
                            _ => {},
                        }
                    }
                },
                Ok(Event::End(ref e)) => {
                    let local = e.local_name();
                    match local.as_ref() {
                        b"pic" | b"sp" => {
                            if let Some(shape) = current.take() {
                                shapes.push(shape.finish());
                            }
                        },
                        b"t" => {
                            if let Some(shape) = current.as_mut()
                                && let Some(text) = shape.text.take()
                                && let Some(paragraph) = shape.paragraph.as_mut()
                            {
                                paragraph.push_run(TextRun::new(text, shape.run_style));
                            }
                        },
                        b"p" => {
                            if let Some(shape) = current.as_mut()
                                && let Some(paragraph) = shape.paragraph.take()
                            {
                                shape.body.push_paragraph(paragraph);
                            }
                        },
                        b"txBody" => {
                            if let Some(shape) = current.as_mut() {
                                shape.in_body = false;
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(shapes)
    }
}

/// Apply one element inside a `p:pic`/`p:sp` to the shape being read.
fn shape_element(shape: &mut ShapeBuilder, e: &BytesStart<'_>, is_start: bool) -> Result<()> {
    match e.local_name().as_ref() {
        b"cNvPr" => {
            if let Some(name) = attr_value(e, b"name")? {
                shape.name = name;
            }
        },
        b"cNvSpPr" => {
            shape.is_text_box = attr_value(e, b"txBox")?.is_some_and(|v| v == "1" || v == "true");
        },
        b"blip" => {
            for attr in e.attributes() {
                let attr = attr?;
                if attr.key.local_name().as_ref() == b"embed" {
                    shape.r_id = Some(attr.unescape_value()?.into_owned());
                }
            }
        },
        b"off" if shape.offset.is_none() => {
            shape.offset = Some((coord(e, b"x")?, coord(e, b"y")?));
        },
        // `a:ext` also names extension-list entries, which carry no cx
        b"ext" if shape.extent.is_none() && attr_value(e, b"cx")?.is_some() => {
            shape.extent = Some((coord(e, b"cx")?, coord(e, b"cy")?));
        },
        b"txBody" if is_start => shape.in_body = true,
        b"p" if shape.in_body => {
            shape.paragraph = Some(TextParagraph::new());
            if !is_start {
                shape.body.push_paragraph(TextParagraph::new());
                shape.paragraph = None;
            }
        },
        b"pPr" if shape.in_body => {
            if let (Some(paragraph), Some(alignment)) =
                (shape.paragraph.as_mut(), alignment_from_attrs(e)?)
            {
                *paragraph = std::mem::take(paragraph).with_alignment(alignment);
            }
        },
        b"rPr" if shape.in_body => shape.run_style = run_style_from_attrs(e)?,
        b"r" if shape.in_body => shape.run_style = RunStyle::default(),
        b"t" if shape.in_body && is_start => shape.text = Some(String::new()),
        _ => {},
    }
    Ok(())
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn coord(e: &BytesStart<'_>, key: &[u8]) -> Result<i64> {
    attr_value(e, key)?
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| {
            OoxmlError::InvalidFormat(format!(
                "missing coordinate {}",
                String::from_utf8_lossy(key)
            ))
        })
}

/// A slide layout part (`/ppt/slideLayouts/slideLayoutN.xml`).
pub struct SlideLayoutPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideLayoutPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    /// The `type` attribute of `p:sldLayout` (`blank`, `title`, `obj`, ...).
    pub fn layout_type(&self) -> Result<Option<String>> {
        let mut reader = Reader::from_reader(self.part.blob());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() != b"sldLayout" {
                        return Ok(None);
                    }
                    return attr_value(e, b"type");
                },
                Ok(Event::Eof) => return Ok(None),
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
    }

    pub fn is_blank(&self) -> Result<bool> {
        Ok(self.layout_type()?.as_deref() == Some("blank"))
    }
}
