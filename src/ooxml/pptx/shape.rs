//! Shapes appended to a slide's shape tree.

use crate::common::unit::Rect;
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::text::TextBody;
use std::fmt::Write as _;

/// A new shape for `p:spTree`.
#[derive(Debug, Clone, PartialEq)]
pub enum NewShape<'a> {
    /// `p:pic` whose blip is embedded through `r_id`.
    Picture {
        r_id: &'a str,
        description: &'a str,
        frame: Rect,
    },
    /// `p:sp txBox="1"`.
    TextBox {
        name: Option<&'a str>,
        body: &'a TextBody,
        frame: Rect,
    },
}

impl NewShape<'_> {
    /// Serialize the shape with the given `cNvPr` id.
    ///
    /// `ns_decls` is inserted into the shape's root element; pass the
    /// declarations the host slide lacks for the `p`, `a` and `r` prefixes,
    /// or an empty string.
    pub(crate) fn to_xml(&self, shape_id: u32, ns_decls: &str, xml: &mut String) -> Result<()> {
        match self {
            NewShape::Picture {
                r_id,
                description,
                frame,
            } => {
                write!(xml, "<p:pic{}>", ns_decls).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    shape_id,
                    shape_id,
                    escape_xml(description)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, escape_xml(r_id))
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                write_shape_properties(xml, frame)?;
                xml.push_str("</p:pic>");
            },
            NewShape::TextBox { name, body, frame } => {
                write!(xml, "<p:sp{}>", ns_decls).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<p:nvSpPr>");
                let written = match name {
                    Some(name) => write!(
                        xml,
                        r#"<p:cNvPr id="{}" name="{}"/>"#,
                        shape_id,
                        escape_xml(name)
                    ),
                    None => write!(
                        xml,
                        r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                        shape_id, shape_id
                    ),
                };
                written.map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                write_shape_properties(xml, frame)?;
                body.write_xml(xml)?;
                xml.push_str("</p:sp>");
            },
        }

        Ok(())
    }
}

fn write_shape_properties(xml: &mut String, frame: &Rect) -> Result<()> {
    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.left, frame.top)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.width, frame.height)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    Ok(())
}
