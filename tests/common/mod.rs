//! Fixture decks for the integration tests.

#![allow(dead_code)]

use deckscribe::ooxml::opc::PackURI;
use deckscribe::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use deckscribe::ooxml::opc::phys_pkg::PhysPkgWriter;
use deckscribe::ooxml::pptx::parts::slide::blank_slide_xml;
use std::path::{Path, PathBuf};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A 16:9 deck with `slides` slides, each holding one title shape, and a
/// title layout plus a blank layout.
pub fn deck_bytes(slides: usize) -> Vec<u8> {
    let mut writer = PhysPkgWriter::new();
    let mut write = |name: &str, body: String| {
        writer
            .write(&PackURI::new(name).unwrap(), body.as_bytes())
            .unwrap();
    };

    let mut overrides = String::new();
    let mut pres_rels = String::new();
    let mut sld_ids = String::new();
    for n in 1..=slides {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{}"/>"#,
            ct::PML_SLIDE
        ));
        pres_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{n}.xml"/>"#,
            n + 1,
            rt::SLIDE
        ));
        sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1));
    }
    for (n, _) in ["title", "blank"].iter().enumerate() {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="{}"/>"#,
            n + 1,
            ct::PML_SLIDE_LAYOUT
        ));
    }

    write(
        "/[Content_Types].xml",
        format!(
            r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="{}"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{}"/>{}</Types>"#,
            ct::OPC_RELATIONSHIPS,
            ct::PML_PRESENTATION_MAIN,
            overrides
        ),
    );
    write(
        "/_rels/.rels",
        format!(
            r#"{XML_DECL}<Relationships xmlns="{RELS_NS}"><Relationship Id="rId1" Type="{}" Target="ppt/presentation.xml"/></Relationships>"#,
            rt::OFFICE_DOCUMENT
        ),
    );
    write(
        "/ppt/presentation.xml",
        format!(
            r#"{XML_DECL}<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            sld_ids
        ),
    );
    write(
        "/ppt/_rels/presentation.xml.rels",
        format!(r#"{XML_DECL}<Relationships xmlns="{RELS_NS}">{}</Relationships>"#, pres_rels),
    );
    for (n, layout_type) in ["title", "blank"].iter().enumerate() {
        write(
            &format!("/ppt/slideLayouts/slideLayout{}.xml", n + 1),
            format!(
                r#"{XML_DECL}<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="{}"><p:cSld/></p:sldLayout>"#,
                layout_type
            ),
        );
    }
    for n in 1..=slides {
        let slide = blank_slide_xml().replace(
            "</p:spTree>",
            &format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title {n}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp></p:spTree>"#
            ),
        );
        write(&format!("/ppt/slides/slide{n}.xml"), slide);
        write(
            &format!("/ppt/slides/_rels/slide{n}.xml.rels"),
            format!(
                r#"{XML_DECL}<Relationships xmlns="{RELS_NS}"><Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#,
                rt::SLIDE_LAYOUT
            ),
        );
    }

    writer.finish().unwrap()
}

/// Write a fixture deck into `dir` and return its path.
pub fn write_deck(dir: &Path, name: &str, slides: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, deck_bytes(slides)).unwrap();
    path
}

pub const NOTES_MD: &str = "## Slide 1\nHello\n## Slide 2\n**Bold** text\n";
