//! An editable PowerPoint deck.
//!
//! `Deck` keeps the live slide list in memory and edits slide XML in place.
//! The presentation part's `p:sldIdLst` is rewritten only when the deck is
//! serialized, so a failed run never leaves a half-updated package behind.
use crate::common::unit::{Rect, SlideSize};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::part::{BlobPart, Part, XmlPart};
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::parts::presentation::{
    MIN_SLIDE_ID, PresentationPart, SlideIdEntry, replace_slide_id_list,
};
use crate::ooxml::pptx::parts::slide::{
    ShapeSummary, SlideLayoutPart, SlidePart, append_to_shape_tree, blank_slide_xml,
};
use crate::ooxml::pptx::shape::NewShape;
use crate::ooxml::pptx::text::TextBody;
use std::path::Path;
use tracing::debug;

const SLIDE_PARTNAME_TEMPLATE: &str = "/ppt/slides/slide%d.xml";

#[derive(Debug, Clone)]
struct SlideEntry {
    id: u32,
    r_id: String,
    partname: PackURI,
}

/// A .pptx deck opened for editing.
///
/// # Examples
///
/// ```rust,no_run
/// use deckscribe::ooxml::pptx::Deck;
///
/// let mut deck = Deck::open("talk.pptx")?;
/// deck.insert_blank_slide(1)?;
/// deck.save("talk_annotated.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Deck {
    package: OpcPackage,
    presentation: PackURI,
    slide_size: SlideSize,
    slides: Vec<SlideEntry>,
    blank_layout: Option<PackURI>,
}

impl Deck {
    /// Open a .pptx (or .pptm) file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(OpcPackage::open(path)?)
    }

    /// Load a deck from the bytes of a .pptx file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(data)?)
    }

    fn from_package(package: OpcPackage) -> Result<Self> {
        // Verify it's a PowerPoint presentation by checking the main part's content type
        let main_part = package
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        // Support both regular and macro-enabled presentations
        if content_type != ct::PML_PRESENTATION_MAIN && content_type != ct::PML_PRES_MACRO_MAIN {
            return Err(OoxmlError::InvalidContentType {
                expected: format!(
                    "{} or {}",
                    ct::PML_PRESENTATION_MAIN,
                    ct::PML_PRES_MACRO_MAIN
                ),
                got: content_type.to_string(),
            });
        }

        let presentation = main_part.partname().clone();
        let pres_part = PresentationPart::from_part(main_part)?;
        let slide_size = pres_part.slide_size()?;

        let mut slides = Vec::new();
        for SlideIdEntry { id, r_id } in pres_part.slide_ids()? {
            let partname = main_part.related_partname(&r_id)?;
            slides.push(SlideEntry {
                id,
                r_id,
                partname,
            });
        }

        let mut blank_layout = None;
        for layout in package.partnames_with_content_type(ct::PML_SLIDE_LAYOUT) {
            if SlideLayoutPart::from_part(package.get_part(&layout)?)?.is_blank()? {
                blank_layout = Some(layout);
                break;
            }
        }

        debug!(
            slides = slides.len(),
            width = slide_size.width,
            height = slide_size.height,
            "opened deck"
        );

        Ok(Self {
            package,
            presentation,
            slide_size,
            slides,
            blank_layout,
        })
    }

    /// Number of slides in the live list, including inserted ones.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    /// Partname of the slide at a position in the live list.
    pub fn slide_partname(&self, position: usize) -> Result<&PackURI> {
        self.slides
            .get(position)
            .map(|entry| &entry.partname)
            .ok_or(OoxmlError::SlideOutOfRange {
                position,
                count: self.slides.len(),
            })
    }

    /// Insert a slide with an empty shape tree so that it ends up at
    /// `position`; slides from `position` on move one to the right.
    pub fn insert_blank_slide(&mut self, position: usize) -> Result<()> {
        if position > self.slides.len() {
            return Err(OoxmlError::SlideOutOfRange {
                position,
                count: self.slides.len(),
            });
        }

        let layout = self.layout_for_new_slide(position)?;
        let partname = self.package.next_partname(SLIDE_PARTNAME_TEMPLATE)?;
        let mut part = XmlPart::new(
            partname.clone(),
            ct::PML_SLIDE.to_string(),
            blank_slide_xml().into_bytes(),
        );
        part.relate_to(&layout, rt::SLIDE_LAYOUT);
        self.package.add_part(Box::new(part));

        let r_id = self
            .package
            .get_part_mut(&self.presentation)?
            .relate_to(&partname, rt::SLIDE);
        let id = self.next_slide_id();

        debug!(%partname, position, id, layout = %layout, "inserted blank slide");
        self.slides.insert(
            position,
            SlideEntry {
                id,
                r_id,
                partname,
            },
        );
        Ok(())
    }

    /// Embed an image file as a picture on the slide at `position`.
    pub fn add_picture<P: AsRef<Path>>(
        &mut self,
        position: usize,
        image_path: P,
        description: &str,
        frame: Rect,
    ) -> Result<()> {
        let data = std::fs::read(image_path.as_ref())?;
        self.add_picture_bytes(position, data, description, frame)
    }

    /// Embed image bytes as a picture on the slide at `position`.
    pub fn add_picture_bytes(
        &mut self,
        position: usize,
        data: Vec<u8>,
        description: &str,
        frame: Rect,
    ) -> Result<()> {
        let format = ImageFormat::detect_from_bytes(&data).ok_or_else(|| {
            OoxmlError::UnsupportedImage("not a PNG, JPEG, GIF, BMP or TIFF image".to_string())
        })?;
        let slide = self.slide_partname(position)?.clone();

        let media = self
            .package
            .next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
        self.package.add_part(Box::new(BlobPart::new(
            media.clone(),
            format.content_type().to_string(),
            data,
        )));
        let r_id = self
            .package
            .get_part_mut(&slide)?
            .relate_to(&media, rt::IMAGE);

        self.append_shape(
            &slide,
            &NewShape::Picture {
                r_id: &r_id,
                description,
                frame,
            },
        )
    }

    /// Add a text box to the slide at `position`.
    pub fn add_text_box(
        &mut self,
        position: usize,
        name: &str,
        body: &TextBody,
        frame: Rect,
    ) -> Result<()> {
        let slide = self.slide_partname(position)?.clone();
        self.append_shape(
            &slide,
            &NewShape::TextBox {
                name: Some(name),
                body,
                frame,
            },
        )
    }

    /// Shapes on the slide at `position`, read back from its XML.
    pub fn shapes(&self, position: usize) -> Result<Vec<ShapeSummary>> {
        let slide = self.slide_partname(position)?;
        SlidePart::from_part(self.package.get_part(slide)?)?.shapes()
    }

    /// Serialize the deck.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.write_slide_list()?;
        Ok(self.package.to_bytes()?)
    }

    /// Write the deck to a file.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.write_slide_list()?;
        self.package.save(path)?;
        Ok(())
    }

    fn append_shape(&mut self, slide: &PackURI, shape: &NewShape<'_>) -> Result<()> {
        let part = self.package.get_part_mut(slide)?;
        let (shape_id, ns_decls) = {
            let slide_part = SlidePart::from_part(&*part)?;
            (slide_part.max_shape_id()? + 1, slide_part.missing_namespace_decls()?)
        };

        let mut fragment = String::with_capacity(1024);
        shape.to_xml(shape_id, &ns_decls, &mut fragment)?;

        let xml = std::str::from_utf8(part.blob()).map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let updated = append_to_shape_tree(xml, &fragment)?;
        part.set_blob(updated.into_bytes());
        Ok(())
    }

    /// Layout for a new slide: the deck's blank layout, else the layout of
    /// the slide it follows, else the first layout in the package.
    fn layout_for_new_slide(&self, position: usize) -> Result<PackURI> {
        if let Some(layout) = &self.blank_layout {
            return Ok(layout.clone());
        }

        let neighbour = position.checked_sub(1).unwrap_or(position);
        if let Some(entry) = self.slides.get(neighbour)
            && let Ok(rel) = self
                .package
                .get_part(&entry.partname)?
                .rels()
                .part_with_reltype(rt::SLIDE_LAYOUT)
        {
            return Ok(rel.target_partname()?);
        }

        self.package
            .partnames_with_content_type(ct::PML_SLIDE_LAYOUT)
            .into_iter()
            .next()
            .ok_or_else(|| OoxmlError::PartNotFound("slide layout".to_string()))
    }

    fn next_slide_id(&self) -> u32 {
        self.slides
            .iter()
            .map(|entry| entry.id)
            .max()
            .map_or(MIN_SLIDE_ID, |max| (max + 1).max(MIN_SLIDE_ID))
    }

    fn write_slide_list(&mut self) -> Result<()> {
        let entries: Vec<SlideIdEntry> = self
            .slides
            .iter()
            .map(|entry| SlideIdEntry {
                id: entry.id,
                r_id: entry.r_id.clone(),
            })
            .collect();

        let part = self.package.get_part_mut(&self.presentation)?;
        let xml = std::str::from_utf8(part.blob()).map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let updated = replace_slide_id_list(xml, &entries)?;
        part.set_blob(updated.into_bytes());
        Ok(())
    }
}
