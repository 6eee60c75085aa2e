use roxmltree::Document;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::ReportError;
use crate::models::ImageFormat;
use crate::services::report_service::slide::{
    self, append_to_shape_tree, next_shape_id, parse_shapes, picture_xml, replace_shape_text,
    Geometry, ShapeDescriptor, R_NS,
};
use crate::utils::escape_xml;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// An opened `.pptx` package: every zip entry held in memory, in original
/// order, plus the slide part names in presentation order.
#[derive(Debug, Clone)]
pub struct Deck {
    entries: Vec<PackageEntry>,
    slides: Vec<String>,
}

impl Deck {
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        if !path.exists() {
            return Err(ReportError::TemplateNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                data,
            });
        }

        let mut deck = Self {
            entries,
            slides: Vec::new(),
        };
        deck.slides = deck.resolve_slides()?;
        Ok(deck)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_part(&self, index: usize) -> Result<&str, ReportError> {
        self.slides
            .get(index)
            .map(String::as_str)
            .ok_or(ReportError::SlideOutOfRange {
                index,
                count: self.slides.len(),
            })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    fn part_text(&self, name: &str) -> Result<String, ReportError> {
        let data = self
            .part(name)
            .ok_or_else(|| ReportError::MissingPart(name.to_string()))?;
        String::from_utf8(data.to_vec())
            .map_err(|_| ReportError::UnsupportedMarkup(format!("{} is not utf-8", name)))
    }

    fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
            }),
        }
    }

    pub fn shapes(&self, slide_index: usize) -> Result<Vec<ShapeDescriptor>, ReportError> {
        let part = self.slide_part(slide_index)?.to_string();
        parse_shapes(&part, &self.part_text(&part)?)
    }

    pub fn set_shape_text(
        &mut self,
        slide_index: usize,
        shape_index: usize,
        text: &str,
    ) -> Result<(), ReportError> {
        let part = self.slide_part(slide_index)?.to_string();
        let updated = replace_shape_text(&part, &self.part_text(&part)?, shape_index, text)?;
        self.set_part(&part, updated.into_bytes());
        Ok(())
    }

    pub fn append_shape_xml(&mut self, slide_index: usize, fragment: &str) -> Result<(), ReportError> {
        let part = self.slide_part(slide_index)?.to_string();
        let updated = append_to_shape_tree(&part, &self.part_text(&part)?, fragment)?;
        self.set_part(&part, updated.into_bytes());
        Ok(())
    }

    /// Embeds `image` as a new media part and places it on the slide.
    /// Returns the new shape id.
    pub fn add_picture(
        &mut self,
        slide_index: usize,
        image: Vec<u8>,
        format: ImageFormat,
        geometry: Geometry,
    ) -> Result<u32, ReportError> {
        let part = self.slide_part(slide_index)?.to_string();

        let media_part = self.next_media_part(format.extension());
        self.set_part(&media_part, image);
        self.ensure_default_content_type(format.extension(), format.content_type())?;

        let mut rels = self.relationships(&part)?;
        let rel_id = next_relationship_id(&rels);
        rels.push(Relationship {
            id: rel_id.clone(),
            rel_type: IMAGE_REL.to_string(),
            target: relative_target(&part, &media_part),
            external: false,
        });
        self.set_part(&rels_part_for(&part), relationships_xml(&rels).into_bytes());

        let shape_id = next_shape_id(&self.shapes(slide_index)?);
        let name = format!("Picture {}", shape_id - 1);
        self.append_shape_xml(slide_index, &picture_xml(shape_id, &name, &rel_id, geometry))?;
        Ok(shape_id)
    }

    /// Bytes and format of the image behind relationship `rel_id` of a slide.
    pub fn image(&self, slide_index: usize, rel_id: &str) -> Result<(Vec<u8>, ImageFormat), ReportError> {
        let part = self.slide_part(slide_index)?;
        let rel = self
            .relationships(part)?
            .into_iter()
            .find(|rel| rel.id == rel_id && !rel.external)
            .ok_or_else(|| ReportError::MissingPart(format!("{}#{}", part, rel_id)))?;
        let media_part = resolve_target(part, &rel.target);
        let format = media_part
            .rsplit_once('.')
            .and_then(|(_, ext)| ImageFormat::from_extension(ext))
            .ok_or_else(|| {
                ReportError::UnsupportedMarkup(format!("unknown image type {}", media_part))
            })?;
        let data = self
            .part(&media_part)
            .ok_or_else(|| ReportError::MissingPart(media_part.clone()))?
            .to_vec();
        Ok((data, format))
    }

    pub fn relationships(&self, part: &str) -> Result<Vec<Relationship>, ReportError> {
        let rels_part = rels_part_for(part);
        if !self.has_part(&rels_part) {
            return Ok(Vec::new());
        }
        parse_relationships(&rels_part, &self.part_text(&rels_part)?)
    }

    fn resolve_slides(&self) -> Result<Vec<String>, ReportError> {
        let presentation = self
            .relationships_of_package()?
            .into_iter()
            .find(|rel| rel.rel_type == OFFICE_DOCUMENT_REL)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());

        let rels = self.relationships(&presentation)?;
        let xml = self.part_text(&presentation)?;
        let doc = Document::parse(&xml).map_err(|source| ReportError::Xml {
            part: presentation.clone(),
            source,
        })?;

        let slides = doc
            .descendants()
            .filter(|n| n.has_tag_name((slide::P_NS, "sldId")))
            .filter_map(|n| n.attribute((R_NS, "id")))
            .filter_map(|rel_id| rels.iter().find(|rel| rel.id == rel_id))
            .map(|rel| resolve_target(&presentation, &rel.target))
            .collect();
        Ok(slides)
    }

    fn relationships_of_package(&self) -> Result<Vec<Relationship>, ReportError> {
        if !self.has_part(ROOT_RELS_PART) {
            return Ok(Vec::new());
        }
        parse_relationships(ROOT_RELS_PART, &self.part_text(ROOT_RELS_PART)?)
    }

    fn next_media_part(&self, extension: &str) -> String {
        (1..)
            .map(|n| format!("ppt/media/image{}.{}", n, extension))
            .find(|name| !self.has_part(name))
            .unwrap_or_else(|| format!("ppt/media/image0.{}", extension))
    }

    fn ensure_default_content_type(&mut self, extension: &str, content_type: &str) -> Result<(), ReportError> {
        let xml = self.part_text(CONTENT_TYPES_PART)?;
        let doc = Document::parse(&xml).map_err(|source| ReportError::Xml {
            part: CONTENT_TYPES_PART.to_string(),
            source,
        })?;
        let registered = doc.root_element().children().any(|n| {
            n.tag_name().name() == "Default"
                && n.attribute("Extension")
                    .map(|ext| ext.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
        });
        if registered {
            return Ok(());
        }

        let range = doc.root_element().range();
        let close = xml[range.clone()]
            .rfind("</")
            .map(|offset| range.start + offset)
            .ok_or_else(|| ReportError::UnsupportedMarkup(CONTENT_TYPES_PART.to_string()))?;
        let mut updated = String::with_capacity(xml.len() + 80);
        updated.push_str(&xml[..close]);
        updated.push_str(&format!(
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            escape_xml(extension),
            escape_xml(content_type)
        ));
        updated.push_str(&xml[close..]);
        self.set_part(CONTENT_TYPES_PART, updated.into_bytes());
        Ok(())
    }
}

pub fn parse_relationships(part: &str, xml: &str) -> Result<Vec<Relationship>, ReportError> {
    let doc = Document::parse(xml).map_err(|source| ReportError::Xml {
        part: part.to_string(),
        source,
    })?;
    Ok(doc
        .descendants()
        .filter(|n| n.has_tag_name((PACKAGE_RELS_NS, "Relationship")))
        .filter_map(|n| {
            Some(Relationship {
                id: n.attribute("Id")?.to_string(),
                rel_type: n.attribute("Type")?.to_string(),
                target: n.attribute("Target")?.to_string(),
                external: n.attribute("TargetMode") == Some("External"),
            })
        })
        .collect())
}

pub fn relationships_xml(rels: &[Relationship]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    for rel in rels {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            escape_xml(&rel.id),
            escape_xml(&rel.rel_type),
            escape_xml(&rel.target),
            if rel.external {
                " TargetMode=\"External\""
            } else {
                ""
            }
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn next_relationship_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|rel| rel.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn directory_of(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolves a relationship target against the part that owns it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = directory_of(source_part)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Target path of `to_part` as written in a relationship of `from_part`.
pub fn relative_target(from_part: &str, to_part: &str) -> String {
    let from: Vec<&str> = directory_of(from_part)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = to_part.split('/').collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report_service::fixtures::{template_bytes, TemplateOptions};
    use crate::services::report_service::slide::ShapeKind;

    #[test]
    fn resolves_slides_in_presentation_order() {
        let deck = Deck::from_bytes(&template_bytes(&TemplateOptions::default())).unwrap();
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.slide_part(0).unwrap(), "ppt/slides/slide1.xml");
        assert_eq!(deck.slide_part(1).unwrap(), "ppt/slides/slide2.xml");
        assert!(matches!(
            deck.slide_part(2),
            Err(ReportError::SlideOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn missing_template_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pptx");
        assert!(matches!(
            Deck::open(&missing),
            Err(ReportError::TemplateNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn garbage_is_not_a_package() {
        assert!(matches!(
            Deck::from_bytes(b"not a zip"),
            Err(ReportError::Package(_))
        ));
    }

    #[test]
    fn added_pictures_survive_a_round_trip() {
        let mut deck = Deck::from_bytes(&template_bytes(&TemplateOptions::default())).unwrap();
        let geometry = Geometry::from_inches(7.0, 3.0, 6.0, 4.0);
        deck.add_picture(1, b"png-bytes".to_vec(), ImageFormat::Png, geometry)
            .unwrap();
        deck.add_picture(1, b"emf-bytes".to_vec(), ImageFormat::Emf, geometry)
            .unwrap();

        let reopened = Deck::from_bytes(&deck.to_bytes().unwrap()).unwrap();
        let pictures: Vec<ShapeDescriptor> = reopened
            .shapes(1)
            .unwrap()
            .into_iter()
            .filter(|shape| shape.kind == ShapeKind::Picture)
            .collect();
        assert_eq!(pictures.len(), 2);
        assert_eq!(pictures[0].geometry, Some(geometry));

        let (bytes, format) = reopened
            .image(1, pictures[1].image_rel.as_deref().unwrap())
            .unwrap();
        assert_eq!(bytes, b"emf-bytes");
        assert_eq!(format, ImageFormat::Emf);

        let content_types = String::from_utf8(reopened.part(CONTENT_TYPES_PART).unwrap().to_vec()).unwrap();
        assert_eq!(content_types.matches("Extension=\"emf\"").count(), 1);
        assert_eq!(content_types.matches("Extension=\"png\"").count(), 1);
    }

    #[test]
    fn relationship_ids_keep_counting() {
        let rels = vec![
            Relationship {
                id: "rId1".into(),
                rel_type: IMAGE_REL.into(),
                target: "../media/image1.png".into(),
                external: false,
            },
            Relationship {
                id: "rId7".into(),
                rel_type: IMAGE_REL.into(),
                target: "https://example.com/x.png".into(),
                external: true,
            },
        ];
        assert_eq!(next_relationship_id(&rels), "rId8");
        assert_eq!(next_relationship_id(&[]), "rId1");

        let xml = relationships_xml(&rels);
        assert_eq!(parse_relationships("x.rels", &xml).unwrap(), rels);
    }

    #[test]
    fn part_paths() {
        assert_eq!(rels_part_for("ppt/slides/slide3.xml"), "ppt/slides/_rels/slide3.xml.rels");
        assert_eq!(rels_part_for("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(resolve_target("ppt/presentation.xml", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt/slides/slide1.xml", "../media/image2.png"), "ppt/media/image2.png");
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
        assert_eq!(resolve_target("ppt/slides/slide1.xml", "/ppt/media/a.png"), "ppt/media/a.png");
        assert_eq!(relative_target("ppt/slides/slide1.xml", "ppt/media/image1.png"), "../media/image1.png");
    }
}
