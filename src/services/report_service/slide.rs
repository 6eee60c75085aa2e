//! Shape-level reading and editing of a single slide part.
//!
//! Slides are kept as their original XML text. Reads go through `roxmltree`;
//! edits splice new markup into the byte ranges roxmltree reports, so every
//! part of the slide we do not touch is written back verbatim.

use roxmltree::{Document, Node};
use std::ops::Range;

use crate::errors::ReportError;
use crate::utils::escape_xml;

pub const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub const EMU_PER_INCH: i64 = 914_400;

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Geometry {
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        let emu = |inches: f64| (inches * EMU_PER_INCH as f64).round() as i64;
        Self {
            x: emu(x),
            y: emu(y),
            cx: emu(width),
            cy: emu(height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    /// Any other preset (or custom) geometry.
    AutoShape(Option<String>),
    TextBox,
    Picture,
    GraphicFrame,
    Group,
    Connector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: Option<String>,
    pub idx: u32,
}

impl Placeholder {
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_deref(), Some("title") | Some("ctrTitle"))
    }
}

/// One top-level shape of a slide, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    pub index: usize,
    pub id: u32,
    pub name: String,
    pub kind: ShapeKind,
    pub placeholder: Option<Placeholder>,
    pub geometry: Option<Geometry>,
    /// Paragraph texts joined by `\n`; `None` when the shape has no text body.
    pub text: Option<String>,
    /// Relationship id of the embedded image, for pictures.
    pub image_rel: Option<String>,
}

impl ShapeDescriptor {
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim)
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}

pub fn parse_shapes(part: &str, xml: &str) -> Result<Vec<ShapeDescriptor>, ReportError> {
    let doc = parse(part, xml)?;
    let tree = shape_tree(part, &doc)?;
    Ok(shape_nodes(tree)
        .enumerate()
        .map(|(index, node)| describe(index, node))
        .collect())
}

/// Replaces all text of shape `index` with a single run holding `text`.
///
/// Body properties, list style, the first paragraph's properties and the first
/// run's properties are carried over so the template's formatting survives.
/// An empty `text` leaves one empty paragraph.
pub fn replace_shape_text(
    part: &str,
    xml: &str,
    index: usize,
    text: &str,
) -> Result<String, ReportError> {
    let doc = parse(part, xml)?;
    require_prefix(part, &doc, P_NS, "p")?;
    require_prefix(part, &doc, A_NS, "a")?;
    let tree = shape_tree(part, &doc)?;
    let shape = shape_nodes(tree).nth(index).ok_or_else(|| {
        ReportError::UnsupportedMarkup(format!("{} has no shape #{}", part, index))
    })?;

    let slice = |node: Option<Node>| node.map(|n| &xml[n.range()]).unwrap_or("");

    if let Some(body) = child(shape, P_NS, "txBody") {
        let first_paragraph = child(body, A_NS, "p");
        let body_pr = child(body, A_NS, "bodyPr")
            .map(|n| &xml[n.range()])
            .unwrap_or("<a:bodyPr/>");
        let lst_style = slice(child(body, A_NS, "lstStyle"));
        let p_pr = slice(first_paragraph.and_then(|p| child(p, A_NS, "pPr")));
        let r_pr = slice(first_paragraph.and_then(|p| {
            p.descendants()
                .find(|n| n.has_tag_name((A_NS, "rPr")))
        }));

        let new_body = format!(
            "<p:txBody>{}{}{}</p:txBody>",
            body_pr,
            lst_style,
            paragraph_xml(p_pr, r_pr, text)
        );
        return Ok(splice(xml, body.range(), &new_body));
    }

    if shape.has_tag_name((P_NS, "sp")) {
        if let Some(sp_pr) = child(shape, P_NS, "spPr") {
            let new_body = format!(
                "<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody>",
                paragraph_xml("", "", text)
            );
            let at = sp_pr.range().end;
            return Ok(splice(xml, at..at, &new_body));
        }
    }

    Err(ReportError::UnsupportedMarkup(format!(
        "shape #{} in {} cannot hold text",
        index, part
    )))
}

/// Appends `fragment` as the last child of the slide's shape tree.
pub fn append_to_shape_tree(part: &str, xml: &str, fragment: &str) -> Result<String, ReportError> {
    let doc = parse(part, xml)?;
    require_prefix(part, &doc, P_NS, "p")?;
    require_prefix(part, &doc, A_NS, "a")?;
    require_prefix(part, &doc, R_NS, "r")?;
    let tree = shape_tree(part, &doc)?;
    let range = tree.range();
    let close = xml[range.clone()]
        .rfind("</")
        .map(|offset| range.start + offset)
        .ok_or_else(|| ReportError::UnsupportedMarkup(format!("empty shape tree in {}", part)))?;
    Ok(splice(xml, close..close, fragment))
}

pub fn next_shape_id(shapes: &[ShapeDescriptor]) -> u32 {
    // id 1 belongs to the shape tree itself
    shapes.iter().map(|shape| shape.id).max().unwrap_or(1).max(1) + 1
}

pub fn picture_xml(id: u32, name: &str, rel_id: &str, geometry: Geometry) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>\
<p:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
<p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        id = id,
        name = escape_xml(name),
        rel = escape_xml(rel_id),
        xfrm = xfrm_xml(geometry)
    )
}

/// A filled, outlined autoshape without a text body.
pub fn filled_shape_xml(id: u32, name: &str, preset: &str, geometry: Geometry, rgb: &str) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
<p:spPr>{xfrm}<a:prstGeom prst=\"{preset}\"><a:avLst/></a:prstGeom>\
<a:solidFill><a:srgbClr val=\"{rgb}\"/></a:solidFill><a:ln><a:solidFill><a:srgbClr val=\"{rgb}\"/></a:solidFill></a:ln></p:spPr></p:sp>",
        id = id,
        name = escape_xml(name),
        xfrm = xfrm_xml(geometry),
        preset = escape_xml(preset),
        rgb = rgb
    )
}

fn xfrm_xml(geometry: Geometry) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        geometry.x, geometry.y, geometry.cx, geometry.cy
    )
}

fn paragraph_xml(p_pr: &str, r_pr: &str, text: &str) -> String {
    if text.is_empty() {
        return format!("<a:p>{}</a:p>", p_pr);
    }
    let paragraphs = text
        .split('\n')
        .map(|line| {
            format!(
                "<a:p>{}<a:r>{}<a:t>{}</a:t></a:r></a:p>",
                p_pr,
                r_pr,
                escape_xml(line)
            )
        })
        .collect::<Vec<_>>();
    paragraphs.concat()
}

fn parse<'a>(part: &str, xml: &'a str) -> Result<Document<'a>, ReportError> {
    Document::parse(xml).map_err(|source| ReportError::Xml {
        part: part.to_string(),
        source,
    })
}

fn require_prefix(part: &str, doc: &Document, ns: &str, prefix: &str) -> Result<(), ReportError> {
    match doc.root_element().lookup_prefix(ns) {
        Some(bound) if bound == prefix => Ok(()),
        _ => Err(ReportError::UnsupportedMarkup(format!(
            "{} does not bind prefix '{}' to {}",
            part, prefix, ns
        ))),
    }
}

fn shape_tree<'a, 'input>(
    part: &str,
    doc: &'a Document<'input>,
) -> Result<Node<'a, 'input>, ReportError> {
    doc.descendants()
        .find(|n| n.has_tag_name((P_NS, "spTree")))
        .ok_or_else(|| ReportError::UnsupportedMarkup(format!("{} has no shape tree", part)))
}

fn shape_nodes<'a, 'input>(tree: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    tree.children().filter(|n| {
        n.is_element()
            && n.tag_name().namespace() == Some(P_NS)
            && matches!(
                n.tag_name().name(),
                "sp" | "pic" | "graphicFrame" | "grpSp" | "cxnSp"
            )
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, ns: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name((ns, name)))
}

fn describe(index: usize, node: Node) -> ShapeDescriptor {
    let non_visual = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name().starts_with("nv"));
    let c_nv_pr = non_visual.and_then(|nv| child(nv, P_NS, "cNvPr"));
    let id = c_nv_pr
        .and_then(|n| n.attribute("id"))
        .and_then(|id| id.parse().ok())
        .unwrap_or(0);
    let name = c_nv_pr
        .and_then(|n| n.attribute("name"))
        .unwrap_or_default()
        .to_string();

    let placeholder = non_visual
        .and_then(|nv| child(nv, P_NS, "nvPr"))
        .and_then(|nv_pr| child(nv_pr, P_NS, "ph"))
        .map(|ph| Placeholder {
            kind: ph.attribute("type").map(str::to_string),
            idx: ph.attribute("idx").and_then(|idx| idx.parse().ok()).unwrap_or(0),
        });

    let is_text_box = non_visual
        .and_then(|nv| child(nv, P_NS, "cNvSpPr"))
        .and_then(|n| n.attribute("txBox"))
        .map(|flag| flag == "1" || flag == "true")
        .unwrap_or(false);

    let kind = match node.tag_name().name() {
        "pic" => ShapeKind::Picture,
        "graphicFrame" => ShapeKind::GraphicFrame,
        "grpSp" => ShapeKind::Group,
        "cxnSp" => ShapeKind::Connector,
        _ if is_text_box => ShapeKind::TextBox,
        _ => {
            let preset = child(node, P_NS, "spPr")
                .and_then(|sp_pr| child(sp_pr, A_NS, "prstGeom"))
                .and_then(|geom| geom.attribute("prst"));
            match preset {
                Some("rect") => ShapeKind::Rectangle,
                Some("roundRect") => ShapeKind::RoundedRectangle,
                other => ShapeKind::AutoShape(other.map(str::to_string)),
            }
        }
    };

    let geometry = node
        .descendants()
        .find(|n| n.tag_name().name() == "xfrm")
        .and_then(|xfrm| {
            let off = xfrm.children().find(|n| n.has_tag_name((A_NS, "off")))?;
            let ext = xfrm.children().find(|n| n.has_tag_name((A_NS, "ext")))?;
            Some(Geometry {
                x: off.attribute("x")?.parse().ok()?,
                y: off.attribute("y")?.parse().ok()?,
                cx: ext.attribute("cx")?.parse().ok()?,
                cy: ext.attribute("cy")?.parse().ok()?,
            })
        });

    let text = child(node, P_NS, "txBody").map(|body| {
        body.children()
            .filter(|n| n.has_tag_name((A_NS, "p")))
            .map(|p| {
                p.descendants()
                    .filter(|n| n.has_tag_name((A_NS, "t")))
                    .filter_map(|t| t.text())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    });

    let image_rel = node
        .descendants()
        .find(|n| n.has_tag_name((A_NS, "blip")))
        .and_then(|blip| blip.attribute((R_NS, "embed")))
        .map(str::to_string);

    ShapeDescriptor {
        index,
        id,
        name,
        kind,
        placeholder,
        geometry,
        text,
        image_rel,
    }
}

fn splice(xml: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(xml.len() + replacement.len());
    out.push_str(&xml[..range.start]);
    out.push_str(replacement);
    out.push_str(&xml[range.end..]);
    out
}
