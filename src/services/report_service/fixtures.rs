//! In-memory `.pptx` templates for the report tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const LOGO_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nlogo";

const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

#[derive(Debug, Clone)]
pub struct TemplateOptions {
    pub slides: usize,
    /// Text boxes `A`..`E` on the second slide.
    pub markers: bool,
    /// A wide rectangle, a rounded rectangle and a picture on the first slide.
    pub decorations: bool,
    pub subtitle: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            slides: 2,
            markers: true,
            decorations: false,
            subtitle: true,
        }
    }
}

pub fn template_bytes(options: &TemplateOptions) -> Vec<u8> {
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
    let mut push = |name: &str, xml: String| parts.push((name.to_string(), xml.into_bytes()));

    let overrides: String = (1..=options.slides)
        .map(|n| format!(r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#, n))
        .collect();
    let png_default = if options.decorations {
        r#"<Default Extension="png" ContentType="image/png"/>"#
    } else {
        ""
    };
    push(
        "[Content_Types].xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{}</Types>"#,
            png_default, overrides
        ),
    );
    push(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
            .to_string(),
    );

    // rels are listed in reverse so slide order has to come from sldIdLst
    let slide_ids: String = (1..=options.slides)
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1))
        .collect();
    push(
        "ppt/presentation.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {}><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#,
            NAMESPACES, slide_ids
        ),
    );
    let slide_rels: String = (1..=options.slides)
        .rev()
        .map(|n| format!(r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#, n + 1, n))
        .collect();
    push(
        "ppt/_rels/presentation.xml.rels",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            slide_rels
        ),
    );

    for n in 1..=options.slides {
        let shapes = match n {
            1 => title_slide_shapes(options),
            2 if options.markers => marker_shapes(),
            _ => String::new(),
        };
        push(
            &format!("ppt/slides/slide{}.xml", n),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
                NAMESPACES, shapes
            ),
        );
    }

    if options.decorations {
        push(
            "ppt/slides/_rels/slide1.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/></Relationships>"#
                .to_string(),
        );
        parts.push(("ppt/media/image1.png".to_string(), LOGO_BYTES.to_vec()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in parts {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn xfrm(x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        x, y, cx, cy
    )
}

fn text_body(text: &str) -> String {
    format!(
        r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" sz="2000"/><a:t>{}</a:t></a:r></a:p></p:txBody>"#,
        text
    )
}

fn title_slide_shapes(options: &TemplateOptions) -> String {
    let mut shapes = format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr><p:spPr/>{}</p:sp>"#,
        text_body("Title")
    );
    if options.subtitle {
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Subtitle 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>{}</p:sp>"#,
            text_body("Subtitle")
        ));
    }
    if options.decorations {
        const INCH: i64 = 914_400;
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Banner"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>{}</p:sp>"#,
            xfrm(0, 0, 13 * INCH, INCH),
            text_body("Banner text")
        ));
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="5" name="Card"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom></p:spPr></p:sp>"#,
            xfrm(INCH, 2 * INCH, 2 * INCH, INCH)
        ));
        shapes.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="6" name="Logo"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId1"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            xfrm(10 * INCH, 5 * INCH, INCH, INCH)
        ));
    }
    shapes
}

fn marker_shapes() -> String {
    ["A", "B", "C", "D", "E"]
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let i = i as i64;
            format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="TextBox {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>{}</p:sp>"#,
                i + 2,
                i + 1,
                xfrm(457_200 + i * 2_286_000, 457_200, 2_000_000, 600_000),
                text_body(&format!(" {} ", marker))
            )
        })
        .collect()
}
