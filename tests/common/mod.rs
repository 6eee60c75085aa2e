#![allow(dead_code)]

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use salesboard::models::{AppConfig, AppState};
use salesboard::services::dataset_service::read_dataset;
use salesboard::services::VectorConverter;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Ten rows: 6 new users, 4 conversions, 40 pages visited.
pub const SALES_CSV: &str = "country,age,new_user,source,total_pages_visited,converted
UK,22,1,Ads,4,1
US,24,1,Seo,3,0
US,26,0,Seo,5,1
China,31,1,Direct,2,0
US,35,0,Ads,6,0
Germany,41,1,Seo,4,1
US,45,0,Seo,3,0
UK,50,1,Direct,5,0
US,52,1,Ads,4,1
China,58,0,Seo,4,0
";

pub struct FakeEmf;

impl VectorConverter for FakeEmf {
    fn is_available(&self) -> bool {
        true
    }

    fn convert(&self, _svg: &Path, emf: &Path) -> io::Result<()> {
        fs::write(emf, b"emf")
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub work_dir: PathBuf,
    _dir: tempfile::TempDir,
}

pub fn test_app(with_template: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("template.pptx");
    if with_template {
        fs::write(&template_path, template_bytes()).unwrap();
    }
    let work_dir = dir.path().join("work");

    let config = AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        dataset_path: dir.path().join("online_sales.csv"),
        template_path,
        work_dir: work_dir.clone(),
        converter_bin: "fake".to_string(),
    };
    let dataset = read_dataset(SALES_CSV.as_bytes()).unwrap();
    let state = Arc::new(AppState::new(dataset, config, Arc::new(FakeEmf)));

    TestApp {
        state,
        work_dir,
        _dir: dir,
    }
}

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

fn slide(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        NS, shapes
    )
}

fn text_shape(id: u32, ph: &str, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvSpPr/><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        id, id, ph, text
    )
}

/// A two slide deck: title and subtitle placeholders, then markers `A`..`E`.
pub fn template_bytes() -> Vec<u8> {
    let title = slide(&format!(
        "{}{}",
        text_shape(2, r#"<p:ph type="ctrTitle"/>"#, "Title"),
        text_shape(3, r#"<p:ph type="subTitle" idx="1"/>"#, "Subtitle")
    ));
    let markers = slide(
        &["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, m)| text_shape(i as u32 + 2, "", m))
            .collect::<String>(),
    );

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#.to_string(),
        ),
        (
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldIdLst><p:sldId id="256" r:id="rId1"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst></p:presentation>"#,
                NS
            ),
        ),
        (
            "ppt/_rels/presentation.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/></Relationships>"#.to_string(),
        ),
        ("ppt/slides/slide1.xml", title),
        ("ppt/slides/slide2.xml", markers),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in parts {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
