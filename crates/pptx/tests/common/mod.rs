//! Fixture templates written through `zip`, plus small image helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// A layout in a fixture template: name plus `(type, idx)` placeholders.
pub struct FixtureLayout {
    pub name: String,
    pub placeholders: Vec<(Option<&'static str>, u32)>,
}

impl FixtureLayout {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            placeholders: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, ph_type: Option<&'static str>, idx: u32) -> Self {
        self.placeholders.push((ph_type, idx));
        self
    }

    /// Title and body placeholders.
    pub fn title_and_body(name: &str) -> Self {
        Self::new(name)
            .with_placeholder(Some("title"), 0)
            .with_placeholder(None, 1)
    }
}

/// Builder for template packages on disk.
pub struct TemplateFixture {
    layouts: Vec<FixtureLayout>,
    slides: Vec<String>,
    theme: bool,
    potx: bool,
}

impl TemplateFixture {
    pub fn new() -> Self {
        Self {
            layouts: Vec::new(),
            slides: Vec::new(),
            theme: true,
            potx: false,
        }
    }

    pub fn with_layout(mut self, layout: FixtureLayout) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Add an existing slide whose `p:cSld` content is `body`.
    pub fn with_slide(mut self, body: &str) -> Self {
        self.slides.push(body.to_string());
        self
    }

    pub fn without_theme(mut self) -> Self {
        self.theme = false;
        self
    }

    /// Declare the main part with the template content type.
    pub fn as_potx(mut self) -> Self {
        self.potx = true;
        self
    }

    /// The usual six-layout catalog.
    pub fn office() -> Self {
        Self::new()
            .with_layout(
                FixtureLayout::new("Title Slide")
                    .with_placeholder(Some("ctrTitle"), 0)
                    .with_placeholder(Some("subTitle"), 1),
            )
            .with_layout(FixtureLayout::title_and_body("Title and Content"))
            .with_layout(
                FixtureLayout::new("Section Header")
                    .with_placeholder(Some("title"), 0)
                    .with_placeholder(Some("body"), 1),
            )
            .with_layout(
                FixtureLayout::title_and_body("Two Content").with_placeholder(None, 2),
            )
            .with_layout(FixtureLayout::new("Title Only").with_placeholder(Some("title"), 0))
            .with_layout(FixtureLayout::new("Blank"))
    }

    fn parts(&self) -> Vec<(String, String)> {
        let mut parts = Vec::new();
        let mut overrides = vec![
            (
                "/ppt/presentation.xml".to_string(),
                if self.potx {
                    format!("{}.presentationml.template.main+xml", CT_BASE)
                } else {
                    format!("{}.presentationml.presentation.main+xml", CT_BASE)
                },
            ),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                format!("{}.presentationml.slideMaster+xml", CT_BASE),
            ),
        ];

        parts.push((
            "_rels/.rels".to_string(),
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ));

        let mut pres_rels = vec![(
            "rId1".to_string(),
            "slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        let mut slide_ids = String::new();
        for (i, body) in self.slides.iter().enumerate() {
            let n = i + 1;
            let rel_id = format!("rId{}", n + 10);
            pres_rels.push((rel_id.clone(), "slide", format!("slides/slide{}.xml", n)));
            slide_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 255 + n, rel_id));

            parts.push((
                format!("ppt/slides/slide{}.xml", n),
                format!(r#"<p:sld {}><p:cSld>{}</p:cSld></p:sld>"#, NS, body),
            ));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
            overrides.push((
                format!("/ppt/slides/slide{}.xml", n),
                format!("{}.presentationml.slide+xml", CT_BASE),
            ));
        }

        let slide_list = if slide_ids.is_empty() {
            String::new()
        } else {
            format!("<p:sldIdLst>{}</p:sldIdLst>", slide_ids)
        };
        parts.push((
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{}<p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
                NS, slide_list
            ),
        ));
        let pres_rels: Vec<(&str, &str, &str)> = pres_rels
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        parts.push(("ppt/_rels/presentation.xml.rels".to_string(), rels(&pres_rels)));

        let layout_ids: String = (0..self.layouts.len())
            .map(|i| {
                format!(
                    r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
                    2147483649u64 + i as u64,
                    i + 1
                )
            })
            .collect();
        parts.push((
            "ppt/slideMasters/slideMaster1.xml".to_string(),
            format!(
                r#"<p:sldMaster {}><p:cSld><p:spTree/></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
                NS, layout_ids
            ),
        ));

        let mut master_rels: Vec<(String, &str, String)> = (0..self.layouts.len())
            .map(|i| {
                (
                    format!("rId{}", i + 1),
                    "slideLayout",
                    format!("../slideLayouts/slideLayout{}.xml", i + 1),
                )
            })
            .collect();
        if self.theme {
            master_rels.push((
                format!("rId{}", self.layouts.len() + 1),
                "theme",
                "../theme/theme1.xml".to_string(),
            ));
            parts.push(("ppt/theme/theme1.xml".to_string(), theme()));
            overrides.push((
                "/ppt/theme/theme1.xml".to_string(),
                format!("{}.theme+xml", CT_BASE),
            ));
        }
        let master_rels: Vec<(&str, &str, &str)> = master_rels
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        parts.push((
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            rels(&master_rels),
        ));

        for (i, layout) in self.layouts.iter().enumerate() {
            let shapes: String = layout
                .placeholders
                .iter()
                .enumerate()
                .map(|(j, (ph_type, idx))| {
                    let type_attr = ph_type
                        .map(|t| format!(r#" type="{}""#, t))
                        .unwrap_or_default();
                    format!(
                        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {}"/><p:cNvSpPr/><p:nvPr><p:ph{} idx="{}"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="{}"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr></p:sp>"#,
                        j + 2,
                        j + 1,
                        type_attr,
                        idx,
                        274638 + j as i64 * 1325562
                    )
                })
                .collect();

            parts.push((
                format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
                format!(
                    r#"<p:sldLayout {}><p:cSld name="{}"><p:spTree>{}</p:spTree></p:cSld></p:sldLayout>"#,
                    NS, layout.name, shapes
                ),
            ));
            parts.push((
                format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ));
            overrides.push((
                format!("/ppt/slideLayouts/slideLayout{}.xml", i + 1),
                format!("{}.presentationml.slideLayout+xml", CT_BASE),
            ));
        }

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        for (part, ct) in overrides {
            types.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, ct
            ));
        }
        types.push_str("</Types>");
        parts.insert(0, ("[Content_Types].xml".to_string(), types));

        parts
    }

    /// Write the template to `dir/name`.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        for (name, content) in self.parts() {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">"#,
        REL_NS
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn theme() -> String {
    format!(
        r#"<a:theme {} name="Fixture"><a:themeElements><a:clrScheme name="Fixture"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="2563EB"/></a:accent1></a:clrScheme><a:fontScheme name="Fixture"><a:majorFont><a:latin typeface="Georgia"/></a:majorFont><a:minorFont><a:latin typeface="Verdana"/></a:minorFont></a:fontScheme></a:themeElements></a:theme>"#,
        NS
    )
}

/// A blank PNG of the given pixel size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// A PNG whose signature and header are intact but whose body is junk.
pub fn corrupt_png() -> Vec<u8> {
    let mut bytes = png(10, 10);
    bytes.truncate(33);
    bytes.extend_from_slice(b"garbage-not-a-png-body");
    bytes
}

/// Write a blank PNG to `dir/name`.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png(width, height)).unwrap();
    path
}

/// Number of `.pptx` files in `dir`.
pub fn pptx_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|e| e == "pptx"))
        .count()
}
