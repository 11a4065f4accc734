//! Parts of the built-in blank presentation: one master, six layouts and a
//! notes master, sized 10in x 7.5in.

use crate::parts::{
    serialize_relationships, ContentTypes, Relationship, CT_NOTES_MASTER, CT_PRESENTATION,
    CT_RELATIONSHIPS, CT_SLIDE_LAYOUT, CT_SLIDE_MASTER, CT_THEME, CT_XML, NS_DRAWING,
    NS_PRESENTATION, NS_RELATIONSHIPS, REL_TYPE_NOTES_MASTER, REL_TYPE_OFFICE_DOCUMENT,
    REL_TYPE_SLIDE_LAYOUT, REL_TYPE_SLIDE_MASTER, REL_TYPE_THEME,
};
use deckgen_core::types::{inches, Rect};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub const NOTES_MASTER_PART: &str = "ppt/notesMasters/notesMaster1.xml";

/// Placeholder declaration on a blank layout: `(type, idx, frame)`.
type PlaceholderDecl = (Option<&'static str>, u32, Rect);

struct BlankLayout {
    name: &'static str,
    layout_type: &'static str,
    placeholders: Vec<PlaceholderDecl>,
}

fn title_frame() -> Rect {
    Rect::new(457_200, 274_638, 8_229_600, 1_143_000)
}

fn blank_layouts() -> Vec<BlankLayout> {
    vec![
        BlankLayout {
            name: "Title Slide",
            layout_type: "title",
            placeholders: vec![
                (Some("ctrTitle"), 0, Rect::new(685_800, 2_130_425, 7_772_400, 1_470_025)),
                (Some("subTitle"), 1, Rect::new(1_371_600, 3_886_200, 6_400_800, 1_752_600)),
            ],
        },
        BlankLayout {
            name: "Title and Content",
            layout_type: "obj",
            placeholders: vec![
                (Some("title"), 0, title_frame()),
                (None, 1, Rect::new(457_200, 1_600_200, 8_229_600, 4_525_963)),
            ],
        },
        BlankLayout {
            name: "Section Header",
            layout_type: "secHead",
            placeholders: vec![
                (Some("title"), 0, Rect::new(722_313, 4_406_900, 7_772_400, 1_362_075)),
                (Some("body"), 1, Rect::new(722_313, 2_906_713, 7_772_400, 1_500_187)),
            ],
        },
        BlankLayout {
            name: "Two Content",
            layout_type: "twoObj",
            placeholders: vec![
                (Some("title"), 0, title_frame()),
                (None, 1, Rect::new(457_200, 1_600_200, 4_038_600, 4_525_963)),
                (None, 2, Rect::new(4_648_200, 1_600_200, 4_038_600, 4_525_963)),
            ],
        },
        BlankLayout {
            name: "Title Only",
            layout_type: "titleOnly",
            placeholders: vec![(Some("title"), 0, title_frame())],
        },
        BlankLayout {
            name: "Blank",
            layout_type: "blank",
            placeholders: Vec::new(),
        },
    ]
}

fn placeholder_sp(id: usize, decl: &PlaceholderDecl) -> String {
    let (ph_type, idx, frame) = decl;
    let mut ph_attrs = String::new();
    if let Some(ph_type) = ph_type {
        ph_attrs.push_str(&format!(r#" type="{}""#, ph_type));
    }
    if *idx != 0 {
        ph_attrs.push_str(&format!(r#" idx="{}""#, idx));
    }

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{}/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
        id,
        id - 1,
        ph_attrs,
        frame.left,
        frame.top,
        frame.width,
        frame.height
    )
}

fn sp_tree(placeholders: &[PlaceholderDecl]) -> String {
    let shapes: String = placeholders
        .iter()
        .enumerate()
        .map(|(i, decl)| placeholder_sp(i + 2, decl))
        .collect();

    format!(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree>"#,
        shapes
    )
}

fn layout_xml(layout: &BlankLayout) -> String {
    format!(
        r#"{}
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="{}" preserve="1"><p:cSld name="{}">{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        layout.layout_type,
        layout.name,
        sp_tree(&layout.placeholders)
    )
}

fn master_xml(layout_count: usize) -> String {
    let layout_ids: String = (0..layout_count)
        .map(|i| {
            format!(
                r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
                2_147_483_649u64 + i as u64,
                i + 1
            )
        })
        .collect();

    let placeholders = [
        (Some("title"), 0, title_frame()),
        (
            Some("body"),
            1,
            Rect::new(457_200, 1_600_200, 8_229_600, 4_525_963),
        ),
    ];

    format!(
        r#"{}
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        sp_tree(&placeholders),
        layout_ids
    )
}

/// An Office-style theme with Calibri fonts.
pub fn theme_xml(name: &str) -> String {
    format!(
        r#"{}
<a:theme xmlns:a="{}" name="{}"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
        XML_DECLARATION, NS_DRAWING, name
    )
}

/// Notes master with a slide image and a notes body placeholder.
pub fn notes_master_xml() -> String {
    let placeholders = [
        (
            Some("sldImg"),
            2,
            Rect::new(1_143_000, 685_800, 4_572_000, 3_429_000),
        ),
        (
            Some("body"),
            3,
            Rect::new(685_800, 4_343_400, 5_486_400, 4_114_800),
        ),
    ];

    format!(
        r#"{}
<p:notesMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/></p:notesMaster>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        sp_tree(&placeholders)
    )
}

/// Relationships of the notes master to its theme part.
pub fn notes_master_rels(theme_target: &str) -> String {
    serialize_relationships(&[Relationship::new("rId1", REL_TYPE_THEME, theme_target)])
}

/// All parts of the blank presentation, without slides.
pub fn parts() -> Vec<(String, String)> {
    let layouts = blank_layouts();
    let mut parts = Vec::new();

    let mut types = ContentTypes::default();
    types.ensure_default("rels", CT_RELATIONSHIPS);
    types.ensure_default("xml", CT_XML);
    types.set_override("ppt/presentation.xml", CT_PRESENTATION);
    types.set_override("ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER);
    types.set_override("ppt/theme/theme1.xml", CT_THEME);
    types.set_override("ppt/theme/theme2.xml", CT_THEME);
    types.set_override(NOTES_MASTER_PART, CT_NOTES_MASTER);

    parts.push((
        "_rels/.rels".to_string(),
        serialize_relationships(&[Relationship::new(
            "rId1",
            REL_TYPE_OFFICE_DOCUMENT,
            "ppt/presentation.xml",
        )]),
    ));

    parts.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"{}
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId3"/></p:notesMasterIdLst><p:sldSz cx="{}" cy="{}" type="screen4x3"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
            XML_DECLARATION,
            NS_DRAWING,
            NS_RELATIONSHIPS,
            NS_PRESENTATION,
            inches(10.0),
            inches(7.5),
            inches(7.5),
            inches(10.0)
        ),
    ));

    parts.push((
        "ppt/_rels/presentation.xml.rels".to_string(),
        serialize_relationships(&[
            Relationship::new("rId1", REL_TYPE_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new("rId2", REL_TYPE_THEME, "theme/theme1.xml"),
            Relationship::new("rId3", REL_TYPE_NOTES_MASTER, "notesMasters/notesMaster1.xml"),
        ]),
    ));

    parts.push(("ppt/theme/theme1.xml".to_string(), theme_xml("Blank")));
    parts.push(("ppt/theme/theme2.xml".to_string(), theme_xml("Blank Notes")));

    parts.push((
        "ppt/slideMasters/slideMaster1.xml".to_string(),
        master_xml(layouts.len()),
    ));

    let mut master_rels: Vec<Relationship> = (0..layouts.len())
        .map(|i| {
            Relationship::new(
                format!("rId{}", i + 1),
                REL_TYPE_SLIDE_LAYOUT,
                format!("../slideLayouts/slideLayout{}.xml", i + 1),
            )
        })
        .collect();
    master_rels.push(Relationship::new(
        format!("rId{}", layouts.len() + 1),
        REL_TYPE_THEME,
        "../theme/theme1.xml",
    ));
    parts.push((
        "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
        serialize_relationships(&master_rels),
    ));

    for (i, layout) in layouts.iter().enumerate() {
        let part = format!("ppt/slideLayouts/slideLayout{}.xml", i + 1);
        types.set_override(&part, CT_SLIDE_LAYOUT);
        parts.push((part, layout_xml(layout)));
        parts.push((
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            serialize_relationships(&[Relationship::new(
                "rId1",
                REL_TYPE_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )]),
        ));
    }

    parts.push((NOTES_MASTER_PART.to_string(), notes_master_xml()));
    parts.push((
        "ppt/notesMasters/_rels/notesMaster1.xml.rels".to_string(),
        notes_master_rels("../theme/theme2.xml"),
    ));

    parts.push(("[Content_Types].xml".to_string(), types.to_xml()));
    parts
}
