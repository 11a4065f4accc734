//! PresentationML serialization for composed slides and notes.

use crate::parts::{NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS};
use crate::slide::{Paragraph, Shape, SlideDraft, TextFrame};
use deckgen_core::{Rect, TransitionKind};
use quick_xml::escape::escape;

const LANG: &str = "en-US";

/// Escape text for element content, dropping characters XML 1.0 forbids.
pub fn xml_text(text: &str) -> String {
    let allowed: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .filter(|&c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect();
    escape(&allowed).into_owned()
}

/// Points to hundredths of a point, as used by `sz` and `spcPts`.
fn centipoints(points: f64) -> i64 {
    (points * 100.0).round() as i64
}

fn xfrm_xml(frame: &Rect) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.left, frame.top, frame.width, frame.height
    )
}

fn paragraph_xml(paragraph: &Paragraph) -> String {
    let mut ppr_attrs = String::new();
    if paragraph.level > 0 {
        ppr_attrs.push_str(&format!(r#" lvl="{}""#, paragraph.level));
    }
    ppr_attrs.push_str(&format!(r#" algn="{}""#, paragraph.alignment.as_ooxml()));

    let mut ppr_children = String::new();
    if let Some(before) = paragraph.space_before {
        ppr_children.push_str(&format!(
            r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#,
            centipoints(before)
        ));
    }
    if let Some(after) = paragraph.space_after {
        ppr_children.push_str(&format!(
            r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#,
            centipoints(after)
        ));
    }

    let ppr = if ppr_children.is_empty() {
        format!("<a:pPr{}/>", ppr_attrs)
    } else {
        format!("<a:pPr{}>{}</a:pPr>", ppr_attrs, ppr_children)
    };

    let style = &paragraph.style;
    let mut rpr_attrs = format!(r#"lang="{}""#, LANG);
    if let Some(size) = style.size {
        rpr_attrs.push_str(&format!(r#" sz="{}""#, centipoints(size)));
    }
    if style.bold {
        rpr_attrs.push_str(r#" b="1""#);
    }
    if style.italic {
        rpr_attrs.push_str(r#" i="1""#);
    }
    if style.underline {
        rpr_attrs.push_str(r#" u="sng""#);
    }
    rpr_attrs.push_str(r#" dirty="0""#);

    let mut rpr_children = String::new();
    if let Some(color) = style.color {
        rpr_children.push_str(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.to_srgb_val()
        ));
    }
    if let Some(font) = &style.font {
        let font = escape(font.as_str());
        rpr_children.push_str(&format!(
            r#"<a:latin typeface="{}"/><a:cs typeface="{}"/>"#,
            font, font
        ));
    }

    if paragraph.text.is_empty() {
        return format!(
            "<a:p>{}<a:endParaRPr {}>{}</a:endParaRPr></a:p>",
            ppr, rpr_attrs, rpr_children
        );
    }

    format!(
        "<a:p>{}<a:r><a:rPr {}>{}</a:rPr><a:t>{}</a:t></a:r></a:p>",
        ppr,
        rpr_attrs,
        rpr_children,
        xml_text(&paragraph.text)
    )
}

fn text_body_xml(frame: &TextFrame) -> String {
    let mut body_attrs = String::new();
    if frame.wrap {
        body_attrs.push_str(r#" wrap="square""#);
    }
    if let Some(m) = &frame.margins {
        body_attrs.push_str(&format!(
            r#" lIns="{}" tIns="{}" rIns="{}" bIns="{}""#,
            m.left, m.top, m.right, m.bottom
        ));
    }
    body_attrs.push_str(&format!(r#" anchor="{}""#, frame.anchor.as_ooxml()));

    let autofit = if frame.wrap { "<a:noAutofit/>" } else { "" };

    let paragraphs: String = if frame.paragraphs.is_empty() {
        format!(r#"<a:p><a:endParaRPr lang="{}"/></a:p>"#, LANG)
    } else {
        frame.paragraphs.iter().map(paragraph_xml).collect()
    };

    format!(
        "<p:txBody><a:bodyPr{}>{}</a:bodyPr><a:lstStyle/>{}</p:txBody>",
        body_attrs, autofit, paragraphs
    )
}

fn placeholder_xml(
    id: usize,
    kind: deckgen_core::PlaceholderKind,
    idx: u32,
    frame: Option<&Rect>,
    text: Option<&TextFrame>,
) -> String {
    let mut ph_attrs = String::new();
    if let Some(ph_type) = kind.as_ooxml() {
        ph_attrs.push_str(&format!(r#" type="{}""#, ph_type));
    }
    if idx != 0 {
        ph_attrs.push_str(&format!(r#" idx="{}""#, idx));
    }

    let sp_pr = match frame {
        Some(frame) => format!("<p:spPr>{}</p:spPr>", xfrm_xml(frame)),
        None => "<p:spPr/>".to_string(),
    };

    let body = match text {
        Some(text) => text_body_xml(text),
        None => format!(
            r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="{}"/></a:p></p:txBody>"#,
            LANG
        ),
    };

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{}/></p:nvPr></p:nvSpPr>{}{}</p:sp>"#,
        id,
        id - 1,
        ph_attrs,
        sp_pr,
        body
    )
}

fn text_box_xml(id: usize, name: &str, frame: &Rect, text: &TextFrame) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>{}</p:sp>"#,
        id,
        escape(name),
        xfrm_xml(frame),
        text_body_xml(text)
    )
}

fn picture_xml(id: usize, name: &str, frame: &Rect, rel_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id,
        escape(name),
        escape(rel_id),
        xfrm_xml(frame)
    )
}

/// The `p:transition` element for a transition kind.
pub fn transition_xml(kind: TransitionKind) -> String {
    let effect = match kind {
        TransitionKind::Fade => "<p:fade/>",
        TransitionKind::Push => "<p:push/>",
        TransitionKind::Wipe => "<p:wipe/>",
        TransitionKind::Split => "<p:split/>",
        TransitionKind::Reveal => "<p:pull/>",
        TransitionKind::Cover => "<p:cover/>",
        TransitionKind::Cut => "<p:cut/>",
    };
    format!(r#"<p:transition spd="med">{}</p:transition>"#, effect)
}

/// Serialize a slide. `picture_rel_ids` holds one relationship id per
/// picture, in shape order.
pub fn slide_xml(draft: &SlideDraft, picture_rel_ids: &[String]) -> String {
    let mut shapes = String::new();
    let mut pictures = picture_rel_ids.iter();

    // Id 1 is the group shape.
    for (i, shape) in draft.shapes.iter().enumerate() {
        let id = i + 2;
        match shape {
            Shape::Placeholder {
                kind,
                idx,
                frame,
                text,
            } => shapes.push_str(&placeholder_xml(id, *kind, *idx, frame.as_ref(), text.as_ref())),
            Shape::TextBox { name, frame, text } => {
                shapes.push_str(&text_box_xml(id, name, frame, text))
            }
            Shape::Picture { name, frame, .. } => match pictures.next() {
                Some(rel_id) => shapes.push_str(&picture_xml(id, name, frame, rel_id)),
                None => log::warn!("Picture '{}' has no relationship; skipped", name),
            },
        }
    }

    let transition = draft.transition.map(transition_xml).unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>{}</p:sld>"#,
        NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, shapes, transition
    )
}

/// Serialize a notes slide; each line of `notes` becomes a paragraph.
pub fn notes_xml(notes: &str) -> String {
    let paragraphs: String = notes
        .lines()
        .map(|line| {
            if line.is_empty() {
                format!(r#"<a:p><a:endParaRPr lang="{}"/></a:p>"#, LANG)
            } else {
                format!(
                    r#"<a:p><a:r><a:rPr lang="{}" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                    LANG,
                    xml_text(line)
                )
            }
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
        NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, paragraphs
    )
}
