//! The output presentation: a base package with its slides removed, to which
//! composed slides are appended.

use crate::blank::{notes_master_rels, notes_master_xml, theme_xml, NOTES_MASTER_PART};
use crate::package::Package;
use crate::parts::{
    next_rel_id, relative_target, rels_path_for, resolve_target, serialize_relationships,
    ContentTypes, Relationship, CT_NOTES_MASTER, CT_NOTES_SLIDE, CT_PRESENTATION, CT_SLIDE,
    CT_THEME, PRESENTATION_PART, REL_TYPE_IMAGE, REL_TYPE_NOTES_MASTER, REL_TYPE_NOTES_SLIDE,
    REL_TYPE_SLIDE, REL_TYPE_SLIDE_LAYOUT,
};
use crate::slide::SlideDraft;
use crate::xml::{notes_xml, slide_xml};
use deckgen_core::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide\d+\.xml$").unwrap());

static NOTES_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/notesSlides/notesSlide\d+\.xml$").unwrap());

static SLIDE_ID_LIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?sldIdLst\s*/>|<(?:\w+:)?sldIdLst>.*?</(?:\w+:)?sldIdLst>").unwrap()
});

static SECTION_EXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?ext\s[^>]*>\s*<\w+:sectionLst[\s>].*?</\w+:sectionLst>\s*</(?:\w+:)?ext>")
        .unwrap()
});

static EMPTY_EXT_LIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?extLst>\s*</(?:\w+:)?extLst>|<(?:\w+:)?extLst\s*/>").unwrap()
});

static NOTES_MASTER_LIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?notesMasterIdLst\s*/>|<(?:\w+:)?notesMasterIdLst>.*?</(?:\w+:)?notesMasterIdLst>")
        .unwrap()
});

static ROOT_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:(\w+):)?presentation[\s>/]").unwrap());

static REL_NS_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"xmlns:(\w+)="http://schemas\.openxmlformats\.org/officeDocument/2006/relationships""#,
    )
    .unwrap()
});

/// Slide ids start here; lower values are reserved.
const FIRST_SLIDE_ID: u32 = 256;

fn is_template_type(content_type: &str) -> bool {
    content_type.contains(".template.") || content_type.contains("template.macroEnabled")
}

/// Element prefixes `(presentationml, relationships)` used by a presentation part.
fn prefixes(xml: &str) -> (String, String) {
    let pml = ROOT_PREFIX_REGEX
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| format!("{}:", m.as_str()))
        .unwrap_or_default();
    let rel = REL_NS_PREFIX_REGEX
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "r".to_string());
    (pml, rel)
}

/// A presentation being assembled.
#[derive(Debug)]
pub struct DeckDocument {
    package: Package,
    types: ContentTypes,
    pres_rels: Vec<Relationship>,
    /// `(slide id, relationship id)` in deck order.
    slide_ids: Vec<(u32, String)>,
    media_count: usize,
    notes_master: Option<String>,
}

impl DeckDocument {
    /// Prepare a template package as the base of a new deck.
    ///
    /// Existing slides and their notes, relationships, content-type
    /// overrides and section lists are removed; a template main part is
    /// retyped as a presentation.
    pub fn from_template(mut package: Package) -> Result<Self> {
        let mut presentation = package.read_xml(PRESENTATION_PART)?;
        let mut types = package.content_types()?;
        let mut pres_rels = package.relationships(PRESENTATION_PART)?;

        let mut removed: Vec<String> = types.parts_of_type(CT_SLIDE);
        removed.extend(types.parts_of_type(CT_NOTES_SLIDE));
        removed.extend(
            package
                .part_names()
                .filter(|name| SLIDE_PART_REGEX.is_match(name) || NOTES_PART_REGEX.is_match(name))
                .map(|name| name.to_string()),
        );
        removed.sort();
        removed.dedup();

        for part in &removed {
            package.remove_part(part);
            package.remove_part(&rels_path_for(part));
            types.remove_override(part);
        }
        if !removed.is_empty() {
            log::debug!("Removed {} template slide parts", removed.len());
        }

        pres_rels.retain(|r| r.rel_type != REL_TYPE_SLIDE);

        presentation = SLIDE_ID_LIST_REGEX.replace_all(&presentation, "").into_owned();
        presentation = SECTION_EXT_REGEX.replace_all(&presentation, "").into_owned();
        presentation = EMPTY_EXT_LIST_REGEX.replace_all(&presentation, "").into_owned();
        package.set_part(PRESENTATION_PART, presentation);

        if let Some(ct) = types.content_type_of(PRESENTATION_PART) {
            if is_template_type(ct) {
                log::debug!("Retyping template main part as a presentation");
                types.set_override(PRESENTATION_PART, CT_PRESENTATION);
            }
        }

        let mut document = Self {
            package,
            types,
            pres_rels,
            slide_ids: Vec::new(),
            media_count: 0,
            notes_master: None,
        };
        document.ensure_notes_master()?;
        Ok(document)
    }

    /// A deck based on the built-in blank presentation.
    pub fn blank() -> Result<Self> {
        Self::from_template(Package::blank())
    }

    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }

    /// Locate the notes master, adding a blank one when the template has none.
    fn ensure_notes_master(&mut self) -> Result<()> {
        if let Some(rel) = self
            .pres_rels
            .iter()
            .find(|r| r.rel_type == REL_TYPE_NOTES_MASTER)
        {
            let part = resolve_target(PRESENTATION_PART, &rel.target);
            if self.package.has_part(&part) {
                self.notes_master = Some(part);
                return Ok(());
            }
        }

        let part = (1..)
            .map(|n| format!("ppt/notesMasters/notesMaster{}.xml", n))
            .find(|p| !self.package.has_part(p))
            .unwrap_or_else(|| NOTES_MASTER_PART.to_string());
        let theme = (1..)
            .map(|n| format!("ppt/theme/theme{}.xml", n))
            .find(|p| !self.package.has_part(p))
            .unwrap_or_else(|| "ppt/theme/themeNotes.xml".to_string());

        self.package.set_part(&theme, theme_xml("Notes"));
        self.package.set_part(&part, notes_master_xml());
        self.package.set_part(
            rels_path_for(&part),
            notes_master_rels(&relative_target(&part, &theme)),
        );
        self.types.set_override(&theme, CT_THEME);
        self.types.set_override(&part, CT_NOTES_MASTER);

        let rel_id = next_rel_id(&self.pres_rels);
        self.pres_rels.push(Relationship::new(
            rel_id.as_str(),
            REL_TYPE_NOTES_MASTER,
            relative_target(PRESENTATION_PART, &part),
        ));

        let presentation = self.package.read_xml(PRESENTATION_PART)?;
        let presentation = NOTES_MASTER_LIST_REGEX.replace_all(&presentation, "");
        let (p, r) = prefixes(&presentation);
        let id_list = format!(
            r#"<{p}notesMasterIdLst><{p}notesMasterId {r}:id="{id}"/></{p}notesMasterIdLst>"#,
            p = p,
            r = r,
            id = rel_id
        );
        let presentation = insert_after_master_list(&presentation, &p, &id_list)?;
        self.package.set_part(PRESENTATION_PART, presentation);

        log::debug!("Added notes master '{}'", part);
        self.notes_master = Some(part);
        Ok(())
    }

    /// Append a composed slide based on the layout part `layout_part`.
    pub fn add_slide(&mut self, layout_part: &str, draft: &SlideDraft) -> Result<()> {
        if !self.package.has_part(layout_part) {
            return Err(Error::LayoutApplication(format!(
                "Layout part '{}' not found",
                layout_part
            )));
        }

        let number = self.slide_ids.len() + 1;
        let part = format!("ppt/slides/slide{}.xml", number);

        let mut rels = vec![Relationship::new(
            "rId1",
            REL_TYPE_SLIDE_LAYOUT,
            relative_target(&part, layout_part),
        )];

        let notes_part = match (&self.notes_master, draft.notes.trim().is_empty()) {
            (Some(master), false) => {
                let notes_part = format!("ppt/notesSlides/notesSlide{}.xml", number);
                rels.push(Relationship::new(
                    "rId2",
                    REL_TYPE_NOTES_SLIDE,
                    relative_target(&part, &notes_part),
                ));
                Some((notes_part, master.clone()))
            }
            _ => None,
        };

        let mut picture_rel_ids = Vec::new();
        for image in draft.pictures() {
            let media = self.next_media_part(image.format.extension());
            self.package.set_part(&media, image.bytes.clone());
            self.types
                .ensure_default(image.format.extension(), image.format.content_type());

            let rel_id = next_rel_id(&rels);
            rels.push(Relationship::new(
                rel_id.as_str(),
                REL_TYPE_IMAGE,
                relative_target(&part, &media),
            ));
            picture_rel_ids.push(rel_id);
        }

        self.package.set_part(&part, slide_xml(draft, &picture_rel_ids));
        self.package
            .set_part(rels_path_for(&part), serialize_relationships(&rels));
        self.types.set_override(&part, CT_SLIDE);

        if let Some((notes_part, master)) = notes_part {
            self.package.set_part(&notes_part, notes_xml(&draft.notes));
            self.package.set_part(
                rels_path_for(&notes_part),
                serialize_relationships(&[
                    Relationship::new(
                        "rId1",
                        REL_TYPE_NOTES_MASTER,
                        relative_target(&notes_part, &master),
                    ),
                    Relationship::new("rId2", REL_TYPE_SLIDE, relative_target(&notes_part, &part)),
                ]),
            );
            self.types.set_override(&notes_part, CT_NOTES_SLIDE);
        }

        let rel_id = next_rel_id(&self.pres_rels);
        self.pres_rels.push(Relationship::new(
            rel_id.as_str(),
            REL_TYPE_SLIDE,
            relative_target(PRESENTATION_PART, &part),
        ));
        self.slide_ids
            .push((FIRST_SLIDE_ID + self.slide_ids.len() as u32, rel_id));

        Ok(())
    }

    fn next_media_part(&mut self, extension: &str) -> String {
        loop {
            self.media_count += 1;
            let part = format!("ppt/media/image{}.{}", self.media_count, extension);
            if !self.package.has_part(&part) {
                return part;
            }
        }
    }

    /// Write the slide list, relationships and content types back into the
    /// package.
    pub fn finish(mut self) -> Result<Package> {
        let presentation = self.package.read_xml(PRESENTATION_PART)?;
        let (p, r) = prefixes(&presentation);

        let presentation = if self.slide_ids.is_empty() {
            presentation
        } else {
            let ids: String = self
                .slide_ids
                .iter()
                .map(|(id, rel_id)| format!(r#"<{}sldId id="{}" {}:id="{}"/>"#, p, id, r, rel_id))
                .collect();
            let list = format!("<{p}sldIdLst>{ids}</{p}sldIdLst>", p = p, ids = ids);

            let anchor = format!("<{}sldSz", p);
            match presentation.find(&anchor) {
                Some(pos) => {
                    let mut updated = presentation.clone();
                    updated.insert_str(pos, &list);
                    updated
                }
                None => insert_after_master_list(&presentation, &p, &list)?,
            }
        };

        self.package.set_part(PRESENTATION_PART, presentation);
        self.package.set_part(
            rels_path_for(PRESENTATION_PART),
            serialize_relationships(&self.pres_rels),
        );
        self.package.set_content_types(&self.types);
        Ok(self.package)
    }

    /// Finish and serialize to PPTX bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.finish()?.to_bytes()
    }

    /// Part name of the notes master in use.
    pub fn notes_master(&self) -> Option<&str> {
        self.notes_master.as_deref()
    }
}

/// Insert `fragment` right after the slide master id list.
fn insert_after_master_list(presentation: &str, prefix: &str, fragment: &str) -> Result<String> {
    let close = format!("</{}sldMasterIdLst>", prefix);
    let pos = presentation
        .find(&close)
        .map(|pos| pos + close.len())
        .ok_or_else(|| Error::Xml("Presentation part has no slide master list".to_string()))?;

    let mut updated = presentation.to_string();
    updated.insert_str(pos, fragment);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::png;
    use crate::media::ImageData;
    use crate::parts::{parse_relationships, CT_TEMPLATE};
    use crate::slide::{Paragraph, Shape, TextFrame};
    use deckgen_core::{PlaceholderKind, Rect};

    const LAYOUT: &str = "ppt/slideLayouts/slideLayout2.xml";

    fn draft(title: &str, notes: &str) -> SlideDraft {
        let mut text = TextFrame::new();
        text.push(Paragraph::new(title));

        let mut draft = SlideDraft::new(1);
        draft.push(Shape::Placeholder {
            kind: PlaceholderKind::Title,
            idx: 0,
            frame: None,
            text: Some(text),
        });
        draft.notes = notes.to_string();
        draft
    }

    /// A blank deck with two slides, retyped as a template with a section list.
    fn template_with_slides() -> Package {
        let mut document = DeckDocument::blank().unwrap();
        document.add_slide(LAYOUT, &draft("One", "Notes one")).unwrap();
        document.add_slide(LAYOUT, &draft("Two", "")).unwrap();
        let mut package = document.finish().unwrap();

        let mut types = package.content_types().unwrap();
        types.set_override(PRESENTATION_PART, CT_TEMPLATE);
        package.set_content_types(&types);

        let presentation = package.read_xml(PRESENTATION_PART).unwrap().replace(
            "</p:presentation>",
            r#"<p:extLst><p:ext uri="{521415D9-36F7-43E2-AB2F-B90AF26B5E84}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main"><p14:section name="Intro" id="{00000000-0000-0000-0000-000000000001}"><p14:sldIdLst><p14:sldId id="256"/></p14:sldIdLst></p14:section></p14:sectionLst></p:ext></p:extLst></p:presentation>"#,
        );
        package.set_part(PRESENTATION_PART, presentation);
        package
    }

    #[test]
    fn test_add_slides_and_finish() {
        let mut document = DeckDocument::blank().unwrap();
        document.add_slide(LAYOUT, &draft("One", "Say hello")).unwrap();
        document.add_slide(LAYOUT, &draft("Two", "")).unwrap();
        assert_eq!(document.slide_count(), 2);

        let package = document.finish().unwrap();
        let presentation = package.read_xml(PRESENTATION_PART).unwrap();
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId4"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId5"/>"#));
        assert!(presentation.find("<p:sldIdLst>").unwrap() < presentation.find("<p:sldSz").unwrap());

        let rels = package.relationships("ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels[0].target, "../slideLayouts/slideLayout2.xml");
        assert_eq!(rels[1].rel_type, REL_TYPE_NOTES_SLIDE);
        assert!(package.has_part("ppt/notesSlides/notesSlide1.xml"));
        assert!(!package.has_part("ppt/notesSlides/notesSlide2.xml"));

        let types = package.content_types().unwrap();
        assert_eq!(
            types.parts_of_type(CT_SLIDE),
            vec!["ppt/slides/slide1.xml", "ppt/slides/slide2.xml"]
        );
    }

    #[test]
    fn test_template_slides_are_stripped() {
        let document = DeckDocument::from_template(template_with_slides()).unwrap();
        assert_eq!(document.slide_count(), 0);

        let package = document.finish().unwrap();
        assert!(package.part_names().all(|name| !name.starts_with("ppt/slides/")));
        assert!(package.part_names().all(|name| !name.starts_with("ppt/notesSlides/")));

        let presentation = package.read_xml(PRESENTATION_PART).unwrap();
        assert!(!presentation.contains("sldIdLst"));
        assert!(!presentation.contains("sectionLst"));
        assert!(!presentation.contains("extLst"));

        let types = package.content_types().unwrap();
        assert_eq!(types.content_type_of(PRESENTATION_PART), Some(CT_PRESENTATION));
        assert!(types.parts_of_type(CT_SLIDE).is_empty());
        assert!(types.parts_of_type(CT_NOTES_SLIDE).is_empty());

        let rels = parse_relationships(
            &package.read_xml("ppt/_rels/presentation.xml.rels").unwrap(),
        )
        .unwrap();
        assert!(rels.iter().all(|r| r.rel_type != REL_TYPE_SLIDE));
    }

    #[test]
    fn test_pictures_become_media_parts() {
        let mut slide = draft("Chart", "");
        slide.push(Shape::Picture {
            name: "Picture 1".to_string(),
            frame: Rect::new(0, 0, 914400, 914400),
            image: ImageData::from_bytes(png(4, 3)).unwrap(),
        });

        let mut document = DeckDocument::blank().unwrap();
        document.add_slide(LAYOUT, &slide).unwrap();
        let package = document.finish().unwrap();

        assert!(package.has_part("ppt/media/image1.png"));
        let rels = package.relationships("ppt/slides/slide1.xml").unwrap();
        let image = rels.iter().find(|r| r.rel_type == REL_TYPE_IMAGE).unwrap();
        assert_eq!(image.id, "rId2");
        assert_eq!(image.target, "../media/image1.png");

        let xml = package.read_xml("ppt/slides/slide1.xml").unwrap();
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert_eq!(
            package.content_types().unwrap().content_type_of("ppt/media/image1.png"),
            Some("image/png")
        );
    }

    #[test]
    fn test_missing_notes_master_is_added() {
        let mut package = Package::blank();
        package.remove_part(NOTES_MASTER_PART);
        package.remove_part("ppt/notesMasters/_rels/notesMaster1.xml.rels");
        let rels: Vec<Relationship> = package
            .relationships(PRESENTATION_PART)
            .unwrap()
            .into_iter()
            .filter(|r| r.rel_type != REL_TYPE_NOTES_MASTER)
            .collect();
        package.set_part("ppt/_rels/presentation.xml.rels", serialize_relationships(&rels));

        let document = DeckDocument::from_template(package).unwrap();
        assert_eq!(document.notes_master(), Some(NOTES_MASTER_PART));

        let package = document.finish().unwrap();
        let presentation = package.read_xml(PRESENTATION_PART).unwrap();
        assert_eq!(presentation.matches("<p:notesMasterIdLst>").count(), 1);
        assert!(package.has_part("ppt/theme/theme3.xml"));
    }

    #[test]
    fn test_unknown_layout_part() {
        let mut document = DeckDocument::blank().unwrap();
        let err = document
            .add_slide("ppt/slideLayouts/slideLayout99.xml", &draft("x", ""))
            .unwrap_err();
        assert!(matches!(err, Error::LayoutApplication(_)));
        assert_eq!(document.slide_count(), 0);
    }
}
