//! OPC package plumbing: namespaces, relationship and content-type parts,
//! and part-name arithmetic.

use deckgen_core::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub const REL_TYPE_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_TYPE_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_TYPE_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_TYPE_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_TYPE_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
pub const REL_TYPE_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub const REL_TYPE_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_XML: &str = "application/xml";
pub const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub const CT_TEMPLATE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
pub const CT_NOTES_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
pub const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Unescaped attribute value, falling back to the raw bytes.
pub fn attr_string(attr: &Attribute) -> String {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Value of the attribute with the given qualified name.
pub fn attr_value(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attr_string(&attr))
}

/// Value of the relationship-id attribute (`r:id`, `r:embed`, ...) on an element.
pub fn rel_id_attr(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| {
            let name = attr.key.as_ref();
            name.contains(&b':') && local_name(name) == key
        })
        .map(|attr| attr_string(&attr))
}

/// Extract a part number from a string like "rId2" or "slide3.xml".
pub fn extract_part_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".rels").trim_end_matches(".xml");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

/// Relationships part for a source part: `ppt/slides/slide1.xml` ->
/// `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against its source part.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();

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

/// Relative target from `source_part` to `target_part`.
pub fn relative_target(source_part: &str, target_part: &str) -> String {
    let source_dir: Vec<&str> = source_part
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();
    let target: Vec<&str> = target_part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(source_dir.len() - common));
    parts.extend(&target[common..]);
    parts.join("/")
}

/// One entry of a relationships part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        }
    }
}

/// Parse a `.rels` part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel = Relationship::new(String::new(), "", String::new());

                for attr in e.attributes().flatten() {
                    let value = attr_string(&attr);
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        b"TargetMode" => rel.external = value == "External",
                        _ => {}
                    }
                }

                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Serialize relationships to a `.rels` part.
pub fn serialize_relationships(rels: &[Relationship]) -> String {
    let mut xml = format!(
        "{}\n<Relationships xmlns=\"{}\">",
        XML_DECLARATION, NS_PACKAGE_RELATIONSHIPS
    );

    for rel in rels {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            escape(&rel.id),
            escape(&rel.rel_type),
            escape(&rel.target),
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

/// An unused relationship id (`rIdN` with N above every numeric id present).
pub fn next_rel_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|r| r.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

/// The `[Content_Types].xml` part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// `(extension, content type)`; extensions are stored lowercase.
    pub defaults: Vec<(String, String)>,

    /// `(part name without leading slash, content type)`.
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = Self::default();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match local_name(e.name().as_ref()) {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) =
                                (attr_value(e, b"Extension"), attr_value(e, b"ContentType"))
                            {
                                types.defaults.push((ext.to_lowercase(), ct));
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) =
                                (attr_value(e, b"PartName"), attr_value(e, b"ContentType"))
                            {
                                types
                                    .overrides
                                    .push((part.trim_start_matches('/').to_string(), ct));
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing content types: {}", e)));
                }
                _ => {}
            }
        }

        Ok(types)
    }

    pub fn to_xml(&self) -> String {
        let mut xml = format!("{}\n<Types xmlns=\"{}\">", XML_DECLARATION, NS_CONTENT_TYPES);

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                escape(ext),
                escape(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
                escape(part),
                escape(ct)
            ));
        }

        xml.push_str("</Types>");
        xml
    }

    /// Content type of a part, from its override or extension default.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let part = part.trim_start_matches('/');
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part) {
            return Some(ct);
        }

        let ext = part.rsplit_once('.')?.1.to_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        let extension = extension.to_lowercase();
        if !self.defaults.iter().any(|(e, _)| *e == extension) {
            self.defaults.push((extension, content_type.to_string()));
        }
    }

    /// Insert or replace the override for a part.
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let part = part.trim_start_matches('/');
        match self.overrides.iter_mut().find(|(p, _)| p == part) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self
                .overrides
                .push((part.to_string(), content_type.to_string())),
        }
    }

    pub fn remove_override(&mut self, part: &str) {
        let part = part.trim_start_matches('/');
        self.overrides.retain(|(p, _)| p != part);
    }

    /// Parts whose override has the given content type, in declaration order.
    pub fn parts_of_type(&self, content_type: &str) -> Vec<String> {
        self.overrides
            .iter()
            .filter(|(_, ct)| ct == content_type)
            .map(|(p, _)| p.clone())
            .collect()
    }
}
