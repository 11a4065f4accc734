//! Template analysis: derives a [`TemplateProfile`] from a PPTX/POTX package.

use crate::package::Package;
use crate::parts::{
    attr_value, extract_part_number, local_name, rel_id_attr, resolve_target, Relationship,
    PRESENTATION_PART, REL_TYPE_SLIDE, REL_TYPE_SLIDE_MASTER, REL_TYPE_THEME,
};
use deckgen_core::profile::{DEFAULT_BACKGROUND, DEFAULT_FONT, DEFAULT_PRIMARY};
use deckgen_core::{
    Error, LayoutInfo, PlaceholderInfo, PlaceholderKind, Rect, Result, Rgb, TemplateProfile,
    ThemeColors, ThemeFonts,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::LazyLock;

static LAYOUT_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slideLayouts/slideLayout\d+\.xml$").unwrap());

static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide\d+\.xml$").unwrap());

const DEFAULT_THEME_PART: &str = "ppt/theme/theme1.xml";
const DEFAULT_MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";

/// Reads styling information out of template packages.
pub struct TemplateReader;

impl TemplateReader {
    pub fn new() -> Self {
        Self
    }

    /// Load and analyze a template file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<TemplateProfile> {
        let path = path.as_ref();
        let package = Package::open(path)?;
        log::debug!("Analyzing template '{}'", path.display());
        self.read_package(&package)
    }

    /// Analyze a template from a seekable ZIP source.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<TemplateProfile> {
        self.read_package(&Package::from_reader(reader)?)
    }

    /// Analyze an already opened package.
    ///
    /// Only a missing presentation part is fatal. Every other extraction
    /// falls back to its default with a warning.
    pub fn read_package(&self, package: &Package) -> Result<TemplateProfile> {
        let presentation = package.read_xml(PRESENTATION_PART).map_err(|e| {
            Error::TemplateLoad(format!("Not a presentation package: {}", e))
        })?;

        let mut profile = TemplateProfile::default();

        let summary = match scan_presentation(&presentation) {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("Failed to read presentation part, using defaults: {}", e);
                PresentationSummary::default()
            }
        };

        match summary.slide_size {
            Some((width, height)) => {
                profile.slide_width = width;
                profile.slide_height = height;
            }
            None => log::warn!("Slide size not declared, using 10in x 7.5in"),
        }

        let pres_rels = package
            .relationships(PRESENTATION_PART)
            .unwrap_or_else(|e| {
                log::warn!("Failed to read presentation relationships: {}", e);
                Vec::new()
            });

        let master = master_part(package, &summary, &pres_rels);
        profile.layouts = read_layouts(package, master.as_deref());

        let theme = master
            .as_deref()
            .and_then(|m| theme_part(package, m))
            .unwrap_or_else(|| DEFAULT_THEME_PART.to_string());
        let theme = match package.read_xml(&theme).and_then(|xml| scan_theme(&xml)) {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("Failed to read theme '{}': {}", theme, e);
                ThemeScheme::default()
            }
        };

        let slide_style = match first_slide_part(package, &summary, &pres_rels) {
            Some(part) => match package.read_xml(&part).and_then(|xml| scan_style(&xml)) {
                Ok(style) => style,
                Err(e) => {
                    log::warn!("Failed to read first slide '{}': {}", part, e);
                    ShapeStyle::default()
                }
            },
            None => ShapeStyle::default(),
        };

        let master_style = master
            .as_deref()
            .and_then(|m| package.read_xml(m).ok())
            .and_then(|xml| match scan_style(&xml) {
                Ok(style) => Some(style),
                Err(e) => {
                    log::warn!("Failed to read slide master: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let primary = slide_style
            .fill
            .as_ref()
            .and_then(|c| theme.resolve(c))
            .unwrap_or_else(|| {
                log::warn!("No solid fill on the first slide, using default primary color");
                DEFAULT_PRIMARY.to_string()
            });
        profile.colors = ThemeColors::with_primary(primary);

        profile.fonts = match slide_style.latin_font {
            Some(font) => ThemeFonts {
                title: font.clone(),
                body: font,
            },
            None => ThemeFonts {
                title: theme
                    .major_font
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FONT.to_string()),
                body: theme
                    .minor_font
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            },
        };

        profile.background_color = slide_style
            .background
            .as_ref()
            .and_then(|c| theme.resolve(c))
            .or_else(|| {
                master_style
                    .background
                    .as_ref()
                    .and_then(|c| theme.resolve(c))
            })
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());

        log::debug!(
            "Template profile: {} layouts, primary {}, background {}, fonts {}/{}",
            profile.layouts.len(),
            profile.colors.primary,
            profile.background_color,
            profile.fonts.title,
            profile.fonts.body
        );

        Ok(profile)
    }
}

impl Default for TemplateReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Facts read from `ppt/presentation.xml`.
#[derive(Debug, Default)]
struct PresentationSummary {
    slide_size: Option<(i64, i64)>,
    master_ids: Vec<String>,
    slide_ids: Vec<String>,
}

fn is(name: Option<&[u8]>, expected: &[u8]) -> bool {
    name == Some(expected)
}

fn parse_emu(element: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_value(element, key).and_then(|v| v.parse().ok())
}

fn scan_presentation(xml: &str) -> Result<PresentationSummary> {
    let mut summary = PresentationSummary::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldSz" => {
                        if let (Some(cx), Some(cy)) = (parse_emu(e, b"cx"), parse_emu(e, b"cy")) {
                            if cx > 0 && cy > 0 {
                                summary.slide_size = Some((cx, cy));
                            }
                        }
                    }
                    b"sldMasterId" => summary.master_ids.extend(rel_id_attr(e, b"id")),
                    b"sldId" => summary.slide_ids.extend(rel_id_attr(e, b"id")),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }

    Ok(summary)
}

fn target_of(rels: &[Relationship], id: &str, source: &str) -> Option<String> {
    rels.iter()
        .find(|r| r.id == id && !r.external)
        .map(|r| resolve_target(source, &r.target))
}

fn master_part(
    package: &Package,
    summary: &PresentationSummary,
    pres_rels: &[Relationship],
) -> Option<String> {
    summary
        .master_ids
        .iter()
        .filter_map(|id| target_of(pres_rels, id, PRESENTATION_PART))
        .chain(
            pres_rels
                .iter()
                .filter(|r| r.rel_type == REL_TYPE_SLIDE_MASTER)
                .map(|r| resolve_target(PRESENTATION_PART, &r.target)),
        )
        .chain(std::iter::once(DEFAULT_MASTER_PART.to_string()))
        .find(|part| package.has_part(part))
}

fn theme_part(package: &Package, master: &str) -> Option<String> {
    package
        .relationships(master)
        .ok()?
        .iter()
        .find(|r| r.rel_type == REL_TYPE_THEME)
        .map(|r| resolve_target(master, &r.target))
        .filter(|part| package.has_part(part))
}

fn first_slide_part(
    package: &Package,
    summary: &PresentationSummary,
    pres_rels: &[Relationship],
) -> Option<String> {
    let listed = summary
        .slide_ids
        .iter()
        .filter_map(|id| target_of(pres_rels, id, PRESENTATION_PART))
        .find(|part| package.has_part(part));
    if listed.is_some() {
        return listed;
    }

    let related = pres_rels
        .iter()
        .filter(|r| r.rel_type == REL_TYPE_SLIDE)
        .map(|r| resolve_target(PRESENTATION_PART, &r.target))
        .filter(|part| package.has_part(part))
        .min_by_key(|part| extract_part_number(part));
    if related.is_some() {
        return related;
    }

    package
        .part_names()
        .filter(|name| SLIDE_PART_REGEX.is_match(name))
        .min_by_key(|name| extract_part_number(name))
        .map(|name| name.to_string())
}

/// Layout parts in master order, falling back to part-number order.
fn layout_parts(package: &Package, master: Option<&str>) -> Vec<String> {
    let mut ordered = Vec::new();

    if let Some(master) = master {
        let ids = package
            .read_xml(master)
            .and_then(|xml| layout_ids(&xml))
            .unwrap_or_else(|e| {
                log::warn!("Failed to read layout list of '{}': {}", master, e);
                Vec::new()
            });
        let rels = package.relationships(master).unwrap_or_default();

        ordered = ids
            .iter()
            .filter_map(|id| target_of(&rels, id, master))
            .filter(|part| package.has_part(part))
            .collect();
    }

    if ordered.is_empty() {
        let mut parts: Vec<String> = package
            .part_names()
            .filter(|name| LAYOUT_PART_REGEX.is_match(name))
            .map(|name| name.to_string())
            .collect();
        parts.sort_by_key(|name| extract_part_number(name));
        ordered = parts;
    }

    ordered
}

fn layout_ids(master_xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(master_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                ids.extend(rel_id_attr(e, b"id"));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing slide master: {}", e))),
            _ => {}
        }
    }

    Ok(ids)
}

fn read_layouts(package: &Package, master: Option<&str>) -> Vec<LayoutInfo> {
    layout_parts(package, master)
        .into_iter()
        .enumerate()
        .map(|(index, part)| {
            package
                .read_xml(&part)
                .and_then(|xml| parse_layout(&xml, index, &part))
                .unwrap_or_else(|e| {
                    log::warn!("Failed to read layout '{}': {}", part, e);
                    LayoutInfo::new(index, "", part.as_str())
                })
        })
        .collect()
}

#[derive(Debug, Default)]
struct PendingShape {
    placeholder: Option<(Option<String>, u32)>,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
}

/// Parse one layout part: its name and placeholder geometry.
pub(crate) fn parse_layout(xml: &str, index: usize, part_name: &str) -> Result<LayoutInfo> {
    let mut layout = LayoutInfo::new(index, "", part_name);
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut shape: Option<PendingShape> = None;

    loop {
        let (element, is_start) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(e)) => {
                let name = local_name(e.name().as_ref()).to_vec();
                if name == b"sp" {
                    if let Some(pending) = shape.take() {
                        layout.placeholders.extend(finish_placeholder(pending));
                    }
                }
                stack.pop();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing layout: {}", e))),
            _ => continue,
        };

        let name = local_name(element.name().as_ref()).to_vec();
        let parent = stack.last().map(|p| p.as_slice());
        let grandparent = stack.len().checked_sub(2).map(|i| stack[i].as_slice());

        match name.as_slice() {
            b"cSld" => layout.name = attr_value(&element, b"name").unwrap_or_default(),
            b"sp" if is_start => shape = Some(PendingShape::default()),
            b"ph" => {
                if let Some(pending) = shape.as_mut() {
                    let idx = attr_value(&element, b"idx")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    pending.placeholder = Some((attr_value(&element, b"type"), idx));
                }
            }
            b"off" | b"ext" if is(parent, b"xfrm") && is(grandparent, b"spPr") => {
                if let Some(pending) = shape.as_mut() {
                    if name == b"off" {
                        if let (Some(x), Some(y)) =
                            (parse_emu(&element, b"x"), parse_emu(&element, b"y"))
                        {
                            pending.offset = Some((x, y));
                        }
                    } else if let (Some(cx), Some(cy)) =
                        (parse_emu(&element, b"cx"), parse_emu(&element, b"cy"))
                    {
                        pending.extent = Some((cx, cy));
                    }
                }
            }
            _ => {}
        }

        if is_start {
            stack.push(name);
        }
    }

    Ok(layout)
}

fn finish_placeholder(pending: PendingShape) -> Option<PlaceholderInfo> {
    let (ph_type, idx) = pending.placeholder?;
    let frame = match (pending.offset, pending.extent) {
        (Some((x, y)), Some((cx, cy))) => Some(Rect::new(x, y, cx, cy)),
        _ => None,
    };

    Some(PlaceholderInfo {
        idx,
        kind: PlaceholderKind::from_ooxml(ph_type.as_deref()),
        frame,
    })
}

/// A color as written in DrawingML.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ColorRef {
    Rgb(String),
    Scheme(String),
}

fn color_ref(element: &BytesStart, name: &[u8]) -> Option<ColorRef> {
    match name {
        b"srgbClr" => attr_value(element, b"val").map(ColorRef::Rgb),
        b"sysClr" => attr_value(element, b"lastClr").map(ColorRef::Rgb),
        b"schemeClr" => attr_value(element, b"val").map(ColorRef::Scheme),
        _ => None,
    }
}

/// First-match styling facts of a slide or master.
#[derive(Debug, Default)]
struct ShapeStyle {
    fill: Option<ColorRef>,
    background: Option<ColorRef>,
    latin_font: Option<String>,
}

fn scan_style(xml: &str) -> Result<ShapeStyle> {
    let mut style = ShapeStyle::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        let (element, is_start) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(_)) => {
                stack.pop();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing slide: {}", e))),
            _ => continue,
        };

        let name = local_name(element.name().as_ref()).to_vec();
        let parent = stack.last().map(|p| p.as_slice());
        let grandparent = stack.len().checked_sub(2).map(|i| stack[i].as_slice());
        let in_background = stack.iter().any(|n| n == b"bg");

        if let Some(color) = color_ref(&element, &name) {
            if in_background {
                let direct = is(parent, b"bgRef")
                    || (is(parent, b"solidFill") && is(grandparent, b"bgPr"));
                if direct && style.background.is_none() {
                    style.background = Some(color);
                }
            } else if is(parent, b"solidFill")
                && is(grandparent, b"spPr")
                && stack.iter().any(|n| n == b"sp")
                && style.fill.is_none()
            {
                style.fill = Some(color);
            }
        } else if name == b"latin" && is(parent, b"rPr") && style.latin_font.is_none() {
            // `+mj-lt` style values point back at the theme.
            style.latin_font = attr_value(&element, b"typeface")
                .filter(|face| !face.is_empty() && !face.starts_with('+'));
        }

        if is_start {
            stack.push(name);
        }
    }

    Ok(style)
}

/// Color scheme and font scheme of a theme part.
#[derive(Debug, Default)]
struct ThemeScheme {
    colors: HashMap<String, String>,
    major_font: Option<String>,
    minor_font: Option<String>,
}

impl ThemeScheme {
    /// Resolve a color reference to `#rrggbb`.
    fn resolve(&self, color: &ColorRef) -> Option<String> {
        match color {
            ColorRef::Rgb(hex) => Rgb::from_hex(hex).map(|rgb| rgb.to_hex()),
            ColorRef::Scheme(name) => {
                let slot = match name.as_str() {
                    "bg1" => "lt1",
                    "tx1" => "dk1",
                    "bg2" => "lt2",
                    "tx2" => "dk2",
                    other => other,
                };
                self.colors.get(slot).cloned()
            }
        }
    }
}

fn scan_theme(xml: &str) -> Result<ThemeScheme> {
    let mut theme = ThemeScheme::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        let (element, is_start) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(_)) => {
                stack.pop();
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(format!("Error parsing theme: {}", e))),
            _ => continue,
        };

        let name = local_name(element.name().as_ref()).to_vec();
        let parent = stack.last().map(|p| p.as_slice());
        let grandparent = stack.len().checked_sub(2).map(|i| stack[i].as_slice());

        if is(grandparent, b"clrScheme") {
            if let (Some(slot), Some(ColorRef::Rgb(hex))) = (parent, color_ref(&element, &name)) {
                if let Some(rgb) = Rgb::from_hex(&hex) {
                    theme
                        .colors
                        .entry(String::from_utf8_lossy(slot).into_owned())
                        .or_insert_with(|| rgb.to_hex());
                }
            }
        } else if name == b"latin" {
            let face = attr_value(&element, b"typeface").filter(|f| !f.is_empty());
            match parent {
                Some(b"majorFont") if theme.major_font.is_none() => theme.major_font = face,
                Some(b"minorFont") if theme.minor_font.is_none() => theme.minor_font = face,
                _ => {}
            }
        }

        if is_start {
            stack.push(name);
        }
    }

    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{serialize_relationships, REL_TYPE_SLIDE_LAYOUT};

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

    fn slide_xml(body: &str) -> String {
        format!(
            r#"<p:sld {}><p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            NS, body
        )
    }

    fn with_first_slide(slide: &str) -> Package {
        let mut package = Package::blank();
        package.set_part("ppt/slides/slide1.xml", slide_xml(slide));
        package
    }

    #[test]
    fn test_blank_profile() {
        let profile = TemplateReader::new()
            .read_package(&Package::blank())
            .unwrap();

        assert_eq!(profile.slide_size(), (9_144_000, 6_858_000));
        assert_eq!(profile.layouts.len(), 6);
        assert_eq!(profile.layouts[2].name, "Section Header");
        assert_eq!(
            profile.layouts[0].part_name,
            "ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(profile.colors.primary, DEFAULT_PRIMARY);
        assert_eq!(profile.background_color, "#ffffff");
        assert_eq!(profile.fonts.title, "Calibri");
    }

    #[test]
    fn test_layout_placeholders() {
        let profile = TemplateReader::new()
            .read_package(&Package::blank())
            .unwrap();

        let title_slide = &profile.layouts[0];
        assert_eq!(
            title_slide.title_placeholder().map(|p| p.kind),
            Some(PlaceholderKind::CenterTitle)
        );

        let content = &profile.layouts[1];
        let body = content.body_placeholder().unwrap();
        assert_eq!(body.kind, PlaceholderKind::Object);
        assert_eq!(body.idx, 1);
        assert_eq!(
            body.frame,
            Some(Rect::new(457_200, 1_600_200, 8_229_600, 4_525_963))
        );

        assert!(profile.layouts[5].placeholders.is_empty());
    }

    #[test]
    fn test_layout_order_follows_master_list() {
        let mut package = Package::blank();
        let master = "ppt/slideMasters/slideMaster1.xml";
        let xml = package.read_xml(master).unwrap();
        // Move the last layout to the front of the master's list.
        let reordered = xml.replace(
            r#"<p:sldLayoutIdLst>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483700" r:id="rId6"/>"#,
        );
        let reordered = reordered.replacen(
            r#"<p:sldLayoutId id="2147483654" r:id="rId6"/>"#,
            "",
            1,
        );
        package.set_part(master, reordered);

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.layouts[0].name, "Blank");
        assert_eq!(profile.layouts[1].name, "Title Slide");
        assert_eq!(profile.layouts[0].index, 0);
    }

    #[test]
    fn test_layouts_fall_back_to_part_order() {
        let mut package = Package::default();
        package.set_part(PRESENTATION_PART, format!("<p:presentation {}/>", NS));
        for (n, name) in [(10, "Ten"), (2, "Two")] {
            package.set_part(
                format!("ppt/slideLayouts/slideLayout{}.xml", n),
                format!(r#"<p:sldLayout {}><p:cSld name="{}"/></p:sldLayout>"#, NS, name),
            );
        }

        let profile = TemplateReader::new().read_package(&package).unwrap();
        let names: Vec<&str> = profile.layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Two", "Ten"]);
        assert_eq!(profile.slide_size(), (9_144_000, 6_858_000));
    }

    #[test]
    fn test_primary_from_first_solid_fill() {
        let package = with_first_slide(
            r#"<p:spTree><p:sp><p:spPr><a:ln><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></a:ln></p:spPr></p:sp><p:sp><p:spPr><a:solidFill><a:srgbClr val="1A2B3C"><a:lumMod val="75000"/></a:srgbClr></a:solidFill></p:spPr></p:sp><p:sp><p:spPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:spPr></p:sp></p:spTree>"#,
        );

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.colors.primary, "#1a2b3c");
        assert_eq!(profile.colors.secondary, "#4472c4");
    }

    #[test]
    fn test_scheme_fill_resolves_through_theme() {
        let package = with_first_slide(
            r#"<p:spTree><p:sp><p:spPr><a:solidFill><a:schemeClr val="accent6"/></a:solidFill></p:spPr></p:sp></p:spTree>"#,
        );

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.colors.primary, "#70ad47");
    }

    #[test]
    fn test_fonts_from_first_run() {
        let package = with_first_slide(
            r#"<p:spTree><p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"><a:latin typeface="+mj-lt"/></a:rPr><a:t>x</a:t></a:r><a:r><a:rPr lang="en-US"><a:latin typeface="Georgia"/></a:rPr><a:t>y</a:t></a:r></a:p></p:txBody></p:sp></p:spTree>"#,
        );

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.fonts.title, "Georgia");
        assert_eq!(profile.fonts.body, "Georgia");
    }

    #[test]
    fn test_slide_background_wins_over_master() {
        let package = with_first_slide(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="102030"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree/>"#,
        );

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.background_color, "#102030");
    }

    #[test]
    fn test_slide_order_from_id_list() {
        let mut package = with_first_slide(
            r#"<p:spTree><p:sp><p:spPr><a:solidFill><a:srgbClr val="111111"/></a:solidFill></p:spPr></p:sp></p:spTree>"#,
        );
        package.set_part(
            "ppt/slides/slide2.xml",
            slide_xml(
                r#"<p:spTree><p:sp><p:spPr><a:solidFill><a:srgbClr val="222222"/></a:solidFill></p:spPr></p:sp></p:spTree>"#,
            ),
        );

        let pres = package.read_xml(PRESENTATION_PART).unwrap().replace(
            "<p:sldSz",
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId10"/></p:sldIdLst><p:sldSz"#,
        );
        package.set_part(PRESENTATION_PART, pres);

        let mut rels = package.relationships(PRESENTATION_PART).unwrap();
        rels.push(Relationship::new("rId10", REL_TYPE_SLIDE, "slides/slide2.xml"));
        package.set_part(
            "ppt/_rels/presentation.xml.rels",
            serialize_relationships(&rels),
        );

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.colors.primary, "#222222");
    }

    #[test]
    fn test_theme_fonts_when_runs_name_none() {
        let mut package = Package::blank();
        let theme = package
            .read_xml("ppt/theme/theme1.xml")
            .unwrap()
            .replacen(r#"<a:latin typeface="Calibri"/>"#, r#"<a:latin typeface="Cambria"/>"#, 1);
        package.set_part("ppt/theme/theme1.xml", theme);

        let profile = TemplateReader::new().read_package(&package).unwrap();
        assert_eq!(profile.fonts.title, "Cambria");
        assert_eq!(profile.fonts.body, "Calibri");
    }

    #[test]
    fn test_missing_presentation_part() {
        let mut package = Package::blank();
        package.remove_part(PRESENTATION_PART);

        let err = TemplateReader::new().read_package(&package).unwrap_err();
        assert!(matches!(err, Error::TemplateLoad(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_zip_input() {
        let err = TemplateReader::new()
            .read(std::io::Cursor::new(b"just text".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::TemplateLoad(_)));
    }

    #[test]
    fn test_layout_rels_resolve() {
        let package = Package::blank();
        let rels = package
            .relationships("ppt/slideMasters/slideMaster1.xml")
            .unwrap();
        assert_eq!(
            rels.iter().filter(|r| r.rel_type == REL_TYPE_SLIDE_LAYOUT).count(),
            6
        );
    }
}
