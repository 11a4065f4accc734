//! Styling facts extracted from a template document.

use crate::layout::LayoutSelector;
use crate::types::{inches, Rect, SlideType};
use serde::{Deserialize, Serialize};

/// Primary color used when the template exposes no solid fill.
pub const DEFAULT_PRIMARY: &str = "#1f4e79";

/// Fixed secondary color.
pub const DEFAULT_SECONDARY: &str = "#4472c4";

/// Fixed accent color.
pub const DEFAULT_ACCENT: &str = "#70ad47";

/// Background assumed when neither slide nor master declares one.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Font family used when the template names none.
pub const DEFAULT_FONT: &str = "Calibri";

/// Theme colors as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl ThemeColors {
    /// Theme colors with the given primary and the fixed secondary/accent.
    pub fn with_primary(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            ..Self::default()
        }
    }
}

/// Font families for titles and body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeFonts {
    pub title: String,
    pub body: String,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            title: DEFAULT_FONT.to_string(),
            body: DEFAULT_FONT.to_string(),
        }
    }
}

/// Placeholder types from the `type` attribute of `p:ph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// Generic content placeholder; the default when `type` is omitted.
    Object,
    Picture,
    Chart,
    Table,
    DateTime,
    Footer,
    SlideNumber,
    Other,
}

impl PlaceholderKind {
    /// Map an OOXML `ST_PlaceholderType` value.
    pub fn from_ooxml(value: Option<&str>) -> Self {
        match value {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some("pic") => Self::Picture,
            Some("chart") => Self::Chart,
            Some("tbl") => Self::Table,
            Some("dt") => Self::DateTime,
            Some("ftr") => Self::Footer,
            Some("sldNum") => Self::SlideNumber,
            Some(_) => Self::Other,
        }
    }

    /// The OOXML value, or `None` for the implicit object type.
    pub fn as_ooxml(&self) -> Option<&'static str> {
        match self {
            Self::Title => Some("title"),
            Self::CenterTitle => Some("ctrTitle"),
            Self::Subtitle => Some("subTitle"),
            Self::Body => Some("body"),
            Self::Object => None,
            Self::Picture => Some("pic"),
            Self::Chart => Some("chart"),
            Self::Table => Some("tbl"),
            Self::DateTime => Some("dt"),
            Self::Footer => Some("ftr"),
            Self::SlideNumber => Some("sldNum"),
            Self::Other => Some("obj"),
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    pub fn is_body(&self) -> bool {
        matches!(self, Self::Body | Self::Object)
    }

    /// Date, footer and slide number placeholders are not cloned onto new slides.
    pub fn is_decoration(&self) -> bool {
        matches!(self, Self::DateTime | Self::Footer | Self::SlideNumber)
    }
}

/// A placeholder declared by a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    /// The `idx` attribute (0 when omitted).
    pub idx: u32,

    /// Placeholder type.
    pub kind: PlaceholderKind,

    /// Geometry declared on the layout; `None` when inherited from the master.
    pub frame: Option<Rect>,
}

/// A slide layout available in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    /// Zero-based position in template order.
    pub index: usize,

    /// Layout name (`p:cSld/@name`).
    pub name: String,

    /// Package part holding this layout, e.g. `ppt/slideLayouts/slideLayout2.xml`.
    pub part_name: String,

    /// Placeholders in document order.
    pub placeholders: Vec<PlaceholderInfo>,
}

impl LayoutInfo {
    /// Create a layout without placeholders.
    pub fn new(index: usize, name: impl Into<String>, part_name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            part_name: part_name.into(),
            placeholders: Vec::new(),
        }
    }

    /// Add a placeholder.
    pub fn with_placeholder(mut self, placeholder: PlaceholderInfo) -> Self {
        self.placeholders.push(placeholder);
        self
    }

    /// The first title placeholder, if any.
    pub fn title_placeholder(&self) -> Option<&PlaceholderInfo> {
        self.placeholders.iter().find(|p| p.kind.is_title())
    }

    /// The first body/content placeholder, if any.
    pub fn body_placeholder(&self) -> Option<&PlaceholderInfo> {
        self.placeholders.iter().find(|p| p.kind.is_body())
    }
}

/// Read-only styling profile of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProfile {
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,

    /// Background color as `#rrggbb`.
    pub background_color: String,

    /// Slide width in EMU.
    pub slide_width: i64,

    /// Slide height in EMU.
    pub slide_height: i64,

    /// Layouts in template order.
    pub layouts: Vec<LayoutInfo>,
}

impl Default for TemplateProfile {
    fn default() -> Self {
        Self {
            colors: ThemeColors::default(),
            fonts: ThemeFonts::default(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            slide_width: inches(10.0),
            slide_height: inches(7.5),
            layouts: Vec::new(),
        }
    }
}

impl TemplateProfile {
    /// Pick the layout for a slide type.
    pub fn best_layout_index(&self, slide_type: SlideType) -> usize {
        LayoutSelector::new(&self.layouts).best_layout_index(slide_type)
    }

    /// Pick the layout for captioned image slides.
    pub fn image_layout_index(&self) -> usize {
        LayoutSelector::new(&self.layouts).image_layout_index()
    }

    /// Look up a layout by index.
    pub fn layout(&self, index: usize) -> Option<&LayoutInfo> {
        self.layouts.get(index)
    }

    /// Slide dimensions `(width, height)` in EMU.
    pub fn slide_size(&self) -> (i64, i64) {
        (self.slide_width, self.slide_height)
    }
}
