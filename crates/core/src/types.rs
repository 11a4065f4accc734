//! Domain types for slide outlines and presentation geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EMU (English Metric Units) per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// Convert inches to EMU.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Convert points to EMU.
pub fn points(value: f64) -> i64 {
    (value * EMU_PER_POINT as f64).round() as i64
}

/// The slide plan produced by an [`Outliner`](crate::Outliner).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Presentation title.
    #[serde(default)]
    pub title: String,

    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
}

impl Outline {
    /// Create an empty outline with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn with_slide(mut self, slide: SlideSpec) -> Self {
        self.slides.push(slide);
        self
    }

    /// Number of slides tagged as content slides.
    pub fn content_slide_count(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| s.slide_type == SlideType::Content)
            .count()
    }
}

/// Abstract description of a single slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Slide title, before cleaning.
    #[serde(default)]
    pub title: String,

    /// Bullet lines, before normalization.
    #[serde(default)]
    pub content: Vec<String>,

    /// Slide type tag used for layout selection.
    #[serde(default)]
    pub slide_type: SlideType,

    /// Points to highlight in the caption band.
    #[serde(default)]
    pub emphasis_points: Vec<String>,

    /// Presenter notes; empty when the outliner produced none.
    #[serde(default)]
    pub speaking_notes: String,
}

impl SlideSpec {
    /// Create a slide of the given type.
    pub fn new(title: impl Into<String>, slide_type: SlideType) -> Self {
        Self {
            title: title.into(),
            slide_type,
            ..Default::default()
        }
    }

    /// Set the bullet content.
    pub fn with_content<I, S>(mut self, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content = content.into_iter().map(Into::into).collect();
        self
    }

    /// Set the emphasis points.
    pub fn with_emphasis<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emphasis_points = points.into_iter().map(Into::into).collect();
        self
    }

    /// Set the speaking notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.speaking_notes = notes.into();
        self
    }
}

/// Slide type tag.
///
/// Tags arrive as free text from the outliner; anything not listed here
/// deserializes to [`SlideType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlideType {
    Title,
    Section,
    #[default]
    Content,
    Comparison,
    Conclusion,
    Overview,
    Strategy,
    Analysis,
    Implementation,
    Unknown,
}

impl SlideType {
    /// Parse a tag, ignoring case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "title" => Self::Title,
            "section" => Self::Section,
            "content" => Self::Content,
            "comparison" => Self::Comparison,
            "conclusion" => Self::Conclusion,
            "overview" => Self::Overview,
            "strategy" => Self::Strategy,
            "analysis" => Self::Analysis,
            "implementation" => Self::Implementation,
            _ => Self::Unknown,
        }
    }

    /// The canonical tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Section => "section",
            Self::Content => "content",
            Self::Comparison => "comparison",
            Self::Conclusion => "conclusion",
            Self::Overview => "overview",
            Self::Strategy => "strategy",
            Self::Analysis => "analysis",
            Self::Implementation => "implementation",
            Self::Unknown => "unknown",
        }
    }

    /// Title and section slides style their body text like titles.
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Title | Self::Section)
    }
}

impl From<String> for SlideType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<SlideType> for String {
    fn from(slide_type: SlideType) -> Self {
        slide_type.as_str().to_string()
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (any case).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as the `val` of a DrawingML `srgbClr` element (`RRGGBB`).
    pub fn to_srgb_val(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived luminance in `0.0..=1.0` (ITU-R BT.601 weights).
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

/// A positioned rectangle in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Create a rectangle; negative extents are clamped to zero.
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }

    /// Largest rectangle with the given aspect ratio centered inside this one.
    pub fn fit_aspect(&self, content_width: u32, content_height: u32) -> Rect {
        if content_width == 0 || content_height == 0 || self.width == 0 || self.height == 0 {
            return *self;
        }

        let scale_w = self.width as f64 / content_width as f64;
        let scale_h = self.height as f64 / content_height as f64;
        let scale = scale_w.min(scale_h);

        let width = (content_width as f64 * scale).round() as i64;
        let height = (content_height as f64 * scale).round() as i64;

        Rect::new(
            self.left + (self.width - width) / 2,
            self.top + (self.height - height) / 2,
            width,
            height,
        )
    }
}
