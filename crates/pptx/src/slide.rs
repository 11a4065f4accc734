//! Inspectable slide model produced by the composer and serialized by
//! [`crate::xml`].

use crate::media::ImageData;
use deckgen_core::{PlaceholderKind, Rect, Rgb, TransitionKind};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
        }
    }
}

/// Vertical anchoring of text in its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }
}

/// Character formatting for a paragraph's run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub font: Option<String>,
    /// Size in points.
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Rgb>,
}

impl RunStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_size(mut self, points: f64) -> Self {
        self.size = Some(points);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// A single-run paragraph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub text: String,
    /// Outline level (0 = top).
    pub level: u8,
    pub alignment: Alignment,
    /// Space after, in points.
    pub space_after: Option<f64>,
    /// Space before, in points.
    pub space_before: Option<f64>,
    pub style: RunStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_space_after(mut self, points: f64) -> Self {
        self.space_after = Some(points);
        self
    }

    pub fn with_space_before(mut self, points: f64) -> Self {
        self.space_before = Some(points);
        self
    }

    pub fn with_style(mut self, style: RunStyle) -> Self {
        self.style = style;
        self
    }
}

/// Inner margins of a text frame, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

/// Text content of a shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
    pub anchor: Anchor,
    pub margins: Option<Margins>,
    /// Word wrap on, auto-fit off.
    pub wrap: bool,
}

impl TextFrame {
    pub fn new() -> Self {
        Self {
            wrap: true,
            ..Default::default()
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraph texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A placeholder inherited from the layout. `frame` overrides the
    /// layout geometry when set; `text` is `None` for an untouched placeholder.
    Placeholder {
        kind: PlaceholderKind,
        idx: u32,
        frame: Option<Rect>,
        text: Option<TextFrame>,
    },
    /// A free-standing text box.
    TextBox {
        name: String,
        frame: Rect,
        text: TextFrame,
    },
    /// An embedded picture.
    Picture {
        name: String,
        frame: Rect,
        image: ImageData,
    },
}

impl Shape {
    /// Geometry, if the shape declares one.
    pub fn frame(&self) -> Option<Rect> {
        match self {
            Shape::Placeholder { frame, .. } => *frame,
            Shape::TextBox { frame, .. } | Shape::Picture { frame, .. } => Some(*frame),
        }
    }

    pub fn text(&self) -> Option<&TextFrame> {
        match self {
            Shape::Placeholder { text, .. } => text.as_ref(),
            Shape::TextBox { text, .. } => Some(text),
            Shape::Picture { .. } => None,
        }
    }
}

/// A composed slide, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDraft {
    /// Index into the profile's layout catalog.
    pub layout_index: usize,
    pub shapes: Vec<Shape>,
    /// Presenter notes; empty means no notes part.
    pub notes: String,
    pub transition: Option<TransitionKind>,
}

impl SlideDraft {
    pub fn new(layout_index: usize) -> Self {
        Self {
            layout_index,
            shapes: Vec::new(),
            notes: String::new(),
            transition: None,
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Placeholder of the given kind, mutable.
    pub fn placeholder_mut(
        &mut self,
        predicate: impl Fn(PlaceholderKind) -> bool,
    ) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| matches!(s, Shape::Placeholder { kind, .. } if predicate(*kind)))
    }

    /// Pictures in shape order.
    pub fn pictures(&self) -> impl Iterator<Item = &ImageData> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture { image, .. } => Some(image),
            _ => None,
        })
    }

    /// Text of the title shape, if any.
    pub fn title_text(&self) -> Option<String> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Placeholder {
                kind,
                text: Some(text),
                ..
            } if kind.is_title() => Some(text.plain_text()),
            Shape::TextBox { name, text, .. } if name.starts_with("Title") => {
                Some(text.plain_text())
            }
            _ => None,
        })
    }

    /// All text on the slide, shape by shape.
    pub fn all_text(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(|s| s.text())
            .filter(|t| !t.is_empty())
            .map(|t| t.plain_text())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_frame_plain_text() {
        let mut frame = TextFrame::new();
        frame.push(Paragraph::new("First"));
        frame.push(Paragraph::new("Second").with_level(1));

        assert!(frame.wrap);
        assert_eq!(frame.plain_text(), "First\nSecond");
    }

    #[test]
    fn test_draft_title_lookup() {
        let mut draft = SlideDraft::new(0);
        let mut text = TextFrame::new();
        text.push(Paragraph::new("Quarterly Review"));

        draft.push(Shape::Placeholder {
            kind: PlaceholderKind::CenterTitle,
            idx: 0,
            frame: None,
            text: Some(text),
        });
        draft.push(Shape::Placeholder {
            kind: PlaceholderKind::Subtitle,
            idx: 1,
            frame: None,
            text: None,
        });

        assert_eq!(draft.title_text().as_deref(), Some("Quarterly Review"));
        assert_eq!(draft.all_text(), vec!["Quarterly Review"]);
        assert!(draft.placeholder_mut(|k| k.is_body()).is_none());
        assert!(draft
            .placeholder_mut(|k| k == PlaceholderKind::Subtitle)
            .is_some());
    }

    #[test]
    fn test_alignment_values() {
        assert_eq!(Alignment::Justify.as_ooxml(), "just");
        assert_eq!(Anchor::Middle.as_ooxml(), "ctr");
    }
}
