//! Per-slide composition: layout instantiation, title, content, emphasis,
//! notes and transition, plus the image slide tiers.

use crate::media::ImageData;
use crate::slide::{Alignment, Anchor, Margins, Paragraph, RunStyle, Shape, SlideDraft, TextFrame};
use deckgen_core::contrast::{emphasis_color, resolve_text_color};
use deckgen_core::outliner::notes_or_fallback;
use deckgen_core::types::inches;
use deckgen_core::{
    ContentFitter, Error, Rect, Result, Rgb, SlideSpec, SlideType, SpeakerNotesGenerator,
    TemplateProfile, TransitionKind,
};
use std::fmt;

const TITLE_SIZE: f64 = 48.0;
const DETAIL_SIZE: f64 = 20.0;
const EMPHASIS_SIZE: f64 = 14.0;
const PARAGRAPH_SPACING: f64 = 10.0;
const DETAIL_SPACING: f64 = 8.0;

const CAPTIONS: [&str; 5] = [
    "Key visual supporting our strategic analysis",
    "Important data visualization and insights",
    "Critical business intelligence demonstration",
    "Contextual evidence and supporting material",
    "Strategic decision-making reference",
];

const BULLET: &str = "●";

/// Alternating arrows for comparison slides.
fn comparison_glyph(index: usize) -> &'static str {
    if index % 2 == 0 {
        "▶"
    } else {
        "◀"
    }
}

/// Progress through composing one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComposeStage {
    LayoutSelected,
    TitlePlaced,
    ContentPlaced,
    EmphasisPlaced,
    NotesAttached,
}

impl fmt::Display for ComposeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LayoutSelected => "layout selected",
            Self::TitlePlaced => "title placed",
            Self::ContentPlaced => "content placed",
            Self::EmphasisPlaced => "emphasis placed",
            Self::NotesAttached => "notes attached",
        };
        f.write_str(name)
    }
}

/// Ways of presenting an inserted image, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTier {
    /// Image layout, aspect-fitted picture on the left, captions on the right.
    Captioned,
    /// Content layout, picture centered below the title.
    Centered,
    /// First layout, picture only.
    Bare,
}

impl ImageTier {
    pub const ORDER: [ImageTier; 3] = [Self::Captioned, Self::Centered, Self::Bare];
}

/// Turns slide specs into drafts against one template profile.
pub struct SlideComposer<'a> {
    profile: &'a TemplateProfile,
    fitter: ContentFitter,
    notes: &'a dyn SpeakerNotesGenerator,
}

impl<'a> SlideComposer<'a> {
    pub fn new(profile: &'a TemplateProfile, notes: &'a dyn SpeakerNotesGenerator) -> Self {
        Self {
            profile,
            fitter: ContentFitter::new(),
            notes,
        }
    }

    pub fn with_fitter(mut self, fitter: ContentFitter) -> Self {
        self.fitter = fitter;
        self
    }

    /// Compose a slide, degrading to a minimal slide on failure.
    ///
    /// `position` is the 0-based position of the slide in the deck.
    pub fn compose(&self, spec: &SlideSpec, position: usize) -> SlideDraft {
        let mut stage = None;
        match self.try_compose(spec, position, &mut stage) {
            Ok(draft) => draft,
            Err(e) => {
                match stage {
                    Some(stage) => log::warn!(
                        "Slide {} failed after {}: {}; using minimal slide",
                        position + 1,
                        stage,
                        e
                    ),
                    None => log::warn!(
                        "Slide {} failed before layout selection: {}; using minimal slide",
                        position + 1,
                        e
                    ),
                }
                self.minimal_slide(spec, position)
            }
        }
    }

    fn try_compose(
        &self,
        spec: &SlideSpec,
        position: usize,
        stage: &mut Option<ComposeStage>,
    ) -> Result<SlideDraft> {
        let layout_index = self.profile.best_layout_index(spec.slide_type);
        let mut draft = self.instantiate(layout_index)?;
        *stage = Some(ComposeStage::LayoutSelected);

        let title = self.fitter.clean_title(&spec.title);
        self.place_title(&mut draft, &title);
        *stage = Some(ComposeStage::TitlePlaced);

        if !spec.content.is_empty() {
            let items = self
                .fitter
                .prepare(&spec.content, self.profile.slide_height);
            self.place_content(&mut draft, &items, spec.slide_type);
        }
        *stage = Some(ComposeStage::ContentPlaced);

        self.place_emphasis(&mut draft, &spec.emphasis_points);
        *stage = Some(ComposeStage::EmphasisPlaced);

        draft.notes = self.notes_for(spec);
        draft.transition = Some(TransitionKind::for_slide(position));
        *stage = Some(ComposeStage::NotesAttached);

        log::debug!(
            "Composed slide {} '{}' ({}) on layout {}",
            position + 1,
            title,
            spec.slide_type.as_str(),
            layout_index
        );
        Ok(draft)
    }

    /// A draft carrying the layout's placeholders, minus date, footer and
    /// slide number.
    fn instantiate(&self, layout_index: usize) -> Result<SlideDraft> {
        let layout = self.profile.layout(layout_index).ok_or_else(|| {
            Error::LayoutApplication(format!(
                "Layout {} not in catalog of {}",
                layout_index,
                self.profile.layouts.len()
            ))
        })?;

        let mut draft = SlideDraft::new(layout_index);
        for placeholder in layout
            .placeholders
            .iter()
            .filter(|p| !p.kind.is_decoration())
        {
            draft.push(Shape::Placeholder {
                kind: placeholder.kind,
                idx: placeholder.idx,
                frame: None,
                text: None,
            });
        }
        Ok(draft)
    }

    fn background(&self) -> &str {
        &self.profile.background_color
    }

    fn text_color(&self, is_title: bool) -> Rgb {
        resolve_text_color(is_title, &self.profile.colors, self.background())
    }

    fn title_rect(&self) -> Rect {
        Rect::new(
            inches(0.5),
            inches(0.15),
            self.profile.slide_width - inches(1.0),
            inches(1.8),
        )
    }

    fn content_rect(&self) -> Rect {
        Rect::new(
            inches(0.8),
            inches(2.5),
            self.profile.slide_width - inches(1.6),
            self.profile.slide_height - inches(4.2),
        )
    }

    fn title_text(&self, title: &str) -> TextFrame {
        let mut frame = TextFrame::new().with_anchor(Anchor::Middle);
        frame.push(
            Paragraph::new(title)
                .with_alignment(Alignment::Center)
                .with_style(
                    RunStyle::new()
                        .with_font(self.profile.fonts.title.as_str())
                        .with_size(TITLE_SIZE)
                        .with_bold(true)
                        .with_underline(true)
                        .with_color(self.text_color(true)),
                ),
        );
        frame
    }

    /// Fill the native title placeholder, or add a title box.
    fn place_title(&self, draft: &mut SlideDraft, title: &str) {
        let rect = self.title_rect();
        let text = self.title_text(title);

        match draft.placeholder_mut(|kind| kind.is_title()) {
            Some(Shape::Placeholder {
                frame, text: slot, ..
            }) => {
                *frame = Some(rect);
                *slot = Some(text);
            }
            _ => draft.push(Shape::TextBox {
                name: "Title".to_string(),
                frame: rect,
                text,
            }),
        }
    }

    fn content_style(&self, slide_type: SlideType) -> RunStyle {
        let (size, bold) = match slide_type {
            SlideType::Title => (28.0, true),
            SlideType::Section => (24.0, true),
            _ => (22.0, false),
        };

        RunStyle::new()
            .with_font(self.profile.fonts.body.as_str())
            .with_size(size)
            .with_bold(bold)
            .with_color(self.text_color(slide_type.is_heading()))
    }

    /// Content paragraphs; `glyphs` prefixes each top-level item in text boxes.
    fn content_paragraphs(
        &self,
        items: &[String],
        slide_type: SlideType,
        glyphs: Option<&dyn Fn(usize) -> &'static str>,
    ) -> Vec<Paragraph> {
        let style = self.content_style(slide_type);
        let detail_style = style
            .clone()
            .with_size(DETAIL_SIZE)
            .with_bold(false)
            .with_italic(true);

        let mut paragraphs = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let bullet = |text: &str| match glyphs {
                Some(glyph) => format!("{} {}", glyph(i), text),
                None => text.to_string(),
            };

            match self.fitter.split_detail(i, item) {
                Some((label, detail)) => {
                    paragraphs.push(
                        Paragraph::new(bullet(&label))
                            .with_alignment(Alignment::Justify)
                            .with_space_after(PARAGRAPH_SPACING)
                            .with_style(style.clone()),
                    );
                    paragraphs.push(
                        Paragraph::new(detail)
                            .with_level(1)
                            .with_alignment(Alignment::Justify)
                            .with_space_after(DETAIL_SPACING)
                            .with_style(detail_style.clone()),
                    );
                }
                None => paragraphs.push(
                    Paragraph::new(bullet(item))
                        .with_alignment(Alignment::Justify)
                        .with_space_after(PARAGRAPH_SPACING)
                        .with_style(style.clone()),
                ),
            }
        }
        paragraphs
    }

    fn content_frame(&self, paragraphs: Vec<Paragraph>) -> TextFrame {
        let mut frame = TextFrame::new().with_margins(Margins {
            left: inches(0.4),
            right: inches(0.4),
            top: inches(0.3),
            bottom: inches(0.3),
        });
        for paragraph in paragraphs {
            frame.push(paragraph);
        }
        frame
    }

    /// Fill the native body placeholder, or add a bulleted content box.
    fn place_content(&self, draft: &mut SlideDraft, items: &[String], slide_type: SlideType) {
        let rect = self.content_rect();

        if let Some(Shape::Placeholder {
            frame, text: slot, ..
        }) = draft.placeholder_mut(|kind| kind.is_body())
        {
            *frame = Some(rect);
            *slot = Some(self.content_frame(self.content_paragraphs(items, slide_type, None)));
            return;
        }

        let paragraphs = if slide_type == SlideType::Comparison {
            self.content_paragraphs(items, slide_type, Some(&comparison_glyph))
        } else {
            self.content_paragraphs(items, slide_type, Some(&|_: usize| BULLET))
        };
        let text = self.content_frame(paragraphs);
        draft.push(Shape::TextBox {
            name: "Content".to_string(),
            frame: rect,
            text,
        });
    }

    fn place_emphasis(&self, draft: &mut SlideDraft, points: &[String]) {
        let points: Vec<&str> = points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if points.is_empty() {
            return;
        }

        let style = RunStyle::new()
            .with_font(self.profile.fonts.body.as_str())
            .with_size(EMPHASIS_SIZE)
            .with_bold(true)
            .with_color(emphasis_color(self.background()));

        let mut text = TextFrame::new();
        for point in points {
            text.push(
                Paragraph::new(format!("💡 {}", point))
                    .with_alignment(Alignment::Center)
                    .with_style(style.clone()),
            );
        }

        let (width, height) = self.profile.slide_size();
        draft.push(Shape::TextBox {
            name: "Emphasis".to_string(),
            frame: Rect::new(
                inches(1.0),
                height - inches(1.5),
                width - inches(2.0),
                inches(1.0),
            ),
            text,
        });
    }

    /// Verbatim notes, else generated from the slide text.
    fn notes_for(&self, spec: &SlideSpec) -> String {
        if !spec.speaking_notes.trim().is_empty() {
            return spec.speaking_notes.clone();
        }

        let slide_text = format!(
            "Title: {}\nContent: {}",
            spec.title,
            spec.content.join("; ")
        );
        notes_or_fallback(self.notes, &slide_text)
    }

    /// Title plus a plain bulleted box on the first layout.
    pub fn minimal_slide(&self, spec: &SlideSpec, position: usize) -> SlideDraft {
        let mut draft = SlideDraft::new(0);
        draft.push(Shape::TextBox {
            name: "Title".to_string(),
            frame: self.title_rect(),
            text: self.title_text(&self.fitter.clean_title(&spec.title)),
        });

        let items = self
            .fitter
            .fit(&spec.content, self.profile.slide_height);
        if !items.is_empty() {
            let style = self.content_style(SlideType::Content);
            let mut text = TextFrame::new();
            for item in items {
                text.push(
                    Paragraph::new(format!("• {}", item))
                        .with_space_after(PARAGRAPH_SPACING)
                        .with_style(style.clone()),
                );
            }
            draft.push(Shape::TextBox {
                name: "Content".to_string(),
                frame: self.content_rect(),
                text,
            });
        }

        draft.notes = spec.speaking_notes.clone();
        draft.transition = Some(TransitionKind::for_slide(position));
        draft
    }

    /// Compose an image slide in the given tier. `number` labels the title.
    pub fn image_slide(
        &self,
        tier: ImageTier,
        image: &ImageData,
        number: usize,
        position: usize,
    ) -> Result<SlideDraft> {
        let mut draft = match tier {
            ImageTier::Captioned => {
                let (width, height) = image.dimensions.ok_or_else(|| {
                    Error::ImageInsertion("image size could not be decoded".to_string())
                })?;

                let mut draft = self.instantiate(self.profile.image_layout_index())?;
                self.place_title(&mut draft, &format!("Visual Insight {}", number));
                draft.push(Shape::Picture {
                    name: format!("Picture {}", number),
                    frame: Rect::new(inches(0.5), inches(2.2), inches(5.5), inches(4.0))
                        .fit_aspect(width, height),
                    image: image.clone(),
                });

                let style = self.content_style(SlideType::Content);
                let mut text = TextFrame::new();
                for caption in CAPTIONS {
                    text.push(
                        Paragraph::new(format!("• {}", caption))
                            .with_space_after(PARAGRAPH_SPACING)
                            .with_style(style.clone()),
                    );
                }
                draft.push(Shape::TextBox {
                    name: "Caption".to_string(),
                    frame: Rect::new(inches(6.2), inches(2.5), inches(3.3), inches(3.5)),
                    text,
                });
                draft
            }
            ImageTier::Centered => {
                let layout = self.profile.layouts.len().saturating_sub(1).min(1);
                let mut draft = self.instantiate(layout)?;
                self.place_title(&mut draft, &format!("Supporting Visual Evidence {}", number));
                draft.push(Shape::Picture {
                    name: format!("Picture {}", number),
                    frame: Rect::new(inches(1.5), inches(2.5), inches(7.0), inches(4.0)),
                    image: image.clone(),
                });
                draft
            }
            ImageTier::Bare => {
                let mut draft = self.instantiate(0)?;
                self.place_title(&mut draft, &format!("Supporting Visual {}", number));
                draft.push(Shape::Picture {
                    name: format!("Picture {}", number),
                    frame: Rect::new(inches(2.0), inches(2.0), inches(6.0), inches(4.0)),
                    image: image.clone(),
                });
                draft
            }
        };

        draft.transition = Some(TransitionKind::for_slide(position));
        Ok(draft)
    }
}
