//! Deck assembly: base document, slide loop with image interleaving, output
//! file allocation.

use crate::composer::{ImageTier, SlideComposer};
use crate::document::DeckDocument;
use crate::media::ImageData;
use crate::package::Package;
use crate::slide::SlideDraft;
use crate::template::TemplateReader;
use deckgen_core::{
    ContentFitter, Error, FitPolicy, Outline, Outliner, Result, SlideType, SpeakerNotesGenerator,
    TemplateProfile,
};
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Options for building a deck.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckOptions {
    /// An image slide may follow every content slide whose 1-based
    /// position is a multiple of this. Zero disables images.
    pub image_cadence: usize,

    /// Directory for the output file; the system temp dir when unset.
    pub output_dir: Option<PathBuf>,

    pub fit: FitPolicy,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            image_cadence: 3,
            output_dir: None,
            fit: FitPolicy::default(),
        }
    }
}

impl DeckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_cadence(mut self, cadence: usize) -> Self {
        self.image_cadence = cadence;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_fit_policy(mut self, fit: FitPolicy) -> Self {
        self.fit = fit;
        self
    }
}

/// Builds a presentation file from an outline and a template.
pub struct DeckBuilder<'a> {
    template: PathBuf,
    notes: &'a dyn SpeakerNotesGenerator,
    options: DeckOptions,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(template: impl Into<PathBuf>, notes: &'a dyn SpeakerNotesGenerator) -> Self {
        Self {
            template: template.into(),
            notes,
            options: DeckOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DeckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    /// Build the deck and write it to a new `.pptx` file, returning its path.
    pub fn build(
        &self,
        outline: &Outline,
        profile: &TemplateProfile,
        images: &[PathBuf],
    ) -> Result<PathBuf> {
        let bytes = self.render(outline, profile, images)?;

        let dir = self
            .options
            .output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let path = save_to(&bytes, &dir)?;

        log::info!(
            "Presentation written to '{}' ({} bytes)",
            path.display(),
            bytes.len()
        );
        Ok(path)
    }

    /// Build the deck in memory.
    pub fn render(
        &self,
        outline: &Outline,
        profile: &TemplateProfile,
        images: &[PathBuf],
    ) -> Result<Vec<u8>> {
        if outline.slides.is_empty() {
            return Err(Error::InvalidOutline("outline has no slides".to_string()));
        }

        log::debug!(
            "Rendering '{}': {} slides ({} content), {} image(s)",
            outline.title,
            outline.slides.len(),
            outline.content_slide_count(),
            images.len()
        );

        let (mut document, profile) = self.base_document(profile)?;
        let fitter = ContentFitter::new().with_policy(self.options.fit.clone());
        let composer = SlideComposer::new(&profile, self.notes).with_fitter(fitter);

        let mut images = images.iter();
        for (i, spec) in outline.slides.iter().enumerate() {
            let position = document.slide_count();
            let draft = composer.compose(spec, position);
            if let Err(e) = append(&mut document, &profile, &draft) {
                log::warn!("Slide {} could not be added: {}; retrying minimal", i + 1, e);
                let minimal = composer.minimal_slide(spec, position);
                if let Err(e) = append(&mut document, &profile, &minimal) {
                    log::error!("Slide {} dropped: {}", i + 1, e);
                }
            }

            let cadence = self.options.image_cadence;
            if spec.slide_type == SlideType::Content && cadence > 0 && (i + 1) % cadence == 0 {
                if let Some(path) = images.next() {
                    insert_image(&mut document, &profile, &composer, path, i + 1);
                }
            }
        }

        let remaining = images.len();
        if remaining > 0 {
            log::debug!("{} image(s) not placed", remaining);
        }

        log::info!(
            "Built deck '{}' with {} slides",
            outline.title,
            document.slide_count()
        );
        document.to_bytes()
    }

    /// The template with its slides removed, or the blank document when the
    /// template cannot serve as a base.
    fn base_document<'p>(
        &self,
        profile: &'p TemplateProfile,
    ) -> Result<(DeckDocument, Cow<'p, TemplateProfile>)> {
        let base = Package::open(&self.template).and_then(DeckDocument::from_template);

        match base {
            Ok(document) if !profile.layouts.is_empty() => Ok((document, Cow::Borrowed(profile))),
            Ok(_) => {
                log::warn!("Template has no layouts; using blank presentation");
                blank_base(profile)
            }
            Err(e) => {
                log::warn!("Template unusable as base ({}); using blank presentation", e);
                blank_base(profile)
            }
        }
    }
}

/// Blank document, keeping the profile's styling but its own layouts and size.
fn blank_base(profile: &TemplateProfile) -> Result<(DeckDocument, Cow<'_, TemplateProfile>)> {
    let blank = TemplateReader::new().read_package(&Package::blank())?;
    let profile = TemplateProfile {
        layouts: blank.layouts,
        slide_width: blank.slide_width,
        slide_height: blank.slide_height,
        ..profile.clone()
    };
    Ok((DeckDocument::blank()?, Cow::Owned(profile)))
}

fn append(document: &mut DeckDocument, profile: &TemplateProfile, draft: &SlideDraft) -> Result<()> {
    let layout = profile.layout(draft.layout_index).ok_or_else(|| {
        Error::LayoutApplication(format!("Layout {} not in catalog", draft.layout_index))
    })?;
    document.add_slide(&layout.part_name, draft)
}

/// Insert one image slide, trying each tier in turn.
fn insert_image(
    document: &mut DeckDocument,
    profile: &TemplateProfile,
    composer: &SlideComposer<'_>,
    path: &Path,
    number: usize,
) {
    let image = match ImageData::load(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("Skipping image slide: {}", e);
            return;
        }
    };

    for tier in ImageTier::ORDER {
        let position = document.slide_count();
        let result = composer
            .image_slide(tier, &image, number, position)
            .and_then(|draft| append(document, profile, &draft));

        match result {
            Ok(()) => {
                log::debug!("Inserted image '{}' as {:?} slide", path.display(), tier);
                return;
            }
            Err(e) => log::warn!("{:?} image slide failed: {}", tier, e),
        }
    }

    log::warn!("Image '{}' could not be placed on any slide", path.display());
}

/// Write `bytes` to a fresh `deck-*.pptx` file in `dir`.
///
/// The file only persists once fully written.
pub fn save_to(bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("deck-")
        .suffix(".pptx")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
    Ok(path)
}

/// Analyze `text` into an outline and build a deck from it.
pub fn generate(
    text: &str,
    guidance: &str,
    template: &Path,
    images: &[PathBuf],
    outliner: &dyn Outliner,
    notes: &dyn SpeakerNotesGenerator,
    options: &DeckOptions,
) -> Result<PathBuf> {
    let profile = TemplateReader::new().load(template)?;
    let outline = outliner.analyze(text, guidance);
    log::debug!(
        "Outline '{}' with {} slides",
        outline.title,
        outline.slides.len()
    );

    DeckBuilder::new(template, notes)
        .with_options(options.clone())
        .build(&outline, &profile, images)
}
