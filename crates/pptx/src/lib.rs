//! PPTX backend for template-driven deck generation.
//!
//! Reads a template package into a [`deckgen_core::TemplateProfile`],
//! composes slides against it and writes the result as a new `.pptx` file.

pub mod blank;
pub mod builder;
pub mod composer;
pub mod document;
pub mod media;
pub mod package;
pub mod parts;
pub mod slide;
pub mod template;
pub mod xml;

pub use builder::{generate, DeckBuilder, DeckOptions};
pub use composer::{ComposeStage, ImageTier, SlideComposer};
pub use document::DeckDocument;
pub use media::{ImageData, ImageFormat};
pub use package::Package;
pub use slide::SlideDraft;
pub use template::TemplateReader;
