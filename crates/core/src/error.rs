//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a deck.
///
/// Only [`Error::TemplateLoad`], [`Error::InvalidOutline`] and failures to
/// write the output package reach the caller; the remaining variants are
/// produced by individual steps and absorbed by their documented fallbacks.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The template is unreadable or not a presentation package.
    #[error("Failed to load template: {0}")]
    TemplateLoad(String),

    /// A slide's chosen layout could not be applied.
    #[error("Layout application error: {0}")]
    LayoutApplication(String),

    /// The content fitting computation failed.
    #[error("Content fit error: {0}")]
    ContentFit(String),

    /// An image could not be placed on a slide.
    #[error("Image insertion error: {0}")]
    ImageInsertion(String),

    /// The outliner or speaker notes collaborator failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The outline cannot be rendered (e.g. it has no slides).
    #[error("Invalid outline: {0}")]
    InvalidOutline(String),

    /// ZIP container error.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(String),
}

impl Error {
    /// Whether this error aborts the whole generation request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TemplateLoad(_) | Error::InvalidOutline(_) | Error::Io(_) | Error::Zip(_)
        )
    }
}
