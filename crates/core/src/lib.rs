//! Core domain types, layout selection, contrast and content-fitting policy
//! for template-driven slide deck generation.

pub mod contrast;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod outliner;
pub mod profile;
pub mod transition;
pub mod types;

pub use error::{Error, Result};
pub use layout::LayoutSelector;
pub use normalize::{ContentFitter, FitPolicy};
pub use outliner::{
    FallbackOutliner, JsonOutliner, Outliner, SlideTextNotes, SpeakerNotesGenerator,
};
pub use profile::{
    LayoutInfo, PlaceholderInfo, PlaceholderKind, TemplateProfile, ThemeColors, ThemeFonts,
};
pub use transition::TransitionKind;
pub use types::{Outline, Rect, Rgb, SlideSpec, SlideType};
