//! Slide transition selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transition effect recorded on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Fade,
    Push,
    Wipe,
    Split,
    Reveal,
    Cover,
    Cut,
}

impl TransitionKind {
    /// Rotation order.
    pub const CYCLE: [TransitionKind; 7] = [
        TransitionKind::Fade,
        TransitionKind::Push,
        TransitionKind::Wipe,
        TransitionKind::Split,
        TransitionKind::Reveal,
        TransitionKind::Cover,
        TransitionKind::Cut,
    ];

    /// Transition for the slide at a 0-based position in the deck.
    pub fn for_slide(position: usize) -> Self {
        Self::CYCLE[position % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Push => "push",
            Self::Wipe => "wipe",
            Self::Split => "split",
            Self::Reveal => "reveal",
            Self::Cover => "cover",
            Self::Cut => "cut",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
