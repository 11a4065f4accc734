//! Foreground color selection against a slide background.

use crate::profile::ThemeColors;
use crate::types::Rgb;

/// Backgrounds below this luminance are treated as dark.
pub const DARK_BACKGROUND_THRESHOLD: f64 = 0.5;

/// Theme colors below this luminance may be used as text on light backgrounds.
pub const DARK_TEXT_THRESHOLD: f64 = 0.6;

/// Title text on light backgrounds.
pub const TITLE_TEXT: Rgb = Rgb::new(20, 20, 20);

/// Body text on light backgrounds.
pub const BODY_TEXT: Rgb = Rgb::new(40, 40, 40);

/// Emphasis text on light backgrounds.
pub const EMPHASIS_TEXT: Rgb = Rgb::new(180, 60, 0);

/// Whether `background` (`#rrggbb`) is dark. Unparseable colors are light.
pub fn is_background_dark(background: &str) -> bool {
    Rgb::from_hex(background)
        .map(|rgb| rgb.luminance() < DARK_BACKGROUND_THRESHOLD)
        .unwrap_or(false)
}

/// Whether `color` is dark enough to read on a light background.
pub fn is_color_dark_enough(color: &str) -> bool {
    Rgb::from_hex(color)
        .map(|rgb| rgb.luminance() < DARK_TEXT_THRESHOLD)
        .unwrap_or(false)
}

/// Text color for a title or body run.
///
/// Dark backgrounds always get white. On light backgrounds the theme's
/// primary color is used when it is dark enough, otherwise a near-black.
pub fn resolve_text_color(is_title: bool, colors: &ThemeColors, background: &str) -> Rgb {
    if is_background_dark(background) {
        return Rgb::WHITE;
    }

    if is_color_dark_enough(&colors.primary) {
        if let Some(primary) = Rgb::from_hex(&colors.primary) {
            return primary;
        }
    }

    if is_title {
        TITLE_TEXT
    } else {
        BODY_TEXT
    }
}

/// Color for emphasis callouts. The theme primary is never used here.
pub fn emphasis_color(background: &str) -> Rgb {
    if is_background_dark(background) {
        Rgb::WHITE
    } else {
        EMPHASIS_TEXT
    }
}
