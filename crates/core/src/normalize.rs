//! Text normalization and overflow bounding for slide content.
//!
//! Outliner output is noisy: escaped line breaks, spreadsheet-style
//! `_x000D_` markers, stray control characters, doubled labels. The
//! [`ContentFitter`] turns it into bullet text that is clean and bounded
//! by the slide's height.

use crate::error::{Error, Result};
use crate::types::{inches, points};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Escaped whitespace sequences, OOXML character markers and raw control characters.
static ARTIFACT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[rnt]|_x000[DdAa]_|\p{Cc}").unwrap());

/// Two or more `Analysis:` labels at the start of an item.
static REPEATED_ANALYSIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:analysis\s*:\s*){2,}").unwrap());

/// A short leading label such as `Market Insight:`.
static COLON_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:.!?]{1,50}:(\s|$)").unwrap());

/// Leading markdown heading markers and `Analysis:` labels on titles.
static TITLE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*(?:#+|(?i:analysis\s*:)))+").unwrap());

/// Characters that already mark an item as a bullet.
const BULLET_GLYPHS: &[char] = &[
    '•', '●', '▪', '◦', '▶', '◀', '-', '*', '✓', '➤', '💡',
];

/// Category labels, checked in order against the lowercased item.
const CATEGORY_LABELS: &[(&[&str], &str)] = &[
    (&["market", "revenue", "growth"], "Market Insight:"),
    (&["feature", "benefit", "advantage"], "Key Benefit:"),
    (&["strategy", "plan", "approach"], "Strategic Approach:"),
    (&["result", "outcome", "impact"], "Expected Outcome:"),
];

const DEFAULT_LABEL: &str = "Key Point:";

/// Words kept fully upper-case in titles.
const ACRONYMS: &[&str] = &["API", "AI", "ML", "UI", "UX"];

const TRUNCATION_MARKER: &str = "...";

/// Title used when cleaning leaves nothing.
pub const FALLBACK_TITLE: &str = "Slide Title";

/// Constants governing how much text a slide may carry.
#[derive(Debug, Clone, PartialEq)]
pub struct FitPolicy {
    /// Vertical space reserved for the title band and margins (EMU).
    pub title_allowance: i64,

    /// Approximate height of one text line including spacing (EMU).
    pub line_height: i64,

    /// Upper bound on items per slide.
    pub max_items: usize,

    /// Items longer than this many characters are truncated.
    pub max_item_chars: usize,

    /// Number of raw items kept when fitting fails.
    pub raw_fallback_items: usize,

    /// Titles longer than this many characters are truncated.
    pub max_title_chars: usize,

    /// Items longer than this are split at their first colon.
    pub split_threshold: usize,

    /// Only this many leading items are considered for splitting.
    pub split_items: usize,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            title_allowance: inches(4.5),
            line_height: points(30.0),
            max_items: 8,
            max_item_chars: 180,
            raw_fallback_items: 6,
            max_title_chars: 60,
            split_threshold: 80,
            split_items: 4,
        }
    }
}

impl FitPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_allowance(mut self, emu: i64) -> Self {
        self.title_allowance = emu;
        self
    }

    pub fn with_line_height(mut self, emu: i64) -> Self {
        self.line_height = emu;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_max_item_chars(mut self, chars: usize) -> Self {
        self.max_item_chars = chars;
        self
    }

    pub fn with_raw_fallback_items(mut self, count: usize) -> Self {
        self.raw_fallback_items = count;
        self
    }

    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    pub fn with_split_threshold(mut self, chars: usize) -> Self {
        self.split_threshold = chars;
        self
    }
}

/// Replace artifacts with spaces and collapse whitespace runs.
fn strip_artifacts(text: &str) -> String {
    let cleaned = ARTIFACT_REGEX.replace_all(text, " ");
    let composed: String = cleaned.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

fn category_label(item: &str) -> &'static str {
    let lower = item.to_lowercase();
    CATEGORY_LABELS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_LABEL)
}

fn has_marker(item: &str) -> bool {
    item.starts_with(BULLET_GLYPHS) || COLON_LABEL_REGEX.is_match(item)
}

/// Upper-case the first character if that does not change the length.
fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut upper = first.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => std::iter::once(u).chain(chars).collect(),
                _ => word.to_string(),
            }
        }
        None => String::new(),
    }
}

fn title_case_word(word: &str, is_first: bool) -> String {
    let core = word.trim_matches(|c: char| !c.is_alphanumeric());
    if !core.is_empty() && ACRONYMS.iter().any(|a| a.eq_ignore_ascii_case(core)) {
        let start = word.len() - word.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
        let end = start + core.len();
        return format!(
            "{}{}{}",
            &word[..start],
            core.to_ascii_uppercase(),
            &word[end..]
        );
    }

    if is_first || word.chars().count() > 3 {
        capitalize_first(word)
    } else {
        word.to_string()
    }
}

/// Normalizes and bounds slide text.
#[derive(Debug, Clone, Default)]
pub struct ContentFitter {
    policy: FitPolicy,
}

impl ContentFitter {
    /// Create a fitter with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fitting policy.
    pub fn with_policy(mut self, policy: FitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &FitPolicy {
        &self.policy
    }

    /// Clean bullet items.
    ///
    /// - Strips escaped line breaks, `_x000D_`/`_x000A_` markers and control characters
    /// - Applies NFC and collapses whitespace
    /// - Drops items shorter than 3 characters
    /// - Collapses repeated `Analysis:` labels
    /// - Labels items that carry neither a bullet glyph nor a colon label
    /// - Ensures terminal punctuation
    pub fn normalize(&self, items: &[String]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| {
                let cleaned = strip_artifacts(item);
                if cleaned.chars().count() < 3 {
                    return None;
                }

                let mut text = REPEATED_ANALYSIS_REGEX
                    .replace(&cleaned, "Analysis: ")
                    .into_owned();

                if !has_marker(&text) {
                    text = format!("{} {}", category_label(&text), text);
                }

                if !text.ends_with(['.', '!', '?']) {
                    text.push('.');
                }

                Some(text)
            })
            .collect()
    }

    /// Bound items to what fits on a slide of `slide_height` EMU.
    ///
    /// Falls back to the first few raw items when the policy is unusable.
    pub fn fit(&self, items: &[String], slide_height: i64) -> Vec<String> {
        match self.try_fit(items, slide_height) {
            Ok(fitted) => fitted,
            Err(e) => {
                log::warn!("{}; keeping first {} items", e, self.policy.raw_fallback_items);
                items
                    .iter()
                    .take(self.policy.raw_fallback_items)
                    .cloned()
                    .collect()
            }
        }
    }

    /// The fitting computation, surfacing policy errors.
    pub fn try_fit(&self, items: &[String], slide_height: i64) -> Result<Vec<String>> {
        if self.policy.line_height <= 0 {
            return Err(Error::ContentFit(format!(
                "line height must be positive, got {}",
                self.policy.line_height
            )));
        }

        let available = (slide_height - self.policy.title_allowance).max(0);
        let max_lines = (available / self.policy.line_height) as usize;
        let max_items = (max_lines / 2).min(self.policy.max_items);

        Ok(items
            .iter()
            .take(max_items)
            .map(|item| truncate_chars(item, self.policy.max_item_chars))
            .collect())
    }

    /// Normalize then fit.
    pub fn prepare(&self, items: &[String], slide_height: i64) -> Vec<String> {
        self.fit(&self.normalize(items), slide_height)
    }

    /// Clean a slide title. Idempotent.
    pub fn clean_title(&self, title: &str) -> String {
        let cleaned = strip_artifacts(title);
        let stripped = TITLE_PREFIX_REGEX.replace(&cleaned, "");
        let stripped = stripped.trim();

        if stripped.is_empty() {
            return FALLBACK_TITLE.to_string();
        }

        let bounded = truncate_chars(stripped, self.policy.max_title_chars);

        bounded
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| title_case_word(word, i == 0))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split a long labelled item into `label:` and its detail.
    ///
    /// Only the first few items qualify, and only when longer than the
    /// split threshold.
    pub fn split_detail(&self, index: usize, item: &str) -> Option<(String, String)> {
        if index >= self.policy.split_items || item.chars().count() <= self.policy.split_threshold
        {
            return None;
        }

        let (label, detail) = item.split_once(':')?;
        Some((format!("{}:", label), detail.trim().to_string()))
    }
}
