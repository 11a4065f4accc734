//! Layout selection by slide type.
//!
//! Layout names are matched against per-type keyword lists. Matching is a
//! case-insensitive substring test and the first layout in template order
//! that matches wins. When nothing matches, each type has a fixed fallback.

use crate::profile::LayoutInfo;
use crate::types::SlideType;

const TITLE_KEYWORDS: &[&str] = &["title", "cover", "intro"];
const SECTION_KEYWORDS: &[&str] = &["section", "divider", "header", "chapter"];
const CONTENT_KEYWORDS: &[&str] = &["content", "bullet", "text", "list"];
const COMPARISON_KEYWORDS: &[&str] = &["two", "comparison", "column", "vs"];
const CONCLUSION_KEYWORDS: &[&str] = &["conclusion", "thank", "end", "summary"];

/// Keywords for layouts that can host a picture next to text.
const IMAGE_KEYWORDS: &[&str] = &["content", "text", "bullet", "two content"];

/// Where to land when no layout name matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    /// Always the first layout.
    First,
    /// The second layout when there is one.
    Second,
}

/// Picks layouts from a template's catalog.
#[derive(Debug, Clone, Copy)]
pub struct LayoutSelector<'a> {
    layouts: &'a [LayoutInfo],
}

impl<'a> LayoutSelector<'a> {
    pub fn new(layouts: &'a [LayoutInfo]) -> Self {
        Self { layouts }
    }

    /// Number of layouts in the catalog.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Choose the layout index for a slide type.
    ///
    /// Always returns a valid index into a non-empty catalog, and 0 for an
    /// empty one.
    pub fn best_layout_index(&self, slide_type: SlideType) -> usize {
        if self.layouts.is_empty() {
            return 0;
        }

        let (keywords, fallback) = match slide_type {
            SlideType::Title => (TITLE_KEYWORDS, Fallback::First),
            SlideType::Section => (SECTION_KEYWORDS, Fallback::First),
            SlideType::Content => (CONTENT_KEYWORDS, Fallback::Second),
            SlideType::Comparison => (COMPARISON_KEYWORDS, Fallback::Second),
            SlideType::Conclusion => (CONCLUSION_KEYWORDS, Fallback::First),
            _ => return self.second_or_first(),
        };

        self.find_by_keywords(keywords)
            .unwrap_or_else(|| match fallback {
                Fallback::First => 0,
                Fallback::Second => self.second_or_first(),
            })
    }

    /// Choose the layout for a captioned image slide.
    pub fn image_layout_index(&self) -> usize {
        self.find_by_keywords(IMAGE_KEYWORDS)
            .unwrap_or(if self.layouts.len() > 1 { 1 } else { 0 })
    }

    /// `min(1, n - 1)`, or 0 for an empty catalog.
    pub fn second_or_first(&self) -> usize {
        self.layouts.len().saturating_sub(1).min(1)
    }

    fn find_by_keywords(&self, keywords: &[&str]) -> Option<usize> {
        self.layouts.iter().position(|layout| {
            let name = layout.name.to_lowercase();
            keywords.iter().any(|keyword| name.contains(keyword))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Vec<LayoutInfo> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                LayoutInfo::new(i, *name, format!("ppt/slideLayouts/slideLayout{}.xml", i + 1))
            })
            .collect()
    }

    #[test]
    fn test_section_matches_header() {
        let layouts = catalog(&["Title Slide", "Content", "Section Header"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.best_layout_index(SlideType::Section), 2);
    }

    #[test]
    fn test_case_insensitive_first_match() {
        let layouts = catalog(&["Blank", "BULLET LIST", "Text Only"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.best_layout_index(SlideType::Content), 1);
    }

    #[test]
    fn test_title_keywords_match_in_scan_order() {
        // "Title and Content" contains "title" and comes first.
        let layouts = catalog(&["Blank", "Title and Content", "Cover"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.best_layout_index(SlideType::Title), 1);
    }

    #[test]
    fn test_fallbacks_without_matches() {
        let layouts = catalog(&["Alpha", "Beta", "Gamma"]);
        let selector = LayoutSelector::new(&layouts);

        assert_eq!(selector.best_layout_index(SlideType::Title), 0);
        assert_eq!(selector.best_layout_index(SlideType::Section), 0);
        assert_eq!(selector.best_layout_index(SlideType::Conclusion), 0);
        assert_eq!(selector.best_layout_index(SlideType::Content), 1);
        assert_eq!(selector.best_layout_index(SlideType::Comparison), 1);
        assert_eq!(selector.best_layout_index(SlideType::Strategy), 1);
        assert_eq!(selector.best_layout_index(SlideType::Unknown), 1);
    }

    #[test]
    fn test_unlisted_types_ignore_keywords() {
        let layouts = catalog(&["Alpha", "Beta", "Analysis Layout"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.best_layout_index(SlideType::Analysis), 1);
    }

    #[test]
    fn test_single_layout_catalog() {
        let layouts = catalog(&["Only"]);
        let selector = LayoutSelector::new(&layouts);

        for slide_type in [
            SlideType::Title,
            SlideType::Content,
            SlideType::Comparison,
            SlideType::Overview,
        ] {
            assert_eq!(selector.best_layout_index(slide_type), 0);
        }
        assert_eq!(selector.image_layout_index(), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let selector = LayoutSelector::new(&[]);
        assert!(selector.is_empty());
        assert_eq!(selector.best_layout_index(SlideType::Content), 0);
        assert_eq!(selector.best_layout_index(SlideType::Title), 0);
        assert_eq!(selector.image_layout_index(), 0);
    }

    #[test]
    fn test_comparison_matches_two() {
        let layouts = catalog(&["Title Slide", "Title and Content", "Two Content"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.best_layout_index(SlideType::Comparison), 2);
    }

    #[test]
    fn test_image_layout_prefers_content() {
        let layouts = catalog(&["Title Slide", "Section Header", "Title and Content"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.image_layout_index(), 2);

        let layouts = catalog(&["Alpha", "Beta"]);
        let selector = LayoutSelector::new(&layouts);
        assert_eq!(selector.image_layout_index(), 1);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let layouts = catalog(&["Title Slide", "Content", "Section Header", "Closing Summary"]);
        let selector = LayoutSelector::new(&layouts);
        let first = selector.best_layout_index(SlideType::Conclusion);
        for _ in 0..10 {
            assert_eq!(selector.best_layout_index(SlideType::Conclusion), first);
        }
        assert_eq!(first, 3);
    }
}
