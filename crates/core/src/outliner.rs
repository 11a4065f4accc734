//! Outline and speaker-notes collaborators.
//!
//! Deck generation consumes text analysis only through the [`Outliner`] and
//! [`SpeakerNotesGenerator`] traits. Two offline implementations live here:
//! a deterministic [`FallbackOutliner`] that chunks the input text, and a
//! [`JsonOutliner`] that parses a model response and degrades to the fallback.

use crate::error::{Error, Result};
use crate::types::{Outline, SlideSpec, SlideType};

/// Notes used when the notes generator fails.
pub const FALLBACK_NOTES: &str = "Key points to discuss based on slide content.";

/// Produces a slide outline from free text.
pub trait Outliner {
    fn analyze(&self, text: &str, guidance: &str) -> Outline;
}

/// Produces presenter notes for a slide.
pub trait SpeakerNotesGenerator {
    fn generate(&self, slide_text: &str) -> Result<String>;
}

/// Run a notes generator, substituting [`FALLBACK_NOTES`] on failure.
pub fn notes_or_fallback(generator: &dyn SpeakerNotesGenerator, slide_text: &str) -> String {
    match generator.generate(slide_text) {
        Ok(notes) => notes.trim().to_string(),
        Err(e) => {
            log::warn!("Speaker notes generation failed: {}", e);
            FALLBACK_NOTES.to_string()
        }
    }
}

/// Minimum sentence length, in characters, for a sentence to become a point.
const MIN_SENTENCE_CHARS: usize = 10;

/// Items longer than this are split at their first comma.
const LONG_ITEM_CHARS: usize = 150;

const MIN_POINTS: usize = 4;
const MAX_POINTS: usize = 6;

/// Deterministic outline built from the input text alone.
///
/// The text is chunked into paragraphs (when there are more than two) or
/// sentences, then grouped into content slides between a fixed overview and
/// a fixed conclusion. A section header precedes every third content group.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackOutliner;

impl FallbackOutliner {
    pub fn new() -> Self {
        Self
    }

    fn chunks(text: &str) -> Vec<String> {
        let paragraphs: Vec<String> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();

        if paragraphs.len() > 2 {
            return paragraphs;
        }

        text.split('.')
            .map(str::trim)
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .map(String::from)
            .collect()
    }

    fn points(chunk: &[String]) -> Vec<String> {
        let mut points = Vec::new();
        for item in chunk {
            if item.chars().count() > LONG_ITEM_CHARS {
                match item.split_once(',') {
                    Some((head, rest)) => {
                        points.push(format!("{} - Key insight", head));
                        points.push(format!("Details: {}", rest.trim()));
                    }
                    None => points.push(format!("{} - Key insight", item)),
                }
            } else {
                points.push(format!("Analysis: {}", item));
            }
        }

        while points.len() < MIN_POINTS {
            points.push(format!(
                "Supporting point {}: Additional context and relevance",
                points.len()
            ));
        }

        points.truncate(MAX_POINTS);
        points
    }

    fn overview_slide() -> SlideSpec {
        SlideSpec::new("Presentation Overview", SlideType::Title)
            .with_content([
                "Key topics and insights to be covered",
                "Main objectives and expected outcomes",
                "Strategic importance and relevance",
                "Action items and next steps",
            ])
            .with_emphasis(["Comprehensive analysis", "Data-driven insights"])
            .with_notes(
                "Welcome the audience and provide overview of presentation structure and key objectives.",
            )
    }

    fn section_slide(number: usize) -> SlideSpec {
        SlideSpec::new(format!("Section {}: Key Analysis", number), SlideType::Section)
            .with_content([
                "Detailed examination of core concepts",
                "Critical insights and findings",
                "Strategic implications and impact",
            ])
            .with_emphasis(["Strategic focus area"])
            .with_notes("Transition to new section with key focus areas.")
    }

    fn conclusion_slide() -> SlideSpec {
        SlideSpec::new("Key Takeaways & Next Steps", SlideType::Conclusion)
            .with_content([
                "Summary of critical findings and insights",
                "Strategic recommendations and action items",
                "Implementation timeline and milestones",
                "Success metrics and evaluation criteria",
                "Future opportunities and considerations",
            ])
            .with_emphasis(["Action required", "Success metrics"])
            .with_notes(
                "Summarize key points and provide clear next steps with timeline and ownership.",
            )
    }
}

impl Outliner for FallbackOutliner {
    fn analyze(&self, text: &str, guidance: &str) -> Outline {
        if !guidance.trim().is_empty() {
            log::debug!("Fallback outline ignores guidance: {}", guidance.trim());
        }

        let chunks = Self::chunks(text);
        let per_slide = (chunks.len() / 6).max(MIN_POINTS);

        let mut outline =
            Outline::new("Professional Analysis & Insights").with_slide(Self::overview_slide());

        for group in chunks.chunks(per_slide) {
            let slide_num = outline.slides.len();

            if slide_num > 1 && (slide_num - 1) % 3 == 0 {
                outline
                    .slides
                    .push(Self::section_slide((slide_num - 1) / 3 + 1));
            }

            outline.slides.push(
                SlideSpec::new(format!("Analysis Point {}", slide_num), SlideType::Content)
                    .with_content(Self::points(group))
                    .with_emphasis([format!("Key insight #{}", slide_num)])
                    .with_notes(format!(
                        "Detailed discussion of analysis point {} with supporting evidence and examples.",
                        slide_num
                    )),
            );
        }

        outline.slides.push(Self::conclusion_slide());
        outline
    }
}

/// Extract the JSON object spanning the first `{` to the last `}`.
fn json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}

/// Parse an outline embedded in a model response.
pub fn parse_outline(response: &str) -> Result<Outline> {
    let json = json_object(response)
        .ok_or_else(|| Error::ExternalService("no JSON object in response".to_string()))?;

    serde_json::from_str(json)
        .map_err(|e| Error::ExternalService(format!("malformed outline JSON: {}", e)))
}

/// Outliner backed by a model response.
///
/// The response is parsed on every call; when it is unusable the outline is
/// synthesized from the input text by [`FallbackOutliner`].
#[derive(Debug, Clone)]
pub struct JsonOutliner {
    response: String,
}

impl JsonOutliner {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Outliner for JsonOutliner {
    fn analyze(&self, text: &str, guidance: &str) -> Outline {
        match parse_outline(&self.response) {
            Ok(outline) if !outline.slides.is_empty() => outline,
            Ok(_) => {
                log::warn!("Outline response has no slides; using fallback outline");
                FallbackOutliner.analyze(text, guidance)
            }
            Err(e) => {
                log::warn!("{}; using fallback outline", e);
                FallbackOutliner.analyze(text, guidance)
            }
        }
    }
}

/// Offline notes generator: the slide text folded onto one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideTextNotes;

impl SpeakerNotesGenerator for SlideTextNotes {
    fn generate(&self, slide_text: &str) -> Result<String> {
        let folded = slide_text.split_whitespace().collect::<Vec<_>>().join(" ");
        if folded.is_empty() {
            return Err(Error::ExternalService("empty slide text".to_string()));
        }
        Ok(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotes;

    impl SpeakerNotesGenerator for FailingNotes {
        fn generate(&self, _slide_text: &str) -> Result<String> {
            Err(Error::ExternalService("timeout".to_string()))
        }
    }

    const SAMPLE: &str = "Revenue grew strongly across every region this year. \
        Customer churn dropped after the onboarding redesign. \
        Hiring slowed in the second half of the year. \
        The mobile app now drives most new signups";

    #[test]
    fn test_fallback_outline_shape() {
        let outline = FallbackOutliner.analyze(SAMPLE, "");

        assert_eq!(outline.title, "Professional Analysis & Insights");
        assert_eq!(outline.slides.len(), 3);
        assert_eq!(outline.slides[0].slide_type, SlideType::Title);
        assert_eq!(outline.slides[1].slide_type, SlideType::Content);
        assert_eq!(outline.slides[1].title, "Analysis Point 1");
        assert_eq!(outline.slides[2].title, "Key Takeaways & Next Steps");
        assert_eq!(outline.slides[2].slide_type, SlideType::Conclusion);
    }

    #[test]
    fn test_fallback_points_are_labelled() {
        let outline = FallbackOutliner.analyze(SAMPLE, "");
        let content = &outline.slides[1].content;

        assert_eq!(content.len(), 4);
        assert_eq!(
            content[0],
            "Analysis: Revenue grew strongly across every region this year"
        );
        assert!(content.iter().all(|c| c.starts_with("Analysis: ")));
    }

    #[test]
    fn test_fallback_pads_short_input() {
        let outline = FallbackOutliner.analyze("A single meaningful sentence here.", "");
        let content = &outline.slides[1].content;

        assert_eq!(content.len(), 4);
        assert_eq!(
            content[1],
            "Supporting point 1: Additional context and relevance"
        );
    }

    #[test]
    fn test_fallback_empty_text() {
        let outline = FallbackOutliner.analyze("", "");
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.slides[1].slide_type, SlideType::Conclusion);
    }

    #[test]
    fn test_fallback_section_headers() {
        let text = (0..16)
            .map(|i| format!("Paragraph number {} discusses something useful", i))
            .collect::<Vec<_>>()
            .join("\n\n");

        let outline = FallbackOutliner.analyze(&text, "");
        let types: Vec<SlideType> = outline.slides.iter().map(|s| s.slide_type).collect();

        assert_eq!(
            types,
            vec![
                SlideType::Title,
                SlideType::Content,
                SlideType::Content,
                SlideType::Content,
                SlideType::Section,
                SlideType::Content,
                SlideType::Conclusion,
            ]
        );
        assert_eq!(outline.slides[4].title, "Section 2: Key Analysis");
        assert_eq!(outline.slides[5].title, "Analysis Point 4");
    }

    #[test]
    fn test_fallback_splits_long_items() {
        let long = format!("{}, {}", "a".repeat(100), "b".repeat(80));
        let text = format!("{}\n\nSecond paragraph\n\nThird paragraph", long);
        let outline = FallbackOutliner.analyze(&text, "");
        let content = &outline.slides[1].content;

        assert_eq!(content[0], format!("{} - Key insight", "a".repeat(100)));
        assert_eq!(content[1], format!("Details: {}", "b".repeat(80)));
    }

    #[test]
    fn test_parse_outline_with_surrounding_prose() {
        let response = r#"Here is your outline:
            {"title": "Q3 Review", "slides": [
                {"title": "Intro", "slide_type": "title", "content": ["Welcome"]},
                {"title": "Numbers", "content": ["Revenue up"], "emphasis_points": ["+20%"]}
            ]}
            Let me know if you need changes."#;

        let outline = parse_outline(response).unwrap();
        assert_eq!(outline.title, "Q3 Review");
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.slides[1].slide_type, SlideType::Content);
        assert_eq!(outline.slides[1].emphasis_points, vec!["+20%"]);
    }

    #[test]
    fn test_parse_outline_errors() {
        assert!(matches!(
            parse_outline("no json here"),
            Err(Error::ExternalService(_))
        ));
        assert!(matches!(
            parse_outline("} backwards {"),
            Err(Error::ExternalService(_))
        ));
        assert!(parse_outline("{not: valid}").is_err());
    }

    #[test]
    fn test_json_outliner_falls_back() {
        let outline = JsonOutliner::new("garbage").analyze(SAMPLE, "formal");
        assert_eq!(outline.title, "Professional Analysis & Insights");

        let outline = JsonOutliner::new(r#"{"title": "Empty", "slides": []}"#).analyze(SAMPLE, "");
        assert_eq!(outline.title, "Professional Analysis & Insights");
    }

    #[test]
    fn test_json_outliner_uses_response() {
        let outline = JsonOutliner::new(r#"{"title": "Plan", "slides": [{"title": "One"}]}"#)
            .analyze("ignored", "");
        assert_eq!(outline.title, "Plan");
        assert_eq!(outline.slides[0].title, "One");
    }

    #[test]
    fn test_slide_text_notes() {
        let notes = SlideTextNotes
            .generate("Title: Growth\nContent: Revenue up; Costs down")
            .unwrap();
        assert_eq!(notes, "Title: Growth Content: Revenue up; Costs down");
        assert!(SlideTextNotes.generate("  \n ").is_err());
    }

    #[test]
    fn test_notes_fallback_on_error() {
        assert_eq!(notes_or_fallback(&FailingNotes, "Title: x"), FALLBACK_NOTES);
        assert_eq!(notes_or_fallback(&SlideTextNotes, "Title: x"), "Title: x");
    }
}
