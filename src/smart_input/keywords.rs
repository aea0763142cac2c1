//! Section classification strategies
//!
//! Explicit `@section` tags are authoritative. The keyword strategy is a soft
//! fallback that guesses a section from production vocabulary in free text
//! (`record lead vocals` is recording work). Strategies stay separate and are
//! combined with [`LayeredClassifier`].

use super::section_tag;
use crate::sessions::Section;
use once_cell::sync::Lazy;
use regex::Regex;

static OVERRIDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)[@#](idea|writing|recording|production|mixing|mastering|release)\b")
        .expect("valid override regex")
});
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Keywords per section, in pipeline order; ties go to the earlier section
const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (
        Section::Writing,
        &[
            "lyrics", "lyric", "verse", "chorus", "hook", "bridge", "melody", "chords", "write",
            "rewrite",
        ],
    ),
    (
        Section::Recording,
        &[
            "record", "vocals", "vocal", "take", "takes", "mic", "tracking", "overdub", "comp",
        ],
    ),
    (
        Section::Production,
        &[
            "beat",
            "drums",
            "synth",
            "sample",
            "arrange",
            "arrangement",
            "sound design",
            "bass",
            "produce",
        ],
    ),
    (
        Section::Mixing,
        &[
            "mix",
            "eq",
            "reverb",
            "compression",
            "compressor",
            "panning",
            "levels",
            "automation",
            "sidechain",
        ],
    ),
    (
        Section::Mastering,
        &["master", "mastering", "loudness", "limiter", "lufs"],
    ),
    (
        Section::Release,
        &[
            "release",
            "distribute",
            "distribution",
            "artwork",
            "cover",
            "upload",
            "pitch",
            "playlist",
            "promo",
        ],
    ),
];

/// Strategy that picks a section for a piece of task text
pub trait SectionClassifier {
    /// Section the text points at, `None` when it gives no signal
    fn suggest(&self, text: &str) -> Option<Section>;

    /// Like [`suggest`](Self::suggest) but falls back to `idea`
    fn classify(&self, text: &str) -> Section {
        self.suggest(text).unwrap_or_default()
    }
}

/// Uses only explicit `@section` tags, last tag wins
#[derive(Debug, Clone, Copy, Default)]
pub struct TagClassifier;

impl SectionClassifier for TagClassifier {
    fn suggest(&self, text: &str) -> Option<Section> {
        section_tag(text)
    }
}

/// Keyword-bag classifier with an explicit `@section` / `#section` override
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    fn override_tag(text: &str) -> Option<Section> {
        OVERRIDE_RE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse().ok())
            .last()
    }

    /// Whole-word keyword hits per section
    pub fn scores(text: &str) -> Vec<(Section, usize)> {
        let words: Vec<String> = WORD_RE
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect();
        let padded = format!(" {} ", words.join(" "));

        SECTION_KEYWORDS
            .iter()
            .map(|(section, keywords)| {
                let hits: usize = keywords
                    .iter()
                    .map(|keyword| padded.matches(&format!(" {} ", keyword)).count())
                    .sum();
                (*section, hits)
            })
            .collect()
    }
}

impl SectionClassifier for KeywordClassifier {
    fn suggest(&self, text: &str) -> Option<Section> {
        if let Some(section) = Self::override_tag(text) {
            return Some(section);
        }

        let mut best: Option<(Section, usize)> = None;
        for (section, hits) in Self::scores(text) {
            if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
                best = Some((section, hits));
            }
        }
        best.map(|(section, _)| section)
    }
}

/// Asks `primary` first and consults `fallback` only when it has no answer
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredClassifier<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P, F> LayeredClassifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: SectionClassifier, F: SectionClassifier> SectionClassifier for LayeredClassifier<P, F> {
    fn suggest(&self, text: &str) -> Option<Section> {
        self.primary
            .suggest(text)
            .or_else(|| self.fallback.suggest(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_pick_section() {
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.suggest("record lead vocals, three takes"),
            Some(Section::Recording)
        );
        assert_eq!(
            classifier.suggest("Fix the reverb and EQ on drums"),
            Some(Section::Mixing)
        );
        assert_eq!(
            classifier.suggest("try some sound design on the pad"),
            Some(Section::Production)
        );
        assert_eq!(classifier.suggest("call mom"), None);
        assert_eq!(classifier.classify("call mom"), Section::Idea);
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        // "mixtape" is not "mix", "microphone" is not "mic"
        assert_eq!(KeywordClassifier.suggest("mixtape microphone"), None);
    }

    #[test]
    fn test_tie_goes_to_earlier_section() {
        // one writing hit, one mixing hit
        assert_eq!(
            KeywordClassifier.suggest("hook needs reverb"),
            Some(Section::Writing)
        );
    }

    #[test]
    fn test_override_tag_beats_keywords() {
        assert_eq!(
            KeywordClassifier.suggest("record vocals #release"),
            Some(Section::Release)
        );
        assert_eq!(
            KeywordClassifier.suggest("#mixing then @Mastering"),
            Some(Section::Mastering)
        );
    }

    #[test]
    fn test_tag_classifier_ignores_keywords() {
        assert_eq!(TagClassifier.suggest("record vocals"), None);
        assert_eq!(TagClassifier.suggest("record @writing"), Some(Section::Writing));
        assert_eq!(TagClassifier.suggest("#mixing"), None);
    }

    #[test]
    fn test_layered_classifier_prefers_tags() {
        let layered = LayeredClassifier::new(TagClassifier, KeywordClassifier);
        assert_eq!(layered.suggest("mix it @release"), Some(Section::Release));
        assert_eq!(layered.suggest("mix it"), Some(Section::Mixing));
        assert_eq!(layered.suggest("nothing here"), None);
    }
}
