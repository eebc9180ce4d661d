//! Text normalization ahead of keyword extraction

use regex::Regex;

pub struct TextProcessor {
    punct_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let punct_regex = Regex::new(r"[^\w\s]").expect("Invalid punctuation regex");
        Self { punct_regex }
    }

    /// Normalize raw text for the linguistic pipeline.
    ///
    /// Commas in postings tend to separate requirement phrases, so the text is
    /// split on them first; each segment is trimmed and stripped of anything
    /// that is neither a word character nor whitespace, then the segments are
    /// rejoined with single spaces and lower-cased.
    pub fn prepare(&self, text: &str) -> String {
        let cleaned: Vec<String> = text
            .split(',')
            .map(|segment| self.punct_regex.replace_all(segment.trim(), "").into_owned())
            .collect();

        cleaned.join(" ").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_strips_punctuation_and_lowercases() {
        let processor = TextProcessor::new();
        let prepared = processor.prepare("Node.js, C++ ,  REST APIs!");

        assert_eq!(prepared, "nodejs c rest apis");
    }

    #[test]
    fn test_prepare_keeps_word_boundaries_across_commas() {
        let processor = TextProcessor::new();
        let prepared = processor.prepare("python,sql,docker");

        assert_eq!(prepared, "python sql docker");
    }

    #[test]
    fn test_prepare_keeps_underscores_and_digits() {
        let processor = TextProcessor::new();
        assert_eq!(processor.prepare("snake_case 3D/4K"), "snake_case 3d4k");
    }

    #[test]
    fn test_empty_input() {
        let processor = TextProcessor::new();
        assert_eq!(processor.prepare(""), "");
        assert!(processor.prepare(" , ,").trim().is_empty());
    }
}
