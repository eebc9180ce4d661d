//! Keyword and phrase extraction

use crate::processing::linguistics::LinguisticPipeline;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Lower-cased, trimmed keywords and noun phrases of one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: BTreeSet<String>,
}

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    /// Keywords in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keywords.iter().cloned().collect()
    }

    pub fn intersection_count(&self, other: &KeywordSet) -> usize {
        self.keywords.intersection(&other.keywords).count()
    }

    pub fn intersection(&self, other: &KeywordSet) -> Vec<String> {
        self.keywords.intersection(&other.keywords).cloned().collect()
    }

    /// Keywords of `self` absent from `other`
    pub fn difference(&self, other: &KeywordSet) -> Vec<String> {
        self.keywords.difference(&other.keywords).cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let keywords = iter
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }
}

pub struct KeywordExtractor {
    processor: TextProcessor,
    pipeline: Arc<dyn LinguisticPipeline>,
}

impl KeywordExtractor {
    pub fn new(pipeline: Arc<dyn LinguisticPipeline>) -> Self {
        Self {
            processor: TextProcessor::new(),
            pipeline,
        }
    }

    /// Noun chunks plus every non-stopword token holding an alphanumeric character
    pub fn extract(&self, text: &str) -> KeywordSet {
        let prepared = self.processor.prepare(text);
        if prepared.trim().is_empty() {
            return KeywordSet::default();
        }

        let parsed = self.pipeline.parse(&prepared);

        let tokens = parsed
            .tokens
            .iter()
            .filter(|t| !t.is_stop && t.text.chars().any(char::is_alphanumeric))
            .map(|t| t.text.as_str());

        let keywords: KeywordSet = parsed
            .noun_chunks
            .iter()
            .map(String::as_str)
            .chain(tokens)
            .collect();

        debug!(
            "Extracted {} keywords ({} noun chunks) with {}",
            keywords.len(),
            parsed.noun_chunks.len(),
            self.pipeline.name()
        );
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::linguistics::RuleBasedPipeline;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(RuleBasedPipeline::new()))
    }

    #[test]
    fn test_extracts_chunks_and_tokens() {
        let keywords =
            extractor().extract("Looking for a Python developer with strong communication skills");

        for expected in [
            "a python developer",
            "strong communication skills",
            "python",
            "developer",
            "communication",
            "skills",
            "looking",
        ] {
            assert!(keywords.contains(expected), "missing {}", expected);
        }
        assert!(!keywords.contains("with"));
        assert!(!keywords.contains("for"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract(" , ; ,").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let keywords = extractor().extract("Rust, rust, RUST");
        assert_eq!(keywords.iter().filter(|k| *k == "rust").count(), 1);
    }

    #[test]
    fn test_deterministic() {
        let text = "Senior Backend Engineer: Kubernetes, Terraform, and on-call experience.";
        assert_eq!(extractor().extract(text), extractor().extract(text));
    }

    #[test]
    fn test_set_operations() {
        let job: KeywordSet = ["python", "sql", "docker"].into_iter().collect();
        let resume: KeywordSet = ["Python", " docker "].into_iter().collect();

        assert_eq!(job.intersection_count(&resume), 2);
        assert_eq!(job.difference(&resume), vec!["sql"]);
    }
}
