//! Missing-keyword categorization against static skill vocabularies

use crate::config::VocabularyConfig;
use crate::error::{MatcherError, Result};
use crate::processing::keywords::KeywordSet;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_VOCABULARY: &str = include_str!("../../data/vocabulary.toml");

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    technical_skills: Vec<String>,
    #[serde(default)]
    soft_skills: Vec<String>,
    #[serde(default)]
    tools: Vec<String>,
}

/// Three lower-cased term sets, immutable once loaded
#[derive(Debug, Clone)]
pub struct Vocabulary {
    technical_skills: HashSet<String>,
    soft_skills: HashSet<String>,
    tools: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Technical,
    Soft,
    Tool,
    Other,
}

impl Vocabulary {
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_VOCABULARY)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: VocabularyFile = toml::from_str(content)
            .map_err(|e| MatcherError::Vocabulary(format!("Failed to parse vocabulary: {}", e)))?;

        let normalize = |terms: Vec<String>| -> HashSet<String> {
            terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        };

        Ok(Self {
            technical_skills: normalize(file.technical_skills),
            soft_skills: normalize(file.soft_skills),
            tools: normalize(file.tools),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MatcherError::Vocabulary(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// The configured override file, or the built-in vocabulary
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        match &config.path {
            Some(path) => {
                info!("Loading vocabulary from {}", path.display());
                Self::from_file(path)
            }
            None => Self::builtin(),
        }
    }

    /// Exact membership; technical wins over soft, soft over tools
    pub fn classify(&self, term: &str) -> Category {
        let term = term.to_lowercase();
        if self.technical_skills.contains(&term) {
            Category::Technical
        } else if self.soft_skills.contains(&term) {
            Category::Soft
        } else if self.tools.contains(&term) {
            Category::Tool
        } else {
            Category::Other
        }
    }

    pub fn term_count(&self) -> usize {
        self.technical_skills.len() + self.soft_skills.len() + self.tools.len()
    }
}

/// Missing job keywords split four ways; every missing keyword is in exactly one list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionReport {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub tools: Vec<String>,
    pub other_keywords: Vec<String>,
}

impl SuggestionReport {
    pub fn total(&self) -> usize {
        self.technical_skills.len() + self.soft_skills.len() + self.tools.len() + self.other_keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub struct GapCategorizer {
    vocabulary: Vocabulary,
}

impl GapCategorizer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn categorize(&self, job: &KeywordSet, resume: &KeywordSet) -> SuggestionReport {
        let mut report = SuggestionReport::default();

        // KeywordSet is already lower-cased and sorted
        for keyword in job.difference(resume) {
            match self.vocabulary.classify(&keyword) {
                Category::Technical => report.technical_skills.push(keyword),
                Category::Soft => report.soft_skills.push(keyword),
                Category::Tool => report.tools.push(keyword),
                Category::Other => report.other_keywords.push(keyword),
            }
        }

        debug!(
            "Missing keywords: {} technical, {} soft, {} tools, {} other",
            report.technical_skills.len(),
            report.soft_skills.len(),
            report.tools.len(),
            report.other_keywords.len()
        );
        report
    }
}
