//! Matching engine tying keyword extraction, scoring and gap categorization together

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::categorizer::{GapCategorizer, SuggestionReport, Vocabulary};
use crate::processing::embeddings::Embedder;
use crate::processing::keywords::{KeywordExtractor, KeywordSet};
use crate::processing::linguistics::LinguisticPipeline;
use crate::processing::scorer::{ScoreBreakdown, SimilarityScorer};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Everything one matching request produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Final score in [0, 100]
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub suggestions: SuggestionReport,
    /// Job keywords found verbatim in the resume
    pub matched_keywords: Vec<String>,
    pub job_keyword_count: usize,
    pub resume_keyword_count: usize,
    pub embedding_model: String,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// Services are built once by the caller and injected here
pub struct MatchingEngine {
    extractor: KeywordExtractor,
    scorer: SimilarityScorer,
    categorizer: GapCategorizer,
}

impl MatchingEngine {
    pub fn new(
        pipeline: Arc<dyn LinguisticPipeline>,
        embedder: Arc<dyn Embedder>,
        vocabulary: Vocabulary,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            extractor: KeywordExtractor::new(pipeline),
            scorer: SimilarityScorer::new(embedder, scoring),
            categorizer: GapCategorizer::new(vocabulary),
        }
    }

    pub fn extract_keywords(&self, text: &str) -> KeywordSet {
        self.extractor.extract(text)
    }

    pub fn score(&self, job_description: &str, resume_text: &str) -> Result<f32> {
        let job = self.extract_keywords(job_description);
        let resume = self.extract_keywords(resume_text);
        Ok(self.scorer.score(&job, &resume)?.final_score)
    }

    pub fn categorize(&self, job_description: &str, resume_text: &str) -> SuggestionReport {
        let job = self.extract_keywords(job_description);
        let resume = self.extract_keywords(resume_text);
        self.categorizer.categorize(&job, &resume)
    }

    /// Score and categorize, extracting each keyword set once
    pub fn analyze(&self, job_description: &str, resume_text: &str) -> Result<MatchReport> {
        let start_time = Instant::now();

        let job = self.extract_keywords(job_description);
        let resume = self.extract_keywords(resume_text);
        info!(
            "Extracted {} job keywords and {} resume keywords",
            job.len(),
            resume.len()
        );

        let breakdown = self.scorer.score(&job, &resume)?;
        let suggestions = self.categorizer.categorize(&job, &resume);

        let report = MatchReport {
            score: breakdown.final_score,
            breakdown,
            suggestions,
            matched_keywords: job.intersection(&resume),
            job_keyword_count: job.len(),
            resume_keyword_count: resume.len(),
            embedding_model: self.scorer.embedder().model_name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        };

        info!("Match score: {:.1}", report.score);
        Ok(report)
    }
}
