//! Blended semantic + overlap similarity score

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::embeddings::{cosine_matrix, Embedder};
use crate::processing::keywords::KeywordSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Mean over job keywords of the best cosine match in the resume
    pub semantic_score: f32,
    /// Share of job keywords present verbatim in the resume
    pub keyword_overlap: f32,
    /// Weighted blend before clamping, can exceed 100 with default weights
    pub raw_score: f32,
    pub final_score: f32,
}

impl ScoreBreakdown {
    pub fn zero() -> Self {
        Self {
            semantic_score: 0.0,
            keyword_overlap: 0.0,
            raw_score: 0.0,
            final_score: 0.0,
        }
    }
}

/// `(semantic_weight * semantic + overlap_weight * overlap) * 100`, clamped to `[0, max_score]`
pub fn blend(semantic_score: f32, keyword_overlap: f32, scoring: &ScoringConfig) -> ScoreBreakdown {
    let raw_score =
        (scoring.semantic_weight * semantic_score + scoring.overlap_weight * keyword_overlap) * 100.0;

    ScoreBreakdown {
        semantic_score,
        keyword_overlap,
        raw_score,
        final_score: raw_score.clamp(0.0, scoring.max_score),
    }
}

pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
    scoring: ScoringConfig,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>, scoring: ScoringConfig) -> Self {
        Self { embedder, scoring }
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn score(&self, job: &KeywordSet, resume: &KeywordSet) -> Result<ScoreBreakdown> {
        if job.is_empty() {
            debug!("Job description has no keywords, score is 0");
            return Ok(ScoreBreakdown::zero());
        }

        let job_len = job.len() as f32;
        let keyword_overlap = job.intersection_count(resume) as f32 / job_len;
        let semantic_score = if resume.is_empty() {
            0.0
        } else {
            self.semantic_score(job, resume)?
        };

        let breakdown = blend(semantic_score, keyword_overlap, &self.scoring);
        debug!(
            "semantic={:.4} overlap={:.4} raw={:.2} final={:.2}",
            breakdown.semantic_score, breakdown.keyword_overlap, breakdown.raw_score, breakdown.final_score
        );
        Ok(breakdown)
    }

    fn semantic_score(&self, job: &KeywordSet, resume: &KeywordSet) -> Result<f32> {
        let job_embeddings = self.embedder.embed(&job.to_vec())?;
        let resume_embeddings = self.embedder.embed(&resume.to_vec())?;

        let similarity = cosine_matrix(&job_embeddings, &resume_embeddings)?;

        let best_total: f32 = similarity
            .rows()
            .into_iter()
            .map(|row| row.iter().copied().fold(f32::NEG_INFINITY, f32::max))
            .sum();

        Ok(best_total / job.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;

    fn scorer() -> SimilarityScorer {
        SimilarityScorer::new(Arc::new(HashingEmbedder::default()), ScoringConfig::default())
    }

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().collect()
    }

    #[test]
    fn test_mid_range_keeps_unnormalized_weights() {
        // 0.9 * 0.5 + 0.2 * 0.5 = 0.55, a normalized blend would give 50
        let breakdown = blend(0.5, 0.5, &ScoringConfig::default());
        assert!((breakdown.final_score - 55.0).abs() < 1e-4);
        assert_eq!(breakdown.final_score, breakdown.raw_score);
    }

    #[test]
    fn test_clamped_at_max() {
        let breakdown = blend(1.0, 1.0, &ScoringConfig::default());
        assert!((breakdown.raw_score - 110.0).abs() < 1e-4);
        assert_eq!(breakdown.final_score, 100.0);
    }

    #[test]
    fn test_clamped_at_zero() {
        let breakdown = blend(-0.5, 0.0, &ScoringConfig::default());
        assert_eq!(breakdown.final_score, 0.0);
    }

    #[test]
    fn test_identical_sets_score_100() {
        let keywords = set(&["python", "sql", "data pipelines"]);
        let breakdown = scorer().score(&keywords, &keywords).unwrap();

        assert_eq!(breakdown.keyword_overlap, 1.0);
        assert!(breakdown.semantic_score > 0.999);
        assert_eq!(breakdown.final_score, 100.0);
    }

    #[test]
    fn test_empty_job_scores_zero() {
        let breakdown = scorer().score(&KeywordSet::default(), &set(&["python"])).unwrap();
        assert_eq!(breakdown, ScoreBreakdown::zero());
    }

    #[test]
    fn test_empty_resume_has_no_overlap() {
        let breakdown = scorer().score(&set(&["python", "sql"]), &KeywordSet::default()).unwrap();
        assert_eq!(breakdown.keyword_overlap, 0.0);
        assert_eq!(breakdown.semantic_score, 0.0);
        assert_eq!(breakdown.final_score, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let breakdown = scorer()
            .score(&set(&["python", "sql", "docker", "aws"]), &set(&["python", "sql"]))
            .unwrap();

        assert!((breakdown.keyword_overlap - 0.5).abs() < 1e-6);
        assert!(breakdown.final_score >= 0.0 && breakdown.final_score <= 100.0);
    }
}
