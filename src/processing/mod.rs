//! Matching pipeline: keyword extraction, similarity scoring and gap categorization

pub mod text_processor;
pub mod linguistics;
pub mod keywords;
pub mod embeddings;
pub mod embedding_manager;
pub mod scorer;
pub mod categorizer;
pub mod analyzer;

pub use analyzer::{MatchReport, MatchingEngine};
pub use categorizer::{GapCategorizer, SuggestionReport, Vocabulary};
pub use embeddings::{Embedder, HashingEmbedder};
pub use keywords::{KeywordExtractor, KeywordSet};
pub use linguistics::{LinguisticPipeline, RuleBasedPipeline};
pub use scorer::{ScoreBreakdown, SimilarityScorer};
