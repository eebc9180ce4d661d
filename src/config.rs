//! Configuration management for the resume matcher

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

/// Weights of the blended score.
///
/// The defaults reproduce the historical formula
/// `(0.9 * semantic + 0.2 * overlap) * 100` capped at 100. The weights sum to
/// 1.1, so the cap is reachable and mid-range scores run slightly high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f32,
    pub overlap_weight: f32,
    pub max_score: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// TOML file replacing the built-in skill vocabularies
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.9,
            overlap_weight: 0.2,
            max_score: 100.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-matcher")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            scoring: ScoringConfig::default(),
            vocabulary: VocabularyConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first run
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        if !(s.semantic_weight.is_finite() && s.overlap_weight.is_finite() && s.max_score.is_finite()) {
            return Err(MatcherError::Configuration("Scoring values must be finite".to_string()));
        }
        if s.semantic_weight < 0.0 || s.overlap_weight < 0.0 {
            return Err(MatcherError::Configuration("Scoring weights must not be negative".to_string()));
        }
        if s.max_score <= 0.0 || s.max_score > 100.0 {
            return Err(MatcherError::Configuration(format!(
                "max_score must be in (0, 100], got {}",
                s.max_score
            )));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_weights_match_historical_formula() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.semantic_weight, 0.9);
        assert_eq!(scoring.overlap_weight, 0.2);
        assert_eq!(scoring.max_score, 100.0);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.models.default_embedding_model, "potion-base-8M");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.scoring, config.scoring);
    }

    #[test]
    fn test_vocabulary_section_is_optional() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[models]
models_dir = "/tmp/models"
default_embedding_model = "m2v-base"

[scoring]
semantic_weight = 0.9
overlap_weight = 0.2
max_score = 100.0

[output]
format = "Json"
color_output = false
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.vocabulary.path.is_none());
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = Config::default();
        config.scoring.overlap_weight = -0.1;
        assert!(matches!(config.validate(), Err(MatcherError::Configuration(_))));
    }
}
