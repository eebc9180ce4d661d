//! Embedding model catalog, downloads from the Hugging Face Hub and loading

use crate::error::{MatcherError, Result};
use crate::processing::embeddings::{BertEmbedder, Embedder, HashingEmbedder, StaticEmbedder};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub backend: EmbeddingBackend,
    pub dimensions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingBackend {
    /// Model2Vec static embeddings
    Static,
    /// sentence-transformers BERT run through candle
    Bert,
    /// Built in, nothing to download
    Hashing,
}

impl EmbeddingBackend {
    fn required_files(&self) -> &'static [&'static str] {
        match self {
            EmbeddingBackend::Static => &["model.safetensors", "tokenizer.json"],
            EmbeddingBackend::Bert => &["model.safetensors", "tokenizer.json", "config.json"],
            EmbeddingBackend::Hashing => &[],
        }
    }

    fn optional_files(&self) -> &'static [&'static str] {
        match self {
            EmbeddingBackend::Static => &["config.json", "README.md"],
            EmbeddingBackend::Bert => &["README.md"],
            EmbeddingBackend::Hashing => &[],
        }
    }
}

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            MatcherError::ModelLoading(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            available_models: Self::catalog(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    fn catalog() -> BTreeMap<String, EmbeddingModelInfo> {
        let mut models = BTreeMap::new();

        models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "Compact Model2Vec static embeddings, the default".to_string(),
                backend: EmbeddingBackend::Static,
                dimensions: 256,
            },
        );
        models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                description: "Legacy Model2Vec base embeddings".to_string(),
                backend: EmbeddingBackend::Static,
                dimensions: 256,
            },
        );
        models.insert(
            "m2v-large".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                description: "Higher capacity Model2Vec embeddings".to_string(),
                backend: EmbeddingBackend::Static,
                dimensions: 512,
            },
        );
        models.insert(
            "paraphrase-MiniLM-L6-v2".to_string(),
            EmbeddingModelInfo {
                name: "Paraphrase MiniLM L6 v2".to_string(),
                repo_id: "sentence-transformers/paraphrase-MiniLM-L6-v2".to_string(),
                size_mb: 91,
                description: "sentence-transformers BERT encoder for short phrases".to_string(),
                backend: EmbeddingBackend::Bert,
                dimensions: 384,
            },
        );
        models.insert(
            HashingEmbedder::MODEL_NAME.to_string(),
            EmbeddingModelInfo {
                name: "Hashing".to_string(),
                repo_id: "builtin/hashing".to_string(),
                size_mb: 0,
                description: "Character n-gram hashing, works offline with no model files".to_string(),
                backend: EmbeddingBackend::Hashing,
                dimensions: 256,
            },
        );

        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut found = HashSet::new();
        for (id, info) in &self.available_models {
            if info.backend == EmbeddingBackend::Hashing
                || Self::has_files(&self.models_dir.join(id), info.backend.required_files()).await
            {
                found.insert(id.clone());
            }
        }
        self.downloaded_models = found;
        Ok(())
    }

    async fn has_files(dir: &Path, files: &[&str]) -> bool {
        for file in files {
            if fs::metadata(dir.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a model into `models_dir/<id>`, re-fetching when `force` is set
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .get_model_info(model_id)
            .cloned()
            .ok_or_else(|| MatcherError::ModelNotFound(model_id.to_string()))?;

        let model_dir = self.models_dir.join(model_id);
        if model_info.backend == EmbeddingBackend::Hashing {
            return Ok(model_dir);
        }
        if !force && self.is_model_downloaded(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| MatcherError::Network(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in model_info.backend.required_files() {
            let cached = repo.get(file).await.map_err(|e| {
                MatcherError::Network(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("Downloaded {}", file);
        }

        for file in model_info.backend.optional_files() {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                    info!("Downloaded {}", file);
                }
                Err(e) => warn!("Optional file {} not found: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        Ok(model_dir)
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id, false).await,
        }
    }

    pub async fn remove_model(&mut self, model_id: &str) -> Result<bool> {
        let model_dir = self.models_dir.join(model_id);
        if fs::metadata(&model_dir).await.is_err() {
            return Ok(false);
        }

        fs::remove_dir_all(&model_dir).await?;
        self.downloaded_models.remove(model_id);
        info!("Removed {}", model_dir.display());
        Ok(true)
    }

    /// Load a downloaded model; never touches the network
    pub fn load_embedder(&self, model_id: &str) -> Result<Arc<dyn Embedder>> {
        let info = self
            .get_model_info(model_id)
            .ok_or_else(|| MatcherError::ModelNotFound(model_id.to_string()))?;

        let path = || {
            self.get_model_path(model_id).ok_or_else(|| {
                MatcherError::ModelNotFound(format!("{} is not downloaded", model_id))
            })
        };

        let embedder: Arc<dyn Embedder> = match info.backend {
            EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(info.dimensions as usize)),
            EmbeddingBackend::Static => Arc::new(StaticEmbedder::load(&path()?, model_id)?),
            EmbeddingBackend::Bert => Arc::new(BertEmbedder::load(&path()?, model_id)?),
        };
        Ok(embedder)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Accepts a model id, a repo id or a display name (case-insensitive)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(id, info)| {
                info.repo_id == input
                    || info.name.to_lowercase() == input_lower
                    || id.to_lowercase() == input_lower
            })
            .map(|(id, _)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.list_available_models().len(), 5);
        assert_eq!(manager.list_downloaded_models(), vec!["hashing"]);
        assert!(!manager.is_model_downloaded("potion-base-8M"));
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("Potion Base 8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("sentence-transformers/paraphrase-MiniLM-L6-v2"),
            Some("paraphrase-MiniLM-L6-v2".to_string())
        );
        assert_eq!(manager.resolve_model_id("gpt-4"), None);
    }

    #[tokio::test]
    async fn test_scan_finds_complete_model_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let model_dir = temp_dir.path().join("m2v-base");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("tokenizer.json"), "{}").unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(!manager.is_model_downloaded("m2v-base"));

        std::fs::write(model_dir.join("model.safetensors"), b"").unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(manager.is_model_downloaded("m2v-base"));
    }

    #[tokio::test]
    async fn test_load_hashing_and_missing_models() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        let embedder = manager.load_embedder("hashing").unwrap();
        assert_eq!(embedder.model_name(), "hashing");

        assert!(matches!(
            manager.load_embedder("potion-base-8M"),
            Err(MatcherError::ModelNotFound(_))
        ));
        assert!(matches!(manager.load_embedder("nope"), Err(MatcherError::ModelNotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_model() {
        let temp_dir = TempDir::new().unwrap();
        let model_dir = temp_dir.path().join("m2v-base");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("tokenizer.json"), "{}").unwrap();
        std::fs::write(model_dir.join("model.safetensors"), b"").unwrap();

        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(manager.remove_model("m2v-base").await.unwrap());
        assert!(!manager.is_model_downloaded("m2v-base"));
        assert!(!model_dir.exists());
        assert!(!manager.remove_model("m2v-base").await.unwrap());
    }
}
