//! Keyword embedding backends and cosine similarity

use crate::error::{MatcherError, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use ndarray::{Array2, Axis};
use std::path::Path;
use std::time::Instant;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer};

/// Sentence/phrase embedding model shared read-only across requests
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

/// Model2Vec static embeddings
pub struct StaticEmbedder {
    model: StaticModel,
    model_name: String,
}

impl StaticEmbedder {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)
            .map_err(|e| MatcherError::ModelLoading(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());
        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for StaticEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.model.encode(texts))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Pick CUDA or Metal when compiled in and available, else CPU
pub fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA GPU for embeddings");
                return device;
            }
            Err(e) => warn!("CUDA initialization failed: {}", e),
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU for embeddings");
                return device;
            }
            Err(e) => warn!("Metal initialization failed: {}", e),
        }
    }

    debug!("Using CPU for embeddings");
    Device::Cpu
}

/// Sentence-transformers BERT encoder with attention-masked mean pooling
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_name: String,
}

impl BertEmbedder {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading BERT embedding model from: {}", model_path.display());

        let device = select_device();

        let config_content = std::fs::read_to_string(model_path.join("config.json"))?;
        let config: BertConfig = serde_json::from_str(&config_content)?;

        let mut tokenizer = Tokenizer::from_file(model_path.join("tokenizer.json"))
            .map_err(|e| MatcherError::ModelLoading(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        let weights_path = model_path.join("model.safetensors");
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb, &config)?;

        info!("Model loaded in {:.2?}", start_time.elapsed());
        Ok(Self {
            model,
            tokenizer,
            device,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for BertEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| MatcherError::Embedding(format!("Tokenization failed: {}", e)))?;

        let ids = encodings
            .iter()
            .map(|enc| Tensor::new(enc.get_ids(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|enc| Tensor::new(enc.get_attention_mask(), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // (batch, seq, 1) so padding positions drop out of the mean
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?;

        Ok(pooled.to_vec2::<f32>()?)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Deterministic character n-gram hashing embedder.
///
/// Needs no model files. Strings sharing words or trigrams land close
/// together, so it stands in for a real model offline and in tests.
pub struct HashingEmbedder {
    dim: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dim: 256 }
    }
}

impl HashingEmbedder {
    pub const MODEL_NAME: &'static str = "hashing";

    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn fnv1a(bytes: &[u8]) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = Self::fnv1a(feature.as_bytes());
        let index = (hash % self.dim as u64) as usize;
        let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dim];

        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            self.add_feature(&mut vector, &format!("w:{}", word), 2.0);

            let padded: Vec<char> = format!("<{}>", word).chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut vector, &format!("g:{}", gram), 1.0);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn model_name(&self) -> &str {
        Self::MODEL_NAME
    }
}

/// Cosine similarity of two vectors, 0 when either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Stack vectors as rows and scale each row to unit length
fn unit_rows(vectors: &[Vec<f32>], dim: usize) -> Result<Array2<f32>> {
    let mut flat = Vec::with_capacity(vectors.len() * dim);
    for vector in vectors {
        if vector.len() != dim {
            return Err(MatcherError::Embedding(format!(
                "Embedding dimensions don't match: {} vs {}",
                vector.len(),
                dim
            )));
        }
        flat.extend_from_slice(vector);
    }

    let mut matrix = Array2::from_shape_vec((vectors.len(), dim), flat)
        .map_err(|e| MatcherError::Embedding(format!("Invalid embedding matrix: {}", e)))?;

    for mut row in matrix.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|x| x / norm);
        }
    }
    Ok(matrix)
}

/// Pairwise cosine similarities, shape `rows.len() x cols.len()`
pub fn cosine_matrix(rows: &[Vec<f32>], cols: &[Vec<f32>]) -> Result<Array2<f32>> {
    let dim = match rows.first().or_else(|| cols.first()) {
        Some(first) => first.len(),
        None => return Ok(Array2::zeros((0, 0))),
    };

    let a = unit_rows(rows, dim)?;
    let b = unit_rows(cols, dim)?;
    Ok(a.dot(&b.t()))
}
