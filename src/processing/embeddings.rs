//! Embedding backends: Model2Vec, deterministic hashing, and a caching wrapper

use crate::error::{Result, SkillGapError};
use model2vec_rs::model::StaticModel;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::RwLock;
use std::time::Instant;

/// Text-to-vector capability shared read-only across analyses
pub trait EmbeddingProvider: Send + Sync {
    /// Short identifier shown in reports
    fn name(&self) -> &str;

    /// Encode one text into a fixed-length vector.
    /// Identical input must give identical output within a process.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;
}

/// Static Model2Vec embeddings loaded from a local model directory
pub struct Model2VecProvider {
    model: StaticModel,
    model_name: String,
}

impl Model2VecProvider {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(SkillGapError::ModelNotFound(format!(
                "{} (expected at {}; run `skill-gap models download {}`)",
                model_name,
                model_path.display(),
                model_name
            )));
        }

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| SkillGapError::Embedding(format!("Failed to load model: {}", e)))?;

        log::info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(SkillGapError::Embedding(format!(
                "{} returned an empty embedding",
                self.model_name
            )));
        }
        Ok(embedding)
    }
}

// Fixed keys: changing them changes every embedding.
const HASH_KEY_0: u64 = 0x0123_4567_89ab_cdef;
const HASH_KEY_1: u64 = 0xfedc_ba98_7654_3210;

/// Feature-hashing embedder over word tokens and character trigrams.
///
/// Needs no model files, so it backs `--offline` runs and tests. Texts that
/// share vocabulary land close together; it carries no semantics beyond that.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, feature: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        feature.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = self.hash(feature);
        let idx = (h % self.dimension as u64) as usize;
        // High bit picks the sign so collisions tend to cancel
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
            .map(|t| t.trim_matches('.'))
            .filter(|t| !t.is_empty())
        {
            self.add_feature(&mut vector, &format!("w:{}", token), 1.0);

            let padded: Vec<char> = format!("<{}>", token).chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut vector, &format!("g:{}", gram), 0.5);
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}

/// Memoizes another provider's embeddings per input text
pub struct CachedEmbedder<P: EmbeddingProvider> {
    inner: P,
    cache: RwLock<HashMap<String, Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(text) {
                return Ok(hit.clone());
            }
        }

        let embedding = self.inner.encode(text)?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(text.to_string(), embedding.clone());
        }

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    #[test]
    fn test_hashing_embedder_is_normalized_and_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.encode("Rust and Kubernetes").unwrap();
        let b = embedder.encode("Rust and Kubernetes").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), HashingEmbedder::DEFAULT_DIMENSION);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "L2 norm should be 1.0, got {}", norm);
    }

    #[test]
    fn test_hashing_embedder_empty_text_is_zero_vector() {
        let v = HashingEmbedder::new(16).encode("   ").unwrap();
        assert_eq!(v, vec![0.0; 16]);
    }

    #[test]
    fn test_cached_embedder_hits_cache() {
        let cached = CachedEmbedder::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });

        cached.encode("python").unwrap();
        cached.encode("python").unwrap();
        cached.encode("docker").unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.cache.read().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_model_dir_is_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Model2VecProvider::load(&dir.path().join("absent"), "potion-base-8M");
        assert!(matches!(result, Err(SkillGapError::ModelNotFound(_))));
    }
}
