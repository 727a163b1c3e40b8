//! Cosine similarity over an injected embedding provider

use crate::processing::embeddings::EmbeddingProvider;
use std::sync::Arc;

/// Scores two strings in [0, 1]. Backend failures degrade to 0.0.
#[derive(Clone)]
pub struct SimilarityScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl SimilarityScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    pub fn backend_name(&self) -> &str {
        self.provider.name()
    }

    /// Embedding for `text`, or `None` if the backend failed
    pub fn encode(&self, text: &str) -> Option<Vec<f32>> {
        match self.provider.encode(text) {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                log::warn!("Embedding backend '{}' failed: {}", self.provider.name(), e);
                None
            }
        }
    }

    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }

        match (self.encode(a), self.encode(b)) {
            (Some(ea), Some(eb)) => cosine_similarity(&ea, &eb).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Similarity against an already-encoded left-hand side
    pub fn similarity_to(&self, encoded: &[f32], text: &str) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.encode(text)
            .map(|e| cosine_similarity(encoded, &e).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// Raw cosine in [-1, 1]; zero for mismatched dimensions or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        log::warn!("Embedding dimension mismatch: {} vs {}", a.len(), b.len());
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SkillGapError};
    use crate::processing::embeddings::HashingEmbedder;

    struct FailingProvider;

    impl EmbeddingProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SkillGapError::Embedding("backend offline".to_string()))
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let scorer = SimilarityScorer::new(Arc::new(HashingEmbedder::default()));
        assert_eq!(scorer.similarity("", "python"), 0.0);
        assert_eq!(scorer.similarity("python", "  "), 0.0);
    }

    #[test]
    fn test_failing_backend_scores_zero() {
        let scorer = SimilarityScorer::new(Arc::new(FailingProvider));
        assert_eq!(scorer.similarity("python", "python"), 0.0);
        assert!(scorer.encode("python").is_none());
    }

    #[test]
    fn test_identical_text_scores_one() {
        let scorer = SimilarityScorer::new(Arc::new(HashingEmbedder::default()));
        let score = scorer.similarity("Senior Rust engineer", "Senior Rust engineer");
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_score_stays_in_unit_range() {
        let scorer = SimilarityScorer::new(Arc::new(HashingEmbedder::new(8)));
        for (a, b) in [("python", "kubernetes"), ("react", "angular"), ("go", "rust")] {
            let s = scorer.similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{} vs {} scored {}", a, b, s);
        }
    }
}
