//! Configuration management for the skill-gap analyzer

use crate::error::{Result, SkillGapError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    pub suggestions: SuggestionConfig,
    pub input: InputConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub default_llm_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub model_type: ModelType,
    pub size_mb: u64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    Embedding,
    LLM,
}

/// Weights and thresholds used by the gap analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the skill match percentage in the fit score
    pub skill_weight: f64,
    /// Weight of whole-document similarity in the fit score
    pub similarity_weight: f64,
    /// Similarity a resume skill must exceed to count as a semantic match
    pub semantic_threshold: f32,
}

/// Per-priority caps for improvement suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub max_high: usize,
    pub max_medium: usize,
    pub max_low: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub min_resume_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub enabled: bool,
    pub max_tokens: usize,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_weight: 0.7,
            similarity_weight: 0.3,
            semantic_threshold: 0.8,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_high: 5,
            max_medium: 3,
            max_low: 2,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { min_resume_chars: 50 }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-gap")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
                default_llm_model: "phi-3-mini".to_string(),
                available_models: vec![
                    // Model2Vec embedding models
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        model_type: ModelType::Embedding,
                        size_mb: 33,
                        description: "Compact Model2Vec embeddings, recommended default".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        model_type: ModelType::Embedding,
                        size_mb: 90,
                        description: "Fast Model2Vec base embeddings model".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-large".to_string(),
                        repo_id: "minishlab/M2V_large_output".to_string(),
                        model_type: ModelType::Embedding,
                        size_mb: 250,
                        description: "High-quality Model2Vec large embeddings model".to_string(),
                    },
                    // LLM models
                    AvailableModel {
                        name: "phi-3-mini".to_string(),
                        repo_id: "microsoft/Phi-3-mini-4k-instruct".to_string(),
                        model_type: ModelType::LLM,
                        size_mb: 2300,
                        description: "Small instruction-tuned model for suggestion prose".to_string(),
                    },
                ],
            },
            scoring: ScoringConfig::default(),
            suggestions: SuggestionConfig::default(),
            input: InputConfig::default(),
            llm: LlmConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillGapError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-gap")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("skill_weight", self.scoring.skill_weight),
            ("similarity_weight", self.scoring.similarity_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(SkillGapError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, weight
                )));
            }
        }

        let weights = self.scoring.skill_weight + self.scoring.similarity_weight;
        if (weights - 1.0).abs() > 1e-6 {
            return Err(SkillGapError::Configuration(format!(
                "scoring weights must sum to 1.0, got {:.3}",
                weights
            )));
        }
        if !(0.0..=1.0).contains(&self.scoring.semantic_threshold) {
            return Err(SkillGapError::Configuration(format!(
                "semantic_threshold must be within [0, 1], got {}",
                self.scoring.semantic_threshold
            )));
        }
        Ok(())
    }
}
