//! Local text generation with Candle

use crate::config::LlmConfig;
use crate::error::{Result, SkillGapError};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::phi3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokenizers::Tokenizer;

/// Fixed seed so sampled output is reproducible between runs
const SAMPLING_SEED: u64 = 299_792_458;

/// Something that turns a prompt into text. Implementations block; callers
/// run them on a blocking worker.
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: usize,
    pub temperature: f64,
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            seed: SAMPLING_SEED,
        }
    }
}

impl From<&LlmConfig> for GenerationConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            seed: SAMPLING_SEED,
        }
    }
}

impl GenerationConfig {
    /// `None` selects greedy argmax decoding
    fn sampling_temperature(&self) -> Option<f64> {
        if self.temperature > 0.0 {
            Some(self.temperature)
        } else {
            None
        }
    }
}

/// Get the best available device for inference (GPU if available, CPU fallback)
pub fn get_best_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            log::info!("Using CUDA GPU for generation");
            return device;
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                log::info!("Using Metal GPU for generation");
                return device;
            }
            Err(e) => log::warn!("Metal GPU initialization failed: {}", e),
        }
    }

    Device::Cpu
}

/// Honors `SKILL_GAP_DEVICE=cpu|cuda|metal`, otherwise auto-detects
pub fn get_device_with_override() -> Result<Device> {
    let Ok(preference) = std::env::var("SKILL_GAP_DEVICE") else {
        return Ok(get_best_device());
    };

    match preference.to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" => {
            #[cfg(feature = "cuda")]
            {
                Device::new_cuda(0)
                    .map_err(|e| SkillGapError::ModelError(format!("Failed to initialize CUDA: {}", e)))
            }
            #[cfg(not(feature = "cuda"))]
            {
                Err(SkillGapError::ModelError("CUDA support not compiled in".to_string()))
            }
        }
        "metal" => {
            #[cfg(feature = "metal")]
            {
                Device::new_metal(0)
                    .map_err(|e| SkillGapError::ModelError(format!("Failed to initialize Metal: {}", e)))
            }
            #[cfg(not(feature = "metal"))]
            {
                Err(SkillGapError::ModelError("Metal support not compiled in".to_string()))
            }
        }
        other => {
            log::warn!("Unknown device '{}', falling back to auto-detection", other);
            Ok(get_best_device())
        }
    }
}

/// End-of-sequence ids across the Phi and Llama tokenizer families
fn is_eos_token(token: u32) -> bool {
    matches!(token, 2 | 32000 | 32001 | 32007 | 128001 | 128009 | 199999 | 200020)
}

/// Wrap a prompt in the Phi chat template
pub fn format_chat_prompt(prompt: &str) -> String {
    format!("<|user|>\n{}\n<|end|>\n<|assistant|>\n", prompt.trim())
}

/// Phi-3 family model loaded from a local directory
pub struct CandleGenerator {
    name: String,
    model: Mutex<phi3::Model>,
    tokenizer: Tokenizer,
    device: Device,
    config: GenerationConfig,
}

impl CandleGenerator {
    pub fn load(model_path: &Path, name: &str, config: GenerationConfig) -> Result<Self> {
        if !model_path.exists() {
            return Err(SkillGapError::ModelNotFound(format!(
                "{} (expected at {})",
                name,
                model_path.display()
            )));
        }

        log::info!("Loading LLM model from: {}", model_path.display());
        let device = get_device_with_override()?;

        let tokenizer = Tokenizer::from_file(model_path.join("tokenizer.json"))
            .map_err(|e| SkillGapError::ModelError(format!("Failed to load tokenizer: {}", e)))?;

        let config_content = std::fs::read_to_string(model_path.join("config.json"))
            .map_err(|e| SkillGapError::ModelError(format!("Failed to read model config: {}", e)))?;
        let model_config: phi3::Config = serde_json::from_str(&config_content)
            .map_err(|e| SkillGapError::ModelError(format!("Failed to parse model config: {}", e)))?;

        let weight_files = weight_files(model_path)?;
        log::debug!("Mapping {} safetensors file(s)", weight_files.len());

        // SAFETY: the weight files are not modified while mapped
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&weight_files, DType::F32, &device)? };
        let model = phi3::Model::new(&model_config, vb)?;

        log::info!("LLM model '{}' loaded", name);

        Ok(Self {
            name: name.to_string(),
            model: Mutex::new(model),
            tokenizer,
            device,
            config,
        })
    }

    fn last_position_logits(logits: &Tensor) -> Result<Tensor> {
        let logits = match logits.dims().len() {
            3 => logits.i((0, logits.dims()[1] - 1))?,
            2 => logits.i(logits.dims()[0] - 1)?,
            _ => logits.clone(),
        };
        Ok(logits.to_dtype(DType::F32)?)
    }
}

impl TextGenerator for CandleGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let mut model = self
            .model
            .lock()
            .map_err(|_| SkillGapError::LlmInference("Model lock poisoned".to_string()))?;
        model.clear_kv_cache();

        let formatted = format_chat_prompt(prompt);
        let encoding = self
            .tokenizer
            .encode(formatted.as_str(), true)
            .map_err(|e| SkillGapError::LlmInference(format!("Failed to tokenize input: {}", e)))?;
        let prompt_tokens = encoding.get_ids().to_vec();
        if prompt_tokens.is_empty() {
            return Err(SkillGapError::LlmInference("Prompt produced no tokens".to_string()));
        }

        let mut sampler = LogitsProcessor::new(
            self.config.seed,
            self.config.sampling_temperature(),
            None,
        );

        let input = Tensor::new(prompt_tokens.as_slice(), &self.device)?.unsqueeze(0)?;
        let mut logits = model.forward(&input, 0)?;
        let mut generated = Vec::new();

        for step in 0..self.config.max_tokens {
            let next_token = sampler.sample(&Self::last_position_logits(&logits)?)?;
            if is_eos_token(next_token) {
                break;
            }
            generated.push(next_token);

            let input = Tensor::new(&[next_token], &self.device)?.unsqueeze(0)?;
            logits = model.forward(&input, prompt_tokens.len() + step)?;
        }

        let text = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| SkillGapError::LlmInference(format!("Failed to decode output: {}", e)))?;

        log::debug!(
            "Generated {} tokens in {}ms",
            generated.len(),
            start.elapsed().as_millis()
        );

        Ok(text.trim().to_string())
    }
}

/// Sharded weights listed by the index when present, otherwise the single file
fn weight_files(model_path: &Path) -> Result<Vec<PathBuf>> {
    let index_path = model_path.join("model.safetensors.index.json");
    if index_path.exists() {
        let index_content = std::fs::read_to_string(&index_path)?;
        let index_json: serde_json::Value = serde_json::from_str(&index_content)?;
        let shards: HashSet<&str> = index_json
            .get("weight_map")
            .and_then(|v| v.as_object())
            .ok_or_else(|| {
                SkillGapError::ModelError("Invalid safetensors index: missing weight_map".to_string())
            })?
            .values()
            .filter_map(|v| v.as_str())
            .collect();

        let mut files: Vec<PathBuf> = shards.into_iter().map(|s| model_path.join(s)).collect();
        files.sort();
        if let Some(missing) = files.iter().find(|p| !p.exists()) {
            return Err(SkillGapError::ModelError(format!(
                "Shard file not found: {}",
                missing.display()
            )));
        }
        return Ok(files);
    }

    let single = model_path.join("model.safetensors");
    if single.exists() {
        Ok(vec![single])
    } else {
        Err(SkillGapError::ModelError(format!(
            "No safetensors weights found in {}",
            model_path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_chat_template() {
        let prompt = format_chat_prompt("  List three Rust crates.\n");
        assert_eq!(prompt, "<|user|>\nList three Rust crates.\n<|end|>\n<|assistant|>\n");
    }

    #[test]
    fn test_eos_tokens() {
        assert!(is_eos_token(32007));
        assert!(is_eos_token(199999));
        assert!(!is_eos_token(1000));
    }

    #[test]
    fn test_generation_config_from_llm_config() {
        let llm = LlmConfig {
            enabled: true,
            max_tokens: 64,
            temperature: 0.0,
        };
        let config = GenerationConfig::from(&llm);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.sampling_temperature(), None);
        assert_eq!(GenerationConfig::default().sampling_temperature(), Some(0.7));
    }

    #[test]
    fn test_weight_files_from_index() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(
            dir.join("model.safetensors.index.json"),
            r#"{"weight_map": {"a": "model-00002.safetensors", "b": "model-00001.safetensors", "c": "model-00001.safetensors"}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("model-00001.safetensors"), b"").unwrap();
        assert!(weight_files(dir).is_err());

        std::fs::write(dir.join("model-00002.safetensors"), b"").unwrap();
        let files = weight_files(dir).unwrap();
        assert_eq!(
            files,
            vec![dir.join("model-00001.safetensors"), dir.join("model-00002.safetensors")]
        );
    }

    #[test]
    fn test_load_missing_model() {
        let temp_dir = TempDir::new().unwrap();
        let result = CandleGenerator::load(
            &temp_dir.path().join("phi-3-mini"),
            "phi-3-mini",
            GenerationConfig::default(),
        );
        assert!(matches!(result, Err(SkillGapError::ModelNotFound(_))));
    }
}
