//! Model catalog and Hugging Face downloads into the local models directory

use crate::config::{AvailableModel, Config, ModelType};
use crate::error::{Result, SkillGapError};
use hf_hub::api::tokio::Api;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files fetched for every model; absent optional ones are skipped
const EMBEDDING_FILES: &[(&str, bool)] = &[
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
];

const LLM_FILES: &[(&str, bool)] = &[
    ("config.json", true),
    ("tokenizer.json", true),
    ("tokenizer_config.json", false),
    ("generation_config.json", false),
];

pub struct ModelStore {
    models_dir: PathBuf,
    catalog: Vec<AvailableModel>,
}

impl ModelStore {
    pub fn new(models_dir: PathBuf, catalog: Vec<AvailableModel>) -> Self {
        Self { models_dir, catalog }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.models.models_dir.clone(), config.models.available_models.clone())
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn list(&self) -> &[AvailableModel] {
        &self.catalog
    }

    /// Find a catalog entry by name or repository id
    pub fn resolve(&self, name: &str) -> Option<&AvailableModel> {
        self.catalog
            .iter()
            .find(|m| m.name == name || m.repo_id == name || m.name.eq_ignore_ascii_case(name))
    }

    pub fn model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name)
    }

    /// Whether the model directory holds the files its loader needs
    pub fn is_downloaded(&self, name: &str) -> bool {
        let Some(model) = self.resolve(name) else {
            return false;
        };
        let dir = self.model_path(&model.name);

        match model.model_type {
            ModelType::Embedding => {
                dir.join("tokenizer.json").exists() && dir.join("model.safetensors").exists()
            }
            ModelType::LLM => {
                dir.join("config.json").exists()
                    && dir.join("tokenizer.json").exists()
                    && (dir.join("model.safetensors").exists()
                        || dir.join("model.safetensors.index.json").exists())
            }
        }
    }

    pub async fn download(&self, name: &str, force: bool) -> Result<PathBuf> {
        let model = self
            .resolve(name)
            .ok_or_else(|| SkillGapError::ModelNotFound(name.to_string()))?
            .clone();
        let model_dir = self.model_path(&model.name);

        if !force && self.is_downloaded(&model.name) {
            log::info!("Model '{}' already present at {}", model.name, model_dir.display());
            return Ok(model_dir);
        }

        println!("📥 Downloading model: {} ({} MB)", model.name, model.size_mb);
        println!("📍 Repository: {}", model.repo_id);

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            SkillGapError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let api = Api::new()
            .map_err(|e| SkillGapError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model.repo_id.clone());

        let files = match model.model_type {
            ModelType::Embedding => EMBEDDING_FILES,
            ModelType::LLM => LLM_FILES,
        };

        for (file, required) in files {
            match repo.get(file).await {
                Ok(cached) => {
                    copy_into(&cached, &model_dir.join(file)).await?;
                    println!("  ✅ Downloaded: {}", file);
                }
                Err(e) if *required => {
                    return Err(SkillGapError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
                Err(e) => log::warn!("Optional file {} not found: {}", file, e),
            }
        }

        if model.model_type == ModelType::LLM {
            download_llm_weights(&repo, &model_dir).await?;
        }

        println!("✅ Model {} downloaded successfully!", model.name);
        Ok(model_dir)
    }

    pub async fn remove(&self, name: &str) -> Result<PathBuf> {
        let model = self
            .resolve(name)
            .ok_or_else(|| SkillGapError::ModelNotFound(name.to_string()))?;
        let model_dir = self.model_path(&model.name);

        if !model_dir.exists() {
            return Err(SkillGapError::ModelNotFound(format!(
                "{} is not downloaded",
                model.name
            )));
        }

        fs::remove_dir_all(&model_dir)
            .await
            .map_err(|e| SkillGapError::ModelError(format!("Failed to remove model: {}", e)))?;
        Ok(model_dir)
    }
}

async fn copy_into(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).await.map_err(|e| {
        SkillGapError::ModelError(format!("Failed to copy {}: {}", dest.display(), e))
    })?;
    Ok(())
}

/// Sharded safetensors when an index exists, otherwise a single file
async fn download_llm_weights(repo: &hf_hub::api::tokio::ApiRepo, model_dir: &Path) -> Result<()> {
    match repo.get("model.safetensors.index.json").await {
        Ok(index_path) => {
            let dest_index = model_dir.join("model.safetensors.index.json");
            copy_into(&index_path, &dest_index).await?;

            let index_content = fs::read_to_string(&dest_index).await?;
            let index_json: serde_json::Value = serde_json::from_str(&index_content)?;

            let shard_files: HashSet<String> = index_json
                .get("weight_map")
                .and_then(|v| v.as_object())
                .ok_or_else(|| {
                    SkillGapError::ModelError("Invalid safetensors index: missing weight_map".to_string())
                })?
                .values()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();

            for shard_file in shard_files {
                let shard_path = repo.get(&shard_file).await.map_err(|e| {
                    SkillGapError::ModelError(format!("Failed to download shard {}: {}", shard_file, e))
                })?;
                copy_into(&shard_path, &model_dir.join(&shard_file)).await?;
                println!("  ✅ Downloaded: {}", shard_file);
            }
        }
        Err(_) => {
            let weights = repo.get("model.safetensors").await.map_err(|e| {
                SkillGapError::ModelError(format!("Failed to download model weights: {}", e))
            })?;
            copy_into(&weights, &model_dir.join("model.safetensors")).await?;
            println!("  ✅ Downloaded: model.safetensors");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ModelStore {
        let config = Config::default();
        ModelStore::new(dir.path().to_path_buf(), config.models.available_models)
    }

    #[test]
    fn test_resolve_by_name_and_repo() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert_eq!(store.resolve("potion-base-8M").unwrap().name, "potion-base-8M");
        assert_eq!(store.resolve("minishlab/potion-base-8M").unwrap().name, "potion-base-8M");
        assert_eq!(store.resolve("PHI-3-MINI").unwrap().name, "phi-3-mini");
        assert!(store.resolve("gpt-unknown").is_none());
    }

    #[test]
    fn test_is_downloaded_checks_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        assert!(!store.is_downloaded("potion-base-8M"));

        let dir = store.model_path("potion-base-8M");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tokenizer.json"), "{}").unwrap();
        assert!(!store.is_downloaded("potion-base-8M"));

        std::fs::write(dir.join("model.safetensors"), b"").unwrap();
        assert!(store.is_downloaded("potion-base-8M"));
    }

    #[tokio::test]
    async fn test_remove_model() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert!(matches!(
            store.remove("m2v-base").await,
            Err(SkillGapError::ModelNotFound(_))
        ));

        let dir = store.model_path("m2v-base");
        std::fs::create_dir_all(&dir).unwrap();
        let removed = store.remove("m2v-base").await.unwrap();
        assert_eq!(removed, dir);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_download_unknown_model() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        assert!(matches!(
            store.download("not-a-model", false).await,
            Err(SkillGapError::ModelNotFound(_))
        ));
    }
}
