//! skill-gap: resume vs job description skill-gap analyzer

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use skill_gap::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use skill_gap::config::{Config, ModelType, OutputFormat};
use skill_gap::error::{Result, SkillGapError};
use skill_gap::input::{validate_inputs, InputManager};
use skill_gap::llm::{
    CandleGenerator, ChatContext, ChatMessage, ChatRole, GenerationConfig, SuggestionEnhancer, TextGenerator,
};
use skill_gap::output::{save_report_to_file, suggest_filename, AnalysisReport, ReportGenerator, ReportMetadata};
use skill_gap::processing::analyzer::GapAnalyzer;
use skill_gap::processing::embeddings::{CachedEmbedder, EmbeddingProvider, HashingEmbedder, Model2VecProvider};
use skill_gap::processing::model_store::ModelStore;
use skill_gap::processing::vocabulary::{self, SkillCategory};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

const INLINE_SOURCE: &str = "inline text";

struct AnalyzeOptions {
    resume: Option<PathBuf>,
    resume_text: Option<String>,
    job: Option<PathBuf>,
    job_text: Option<String>,
    output: Option<String>,
    save: Option<PathBuf>,
    detailed: bool,
    llm: Option<String>,
    no_llm: bool,
    embedding: Option<String>,
    offline: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            resume_text,
            job,
            job_text,
            output,
            save,
            detailed,
            llm,
            no_llm,
            embedding,
            offline,
        } => {
            let options = AnalyzeOptions {
                resume,
                resume_text,
                job,
                job_text,
                output,
                save,
                detailed,
                llm,
                no_llm,
                embedding,
                offline,
            };
            run_analyze(options, config).await
        }

        Commands::Vocab { category } => print_vocabulary(category.as_deref()),

        Commands::Roadmap {
            skill,
            current,
            target,
            timeframe,
            llm,
        } => {
            println!("🗺️  Building learning roadmap for {}", skill);
            let generator = if config.llm.enabled {
                let config = config.clone();
                tokio::task::spawn_blocking(move || load_generator(&config, llm))
                    .await
                    .map_err(|e| SkillGapError::LlmInference(format!("Model loading task failed: {}", e)))?
            } else {
                None
            };

            let enhancer = SuggestionEnhancer::new(generator);
            let roadmap = tokio::task::spawn_blocking(move || {
                enhancer.learning_roadmap(&skill, &current, &target, &timeframe)
            })
            .await
            .map_err(|e| SkillGapError::LlmInference(format!("Roadmap task failed: {}", e)))?;

            println!("\n{}", roadmap.roadmap);
            println!("\n⏱️  Timeframe: {}", roadmap.timeframe);
            Ok(())
        }

        Commands::Chat {
            message,
            context,
            job_title,
            history,
            llm,
        } => run_chat(message, context, job_title, history, llm, config).await,

        Commands::Models { action } => run_models(action, &config).await,

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", rendered);
                Ok(())
            }
            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
                Ok(())
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

async fn run_analyze(options: AnalyzeOptions, config: Config) -> Result<()> {
    let start = Instant::now();

    let output_format = match options.output.as_deref() {
        Some(format) => cli::parse_output_format(format).map_err(SkillGapError::InvalidInput)?,
        None => config.output.format,
    };
    let detailed = options.detailed || config.output.detailed;
    // Machine-readable output goes to stdout untouched
    let announce = output_format == OutputFormat::Console || options.save.is_some();

    if announce {
        println!("🚀 Skill gap analysis");
    }

    let mut input_manager = InputManager::new();
    let (resume_text, resume_source) = read_input(
        &mut input_manager,
        options.resume,
        options.resume_text,
        cli::RESUME_EXTENSIONS,
        "Resume",
    )
    .await?;
    let (job_text, job_source) = read_input(
        &mut input_manager,
        options.job,
        options.job_text,
        cli::JOB_EXTENSIONS,
        "Job description",
    )
    .await?;

    if announce {
        println!("📄 Resume: {} ({} characters)", resume_source, resume_text.chars().count());
        println!("💼 Job Description: {} ({} characters)", job_source, job_text.chars().count());
    }

    validate_inputs(&resume_text, &job_text, config.input.min_resume_chars)?;

    let provider = {
        let config = config.clone();
        let embedding = options.embedding;
        let offline = options.offline;
        tokio::task::spawn_blocking(move || load_embedding_provider(&config, embedding, offline))
            .await
            .map_err(|e| SkillGapError::Embedding(format!("Model loading task failed: {}", e)))?
    };
    if announce {
        println!("🧠 Embedding backend: {}", provider.name());
    }

    let analyzer = GapAnalyzer::from_config(provider, &config);
    let backend = analyzer.backend_name().to_string();

    let spinner = spinner("Analyzing skills...");
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&resume_text, &job_text))
        .await
        .map_err(|e| SkillGapError::AnalysisFailed(format!("Analysis task failed: {}", e)))?;
    spinner.finish_and_clear();

    let use_llm = !options.no_llm && config.llm.enabled;
    let generator = if use_llm {
        let config = config.clone();
        let llm = options.llm;
        tokio::task::spawn_blocking(move || load_generator(&config, llm))
            .await
            .map_err(|e| SkillGapError::LlmInference(format!("Model loading task failed: {}", e)))?
    } else {
        if announce {
            println!("⚠️  LLM suggestions disabled");
        }
        None
    };
    let enhancer = SuggestionEnhancer::new(generator);
    let llm_model = enhancer.generator_name().map(str::to_string);
    let spinner = spinner("Preparing suggestions...");
    let result = tokio::task::spawn_blocking(move || {
        let mut result = result;
        enhancer.enhance(&mut result);
        result
    })
    .await
    .map_err(|e| SkillGapError::LlmInference(format!("Suggestion task failed: {}", e)))?;
    spinner.finish_and_clear();

    let metadata = ReportMetadata::new(backend, resume_source.clone(), job_source)
        .with_llm_model(llm_model)
        .with_processing_time(start.elapsed().as_millis() as u64);
    let report = AnalysisReport::new(result, metadata);

    let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
    let content = generator.generate_report(&report, &output_format)?;
    println!("{}", content);

    if let Some(save_path) = options.save {
        let target = if save_path.is_dir() {
            save_path.join(suggest_filename(&output_format, &resume_source, true))
        } else {
            save_path
        };
        let plain = ReportGenerator::with_options(false, detailed, true, true);
        let file_content = plain.generate_report(&report, &output_format)?;
        save_report_to_file(&file_content, &target)?;
        println!("💾 Report saved to {}", target.display());
    }

    info!("Analysis finished in {}ms", start.elapsed().as_millis());
    Ok(())
}

/// Inline text wins; otherwise the file is checked and extracted
async fn read_input(
    manager: &mut InputManager,
    path: Option<PathBuf>,
    text: Option<String>,
    allowed_extensions: &[&str],
    label: &str,
) -> Result<(String, String)> {
    if let Some(text) = text {
        return Ok((text, INLINE_SOURCE.to_string()));
    }

    let path = path.ok_or_else(|| SkillGapError::InvalidInput(format!("{} is required", label)))?;
    cli::validate_file_extension(&path, allowed_extensions)
        .map_err(|e| SkillGapError::InvalidInput(format!("{} file: {}", label, e)))?;

    let text = manager.extract_text(&path).await?;
    Ok((text, path.display().to_string()))
}

/// Downloaded Model2Vec model when available, hashing embedder otherwise
fn load_embedding_provider(config: &Config, embedding: Option<String>, offline: bool) -> Arc<dyn EmbeddingProvider> {
    if offline {
        info!("Offline mode: using hashing embedder");
        return Arc::new(HashingEmbedder::default());
    }

    let name = embedding.unwrap_or_else(|| config.models.default_embedding_model.clone());
    let store = ModelStore::from_config(config);

    let Some(model) = store.resolve(&name) else {
        warn!("Unknown embedding model '{}', using hashing embedder", name);
        return Arc::new(HashingEmbedder::default());
    };
    if model.model_type != ModelType::Embedding {
        warn!("'{}' is not an embedding model, using hashing embedder", model.name);
        return Arc::new(HashingEmbedder::default());
    }
    if !store.is_downloaded(&model.name) {
        warn!(
            "Embedding model '{}' is not downloaded (skill-gap models download {}), using hashing embedder",
            model.name, model.name
        );
        return Arc::new(HashingEmbedder::default());
    }

    match Model2VecProvider::load(&store.model_path(&model.name), &model.name) {
        Ok(provider) => Arc::new(CachedEmbedder::new(provider)),
        Err(e) => {
            warn!("Failed to load embedding model '{}': {}; using hashing embedder", model.name, e);
            Arc::new(HashingEmbedder::default())
        }
    }
}

/// Local LLM when downloaded; `None` leaves the enhancer on static text
fn load_generator(config: &Config, llm: Option<String>) -> Option<Arc<dyn TextGenerator>> {
    let name = llm.unwrap_or_else(|| config.models.default_llm_model.clone());
    let store = ModelStore::from_config(config);

    let model = match store.resolve(&name) {
        Some(model) if model.model_type == ModelType::LLM => model,
        Some(model) => {
            warn!("'{}' is not an LLM, using static suggestions", model.name);
            return None;
        }
        None => {
            warn!("Unknown LLM '{}', using static suggestions", name);
            return None;
        }
    };

    if !store.is_downloaded(&model.name) {
        info!(
            "LLM '{}' is not downloaded (skill-gap models download {}), using static suggestions",
            model.name, model.name
        );
        return None;
    }

    match CandleGenerator::load(
        &store.model_path(&model.name),
        &model.name,
        GenerationConfig::from(&config.llm),
    ) {
        Ok(generator) => Some(Arc::new(generator)),
        Err(e) => {
            warn!("Failed to load LLM '{}': {}; using static suggestions", model.name, e);
            None
        }
    }
}

async fn run_chat(
    message: String,
    context_path: Option<PathBuf>,
    job_title: Option<String>,
    history_path: Option<PathBuf>,
    llm: Option<String>,
    config: Config,
) -> Result<()> {
    let context = match context_path {
        Some(path) => {
            let content = tokio::fs::read_to_string(&path).await?;
            let report: AnalysisReport = serde_json::from_str(&content)?;
            Some(ChatContext::from_result(&report.result, job_title))
        }
        None => job_title.map(|title| ChatContext {
            job_title: Some(title),
            ..ChatContext::default()
        }),
    };

    let mut history: Vec<ChatMessage> = match &history_path {
        Some(path) if path.exists() => serde_json::from_str(&tokio::fs::read_to_string(path).await?)?,
        _ => Vec::new(),
    };

    let generator = if config.llm.enabled {
        tokio::task::spawn_blocking(move || load_generator(&config, llm))
            .await
            .map_err(|e| SkillGapError::LlmInference(format!("Model loading task failed: {}", e)))?
    } else {
        None
    };
    let enhancer = SuggestionEnhancer::new(generator);
    if let Some(name) = enhancer.generator_name() {
        info!("Career coach using LLM '{}'", name);
    }

    let spinner = spinner("Thinking...");
    let (answer, history) = tokio::task::spawn_blocking(move || {
        let answer = enhancer.chat(&message, context.as_ref(), &history);
        history.push(ChatMessage::new(ChatRole::User, message));
        history.push(ChatMessage::new(ChatRole::Assistant, answer.clone()));
        (answer, history)
    })
    .await
    .map_err(|e| SkillGapError::LlmInference(format!("Chat task failed: {}", e)))?;
    spinner.finish_and_clear();

    println!("💬 {}", answer);

    if let Some(path) = history_path {
        save_report_to_file(&serde_json::to_string_pretty(&history)?, &path)?;
        println!("💾 Conversation saved to: {}", path.display());
    }

    Ok(())
}

fn print_vocabulary(category: Option<&str>) -> Result<()> {
    let categories = match category {
        Some(label) => vec![SkillCategory::from_label(label).ok_or_else(|| {
            let known: Vec<&str> = SkillCategory::ALL.iter().map(|c| c.label()).collect();
            SkillGapError::InvalidInput(format!("Unknown category: {}. Known: {}", label, known.join(", ")))
        })?],
        None => SkillCategory::ALL.to_vec(),
    };

    println!("📚 Skill vocabulary ({} terms)", vocabulary::terms().len());
    for category in categories {
        let names: Vec<&str> = vocabulary::terms_in(category).map(|t| t.name.as_str()).collect();
        if names.is_empty() {
            continue;
        }
        println!("\n{} ({})", category.label(), names.len());
        println!("  {}", names.join(", "));
    }
    Ok(())
}

async fn run_models(action: ModelAction, config: &Config) -> Result<()> {
    let store = ModelStore::from_config(config);

    match action {
        ModelAction::List { embeddings, llms } => {
            println!("📋 Models ({})\n", store.models_dir().display());
            let show_all = !embeddings && !llms;

            for model in store.list() {
                let wanted = show_all
                    || (embeddings && model.model_type == ModelType::Embedding)
                    || (llms && model.model_type == ModelType::LLM);
                if !wanted {
                    continue;
                }

                let downloaded = store.is_downloaded(&model.name);
                let status = if downloaded { "✅ Downloaded" } else { "⬇️  Available" };
                println!(
                    "  • {} ({:?}, {} MB) [{}]",
                    model.name, model.model_type, model.size_mb, status
                );
                println!("    {}", model.description);
                if !downloaded {
                    println!("    💡 Download: skill-gap models download {}", model.name);
                }
            }
        }

        ModelAction::Download { model, force } => {
            let path = store.download(&model, force).await?;
            println!("📁 Location: {}", path.display());
        }

        ModelAction::Remove { model } => {
            println!("🗑️  Removing model: {}", model);
            let path = store.remove(&model).await?;
            println!("✅ Removed directory: {}", path.display());
        }

        ModelAction::Info { model } => {
            let info = store
                .resolve(&model)
                .ok_or_else(|| SkillGapError::ModelNotFound(model.clone()))?;
            let downloaded = store.is_downloaded(&info.name);

            println!("📋 Model Information for '{}'\n", info.name);
            println!("Repository: {}", info.repo_id);
            println!("Type: {:?}", info.model_type);
            println!("Size: {} MB", info.size_mb);
            println!("Description: {}", info.description);
            println!(
                "Status: {}",
                if downloaded { "✅ Downloaded" } else { "⬇️  Available for download" }
            );
            if downloaded {
                println!("Location: {}", store.model_path(&info.name).display());
            }
        }
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}
