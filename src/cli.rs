//! CLI interface for the skill-gap analyzer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];
pub const JOB_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];

#[derive(Parser)]
#[command(name = "skill-gap")]
#[command(version)]
#[command(about = "Resume vs job description skill-gap analyzer")]
#[command(long_about = "Compare a resume against a job description: matched, missing and weak skills, a profile fit score, and prioritized learning suggestions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "resume_text", required_unless_present = "resume_text")]
        resume: Option<PathBuf>,

        /// Resume given inline
        #[arg(long)]
        resume_text: Option<String>,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include learning paths, resources and full rewrite tips
        #[arg(short, long)]
        detailed: bool,

        /// LLM model used for rewrite tips
        #[arg(short, long)]
        llm: Option<String>,

        /// Skip the LLM and use static rewrite tips
        #[arg(long)]
        no_llm: bool,

        /// Embedding model for semantic matching
        #[arg(short, long)]
        embedding: Option<String>,

        /// Use the built-in hashing embedder instead of a downloaded model
        #[arg(long)]
        offline: bool,
    },

    /// Show the skill vocabulary grouped by category
    Vocab {
        /// Only this category, e.g. "DevOps" or "AI/ML"
        #[arg(long)]
        category: Option<String>,
    },

    /// Generate a learning roadmap for one skill
    Roadmap {
        #[arg(short, long)]
        skill: String,

        #[arg(long, default_value = "beginner")]
        current: String,

        #[arg(long, default_value = "intermediate")]
        target: String,

        #[arg(long, default_value = "8 weeks")]
        timeframe: String,

        /// LLM model to use; static roadmap when absent or not downloaded
        #[arg(short, long)]
        llm: Option<String>,
    },

    /// Ask the career coach a question
    Chat {
        /// The question
        message: String,

        /// JSON report from `analyze --output json --save` used as profile context
        #[arg(long)]
        context: Option<PathBuf>,

        /// Target role, e.g. "Platform Engineer"
        #[arg(long)]
        job_title: Option<String>,

        /// JSON conversation file; read for context and appended with this exchange
        #[arg(long)]
        history: Option<PathBuf>,

        /// LLM model to use; canned answers when absent or not downloaded
        #[arg(short, long)]
        llm: Option<String>,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available models
    List {
        /// Show only embedding models
        #[arg(long)]
        embeddings: bool,

        /// Show only LLM models
        #[arg(long)]
        llms: bool,
    },

    /// Download a model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model name to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("json").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), RESUME_EXTENSIONS).is_err());
    }

    #[test]
    fn test_analyze_accepts_inline_text() {
        let cli = Cli::try_parse_from([
            "skill-gap",
            "analyze",
            "--resume-text",
            "Python developer",
            "--job",
            "job.md",
            "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { resume, resume_text, job, offline, .. } => {
                assert!(resume.is_none());
                assert_eq!(resume_text.as_deref(), Some("Python developer"));
                assert_eq!(job, Some(PathBuf::from("job.md")));
                assert!(offline);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_chat_arguments() {
        let cli = Cli::try_parse_from([
            "skill-gap",
            "chat",
            "How do I learn Kubernetes?",
            "--context",
            "report.json",
            "--history",
            "chat.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Chat { message, context, job_title, history, llm } => {
                assert_eq!(message, "How do I learn Kubernetes?");
                assert_eq!(context, Some(PathBuf::from("report.json")));
                assert!(job_title.is_none());
                assert_eq!(history, Some(PathBuf::from("chat.json")));
                assert!(llm.is_none());
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_analyze_requires_resume() {
        assert!(Cli::try_parse_from(["skill-gap", "analyze", "--job-text", "Rust"]).is_err());
        assert!(Cli::try_parse_from([
            "skill-gap",
            "analyze",
            "--resume",
            "cv.txt",
            "--resume-text",
            "inline",
            "--job-text",
            "Rust"
        ])
        .is_err());
    }
}
