//! Resume vs job description skill-gap analysis

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SkillGapError};
pub use processing::analyzer::{AnalysisResult, GapAnalyzer, Importance, SkillGap};
pub use processing::embeddings::{EmbeddingProvider, HashingEmbedder};
pub use processing::suggestions::ImprovementSuggestion;
